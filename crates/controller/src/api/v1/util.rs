// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use serde::{Deserialize, Deserializer};

/// Deserializer wrapper for `Option<Option<T>>` patch fields
///
/// Distinguishes an absent field (outer `None`, no change) from an explicit
/// `null` (inner `None`, clear the value).
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

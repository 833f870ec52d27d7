// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! REST API v1
//!
//! Current endpoints. See their respective function:
//! - `/events/all` ([GET](events::get_events_all))
//! - `/events/me` ([GET](events::get_events_me))
//! - `/events` ([POST](events::new_event))
//! - `/events/{event_id}` ([GET](events::get_event), [PATCH](events::patch_event), [DELETE](events::delete_event))
//! - `/events/{event_id}/tags` ([POST](events::tags::add_tag_to_event))
//! - `/events/{event_id}/tags/{tag_id}` ([DELETE](events::tags::remove_tag_from_event))
//! - `/events/{event_id}/rsvp` ([GET](events::rsvp::get_rsvp), [PUT](events::rsvp::put_rsvp))
//! - `/users/me` ([GET](users::get_me), [PATCH](users::patch_me))
//! - `/users/{user_id}` ([GET](users::get_user))
//! - `/users/me/profile` ([GET](profiles::get_my_profile), [POST](profiles::new_profile))
//! - `/users/me/profile/avatar` ([PUT](profiles::put_avatar))
//! - `/profiles/{profile_id}` ([GET](profiles::get_profile), [PATCH](profiles::patch_profile), [DELETE](profiles::delete_profile))

pub use response::{ApiError, DefaultApiResult};

pub mod events;
pub mod middleware;
pub mod profiles;
pub mod response;
pub mod users;
mod util;

/// Maps the merged absent/not-owned `NotFound` of ownership gated mutations
/// to the information hiding 403
pub(crate) fn ownership_gate(e: database::DatabaseError) -> ApiError {
    match e {
        database::DatabaseError::NotFound => ApiError::access_denied(),
        e => e.into(),
    }
}

// Error code messages
pub const CODE_INVALID_EMAIL: &str = "invalid_email";
pub const CODE_INVALID_LENGTH: &str = "invalid_length";
pub const CODE_INVALID_URL: &str = "invalid_url";
pub const CODE_INVALID_VALUE: &str = "invalid_value";
pub const CODE_MISSING_VALUE: &str = "missing_value";
pub const CODE_OUT_OF_RANGE: &str = "out_of_range";
pub const CODE_VALUE_REQUIRED: &str = "value_required";

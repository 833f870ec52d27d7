// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the profile specific database structs and queries
//!
//! A profile is the optional one-to-one extension of a user. The unique
//! index on `user_id` enforces the at-most-one invariant; a second create
//! surfaces as a unique violation which `try_insert` turns into `None`.

use crate::schema::profiles;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DatabaseError, DbConnection, Result};
use diesel::prelude::*;

diesel_newtype! {
    #[derive(Copy)] ProfileId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel profile struct
///
/// Is used as a result in various queries. Represents a profile column
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, profile_id: ProfileId) -> Result<Profile> {
        let query = profiles::table.filter(profiles::id.eq(profile_id));

        let profile = query.first(conn)?;

        Ok(profile)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_for_user(conn: &mut DbConnection, user_id: UserId) -> Result<Option<Profile>> {
        let query = profiles::table.filter(profiles::user_id.eq(user_id));

        let profile = query.first(conn).optional()?;

        Ok(profile)
    }

    /// Deletes the profile only when it is owned by `user_id`
    ///
    /// An absent profile and a foreign profile are indistinguishable to the
    /// caller, both yield `NotFound`.
    #[tracing::instrument(err, skip_all)]
    pub fn delete_owned(
        conn: &mut DbConnection,
        user_id: UserId,
        profile_id: ProfileId,
    ) -> Result<()> {
        let rows = diesel::delete(profiles::table)
            .filter(
                profiles::id
                    .eq(profile_id)
                    .and(profiles::user_id.eq(user_id)),
            )
            .execute(conn)?;

        if rows == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    /// Stores the reference to an uploaded avatar on the user's profile
    ///
    /// Only the URL is persisted, the blob itself lives in object storage.
    #[tracing::instrument(err, skip_all)]
    pub fn set_avatar_url(conn: &mut DbConnection, user_id: UserId, url: &str) -> Result<Profile> {
        let query = diesel::update(profiles::table)
            .filter(profiles::user_id.eq(user_id))
            .set(profiles::avatar_url.eq(url))
            .returning(profiles::all_columns);

        let profile = query.get_result(conn)?;

        Ok(profile)
    }
}

/// Diesel insertable profile struct
///
/// Represents fields that have to be provided on profile insertion.
#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: UserId,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl NewProfile {
    /// Tries to insert the profile into the database
    ///
    /// When yielding a unique key violation on `user_id`, None is returned.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<Profile>> {
        let query = self.insert_into(profiles::table);

        let result = query.get_result(conn);

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Diesel profile struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct UpdateProfile {
    pub bio: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl UpdateProfile {
    /// Apply the update to the profile owned by `user_id`
    ///
    /// The ownership check and the mutation are a single conditional
    /// statement. Yields `NotFound` when the profile is absent or owned by
    /// someone else.
    #[tracing::instrument(err, skip_all)]
    pub fn apply_owned(
        self,
        conn: &mut DbConnection,
        user_id: UserId,
        profile_id: ProfileId,
    ) -> Result<Profile> {
        let query = diesel::update(profiles::table)
            .filter(
                profiles::id
                    .eq(profile_id)
                    .and(profiles::user_id.eq(user_id)),
            )
            .set(self)
            .returning(profiles::all_columns);

        let profile = query.get_result(conn)?;

        Ok(profile)
    }
}

// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
//!
//! Users are created by the external identity subsystem. From the
//! controller's perspective they are read-only apart from the
//! display-name/email edit on the `/users/me` endpoint.

use crate::schema::users;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;

diesel_newtype! {
    #[derive(Copy)] UserId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let query = users::table.filter(users::id.eq(user_id));

        let user = query.first(conn)?;

        Ok(user)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
}

impl NewUser {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let query = self.insert_into(users::table);

        let user = query.get_result(conn)?;

        Ok(user)
    }
}

/// Diesel user struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UpdateUser {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let query = diesel::update(users::table)
            .filter(users::id.eq(user_id))
            .set(self)
            .returning(users::all_columns);

        let user = query.get_result(conn)?;

        Ok(user)
    }
}

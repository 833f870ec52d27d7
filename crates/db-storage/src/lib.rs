// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the database ORM and database migrations for the muster controller
//!
//! Builds upon muster-database. Each entity module defines the diesel model
//! structs together with the queries operating on them. Queries take a
//! `&mut DbConnection` so they compose inside transactions.

#[macro_use]
extern crate diesel;

#[macro_use]
mod macros;
mod schema;

pub mod events;
pub mod migrations;
pub mod profiles;
pub mod rsvps;
pub mod tags;
pub mod users;

// SQL types reexport for schema.rs
pub mod sql_types {
    pub use super::rsvps::RsvpStatusType as Rsvp_status;
    pub use diesel::sql_types::*;
}

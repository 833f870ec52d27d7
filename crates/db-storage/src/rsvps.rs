// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the RSVP specific database structs and queries
//!
//! An RSVP is the attendance response of a user to an event. The unique
//! index on `(event_id, user_id)` guarantees at most one row per pair; a
//! repeated response updates the row in place. A pair without a row is in
//! the implicit "no response" state.

use crate::events::{Event, EventId};
use crate::schema::event_rsvps;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::associations::BelongsTo;
use diesel::prelude::*;
use diesel::upsert::excluded;
use serde::{Deserialize, Serialize};

diesel_newtype! {
    #[derive(Copy)] RsvpId(uuid::Uuid) => diesel::sql_types::Uuid
}

sql_enum!(
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    RsvpStatus,
    "rsvp_status",
    RsvpStatusType,
    {
        Going = b"going",
        Maybe = b"maybe",
        NotGoing = b"not_going",
    }
);

/// Diesel RSVP struct
///
/// Is used as a result in various queries. Represents an RSVP column
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
#[diesel(table_name = event_rsvps)]
pub struct EventRsvp {
    pub id: RsvpId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub status: RsvpStatus,
    pub updated_at: DateTime<Utc>,
}

impl EventRsvp {
    /// Returns the response of the given user for the given event
    ///
    /// `None` means the user has not responded yet, which is a regular
    /// state and not an error.
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_user(
        conn: &mut DbConnection,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<EventRsvp>> {
        let query = event_rsvps::table.filter(
            event_rsvps::event_id
                .eq(event_id)
                .and(event_rsvps::user_id.eq(user_id)),
        );

        let rsvp = query.first(conn).optional()?;

        Ok(rsvp)
    }

    /// Returns the RSVPs of the given events, batched and grouped per event
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_events(
        conn: &mut DbConnection,
        events: &[&Event],
    ) -> Result<Vec<Vec<EventRsvp>>> {
        let rsvps: Vec<EventRsvp> = EventRsvp::belonging_to(events).load(conn)?;

        let rsvps_by_event = rsvps.grouped_by(events);

        Ok(rsvps_by_event)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn delete_all_for_event(conn: &mut DbConnection, event_id: EventId) -> Result<()> {
        diesel::delete(event_rsvps::table)
            .filter(event_rsvps::event_id.eq(event_id))
            .execute(conn)?;

        Ok(())
    }
}

/// Diesel insertable RSVP struct
///
/// Represents fields that have to be provided when responding to an event.
#[derive(Debug, Insertable)]
#[diesel(table_name = event_rsvps)]
pub struct NewEventRsvp {
    pub event_id: EventId,
    pub user_id: UserId,
    pub status: RsvpStatus,
}

impl NewEventRsvp {
    /// Inserts the response or updates the existing one of the same pair
    ///
    /// A single `INSERT .. ON CONFLICT (event_id, user_id) DO UPDATE`
    /// statement, so concurrent responses of the same user cannot create a
    /// second row and the last write wins.
    #[tracing::instrument(err, skip_all)]
    pub fn upsert(self, conn: &mut DbConnection) -> Result<EventRsvp> {
        let query = diesel::insert_into(event_rsvps::table)
            .values(&self)
            .on_conflict((event_rsvps::event_id, event_rsvps::user_id))
            .do_update()
            .set((
                event_rsvps::status.eq(excluded(event_rsvps::status)),
                event_rsvps::updated_at.eq(diesel::dsl::now),
            ))
            .returning(event_rsvps::all_columns);

        let rsvp = query.get_result(conn)?;

        Ok(rsvp)
    }
}

// Below impl allows for usage of diesel's BelongsTo traits on &[&Event] to
// avoid cloning the events into an array just for EventRsvp::get_for_events
impl BelongsTo<&Event> for EventRsvp {
    type ForeignKey = EventId;

    type ForeignKeyColumn = event_rsvps::event_id;

    fn foreign_key(&self) -> Option<&Self::ForeignKey> {
        Some(&self.event_id)
    }

    fn foreign_key_column() -> Self::ForeignKeyColumn {
        event_rsvps::event_id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rsvp_status_wire_format() {
        assert_eq!(
            serde_json::to_value(RsvpStatus::Going).unwrap(),
            serde_json::json!("GOING")
        );
        assert_eq!(
            serde_json::to_value(RsvpStatus::Maybe).unwrap(),
            serde_json::json!("MAYBE")
        );
        assert_eq!(
            serde_json::to_value(RsvpStatus::NotGoing).unwrap(),
            serde_json::json!("NOT_GOING")
        );
    }

    #[test]
    fn rsvp_status_from_wire() {
        let status: RsvpStatus = serde_json::from_str("\"NOT_GOING\"").unwrap();
        assert_eq!(status, RsvpStatus::NotGoing);

        // unknown literals are rejected
        assert!(serde_json::from_str::<RsvpStatus>("\"not_going\"").is_err());
        assert!(serde_json::from_str::<RsvpStatus>("\"ATTENDING\"").is_err());
    }
}

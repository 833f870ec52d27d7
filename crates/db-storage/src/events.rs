// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the event specific database structs and queries
//!
//! Events are the aggregate root of the domain: tags and RSVPs belong to
//! them and are removed together with them. Every mutation is bound to the
//! organizer (`created_by`) which is fixed on insertion and never changes.

use crate::rsvps::EventRsvp;
use crate::schema::events;
use crate::tags::Tag;
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;

diesel_newtype! {
    #[derive(Copy)] EventId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel event struct
///
/// Is used as a result in various queries. Represents an event column
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(User, foreign_key = created_by))]
pub struct Event {
    pub id: EventId,
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let query = events::table.filter(events::id.eq(event_id));

        let event = query.first(conn)?;

        Ok(event)
    }

    /// Returns the event only when it is owned by `organizer`
    ///
    /// An absent event and a foreign event are indistinguishable to the
    /// caller, both yield `NotFound`.
    #[tracing::instrument(err, skip_all)]
    pub fn get_owned(
        conn: &mut DbConnection,
        organizer: UserId,
        event_id: EventId,
    ) -> Result<Event> {
        let query = events::table.filter(
            events::id
                .eq(event_id)
                .and(events::created_by.eq(organizer)),
        );

        let event = query.first(conn)?;

        Ok(event)
    }

    /// Returns all events, newest first
    ///
    /// Unfiltered across organizers, used by the administrative listing.
    #[tracing::instrument(err, skip_all)]
    pub fn get_all_newest_first(conn: &mut DbConnection) -> Result<Vec<Event>> {
        let query = events::table
            .order_by(events::created_at.desc())
            .then_order_by(events::id);

        let events = query.load(conn)?;

        Ok(events)
    }

    /// Returns the events created by the given user, newest first
    #[tracing::instrument(err, skip_all)]
    pub fn get_created_by_newest_first(
        conn: &mut DbConnection,
        user_id: UserId,
    ) -> Result<Vec<Event>> {
        let query = events::table
            .filter(events::created_by.eq(user_id))
            .order_by(events::created_at.desc())
            .then_order_by(events::id);

        let events = query.load(conn)?;

        Ok(events)
    }

    /// Deletes the event of the given organizer together with its tags and RSVPs
    ///
    /// Runs in a single transaction so no partial cascade can be observed.
    /// Yields `NotFound` when the event is absent or owned by someone else.
    #[tracing::instrument(err, skip_all)]
    pub fn delete_for_organizer(
        conn: &mut DbConnection,
        organizer: UserId,
        event_id: EventId,
    ) -> Result<()> {
        conn.transaction(|conn| {
            // ownership gate, created_by is immutable
            Event::get_owned(conn, organizer, event_id)?;

            Tag::delete_all_for_event(conn, event_id)?;
            EventRsvp::delete_all_for_event(conn, event_id)?;

            diesel::delete(events::table)
                .filter(events::id.eq(event_id))
                .execute(conn)?;

            Ok(())
        })
    }
}

/// Diesel insertable event struct
///
/// Represents fields that have to be provided on event insertion.
#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let query = self.insert_into(events::table);

        let event = query.get_result(conn)?;

        Ok(event)
    }
}

/// Diesel event struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdateEvent {
    /// Apply the update to the event owned by `organizer`
    ///
    /// The ownership check and the mutation are a single conditional
    /// statement (`WHERE id = .. AND created_by = ..`), there is no window
    /// between them. Yields `NotFound` when the event is absent or owned by
    /// someone else.
    #[tracing::instrument(err, skip_all)]
    pub fn apply_for_organizer(
        self,
        conn: &mut DbConnection,
        organizer: UserId,
        event_id: EventId,
    ) -> Result<Event> {
        let query = diesel::update(events::table)
            .filter(
                events::id
                    .eq(event_id)
                    .and(events::created_by.eq(organizer)),
            )
            .set(self)
            .returning(events::all_columns);

        let event = query.get_result(conn)?;

        Ok(event)
    }
}

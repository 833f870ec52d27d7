// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the tag specific database structs and queries
//!
//! Tags are labels scoped to a single event and have no independent
//! lifecycle. Duplicate names within an event are permitted.

use crate::events::{Event, EventId};
use crate::schema::tags;
use database::{DatabaseError, DbConnection, Result};
use diesel::associations::BelongsTo;
use diesel::prelude::*;

diesel_newtype! {
    #[derive(Copy)] TagId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel tag struct
///
/// Is used as a result in various queries. Represents a tag column
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable)]
pub struct Tag {
    pub id: TagId,
    pub event_id: EventId,
    pub name: String,
}

impl Tag {
    /// Returns the tags of the given events, batched and grouped per event
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_events(conn: &mut DbConnection, events: &[&Event]) -> Result<Vec<Vec<Tag>>> {
        let tags: Vec<Tag> = Tag::belonging_to(events).load(conn)?;

        let tags_by_event = tags.grouped_by(events);

        Ok(tags_by_event)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_all_for_event(conn: &mut DbConnection, event_id: EventId) -> Result<Vec<Tag>> {
        let query = tags::table.filter(tags::event_id.eq(event_id));

        let tags = query.load(conn)?;

        Ok(tags)
    }

    /// Deletes the tag only when it belongs to the given event
    ///
    /// A tag of a different event is indistinguishable from a missing tag,
    /// both yield `NotFound`.
    #[tracing::instrument(err, skip_all)]
    pub fn delete_for_event(
        conn: &mut DbConnection,
        tag_id: TagId,
        event_id: EventId,
    ) -> Result<()> {
        let rows = diesel::delete(tags::table)
            .filter(tags::id.eq(tag_id).and(tags::event_id.eq(event_id)))
            .execute(conn)?;

        if rows == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(err, skip_all)]
    pub fn delete_all_for_event(conn: &mut DbConnection, event_id: EventId) -> Result<()> {
        diesel::delete(tags::table)
            .filter(tags::event_id.eq(event_id))
            .execute(conn)?;

        Ok(())
    }
}

/// Diesel insertable tag struct
///
/// Represents fields that have to be provided on tag insertion.
#[derive(Debug, Insertable)]
#[diesel(table_name = tags)]
pub struct NewTag {
    pub event_id: EventId,
    pub name: String,
}

impl NewTag {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Tag> {
        let query = self.insert_into(tags::table);

        let tag = query.get_result(conn)?;

        Ok(tag)
    }
}

// Below impl allows for usage of diesel's BelongsTo traits on &[&Event] to
// avoid cloning the events into an array just for Tag::get_for_events
impl BelongsTo<&Event> for Tag {
    type ForeignKey = EventId;

    type ForeignKeyColumn = tags::event_id;

    fn foreign_key(&self) -> Option<&Self::ForeignKey> {
        Some(&self.event_id)
    }

    fn foreign_key_column() -> Self::ForeignKeyColumn {
        tags::event_id
    }
}

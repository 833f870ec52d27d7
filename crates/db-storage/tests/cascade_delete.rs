// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use database::{DatabaseError, OptionalExt};
use muster_db_storage::events::Event;
use muster_db_storage::rsvps::{EventRsvp, NewEventRsvp, RsvpStatus};
use muster_db_storage::tags::{NewTag, Tag};
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::{make_event, make_user};

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn deleting_an_event_removes_tags_and_rsvps() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let attendee = make_user(&mut conn, "Attendee");
    let event = make_event(&mut conn, &organizer, "Launch");

    let tag = NewTag {
        event_id: event.id,
        name: "outdoor".into(),
    }
    .insert(&mut conn)
    .unwrap();

    NewEventRsvp {
        event_id: event.id,
        user_id: attendee.id,
        status: RsvpStatus::Maybe,
    }
    .upsert(&mut conn)
    .unwrap();

    Event::delete_for_organizer(&mut conn, organizer.id, event.id).unwrap();

    // the event is gone
    let event_gone = Event::get(&mut conn, event.id).optional().unwrap();
    assert_eq!(event_gone, None);

    // and so are its children, the pair is back in the no-response state
    let tags = Tag::get_all_for_event(&mut conn, event.id).unwrap();
    assert_eq!(tags, vec![]);

    let rsvp = EventRsvp::get_for_user(&mut conn, event.id, attendee.id).unwrap();
    assert_eq!(rsvp, None);

    // removing the already removed tag reports NotFound
    let result = Tag::delete_for_event(&mut conn, tag.id, event.id);
    assert!(matches!(result, Err(DatabaseError::NotFound)));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn tags_are_bound_to_their_event() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let event = make_event(&mut conn, &organizer, "Launch");
    let other_event = make_event(&mut conn, &organizer, "Retreat");

    let tag = NewTag {
        event_id: event.id,
        name: "outdoor".into(),
    }
    .insert(&mut conn)
    .unwrap();

    // duplicates within an event are permitted
    let duplicate = NewTag {
        event_id: event.id,
        name: "outdoor".into(),
    }
    .insert(&mut conn)
    .unwrap();
    assert_ne!(duplicate.id, tag.id);

    // a tag of a different event is indistinguishable from a missing tag
    let result = Tag::delete_for_event(&mut conn, tag.id, other_event.id);
    assert!(matches!(result, Err(DatabaseError::NotFound)));

    let remaining = Tag::get_all_for_event(&mut conn, event.id).unwrap();
    assert_eq!(remaining.len(), 2);

    Tag::delete_for_event(&mut conn, tag.id, event.id).unwrap();
    let remaining = Tag::get_all_for_event(&mut conn, event.id).unwrap();
    assert_eq!(remaining, vec![duplicate]);
}

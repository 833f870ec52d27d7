// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use muster_db_storage::events::{Event, UpdateEvent};
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::{make_event, make_user};

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn foreign_caller_cannot_update() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let other = make_user(&mut conn, "Other");

    let event = make_event(&mut conn, &organizer, "Launch");

    // a caller who is not the organizer gets NotFound, absent and foreign
    // events are indistinguishable
    let result = UpdateEvent {
        title: Some("hijacked".into()),
        description: None,
        location: None,
        date: None,
    }
    .apply_for_organizer(&mut conn, other.id, event.id);

    assert!(matches!(result, Err(DatabaseError::NotFound)));

    // the event is unmodified
    let unchanged = Event::get(&mut conn, event.id).unwrap();
    assert_eq!(unchanged, event);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn foreign_caller_cannot_delete() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let other = make_user(&mut conn, "Other");

    let event = make_event(&mut conn, &organizer, "Launch");

    let result = Event::delete_for_organizer(&mut conn, other.id, event.id);
    assert!(matches!(result, Err(DatabaseError::NotFound)));

    // still there
    let unchanged = Event::get(&mut conn, event.id).unwrap();
    assert_eq!(unchanged, event);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn organizer_update_applies_partial_fields() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let event = make_event(&mut conn, &organizer, "Launch");

    let updated = UpdateEvent {
        title: Some("Launch v2".into()),
        description: None,
        location: None,
        date: None,
    }
    .apply_for_organizer(&mut conn, organizer.id, event.id)
    .unwrap();

    assert_eq!(updated.title, "Launch v2");
    // untouched fields are kept
    assert_eq!(updated.description, event.description);
    assert_eq!(updated.location, event.location);
    assert_eq!(updated.date, event.date);
    assert_eq!(updated.created_by, organizer.id);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn create_then_get_round_trip() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let event = make_event(&mut conn, &organizer, "Launch");

    let fetched = Event::get(&mut conn, event.id).unwrap();
    assert_eq!(fetched, event);

    // listings return newest first
    let second = make_event(&mut conn, &organizer, "Followup");
    let listed = Event::get_created_by_newest_first(&mut conn, organizer.id).unwrap();
    let titles: Vec<_> = listed.iter().map(|e| e.title.as_str()).collect();
    let launch_pos = titles.iter().position(|t| *t == "Launch").unwrap();
    let followup_pos = titles.iter().position(|t| *t == "Followup").unwrap();
    assert!(followup_pos < launch_pos);
    assert_eq!(listed.iter().find(|e| e.id == second.id).unwrap(), &second);
}

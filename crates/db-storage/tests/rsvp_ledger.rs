// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

use muster_db_storage::rsvps::{EventRsvp, NewEventRsvp, RsvpStatus};
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::{make_event, make_user};

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn repeated_responses_converge_to_one_row() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let attendee = make_user(&mut conn, "Attendee");
    let event = make_event(&mut conn, &organizer, "Launch");

    // first response creates the row
    let first = NewEventRsvp {
        event_id: event.id,
        user_id: attendee.id,
        status: RsvpStatus::Maybe,
    }
    .upsert(&mut conn)
    .unwrap();
    assert_eq!(first.status, RsvpStatus::Maybe);

    // every further response updates the same row, last write wins
    for status in [
        RsvpStatus::Going,
        RsvpStatus::NotGoing,
        RsvpStatus::NotGoing,
        RsvpStatus::Going,
    ] {
        let updated = NewEventRsvp {
            event_id: event.id,
            user_id: attendee.id,
            status,
        }
        .upsert(&mut conn)
        .unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.status, status);
    }

    let rsvps_by_event = EventRsvp::get_for_events(&mut conn, &[&event]).unwrap();
    assert_eq!(rsvps_by_event.len(), 1);
    assert_eq!(rsvps_by_event[0].len(), 1);
    assert_eq!(rsvps_by_event[0][0].status, RsvpStatus::Going);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn no_response_is_a_regular_state() {
    let db = common::setup().await;
    let mut conn = db.get_conn().unwrap();

    let organizer = make_user(&mut conn, "Organizer");
    let attendee = make_user(&mut conn, "Attendee");
    let event = make_event(&mut conn, &organizer, "Launch");

    // no row yet, not an error
    let none = EventRsvp::get_for_user(&mut conn, event.id, attendee.id).unwrap();
    assert_eq!(none, None);

    NewEventRsvp {
        event_id: event.id,
        user_id: attendee.id,
        status: RsvpStatus::Going,
    }
    .upsert(&mut conn)
    .unwrap();

    let some = EventRsvp::get_for_user(&mut conn, event.id, attendee.id)
        .unwrap()
        .unwrap();
    assert_eq!(some.status, RsvpStatus::Going);

    // responses are scoped per user
    let organizer_rsvp = EventRsvp::get_for_user(&mut conn, event.id, organizer.id).unwrap();
    assert_eq!(organizer_rsvp, None);
}

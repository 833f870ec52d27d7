// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Event related API structs and endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the database crate [`db_storage`] for database operations.

use crate::api::v1::ownership_gate;
use crate::api::v1::response::{ApiError, ApiResponse, NoContent};
use crate::api::v1::DefaultApiResult;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, patch, post, Either};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::events::{Event, EventId, NewEvent, UpdateEvent};
use db_storage::rsvps::EventRsvp;
use db_storage::tags::Tag;
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod rsvp;
pub mod tags;

use rsvp::RsvpResource;
use tags::TagResource;

/// Event resource representation
///
/// Returned from the `/events` endpoints. The `tags` and `rsvps` lists are
/// only included where the listing eagerly loads them.
#[derive(Debug, Serialize)]
pub struct EventResource {
    /// ID of the event
    pub id: EventId,

    /// ID of the user who organizes the event
    ///
    /// Fixed on creation, an event cannot change hands.
    pub created_by: UserId,

    /// Title of the event
    pub title: String,

    /// Description of the event
    pub description: String,

    /// Location the event takes place at
    pub location: String,

    /// Point in time the event takes place at, as UTC instant
    pub date: DateTime<Utc>,

    /// Timestamp of the event creation
    pub created_at: DateTime<Utc>,

    /// Tags of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagResource>>,

    /// Attendance responses of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvps: Option<Vec<RsvpResource>>,
}

impl EventResource {
    fn from_db(event: Event) -> Self {
        Self {
            id: event.id,
            created_by: event.created_by,
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            created_at: event.created_at,
            tags: None,
            rsvps: None,
        }
    }

    fn from_db_with_children(event: Event, tags: Vec<Tag>, rsvps: Vec<EventRsvp>) -> Self {
        Self {
            tags: Some(tags.into_iter().map(TagResource::from_db).collect()),
            rsvps: Some(rsvps.into_iter().map(RsvpResource::from_db).collect()),
            ..Self::from_db(event)
        }
    }
}

/// API Endpoint `GET /events/all`
///
/// Returns every event of every organizer, newest first, with tags and
/// RSVPs included. Used by the administrative listing.
#[get("/events/all")]
pub async fn get_events_all(db: Data<Db>) -> DefaultApiResult<Vec<EventResource>> {
    let event_resources = crate::block(move || -> Result<Vec<EventResource>, ApiError> {
        let mut conn = db.get_conn()?;

        let events = Event::get_all_newest_first(&mut conn)?;

        let event_refs = events.iter().collect::<Vec<&Event>>();
        let tags_by_event = Tag::get_for_events(&mut conn, &event_refs)?;
        let rsvps_by_event = EventRsvp::get_for_events(&mut conn, &event_refs)?;

        let event_resources = events
            .into_iter()
            .zip(tags_by_event)
            .zip(rsvps_by_event)
            .map(|((event, tags), rsvps)| EventResource::from_db_with_children(event, tags, rsvps))
            .collect();

        Ok(event_resources)
    })
    .await??;

    Ok(ApiResponse::new(event_resources))
}

/// API Endpoint `GET /events/me`
///
/// Returns the events organized by the caller, newest first. The cheaper
/// listing for the "my events" view, tags and RSVPs are not included.
#[get("/events/me")]
pub async fn get_events_me(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> DefaultApiResult<Vec<EventResource>> {
    let event_resources = crate::block(move || -> Result<Vec<EventResource>, ApiError> {
        let mut conn = db.get_conn()?;

        let events = Event::get_created_by_newest_first(&mut conn, current_user.id)?;

        Ok(events.into_iter().map(EventResource::from_db).collect())
    })
    .await??;

    Ok(ApiResponse::new(event_resources))
}

/// API Endpoint `GET /events/{event_id}`
///
/// Returns the specified event. Reads are not ownership gated, any
/// authenticated caller may fetch any event.
#[get("/events/{event_id}")]
pub async fn get_event(db: Data<Db>, event_id: Path<EventId>) -> DefaultApiResult<EventResource> {
    let event_id = event_id.into_inner();

    let event_resource = crate::block(move || -> Result<EventResource, ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        Ok(EventResource::from_db(event))
    })
    .await??;

    Ok(ApiResponse::new(event_resource))
}

/// Body of the `POST /events` endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct PostEventsBody {
    /// Title of the event
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Description of the event
    #[validate(length(min = 1, max = 4096))]
    pub description: String,

    /// Location the event takes place at
    #[validate(length(min = 1, max = 255))]
    pub location: String,

    /// Date of the event as ISO-8601 UTC timestamp
    ///
    /// Values which do not parse to a valid instant are rejected by the
    /// JSON extractor before this struct is built.
    pub date: DateTime<Utc>,
}

/// API Endpoint `POST /events`
///
/// Creates a new event with the caller as its organizer.
#[post("/events")]
pub async fn new_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<PostEventsBody>,
) -> DefaultApiResult<EventResource> {
    let body = body.into_inner();

    body.validate()?;

    let event_resource = crate::block(move || -> Result<EventResource, ApiError> {
        let mut conn = db.get_conn()?;

        let event = NewEvent {
            created_by: current_user.id,
            title: body.title,
            description: body.description,
            location: body.location,
            date: body.date,
        }
        .insert(&mut conn)?;

        Ok(EventResource::from_db(event))
    })
    .await??;

    Ok(ApiResponse::created(event_resource))
}

/// Body of the `PATCH /events/{event_id}` endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct PatchEventBody {
    /// Patch the title of the event
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    /// Patch the description of the event
    #[validate(length(min = 1, max = 4096))]
    pub description: Option<String>,

    /// Patch the location of the event
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    /// Patch the date of the event
    pub date: Option<DateTime<Utc>>,
}

impl PatchEventBody {
    fn is_empty(&self) -> bool {
        let PatchEventBody {
            title,
            description,
            location,
            date,
        } = self;

        title.is_none() && description.is_none() && location.is_none() && date.is_none()
    }
}

/// API Endpoint `PATCH /events/{event_id}`
///
/// Applies the supplied fields to the event. Only the organizer may modify
/// an event; an absent event and a foreign event are answered with the same
/// 403 so callers cannot probe for existence.
#[patch("/events/{event_id}")]
pub async fn patch_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    patch: Json<PatchEventBody>,
) -> Result<Either<ApiResponse<EventResource>, NoContent>, ApiError> {
    let patch = patch.into_inner();

    if patch.is_empty() {
        return Ok(Either::Right(NoContent));
    }

    patch.validate()?;

    let event_id = event_id.into_inner();

    let event_resource = crate::block(move || -> Result<EventResource, ApiError> {
        let mut conn = db.get_conn()?;

        let event = UpdateEvent {
            title: patch.title,
            description: patch.description,
            location: patch.location,
            date: patch.date,
        }
        .apply_for_organizer(&mut conn, current_user.id, event_id)
        .map_err(ownership_gate)?;

        Ok(EventResource::from_db(event))
    })
    .await??;

    Ok(Either::Left(ApiResponse::new(event_resource)))
}

/// API Endpoint `DELETE /events/{event_id}`
///
/// Deletes the event together with its tags and RSVPs. Only the organizer
/// may delete an event, with the same 403 policy as the patch endpoint.
#[delete("/events/{event_id}")]
pub async fn delete_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<NoContent, ApiError> {
    let event_id = event_id.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        Event::delete_for_organizer(&mut conn, current_user.id, event_id)
            .map_err(ownership_gate)?;

        Ok(())
    })
    .await??;

    Ok(NoContent)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn post_events_body_rejects_empty_fields() {
        let body: PostEventsBody = serde_json::from_value(json!({
            "title": "",
            "description": "d",
            "location": "HQ",
            "date": "2025-06-01T10:00:00.000Z",
        }))
        .unwrap();

        assert!(body.validate().is_err());
    }

    #[test]
    fn post_events_body_rejects_invalid_date() {
        // fails at the deserialization layer, mapped to 400 by the JSON
        // error handler
        let result = serde_json::from_value::<PostEventsBody>(json!({
            "title": "Launch",
            "description": "d",
            "location": "HQ",
            "date": "tomorrow-ish",
        }));

        assert!(result.is_err());
    }

    #[test]
    fn post_events_body_accepts_utc_instant() {
        let body: PostEventsBody = serde_json::from_value(json!({
            "title": "Launch",
            "description": "d",
            "location": "HQ",
            "date": "2025-06-01T10:00:00.000Z",
        }))
        .unwrap();

        assert!(body.validate().is_ok());
        assert_eq!(body.date.to_rfc3339(), "2025-06-01T10:00:00+00:00");
    }

    #[test]
    fn patch_event_body_empty_detection() {
        let empty: PatchEventBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());

        let patch: PatchEventBody = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert!(!patch.is_empty());
    }
}

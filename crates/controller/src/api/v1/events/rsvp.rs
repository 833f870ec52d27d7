// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! RSVP related API structs and endpoints
//!
//! Any authenticated user may respond to any event. Responding repeatedly
//! updates the response in place; a pair without a response is a regular
//! state which the `GET` endpoint reports as `"status": null`.

use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::v1::DefaultApiResult;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{get, put};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::events::{Event, EventId};
use db_storage::rsvps::{EventRsvp, NewEventRsvp, RsvpId, RsvpStatus};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};

/// RSVP resource representation
#[derive(Debug, Serialize)]
pub struct RsvpResource {
    /// ID of the RSVP
    pub id: RsvpId,

    /// ID of the event the response refers to
    pub event_id: EventId,

    /// ID of the responding user
    pub user_id: UserId,

    /// The attendance status, one of `GOING`, `MAYBE`, `NOT_GOING`
    pub status: RsvpStatus,

    /// Timestamp of the last response
    pub updated_at: DateTime<Utc>,
}

impl RsvpResource {
    pub(super) fn from_db(rsvp: EventRsvp) -> Self {
        Self {
            id: rsvp.id,
            event_id: rsvp.event_id,
            user_id: rsvp.user_id,
            status: rsvp.status,
            updated_at: rsvp.updated_at,
        }
    }
}

/// Response body of the `GET /events/{event_id}/rsvp` endpoint
///
/// `status` is `null` while the caller has not responded yet.
#[derive(Debug, Serialize)]
pub struct RsvpStateResource {
    pub status: Option<RsvpStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of the `PUT /events/{event_id}/rsvp` endpoint
#[derive(Debug, Deserialize)]
pub struct PutRsvpBody {
    pub status: RsvpStatus,
}

/// API Endpoint `PUT /events/{event_id}/rsvp`
///
/// Responds to the event for the calling user. The first call creates the
/// response, every further call overwrites its status, whichever state it
/// is in.
#[put("/events/{event_id}/rsvp")]
pub async fn put_rsvp(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PutRsvpBody>,
) -> DefaultApiResult<RsvpResource> {
    let event_id = event_id.into_inner();
    let status = body.into_inner().status;

    let rsvp_resource = crate::block(move || -> Result<RsvpResource, ApiError> {
        let mut conn = db.get_conn()?;

        // responding to a missing event is a plain 404, nothing to hide here
        Event::get(&mut conn, event_id)?;

        let rsvp = NewEventRsvp {
            event_id,
            user_id: current_user.id,
            status,
        }
        .upsert(&mut conn)?;

        Ok(RsvpResource::from_db(rsvp))
    })
    .await??;

    Ok(ApiResponse::new(rsvp_resource))
}

/// API Endpoint `GET /events/{event_id}/rsvp`
///
/// Returns the caller's response for the event, or the no-response sentinel.
#[get("/events/{event_id}/rsvp")]
pub async fn get_rsvp(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> DefaultApiResult<RsvpStateResource> {
    let event_id = event_id.into_inner();

    let state = crate::block(move || -> Result<RsvpStateResource, ApiError> {
        let mut conn = db.get_conn()?;

        Event::get(&mut conn, event_id)?;

        let rsvp = EventRsvp::get_for_user(&mut conn, event_id, current_user.id)?;

        let state = match rsvp {
            Some(rsvp) => RsvpStateResource {
                status: Some(rsvp.status),
                updated_at: Some(rsvp.updated_at),
            },
            None => RsvpStateResource {
                status: None,
                updated_at: None,
            },
        };

        Ok(state)
    })
    .await??;

    Ok(ApiResponse::new(state))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn put_rsvp_body_takes_wire_literals() {
        let body: PutRsvpBody = serde_json::from_value(json!({"status": "MAYBE"})).unwrap();
        assert_eq!(body.status, RsvpStatus::Maybe);
    }

    #[test]
    fn no_response_serializes_to_null_status() {
        let state = RsvpStateResource {
            status: None,
            updated_at: None,
        };

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"status": null})
        );
    }
}

// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Tag related API structs and endpoints
//!
//! Tags are nested below their event. Mutating them requires the same
//! ownership proof as mutating the event itself, so a caller who may not
//! edit the event may not label it either.

use crate::api::v1::ownership_gate;
use crate::api::v1::response::{ApiError, ApiResponse, NoContent};
use crate::api::v1::DefaultApiResult;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, post};
use database::Db;
use db_storage::events::{Event, EventId};
use db_storage::tags::{NewTag, Tag, TagId};
use db_storage::users::User;
use diesel::Connection;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tag resource representation
#[derive(Debug, Serialize)]
pub struct TagResource {
    /// ID of the tag
    pub id: TagId,

    /// ID of the event the tag belongs to
    pub event_id: EventId,

    /// Name of the tag
    pub name: String,
}

impl TagResource {
    pub(super) fn from_db(tag: Tag) -> Self {
        Self {
            id: tag.id,
            event_id: tag.event_id,
            name: tag.name,
        }
    }
}

/// Body of the `POST /events/{event_id}/tags` endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct PostTagBody {
    /// Name of the tag
    ///
    /// Duplicates within an event are permitted.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// API Endpoint `POST /events/{event_id}/tags`
///
/// Adds a tag to the event. Only the organizer may do so; an absent event
/// and a foreign event are answered with the same 403.
#[post("/events/{event_id}/tags")]
pub async fn add_tag_to_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PostTagBody>,
) -> DefaultApiResult<TagResource> {
    let body = body.into_inner();

    body.validate()?;

    let event_id = event_id.into_inner();

    let tag_resource = crate::block(move || -> Result<TagResource, ApiError> {
        let mut conn = db.get_conn()?;

        let tag = conn.transaction(|conn| -> Result<Tag, ApiError> {
            // ownership gate, created_by is immutable so the only interleaving
            // hazard is a concurrent delete which the tag FK catches
            Event::get_owned(conn, current_user.id, event_id).map_err(ownership_gate)?;

            let tag = NewTag {
                event_id,
                name: body.name,
            }
            .insert(conn)?;

            Ok(tag)
        })?;

        Ok(TagResource::from_db(tag))
    })
    .await??;

    Ok(ApiResponse::created(tag_resource))
}

/// Path parameters of the `DELETE /events/{event_id}/tags/{tag_id}` endpoint
#[derive(Debug, Deserialize)]
pub struct RemoveTagPath {
    pub event_id: EventId,
    pub tag_id: TagId,
}

/// API Endpoint `DELETE /events/{event_id}/tags/{tag_id}`
///
/// Removes a tag from the event. Requires organizer ownership (403
/// otherwise); a tag which does not belong to the event is answered with
/// 404, whether it exists elsewhere or not at all.
#[delete("/events/{event_id}/tags/{tag_id}")]
pub async fn remove_tag_from_event(
    db: Data<Db>,
    current_user: ReqData<User>,
    path: Path<RemoveTagPath>,
) -> Result<NoContent, ApiError> {
    let RemoveTagPath { event_id, tag_id } = path.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        conn.transaction(|conn| -> Result<(), ApiError> {
            Event::get_owned(conn, current_user.id, event_id).map_err(ownership_gate)?;

            // NotFound of the tag itself stays a 404
            Tag::delete_for_event(conn, tag_id, event_id)?;

            Ok(())
        })
    })
    .await??;

    Ok(NoContent)
}

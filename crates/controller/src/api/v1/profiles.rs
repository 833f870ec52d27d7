// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Profile related API structs and endpoints
//!
//! A profile is the optional public extension of a user (bio, contact,
//! avatar). Every user has at most one; creating a second yields a conflict
//! so clients can branch to the update call instead.

use crate::api::v1::ownership_gate;
use crate::api::v1::response::{ApiError, ApiResponse, NoContent};
use crate::api::v1::util::deserialize_some;
use crate::api::v1::DefaultApiResult;
use crate::storage::ObjectStorage;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::{Bytes, Data, Json, Path, ReqData};
use actix_web::{delete, get, patch, post, put, Either, HttpRequest};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::profiles::{NewProfile, Profile, ProfileId, UpdateProfile};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile resource representation
#[derive(Debug, Serialize)]
pub struct ProfileResource {
    /// ID of the profile
    pub id: ProfileId,

    /// ID of the owning user
    pub user_id: UserId,

    pub bio: Option<String>,

    pub phone_number: Option<String>,

    pub address: Option<String>,

    /// Reference to the avatar blob in object storage
    pub avatar_url: Option<String>,

    /// Timestamp of the profile creation
    pub created_at: DateTime<Utc>,
}

impl ProfileResource {
    fn from_db(profile: Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            bio: profile.bio,
            phone_number: profile.phone_number,
            address: profile.address,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        }
    }
}

/// Body of the `POST /users/me/profile` endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct PostProfileBody {
    #[validate(length(max = 4096))]
    pub bio: Option<String>,

    #[validate(length(max = 255))]
    pub phone_number: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// API Endpoint `GET /users/me/profile`
///
/// Returns the caller's own profile, 404 when none was created yet.
#[get("/users/me/profile")]
pub async fn get_my_profile(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> DefaultApiResult<ProfileResource> {
    let profile_resource = crate::block(move || -> Result<ProfileResource, ApiError> {
        let mut conn = db.get_conn()?;

        let profile = Profile::get_for_user(&mut conn, current_user.id)?
            .ok_or_else(ApiError::not_found)?;

        Ok(ProfileResource::from_db(profile))
    })
    .await??;

    Ok(ApiResponse::new(profile_resource))
}

/// API Endpoint `POST /users/me/profile`
///
/// Creates the caller's profile. At most one profile exists per user, a
/// second create is answered with a conflict and leaves the existing
/// profile untouched.
#[post("/users/me/profile")]
pub async fn new_profile(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<PostProfileBody>,
) -> DefaultApiResult<ProfileResource> {
    let body = body.into_inner();

    body.validate()?;

    let profile_resource = crate::block(move || -> Result<ProfileResource, ApiError> {
        let mut conn = db.get_conn()?;

        let profile = NewProfile {
            user_id: current_user.id,
            bio: body.bio,
            phone_number: body.phone_number,
            address: body.address,
        }
        .try_insert(&mut conn)?
        .ok_or_else(|| {
            ApiError::conflict()
                .with_code("profile_exists")
                .with_message("A profile already exists for this user")
        })?;

        Ok(ProfileResource::from_db(profile))
    })
    .await??;

    Ok(ApiResponse::created(profile_resource))
}

/// API Endpoint `GET /profiles/{profile_id}`
///
/// Returns the specified profile. Used for the public profile views, so no
/// ownership check applies here.
#[get("/profiles/{profile_id}")]
pub async fn get_profile(
    db: Data<Db>,
    profile_id: Path<ProfileId>,
) -> DefaultApiResult<ProfileResource> {
    let profile_id = profile_id.into_inner();

    let profile_resource = crate::block(move || -> Result<ProfileResource, ApiError> {
        let mut conn = db.get_conn()?;

        let profile = Profile::get(&mut conn, profile_id)?;

        Ok(ProfileResource::from_db(profile))
    })
    .await??;

    Ok(ApiResponse::new(profile_resource))
}

/// Body of the `PATCH /profiles/{profile_id}` endpoint
///
/// All fields are nullable; an explicit `null` clears the value while an
/// absent field leaves it unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct PatchProfileBody {
    #[validate(length(max = 4096))]
    #[serde(default, deserialize_with = "deserialize_some")]
    pub bio: Option<Option<String>>,

    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "deserialize_some")]
    pub phone_number: Option<Option<String>>,

    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "deserialize_some")]
    pub address: Option<Option<String>>,
}

impl PatchProfileBody {
    fn is_empty(&self) -> bool {
        let PatchProfileBody {
            bio,
            phone_number,
            address,
        } = self;

        bio.is_none() && phone_number.is_none() && address.is_none()
    }
}

/// API Endpoint `PATCH /profiles/{profile_id}`
///
/// Applies the supplied fields to the profile. Only the owner may modify a
/// profile; an absent profile and a foreign profile are answered with the
/// same 403.
#[patch("/profiles/{profile_id}")]
pub async fn patch_profile(
    db: Data<Db>,
    current_user: ReqData<User>,
    profile_id: Path<ProfileId>,
    patch: Json<PatchProfileBody>,
) -> Result<Either<ApiResponse<ProfileResource>, NoContent>, ApiError> {
    let patch = patch.into_inner();

    if patch.is_empty() {
        return Ok(Either::Right(NoContent));
    }

    patch.validate()?;

    let profile_id = profile_id.into_inner();

    let profile_resource = crate::block(move || -> Result<ProfileResource, ApiError> {
        let mut conn = db.get_conn()?;

        let profile = UpdateProfile {
            bio: patch.bio,
            phone_number: patch.phone_number,
            address: patch.address,
        }
        .apply_owned(&mut conn, current_user.id, profile_id)
        .map_err(ownership_gate)?;

        Ok(ProfileResource::from_db(profile))
    })
    .await??;

    Ok(Either::Left(ApiResponse::new(profile_resource)))
}

/// API Endpoint `DELETE /profiles/{profile_id}`
///
/// Deletes the profile, with the same 403 policy as the patch endpoint.
#[delete("/profiles/{profile_id}")]
pub async fn delete_profile(
    db: Data<Db>,
    current_user: ReqData<User>,
    profile_id: Path<ProfileId>,
) -> Result<NoContent, ApiError> {
    let profile_id = profile_id.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        Profile::delete_owned(&mut conn, current_user.id, profile_id).map_err(ownership_gate)?;

        Ok(())
    })
    .await??;

    Ok(NoContent)
}

/// API Endpoint `PUT /users/me/profile/avatar`
///
/// Uploads a new avatar image for the caller's profile. The blob goes to
/// the object storage, the profile row only stores the resulting URL.
/// Answers 404 when the caller has not created a profile yet.
#[put("/users/me/profile/avatar")]
pub async fn put_avatar(
    db: Data<Db>,
    storage: Data<ObjectStorage>,
    current_user: ReqData<User>,
    request: HttpRequest,
    body: Bytes,
) -> DefaultApiResult<ProfileResource> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .ok_or_else(|| {
            ApiError::bad_request()
                .with_code("invalid_content_type")
                .with_message("Avatar uploads require an image content type")
        })?;

    if content_type.type_() != mime::IMAGE {
        return Err(ApiError::bad_request()
            .with_code("invalid_content_type")
            .with_message("Avatar uploads require an image content type"));
    }

    let current_user = current_user.into_inner();
    let user_id = current_user.id;

    // nothing to attach the avatar to without a profile
    {
        let db = db.clone();
        crate::block(move || -> Result<(), ApiError> {
            let mut conn = db.get_conn()?;

            Profile::get_for_user(&mut conn, user_id)?.ok_or_else(ApiError::not_found)?;

            Ok(())
        })
        .await??;
    }

    let key = format!("avatars/{user_id}");
    let url = storage
        .put_avatar(&key, body, content_type.as_ref())
        .await?;

    let profile_resource = crate::block(move || -> Result<ProfileResource, ApiError> {
        let mut conn = db.get_conn()?;

        let profile = Profile::set_avatar_url(&mut conn, user_id, &url)?;

        Ok(ProfileResource::from_db(profile))
    })
    .await??;

    Ok(ApiResponse::new(profile_resource))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn patch_profile_body_distinguishes_null_from_absent() {
        let patch: PatchProfileBody =
            serde_json::from_value(json!({"bio": null, "address": "Somewhere 1"})).unwrap();

        // explicit null clears the field
        assert_eq!(patch.bio, Some(None));
        // absent field stays untouched
        assert_eq!(patch.phone_number, None);
        assert_eq!(patch.address, Some(Some("Somewhere 1".into())));
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_profile_body_empty_detection() {
        let empty: PatchProfileBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }
}

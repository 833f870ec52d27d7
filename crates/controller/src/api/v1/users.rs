// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! User related API structs and endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the database crate [`db_storage`] for database operations.
//!
//! Users themselves are created by the external identity subsystem; these
//! endpoints only read them and let the caller edit their own name/email.

use crate::api::v1::response::{ApiError, ApiResponse, NoContent};
use crate::api::v1::DefaultApiResult;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{get, patch, Either};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::users::{UpdateUser, User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public user details
///
/// Contains general "public" information about a user. Is accessible to all
/// other users.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserProfile {
    pub id: UserId,
    pub display_name: String,
}

impl PublicUserProfile {
    pub fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
        }
    }
}

/// Private user profile
///
/// Similar to [`PublicUserProfile`], but contains additional "private"
/// information about a user. Is only accessible to the user himself.
/// Is used on the */users/me* endpoints.
#[derive(Debug, Serialize)]
pub struct PrivateUserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl PrivateUserProfile {
    pub fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

/// Body of the `PATCH /users/me` endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct PatchMeBody {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
}

impl PatchMeBody {
    fn is_empty(&self) -> bool {
        let PatchMeBody {
            email,
            display_name,
        } = self;

        email.is_none() && display_name.is_none()
    }
}

/// API Endpoint `GET /users/me`
///
/// Returns the caller's own profile.
#[get("/users/me")]
pub async fn get_me(current_user: ReqData<User>) -> DefaultApiResult<PrivateUserProfile> {
    let user_profile = PrivateUserProfile::from_db(current_user.into_inner());

    Ok(ApiResponse::new(user_profile))
}

/// API Endpoint `PATCH /users/me`
///
/// Edits the caller's own name/email.
#[patch("/users/me")]
pub async fn patch_me(
    db: Data<Db>,
    current_user: ReqData<User>,
    patch: Json<PatchMeBody>,
) -> Result<Either<ApiResponse<PrivateUserProfile>, NoContent>, ApiError> {
    let patch = patch.into_inner();

    if patch.is_empty() {
        return Ok(Either::Right(NoContent));
    }

    patch.validate()?;

    let user_profile = crate::block(move || -> Result<PrivateUserProfile, ApiError> {
        let mut conn = db.get_conn()?;

        let user = UpdateUser {
            email: patch.email,
            display_name: patch.display_name,
        }
        .apply(&mut conn, current_user.id)
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::conflict()
                    .with_code("email_in_use")
                    .with_message("The email address is already in use")
            } else {
                e.into()
            }
        })?;

        Ok(PrivateUserProfile::from_db(user))
    })
    .await??;

    Ok(Either::Left(ApiResponse::new(user_profile)))
}

/// API Endpoint `GET /users/{user_id}`
///
/// Returns the public profile of the specified user.
#[get("/users/{user_id}")]
pub async fn get_user(db: Data<Db>, user_id: Path<UserId>) -> DefaultApiResult<PublicUserProfile> {
    let user_id = user_id.into_inner();

    let user_profile = crate::block(move || -> Result<PublicUserProfile, ApiError> {
        let mut conn = db.get_conn()?;

        let user = User::get(&mut conn, user_id)?;

        Ok(PublicUserProfile::from_db(user))
    })
    .await??;

    Ok(ApiResponse::new(user_profile))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_me_body_empty_detection() {
        let empty: PatchMeBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());

        let patch: PatchMeBody =
            serde_json::from_value(json!({"display_name": "Gerhard"})).unwrap();
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_me_body_rejects_invalid_email() {
        let patch: PatchMeBody = serde_json::from_value(json!({"email": "nope"})).unwrap();
        assert!(patch.validate().is_err());
    }
}

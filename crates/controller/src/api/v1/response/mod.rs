// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Response types for REST APIv1
//!
//! These all implement the [`Responder`](actix_web::Responder) trait.

use actix_web::body::BoxBody;
use actix_web::{HttpResponse, Responder};

pub mod error;
mod ok;

pub use error::ApiError;
pub use ok::ApiResponse;

/// The default API Result
pub type DefaultApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Represents a 204 No Content HTTP Response
pub struct NoContent;

impl Responder for NoContent {
    type Body = BoxBody;

    fn respond_to(self, _: &actix_web::HttpRequest) -> HttpResponse {
        HttpResponse::NoContent().finish()
    }
}

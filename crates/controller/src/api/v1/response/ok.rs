// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Success response types for REST APIv1
//!
//! These all implement the [`Responder`] trait.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder};
use serde::Serialize;

/// A JSON success response with a configurable status code
#[derive(Debug)]
pub struct ApiResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a new 200 OK response with the given data
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a new 201 Created response with the given data
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, _: &actix_web::HttpRequest) -> HttpResponse {
        let mut response = HttpResponse::build(self.status);

        response.json(&self.data)
    }
}

// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator endpoint schemas and reply validation.
//!
//! Backends hand raw [`HttpReply`] values to the page; everything here turns
//! them into typed results so that a payload that does not match its schema
//! surfaces as [`ApiError::Malformed`] rather than a generic failure.
//!
//! | endpoint                  | success             | failure                   |
//! |---------------------------|---------------------|---------------------------|
//! | `GET /api/movies`         | array of records    | status                    |
//! | `POST /api/upload`        | `{"title": …}`      | `{"error": …}` or any body|
//! | `DELETE /api/movies/{id}` | `{"message": …}`    | `{"error": …}`            |

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::movie::{MovieId, MovieRecord};

/// A completed HTTP exchange: status code and body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// Creates a reply.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A confirmed delete travelling to the backend and back.
///
/// The backend echoes it in [`Input::DeleteFinished`](crate::page::Input) so
/// the page can name the movie in its notice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    /// Movie to delete.
    pub id: MovieId,
    /// Title shown in the notice.
    pub title: String,
}

#[derive(Deserialize)]
struct UploadAccepted {
    title: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct DeleteBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Validates a movie listing reply.
///
/// # Errors
///
/// [`ApiError::Status`] for a non-2xx reply, [`ApiError::Malformed`] when the
/// body is not an array of valid records.
pub fn parse_movie_list(reply: &HttpReply) -> Result<Vec<MovieRecord>, ApiError> {
    if !reply.is_success() {
        return Err(failure_from(reply));
    }
    serde_json::from_str(&reply.body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Validates an upload reply, returning the stored title.
///
/// # Errors
///
/// [`ApiError::Server`] when a failure reply carries an `error` field,
/// [`ApiError::Status`] for any other reply but a `200`, and
/// [`ApiError::Malformed`] for a `200` without a `title`.
pub fn parse_upload_reply(reply: &HttpReply) -> Result<String, ApiError> {
    if reply.status == 200 {
        serde_json::from_str::<UploadAccepted>(&reply.body)
            .map(|accepted| accepted.title)
            .map_err(|e| ApiError::Malformed(e.to_string()))
    } else {
        Err(failure_from(reply))
    }
}

/// Validates a delete reply, returning the server's confirmation message.
///
/// The status is not consulted when the body is readable: the payload shape
/// alone decides success.
///
/// # Errors
///
/// [`ApiError::Server`] for an `error` payload, [`ApiError::Status`] for an
/// unreadable failure reply, and [`ApiError::Malformed`] otherwise.
pub fn parse_delete_reply(reply: &HttpReply) -> Result<String, ApiError> {
    match serde_json::from_str::<DeleteBody>(&reply.body) {
        Ok(DeleteBody {
            message: Some(message),
            ..
        }) => Ok(message),
        Ok(DeleteBody {
            error: Some(error), ..
        }) => Err(ApiError::Server(error)),
        Ok(_) => Err(ApiError::Malformed(
            "reply has neither `message` nor `error`".into(),
        )),
        Err(_) if !reply.is_success() => Err(ApiError::Status(reply.status)),
        Err(e) => Err(ApiError::Malformed(e.to_string())),
    }
}

fn failure_from(reply: &HttpReply) -> ApiError {
    match serde_json::from_str::<ErrorBody>(&reply.body) {
        Ok(body) => ApiError::Server(body.error),
        Err(_) => ApiError::Status(reply.status),
    }
}

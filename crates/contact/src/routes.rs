// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface: `POST /api/contact`.

use crate::error::ContactError;
use crate::models::Submission;
use crate::pipeline::{Outcome, Pipeline};
use crate::response::Reply;
use bytes::Bytes;
use diagnostics::*;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply as _};

/// Largest accepted request body.
pub const BODY_LIMIT: u64 = 64 * 1024;

/// The contact endpoint alone, without rejection handling.
///
/// The body must carry a `Content-Length` header no larger than
/// [`BODY_LIMIT`]. Chunked uploads without one are refused with 411.
pub fn contact(
    pipeline: Pipeline,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path!("api" / "contact")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::bytes())
        .and(with_pipeline(pipeline))
        .then(handle_contact)
}

/// Every route the service exposes, with rejections turned into replies.
///
/// Transport-level refusals: 404 for unknown paths, 405 for other methods,
/// 411 when `Content-Length` is missing and 413 above [`BODY_LIMIT`].
pub fn routes(
    pipeline: Pipeline,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    contact(pipeline).recover(handle_rejection)
}

fn with_pipeline(
    pipeline: Pipeline,
) -> impl Filter<Extract = (Pipeline,), Error = Infallible> + Clone {
    warp::any().map(move || pipeline.clone())
}

async fn handle_contact(body: Bytes, pipeline: Pipeline) -> Response {
    let posture = pipeline.config().posture;

    let submission = match Submission::from_json(&body) {
        Ok(submission) => submission,
        Err(e) => {
            let detail = e.to_string();
            warn!("Contact request body rejected: {detail}");
            return Reply::from_error(&e, posture).into_response();
        }
    };

    // A panic inside the pipeline becomes a generic server error instead
    // of a dropped connection.
    let outcome = match tokio::spawn(async move { pipeline.submit(&submission).await }).await {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let detail = join_error.to_string();
            error!("Contact submission task failed: {detail}");
            Outcome::Rejected(ContactError::Internal(detail))
        }
    };

    Reply::from_outcome(&outcome, posture).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "length_required")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
    } else {
        let detail = format!("{err:?}");
        error!("Unhandled rejection: {detail}");
        (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
    };
    Ok(warp::reply::with_status(body, status).into_response())
}

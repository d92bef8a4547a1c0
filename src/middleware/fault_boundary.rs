//! Fault boundary
//!
//! Converts a panic raised while handling a request into a JSON 500 so a
//! single faulty request cannot take the server down.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

/// Handler signature expected by [`CatchPanicLayer::custom`]
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Body returned for a caught fault
#[derive(Debug, Serialize)]
pub struct FaultResponse {
    pub error: &'static str,
    pub message: String,
}

/// Build the layer wrapping the whole router
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Extract a readable description from a panic payload
pub fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());

    error!(error = %message, "Unhandled fault while processing request");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FaultResponse {
            error: "internal server error",
            message,
        }),
    )
        .into_response()
}

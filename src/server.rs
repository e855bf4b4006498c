// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! REST API over the receipt processor.
//!
//! ## Endpoints
//!
//! - `POST /receipts/process` - Submit a receipt, returns `{"id", "points"}`
//! - `GET /receipts/{id}/points` - Points for a stored receipt, returns `{"points"}`
//!
//! ## Example Usage
//!
//! ```bash
//! curl -X POST http://localhost:8080/receipts/process \
//!   -H "Content-Type: application/json" \
//!   -d '{"retailer": "Target", "purchaseDate": "2022-01-02", "purchaseTime": "13:13",
//!        "total": "1.25", "items": [{"shortDescription": "Pepsi - 12-oz", "price": "1.25"}]}'
//!
//! curl http://localhost:8080/receipts/7fb1377b-b223-49d9-a31a-5a02701dd310/points
//! ```

use crate::base::ReceiptId;
use crate::error::ReceiptError;
use crate::processor::ReceiptProcessor;
use crate::receipt::{Receipt, Submission};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

// === Response DTOs ===

/// Response body for point queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u128,
}

/// Response body for errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the receipt processor.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ReceiptProcessor>,
}

// === Error Handling ===

/// Wrapper for converting `ReceiptError` into HTTP responses.
pub struct AppError(ReceiptError);

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ReceiptError::MalformedInput(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ReceiptError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "MALFORMED_INPUT"),
            ReceiptError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ReceiptError::NotFound => (StatusCode::NOT_FOUND, "RECEIPT_NOT_FOUND"),
            ReceiptError::IdentifierConflict(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IDENTIFIER_CONFLICT")
            }
            ReceiptError::InvariantViolation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /receipts/process - Submit a receipt for scoring.
async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Result<Json<Submission>, AppError> {
    let Json(receipt) = payload?;
    let submission = state.processor.submit(receipt)?;
    Ok(Json(submission))
}

/// GET /receipts/{id}/points - Points for a stored receipt.
///
/// An id that is not a well-formed identifier cannot have been issued, so it
/// is reported as not found.
async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, AppError> {
    let id: ReceiptId = id.parse().map_err(|_| ReceiptError::NotFound)?;
    let points = state.processor.points_for(&id)?;
    Ok(Json(PointsResponse { points }))
}

// === Router ===

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/{id}/points", get(get_points))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `listener` until Ctrl-C.
///
/// The processor, and with it every stored receipt, is dropped on return.
pub async fn serve(listener: TcpListener, processor: Arc<ReceiptProcessor>) -> std::io::Result<()> {
    let app = create_router(AppState { processor });

    info!(addr = %listener.local_addr()?, "receipt processor listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("receipt processor stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

//! HTTP handlers for booking endpoints.
//!
//! These handlers connect axum routes to application layer command/query
//! handlers and to the webhook processor.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::SecretString;
use serde_json::json;
use tracing::{error, warn};

use crate::application::handlers::booking::{
    CancelBookingCommand, CancelBookingHandler, CreateBookingCommand, CreateBookingHandler,
    GetBookingHandler, GetBookingQuery,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{BookingId, UserId};
use crate::domain::payment::{CurrencyCode, WebhookError, WebhookProcessor};
use crate::ports::{BookingRepository, PaymentProcessorClient};

use super::dto::{BookingResponse, CreateBookingRequest, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct BookingAppState {
    pub booking_repository: Arc<dyn BookingRepository>,
    pub payment_processor: Arc<dyn PaymentProcessorClient>,
    pub default_currency: CurrencyCode,
    pub webhook_secret: Option<SecretString>,
}

impl BookingAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_booking_handler(&self) -> CreateBookingHandler {
        CreateBookingHandler::new(
            self.booking_repository.clone(),
            self.payment_processor.clone(),
            self.default_currency.clone(),
        )
    }

    pub fn get_booking_handler(&self) -> GetBookingHandler {
        GetBookingHandler::new(self.booking_repository.clone())
    }

    pub fn cancel_booking_handler(&self) -> CancelBookingHandler {
        CancelBookingHandler::new(self.booking_repository.clone())
    }

    pub fn webhook_processor(&self) -> WebhookProcessor {
        WebhookProcessor::new(
            self.booking_repository.clone(),
            self.payment_processor.clone(),
            self.webhook_secret.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from the request.
///
/// In production this would come from JWT/session middleware. For now an
/// X-User-Id header stands in for development and testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Booking Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings - Create a booking, optionally claiming a payment
pub async fn create_booking(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.create_booking_handler();
    let cmd = CreateBookingCommand {
        user_id: user.user_id,
        subject: request.subject,
        total_price: request.total_price,
        currency: request.currency,
        payment_reference: request.payment_reference,
    };

    let booking = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// GET /api/bookings/:id - Fetch one of the caller's bookings
pub async fn get_booking(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let booking_id: BookingId = id.parse().map_err(|_| BookingError::NotFound)?;

    let handler = state.get_booking_handler();
    let booking = handler
        .handle(GetBookingQuery {
            booking_id,
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// POST /api/bookings/:id/cancel - Cancel one of the caller's bookings
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let booking_id: BookingId = id.parse().map_err(|_| BookingError::NotFound)?;

    let handler = state.cancel_booking_handler();
    let booking = handler
        .handle(CancelBookingCommand {
            booking_id,
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/psp - Handle signed payment processor events
pub async fn handle_psp_webhook(
    State(state): State<BookingAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers.get("Stripe-Signature").and_then(|v| v.to_str().ok());

    let processor = state.webhook_processor();
    processor.handle(&body, signature).await?;

    // Every handled outcome acks the same way; the processor only needs
    // to know whether to retry.
    Ok(Json(json!({ "received": true })))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts booking errors to HTTP responses.
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

fn error_code(err: &BookingError) -> &'static str {
    match err {
        BookingError::InvalidCurrency(_) => "INVALID_CURRENCY",
        BookingError::DuplicatePaymentReference(_) => "DUPLICATE_PAYMENT_REFERENCE",
        BookingError::ProcessorUnavailable(_) => "PROCESSOR_UNAVAILABLE",
        BookingError::PaymentOwnershipMismatch => "PAYMENT_OWNERSHIP_MISMATCH",
        BookingError::PaymentNotCompleted(_) => "PAYMENT_NOT_COMPLETED",
        BookingError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
        BookingError::IllegalStateTransition(_) => "ILLEGAL_STATE_TRANSITION",
        BookingError::Validation { .. } => "VALIDATION_FAILED",
        BookingError::NotFound => "BOOKING_NOT_FOUND",
        BookingError::Storage(_) => "INTERNAL_ERROR",
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "booking request failed");
        } else if matches!(self.0, BookingError::ProcessorUnavailable(_)) {
            // Client sees "try again"; the transport detail goes to the logs.
            warn!(error = %self.0, "payment processor lookup failed");
        }
        let body = ErrorResponse::new(error_code(&self.0), self.0.user_message());
        (status, Json(body)).into_response()
    }
}

/// API error type for the webhook endpoint.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "webhook delivery failed");
        }
        let body = ErrorResponse::new("WEBHOOK_REJECTED", self.0.to_string());
        (status, Json(body)).into_response()
    }
}

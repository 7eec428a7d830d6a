//! Bookings API
//!
//! REST endpoints for the booking lifecycle. Owner endpoints operate on the
//! caller's own bookings; the `/admin` endpoints are the cross-owner surface
//! and require the ADMIN role (enforced by the engine, not the router).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::booking::entity::Booking;
use crate::booking::service::{BookingDraft, BookingService};
use crate::shared::api_common::{PaginationParams, SuccessResponse};
use crate::shared::error::TravelFlowError;
use crate::shared::middleware::Authenticated;

/// Create/update booking request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Name of the booked service
    pub service_name: String,

    /// Service category (HOTEL, FLIGHT, TOUR, ...)
    pub service_type: String,

    /// Description
    pub description: Option<String>,

    /// Total price, must be greater than zero
    pub price: f64,

    /// When the booked service takes place (RFC 3339)
    pub service_date: Option<DateTime<Utc>>,
}

impl BookingRequest {
    fn into_draft(self) -> BookingDraft {
        BookingDraft {
            service_name: self.service_name,
            service_type: self.service_type,
            description: self.description,
            price: self.price,
            service_date: self.service_date,
        }
    }
}

/// Booking response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub service_name: String,
    pub service_type: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: String,
    pub service_date: Option<String>,
    pub user_name: String,
    pub user_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            service_name: b.service_name,
            service_type: b.service_type,
            description: b.description,
            price: b.price,
            status: b.status.as_str().to_string(),
            service_date: b.service_date.map(|d| d.to_rfc3339()),
            user_name: b.owner_name,
            user_email: b.owner_email,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the owner listing
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// "all" or a status name, case-insensitive; unknown values list all
    #[serde(default = "default_status_filter")]
    pub status: String,
}

fn default_status_filter() -> String {
    "all".to_string()
}

/// Query parameters for the admin listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Query parameter for the admin status override
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatusParam {
    /// Target status name, case-insensitive
    pub status: String,
}

/// Bookings service state
#[derive(Clone)]
pub struct BookingsState {
    pub booking_service: Arc<BookingService>,
}

/// Create a booking
///
/// The new booking is owned by the caller and starts in PENDING.
#[utoipa::path(
    post,
    path = "",
    tag = "bookings",
    operation_id = "postBooking",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid booking data"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_booking(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, TravelFlowError> {
    let booking = state
        .booking_service
        .create_booking(req.into_draft(), &auth)
        .await?;
    Ok(Json(booking.into()))
}

/// List the caller's bookings
#[utoipa::path(
    get,
    path = "",
    tag = "bookings",
    operation_id = "getBookings",
    params(StatusQuery),
    responses(
        (status = 200, description = "Bookings newest-first", body = [BookingResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<BookingResponse>>, TravelFlowError> {
    let bookings = state
        .booking_service
        .list_bookings(&auth, &query.status)
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Get one booking
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "bookings",
    operation_id = "getBooking",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "The booking", body = BookingResponse),
        (status = 403, description = "Owned by someone else"),
        (status = 404, description = "No such booking")
    )
)]
pub async fn get_booking(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, TravelFlowError> {
    let booking = state.booking_service.get_booking(&id, &auth).await?;
    Ok(Json(booking.into()))
}

/// Update a booking
///
/// Replaces the caller-editable fields; status is never changed here.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "bookings",
    operation_id = "putBooking",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 400, description = "Invalid booking data"),
        (status = 403, description = "Owned by someone else"),
        (status = 404, description = "No such booking")
    )
)]
pub async fn update_booking(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, TravelFlowError> {
    let booking = state
        .booking_service
        .update_booking(&id, req.into_draft(), &auth)
        .await?;
    Ok(Json(booking.into()))
}

/// Delete a booking
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "bookings",
    operation_id = "deleteBooking",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = SuccessResponse),
        (status = 403, description = "Owned by someone else"),
        (status = 404, description = "No such booking")
    )
)]
pub async fn delete_booking(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, TravelFlowError> {
    state.booking_service.delete_booking(&id, &auth).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Cancel a booking
///
/// Moves the booking to CANCELLED from any status; repeat calls succeed.
#[utoipa::path(
    put,
    path = "/{id}/cancel",
    tag = "bookings",
    operation_id = "putBookingCancel",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Cancelled booking", body = BookingResponse),
        (status = 403, description = "Owned by someone else"),
        (status = 404, description = "No such booking")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, TravelFlowError> {
    let booking = state.booking_service.cancel_booking(&id, &auth).await?;
    Ok(Json(booking.into()))
}

/// List all bookings (admin)
#[utoipa::path(
    get,
    path = "/admin/all",
    tag = "bookings",
    operation_id = "getAdminBookings",
    params(AdminListQuery),
    responses(
        (status = 200, description = "One page of all bookings, newest-first", body = [BookingResponse]),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn list_all_bookings(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<Vec<BookingResponse>>, TravelFlowError> {
    let bookings = state
        .booking_service
        .list_all_bookings(&auth, query.pagination.page(), query.pagination.size())
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Set a booking's status (admin)
#[utoipa::path(
    put,
    path = "/admin/{id}/status",
    tag = "bookings",
    operation_id = "putAdminBookingStatus",
    params(
        ("id" = String, Path, description = "Booking ID"),
        StatusParam
    ),
    responses(
        (status = 200, description = "Booking with the new status", body = BookingResponse),
        (status = 400, description = "Unknown status name"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "No such booking")
    )
)]
pub async fn set_booking_status(
    State(state): State<BookingsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Query(query): Query<StatusParam>,
) -> Result<Json<BookingResponse>, TravelFlowError> {
    let booking = state
        .booking_service
        .set_booking_status(&auth, &id, &query.status)
        .await?;
    Ok(Json(booking.into()))
}

/// Create the bookings router
pub fn bookings_router(state: BookingsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_booking, list_bookings))
        .routes(routes!(get_booking, update_booking, delete_booking))
        .routes(routes!(cancel_booking))
        .routes(routes!(list_all_bookings))
        .routes(routes!(set_booking_status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::entity::{Booking, BookingStatus};

    #[test]
    fn test_booking_request_deserialization() {
        let json = r#"{
            "serviceName": "Hilton Paris",
            "serviceType": "HOTEL",
            "price": 450.0,
            "serviceDate": "2026-09-15T14:00:00Z"
        }"#;
        let req: BookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.service_name, "Hilton Paris");
        assert_eq!(req.service_type, "HOTEL");
        assert!(req.description.is_none());
        assert!(req.service_date.is_some());
    }

    #[test]
    fn test_booking_response_serialization() {
        let mut booking =
            Booking::new("Flight BA117", "FLIGHT", 800.0, "u1", "Alice", "a@example.com")
                .with_description("One way");
        booking.status = BookingStatus::Confirmed;

        let response = BookingResponse::from(booking);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"CONFIRMED""#));
        assert!(json.contains(r#""userName":"Alice""#));
        assert!(json.contains(r#""userEmail":"a@example.com""#));
        assert!(json.contains(r#""description":"One way""#));
        assert!(json.contains("serviceName"));
    }

    #[test]
    fn test_status_query_default() {
        let query: StatusQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.status, "all");

        let query: StatusQuery = serde_json::from_str(r#"{"status":"CANCELLED"}"#).unwrap();
        assert_eq!(query.status, "CANCELLED");
    }
}

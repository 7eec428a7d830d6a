//! Booking Lifecycle Engine
//!
//! Every operation takes the calling `Principal` explicitly and enforces the
//! access rules itself; handlers never touch the store directly. Owner-path
//! operations require strict owner equality, so an administrator reaching a
//! booking they do not own is rejected the same as any other non-owner. The
//! admin paths are the only cross-owner surface.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::auth::principal::Principal;
use crate::booking::entity::{Booking, BookingStatus};
use crate::booking::repository::BookingStore;
use crate::shared::error::{Result, TravelFlowError};
use crate::user::repository::UserStore;

/// Caller-supplied booking fields, used for both create and update.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub service_name: String,
    pub service_type: String,
    pub description: Option<String>,
    pub price: f64,
    pub service_date: Option<DateTime<Utc>>,
}

pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    users: Arc<dyn UserStore>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingStore>, users: Arc<dyn UserStore>) -> Self {
        Self { bookings, users }
    }

    fn validate_draft(draft: &BookingDraft) -> Result<()> {
        if draft.service_name.trim().is_empty() {
            return Err(TravelFlowError::validation("Service name must not be blank"));
        }
        if draft.service_type.trim().is_empty() {
            return Err(TravelFlowError::validation("Service type must not be blank"));
        }
        if draft.price <= 0.0 {
            return Err(TravelFlowError::validation("Price must be greater than zero"));
        }
        Ok(())
    }

    fn require_admin(principal: &Principal) -> Result<()> {
        if !principal.is_admin() {
            return Err(TravelFlowError::unauthorized(
                "Administrator access required",
            ));
        }
        Ok(())
    }

    /// Load a booking and verify the caller owns it. Absence is `NotFound`;
    /// a booking owned by someone else is `Unauthorized`.
    async fn load_owned(&self, id: &str, principal: &Principal) -> Result<Booking> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| TravelFlowError::not_found(id))?;

        if !booking.is_owned_by(&principal.user_id) {
            return Err(TravelFlowError::unauthorized(
                "Unauthorized access to booking",
            ));
        }

        Ok(booking)
    }

    /// Create a booking owned by the caller. New bookings always start in
    /// PENDING regardless of the draft.
    pub async fn create_booking(
        &self,
        draft: BookingDraft,
        principal: &Principal,
    ) -> Result<Booking> {
        Self::validate_draft(&draft)?;

        // The owner account must still exist even though the principal was
        // just resolved; its name and email are denormalized onto the
        // booking from the stored record.
        let owner = self
            .users
            .find_by_id(&principal.user_id)
            .await?
            .ok_or_else(|| TravelFlowError::user_not_found(&principal.user_id))?;

        let mut booking = Booking::new(
            draft.service_name,
            draft.service_type,
            draft.price,
            &owner.id,
            &owner.name,
            &owner.email,
        );
        booking.description = draft.description;
        booking.service_date = draft.service_date;

        self.bookings.insert(&booking).await?;
        info!(booking_id = %booking.id, owner_id = %owner.id, "Booking created");

        Ok(booking)
    }

    /// Fetch a single booking the caller owns.
    pub async fn get_booking(&self, id: &str, principal: &Principal) -> Result<Booking> {
        self.load_owned(id, principal).await
    }

    /// List the caller's bookings, optionally filtered by status.
    ///
    /// The filter is "all" or a case-insensitive status name. Anything
    /// unrecognized falls back to the unfiltered listing rather than
    /// erroring, so clients can pass the filter straight through.
    pub async fn list_bookings(
        &self,
        principal: &Principal,
        status_filter: &str,
    ) -> Result<Vec<Booking>> {
        if status_filter.eq_ignore_ascii_case("all") {
            return self.bookings.find_by_owner(&principal.user_id).await;
        }

        match BookingStatus::parse(status_filter) {
            Some(status) => {
                self.bookings
                    .find_by_owner_and_status(&principal.user_id, status)
                    .await
            }
            None => self.bookings.find_by_owner(&principal.user_id).await,
        }
    }

    /// Replace the caller-editable fields of a booking.
    ///
    /// Status is never touched here; it only moves through cancel and the
    /// admin status endpoint.
    pub async fn update_booking(
        &self,
        id: &str,
        draft: BookingDraft,
        principal: &Principal,
    ) -> Result<Booking> {
        Self::validate_draft(&draft)?;

        let mut booking = self.load_owned(id, principal).await?;
        booking.service_name = draft.service_name;
        booking.service_type = draft.service_type;
        booking.description = draft.description;
        booking.price = draft.price;
        booking.service_date = draft.service_date;
        booking.updated_at = Utc::now();

        self.bookings.update(&booking).await?;
        Ok(booking)
    }

    /// Move a booking to CANCELLED, from any status. Cancelling an already
    /// cancelled booking succeeds and leaves it cancelled.
    pub async fn cancel_booking(&self, id: &str, principal: &Principal) -> Result<Booking> {
        let mut booking = self.load_owned(id, principal).await?;
        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();

        self.bookings.update(&booking).await?;
        info!(booking_id = %booking.id, "Booking cancelled");

        Ok(booking)
    }

    /// Permanently remove a booking the caller owns.
    pub async fn delete_booking(&self, id: &str, principal: &Principal) -> Result<()> {
        let booking = self.load_owned(id, principal).await?;
        self.bookings.delete(&booking.id).await?;
        info!(booking_id = %booking.id, "Booking deleted");
        Ok(())
    }

    /// Admin: one page of all bookings across every owner, newest-first.
    pub async fn list_all_bookings(
        &self,
        principal: &Principal,
        page: u32,
        size: u32,
    ) -> Result<Vec<Booking>> {
        Self::require_admin(principal)?;
        self.bookings.find_all_paged(page, size).await
    }

    /// Admin: force a booking into any status, bypassing ownership.
    pub async fn set_booking_status(
        &self,
        principal: &Principal,
        id: &str,
        status: &str,
    ) -> Result<Booking> {
        Self::require_admin(principal)?;

        let parsed = BookingStatus::parse(status)
            .ok_or_else(|| TravelFlowError::invalid_status(status))?;

        let mut booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| TravelFlowError::not_found(id))?;
        booking.status = parsed;
        booking.updated_at = Utc::now();

        self.bookings.update(&booking).await?;
        info!(booking_id = %booking.id, status = parsed.as_str(), "Booking status overridden");

        Ok(booking)
    }
}

//! Booking Entity

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl BookingStatus {
    /// Case-insensitive parse of the wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// A booked travel service owned by a single user.
///
/// Owner name and email are denormalized at creation time so listings never
/// need a join back to the users collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,

    /// Name of the booked service (hotel, flight number, tour)
    pub service_name: String,

    /// Service category (HOTEL, FLIGHT, TOUR, ...) kept as free text
    pub service_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Total price for the booking
    pub price: f64,

    #[serde(default)]
    pub status: BookingStatus,

    /// When the booked service takes place
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_chrono_datetime"
    )]
    pub service_date: Option<DateTime<Utc>>,

    /// Owning user
    pub owner_id: String,
    pub owner_name: String,
    pub owner_email: String,

    /// Audit fields
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// `chrono_datetime_as_bson_datetime` for an optional field.
mod optional_chrono_datetime {
    use bson::DateTime as BsonDateTime;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(BsonDateTime::from_chrono)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<BsonDateTime>::deserialize(deserializer)?;
        Ok(value.map(BsonDateTime::to_chrono))
    }
}

impl Booking {
    pub fn new(
        service_name: impl Into<String>,
        service_type: impl Into<String>,
        price: f64,
        owner_id: impl Into<String>,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            service_name: service_name.into(),
            service_type: service_type.into(),
            description: None,
            price,
            status: BookingStatus::Pending,
            service_date: None,
            owner_id: owner_id.into(),
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_service_date(mut self, service_date: DateTime<Utc>) -> Self {
        self.service_date = Some(service_date);
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_booking_defaults() {
        let booking = Booking::new("Hilton Paris", "HOTEL", 450.0, "u1", "Alice", "a@example.com");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.description.is_none());
        assert!(booking.service_date.is_none());
        assert!(booking.is_owned_by("u1"));
        assert!(!booking.is_owned_by("u2"));
    }

    #[test]
    fn builder_sets_optional_fields() {
        let date = chrono::Utc::now() + chrono::Duration::days(30);
        let booking = Booking::new("Flight BA117", "FLIGHT", 800.0, "u1", "Bob", "b@example.com")
            .with_description("Window seat")
            .with_service_date(date);

        assert_eq!(booking.description.as_deref(), Some("Window seat"));
        assert_eq!(booking.service_date, Some(date));

        let json = serde_json::to_string(&booking).unwrap();
        assert!(json.contains("serviceDate"));
        assert!(json.contains("Window seat"));
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(BookingStatus::parse("confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("COMPLETED"), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse("Cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("shipped"), None);
        assert_eq!(BookingStatus::parse(""), None);
    }
}

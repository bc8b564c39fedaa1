//! Booking document types.
//!
//! Bookings are owned by the external marketplace workflow; this backend
//! only ever reads them as the trigger source for chat provisioning.

use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a booking.
///
/// The upstream workflow owns this state machine and may grow it; any
/// status string we do not model deserializes to `Unknown` instead of
/// failing the whole snapshot. Chat provisioning only cares whether a
/// transition lands on `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
    Cancelled,
    Unknown,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Declined => write!(f, "declined"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = std::convert::Infallible;

    /// Never fails: unrecognized statuses map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "pending" => BookingStatus::Pending,
            "accepted" => BookingStatus::Accepted,
            "declined" => BookingStatus::Declined,
            "completed" => BookingStatus::Completed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Unknown,
        })
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(BookingStatus::Unknown))
    }
}

/// A point-in-time snapshot of a booking document.
///
/// Delivered as the before/after pair of a booking update event. The
/// document is externally owned and loosely shaped, so every field is
/// optional; the provisioner validates what it actually needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingSnapshot {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    pub status: Option<BookingStatus>,
    /// Some upstream versions pre-seed a last message on the booking
    /// itself; it becomes the thread's initial summary text.
    pub last_message: Option<String>,
}

impl BookingSnapshot {
    /// Whether this snapshot is in the accepted state.
    ///
    /// A missing or unrecognized status counts as not accepted.
    pub fn is_accepted(&self) -> bool {
        self.status == Some(BookingStatus::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Declined,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let s = status.to_string();
            let parsed: BookingStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn unknown_status_string_deserializes_to_unknown() {
        let status: BookingStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, BookingStatus::Unknown);
    }

    #[test]
    fn status_serde() {
        let json = serde_json::to_string(&BookingStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
        let parsed: BookingStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, BookingStatus::Accepted);
    }

    #[test]
    fn snapshot_deserializes_camel_case() {
        let snapshot: BookingSnapshot = serde_json::from_value(serde_json::json!({
            "clientId": "c1",
            "clientName": "Ana",
            "providerId": "p1",
            "providerName": "Bob",
            "serviceId": "s1",
            "serviceName": "Plumbing",
            "status": "accepted",
        }))
        .unwrap();

        assert_eq!(snapshot.client_id.as_deref(), Some("c1"));
        assert_eq!(snapshot.provider_id.as_deref(), Some("p1"));
        assert!(snapshot.is_accepted());
    }

    #[test]
    fn snapshot_tolerates_sparse_documents() {
        let snapshot: BookingSnapshot =
            serde_json::from_value(serde_json::json!({"status": "pending"})).unwrap();
        assert!(snapshot.client_id.is_none());
        assert!(!snapshot.is_accepted());

        let empty: BookingSnapshot = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.status.is_none());
        assert!(!empty.is_accepted());
    }
}

//! Carrier status strings to [`TrackingStatus`].
//!
//! Shiprocket reports upper-case labels (`PICKUP SCHEDULED`, `OUT FOR DELIVERY`,
//! `RTO DELIVERED`), Delhivery reports title-case ones (`Manifested`, `In Transit`).
//! Both go through [`map_carrier_status`]. Rules are checked in order, so return and
//! failure wording wins over a bare "delivered".

use crate::model::TrackingStatus;

const RULES: &[(&str, TrackingStatus)] = &[
    ("undelivered", TrackingStatus::Failed),
    ("not delivered", TrackingStatus::Failed),
    ("rto", TrackingStatus::Failed),
    ("return", TrackingStatus::Failed),
    ("lost", TrackingStatus::Failed),
    ("damaged", TrackingStatus::Failed),
    ("destroyed", TrackingStatus::Failed),
    ("cancel", TrackingStatus::Failed),
    ("failed", TrackingStatus::Failed),
    ("delivered", TrackingStatus::Delivered),
    ("out for delivery", TrackingStatus::InTransit),
    ("in transit", TrackingStatus::InTransit),
    ("dispatched", TrackingStatus::InTransit),
    ("reached", TrackingStatus::InTransit),
    ("misrouted", TrackingStatus::InTransit),
    ("not picked", TrackingStatus::Pending),
    ("pickup exception", TrackingStatus::Pending),
    ("pickup scheduled", TrackingStatus::Pending),
    ("pickup generated", TrackingStatus::Pending),
    ("picked", TrackingStatus::Picked),
    ("shipped", TrackingStatus::Picked),
];

/// Map a raw carrier status to a [`TrackingStatus`]. Anything unrecognized is `Pending`.
pub fn map_carrier_status(raw: &str) -> TrackingStatus {
    let normalized = normalize(raw);
    RULES
        .iter()
        .find(|(pattern, _)| contains_phrase(&normalized, pattern))
        .map(|(_, status)| *status)
        .unwrap_or(TrackingStatus::Pending)
}

fn normalize(raw: &str) -> String {
    raw.to_ascii_lowercase()
        .replace(['-', '_', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word-prefix match: "cancel" finds "canceled" and "cancelled", "rto" does not find
/// "ortho".
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let padded = format!(" {haystack}");
    padded.contains(&format!(" {phrase}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shiprocket_labels() {
        assert_eq!(map_carrier_status("NEW"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("AWB ASSIGNED"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("PICKUP SCHEDULED"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("PICKED UP"), TrackingStatus::Picked);
        assert_eq!(map_carrier_status("SHIPPED"), TrackingStatus::Picked);
        assert_eq!(map_carrier_status("IN TRANSIT"), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("OUT FOR DELIVERY"), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("DELIVERED"), TrackingStatus::Delivered);
        assert_eq!(map_carrier_status("CANCELED"), TrackingStatus::Failed);
        assert_eq!(map_carrier_status("RTO DELIVERED"), TrackingStatus::Failed);
        assert_eq!(map_carrier_status("UNDELIVERED"), TrackingStatus::Failed);
    }

    #[test]
    fn test_delhivery_labels() {
        assert_eq!(map_carrier_status("Manifested"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("Not Picked"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("In Transit"), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("Dispatched"), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("Delivered"), TrackingStatus::Delivered);
        assert_eq!(map_carrier_status("Lost"), TrackingStatus::Failed);
    }

    #[test]
    fn test_unknown_and_odd_spacing() {
        assert_eq!(map_carrier_status(""), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("Weather delay"), TrackingStatus::Pending);
        assert_eq!(map_carrier_status("  in_transit "), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("out-for-delivery"), TrackingStatus::InTransit);
        assert_eq!(map_carrier_status("Orthopedic"), TrackingStatus::Pending);
    }
}

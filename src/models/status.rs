// src/models/status.rs

//! Availability status of a product page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tri-state availability verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    OutOfStock,
    #[default]
    Unknown,
}

impl Status {
    /// Wire representation, as stored in the subscriptions document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "AVAILABLE",
            Status::OutOfStock => "OUT_OF_STOCK",
            Status::Unknown => "UNKNOWN",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Status::Available)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::OutOfStock).unwrap(),
            "\"OUT_OF_STOCK\""
        );
        let parsed: Status = serde_json::from_str("\"AVAILABLE\"").unwrap();
        assert_eq!(parsed, Status::Available);
        assert!(serde_json::from_str::<Status>("\"MAYBE\"").is_err());
    }

    #[test]
    fn test_display_matches_wire() {
        assert_eq!(Status::Unknown.to_string(), "UNKNOWN");
        assert_eq!(Status::default(), Status::Unknown);
    }
}

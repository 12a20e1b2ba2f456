//! Station identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Key of a destination station in the timetable document.
///
/// Identifiers are short ASCII slugs (`chigasaki`, `tsujido`): lowercase
/// letters, digits, `-` and `_`. This type guarantees that any `StationId`
/// value is valid by construction.
///
/// # Examples
///
/// ```
/// use bus_board::domain::StationId;
///
/// let id = StationId::parse("chigasaki").unwrap();
/// assert_eq!(id.as_str(), "chigasaki");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("Chigasaki").is_err());
/// assert!(StationId::parse("tsuji do").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        {
            return Err(InvalidStationId {
                reason: "must be lowercase ASCII letters, digits, '-' or '_'",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("chigasaki").is_ok());
        assert!(StationId::parse("tsujido").is_ok());
        assert!(StationId::parse("stop_12").is_ok());
        assert!(StationId::parse("north-gate").is_ok());
    }

    #[test]
    fn reject_invalid_ids() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse("Tsujido").is_err());
        assert!(StationId::parse("辻堂").is_err());
        assert!(StationId::parse("a b").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("tsujido").unwrap();
        assert_eq!(id.to_string(), "tsujido");
        assert_eq!(format!("{:?}", id), "StationId(tsujido)");
    }

    #[test]
    fn serde_validates() {
        let id: StationId = serde_json::from_str(r#""chigasaki""#).unwrap();
        assert_eq!(id.as_str(), "chigasaki");
        assert!(serde_json::from_str::<StationId>(r#""Bad Id""#).is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""chigasaki""#);
    }
}

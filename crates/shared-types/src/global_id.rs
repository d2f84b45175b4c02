//! # Global Id Extraction
//!
//! The global id is the value of the `hl` query parameter of an
//! event's `data_location`. It is the logical identity of the event
//! across every ledger, and the member value stored in the cache sets.
//!
//! Extraction is read-only: the `data_location` itself is forwarded to
//! adapters exactly as received, never rewritten.

use crate::errors::DistributionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Query parameter carrying the global id.
const GLOBAL_ID_PARAM: &str = "hl";

/// The cross-ledger identity of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// View as a string slice (the cache member value).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlobalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Extract the global id from a `data_location` URL.
///
/// Fails with [`DistributionError::MissingGlobalId`] when the URL does
/// not parse, the `hl` parameter is absent, or its value is empty.
pub fn extract_global_id(data_location: &str) -> Result<GlobalId, DistributionError> {
    let url = Url::parse(data_location)
        .map_err(|_| DistributionError::MissingGlobalId(data_location.to_string()))?;

    url.query_pairs()
        .find(|(key, _)| key == GLOBAL_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(GlobalId)
        .ok_or_else(|| DistributionError::MissingGlobalId(data_location.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_hl_parameter() {
        let gid = extract_global_id("https://ledger.example/events?hl=0xabc").unwrap();
        assert_eq!(gid.as_str(), "0xabc");
    }

    #[test]
    fn test_extracts_hl_among_other_parameters() {
        let gid =
            extract_global_id("https://ledger.example/events?page=2&hl=0xabc&sort=asc").unwrap();
        assert_eq!(gid.as_str(), "0xabc");
    }

    #[test]
    fn test_missing_hl_is_an_error() {
        let err = extract_global_id("https://ledger.example/events?page=2").unwrap_err();
        assert!(matches!(err, DistributionError::MissingGlobalId(_)));
    }

    #[test]
    fn test_empty_hl_is_an_error() {
        let err = extract_global_id("https://ledger.example/events?hl=").unwrap_err();
        assert!(matches!(err, DistributionError::MissingGlobalId(_)));
    }

    #[test]
    fn test_unparseable_location_is_an_error() {
        let err = extract_global_id("not a url").unwrap_err();
        assert!(matches!(err, DistributionError::MissingGlobalId(_)));
    }

    #[test]
    fn test_extraction_is_pure() {
        let location = "https://ledger.example/events?hl=0xabc";
        let first = extract_global_id(location).unwrap();
        let second = extract_global_id(location).unwrap();
        assert_eq!(first, second);
    }
}

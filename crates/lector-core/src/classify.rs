//! Code classification and route construction.
//!
//! A normalized code is classified by its prefix: codes issued to external
//! observers start with [`EXTERNO_PREFIX`](crate::constants::EXTERNO_PREFIX)
//! and go to the observer confirmation screen, everything else goes to the
//! computo-room confirmation screen. The code itself travels as a single
//! percent-encoded path segment.
//!
//! # Examples
//!
//! ```
//! use lector_core::{classify, Destination, RouteTable};
//!
//! let classified = classify("externo-42");
//! assert_eq!(classified.destination, Destination::Externo);
//!
//! let navigation = RouteTable::default().navigation(&classified);
//! assert_eq!(navigation.path, "/accesoObservador/externo-42");
//! ```

use crate::constants::{DEFAULT_COMPUTO_ROUTE, DEFAULT_EXTERNO_ROUTE, EXTERNO_PREFIX};
use crate::error::{Error, Result};
use crate::normalize;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes escaped when a code is embedded as a URI component.
///
/// Mirrors URI-component encoding: ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )` pass through unchanged.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Confirmation screen a scanned code is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// External observer access.
    Externo,
    /// Computo-room (internal) access.
    Computo,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Destination::Externo => write!(f, "externo"),
            Destination::Computo => write!(f, "computo"),
        }
    }
}

/// Result of classifying a normalized code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    /// The normalized code that was classified.
    pub code: String,
    pub destination: Destination,
    /// `code` percent-encoded for use as a single path segment.
    pub encoded_arg: String,
}

/// Percent-encode text as a URI component.
///
/// # Examples
///
/// ```
/// use lector_core::percent_encode;
///
/// assert_eq!(percent_encode("abc-123-"), "abc-123-");
/// assert_eq!(percent_encode("a b/c"), "a%20b%2Fc");
/// assert_eq!(percent_encode("ñ"), "%C3%B1");
/// ```
pub fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Classify a normalized code by its prefix.
///
/// The prefix comparison is exact and case-sensitive. `code` is expected to
/// be the output of [`normalize`](crate::normalize); it is not normalized
/// again here.
pub fn classify(code: &str) -> Classified {
    let destination = if code.starts_with(EXTERNO_PREFIX) {
        Destination::Externo
    } else {
        Destination::Computo
    };

    Classified {
        code: code.to_string(),
        destination,
        encoded_arg: percent_encode(code),
    }
}

/// A navigation request handed to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub destination: Destination,
    pub path: String,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Route bases for each destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub externo: String,
    pub computo: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            externo: DEFAULT_EXTERNO_ROUTE.to_string(),
            computo: DEFAULT_COMPUTO_ROUTE.to_string(),
        }
    }
}

impl RouteTable {
    /// Route base for a destination.
    pub fn base(&self, destination: Destination) -> &str {
        match destination {
            Destination::Externo => &self.externo,
            Destination::Computo => &self.computo,
        }
    }

    /// Build the navigation request for a classified code.
    pub fn navigation(&self, classified: &Classified) -> Navigation {
        let base = self.base(classified.destination).trim_end_matches('/');
        Navigation {
            destination: classified.destination,
            path: format!("{}/{}", base, classified.encoded_arg),
        }
    }

    /// Normalize, classify and route raw scanned text in one step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyScan`] if nothing is left after normalization.
    pub fn resolve(&self, raw_text: &str) -> Result<Navigation> {
        let code = normalize(raw_text);
        if code.is_empty() {
            return Err(Error::EmptyScan);
        }
        Ok(self.navigation(&classify(&code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("externo-42", Destination::Externo)]
    #[case("externo-", Destination::Externo)]
    #[case("abc-123-", Destination::Computo)]
    #[case("Externo-42", Destination::Computo)]
    #[case("externo42", Destination::Computo)]
    #[case("", Destination::Computo)]
    fn test_classify_destination(#[case] code: &str, #[case] expected: Destination) {
        assert_eq!(classify(code).destination, expected);
    }

    #[rstest]
    #[case("abc-123-", "abc-123-")]
    #[case("a b", "a%20b")]
    #[case("a/b?c#d", "a%2Fb%3Fc%23d")]
    #[case("100%", "100%25")]
    #[case("x&y=z", "x%26y%3Dz")]
    #[case("_.!~*'()", "_.!~*'()")]
    #[case("año", "a%C3%B1o")]
    fn test_percent_encode(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(percent_encode(text), expected);
    }

    #[test]
    fn test_navigation_paths() {
        let routes = RouteTable::default();

        let externo = routes.navigation(&classify("externo-42"));
        assert_eq!(externo.destination, Destination::Externo);
        assert_eq!(externo.path, "/accesoObservador/externo-42");

        let computo = routes.navigation(&classify(&normalize("  abc'123\"")));
        assert_eq!(computo.destination, Destination::Computo);
        assert_eq!(computo.path, "/accesoComputo/abc-123-");
    }

    #[test]
    fn test_navigation_with_trailing_slash_base() {
        let routes = RouteTable {
            externo: "/observer/".to_string(),
            computo: "/computo".to_string(),
        };
        let navigation = routes.navigation(&classify("externo-1"));
        assert_eq!(navigation.path, "/observer/externo-1");
    }

    #[test]
    fn test_resolve_normalizes_and_routes() {
        let routes = RouteTable::default();

        let navigation = routes.resolve("  externo-7\"").unwrap();
        assert_eq!(navigation.destination, Destination::Externo);
        assert_eq!(navigation.path, "/accesoObservador/externo-7-");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_resolve_empty_scan(#[case] raw: &str) {
        assert!(matches!(RouteTable::default().resolve(raw), Err(Error::EmptyScan)));
    }

    proptest! {
        #[test]
        fn prop_externo_prefix_routes_externo(suffix in ".*") {
            let code = format!("externo-{suffix}");
            let classified = classify(&code);
            prop_assert_eq!(classified.destination, Destination::Externo);
            prop_assert_eq!(classified.encoded_arg, percent_encode(&code));
        }

        #[test]
        fn prop_other_codes_route_computo(code in "[^e].*") {
            prop_assert_eq!(classify(&code).destination, Destination::Computo);
        }

        #[test]
        fn prop_encoded_arg_is_single_segment(code in ".*") {
            let encoded = percent_encode(&code);
            prop_assert!(!encoded.contains('/'));
            prop_assert!(!encoded.contains(' '));
        }
    }
}

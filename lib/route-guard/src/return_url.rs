//! The return-URL contract.
//!
//! A guard that denies access sends the visitor to
//! `<login path>?returnUrl=<percent-encoded path and query>`. After a
//! successful sign-in the value is read back, decoded and accepted only if it
//! is a same-origin path. Anything else is treated as absent, so the login
//! flow can never be turned into an open redirect.

use std::fmt;

use crate::location::NavigationIntent;

/// Query parameter carrying the return URL.
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// Percent-encodes a value for use as a query parameter value.
///
/// Everything except ASCII alphanumerics and `-_.~` is encoded, including `/`.
#[must_use]
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds the login redirect destination for a denied navigation.
///
/// ```
/// use vibe_flow_route_guard::{Location, NavigationIntent, login_redirect_url};
///
/// let intent = NavigationIntent::capture(&Location::new("/blog", ""));
/// assert_eq!(login_redirect_url("/auth", &intent), "/auth?returnUrl=%2Fblog");
/// ```
#[must_use]
pub fn login_redirect_url(login_path: &str, intent: &NavigationIntent) -> String {
    format!(
        "{login_path}?{RETURN_URL_PARAM}={}",
        encode_component(intent.as_str())
    )
}

/// Returns the raw (still encoded) value of the first `key` parameter.
///
/// A bare key with no `=` yields an empty value.
#[must_use]
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| match pair.split_once('=') {
            Some((k, v)) if k == key => Some(v),
            None if pair == key => Some(""),
            _ => None,
        })
}

/// Why a return URL was not honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnUrlRejection {
    /// No `returnUrl` parameter.
    Missing,
    /// The parameter was present but empty.
    Empty,
    /// A `%` not followed by two hex digits, or the bytes are not UTF-8.
    MalformedEncoding,
    /// The value does not start with `/` (absolute URL, scheme, bare word).
    NotRelative,
    /// The value starts with `//` or `/\`, which browsers resolve to another host.
    ProtocolRelative,
    /// The value contains ASCII control characters, which browsers strip.
    ControlCharacter,
}

impl fmt::Display for ReturnUrlRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::MalformedEncoding => "malformed percent-encoding",
            Self::NotRelative => "not a same-origin path",
            Self::ProtocolRelative => "protocol-relative URL",
            Self::ControlCharacter => "contains control characters",
        };
        f.write_str(s)
    }
}

/// A validated same-origin return path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrl(String);

impl ReturnUrl {
    /// Extracts and validates the return URL from a raw query string.
    ///
    /// # Errors
    ///
    /// Returns the reason the parameter was rejected.
    pub fn from_query(query: &str) -> Result<Self, ReturnUrlRejection> {
        let raw = query_param(query, RETURN_URL_PARAM).ok_or(ReturnUrlRejection::Missing)?;
        Self::parse_encoded(raw)
    }

    /// Decodes a raw parameter value and validates it.
    ///
    /// # Errors
    ///
    /// Returns the reason the value was rejected.
    pub fn parse_encoded(raw: &str) -> Result<Self, ReturnUrlRejection> {
        if raw.is_empty() {
            return Err(ReturnUrlRejection::Empty);
        }
        if !is_well_formed(raw) {
            return Err(ReturnUrlRejection::MalformedEncoding);
        }
        let decoded =
            urlencoding::decode(raw).map_err(|_| ReturnUrlRejection::MalformedEncoding)?;
        Self::validate(&decoded)
    }

    /// Validates an already-decoded value.
    ///
    /// # Errors
    ///
    /// Returns the reason the value was rejected.
    pub fn validate(decoded: &str) -> Result<Self, ReturnUrlRejection> {
        if decoded.is_empty() {
            return Err(ReturnUrlRejection::Empty);
        }
        if !decoded.starts_with('/') {
            return Err(ReturnUrlRejection::NotRelative);
        }
        if decoded.starts_with("//") || decoded.starts_with("/\\") {
            return Err(ReturnUrlRejection::ProtocolRelative);
        }
        if decoded.chars().any(char::is_control) {
            return Err(ReturnUrlRejection::ControlCharacter);
        }
        Ok(Self(decoded.to_string()))
    }

    /// Returns the validated path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the return URL, yielding the path.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReturnUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every `%` must introduce exactly two hex digits.
fn is_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn login_redirect_encodes_path_and_query() {
        let intent = NavigationIntent::capture(&Location::new("/blog", "tag=rust&page=2"));
        assert_eq!(
            login_redirect_url("/auth", &intent),
            "/auth?returnUrl=%2Fblog%3Ftag%3Drust%26page%3D2"
        );
    }

    #[test]
    fn redirect_value_round_trips_through_validation() {
        let intent = NavigationIntent::capture(&Location::new("/dashboard", "tab=chat"));
        let destination = login_redirect_url("/auth", &intent);
        let login = Location::parse(&destination);

        let parsed = ReturnUrl::from_query(login.query()).expect("valid return url");
        assert_eq!(parsed.as_str(), "/dashboard?tab=chat");
    }

    #[test]
    fn query_param_finds_first_match() {
        assert_eq!(query_param("a=1&returnUrl=%2Fx&returnUrl=%2Fy", "returnUrl"), Some("%2Fx"));
        assert_eq!(query_param("?returnUrl=%2Fx", "returnUrl"), Some("%2Fx"));
        assert_eq!(query_param("returnUrl", "returnUrl"), Some(""));
        assert_eq!(query_param("returnUrlx=%2Fx", "returnUrl"), None);
        assert_eq!(query_param("", "returnUrl"), None);
    }

    #[test]
    fn accepts_encoded_relative_path() {
        let url = ReturnUrl::from_query("returnUrl=%2Fblog").expect("accepted");
        assert_eq!(url.as_str(), "/blog");
    }

    #[test]
    fn accepts_unencoded_relative_path() {
        let url = ReturnUrl::from_query("returnUrl=/portfolio").expect("accepted");
        assert_eq!(url.to_string(), "/portfolio");
    }

    #[test]
    fn rejects_missing_and_empty() {
        assert_eq!(ReturnUrl::from_query("next=%2Fblog"), Err(ReturnUrlRejection::Missing));
        assert_eq!(ReturnUrl::from_query("returnUrl="), Err(ReturnUrlRejection::Empty));
    }

    #[test]
    fn rejects_open_redirect_attempts() {
        let cases = [
            ("https%3A%2F%2Fattacker.test", ReturnUrlRejection::NotRelative),
            ("http://evil.example/", ReturnUrlRejection::NotRelative),
            ("%2F%2Fevil.example%2F", ReturnUrlRejection::ProtocolRelative),
            ("//evil.example/", ReturnUrlRejection::ProtocolRelative),
            ("%2F%5Cevil.example", ReturnUrlRejection::ProtocolRelative),
            ("javascript:alert(1)", ReturnUrlRejection::NotRelative),
            ("%2F%09%2Fevil.example", ReturnUrlRejection::ControlCharacter),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                ReturnUrl::parse_encoded(raw),
                Err(expected),
                "value {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_percent_encoding() {
        for raw in ["%2", "/blog%zz", "%", "/ok%2Fbut%G1"] {
            assert_eq!(
                ReturnUrl::parse_encoded(raw),
                Err(ReturnUrlRejection::MalformedEncoding),
                "value {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(
            ReturnUrl::parse_encoded("%2F%FF%FE"),
            Err(ReturnUrlRejection::MalformedEncoding)
        );
    }
}

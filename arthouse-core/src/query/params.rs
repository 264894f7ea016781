//! Raw query-string parameters.

use std::borrow::Cow;
use std::collections::HashMap;

/// Parameter name to every value supplied for it, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are `&`-separated, `+` decodes to a space and `%XX` escapes are
    /// percent-decoded. Pairs containing `;`, a malformed escape or invalid
    /// UTF-8 are dropped, as are pairs with an empty name.
    pub fn parse(raw: &str) -> Self {
        let mut params = Self::new();
        for pair in raw.split('&') {
            if pair.is_empty() || pair.contains(';') {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value))
            else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            params.append(key, value);
        }
        params
    }

    /// Build from decoded pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// First value supplied for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value supplied for `key`, or `None` if the key is absent.
    pub fn all(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `true` when every `%` starts a two-hex-digit escape.
fn escapes_are_well_formed(component: &str) -> bool {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// Decode `+` and percent escapes. Malformed escapes and non-UTF-8 results
/// are `None`.
fn decode_component(component: &str) -> Option<String> {
    if !escapes_are_well_formed(component) {
        return None;
    }
    let spaced: Cow<'_, str> = if component.contains('+') {
        Cow::Owned(component.replace('+', " "))
    } else {
        Cow::Borrowed(component)
    };
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

//! Resolution of the post-OAuth destination from callback query parameters.

use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Destination for a signed-in user with no explicit redirect.
pub const SIGNED_IN_ROUTE: &str = "/(tabs)";
/// Destination for a signed-out user with no explicit redirect.
pub const SIGNED_OUT_ROUTE: &str = "/(auth)/login";
/// How long the callback screen waits before navigating on its own.
pub const AUTO_NAVIGATION_DELAY_MS: u64 = 1800;

const REDIRECT_KEYS: [&str; 3] = ["next", "redirect", "redirect_uri"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RedirectError {
    #[error("invalid callback url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Query parameters the callback screen understands. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub next: Option<String>,
    pub redirect: Option<String>,
    pub redirect_uri: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse the parameters from a full callback URL.
    ///
    /// # Errors
    ///
    /// Returns `RedirectError::InvalidUrl` when `url` is not an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, RedirectError> {
        let url = Url::parse(url)?;
        Ok(Self::from_query_pairs(
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())),
        ))
    }

    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::from_query_pairs(
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// Build from decoded key/value pairs; the first occurrence of a key wins.
    pub fn from_query_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_str() {
                "state" => &mut params.state,
                "next" => &mut params.next,
                "redirect" => &mut params.redirect,
                "redirect_uri" => &mut params.redirect_uri,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Redirect carried inside the `state` parameter, if it is JSON.
    ///
    /// The raw value is tried first, then its percent-decoded form. Opaque
    /// states yield `None`.
    #[must_use]
    pub fn state_redirect(&self) -> Option<String> {
        let raw = self.state.as_deref()?;
        redirect_from_json(raw).or_else(|| percent_decode(raw).and_then(|d| redirect_from_json(&d)))
    }

    /// Redirect from the plain query parameters: `next`, then `redirect`, then `redirect_uri`.
    #[must_use]
    pub fn fallback_redirect(&self) -> Option<&str> {
        self.next
            .as_deref()
            .or(self.redirect.as_deref())
            .or(self.redirect_uri.as_deref())
    }

    /// Where to navigate once the identity provider has settled.
    #[must_use]
    pub fn destination(&self, signed_in: bool) -> String {
        if let Some(target) = self.state_redirect() {
            return target;
        }
        if let Some(target) = self.fallback_redirect() {
            return target.to_owned();
        }
        if signed_in {
            SIGNED_IN_ROUTE.to_owned()
        } else {
            SIGNED_OUT_ROUTE.to_owned()
        }
    }

    /// Provider error to show instead of the progress message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_description.as_deref().or(self.error.as_deref())
    }
}

fn redirect_from_json(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    REDIRECT_KEYS.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Strict `%XX` decoding; malformed escapes or invalid UTF-8 yield `None`.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

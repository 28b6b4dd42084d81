//! Signature link handling.
//!
//! The signature link is the URL of the signing interface for one signer.
//! It is validated once when the session is built, optionally marked for
//! the sandbox environment, and kept as a read-only view of its query
//! parameters.

use core::fmt;

use url::Url;

use crate::error::Result;

/// Query parameter disabling the embedding domain check in sandbox.
pub const SANDBOX_PARAM: (&str, &str) = ("disable_domain_validation", "true");

/// Query parameter carrying the signer key forwarded on redirects.
pub const REDIRECT_KEY_PARAM: &str = "k";

/// A validated signature link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLink {
    url: Url,
}

impl SignatureLink {
    /// Parses a signature link.
    ///
    /// When `sandbox` is set, [`SANDBOX_PARAM`] is appended to the query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignatureLink`](crate::Error::InvalidSignatureLink)
    /// if `link` is not an absolute URL.
    ///
    /// # Example
    ///
    /// ```
    /// use yousign_embed_core::SignatureLink;
    ///
    /// let link = SignatureLink::parse("https://yousign.app/signatures/42?k=ABC", true).unwrap();
    /// assert_eq!(
    ///     link.as_str(),
    ///     "https://yousign.app/signatures/42?k=ABC&disable_domain_validation=true"
    /// );
    /// assert_eq!(link.redirect_key().as_deref(), Some("ABC"));
    /// ```
    pub fn parse(link: &str, sandbox: bool) -> Result<Self> {
        let mut url = Url::parse(link)?;
        if sandbox {
            let (key, value) = SANDBOX_PARAM;
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(Self { url })
    }

    /// Returns the first value of query parameter `key`, percent-decoded.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    /// Returns the signer key (`k`) forwarded on redirect instructions.
    #[must_use]
    pub fn redirect_key(&self) -> Option<String> {
        self.query_param(REDIRECT_KEY_PARAM)
    }

    /// Builds the frame target for a redirect instruction.
    ///
    /// The key is appended with `&` as the verification partner always sends
    /// a URL that already has a query string. A link without `k` forwards
    /// an empty value (`&k=`), not the literal string `null`.
    #[must_use]
    pub fn redirect_target(&self, redirect_url: &str) -> String {
        let key = self.redirect_key().unwrap_or_default();
        format!("{redirect_url}&{REDIRECT_KEY_PARAM}={key}")
    }

    /// Returns the finalized link.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for SignatureLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

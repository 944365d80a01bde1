//! Share links carrying a display-name token in the `u` query parameter.
//!
//! What happens when a link carries no usable name (redirect, error page) is up to the
//! caller; this module only reports it.

use url::Url;

use crate::token::codec::{self, DecodeError, Token};

/// Query parameter that carries the token.
pub const LINK_PARAM: &str = "u";

/// Why a link did not yield a display name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The link is not an absolute URL.
    #[error("invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The link has no `u` parameter.
    #[error("link has no 'u' parameter")]
    MissingParam,

    /// The `u` parameter is present but is not a valid token.
    #[error("link token rejected: {0}")]
    Decode(#[from] DecodeError),
}

/// Build a share link for `name` on top of `base`.
///
/// Other query parameters on `base` are kept; an existing `u` parameter is replaced.
pub fn share_link(base: &str, name: &str) -> Result<Url, LinkError> {
    let mut url = Url::parse(base)?;
    let token = codec::encode(name);
    set_token(&mut url, &token);
    Ok(url)
}

/// Resolve a share link back to the display name it carries.
#[tracing::instrument(level = "debug")]
pub fn name_from_link(link: &str) -> Result<String, LinkError> {
    let url = Url::parse(link)?;
    name_from_url(&url)
}

/// Like [`name_from_link`] for an already parsed URL.
pub fn name_from_url(url: &Url) -> Result<String, LinkError> {
    let token = url
        .query_pairs()
        .find(|(k, _)| k == LINK_PARAM)
        .map(|(_, v)| v.into_owned())
        .ok_or(LinkError::MissingParam)?;
    let name = codec::decode(&token).inspect_err(|e| {
        tracing::debug!(error = %e, "share link token rejected");
    })?;
    Ok(name)
}

fn set_token(url: &mut Url, token: &Token) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != LINK_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(LINK_PARAM, token.as_str());
}

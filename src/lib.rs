//! Lanyard turns a display name into two things a card page needs:
//!
//! - a URL-safe token that carries the name in a share link without showing it as plain text
//!   ([`encode`], [`decode`], [`share_link`], [`name_from_link`]);
//! - a 512x512 PNG card texture with an icon and the upper-cased name ([`CardCompositor`]).
//!
//! Both are synchronous and hold no state between calls.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Icon, color and text-layout assets.
pub mod assets;
/// Card texture compositing.
pub mod render;
/// Display-name tokens and share links.
pub mod token;

pub use crate::assets::color::StyleColor;
pub use crate::assets::icon::IconAsset;
pub use crate::foundation::error::{LanyardError, LanyardResult};
pub use crate::render::card::{
    CARD_SIZE, CardCompositor, CardLayout, CardStyle, DEFAULT_PLACEHOLDER, ICON_SIZE,
    display_text,
};
pub use crate::render::texture::CardTexture;
pub use crate::token::codec::{DecodeError, Token, decode, encode};
pub use crate::token::link::{LINK_PARAM, LinkError, name_from_link, name_from_url, share_link};

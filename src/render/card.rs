use std::path::Path;
use std::sync::Arc;

use crate::assets::color::StyleColor;
use crate::assets::icon::IconAsset;
use crate::assets::text::{CardFonts, LineStyle, TextBrushRgba8, TextLayoutEngine, glyph_count};
use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{LanyardError, LanyardResult};
use crate::render::cpu;
use crate::render::texture::CardTexture;

/// Side length of every card texture, in pixels.
pub const CARD_SIZE: u32 = 512;
/// Side length the icon is scaled to.
pub const ICON_SIZE: u32 = 128;
/// How far the icon sits above the true center.
pub const ICON_LIFT: u32 = 40;
/// Distance from the bottom edge to the vertical middle of the name.
pub const TEXT_BOTTOM_OFFSET: u32 = 80;
/// Text drawn when no name is given.
pub const DEFAULT_PLACEHOLDER: &str = "YOUR NAME";

/// Fixed card geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    /// Canvas side length.
    pub size: u32,
    /// Where the icon is drawn.
    pub icon_rect: Rect,
    /// Horizontal center / vertical middle of the name.
    pub text_anchor: Point,
}

impl CardLayout {
    /// The one layout every card uses.
    pub fn canonical() -> Self {
        let s = f64::from(CARD_SIZE);
        let icon = f64::from(ICON_SIZE);
        let x = (s - icon) / 2.0;
        let y = (s - icon) / 2.0 - f64::from(ICON_LIFT);
        Self {
            size: CARD_SIZE,
            icon_rect: Rect::new(x, y, x + icon, y + icon),
            text_anchor: Point::new(s / 2.0, s - f64::from(TEXT_BOTTOM_OFFSET)),
        }
    }
}

/// Visual styling that does not affect geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardStyle {
    /// Canvas fill.
    pub background: StyleColor,
    /// Name color.
    pub text_color: StyleColor,
    /// Name font size in pixels.
    pub font_size_px: f32,
    /// Extra advance after every character, in pixels.
    pub letter_spacing_px: f32,
    /// Render the name in bold.
    pub bold: bool,
    /// Text used for an empty or missing name (upper-cased like any other name).
    pub placeholder: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: StyleColor::BLACK,
            text_color: StyleColor::WHITE,
            font_size_px: 28.0,
            letter_spacing_px: 4.0,
            bold: true,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }
}

impl CardStyle {
    /// Load a style from a JSON file. Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> LanyardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LanyardError::asset(format!("failed to read style '{}': {e}", path.display()))
        })?;
        let style: Self = serde_json::from_slice(&bytes).map_err(|e| {
            LanyardError::validation(format!("invalid style '{}': {e}", path.display()))
        })?;
        style.validate()?;
        Ok(style)
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> LanyardResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(LanyardError::validation("font_size_px must be finite and > 0"));
        }
        if !self.letter_spacing_px.is_finite() {
            return Err(LanyardError::validation("letter_spacing_px must be finite"));
        }
        Ok(())
    }
}

/// Resolve the text drawn for `name`: the placeholder when empty or missing, upper-cased.
pub fn display_text(name: Option<&str>, placeholder: &str) -> String {
    match name {
        Some(n) if !n.is_empty() => n.to_uppercase(),
        _ => placeholder.to_uppercase(),
    }
}

/// Composites card textures: background, optional icon, then the name.
///
/// Holds only immutable configuration, including the font collection, which is shared behind
/// an `Arc`. Each call builds its own surface and layout contexts, so a compositor can be
/// cloned and reused freely and two calls with equal inputs produce equal bytes.
#[derive(Clone, Debug, Default)]
pub struct CardCompositor {
    style: CardStyle,
    fonts: Arc<CardFonts>,
    icon: Option<IconAsset>,
}

impl CardCompositor {
    /// Compositor with default styling and the bundled monospace face.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the styling.
    pub fn with_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }

    /// Draw the name with these TTF/OTF bytes, falling back to the bundled face for
    /// characters they do not cover. Host fonts are never consulted.
    pub fn with_font_bytes(mut self, bytes: &[u8]) -> LanyardResult<Self> {
        self.fonts = Arc::new(CardFonts::with_face(bytes)?);
        Ok(self)
    }

    /// Like [`Self::with_font_bytes`], reading the font from disk.
    pub fn with_font_path(self, path: impl AsRef<Path>) -> LanyardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LanyardError::asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.with_font_bytes(&bytes)
    }

    /// Attach the icon used by [`Self::capture`]. `None` while the icon is still loading.
    pub fn with_icon(mut self, icon: Option<IconAsset>) -> Self {
        self.icon = icon;
        self
    }

    /// Current styling.
    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Compose with the attached icon, if any.
    pub fn capture(&self, name: Option<&str>) -> LanyardResult<CardTexture> {
        self.compose(name, self.icon.as_ref())
    }

    /// Compose one texture.
    ///
    /// A missing icon is not an error; the icon area is left as background. Either a complete
    /// texture is returned or an error, never a partially drawn frame.
    #[tracing::instrument(
        level = "debug",
        skip(self, name, icon),
        fields(has_name = name.is_some_and(|n| !n.is_empty()), has_icon = icon.is_some())
    )]
    pub fn compose(
        &self,
        name: Option<&str>,
        icon: Option<&IconAsset>,
    ) -> LanyardResult<CardTexture> {
        self.style.validate()?;
        let layout = CardLayout::canonical();
        let text = display_text(name, &self.style.placeholder);

        let icon_px = icon
            .map(|i| i.rasterize_premul(ICON_SIZE, ICON_SIZE))
            .transpose()?;

        let mut engine = TextLayoutEngine::new(&self.fonts);
        let text_layout = engine.layout_line(
            &text,
            LineStyle {
                size_px: self.style.font_size_px,
                letter_spacing_px: self.style.letter_spacing_px,
                bold: self.style.bold,
                brush: TextBrushRgba8::from_array(self.style.text_color.to_rgba8()),
            },
        )?;
        if glyph_count(&text_layout) == 0 && !text.trim().is_empty() {
            return Err(LanyardError::asset(format!(
                "no font face resolved for card text {text:?}"
            )));
        }
        let text_w = f64::from(text_layout.width());
        let text_h = f64::from(text_layout.height());
        tracing::debug!(
            text_w,
            text_h,
            family = self.fonts.family_name().unwrap_or("unknown"),
            "name laid out"
        );

        let (mut ctx, mut pixmap) = cpu::acquire_surface(layout.size, layout.size)?;
        let side = f64::from(layout.size);
        cpu::fill_solid(
            &mut ctx,
            Rect::new(0.0, 0.0, side, side),
            self.style.background.to_rgba8(),
        );

        if let Some(px) = &icon_px {
            let origin = Affine::translate((layout.icon_rect.x0, layout.icon_rect.y0));
            cpu::draw_premul_image(&mut ctx, px, ICON_SIZE, ICON_SIZE, origin)?;
        }

        let origin = Affine::translate((
            layout.text_anchor.x - text_w / 2.0,
            layout.text_anchor.y - text_h / 2.0,
        ));
        cpu::draw_text_layout(&mut ctx, &text_layout, origin);

        let rgba = cpu::finish_to_rgba8(&mut ctx, &mut pixmap);
        CardTexture::from_rgba8(layout.size, layout.size, rgba)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/card.rs"]
mod tests;

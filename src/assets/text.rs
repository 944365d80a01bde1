use std::sync::Arc;

use parley::fontique::{Blob, Collection, CollectionOptions, FamilyId, GenericFamily, SourceCache};

use crate::foundation::error::{LanyardError, LanyardResult};

/// Font stack used when the caller does not supply font bytes.
pub(crate) const DEFAULT_FONT_STACK: &str = "\"Geist Mono\", monospace";

const BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");
const BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono-Bold.ttf");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

impl TextBrushRgba8 {
    pub(crate) fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Styling for a single line of text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineStyle {
    pub(crate) size_px: f32,
    pub(crate) letter_spacing_px: f32,
    pub(crate) bold: bool,
    pub(crate) brush: TextBrushRgba8,
}

/// Fonts card text may resolve against.
///
/// The collection never consults the host's font configuration: it holds the bundled
/// monospace face (registered as the `monospace` generic) plus at most one caller face.
/// Built once and cloned into each layout, so results are identical on every machine.
#[derive(Clone)]
pub(crate) struct CardFonts {
    ctx: parley::FontContext,
    stack: String,
    family: Option<String>,
}

impl std::fmt::Debug for CardFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardFonts")
            .field("stack", &self.stack)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl Default for CardFonts {
    fn default() -> Self {
        Self::bundled()
    }
}

impl CardFonts {
    /// Only the bundled monospace face.
    pub(crate) fn bundled() -> Self {
        let mut collection = Collection::new(CollectionOptions {
            shared: false,
            system_fonts: false,
        });
        let mut mono: Vec<FamilyId> = Vec::new();
        for face in [BUNDLED_REGULAR, BUNDLED_BOLD] {
            for (id, _) in collection.register_fonts(Blob::new(Arc::new(face)), None) {
                if !mono.contains(&id) {
                    mono.push(id);
                }
            }
        }
        collection.set_generic_families(GenericFamily::Monospace, mono.iter().copied());
        let family = match mono.first() {
            Some(id) => collection.family_name(*id).map(str::to_owned),
            None => None,
        };

        Self {
            ctx: parley::FontContext {
                collection,
                source_cache: SourceCache::default(),
            },
            stack: DEFAULT_FONT_STACK.to_owned(),
            family,
        }
    }

    /// The bundled face plus `font_bytes`, which takes precedence for every character it covers.
    pub(crate) fn with_face(font_bytes: &[u8]) -> LanyardResult<Self> {
        let mut fonts = Self::bundled();
        let families = fonts
            .ctx
            .collection
            .register_fonts(Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LanyardError::asset("no font families registered from font bytes"))?;

        let family_name = fonts
            .ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LanyardError::asset("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family_name, "registered card font");
        // Quote so names with spaces or commas survive stack parsing.
        fonts.stack = format!("\"{family_name}\", monospace");
        fonts.family = Some(family_name);
        Ok(fonts)
    }

    /// Family that leads the stack: the caller face if any, else the bundled face.
    pub(crate) fn family_name(&self) -> Option<&str> {
        self.family.as_deref()
    }
}

/// Builds Parley layouts against a private copy of a [`CardFonts`] collection.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    stack: String,
}

impl TextLayoutEngine {
    pub(crate) fn new(fonts: &CardFonts) -> Self {
        Self {
            font_ctx: fonts.ctx.clone(),
            layout_ctx: parley::LayoutContext::new(),
            stack: fonts.stack.clone(),
        }
    }

    /// Shape and lay out `text` as one unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        style: LineStyle,
    ) -> LanyardResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(LanyardError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if !style.letter_spacing_px.is_finite() {
            return Err(LanyardError::validation(
                "text letter_spacing_px must be finite",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(self.stack.as_str().into()),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            style.letter_spacing_px,
        ));
        if style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Number of shaped glyphs across every run of `layout`.
pub(crate) fn glyph_count(layout: &parley::Layout<TextBrushRgba8>) -> usize {
    let mut n = 0usize;
    for line in layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                n += run.positioned_glyphs().count();
            }
        }
    }
    n
}

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::premultiply_rgba8_in_place;
use crate::foundation::error::{LanyardError, LanyardResult};

/// Immutable icon image drawn above the name on a card.
///
/// Loading is the caller's job and happens once; the handle is cheap to clone and is only ever
/// read by the compositor. Raster formats go through `image`, SVG through `usvg`/`resvg`.
#[derive(Clone, Debug)]
pub struct IconAsset {
    source: Arc<IconSource>,
}

#[derive(Debug)]
enum IconSource {
    /// Straight-alpha RGBA8.
    Raster(image::RgbaImage),
    Svg(usvg::Tree),
}

impl IconAsset {
    /// Decode an icon from encoded bytes (PNG, JPEG, ... or SVG).
    pub fn from_bytes(bytes: &[u8]) -> LanyardResult<Self> {
        if looks_like_svg(bytes) {
            Self::from_svg_bytes(bytes)
        } else {
            Self::from_raster_bytes(bytes)
        }
    }

    /// Read and decode an icon file. `.svg`/`.svgz` files are parsed as SVG regardless of
    /// content; everything else is sniffed.
    #[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> LanyardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LanyardError::asset(format!("failed to read icon '{}': {e}", path.display()))
        })?;
        let is_svg_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg") || e.eq_ignore_ascii_case("svgz"));

        let icon = if is_svg_ext {
            Self::from_svg_bytes(&bytes)?
        } else {
            Self::from_bytes(&bytes)?
        };
        tracing::debug!(
            width = icon.width(),
            height = icon.height(),
            svg = icon.is_svg(),
            "icon loaded"
        );
        Ok(icon)
    }

    /// Wrap an already decoded straight-alpha RGBA image.
    pub fn from_rgba(image: image::RgbaImage) -> LanyardResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(LanyardError::asset("icon image has zero size"));
        }
        Ok(Self {
            source: Arc::new(IconSource::Raster(image)),
        })
    }

    fn from_raster_bytes(bytes: &[u8]) -> LanyardResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode icon image from memory")?;
        Self::from_rgba(dyn_img.to_rgba8())
    }

    fn from_svg_bytes(bytes: &[u8]) -> LanyardResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse icon svg tree")?;
        let size = tree.size();
        if !size.width().is_finite() || !size.height().is_finite() {
            return Err(LanyardError::asset("icon svg has invalid width/height"));
        }
        Ok(Self {
            source: Arc::new(IconSource::Svg(tree)),
        })
    }

    /// Intrinsic width in pixels (SVG: rounded up from the document size).
    pub fn width(&self) -> u32 {
        match self.source.as_ref() {
            IconSource::Raster(img) => img.width(),
            IconSource::Svg(tree) => tree.size().width().ceil().max(1.0) as u32,
        }
    }

    /// Intrinsic height in pixels (SVG: rounded up from the document size).
    pub fn height(&self) -> u32 {
        match self.source.as_ref() {
            IconSource::Raster(img) => img.height(),
            IconSource::Svg(tree) => tree.size().height().ceil().max(1.0) as u32,
        }
    }

    /// Return `true` for vector icons.
    pub fn is_svg(&self) -> bool {
        matches!(self.source.as_ref(), IconSource::Svg(_))
    }

    /// Render the icon stretched to exactly `width` x `height` as premultiplied RGBA8.
    pub(crate) fn rasterize_premul(&self, width: u32, height: u32) -> LanyardResult<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(LanyardError::validation("icon raster size must be non-zero"));
        }
        match self.source.as_ref() {
            IconSource::Raster(img) => {
                let mut rgba = if img.dimensions() == (width, height) {
                    img.as_raw().clone()
                } else {
                    image::imageops::resize(
                        img,
                        width,
                        height,
                        image::imageops::FilterType::Triangle,
                    )
                    .into_raw()
                };
                premultiply_rgba8_in_place(&mut rgba);
                Ok(rgba)
            }
            IconSource::Svg(tree) => rasterize_svg_to_premul_rgba8(tree, width, height),
        }
    }
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> LanyardResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LanyardError::surface("failed to allocate icon pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    // gzip magic: only SVGZ is expected to arrive compressed.
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return true;
    }
    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head);
    let trimmed = head.trim_start_matches('\u{feff}').trim_start();
    (trimmed.starts_with("<?xml") || trimmed.starts_with("<svg") || trimmed.starts_with("<!--"))
        && head.contains("<svg")
}

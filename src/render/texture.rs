use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::{LanyardError, LanyardResult};

/// MIME type of the encoded texture payload.
pub const TEXTURE_MIME: &str = "image/png";

/// A finished card texture, PNG-encoded.
///
/// Immutable and cheap to clone. Every value handed out by the compositor is a complete frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTexture {
    width: u32,
    height: u32,
    png: Arc<[u8]>,
}

impl CardTexture {
    /// Encode straight-alpha RGBA8 pixels as a PNG texture.
    pub(crate) fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> LanyardResult<Self> {
        let img = image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| LanyardError::surface("rendered buffer does not match surface size"))?;

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| LanyardError::encode(format!("png encode failed: {e}")))?;

        Ok(Self {
            width,
            height,
            png: buf.into(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// PNG-encoded bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` URL, the form texture loaders consume directly.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{TEXTURE_MIME};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// Decode back to straight-alpha RGBA8 pixels.
    pub fn to_rgba8(&self) -> LanyardResult<image::RgbaImage> {
        let img = image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)
            .map_err(|e| LanyardError::encode(format!("png decode failed: {e}")))?;
        Ok(img.to_rgba8())
    }

    /// Write the PNG payload to `path`.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> LanyardResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.png).map_err(|e| {
            LanyardError::encode(format!("failed to write '{}': {e}", path.display()))
        })
    }
}

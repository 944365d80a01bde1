use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::text::TextBrushRgba8;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{LanyardError, LanyardResult};

/// Acquire a render context and a matching destination pixmap.
pub(crate) fn acquire_surface(
    width: u32,
    height: u32,
) -> LanyardResult<(vello_cpu::RenderContext, vello_cpu::Pixmap)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LanyardError::surface("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LanyardError::surface("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(LanyardError::surface("surface must be at least 1x1"));
    }
    Ok((
        vello_cpu::RenderContext::new(w, h),
        vello_cpu::Pixmap::new(w, h),
    ))
}

pub(crate) fn fill_solid(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: [u8; 4]) {
    let [r, g, b, a] = color;
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.fill_rect(&rect_to_cpu(rect));
}

/// Draw a premultiplied RGBA8 bitmap with its top-left corner at `origin`.
pub(crate) fn draw_premul_image(
    ctx: &mut vello_cpu::RenderContext,
    bytes_premul: &[u8],
    width: u32,
    height: u32,
    origin: Affine,
) -> LanyardResult<()> {
    let img = rgba_premul_to_image(bytes_premul, width, height)?;
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(origin));
    ctx.set_paint(img);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        width as f64,
        height as f64,
    ));
    Ok(())
}

/// Fill every glyph run of `layout`, placing the layout's top-left corner at `origin`.
pub(crate) fn draw_text_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    origin: Affine,
) {
    let mut fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData> = HashMap::new();

    ctx.set_transform(affine_to_cpu(origin));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let src = run.run().font();
            let font = fonts
                .entry((src.data.id(), src.index))
                .or_insert_with(|| {
                    vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(src.data.data().to_vec()),
                        src.index,
                    )
                })
                .clone();

            let glyphs: Vec<vello_cpu::Glyph> = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs.into_iter());
        }
    }
}

/// Rasterize everything recorded on `ctx` into `dst` and return straight-alpha RGBA8 bytes.
pub(crate) fn finish_to_rgba8(
    ctx: &mut vello_cpu::RenderContext,
    dst: &mut vello_cpu::Pixmap,
) -> Vec<u8> {
    ctx.flush();
    ctx.render_to_pixmap(dst);
    let mut out = dst.data_as_u8_slice().to_vec();
    crate::foundation::core::unpremultiply_rgba8_in_place(&mut out);
    out
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LanyardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LanyardError::surface("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LanyardError::surface("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LanyardError::surface("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> LanyardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

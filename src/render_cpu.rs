use std::io::Cursor;

use crate::{
    avatar::AvatarFrame,
    core::{Affine, BezPath, Canvas, Rgba8},
    error::{ChibiError, ChibiResult},
    rig::{AvatarRig, DESIGN_HEIGHT, DESIGN_WIDTH, LayerShape},
};

/// Draws one avatar frame onto a fresh transparent pixmap. Layers are
/// painted in the frame's back-to-front order; invisible placements are
/// skipped, which is what enforces the one-eye/one-mouth rendering choice
/// downstream of the state machine.
#[tracing::instrument(skip(rig, frame))]
pub fn render_frame(
    rig: &AvatarRig,
    frame: &AvatarFrame,
    canvas: Canvas,
) -> ChibiResult<vello_cpu::Pixmap> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ChibiError::render("canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ChibiError::render("canvas height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(ChibiError::render("canvas width/height must be > 0"));
    }
    if rig.layers().len() != frame.layers.len() {
        return Err(ChibiError::render(
            "frame placements do not match rig layers",
        ));
    }

    // Uniform fit of the design box into the canvas, centered.
    let scale = (f64::from(canvas.width) / DESIGN_WIDTH)
        .min(f64::from(canvas.height) / DESIGN_HEIGHT);
    let dx = (f64::from(canvas.width) - DESIGN_WIDTH * scale) / 2.0;
    let dy = (f64::from(canvas.height) - DESIGN_HEIGHT * scale) / 2.0;
    let fit = Affine::translate((dx, dy)) * Affine::scale(scale);

    let mut ctx = vello_cpu::RenderContext::new(width, height);

    for (layer, placement) in rig.layers().iter().zip(&frame.layers) {
        if layer.kind != placement.kind {
            return Err(ChibiError::render(
                "frame placement order does not match rig layer order",
            ));
        }
        if !placement.visible {
            continue;
        }

        let local = Affine::translate(placement.offset)
            * Affine::rotate_about(placement.rotation_deg.to_radians(), placement.pivot)
            * scale_about(placement.scale, placement.pivot);
        let transform = fit * local;
        ctx.set_transform(affine_to_cpu(transform));

        for shape in &layer.shapes {
            let (path, color) = match shape {
                LayerShape::Fill { path, color } => (path, color),
                LayerShape::Curls { path, color, .. } => (path, color),
            };
            ctx.set_paint(color_to_cpu(*color));
            ctx.fill_path(&bezpath_to_cpu(path));
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

/// Encodes a rendered pixmap as PNG bytes.
pub fn png_bytes(pixmap: &vello_cpu::Pixmap, canvas: Canvas) -> ChibiResult<Vec<u8>> {
    let rgba = pixmap.data_as_u8_slice().to_vec();
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, rgba)
        .ok_or_else(|| ChibiError::render("pixmap size does not match canvas"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ChibiError::render(format!("png encode failed: {e}")))?;
    Ok(buf)
}

fn scale_about(scale: f64, pivot: kurbo::Point) -> Affine {
    Affine::translate(pivot.to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-pivot.to_vec2())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

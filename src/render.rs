//! Simple wrapping of repeated drawing processes: solid paints,
//! rectangle fills and surface-to-surface copies. Anything fancier
//! (paths, glyphs, gradients) belongs to the graphics backend this
//! crate targets, not here.

use crate::format::Format;
use crate::image_surface::ImageSurface;
use crate::rect::Rect;
use crate::status::{Error, Status};

fn mul_div_255(x: u8, y: u8) -> u8 {
    ((x as u32 * y as u32 + 127) / 255) as u8
}

/// Clamp and premultiply f64 components into ARGB bytes.
fn premultiply(r: f64, g: f64, b: f64, a: f64) -> (u8, u8, u8, u8) {
    let a = a.clamp(0.0, 1.0);
    let to_byte = |c: f64| (c.clamp(0.0, 1.0) * a * 255.0 + 0.5) as u8;
    (
        (a * 255.0 + 0.5) as u8,
        to_byte(r),
        to_byte(g),
        to_byte(b),
    )
}

/// Fill the whole surface with one color.
pub fn paint(surface: &mut ImageSurface, r: f64, g: f64, b: f64, a: f64) -> Result<(), Error> {
    let bounds = surface.bounds();
    fill_rect(surface, bounds, r, g, b, a)
}

/// Source-over fill of an axis-aligned rectangle, clipped to the
/// surface bounds. Color components are in `0.0..=1.0`.
pub fn fill_rect(
    surface: &mut ImageSurface,
    rect: Rect,
    r: f64,
    g: f64,
    b: f64,
    a: f64,
) -> Result<(), Error> {
    surface.check()?;
    let clipped = rect.intersect(surface.bounds());
    if clipped.is_empty() {
        return Ok(());
    }

    let (sa, sr, sg, sb) = premultiply(r, g, b, a);
    let inv = 255 - sa;
    let stride = surface.stride();
    let format = surface.format();
    let data = surface.data_mut()?;

    match format {
        Format::A8 => {
            for y in clipped.y..clipped.bottom() {
                let row = y as usize * stride;
                for px in &mut data[row + clipped.x as usize..row + clipped.right() as usize] {
                    *px = sa + mul_div_255(*px, inv);
                }
            }
        }
        Format::ARgb32 | Format::Rgb24 => {
            let word = ((sa as u32) << 24 | (sr as u32) << 16 | (sg as u32) << 8 | sb as u32)
                .to_ne_bytes();
            for y in clipped.y..clipped.bottom() {
                let row = y as usize * stride;
                let span = &mut data[row + clipped.x as usize * 4..row + clipped.right() as usize * 4];
                if sa == 255 {
                    for px in span.chunks_exact_mut(4) {
                        px.copy_from_slice(&word);
                    }
                } else {
                    // premultiplied source-over per byte; src + dst*inv
                    // never overflows because src is premultiplied
                    for px in span.chunks_exact_mut(4) {
                        for (d, s) in px.iter_mut().zip(word) {
                            *d = s + mul_div_255(*d, inv);
                        }
                    }
                }
            }
        }
    }

    surface.mark_dirty_rect(clipped);
    Ok(())
}

/// Copy a whole source surface into the destination at an offset,
/// clipped on all sides. Formats must match.
pub fn blit(dst: &mut ImageSurface, src: &ImageSurface, dst_x: i32, dst_y: i32) -> Result<(), Error> {
    src.check()?;
    let written = copy_rect(dst, src, src.bounds(), dst_x, dst_y)?;
    dst.mark_dirty_rect(written);
    Ok(())
}

/// Row-copy `src_rect` of `src` so that its origin lands at
/// `(dst_x, dst_y)` in `dst`. Returns the rectangle actually written,
/// in destination coordinates. Does not touch damage tracking.
pub(crate) fn copy_rect(
    dst: &mut ImageSurface,
    src: &ImageSurface,
    src_rect: Rect,
    dst_x: i32,
    dst_y: i32,
) -> Result<Rect, Error> {
    dst.check()?;
    if dst.format() != src.format() {
        return Err(Error::Status(Status::InvalidFormat));
    }

    // map src coordinates into dst coordinates, clip in both spaces
    let ox = dst_x - src_rect.x;
    let oy = dst_y - src_rect.y;
    let placed = src_rect
        .intersect(src.bounds())
        .translate(ox, oy)
        .intersect(dst.bounds());
    if placed.is_empty() {
        return Ok(Rect::new(dst_x, dst_y, 0, 0));
    }
    let from = placed.translate(-ox, -oy);

    let bpp = src.format().bytes_per_pixel();
    let src_stride = src.stride();
    let dst_stride = dst.stride();
    let row_bytes = placed.width as usize * bpp;

    let src_data = src.data();
    let dst_data = dst.data_mut()?;
    for row in 0..placed.height as usize {
        let so = (from.y as usize + row) * src_stride + from.x as usize * bpp;
        let dd = (placed.y as usize + row) * dst_stride + placed.x as usize * bpp;
        dst_data[dd..dd + row_bytes].copy_from_slice(&src_data[so..so + row_bytes]);
    }
    Ok(placed)
}

use image::{ImageBuffer, Rgba};

use crate::image_surface::ImageSurface;
use crate::rect::Rect;
use crate::render::blit;
use crate::status::Error;
use crate::Format;

/// Convert a surface into straight-alpha RGBA for the encoders.
///
/// `ARgb32` is un-premultiplied, `Rgb24` becomes opaque, `A8` is
/// rendered as an opaque grayscale coverage map.
pub(super) fn surface_to_rgba(
    surface: &ImageSurface,
) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, Error> {
    surface.check()?;

    let width = surface.width() as u32;
    let height = surface.height() as u32;
    let stride = surface.stride();
    let data = surface.data();

    let mut rgba: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let px = match surface.format() {
                Format::A8 => {
                    let a = data[y as usize * stride + x as usize];
                    Rgba([a, a, a, 255])
                }
                Format::ARgb32 | Format::Rgb24 => {
                    let offset = y as usize * stride + x as usize * 4;
                    let word = u32::from_ne_bytes(
                        data[offset..offset + 4].try_into().expect("4 byte pixel"),
                    );
                    let (a, r, g, b) = (
                        (word >> 24) & 0xff,
                        (word >> 16) & 0xff,
                        (word >> 8) & 0xff,
                        word & 0xff,
                    );
                    match surface.format() {
                        Format::Rgb24 => Rgba([r as u8, g as u8, b as u8, 255]),
                        _ if a == 0 => Rgba([0, 0, 0, 0]),
                        _ => {
                            let un = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
                            Rgba([un(r), un(g), un(b), a as u8])
                        }
                    }
                }
            };
            rgba.put_pixel(x, y, px);
        }
    }
    Ok(rgba)
}

/// Compose placed surfaces into one `ARgb32` canvas sized to their
/// bounding box. Returns `None` when there is nothing to compose.
pub fn compose(outputs: &[(ImageSurface, i32, i32)]) -> Result<Option<ImageSurface>, Error> {
    let mut bounds: Option<Rect> = None;
    for (surface, x, y) in outputs {
        surface.check()?;
        let placed = surface.bounds().translate(*x, *y);
        if placed.is_empty() {
            continue;
        }
        bounds = Some(match bounds {
            Some(b) => b.union(placed),
            None => placed,
        });
    }

    let Some(bounds) = bounds else {
        return Ok(None);
    };

    let mut canvas = ImageSurface::create(Format::ARgb32, bounds.width, bounds.height)?;
    for (surface, x, y) in outputs {
        blit(&mut canvas, surface, x - bounds.x, y - bounds.y)?;
    }
    Ok(Some(canvas))
}

use image::{ImageBuffer, Rgb};
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::image_surface::ImageSurface;
use crate::status::Error;

use super::common::surface_to_rgba;

/// Encode the surface as JPEG at `path`. Alpha is dropped after
/// un-premultiplying. Refuses to overwrite.
pub fn save_to_jpg(surface: &ImageSurface, path: &Path, quality: u8) -> Result<(), Error> {
    let rgba = surface_to_rgba(surface)?;
    let (width, height) = rgba.dimensions();

    let mut rgb_buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (x, y, px) in rgba.enumerate_pixels() {
        rgb_buffer.put_pixel(x, y, Rgb([px[0], px[1], px[2]]));
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    let mut jpeg_data = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_data, quality);
    encoder.encode(
        rgb_buffer.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;

    file.write_all(&jpeg_data)?;
    file.flush()?;
    debug!("wrote {} jpeg bytes to {}", jpeg_data.len(), path.display());

    Ok(())
}

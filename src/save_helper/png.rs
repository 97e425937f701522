use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::image_surface::ImageSurface;
use crate::status::Error;

use super::common::surface_to_rgba;

/// Encode the surface as PNG at `path`. Refuses to overwrite.
pub fn save_to_png(surface: &ImageSurface, path: &Path) -> Result<(), Error> {
    let rgba = surface_to_rgba(surface)?;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data).write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    file.write_all(&png_data)?;
    file.flush()?;
    debug!("wrote {} png bytes to {}", png_data.len(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::paint;
    use crate::Format;

    #[test]
    fn refuses_to_overwrite() {
        let dir = std::env::temp_dir().join("platen-png-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("existing.png");
        std::fs::write(&path, b"taken").unwrap();

        let mut surface = ImageSurface::create(Format::ARgb32, 2, 2).unwrap();
        paint(&mut surface, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert!(save_to_png(&surface, &path).is_err());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn writes_a_png_file() {
        let dir = std::env::temp_dir().join("platen-png-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("out-{}.png", std::process::id()));
        std::fs::remove_file(&path).ok();

        let mut surface = ImageSurface::create(Format::ARgb32, 3, 3).unwrap();
        paint(&mut surface, 0.2, 0.4, 0.6, 1.0).unwrap();
        save_to_png(&surface, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        std::fs::remove_file(&path).ok();
    }
}

mod config;

use log::{error, info};

use platen::render::{fill_rect, paint};
use platen::save_helper::{save_to_jpg, save_to_png};
use platen::{
    Drawable, Error, Format, ImageSurface, MemoryConnection, Rect, Status, Visual, XcbSurface,
};

use crate::config::{DemoConfig, ImageType};

fn main() {
    // init log
    env_logger::init();

    let config = DemoConfig::new();
    if let Err(e) = run(&config) {
        error!("render failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &DemoConfig) -> Result<(), Error> {
    let mut conn = MemoryConnection::new();

    let (format, visual) = if config.opaque {
        (Format::Rgb24, Visual::rgb24(0x21))
    } else {
        (Format::ARgb32, Visual::argb32(0x5c))
    };
    let drawable = conn.create_drawable(format, config.width, config.height)?;

    let mut surface = XcbSurface::new(conn, drawable, &visual, config.width, config.height)?;
    draw_test_card(surface.canvas_mut())?;
    surface.flush()?;

    let framebuffer = framebuffer(&surface, drawable)?;
    match config.image_type {
        ImageType::Png => save_to_png(framebuffer, &config.output_path)?,
        ImageType::Jpg => save_to_jpg(framebuffer, &config.output_path, config.quality)?,
    }
    info!("saved {}", config.output_path.display());

    Ok(())
}

fn framebuffer<'a>(
    surface: &'a XcbSurface<MemoryConnection>,
    drawable: Drawable,
) -> Result<&'a ImageSurface, Error> {
    surface
        .connection()
        .framebuffer(drawable)
        .ok_or(Error::Status(Status::DeviceError))
}

/// A plain test card: dark background, six color bars, a frame.
fn draw_test_card(canvas: &mut ImageSurface) -> Result<(), Error> {
    let width = canvas.width();
    let height = canvas.height();

    paint(canvas, 0.12, 0.12, 0.13, 1.0)?;

    let bars = [
        (1.0, 1.0, 1.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 1.0),
        (0.0, 1.0, 0.0),
        (1.0, 0.0, 1.0),
        (1.0, 0.0, 0.0),
    ];
    let bar_width = width / bars.len() as i32;
    let margin = height / 8;
    for (i, (r, g, b)) in bars.iter().enumerate() {
        let rect = Rect::new(
            i as i32 * bar_width,
            margin,
            bar_width,
            height - 2 * margin,
        );
        fill_rect(canvas, rect, *r, *g, *b, 0.9)?;
    }

    // 2px frame
    fill_rect(canvas, Rect::new(0, 0, width, 2), 1.0, 1.0, 1.0, 1.0)?;
    fill_rect(canvas, Rect::new(0, height - 2, width, 2), 1.0, 1.0, 1.0, 1.0)?;
    fill_rect(canvas, Rect::new(0, 0, 2, height), 1.0, 1.0, 1.0, 1.0)?;
    fill_rect(canvas, Rect::new(width - 2, 0, 2, height), 1.0, 1.0, 1.0, 1.0)?;

    Ok(())
}

//! Surfaces targeting an X drawable through a pluggable connection.
//!
//! The connection itself is a trait: actually speaking the windowing
//! protocol is out of scope here, so the crate ships only
//! [`MemoryConnection`], a software implementation with one framebuffer
//! per drawable. A real display connection implements [`Connection`]
//! the same way.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::format::Format;
use crate::image_surface::ImageSurface;
use crate::rect::Rect;
use crate::render;
use crate::status::{Error, Status};
use crate::visual::Visual;

/// A windowing-system identifier for a pixmap or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Drawable(pub u32);

/// The boundary a display connection must provide: a raw protocol
/// handle, and a way to push finished pixels onto a drawable.
pub trait Connection {
    /// Raw handle of the underlying protocol connection.
    fn raw_handle(&self) -> u64;

    /// Copy `rect` of `src` onto the drawable at the same position.
    fn present(&mut self, drawable: Drawable, src: &ImageSurface, rect: Rect) -> Result<(), Error>;
}

/// A rendering surface bound to one drawable of one connection.
///
/// Drawing happens on the backing canvas; [`XcbSurface::flush`]
/// presents the damaged region through the connection.
#[derive(Debug)]
pub struct XcbSurface<C: Connection> {
    conn: C,
    drawable: Drawable,
    visual: Visual,
    canvas: ImageSurface,
}

impl<C: Connection> XcbSurface<C> {
    /// Create a surface targeting `drawable`. The visual decides the
    /// pixel format of the backing canvas.
    pub fn new(
        conn: C,
        drawable: Drawable,
        visual: &Visual,
        width: i32,
        height: i32,
    ) -> Result<Self, Error> {
        let format = visual.format()?;
        let canvas = ImageSurface::create(format, width, height)?;
        debug!(
            "surface on drawable {:#x}: {width}x{height}, visual {:#x}, conn {:#x}",
            drawable.0,
            visual.id,
            conn.raw_handle()
        );
        Ok(Self {
            conn,
            drawable,
            visual: *visual,
            canvas,
        })
    }

    pub fn drawable(&self) -> Drawable {
        self.drawable
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    pub fn format(&self) -> Format {
        self.canvas.format()
    }

    pub fn width(&self) -> i32 {
        self.canvas.width()
    }

    pub fn height(&self) -> i32 {
        self.canvas.height()
    }

    pub fn status(&self) -> Status {
        self.canvas.status()
    }

    pub fn check(&self) -> Result<(), Error> {
        self.canvas.check()
    }

    /// The backing canvas, for drawing.
    pub fn canvas(&self) -> &ImageSurface {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut ImageSurface {
        &mut self.canvas
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Inform the surface of the new size of the drawable underneath.
    ///
    /// For a surface created for a window this must be called each time
    /// the window changes size; a pixmap can never change size, so for
    /// pixmap drawables this is never needed. The overlapping region of
    /// the old canvas is preserved. Ends with the status check, so an
    /// invalid size surfaces here and on every later call.
    pub fn set_size(&mut self, width: i32, height: i32) -> Result<(), Error> {
        if self.canvas.status().is_success() {
            if width < 0 || height < 0 {
                warn!("rejecting resize to {width}x{height}");
                self.canvas.set_status(Status::InvalidSize);
            } else if width != self.canvas.width() || height != self.canvas.height() {
                self.resize_canvas(width, height);
            }
        }
        self.check()
    }

    fn resize_canvas(&mut self, width: i32, height: i32) {
        match ImageSurface::create(self.canvas.format(), width, height) {
            Ok(mut next) => {
                let keep = next.bounds().intersect(self.canvas.bounds());
                if !keep.is_empty() {
                    // same format by construction, cannot fail
                    if let Err(e) = render::copy_rect(&mut next, &self.canvas, keep, keep.x, keep.y)
                    {
                        warn!("resize copy failed: {e}");
                    }
                }
                // the whole drawable needs a re-present after a resize
                next.mark_dirty();
                debug!(
                    "drawable {:#x} resized to {width}x{height}",
                    self.drawable.0
                );
                self.canvas = next;
            }
            Err(e) => {
                self.canvas
                    .set_status(e.status().unwrap_or(Status::NoMemory));
            }
        }
    }

    /// Present the damaged region through the connection. Clean
    /// surfaces present nothing.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.check()?;
        let Some(rect) = self.canvas.take_dirty() else {
            trace!("flush with no damage, skipping");
            return Ok(());
        };
        trace!(
            "presenting {}x{}+{}+{} to drawable {:#x}",
            rect.width, rect.height, rect.x, rect.y, self.drawable.0
        );
        self.conn.present(self.drawable, &self.canvas, rect)
    }

    /// Finish the surface; the connection is handed back to the caller.
    pub fn finish(mut self) -> C {
        self.canvas.finish();
        self.conn
    }
}

/// Software connection keeping one framebuffer per drawable. Stands in
/// for a display connection in tests and in the demo binary.
#[derive(Debug)]
pub struct MemoryConnection {
    next_id: u32,
    framebuffers: HashMap<u32, ImageSurface>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            framebuffers: HashMap::new(),
        }
    }

    /// Allocate a drawable backed by a zero-filled framebuffer.
    pub fn create_drawable(
        &mut self,
        format: Format,
        width: i32,
        height: i32,
    ) -> Result<Drawable, Error> {
        let fb = ImageSurface::create(format, width, height)?;
        let id = self.next_id;
        self.next_id += 1;
        self.framebuffers.insert(id, fb);
        Ok(Drawable(id))
    }

    pub fn framebuffer(&self, drawable: Drawable) -> Option<&ImageSurface> {
        self.framebuffers.get(&drawable.0)
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    fn raw_handle(&self) -> u64 {
        self as *const Self as u64
    }

    fn present(&mut self, drawable: Drawable, src: &ImageSurface, rect: Rect) -> Result<(), Error> {
        let fb = self
            .framebuffers
            .get_mut(&drawable.0)
            .ok_or(Error::Status(Status::DeviceError))?;
        render::copy_rect(fb, src, rect, rect.x, rect.y)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{fill_rect, paint};

    fn argb_surface(width: i32, height: i32) -> XcbSurface<MemoryConnection> {
        let mut conn = MemoryConnection::new();
        let drawable = conn
            .create_drawable(Format::ARgb32, width, height)
            .unwrap();
        XcbSurface::new(conn, drawable, &Visual::argb32(0x5c), width, height).unwrap()
    }

    fn fb_pixel(conn: &MemoryConnection, drawable: Drawable, x: i32, y: i32) -> u32 {
        let fb = conn.framebuffer(drawable).unwrap();
        let offset = y as usize * fb.stride() + x as usize * 4;
        u32::from_ne_bytes(fb.data()[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn construction_with_valid_arguments_succeeds() {
        let surface = argb_surface(8, 6);
        assert_eq!(surface.width(), 8);
        assert_eq!(surface.height(), 6);
        assert_eq!(surface.format(), Format::ARgb32);
        assert!(surface.check().is_ok());
    }

    #[test]
    fn visual_decides_the_canvas_format() {
        let mut conn = MemoryConnection::new();
        let drawable = conn.create_drawable(Format::Rgb24, 4, 4).unwrap();
        let surface = XcbSurface::new(conn, drawable, &Visual::rgb24(0x21), 4, 4).unwrap();
        assert_eq!(surface.format(), Format::Rgb24);
    }

    #[test]
    fn untranslatable_visual_fails_construction() {
        let mut conn = MemoryConnection::new();
        let drawable = conn.create_drawable(Format::ARgb32, 4, 4).unwrap();
        let bad = Visual {
            depth: 16,
            ..Visual::rgb24(0x99)
        };
        let err = XcbSurface::new(conn, drawable, &bad, 4, 4).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidVisual));
    }

    #[test]
    fn flush_presents_only_damage() {
        let mut surface = argb_surface(8, 8);
        fill_rect(
            surface.canvas_mut(),
            Rect::new(2, 2, 3, 3),
            1.0,
            0.0,
            0.0,
            1.0,
        )
        .unwrap();
        surface.flush().unwrap();

        let drawable = surface.drawable();
        let conn = surface.connection();
        assert_eq!(fb_pixel(conn, drawable, 2, 2), 0xffff_0000);
        assert_eq!(fb_pixel(conn, drawable, 4, 4), 0xffff_0000);
        assert_eq!(fb_pixel(conn, drawable, 5, 5), 0);
        assert_eq!(fb_pixel(conn, drawable, 1, 1), 0);
    }

    #[test]
    fn flush_without_damage_is_a_no_op() {
        let mut surface = argb_surface(4, 4);
        surface.flush().unwrap();
        // a second flush right after a flush also does nothing
        paint(surface.canvas_mut(), 1.0, 1.0, 1.0, 1.0).unwrap();
        surface.flush().unwrap();
        surface.flush().unwrap();
    }

    #[test]
    fn set_size_reports_new_dimensions_and_preserves_pixels() {
        let mut surface = argb_surface(4, 4);
        paint(surface.canvas_mut(), 0.0, 0.0, 1.0, 1.0).unwrap();
        surface.set_size(6, 3).unwrap();

        assert_eq!(surface.width(), 6);
        assert_eq!(surface.height(), 3);

        let canvas = surface.canvas();
        let offset = 2 * canvas.stride() + 3 * 4;
        let px = u32::from_ne_bytes(canvas.data()[offset..offset + 4].try_into().unwrap());
        assert_eq!(px, 0xff00_00ff, "old pixels survive inside the overlap");
        let offset = 2 * canvas.stride() + 5 * 4;
        let px = u32::from_ne_bytes(canvas.data()[offset..offset + 4].try_into().unwrap());
        assert_eq!(px, 0, "grown area starts cleared");
    }

    #[test]
    fn set_size_to_same_dimensions_changes_nothing() {
        let mut surface = argb_surface(4, 4);
        paint(surface.canvas_mut(), 1.0, 0.0, 0.0, 1.0).unwrap();
        surface.canvas_mut().take_dirty();
        surface.set_size(4, 4).unwrap();
        // no resize, so no fresh damage either
        assert_eq!(surface.canvas_mut().take_dirty(), None);
    }

    #[test]
    fn invalid_resize_is_sticky() {
        let mut surface = argb_surface(4, 4);
        let err = surface.set_size(-1, 4).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSize));

        // every later operation keeps failing with the recorded status
        let err = surface.set_size(4, 4).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSize));
        let err = surface.flush().unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSize));
    }

    #[test]
    fn present_to_unknown_drawable_is_a_device_error() {
        let mut conn = MemoryConnection::new();
        let src = ImageSurface::create(Format::ARgb32, 2, 2).unwrap();
        let err = conn
            .present(Drawable(0xdead), &src, Rect::new(0, 0, 2, 2))
            .unwrap_err();
        assert_eq!(err.status(), Some(Status::DeviceError));
    }

    #[test]
    fn finish_returns_the_connection() {
        let surface = argb_surface(2, 2);
        let drawable = surface.drawable();
        let conn = surface.finish();
        assert!(conn.framebuffer(drawable).is_some());
    }
}

//! In-memory pixel surfaces. Every drawing target in this crate is
//! ultimately backed by one of these.

use log::trace;

use crate::format::Format;
use crate::rect::Rect;
use crate::status::{Error, Status};

/// A pixel buffer with a format, dimensions and a sticky status code.
///
/// Dimensions are `i32` to match the signature of the native surface
/// constructors this type stands in for; negative values are rejected
/// with `InvalidSize`.
#[derive(Debug)]
pub struct ImageSurface {
    format: Format,
    width: i32,
    height: i32,
    stride: usize,
    data: Vec<u8>,
    status: Status,
    dirty: Option<Rect>,
}

impl ImageSurface {
    /// Create a zero-filled surface. A 0x0 surface is valid.
    pub fn create(format: Format, width: i32, height: i32) -> Result<Self, Error> {
        if width < 0 || height < 0 {
            return Err(Error::Status(Status::InvalidSize));
        }
        let stride = format.stride_for_width(width)?;
        let len = stride
            .checked_mul(height as usize)
            .ok_or(Error::Status(Status::NoMemory))?;
        trace!("image surface {width}x{height} stride {stride}");
        Ok(Self {
            format,
            width,
            height,
            stride,
            data: vec![0; len],
            status: Status::Success,
            dirty: None,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Raise on any sticky non-success code.
    pub fn check(&self) -> Result<(), Error> {
        self.status.check()
    }

    /// Record a non-success code. The first recorded code wins.
    pub(crate) fn set_status(&mut self, status: Status) {
        if self.status.is_success() {
            self.status = status;
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel access. Fails once the surface is finished or in
    /// an error state.
    pub fn data_mut(&mut self) -> Result<&mut [u8], Error> {
        self.check()?;
        Ok(&mut self.data)
    }

    /// Accumulate damage, clipped to the surface bounds.
    pub fn mark_dirty_rect(&mut self, rect: Rect) {
        let clipped = rect.intersect(self.bounds());
        if clipped.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(clipped),
            None => clipped,
        });
    }

    /// Damage the whole surface.
    pub fn mark_dirty(&mut self) {
        let bounds = self.bounds();
        self.mark_dirty_rect(bounds);
    }

    /// Take the accumulated damage, leaving the surface clean.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }

    /// Finish the surface. All later mutation fails with
    /// `SurfaceFinished`; read access stays available.
    pub fn finish(&mut self) {
        self.set_status(Status::SurfaceFinished);
    }
}

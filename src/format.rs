//! Pixel formats for image surfaces.

use crate::status::{Error, Status};

/// Memory layout of one pixel. `ARgb32` is premultiplied alpha in a
/// native-endian u32 word, `Rgb24` is the same word with the top byte
/// unused, `A8` is a single coverage byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    ARgb32,
    Rgb24,
    A8,
}

impl Format {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Format::ARgb32 | Format::Rgb24 => 4,
            Format::A8 => 1,
        }
    }

    /// Color depth of the matching visual.
    pub fn depth(self) -> u8 {
        match self {
            Format::ARgb32 => 32,
            Format::Rgb24 => 24,
            Format::A8 => 8,
        }
    }

    /// Row length in bytes, padded to a 4 byte boundary.
    pub fn stride_for_width(self, width: i32) -> Result<usize, Error> {
        if width < 0 {
            return Err(Error::Status(Status::InvalidSize));
        }
        let unpadded = (width as usize)
            .checked_mul(self.bytes_per_pixel())
            .ok_or(Error::Status(Status::InvalidStride))?;
        let stride = unpadded
            .checked_add(3)
            .ok_or(Error::Status(Status::InvalidStride))?
            & !3;
        if stride > i32::MAX as usize {
            return Err(Error::Status(Status::InvalidStride));
        }
        Ok(stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_matches_the_visual_side() {
        assert_eq!(Format::ARgb32.depth(), 32);
        assert_eq!(Format::Rgb24.depth(), 24);
        assert_eq!(Format::A8.depth(), 8);
    }

    #[test]
    fn stride_is_padded() {
        assert_eq!(Format::A8.stride_for_width(1).unwrap(), 4);
        assert_eq!(Format::A8.stride_for_width(5).unwrap(), 8);
        assert_eq!(Format::ARgb32.stride_for_width(3).unwrap(), 12);
        assert_eq!(Format::Rgb24.stride_for_width(0).unwrap(), 0);
    }

    #[test]
    fn stride_rejects_bad_widths() {
        let err = Format::ARgb32.stride_for_width(-1).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSize));

        let err = Format::ARgb32.stride_for_width(i32::MAX).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidStride));
    }
}

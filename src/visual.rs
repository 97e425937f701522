//! Windowing-system visual descriptions and their translation into a
//! pixel format the rendering core understands.

use crate::format::Format;
use crate::status::{Error, Status};

/// The X11 visual classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualClass {
    StaticGray,
    GrayScale,
    StaticColor,
    PseudoColor,
    TrueColor,
    DirectColor,
}

/// Description of a drawable's pixel layout, as the windowing system
/// advertises it per screen.
#[derive(Debug, Clone, Copy)]
pub struct Visual {
    /// Visual identifier (an XID).
    pub id: u32,
    pub class: VisualClass,
    pub depth: u8,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub bits_per_rgb: u8,
}

impl Visual {
    /// The standard depth-24 packed-RGB visual.
    pub fn rgb24(id: u32) -> Self {
        Self {
            id,
            class: VisualClass::TrueColor,
            depth: 24,
            red_mask: 0x00ff_0000,
            green_mask: 0x0000_ff00,
            blue_mask: 0x0000_00ff,
            bits_per_rgb: 8,
        }
    }

    /// The depth-32 visual composited windows use for per-pixel alpha.
    pub fn argb32(id: u32) -> Self {
        Self {
            depth: 32,
            ..Self::rgb24(id)
        }
    }

    /// Translate this visual into a surface format.
    ///
    /// Only decomposed-mask visuals with the packed 8-bit-per-channel
    /// layout translate; everything else reports `InvalidVisual`.
    pub fn format(&self) -> Result<Format, Error> {
        match self.class {
            VisualClass::TrueColor | VisualClass::DirectColor => {}
            _ => return Err(Error::Status(Status::InvalidVisual)),
        }
        let masks = (self.red_mask, self.green_mask, self.blue_mask);
        if masks != (0x00ff_0000, 0x0000_ff00, 0x0000_00ff) {
            return Err(Error::Status(Status::InvalidVisual));
        }
        match self.depth {
            24 => Ok(Format::Rgb24),
            32 => Ok(Format::ARgb32),
            _ => Err(Error::Status(Status::InvalidVisual)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_visuals_translate() {
        assert_eq!(Visual::rgb24(0x21).format().unwrap(), Format::Rgb24);
        assert_eq!(Visual::argb32(0x5c).format().unwrap(), Format::ARgb32);
    }

    #[test]
    fn paletted_visual_is_rejected() {
        let visual = Visual {
            class: VisualClass::PseudoColor,
            ..Visual::rgb24(0x22)
        };
        let err = visual.format().unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidVisual));
    }

    #[test]
    fn odd_masks_are_rejected() {
        let visual = Visual {
            red_mask: 0x0000_001f,
            green_mask: 0x0000_07e0,
            blue_mask: 0x0000_f800,
            depth: 16,
            ..Visual::rgb24(0x23)
        };
        assert!(visual.format().is_err());
    }

    #[test]
    fn unsupported_depth_is_rejected() {
        let visual = Visual {
            depth: 30,
            ..Visual::rgb24(0x24)
        };
        assert!(visual.format().is_err());
    }
}

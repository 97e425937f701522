//! Minimal 2D rendering surface abstraction targeting X drawables.
//!
//! The crate provides in-memory pixel surfaces with cairo-style formats
//! and stride rules, translation of windowing-system visuals into those
//! formats, and a surface type bound to a drawable of a pluggable
//! [`Connection`]. Speaking the windowing protocol itself is out of
//! scope; a software [`MemoryConnection`] is included for tests and
//! offline rendering.

pub mod format;
pub mod image_surface;
pub mod rect;
pub mod render;
pub mod save_helper;
pub mod status;
pub mod visual;
pub mod xcb_surface;

pub use format::Format;
pub use image_surface::ImageSurface;
pub use rect::Rect;
pub use status::{Error, Status};
pub use visual::{Visual, VisualClass};
pub use xcb_surface::{Connection, Drawable, MemoryConnection, XcbSurface};

//! INFO: Provides wrappers for output to fs
mod common;
mod jpg;
mod png;

pub use common::compose;
pub use jpg::save_to_jpg;
pub use png::save_to_png;

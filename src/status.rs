//! Surface status codes and the crate error type.

use thiserror::Error;

/// Status recorded on a surface. Statuses are sticky: once a surface
/// records a non-success code it keeps it for the rest of its life, and
/// every later operation on the surface fails the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Success,
    NoMemory,
    InvalidSize,
    InvalidStride,
    InvalidFormat,
    InvalidVisual,
    SurfaceFinished,
    WriteError,
    DeviceError,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Raise on any non-success code.
    pub fn check(self) -> Result<(), Error> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::Status(self))
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Success => "success",
            Status::NoMemory => "out of memory",
            Status::InvalidSize => "invalid size",
            Status::InvalidStride => "invalid stride",
            Status::InvalidFormat => "invalid format",
            Status::InvalidVisual => "visual has no matching format",
            Status::SurfaceFinished => "surface has been finished",
            Status::WriteError => "error while writing output",
            Status::DeviceError => "unknown drawable or dead connection",
        };
        f.write_str(s)
    }
}

/// Errors produced by surface operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("surface status: {0}")]
    Status(Status),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),
}

impl Error {
    /// The status code behind this error, if it is a status error.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Status(s) => Some(*s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_checks_clean() {
        assert!(Status::Success.check().is_ok());
        assert!(Status::Success.is_success());
    }

    #[test]
    fn non_success_raises() {
        let err = Status::InvalidSize.check().unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSize));
    }
}

//! Error types for uxlens core.

use std::{error::Error, fmt, io};

/// Error type for uxlens core operations.
#[derive(Debug)]
pub enum UxLensError {
    /// A color value could not be parsed as hex or `rgb()`/`rgba()` notation.
    InvalidColor(String),
    /// An underlying I/O error.
    Io(io::Error),
    /// A JSON document could not be read or written.
    Json(serde_json::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for UxLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor(value) => write!(f, "invalid color: {value:?}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for UxLensError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidColor(_) | Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for UxLensError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for UxLensError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for uxlens core.
pub type Result<T> = std::result::Result<T, UxLensError>;

#[cfg(test)]
mod tests {
    use super::UxLensError;
    use std::error::Error;
    use std::io;

    #[test]
    fn invalid_color_quotes_input() {
        let error = UxLensError::InvalidColor("#12".to_string());
        assert_eq!(format!("{error}"), "invalid color: \"#12\"");
    }

    #[test]
    fn io_error_formats_message() {
        let error = UxLensError::Io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(format!("{error}"), "io error: boom");
        assert!(error.source().is_some());
    }

    #[test]
    fn other_error_formats_message() {
        let error = UxLensError::Other("uxlens failed".to_string());
        assert_eq!(format!("{error}"), "uxlens failed");
        assert!(error.source().is_none());
    }

    #[test]
    fn from_json_error_maps_variant() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: UxLensError = parse.into();
        assert!(matches!(error, UxLensError::Json(_)));
        assert!(format!("{error}").starts_with("json error:"));
    }

    #[test]
    fn from_io_error_maps_variant() {
        let error: UxLensError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        match error {
            UxLensError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io variant, got {other:?}"),
        }
    }
}

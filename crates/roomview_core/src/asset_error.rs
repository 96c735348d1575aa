//! Asset error types

use std::fmt;
use std::io;

/// Error type for asset operations
#[derive(Debug)]
pub enum AssetError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid file format, malformed accessor data)
    Parse(String),
    /// Asset not found in the cache or on disk
    NotFound(String),
    /// Valid file using a feature this crate does not read
    Unsupported(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Parse(msg) => write!(f, "Asset parse error: {}", msg),
            AssetError::NotFound(path) => write!(f, "Asset not found: {}", path),
            AssetError::Unsupported(what) => write!(f, "Unsupported asset feature: {}", what),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<gltf::Error> for AssetError {
    fn from(err: gltf::Error) -> Self {
        match err {
            gltf::Error::Io(io) => AssetError::Io(io),
            other => AssetError::Parse(other.to_string()),
        }
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Parse(msg)
    }
}

impl From<&str> for AssetError {
    fn from(msg: &str) -> Self {
        AssetError::Parse(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let asset_err = AssetError::Io(io::Error::new(io::ErrorKind::NotFound, "file missing"));
        let msg = format!("{}", asset_err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn test_unsupported_display() {
        let msg = AssetError::Unsupported("morph targets".to_string()).to_string();
        assert!(msg.contains("morph targets"));
    }

    #[test]
    fn test_from_gltf_io_keeps_kind() {
        let err: AssetError = gltf::Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "nope")).into();
        match err {
            AssetError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let asset_err = AssetError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(asset_err.source().is_some());
        assert!(AssetError::Parse("bad".to_string()).source().is_none());
    }

    #[test]
    fn test_from_str() {
        match AssetError::from("bad data") {
            AssetError::Parse(msg) => assert_eq!(msg, "bad data"),
            other => panic!("Expected Parse variant, got {other:?}"),
        }
    }
}

use std::io;

/// All error types for the scene octree.
#[derive(thiserror::Error, Debug)]
pub enum OctreeError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OctreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let e = OctreeError::Validation("x1 > x2".into());
        assert_eq!(e.to_string(), "Validation error: x1 > x2");

        let e = OctreeError::OutOfBounds("outside root".into());
        assert_eq!(e.to_string(), "Out of bounds: outside root");

        let e = OctreeError::Input("duplicate node".into());
        assert_eq!(e.to_string(), "Input error: duplicate node");

        let e = OctreeError::Output("disk full".into());
        assert_eq!(e.to_string(), "Output error: disk full");
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let e: OctreeError = io_err.into();
        assert!(matches!(e, OctreeError::Io(_)));
        assert!(e.to_string().contains("file missing"));
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: OctreeError = json_err.into();
        assert!(matches!(e, OctreeError::Json(_)));
    }
}

//! Local media loading for multimodal prompts

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::debug;

/// Errors from reading and encoding local media files
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read image from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported image format for {path:?} - expected png, jpg, gif, or webp")]
    UnsupportedFormat { path: PathBuf },
}

/// Read a local image file and encode it as a base64 data URI suitable for
/// an `image_url` content part.
pub fn image_to_data_uri(path: &Path) -> Result<String, MediaError> {
    let mime = mime_for(path).ok_or_else(|| MediaError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let bytes = fs::read(path).map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), mime, bytes = bytes.len(), "Encoded image as data URI");
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn encodes_png_with_mime_prefix() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("pixel.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).expect("write image");

        let uri = image_to_data_uri(&path).expect("encode");
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(uri, format!("data:image/png;base64,{}", STANDARD.encode([0x89, b'P', b'N', b'G'])));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"text").expect("write file");

        let result = image_to_data_uri(&path);
        assert!(matches!(result, Err(MediaError::UnsupportedFormat { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = image_to_data_uri(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(MediaError::Io { .. })));
    }
}

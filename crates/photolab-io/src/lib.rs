//! photolab-io: Filesystem edge of the photo editor.
//!
//! Reads image files into the pipeline's in-memory model and writes
//! edited images back out. All decoding and encoding is delegated to
//! `photolab_pipeline::codec`; this crate only moves bytes.

use std::path::{Path, PathBuf};

use photolab_pipeline::{ExportFormat, PipelineError, RgbImage};
use tracing::info;

/// Extension appended when a save path has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// File extensions that can be opened and saved.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Errors that can occur while loading or saving image files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Reading or writing the file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Decoding, encoding, or format selection failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Whether `path` has an extension this crate can open and save,
/// ignoring ASCII case.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Read and decode the image at `path`.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be read, or
/// [`IoError::Pipeline`] if it is empty or not a decodable image.
pub fn load_image(path: &Path) -> Result<RgbImage, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = photolab_pipeline::decode(&bytes)?;
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    Ok(image)
}

/// Resolve the path an image will actually be written to: a path
/// without an extension gets [`DEFAULT_EXTENSION`].
#[must_use]
pub fn resolve_save_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Encode `image` in the format named by the extension of `path` and
/// write it. Returns the path written, which differs from `path` only
/// when the default extension was appended.
///
/// # Errors
///
/// Returns [`IoError::Pipeline`] for an unsupported extension or an
/// encoder failure, or [`IoError::Io`] if the file cannot be written.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<PathBuf, IoError> {
    let path = resolve_save_path(path);
    let format = ExportFormat::from_path(&path)?;
    let bytes = photolab_pipeline::encode(image, format)?;
    std::fs::write(&path, &bytes).map_err(|source| IoError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        path = %path.display(),
        %format,
        bytes = bytes.len(),
        "saved image"
    );
    Ok(path)
}

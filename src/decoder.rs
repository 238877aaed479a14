use std::path::Path;

use image::{ImageReader, RgbImage};
use tracing::trace;

use crate::CorrectionError;

/// Extensions offered by the open dialog; any path is still accepted for
/// decoding through the "All Files" filter.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            let extension = extension.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&extension.as_str())
        })
        .unwrap_or(false)
}

pub fn load_image(path: &Path) -> Result<RgbImage, CorrectionError> {
    trace!("decoding {:?}", path);
    let decoded = ImageReader::open(path)
        .map_err(|source| CorrectionError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(source),
        })?
        .decode()
        .map_err(|source| CorrectionError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decoded.to_rgb8())
}

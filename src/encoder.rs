use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::trace;

use crate::CorrectionError;

/// Fixed jpeg quality for saved output, out of 100.
pub const JPEG_QUALITY: u8 = 98;

pub fn save_jpeg(image: &RgbImage, path: &Path) -> Result<(), CorrectionError> {
    trace!(
        "encoding {}x{} jpeg to {:?}",
        image.width(),
        image.height(),
        path
    );
    let file = File::create(path).map_err(|source| CorrectionError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        .map_err(|source| CorrectionError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(|source| CorrectionError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn saved_jpeg_decodes_to_the_same_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = RgbImage::from_fn(320, 200, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        save_jpeg(&image, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (320, 200));
    }

    #[test]
    fn unwritable_destination_reports_a_write_error() {
        let image = RgbImage::new(4, 4);
        let error = save_jpeg(&image, Path::new("/nonexistent/directory/out.jpg")).unwrap_err();
        assert!(matches!(error, CorrectionError::Write { .. }));
    }
}

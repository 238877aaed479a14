pub mod camera;
pub mod decoder;
pub mod distortion;
pub mod draw;
pub mod encoder;
pub mod grid;
pub mod remap;
pub mod session;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("could not decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("undistortion rejected parameters: {reason}")]
    UndistortionFailed { reason: String },
    #[error("could not encode jpeg {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("could not write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

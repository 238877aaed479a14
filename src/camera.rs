use nalgebra::{Matrix3, Scalar};
use num_traits::Float;

use crate::CorrectionError;

pub const DEFAULT_FOCAL_LENGTH: f64 = 10.0;

/// Intrinsic matrix for the given pixel dimensions, principal point at the
/// image center.
pub fn build_camera_matrix<T: Float + Scalar>(
    width: u32,
    height: u32,
    focal_length: T,
) -> Result<Matrix3<T>, CorrectionError> {
    debug_assert!(width > 0 && height > 0, "camera matrix for empty image");
    if width == 0 || height == 0 {
        return Err(CorrectionError::InvalidDimension { width, height });
    }
    let two = T::from(2.0).unwrap();
    let mut camera = Matrix3::identity();
    camera[(0, 0)] = focal_length;
    camera[(1, 1)] = focal_length;
    camera[(0, 2)] = T::from(width).unwrap() / two;
    camera[(1, 2)] = T::from(height).unwrap() / two;
    Ok(camera)
}

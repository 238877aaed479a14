use image::{Rgb, RgbImage};
use num_traits::Float;
use tracing::trace;

use crate::CorrectionError;
use crate::camera::build_camera_matrix;
use crate::distortion::DistortionCoefficients;

/// Forward radial plus tangential displacement of a normalized image point.
/// The vector is ordered `[k1, k2, p1, p2, k3]`.
pub fn distort_point<T: Float>(x: T, y: T, distortion: &[T; 5]) -> (T, T) {
    let (k1, k2, p1, p2, k3) = (
        distortion[0],
        distortion[1],
        distortion[2],
        distortion[3],
        distortion[4],
    );
    let two = T::from(2.0).unwrap();
    let r2 = x * x + y * y;
    let radial = T::one() + k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2;
    let x_tangential = two * p1 * x * y + p2 * (r2 + two * x * x);
    let y_tangential = p1 * (r2 + two * y * y) + two * p2 * x * y;
    (x * radial + x_tangential, y * radial + y_tangential)
}

// normalize/denormalize round trips carry ulp noise; a boundary pixel must
// not be ejected by it
const EDGE_SLACK: f64 = 1e-6;

/// Bilinear sample at a fractional source location. None outside the image;
/// locations exactly on the boundary return the boundary pixel.
pub fn sample_bilinear(image: &RgbImage, x: f64, y: f64) -> Option<Rgb<u8>> {
    let (width, height) = image.dimensions();
    let max_x = f64::from(width - 1);
    let max_y = f64::from(height - 1);
    if !(x >= -EDGE_SLACK && x <= max_x + EDGE_SLACK && y >= -EDGE_SLACK && y <= max_y + EDGE_SLACK)
    {
        return None;
    }
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let tx = x - x.floor();
    let ty = y - y.floor();
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let p00 = image.get_pixel(x0, y0);
    let p10 = image.get_pixel(x1, y0);
    let p01 = image.get_pixel(x0, y1);
    let p11 = image.get_pixel(x1, y1);

    let w00 = (1.0 - tx) * (1.0 - ty);
    let w10 = tx * (1.0 - ty);
    let w01 = (1.0 - tx) * ty;
    let w11 = tx * ty;

    let mut blended = [0u8; 3];
    for (channel, value) in blended.iter_mut().enumerate() {
        let sum = w00 * f64::from(p00.0[channel])
            + w10 * f64::from(p10.0[channel])
            + w01 * f64::from(p01.0[channel])
            + w11 * f64::from(p11.0[channel]);
        *value = sum.round() as u8;
    }
    Some(Rgb(blended))
}

/// Every output pixel is normalized through the camera matrix, pushed
/// through the forward distortion model and sampled back from the source.
/// Source locations outside the image stay black.
pub fn correct(
    image: &RgbImage,
    coefficients: &DistortionCoefficients,
    focal_length: f64,
) -> Result<RgbImage, CorrectionError> {
    let (width, height) = image.dimensions();
    let camera = build_camera_matrix(width, height, focal_length)?;
    if !coefficients.is_finite() {
        return Err(CorrectionError::UndistortionFailed {
            reason: format!("non-finite coefficients {coefficients:?}"),
        });
    }
    if !focal_length.is_finite() || focal_length <= 0.0 {
        return Err(CorrectionError::UndistortionFailed {
            reason: format!("focal length {focal_length} is not a positive finite value"),
        });
    }
    trace!("remapping {}x{} image", width, height);

    let distortion = coefficients.as_vector();
    let (fx, fy) = (camera[(0, 0)], camera[(1, 1)]);
    let (cx, cy) = (camera[(0, 2)], camera[(1, 2)]);

    let mut corrected = RgbImage::new(width, height);
    for (u, v, pixel) in corrected.enumerate_pixels_mut() {
        let x = (f64::from(u) - cx) / fx;
        let y = (f64::from(v) - cy) / fy;
        let (xd, yd) = distort_point(x, y, &distortion);
        let source_x = xd * fx + cx;
        let source_y = yd * fy + cy;
        if let Some(sample) = sample_bilinear(image, source_x, source_y) {
            *pixel = sample;
        }
    }
    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distortion::Coefficient;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 7 % 256) as u8,
                (y * 11 % 256) as u8,
                ((x + y) * 3 % 256) as u8,
            ])
        })
    }

    #[test]
    fn zero_coefficients_barely_move_pixels() {
        let image = gradient_image(16, 12);
        let corrected = correct(&image, &DistortionCoefficients::new(), 10.0).unwrap();
        assert_eq!(corrected.dimensions(), image.dimensions());
        for (original, output) in image.pixels().zip(corrected.pixels()) {
            for channel in 0..3 {
                let difference =
                    i32::from(original.0[channel]) - i32::from(output.0[channel]);
                assert!(difference.abs() <= 1, "identity pass moved a pixel");
            }
        }
    }

    #[test]
    fn center_pixel_is_untouched_by_radial_terms() {
        let image = gradient_image(64, 48);
        let mut coefficients = DistortionCoefficients::new();
        coefficients.set_from_control(Coefficient::K1, 500);
        let corrected = correct(&image, &coefficients, 10.0).unwrap();
        assert_eq!(corrected.get_pixel(32, 24), image.get_pixel(32, 24));
    }

    #[test]
    fn corners_fill_black_under_barrel_correction() {
        let white = RgbImage::from_pixel(64, 48, Rgb([255, 255, 255]));
        let mut coefficients = DistortionCoefficients::new();
        coefficients.set_from_control(Coefficient::K1, 500);
        let corrected = correct(&white, &coefficients, 10.0).unwrap();
        for (u, v) in [(0, 0), (63, 0), (0, 47), (63, 47)] {
            assert_eq!(
                corrected.get_pixel(u, v),
                &Rgb([0, 0, 0]),
                "corner ({u}, {v}) sampled inside the source"
            );
        }
        assert_eq!(corrected.get_pixel(32, 24), &Rgb([255, 255, 255]));
    }

    #[test]
    fn non_finite_coefficients_are_rejected() {
        let image = gradient_image(8, 8);
        let mut coefficients = DistortionCoefficients::new();
        coefficients.k1 = f64::NAN;
        let error = correct(&image, &coefficients, 10.0).unwrap_err();
        assert!(matches!(
            error,
            CorrectionError::UndistortionFailed { .. }
        ));
    }

    #[test]
    fn invalid_focal_lengths_are_rejected() {
        let image = gradient_image(8, 8);
        let coefficients = DistortionCoefficients::new();
        assert!(correct(&image, &coefficients, 0.0).is_err());
        assert!(correct(&image, &coefficients, -10.0).is_err());
        assert!(correct(&image, &coefficients, f64::INFINITY).is_err());
    }

    #[test]
    fn bilinear_blends_the_four_neighbors() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([0, 0, 0]));
        image.put_pixel(1, 0, Rgb([100, 0, 0]));
        image.put_pixel(0, 1, Rgb([0, 200, 0]));
        image.put_pixel(1, 1, Rgb([100, 200, 0]));
        let sample = sample_bilinear(&image, 0.5, 0.5).unwrap();
        assert_eq!(sample, Rgb([50, 100, 0]));
    }

    #[test]
    fn boundary_locations_sample_the_boundary_pixel() {
        let image = gradient_image(5, 4);
        assert_eq!(
            sample_bilinear(&image, 4.0, 3.0).unwrap(),
            *image.get_pixel(4, 3)
        );
        assert_eq!(
            sample_bilinear(&image, 0.0, 0.0).unwrap(),
            *image.get_pixel(0, 0)
        );
    }

    #[test]
    fn odd_focal_lengths_keep_boundary_pixels() {
        // focal 7.3 lands column 0 a fraction of an ulp outside the image
        let white = RgbImage::from_pixel(1920, 8, Rgb([255, 255, 255]));
        let corrected = correct(&white, &DistortionCoefficients::new(), 7.3).unwrap();
        assert_eq!(corrected.get_pixel(0, 4), &Rgb([255, 255, 255]));
    }

    #[test]
    fn outside_locations_yield_nothing() {
        let image = gradient_image(5, 4);
        assert!(sample_bilinear(&image, -0.001, 0.0).is_none());
        assert!(sample_bilinear(&image, 4.001, 0.0).is_none());
        assert!(sample_bilinear(&image, 0.0, 3.001).is_none());
        assert!(sample_bilinear(&image, f64::NAN, 1.0).is_none());
    }

    #[test]
    fn distortion_vector_order_reaches_the_model() {
        // only k3 set: slot 4 must be the one that moves the point
        let distortion = [0.0, 0.0, 0.0, 0.0, 1.0e-3];
        let (xd, _) = distort_point(2.0, 0.0, &distortion);
        assert!(xd > 2.0);
        let unmoved = [0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(distort_point(2.0, 0.0, &unmoved), (2.0, 0.0));
    }
}

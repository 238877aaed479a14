use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::grid::{GridSpec, compute_lines};

// widths above one are drawn as parallel strokes shifted toward the far edge
pub fn draw_grid(image: &mut RgbImage, spec: &GridSpec) {
    let (width, height) = image.dimensions();
    let color = Rgb(spec.color);
    for (from, to) in compute_lines(width, height, spec.division) {
        let horizontal = from.y == to.y;
        for offset in 0..spec.line_width {
            if horizontal {
                let y = (from.y + offset) as f32;
                draw_line_segment_mut(image, (from.x as f32, y), (to.x as f32, y), color);
            } else {
                let x = (from.x + offset) as f32;
                draw_line_segment_mut(image, (x, from.y as f32), (x, to.y as f32), color);
            }
        }
    }
}

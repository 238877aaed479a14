use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Alignment grid settings. `division` is the number of cells per axis;
/// anything below 2 disables the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub division: i32,
    pub color: [u8; 3],
    pub line_width: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            division: 1,
            color: [0, 255, 0],
            line_width: 1,
        }
    }
}

/// Interior grid lines: `division - 1` horizontal and vertical segments at
/// `i * extent / division`, floored to pixel positions. The iterator is lazy
/// and cloneable so a caller can restart it; a division of one or less or an
/// empty canvas yields no lines.
pub fn compute_lines(
    width: u32,
    height: u32,
    division: i32,
) -> impl Iterator<Item = (Point2<u32>, Point2<u32>)> + Clone {
    let division = if width == 0 || height == 0 {
        1
    } else {
        division.max(1) as u32
    };
    let horizontal = (1..division).map(move |i| {
        // u64 keeps an absurd division count from overflowing the product
        let y = (u64::from(i) * u64::from(height) / u64::from(division)) as u32;
        (Point2::new(0, y), Point2::new(width - 1, y))
    });
    let vertical = (1..division).map(move |i| {
        let x = (u64::from(i) * u64::from(width) / u64::from(division)) as u32;
        (Point2::new(x, 0), Point2::new(x, height - 1))
    });
    horizontal.chain(vertical)
}

//! Test data generators for creating synthetic imagery.
//!
//! These generators create predictable, verifiable pixel patterns that can be
//! used across the test suite.

use fusion_common::{Image, Pixel, PixelType};

/// Creates test values with predictable contents.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that values[row * width + col] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::create_test_values;
///
/// let values = create_test_values(10, 5);
/// assert_eq!(values.len(), 50);
/// assert_eq!(values[1], 1000.0);  // col=1, row=0
/// assert_eq!(values[10], 1.0);    // col=0, row=1
/// ```
pub fn create_test_values(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a single-channel float32 image filled with [`create_test_values`].
pub fn create_test_image(width: usize, height: usize) -> Image {
    Image::from_vec(width, height, 1, create_test_values(width, height))
        .expect("generator produced wrong length")
}

/// Creates a single-channel image of any pixel type where every value is
/// `value`, saturated to the type's range.
pub fn create_constant_image<P: Pixel>(width: usize, height: usize, value: f64) -> Image {
    let values = vec![P::from_f64_saturating(value); width * height];
    Image::from_vec(width, height, 1, values).expect("generator produced wrong length")
}

/// Creates a reflectance-like gradient image (uint16, scaled by 10000).
///
/// Values grow from 500 (top-left) to 4500 (bottom-right), similar to
/// surface reflectance products.
pub fn create_reflectance_image(width: usize, height: usize) -> Image {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f64 / width.max(1) as f64;
            let y_factor = row as f64 / height.max(1) as f64;
            data.push(u16::from_f64_saturating(500.0 + 2000.0 * (x_factor + y_factor)));
        }
    }
    Image::from_vec(width, height, 1, data).expect("generator produced wrong length")
}

/// Creates a uint8 validity mask: 255 everywhere except the listed
/// `(col, row)` cells, which are 0.
pub fn create_mask(width: usize, height: usize, invalid: &[(usize, usize)]) -> Image {
    let mut data = vec![255u8; width * height];
    for &(col, row) in invalid {
        if col < width && row < height {
            data[row * width + col] = 0;
        }
    }
    Image::from_vec(width, height, 1, data).expect("generator produced wrong length")
}

/// Creates a zero-filled image of each pixel type, in [`PixelType::ALL`] order.
pub fn create_image_per_pixel_type(width: usize, height: usize) -> Vec<Image> {
    PixelType::ALL
        .iter()
        .map(|ty| Image::new(width, height, 1, *ty))
        .collect()
}

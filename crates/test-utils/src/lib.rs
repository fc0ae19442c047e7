//! Shared test utilities for the image fusion workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Image data generators
//! - Pre-populated store fixtures
//! - Approximate-equality assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that every value of a float image is within `epsilon` of the
/// matching value in `expected`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_image_approx_eq;
///
/// assert_image_approx_eq!(output, vec![1.0_f32, 2.0, 3.0, 4.0], 1e-6);
/// ```
#[macro_export]
macro_rules! assert_image_approx_eq {
    ($image:expr, $expected:expr, $epsilon:expr) => {{
        let actual: Vec<f32> = $image.to_vec::<f32>().expect("image is not float32");
        let expected: Vec<f32> = $expected;
        assert_eq!(actual.len(), expected.len(), "image size differs");
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            if (a - e).abs() as f64 > $epsilon as f64 {
                panic!(
                    "assertion failed: image value {} differs: `{:?}` vs expected `{:?}`",
                    i, a, e
                );
            }
        }
    }};
}

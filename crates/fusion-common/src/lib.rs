//! Common types shared across the image fusion workspace.

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::{FusionError, FusionResult};
pub use image::Image;
pub use pixel::{Pixel, PixelBuffer, PixelType};
pub use rect::Rectangle;

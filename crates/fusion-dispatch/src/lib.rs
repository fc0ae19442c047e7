//! Pixel-type dispatch and copyable fusors.
//!
//! Fusion algorithms are written generically over the input pixel type,
//! while the pixel type of the inputs is only known once they are loaded.
//! This crate connects the two:
//!
//! - [`dispatch_pixel_type`] maps a runtime [`PixelType`](fusion_common::PixelType)
//!   to a compile-time instantiation through a [`PixelTypeFactory`].
//! - [`StrategyAdapter`] holds one instantiation of a [`StrategyFamily`]
//!   behind the [`DataFusor`] interface and can be copied by rebuilding it.
//! - [`Parallelizer`] uses those copies to predict row stripes on a rayon
//!   pool.

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod fusor;
pub mod parallel;

pub use adapter::{FusorHandle, StrategyAdapter, StrategyFamily};
pub use config::ParallelConfig;
pub use dispatch::{dispatch_pixel_code, dispatch_pixel_type, PixelTypeFactory};
pub use fusor::{BaseOptions, DataFusor, FusionOptions};
pub use parallel::{Parallelizer, ParallelizerOptions};

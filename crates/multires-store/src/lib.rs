//! Multi-resolution image collections.
//!
//! Fusion inputs arrive from several sources at different resolutions and
//! acquisition dates. This crate organises them along both axes:
//!
//! ```text
//!            date ──►   20200101   20200117   20200202
//!  tag
//!   │   "L8"              img         ·          img
//!   ▼   "MODIS"           img        img         img
//! ```
//!
//! - [`KeyedStore`] is the generic (tag, date) → element map with partial-key
//!   queries and removals.
//! - [`ImageStore`] specialises it for [`Image`](fusion_common::Image)
//!   elements and adds the deep and shared-content copies used when handing
//!   inputs to parallel workers.
//!
//! # Example
//!
//! ```
//! use fusion_common::{Image, PixelType};
//! use multires_store::ImageStore;
//!
//! let mut store = ImageStore::new();
//! store.set("L8", 20200101, Image::new(64, 64, 1, PixelType::U16));
//! store.set("MODIS", 20200101, Image::new(64, 64, 1, PixelType::I16));
//!
//! assert_eq!(store.resolution_tags_at(20200101), vec!["L8", "MODIS"]);
//! assert_eq!(store.count_date(20200101), 2);
//! ```

pub mod image_store;
pub mod keyed_store;

pub use image_store::ImageStore;
pub use keyed_store::KeyedStore;

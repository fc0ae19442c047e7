//! Common test fixtures for image fusion tests.
//!
//! This module provides pre-defined stores that represent common fusion
//! scenarios: a fine, infrequent sensor paired with a coarse, daily one.

use fusion_common::Image;
use multires_store::ImageStore;

use crate::generators::{create_reflectance_image, create_test_image};

/// Resolution tags used throughout the tests.
pub mod tags {
    /// Fine resolution, infrequent (Landsat 8).
    pub const HIGH: &str = "L8";
    /// Coarse resolution, frequent (MODIS).
    pub const LOW: &str = "MODIS";
    /// A third source, sorted after both others.
    pub const EXTRA: &str = "S2";
}

/// Dates used throughout the tests (yyyymmdd).
pub mod dates {
    pub const D1: i32 = 20200101;
    pub const D2: i32 = 20200117;
    pub const D3: i32 = 20200202;
}

/// A store with a typical fusion pair layout:
///
/// ```text
///            D1    D2    D3
///  L8        x     ·     x
///  MODIS     x     x     x
/// ```
///
/// Every image is a `width` × `height` float32 test image.
pub fn fusion_pair_store(width: usize, height: usize) -> ImageStore {
    let mut store = ImageStore::new();
    for date in [dates::D1, dates::D3] {
        store.set(tags::HIGH, date, create_test_image(width, height));
    }
    for date in [dates::D1, dates::D2, dates::D3] {
        store.set(tags::LOW, date, create_test_image(width, height));
    }
    store
}

/// A store holding uint16 reflectance images under all three tags at
/// [`dates::D1`].
pub fn reflectance_store(width: usize, height: usize) -> ImageStore {
    [tags::HIGH, tags::LOW, tags::EXTRA]
        .into_iter()
        .map(|tag| (tag, dates::D1, create_reflectance_image(width, height)))
        .collect()
}

/// A store with a single empty image. Empty images are legitimate elements.
pub fn store_with_empty_image() -> ImageStore {
    let mut store = ImageStore::new();
    store.set(tags::HIGH, dates::D1, Image::default());
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_pair_layout() {
        let store = fusion_pair_store(4, 4);
        assert_eq!(store.count(), 5);
        assert_eq!(store.dates(tags::HIGH), vec![dates::D1, dates::D3]);
        assert_eq!(store.resolution_tags_at(dates::D2), vec![tags::LOW]);
    }

    #[test]
    fn test_reflectance_store() {
        let store = reflectance_store(8, 8);
        assert_eq!(store.count_date(dates::D1), 3);
        assert_eq!(store.resolution_tags(), vec!["L8", "MODIS", "S2"]);
    }

    #[test]
    fn test_store_with_empty_image() {
        let store = store_with_empty_image();
        assert!(store.has(tags::HIGH, dates::D1));
        assert!(store.get_any().unwrap().is_empty());
    }
}

//! Keyed store of images with two copy flavours.

use std::ops::{Deref, DerefMut};

use fusion_common::Image;
use tracing::debug;

use crate::keyed_store::KeyedStore;

/// A [`KeyedStore`] of [`Image`]s.
///
/// Dereferences to the underlying store for all query and mutation methods.
/// The plain [`Clone`] is a deep copy; see
/// [`clone_with_shared_image_copies`](Self::clone_with_shared_image_copies)
/// for the cheap variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStore {
    images: KeyedStore<Image>,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the store and every image's pixel content.
    ///
    /// Nothing is shared with `self` afterwards. Cost is proportional to the
    /// total pixel data.
    pub fn clone_with_cloned_images(&self) -> Self {
        self.clone()
    }

    /// Copy the key structure, sharing each image's pixel content.
    ///
    /// Pixel writes through an image of either store are visible in the
    /// other. Inserting or removing entries in one store does not affect the
    /// other. Cost is proportional to the number of images.
    pub fn clone_with_shared_image_copies(&self) -> Self {
        debug!(images = self.images.count(), "creating shared-content image store copy");
        Self {
            images: self.images.map_values(Image::shared_copy),
        }
    }

    /// Borrow the underlying keyed store.
    pub fn as_store(&self) -> &KeyedStore<Image> {
        &self.images
    }

    /// Unwrap into the underlying keyed store.
    pub fn into_inner(self) -> KeyedStore<Image> {
        self.images
    }
}

impl Deref for ImageStore {
    type Target = KeyedStore<Image>;

    fn deref(&self) -> &Self::Target {
        &self.images
    }
}

impl DerefMut for ImageStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.images
    }
}

impl From<KeyedStore<Image>> for ImageStore {
    fn from(images: KeyedStore<Image>) -> Self {
        Self { images }
    }
}

impl<S: Into<String>> FromIterator<(S, i32, Image)> for ImageStore {
    fn from_iter<I: IntoIterator<Item = (S, i32, Image)>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

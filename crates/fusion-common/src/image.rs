//! Raster image with reference-counted pixel content.
//!
//! An [`Image`] is a handle onto a pixel body. Two kinds of copies exist:
//!
//! - [`Clone`] duplicates the body. The copy is fully independent.
//! - [`Image::shared_copy`] creates a second handle onto the same body.
//!   Pixel writes through either handle are visible through both.
//!
//! Geometry (width, height, channels, pixel type) never changes after
//! construction, so handles sharing a body always agree on it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{FusionError, FusionResult};
use crate::pixel::{Pixel, PixelBuffer, PixelType};
use crate::rect::Rectangle;

/// A width × height × channels raster.
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    content: Arc<RwLock<PixelBuffer>>,
}

impl Image {
    /// Create a zero-filled image.
    ///
    /// # Panics
    ///
    /// Panics if the number of values overflows `usize`. Use
    /// [`try_new`](Self::try_new) for sizes that are not known to be sane.
    pub fn new(width: usize, height: usize, channels: usize, pixel_type: PixelType) -> Self {
        match Self::try_new(width, height, channels, pixel_type) {
            Ok(image) => image,
            Err(err) => panic!("{}", err),
        }
    }

    /// Create a zero-filled image, failing with
    /// [`FusionError::InvalidDimensions`] if its size overflows.
    pub fn try_new(
        width: usize,
        height: usize,
        channels: usize,
        pixel_type: PixelType,
    ) -> FusionResult<Self> {
        let len = value_count(width, height, channels)?;
        Ok(Self::from_buffer(
            width,
            height,
            channels,
            PixelBuffer::zeroed(pixel_type, len),
        ))
    }

    /// Create an image without pixels.
    pub fn empty(pixel_type: PixelType) -> Self {
        Self::new(0, 0, 1, pixel_type)
    }

    /// Create an image from interleaved values in row-major order.
    pub fn from_vec<P: Pixel>(
        width: usize,
        height: usize,
        channels: usize,
        values: Vec<P>,
    ) -> FusionResult<Self> {
        let expected = value_count(width, height, channels)?;
        if values.len() != expected {
            return Err(FusionError::InvalidDimensions(format!(
                "{}x{}x{} needs {} values, got {}",
                width,
                height,
                channels,
                expected,
                values.len()
            )));
        }
        Ok(Self::from_buffer(width, height, channels, P::into_buffer(values)))
    }

    fn from_buffer(width: usize, height: usize, channels: usize, buffer: PixelBuffer) -> Self {
        Self {
            width,
            height,
            channels,
            content: Arc::new(RwLock::new(buffer)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixel_type(&self) -> PixelType {
        self.content.read().pixel_type()
    }

    /// The full extent of this image as a rectangle at the origin.
    pub fn extent(&self) -> Rectangle {
        Rectangle::from_size(self.width, self.height)
    }

    /// Number of stored values (pixels × channels).
    pub fn len(&self) -> usize {
        self.width * self.height * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create another handle onto the same pixel content.
    pub fn shared_copy(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            content: Arc::clone(&self.content),
        }
    }

    /// Check whether both handles point at the same pixel content.
    pub fn shares_content_with(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }

    fn index(&self, x: usize, y: usize, channel: usize) -> FusionResult<usize> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return Err(FusionError::out_of_bounds(
                format!("({}, {}, channel {})", x, y, channel),
                format!("{}x{}x{}", self.width, self.height, self.channels),
            ));
        }
        Ok((y * self.width + x) * self.channels + channel)
    }

    /// Read one channel value.
    pub fn at<P: Pixel>(&self, x: usize, y: usize, channel: usize) -> FusionResult<P> {
        let idx = self.index(x, y, channel)?;
        let content = self.content.read();
        Ok(content.as_slice::<P>()?[idx])
    }

    /// Write one channel value.
    pub fn set_at<P: Pixel>(
        &mut self,
        x: usize,
        y: usize,
        channel: usize,
        value: P,
    ) -> FusionResult<()> {
        let idx = self.index(x, y, channel)?;
        let mut content = self.content.write();
        content.as_mut_slice::<P>()?[idx] = value;
        Ok(())
    }

    /// Set every value to `value`.
    pub fn fill<P: Pixel>(&mut self, value: P) -> FusionResult<()> {
        self.with_pixels_mut(|values: &mut [P]| values.fill(value))
    }

    /// Copy the values out.
    pub fn to_vec<P: Pixel>(&self) -> FusionResult<Vec<P>> {
        self.with_pixels(|values: &[P]| values.to_vec())
    }

    /// Run `f` on the values while holding a read lock.
    pub fn with_pixels<P: Pixel, R>(&self, f: impl FnOnce(&[P]) -> R) -> FusionResult<R> {
        let content = self.content.read();
        Ok(f(content.as_slice::<P>()?))
    }

    /// Run `f` on the values while holding a write lock.
    pub fn with_pixels_mut<P: Pixel, R>(
        &mut self,
        f: impl FnOnce(&mut [P]) -> R,
    ) -> FusionResult<R> {
        let mut content = self.content.write();
        Ok(f(content.as_mut_slice::<P>()?))
    }

    /// Copy all of `src` into this image with its top-left corner at (x, y).
    pub fn paste(&mut self, src: &Image, x: usize, y: usize) -> FusionResult<()> {
        let target = Rectangle::new(x, y, src.width, src.height);
        if !self.extent().contains_rect(&target) {
            return Err(FusionError::out_of_bounds(
                target.to_string(),
                self.extent().to_string(),
            ));
        }
        if src.channels != self.channels {
            return Err(FusionError::InvalidDimensions(format!(
                "cannot paste {} channel(s) into {} channel(s)",
                src.channels, self.channels
            )));
        }

        // Snapshot first: src may share content with self.
        let source = src.content.read().clone();
        let mut dest = self.content.write();
        paste_rows(
            &source,
            &mut dest,
            src.width * src.channels,
            self.width * self.channels,
            target,
            self.channels,
        )
    }
}

fn value_count(width: usize, height: usize, channels: usize) -> FusionResult<usize> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            FusionError::InvalidDimensions(format!(
                "{}x{}x{} overflows the addressable size",
                width, height, channels
            ))
        })
}

fn paste_rows(
    source: &PixelBuffer,
    dest: &mut PixelBuffer,
    src_stride: usize,
    dest_stride: usize,
    target: Rectangle,
    channels: usize,
) -> FusionResult<()> {
    macro_rules! copy_rows {
        ($src:expr, $dst:expr) => {{
            for row in 0..target.height {
                let src_start = row * src_stride;
                let dst_start = (target.y + row) * dest_stride + target.x * channels;
                $dst[dst_start..dst_start + src_stride]
                    .copy_from_slice(&$src[src_start..src_start + src_stride]);
            }
            Ok(())
        }};
    }

    match (source, dest) {
        (PixelBuffer::U8(s), PixelBuffer::U8(d)) => copy_rows!(s, d),
        (PixelBuffer::I8(s), PixelBuffer::I8(d)) => copy_rows!(s, d),
        (PixelBuffer::U16(s), PixelBuffer::U16(d)) => copy_rows!(s, d),
        (PixelBuffer::I16(s), PixelBuffer::I16(d)) => copy_rows!(s, d),
        (PixelBuffer::I32(s), PixelBuffer::I32(d)) => copy_rows!(s, d),
        (PixelBuffer::F32(s), PixelBuffer::F32(d)) => copy_rows!(s, d),
        (PixelBuffer::F64(s), PixelBuffer::F64(d)) => copy_rows!(s, d),
        (s, d) => Err(FusionError::PixelTypeMismatch {
            expected: d.pixel_type(),
            actual: s.pixel_type(),
        }),
    }
}

impl Clone for Image {
    /// Deep copy: the clone gets its own pixel content.
    fn clone(&self) -> Self {
        Self::from_buffer(
            self.width,
            self.height,
            self.channels,
            self.content.read().clone(),
        )
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty(PixelType::U8)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width
            || self.height != other.height
            || self.channels != other.channels
        {
            return false;
        }
        if self.shares_content_with(other) {
            return true;
        }
        *self.content.read() == *other.content.read()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("pixel_type", &self.pixel_type())
            .field("shared_handles", &Arc::strong_count(&self.content))
            .finish()
    }
}

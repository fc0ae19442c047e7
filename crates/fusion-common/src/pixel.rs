//! Pixel types and typed pixel storage.
//!
//! [`PixelType`] is the closed set of element types an [`Image`](crate::Image)
//! can hold. It doubles as the runtime discriminant that selects which
//! compile-time instantiation of a fusor is built, so every place that
//! branches on it does so with an exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use num_traits::{Bounded, NumCast, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{FusionError, FusionResult};

/// Element type of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PixelType {
    U8 = 0,
    I8 = 1,
    U16 = 2,
    I16 = 3,
    I32 = 4,
    F32 = 5,
    F64 = 6,
}

impl PixelType {
    /// Every pixel type, in code order.
    pub const ALL: [PixelType; 7] = [
        PixelType::U8,
        PixelType::I8,
        PixelType::U16,
        PixelType::I16,
        PixelType::I32,
        PixelType::F32,
        PixelType::F64,
    ];

    /// Stable numeric code of this pixel type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical name (e.g. "uint16", "float32").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::I8 => "int8",
            Self::U16 => "uint16",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    /// Size of a single channel value in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for PixelType {
    type Error = FusionError;

    fn try_from(code: u8) -> FusionResult<Self> {
        PixelType::ALL
            .iter()
            .copied()
            .find(|ty| ty.code() == code)
            .ok_or_else(|| FusionError::unsupported(format!("pixel type code {}", code)))
    }
}

impl FromStr for PixelType {
    type Err = FusionError;

    /// Parse from string (case-insensitive). Accepts canonical names and
    /// the short Rust spellings.
    fn from_str(s: &str) -> FusionResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "uint8" | "u8" => Ok(Self::U8),
            "int8" | "i8" => Ok(Self::I8),
            "uint16" | "u16" => Ok(Self::U16),
            "int16" | "i16" => Ok(Self::I16),
            "int32" | "i32" => Ok(Self::I32),
            "float32" | "f32" | "float" => Ok(Self::F32),
            "float64" | "f64" | "double" => Ok(Self::F64),
            _ => Err(FusionError::unsupported(format!("pixel type '{}'", s))),
        }
    }
}

/// Typed pixel storage. The variant always agrees with the owning image's
/// [`PixelType`].
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl PixelBuffer {
    /// Create a zero-filled buffer of `len` values.
    pub fn zeroed(pixel_type: PixelType, len: usize) -> Self {
        match pixel_type {
            PixelType::U8 => Self::U8(vec![0; len]),
            PixelType::I8 => Self::I8(vec![0; len]),
            PixelType::U16 => Self::U16(vec![0; len]),
            PixelType::I16 => Self::I16(vec![0; len]),
            PixelType::I32 => Self::I32(vec![0; len]),
            PixelType::F32 => Self::F32(vec![0.0; len]),
            PixelType::F64 => Self::F64(vec![0.0; len]),
        }
    }

    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::U8(_) => PixelType::U8,
            Self::I8(_) => PixelType::I8,
            Self::U16(_) => PixelType::U16,
            Self::I16(_) => PixelType::I16,
            Self::I32(_) => PixelType::I32,
            Self::F32(_) => PixelType::F32,
            Self::F64(_) => PixelType::F64,
        }
    }

    /// Number of stored values (pixels × channels).
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the values as `P`, failing if the buffer holds another type.
    pub fn as_slice<P: Pixel>(&self) -> FusionResult<&[P]> {
        P::slice(self).ok_or(FusionError::PixelTypeMismatch {
            expected: P::PIXEL_TYPE,
            actual: self.pixel_type(),
        })
    }

    /// Mutably borrow the values as `P`, failing if the buffer holds another type.
    pub fn as_mut_slice<P: Pixel>(&mut self) -> FusionResult<&mut [P]> {
        let actual = self.pixel_type();
        P::slice_mut(self).ok_or(FusionError::PixelTypeMismatch {
            expected: P::PIXEL_TYPE,
            actual,
        })
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive type that can be stored in an image.
///
/// Sealed: implemented for exactly the types listed in [`PixelType`].
pub trait Pixel:
    Copy
    + Default
    + PartialOrd
    + fmt::Debug
    + Send
    + Sync
    + Bounded
    + NumCast
    + ToPrimitive
    + sealed::Sealed
    + 'static
{
    /// The discriminant belonging to this type.
    const PIXEL_TYPE: PixelType;

    #[doc(hidden)]
    fn slice(buffer: &PixelBuffer) -> Option<&[Self]>;

    #[doc(hidden)]
    fn slice_mut(buffer: &mut PixelBuffer) -> Option<&mut [Self]>;

    #[doc(hidden)]
    fn into_buffer(values: Vec<Self>) -> PixelBuffer;

    /// Convert to `f64`.
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Convert from `f64`, saturating at the type's range. Integer types map
    /// NaN to zero.
    fn from_f64_saturating(value: f64) -> Self {
        let lo = Self::min_value().to_f64().unwrap_or(f64::MIN);
        let hi = Self::max_value().to_f64().unwrap_or(f64::MAX);
        <Self as NumCast>::from(value.clamp(lo, hi)).unwrap_or_default()
    }
}

macro_rules! impl_pixel {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl Pixel for $ty {
            const PIXEL_TYPE: PixelType = PixelType::$variant;

            fn slice(buffer: &PixelBuffer) -> Option<&[Self]> {
                match buffer {
                    PixelBuffer::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn slice_mut(buffer: &mut PixelBuffer) -> Option<&mut [Self]> {
                match buffer {
                    PixelBuffer::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn into_buffer(values: Vec<Self>) -> PixelBuffer {
                PixelBuffer::$variant(values)
            }
        }
    };
}

impl_pixel!(u8, U8);
impl_pixel!(i8, I8);
impl_pixel!(u16, U16);
impl_pixel!(i16, I16);
impl_pixel!(i32, I32);
impl_pixel!(f32, F32);
impl_pixel!(f64, F64);

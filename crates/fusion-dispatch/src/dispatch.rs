//! Runtime pixel type → compile-time instantiation dispatch.
//!
//! Fusors are generic over their input [`Pixel`] type, but the pixel type of
//! the inputs is only known at runtime. [`dispatch_pixel_type`] bridges the
//! two: it matches the runtime [`PixelType`] and calls the factory with the
//! corresponding Rust type.
//!
//! The table is an exhaustive `match` over the closed [`PixelType`]
//! enumeration, so adding a pixel type without a branch does not compile.

use fusion_common::{FusionError, FusionResult, Pixel, PixelType};
use tracing::{debug, trace};

/// A factory callable with a compile-time pixel type.
///
/// # Example
///
/// ```
/// use fusion_common::{Pixel, PixelType};
/// use fusion_dispatch::{dispatch_pixel_type, PixelTypeFactory};
///
/// struct SizeOf;
///
/// impl PixelTypeFactory for SizeOf {
///     type Output = usize;
///
///     fn call<P: Pixel>(self) -> usize {
///         std::mem::size_of::<P>()
///     }
/// }
///
/// assert_eq!(dispatch_pixel_type(PixelType::I16, SizeOf).unwrap(), 2);
/// ```
pub trait PixelTypeFactory {
    type Output;

    /// Pixel types this factory can be instantiated with.
    const SUPPORTED: &'static [PixelType] = &PixelType::ALL;

    fn call<P: Pixel>(self) -> Self::Output;
}

/// Call `factory` with the Rust type matching `pixel_type`.
///
/// Fails with [`FusionError::UnsupportedDiscriminant`] if the factory does
/// not support `pixel_type`; the factory is not called in that case.
pub fn dispatch_pixel_type<F: PixelTypeFactory>(
    pixel_type: PixelType,
    factory: F,
) -> FusionResult<F::Output> {
    if !F::SUPPORTED.contains(&pixel_type) {
        debug!(%pixel_type, supported = ?F::SUPPORTED, "pixel type not in dispatch table");
        return Err(FusionError::unsupported(format!(
            "pixel type {} (supported: {})",
            pixel_type,
            F::SUPPORTED
                .iter()
                .map(|ty| ty.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    trace!(%pixel_type, "dispatching on pixel type");
    let output = match pixel_type {
        PixelType::U8 => factory.call::<u8>(),
        PixelType::I8 => factory.call::<i8>(),
        PixelType::U16 => factory.call::<u16>(),
        PixelType::I16 => factory.call::<i16>(),
        PixelType::I32 => factory.call::<i32>(),
        PixelType::F32 => factory.call::<f32>(),
        PixelType::F64 => factory.call::<f64>(),
    };
    Ok(output)
}

/// Like [`dispatch_pixel_type`], starting from a raw pixel type code.
pub fn dispatch_pixel_code<F: PixelTypeFactory>(code: u8, factory: F) -> FusionResult<F::Output> {
    let pixel_type = PixelType::try_from(code).map_err(|err| {
        debug!(code, "unknown pixel type code");
        err
    })?;
    dispatch_pixel_type(pixel_type, factory)
}

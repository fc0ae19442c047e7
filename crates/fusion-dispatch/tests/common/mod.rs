//! Common test strategy for fusion-dispatch integration tests
//!
//! Provides a small but complete fusor family, `Scale`, generic over the
//! input pixel type:
//! - reads the image at (`source_tag`, date) from the shared inputs
//! - writes `value * factor + offset` as float32 over the prediction area
//! - writes 0 where the mask is 0

#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fusion_common::{FusionError, FusionResult, Image, Pixel, PixelType, Rectangle};
use fusion_dispatch::{BaseOptions, DataFusor, FusionOptions, FusorHandle, StrategyFamily};
use multires_store::ImageStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    pub base: BaseOptions,
    pub source_tag: String,
    pub factor: f64,
}

impl ScaleOptions {
    pub fn new(source_tag: &str, factor: f64) -> Self {
        Self {
            base: BaseOptions::default(),
            source_tag: source_tag.to_string(),
            factor,
        }
    }
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            base: BaseOptions::default(),
            source_tag: String::new(),
            factor: 1.0,
        }
    }
}

impl FusionOptions for ScaleOptions {
    fn prediction_area(&self) -> Rectangle {
        self.base.prediction_area
    }

    fn set_prediction_area(&mut self, area: Rectangle) {
        self.base.prediction_area = area;
    }
}

/// Construction-time configuration. `builds` counts instantiations.
#[derive(Debug, Clone, Default)]
pub struct ScaleConfig {
    pub offset: f64,
    pub builds: Arc<AtomicUsize>,
}

impl ScaleConfig {
    pub fn with_offset(offset: f64) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

pub struct ScaleFusor<P> {
    offset: f64,
    options: ScaleOptions,
    inputs: Option<Arc<ImageStore>>,
    output: Image,
    _pixel: PhantomData<P>,
}

impl<P: Pixel> DataFusor for ScaleFusor<P> {
    type Options = ScaleOptions;

    fn configure(&mut self, options: ScaleOptions) -> FusionResult<()> {
        if options.source_tag.is_empty() {
            return Err(FusionError::invalid_options("source_tag must be set"));
        }
        if !options.factor.is_finite() {
            return Err(FusionError::invalid_options("factor must be finite"));
        }
        self.options = options;
        Ok(())
    }

    fn options(&self) -> &ScaleOptions {
        &self.options
    }

    fn predict(&mut self, date: i32, mask: Option<&Image>) -> FusionResult<()> {
        let inputs = self
            .inputs
            .as_ref()
            .ok_or_else(|| FusionError::prediction_failed("inputs not set"))?;
        let source = inputs.get(&self.options.source_tag, date)?;
        if source.pixel_type() != P::PIXEL_TYPE {
            return Err(FusionError::PixelTypeMismatch {
                expected: P::PIXEL_TYPE,
                actual: source.pixel_type(),
            });
        }

        let mut area = self.options.prediction_area();
        if area.is_empty() {
            area = source.extent();
        }
        if !source.extent().contains_rect(&area) {
            return Err(FusionError::out_of_bounds(
                area.to_string(),
                source.extent().to_string(),
            ));
        }

        let values = source.with_pixels(|pixels: &[P]| {
            let mut values = Vec::with_capacity(area.area());
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    let raw = pixels[y * source.width() + x].to_f64_lossy();
                    values.push((raw * self.options.factor + self.offset) as f32);
                }
            }
            values
        })?;
        let mut output = Image::from_vec(area.width, area.height, 1, values)?;

        if let Some(mask) = mask {
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    if mask.at::<u8>(x, y, 0)? == 0 {
                        output.set_at(x - area.x, y - area.y, 0, 0.0f32)?;
                    }
                }
            }
        }

        self.output = output;
        Ok(())
    }

    fn inputs(&self) -> Option<&Arc<ImageStore>> {
        self.inputs.as_ref()
    }

    fn set_inputs(&mut self, inputs: Arc<ImageStore>) {
        self.inputs = Some(inputs);
    }

    fn output(&self) -> &Image {
        &self.output
    }

    fn output_mut(&mut self) -> &mut Image {
        &mut self.output
    }
}

/// The `Scale` family. Signed 8-bit input is not supported.
pub struct Scale;

impl StrategyFamily for Scale {
    const NAME: &'static str = "scale";
    const SUPPORTED: &'static [PixelType] = &[
        PixelType::U8,
        PixelType::U16,
        PixelType::I16,
        PixelType::I32,
        PixelType::F32,
        PixelType::F64,
    ];
    type Options = ScaleOptions;
    type Config = ScaleConfig;

    fn build<P: Pixel>(config: &ScaleConfig) -> FusorHandle<ScaleOptions> {
        config.builds.fetch_add(1, Ordering::SeqCst);
        Box::new(ScaleFusor::<P> {
            offset: config.offset,
            options: ScaleOptions::default(),
            inputs: None,
            output: Image::default(),
            _pixel: PhantomData,
        })
    }
}

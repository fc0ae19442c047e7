//! Parallel prediction over row stripes.
//!
//! The [`Parallelizer`] wraps one sample [`StrategyAdapter`]. For each
//! prediction it splits the prediction area into horizontal stripes, takes a
//! rebuilt copy of the sample per stripe, lets every copy predict its stripe
//! on a rayon pool and stitches the stripe outputs together.
//!
//! All copies share the sample's input store; only their prediction areas
//! and outputs differ.

use std::sync::Arc;
use std::time::Instant;

use fusion_common::{FusionError, FusionResult, Image, PixelType, Rectangle};
use multires_store::ImageStore;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapter::{StrategyAdapter, StrategyFamily};
use crate::config::ParallelConfig;
use crate::fusor::{DataFusor, FusionOptions};

/// Options of a [`Parallelizer`]: the pool configuration, the total
/// prediction area and the options handed to every worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelizerOptions<O> {
    #[serde(default)]
    pub config: ParallelConfig,

    /// Total area to predict. Empty means the full extent of the inputs.
    #[serde(default)]
    pub prediction_area: Rectangle,

    /// Worker options. Their prediction area is replaced per stripe.
    pub alg_options: O,
}

impl<O> ParallelizerOptions<O> {
    pub fn new(alg_options: O) -> Self {
        Self {
            config: ParallelConfig::default(),
            prediction_area: Rectangle::default(),
            alg_options,
        }
    }

    pub fn with_config(mut self, config: ParallelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prediction_area(mut self, area: Rectangle) -> Self {
        self.prediction_area = area;
        self
    }
}

impl<O: FusionOptions> FusionOptions for ParallelizerOptions<O> {
    fn prediction_area(&self) -> Rectangle {
        self.prediction_area
    }

    fn set_prediction_area(&mut self, area: Rectangle) {
        self.prediction_area = area;
    }
}

/// Runs a fusor of family `F` on several threads.
pub struct Parallelizer<F: StrategyFamily> {
    sample: StrategyAdapter<F>,
    options: ParallelizerOptions<F::Options>,
    pool: Option<ThreadPool>,
    output: Image,
}

impl<F: StrategyFamily> Parallelizer<F> {
    /// Wrap `sample`. Workers are copies of it.
    ///
    /// The sample's prediction area becomes the total prediction area.
    pub fn new(sample: StrategyAdapter<F>) -> Self {
        let alg_options = sample.options().clone();
        let area = alg_options.prediction_area();
        let options = ParallelizerOptions::new(alg_options).with_prediction_area(area);
        Self {
            sample,
            options,
            pool: None,
            output: Image::default(),
        }
    }

    /// Build the sample for `pixel_type` and wrap it.
    pub fn for_pixel_type(pixel_type: PixelType, config: F::Config) -> FusionResult<Self> {
        Ok(Self::new(StrategyAdapter::new(pixel_type, config)?))
    }

    /// The sample all workers are copied from.
    pub fn sample(&self) -> &StrategyAdapter<F> {
        &self.sample
    }

    fn resolve_area(&self) -> FusionResult<Rectangle> {
        let area = self.options.prediction_area;
        if !area.is_empty() {
            return Ok(area);
        }

        let inputs = self
            .sample
            .inputs()
            .ok_or_else(|| FusionError::invalid_options("no prediction area and no input images"))?;
        let extent = inputs
            .get_any()
            .map_err(|_| FusionError::invalid_options("no prediction area and no input images"))?
            .extent();
        if extent.is_empty() {
            return Err(FusionError::invalid_options(
                "no prediction area and input images are empty",
            ));
        }
        Ok(extent)
    }

    fn spawn_workers(&self, stripes: &[Rectangle]) -> FusionResult<Vec<StrategyAdapter<F>>> {
        stripes
            .iter()
            .map(|stripe| {
                let mut worker = self.sample.try_clone()?;
                let mut options = self.options.alg_options.clone();
                options.set_prediction_area(*stripe);
                worker.configure(options)?;
                Ok(worker)
            })
            .collect()
    }

    fn stitch(
        area: Rectangle,
        stripes: &[Rectangle],
        workers: &[StrategyAdapter<F>],
    ) -> FusionResult<Image> {
        let first = workers
            .first()
            .map(|w| w.output())
            .ok_or_else(|| FusionError::prediction_failed("no worker produced an output"))?;

        let mut combined =
            Image::try_new(area.width, area.height, first.channels(), first.pixel_type())?;
        for (stripe, worker) in stripes.iter().zip(workers) {
            combined.paste(worker.output(), 0, stripe.y - area.y)?;
        }
        Ok(combined)
    }
}

impl<F: StrategyFamily> DataFusor for Parallelizer<F> {
    type Options = ParallelizerOptions<F::Options>;

    /// Validate the pool configuration, build the pool and configure the
    /// sample with the worker options.
    fn configure(&mut self, options: Self::Options) -> FusionResult<()> {
        options.config.validate().map_err(FusionError::config)?;
        let pool = options.config.build_pool()?;

        let mut sample_options = options.alg_options.clone();
        sample_options.set_prediction_area(options.prediction_area);
        self.sample.configure(sample_options)?;

        self.pool = Some(pool);
        self.options = options;
        Ok(())
    }

    fn options(&self) -> &Self::Options {
        &self.options
    }

    fn predict(&mut self, date: i32, mask: Option<&Image>) -> FusionResult<()> {
        let start = Instant::now();
        let area = self.resolve_area()?;

        if self.pool.is_none() {
            self.pool = Some(self.options.config.build_pool()?);
        }
        let pool = match &self.pool {
            Some(pool) => pool,
            None => return Err(FusionError::config("worker pool unavailable")),
        };

        let stripe_count = self
            .options
            .config
            .stripe_count(pool.current_num_threads(), area.height);
        let stripes = area.split_rows(stripe_count);
        debug!(family = F::NAME, %area, stripes = stripes.len(), "splitting prediction");

        // Copies are made here, on the calling thread.
        let workers = self.spawn_workers(&stripes)?;

        let workers = pool.install(|| {
            workers
                .into_par_iter()
                .map(|mut worker| {
                    worker.predict(date, mask)?;
                    Ok(worker)
                })
                .collect::<FusionResult<Vec<_>>>()
        })?;

        self.output = Self::stitch(area, &stripes, &workers)?;

        info!(
            family = F::NAME,
            date,
            %area,
            stripes = stripes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "parallel prediction complete"
        );
        Ok(())
    }

    fn inputs(&self) -> Option<&Arc<ImageStore>> {
        self.sample.inputs()
    }

    fn set_inputs(&mut self, inputs: Arc<ImageStore>) {
        self.sample.set_inputs(inputs);
    }

    fn output(&self) -> &Image {
        &self.output
    }

    fn output_mut(&mut self) -> &mut Image {
        &mut self.output
    }
}

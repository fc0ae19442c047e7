//! Copyable adapter over a family of pixel-type specialised fusors.
//!
//! A fusor family is one algorithm written generically over the input
//! [`Pixel`] type, e.g. `MyFusor<P: Pixel>`. Each instantiation is a distinct
//! type and is typically not [`Clone`]. [`StrategyAdapter`] hides the
//! instantiation behind a boxed [`DataFusor`] and remembers how it was built
//! (pixel type and family configuration), so that a copy can be made by
//! building a fresh, equivalent instance rather than cloning its state.
//!
//! ```text
//!   StrategyAdapter<F> { pixel_type, config, fusor: Box<dyn DataFusor> }
//!          │
//!          │ try_clone()
//!          ▼
//!   dispatch_pixel_type(pixel_type) ──► F::build::<P>(config)
//!          │
//!          └─► set_inputs(same Arc<ImageStore>), configure(same options)
//! ```

use std::fmt;
use std::sync::Arc;

use fusion_common::{FusionError, FusionResult, Image, Pixel, PixelType};
use multires_store::ImageStore;
use tracing::{debug, trace};

use crate::dispatch::{dispatch_pixel_type, PixelTypeFactory};
use crate::fusor::{DataFusor, FusionOptions};

/// An owned, type-erased fusor.
pub type FusorHandle<O> = Box<dyn DataFusor<Options = O>>;

/// A family of fusors generic over the input pixel type.
pub trait StrategyFamily: 'static {
    /// Family name, for logs and errors.
    const NAME: &'static str;

    /// Pixel types the family can be instantiated with.
    const SUPPORTED: &'static [PixelType] = &PixelType::ALL;

    /// Options shared by every instantiation.
    type Options: FusionOptions;

    /// Construction-time configuration.
    type Config: Clone + Send + fmt::Debug + 'static;

    /// Build the instantiation for pixel type `P`.
    fn build<P: Pixel>(config: &Self::Config) -> FusorHandle<Self::Options>;
}

/// Factory functor handed to the dispatch helper.
struct BuildFusor<'a, F: StrategyFamily> {
    config: &'a F::Config,
}

impl<F: StrategyFamily> PixelTypeFactory for BuildFusor<'_, F> {
    type Output = FusorHandle<F::Options>;
    const SUPPORTED: &'static [PixelType] = F::SUPPORTED;

    fn call<P: Pixel>(self) -> Self::Output {
        F::build::<P>(self.config)
    }
}

fn build_fusor<F: StrategyFamily>(
    pixel_type: PixelType,
    config: &F::Config,
) -> FusionResult<FusorHandle<F::Options>> {
    dispatch_pixel_type(pixel_type, BuildFusor::<F> { config })
}

/// A fusor of family `F` whose instantiation is chosen at runtime.
///
/// All [`DataFusor`] calls are forwarded unchanged to the wrapped instance,
/// including its errors.
///
/// There is no `Default` and no `Clone`: an adapter always holds a built
/// fusor, and copying it means rebuilding, which can fail. Use
/// [`try_clone`](Self::try_clone) and [`try_clone_from`](Self::try_clone_from).
pub struct StrategyAdapter<F: StrategyFamily> {
    pixel_type: PixelType,
    config: F::Config,
    /// Whether `configure` has succeeded on the wrapped fusor, in which case
    /// copies replay its options.
    configured: bool,
    fusor: FusorHandle<F::Options>,
}

impl<F: StrategyFamily> StrategyAdapter<F> {
    /// Build the instantiation of `F` for `pixel_type`.
    ///
    /// Fails with [`FusionError::UnsupportedDiscriminant`] if `F` does not
    /// support `pixel_type`; nothing is built in that case.
    pub fn new(pixel_type: PixelType, config: F::Config) -> FusionResult<Self> {
        let fusor = build_fusor::<F>(pixel_type, &config)?;
        debug!(family = F::NAME, %pixel_type, "built fusor");
        Ok(Self {
            pixel_type,
            config,
            configured: false,
            fusor,
        })
    }

    /// Wrap an already built fusor.
    ///
    /// `fusor` must be what `F::build` returns for `pixel_type` and `config`
    /// (possibly configured since). Its current options are treated as
    /// accepted and are replayed on copies.
    pub fn from_fusor(
        pixel_type: PixelType,
        config: F::Config,
        fusor: FusorHandle<F::Options>,
    ) -> FusionResult<Self> {
        if !F::SUPPORTED.contains(&pixel_type) {
            return Err(FusionError::unsupported(format!(
                "pixel type {} for {}",
                pixel_type,
                F::NAME
            )));
        }
        Ok(Self {
            pixel_type,
            config,
            configured: true,
            fusor,
        })
    }

    /// The pixel type this adapter's fusor was built for.
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// The family configuration this adapter's fusor was built with.
    pub fn config(&self) -> &F::Config {
        &self.config
    }

    /// Build an independent, equivalent adapter.
    ///
    /// The copy gets a freshly built fusor sharing the same input store. If
    /// this adapter has been configured, the copy is configured with the same
    /// options. The copy's output starts out fresh.
    pub fn try_clone(&self) -> FusionResult<Self> {
        let mut fusor = build_fusor::<F>(self.pixel_type, &self.config)?;
        if let Some(inputs) = self.fusor.inputs() {
            fusor.set_inputs(Arc::clone(inputs));
        }
        if self.configured {
            fusor.configure(self.fusor.options().clone())?;
        }

        trace!(family = F::NAME, pixel_type = %self.pixel_type, "rebuilt fusor for copy");
        Ok(Self {
            pixel_type: self.pixel_type,
            config: self.config.clone(),
            configured: self.configured,
            fusor,
        })
    }

    /// Replace this adapter with a copy of `source`.
    ///
    /// The copy is fully built before `self` is touched; on error `self` is
    /// unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> FusionResult<()> {
        let mut rebuilt = source.try_clone()?;
        self.swap(&mut rebuilt);
        Ok(())
    }

    /// Exchange fusor, pixel type and configuration with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

impl<F: StrategyFamily> DataFusor for StrategyAdapter<F> {
    type Options = F::Options;

    fn configure(&mut self, options: Self::Options) -> FusionResult<()> {
        self.fusor.configure(options)?;
        self.configured = true;
        Ok(())
    }

    fn options(&self) -> &Self::Options {
        self.fusor.options()
    }

    fn predict(&mut self, date: i32, mask: Option<&Image>) -> FusionResult<()> {
        self.fusor.predict(date, mask)
    }

    fn inputs(&self) -> Option<&Arc<ImageStore>> {
        self.fusor.inputs()
    }

    fn set_inputs(&mut self, inputs: Arc<ImageStore>) {
        self.fusor.set_inputs(inputs)
    }

    fn output(&self) -> &Image {
        self.fusor.output()
    }

    fn output_mut(&mut self) -> &mut Image {
        self.fusor.output_mut()
    }
}

impl<F: StrategyFamily> fmt::Debug for StrategyAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyAdapter")
            .field("family", &F::NAME)
            .field("pixel_type", &self.pixel_type)
            .field("config", &self.config)
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}

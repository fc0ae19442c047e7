//! The fusor interface and its options.

use std::sync::Arc;

use fusion_common::{FusionResult, Image, Rectangle};
use multires_store::ImageStore;
use serde::{Deserialize, Serialize};

/// Options accepted by a fusor.
///
/// Every fusor predicts into a rectangular area of the input images; the
/// rest of the options are algorithm specific.
pub trait FusionOptions: Clone + Send + Sync + 'static {
    /// The area (in input image pixel coordinates) to predict.
    fn prediction_area(&self) -> Rectangle;

    fn set_prediction_area(&mut self, area: Rectangle);
}

/// Options with nothing but a prediction area.
///
/// Algorithms embed this in their own options type. An empty area means
/// "the full input extent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseOptions {
    pub prediction_area: Rectangle,
}

impl FusionOptions for BaseOptions {
    fn prediction_area(&self) -> Rectangle {
        self.prediction_area
    }

    fn set_prediction_area(&mut self, area: Rectangle) {
        self.prediction_area = area;
    }
}

/// A data fusion algorithm.
///
/// A fusor reads its inputs from a shared [`ImageStore`] by (tag, date) and
/// writes the prediction for one date into its own output image. The input
/// store is shared read-only between the caller and any number of fusors.
///
/// Implementations are usually generic over the input [`Pixel`] type and are
/// not required to be cloneable; see
/// [`StrategyAdapter`](crate::StrategyAdapter) for a copyable wrapper.
///
/// [`Pixel`]: fusion_common::Pixel
pub trait DataFusor: Send {
    type Options: FusionOptions;

    /// Validate and store the options.
    fn configure(&mut self, options: Self::Options) -> FusionResult<()>;

    /// The options most recently accepted by [`configure`](Self::configure),
    /// or the algorithm's defaults.
    fn options(&self) -> &Self::Options;

    /// Predict the image at `date`, restricted to pixels where `mask` is
    /// non-zero if a mask is given.
    fn predict(&mut self, date: i32, mask: Option<&Image>) -> FusionResult<()>;

    /// The shared input images, if set.
    fn inputs(&self) -> Option<&Arc<ImageStore>>;

    fn set_inputs(&mut self, inputs: Arc<ImageStore>);

    /// The result of the last prediction.
    fn output(&self) -> &Image;

    fn output_mut(&mut self) -> &mut Image;
}

//! Integration tests for StrategyAdapter: copy semantics, dispatch
//! failures and error pass-through.

mod common;

use std::sync::Arc;

use common::{Scale, ScaleConfig, ScaleOptions};
use fusion_common::{FusionError, PixelType};
use fusion_dispatch::{dispatch_pixel_code, DataFusor, FusionOptions, StrategyAdapter, StrategyFamily};
use multires_store::ImageStore;
use test_utils::{create_image_per_pixel_type, dates, fusion_pair_store, reflectance_store, tags};

fn configured_adapter(
    pixel_type: PixelType,
    inputs: ImageStore,
    options: ScaleOptions,
) -> StrategyAdapter<Scale> {
    let mut adapter = StrategyAdapter::<Scale>::new(pixel_type, ScaleConfig::with_offset(1.0)).unwrap();
    adapter.set_inputs(Arc::new(inputs));
    adapter.configure(options).unwrap();
    adapter
}

// ============================================================================
// Copy law
// ============================================================================

#[test]
fn test_copy_predicts_like_sample() {
    let mut sample = configured_adapter(
        PixelType::U16,
        reflectance_store(16, 8),
        ScaleOptions::new(tags::LOW, 0.5),
    );
    let mut copy = sample.try_clone().unwrap();

    sample.predict(dates::D1, None).unwrap();
    copy.predict(dates::D1, None).unwrap();

    assert_eq!(copy.output(), sample.output());
    assert!(!copy.output().shares_content_with(sample.output()));
    assert_eq!(copy.pixel_type(), PixelType::U16);
    assert_eq!(copy.options(), sample.options());
}

#[test]
fn test_copy_shares_input_store() {
    let sample = configured_adapter(
        PixelType::F32,
        fusion_pair_store(4, 4),
        ScaleOptions::new(tags::HIGH, 2.0),
    );
    let copy = sample.try_clone().unwrap();

    assert!(Arc::ptr_eq(sample.inputs().unwrap(), copy.inputs().unwrap()));
}

#[test]
fn test_copy_is_built_through_factory() {
    let config = ScaleConfig::default();
    let sample = StrategyAdapter::<Scale>::new(PixelType::I32, config.clone()).unwrap();
    assert_eq!(config.build_count(), 1);

    let _a = sample.try_clone().unwrap();
    let _b = sample.try_clone().unwrap();
    assert_eq!(config.build_count(), 3);
}

#[test]
fn test_copy_keeps_family_config() {
    let mut sample = configured_adapter(
        PixelType::F32,
        fusion_pair_store(2, 2),
        ScaleOptions::new(tags::HIGH, 0.0),
    );
    let mut copy = sample.try_clone().unwrap();
    assert_eq!(copy.config().offset, 1.0);

    sample.predict(dates::D1, None).unwrap();
    copy.predict(dates::D1, None).unwrap();
    assert_eq!(copy.output().to_vec::<f32>().unwrap(), vec![1.0; 4]);
}

#[test]
fn test_copy_reconfigured_independently() {
    let sample = configured_adapter(
        PixelType::F32,
        fusion_pair_store(8, 8),
        ScaleOptions::new(tags::HIGH, 1.0),
    );
    let mut copy = sample.try_clone().unwrap();

    let mut narrowed = copy.options().clone();
    narrowed.set_prediction_area(fusion_common::Rectangle::new(0, 4, 8, 4));
    copy.configure(narrowed).unwrap();

    assert!(sample.options().prediction_area().is_empty());
    assert_eq!(copy.options().prediction_area().height, 4);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_every_supported_type_builds() {
    for &ty in Scale::SUPPORTED {
        let adapter = StrategyAdapter::<Scale>::new(ty, ScaleConfig::default()).unwrap();
        assert_eq!(adapter.pixel_type(), ty);
    }
}

#[test]
fn test_dispatch_on_every_input_pixel_type() {
    let config = ScaleConfig::default();
    for image in create_image_per_pixel_type(2, 2) {
        let pixel_type = image.pixel_type();
        let result = StrategyAdapter::<Scale>::new(pixel_type, config.clone());

        if Scale::SUPPORTED.contains(&pixel_type) {
            assert_eq!(result.unwrap().pixel_type(), pixel_type);
        } else {
            assert!(matches!(
                result,
                Err(FusionError::UnsupportedDiscriminant(_))
            ));
        }
    }
    assert_eq!(config.build_count(), Scale::SUPPORTED.len());
}

#[test]
fn test_unsupported_type_constructs_nothing() {
    let config = ScaleConfig::default();
    let err = StrategyAdapter::<Scale>::new(PixelType::I8, config.clone()).unwrap_err();

    assert!(matches!(err, FusionError::UnsupportedDiscriminant(_)));
    assert!(err.to_string().contains("int8"));
    assert_eq!(config.build_count(), 0);
}

#[test]
fn test_unknown_code_is_unsupported() {
    struct Never;
    impl fusion_dispatch::PixelTypeFactory for Never {
        type Output = ();
        fn call<P: fusion_common::Pixel>(self) {
            panic!("factory must not be called");
        }
    }

    let err = dispatch_pixel_code(42, Never).unwrap_err();
    assert!(matches!(err, FusionError::UnsupportedDiscriminant(_)));
}

// ============================================================================
// Copy-and-swap
// ============================================================================

#[test]
fn test_try_clone_from_replaces_target() {
    let source = configured_adapter(
        PixelType::F32,
        fusion_pair_store(4, 4),
        ScaleOptions::new(tags::LOW, 3.0),
    );
    let mut target = configured_adapter(
        PixelType::U16,
        reflectance_store(4, 4),
        ScaleOptions::new(tags::HIGH, 1.0),
    );

    target.try_clone_from(&source).unwrap();
    assert_eq!(target.pixel_type(), PixelType::F32);
    assert_eq!(target.options(), source.options());
    assert!(Arc::ptr_eq(target.inputs().unwrap(), source.inputs().unwrap()));
}

#[test]
fn test_failed_try_clone_from_leaves_target_untouched() {
    // A handle wrapped as-is still carries default options, which the
    // family rejects when a copy replays them.
    let config = ScaleConfig::default();
    let handle = Scale::build::<u8>(&config);
    let source = StrategyAdapter::<Scale>::from_fusor(PixelType::U8, config, handle).unwrap();

    let mut target = configured_adapter(
        PixelType::U16,
        reflectance_store(4, 4),
        ScaleOptions::new(tags::HIGH, 1.0),
    );
    target.predict(dates::D1, None).unwrap();
    let before = target.output().clone();

    let err = target.try_clone_from(&source).unwrap_err();
    assert!(matches!(err, FusionError::InvalidOptions(_)));

    assert_eq!(target.pixel_type(), PixelType::U16);
    assert_eq!(target.options(), &ScaleOptions::new(tags::HIGH, 1.0));
    assert_eq!(target.output(), &before);
}

#[test]
fn test_swap_then_swap_back() {
    let mut a = configured_adapter(
        PixelType::F32,
        fusion_pair_store(2, 2),
        ScaleOptions::new(tags::LOW, 1.0),
    );
    let mut b = StrategyAdapter::<Scale>::new(PixelType::I16, ScaleConfig::with_offset(5.0)).unwrap();

    a.swap(&mut b);
    assert_eq!(a.pixel_type(), PixelType::I16);
    assert_eq!(a.config().offset, 5.0);
    assert!(a.inputs().is_none());
    assert_eq!(b.options().source_tag, tags::LOW);

    a.swap(&mut b);
    assert_eq!(a.pixel_type(), PixelType::F32);
    assert!(a.inputs().is_some());
}

// ============================================================================
// Error pass-through
// ============================================================================

#[test]
fn test_missing_input_is_not_found() {
    let mut adapter = configured_adapter(
        PixelType::F32,
        fusion_pair_store(4, 4),
        ScaleOptions::new(tags::HIGH, 1.0),
    );

    let err = adapter.predict(dates::D2, None).unwrap_err();
    assert_eq!(err, FusionError::not_found_pair(tags::HIGH, dates::D2));
}

#[test]
fn test_invalid_options_pass_through() {
    let mut adapter = StrategyAdapter::<Scale>::new(PixelType::F64, ScaleConfig::default()).unwrap();
    let err = adapter
        .configure(ScaleOptions::new(tags::HIGH, f64::NAN))
        .unwrap_err();
    assert_eq!(err, FusionError::invalid_options("factor must be finite"));
}

#[test]
fn test_pixel_type_mismatch_pass_through() {
    // uint16 inputs handed to the float32 instantiation
    let mut adapter = configured_adapter(
        PixelType::F32,
        reflectance_store(4, 4),
        ScaleOptions::new(tags::HIGH, 1.0),
    );
    let err = adapter.predict(dates::D1, None).unwrap_err();
    assert_eq!(
        err,
        FusionError::PixelTypeMismatch {
            expected: PixelType::F32,
            actual: PixelType::U16,
        }
    );
}

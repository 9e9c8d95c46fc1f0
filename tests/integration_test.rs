//! Integration tests for background estimation and contrast checking
//!
//! These tests exercise the public API end to end on synthetic captures:
//! - Every estimator on uniform and text-bearing backgrounds
//! - Failure containment when the whole capture is text
//! - Determinism of the seeded estimators and of parallel evaluation
//! - Luminance, contrast and compliance classification
//! - Loading captures from disk and JSON reports
//! - Properties over random inputs (proptest)

use contrast_scan::color::{color_distance, distance, is_foreground};
use contrast_scan::estimation::{
    evaluate_all_sequential, ConfidenceScorer, DominantClusterEstimator, HierarchicalEstimator,
    Level, MultiSamplingEstimator,
};
use contrast_scan::wcag::{contrast_ratio, relative_luminance};
use contrast_scan::{
    check_contrast, classify, contrast_ratio_between, evaluate_all, image_loader,
    rank_by_reference, rank_outcomes, AnalysisError, ContrastReport, EstimationError, Estimator,
    EstimatorConfig, FontMetrics,
};
use image::{Rgb, RgbImage};
use palette::Srgb;
use proptest::prelude::*;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// White capture with black "glyph" bars through its middle band
fn text_on_white(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let in_band = y >= height / 3 && y < 2 * height / 3;
        let in_glyph = x >= 4 && x < width - 4 && (x / 3) % 2 == 0;
        if in_band && in_glyph {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// Horizontal gradient with a few text bars, for determinism checks
fn busy_capture() -> RgbImage {
    RgbImage::from_fn(64, 32, |x, y| {
        if y % 8 < 3 && x % 5 < 2 {
            Rgb([12, 12, 40])
        } else {
            Rgb([(x * 4) as u8, 180, (255 - y * 4) as u8])
        }
    })
}

// ============================================================================
// Estimator Behavior Tests
// ============================================================================

#[test]
fn test_uniform_background_every_estimator() {
    init_logging();
    let background = Srgb::new(227, 224, 224);
    let image = RgbImage::from_pixel(48, 32, Rgb([227, 224, 224]));
    let config = EstimatorConfig::default();

    for estimator in Estimator::ALL {
        let color = estimator
            .estimate(&image, Srgb::new(20, 20, 20), &config)
            .unwrap_or_else(|e| panic!("{} failed: {}", estimator, e));
        assert_eq!(color, background, "{} drifted", estimator);
    }
}

#[test]
fn test_text_on_white_every_estimator() {
    init_logging();
    let image = text_on_white(80, 36);
    let config = EstimatorConfig::default();

    for estimator in Estimator::ALL {
        let color = estimator
            .estimate(&image, Srgb::new(0, 0, 0), &config)
            .unwrap_or_else(|e| panic!("{} failed: {}", estimator, e));
        assert_eq!(color, Srgb::new(255, 255, 255), "{} picked up text", estimator);
    }
}

#[test]
fn test_all_foreground_capture() {
    init_logging();
    let image = RgbImage::from_pixel(16, 16, Rgb([20, 20, 20]));
    let outcomes = evaluate_all(&image, Srgb::new(20, 20, 20), &EstimatorConfig::default());

    assert!(matches!(
        outcomes[0].error(),
        Some(EstimationError::InsufficientBackgroundPixels { found: 0, .. })
    ));
    assert!(outcomes[1].error().is_some());
    assert_eq!(outcomes[2].error(), Some(EstimationError::EmptyCoreRegion));
    assert!(outcomes[3].error().is_some());

    let hierarchical = outcomes[4].estimate().expect("hierarchical always yields a color");
    assert_eq!(hierarchical.rgb, Srgb::new(23, 23, 23));
}

#[test]
fn test_hierarchical_prefers_fine_on_tie() {
    let image = RgbImage::from_pixel(20, 20, Rgb([250, 250, 250]));
    let analysis = HierarchicalEstimator::new()
        .analyze(&image, Srgb::new(0, 0, 0))
        .unwrap();

    // Every level is within the similarity radius of every pixel
    assert_eq!(analysis.confidences, [1.0, 1.0, 1.0]);
    assert_eq!(analysis.selected, Level::Fine);
}

#[test]
fn test_zero_area_capture() {
    let image = RgbImage::new(0, 7);
    let config = EstimatorConfig::default();
    for estimator in [
        Estimator::SpatialWeighted,
        Estimator::CoreRegion,
        Estimator::MultiSampling,
        Estimator::Hierarchical,
    ] {
        assert!(matches!(
            estimator.estimate(&image, Srgb::new(0, 0, 0), &config),
            Err(EstimationError::DegenerateGeometry { width: 0, height: 7 })
        ));
    }
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[test]
fn test_multi_sampling_is_deterministic() {
    let image = busy_capture();
    let foreground = Srgb::new(12, 12, 40);

    let first = MultiSamplingEstimator::new().with_seed(7).estimate(&image, foreground);
    let second = MultiSamplingEstimator::new().with_seed(7).estimate(&image, foreground);
    assert_eq!(first, second);

    let points = MultiSamplingEstimator::new().sample_points(64, 32);
    assert_eq!(points, MultiSamplingEstimator::new().sample_points(64, 32));
}

#[test]
fn test_dominant_cluster_is_deterministic() {
    let image = busy_capture();
    let foreground = Srgb::new(12, 12, 40);

    let first = DominantClusterEstimator::new().with_seed(3).estimate(&image, foreground);
    let second = DominantClusterEstimator::new().with_seed(3).estimate(&image, foreground);
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    init_logging();
    let image = busy_capture();
    let foreground = Srgb::new(12, 12, 40);
    let config = EstimatorConfig::default();

    assert_eq!(
        evaluate_all(&image, foreground, &config),
        evaluate_all_sequential(&image, foreground, &config)
    );
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn test_rank_against_known_background() {
    let image = text_on_white(80, 36);
    let outcomes = evaluate_all(&image, Srgb::new(0, 0, 0), &EstimatorConfig::default());
    let ranked = rank_outcomes(outcomes, Srgb::new(255, 255, 255));

    assert_eq!(ranked.len(), 5);
    assert!(ranked.iter().all(|r| r.distance == 0.0));
    // Stable: equal distances keep canonical order
    let order: Vec<Estimator> = ranked.iter().map(|r| r.outcome.estimator).collect();
    assert_eq!(order, Estimator::ALL.to_vec());
}

#[test]
fn test_rank_by_reference_sorts_ascending() {
    let image = busy_capture();
    let reference = Srgb::new(128, 180, 200);
    let estimates: Vec<_> = evaluate_all(&image, Srgb::new(12, 12, 40), &EstimatorConfig::default())
        .into_iter()
        .filter_map(|o| o.result.ok())
        .collect();

    let ranked = rank_by_reference(estimates, reference);
    let distances: Vec<f64> = ranked
        .iter()
        .map(|e| color_distance(e.rgb, reference))
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

// ============================================================================
// Contrast and Compliance Tests
// ============================================================================

#[test]
fn test_reference_contrast_values() {
    let white = Srgb::new(255, 255, 255);
    assert!((contrast_ratio_between(Srgb::new(0, 0, 0), white) - 21.0).abs() < 0.01);
    assert!((contrast_ratio_between(Srgb::new(0x76, 0x76, 0x76), white) - 4.54).abs() < 0.01);
    assert!((relative_luminance(white) - 1.0).abs() < 1e-6);
}

#[test]
fn test_classification_cases() {
    let large = classify(&FontMetrics::new(24.0, true, "en"), 3.2);
    assert!(large.is_large_text);
    assert_eq!(large.required_ratio, 3.0);
    assert!(large.is_compliant);

    let small = classify(&FontMetrics::new(12.0, false, "en"), 4.49);
    assert!(!small.is_large_text);
    assert_eq!(small.required_ratio, 4.5);
    assert!(!small.is_compliant);
}

#[test]
fn test_check_contrast_on_low_contrast_capture() {
    init_logging();
    // Light gray text on white
    let image = RgbImage::from_fn(60, 24, |x, y| {
        if (8..16).contains(&y) && x % 4 < 2 {
            Rgb([170, 170, 170])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let report = check_contrast(
        &image,
        Srgb::new(170, 170, 170),
        &FontMetrics::new(14.0, false, "en"),
        Estimator::Hierarchical,
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(report.background.rgb, Srgb::new(255, 255, 255));
    assert!(report.contrast_ratio < 4.5);
    assert!(!report.verdict.is_compliant);
}

// ============================================================================
// File and Serialization Tests
// ============================================================================

#[test]
fn test_load_image_file_not_found() {
    let result = image_loader::load_image(Path::new("nonexistent_capture.png"));

    match result {
        Err(AnalysisError::ImageLoadError { .. }) => {}
        other => panic!("Expected ImageLoadError, got: {:?}", other),
    }
}

#[test]
fn test_capture_from_disk_to_json_report() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.png");
    text_on_white(48, 36).save(&path).unwrap();

    let image = image_loader::load_image(&path).unwrap();
    let report = check_contrast(
        &image,
        Srgb::new(0, 0, 0),
        &FontMetrics::new(16.0, false, "en"),
        Estimator::CoreRegion,
        &EstimatorConfig::default(),
    )
    .unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: ContrastReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(parsed.background.hex, "#ffffff");
}

#[test]
fn test_config_file_drives_estimation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estimators.json");

    let mut config = EstimatorConfig::default();
    config.multi_sampling.seed = 1234;
    config.to_json_file(&path).unwrap();

    let loaded = EstimatorConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let image = busy_capture();
    let foreground = Srgb::new(12, 12, 40);
    assert_eq!(
        Estimator::MultiSampling.estimate(&image, foreground, &loaded),
        MultiSamplingEstimator::new().with_seed(1234).estimate(&image, foreground)
    );
}

// ============================================================================
// Property Tests
// ============================================================================

fn rgb_strategy() -> impl Strategy<Value = Srgb<u8>> {
    (0u8..=255, 0u8..=255, 0u8..=255).prop_map(|(r, g, b)| Srgb::new(r, g, b))
}

/// Random 8x6 capture
fn image_strategy() -> impl Strategy<Value = RgbImage> {
    proptest::collection::vec(0u8..=255, 8 * 6 * 3)
        .prop_map(|bytes| RgbImage::from_raw(8, 6, bytes).expect("buffer sized for 8x6"))
}

proptest! {
    /// A pixel is text exactly when it lies within the threshold of the foreground
    #[test]
    fn prop_masking_matches_distance(
        pixel in rgb_strategy(),
        foreground in rgb_strategy(),
        threshold in 0.0f64..120.0
    ) {
        let rgb = Rgb([pixel.red, pixel.green, pixel.blue]);
        let d = distance(rgb.0, [foreground.red, foreground.green, foreground.blue]);
        prop_assert_eq!(is_foreground(&rgb, foreground, threshold), d <= threshold);
    }

    /// Contrast is symmetric and bounded by [1, 21]
    #[test]
    fn prop_contrast_symmetric_and_bounded(a in rgb_strategy(), b in rgb_strategy()) {
        let ab = contrast_ratio_between(a, b);
        let ba = contrast_ratio_between(b, a);
        prop_assert_eq!(ab, ba);
        prop_assert!(ab >= 1.0 - 1e-12);
        prop_assert!(ab <= 21.0 + 1e-9);
        prop_assert_eq!(
            ab,
            contrast_ratio(relative_luminance(a), relative_luminance(b))
        );
    }

    /// Confidence is a fraction of pixels
    #[test]
    fn prop_confidence_in_unit_interval(image in image_strategy(), candidate in rgb_strategy()) {
        let score = ConfidenceScorer::new().score(Some(candidate), &image);
        prop_assert!((0.0..=1.0).contains(&score));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The selected hierarchical level has the highest confidence
    #[test]
    fn prop_hierarchical_selects_max_confidence(
        image in image_strategy(),
        foreground in rgb_strategy()
    ) {
        let analysis = HierarchicalEstimator::new().analyze(&image, foreground).unwrap();
        let selected = analysis.selected_confidence();
        prop_assert!(analysis.confidences.iter().all(|&c| selected >= c));
    }

    /// Batch evaluation never aborts and always yields one outcome per method
    #[test]
    fn prop_batch_is_total(image in image_strategy(), foreground in rgb_strategy()) {
        let outcomes = evaluate_all(&image, foreground, &EstimatorConfig::default());
        prop_assert_eq!(outcomes.len(), Estimator::ALL.len());
        prop_assert!(outcomes[4].estimate().is_some());
    }
}

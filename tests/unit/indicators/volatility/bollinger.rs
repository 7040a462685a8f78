//! Unit tests for Bollinger Bands

use tradewind::indicators::bollinger;

#[test]
fn warmup_entries_are_none() {
    let out = bollinger(&[1.0, 2.0, 3.0, 4.0], 3, 2.0);
    assert!(out[0].is_none());
    assert!(out[1].is_none());
    assert!(out[2].is_some());
}

#[test]
fn constant_series_collapses_the_bands() {
    let out = bollinger(&[10.0; 8], 4, 2.0);
    for band in out.iter().flatten() {
        assert_eq!(band.upper, 10.0);
        assert_eq!(band.middle, 10.0);
        assert_eq!(band.lower, 10.0);
    }
}

#[test]
fn bands_use_population_stddev() {
    let out = bollinger(&[1.0, 2.0, 3.0], 3, 2.0);
    let band = out[2].expect("defined");
    let std = (2.0_f64 / 3.0).sqrt();
    assert!((band.middle - 2.0).abs() < 1e-12);
    assert!((band.upper - (2.0 + 2.0 * std)).abs() < 1e-12);
    assert!((band.lower - (2.0 - 2.0 * std)).abs() < 1e-12);
}

#[test]
fn bands_are_symmetric_around_the_middle() {
    let values = [5.0, 7.0, 6.0, 9.0, 8.0, 10.0, 7.5];
    for band in bollinger(&values, 4, 1.5).iter().flatten() {
        assert!(((band.upper - band.middle) - (band.middle - band.lower)).abs() < 1e-12);
    }
}

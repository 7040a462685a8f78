//! Unit tests for the EMA indicator

use tradewind::indicators::{ema, sma};

#[test]
fn seed_is_the_simple_average_of_the_first_window() {
    let values = [2.0, 4.0, 6.0, 8.0, 10.0];
    let out = ema(&values, 3);
    assert_eq!(out[0], None);
    assert_eq!(out[1], None);
    assert_eq!(out[2], Some(4.0));
}

#[test]
fn recurrence_uses_multiplier_two_over_period_plus_one() {
    // period 2: multiplier 2/3, seed at index 1 is 3.
    let out = ema(&[2.0, 4.0, 6.0, 8.0, 10.0], 2);
    let expect = [None, Some(3.0), Some(5.0), Some(7.0), Some(9.0)];
    for (got, want) in out.iter().zip(expect.iter()) {
        match (got, want) {
            (Some(g), Some(w)) => assert!((g - w).abs() < 1e-12),
            (None, None) => {}
            _ => panic!("mismatch: {:?} vs {:?}", got, want),
        }
    }
}

#[test]
fn period_one_reproduces_the_series() {
    let values = [10.0, 12.5, 9.0, 11.0];
    let out = ema(&values, 1);
    for (i, v) in values.iter().enumerate() {
        assert_eq!(out[i], Some(*v));
    }
}

#[test]
fn constant_series_stays_constant() {
    let out = ema(&[5.0; 20], 4);
    for v in out.iter().skip(3) {
        assert_eq!(*v, Some(5.0));
    }
}

#[test]
fn agrees_with_sma_at_the_seed_index() {
    let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let period = 5;
    assert_eq!(ema(&values, period)[period - 1], sma(&values, period)[period - 1]);
}

#[test]
fn insufficient_data_is_all_none() {
    assert!(ema(&[1.0, 2.0], 5).iter().all(|v| v.is_none()));
}

//! Unit tests for candidate pair screening criteria

use chrono::Utc;
use tradewind::models::market::{CandidatePair, PairCriteria};

fn pair() -> CandidatePair {
    CandidatePair {
        address: "Mint".to_string(),
        symbol: "DOGE".to_string(),
        name: "Doge".to_string(),
        price: 0.001,
        liquidity: 50_000.0,
        volume_24h: 100_000.0,
        market_cap: 250_000.0,
        listed_at: Utc::now(),
        age_minutes: 10,
    }
}

#[test]
fn empty_criteria_accepts_everything() {
    assert!(PairCriteria::default().accepts(&pair()));
}

#[test]
fn age_bound_rejects_old_listings() {
    let criteria = PairCriteria {
        max_age_minutes: Some(5),
        ..Default::default()
    };
    assert!(!criteria.accepts(&pair()));
}

#[test]
fn liquidity_bounds_are_inclusive_of_the_boundary() {
    let criteria = PairCriteria {
        min_liquidity: Some(50_000.0),
        max_liquidity: Some(50_000.0),
        ..Default::default()
    };
    assert!(criteria.accepts(&pair()));
}

#[test]
fn liquidity_outside_either_bound_is_rejected() {
    let too_low = PairCriteria {
        min_liquidity: Some(60_000.0),
        ..Default::default()
    };
    assert!(!too_low.accepts(&pair()));

    let too_high = PairCriteria {
        max_liquidity: Some(40_000.0),
        ..Default::default()
    };
    assert!(!too_high.accepts(&pair()));
}

#[test]
fn all_given_bounds_must_hold() {
    // Liquidity passes, volume fails: rejected.
    let criteria = PairCriteria {
        min_liquidity: Some(10_000.0),
        min_volume_24h: Some(500_000.0),
        ..Default::default()
    };
    assert!(!criteria.accepts(&pair()));
}

#[test]
fn market_cap_bounds() {
    let criteria = PairCriteria {
        min_market_cap: Some(100_000.0),
        max_market_cap: Some(300_000.0),
        ..Default::default()
    };
    assert!(criteria.accepts(&pair()));

    let outside = PairCriteria {
        max_market_cap: Some(200_000.0),
        ..Default::default()
    };
    assert!(!outside.accepts(&pair()));
}

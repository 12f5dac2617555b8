//! Tick grid arithmetic
//!
//! Prices are snapped to the nearest multiple of a contract's tick size with
//! round-half-away-from-zero, so an input exactly halfway between two ticks
//! moves to the tick farther from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept after snapping a price onto the grid
pub const GRID_SNAP_DP: u32 = 10;

/// Round `value` to the nearest multiple of `tick`
///
/// Returns `value` unchanged when `tick` is not positive or when the
/// intermediate quotient would overflow.
pub fn round_to_tick(value: Decimal, tick: Decimal) -> Decimal {
    if tick <= Decimal::ZERO {
        return value;
    }

    let Some(ticks) = value.checked_div(tick) else {
        return value;
    };
    let whole_ticks = ticks.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    match whole_ticks.checked_mul(tick) {
        Some(snapped) => snapped
            .round_dp_with_strategy(GRID_SNAP_DP, RoundingStrategy::MidpointAwayFromZero)
            .normalize(),
        None => value,
    }
}

/// True if `value` is already a whole number of ticks
pub fn is_aligned(value: Decimal, tick: Decimal) -> bool {
    round_to_tick(value, tick) == value
}

/// Move `value` by `steps` ticks and snap the result onto the grid
pub fn step_by_ticks(value: Decimal, tick: Decimal, steps: i64) -> Decimal {
    let delta = tick.checked_mul(Decimal::from(steps)).unwrap_or(Decimal::ZERO);
    round_to_tick(value.checked_add(delta).unwrap_or(value), tick)
}

/// Fractional digits needed to display a tick size
///
/// `0.25` has 2, `0.000001` has 6 and `5.0` has none.
pub fn tick_decimal_places(tick: Decimal) -> u32 {
    tick.normalize().scale()
}

/// Render `value` with exactly `dp` decimal places
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Render a price with the display precision of `tick`
pub fn format_price(value: Decimal, tick: Decimal) -> String {
    format_fixed(value, tick_decimal_places(tick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_nearest_tick() {
        assert_eq!(round_to_tick(dec!(4500.10), dec!(0.25)), dec!(4500.00));
        assert_eq!(round_to_tick(dec!(4500.13), dec!(0.25)), dec!(4500.25));
        assert_eq!(round_to_tick(dec!(71.234), dec!(0.01)), dec!(71.23));
        assert_eq!(round_to_tick(dec!(112.01), dec!(0.015625)), dec!(112.015625));
    }

    #[test]
    fn test_half_tick_rounds_away_from_zero() {
        assert_eq!(round_to_tick(dec!(4500.125), dec!(0.25)), dec!(4500.25));
        assert_eq!(round_to_tick(dec!(-4500.125), dec!(0.25)), dec!(-4500.25));
        assert_eq!(round_to_tick(dec!(2.5), dec!(5.0)), dec!(5));
    }

    #[test]
    fn test_non_positive_tick_is_identity() {
        assert_eq!(round_to_tick(dec!(1.2345), Decimal::ZERO), dec!(1.2345));
        assert_eq!(round_to_tick(dec!(1.2345), dec!(-0.25)), dec!(1.2345));
    }

    #[test]
    fn test_aligned_values_unchanged() {
        assert!(is_aligned(dec!(4500.25), dec!(0.25)));
        assert!(!is_aligned(dec!(0.6712345), dec!(0.000001)));
        assert!(is_aligned(dec!(110.0078125), dec!(0.0078125)));
        assert!(is_aligned(Decimal::ZERO, dec!(0.25)));
    }

    #[test]
    fn test_step_by_ticks() {
        assert_eq!(step_by_ticks(dec!(4500.00), dec!(0.25), 1), dec!(4500.25));
        assert_eq!(step_by_ticks(dec!(4500.00), dec!(0.25), -4), dec!(4499.00));
        assert_eq!(step_by_ticks(dec!(4500.10), dec!(0.25), 0), dec!(4500.00));
    }

    #[test]
    fn test_tick_decimal_places() {
        assert_eq!(tick_decimal_places(dec!(0.25)), 2);
        assert_eq!(tick_decimal_places(dec!(0.000001)), 6);
        assert_eq!(tick_decimal_places(dec!(0.0078125)), 7);
        assert_eq!(tick_decimal_places(dec!(0.10)), 1);
        assert_eq!(tick_decimal_places(dec!(5.0)), 0);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(4500), dec!(0.25)), "4500.00");
        assert_eq!(format_price(dec!(0.006712), dec!(0.000001)), "0.006712");
        assert_eq!(format_price(dec!(65000), dec!(5.0)), "65000");
        assert_eq!(format_fixed(dec!(0.4), 2), "0.40");
        assert_eq!(format_fixed(dec!(1.005), 2), "1.01");
    }
}

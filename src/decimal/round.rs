// ============================================================================
// Decimal Rounding
// Rounding modes, floor, ceil and truncation
// ============================================================================

use super::Decimal;
use crate::numeric::{Coefficient, POW10};
use std::cmp::Ordering;

/// How discarded digits affect the last kept digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    /// Half to even (banker's rounding)
    HalfEven,
    /// Any non-zero remainder rounds away from zero (ROUND_UP)
    AwayFromZero,
    /// Half rounds away from zero
    HalfAwayFromZero,
    /// Half rounds toward zero
    HalfTowardZero,
    /// Discard the remainder
    TowardZero,
    /// Toward negative infinity
    Floor,
    /// Toward positive infinity
    Ceiling,
}

impl Decimal {
    /// Round to `scale` fractional digits using `mode`.
    ///
    /// Values that already have at most `scale` fractional digits are
    /// returned unchanged.
    pub fn round(&self, scale: u8, mode: RoundingMode) -> Decimal {
        if scale >= self.scale {
            return self.clone();
        }
        let k = u32::from(self.scale - scale);
        let (q, r) = self.coef.quo_rem_pow10(k);

        // k <= 19, so half of 10^k fits in a u64
        let half = Coefficient::from_u64(POW10[k as usize].low() / 2);
        let vs_half = r.cmp(&half);

        let round_up = match mode {
            RoundingMode::HalfEven => {
                vs_half == Ordering::Greater || (vs_half == Ordering::Equal && q.is_odd())
            },
            RoundingMode::AwayFromZero => !r.is_zero(),
            RoundingMode::HalfAwayFromZero => vs_half != Ordering::Less,
            RoundingMode::HalfTowardZero => vs_half == Ordering::Greater,
            RoundingMode::TowardZero => false,
            RoundingMode::Floor => self.neg && !r.is_zero(),
            RoundingMode::Ceiling => !self.neg && !r.is_zero(),
        };

        let q = if round_up { q.add(&Coefficient::ONE) } else { q };
        Decimal::assemble(self.neg, q, scale)
    }

    /// Banker's rounding: `1.12345 -> 1.1234`, `1.5 -> 2`, `-1.5 -> -2`.
    pub fn round_bank(&self, scale: u8) -> Decimal {
        self.round(scale, RoundingMode::HalfEven)
    }

    /// `1.12 -> 1.2`, `-1.12 -> -1.2` at one digit.
    pub fn round_away_from_zero(&self, scale: u8) -> Decimal {
        self.round(scale, RoundingMode::AwayFromZero)
    }

    pub fn round_half_away_from_zero(&self, scale: u8) -> Decimal {
        self.round(scale, RoundingMode::HalfAwayFromZero)
    }

    pub fn round_half_toward_zero(&self, scale: u8) -> Decimal {
        self.round(scale, RoundingMode::HalfTowardZero)
    }

    pub fn trunc(&self, scale: u8) -> Decimal {
        self.round(scale, RoundingMode::TowardZero)
    }

    /// Largest integer not above `self`.
    pub fn floor(&self) -> Decimal {
        self.round(0, RoundingMode::Floor)
    }

    /// Smallest integer not below `self`.
    pub fn ceil(&self) -> Decimal {
        self.round(0, RoundingMode::Ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::must_parse(s)
    }

    #[test]
    fn test_round_bank() {
        assert_eq!(d("1.12345").round_bank(4), d("1.1234"));
        assert_eq!(d("1.12335").round_bank(4), d("1.1234"));
        assert_eq!(d("1.5").round_bank(0), d("2"));
        assert_eq!(d("2.5").round_bank(0), d("2"));
        assert_eq!(d("-1.5").round_bank(0), d("-2"));
        assert_eq!(d("1.51").round_bank(0), d("2"));
    }

    #[test]
    fn test_round_away_from_zero() {
        assert_eq!(d("1.12").round_away_from_zero(1), d("1.2"));
        assert_eq!(d("1.15").round_away_from_zero(1), d("1.2"));
        assert_eq!(d("-1.12").round_away_from_zero(1), d("-1.2"));
        assert_eq!(d("1.10").round_away_from_zero(1), d("1.1"));
    }

    #[test]
    fn test_round_half_modes() {
        assert_eq!(d("1.12345").round_half_away_from_zero(4), d("1.1235"));
        assert_eq!(d("1.12335").round_half_away_from_zero(4), d("1.1234"));
        assert_eq!(d("-1.5").round_half_away_from_zero(0), d("-2"));

        assert_eq!(d("1.12345").round_half_toward_zero(4), d("1.1234"));
        assert_eq!(d("1.12335").round_half_toward_zero(4), d("1.1233"));
        assert_eq!(d("1.5").round_half_toward_zero(0), d("1"));
        assert_eq!(d("-1.5").round_half_toward_zero(0), d("-1"));
        assert_eq!(d("1.51").round_half_toward_zero(0), d("2"));
    }

    #[test]
    fn test_trunc_floor_ceil() {
        assert_eq!(d("1.12345").trunc(4), d("1.1234"));
        assert_eq!(d("-1.12339").trunc(4), d("-1.1233"));
        assert_eq!(d("1.5").floor(), d("1"));
        assert_eq!(d("-1.5").floor(), d("-2"));
        assert_eq!(d("1.5").ceil(), d("2"));
        assert_eq!(d("-1.5").ceil(), d("-1"));
        assert_eq!(d("-0.5").ceil(), Decimal::ZERO);
        assert_eq!(d("-0.5").ceil().signum(), 0);
        assert_eq!(d("7").floor(), d("7"));
        assert_eq!(d("1.23").round(2, RoundingMode::Floor), d("1.23"));
        assert_eq!(d("-1.231").round(2, RoundingMode::Floor), d("-1.24"));
        assert_eq!(d("1.231").round(2, RoundingMode::Ceiling), d("1.24"));
    }

    #[test]
    fn test_round_carries_into_wide_coefficient() {
        let x = d("340282366920938463463374607431768211455.9");
        let up = x.round_half_away_from_zero(0);
        assert!(up.coefficient().is_big());
        assert_eq!(up.to_string(), "340282366920938463463374607431768211456");
    }

    #[test]
    fn test_round_full_scale() {
        let x = d("0.5000000000000000000");
        assert_eq!(x.round_bank(0), Decimal::ZERO);
        assert_eq!(x.round_half_away_from_zero(0), Decimal::ONE);
        assert_eq!(d("9.9999999999999999999").round_bank(0), d("10"));
    }
}

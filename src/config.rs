// ============================================================================
// Decimal Configuration
// Precision context for scale-capped operations
// ============================================================================

use crate::decimal::{Decimal, MAX_SCALE};
use crate::numeric::{NumericError, NumericResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Precision context for the operations whose result scale is not implied
/// by their operands (division, powers, roots, truncating multiplication).
///
/// Plain `Decimal` methods behave as if run under [`DecimalConfig::DEFAULT`].
/// A configuration is an immutable value; pass it where a narrower result
/// scale is needed instead of changing any global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimalConfig {
    /// Fractional digits kept by scale-capped operations (1..=19)
    default_scale: u8,
}

impl DecimalConfig {
    pub const DEFAULT: Self = Self {
        default_scale: MAX_SCALE,
    };

    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Builder method: Set the result scale
    pub const fn with_default_scale(mut self, scale: u8) -> Self {
        self.default_scale = scale;
        self
    }

    #[inline]
    pub const fn default_scale(&self) -> u8 {
        self.default_scale
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `PrecisionOutOfRange` unless the scale is within 1..=19.
    pub fn validate(&self) -> NumericResult<()> {
        if self.default_scale == 0 || self.default_scale > MAX_SCALE {
            return Err(NumericError::PrecisionOutOfRange);
        }
        Ok(())
    }

    #[inline]
    fn cap(&self) -> NumericResult<u8> {
        self.validate().map(|_| self.default_scale)
    }

    // ========================================================================
    // Scale-capped Operations
    // ========================================================================

    /// Parse, rejecting more fractional digits than the configured scale.
    pub fn parse(&self, s: &str) -> NumericResult<Decimal> {
        Decimal::parse_with(s, self.cap()?)
    }

    /// `coef / 10^scale`; the scale must not exceed the configured one.
    pub fn from_u64(&self, coef: u64, scale: u8) -> NumericResult<Decimal> {
        if scale > self.cap()? {
            return Err(NumericError::PrecisionOutOfRange);
        }
        Decimal::from_u64(coef, scale)
    }

    /// `coef / 10^scale`; the scale must not exceed the configured one.
    pub fn from_i64(&self, coef: i64, scale: u8) -> NumericResult<Decimal> {
        if scale > self.cap()? {
            return Err(NumericError::PrecisionOutOfRange);
        }
        Decimal::from_i64(coef, scale)
    }

    pub fn mul(&self, d: &Decimal, e: &Decimal) -> NumericResult<Decimal> {
        Ok(d.mul_with(e, self.cap()?))
    }

    /// `d * v`, truncated to the configured scale.
    pub fn mul_u64(&self, d: &Decimal, v: u64) -> NumericResult<Decimal> {
        Ok(d.mul_u64(v).trunc(self.cap()?))
    }

    pub fn div(&self, d: &Decimal, e: &Decimal) -> NumericResult<Decimal> {
        d.div_with(e, self.cap()?)
    }

    pub fn div_u64(&self, d: &Decimal, v: u64) -> NumericResult<Decimal> {
        d.div_u64_with(v, self.cap()?)
    }

    pub fn pow_int32(&self, d: &Decimal, e: i32) -> NumericResult<Decimal> {
        d.pow_int32_with(e, self.cap()?)
    }

    pub fn pow_to_int_part(&self, d: &Decimal, e: &Decimal) -> NumericResult<Decimal> {
        d.pow_to_int_part_with(e, self.cap()?)
    }

    pub fn sqrt(&self, d: &Decimal) -> NumericResult<Decimal> {
        d.sqrt_with(self.cap()?)
    }
}

impl Default for DecimalConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl DecimalConfig {
    /// Cent-denominated amounts: 2 fractional digits
    pub const fn currency() -> Self {
        Self::DEFAULT.with_default_scale(2)
    }

    /// Basis-point rates and FX quotes: 4 fractional digits
    pub const fn rates() -> Self {
        Self::DEFAULT.with_default_scale(4)
    }

    /// Satoshi-denominated amounts: 8 fractional digits
    pub const fn crypto() -> Self {
        Self::DEFAULT.with_default_scale(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::must_parse(s)
    }

    #[test]
    fn test_config_creation() {
        let config = DecimalConfig::new();
        assert_eq!(config, DecimalConfig::default());
        assert_eq!(config.default_scale(), 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            DecimalConfig::new().with_default_scale(0).validate(),
            Err(NumericError::PrecisionOutOfRange)
        );
        assert_eq!(
            DecimalConfig::new().with_default_scale(20).validate(),
            Err(NumericError::PrecisionOutOfRange)
        );

        let invalid = DecimalConfig::new().with_default_scale(25);
        assert_eq!(
            invalid.div(&d("1"), &d("3")),
            Err(NumericError::PrecisionOutOfRange)
        );
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(DecimalConfig::currency().default_scale(), 2);
        assert_eq!(DecimalConfig::rates().default_scale(), 4);
        assert_eq!(DecimalConfig::crypto().default_scale(), 8);
    }

    #[test]
    fn test_default_matches_plain_methods() {
        let config = DecimalConfig::DEFAULT;
        let (x, y) = (d("2"), d("3"));
        assert_eq!(config.div(&x, &y).unwrap(), x.checked_div(&y).unwrap());
        assert_eq!(config.sqrt(&x).unwrap(), x.sqrt().unwrap());
        assert_eq!(config.pow_int32(&y, -3).unwrap(), y.pow_int32(-3).unwrap());
    }

    #[test]
    fn test_scale_capped_operations() {
        let config = DecimalConfig::currency();
        assert_eq!(config.div(&d("10"), &d("3")), Ok(d("3.33")));
        assert_eq!(config.div(&d("-10"), &d("3")), Ok(d("-3.33")));
        assert_eq!(config.div_u64(&d("1"), 8), Ok(d("0.12")));
        assert_eq!(config.div_u64(&d("1.999"), 1), Ok(d("1.99")));
        assert_eq!(config.mul(&d("1.25"), &d("1.25")), Ok(d("1.56")));
        assert_eq!(config.mul_u64(&d("0.125"), 3), Ok(d("0.37")));
        assert_eq!(config.sqrt(&d("2")), Ok(d("1.41")));
        assert_eq!(config.pow_int32(&d("1.5"), 3), Ok(d("3.37")));
        assert_eq!(config.pow_int32(&d("3"), -1), Ok(d("0.33")));
        assert_eq!(config.pow_to_int_part(&d("2"), &d("-2.7")), Ok(d("0.25")));
        assert_eq!(config.div(&d("1"), &d("0")), Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_scale_capped_construction() {
        let config = DecimalConfig::currency();
        assert_eq!(config.parse("1.25"), Ok(d("1.25")));
        assert_eq!(config.parse("1.255"), Err(NumericError::PrecisionOutOfRange));
        assert_eq!(config.from_u64(125, 2), Ok(d("1.25")));
        assert_eq!(config.from_i64(-125, 3), Err(NumericError::PrecisionOutOfRange));
    }

    #[test]
    fn test_wider_inputs_than_config() {
        // values built at full precision are valid inputs to a narrower context
        let config = DecimalConfig::currency();
        let precise = d("0.0000000000000000001");
        assert_eq!(config.mul(&precise, &d("1")), Ok(Decimal::ZERO));
        assert_eq!(config.div(&d("2.123456"), &d("1")), Ok(d("2.12")));
        assert_eq!(config.pow_int32(&d("1.123456"), 1), Ok(d("1.12")));
        assert_eq!(config.sqrt(&d("0.0000000000000000004")), Ok(Decimal::ZERO));
    }
}

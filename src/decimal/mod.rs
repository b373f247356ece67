// ============================================================================
// Decimal
// Signed fixed-point value with up to 19 fractional digits
// ============================================================================
//
// A Decimal is (-1)^neg * coef / 10^scale. The coefficient carries the
// fast-path/fallback split; this layer only tracks sign and scale and picks
// the widest fixed-width word that can hold an intermediate result.
//
// Invariants:
// - coef == 0 implies neg == false and scale == 0
// - scale <= MAX_SCALE
// - values are immutable; every operation returns a new Decimal

mod arith;
mod cmp;
mod parse;
mod pow;
mod round;

pub use round::RoundingMode;

use crate::numeric::{Coefficient, NumericError, NumericResult, Word128};
use std::fmt;

/// Maximum number of digits after the decimal point.
pub const MAX_SCALE: u8 = 19;

/// Maximum accepted length of a string input.
pub const MAX_STR_LEN: usize = 200;

/// Signed fixed-point decimal.
///
/// Equality, ordering and hashing are numeric: `1.50 == 1.5`.
#[derive(Clone, Default)]
pub struct Decimal {
    neg: bool,
    coef: Coefficient,
    scale: u8,
}

#[inline]
pub(crate) fn fallback(op: &'static str) {
    tracing::trace!(op, "decimal operation re-executed in arbitrary precision");
}

#[inline]
fn check_scale(scale: u8) -> NumericResult<()> {
    if scale > MAX_SCALE {
        return Err(NumericError::PrecisionOutOfRange);
    }
    Ok(())
}

impl Decimal {
    pub const ZERO: Self = Self {
        neg: false,
        coef: Coefficient::ZERO,
        scale: 0,
    };

    pub const ONE: Self = Self {
        neg: false,
        coef: Coefficient::ONE,
        scale: 0,
    };

    /// Builds a value, collapsing every zero to the canonical zero.
    #[inline]
    pub(crate) fn assemble(neg: bool, coef: Coefficient, scale: u8) -> Self {
        if coef.is_zero() {
            return Self::ZERO;
        }
        Self { neg, coef, scale }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from a sign, a 128-bit coefficient given as `(hi, lo)` limbs
    /// and a scale.
    ///
    /// # Errors
    /// Returns `PrecisionOutOfRange` if `scale > 19`.
    pub fn from_parts(neg: bool, hi: u64, lo: u64, scale: u8) -> NumericResult<Self> {
        check_scale(scale)?;
        Ok(Self::assemble(
            neg,
            Coefficient::from_word128(Word128::new(hi, lo)),
            scale,
        ))
    }

    /// The `(neg, hi, lo, scale)` view of the value, or `None` when the
    /// coefficient needs more than 128 bits.
    pub fn to_parts(&self) -> Option<(bool, u64, u64, u8)> {
        let w = self.coef.as_word128()?;
        Some((self.neg, w.high(), w.low(), self.scale))
    }

    /// `coef / 10^scale`.
    ///
    /// # Errors
    /// Returns `PrecisionOutOfRange` if `scale > 19`.
    pub fn from_u64(coef: u64, scale: u8) -> NumericResult<Self> {
        check_scale(scale)?;
        Ok(Self::assemble(false, Coefficient::from_u64(coef), scale))
    }

    /// `coef / 10^scale`.
    ///
    /// # Errors
    /// Returns `PrecisionOutOfRange` if `scale > 19`.
    pub fn from_i64(coef: i64, scale: u8) -> NumericResult<Self> {
        check_scale(scale)?;
        Ok(Self::assemble(
            coef < 0,
            Coefficient::from_u64(coef.unsigned_abs()),
            scale,
        ))
    }

    pub fn from_word128(coef: Word128, scale: u8) -> NumericResult<Self> {
        check_scale(scale)?;
        Ok(Self::assemble(false, Coefficient::from_word128(coef), scale))
    }

    /// Create from an explicit coefficient in either representation.
    pub fn from_coefficient(neg: bool, coef: Coefficient, scale: u8) -> NumericResult<Self> {
        check_scale(scale)?;
        Ok(Self::assemble(neg, coef, scale))
    }

    /// Convert through the shortest decimal text that round-trips `f`.
    ///
    /// Only suitable for low-precision inputs such as `0.0001` or
    /// `-123.456`.
    ///
    /// # Errors
    /// - `InvalidFormat` for NaN or infinities
    /// - any error of [`Decimal::parse`] for the rendered text
    pub fn from_f64(f: f64) -> NumericResult<Self> {
        if !f.is_finite() {
            return Err(NumericError::InvalidFormat);
        }
        Self::parse(&f.to_string())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    #[inline]
    pub const fn coefficient(&self) -> &Coefficient {
        &self.coef
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coef.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.neg && !self.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.neg && !self.is_zero()
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.neg {
            -1
        } else {
            1
        }
    }

    pub fn neg(&self) -> Self {
        Self::assemble(!self.neg, self.coef.clone(), self.scale)
    }

    pub fn abs(&self) -> Self {
        Self::assemble(false, self.coef.clone(), self.scale)
    }

    /// Same value with trailing fractional zeros removed.
    pub(crate) fn trimmed(&self) -> Self {
        if self.scale == 0 {
            return self.clone();
        }
        let zeros = self.coef.trailing_decimal_zeros().min(u32::from(self.scale));
        if zeros == 0 {
            return self.clone();
        }
        let (q, _) = self.coef.quo_rem_pow10(zeros);
        Self::assemble(self.neg, q, self.scale - zeros as u8)
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Integer part, truncated toward zero.
    ///
    /// # Errors
    /// Returns `IntegerPartOverflow` if it does not fit in an `i64`.
    pub fn to_i64(&self) -> NumericResult<i64> {
        let int_part = self.trunc(0);
        let magnitude = int_part
            .coef
            .as_word128()
            .filter(|w| w.high() == 0)
            .map(|w| w.low())
            .ok_or(NumericError::IntegerPartOverflow)?;

        if int_part.neg {
            0i64.checked_sub_unsigned(magnitude)
                .ok_or(NumericError::IntegerPartOverflow)
        } else {
            i64::try_from(magnitude).map_err(|_| NumericError::IntegerPartOverflow)
        }
    }

    /// Nearest `f64`. Large or long values lose precision.
    pub fn to_f64_lossy(&self) -> f64 {
        self.to_string().parse().unwrap_or_else(|_| {
            let magnitude = self.coef.to_f64() / 10f64.powi(i32::from(self.scale));
            if self.neg {
                -magnitude
            } else {
                magnitude
            }
        })
    }

    /// Convert from `rust_decimal::Decimal`.
    ///
    /// Trailing zeros are dropped first, so only significant fractional
    /// digits count against the scale limit.
    ///
    /// # Errors
    /// Returns `PrecisionOutOfRange` if more than 19 significant fractional
    /// digits remain.
    pub fn from_rust_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let d = d.normalize();
        let scale = u8::try_from(d.scale()).map_err(|_| NumericError::PrecisionOutOfRange)?;
        check_scale(scale)?;

        let mantissa = d.mantissa();
        Ok(Self::assemble(
            mantissa < 0,
            Coefficient::from_word128(Word128::from_u128(mantissa.unsigned_abs())),
            scale,
        ))
    }

    /// Convert to `rust_decimal::Decimal` at the same scale.
    ///
    /// # Errors
    /// Returns `ValueOverflow` if the coefficient needs more than 96 bits.
    pub fn to_rust_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        let magnitude = self
            .coef
            .as_word128()
            .ok_or(NumericError::ValueOverflow)?
            .to_u128();
        let mantissa = i128::try_from(magnitude).map_err(|_| NumericError::ValueOverflow)?;
        let mantissa = if self.neg { -mantissa } else { mantissa };

        rust_decimal::Decimal::try_from_i128_with_scale(mantissa, u32::from(self.scale))
            .map_err(|_| NumericError::ValueOverflow)
    }
}

impl From<u64> for Decimal {
    fn from(v: u64) -> Self {
        Self::assemble(false, Coefficient::from_u64(v), 0)
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Self::assemble(v < 0, Coefficient::from_u64(v.unsigned_abs()), 0)
    }
}

impl From<Word128> for Decimal {
    fn from(v: Word128) -> Self {
        Self::assemble(false, Coefficient::from_word128(v), 0)
    }
}

impl TryFrom<rust_decimal::Decimal> for Decimal {
    type Error = NumericError;

    fn try_from(d: rust_decimal::Decimal) -> Result<Self, Self::Error> {
        Self::from_rust_decimal(d)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::must_parse(s)
    }

    #[test]
    fn test_constants() {
        assert!(Decimal::ZERO.is_zero());
        assert_eq!(Decimal::ONE.to_string(), "1");
        assert_eq!(Decimal::default(), Decimal::ZERO);
    }

    #[test]
    fn test_canonical_zero() {
        let z = Decimal::from_i64(0, 7).unwrap();
        assert_eq!(z.scale(), 0);
        assert!(!z.is_negative());
        assert_eq!(d("-0.000").scale(), 0);
        assert_eq!(d("-0").signum(), 0);
        assert_eq!(Decimal::ZERO.neg().to_parts(), Some((false, 0, 0, 0)));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Decimal::from_u64(12345, 2).unwrap(), d("123.45"));
        assert_eq!(Decimal::from_i64(-12345, 3).unwrap(), d("-12.345"));
        assert_eq!(
            Decimal::from_i64(i64::MIN, 0).unwrap().to_string(),
            "-9223372036854775808"
        );
        assert_eq!(
            Decimal::from_u64(1, 20),
            Err(NumericError::PrecisionOutOfRange)
        );
        assert_eq!(
            Decimal::from_parts(true, 1, 0, 19).unwrap().to_parts(),
            Some((true, 1, 0, 19))
        );
        assert_eq!(Decimal::from(42u64), d("42"));
        assert_eq!(Decimal::from(-42i64), d("-42"));
    }

    #[test]
    fn test_to_parts_of_wide_value() {
        let wide = d("1000000000000000000000000000000000000000000");
        assert!(wide.coefficient().is_big());
        assert_eq!(wide.to_parts(), None);
    }

    #[test]
    fn test_sign_accessors() {
        let x = d("-1.5");
        assert!(x.is_negative());
        assert!(!x.is_positive());
        assert_eq!(x.signum(), -1);
        assert_eq!(x.abs(), d("1.5"));
        assert_eq!(x.neg(), d("1.5"));
        assert_eq!(d("2").signum(), 1);
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(d("123.999").to_i64(), Ok(123));
        assert_eq!(d("-123.999").to_i64(), Ok(-123));
        assert_eq!(d("9223372036854775807").to_i64(), Ok(i64::MAX));
        assert_eq!(d("-9223372036854775808").to_i64(), Ok(i64::MIN));
        assert_eq!(
            d("9223372036854775808").to_i64(),
            Err(NumericError::IntegerPartOverflow)
        );
        assert_eq!(
            d("123456789012345678901234567890123456789012").to_i64(),
            Err(NumericError::IntegerPartOverflow)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(Decimal::from_f64(123.456).unwrap(), d("123.456"));
        assert_eq!(Decimal::from_f64(-0.0001).unwrap(), d("-0.0001"));
        assert_eq!(Decimal::from_f64(f64::NAN), Err(NumericError::InvalidFormat));
        assert_eq!(
            Decimal::from_f64(f64::INFINITY),
            Err(NumericError::InvalidFormat)
        );
        assert_eq!(d("-1.25").to_f64_lossy(), -1.25);
    }

    #[test]
    fn test_rust_decimal_conversion() {
        let r = rust_decimal::Decimal::new(12345, 2);
        let x = Decimal::from_rust_decimal(r).unwrap();
        assert_eq!(x, d("123.45"));
        assert_eq!(x.to_rust_decimal(), Ok(r));

        // trailing zeros do not count against the scale limit
        let padded = rust_decimal::Decimal::from_i128_with_scale(1_500_000_000_000_000_000_000_000, 24);
        assert_eq!(Decimal::from_rust_decimal(padded).unwrap(), d("1.5"));

        let too_precise = rust_decimal::Decimal::from_i128_with_scale(1, 25);
        assert_eq!(
            Decimal::try_from(too_precise),
            Err(NumericError::PrecisionOutOfRange)
        );

        let wide = d("100000000000000000000000000000");
        assert_eq!(wide.to_rust_decimal(), Err(NumericError::ValueOverflow));
        assert_eq!(
            d("-0.5").to_rust_decimal(),
            Ok(rust_decimal::Decimal::new(-5, 1))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_string_form() {
        let x = d("22222.22211");
        let json = serde_json::to_string(&x).unwrap();
        assert_eq!(json, "\"22222.22211\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, x);
        assert!(serde_json::from_str::<Decimal>("\"1.2.3\"").is_err());
    }
}

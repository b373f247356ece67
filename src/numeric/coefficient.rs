// ============================================================================
// Decimal Coefficient
// Unsigned magnitude with a 128-bit fast path and arbitrary-precision fallback
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::pow10::{pow10_big, MAX_POW10_EXP, POW10};
use super::word128::Word128;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unsigned digit string of a decimal.
///
/// Every operation tries `Exact` first and re-executes with `BigUint` when an
/// operand is `Big` or the 128-bit primitive overflows. Results built through
/// [`Coefficient::from_biguint`] are demoted back to `Exact` whenever they fit,
/// so the variant never changes the value, only the cost of computing it.
#[derive(Clone)]
pub enum Coefficient {
    Exact(Word128),
    Big(BigUint),
}

#[inline]
fn slow_path(op: &'static str) {
    tracing::trace!(op, "coefficient re-executed in arbitrary precision");
}

/// Counts trailing decimal zeros up to 19 using `divisible(k)`, which must
/// report whether the value is a multiple of 10^k.
fn count_trailing_zeros(divisible: impl Fn(u32) -> bool) -> u32 {
    let mut zeros = 0;
    if divisible(16) {
        zeros = 16;
        if divisible(zeros + 2) {
            zeros += 2;
        }
        if divisible(zeros + 1) {
            zeros += 1;
        }
        return zeros;
    }
    for step in [8, 4, 2, 1] {
        if divisible(zeros + step) {
            zeros += step;
        }
    }
    zeros
}

impl Coefficient {
    pub const ZERO: Self = Self::Exact(Word128::ZERO);
    pub const ONE: Self = Self::Exact(Word128::ONE);

    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        Self::Exact(Word128::from_u64(v))
    }

    #[inline]
    pub const fn from_word128(v: Word128) -> Self {
        Self::Exact(v)
    }

    /// Wraps `n`, demoting to `Exact` when it fits in 128 bits.
    pub fn from_biguint(n: BigUint) -> Self {
        match Word128::from_biguint(&n) {
            Ok(w) => Self::Exact(w),
            Err(_) => Self::Big(n),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(w) => w.is_zero(),
            Self::Big(b) => b.is_zero(),
        }
    }

    #[inline]
    pub fn is_big(&self) -> bool {
        matches!(self, Self::Big(_))
    }

    /// The value as a `Word128`, if it fits.
    pub fn as_word128(&self) -> Option<Word128> {
        match self {
            Self::Exact(w) => Some(*w),
            Self::Big(b) => Word128::from_biguint(b).ok(),
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        match self {
            Self::Exact(w) => w.to_biguint(),
            Self::Big(b) => b.clone(),
        }
    }

    pub fn bit_len(&self) -> u64 {
        match self {
            Self::Exact(w) => u64::from(w.bit_len()),
            Self::Big(b) => b.bits(),
        }
    }

    /// Lossy conversion used for float output.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(w) => w.to_u128() as f64,
            Self::Big(b) => b.to_f64().unwrap_or(f64::INFINITY),
        }
    }

    pub fn is_odd(&self) -> bool {
        match self {
            Self::Exact(w) => w.low() & 1 == 1,
            Self::Big(b) => b.is_odd(),
        }
    }

    /// Number of base-10 digits; 1 for zero.
    pub fn decimal_digits(&self) -> u32 {
        match self {
            Self::Exact(w) => POW10
                .iter()
                .skip(1)
                .position(|p| w < p)
                .map_or(MAX_POW10_EXP as u32 + 1, |i| i as u32 + 1),
            Self::Big(b) => b.to_string().len() as u32,
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn add(&self, other: &Self) -> Self {
        if let (Self::Exact(a), Self::Exact(b)) = (self, other) {
            if let Ok(sum) = a.checked_add(*b) {
                return Self::Exact(sum);
            }
        }
        slow_path("add");
        Self::from_biguint(self.to_biguint() + other.to_biguint())
    }

    /// # Errors
    /// Returns `Underflow` if `other > self`.
    pub fn checked_sub(&self, other: &Self) -> NumericResult<Self> {
        if let (Self::Exact(a), Self::Exact(b)) = (self, other) {
            return a.checked_sub(*b).map(Self::Exact);
        }
        if self < other {
            return Err(NumericError::Underflow);
        }
        slow_path("sub");
        Ok(Self::from_biguint(self.to_biguint() - other.to_biguint()))
    }

    /// `|self - other|`, and whether `self >= other`.
    pub fn abs_diff(&self, other: &Self) -> (Self, bool) {
        if let (Self::Exact(a), Self::Exact(b)) = (self, other) {
            return if a >= b {
                (Self::Exact(a.wrapping_sub(*b)), true)
            } else {
                (Self::Exact(b.wrapping_sub(*a)), false)
            };
        }
        slow_path("abs_diff");
        let (a, b) = (self.to_biguint(), other.to_biguint());
        if a >= b {
            (Self::from_biguint(a - b), true)
        } else {
            (Self::from_biguint(b - a), false)
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        if let (Self::Exact(a), Self::Exact(b)) = (self, other) {
            if let Ok(product) = a.checked_mul(*b) {
                return Self::Exact(product);
            }
        }
        slow_path("mul");
        Self::from_biguint(self.to_biguint() * other.to_biguint())
    }

    pub fn mul_u64(&self, v: u64) -> Self {
        if let Self::Exact(a) = self {
            if let Ok(product) = a.checked_mul_u64(v) {
                return Self::Exact(product);
            }
        }
        slow_path("mul_u64");
        Self::from_biguint(self.to_biguint() * v)
    }

    /// `self * 10^k`.
    pub fn mul_pow10(&self, k: u32) -> Self {
        if k == 0 {
            return self.clone();
        }
        if let Self::Exact(a) = self {
            if let Some(p) = POW10.get(k as usize) {
                if let Ok(product) = a.checked_mul(*p) {
                    return Self::Exact(product);
                }
            }
        }
        slow_path("mul_pow10");
        Self::from_biguint(self.to_biguint() * pow10_big(u64::from(k)))
    }

    /// # Errors
    /// Returns `DivisionByZero` if `other` is zero.
    pub fn checked_quo_rem(&self, other: &Self) -> NumericResult<(Self, Self)> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if let (Self::Exact(a), Self::Exact(b)) = (self, other) {
            let (q, r) = a.checked_quo_rem(*b)?;
            return Ok((Self::Exact(q), Self::Exact(r)));
        }
        slow_path("quo_rem");
        let (q, r) = self.to_biguint().div_rem(&other.to_biguint());
        Ok((Self::from_biguint(q), Self::from_biguint(r)))
    }

    /// Quotient and remainder by 10^k.
    pub fn quo_rem_pow10(&self, k: u32) -> (Self, Self) {
        if let Self::Exact(a) = self {
            let k = k as usize;
            if k <= 19 {
                let (q, r) = a.quo_rem_u64(POW10[k].low());
                return (Self::Exact(q), Self::from_u64(r));
            }
            if k > MAX_POW10_EXP {
                return (Self::ZERO, self.clone());
            }
            if let Ok((q, r)) = a.checked_quo_rem(POW10[k]) {
                return (Self::Exact(q), Self::Exact(r));
            }
        }
        slow_path("quo_rem_pow10");
        let (q, r) = self.to_biguint().div_rem(&pow10_big(u64::from(k)));
        (Self::from_biguint(q), Self::from_biguint(r))
    }

    /// Trailing decimal zeros, capped at 19.
    pub fn trailing_decimal_zeros(&self) -> u32 {
        if self.is_zero() {
            return 0;
        }
        match self {
            Self::Exact(w) => {
                count_trailing_zeros(|k| w.quo_rem_u64(POW10[k as usize].low()).1 == 0)
            },
            Self::Big(b) => count_trailing_zeros(|k| (b % pow10_big(u64::from(k))).is_zero()),
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Word128> for Coefficient {
    fn from(v: Word128) -> Self {
        Self::Exact(v)
    }
}

impl From<BigUint> for Coefficient {
    fn from(v: BigUint) -> Self {
        Self::from_biguint(v)
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coefficient {}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.cmp(b),
            (Self::Big(a), Self::Big(b)) => a.cmp(b),
            (Self::Exact(a), Self::Big(b)) => a.to_biguint().cmp(b),
            (Self::Big(a), Self::Exact(b)) => a.cmp(&b.to_biguint()),
        }
    }
}

impl Hash for Coefficient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_word128() {
            Some(w) => w.hash(state),
            None => self.to_biguint().hash(state),
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(w) => fmt::Display::fmt(w, f),
            Self::Big(b) => fmt::Display::fmt(b, f),
        }
    }
}

impl fmt::Debug for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(w) => write!(f, "Exact({})", w),
            Self::Big(b) => write!(f, "Big({})", b),
        }
    }
}

// ============================================================================
// Decimal Powers and Roots
// Integer powers and square roots, truncated to the scale cap
// ============================================================================

use super::{fallback, Decimal, MAX_SCALE};
use crate::numeric::{
    pow10_big, pow10_wide, Coefficient, NumericError, NumericResult, Word256,
    MAX_POW10_EXP, MAX_POW10_WIDE_EXP, POW10,
};
use std::cmp::Ordering;

/// Widest scaled radicand the 256-bit Newton iteration accepts.
const SQRT_WIDE_BITS: u32 = 252;

/// Bounds on `log10(coef)` for a non-zero coefficient.
///
/// The float estimate is widened and clamped to the exact digit count, so
/// `lo <= log10(coef) <= hi` always holds.
fn log10_bounds(coef: &Coefficient) -> (f64, f64) {
    let digits = f64::from(coef.decimal_digits());
    let estimate = coef.to_f64().log10();
    ((estimate - 1e-9).max(digits - 1.0), (estimate + 1e-9).min(digits))
}

/// `coef^k / 10^(s*k)` truncated to `cap` digits, as `(coefficient, scale)`.
fn pow_positive(coef: &Coefficient, s: u8, k: u32, cap: u8) -> (Coefficient, u8) {
    let total = u64::from(s) * u64::from(k);
    let cap64 = u64::from(cap);

    if total > cap64 {
        // |result| < 10^-cap truncates to zero
        let (_, hi) = log10_bounds(coef);
        if f64::from(k) * (hi - f64::from(s)) < -(f64::from(cap) + 1.0) {
            return (Coefficient::ZERO, 0);
        }
    }

    if let Coefficient::Exact(c) = coef {
        let skip = (c.high() != 0 && k >= 4) || total > cap64 + MAX_POW10_EXP as u64;
        if !skip {
            if let Ok(p) = Word256::from_word128(*c).checked_pow(k) {
                if total <= cap64 {
                    if let Ok(w) = p.try_into_word128() {
                        return (Coefficient::Exact(w), total as u8);
                    }
                } else if let Ok((q, _)) =
                    p.checked_quo_rem_word128(POW10[(total - cap64) as usize])
                {
                    if let Ok(w) = q.try_into_word128() {
                        return (Coefficient::Exact(w), cap);
                    }
                }
            }
        }
    }

    fallback("pow");
    let p = coef.to_biguint().pow(k);
    if total <= cap64 {
        return (Coefficient::from_biguint(p), total as u8);
    }
    (Coefficient::from_biguint(p / pow10_big(total - cap64)), cap)
}

/// `10^(s*k) / coef^k` truncated to `cap` digits.
fn pow_inverse(coef: &Coefficient, s: u8, k: u32, cap: u8) -> Coefficient {
    let (lo, _) = log10_bounds(coef);
    if f64::from(k) * (lo - f64::from(s)) > f64::from(cap) + 1.0 {
        return Coefficient::ZERO;
    }

    let num_exp = u64::from(s) * u64::from(k) + u64::from(cap);
    if let Coefficient::Exact(c) = coef {
        if num_exp <= u64::from(MAX_POW10_WIDE_EXP) {
            let den = Word256::from_word128(*c).checked_pow(k);
            let num = pow10_wide(num_exp as u32);
            if let (Ok(num), Ok(den)) = (num, den) {
                if let Ok((q, _)) = num.checked_quo_rem(den) {
                    if let Ok(w) = q.try_into_word128() {
                        return Coefficient::Exact(w);
                    }
                }
            }
        }
    }

    fallback("pow_inverse");
    Coefficient::from_biguint(pow10_big(num_exp) / coef.to_biguint().pow(k))
}

/// Integer square root by Newton's method; `n.bit_len()` must not exceed
/// `SQRT_WIDE_BITS`.
fn isqrt_wide(n: Word256) -> Word256 {
    // 2^ceil(bits/2) is never below the root
    let mut x = Word256::ONE << ((n.bit_len() + 1) / 2);
    loop {
        let y = n.checked_div(x).unwrap_or(Word256::ZERO);
        let next = x.wrapping_add(y) >> 1;
        if next >= x {
            return x;
        }
        x = next;
    }
}

impl Decimal {
    /// `self^e` with at most 19 fractional digits, truncated.
    ///
    /// # Errors
    /// Returns `ZeroRaisedToNegativePower` for `0^e` with `e < 0`.
    pub fn pow_int32(&self, e: i32) -> NumericResult<Decimal> {
        self.pow_int32_with(e, MAX_SCALE)
    }

    pub(crate) fn pow_int32_with(&self, e: i32, cap: u8) -> NumericResult<Decimal> {
        if self.is_zero() {
            return match e.cmp(&0) {
                Ordering::Less => Err(NumericError::ZeroRaisedToNegativePower),
                Ordering::Equal => Ok(Decimal::ONE),
                Ordering::Greater => Ok(Decimal::ZERO),
            };
        }
        match e {
            0 => return Ok(Decimal::ONE),
            1 => return Ok(self.trunc(cap)),
            _ => {},
        }

        let base = self.trimmed();
        let neg = base.neg && e % 2 != 0;
        let k = e.unsigned_abs();

        if base.scale == 0 && base.coef == Coefficient::ONE {
            return Ok(Decimal::assemble(neg, Coefficient::ONE, 0));
        }

        if e > 0 {
            let (coef, scale) = pow_positive(&base.coef, base.scale, k, cap);
            Ok(Decimal::assemble(neg, coef, scale))
        } else {
            let coef = pow_inverse(&base.coef, base.scale, k, cap);
            Ok(Decimal::assemble(neg, coef, cap))
        }
    }

    /// Infallible variant of [`Decimal::pow_int32`] where `0^e` is zero for
    /// every `e`, including zero and negative exponents.
    pub fn pow_int(&self, e: i32) -> Decimal {
        if self.is_zero() {
            return Decimal::ZERO;
        }
        // pow_int32 only fails for a zero base, handled above
        match self.pow_int32(e) {
            Ok(p) => p,
            Err(_) => unreachable!("non-zero base raised to {}", e),
        }
    }

    /// `self` raised to the integer part of `e`.
    ///
    /// # Errors
    /// - `ZeroRaisedToNegativePower` if `self` is zero and `e < 0`
    /// - `ExponentTooLarge` if `|trunc(e)|` exceeds `i32::MAX`
    pub fn pow_to_int_part(&self, e: &Decimal) -> NumericResult<Decimal> {
        self.pow_to_int_part_with(e, MAX_SCALE)
    }

    pub(crate) fn pow_to_int_part_with(&self, e: &Decimal, cap: u8) -> NumericResult<Decimal> {
        if self.is_zero() && e.is_negative() {
            return Err(NumericError::ZeroRaisedToNegativePower);
        }
        let exp = e.trunc(0);
        let magnitude = exp
            .coef
            .as_word128()
            .filter(|w| w.high() == 0)
            .and_then(|w| i32::try_from(w.low()).ok())
            .ok_or(NumericError::ExponentTooLarge)?;

        let k = if exp.neg { -magnitude } else { magnitude };
        self.pow_int32_with(k, cap)
    }

    // ========================================================================
    // Square Root
    // ========================================================================

    /// Square root with 19 fractional digits, truncated.
    ///
    /// # Errors
    /// Returns `NegativeValue` if `self < 0`.
    pub fn sqrt(&self) -> NumericResult<Decimal> {
        self.sqrt_with(MAX_SCALE)
    }

    pub(crate) fn sqrt_with(&self, cap: u8) -> NumericResult<Decimal> {
        if self.is_negative() {
            return Err(NumericError::NegativeValue);
        }
        if self.is_zero() {
            return Ok(Decimal::ZERO);
        }
        if *self == Decimal::ONE {
            return Ok(Decimal::ONE);
        }

        // sqrt(coef / 10^s) * 10^cap == sqrt(coef * 10^(2*cap - s))
        let shift = 2 * i32::from(cap) - i32::from(self.scale);

        if let Coefficient::Exact(c) = &self.coef {
            let n = if shift >= 0 {
                POW10.get(shift as usize).map(|p| {
                    let (hi, lo) = c.widening_mul(*p);
                    Word256::new(hi, lo)
                })
            } else {
                c.checked_div(POW10[shift.unsigned_abs() as usize])
                    .ok()
                    .map(Word256::from_word128)
            };

            if let Some(n) = n.filter(|n| n.bit_len() <= SQRT_WIDE_BITS) {
                if n.is_zero() {
                    return Ok(Decimal::ZERO);
                }
                if let Ok(root) = isqrt_wide(n).try_into_word128() {
                    return Ok(Decimal::assemble(false, Coefficient::Exact(root), cap));
                }
            }
        }

        fallback("sqrt");
        let n = if shift >= 0 {
            self.coef.to_biguint() * pow10_big(u64::from(shift.unsigned_abs()))
        } else {
            self.coef.to_biguint() / pow10_big(u64::from(shift.unsigned_abs()))
        };
        Ok(Decimal::assemble(
            false,
            Coefficient::from_biguint(n.sqrt()),
            cap,
        ))
    }
}

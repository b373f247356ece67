// ============================================================================
// Decimal Arithmetic
// Addition, subtraction, multiplication, division and remainder
// ============================================================================

use super::{fallback, Decimal, MAX_SCALE};
use crate::numeric::{pow10_big, Coefficient, NumericError, NumericResult, Word256, POW10};
use num_integer::Integer;
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Brings both coefficients to the larger of the two scales.
fn align(d: &Decimal, e: &Decimal) -> (Coefficient, Coefficient, u8) {
    match d.scale.cmp(&e.scale) {
        Ordering::Equal => (d.coef.clone(), e.coef.clone(), d.scale),
        Ordering::Greater => (
            d.coef.clone(),
            e.coef.mul_pow10(u32::from(d.scale - e.scale)),
            d.scale,
        ),
        Ordering::Less => (
            d.coef.mul_pow10(u32::from(e.scale - d.scale)),
            e.coef.clone(),
            e.scale,
        ),
    }
}

/// `|a| - |b|` signed as `a_neg` when `|a| >= |b|`, otherwise as `!a_neg`.
fn signed_difference(a: &Coefficient, b: &Coefficient, a_neg: bool, scale: u8) -> Decimal {
    let (diff, a_larger) = a.abs_diff(b);
    Decimal::assemble(if a_larger { a_neg } else { !a_neg }, diff, scale)
}

impl Decimal {
    /// `self + e`. Exact.
    pub fn add(&self, e: &Decimal) -> Decimal {
        let (a, b, scale) = align(self, e);
        if self.neg == e.neg {
            return Decimal::assemble(self.neg, a.add(&b), scale);
        }
        signed_difference(&a, &b, self.neg, scale)
    }

    /// `self - e`. Exact.
    pub fn sub(&self, e: &Decimal) -> Decimal {
        let (a, b, scale) = align(self, e);
        if self.neg != e.neg {
            return Decimal::assemble(self.neg, a.add(&b), scale);
        }
        signed_difference(&a, &b, self.neg, scale)
    }

    /// `self + e` for an unsigned integer `e`.
    pub fn add_u64(&self, e: u64) -> Decimal {
        let b = Coefficient::from_u64(e).mul_pow10(u32::from(self.scale));
        if self.neg {
            return signed_difference(&self.coef, &b, true, self.scale);
        }
        Decimal::assemble(false, self.coef.add(&b), self.scale)
    }

    /// `self - e` for an unsigned integer `e`.
    pub fn sub_u64(&self, e: u64) -> Decimal {
        let b = Coefficient::from_u64(e).mul_pow10(u32::from(self.scale));
        if self.neg {
            return Decimal::assemble(true, self.coef.add(&b), self.scale);
        }
        signed_difference(&self.coef, &b, false, self.scale)
    }

    // ========================================================================
    // Multiplication
    // ========================================================================

    /// `self * e`, truncated to at most 19 fractional digits.
    pub fn mul(&self, e: &Decimal) -> Decimal {
        self.mul_with(e, MAX_SCALE)
    }

    pub(crate) fn mul_with(&self, e: &Decimal, cap: u8) -> Decimal {
        let scale = self.scale + e.scale;
        let neg = self.neg != e.neg;

        if let (Coefficient::Exact(a), Coefficient::Exact(b)) = (&self.coef, &e.coef) {
            let (hi, lo) = a.widening_mul(*b);
            if scale <= cap {
                if hi.is_zero() {
                    return Decimal::assemble(neg, Coefficient::Exact(lo), scale);
                }
            } else {
                let product = Word256::new(hi, lo);
                let divisor = POW10[usize::from(scale - cap)];
                if let Ok((q, _)) = product.checked_quo_rem_word128(divisor) {
                    if let Ok(q) = q.try_into_word128() {
                        return Decimal::assemble(neg, Coefficient::Exact(q), cap);
                    }
                }
            }
        }

        fallback("mul");
        let product = self.coef.to_biguint() * e.coef.to_biguint();
        if scale <= cap {
            return Decimal::assemble(neg, Coefficient::from_biguint(product), scale);
        }
        let q = product / pow10_big(u64::from(scale - cap));
        Decimal::assemble(neg, Coefficient::from_biguint(q), cap)
    }

    /// `self * v` for an unsigned integer `v`. Exact.
    pub fn mul_u64(&self, v: u64) -> Decimal {
        match v {
            0 => Decimal::ZERO,
            1 => self.clone(),
            _ => Decimal::assemble(self.neg, self.coef.mul_u64(v), self.scale),
        }
    }

    // ========================================================================
    // Division
    // ========================================================================

    /// `self / e` with 19 fractional digits, truncated toward zero.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `e` is zero.
    pub fn checked_div(&self, e: &Decimal) -> NumericResult<Decimal> {
        self.div_with(e, MAX_SCALE)
    }

    pub(crate) fn div_with(&self, e: &Decimal, cap: u8) -> NumericResult<Decimal> {
        if e.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let neg = self.neg != e.neg;
        // quotient lands at scale `cap` when the dividend is shifted by this
        let shift = i32::from(cap) - i32::from(self.scale) + i32::from(e.scale);

        if let (Coefficient::Exact(a), Coefficient::Exact(b)) = (&self.coef, &e.coef) {
            let q = if shift >= 0 {
                let (hi, lo) = a.widening_mul(POW10[shift as usize]);
                Word256::new(hi, lo)
                    .checked_quo_rem_word128(*b)
                    .ok()
                    .and_then(|(q, _)| q.try_into_word128().ok())
            } else {
                b.checked_mul(POW10[shift.unsigned_abs() as usize])
                    .and_then(|divisor| a.checked_div(divisor))
                    .ok()
            };
            if let Some(q) = q {
                return Ok(Decimal::assemble(neg, Coefficient::Exact(q), cap));
            }
        }

        fallback("div");
        let (dividend, divisor) = if shift >= 0 {
            (
                self.coef.to_biguint() * pow10_big(u64::from(shift.unsigned_abs())),
                e.coef.to_biguint(),
            )
        } else {
            (
                self.coef.to_biguint(),
                e.coef.to_biguint() * pow10_big(u64::from(shift.unsigned_abs())),
            )
        };
        Ok(Decimal::assemble(
            neg,
            Coefficient::from_biguint(dividend / divisor),
            cap,
        ))
    }

    /// `self / v` for an unsigned integer `v`, 19 fractional digits.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn div_u64(&self, v: u64) -> NumericResult<Decimal> {
        self.div_u64_with(v, MAX_SCALE)
    }

    pub(crate) fn div_u64_with(&self, v: u64, cap: u8) -> NumericResult<Decimal> {
        match v {
            0 => Err(NumericError::DivisionByZero),
            1 => Ok(self.trunc(cap)),
            _ => self.div_with(&Decimal::from(v), cap),
        }
    }

    /// Integer quotient and remainder, like C's `fmod`.
    ///
    /// `q` is an integer with sign `self.neg != e.neg`; `r = self - q * e`
    /// carries the sign of `self`, has `|r| < |e|` and the scale
    /// `max(self.scale, e.scale)`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `e` is zero.
    pub fn quo_rem(&self, e: &Decimal) -> NumericResult<(Decimal, Decimal)> {
        if e.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let scale = self.scale.max(e.scale);
        let q_neg = self.neg != e.neg;
        let d_shift = usize::from(scale - self.scale);
        let e_shift = usize::from(scale - e.scale);

        if let (Coefficient::Exact(a), Coefficient::Exact(b)) = (&self.coef, &e.coef) {
            if let Ok(divisor) = b.checked_mul(POW10[e_shift]) {
                let (hi, lo) = a.widening_mul(POW10[d_shift]);
                if let Ok((q, r)) = Word256::new(hi, lo).checked_quo_rem_word128(divisor) {
                    if let Ok(q) = q.try_into_word128() {
                        return Ok((
                            Decimal::assemble(q_neg, Coefficient::Exact(q), 0),
                            Decimal::assemble(self.neg, Coefficient::Exact(r), scale),
                        ));
                    }
                }
            }
        }

        fallback("quo_rem");
        let dividend = self.coef.to_biguint() * pow10_big(d_shift as u64);
        let divisor = e.coef.to_biguint() * pow10_big(e_shift as u64);
        let (q, r) = dividend.div_rem(&divisor);
        Ok((
            Decimal::assemble(q_neg, Coefficient::from_biguint(q), 0),
            Decimal::assemble(self.neg, Coefficient::from_biguint(r), scale),
        ))
    }

    /// Remainder of [`Decimal::quo_rem`].
    pub fn rem(&self, e: &Decimal) -> NumericResult<Decimal> {
        self.quo_rem(e).map(|(_, r)| r)
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! forward_binop {
    ($trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr) => {
        impl $trait<&Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &Decimal) -> Decimal {
                let ($a, $b) = (self, rhs);
                $body
            }
        }

        impl $trait<Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                $trait::$method(&self, &rhs)
            }
        }

        impl $trait<&Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &Decimal) -> Decimal {
                $trait::$method(&self, rhs)
            }
        }

        impl $trait<Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                $trait::$method(self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, |a, b| Decimal::add(a, b));
forward_binop!(Sub, sub, |a, b| Decimal::sub(a, b));
forward_binop!(Mul, mul, |a, b| Decimal::mul(a, b));
forward_binop!(Div, div, |a, b| a
    .checked_div(b)
    .expect("Decimal division by zero"));
forward_binop!(Rem, rem, |a, b| Decimal::rem(a, b)
    .expect("Decimal division by zero"));

impl Neg for Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Decimal {
        Decimal::neg(&self)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Decimal {
        Decimal::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> Decimal {
        Decimal::must_parse(s)
    }

    /// Same value with the coefficient forced into the arbitrary-precision
    /// representation.
    fn forced_big(x: &Decimal) -> Decimal {
        Decimal {
            neg: x.neg,
            coef: Coefficient::Big(x.coef.to_biguint()),
            scale: x.scale,
        }
    }

    #[test]
    fn test_add_sub() {
        assert_eq!(d("12345.6789") + d("9876.54321"), d("22222.22211"));
        assert_eq!((d("12345.6789") + d("9876.54321")).to_string(), "22222.22211");
        assert_eq!(d("1.5") - d("2.25"), d("-0.75"));
        assert_eq!(d("-1.5") + d("1.5"), Decimal::ZERO);
        assert_eq!((d("-1.5") + d("1.5")).scale(), 0);
        assert_eq!(d("-1.5") - d("-2"), d("0.5"));
        assert_eq!(d("-1") + d("-2.5"), d("-3.5"));
    }

    #[test]
    fn test_signed_difference_across_representations() {
        let wide = d("680564733841876926926749214863536422912.5");
        assert!(wide.coefficient().is_big());
        assert_eq!(&wide - &wide, Decimal::ZERO);
        assert_eq!(
            d("0.5") - &wide,
            d("-680564733841876926926749214863536422912")
        );
        assert_eq!(
            wide.neg() + d("1.5"),
            d("-680564733841876926926749214863536422911")
        );
        assert_eq!(d("2").sub_u64(2), Decimal::ZERO);
    }

    #[test]
    fn test_add_sub_u64() {
        assert_eq!(d("1.25").add_u64(2), d("3.25"));
        assert_eq!(d("-1.25").add_u64(2), d("0.75"));
        assert_eq!(d("-3.25").add_u64(2), d("-1.25"));
        assert_eq!(d("-2").add_u64(2), Decimal::ZERO);
        assert_eq!(d("1.25").sub_u64(2), d("-0.75"));
        assert_eq!(d("-1.25").sub_u64(2), d("-3.25"));
    }

    #[test]
    fn test_add_crosses_fast_path() {
        let max = Decimal::from_word128(crate::numeric::Word128::MAX, 0).unwrap();
        let sum = &max + &Decimal::ONE;
        assert!(sum.coefficient().is_big());
        assert_eq!(sum.to_string(), "340282366920938463463374607431768211456");
        let back = &sum - &Decimal::ONE;
        assert!(!back.coefficient().is_big());
        assert_eq!(back, max);
    }

    #[test]
    fn test_mul() {
        assert_eq!(d("1.5") * d("-2.5"), d("-3.75"));
        assert_eq!(d("0.1") * d("0.2"), d("0.02"));
        assert_eq!(d("-0") * d("5"), Decimal::ZERO);
        // scale 38 product truncated back to 19 digits
        let x = d("0.1234567890123456789");
        let y = d("0.9876543210987654321");
        assert_eq!((&x * &y).to_string(), "0.1219326311370217952");
        assert_eq!(d("2").mul_u64(0), Decimal::ZERO);
        assert_eq!(d("-1.5").mul_u64(3), d("-4.5"));
    }

    #[test]
    fn test_mul_overflow_falls_back() {
        let big = d("340282366920938463463374607431768211455");
        let product = &big * &big;
        assert!(product.coefficient().is_big());
        assert_eq!(
            product.to_string(),
            (Coefficient::Exact(crate::numeric::Word128::MAX).to_biguint()
                * Coefficient::Exact(crate::numeric::Word128::MAX).to_biguint())
            .to_string()
        );
    }

    #[test]
    fn test_div() {
        assert_eq!(d("1").checked_div(&d("3")).unwrap().to_string(), "0.3333333333333333333");
        assert_eq!(d("-1").checked_div(&d("3")).unwrap().to_string(), "-0.3333333333333333333");
        assert_eq!(d("10").checked_div(&d("4")).unwrap(), d("2.5"));
        assert_eq!(d("1.5").checked_div(&d("0.0000000000000000001")).unwrap(), d("15000000000000000000"));
        assert_eq!(d("1").checked_div(&Decimal::ZERO), Err(NumericError::DivisionByZero));
        assert_eq!(d("7").div_u64(2).unwrap(), d("3.5"));
        assert_eq!(d("7.25").div_u64(1).unwrap(), d("7.25"));
        assert_eq!(d("7").div_u64(0), Err(NumericError::DivisionByZero));
    }

    #[test]
    #[should_panic(expected = "Decimal division by zero")]
    fn test_div_operator_asserts() {
        let _ = d("1") / Decimal::ZERO;
    }

    #[test]
    fn test_quo_rem_follows_fmod() {
        let (q, r) = d("7.5").quo_rem(&d("2")).unwrap();
        assert_eq!((q, r), (d("3"), d("1.5")));

        let (q, r) = d("-7.5").quo_rem(&d("2")).unwrap();
        assert_eq!((q, r), (d("-3"), d("-1.5")));

        let (q, r) = d("7.5").quo_rem(&d("-2")).unwrap();
        assert_eq!((q, r), (d("-3"), d("1.5")));

        let (q, r) = d("-7.5").quo_rem(&d("-2")).unwrap();
        assert_eq!((q, r), (d("3"), d("-1.5")));

        let r = d("1").quo_rem(&d("0.3")).unwrap().1;
        assert_eq!(r, d("0.1"));
        assert_eq!(r.scale(), 1);

        assert_eq!(d("5") % d("3"), d("2"));
        assert_eq!(
            d("5").quo_rem(&Decimal::ZERO),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_negation_operators() {
        let x = d("1.25");
        assert_eq!(-&x, d("-1.25"));
        assert_eq!(-(-x.clone()), x);
        assert_eq!(-Decimal::ZERO, Decimal::ZERO);
    }

    fn decimal() -> impl Strategy<Value = Decimal> {
        (any::<i64>(), 0u8..=19).prop_map(|(c, s)| Decimal::from_i64(c, s).unwrap())
    }

    fn wide_decimal() -> impl Strategy<Value = Decimal> {
        (any::<u128>(), any::<bool>(), 0u8..=19).prop_map(|(c, neg, s)| {
            let w = crate::numeric::Word128::from_u128(c);
            let x = Decimal::from_word128(w, s).unwrap();
            if neg {
                x.neg()
            } else {
                x
            }
        })
    }

    proptest! {
        #[test]
        fn prop_add_then_sub_is_identity(x in wide_decimal(), y in wide_decimal()) {
            prop_assert_eq!((&x + &y) - &y, x);
        }

        #[test]
        fn prop_paths_agree(x in wide_decimal(), y in decimal()) {
            let (bx, by) = (forced_big(&x), forced_big(&y));
            prop_assert_eq!(&x + &y, &bx + &by);
            prop_assert_eq!(&x - &y, &bx - &by);
            prop_assert_eq!(&x * &y, &bx * &by);
            prop_assert_eq!(x.checked_div(&y), bx.checked_div(&by));
            prop_assert_eq!(x.quo_rem(&y), bx.quo_rem(&by));
            prop_assert_eq!(x.cmp(&y), bx.cmp(&by));
        }

        #[test]
        fn prop_quo_rem_reconstructs(x in decimal(), y in decimal()) {
            prop_assume!(!y.is_zero());
            let (q, r) = x.quo_rem(&y).unwrap();
            prop_assert_eq!(&q * &y + &r, x.clone());
            prop_assert!(r.abs() < y.abs());
            prop_assert!(r.is_zero() || r.is_negative() == x.is_negative());
        }
    }
}

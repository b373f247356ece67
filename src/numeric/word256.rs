// ============================================================================
// 256-bit Unsigned Word
// Intermediate workspace for decimal multiplication, division and roots
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::pow10::POW10;
use super::word128::{chunk_value, unsigned_digits, DigitBuf, Word128, TEN_POW_19};
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};
use std::str::FromStr;

/// Unsigned 256-bit integer made of two `Word128` limbs.
///
/// Only used transiently while a 128-bit product or a scaled dividend is
/// held before truncation back to 128 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word256 {
    hi: Word128,
    lo: Word128,
}

impl Word256 {
    pub const ZERO: Self = Self::new(Word128::ZERO, Word128::ZERO);
    pub const ONE: Self = Self::new(Word128::ZERO, Word128::ONE);
    pub const MAX: Self = Self::new(Word128::MAX, Word128::MAX);

    #[inline]
    pub const fn new(hi: Word128, lo: Word128) -> Self {
        Self { hi, lo }
    }

    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        Self::new(Word128::ZERO, Word128::from_u64(v))
    }

    #[inline]
    pub const fn from_word128(v: Word128) -> Self {
        Self::new(Word128::ZERO, v)
    }

    #[inline]
    pub const fn high(self) -> Word128 {
        self.hi
    }

    #[inline]
    pub const fn low(self) -> Word128 {
        self.lo
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.hi.is_zero() && self.lo.is_zero()
    }

    #[inline]
    pub const fn fits_word128(self) -> bool {
        self.hi.is_zero()
    }

    /// # Errors
    /// Returns `ValueOverflow` if the value needs more than 128 bits.
    #[inline]
    pub fn try_into_word128(self) -> NumericResult<Word128> {
        if self.fits_word128() {
            Ok(self.lo)
        } else {
            Err(NumericError::ValueOverflow)
        }
    }

    #[inline]
    pub fn eq_word128(self, v: Word128) -> bool {
        self.hi.is_zero() && self.lo == v
    }

    #[inline]
    pub fn cmp_word128(self, v: Word128) -> Ordering {
        if !self.hi.is_zero() {
            Ordering::Greater
        } else {
            self.lo.cmp(&v)
        }
    }

    pub fn to_biguint(self) -> BigUint {
        (self.hi.to_biguint() << 128u32) + self.lo.to_biguint()
    }

    /// # Errors
    /// Returns `ValueOverflow` if `n` needs more than 256 bits.
    pub fn from_biguint(n: &BigUint) -> NumericResult<Self> {
        let digits = n.to_u64_digits();
        if digits.len() > 4 {
            return Err(NumericError::ValueOverflow);
        }
        let mut limbs = [0u64; 4];
        limbs[..digits.len()].copy_from_slice(&digits);
        Ok(Self::new(
            Word128::new(limbs[3], limbs[2]),
            Word128::new(limbs[1], limbs[0]),
        ))
    }

    // ========================================================================
    // Bit Operations
    // ========================================================================

    #[inline]
    pub const fn bit(self, i: u32) -> u64 {
        if i < 128 {
            self.lo.bit(i)
        } else {
            self.hi.bit(i - 128)
        }
    }

    #[inline]
    pub const fn set_bit(self, i: u32) -> Self {
        if i < 128 {
            Self::new(self.hi, self.lo.set_bit(i))
        } else {
            Self::new(self.hi.set_bit(i - 128), self.lo)
        }
    }

    #[inline]
    pub const fn leading_zeros(self) -> u32 {
        if !self.hi.is_zero() {
            self.hi.leading_zeros()
        } else {
            128 + self.lo.leading_zeros()
        }
    }

    #[inline]
    pub const fn trailing_zeros(self) -> u32 {
        if !self.lo.is_zero() {
            self.lo.trailing_zeros()
        } else {
            128 + self.hi.trailing_zeros()
        }
    }

    #[inline]
    pub const fn count_ones(self) -> u32 {
        self.hi.count_ones() + self.lo.count_ones()
    }

    #[inline]
    pub const fn bit_len(self) -> u32 {
        256 - self.leading_zeros()
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// # Errors
    /// Returns `Overflow` if the sum is at least 2^256.
    pub fn checked_add(self, v: Self) -> NumericResult<Self> {
        let (lo, carry) = self.lo.carrying_add(v.lo, false);
        match self.hi.carrying_add(v.hi, carry) {
            (hi, false) => Ok(Self::new(hi, lo)),
            (_, true) => Err(NumericError::Overflow),
        }
    }

    pub fn wrapping_add(self, v: Self) -> Self {
        let (lo, carry) = self.lo.carrying_add(v.lo, false);
        Self::new(self.hi.carrying_add(v.hi, carry).0, lo)
    }

    /// # Errors
    /// Returns `Underflow` if `v > self`.
    pub fn checked_sub(self, v: Self) -> NumericResult<Self> {
        let (lo, borrow) = self.lo.borrowing_sub(v.lo, false);
        match self.hi.borrowing_sub(v.hi, borrow) {
            (hi, false) => Ok(Self::new(hi, lo)),
            (_, true) => Err(NumericError::Underflow),
        }
    }

    pub fn wrapping_sub(self, v: Self) -> Self {
        let (lo, borrow) = self.lo.borrowing_sub(v.lo, false);
        Self::new(self.hi.borrowing_sub(v.hi, borrow).0, lo)
    }

    /// Checked multiplication.
    ///
    /// Overflows if both high limbs are non-zero, if either cross term needs
    /// more than 128 bits, or if summing the high half carries.
    ///
    /// # Errors
    /// Returns `Overflow` if the product is at least 2^256.
    pub fn checked_mul(self, v: Self) -> NumericResult<Self> {
        if !self.hi.is_zero() && !v.hi.is_zero() {
            return Err(NumericError::Overflow);
        }
        let (hi, lo) = self.lo.widening_mul(v.lo);
        let cross1 = self.hi.checked_mul(v.lo)?;
        let cross2 = self.lo.checked_mul(v.hi)?;
        let hi = hi.checked_add(cross1)?.checked_add(cross2)?;
        Ok(Self::new(hi, lo))
    }

    pub fn wrapping_mul(self, v: Self) -> Self {
        let (hi, lo) = self.lo.widening_mul(v.lo);
        let hi = hi
            .wrapping_add(self.hi.wrapping_mul(v.lo))
            .wrapping_add(self.lo.wrapping_mul(v.hi));
        Self::new(hi, lo)
    }

    pub fn checked_mul_word128(self, v: Word128) -> NumericResult<Self> {
        let (hi, lo) = self.lo.widening_mul(v);
        let cross = self.hi.checked_mul(v)?;
        Ok(Self::new(hi.checked_add(cross)?, lo))
    }

    /// `self^e` by square-and-multiply.
    ///
    /// # Errors
    /// Returns `Overflow` if the power is at least 2^256.
    pub fn checked_pow(self, mut e: u32) -> NumericResult<Self> {
        let mut result = Self::ONE;
        let mut base = self;
        while e > 0 {
            if e & 1 == 1 {
                result = result.checked_mul(base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.checked_mul(base)?;
            }
        }
        Ok(result)
    }

    // ========================================================================
    // Division
    // ========================================================================

    /// Restoring division, one dividend bit per step.
    ///
    /// Dividends below the divisor, and dividends that fit in 128 bits, are
    /// answered directly without the bit loop.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn checked_quo_rem(self, v: Self) -> NumericResult<(Self, Self)> {
        if v.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self < v {
            return Ok((Self::ZERO, self));
        }
        if self.fits_word128() {
            let (q, r) = self.lo.checked_quo_rem(v.lo)?;
            return Ok((Self::from_word128(q), Self::from_word128(r)));
        }

        let mut q = Self::ZERO;
        let mut r = Self::ZERO;
        for i in (0..self.bit_len()).rev() {
            let carry = r.bit(255) == 1;
            r = (r << 1) | Self::from_u64(self.bit(i));
            // with a carry the true remainder exceeds 2^256 > v
            if carry || r >= v {
                r = r.wrapping_sub(v);
                q = q.set_bit(i);
            }
        }
        Ok((q, r))
    }

    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn checked_quo_rem_word128(self, v: Word128) -> NumericResult<(Self, Word128)> {
        if v.high() == 0 {
            let (q, r) = self.checked_quo_rem_u64(v.low())?;
            return Ok((q, Word128::from_u64(r)));
        }
        let (q, r) = self.checked_quo_rem(Self::from_word128(v))?;
        Ok((q, r.lo))
    }

    #[inline]
    pub fn checked_div(self, v: Self) -> NumericResult<Self> {
        self.checked_quo_rem(v).map(|(q, _)| q)
    }

    #[inline]
    pub fn checked_rem(self, v: Self) -> NumericResult<Self> {
        self.checked_quo_rem(v).map(|(_, r)| r)
    }

    /// Limb-wise long division by a 64-bit divisor.
    ///
    /// # Panics
    /// Panics if `v == 0`.
    pub fn quo_rem_u64(self, v: u64) -> (Self, u64) {
        let limbs = [self.hi.high(), self.hi.low(), self.lo.high(), self.lo.low()];
        let mut q = [0u64; 4];
        let mut r = 0u64;
        for (qi, &limb) in q.iter_mut().zip(limbs.iter()) {
            let n = ((r as u128) << 64) | limb as u128;
            *qi = (n / v as u128) as u64;
            r = (n % v as u128) as u64;
        }
        (
            Self::new(Word128::new(q[0], q[1]), Word128::new(q[2], q[3])),
            r,
        )
    }

    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn checked_quo_rem_u64(self, v: u64) -> NumericResult<(Self, u64)> {
        if v == 0 {
            return Err(NumericError::DivisionByZero);
        }
        Ok(self.quo_rem_u64(v))
    }

    // ========================================================================
    // Byte Layout
    // ========================================================================

    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.lo.to_le_bytes());
        out[16..].copy_from_slice(&self.hi.to_le_bytes());
        out
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.hi.to_be_bytes());
        out[16..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    pub fn from_le_bytes(b: [u8; 32]) -> Self {
        let (lo, hi) = split_32(b);
        Self::new(Word128::from_le_bytes(hi), Word128::from_le_bytes(lo))
    }

    pub fn from_be_bytes(b: [u8; 32]) -> Self {
        let (hi, lo) = split_32(b);
        Self::new(Word128::from_be_bytes(hi), Word128::from_be_bytes(lo))
    }

    /// Read from the first 32 bytes of `b`, little-endian.
    ///
    /// # Errors
    /// Returns `InvalidEncodedData` if `b` is shorter than 32 bytes.
    pub fn from_le_slice(b: &[u8]) -> NumericResult<Self> {
        first_32(b).map(Self::from_le_bytes)
    }

    pub fn from_be_slice(b: &[u8]) -> NumericResult<Self> {
        first_32(b).map(Self::from_be_bytes)
    }

    pub fn put_le_bytes(self, buf: &mut [u8]) -> NumericResult<()> {
        put_32(buf, self.to_le_bytes())
    }

    pub fn put_be_bytes(self, buf: &mut [u8]) -> NumericResult<()> {
        put_32(buf, self.to_be_bytes())
    }

    pub fn append_le_bytes(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }

    pub fn append_be_bytes(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

fn split_32(b: [u8; 32]) -> ([u8; 16], [u8; 16]) {
    let mut first = [0u8; 16];
    let mut second = [0u8; 16];
    first.copy_from_slice(&b[..16]);
    second.copy_from_slice(&b[16..]);
    (first, second)
}

fn first_32(b: &[u8]) -> NumericResult<[u8; 32]> {
    b.get(..32)
        .and_then(|s| <[u8; 32]>::try_from(s).ok())
        .ok_or(NumericError::InvalidEncodedData)
}

fn put_32(buf: &mut [u8], bytes: [u8; 32]) -> NumericResult<()> {
    buf.get_mut(..32)
        .ok_or(NumericError::InvalidEncodedData)?
        .copy_from_slice(&bytes);
    Ok(())
}

// ============================================================================
// Text Conversion
// ============================================================================

impl fmt::Display for Word256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = DigitBuf::new();
        let mut u = *self;
        loop {
            let (q, r) = u.quo_rem_u64(TEN_POW_19);
            let last = q.is_zero();
            digits.push_chunk(r, !last);
            if last {
                break;
            }
            u = q;
        }
        f.pad_integral(true, "", digits.as_str())
    }
}

impl fmt::Debug for Word256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word256({})", self)
    }
}

impl FromStr for Word256 {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = unsigned_digits(s)?;
        let mut acc = Self::ZERO;
        for chunk in digits.chunks(19) {
            acc = acc
                .checked_mul_word128(POW10[chunk.len()])
                .and_then(|v| v.checked_add(Self::from_u64(chunk_value(chunk))))
                .map_err(|_| NumericError::ValueOverflow)?;
        }
        Ok(acc)
    }
}

impl From<Word128> for Word256 {
    #[inline]
    fn from(v: Word128) -> Self {
        Self::from_word128(v)
    }
}

// ============================================================================
// Bitwise Operators
// ============================================================================

impl BitAnd for Word256 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::new(self.hi & rhs.hi, self.lo & rhs.lo)
    }
}

impl BitOr for Word256 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(self.hi | rhs.hi, self.lo | rhs.lo)
    }
}

impl BitXor for Word256 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::new(self.hi ^ rhs.hi, self.lo ^ rhs.lo)
    }
}

impl Not for Word256 {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::new(!self.hi, !self.lo)
    }
}

impl Shl<u32> for Word256 {
    type Output = Self;

    fn shl(self, n: u32) -> Self::Output {
        match n {
            0 => self,
            1..=127 => Self::new((self.hi << n) | (self.lo >> (128 - n)), self.lo << n),
            128..=255 => Self::new(self.lo << (n - 128), Word128::ZERO),
            _ => Self::ZERO,
        }
    }
}

impl Shr<u32> for Word256 {
    type Output = Self;

    fn shr(self, n: u32) -> Self::Output {
        match n {
            0 => self,
            1..=127 => Self::new(self.hi >> n, (self.lo >> n) | (self.hi << (128 - n))),
            128..=255 => Self::new(Word128::ZERO, self.hi >> (n - 128)),
            _ => Self::ZERO,
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Word256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Word256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Word256 {
        fn arbitrary(g: &mut Gen) -> Self {
            let limbs: [u64; 4] = [
                u64::arbitrary(g),
                u64::arbitrary(g),
                u64::arbitrary(g),
                u64::arbitrary(g),
            ];
            // mix in narrow values so small divisors and operands show up
            match u8::arbitrary(g) % 4 {
                0 => Self::from_u64(limbs[0]),
                1 => Self::new(Word128::ZERO, Word128::new(limbs[0], limbs[1])),
                2 => Self::new(Word128::from_u64(limbs[0]), Word128::new(limbs[1], limbs[2])),
                _ => Self::new(Word128::new(limbs[0], limbs[1]), Word128::new(limbs[2], limbs[3])),
            }
        }
    }

    fn two_pow_256() -> BigUint {
        BigUint::from(1u8) << 256u32
    }

    #[test]
    fn test_max_display() {
        assert_eq!(
            Word256::MAX.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(Word256::ZERO.to_string(), "0");
    }

    #[test]
    fn test_parse_bounds() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(max.parse::<Word256>(), Ok(Word256::MAX));
        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(over.parse::<Word256>(), Err(NumericError::ValueOverflow));
        assert_eq!("-5".parse::<Word256>(), Err(NumericError::NegativeValue));
        assert_eq!("".parse::<Word256>(), Err(NumericError::EmptyInput));
        assert_eq!("x".parse::<Word256>(), Err(NumericError::InvalidFormat));
    }

    #[test]
    fn test_mul_overflow_rules() {
        let high = Word256::new(Word128::ONE, Word128::ZERO);
        assert_eq!(high.checked_mul(high), Err(NumericError::Overflow));

        let (hi, lo) = Word128::MAX.widening_mul(Word128::MAX);
        let square = Word256::from_word128(Word128::MAX).checked_mul(Word256::from_word128(Word128::MAX));
        assert_eq!(square, Ok(Word256::new(hi, lo)));

        assert_eq!(
            Word256::MAX.checked_add(Word256::ONE),
            Err(NumericError::Overflow)
        );
        assert_eq!(Word256::MAX.wrapping_add(Word256::ONE), Word256::ZERO);
        assert_eq!(
            Word256::ZERO.checked_sub(Word256::ONE),
            Err(NumericError::Underflow)
        );
    }

    #[test]
    fn test_checked_pow() {
        let ten = Word256::from_u64(10);
        assert_eq!(
            ten.checked_pow(76).unwrap().to_biguint(),
            BigUint::from(10u8).pow(76)
        );
        // 10^77 < 2^256 < 10^78
        assert_eq!(
            ten.checked_pow(77).unwrap().to_biguint(),
            BigUint::from(10u8).pow(77)
        );
        assert_eq!(ten.checked_pow(78), Err(NumericError::Overflow));
        assert_eq!(Word256::ZERO.checked_pow(0), Ok(Word256::ONE));
        assert_eq!(Word256::from_u64(2).checked_pow(255).unwrap().bit_len(), 256);
        assert_eq!(Word256::from_u64(2).checked_pow(256), Err(NumericError::Overflow));
    }

    #[test]
    fn test_division_edges() {
        assert_eq!(
            Word256::ONE.checked_quo_rem(Word256::ZERO),
            Err(NumericError::DivisionByZero)
        );
        assert_eq!(Word256::MAX.checked_div(Word256::MAX), Ok(Word256::ONE));

        let top = Word256::ONE << 255;
        let (q, r) = Word256::MAX.checked_quo_rem(top).unwrap();
        assert_eq!(q, Word256::ONE);
        assert_eq!(r, Word256::MAX >> 1);

        // dividend within 128 bits skips the bit loop
        let (q, r) = Word256::from_u64(1_000_003)
            .checked_quo_rem(Word256::from_u64(1_000))
            .unwrap();
        assert_eq!((q, r), (Word256::from_u64(1_000), Word256::from_u64(3)));
        let (q, r) = Word256::from_u64(5).checked_quo_rem(Word256::MAX).unwrap();
        assert_eq!((q, r), (Word256::ZERO, Word256::from_u64(5)));
    }

    #[test]
    fn test_bytes_layout() {
        let x = Word256::new(Word128::new(1, 2), Word128::new(3, 4));
        let be = x.to_be_bytes();
        assert_eq!(be[7], 1);
        assert_eq!(be[31], 4);
        let le = x.to_le_bytes();
        assert_eq!(le[0], 4);
        assert_eq!(Word256::from_be_bytes(be), x);
        assert_eq!(Word256::from_le_bytes(le), x);

        let mut buf = Vec::new();
        x.append_le_bytes(&mut buf);
        assert_eq!(Word256::from_le_slice(&buf), Ok(x));
        assert_eq!(
            Word256::from_be_slice(&buf[1..]),
            Err(NumericError::InvalidEncodedData)
        );
    }

    #[test]
    fn test_quickcheck_properties() {
        fn add_commutes(x: Word256, y: Word256) -> bool {
            x.wrapping_add(y) == y.wrapping_add(x)
        }

        fn mul_matches_reference(x: Word256, y: Word256) -> bool {
            x.wrapping_mul(y).to_biguint() == (x.to_biguint() * y.to_biguint()) % two_pow_256()
                && match x.checked_mul(y) {
                    Ok(p) => p.to_biguint() == x.to_biguint() * y.to_biguint(),
                    Err(_) => x.to_biguint() * y.to_biguint() >= two_pow_256(),
                }
        }

        fn quo_rem_reconstructs(x: Word256, y: Word256) -> bool {
            if y.is_zero() {
                return x.checked_quo_rem(y) == Err(NumericError::DivisionByZero);
            }
            let (q, r) = x.checked_quo_rem(y).unwrap();
            r < y && q.to_biguint() * y.to_biguint() + r.to_biguint() == x.to_biguint()
        }

        fn quo_rem_u64_matches(x: Word256, d: u64) -> bool {
            if d == 0 {
                return true;
            }
            let (q, r) = x.quo_rem_u64(d);
            q.to_biguint() == x.to_biguint() / d && BigUint::from(r) == x.to_biguint() % d
        }

        fn text_and_bytes_round_trip(x: Word256) -> bool {
            x.to_string() == x.to_biguint().to_string()
                && x.to_string().parse::<Word256>() == Ok(x)
                && Word256::from_biguint(&x.to_biguint()) == Ok(x)
                && Word256::from_be_bytes(x.to_be_bytes()) == x
        }

        quickcheck(add_commutes as fn(Word256, Word256) -> bool);
        quickcheck(mul_matches_reference as fn(Word256, Word256) -> bool);
        quickcheck(quo_rem_reconstructs as fn(Word256, Word256) -> bool);
        quickcheck(quo_rem_u64_matches as fn(Word256, u64) -> bool);
        quickcheck(text_and_bytes_round_trip as fn(Word256) -> bool);
    }
}

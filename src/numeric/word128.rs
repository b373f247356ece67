// ============================================================================
// 128-bit Unsigned Word
// Two 64-bit limbs with checked, asserting and wrapping arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Rem, Shl, Shr, Sub};
use std::str::FromStr;

/// Largest power of ten that fits in a single 64-bit limb.
pub(crate) const TEN_POW_19: u64 = 10_000_000_000_000_000_000;

/// Unsigned 128-bit integer stored as a `(hi, lo)` pair of 64-bit limbs.
///
/// Ordering is the unsigned magnitude ordering (the derived lexicographic
/// order on `(hi, lo)`).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word128 {
    hi: u64,
    lo: u64,
}

/// Divides the two-limb value `hi:lo` by `d`. Requires `hi < d`.
#[inline]
const fn div_wide(hi: u64, lo: u64, d: u64) -> (u64, u64) {
    let n = ((hi as u128) << 64) | lo as u128;
    let d = d as u128;
    ((n / d) as u64, (n % d) as u64)
}

/// Full 64x64 product as `(hi, lo)`.
#[inline]
const fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let p = (a as u128) * (b as u128);
    ((p >> 64) as u64, p as u64)
}

impl Word128 {
    pub const ZERO: Self = Self { hi: 0, lo: 0 };
    pub const ONE: Self = Self { hi: 0, lo: 1 };
    pub const MAX: Self = Self {
        hi: u64::MAX,
        lo: u64::MAX,
    };

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from high and low limbs.
    #[inline]
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        Self { hi: 0, lo: v }
    }

    #[inline]
    pub const fn from_u128(v: u128) -> Self {
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }

    #[inline]
    pub const fn to_u128(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    /// Convert from an arbitrary-precision unsigned integer.
    ///
    /// # Errors
    /// Returns `ValueOverflow` if `n` needs more than 128 bits.
    pub fn from_biguint(n: &BigUint) -> NumericResult<Self> {
        n.to_u128()
            .map(Self::from_u128)
            .ok_or(NumericError::ValueOverflow)
    }

    /// Convert from an arbitrary-precision signed integer.
    ///
    /// # Errors
    /// - `NegativeValue` if `n < 0`
    /// - `ValueOverflow` if `n` needs more than 128 bits
    pub fn from_bigint(n: &BigInt) -> NumericResult<Self> {
        if n.sign() == Sign::Minus {
            return Err(NumericError::NegativeValue);
        }
        Self::from_biguint(n.magnitude())
    }

    pub fn to_biguint(self) -> BigUint {
        BigUint::from(self.to_u128())
    }

    // ========================================================================
    // Accessors and Comparison
    // ========================================================================

    #[inline]
    pub const fn high(self) -> u64 {
        self.hi
    }

    #[inline]
    pub const fn low(self) -> u64 {
        self.lo
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    #[inline]
    pub const fn eq_u64(self, v: u64) -> bool {
        self.hi == 0 && self.lo == v
    }

    #[inline]
    pub fn cmp_u64(self, v: u64) -> Ordering {
        if self.hi != 0 {
            Ordering::Greater
        } else {
            self.lo.cmp(&v)
        }
    }

    // ========================================================================
    // Bit Operations
    // ========================================================================

    /// Returns bit `i` (0 or 1); bits at or beyond 128 read as zero.
    #[inline]
    pub const fn bit(self, i: u32) -> u64 {
        match i {
            0..=63 => (self.lo >> i) & 1,
            64..=127 => (self.hi >> (i - 64)) & 1,
            _ => 0,
        }
    }

    /// Returns a copy with bit `i` set. Out-of-range indices are ignored.
    #[inline]
    pub const fn set_bit(self, i: u32) -> Self {
        match i {
            0..=63 => Self::new(self.hi, self.lo | (1 << i)),
            64..=127 => Self::new(self.hi | (1 << (i - 64)), self.lo),
            _ => self,
        }
    }

    #[inline]
    pub const fn and_u64(self, v: u64) -> Self {
        Self::from_u64(self.lo & v)
    }

    #[inline]
    pub const fn or_u64(self, v: u64) -> Self {
        Self::new(self.hi, self.lo | v)
    }

    #[inline]
    pub const fn xor_u64(self, v: u64) -> Self {
        Self::new(self.hi, self.lo ^ v)
    }

    /// Number of leading zero bits; 128 for zero.
    #[inline]
    pub const fn leading_zeros(self) -> u32 {
        if self.hi != 0 {
            self.hi.leading_zeros()
        } else {
            64 + self.lo.leading_zeros()
        }
    }

    /// Number of trailing zero bits; 128 for zero.
    #[inline]
    pub const fn trailing_zeros(self) -> u32 {
        if self.lo != 0 {
            self.lo.trailing_zeros()
        } else {
            64 + self.hi.trailing_zeros()
        }
    }

    #[inline]
    pub const fn count_ones(self) -> u32 {
        self.hi.count_ones() + self.lo.count_ones()
    }

    /// Minimum number of bits needed to represent the value; 0 for zero.
    #[inline]
    pub const fn bit_len(self) -> u32 {
        128 - self.leading_zeros()
    }

    /// Rotates left by `k mod 128` bits. Negative `k` rotates right.
    pub fn rotate_left(self, k: i32) -> Self {
        let s = k.rem_euclid(128) as u32;
        (self << s) | (self >> (128 - s))
    }

    /// Rotates right by `k mod 128` bits.
    pub fn rotate_right(self, k: i32) -> Self {
        self.rotate_left(k.wrapping_neg())
    }

    #[inline]
    pub const fn reverse_bits(self) -> Self {
        Self::new(self.lo.reverse_bits(), self.hi.reverse_bits())
    }

    #[inline]
    pub const fn swap_bytes(self) -> Self {
        Self::new(self.lo.swap_bytes(), self.hi.swap_bytes())
    }

    // ========================================================================
    // Addition and Subtraction
    // ========================================================================

    /// Returns `self + v + carry` and the carry out.
    #[inline]
    pub const fn carrying_add(self, v: Self, carry: bool) -> (Self, bool) {
        let (lo, c0) = self.lo.overflowing_add(v.lo);
        let (lo, c1) = lo.overflowing_add(carry as u64);
        let (hi, c2) = self.hi.overflowing_add(v.hi);
        let (hi, c3) = hi.overflowing_add((c0 | c1) as u64);
        (Self::new(hi, lo), c2 | c3)
    }

    /// Returns `self - v - borrow` and the borrow out.
    #[inline]
    pub const fn borrowing_sub(self, v: Self, borrow: bool) -> (Self, bool) {
        let (lo, b0) = self.lo.overflowing_sub(v.lo);
        let (lo, b1) = lo.overflowing_sub(borrow as u64);
        let (hi, b2) = self.hi.overflowing_sub(v.hi);
        let (hi, b3) = hi.overflowing_sub((b0 | b1) as u64);
        (Self::new(hi, lo), b2 | b3)
    }

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` if the sum is at least 2^128.
    #[inline]
    pub fn checked_add(self, v: Self) -> NumericResult<Self> {
        match self.carrying_add(v, false) {
            (sum, false) => Ok(sum),
            (_, true) => Err(NumericError::Overflow),
        }
    }

    /// Addition modulo 2^128; `MAX.wrapping_add(ONE) == ZERO`.
    #[inline]
    pub const fn wrapping_add(self, v: Self) -> Self {
        self.carrying_add(v, false).0
    }

    #[inline]
    pub fn checked_add_u64(self, v: u64) -> NumericResult<Self> {
        self.checked_add(Self::from_u64(v))
    }

    #[inline]
    pub const fn wrapping_add_u64(self, v: u64) -> Self {
        self.wrapping_add(Self::from_u64(v))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Underflow` if `v > self`.
    #[inline]
    pub fn checked_sub(self, v: Self) -> NumericResult<Self> {
        match self.borrowing_sub(v, false) {
            (diff, false) => Ok(diff),
            (_, true) => Err(NumericError::Underflow),
        }
    }

    /// Subtraction modulo 2^128; `ZERO.wrapping_sub(ONE) == MAX`.
    #[inline]
    pub const fn wrapping_sub(self, v: Self) -> Self {
        self.borrowing_sub(v, false).0
    }

    #[inline]
    pub fn checked_sub_u64(self, v: u64) -> NumericResult<Self> {
        self.checked_sub(Self::from_u64(v))
    }

    #[inline]
    pub const fn wrapping_sub_u64(self, v: u64) -> Self {
        self.wrapping_sub(Self::from_u64(v))
    }

    // ========================================================================
    // Multiplication
    // ========================================================================

    /// Checked multiplication.
    ///
    /// # Errors
    /// Returns `Overflow` if the product is at least 2^128.
    pub fn checked_mul(self, v: Self) -> NumericResult<Self> {
        let (hi, lo) = mul_wide(self.lo, v.lo);
        let (c1_hi, c1_lo) = mul_wide(self.hi, v.lo);
        let (c2_hi, c2_lo) = mul_wide(self.lo, v.hi);
        let (hi, o1) = hi.overflowing_add(c1_lo);
        let (hi, o2) = hi.overflowing_add(c2_lo);

        if (self.hi != 0 && v.hi != 0) || c1_hi != 0 || c2_hi != 0 || o1 || o2 {
            return Err(NumericError::Overflow);
        }
        Ok(Self::new(hi, lo))
    }

    /// Multiplication modulo 2^128; `MAX.wrapping_mul(MAX) == ONE`.
    #[inline]
    pub const fn wrapping_mul(self, v: Self) -> Self {
        let (hi, lo) = mul_wide(self.lo, v.lo);
        let hi = hi
            .wrapping_add(self.hi.wrapping_mul(v.lo))
            .wrapping_add(self.lo.wrapping_mul(v.hi));
        Self::new(hi, lo)
    }

    pub fn checked_mul_u64(self, v: u64) -> NumericResult<Self> {
        let (hi, lo) = mul_wide(self.lo, v);
        let (c_hi, c_lo) = mul_wide(self.hi, v);
        let (hi, o) = hi.overflowing_add(c_lo);

        if c_hi != 0 || o {
            return Err(NumericError::Overflow);
        }
        Ok(Self::new(hi, lo))
    }

    #[inline]
    pub const fn wrapping_mul_u64(self, v: u64) -> Self {
        let (hi, lo) = mul_wide(self.lo, v);
        Self::new(hi.wrapping_add(self.hi.wrapping_mul(v)), lo)
    }

    /// Full product: `self * v == hi * 2^128 + lo`, returned as `(hi, lo)`.
    pub const fn widening_mul(self, v: Self) -> (Self, Self) {
        const MASK: u128 = u64::MAX as u128;

        let ll = (self.lo as u128) * (v.lo as u128);
        let lh = (self.lo as u128) * (v.hi as u128);
        let hl = (self.hi as u128) * (v.lo as u128);
        let hh = (self.hi as u128) * (v.hi as u128);

        // at most 3 * (2^64 - 1), no overflow
        let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
        let lo = Self::new(mid as u64, ll as u64);
        let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);

        (Self::from_u128(hi), lo)
    }

    // ========================================================================
    // Division
    // ========================================================================

    /// Quotient and remainder by a 64-bit divisor.
    ///
    /// # Panics
    /// Panics if `v == 0`, like native integer division.
    pub fn quo_rem_u64(self, v: u64) -> (Self, u64) {
        if self.hi < v {
            let (lo, r) = div_wide(self.hi, self.lo, v);
            (Self::from_u64(lo), r)
        } else {
            let hi = self.hi / v;
            let (lo, r) = div_wide(self.hi % v, self.lo, v);
            (Self::new(hi, lo), r)
        }
    }

    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn checked_quo_rem_u64(self, v: u64) -> NumericResult<(Self, u64)> {
        if v == 0 {
            return Err(NumericError::DivisionByZero);
        }
        Ok(self.quo_rem_u64(v))
    }

    /// Quotient and remainder.
    ///
    /// Divisors wider than 64 bits use a trial quotient computed from the
    /// normalized high limb of the divisor. The trial value never exceeds the
    /// true quotient by more than one and is decremented up front, so a
    /// single corrective step fixes it.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `v == 0`.
    pub fn checked_quo_rem(self, v: Self) -> NumericResult<(Self, Self)> {
        if v.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if v.hi == 0 {
            let (q, r) = self.quo_rem_u64(v.lo);
            return Ok((q, Self::from_u64(r)));
        }

        let n = v.hi.leading_zeros();
        let v1 = v << n;
        let u1 = self >> 1;
        // u1.hi < 2^63 <= v1.hi
        let (mut tq, _) = div_wide(u1.hi, u1.lo, v1.hi);
        tq >>= 63 - n;
        tq = tq.saturating_sub(1);

        // tq <= true quotient, so neither step below can wrap
        let mut q = Self::from_u64(tq);
        let mut r = self.wrapping_sub(v.wrapping_mul_u64(tq));
        if r >= v {
            q = q.wrapping_add_u64(1);
            r = r.wrapping_sub(v);
        }
        Ok((q, r))
    }

    #[inline]
    pub fn checked_div(self, v: Self) -> NumericResult<Self> {
        self.checked_quo_rem(v).map(|(q, _)| q)
    }

    #[inline]
    pub fn checked_rem(self, v: Self) -> NumericResult<Self> {
        self.checked_quo_rem(v).map(|(_, r)| r)
    }

    // ========================================================================
    // Byte Layout
    // ========================================================================

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 16] {
        self.to_u128().to_le_bytes()
    }

    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 16] {
        self.to_u128().to_be_bytes()
    }

    #[inline]
    pub const fn from_le_bytes(b: [u8; 16]) -> Self {
        Self::from_u128(u128::from_le_bytes(b))
    }

    #[inline]
    pub const fn from_be_bytes(b: [u8; 16]) -> Self {
        Self::from_u128(u128::from_be_bytes(b))
    }

    /// Read from the first 16 bytes of `b`, little-endian.
    ///
    /// # Errors
    /// Returns `InvalidEncodedData` if `b` is shorter than 16 bytes.
    pub fn from_le_slice(b: &[u8]) -> NumericResult<Self> {
        first_16(b).map(Self::from_le_bytes)
    }

    /// Read from the first 16 bytes of `b`, big-endian.
    pub fn from_be_slice(b: &[u8]) -> NumericResult<Self> {
        first_16(b).map(Self::from_be_bytes)
    }

    /// Write into the first 16 bytes of `buf`, little-endian.
    ///
    /// # Errors
    /// Returns `InvalidEncodedData` if `buf` is shorter than 16 bytes.
    pub fn put_le_bytes(self, buf: &mut [u8]) -> NumericResult<()> {
        put_16(buf, self.to_le_bytes())
    }

    pub fn put_be_bytes(self, buf: &mut [u8]) -> NumericResult<()> {
        put_16(buf, self.to_be_bytes())
    }

    pub fn append_le_bytes(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }

    pub fn append_be_bytes(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

fn first_16(b: &[u8]) -> NumericResult<[u8; 16]> {
    b.get(..16)
        .and_then(|s| <[u8; 16]>::try_from(s).ok())
        .ok_or(NumericError::InvalidEncodedData)
}

fn put_16(buf: &mut [u8], bytes: [u8; 16]) -> NumericResult<()> {
    buf.get_mut(..16)
        .ok_or(NumericError::InvalidEncodedData)?
        .copy_from_slice(&bytes);
    Ok(())
}

// ============================================================================
// Text Conversion
// ============================================================================

/// Right-aligned ASCII digit buffer filled one base-10^19 chunk at a time,
/// least significant chunk first. Large enough for 256-bit values.
pub(crate) struct DigitBuf {
    buf: [u8; 80],
    start: usize,
}

impl DigitBuf {
    pub(crate) fn new() -> Self {
        Self {
            buf: [b'0'; 80],
            start: 80,
        }
    }

    /// Prepend a chunk; `pad` keeps it at the full 19-digit width.
    pub(crate) fn push_chunk(&mut self, mut r: u64, pad: bool) {
        let end = self.start;
        let mut i = end;
        while r != 0 {
            i -= 1;
            self.buf[i] = b'0' + (r % 10) as u8;
            r /= 10;
        }
        self.start = if pad { end - 19 } else { i };
    }

    pub(crate) fn as_str(&self) -> &str {
        if self.start == self.buf.len() {
            return "0";
        }
        std::str::from_utf8(&self.buf[self.start..]).unwrap_or("0")
    }
}

/// Validates an unsigned base-10 literal and returns its digits.
///
/// Accepts an optional `+`. A `-` sign is only accepted for zero.
pub(crate) fn unsigned_digits(s: &str) -> NumericResult<&[u8]> {
    if s.is_empty() {
        return Err(NumericError::EmptyInput);
    }
    let (negative, rest) = match s.as_bytes()[0] {
        b'+' => (false, &s.as_bytes()[1..]),
        b'-' => (true, &s.as_bytes()[1..]),
        _ => (false, s.as_bytes()),
    };
    if rest.is_empty() || !rest.iter().all(u8::is_ascii_digit) {
        return Err(NumericError::InvalidFormat);
    }
    if negative && rest.iter().any(|&c| c != b'0') {
        return Err(NumericError::NegativeValue);
    }
    Ok(rest)
}

/// Value of up to 19 ASCII digits.
pub(crate) fn chunk_value(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .fold(0u64, |acc, &c| acc * 10 + u64::from(c - b'0'))
}

impl fmt::Display for Word128 {
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

impl fmt::Debug for Word128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word128({})", self)
    }
}

impl FromStr for Word128 {
    type Err = NumericError;

    /// Parse an unsigned base-10 integer.
    ///
    /// # Errors
    /// - `EmptyInput` for `""`
    /// - `NegativeValue` for negative literals
    /// - `ValueOverflow` above 2^128 - 1
    /// - `InvalidFormat` otherwise
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = unsigned_digits(s)?;
        let mut acc = Self::ZERO;
        for chunk in digits.chunks(19) {
            let scale = super::pow10::POW10[chunk.len()];
            acc = acc
                .checked_mul(scale)
                .and_then(|v| v.checked_add_u64(chunk_value(chunk)))
                .map_err(|_| NumericError::ValueOverflow)?;
        }
        Ok(acc)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<u64> for Word128 {
    #[inline]
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl From<u128> for Word128 {
    #[inline]
    fn from(v: u128) -> Self {
        Self::from_u128(v)
    }
}

impl From<Word128> for u128 {
    #[inline]
    fn from(v: Word128) -> Self {
        v.to_u128()
    }
}

// ============================================================================
// Operators
// ============================================================================

// Asserting arithmetic: panics where the checked form would return an error.
impl Add for Word128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("Word128 addition overflow")
    }
}

impl Sub for Word128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("Word128 subtraction underflow")
    }
}

impl Mul for Word128 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(rhs).expect("Word128 multiplication overflow")
    }
}

impl Div for Word128 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(rhs).expect("Word128 division by zero")
    }
}

impl Rem for Word128 {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self::Output {
        self.checked_rem(rhs).expect("Word128 division by zero")
    }
}

impl BitAnd for Word128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::new(self.hi & rhs.hi, self.lo & rhs.lo)
    }
}

impl BitOr for Word128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(self.hi | rhs.hi, self.lo | rhs.lo)
    }
}

impl BitXor for Word128 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::new(self.hi ^ rhs.hi, self.lo ^ rhs.lo)
    }
}

impl Not for Word128 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self::new(!self.hi, !self.lo)
    }
}

/// Logical shift left; shifts of 128 or more produce zero.
impl Shl<u32> for Word128 {
    type Output = Self;

    #[inline]
    fn shl(self, n: u32) -> Self::Output {
        match n {
            0 => self,
            1..=63 => Self::new((self.hi << n) | (self.lo >> (64 - n)), self.lo << n),
            64..=127 => Self::new(self.lo << (n - 64), 0),
            _ => Self::ZERO,
        }
    }
}

/// Logical shift right; shifts of 128 or more produce zero.
impl Shr<u32> for Word128 {
    type Output = Self;

    #[inline]
    fn shr(self, n: u32) -> Self::Output {
        match n {
            0 => self,
            1..=63 => Self::new(self.hi >> n, (self.lo >> n) | (self.hi << (64 - n))),
            64..=127 => Self::new(0, self.hi >> (n - 64)),
            _ => Self::ZERO,
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Word128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Word128 {
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

// ============================================================================
// Decimal Text
// Parsing and formatting of the canonical decimal string form
// ============================================================================
//
// Grammar: [+-]?[0-9]+(\.[0-9]{1,19})?
// No exponents, no separators, no surrounding whitespace.

use super::{Decimal, MAX_SCALE, MAX_STR_LEN};
use crate::numeric::{Coefficient, NumericError, NumericResult};
use std::fmt;
use std::str::FromStr;

/// Digits per `u64` chunk when accumulating a coefficient.
const CHUNK_DIGITS: usize = 19;

#[inline]
fn all_digits(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(u8::is_ascii_digit)
}

/// Appends ASCII `digits` to `coef`, 19 at a time.
fn push_digits(mut coef: Coefficient, digits: &[u8]) -> Coefficient {
    for chunk in digits.chunks(CHUNK_DIGITS) {
        let value = chunk
            .iter()
            .fold(0u64, |acc, &c| acc * 10 + u64::from(c - b'0'));
        coef = coef
            .mul_pow10(chunk.len() as u32)
            .add(&Coefficient::from_u64(value));
    }
    coef
}

/// Unsigned digits of `coef / 10^scale`, with a leading `0` when there is
/// no integer part.
fn render(coef: &Coefficient, scale: u8) -> String {
    let digits = coef.to_string();
    let scale = usize::from(scale);
    if scale == 0 {
        return digits;
    }

    let mut out = String::with_capacity(digits.len().max(scale) + 2);
    if digits.len() <= scale {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(scale - digits.len()));
        out.push_str(&digits);
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

impl Decimal {
    /// Parse the canonical decimal form, e.g. `"-123.45"`.
    ///
    /// # Errors
    /// - `EmptyInput` for `""`
    /// - `InputTooLong` beyond 200 bytes
    /// - `PrecisionOutOfRange` for more than 19 fractional digits
    /// - `InvalidFormat` for anything outside the grammar
    pub fn parse(s: &str) -> NumericResult<Decimal> {
        Self::parse_with(s, MAX_SCALE)
    }

    pub(crate) fn parse_with(s: &str, cap: u8) -> NumericResult<Decimal> {
        if s.is_empty() {
            return Err(NumericError::EmptyInput);
        }
        if s.len() > MAX_STR_LEN {
            return Err(NumericError::InputTooLong);
        }

        let bytes = s.as_bytes();
        let (neg, body) = match bytes[0] {
            b'-' => (true, &bytes[1..]),
            b'+' => (false, &bytes[1..]),
            _ => (false, bytes),
        };

        let (int_part, frac_part) = match body.iter().position(|&c| c == b'.') {
            Some(dot) => {
                let frac = &body[dot + 1..];
                if !all_digits(frac) {
                    return Err(NumericError::InvalidFormat);
                }
                (&body[..dot], frac)
            },
            None => (body, &body[body.len()..]),
        };
        if !all_digits(int_part) {
            return Err(NumericError::InvalidFormat);
        }
        if frac_part.len() > usize::from(cap) {
            return Err(NumericError::PrecisionOutOfRange);
        }

        let coef = push_digits(push_digits(Coefficient::ZERO, int_part), frac_part);
        Ok(Decimal::assemble(neg, coef, frac_part.len() as u8))
    }

    /// Parse a literal known to be valid.
    ///
    /// # Panics
    /// If `s` is not a valid decimal.
    pub fn must_parse(s: &str) -> Decimal {
        match Self::parse(s) {
            Ok(d) => d,
            Err(e) => panic!("invalid decimal literal {:?}: {}", s, e),
        }
    }

    /// Render with at least `n` fractional digits (at most 19).
    ///
    /// Values carrying more significant digits than `n` are printed in
    /// full; nothing is rounded.
    pub fn to_string_fixed(&self, n: u8) -> String {
        let t = self.trimmed();
        let n = n.min(MAX_SCALE);
        if n <= t.scale {
            return t.to_string();
        }

        let body = render(&t.coef.mul_pow10(u32::from(n - t.scale)), n);
        if t.neg {
            format!("-{}", body)
        } else {
            body
        }
    }
}

impl FromStr for Decimal {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical form: trailing fractional zeros removed, `-` only for
/// non-zero negatives. Honors width, fill and alignment.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.trimmed();
        f.pad_integral(!t.neg, "", &render(&t.coef, t.scale))
    }
}

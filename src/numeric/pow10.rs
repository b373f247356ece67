// ============================================================================
// Powers of Ten
// Lookup tables for decimal scaling
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::word128::Word128;
use super::word256::Word256;
use num_bigint::BigUint;
use num_traits::Pow;

/// Largest exponent whose power of ten fits in a `Word128`.
pub const MAX_POW10_EXP: usize = 38;

/// Largest exponent [`pow10_wide`] builds as a product of two table entries.
pub const MAX_POW10_WIDE_EXP: u32 = 76;

const fn build_pow10() -> [Word128; MAX_POW10_EXP + 1] {
    let mut table = [Word128::ZERO; MAX_POW10_EXP + 1];
    let mut v: u128 = 1;
    let mut i = 0;
    while i <= MAX_POW10_EXP {
        table[i] = Word128::from_u128(v);
        if i < MAX_POW10_EXP {
            v *= 10;
        }
        i += 1;
    }
    table
}

/// 10^0 through 10^38.
pub static POW10: [Word128; MAX_POW10_EXP + 1] = build_pow10();

/// 10^n as a 256-bit word.
///
/// # Errors
/// Returns `Overflow` if `n > 76`.
pub fn pow10_wide(n: u32) -> NumericResult<Word256> {
    if n > MAX_POW10_WIDE_EXP {
        return Err(NumericError::Overflow);
    }
    let n = n as usize;
    if n <= MAX_POW10_EXP {
        return Ok(Word256::from_word128(POW10[n]));
    }
    let (hi, lo) = POW10[MAX_POW10_EXP].widening_mul(POW10[n - MAX_POW10_EXP]);
    Ok(Word256::new(hi, lo))
}

/// 10^n in arbitrary precision.
pub fn pow10_big(n: u64) -> BigUint {
    Pow::pow(BigUint::from(10u8), n)
}

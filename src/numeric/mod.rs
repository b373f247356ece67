// ============================================================================
// Numeric Module
// Wide unsigned words and the overflow-transparent decimal coefficient
// ============================================================================
//
// This module provides:
// - Word128: 128-bit unsigned integer with checked/wrapping arithmetic
// - Word256: 256-bit workspace for products and scaled dividends
// - Coefficient: Word128 fast path with BigUint fallback
// - POW10: power-of-ten tables used for decimal scaling
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - Floating point only in lossy conversions and provable-zero shortcuts
// - Checked arithmetic returns Result; operators assert
// - Fallback to arbitrary precision never changes a result

mod coefficient;
mod errors;
mod pow10;
mod word128;
mod word256;

pub use coefficient::Coefficient;
pub use errors::{NumericError, NumericResult};
pub use pow10::{pow10_big, pow10_wide, MAX_POW10_EXP, MAX_POW10_WIDE_EXP, POW10};
pub use word128::Word128;
pub use word256::Word256;

// ============================================================================
// Wide Decimal Library
// Fixed-point decimal arithmetic on 128-bit words with arbitrary-precision fallback
// ============================================================================

//! # Wide Decimal
//!
//! Exact fixed-point decimal arithmetic for financial computation.
//!
//! ## Layers
//!
//! - **`Word128` / `Word256`**: unsigned fixed-width integers built from
//!   `u64` limbs, with checked, wrapping and asserting arithmetic
//! - **`Coefficient`**: an unsigned magnitude that lives in a `Word128` and
//!   moves to `BigUint` only when a result no longer fits
//! - **`Decimal`**: a signed value with up to 19 fractional digits
//! - **`DecimalConfig`**: a precision context for operations whose result
//!   scale is chosen rather than implied (division, powers, roots)
//!
//! Every result equals the unbounded-precision result followed by the
//! documented truncation or rounding step, whichever path computed it.
//!
//! ## Example
//!
//! ```rust
//! use wide_decimal::prelude::*;
//!
//! let price = Decimal::parse("22222.22211").unwrap();
//! let qty = Decimal::must_parse("3");
//!
//! let notional = &price * &qty;
//! assert_eq!(notional.to_string(), "66666.66633");
//!
//! // 19 fractional digits, truncated toward zero
//! let third = Decimal::ONE.checked_div(&qty).unwrap();
//! assert_eq!(third.to_string(), "0.3333333333333333333");
//!
//! // Same division under a 2-digit context
//! let cents = DecimalConfig::currency();
//! assert_eq!(cents.div(&notional, &qty).unwrap().to_string(), "22222.22");
//!
//! assert_eq!(third.round_bank(4).to_string(), "0.3333");
//! assert_eq!(Decimal::must_parse("2").sqrt().unwrap().to_string(), "1.4142135623730950488");
//! ```

pub mod config;
pub mod decimal;
pub mod numeric;

pub use config::DecimalConfig;
pub use decimal::{Decimal, RoundingMode, MAX_SCALE, MAX_STR_LEN};
pub use numeric::{Coefficient, NumericError, NumericResult, Word128, Word256};

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::DecimalConfig;
    pub use crate::decimal::{Decimal, RoundingMode};
    pub use crate::numeric::{NumericError, NumericResult, Word128, Word256};
}

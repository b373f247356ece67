// ============================================================================
// Numeric Errors
// Error types for wide-word and decimal arithmetic
// ============================================================================

use std::fmt;

/// Errors that can occur in word-level or decimal arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result exceeded the width of the target word
    Overflow,
    /// Unsigned subtraction went below zero
    Underflow,
    /// Attempted division by zero
    DivisionByZero,
    /// Negative input where only non-negative values are meaningful
    NegativeValue,
    /// Value does not fit in the target width
    ValueOverflow,
    /// Input string is not in the accepted grammar
    InvalidFormat,
    /// Input string is empty
    EmptyInput,
    /// Input string exceeds the maximum accepted length
    InputTooLong,
    /// Scale argument exceeds the supported number of fractional digits
    PrecisionOutOfRange,
    /// Zero raised to a negative power
    ZeroRaisedToNegativePower,
    /// Exponent magnitude beyond the supported range
    ExponentTooLarge,
    /// Integer part does not fit in an i64
    IntegerPartOverflow,
    /// Byte buffer has the wrong length for the encoded type
    InvalidEncodedData,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded maximum value")
            },
            NumericError::Underflow => {
                write!(f, "arithmetic underflow: result below zero")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::NegativeValue => write!(f, "value cannot be negative"),
            NumericError::ValueOverflow => write!(f, "value overflows the target width"),
            NumericError::InvalidFormat => write!(f, "invalid input: could not parse value"),
            NumericError::EmptyInput => write!(f, "can't parse empty string"),
            NumericError::InputTooLong => write!(
                f,
                "string input exceeds maximum length {}",
                crate::decimal::MAX_STR_LEN
            ),
            NumericError::PrecisionOutOfRange => write!(
                f,
                "precision out of range: at most {} digits after the decimal point",
                crate::decimal::MAX_SCALE
            ),
            NumericError::ZeroRaisedToNegativePower => {
                write!(f, "can't raise zero to a negative power")
            },
            NumericError::ExponentTooLarge => {
                write!(f, "exponent is too large: magnitude must fit in i32")
            },
            NumericError::IntegerPartOverflow => {
                write!(f, "integer part is too large to fit in i64")
            },
            NumericError::InvalidEncodedData => write!(f, "invalid encoded data"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded maximum value"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::InputTooLong.to_string(),
            "string input exceeds maximum length 200"
        );
        assert_eq!(
            NumericError::PrecisionOutOfRange.to_string(),
            "precision out of range: at most 19 digits after the decimal point"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::Underflow);
    }
}

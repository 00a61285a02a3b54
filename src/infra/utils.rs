//! Filepath: src/infra/utils.rs
//! Utility helpers organized by small, focused structs.
//! All functions are associated fns to keep call sites
//! ergonomic, testable, and discoverable.

use crate::core::error::{CsplitError, NumberReason};

/// Largest value accepted for counts and offsets (C `INT_MAX`)
pub const MAX_INT: i64 = i32::MAX as i64;

/// Smallest value accepted for offsets (C `INT_MIN`)
pub const MIN_INT: i64 = i32::MIN as i64;

/// Bounded integer parsing in the spirit of `strtonum(3)`
pub struct NumUtils;

impl NumUtils
{
    /// Parse `s` as a decimal integer within `[min, max]`.
    ///
    /// An optional leading `+` or `-` is accepted; anything else that is not
    /// a digit (including an empty string) is `invalid`.
    pub fn parse_bounded(
        s: &str,
        min: i64,
        max: i64,
    ) -> Result<i64, NumberReason>
    {
        // Split off the sign so overflow can be classified by direction
        let (negative, digits) = match s.as_bytes().first()
        {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(NumberReason::Invalid);
        }

        // Digits only from here; failure means the magnitude overflowed
        let value = match s.parse::<i64>()
        {
            Ok(v) => v,
            Err(_) if negative => return Err(NumberReason::TooSmall),
            Err(_) => return Err(NumberReason::TooLarge),
        };

        if value < min
        {
            return Err(NumberReason::TooSmall);
        }

        if value > max
        {
            return Err(NumberReason::TooLarge);
        }

        Ok(value)
    }

    /// Like [`parse_bounded`](Self::parse_bounded) but reports the failing
    /// token as a [`CsplitError::InvalidNumber`].
    pub fn parse_token(
        token: &str,
        min: i64,
        max: i64,
    ) -> Result<i64, CsplitError>
    {
        Self::parse_bounded(token, min, max).map_err(|reason| CsplitError::InvalidNumber {
            token: token.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn accepts_values_in_range()
    {
        assert_eq!(NumUtils::parse_bounded("0", 0, MAX_INT), Ok(0));
        assert_eq!(NumUtils::parse_bounded("42", 0, MAX_INT), Ok(42));
        assert_eq!(NumUtils::parse_bounded("+7", MIN_INT, MAX_INT), Ok(7));
        assert_eq!(NumUtils::parse_bounded("-3", MIN_INT, MAX_INT), Ok(-3));
        assert_eq!(NumUtils::parse_bounded("2147483647", 0, MAX_INT), Ok(MAX_INT));
    }

    #[test]
    fn classifies_failures()
    {
        assert_eq!(NumUtils::parse_bounded("", 0, 10), Err(NumberReason::Invalid));
        assert_eq!(NumUtils::parse_bounded("-", 0, 10), Err(NumberReason::Invalid));
        assert_eq!(NumUtils::parse_bounded("12a", 0, 10), Err(NumberReason::Invalid));
        assert_eq!(NumUtils::parse_bounded(" 1", 0, 10), Err(NumberReason::Invalid));
        assert_eq!(NumUtils::parse_bounded("11", 0, 10), Err(NumberReason::TooLarge));
        assert_eq!(NumUtils::parse_bounded("0", 1, 10), Err(NumberReason::TooSmall));
        assert_eq!(
            NumUtils::parse_bounded("2147483648", 0, MAX_INT),
            Err(NumberReason::TooLarge)
        );
        assert_eq!(
            NumUtils::parse_bounded("-99999999999999999999", MIN_INT, MAX_INT),
            Err(NumberReason::TooSmall)
        );
        assert_eq!(
            NumUtils::parse_bounded("99999999999999999999", MIN_INT, MAX_INT),
            Err(NumberReason::TooLarge)
        );
    }

    #[test]
    fn token_errors_carry_the_token()
    {
        let err = NumUtils::parse_token("x1", 0, 10).unwrap_err();
        assert_eq!(err.to_string(), "x1: invalid");
    }
}

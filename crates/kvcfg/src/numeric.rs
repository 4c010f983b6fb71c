//! Numeric conversion of stored values
//!
//! Mirrors the C library conversions configuration values are usually read
//! with: skip leading whitespace, take the longest numeric prefix, ignore
//! whatever trails it, and fall back to zero when there is no number.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::error::{Error, Result};

type PResult<'a, T> = IResult<&'a str, T, nom::error::Error<&'a str>>;

/// Valid `base` arguments: 0 (auto-detect) or 2 through 36
pub fn is_valid_base(base: u32) -> bool {
    base == 0 || (2..=36).contains(&base)
}

fn check_base(base: u32) -> Result<()> {
    if is_valid_base(base) {
        Ok(())
    } else {
        Err(Error::Critical("numeric base must be 0 or 2..=36"))
    }
}

fn c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn leading_space(input: &str) -> PResult<'_, &str> {
    take_while(c_space)(input)
}

fn negative(input: &str) -> PResult<'_, bool> {
    map(opt(one_of("+-")), |sign| sign == Some('-'))(input)
}

fn radix(input: &str, base: u32) -> PResult<'_, u32> {
    if base == 0 || base == 16 {
        let prefixed: PResult<'_, &str> = tag_no_case("0x")(input);
        if let Ok((rest, _)) = prefixed {
            // "0x" without a hex digit after it is just the number 0
            if rest.starts_with(|c: char| c.is_ascii_hexdigit()) {
                return Ok((rest, 16));
            }
        }
    }

    let radix = match base {
        0 if input.starts_with('0') => 8,
        0 => 10,
        b => b,
    };
    Ok((input, radix))
}

/// Sign, radix and magnitude of the integer prefix of `input`
///
/// The magnitude is `None` on overflow.
fn integer(input: &str, base: u32) -> PResult<'_, (bool, Option<u64>)> {
    let (input, _) = leading_space(input)?;
    let (input, negative) = negative(input)?;
    let (input, radix) = radix(input, base)?;
    let (input, digits) = take_while1(|c: char| c.is_digit(radix))(input)?;

    let magnitude = digits.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(u64::from(radix))?
            .checked_add(u64::from(c.to_digit(radix)?))
    });

    Ok((input, (negative, magnitude)))
}

/// `strtol`-style conversion
///
/// `base` outside 0 and 2..=36 is [`Error::Critical`].
pub fn parse_i64(text: &str, base: u32) -> Result<i64> {
    check_base(base)?;
    let Ok((_, (negative, magnitude))) = integer(text, base) else {
        return Ok(0);
    };

    Ok(match (negative, magnitude) {
        (false, Some(m)) => i64::try_from(m).unwrap_or(i64::MAX),
        (true, Some(m)) => 0i64.checked_sub_unsigned(m).unwrap_or(i64::MIN),
        (false, None) => i64::MAX,
        (true, None) => i64::MIN,
    })
}

/// `strtoul`-style conversion; a leading minus negates modulo 2^64
pub fn parse_u64(text: &str, base: u32) -> Result<u64> {
    check_base(base)?;
    let Ok((_, (negative, magnitude))) = integer(text, base) else {
        return Ok(0);
    };

    Ok(match magnitude {
        Some(m) if negative => m.wrapping_neg(),
        Some(m) => m,
        None => u64::MAX,
    })
}

/// Longest decimal float prefix, exponent included only when it has digits
fn float_prefix(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            tag_no_case("infinity"),
            tag_no_case("inf"),
            tag_no_case("nan"),
            recognize(tuple((
                alt((
                    recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                    recognize(pair(char('.'), digit1)),
                )),
                opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            ))),
        )),
    ))(input)
}

/// `strtod`-style conversion of the decimal float prefix
pub fn parse_f64(text: &str) -> f64 {
    leading_space(text)
        .and_then(|(rest, _)| float_prefix(rest))
        .ok()
        .and_then(|(_, number)| number.parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(parse_i64("5432", 10).unwrap(), 5432);
        assert_eq!(parse_i64("  -17", 10).unwrap(), -17);
        assert_eq!(parse_i64("+8", 10).unwrap(), 8);
        assert_eq!(parse_i64("42 seconds", 10).unwrap(), 42);
    }

    #[test]
    fn test_no_digits_is_zero() {
        assert_eq!(parse_i64("abc", 10).unwrap(), 0);
        assert_eq!(parse_i64("", 10).unwrap(), 0);
        assert_eq!(parse_i64("-", 10).unwrap(), 0);
        assert_eq!(parse_u64("yes", 0).unwrap(), 0);
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_i64("ff", 16).unwrap(), 255);
        assert_eq!(parse_i64("0xFF", 16).unwrap(), 255);
        assert_eq!(parse_i64("0x1f", 0).unwrap(), 31);
        assert_eq!(parse_i64("0xg", 16).unwrap(), 0);
        assert_eq!(parse_i64("0x", 0).unwrap(), 0);
    }

    #[test]
    fn test_auto_octal() {
        assert_eq!(parse_i64("0755", 0).unwrap(), 493);
        assert_eq!(parse_i64("0", 0).unwrap(), 0);
        assert_eq!(parse_i64("089", 0).unwrap(), 0);
        assert_eq!(parse_i64("123", 0).unwrap(), 123);
    }

    #[test]
    fn test_other_bases() {
        assert_eq!(parse_i64("1010", 2).unwrap(), 10);
        assert_eq!(parse_i64("z", 36).unwrap(), 35);
        assert_eq!(parse_i64("12", 3).unwrap(), 5);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(parse_i64("9223372036854775807", 10).unwrap(), i64::MAX);
        assert_eq!(parse_i64("9223372036854775808", 10).unwrap(), i64::MAX);
        assert_eq!(parse_i64("-9223372036854775808", 10).unwrap(), i64::MIN);
        assert_eq!(parse_i64("-99999999999999999999", 10).unwrap(), i64::MIN);
        assert_eq!(parse_u64("99999999999999999999", 10).unwrap(), u64::MAX);
    }

    #[test]
    fn test_unsigned_negation_wraps() {
        assert_eq!(parse_u64("-1", 10).unwrap(), u64::MAX);
        assert_eq!(parse_u64("18446744073709551615", 10).unwrap(), u64::MAX);
        assert_eq!(parse_u64("0x10", 0).unwrap(), 16);
    }

    #[test]
    fn test_float() {
        assert_eq!(parse_f64("3.25"), 3.25);
        assert_eq!(parse_f64("  -0.5ms"), -0.5);
        assert_eq!(parse_f64("1e3"), 1000.0);
        assert_eq!(parse_f64(".5"), 0.5);
        assert_eq!(parse_f64("7"), 7.0);
        assert_eq!(parse_f64("fast"), 0.0);
        assert_eq!(parse_f64("-"), 0.0);
    }

    #[test]
    fn test_float_dangling_exponent() {
        assert_eq!(parse_f64("3em"), 3.0);
        assert_eq!(parse_f64("1e"), 1.0);
        assert_eq!(parse_f64("2e+"), 2.0);
        assert_eq!(parse_f64("1.5E"), 1.5);
        assert_eq!(parse_f64("2.5e-1px"), 0.25);
    }

    #[test]
    fn test_float_special_values() {
        assert!(parse_f64("inf").is_infinite());
        assert_eq!(parse_f64("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_f64(" nan").is_nan());
        assert_eq!(parse_f64("1."), 1.0);
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(matches!(parse_i64("12", 1), Err(Error::Critical(_))));
        assert!(matches!(parse_i64("12", 37), Err(Error::Critical(_))));
        assert!(matches!(parse_u64("12", 37), Err(Error::Critical(_))));
        assert_eq!(parse_u64("12", 36).unwrap(), 38);
    }

    #[test]
    fn test_valid_base() {
        assert!(is_valid_base(0));
        assert!(is_valid_base(10));
        assert!(is_valid_base(36));
        assert!(!is_valid_base(1));
        assert!(!is_valid_base(37));
    }
}

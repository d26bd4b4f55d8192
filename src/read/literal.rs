//! Numeric literal grammar:
//!
//! ```text
//! number  := ('#e' | '#i')? (real imag | imag | real)
//! real    := special | sign? ureal
//! imag    := (special | sign ureal?) 'i'
//! ureal   := decimal | digits '/' digits | digits
//! special := '+inf.0' | '-inf.0' | '+nan.0' | '-nan.0'
//! ```

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{all_consuming, map, map_res, opt, recognize, value};
use nom::error::ErrorKind;
use nom::sequence::{pair, terminated, tuple};
use nom::IResult;

use num::{BigInt, BigRational, Zero};

use crate::number::{Exactness, Number, Real};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralError {
    DivideByZero,
    NoExactRepresentation,
}

#[derive(Clone, Debug)]
enum Magnitude {
    Integer(BigInt),
    Fraction(BigInt, BigInt),
    Decimal(Option<BigRational>, f64),
    Special(f64),
}

type Signed = (bool, Magnitude);

// Larger exponents are not given an exact expansion.
const MAX_EXACT_EXPONENT: i64 = 4096;

fn sign(input: &str) -> IResult<&str, bool> {
    map(one_of("+-"), |c| c == '-')(input)
}

fn digits(input: &str) -> IResult<&str, BigInt> {
    map_res(digit1, |d: &str| d.parse::<BigInt>())(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn decimal_to_rational(text: &str) -> Option<BigRational> {
    let (mantissa, exp) = match text.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&text[..at], text[at + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    if exp.abs() > MAX_EXACT_EXPONENT {
        return None;
    }
    let (whole, fraction) = match mantissa.find('.') {
        Some(at) => (&mantissa[..at], &mantissa[at + 1..]),
        None => (mantissa, ""),
    };
    let all_digits = format!("{}{}", whole, fraction);
    let numer = if all_digits.is_empty() {
        BigInt::zero()
    } else {
        all_digits.parse::<BigInt>().ok()?
    };
    let scale = exp - fraction.len() as i64;
    let ten = BigInt::from(10);
    if scale >= 0 {
        Some(BigRational::from_integer(numer * num::pow(ten, scale as usize)))
    } else {
        Some(BigRational::new(numer, num::pow(ten, (-scale) as usize)))
    }
}

fn decimal(input: &str) -> IResult<&str, Magnitude> {
    let (rest, text) = recognize(alt((
        recognize(tuple((digit1, char('.'), digit0, opt(exponent)))),
        recognize(tuple((char('.'), digit1, opt(exponent)))),
        recognize(pair(digit1, exponent)),
    )))(input)?;
    match text.parse::<f64>() {
        Ok(float) => Ok((rest, Magnitude::Decimal(decimal_to_rational(text), float))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Float))),
    }
}

fn fraction(input: &str) -> IResult<&str, Magnitude> {
    map(tuple((digits, char('/'), digits)),
        |(n, _, d)| Magnitude::Fraction(n, d))(input)
}

fn ureal(input: &str) -> IResult<&str, Magnitude> {
    alt((decimal, fraction, map(digits, Magnitude::Integer)))(input)
}

fn special(input: &str) -> IResult<&str, Signed> {
    alt((
        value((false, Magnitude::Special(f64::INFINITY)), tag("+inf.0")),
        value((false, Magnitude::Special(f64::NEG_INFINITY)), tag("-inf.0")),
        value((false, Magnitude::Special(f64::NAN)), tag("+nan.0")),
        value((false, Magnitude::Special(f64::NAN)), tag("-nan.0")),
    ))(input)
}

fn real(input: &str) -> IResult<&str, Signed> {
    alt((special, map(pair(opt(sign), ureal),
        |(negative, m)| (negative.unwrap_or(false), m))))(input)
}

fn imag(input: &str) -> IResult<&str, Signed> {
    terminated(alt((special, map(pair(sign, opt(ureal)),
        |(negative, m)| (negative, m.unwrap_or_else(||
            Magnitude::Integer(BigInt::from(1))))))), char('i'))(input)
}

enum Shape {
    Real(Signed),
    Complex(Signed, Signed),
}

fn shape(input: &str) -> IResult<&str, Shape> {
    all_consuming(alt((
        map(pair(real, imag), |(re, im)| Shape::Complex(re, im)),
        map(imag, |im| Shape::Complex((false, Magnitude::Integer(BigInt::zero())), im)),
        map(real, Shape::Real),
    )))(input)
}

fn to_real((negative, magnitude): Signed, exactness: Option<Exactness>) ->
    Result<Real, LiteralError> {

    let real = match magnitude {
        Magnitude::Integer(n) => match exactness {
            Some(Exactness::Inexact) => Real::Inexact(BigRational::from_integer(n)),
            _ => Real::Exact(BigRational::from_integer(n)),
        },
        Magnitude::Fraction(n, d) => {
            if d.is_zero() {
                return Err(LiteralError::DivideByZero);
            }
            match exactness {
                Some(Exactness::Inexact) => Real::Inexact(BigRational::new(n, d)),
                _ => Real::Exact(BigRational::new(n, d)),
            }
        },
        Magnitude::Decimal(exact, float) => match (exactness, exact) {
            (Some(Exactness::Exact), Some(exact)) => Real::Exact(exact),
            (Some(Exactness::Exact), None) =>
                return Err(LiteralError::NoExactRepresentation),
            (_, _) => Real::Float(float),
        },
        Magnitude::Special(float) => match exactness {
            Some(Exactness::Exact) =>
                return Err(LiteralError::NoExactRepresentation),
            _ => Real::Float(float),
        },
    };
    Ok(if negative { real.negate() } else { real })
}

/// Returns `None` when `text` is not shaped like a number at all, in which
/// case the scanner treats it as a name (or a bad `#` form).
pub fn parse_number(text: &str) -> Option<Result<Number, LiteralError>> {
    let (exactness, body) = match text.as_bytes() {
        [b'#', b'e', ..] | [b'#', b'E', ..] => (Some(Exactness::Exact), &text[2..]),
        [b'#', b'i', ..] | [b'#', b'I', ..] => (Some(Exactness::Inexact), &text[2..]),
        [b'#', ..] => return None,
        _ => (None, text),
    };
    let (_, parsed) = shape(body).ok()?;
    Some(match parsed {
        Shape::Real(re) => to_real(re, exactness).map(Number::real),
        Shape::Complex(re, im) => to_real(re, exactness).and_then(|re|
            Ok(Number::complex(re, to_real(im, exactness)?))),
    })
}

#[cfg(test)]
fn printed(text: &str) -> String {
    parse_number(text).unwrap().unwrap().to_string()
}

#[test]
fn test_integers_and_fractions() {
    assert_eq!(printed("42"), "42");
    assert_eq!(printed("-17"), "-17");
    assert_eq!(printed("1/2"), "0.5");
    assert_eq!(printed("4/2"), "2");
    assert_eq!(printed("#i1/4"), "#i0.25");
}

#[test]
fn test_decimals() {
    assert_eq!(printed("1.5"), "#i1.5");
    assert_eq!(printed(".5"), "#i0.5");
    assert_eq!(printed("#e1.5"), "1.5");
    assert_eq!(printed("#e1.0"), "1");
    assert_eq!(printed("1e3"), "#i1000.0");
}

#[test]
fn test_exponent_beyond_exact_range() {
    assert_eq!(printed("1e5000"), "#i+inf.0");
    assert_eq!(printed("-1e5000"), "#i-inf.0");
    assert_eq!(printed("1e-5000"), "#i0.0");
    assert_eq!(parse_number("#e1e5000"),
        Some(Err(LiteralError::NoExactRepresentation)));
}

#[test]
fn test_specials() {
    assert_eq!(printed("+inf.0"), "#i+inf.0");
    assert_eq!(printed("-inf.0"), "#i-inf.0");
    assert_eq!(printed("+nan.0"), "#i+nan.0");
    assert_eq!(parse_number("#e+inf.0"),
        Some(Err(LiteralError::NoExactRepresentation)));
}

#[test]
fn test_complex_literals() {
    assert_eq!(printed("1+2i"), "1+2i");
    assert_eq!(printed("3-i"), "3-1i");
    assert_eq!(printed("+2i"), "0+2i");
    assert_eq!(printed("1+0i"), "1");
    assert_eq!(printed("#i1+2i"), "#i1.0+2.0i");
}

#[test]
fn test_zero_denominator() {
    assert_eq!(parse_number("3/0"), Some(Err(LiteralError::DivideByZero)));
}

#[test]
fn test_not_numbers() {
    assert!(parse_number("-").is_none());
    assert!(parse_number("+").is_none());
    assert!(parse_number("1st").is_none());
    assert!(parse_number("x1").is_none());
    assert!(parse_number("...").is_none());
    assert!(parse_number("#q").is_none());
}

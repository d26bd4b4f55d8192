
use std::cmp::Ordering;
use std::fmt;

use gc;

use num::{BigInt, BigRational, Complex, FromPrimitive, Integer, One, Signed,
    ToPrimitive, Zero};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exactness {
    Exact,
    Inexact
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticError {
    DivideByZero,
    NoExactRepresentation,
}

/// A real component. Ordered by contagion rank: an operation on two reals
/// yields the higher-ranked kind of its operands.
#[derive(Clone, Debug)]
pub enum Real {
    Exact(BigRational),
    Inexact(BigRational),
    Float(f64),
}

/// Complex numbers never carry an exact zero imaginary part; `Number::complex`
/// collapses those to their real component.
#[derive(Clone, Debug, gc::Finalize)]
pub enum Number {
    Real(Real),
    Complex(Complex<Real>),
}

unsafe impl gc::Trace for Number {
    gc::unsafe_empty_trace!();
}

impl Real {
    pub fn exact(n: BigRational) -> Real {
        Real::Exact(n)
    }

    pub fn integer(n: i64) -> Real {
        Real::Exact(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn exactness(&self) -> Exactness {
        match self {
            Real::Exact(_) => Exactness::Exact,
            _ => Exactness::Inexact,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.exactness() == Exactness::Exact
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Real::Exact(n) | Real::Inexact(n) => n.to_f64().unwrap_or(f64::NAN),
            Real::Float(f) => *f,
        }
    }

    pub fn to_rational(&self) -> Result<BigRational, ArithmeticError> {
        match self {
            Real::Exact(n) | Real::Inexact(n) => Ok(n.clone()),
            Real::Float(f) => BigRational::from_float(*f)
                .ok_or(ArithmeticError::NoExactRepresentation),
        }
    }

    pub fn to_exact(&self) -> Result<Real, ArithmeticError> {
        Ok(Real::Exact(self.to_rational()?))
    }

    /// Marks an exact value inexact without changing its representation.
    fn to_inexact(&self) -> Real {
        match self {
            Real::Exact(n) => Real::Inexact(n.clone()),
            other => other.clone(),
        }
    }

    pub fn to_float(&self) -> Real {
        Real::Float(self.to_f64())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Real::Exact(n) | Real::Inexact(n) => n.is_zero(),
            Real::Float(f) => *f == 0.0,
        }
    }

    pub fn is_exact_zero(&self) -> bool {
        match self {
            Real::Exact(n) => n.is_zero(),
            _ => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Real::Exact(n) | Real::Inexact(n) => n.is_negative(),
            Real::Float(f) => *f < 0.0,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Real::Exact(n) | Real::Inexact(n) => n.is_integer(),
            Real::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    pub fn to_integer(&self) -> Option<BigInt> {
        match self {
            Real::Exact(n) | Real::Inexact(n) if n.is_integer() =>
                Some(n.to_integer()),
            Real::Float(f) if f.is_finite() && f.fract() == 0.0 =>
                BigInt::from_f64(*f),
            _ => None,
        }
    }

    /// Builds a real of the given kind from an integer result.
    fn like(&self, n: BigInt) -> Real {
        match self {
            Real::Exact(_) => Real::Exact(BigRational::from_integer(n)),
            Real::Inexact(_) => Real::Inexact(BigRational::from_integer(n)),
            Real::Float(_) => Real::Float(n.to_f64().unwrap_or(f64::NAN)),
        }
    }

    pub fn add(&self, other: &Real) -> Real {
        match (self, other) {
            (Real::Exact(a), Real::Exact(b)) => Real::Exact(a + b),
            (Real::Float(_), _) | (_, Real::Float(_)) =>
                Real::Float(self.to_f64() + other.to_f64()),
            (Real::Exact(a), Real::Inexact(b))
                | (Real::Inexact(a), Real::Exact(b))
                | (Real::Inexact(a), Real::Inexact(b)) => Real::Inexact(a + b),
        }
    }

    pub fn mul(&self, other: &Real) -> Real {
        match (self, other) {
            (Real::Exact(a), Real::Exact(b)) => Real::Exact(a * b),
            (Real::Float(_), _) | (_, Real::Float(_)) =>
                Real::Float(self.to_f64() * other.to_f64()),
            (Real::Exact(a), Real::Inexact(b))
                | (Real::Inexact(a), Real::Exact(b))
                | (Real::Inexact(a), Real::Inexact(b)) => Real::Inexact(a * b),
        }
    }

    // Integer division keeps the widest kind of its operands.
    fn integer_division<F>(&self, other: &Real, op: F) ->
        Result<Real, ArithmeticError>
        where F: Fn(&BigInt, &BigInt) -> BigInt {

        let (a, b) = match (self.to_integer(), other.to_integer()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(ArithmeticError::NoExactRepresentation),
        };
        if b.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        let kind = match (self, other) {
            (Real::Float(_), _) | (_, Real::Float(_)) => Real::Float(0.0),
            (Real::Exact(_), Real::Exact(_)) => Real::integer(0),
            _ => Real::Inexact(BigRational::zero()),
        };
        Ok(kind.like(op(&a, &b)))
    }

    /// Truncating division.
    pub fn quotient(&self, other: &Real) -> Result<Real, ArithmeticError> {
        self.integer_division(other, |a, b| a / b)
    }

    /// Takes the sign of the dividend.
    pub fn remainder(&self, other: &Real) -> Result<Real, ArithmeticError> {
        self.integer_division(other, |a, b| a % b)
    }

    /// Takes the sign of the divisor.
    pub fn modulo(&self, other: &Real) -> Result<Real, ArithmeticError> {
        self.integer_division(other, |a, b| a.mod_floor(b))
    }

    pub fn numerator(&self) -> Result<Real, ArithmeticError> {
        Ok(self.like(self.to_rational()?.numer().clone()))
    }

    pub fn denominator(&self) -> Result<Real, ArithmeticError> {
        Ok(self.like(self.to_rational()?.denom().clone()))
    }

    pub fn negate(&self) -> Real {
        match self {
            Real::Exact(n) => Real::Exact(-n),
            Real::Inexact(n) => Real::Inexact(-n),
            Real::Float(f) => Real::Float(-f),
        }
    }

    /// Exact zero has no inverse. Inexact zeros invert to `+inf.0`, as
    /// floats do.
    pub fn invert(&self) -> Result<Real, ArithmeticError> {
        match self {
            Real::Exact(n) if n.is_zero() => Err(ArithmeticError::DivideByZero),
            Real::Inexact(n) if n.is_zero() => Ok(Real::Float(f64::INFINITY)),
            Real::Exact(n) => Ok(Real::Exact(n.recip())),
            Real::Inexact(n) => Ok(Real::Inexact(n.recip())),
            Real::Float(f) => Ok(Real::Float(1.0 / f)),
        }
    }

    pub fn abs(&self) -> Real {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    pub fn floor(&self) -> Real {
        match self {
            Real::Exact(n) => Real::Exact(n.floor()),
            Real::Inexact(n) => Real::Inexact(n.floor()),
            Real::Float(f) => Real::Float(f.floor()),
        }
    }

    pub fn ceiling(&self) -> Real {
        match self {
            Real::Exact(n) => Real::Exact(n.ceil()),
            Real::Inexact(n) => Real::Inexact(n.ceil()),
            Real::Float(f) => Real::Float(f.ceil()),
        }
    }

    /// Rounds to the nearest integer, ties to even.
    pub fn round(&self) -> Real {
        match self {
            Real::Float(f) => {
                let r = f.round();
                if (f - f.trunc()).abs() == 0.5 && r % 2.0 != 0.0 {
                    Real::Float(r - f.signum())
                } else {
                    Real::Float(r)
                }
            },
            Real::Exact(n) | Real::Inexact(n) => {
                let floor = n.floor();
                let diff = n - &floor;
                let half = BigRational::new(BigInt::one(), BigInt::from(2));
                let lower = floor.to_integer();
                let rounded = match diff.cmp(&half) {
                    Ordering::Less => lower,
                    Ordering::Greater => lower + 1,
                    Ordering::Equal if lower.is_even() => lower,
                    Ordering::Equal => lower + 1,
                };
                self.like(rounded)
            },
        }
    }

    pub fn partial_cmp(&self, other: &Real) -> Option<Ordering> {
        match (self, other) {
            (Real::Float(_), _) | (_, Real::Float(_)) =>
                self.to_f64().partial_cmp(&other.to_f64()),
            (Real::Exact(a), Real::Exact(b))
                | (Real::Exact(a), Real::Inexact(b))
                | (Real::Inexact(a), Real::Exact(b))
                | (Real::Inexact(a), Real::Inexact(b)) => Some(a.cmp(b)),
        }
    }

    pub fn num_eq(&self, other: &Real) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }

    pub fn sqrt(&self) -> Number {
        if self.is_negative() {
            let root = self.negate().sqrt();
            let im = match root {
                Number::Real(r) => r,
                Number::Complex(_) => return root,
            };
            let re = if im.is_exact() { Real::integer(0) } else { Real::Float(0.0) };
            return Number::complex(re, im);
        }
        if let Real::Exact(n) = self {
            let num = n.numer().sqrt();
            let den = n.denom().sqrt();
            if &num * &num == *n.numer() && &den * &den == *n.denom() {
                return Number::Real(Real::Exact(BigRational::new(num, den)));
            }
        }
        Number::Real(Real::Float(self.to_f64().sqrt()))
    }

    fn format(&self, f: &mut fmt::Formatter, marker: bool) -> fmt::Result {
        match self {
            Real::Exact(n) if n.is_integer() => write!(f, "{}", n.to_integer()),
            Real::Exact(n) => match n.to_f64() {
                Some(x) if x.is_finite() && x != 0.0 => write!(f, "{}", x),
                _ => write!(f, "{}/{}", n.numer(), n.denom()),
            },
            Real::Inexact(_) | Real::Float(_) => {
                if marker {
                    write!(f, "#i")?;
                }
                write!(f, "{}", float_text(self.to_f64()))
            },
        }
    }
}

fn float_text(x: f64) -> String {
    if x.is_nan() {
        "+nan.0".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "+inf.0".to_string() } else { "-inf.0".to_string() }
    } else if x.fract() == 0.0 && x.abs() < 1e21 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.format(f, true)
    }
}

impl Number {
    pub fn real(r: Real) -> Number {
        Number::Real(r)
    }

    pub fn complex(re: Real, im: Real) -> Number {
        if im.is_exact_zero() {
            Number::Real(re)
        } else {
            Number::Complex(Complex::new(re, im))
        }
    }

    pub fn exact(n: BigRational) -> Number {
        Number::Real(Real::Exact(n))
    }

    pub fn float(f: f64) -> Number {
        Number::Real(Real::Float(f))
    }

    pub fn from_inexact_complex(n: Complex<f64>) -> Number {
        Number::complex(Real::Float(n.re), Real::Float(n.im))
    }

    pub fn to_inexact_complex(&self) -> Complex<f64> {
        match self {
            Number::Real(r) => Complex::new(r.to_f64(), 0.0),
            Number::Complex(c) => Complex::new(c.re.to_f64(), c.im.to_f64()),
        }
    }

    pub fn as_real(&self) -> Option<&Real> {
        match self {
            Number::Real(r) => Some(r),
            Number::Complex(_) => None,
        }
    }

    pub fn real_part(&self) -> Real {
        match self {
            Number::Real(r) => r.clone(),
            Number::Complex(c) => c.re.clone(),
        }
    }

    pub fn imag_part(&self) -> Real {
        match self {
            Number::Real(_) => Real::integer(0),
            Number::Complex(c) => c.im.clone(),
        }
    }

    pub fn exactness(&self) -> Exactness {
        match self {
            Number::Real(r) => r.exactness(),
            Number::Complex(c) if c.re.is_exact() && c.im.is_exact() =>
                Exactness::Exact,
            Number::Complex(_) => Exactness::Inexact,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.exactness() == Exactness::Exact
    }

    pub fn is_inexact(&self) -> bool {
        self.exactness() == Exactness::Inexact
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Real(r) => r.is_zero(),
            Number::Complex(c) => c.re.is_zero() && c.im.is_zero(),
        }
    }

    pub fn to_exact(&self) -> Result<Number, ArithmeticError> {
        match self {
            Number::Real(r) => Ok(Number::Real(r.to_exact()?)),
            Number::Complex(c) => Ok(Number::complex(c.re.to_exact()?,
                c.im.to_exact()?)),
        }
    }

    pub fn to_inexact(&self) -> Number {
        match self {
            Number::Real(r) => Number::Real(r.to_float()),
            Number::Complex(c) => Number::complex(c.re.to_float(),
                c.im.to_float()),
        }
    }

    fn components(&self) -> (Real, Real) {
        (self.real_part(), self.imag_part())
    }

    /// Complex results of mixed-exactness operands are inexact throughout.
    fn complex_result(re: Real, im: Real, inexact: bool) -> Number {
        if inexact {
            Number::complex(re.to_inexact(), im.to_inexact())
        } else {
            Number::complex(re, im)
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => Number::Real(a.add(b)),
            _ => {
                let (a, b) = self.components();
                let (c, d) = other.components();
                let inexact = self.is_inexact() || other.is_inexact();
                Number::complex_result(a.add(&c), b.add(&d), inexact)
            },
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => Number::Real(a.mul(b)),
            _ => {
                let (a, b) = self.components();
                let (c, d) = other.components();
                let inexact = self.is_inexact() || other.is_inexact();
                let re = a.mul(&c).add(&b.mul(&d).negate());
                let im = a.mul(&d).add(&b.mul(&c));
                Number::complex_result(re, im, inexact)
            },
        }
    }

    pub fn negate(&self) -> Number {
        match self {
            Number::Real(r) => Number::Real(r.negate()),
            Number::Complex(c) => Number::complex(c.re.negate(), c.im.negate()),
        }
    }

    pub fn invert(&self) -> Result<Number, ArithmeticError> {
        match self {
            Number::Real(r) => Ok(Number::Real(r.invert()?)),
            Number::Complex(c) => {
                let denom = c.re.mul(&c.re).add(&c.im.mul(&c.im));
                let scale = denom.invert()?;
                Ok(Number::complex(c.re.mul(&scale),
                    c.im.negate().mul(&scale)))
            },
        }
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.add(&other.negate())
    }

    pub fn div(&self, other: &Number) -> Result<Number, ArithmeticError> {
        Ok(self.mul(&other.invert()?))
    }

    pub fn num_eq(&self, other: &Number) -> bool {
        let (a, b) = self.components();
        let (c, d) = other.components();
        a.num_eq(&c) && b.num_eq(&d)
    }

    pub fn sqrt(&self) -> Number {
        match self {
            Number::Real(r) => r.sqrt(),
            Number::Complex(_) =>
                Number::from_inexact_complex(self.to_inexact_complex().sqrt()),
        }
    }

    pub fn magnitude(&self) -> Number {
        match self {
            Number::Real(r) => Number::Real(r.abs()),
            Number::Complex(c) => c.re.mul(&c.re).add(&c.im.mul(&c.im)).sqrt(),
        }
    }

    pub fn expt(&self, power: &Number) -> Result<Number, ArithmeticError> {
        if let Some(Real::Exact(p)) = power.as_real() {
            if p.is_integer() {
                return self.integer_power(&p.to_integer());
            }
        }
        match (self.as_real(), power.as_real()) {
            (Some(base), Some(p)) if !base.is_negative() =>
                Ok(Number::float(base.to_f64().powf(p.to_f64()))),
            _ => Ok(Number::from_inexact_complex(
                self.to_inexact_complex().powc(power.to_inexact_complex()))),
        }
    }

    fn integer_power(&self, power: &BigInt) -> Result<Number, ArithmeticError> {
        let base = if power.is_negative() {
            self.invert()?
        } else {
            self.clone()
        };
        let mut exponent = power.abs();
        let mut square = base;
        let mut result = Number::Real(Real::integer(1));
        let two = BigInt::from(2);
        while !exponent.is_zero() {
            if exponent.is_odd() {
                result = result.mul(&square);
            }
            exponent = exponent / &two;
            if !exponent.is_zero() {
                square = square.mul(&square);
            }
        }
        Ok(result)
    }
}

// Representation-sensitive: `1` and `1.0` are distinct literals.
impl PartialEq for Real {
    fn eq(&self, other: &Real) -> bool {
        self.exactness() == other.exactness() && self.num_eq(other)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.real_part() == other.real_part()
            && self.imag_part() == other.imag_part()
    }
}

impl FromPrimitive for Number {
    fn from_i64(n: i64) -> Option<Number> {
        Some(Number::Real(Real::integer(n)))
    }

    fn from_u64(n: u64) -> Option<Number> {
        Some(Number::exact(BigRational::from_integer(BigInt::from(n))))
    }

    fn from_f64(n: f64) -> Option<Number> {
        Some(Number::float(n))
    }
}

impl ToPrimitive for Number {
    fn to_i64(&self) -> Option<i64> {
        self.as_real()?.to_integer()?.to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.as_real()?.to_integer()?.to_u64()
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.as_real()?.to_f64())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Real(r) => r.format(f, true),
            Number::Complex(c) => {
                c.re.format(f, true)?;
                let imag = format!("{}", ImagPart(&c.im));
                if !imag.starts_with('-') && !imag.starts_with('+') {
                    write!(f, "+")?;
                }
                write!(f, "{}i", imag)
            },
        }
    }
}

struct ImagPart<'a>(&'a Real);

impl<'a> fmt::Display for ImagPart<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.format(f, false)
    }
}

#[cfg(test)]
fn int(n: i64) -> Number {
    Number::from_i64(n).unwrap()
}

#[cfg(test)]
fn ratio(n: i64, d: i64) -> Number {
    Number::exact(BigRational::new(BigInt::from(n), BigInt::from(d)))
}

#[test]
fn test_exact_sum_is_reduced() {
    match ratio(1, 6).add(&ratio(1, 3)) {
        Number::Real(Real::Exact(n)) => {
            assert_eq!(n.numer(), &BigInt::from(1));
            assert_eq!(n.denom(), &BigInt::from(2));
        },
        other => panic!("expected an exact result, got {:?}", other),
    }
}

#[test]
fn test_denominator_stays_positive() {
    match ratio(1, 2).div(&int(-3)).unwrap() {
        Number::Real(Real::Exact(n)) => {
            assert!(n.denom().is_positive());
            assert_eq!(n.numer(), &BigInt::from(-1));
        },
        other => panic!("expected an exact result, got {:?}", other),
    }
}

#[test]
fn test_inexact_contagion() {
    let x = int(2).add(&Number::float(0.5));
    assert!(x.is_inexact());
    assert_eq!(x.to_string(), "#i2.5");
    let y = int(3).mul(&Number::Real(Real::Inexact(BigRational::from_integer(
        BigInt::from(2)))));
    assert!(matches!(y, Number::Real(Real::Inexact(_))));
}

#[test]
fn test_complex_collapses_on_exact_zero_imaginary() {
    let i = Number::complex(Real::integer(0), Real::integer(1));
    assert!(matches!(i.mul(&i), Number::Real(Real::Exact(_))));
    assert_eq!(i.mul(&i).to_string(), "-1");
    let sum = Number::complex(Real::integer(1), Real::integer(2))
        .add(&Number::complex(Real::integer(1), Real::integer(-2)));
    assert_eq!(sum.to_string(), "2");
}

#[test]
fn test_complex_product() {
    let a = Number::complex(Real::integer(1), Real::integer(2));
    let b = Number::complex(Real::integer(3), Real::integer(-1));
    assert_eq!(a.mul(&b).to_string(), "5+5i");
    assert_eq!(a.add(&int(1)).to_string(), "2+2i");
}

#[test]
fn test_divide_by_zero() {
    assert_eq!(int(4).div(&int(0)).unwrap_err(), ArithmeticError::DivideByZero);
    assert_eq!(int(1).div(&Number::float(0.0)).unwrap().to_string(), "#i+inf.0");
    let inexact_zero = Number::Real(Real::Inexact(BigRational::zero()));
    assert_eq!(int(1).div(&inexact_zero).unwrap().to_string(), "#i+inf.0");
    assert_eq!(int(-1).div(&inexact_zero).unwrap().to_string(), "#i-inf.0");
}

#[test]
fn test_printing() {
    assert_eq!(ratio(1, 2).to_string(), "0.5");
    assert_eq!(int(-7).to_string(), "-7");
    assert_eq!(Number::float(2.0).to_string(), "#i2.0");
    assert_eq!(Number::float(f64::NAN).to_string(), "#i+nan.0");
    let c = Number::complex(Real::Float(1.5), Real::Float(-2.0));
    assert_eq!(c.to_string(), "#i1.5-2.0i");
}

#[test]
fn test_exact_fraction_beyond_float_range() {
    let huge = int(10).expt(&int(400)).unwrap().div(&int(3)).unwrap();
    assert_eq!(huge.to_string(), format!("1{}/3", "0".repeat(400)));
    let tiny = int(1).div(&int(10).expt(&int(400)).unwrap()).unwrap();
    assert_eq!(tiny.to_string(), format!("1/1{}", "0".repeat(400)));
}

#[test]
fn test_sqrt_and_expt() {
    assert_eq!(int(16).sqrt().to_string(), "4");
    assert_eq!(int(-4).sqrt().to_string(), "0+2i");
    assert_eq!(int(2).expt(&int(10)).unwrap().to_string(), "1024");
    assert_eq!(int(2).expt(&int(-1)).unwrap().to_string(), "0.5");
}

#[test]
fn test_round_ties_to_even() {
    assert_eq!(Number::Real(ratio(5, 2).real_part().round()).to_string(), "2");
    assert_eq!(Number::Real(Real::Float(3.5).round()).to_string(), "#i4.0");
}

#[test]
fn test_integer_division_signs() {
    let (a, b) = (Real::integer(-7), Real::integer(2));
    assert_eq!(Number::Real(a.quotient(&b).unwrap()).to_string(), "-3");
    assert_eq!(Number::Real(a.remainder(&b).unwrap()).to_string(), "-1");
    assert_eq!(Number::Real(a.modulo(&b).unwrap()).to_string(), "1");
    assert_eq!(a.modulo(&Real::integer(0)).unwrap_err(),
        ArithmeticError::DivideByZero);
    assert_eq!(Number::Real(Real::Float(7.0).quotient(&b).unwrap()).to_string(),
        "#i3.0");
}

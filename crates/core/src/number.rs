//! The numeric tower
//!
//! Three types with one-way promotion: Integer ⊂ Rational ⊂ Real. Integers
//! and rationals are exact, reals are inexact. Binary operations promote both
//! operands to the most specific common type and compute there. Integer
//! division is the one deliberate exception: it produces an exact rational
//! rather than promoting to an inexact real.
//!
//! Rationals are kept in lowest terms with a positive denominator (the
//! `num-rational` reduction invariant) and a rational that reduces to a whole
//! number is demoted to an integer, so a `Rational` never has denominator 1.

use std::cmp::Ordering;
use std::fmt;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign, ToBigInt};
use num_integer::Integer as _;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Result, SchemeError};

/// Scale used when an operation (currently only `sqrt`) has no exact decimal
/// result and must round.
const INEXACT_SCALE: i64 = 50;

#[derive(Debug, Clone)]
pub enum Number {
    /// Arbitrary-precision exact integer.
    Integer(BigInt),
    /// Exact ratio in lowest terms, denominator > 1.
    Rational(BigRational),
    /// Arbitrary-precision inexact decimal.
    Real(BigDecimal),
}

/// Both operands converted to their most specific common type.
enum Promoted {
    Integers(BigInt, BigInt),
    Rationals(BigRational, BigRational),
    Reals(BigDecimal, BigDecimal),
}

fn rational_to_real(r: &BigRational) -> BigDecimal {
    BigDecimal::from(r.numer().clone()) / BigDecimal::from(r.denom().clone())
}

fn promote(a: &Number, b: &Number) -> Promoted {
    use Number::*;
    match (a, b) {
        (Integer(x), Integer(y)) => Promoted::Integers(x.clone(), y.clone()),
        (Integer(x), Rational(y)) => {
            Promoted::Rationals(BigRational::from_integer(x.clone()), y.clone())
        }
        (Rational(x), Integer(y)) => {
            Promoted::Rationals(x.clone(), BigRational::from_integer(y.clone()))
        }
        (Rational(x), Rational(y)) => Promoted::Rationals(x.clone(), y.clone()),
        (Real(x), Real(y)) => Promoted::Reals(x.clone(), y.clone()),
        (Real(x), Integer(y)) => Promoted::Reals(x.clone(), BigDecimal::from(y.clone())),
        (Integer(x), Real(y)) => Promoted::Reals(BigDecimal::from(x.clone()), y.clone()),
        (Real(x), Rational(y)) => Promoted::Reals(x.clone(), rational_to_real(y)),
        (Rational(x), Real(y)) => Promoted::Reals(rational_to_real(x), y.clone()),
    }
}

/// Demote a rational with denominator 1 back to an integer.
fn from_ratio(r: BigRational) -> Number {
    if r.is_integer() {
        Number::Integer(r.to_integer())
    } else {
        Number::Rational(r)
    }
}

impl Number {
    pub fn from_i64(n: i64) -> Number {
        Number::Integer(BigInt::from(n))
    }

    pub fn integer(n: BigInt) -> Number {
        Number::Integer(n)
    }

    /// Exact `numer/denom`, reduced. Fails on a zero denominator.
    pub fn rational(numer: BigInt, denom: BigInt) -> Result<Number> {
        if denom.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(from_ratio(BigRational::new(numer, denom)))
    }

    pub fn real(d: BigDecimal) -> Number {
        Number::Real(d)
    }

    /// Exactness is a property of the representation: integers and rationals
    /// are exact, reals are inexact.
    pub fn is_exact(&self) -> bool {
        !matches!(self, Number::Real(_))
    }

    /// Mathematical test: does this number denote a whole value?
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Rational(_) => false,
            Number::Real(d) => d.is_integer(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(n) => n.is_zero(),
            Number::Rational(r) => r.is_zero(),
            Number::Real(d) => d.is_zero(),
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Integer(n) => n.sign() == Sign::Plus,
            Number::Rational(r) => r.is_positive(),
            Number::Real(d) => !d.is_zero() && d.sign() == Sign::Plus,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Integer(n) => n.sign() == Sign::Minus,
            Number::Rational(r) => r.is_negative(),
            Number::Real(d) => d.sign() == Sign::Minus,
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match promote(self, other) {
            Promoted::Integers(a, b) => Number::Integer(a + b),
            Promoted::Rationals(a, b) => from_ratio(a + b),
            Promoted::Reals(a, b) => Number::Real(a + b),
        }
    }

    pub fn sub(&self, other: &Number) -> Number {
        match promote(self, other) {
            Promoted::Integers(a, b) => Number::Integer(a - b),
            Promoted::Rationals(a, b) => from_ratio(a - b),
            Promoted::Reals(a, b) => Number::Real(a - b),
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match promote(self, other) {
            Promoted::Integers(a, b) => Number::Integer(a * b),
            Promoted::Rationals(a, b) => from_ratio(a * b),
            Promoted::Reals(a, b) => Number::Real(a * b),
        }
    }

    /// Division. Integer ÷ integer stays exact by producing a rational.
    pub fn div(&self, other: &Number) -> Result<Number> {
        if other.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(match promote(self, other) {
            Promoted::Integers(a, b) => from_ratio(BigRational::new(a, b)),
            Promoted::Rationals(a, b) => from_ratio(a / b),
            Promoted::Reals(a, b) => Number::Real(a / b),
        })
    }

    pub fn negate(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(-n),
            Number::Rational(r) => Number::Rational(-r),
            Number::Real(d) => Number::Real(-d),
        }
    }

    pub fn reciprocal(&self) -> Result<Number> {
        if self.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(match self {
            Number::Integer(n) => from_ratio(BigRational::new(BigInt::one(), n.clone())),
            Number::Rational(r) => from_ratio(r.recip()),
            Number::Real(d) => Number::Real(BigDecimal::one() / d),
        })
    }

    /// Ordering in the promoted domain.
    pub fn compare(&self, other: &Number) -> Ordering {
        match promote(self, other) {
            Promoted::Integers(a, b) => a.cmp(&b),
            Promoted::Rationals(a, b) => a.cmp(&b),
            Promoted::Reals(a, b) => a.cmp(&b),
        }
    }

    fn integral_pair(&self, other: &Number, op: &'static str) -> Result<(BigInt, BigInt)> {
        match (self.to_exact_integer(), other.to_exact_integer()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(SchemeError::eval(format!("{op}: arguments must be integers"))),
        }
    }

    /// Truncating division on integers.
    pub fn quotient(&self, other: &Number) -> Result<Number> {
        let (a, b) = self.integral_pair(other, "quotient")?;
        if b.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(Number::Integer(a / b))
    }

    /// Remainder after truncating division; sign follows the dividend.
    pub fn remainder(&self, other: &Number) -> Result<Number> {
        let (a, b) = self.integral_pair(other, "remainder")?;
        if b.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(Number::Integer(a % b))
    }

    /// Flooring modulus; sign follows the divisor.
    pub fn modulo(&self, other: &Number) -> Result<Number> {
        let (a, b) = self.integral_pair(other, "modulo")?;
        if b.is_zero() {
            return Err(SchemeError::DivisionByZero);
        }
        Ok(Number::Integer(a.mod_floor(&b)))
    }

    pub fn gcd(&self, other: &Number) -> Result<Number> {
        let (a, b) = self.integral_pair(other, "gcd")?;
        Ok(Number::Integer(a.gcd(&b)))
    }

    pub fn lcm(&self, other: &Number) -> Result<Number> {
        let (a, b) = self.integral_pair(other, "lcm")?;
        Ok(Number::Integer(a.lcm(&b)))
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.abs()),
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Real(d) => Number::Real(d.abs()),
        }
    }

    /// Square root, always inexact, rounded to [`INEXACT_SCALE`] digits.
    pub fn sqrt(&self) -> Result<Number> {
        if self.is_negative() {
            return Err(SchemeError::eval("sqrt: negative argument"));
        }
        let d = match self {
            Number::Integer(n) => BigDecimal::from(n.clone()),
            Number::Rational(r) => rational_to_real(r),
            Number::Real(d) => d.clone(),
        };
        let root = d
            .sqrt()
            .ok_or_else(|| SchemeError::eval("sqrt: negative argument"))?;
        Ok(Number::Real(
            root.with_scale_round(INEXACT_SCALE, RoundingMode::HalfEven)
                .normalized(),
        ))
    }

    /// Largest integral value not greater than this number.
    pub fn floor(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.clone()),
            Number::Rational(r) => Number::Integer(r.floor().to_integer()),
            Number::Real(d) => Number::Real(d.with_scale_round(0, RoundingMode::Floor)),
        }
    }

    /// Smallest integral value not less than this number.
    pub fn ceiling(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.clone()),
            Number::Rational(r) => Number::Integer(r.ceil().to_integer()),
            Number::Real(d) => Number::Real(d.with_scale_round(0, RoundingMode::Ceiling)),
        }
    }

    /// Integral value closest to zero.
    pub fn truncate(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.clone()),
            Number::Rational(r) => Number::Integer(r.trunc().to_integer()),
            Number::Real(d) => Number::Real(d.with_scale_round(0, RoundingMode::Down)),
        }
    }

    /// Closest integral value, ties to even.
    pub fn round(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.clone()),
            Number::Rational(r) => {
                let floor = r.floor().to_integer();
                let frac = r - BigRational::from_integer(floor.clone());
                let half = BigRational::new(BigInt::one(), BigInt::from(2));
                let rounded = match frac.cmp(&half) {
                    Ordering::Less => floor,
                    Ordering::Greater => floor + BigInt::one(),
                    Ordering::Equal if floor.is_even() => floor,
                    Ordering::Equal => floor + BigInt::one(),
                };
                Number::Integer(rounded)
            }
            Number::Real(d) => Number::Real(d.with_scale_round(0, RoundingMode::HalfEven)),
        }
    }

    /// Raise to an integer power. Exact bases stay exact; a negative
    /// exponent takes the reciprocal. Non-integer exponents are rejected.
    pub fn expt(&self, exponent: &Number) -> Result<Number> {
        let Some(e) = exponent.to_exact_integer() else {
            return Err(SchemeError::eval("expt: exponent must be an integer"));
        };
        let (negative, magnitude) = match e.to_u32() {
            Some(m) => (false, m),
            None => match (-&e).to_u32() {
                Some(m) => (true, m),
                None => return Err(SchemeError::eval("expt: exponent out of range")),
            },
        };
        let raised = match self {
            Number::Integer(n) => Number::Integer(n.pow(magnitude)),
            Number::Rational(r) => from_ratio(r.pow(magnitude as i32)),
            Number::Real(d) => {
                let mut acc = BigDecimal::one();
                for _ in 0..magnitude {
                    acc = acc * d;
                }
                Number::Real(acc)
            }
        };
        if negative { raised.reciprocal() } else { Ok(raised) }
    }

    /// The same value, inexactly.
    pub fn to_inexact(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Real(BigDecimal::from(n.clone())),
            Number::Rational(r) => Number::Real(rational_to_real(r)),
            Number::Real(d) => Number::Real(d.clone()),
        }
    }

    /// The same value, exactly. Every real here is a finite decimal, so the
    /// conversion is a rational with a power-of-ten denominator.
    pub fn to_exact(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.clone()),
            Number::Rational(r) => Number::Rational(r.clone()),
            Number::Real(d) => {
                let (digits, scale) = d.normalized().into_bigint_and_exponent();
                if scale <= 0 {
                    let shift = BigInt::from(10u32).pow((-scale) as u32);
                    Number::Integer(digits * shift)
                } else {
                    let denom = BigInt::from(10u32).pow(scale as u32);
                    from_ratio(BigRational::new(digits, denom))
                }
            }
        }
    }

    pub fn numerator(&self) -> Result<Number> {
        match self {
            Number::Integer(n) => Ok(Number::Integer(n.clone())),
            Number::Rational(r) => Ok(Number::Integer(r.numer().clone())),
            Number::Real(_) => Err(SchemeError::eval("numerator: not an exact number")),
        }
    }

    pub fn denominator(&self) -> Result<Number> {
        match self {
            Number::Integer(_) => Ok(Number::Integer(BigInt::one())),
            Number::Rational(r) => Ok(Number::Integer(r.denom().clone())),
            Number::Real(_) => Err(SchemeError::eval("denominator: not an exact number")),
        }
    }

    pub fn is_even(&self) -> Result<bool> {
        match self.to_exact_integer() {
            Some(n) => Ok(n.is_even()),
            None => Err(SchemeError::eval("even?: not an integer")),
        }
    }

    pub fn is_odd(&self) -> Result<bool> {
        match self.to_exact_integer() {
            Some(n) => Ok(n.is_odd()),
            None => Err(SchemeError::eval("odd?: not an integer")),
        }
    }

    /// The integer this number denotes, when it denotes one. A rational
    /// converts only with denominator 1 (which the demotion invariant makes
    /// impossible here), a real only when it is an exact whole value.
    pub fn to_exact_integer(&self) -> Option<BigInt> {
        match self {
            Number::Integer(n) => Some(n.clone()),
            Number::Rational(r) => r.is_integer().then(|| r.to_integer()),
            Number::Real(d) => d.is_integer().then(|| d.to_bigint()).flatten(),
        }
    }

    /// Host-sized integer, only when the magnitude fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_exact_integer().and_then(|n| n.to_i64())
    }

    /// Parse decimal source text: an integer if there is no fractional part
    /// or exponent, otherwise an inexact real. Base 10 only.
    pub fn parse(text: &str) -> Option<Number> {
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return text.parse::<BigInt>().ok().map(Number::Integer);
        }
        // Reject forms BigDecimal accepts but the lexical grammar does not,
        // such as a bare "." or hex strings.
        if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        text.parse::<BigDecimal>().ok().map(Number::Real)
    }
}

impl PartialEq for Number {
    /// Numeric equality across the tower (exactness not considered; `eqv?`
    /// layers that on top).
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Rational(r) => write!(f, "{}", r),
            Number::Real(d) => {
                let n = d.clone().normalized();
                if n.is_integer() {
                    write!(f, "{}.0", n.with_scale(0))
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

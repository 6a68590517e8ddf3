//! Exact numbers, extended with the special values needed by limits and canonicalization.
//!
//! A [`Number`] is either an arbitrary-precision [`Rational`] or one of four special values:
//! positive infinity (`oo`), negative infinity (`-oo`), complex infinity (`zoo`, the result of
//! dividing a nonzero number by zero), and `nan` (an indeterminate value).
//!
//! The arithmetic on special values follows the extended reals:
//!
//! - `oo + (-oo) = nan`, `zoo + zoo = nan`
//! - `0 * oo = nan`, `0 * zoo = nan`
//! - `1 / 0 = zoo`, `1 / oo = 0`
//! - `nan` absorbs everything.

use crate::primitive::{int, rational};
use rug::{ops::Pow, Integer, Rational};
use std::{cmp::Ordering, fmt, ops::{Add, Mul, Neg}};

/// An exact number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Number {
    /// An exact rational number, such as `2` or `-3/4`.
    Rational(Rational),

    /// Positive infinity.
    Infinity,

    /// Negative infinity.
    NegativeInfinity,

    /// Complex (unsigned) infinity.
    ComplexInfinity,

    /// An indeterminate value.
    NaN,
}

impl Number {
    /// Creates an integer [`Number`].
    pub fn int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Rational(Rational::from(int(n)))
    }

    /// Creates the rational number `numer / denom`. A zero denominator yields `zoo`, or `nan` if
    /// the numerator is also zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        match (numer, denom) {
            (0, 0) => Self::NaN,
            (_, 0) => Self::ComplexInfinity,
            _ => Self::Rational(rational(numer, denom)),
        }
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    pub fn one() -> Self {
        Self::int(1)
    }

    /// If the number is rational, returns a reference to it.
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Self::Rational(r) => Some(r),
            _ => None,
        }
    }

    /// If the number is an integer, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Rational(r) if r.is_integer() => Some(r.numer()),
            _ => None,
        }
    }

    /// If the number is an integer that fits in an [`i32`], returns it.
    pub fn to_i32(&self) -> Option<i32> {
        self.as_integer().and_then(Integer::to_i32)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Rational(r) if r.cmp0() == Ordering::Equal)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::Rational(r) if *r == 1)
    }

    pub fn is_neg_one(&self) -> bool {
        matches!(self, Self::Rational(r) if *r == -1)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Rational(r) if r.is_integer())
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Rational(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::NaN)
    }

    /// Returns true for any of the three infinities.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinity | Self::NegativeInfinity | Self::ComplexInfinity)
    }

    /// Returns the sign of the number, or [`None`] for `zoo` and `nan`.
    pub fn sign(&self) -> Option<Ordering> {
        match self {
            Self::Rational(r) => Some(r.cmp0()),
            Self::Infinity => Some(Ordering::Greater),
            Self::NegativeInfinity => Some(Ordering::Less),
            Self::ComplexInfinity | Self::NaN => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.sign() == Some(Ordering::Greater)
    }

    pub fn is_negative(&self) -> bool {
        self.sign() == Some(Ordering::Less)
    }

    /// Returns `1 / self`.
    pub fn recip(&self) -> Self {
        match self {
            Self::Rational(r) if r.cmp0() == Ordering::Equal => Self::ComplexInfinity,
            Self::Rational(r) => Self::Rational(r.clone().recip()),
            Self::Infinity | Self::NegativeInfinity | Self::ComplexInfinity => Self::zero(),
            Self::NaN => Self::NaN,
        }
    }

    /// Raises the number to an integer power.
    pub fn powi(&self, exp: i32) -> Self {
        if exp == 0 {
            return Self::one();
        }
        match self {
            Self::Rational(r) if r.cmp0() == Ordering::Equal => {
                if exp < 0 {
                    Self::ComplexInfinity
                } else {
                    Self::zero()
                }
            },
            Self::Rational(r) => Self::Rational(r.clone().pow(exp)),
            Self::Infinity if exp > 0 => Self::Infinity,
            Self::NegativeInfinity if exp > 0 => {
                if exp % 2 == 0 {
                    Self::Infinity
                } else {
                    Self::NegativeInfinity
                }
            },
            Self::ComplexInfinity if exp > 0 => Self::ComplexInfinity,
            Self::Infinity | Self::NegativeInfinity | Self::ComplexInfinity => Self::zero(),
            Self::NaN => Self::NaN,
        }
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Self {
        Self::Rational(r)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Rational(Rational::from(n))
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::int(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) => write!(f, "{}", r),
            Self::Infinity => write!(f, "oo"),
            Self::NegativeInfinity => write!(f, "-oo"),
            Self::ComplexInfinity => write!(f, "zoo"),
            Self::NaN => write!(f, "nan"),
        }
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Number {
        match (self, rhs) {
            (Number::NaN, _) | (_, Number::NaN) => Number::NaN,
            (Number::Rational(lhs), Number::Rational(rhs)) => {
                Number::Rational(Rational::from(lhs + rhs))
            },
            (Number::Infinity, Number::NegativeInfinity)
                | (Number::NegativeInfinity, Number::Infinity) => Number::NaN,
            (Number::ComplexInfinity, Number::Rational(_))
                | (Number::Rational(_), Number::ComplexInfinity) => Number::ComplexInfinity,
            (Number::ComplexInfinity, _) | (_, Number::ComplexInfinity) => Number::NaN,
            (Number::Infinity, _) | (_, Number::Infinity) => Number::Infinity,
            _ => Number::NegativeInfinity,
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Number {
        &self + &rhs
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Number {
        match (self, rhs) {
            (Number::NaN, _) | (_, Number::NaN) => Number::NaN,
            (Number::Rational(lhs), Number::Rational(rhs)) => {
                Number::Rational(Rational::from(lhs * rhs))
            },
            (lhs, rhs) if lhs.is_zero() || rhs.is_zero() => Number::NaN,
            (Number::ComplexInfinity, _) | (_, Number::ComplexInfinity) => Number::ComplexInfinity,
            (lhs, rhs) => if lhs.sign() == rhs.sign() {
                Number::Infinity
            } else {
                Number::NegativeInfinity
            },
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Number {
        &self * &rhs
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(Rational::from(-r)),
            Number::Infinity => Number::NegativeInfinity,
            Number::NegativeInfinity => Number::Infinity,
            other => other.clone(),
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn rational_arithmetic() {
        let half = Number::rational(1, 2);
        let third = Number::rational(1, 3);
        assert_eq!(&half + &third, Number::rational(5, 6));
        assert_eq!(&half * &third, Number::rational(1, 6));
        assert_eq!(-&half, Number::rational(-1, 2));
        assert_eq!(half.recip(), Number::int(2));
        assert_eq!(Number::rational(-2, 3).powi(-3), Number::rational(-27, 8));
    }

    #[test]
    fn special_values() {
        let (oo, noo, zoo, nan) = (
            Number::Infinity,
            Number::NegativeInfinity,
            Number::ComplexInfinity,
            Number::NaN,
        );
        assert_eq!(&oo + &noo, nan);
        assert_eq!(&oo + &Number::int(5), oo);
        assert_eq!(&zoo + &zoo, nan);
        assert_eq!(&zoo + &Number::int(5), zoo);
        assert_eq!(&Number::zero() * &oo, nan);
        assert_eq!(&Number::int(-2) * &oo, noo);
        assert_eq!(&noo * &noo, oo);
        assert_eq!(Number::zero().recip(), zoo);
        assert_eq!(Number::zero().powi(-1), zoo);
        assert_eq!(oo.recip(), Number::zero());
        assert_eq!(&nan + &Number::one(), nan);
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Number::rational(3, 0), Number::ComplexInfinity);
        assert_eq!(Number::rational(0, 0), Number::NaN);
    }
}

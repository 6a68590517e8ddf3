//! The canonical power builder.
//!
//! [`pow`] applies the following rules:
//!
//! - `a^0 = 1`, `a^1 = a`, `1^a = 1`
//! - Numeric powers are evaluated exactly: `2^3 = 8`, `(2/3)^-2 = 9/4`, `0^-1 = zoo`
//! - Rational roots of rationals extract perfect powers: `sqrt(8) = 2*sqrt(2)`,
//!   `4^(1/2) = 2`, `(1/2)^(1/2) = sqrt(2)/2`
//! - Odd roots of negative rationals are real: `(-8)^(1/3) = -2`
//! - Integer powers distribute: `(a^b)^n = a^(b*n)`, `(a*b)^n = a^n * b^n`
//! - `exp(u)^c = exp(c*u)` for numeric `c`

use crate::{
    expr::{Expr, Primary},
    number::Number,
    primitive::extract_root,
};
use rug::{ops::Pow, Integer, Rational};
use std::sync::Arc;

/// Builds the power node without any simplification.
fn raw(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(Arc::new(base), Arc::new(exp))
}

/// Computes `r^(p/q)` for a positive rational `r` and a non-integer rational exponent, extracting
/// as much of the root as possible.
fn positive_rational_root(r: &Rational, exp: &Rational) -> Option<Expr> {
    let q = exp.denom().to_u32()?;
    let p = exp.numer().to_i64()?;

    // r^(p/q) = r^k * r^(s/q), with 0 < s < q
    let k = p.div_euclid(q as i64);
    let s = p.rem_euclid(q as i64) as u32;
    let k = i32::try_from(k).ok()?;

    // r^(s/q) = (n^s * d^(q - s))^(1/q) / d
    let (n, d) = (r.numer(), r.denom());
    let radicand = Integer::from(n.pow(s)) * Integer::from(d.pow(q - s));
    let (outside, inside) = extract_root(&radicand, q);

    let mut coeff = Rational::from((outside, d.clone()));
    coeff *= r.clone().pow(k);

    if inside == 1 {
        return Some(Expr::number(Number::from(coeff)));
    }
    let root = raw(Expr::number(Number::from(inside)), Expr::rational(1, q as i64));
    if coeff == 1 {
        Some(root)
    } else {
        Some(Expr::product(vec![Expr::number(Number::from(coeff)), root]))
    }
}

/// Evaluates `base^exp` for numeric base and exponent, if the result can be expressed exactly.
fn numeric_power(base: &Number, exp: &Number) -> Option<Expr> {
    if let Some(n) = exp.to_i32() {
        return Some(Expr::number(base.powi(n)));
    }

    match (base, exp) {
        (Number::Rational(b), Number::Rational(e)) => match b.cmp0() {
            std::cmp::Ordering::Equal => Some(if e.cmp0().is_gt() {
                Expr::zero()
            } else {
                Expr::complex_infinity()
            }),
            std::cmp::Ordering::Greater => positive_rational_root(b, e),
            std::cmp::Ordering::Less => {
                // only odd roots of negative numbers are real
                if e.denom().is_even() {
                    return None;
                }
                let magnitude = positive_rational_root(&Rational::from(-b), e)?;
                if e.numer().is_odd() {
                    Some(Expr::product(vec![Expr::neg_one(), magnitude]))
                } else {
                    Some(magnitude)
                }
            },
        },
        (Number::Infinity, Number::Rational(e)) => Some(if e.cmp0().is_gt() {
            Expr::infinity()
        } else {
            Expr::zero()
        }),
        _ => None,
    }
}

/// Builds the canonical power `base^exp`.
pub fn pow(base: Expr, exp: Expr) -> Expr {
    if let Some(e) = exp.as_number() {
        if e.is_zero() {
            return Expr::one();
        }
        if e.is_one() {
            return base;
        }
        if e.is_nan() {
            return Expr::nan();
        }
    }

    if let Some(b) = base.as_number() {
        if b.is_nan() {
            return Expr::nan();
        }
        if b.is_one() {
            return match exp.as_number() {
                Some(e) if e.is_infinite() => Expr::nan(),
                _ => Expr::one(),
            };
        }
        if let Some(e) = exp.as_number() {
            if let Some(value) = numeric_power(b, e) {
                return value;
            }
        }
    }

    let integer_exp = exp.as_number().is_some_and(Number::is_integer);
    match &base {
        // (a^b)^n = a^(b*n)
        Expr::Pow(inner_base, inner_exp) if integer_exp => {
            return pow((**inner_base).clone(), Expr::product(vec![(**inner_exp).clone(), exp]));
        },

        // (a*b)^n = a^n * b^n
        Expr::Mul(factors) if integer_exp && base.is_commutative() => {
            return Expr::product(factors.iter()
                .map(|factor| pow(factor.clone(), exp.clone()))
                .collect());
        },

        // exp(u)^c = exp(c*u)
        Expr::Primary(Primary::Call(..)) if exp.as_number().is_some_and(Number::is_finite) => {
            if let Some(arg) = base.as_exp() {
                return Expr::exp(Expr::product(vec![exp, arg.clone()]));
            }
        },
        _ => {},
    }

    raw(base, exp)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn trivial_exponents() {
        assert_eq!(pow(x(), Expr::zero()), Expr::one());
        assert_eq!(pow(x(), Expr::one()), x());
        assert_eq!(pow(Expr::one(), x()), Expr::one());
    }

    #[test]
    fn numeric_powers() {
        assert_eq!(pow(Expr::int(2), Expr::int(3)), Expr::int(8));
        assert_eq!(pow(Expr::rational(2, 3), Expr::int(-2)), Expr::rational(9, 4));
        assert_eq!(pow(Expr::zero(), Expr::neg_one()), Expr::complex_infinity());
    }

    #[test]
    fn rational_roots() {
        assert_eq!(pow(Expr::int(4), Expr::rational(1, 2)), Expr::int(2));
        assert_eq!(pow(Expr::int(9), Expr::rational(3, 2)), Expr::int(27));
        assert_eq!(pow(Expr::int(-8), Expr::rational(1, 3)), Expr::int(-2));

        // sqrt(8) = 2*sqrt(2)
        let sqrt2 = raw(Expr::int(2), Expr::rational(1, 2));
        assert_eq!(
            pow(Expr::int(8), Expr::rational(1, 2)),
            Expr::Mul(vec![Expr::int(2), sqrt2.clone()].into()),
        );

        // sqrt(1/2) = sqrt(2)/2
        assert_eq!(
            pow(Expr::rational(1, 2), Expr::rational(1, 2)),
            Expr::Mul(vec![Expr::rational(1, 2), sqrt2.clone()].into()),
        );

        // sqrt(2) is already canonical
        assert_eq!(pow(Expr::int(2), Expr::rational(1, 2)), sqrt2);

        // sqrt(-2) is left alone
        assert_eq!(
            pow(Expr::int(-2), Expr::rational(1, 2)),
            raw(Expr::int(-2), Expr::rational(1, 2)),
        );
    }

    #[test]
    fn integer_powers_distribute() {
        // (x^(1/2))^2 = x
        assert_eq!(pow(x().sqrt(), Expr::int(2)), x());

        // (2x)^2 = 4x^2
        let e = pow(Expr::int(2) * x(), Expr::int(2));
        assert_eq!(e, Expr::int(4) * pow(x(), Expr::int(2)));

        // exp(x)^-1 = exp(-x)
        assert_eq!(pow(Expr::exp(x()), Expr::neg_one()), Expr::exp(-x()));
    }
}

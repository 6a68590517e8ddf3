//! Growth-rate comparison.

use cas_symbolic::Expr;
use crate::limit::{Asymptotics, LimitValue, Unsupported};
use std::fmt;
use tracing::debug;

/// How the growth rates of two expressions compare as the variable tends to `+oo`.
///
/// Two expressions have the same growth rate when the ratio of their logarithms tends to a
/// nonzero finite value, so `x` and `x^2` compare [`Equal`](Comparison::Equal), while `x` is
/// [`Less`](Comparison::Less) than `exp(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
}

impl Comparison {
    /// Swaps the roles of the two expressions.
    pub fn reverse(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::Equal => Self::Equal,
            Self::Greater => Self::Less,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Less => write!(f, "<"),
            Self::Equal => write!(f, "="),
            Self::Greater => write!(f, ">"),
        }
    }
}

impl Asymptotics<'_> {
    /// Compares the growth rates of `f` and `g`, by the limit of `log(f) / log(g)`.
    pub fn compare(&self, f: &Expr, g: &Expr) -> Result<Comparison, Unsupported> {
        let log_f = Expr::log(f.clone());
        let log_g = Expr::log(g.clone());

        let result = if log_g.is_zero() {
            if log_f.is_zero() {
                Comparison::Equal
            } else {
                Comparison::Greater
            }
        } else {
            match self.limit(&(&log_f / &log_g))? {
                LimitValue::Finite(value) if value.is_zero() => Comparison::Less,
                LimitValue::Finite(_) => Comparison::Equal,
                _ => Comparison::Greater,
            }
        };

        debug!(%f, %g, %result, "compared growth rates");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use cas_symbolic::Symbol;
    use pretty_assertions::assert_eq;
    use crate::leading::LeadingTermLimit;
    use super::*;

    fn x() -> Expr {
        Expr::from(Symbol::new("x").positive())
    }

    fn compare(f: Expr, g: Expr) -> Comparison {
        Asymptotics::new(Symbol::new("x").positive(), &LeadingTermLimit)
            .compare(&f, &g)
            .unwrap()
    }

    fn sq(e: Expr) -> Expr {
        Expr::power(e, Expr::int(2))
    }

    #[test]
    fn slower() {
        assert_eq!(compare(Expr::int(2), x()), Comparison::Less);
        assert_eq!(compare(x(), Expr::exp(x())), Comparison::Less);
        assert_eq!(compare(Expr::exp(x()), Expr::exp(sq(x()))), Comparison::Less);
        assert_eq!(compare(Expr::exp(sq(x())), Expr::exp(Expr::exp(x()))), Comparison::Less);
        assert_eq!(compare(Expr::one(), Expr::exp(Expr::exp(x()))), Comparison::Less);
    }

    #[test]
    fn faster() {
        assert_eq!(compare(x(), Expr::int(2)), Comparison::Greater);
        assert_eq!(compare(Expr::exp(x()), x()), Comparison::Greater);
        assert_eq!(compare(Expr::exp(sq(x())), Expr::exp(x())), Comparison::Greater);
        assert_eq!(compare(Expr::exp(Expr::exp(x())), Expr::exp(sq(x()))), Comparison::Greater);
        assert_eq!(compare(Expr::exp(Expr::exp(x())), Expr::one()), Comparison::Greater);
    }

    #[test]
    fn constants_are_comparable() {
        assert_eq!(compare(Expr::int(2), Expr::int(3)), Comparison::Equal);
        assert_eq!(compare(Expr::int(3), Expr::int(-5)), Comparison::Equal);
        assert_eq!(compare(Expr::int(2), Expr::int(-5)), Comparison::Equal);
    }

    #[test]
    fn powers_are_comparable() {
        let m = Expr::symbol("m");
        assert_eq!(compare(x(), sq(x())), Comparison::Equal);
        assert_eq!(compare(sq(x()), Expr::power(x(), Expr::int(3))), Comparison::Equal);
        assert_eq!(compare(Expr::power(x(), Expr::int(3)), x().recip()), Comparison::Equal);
        assert_eq!(compare(x().recip(), Expr::power(x(), m.clone())), Comparison::Equal);
        assert_eq!(compare(Expr::power(x(), m), -x()), Comparison::Equal);
    }

    #[test]
    fn exponentials_are_comparable() {
        let e = Expr::exp(x());
        let shifted = Expr::exp(x() + Expr::exp(-x()));
        assert_eq!(compare(e.clone(), Expr::exp(-x())), Comparison::Equal);
        assert_eq!(compare(Expr::exp(-x()), Expr::exp(Expr::int(2) * x())), Comparison::Equal);
        assert_eq!(compare(Expr::exp(Expr::int(2) * x()), sq(e.clone())), Comparison::Equal);
        assert_eq!(compare(sq(e.clone()), shifted.clone()), Comparison::Equal);
        assert_eq!(compare(e, shifted), Comparison::Equal);

        let e = Expr::exp(sq(x()));
        assert_eq!(compare(e.clone(), e.recip()), Comparison::Equal);
    }

    #[test]
    fn unknown_growth_is_not_equal() {
        let ctx = Asymptotics::new(Symbol::new("x").positive(), &LeadingTermLimit);
        let f = Expr::exp(Expr::sin(x()) * x());
        assert_eq!(ctx.compare(&f, &x()), Err(Unsupported::Oscillating));
    }
}

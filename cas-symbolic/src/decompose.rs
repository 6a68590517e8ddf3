//! Splitting expressions into their parts.
//!
//! These are the views of a canonical sum that the rest of the crate builds on: its numeric
//! constant and remaining terms ([`Expr::as_coeff_factors`]), its first term and the rest
//! ([`Expr::as_two_terms`]), and a single numerator / denominator pair
//! ([`Expr::as_numer_denom`]).

use crate::{
    expr::{Expr, Primary, Symbol},
    memo::Memo,
    order::order_contains,
};
use once_cell::sync::Lazy;

static COEFF_FACTORS: Lazy<Memo<Expr, (Expr, Vec<Expr>)>> = Lazy::new(Memo::new);
static LEADING_ORDER: Lazy<Memo<(Expr, Vec<Symbol>), Vec<(Expr, Expr)>>> = Lazy::new(Memo::new);

/// Returns the terms of the expression, treating a non-sum as a sum of one term.
fn terms_of(expr: &Expr) -> Vec<Expr> {
    expr.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![expr.clone()])
}

impl Expr {
    /// Splits the expression into its numeric constant and the remaining terms.
    ///
    /// `3 + x + y` becomes `(3, [x, y])`, `x + y` becomes `(0, [x, y])`, a non-sum `x` becomes
    /// `(0, [x])`, and a number `5` becomes `(5, [])`.
    pub fn as_coeff_factors(&self) -> (Expr, Vec<Expr>) {
        match self {
            Self::Primary(Primary::Number(_)) => (self.clone(), Vec::new()),
            Self::Add(terms) => COEFF_FACTORS.get_or_insert_with(self.clone(), || {
                match terms.split_first() {
                    Some((first, rest)) if first.is_number() => (first.clone(), rest.to_vec()),
                    _ => (Expr::zero(), terms.to_vec()),
                }
            }),
            _ => (Expr::zero(), vec![self.clone()]),
        }
    }

    /// Partitions the terms of the expression into those that do not depend on `x`, which are
    /// summed, and those that do.
    ///
    /// `1 + y + x + x*y` becomes `(1 + y, [x, x*y])`.
    pub fn as_coeff_factors_in(&self, x: &Symbol) -> (Expr, Vec<Expr>) {
        let (dependent, independent): (Vec<Expr>, Vec<Expr>) = terms_of(self)
            .into_iter()
            .partition(|term| term.has_symbol(x));
        (Expr::sum(independent), dependent)
    }

    /// Splits a sum into its first term and the sum of the remaining terms. Anything that is not
    /// a sum of at least two terms becomes `(0, self)`.
    pub fn as_two_terms(&self) -> (Expr, Expr) {
        match self.terms() {
            Some([first, rest @ ..]) if !rest.is_empty() => {
                (first.clone(), Expr::sum(rest.to_vec()))
            },
            _ => (Expr::zero(), self.clone()),
        }
    }

    /// Factors `-1` out of a sum whose numeric constant is negative.
    ///
    /// `-2 + 2a` becomes `(-1, [2 - 2a])`, and anything else becomes `(1, [self])`.
    pub fn as_coeff_terms(&self) -> (Expr, Vec<Expr>) {
        match self.terms().and_then(|terms| terms.first()).and_then(Expr::as_number) {
            Some(n) if n.is_negative() => (Expr::neg_one(), vec![-self]),
            _ => (Expr::one(), vec![self.clone()]),
        }
    }

    /// Writes the expression as a single fraction, returning its numerator and denominator.
    ///
    /// - `p/q` becomes `(p, q)`.
    /// - A product becomes the product of the numerators over the product of the denominators.
    /// - `b^e` with a negative numeric exponent swaps the parts of `b`, so `x^-2` becomes
    ///   `(1, x^2)`. With a positive numeric exponent, both parts are raised.
    /// - A sum `n1/d1 + n2/d2 + ...` becomes `(n1*d2*... + d1*n2*... + ..., d1*d2*...)`.
    /// - Anything else is `(self, 1)`.
    pub fn as_numer_denom(&self) -> (Expr, Expr) {
        match self {
            Self::Primary(Primary::Number(n)) => match n.as_rational() {
                Some(r) => (
                    Expr::number(r.numer().clone().into()),
                    Expr::number(r.denom().clone().into()),
                ),
                None => (self.clone(), Expr::one()),
            },
            Self::Mul(factors) => {
                let (numers, denoms): (Vec<Expr>, Vec<Expr>) = factors.iter()
                    .map(Expr::as_numer_denom)
                    .unzip();
                (Expr::product(numers), Expr::product(denoms))
            },
            Self::Pow(base, exp) => match exp.as_number() {
                Some(e) if e.is_finite() && !e.is_zero() => {
                    let (n, d) = base.as_numer_denom();
                    if e.is_negative() {
                        let e = Expr::number(-e);
                        (Expr::power(d, e.clone()), Expr::power(n, e))
                    } else {
                        (Expr::power(n, (**exp).clone()), Expr::power(d, (**exp).clone()))
                    }
                },
                _ => (self.clone(), Expr::one()),
            },
            Self::Add(terms) => {
                let (numers, denoms): (Vec<Expr>, Vec<Expr>) = terms.iter()
                    .map(Expr::as_numer_denom)
                    .unzip();
                let numer = (0..numers.len())
                    .map(|i| {
                        let mut factors = denoms.clone();
                        factors[i] = numers[i].clone();
                        Expr::product(factors)
                    })
                    .collect();
                (Expr::sum(numer), Expr::product(denoms))
            },
            Self::Primary(_) | Self::Order(..) => (self.clone(), Expr::one()),
        }
    }

    /// Returns the terms of the expression that are not contained in the order term of another
    /// term, each paired with its own order term `O(term)` as `symbols` tend to zero.
    ///
    /// `x + x^2 + 5x^3` becomes `[(x, O(x))]`, and `x + y` in `x, y` keeps both terms. Among terms
    /// with equal order, the first one in canonical order is kept.
    pub fn extract_leading_order(&self, symbols: &[Symbol]) -> Vec<(Expr, Expr)> {
        let key = (self.clone(), symbols.to_vec());
        LEADING_ORDER.get_or_insert_with(key, || {
            let mut kept: Vec<(Expr, Expr)> = Vec::new();
            for term in terms_of(self) {
                let order = Expr::order(term.clone(), symbols.to_vec());
                if kept.iter().any(|(_, o)| order_contains(o, &order)) {
                    continue;
                }
                kept.retain(|(_, o)| !order_contains(&order, o));
                kept.insert(0, (term, order));
            }
            kept
        })
    }

    /// Returns true if the expression is a polynomial in the given symbols: built from them and
    /// expressions free of them using only sums, products, and nonnegative integer powers.
    pub fn is_polynomial(&self, symbols: &[Symbol]) -> bool {
        if !symbols.iter().any(|sym| self.has_symbol(sym)) {
            return true;
        }
        match self {
            Self::Primary(Primary::Symbol(_)) => true,
            Self::Add(children) | Self::Mul(children) => {
                children.iter().all(|child| child.is_polynomial(symbols))
            },
            Self::Pow(base, exp) => {
                let natural = exp.as_number().is_some_and(|e| e.is_integer() && !e.is_negative());
                natural && base.is_polynomial(symbols)
            },
            Self::Primary(_) | Self::Order(..) => false,
        }
    }

    /// Counts the operations in the expression: one per binary sum or product, power, and
    /// function call.
    pub fn count_ops(&self) -> usize {
        let own = match self {
            Self::Add(children) | Self::Mul(children) => children.len().saturating_sub(1),
            Self::Pow(..) | Self::Primary(Primary::Call(..)) => 1,
            Self::Primary(_) | Self::Order(..) => 0,
        };
        own + self.children().into_iter().map(Expr::count_ops).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn coeff_factors() {
        let e = Expr::int(3) + x() + y();
        let (c, f) = e.as_coeff_factors();
        assert_eq!(c, Expr::int(3));
        assert_eq!(Expr::sum(f), x() + y());

        assert_eq!((x() + y()).as_coeff_factors().0, Expr::zero());
        assert_eq!(x().as_coeff_factors(), (Expr::zero(), vec![x()]));
        assert_eq!(Expr::int(5).as_coeff_factors(), (Expr::int(5), vec![]));
    }

    #[test]
    fn coeff_factors_in() {
        let x_sym = Symbol::new("x");
        let e = Expr::one() + y() + x() + x() * y();
        let (independent, dependent) = e.as_coeff_factors_in(&x_sym);
        assert_eq!(independent, Expr::one() + y());
        assert_eq!(Expr::sum(dependent), x() + x() * y());
    }

    #[test]
    fn two_terms() {
        let (first, rest) = (Expr::int(2) + x() + y()).as_two_terms();
        assert_eq!(first, Expr::int(2));
        assert_eq!(rest, x() + y());
        assert_eq!(x().as_two_terms(), (Expr::zero(), x()));
    }

    #[test]
    fn coeff_terms() {
        let a = Expr::symbol("a");
        let e = Expr::int(-2) + Expr::int(2) * a.clone();
        assert_eq!(e.as_coeff_terms(), (Expr::neg_one(), vec![Expr::int(2) - Expr::int(2) * a]));
        assert_eq!(x().as_coeff_terms(), (Expr::one(), vec![x()]));
    }

    #[test]
    fn numer_denom() {
        // x + 1/x = (x^2 + 1) / x
        let e = x() + x().recip();
        let (n, d) = e.as_numer_denom();
        assert_eq!(n, Expr::power(x(), Expr::int(2)) + Expr::one());
        assert_eq!(d, x());

        // 3/4 = (3, 4)
        assert_eq!(Expr::rational(3, 4).as_numer_denom(), (Expr::int(3), Expr::int(4)));

        // x/y^2 = (x, y^2)
        let e = x() / Expr::power(y(), Expr::int(2));
        assert_eq!(e.as_numer_denom(), (x(), Expr::power(y(), Expr::int(2))));

        // sqrt(x/2) = (sqrt(x), sqrt(2))
        let e = (x() / Expr::int(2)).sqrt();
        assert_eq!(e.as_numer_denom(), (x().sqrt(), Expr::int(2).sqrt()));

        // exp(x) is its own numerator
        assert_eq!(Expr::exp(x()).as_numer_denom(), (Expr::exp(x()), Expr::one()));
    }

    #[test]
    fn leading_order() {
        let x_sym = Symbol::new("x");
        let e = x() + Expr::power(x(), Expr::int(2)) + Expr::int(5) * Expr::power(x(), Expr::int(3));
        let lead = e.extract_leading_order(&[x_sym.clone()]);
        assert_eq!(lead, vec![(x(), Expr::order(x(), vec![x_sym]))]);

        let xy = [Symbol::new("x"), Symbol::new("y")];
        let lead = (x() + y()).extract_leading_order(&xy);
        assert_eq!(lead.len(), 2);
    }

    #[test]
    fn polynomials() {
        let xs = [Symbol::new("x")];
        assert!((Expr::power(x(), Expr::int(3)) + y() * x()).is_polynomial(&xs));
        assert!(!x().sqrt().is_polynomial(&xs));
        assert!(!Expr::exp(x()).is_polynomial(&xs));
        assert!(Expr::exp(y()).is_polynomial(&xs));
    }

    #[test]
    fn ops() {
        // x + y + z*w: two additions and one multiplication
        let e = x() + y() + Expr::symbol("z") * Expr::symbol("w");
        assert_eq!(e.count_ops(), 3);
        assert_eq!(Expr::exp(x()).count_ops(), 1);
    }
}

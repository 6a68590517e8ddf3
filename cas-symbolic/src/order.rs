//! Order terms: `O(expr)` as a set of symbols tends to zero.
//!
//! An order term is normalized into its **bounding set**: the monomials of `expr` with their
//! coefficients stripped, keeping only those not dominated by another. For example,
//! `O(2x + x^2) = O(x)` and `O(5) = O(1)`. A monomial `m` bounds a term `t` when every exponent of
//! `t` is at least the corresponding exponent of `m`, so `O(x)` contains `x`, `3x^2` and `x*y`, but
//! not `1` or `sqrt(x)`.
//!
//! Terms that are not monomials in the order's symbols (such as `exp(x)`) are kept opaque and
//! only bound themselves.

use crate::expr::{Expr, Symbol};
use rug::Rational;
use std::sync::Arc;

/// One element of the bounding set of an order term.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    /// A monomial, as exponents of each of the order's symbols.
    Monomial(Vec<Rational>),

    /// A term that is not a monomial.
    Opaque(Expr),
}

impl Bound {
    /// Returns true if `self` bounds `other`.
    fn bounds(&self, other: &Bound) -> bool {
        match (self, other) {
            (Self::Monomial(a), Self::Monomial(b)) => a.iter().zip(b).all(|(a, b)| b >= a),
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// Computes the exponents of `expr` in each of the symbols, treating every factor that does not
/// depend on them as a coefficient.
fn monomial_exponents(expr: &Expr, symbols: &[Symbol]) -> Option<Vec<Rational>> {
    let zeros = || vec![Rational::new(); symbols.len()];
    if !symbols.iter().any(|sym| expr.has_symbol(sym)) {
        return Some(zeros());
    }

    match expr {
        Expr::Primary(_) => {
            let sym = expr.as_symbol()?;
            let index = symbols.iter().position(|s| s == sym)?;
            let mut exps = zeros();
            exps[index] = Rational::from(1);
            Some(exps)
        },
        Expr::Pow(base, exp) => {
            let e = exp.as_number()?.as_rational()?;
            let mut exps = monomial_exponents(base, symbols)?;
            for x in exps.iter_mut() {
                *x *= e;
            }
            Some(exps)
        },
        Expr::Mul(factors) => {
            let mut exps = zeros();
            for factor in factors.iter() {
                for (acc, e) in exps.iter_mut().zip(monomial_exponents(factor, symbols)?) {
                    *acc += e;
                }
            }
            Some(exps)
        },
        Expr::Add(_) | Expr::Order(..) => None,
    }
}

/// Strips the numeric coefficient of a term: `2*exp(x)` becomes `exp(x)`.
fn strip_coefficient(term: &Expr) -> Expr {
    match term.factors() {
        Some([first, rest @ ..]) if first.is_number() => Expr::product(rest.to_vec()),
        _ => term.clone(),
    }
}

/// Computes the bounding set of an expression: one bound per term, with dominated bounds removed.
fn bounding_set(expr: &Expr, symbols: &[Symbol]) -> Vec<Bound> {
    let terms = expr.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![expr.clone()]);
    let all = terms.iter()
        .map(|term| match monomial_exponents(term, symbols) {
            Some(exps) => Bound::Monomial(exps),
            None => Bound::Opaque(strip_coefficient(term)),
        })
        .collect::<Vec<_>>();

    let mut minimal: Vec<Bound> = Vec::with_capacity(all.len());
    for bound in all {
        if minimal.iter().any(|kept| kept.bounds(&bound)) {
            continue;
        }
        minimal.retain(|kept| !bound.bounds(kept));
        minimal.push(bound);
    }
    minimal
}

/// Rebuilds the normalized expression of a bounding set.
fn bound_expr(bound: &Bound, symbols: &[Symbol]) -> Expr {
    match bound {
        Bound::Monomial(exps) => Expr::product(symbols.iter()
            .zip(exps)
            .map(|(sym, e)| Expr::power(sym.into(), Expr::number(e.clone().into())))
            .collect()),
        Bound::Opaque(expr) => expr.clone(),
    }
}

impl Expr {
    /// Builds the order term `O(expr)` as the given symbols tend to zero. If no symbols are
    /// given, the free symbols of `expr` are used.
    pub fn order(expr: Expr, symbols: Vec<Symbol>) -> Self {
        let symbols = if symbols.is_empty() {
            expr.free_symbols()
        } else {
            symbols
        };

        let expr = match expr {
            Expr::Order(inner, inner_symbols) if *inner_symbols == *symbols => {
                return Expr::Order(inner, inner_symbols);
            },
            Expr::Order(inner, _) => (*inner).clone(),
            expr => expr,
        };
        if expr.is_zero() || expr.is_nan() {
            return expr;
        }

        let normalized = Expr::sum(bounding_set(&expr, &symbols).iter()
            .map(|bound| bound_expr(bound, &symbols))
            .collect());
        Expr::Order(Arc::new(normalized), symbols.into())
    }
}

/// Returns true if the order term `order` contains `other`, which may itself be an order term. An
/// order term contains another when its bounding set bounds every element of the other's.
///
/// Returns false if `order` is not an order term.
pub fn order_contains(order: &Expr, other: &Expr) -> bool {
    let Some((expr, symbols)) = order.as_order() else {
        return false;
    };
    if other.is_zero() {
        return true;
    }

    let other_set = match other.as_order() {
        Some((other_expr, other_symbols)) if other_symbols == symbols => {
            bounding_set(other_expr, symbols)
        },
        Some(_) => return false,
        None => bounding_set(other, symbols),
    };
    let own = bounding_set(expr, symbols);
    other_set.iter().all(|b| own.iter().any(|kept| kept.bounds(b)))
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
    fn normalizes() {
        let o = Expr::order(x(), vec![]);
        let sum = Expr::int(2) * x() + Expr::power(x(), Expr::int(2));
        assert_eq!(Expr::order(sum, vec![]), o);
        assert_eq!(Expr::order(Expr::int(5) * x(), vec![]), o);
        assert_eq!(Expr::order(Expr::zero(), vec![]), Expr::zero());

        // O(5) = O(1)
        let x_sym = Symbol::new("x");
        let one = Expr::order(Expr::int(5), vec![x_sym.clone()]);
        assert_eq!(one, Expr::order(Expr::one(), vec![x_sym]));
    }

    #[test]
    fn containment() {
        let o = Expr::order(x(), vec![]);
        assert!(order_contains(&o, &Expr::power(x(), Expr::int(2))));
        assert!(order_contains(&o, &(Expr::int(3) * x())));
        assert!(!order_contains(&o, &Expr::one()));
        assert!(!order_contains(&o, &x().sqrt()));

        let x_sym = Symbol::new("x");
        let one = Expr::order(Expr::one(), vec![x_sym.clone()]);
        assert!(order_contains(&one, &Expr::int(5)));
        assert!(order_contains(&one, &o));
        assert!(!order_contains(&o, &one));
    }

    #[test]
    fn multivariate() {
        let xy = vec![Symbol::new("x"), Symbol::new("y")];
        let o = Expr::order(x() + y(), xy.clone());
        assert!(order_contains(&o, &(x() * y())));
        assert!(order_contains(&o, &Expr::power(y(), Expr::int(2))));
        assert!(!order_contains(&o, &Expr::one()));

        let oxy = Expr::order(x() * y(), xy);
        assert!(order_contains(&o, &oxy));
        assert!(!order_contains(&oxy, &o));
    }

    #[test]
    fn opaque_terms() {
        let e = Expr::exp(x());
        let o = Expr::order(Expr::int(2) * e.clone(), vec![Symbol::new("x")]);
        assert!(order_contains(&o, &e));
        assert!(!order_contains(&o, &x()));
    }
}

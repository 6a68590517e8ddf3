//! Series expansion hooks.
//!
//! Sums, constants, and order terms are expanded here; every other term is handed to a
//! [`SeriesExpansion`] implementation, so a series subsystem can plug in its own expansions of
//! products and functions. [`Taylor`] is a simple implementation based on [`Expr::diff`].

use crate::{
    derivative::DerivativeError,
    expr::{Expr, Symbol},
    number::Number,
};
use rug::{Integer, Rational};

/// Expands single terms into series about `x = 0`.
pub trait SeriesExpansion {
    /// Expands `term`, which is not a sum and depends on `x`, up to but not including `x^n`,
    /// adding the order term `O(x^n)`.
    fn expand_term(&self, term: &Expr, x: &Symbol, n: u32) -> Result<Expr, DerivativeError>;
}

/// Expands terms with their Taylor series, `sum(f^(k)(0) / k! * x^k)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Taylor;

impl SeriesExpansion for Taylor {
    fn expand_term(&self, term: &Expr, x: &Symbol, n: u32) -> Result<Expr, DerivativeError> {
        let var = Expr::from(x);
        let mut terms = Vec::with_capacity(n as usize + 1);
        let mut derivative = term.clone();
        let mut factorial = Integer::from(1);

        for k in 0..n {
            if k > 0 {
                derivative = derivative.diff(x)?;
                factorial *= k;
            }
            let value = derivative.subs(&var, &Expr::zero());
            if value.as_number().is_some_and(|v| !v.is_finite()) {
                return Err(DerivativeError::Undifferentiable(term.clone()));
            }
            let coeff = Number::from(Rational::from((Integer::from(1), factorial.clone())));
            terms.push(Expr::product(vec![
                value,
                Expr::number(coeff),
                Expr::power(var.clone(), Expr::int(k as i64)),
            ]));
        }

        terms.push(Expr::order(Expr::power(var, Expr::int(n as i64)), vec![x.clone()]));
        Ok(Expr::sum(terms))
    }
}

impl Expr {
    /// Expands the expression into a series about `x = 0`, up to but not including `x^n`. Sums
    /// are expanded term by term, and each term is expanded by `expander`.
    pub fn nseries_with(
        &self,
        x: &Symbol,
        n: u32,
        expander: &dyn SeriesExpansion,
    ) -> Result<Expr, DerivativeError> {
        match self {
            Self::Add(terms) => {
                let terms = terms.iter()
                    .map(|term| term.nseries_with(x, n, expander))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::sum(terms))
            },
            Self::Order(..) => Ok(self.clone()),
            _ if !self.has_symbol(x) => Ok(self.clone()),
            _ => expander.expand_term(self, x, n),
        }
    }

    /// Expands the expression into its Taylor series about `x = 0`. See
    /// [`Expr::nseries_with`].
    pub fn nseries(&self, x: &Symbol, n: u32) -> Result<Expr, DerivativeError> {
        self.nseries_with(x, n, &Taylor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn o(n: i64) -> Expr {
        Expr::order(Expr::power(x(), Expr::int(n)), vec![Symbol::new("x")])
    }

    #[test]
    fn exp_series() {
        let series = Expr::exp(x()).nseries(&Symbol::new("x"), 3).unwrap();
        let expected = Expr::sum(vec![
            Expr::one(),
            x(),
            Expr::rational(1, 2) * Expr::power(x(), Expr::int(2)),
            o(3),
        ]);
        assert_eq!(series, expected);
    }

    #[test]
    fn sin_series() {
        let series = Expr::sin(x()).nseries(&Symbol::new("x"), 4).unwrap();
        let expected = Expr::sum(vec![
            x(),
            Expr::rational(-1, 6) * Expr::power(x(), Expr::int(3)),
            o(4),
        ]);
        assert_eq!(series, expected);
    }

    #[test]
    fn sums_term_by_term() {
        let e = Expr::exp(x()) + x() + Expr::int(4);
        let series = e.nseries(&Symbol::new("x"), 2).unwrap();
        assert_eq!(series, Expr::sum(vec![Expr::int(5), Expr::int(2) * x(), o(2)]));
    }

    #[test]
    fn singular_terms() {
        let e = Expr::log(x());
        assert!(e.nseries(&Symbol::new("x"), 2).is_err());
    }
}

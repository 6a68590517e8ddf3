//! Growth-rate comparison, most rapidly varying sets, and rewriting at infinity.
//!
//! These are the building blocks of the Gruntz algorithm for limits as `x -> oo`:
//!
//! 1. [`compare`] orders two expressions by growth rate, by the limit of the ratio of their
//!    logarithms.
//! 2. [`mrv`] finds the subexpressions in the fastest-growing comparability class.
//! 3. [`rewrite`] rewrites an expression in terms of a single variable `w -> 0` standing for the
//!    dominant subexpression.
//!
//! Comparing needs limits and limits need comparisons, so every computation runs in an
//! [`Asymptotics`] context, which ties a [`LimitEvaluator`] to a [`Budget`](budget::Budget) that
//! bounds the recursion. The free functions in this crate use [`LeadingTermLimit`] and the
//! default [`BudgetConfig`].
//!
//! Questions that cannot be decided are reported as [`Unsupported`], never as a guess.
//!
//! ```
//! use cas_limits::{compare, Comparison};
//! use cas_symbolic::{Expr, Symbol};
//!
//! let x = Symbol::new("x").positive();
//! let e = Expr::exp(Expr::from(&x));
//! assert_eq!(compare(&Expr::from(&x), &e, &x), Ok(Comparison::Less));
//! ```

pub mod budget;
pub mod compare;
pub mod leading;
pub mod limit;
pub mod mrv;
pub mod rewrite;

pub use budget::BudgetConfig;
pub use compare::Comparison;
pub use leading::{LeadingTerm, LeadingTermLimit};
pub use limit::{Asymptotics, LimitEvaluator, LimitValue, Unsupported};
pub use mrv::MrvSet;

use cas_symbolic::{Expr, Symbol};

/// Compares the growth rates of `f` and `g` as `x -> oo`.
pub fn compare(f: &Expr, g: &Expr, x: &Symbol) -> Result<Comparison, Unsupported> {
    Asymptotics::new(x.clone(), &LeadingTermLimit).compare(f, g)
}

/// Computes the most rapidly varying set of `expr` as `x -> oo`.
pub fn mrv(expr: &Expr, x: &Symbol) -> Result<MrvSet, Unsupported> {
    Asymptotics::new(x.clone(), &LeadingTermLimit).mrv(expr)
}

/// Rewrites `expr` in terms of `w`, given its most rapidly varying set `omega`. See
/// [`Asymptotics::rewrite`].
pub fn rewrite(expr: &Expr, omega: &MrvSet, x: &Symbol, w: &Symbol) -> Result<(Expr, Expr), Unsupported> {
    Asymptotics::new(x.clone(), &LeadingTermLimit).rewrite(expr, omega, w)
}

/// Computes the limit of `expr` as `x -> oo`.
pub fn limit(expr: &Expr, x: &Symbol) -> Result<LimitValue, Unsupported> {
    Asymptotics::new(x.clone(), &LeadingTermLimit).limit(expr)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn free_functions() {
        let x = Symbol::new("x").positive();
        let m = Symbol::new("m");
        let e = Expr::exp(Expr::from(&x)) + Expr::from(&x).recip();

        let omega = mrv(&e, &x).unwrap();
        assert_eq!(omega, MrvSet::singleton(Expr::exp(Expr::from(&x))));

        let (rewritten, log_w) = rewrite(&e, &omega, &x, &m).unwrap();
        assert_eq!(rewritten, Expr::from(&m).recip() + Expr::from(&x).recip());
        assert_eq!(log_w, -Expr::from(&x));

        assert_eq!(limit(&e, &x), Ok(LimitValue::PositiveInfinity));
    }

    #[test]
    fn budget_bounds_the_recursion() {
        let x = Symbol::new("x").positive();
        let mut e = Expr::from(&x);
        for _ in 0..8 {
            e = Expr::exp(e);
        }

        let config = BudgetConfig { max_depth: 4, ..Default::default() };
        let ctx = Asymptotics::with_config(x.clone(), &LeadingTermLimit, config);
        assert_eq!(ctx.limit(&e), Err(Unsupported::BudgetExhausted));
        assert_eq!(limit(&e, &x), Ok(LimitValue::PositiveInfinity));
    }
}

//! Limits at infinity, and the context shared by the asymptotic algorithms.

use cas_symbolic::{Expr, Symbol};
use crate::budget::{Budget, BudgetConfig};
use std::fmt;
use thiserror::Error;

/// Reasons an asymptotic question could not be answered.
///
/// None of these mean the answer does not exist; they mean it could not be determined with the
/// methods available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    /// The recursion or step budget ran out.
    #[error("ran out of budget while computing a limit")]
    BudgetExhausted,

    /// The leading terms of a sum cancel exactly, so the true leading term is of lower order.
    #[error("the leading terms of a sum cancel")]
    Cancellation,

    /// The sign of a quantity that decides the result is not known.
    #[error("could not determine the sign of a quantity")]
    UnknownSign,

    /// The expression oscillates as the variable grows.
    #[error("the expression oscillates")]
    Oscillating,

    /// An element of a most rapidly varying set is not an `exp` call.
    #[error("`{0}` is not an exponential")]
    NotExponential(Expr),

    /// The limit needs more terms of an expansion than are available.
    #[error("the limit is indeterminate at this order")]
    Indeterminate,

    /// The expression contains something the algorithms cannot reason about, such as an order
    /// term, a pattern placeholder, or an uninterpreted function of the variable.
    #[error("cannot compute the limit of `{0}`")]
    Unrepresentable(Expr),
}

/// The limit of an expression as the variable tends to `+oo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitValue {
    Finite(Expr),
    PositiveInfinity,
    NegativeInfinity,

    /// The magnitude grows without bound, but the sign is not known.
    UnsignedInfinity,
}

impl LimitValue {
    pub fn is_infinite(&self) -> bool {
        !matches!(self, Self::Finite(_))
    }

    /// Returns true if the limit is exactly zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Finite(value) if value.is_zero())
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{}", value),
            Self::PositiveInfinity => write!(f, "oo"),
            Self::NegativeInfinity => write!(f, "-oo"),
            Self::UnsignedInfinity => write!(f, "zoo"),
        }
    }
}

/// Computes limits as the variable tends to `+oo`.
///
/// The asymptotic algorithms call back into the evaluator through an [`Asymptotics`] context,
/// and an evaluator is free to call [`Asymptotics::compare`], [`Asymptotics::mrv`], or
/// [`Asymptotics::limit`] in turn. The context's budget bounds that recursion.
pub trait LimitEvaluator {
    fn limit_at_infinity(&self, ctx: &Asymptotics<'_>, expr: &Expr) -> Result<LimitValue, Unsupported>;
}

/// The context for asymptotic computations as one variable tends to `+oo`.
///
/// The variable should be declared positive (see [`Symbol::positive`]), so that identities like
/// `log(exp(x)) = x` are applied to it.
pub struct Asymptotics<'a> {
    var: Symbol,
    evaluator: &'a dyn LimitEvaluator,
    budget: Budget,
}

impl<'a> Asymptotics<'a> {
    /// Creates a context with the default budget.
    pub fn new(var: Symbol, evaluator: &'a dyn LimitEvaluator) -> Self {
        Self::with_config(var, evaluator, BudgetConfig::default())
    }

    pub fn with_config(var: Symbol, evaluator: &'a dyn LimitEvaluator, config: BudgetConfig) -> Self {
        Self {
            var,
            evaluator,
            budget: Budget::new(config),
        }
    }

    /// The variable tending to infinity.
    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Computes the limit of `expr` with the context's evaluator.
    pub fn limit(&self, expr: &Expr) -> Result<LimitValue, Unsupported> {
        let _guard = self.budget.enter()?;
        if !expr.has_symbol(&self.var) {
            return Ok(LimitValue::Finite(expr.clone()));
        }
        self.evaluator.limit_at_infinity(self, expr)
    }
}

impl fmt::Debug for Asymptotics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Asymptotics")
            .field("var", &self.var)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Reports every expression as tending to `+oo`.
    struct Unbounded;

    impl LimitEvaluator for Unbounded {
        fn limit_at_infinity(&self, _: &Asymptotics<'_>, _: &Expr) -> Result<LimitValue, Unsupported> {
            Ok(LimitValue::PositiveInfinity)
        }
    }

    /// Recurses forever.
    struct Runaway;

    impl LimitEvaluator for Runaway {
        fn limit_at_infinity(&self, ctx: &Asymptotics<'_>, expr: &Expr) -> Result<LimitValue, Unsupported> {
            ctx.limit(&(expr + &Expr::one()))
        }
    }

    #[test]
    fn constants_skip_the_evaluator() {
        let ctx = Asymptotics::new(Symbol::new("x").positive(), &Unbounded);
        let y = Expr::symbol("y");
        assert_eq!(ctx.limit(&y).unwrap(), LimitValue::Finite(y));

        let x = Expr::from(Symbol::new("x").positive());
        assert_eq!(ctx.limit(&x), Ok(LimitValue::PositiveInfinity));

        // a symbol with different facts is a different symbol
        let plain = Expr::symbol("x");
        assert_eq!(ctx.limit(&plain), Ok(LimitValue::Finite(plain.clone())));
    }

    #[test]
    fn recursion_is_bounded() {
        let x = Symbol::new("x").positive();
        let ctx = Asymptotics::new(x.clone(), &Runaway);
        assert_eq!(ctx.limit(&Expr::from(x)), Err(Unsupported::BudgetExhausted));
        assert_eq!(ctx.budget().depth(), 0);
    }
}

//! Symbolic differentiation.

use crate::expr::{Expr, Primary, Symbol};
use thiserror::Error;

mod function;

/// Errors that can occur while computing a derivative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivativeError {
    /// The expression may be differentiable, but we do not support symbolically computing it yet.
    #[error("the derivative of this expression cannot be computed symbolically")]
    Unsupported,

    /// The provided subexpression is not differentiable.
    #[error("`{0}` is not differentiable")]
    Undifferentiable(Expr),
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], var: &Symbol) -> Result<Expr, DerivativeError> {
    let terms = terms.iter()
        .map(|term| term.diff(var))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::sum(terms))
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
///
/// The factors keep their order in each product, so this also holds for non-commutative factors.
fn product_rule(factors: &[Expr], var: &Symbol) -> Result<Expr, DerivativeError> {
    let mut terms = Vec::with_capacity(factors.len());
    for (i, factor) in factors.iter().enumerate() {
        if !factor.has_symbol(var) {
            continue;
        }
        let mut product = factors.to_vec();
        product[i] = factor.diff(var)?;
        terms.push(Expr::product(product));
    }
    Ok(Expr::sum(terms))
}

/// `(b^e)' = b^e * (e' * log(b) + e * b' / b)`, with the usual simplifications when only one of
/// `b` and `e` depends on the variable.
fn power_rule(base: &Expr, exp: &Expr, var: &Symbol) -> Result<Expr, DerivativeError> {
    match (base.has_symbol(var), exp.has_symbol(var)) {
        // (b^n)' = n * b^(n - 1) * b'
        (true, false) => Ok(Expr::product(vec![
            exp.clone(),
            Expr::power(base.clone(), exp - &Expr::one()),
            base.diff(var)?,
        ])),

        // (a^e)' = a^e * log(a) * e'
        (false, true) => Ok(Expr::product(vec![
            Expr::power(base.clone(), exp.clone()),
            Expr::log(base.clone()),
            exp.diff(var)?,
        ])),

        (true, true) => {
            let inner = exp.diff(var)? * Expr::log(base.clone())
                + exp.clone() * base.diff(var)? / base.clone();
            Ok(Expr::power(base.clone(), exp.clone()) * inner)
        },
        (false, false) => Ok(Expr::zero()),
    }
}

impl Expr {
    /// Computes the derivative of the expression with respect to `var`. Returns [`Err`] if the
    /// derivative could not be symbolically computed.
    pub fn diff(&self, var: &Symbol) -> Result<Expr, DerivativeError> {
        match self {
            Self::Primary(Primary::Function(_)) => Err(DerivativeError::Undifferentiable(self.clone())),
            Self::Primary(Primary::Wild(_)) => Err(DerivativeError::Unsupported),
            _ if !self.has_symbol(var) => Ok(Expr::zero()),
            Self::Primary(Primary::Symbol(_)) => Ok(Expr::one()),
            Self::Primary(Primary::Call(func, args)) => function::function_derivative(func, args, var),
            Self::Primary(Primary::Number(_)) => Ok(Expr::zero()),
            Self::Add(terms) => sum_rule(terms, var),
            Self::Mul(factors) => product_rule(factors, var),
            Self::Pow(base, exp) => power_rule(base, exp, var),
            Self::Order(expr, symbols) => Ok(Expr::order(expr.diff(var)?, symbols.to_vec())),
        }
    }
}

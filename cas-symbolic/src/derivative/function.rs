//! Symbolic derivatives of the built-in functions.

use crate::{expr::{Expr, Symbol}, func::Func};
use super::DerivativeError;

/// Computes the derivative of a built-in function call and applies the chain rule.
pub(super) fn function_derivative(
    func: &Func,
    args: &[Expr],
    var: &Symbol,
) -> Result<Expr, DerivativeError> {
    let [arg] = args else {
        return Err(DerivativeError::Unsupported);
    };

    let outer = match func {
        Func::Exp => Expr::exp(arg.clone()),
        Func::Log => arg.clone().recip(),
        Func::Sin => Expr::cos(arg.clone()),
        Func::Cos => -Expr::sin(arg.clone()),

        // the derivative of sign is zero wherever it exists
        Func::Sign => return Err(DerivativeError::Undifferentiable(Expr::sign(arg.clone()))),
        Func::Named(_) => return Err(DerivativeError::Unsupported),
    };

    Ok(Expr::product(vec![arg.diff(var)?, outer]))
}

//! A limit evaluator based on leading terms.
//!
//! Every expression that depends on `x` is summarized by its leading term as `x -> oo`:
//!
//! ```text
//! c * L_0^q_0 * L_1^q_1 * ... * exp(E)
//! ```
//!
//! where `L_0 = x`, `L_(k+1) = log(L_k)`, the coefficient `c` and the exponents `q_k` do not
//! depend on `x`, and `E` is either zero or tends to infinity. The leading term of a sum is the
//! leading term of its dominant terms, products multiply, and `exp` and `log` move factors
//! between the tower of logarithms and `E`.
//!
//! This is enough for the growth comparisons the most rapidly varying set needs. When the
//! leading terms of a sum cancel, the evaluator reports [`Unsupported::Cancellation`] instead of
//! looking for the next term.

use cas_symbolic::{Expr, Func, Primary, Symbol};
use crate::limit::{Asymptotics, LimitEvaluator, LimitValue, Unsupported};
use std::cmp::Ordering;
use tracing::trace;

/// Returns the iterated logarithm `L_k` of `x`.
pub fn tower(x: &Symbol, k: usize) -> Expr {
    (0..k).fold(Expr::from(x), |acc, _| Expr::log(acc))
}

/// Returns `k` if the expression is `L_k`.
fn tower_level(expr: &Expr, x: &Symbol) -> Option<usize> {
    match expr {
        Expr::Primary(Primary::Symbol(s)) if s == x => Some(0),
        _ => expr.as_log().and_then(|inner| tower_level(inner, x)).map(|k| k + 1),
    }
}

/// Returns `(c, k)` if the expression is `c * L_k` for some `c` independent of `x`.
fn tower_multiple(expr: &Expr, x: &Symbol) -> Option<(Expr, usize)> {
    if let Some(k) = tower_level(expr, x) {
        return Some((Expr::one(), k));
    }

    let factors = expr.factors()?;
    let mut level = None;
    let mut coeff = Vec::with_capacity(factors.len());
    for factor in factors {
        if !factor.has_symbol(x) {
            coeff.push(factor.clone());
        } else if level.is_none() {
            level = Some(tower_level(factor, x)?);
        } else {
            return None;
        }
    }
    level.map(|k| (Expr::product(coeff), k))
}

/// Determines the sign of an expression that does not depend on the variable.
fn sign_of(expr: &Expr) -> Result<Ordering, Unsupported> {
    if expr.is_zero() {
        Ok(Ordering::Equal)
    } else if expr.is_positive().is_true() {
        Ok(Ordering::Greater)
    } else if expr.is_negative().is_true() {
        Ok(Ordering::Less)
    } else {
        Err(Unsupported::UnknownSign)
    }
}

/// The leading term `c * L_0^q_0 * L_1^q_1 * ... * exp(E)` of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingTerm {
    /// The coefficient `c`. It is zero only for the leading term of zero.
    pub coeff: Expr,

    /// The exponents `q_k` of the iterated logarithms, without trailing zeros.
    pub tower: Vec<Expr>,

    /// The exponent `E`, either zero or unbounded.
    pub exp_arg: Expr,
}

impl LeadingTerm {
    /// The leading term of an expression that does not depend on the variable.
    pub fn constant(coeff: Expr) -> Self {
        Self {
            coeff,
            tower: Vec::new(),
            exp_arg: Expr::zero(),
        }
    }

    /// The leading term `L_k^exp`.
    pub fn tower_power(k: usize, exp: Expr) -> Self {
        let mut tower = vec![Expr::zero(); k];
        tower.push(exp);
        Self::normalized(Expr::one(), tower, Expr::zero())
    }

    fn normalized(coeff: Expr, mut tower: Vec<Expr>, exp_arg: Expr) -> Self {
        while tower.last().is_some_and(Expr::is_zero) {
            tower.pop();
        }
        Self { coeff, tower, exp_arg }
    }

    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// The exponent of `L_k`.
    pub fn exponent(&self, k: usize) -> Expr {
        self.tower.get(k).cloned().unwrap_or_else(Expr::zero)
    }

    /// Multiplies two leading terms.
    pub fn mul(&self, other: &Self) -> Self {
        let len = self.tower.len().max(other.tower.len());
        let tower = (0..len)
            .map(|k| &self.exponent(k) + &other.exponent(k))
            .collect();
        Self::normalized(
            &self.coeff * &other.coeff,
            tower,
            &self.exp_arg + &other.exp_arg,
        )
    }

    /// Raises the leading term to a power independent of the variable.
    pub fn pow(&self, exp: &Expr) -> Self {
        Self::normalized(
            Expr::power(self.coeff.clone(), exp.clone()),
            self.tower.iter().map(|q| q * exp).collect(),
            &self.exp_arg * exp,
        )
    }

    /// Returns `E + q_0 L_1 + q_1 L_2 + ...`, the logarithm of the leading term without its
    /// coefficient.
    pub fn log_magnitude(&self, x: &Symbol) -> Expr {
        let mut terms = Vec::with_capacity(self.tower.len() + 1);
        terms.push(self.exp_arg.clone());
        for (k, q) in self.tower.iter().enumerate() {
            terms.push(q * &tower(x, k + 1));
        }
        Expr::sum(terms)
    }

    /// Rebuilds the leading term as an expression.
    pub fn to_expr(&self, x: &Symbol) -> Expr {
        let mut factors = Vec::with_capacity(self.tower.len() + 2);
        factors.push(self.coeff.clone());
        for (k, q) in self.tower.iter().enumerate() {
            factors.push(Expr::power(tower(x, k), q.clone()));
        }
        factors.push(Expr::exp(self.exp_arg.clone()));
        Expr::product(factors)
    }

    /// Computes the limit of the leading term.
    pub fn limit(&self, ctx: &Asymptotics<'_>) -> Result<LimitValue, Unsupported> {
        if self.is_zero() {
            return Ok(LimitValue::Finite(Expr::zero()));
        }

        let growth = if self.exp_arg.is_zero() {
            let mut growth = Ordering::Equal;
            for q in &self.tower {
                growth = sign_of(q)?;
                if growth != Ordering::Equal {
                    break;
                }
            }
            growth
        } else {
            match ctx.limit(&self.log_magnitude(ctx.var()))? {
                LimitValue::PositiveInfinity => Ordering::Greater,
                LimitValue::NegativeInfinity => Ordering::Less,
                LimitValue::Finite(d) => return Ok(LimitValue::Finite(&self.coeff * &Expr::exp(d))),
                LimitValue::UnsignedInfinity => return Err(Unsupported::UnknownSign),
            }
        };

        Ok(match growth {
            Ordering::Less => LimitValue::Finite(Expr::zero()),
            Ordering::Equal => LimitValue::Finite(self.coeff.clone()),
            Ordering::Greater => match sign_of(&self.coeff) {
                Ok(Ordering::Greater) => LimitValue::PositiveInfinity,
                Ok(Ordering::Less) => LimitValue::NegativeInfinity,
                _ => LimitValue::UnsignedInfinity,
            },
        })
    }
}

/// Returns the leading term of `a + b`.
fn dominant(ctx: &Asymptotics<'_>, a: LeadingTerm, b: LeadingTerm) -> Result<LeadingTerm, Unsupported> {
    if a.is_zero() {
        return Ok(b);
    }
    if b.is_zero() {
        return Ok(a);
    }

    let ratio = if a.exp_arg == b.exp_arg {
        let len = a.tower.len().max(b.tower.len());
        for k in 0..len {
            match sign_of(&(&a.exponent(k) - &b.exponent(k)))? {
                Ordering::Greater => return Ok(a),
                Ordering::Less => return Ok(b),
                Ordering::Equal => {},
            }
        }
        Expr::one()
    } else {
        let x = ctx.var();
        match ctx.limit(&(&a.log_magnitude(x) - &b.log_magnitude(x)))? {
            LimitValue::PositiveInfinity => return Ok(a),
            LimitValue::NegativeInfinity => return Ok(b),
            LimitValue::Finite(d) => Expr::exp(-d),
            LimitValue::UnsignedInfinity => return Err(Unsupported::UnknownSign),
        }
    };

    // b / a tends to b.coeff / a.coeff * ratio
    let coeff = &a.coeff + &(&b.coeff * &ratio);
    if coeff.is_zero() {
        return Err(Unsupported::Cancellation);
    }
    Ok(LeadingTerm { coeff, ..a })
}

/// Returns the leading term of `exp(arg)`.
fn exp_leading(ctx: &Asymptotics<'_>, arg: &Expr) -> Result<LeadingTerm, Unsupported> {
    let x = ctx.var();
    let terms = arg.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![arg.clone()]);

    let mut tower = Vec::new();
    let mut bounded = Vec::new();
    let mut unbounded = Vec::new();
    for term in terms {
        if !term.has_symbol(x) {
            bounded.push(term);
            continue;
        }

        // exp(c * L_k) = L_(k-1)^c
        if let Some((c, k)) = tower_multiple(&term, x).filter(|(_, k)| *k > 0) {
            if tower.len() < k {
                tower.resize(k, Expr::zero());
            }
            tower[k - 1] = &tower[k - 1] + &c;
            continue;
        }

        match ctx.limit(&term)? {
            LimitValue::Finite(value) => bounded.push(value),
            _ => unbounded.push(term),
        }
    }

    let mut exp_arg = Expr::sum(unbounded);
    if exp_arg.terms().is_some() {
        // unbounded terms can still have a bounded sum
        if let LimitValue::Finite(value) = ctx.limit(&exp_arg)? {
            bounded.push(value);
            exp_arg = Expr::zero();
        }
    }

    trace!(%arg, %exp_arg, "exponential leading term");
    Ok(LeadingTerm::normalized(Expr::exp(Expr::sum(bounded)), tower, exp_arg))
}

/// Returns the leading term of `log(arg)`.
fn log_leading(ctx: &Asymptotics<'_>, arg: &Expr) -> Result<LeadingTerm, Unsupported> {
    let x = ctx.var();
    let inner = leading_term(ctx, arg)?;

    // log(c * L_0^q_0 * ... * exp(E)) = E + q_0 L_1 + ... + log(c)
    let expanded = &inner.log_magnitude(x) + &Expr::log(inner.coeff.clone());
    if expanded.is_zero() {
        return Err(Unsupported::Indeterminate);
    }
    leading_term(ctx, &expanded)
}

/// Returns the leading term of a call to a built-in function.
fn call_leading(ctx: &Asymptotics<'_>, expr: &Expr, func: &Func, args: &[Expr]) -> Result<LeadingTerm, Unsupported> {
    let [arg] = args else {
        return Err(Unsupported::Unrepresentable(expr.clone()));
    };

    match func {
        Func::Exp => exp_leading(ctx, arg),
        Func::Log => log_leading(ctx, arg),
        Func::Sin | Func::Cos => match ctx.limit(arg)? {
            LimitValue::Finite(value) => {
                let value = Expr::call(func.clone(), vec![value]);
                if value.is_zero() {
                    return Err(Unsupported::Indeterminate);
                }
                Ok(LeadingTerm::constant(value))
            },
            _ => Err(Unsupported::Oscillating),
        },
        Func::Sign => {
            let sign = Expr::sign(leading_term(ctx, arg)?.coeff);
            if sign.is_number() {
                Ok(LeadingTerm::constant(sign))
            } else {
                Err(Unsupported::UnknownSign)
            }
        },
        Func::Named(_) => Err(Unsupported::Unrepresentable(expr.clone())),
    }
}

/// Computes the leading term of an expression as the context's variable tends to `+oo`.
pub fn leading_term(ctx: &Asymptotics<'_>, expr: &Expr) -> Result<LeadingTerm, Unsupported> {
    let _guard = ctx.budget().enter()?;
    let x = ctx.var();

    if expr.post_order_iter().any(|e| e.is_order() || e.as_wild().is_some()) {
        return Err(Unsupported::Unrepresentable(expr.clone()));
    }
    if !expr.has_symbol(x) {
        return Ok(LeadingTerm::constant(expr.clone()));
    }
    if let Some(k) = tower_level(expr, x) {
        return Ok(LeadingTerm::tower_power(k, Expr::one()));
    }

    let term = match expr {
        Expr::Add(terms) => {
            let mut result = LeadingTerm::constant(Expr::zero());
            for term in terms.iter() {
                result = dominant(ctx, result, leading_term(ctx, term)?)?;
            }
            result
        },
        Expr::Mul(factors) => {
            let mut result = LeadingTerm::constant(Expr::one());
            for factor in factors.iter() {
                result = result.mul(&leading_term(ctx, factor)?);
            }
            result
        },

        // b^e = exp(e log b)
        Expr::Pow(base, exp) if exp.has_symbol(x) => {
            leading_term(ctx, &Expr::exp(&**exp * &Expr::log((**base).clone())))?
        },
        Expr::Pow(base, exp) => leading_term(ctx, base)?.pow(exp),

        Expr::Primary(Primary::Call(func, args)) => call_leading(ctx, expr, func, args)?,
        _ => return Err(Unsupported::Unrepresentable(expr.clone())),
    };

    trace!(%expr, coeff = %term.coeff, ?term.tower, "leading term");
    Ok(term)
}

/// The default [`LimitEvaluator`], which takes the limit of the expression's leading term.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingTermLimit;

impl LimitEvaluator for LeadingTermLimit {
    fn limit_at_infinity(&self, ctx: &Asymptotics<'_>, expr: &Expr) -> Result<LimitValue, Unsupported> {
        leading_term(ctx, expr)?.limit(ctx)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var() -> Symbol {
        Symbol::new("x").positive()
    }

    fn x() -> Expr {
        Expr::from(var())
    }

    fn limit(e: &Expr) -> Result<LimitValue, Unsupported> {
        Asymptotics::new(var(), &LeadingTermLimit).limit(e)
    }

    fn leading(e: &Expr) -> LeadingTerm {
        leading_term(&Asymptotics::new(var(), &LeadingTermLimit), e).unwrap()
    }

    #[test]
    fn towers() {
        assert_eq!(tower_level(&Expr::log(Expr::log(x())), &var()), Some(2));
        assert_eq!(tower_level(&Expr::log(Expr::symbol("y")), &var()), None);
        assert_eq!(
            tower_multiple(&(Expr::int(3) * Expr::log(x())), &var()),
            Some((Expr::int(3), 1)),
        );
    }

    #[test]
    fn polynomial_sums() {
        // 3x^2 - x + 7
        let e = Expr::int(3) * Expr::power(x(), Expr::int(2)) - x() + Expr::int(7);
        assert_eq!(leading(&e), LeadingTerm {
            coeff: Expr::int(3),
            tower: vec![Expr::int(2)],
            exp_arg: Expr::zero(),
        });
        assert_eq!(limit(&e), Ok(LimitValue::PositiveInfinity));
        assert_eq!(limit(&-e), Ok(LimitValue::NegativeInfinity));
    }

    #[test]
    fn rational_functions() {
        // (2x + 1) / (x + 3) -> 2
        let e = (Expr::int(2) * x() + Expr::one()) / (x() + Expr::int(3));
        assert_eq!(limit(&e), Ok(LimitValue::Finite(Expr::int(2))));

        // log(x) / x -> 0
        let e = Expr::log(x()) / x();
        assert_eq!(limit(&e), Ok(LimitValue::Finite(Expr::zero())));
    }

    #[test]
    fn exponentials_dominate_powers() {
        // x^10 * exp(-x) -> 0
        let e = Expr::power(x(), Expr::int(10)) * Expr::exp(-x());
        assert_eq!(limit(&e), Ok(LimitValue::Finite(Expr::zero())));

        // exp(x) - x^5 -> oo
        let e = Expr::exp(x()) - Expr::power(x(), Expr::int(5));
        assert_eq!(limit(&e), Ok(LimitValue::PositiveInfinity));
    }

    #[test]
    fn logarithms_of_towers() {
        // exp(2 log(x)) is x^2
        let e = Expr::exp(Expr::int(2) * Expr::log(x()));
        assert_eq!(leading(&e), LeadingTerm::tower_power(0, Expr::int(2)));

        // log(x^3 + x) ~ 3 log(x)
        let e = Expr::log(Expr::power(x(), Expr::int(3)) + x());
        assert_eq!(leading(&e), LeadingTerm {
            coeff: Expr::int(3),
            tower: vec![Expr::zero(), Expr::one()],
            exp_arg: Expr::zero(),
        });
    }

    #[test]
    fn bounded_exponents_fold_into_the_coefficient() {
        // exp(x + 1/x) ~ exp(x)
        let e = Expr::exp(x() + x().recip());
        assert_eq!(leading(&e), LeadingTerm {
            coeff: Expr::one(),
            tower: vec![],
            exp_arg: x(),
        });

        // exp(1/x) -> 1
        assert_eq!(limit(&Expr::exp(x().recip())), Ok(LimitValue::Finite(Expr::one())));
    }

    #[test]
    fn variable_exponents() {
        // x^x = exp(x log(x)) -> oo
        let e = Expr::power(x(), x());
        assert_eq!(limit(&e), Ok(LimitValue::PositiveInfinity));

        // 2^(-x) -> 0
        let e = Expr::power(Expr::int(2), -x());
        assert_eq!(limit(&e), Ok(LimitValue::Finite(Expr::zero())));
    }

    #[test]
    fn unsupported_outcomes() {
        // both leading terms are exp(x)
        let e = Expr::exp(x() + x().recip()) - Expr::exp(x());
        assert_eq!(limit(&e), Err(Unsupported::Cancellation));

        assert_eq!(limit(&Expr::sin(x())), Err(Unsupported::Oscillating));

        let m = Expr::symbol("m");
        assert_eq!(limit(&(m * x())), Ok(LimitValue::UnsignedInfinity));

        let n = Expr::symbol("n");
        assert_eq!(limit(&Expr::power(x(), n)), Err(Unsupported::UnknownSign));

        let f = Expr::call(Func::named("f"), vec![x()]);
        assert_eq!(limit(&f), Err(Unsupported::Unrepresentable(f)));
    }

    #[test]
    fn signs_and_bounded_calls() {
        // sign(1 - x) -> -1
        let e = Expr::sign(Expr::one() - x());
        assert_eq!(limit(&e), Ok(LimitValue::Finite(Expr::neg_one())));

        // cos(1/x) -> 1
        assert_eq!(limit(&Expr::cos(x().recip())), Ok(LimitValue::Finite(Expr::one())));
    }
}

//! Function heads and their evaluating constructors.
//!
//! Calls are built through [`Expr::call`], which applies the evaluations that are always valid
//! (`exp(0) = 1`, `log(1) = 0`, `exp(log(u)) = u`, and so on) and otherwise produces an
//! unevaluated [`Primary::Call`] node. `exp` also pulls logarithms out of a sum, so
//! `exp(2 log(u) + v)` is `u^2 exp(v)`.

use crate::{expr::{Expr, Primary}, number::Number, tri::Tri};
use std::{cmp::Ordering, fmt, sync::Arc};

/// A function head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    /// The exponential function.
    Exp,

    /// The natural logarithm.
    Log,

    Sin,
    Cos,

    /// The sign function: `-1`, `0`, or `1`.
    Sign,

    /// An uninterpreted function, such as `f` in `f(x, y)`.
    Named(Arc<str>),
}

impl Func {
    /// Returns the function with the given name. Known names map to their built-in function.
    pub fn named(name: &str) -> Self {
        match name {
            "exp" => Self::Exp,
            "log" | "ln" => Self::Log,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "sign" => Self::Sign,
            _ => Self::Named(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Sign => "sign",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns `u^c` if the term is `c log(u)` for a finite number `c`, which is `exp` of the term.
fn log_power(term: &Expr) -> Option<Expr> {
    if let Some(u) = term.as_log() {
        return Some(u.clone());
    }
    let [a, b] = term.factors()? else {
        return None;
    };
    let (c, log) = if a.is_number() { (a, b) } else { (b, a) };
    if !c.as_number().is_some_and(Number::is_finite) {
        return None;
    }
    Some(Expr::power(log.as_log()?.clone(), c.clone()))
}

impl Expr {
    /// Applies `func` to the given arguments.
    pub fn call(func: Func, mut args: Vec<Expr>) -> Self {
        if args.len() == 1 {
            match func {
                Func::Exp => return Self::exp(args.remove(0)),
                Func::Log => return Self::log(args.remove(0)),
                Func::Sin => return Self::sin(args.remove(0)),
                Func::Cos => return Self::cos(args.remove(0)),
                Func::Sign => return Self::sign(args.remove(0)),
                Func::Named(_) => {},
            }
        }
        Self::Primary(Primary::Call(func, args.into()))
    }

    fn raw_call(func: Func, arg: Expr) -> Self {
        Self::Primary(Primary::Call(func, vec![arg].into()))
    }

    /// Returns `exp(arg)`.
    pub fn exp(arg: Expr) -> Self {
        if let Some(n) = arg.as_number() {
            match n {
                Number::NaN => return Self::nan(),
                Number::Infinity => return Self::infinity(),
                Number::NegativeInfinity => return Self::zero(),
                n if n.is_zero() => return Self::one(),
                _ => {},
            }
        }
        if let Some(power) = log_power(&arg) {
            return power;
        }

        // exp(c log(u) + v) = u^c exp(v)
        if let Some(terms) = arg.terms() {
            let mut powers = Vec::new();
            let mut rest = Vec::new();
            for term in terms {
                match log_power(term) {
                    Some(power) => powers.push(power),
                    None => rest.push(term.clone()),
                }
            }
            if !powers.is_empty() {
                powers.push(Self::exp(Self::sum(rest)));
                return Self::product(powers);
            }
        }
        Self::raw_call(Func::Exp, arg)
    }

    /// Returns `log(arg)`, the natural logarithm.
    pub fn log(arg: Expr) -> Self {
        if let Some(n) = arg.as_number() {
            match n {
                Number::NaN => return Self::nan(),
                Number::Infinity => return Self::infinity(),
                Number::ComplexInfinity | Number::NegativeInfinity => {
                    return Self::complex_infinity();
                },
                n if n.is_zero() => return Self::complex_infinity(),
                n if n.is_one() => return Self::zero(),
                _ => {},
            }
        }
        if let Some(inner) = arg.as_exp() {
            if inner.is_real().is_true() {
                return inner.clone();
            }
        }
        Self::raw_call(Func::Log, arg)
    }

    pub fn sin(arg: Expr) -> Self {
        if arg.is_zero() {
            return Self::zero();
        }
        Self::raw_call(Func::Sin, arg)
    }

    pub fn cos(arg: Expr) -> Self {
        if arg.is_zero() {
            return Self::one();
        }
        Self::raw_call(Func::Cos, arg)
    }

    /// Returns `sign(arg)`, evaluated whenever the sign of the argument is known.
    pub fn sign(arg: Expr) -> Self {
        if let Some(n) = arg.as_number() {
            return match n.sign() {
                Some(Ordering::Greater) => Self::one(),
                Some(Ordering::Less) => Self::neg_one(),
                Some(Ordering::Equal) => Self::zero(),
                None => Self::nan(),
            };
        }
        match (arg.is_positive(), arg.is_negative()) {
            (Tri::True, _) => Self::one(),
            (_, Tri::True) => Self::neg_one(),
            _ => Self::raw_call(Func::Sign, arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Symbol;
    use super::*;

    #[test]
    fn exp_log_evaluations() {
        let x = Expr::symbol("x");
        assert_eq!(Expr::exp(Expr::zero()), Expr::one());
        assert_eq!(Expr::log(Expr::one()), Expr::zero());
        assert_eq!(Expr::exp(Expr::log(x.clone())), x);

        // log(exp(x)) = x only for real x
        let r = Expr::from(Symbol::new("r").real());
        assert_eq!(Expr::log(Expr::exp(r.clone())), r);
        assert!(Expr::log(Expr::exp(x.clone())).as_log().is_some());
    }

    #[test]
    fn exp_pulls_out_logarithms() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let log_x = || Expr::log(x.clone());

        // exp(log(x) + y) = x exp(y)
        assert_eq!(Expr::exp(log_x() + y.clone()), x.clone() * Expr::exp(y.clone()));

        // exp(-2 log(x)) = x^-2
        assert_eq!(Expr::exp(Expr::int(-2) * log_x()), Expr::power(x.clone(), Expr::int(-2)));

        // exp(log(x) + 1/2) = x exp(1/2)
        let e = Expr::exp(log_x() + Expr::rational(1, 2));
        assert_eq!(e, x.clone() * Expr::exp(Expr::rational(1, 2)));

        // only numeric coefficients
        let e = Expr::exp(y.clone() * log_x());
        assert!(e.as_exp().is_some());
    }

    #[test]
    fn sign_of_known_values() {
        let p = Expr::from(Symbol::new("p").positive());
        assert_eq!(Expr::sign(Expr::int(-4)), Expr::neg_one());
        assert_eq!(Expr::sign(p.clone()), Expr::one());
        assert_eq!(Expr::sign(-p), Expr::neg_one());
        assert!(Expr::sign(Expr::symbol("x")).as_call_of(&Func::Sign).is_some());
    }

    #[test]
    fn named_calls_stay_unevaluated() {
        let f = Expr::call(Func::named("f"), vec![Expr::zero()]);
        assert_eq!(f.as_call().map(|(func, args)| (func.name(), args.len())), Some(("f", 1)));
        assert_eq!(Expr::call(Func::named("exp"), vec![Expr::zero()]), Expr::one());
    }
}

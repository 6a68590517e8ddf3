//! Three-valued assumption queries.
//!
//! Every query returns a [`Tri`]: [`Tri::True`] or [`Tri::False`] when the property can be
//! decided from the structure of the expression and the facts attached to its symbols, and
//! [`Tri::Unknown`] otherwise. Queries never fail; an undecidable question is simply
//! [`Tri::Unknown`].
//!
//! # Sums
//!
//! Most properties of a sum follow a template: the sum has the property if every term has it, is
//! known not to have it if some term is known not to have it, and is unknown otherwise. This
//! applies to `real`, `bounded`, `integer`, and `comparable`.
//!
//! The remaining properties have their own rules:
//!
//! - `odd`: terms known to be even are dropped; no terms left means not odd, and if the first
//!   remaining term is odd, the sum is odd exactly when the rest of it is even.
//! - `irrational`: an irrational term makes the sum irrational unless some other term's
//!   rationality is unknown; a sum of rational terms is not irrational.
//! - `positive` / `negative`: decided by splitting the sum into its first term `c` and the rest
//!   `r`, with an unbounded part dominating a bounded one.

use crate::{
    expr::{Expr, Primary},
    func::Func,
    number::Number,
    tri::Tri,
};
use std::cmp::Ordering;

/// Applies the sum template: true if all true, false if any false, unknown otherwise.
fn all_terms(terms: &[Expr], query: impl Fn(&Expr) -> Tri) -> Tri {
    let mut result = Tri::True;
    for term in terms {
        match query(term) {
            Tri::False => return Tri::False,
            Tri::Unknown => result = Tri::Unknown,
            Tri::True => {},
        }
    }
    result
}

/// True if all factors have the property, unknown otherwise.
fn all_factors(factors: &[Expr], query: impl Fn(&Expr) -> Tri) -> Tri {
    if factors.iter().all(|f| query(f).is_true()) {
        Tri::True
    } else {
        Tri::Unknown
    }
}

/// Splits a sum into its first term and the sum of the remaining terms.
fn first_and_rest(terms: &[Expr]) -> (Expr, Expr) {
    match terms.split_first() {
        Some((first, rest)) => (first.clone(), Expr::sum(rest.to_vec())),
        None => (Expr::zero(), Expr::zero()),
    }
}

/// Returns the sign of a product of factors whose signs are all known, as `Some(true)` for
/// positive and `Some(false)` for negative.
fn product_sign(factors: &[Expr]) -> Option<bool> {
    let mut positive = true;
    for factor in factors {
        if factor.is_positive().is_true() {
            continue;
        }
        if factor.is_negative().is_true() {
            positive = !positive;
            continue;
        }
        return None;
    }
    Some(positive)
}

/// Compares a rational number to one.
fn cmp_one(n: &Number) -> Option<Ordering> {
    n.as_rational().map(|r| r.cmp(&rug::Rational::from(1)))
}

impl Expr {
    /// Returns true if the expression is known to be real.
    pub fn is_real(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                Number::ComplexInfinity => Tri::False,
                _ => Tri::True,
            },
            Self::Primary(Primary::Symbol(sym)) => sym.facts().real,
            Self::Primary(Primary::Call(func, args)) => match (func, &args[..]) {
                (Func::Exp | Func::Sin | Func::Cos | Func::Sign, [arg]) => arg.is_real().implies(Tri::True),
                (Func::Log, [arg]) => arg.is_positive().implies(Tri::True),
                _ => Tri::Unknown,
            },
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => all_terms(terms, Self::is_real),
            Self::Mul(factors) => all_factors(factors, Self::is_real),
            Self::Pow(base, exp) => {
                if base.is_positive().is_true() && exp.is_real().is_true() {
                    Tri::True
                } else if base.is_real().is_true() && exp.is_integer().is_true() {
                    Tri::True
                } else if base.is_negative().is_true()
                    && exp.as_number().is_some_and(|e| e.is_finite() && !e.is_integer())
                {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be bounded (finite in magnitude).
    pub fn is_bounded(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::Rational(_) => Tri::True,
                Number::NaN => Tri::Unknown,
                _ => Tri::False,
            },
            Self::Primary(Primary::Symbol(sym)) => sym.facts().bounded,
            Self::Primary(Primary::Call(func, args)) => match (func, &args[..]) {
                (Func::Sign, [_]) => Tri::True,
                (Func::Sin | Func::Cos, [arg]) => arg.is_real().implies(Tri::True),
                (Func::Exp, [arg]) => arg.is_bounded().implies(Tri::True),
                (Func::Log, [arg]) => arg.as_number()
                    .map(|n| Tri::from(n.is_positive() && n.is_finite()))
                    .unwrap_or(Tri::Unknown),
                _ => Tri::Unknown,
            },
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => all_terms(terms, Self::is_bounded),
            Self::Mul(factors) => {
                // an unbounded factor times nonzero factors stays unbounded
                let unbounded = factors.iter().position(|f| f.is_bounded().is_false());
                match unbounded {
                    Some(i) if factors.iter()
                        .enumerate()
                        .all(|(j, f)| j == i || f.is_nonzero().is_true()) => Tri::False,
                    _ => all_factors(factors, Self::is_bounded),
                }
            },
            Self::Pow(base, exp) => {
                let nonnegative_integer = exp.is_integer().is_true() && exp.is_nonnegative().is_true();
                let finite_numbers = base.as_number().is_some_and(|b| b.is_finite() && !b.is_zero())
                    && exp.as_number().is_some_and(Number::is_finite);
                if base.is_bounded().is_true() && nonnegative_integer {
                    Tri::True
                } else if finite_numbers {
                    Tri::True
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be unbounded.
    pub fn is_unbounded(&self) -> Tri {
        !self.is_bounded()
    }

    /// Returns true if the expression is known to be an integer.
    pub fn is_integer(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.is_integer()),
            },
            Self::Primary(Primary::Symbol(sym)) => sym.facts().integer,
            Self::Primary(Primary::Call(Func::Sign, args)) => match &args[..] {
                [arg] => arg.is_real().implies(Tri::True),
                _ => Tri::Unknown,
            },
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => all_terms(terms, Self::is_integer),
            Self::Mul(factors) => all_factors(factors, Self::is_integer),
            Self::Pow(base, exp) => {
                if base.is_integer().is_true()
                    && exp.is_integer().is_true()
                    && exp.is_nonnegative().is_true()
                {
                    Tri::True
                } else if base.is_number() && exp.is_number() {
                    // numeric powers that survive canonicalization are not integers
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be rational.
    pub fn is_rational(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.is_finite()),
            },
            Self::Primary(Primary::Symbol(sym)) => sym.facts().integer.implies(Tri::True),
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => {
                let rationals = terms.iter().filter(|t| t.is_rational().is_true()).count();
                let irrationals = terms.iter().filter(|t| t.is_irrational().is_true()).count();
                if rationals == terms.len() {
                    Tri::True
                } else if irrationals == 1 && rationals + 1 == terms.len() {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
            Self::Mul(factors) => all_factors(factors, Self::is_rational),
            Self::Pow(base, exp) => {
                if base.is_rational().is_true() && exp.is_integer().is_true() {
                    Tri::True
                } else {
                    !self.is_irrational()
                }
            },
        }
    }

    /// Returns true if the expression is known to be irrational.
    pub fn is_irrational(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                _ => Tri::False,
            },
            Self::Primary(Primary::Symbol(sym)) => sym.facts().integer.implies(Tri::False),
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => {
                let mut any_irrational = false;
                for term in terms.iter() {
                    match term.is_irrational() {
                        Tri::True => any_irrational = true,
                        Tri::Unknown => return Tri::Unknown,
                        Tri::False => {},
                    }
                }
                Tri::from(any_irrational)
            },
            Self::Mul(factors) => {
                let irrationals = factors.iter().filter(|f| f.is_irrational().is_true()).count();
                let nonzero_rationals = factors.iter()
                    .filter(|f| f.is_rational().is_true() && f.is_nonzero().is_true())
                    .count();
                if irrationals == 1 && irrationals + nonzero_rationals == factors.len() {
                    Tri::True
                } else if nonzero_rationals == factors.len() {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
            Self::Pow(base, exp) => {
                let numeric_root = base.as_number().is_some_and(|b| b.is_finite() && b.is_positive())
                    && exp.as_number().is_some_and(|e| e.is_finite() && !e.is_integer());
                if numeric_root {
                    // positive rational roots that survive canonicalization are irrational
                    Tri::True
                } else if base.is_rational().is_true() && exp.is_integer().is_true() {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be comparable, i.e. a real constant that can
    /// be ordered against numbers.
    pub fn is_comparable(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => Tri::from(n.sign().is_some()),
            Self::Primary(Primary::Symbol(_) | Primary::Wild(_) | Primary::Function(_)) => Tri::False,
            Self::Primary(Primary::Call(func, args)) => match func {
                Func::Named(_) => Tri::False,
                Func::Log => match &args[..] {
                    [arg] => arg.is_comparable().and(arg.is_positive()),
                    _ => Tri::False,
                },
                _ => all_terms(args, Self::is_comparable),
            },
            Self::Add(terms) => all_terms(terms, Self::is_comparable),
            Self::Mul(factors) => all_terms(factors, Self::is_comparable),
            Self::Pow(base, exp) => base.is_comparable().and(exp.is_comparable()),
            Self::Order(..) => Tri::False,
        }
    }

    /// Returns true if the expression is known to be an odd integer.
    pub fn is_odd(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.as_integer().is_some_and(|i| i.is_odd())),
            },
            Self::Add(terms) => {
                let rest = terms.iter()
                    .filter(|t| !t.is_even().is_true())
                    .cloned()
                    .collect::<Vec<_>>();
                match rest.split_first() {
                    None => Tri::False,
                    Some((first, others)) if first.is_odd().is_true() => {
                        Expr::sum(others.to_vec()).is_even()
                    },
                    Some(_) => Tri::Unknown,
                }
            },
            Self::Mul(factors) => {
                if factors.iter().all(|f| f.is_odd().is_true()) {
                    Tri::True
                } else if factors.iter().all(|f| f.is_integer().is_true())
                    && factors.iter().any(|f| f.is_even().is_true())
                {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
            Self::Pow(base, exp) if exp.is_integer().is_true() && exp.is_nonnegative().is_true() => {
                base.is_odd().implies(Tri::True)
            },
            _ => match self.is_integer() {
                Tri::False => Tri::False,
                _ => Tri::Unknown,
            },
        }
    }

    /// Returns true if the expression is known to be an even integer.
    pub fn is_even(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.as_integer().is_some_and(|i| i.is_even())),
            },
            Self::Mul(factors) => {
                if factors.iter().all(|f| f.is_integer().is_true())
                    && factors.iter().any(|f| f.is_even().is_true())
                {
                    Tri::True
                } else if factors.iter().all(|f| f.is_odd().is_true()) {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
            Self::Pow(base, exp) if exp.is_integer().is_true() && exp.is_positive().is_true() => {
                base.is_even().implies(Tri::True)
            },
            _ => match (self.is_integer(), self.is_odd()) {
                (Tri::False, _) => Tri::False,
                (_, Tri::True) => Tri::False,
                (Tri::True, Tri::False) => Tri::True,
                _ => Tri::Unknown,
            },
        }
    }

    /// Returns true if the expression is known to be strictly positive.
    pub fn is_positive(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.is_positive()),
            },
            Self::Primary(Primary::Symbol(sym)) => {
                if sym.facts().negative.is_true() {
                    Tri::False
                } else {
                    sym.facts().positive
                }
            },
            Self::Primary(Primary::Call(func, args)) => match (func, &args[..]) {
                (Func::Exp, [arg]) => arg.is_real().implies(Tri::True),
                (Func::Log, [arg]) => match arg.as_number().and_then(cmp_one) {
                    Some(Ordering::Greater) => Tri::True,
                    Some(_) if arg.is_positive().is_true() => Tri::False,
                    _ => (arg - &Expr::one()).is_positive().implies(Tri::True),
                },
                (Func::Sign, [arg]) => arg.is_positive(),
                _ => Tri::Unknown,
            },
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => {
                let (c, r) = first_and_rest(terms);
                if c.is_positive().is_true() && r.is_positive().is_true() {
                    return Tri::True;
                }
                if c.is_unbounded().is_true() {
                    if r.is_unbounded().is_true() {
                        return Tri::Unknown;
                    }
                    return c.is_positive();
                } else if r.is_unbounded().is_true() {
                    return r.is_positive();
                }
                if c.is_nonnegative().is_true() && r.is_positive().is_true() {
                    return Tri::True;
                }
                if r.is_nonnegative().is_true() && c.is_positive().is_true() {
                    return Tri::True;
                }
                if c.is_nonpositive().is_true() && r.is_nonpositive().is_true() {
                    return Tri::False;
                }
                Tri::Unknown
            },
            Self::Mul(factors) => match product_sign(factors) {
                Some(positive) => Tri::from(positive),
                None => Tri::Unknown,
            },
            Self::Pow(base, exp) => {
                if base.is_positive().is_true() && exp.is_real().is_true() {
                    Tri::True
                } else if base.is_real().is_true()
                    && base.is_nonzero().is_true()
                    && exp.is_even().is_true()
                {
                    Tri::True
                } else if base.is_negative().is_true() && exp.is_odd().is_true() {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be strictly negative.
    pub fn is_negative(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(n.is_negative()),
            },
            Self::Primary(Primary::Symbol(sym)) => {
                if sym.facts().positive.is_true() {
                    Tri::False
                } else {
                    sym.facts().negative
                }
            },
            Self::Primary(Primary::Call(func, args)) => match (func, &args[..]) {
                (Func::Exp, [arg]) => arg.is_real().implies(Tri::False),
                (Func::Log, [arg]) => match arg.as_number().and_then(cmp_one) {
                    Some(Ordering::Less) if arg.is_positive().is_true() => Tri::True,
                    Some(_) => Tri::False,
                    None => Tri::Unknown,
                },
                (Func::Sign, [arg]) => arg.is_negative(),
                _ => Tri::Unknown,
            },
            Self::Primary(_) | Self::Order(..) => Tri::Unknown,
            Self::Add(terms) => {
                let (c, r) = first_and_rest(terms);
                if c.is_negative().is_true() && r.is_negative().is_true() {
                    return Tri::True;
                }
                if c.is_unbounded().is_true() {
                    if r.is_unbounded().is_true() {
                        return Tri::Unknown;
                    }
                    return c.is_negative();
                } else if r.is_unbounded().is_true() {
                    return r.is_negative();
                }
                if c.is_nonpositive().is_true() && r.is_negative().is_true() {
                    return Tri::True;
                }
                if r.is_nonpositive().is_true() && c.is_negative().is_true() {
                    return Tri::True;
                }
                if c.is_nonnegative().is_true() && r.is_nonnegative().is_true() {
                    return Tri::False;
                }
                Tri::Unknown
            },
            Self::Mul(factors) => match product_sign(factors) {
                Some(positive) => Tri::from(!positive),
                None => Tri::Unknown,
            },
            Self::Pow(base, exp) => {
                if base.is_negative().is_true() && exp.is_odd().is_true() {
                    Tri::True
                } else if base.is_positive().is_true() && exp.is_real().is_true() {
                    Tri::False
                } else if base.is_real().is_true() && exp.is_even().is_true() {
                    Tri::False
                } else {
                    Tri::Unknown
                }
            },
        }
    }

    /// Returns true if the expression is known to be nonzero.
    pub fn is_nonzero(&self) -> Tri {
        match self {
            Self::Primary(Primary::Number(n)) => match n {
                Number::NaN => Tri::Unknown,
                n => Tri::from(!n.is_zero()),
            },
            Self::Primary(Primary::Call(Func::Exp, args)) if args.len() == 1 => {
                args[0].is_bounded().implies(Tri::True)
            },
            Self::Mul(factors) => all_factors(factors, Self::is_nonzero),
            Self::Pow(base, exp) => base.is_nonzero().and(exp.is_bounded()).implies(Tri::True),
            _ => self.is_positive().or(self.is_negative()).implies(Tri::True),
        }
    }

    /// Returns true if the expression is known to be real and not negative.
    pub fn is_nonnegative(&self) -> Tri {
        if let Some(n) = self.as_number() {
            return match n.sign() {
                Some(sign) => Tri::from(sign != Ordering::Less),
                None => Tri::Unknown,
            };
        }
        if let Self::Pow(base, exp) = self {
            if base.is_real().is_true() && exp.is_even().is_true() {
                return Tri::True;
            }
        }
        if self.is_positive().is_true() {
            Tri::True
        } else if self.is_negative().is_true() {
            Tri::False
        } else {
            Tri::Unknown
        }
    }

    /// Returns true if the expression is known to be real and not positive.
    pub fn is_nonpositive(&self) -> Tri {
        if let Some(n) = self.as_number() {
            return match n.sign() {
                Some(sign) => Tri::from(sign != Ordering::Greater),
                None => Tri::Unknown,
            };
        }
        if self.is_negative().is_true() {
            Tri::True
        } else if self.is_positive().is_true() {
            Tri::False
        } else {
            Tri::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Symbol;
    use super::*;

    fn positive(name: &str) -> Expr {
        Expr::from(Symbol::new(name).positive())
    }

    fn integer(name: &str) -> Expr {
        Expr::from(Symbol::new(name).integer())
    }

    #[test]
    fn sum_template() {
        let x = Expr::symbol("x");
        let r = Expr::from(Symbol::new("r").real());
        assert_eq!((r.clone() + Expr::one()).is_real(), Tri::True);
        assert_eq!((r.clone() + x.clone()).is_real(), Tri::Unknown);
        assert_eq!((r + Expr::complex_infinity()).is_real(), Tri::False);

        let n = integer("n");
        assert_eq!((n.clone() + Expr::int(3)).is_integer(), Tri::True);
        assert_eq!((n + Expr::rational(1, 2)).is_integer(), Tri::False);
    }

    #[test]
    fn odd_sums() {
        let n = integer("n");
        let two_n = Expr::int(2) * n.clone();

        // 2n + 1 is odd
        assert_eq!((two_n.clone() + Expr::one()).is_odd(), Tri::True);

        // 2n + 2 is not odd
        assert_eq!((two_n.clone() + Expr::int(2)).is_odd(), Tri::False);

        // n + 1 is undecided
        assert_eq!((n.clone() + Expr::one()).is_odd(), Tri::Unknown);

        // 2n + 1 + 1 = 2n + 2 is even
        assert_eq!((two_n + Expr::int(2)).is_even(), Tri::True);
    }

    #[test]
    fn irrational_sums() {
        let sqrt2 = Expr::int(2).sqrt();
        assert_eq!(sqrt2.is_irrational(), Tri::True);
        assert_eq!((sqrt2.clone() + Expr::one()).is_irrational(), Tri::True);
        assert_eq!((sqrt2 + Expr::symbol("x")).is_irrational(), Tri::Unknown);
        assert_eq!((integer("n") + Expr::one()).is_irrational(), Tri::False);
    }

    #[test]
    fn positive_sums() {
        let p = positive("p");
        let q = positive("q");
        assert_eq!((p.clone() + q.clone()).is_positive(), Tri::True);
        assert_eq!((p.clone() + Expr::one()).is_positive(), Tri::True);
        assert_eq!((-p.clone() - q.clone()).is_positive(), Tri::False);
        assert_eq!((-p.clone() - q.clone()).is_negative(), Tri::True);
        assert_eq!((p.clone() - q.clone()).is_positive(), Tri::Unknown);

        // an unbounded term dominates a bounded one
        let u = Expr::from(Symbol::new("u").positive().unbounded());
        assert_eq!((u.clone() - Expr::int(5)).is_positive(), Tri::True);
        assert_eq!((Expr::int(5) - u.clone()).is_negative(), Tri::True);

        // two unbounded terms are undecided
        let v = Expr::from(Symbol::new("v").positive().unbounded());
        assert_eq!((u - v).is_positive(), Tri::Unknown);
    }

    #[test]
    fn products_and_powers() {
        let p = positive("p");
        let x = Expr::symbol("x");
        assert_eq!((Expr::int(-2) * p.clone()).is_negative(), Tri::True);
        assert_eq!((p.clone() * x.clone()).is_positive(), Tri::Unknown);
        assert_eq!(Expr::power(p.clone(), x).is_positive(), Tri::Unknown);
        assert_eq!(Expr::power(p.clone(), Expr::rational(1, 3)).is_positive(), Tri::True);
        assert_eq!(Expr::exp(p.clone()).is_positive(), Tri::True);
        assert_eq!(Expr::log(Expr::int(2)).is_positive(), Tri::True);
        assert_eq!(Expr::log(Expr::rational(1, 2)).is_negative(), Tri::True);
    }

    #[test]
    fn boundedness() {
        assert_eq!(Expr::infinity().is_bounded(), Tri::False);
        assert_eq!(Expr::int(3).sqrt().is_bounded(), Tri::True);
        assert_eq!(Expr::symbol("x").is_bounded(), Tri::Unknown);
        assert_eq!(Expr::from(Symbol::new("n").integer()).is_bounded(), Tri::True);
    }
}

//! Structural substitution.
//!
//! [`Expr::subs`] replaces occurrences of one expression with another, rebuilding every node it
//! passes through with the canonical constructors, so the result is canonical again. Sums get
//! special treatment: `old` does not need to occur as a literal child of the sum.
//!
//! - `(2 + a).subs(3 + a, y)` is `y - 1`, since both sums share the terms `[a]`.
//! - `(a + b + c + d).subs(b + c, x)` is `a + x + d` when `b, c` is a contiguous run of the sum's
//!   terms in canonical order.
//!
//! Substituting a function-class marker ([`Expr::function`]) for another re-heads every call of
//! that function, so `exp(x).subs(exp, log)` is `log(x)`.

use crate::expr::{Expr, Primary};

impl Expr {
    /// Substitutes `new` for every occurrence of `old` in the expression.
    pub fn subs(&self, old: &Expr, new: &Expr) -> Expr {
        if self == old {
            return new.clone();
        }
        if !matches!(old, Expr::Add(_)) && !self.has(old) {
            return self.clone();
        }

        match self {
            Self::Add(_) => self.subs_in_sum(old, new),
            Self::Primary(Primary::Call(func, args)) => match (old, new) {
                (
                    Self::Primary(Primary::Function(old_func)),
                    Self::Primary(Primary::Function(new_func)),
                ) if func == old_func => Expr::call(
                    new_func.clone(),
                    args.iter().map(|arg| arg.subs(old, new)).collect(),
                ),
                _ => self.map_children(|child| child.subs(old, new)),
            },
            _ => self.map_children(|child| child.subs(old, new)),
        }
    }

    /// Applies each substitution in turn.
    pub fn subs_all(&self, pairs: &[(Expr, Expr)]) -> Expr {
        pairs.iter().fold(self.clone(), |acc, (old, new)| acc.subs(old, new))
    }

    fn subs_in_sum(&self, old: &Expr, new: &Expr) -> Expr {
        if matches!(old, Self::Primary(Primary::Function(_))) {
            return self.map_children(|term| term.subs(old, new));
        }

        let (coeff1, factors1) = self.as_coeff_factors();
        let (coeff2, factors2) = old.as_coeff_factors();

        // (2 + a).subs(3 + a, y) = y + 2 - 3
        if factors1 == factors2 {
            return Expr::sum(vec![new.clone(), coeff1, -coeff2]);
        }

        // (a + b + c + d).subs(b + c, x) = a + x + d
        if matches!(old, Self::Add(_)) && factors2.len() < factors1.len() {
            let len = factors2.len();
            let found = factors1.windows(len).position(|window| window == factors2.as_slice());
            if let Some(i) = found {
                let mut terms = Vec::with_capacity(factors1.len() - len + 2);
                terms.push(&coeff1 - &coeff2);
                terms.extend(factors1[..i].iter().cloned());
                terms.push(new.clone());
                terms.extend(factors1[i + len..].iter().cloned());
                return Expr::sum(terms);
            }
        }

        self.map_children(|term| term.subs(old, new))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::func::Func;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn symbol_substitution() {
        // x^2 + x at x = 2
        let e = Expr::power(x(), Expr::int(2)) + x();
        assert_eq!(e.subs(&x(), &Expr::int(2)), Expr::int(6));

        let f = Expr::call(Func::named("f"), vec![x()]);
        let y = Expr::symbol("y");
        assert_eq!(f.subs(&x(), &y), Expr::call(Func::named("f"), vec![y]));
    }

    #[test]
    fn absent_old_is_identity() {
        let z = Expr::symbol("z");
        let e = Expr::exp(x()) * (x() + Expr::one()) + Expr::log(x());
        assert_eq!(e.subs(&z, &Expr::one()), e);
        assert_eq!(e.subs(&Expr::function(Func::Sin), &Expr::function(Func::Cos)), e);
    }

    #[test]
    fn sum_constant_shift() {
        let a = Expr::symbol("a");
        let y = Expr::symbol("y");
        let e = Expr::int(2) + a.clone();
        assert_eq!(e.subs(&(Expr::int(3) + a), &y), y - Expr::one());
    }

    #[test]
    fn sum_contiguous_splice() {
        let names = ["a", "b", "c", "d"];
        let e = Expr::sum(names.iter().map(|n| Expr::symbol(n)).collect());
        let (_, terms) = e.as_coeff_factors();
        let old = Expr::sum(terms[1..3].to_vec());
        let new = Expr::symbol("u");
        let expected = Expr::sum(vec![terms[0].clone(), new.clone(), terms[3].clone()]);
        assert_eq!(e.subs(&old, &new), expected);
    }

    #[test]
    fn function_class() {
        let exp = Expr::function(Func::Exp);
        let log = Expr::function(Func::Log);
        assert_eq!(Expr::exp(x()).subs(&exp, &log), Expr::log(x()));

        let e = Expr::exp(x()) + Expr::one();
        assert_eq!(e.subs(&exp, &log), Expr::log(x()) + Expr::one());
    }

    #[test]
    fn sequential_substitution() {
        let y = Expr::symbol("y");
        let e = x() + y.clone();
        let pairs = [(x(), y.clone()), (y.clone(), Expr::int(3))];
        assert_eq!(e.subs_all(&pairs), Expr::int(6));
    }
}

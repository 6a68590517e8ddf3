//! The canonical product builder, and expansion of products over sums.
//!
//! [`mul`] applies the following rules:
//!
//! - Nested products are spliced: `a * (b * c) = a * b * c`
//! - All numbers are folded into a single leading coefficient: `2 * x * 3 = 6x`
//! - Powers of the same base are merged: `x * x^2 = x^3`, `sqrt(6) * sqrt(6) = 6`
//! - `0` absorbs every other factor, and `nan` absorbs everything
//! - A rational coefficient times a single sum is distributed: `2 * (x + y) = 2x + 2y`
//! - Commutative factors are sorted into canonical order; non-commutative factors keep their
//!   relative order and are placed after them.

use crate::{
    expr::{sort_canonical, Expr, Primary},
    number::Number,
};
use std::collections::VecDeque;

/// Maximum number of times merged powers are re-merged after evaluating into products, e.g.
/// `sqrt(8) = 2*sqrt(2)`.
const MAX_PASSES: usize = 4;

/// Splits a factor into its base and exponent: `x^2` becomes `(x, 2)` and `x` becomes `(x, 1)`.
fn split_power(factor: Expr) -> (Expr, Expr) {
    match factor {
        Expr::Pow(base, exp) => ((*base).clone(), (*exp).clone()),
        other => (other, Expr::one()),
    }
}

/// Adds `(base, exp)` to the list of commutative powers, merging with an existing equal base.
fn push_power(powers: &mut Vec<(Expr, Vec<Expr>)>, base: Expr, exp: Expr) {
    match powers.iter_mut().find(|(b, _)| *b == base) {
        Some((_, exps)) => exps.push(exp),
        None => powers.push((base, vec![exp])),
    }
}

/// Merges powers of positive rational bases that share the same rational exponent:
/// `sqrt(2) * sqrt(3) = sqrt(6)`.
fn merge_numeric_roots(powers: &mut Vec<(Expr, Expr)>) {
    let mut roots: Vec<(Number, Number)> = Vec::new();
    powers.retain(|(base, exp)| {
        match (base.as_number(), exp.as_number()) {
            (Some(b), Some(e)) if b.is_positive() && b.is_finite() && e.is_finite() => {
                match roots.iter_mut().find(|(root_exp, _)| root_exp == e) {
                    Some((_, product)) => *product = &*product * b,
                    None => roots.push((e.clone(), b.clone())),
                }
                false
            },
            _ => true,
        }
    });
    powers.extend(roots.into_iter().map(|(exp, base)| (Expr::number(base), Expr::number(exp))));
}

/// Builds the canonical product of the given factors.
pub fn mul(factors: Vec<Expr>) -> Expr {
    let mut coeff = Number::one();
    let mut queue = VecDeque::from(factors);
    let mut commutative = Vec::new();
    let mut noncommutative: Vec<(Expr, Vec<Expr>)> = Vec::new();

    for pass in 0..MAX_PASSES {
        let mut powers: Vec<(Expr, Vec<Expr>)> = Vec::new();
        while let Some(factor) = queue.pop_front() {
            match factor {
                Expr::Primary(Primary::Number(n)) => coeff = &coeff * &n,
                Expr::Mul(children) => {
                    for child in children.iter().rev() {
                        queue.push_front(child.clone());
                    }
                },
                factor if factor.is_commutative() => {
                    let (base, exp) = split_power(factor);
                    push_power(&mut powers, base, exp);
                },
                factor => {
                    let (base, exp) = split_power(factor);
                    match noncommutative.last_mut() {
                        Some((last, exps)) if *last == base => exps.push(exp),
                        _ => noncommutative.push((base, vec![exp])),
                    }
                },
            }
        }

        let mut merged = powers.into_iter()
            .map(|(base, exps)| (base, Expr::sum(exps)))
            .collect::<Vec<_>>();
        merge_numeric_roots(&mut merged);

        commutative.clear();
        let mut requeued = false;
        for (base, exp) in merged {
            match Expr::power(base, exp) {
                Expr::Primary(Primary::Number(n)) => coeff = &coeff * &n,
                Expr::Mul(children) if pass + 1 < MAX_PASSES => {
                    requeued = true;
                    queue.extend(children.iter().cloned());
                },
                Expr::Mul(children) => commutative.extend(children.iter().cloned()),
                power => commutative.push(power),
            }
        }

        if !requeued {
            break;
        }
        queue.extend(commutative.drain(..));
    }

    if coeff.is_nan() {
        return Expr::nan();
    }
    if coeff.is_zero() {
        return Expr::zero();
    }

    sort_canonical(&mut commutative);

    // 2 * (x + y) = 2x + 2y
    if noncommutative.is_empty() && commutative.len() == 1 && coeff.is_finite() && !coeff.is_one() {
        if let Expr::Add(terms) = &commutative[0] {
            return Expr::sum(terms.iter()
                .map(|term| Expr::product(vec![Expr::number(coeff.clone()), term.clone()]))
                .collect());
        }
    }

    let mut result = Vec::with_capacity(commutative.len() + noncommutative.len() + 1);
    if !coeff.is_one() {
        result.push(Expr::number(coeff));
    }
    result.extend(commutative);
    for (base, exps) in noncommutative {
        match Expr::power(base, Expr::sum(exps)) {
            Expr::Primary(Primary::Number(n)) if n.is_one() => {},
            power => result.push(power),
        }
    }

    match result.len() {
        0 => Expr::one(),
        1 => result.remove(0),
        _ => Expr::Mul(result.into()),
    }
}

/// Multiplies out two expanded expressions, distributing over the terms of either side.
fn multiply_out(lhs: &Expr, rhs: &Expr) -> Expr {
    let lhs_terms = lhs.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![lhs.clone()]);
    let rhs_terms = rhs.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![rhs.clone()]);
    let mut terms = Vec::with_capacity(lhs_terms.len() * rhs_terms.len());
    for a in &lhs_terms {
        for b in &rhs_terms {
            terms.push(Expr::product(vec![a.clone(), b.clone()]));
        }
    }
    Expr::sum(terms)
}

/// Largest exponent for which a power of a sum is multiplied out.
const MAX_EXPAND_EXPONENT: i32 = 64;

/// Expands the expression by distributing products over sums, and multiplying out positive
/// integer powers of sums.
///
/// `(x + 1)^2` becomes `1 + 2x + x^2`, and `(a + b)(c + d)` becomes `ac + ad + bc + bd`. Negative
/// integer powers of sums expand their denominator: `(x + 1)^-2 = (1 + 2x + x^2)^-1`.
pub fn expand(expr: &Expr) -> Expr {
    match expr {
        Expr::Add(terms) => Expr::sum(terms.iter().map(expand).collect()),
        Expr::Mul(factors) => factors.iter()
            .map(expand)
            .fold(Expr::one(), |acc, factor| multiply_out(&acc, &factor)),
        Expr::Pow(base, exp) => {
            let base = expand(base);
            let exp = expand(exp);
            let n = exp.as_number().and_then(Number::to_i32);
            match n {
                Some(n) if base.terms().is_some() && n != 0 && n.abs() <= MAX_EXPAND_EXPONENT => {
                    let mut acc = base.clone();
                    for _ in 1..n.abs() {
                        acc = multiply_out(&acc, &base);
                    }
                    if n < 0 {
                        Expr::power(acc, Expr::neg_one())
                    } else {
                        acc
                    }
                },
                _ => Expr::power(base, exp),
            }
        },
        Expr::Primary(Primary::Call(..)) | Expr::Order(..) => expr.map_children(expand),
        Expr::Primary(_) => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Symbol;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn coefficients_fold() {
        assert_eq!(mul(vec![Expr::int(2), x(), Expr::int(3)]), mul(vec![Expr::int(6), x()]));
        assert_eq!(mul(vec![Expr::zero(), x()]), Expr::zero());
        assert_eq!(mul(vec![Expr::one(), x()]), x());
        assert_eq!(mul(vec![]), Expr::one());
    }

    #[test]
    fn merge_powers() {
        // x * x^2 = x^3
        assert_eq!(mul(vec![x(), Expr::power(x(), Expr::int(2))]), Expr::power(x(), Expr::int(3)));

        // x * x^-1 = 1
        assert_eq!(mul(vec![x(), Expr::power(x(), Expr::neg_one())]), Expr::one());

        // sqrt(6) * sqrt(6) = 6
        let s = Expr::int(6).sqrt();
        assert_eq!(mul(vec![s.clone(), s]), Expr::int(6));

        // sqrt(2) * sqrt(8) = 4
        assert_eq!(mul(vec![Expr::int(2).sqrt(), Expr::int(8).sqrt()]), Expr::int(4));

        // sqrt(2) * sqrt(3) = sqrt(6)
        assert_eq!(mul(vec![Expr::int(2).sqrt(), Expr::int(3).sqrt()]), Expr::int(6).sqrt());

        // sqrt(2) * sqrt(6) = 2*sqrt(3)
        let e = mul(vec![Expr::int(2).sqrt(), Expr::int(6).sqrt()]);
        assert_eq!(e, Expr::Mul(vec![Expr::int(2), Expr::int(3).sqrt()].into()));
    }

    #[test]
    fn canonical_order() {
        assert_eq!(mul(vec![x(), y()]), mul(vec![y(), x()]));
    }

    #[test]
    fn distribute_coefficient() {
        let e = mul(vec![Expr::int(2), x() + y()]);
        assert_eq!(e, Expr::int(2) * x() + Expr::int(2) * y());
    }

    #[test]
    fn noncommutative_order_kept() {
        let a = Expr::from(Symbol::new("A").noncommutative());
        let b = Expr::from(Symbol::new("B").noncommutative());
        assert_ne!(mul(vec![a.clone(), b.clone()]), mul(vec![b.clone(), a.clone()]));
        assert_eq!(mul(vec![a.clone(), a.clone()]), Expr::power(a, Expr::int(2)));
    }

    #[test]
    fn expand_square() {
        // (x + 1)^2 = 1 + 2x + x^2
        let e = expand(&Expr::power(x() + Expr::one(), Expr::int(2)));
        let expected = Expr::sum(vec![
            Expr::one(),
            Expr::int(2) * x(),
            Expr::power(x(), Expr::int(2)),
        ]);
        assert_eq!(e, expected);
    }

    #[test]
    fn expand_radicals() {
        // (sqrt(2) + sqrt(3))^2 = 5 + 2*sqrt(6)
        let e = Expr::power(Expr::int(2).sqrt() + Expr::int(3).sqrt(), Expr::int(2));
        let expected = Expr::int(5) + Expr::int(2) * Expr::int(6).sqrt();
        assert_eq!(expand(&e), expected);
    }

    #[test]
    fn expand_product_of_sums() {
        let z = Expr::symbol("z");
        let e = expand(&((x() + y()) * (x() - z.clone())));
        let expected = Expr::sum(vec![
            Expr::power(x(), Expr::int(2)),
            -(x() * z.clone()),
            x() * y(),
            -(y() * z),
        ]);
        assert_eq!(e, expected);
    }
}

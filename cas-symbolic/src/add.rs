//! The canonical sum builder.
//!
//! [`flatten`] takes an arbitrary sequence of terms and produces the argument list of a canonical
//! sum. The rules applied, in order, are:
//!
//! - Nested sums are spliced into the sequence: `a + (b + c) = a + b + c`
//! - All numbers are folded into a single coefficient: `2 + x + 3 = 5 + x`
//! - Like terms are combined: `x + 2x = 3x`, `2xy - yx = xy`
//! - Terms whose coefficient becomes zero disappear: `x - x = 0`
//! - `nan` absorbs everything: `nan + x = nan`
//! - An infinite coefficient absorbs every term known to be bounded: `oo + 5 + b = oo` for
//!   bounded `b`, while `oo + x` is kept for unbounded or unknown `x`
//! - Order terms absorb the terms they contain: `x^2 + O(x) = O(x)`, and of two order terms
//!   only the weaker survives: `O(x) + O(x^2) = O(x)`
//! - Non-number terms are sorted into canonical order, and the coefficient, if nonzero, goes
//!   first.

use crate::{
    expr::{sort_canonical, Expr, Primary},
    number::Number,
    order::order_contains,
};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// The result of [`flatten`]ing a sequence of terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    /// The canonical terms, if every one of them is commutative.
    pub commutative: Vec<Expr>,

    /// The canonical terms, if at least one of them is non-commutative.
    pub noncommutative: Vec<Expr>,

    /// The order terms that survived absorption. They are also present in the term sequence.
    pub order: Vec<Expr>,
}

impl Flattened {
    /// Returns the canonical term sequence, whichever list it was reported in.
    pub fn into_terms(self) -> Vec<Expr> {
        if self.noncommutative.is_empty() {
            self.commutative
        } else {
            self.noncommutative
        }
    }
}

/// Splits a term into its numeric coefficient and the remaining factor.
///
/// `2*x*y` becomes `(2, x*y)`, and `x` becomes `(1, x)`.
fn split_coefficient(term: Expr) -> (Number, Expr) {
    if let Expr::Mul(factors) = &term {
        if let Some((Some(coeff), rest)) = factors.split_first().map(|(c, r)| (c.as_number(), r)) {
            return (coeff.clone(), Expr::product(rest.to_vec()));
        }
    }
    (Number::one(), term)
}

/// Flattens a sequence of terms into the argument list of a canonical sum.
///
/// See the [module-level documentation](self) for the rules that are applied.
pub fn flatten(seq: Vec<Expr>) -> Flattened {
    let mut coeff = Number::zero();
    let mut terms: FxHashMap<Expr, Number> = FxHashMap::default();
    let mut order_factors: Vec<Expr> = Vec::new();

    let mut queue = VecDeque::from(seq);
    while let Some(term) = queue.pop_front() {
        let (c, s) = match term {
            Expr::Order(..) => {
                if order_factors.iter().any(|o| order_contains(o, &term)) {
                    continue;
                }
                order_factors.retain(|o| !order_contains(&term, o));
                order_factors.insert(0, term);
                continue;
            },
            Expr::Primary(Primary::Number(n)) => {
                coeff = &coeff + &n;
                continue;
            },
            Expr::Add(children) => {
                for child in children.iter().rev() {
                    queue.push_front(child.clone());
                }
                continue;
            },
            term => split_coefficient(term),
        };

        let entry = terms.entry(s).or_insert_with(Number::zero);
        *entry = &*entry + &c;
    }

    let mut newseq = Vec::with_capacity(terms.len());
    for (s, c) in terms {
        if c.is_zero() {
            continue;
        }
        let term = if c.is_one() {
            s
        } else {
            Expr::product(vec![Expr::number(c), s])
        };

        // a special coefficient can collapse a product into a number
        match term.as_number() {
            Some(n) => coeff = &coeff + n,
            None => newseq.push(term),
        }
    }

    if coeff.is_nan() {
        return Flattened {
            commutative: vec![Expr::nan()],
            ..Default::default()
        };
    }

    if coeff.is_infinite() {
        newseq.retain(|term| !term.is_bounded().is_true());
    }

    if !order_factors.is_empty() {
        newseq.retain(|term| !order_factors.iter().any(|o| order_contains(o, term)));
        let constant = Expr::number(coeff.clone());
        if coeff.is_finite() && order_factors.iter().any(|o| order_contains(o, &constant)) {
            coeff = Number::zero();
        }
        newseq.extend(order_factors.iter().cloned());
    }

    sort_canonical(&mut newseq);
    if !coeff.is_zero() {
        newseq.insert(0, Expr::number(coeff));
    }

    if newseq.iter().all(Expr::is_commutative) {
        Flattened {
            commutative: newseq,
            noncommutative: Vec::new(),
            order: order_factors,
        }
    } else {
        Flattened {
            commutative: Vec::new(),
            noncommutative: newseq,
            order: order_factors,
        }
    }
}

/// Trivially downgrades a term sequence into an expression: no terms is `0`, and a single term is
/// that term.
fn downgrade(mut terms: Vec<Expr>) -> Expr {
    match terms.len() {
        0 => Expr::zero(),
        1 => terms.remove(0),
        _ => Expr::Add(terms.into()),
    }
}

/// Builds the canonical sum of the given terms.
pub fn add(terms: Vec<Expr>) -> Expr {
    downgrade(flatten(terms).into_terms())
}

//! Structural pattern matching.
//!
//! A pattern is an ordinary expression containing [`Wild`] placeholders. [`matches`] finds an
//! assignment of subexpressions to the placeholders such that substituting them into the pattern
//! reproduces the expression, up to canonical form.
//!
//! Sums and products are matched as collections: each structured element of the pattern is
//! assigned to a distinct element of the expression (backtracking if a later element fails), and
//! whatever is left over is bound to the first bare placeholder of the pattern. The remaining bare
//! placeholders are bound to the neutral element (`0` for sums, `1` for products).
//!
//! ```
//! use cas_symbolic::{pattern::matches, Expr};
//!
//! let x = Expr::symbol("x");
//! let pattern = Expr::wild("w") + Expr::int(3);
//!
//! // x + 5 = (x + 2) + 3
//! let bindings = matches(&pattern, &(x.clone() + Expr::int(5))).unwrap();
//! assert_eq!(bindings.get("w"), Some(&(x + Expr::int(2))));
//! ```

use crate::expr::{Expr, Primary, Wild};
use rustc_hash::FxHashMap;

/// The subexpressions bound to each placeholder of a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(FxHashMap<Wild, Expr>);

impl Bindings {
    /// Returns the subexpression bound to the placeholder with the given name.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0.get(&Wild::new(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Binds `wild` to `expr`, or checks that an existing binding is equal to it.
    fn bind(mut self, wild: &Wild, expr: &Expr) -> Option<Self> {
        match self.0.get(wild) {
            Some(bound) if bound == expr => Some(self),
            Some(_) => None,
            None => {
                self.0.insert(wild.clone(), expr.clone());
                Some(self)
            },
        }
    }
}

/// Matches `expr` against `pattern`, returning the placeholder bindings if it matches.
pub fn matches(pattern: &Expr, expr: &Expr) -> Option<Bindings> {
    match_into(pattern, expr, Bindings::default())
}

impl Expr {
    /// Matches this expression against `pattern`. See [`matches`].
    pub fn match_pattern(&self, pattern: &Expr) -> Option<Bindings> {
        matches(pattern, self)
    }
}

fn match_into(pattern: &Expr, expr: &Expr, bindings: Bindings) -> Option<Bindings> {
    if let Some(wild) = pattern.as_wild() {
        return bindings.bind(wild, expr);
    }
    if !pattern.has_wild() {
        return (pattern == expr).then_some(bindings);
    }

    match pattern {
        Expr::Add(terms) => match terms.split_first() {
            // (w + 3) against x + 5 matches w against x + 2
            Some((first, rest)) if first.is_number() => {
                let shifted = expr - first;
                match_into(&Expr::sum(rest.to_vec()), &shifted, bindings)
            },
            _ => {
                let items = expr.terms().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![expr.clone()]);
                match_collection(terms, &items, bindings, Expr::sum)
            },
        },
        Expr::Mul(factors) => match factors.split_first() {
            Some((first, rest)) if first.is_number() => {
                let scaled = expr / first;
                match_into(&Expr::product(rest.to_vec()), &scaled, bindings)
            },
            _ => {
                let items = expr.factors().map(<[Expr]>::to_vec).unwrap_or_else(|| vec![expr.clone()]);
                match_collection(factors, &items, bindings, Expr::product)
            },
        },
        Expr::Pow(base, exp) => match expr {
            Expr::Pow(expr_base, expr_exp) => {
                let bindings = match_into(base, expr_base, bindings)?;
                match_into(exp, expr_exp, bindings)
            },

            // a non-power is its own first power
            _ => {
                let bindings = match_into(base, expr, bindings)?;
                match_into(exp, &Expr::one(), bindings)
            },
        },
        Expr::Primary(Primary::Call(func, args)) => {
            let (expr_func, expr_args) = expr.as_call()?;
            if func != expr_func || args.len() != expr_args.len() {
                return None;
            }
            args.iter()
                .zip(expr_args)
                .try_fold(bindings, |bindings, (arg, expr_arg)| match_into(arg, expr_arg, bindings))
        },
        Expr::Order(inner, symbols) => {
            let (expr_inner, expr_symbols) = expr.as_order()?;
            if **symbols != *expr_symbols {
                return None;
            }
            match_into(inner, expr_inner, bindings)
        },
        Expr::Primary(_) => None,
    }
}

/// Matches the elements of a sum or product pattern against the corresponding elements of an
/// expression.
fn match_collection(
    pattern: &[Expr],
    items: &[Expr],
    bindings: Bindings,
    build: fn(Vec<Expr>) -> Expr,
) -> Option<Bindings> {
    let (wilds, structured): (Vec<&Expr>, Vec<&Expr>) = pattern.iter()
        .partition(|p| p.as_wild().is_some());
    let mut used = vec![false; items.len()];
    assign(&structured, items, &mut used, bindings, &|bindings: Bindings, used: &[bool]| {
        let leftover = items.iter()
            .zip(used)
            .filter(|(_, used)| !**used)
            .map(|(item, _)| item.clone())
            .collect();
        bind_leftover(&wilds, leftover, bindings, build)
    })
}

/// Assigns each structured pattern element to a distinct unused item, trying every item in turn
/// until the remaining elements can also be assigned.
fn assign(
    structured: &[&Expr],
    items: &[Expr],
    used: &mut [bool],
    bindings: Bindings,
    finish: &dyn Fn(Bindings, &[bool]) -> Option<Bindings>,
) -> Option<Bindings> {
    let Some((first, rest)) = structured.split_first() else {
        return finish(bindings, used);
    };

    for i in 0..items.len() {
        if used[i] {
            continue;
        }
        if let Some(next) = match_into(first, &items[i], bindings.clone()) {
            used[i] = true;
            let result = assign(rest, items, used, next, finish);
            used[i] = false;
            if result.is_some() {
                return result;
            }
        }
    }
    None
}

/// Binds the items no structured element claimed to the bare placeholders.
fn bind_leftover(
    wilds: &[&Expr],
    leftover: Vec<Expr>,
    bindings: Bindings,
    build: fn(Vec<Expr>) -> Expr,
) -> Option<Bindings> {
    let Some((first, rest)) = wilds.split_first() else {
        return leftover.is_empty().then_some(bindings);
    };

    let mut bindings = match_into(first, &build(leftover), bindings)?;
    let neutral = build(Vec::new());
    for wild in rest {
        bindings = match_into(wild, &neutral, bindings)?;
    }
    Some(bindings)
}

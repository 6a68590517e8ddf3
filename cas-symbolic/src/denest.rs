//! Denesting of nested square roots.
//!
//! This is the algorithm of Borodin, Fagin, Hopcroft, and Tompa, "Decreasing the Nesting Depth
//! of Expressions Involving Square Roots" (1985). [`denester`] works on a list of radicals that
//! share the same bottom-level radicand, so that radicand only has to be denested once: a call
//! with `n` radicals makes a single recursive call with `n + 1` radicals, one level shallower.
//!
//! ```
//! use cas_symbolic::{denest::sqrtdenest, Expr};
//!
//! // sqrt(5 + 2*sqrt(6)) = sqrt(2) + sqrt(3)
//! let nested = (Expr::int(5) + Expr::int(2) * Expr::int(6).sqrt()).sqrt();
//! assert_eq!(sqrtdenest(&nested), Expr::int(2).sqrt() + Expr::int(3).sqrt());
//! ```
//!
//! Radicals that cannot be denested are returned unchanged. The base case searches every subset
//! of its inputs, so the work grows exponentially with the number of radicals; [`DenestConfig`]
//! bounds both that width and the recursion depth.

use crate::{
    expr::Expr,
    mul::expand,
    pattern::matches,
    step_collector::StepCollector,
};
use tracing::trace;

/// Limits on the work done by the denester. Exceeding either limit leaves the radical unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenestConfig {
    /// Maximum number of radicals searched in the base case.
    pub max_radicals: usize,

    /// Maximum recursion depth, i.e. the maximum nesting depth that can be removed.
    pub max_depth: usize,
}

impl Default for DenestConfig {
    fn default() -> Self {
        Self {
            max_radicals: 12,
            max_depth: 8,
        }
    }
}

/// A step taken while denesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A product of squared radicals in the base case is a perfect square.
    PerfectSquare {
        square: Expr,
        root: Expr,
    },

    /// A radical was denested using only square roots.
    SquareRoot(Expr),

    /// A radical was denested using a fourth root of the bottom-level radicand.
    FourthRoot(Expr),

    /// Only the square root of the bottom-level radicand could be denested, and was substituted
    /// back into the radical.
    Radicand(Expr),

    /// A radical could not be denested.
    Unchanged(Expr),
}

/// Returns every non-empty subset of `0..n` as an indicator vector, in ascending order of the
/// binary number the indicators spell out, most significant bit first.
///
/// The subsets are numbered by a `u64`, so `n` must be below 64. Larger `n` yields no subsets.
///
/// ```
/// use cas_symbolic::denest::subsets;
///
/// assert_eq!(subsets(2), vec![vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
pub fn subsets(n: usize) -> Vec<Vec<u8>> {
    let Some(end) = u32::try_from(n).ok().and_then(|n| 1u64.checked_shl(n)) else {
        return Vec::new();
    };
    (1..end)
        .map(|i| (0..n).rev().map(|bit| ((i >> bit) & 1) as u8).collect())
        .collect()
}

/// Matches a radical as `sqrt(a + b*sqrt(r))`, returning `(a, b, r)`. A radical that is not
/// nested, or a value whose square is a number, matches with `b = 0` and no `r`.
fn match_radical(expr: &Expr) -> Option<(Expr, Expr, Option<Expr>)> {
    let pattern = (Expr::wild("a") + Expr::wild("b") * Expr::wild("r").sqrt()).sqrt();
    if let Some(bindings) = matches(&pattern, expr) {
        if let (Some(a), Some(b), Some(r)) = (bindings.get("a"), bindings.get("b"), bindings.get("r")) {
            return Some((a.clone(), b.clone(), Some(r.clone())));
        }
    }

    if let Some((base, exp)) = expr.as_pow() {
        if *exp == Expr::rational(1, 2) {
            return Some((base.clone(), Expr::zero(), None));
        }
    }

    let square = square(expr);
    square.is_number().then(|| (square, Expr::zero(), None))
}

/// Matches a value as `a + b*sqrt(r)`, returning `(a, b)`. A value without a radical term is
/// `(value, 0)`.
fn match_linear(expr: &Expr) -> (Expr, Expr) {
    let pattern = Expr::wild("a") + Expr::wild("b") * Expr::wild("r").sqrt();
    matches(&pattern, expr)
        .and_then(|bindings| Some((bindings.get("a")?.clone(), bindings.get("b")?.clone())))
        .unwrap_or_else(|| (expr.clone(), Expr::zero()))
}

fn square(expr: &Expr) -> Expr {
    Expr::power(expr.clone(), Expr::int(2))
}

/// Expanded product of the squares of the selected radicals.
fn selected_square(nested: &[Expr], f: &[u8]) -> Expr {
    expand(&Expr::product(nested.iter()
        .zip(f)
        .filter(|(_, bit)| **bit == 1)
        .map(|(expr, _)| square(expr))
        .collect()))
}

struct Denester<'a, C> {
    config: DenestConfig,
    steps: &'a mut C,
}

impl<C: StepCollector<Step>> Denester<'_, C> {
    /// The result when denesting is not possible at this level: the last radical, and an all-zero
    /// indicator.
    fn fallback(nested: &[Expr]) -> (Expr, Vec<u8>) {
        let last = nested.last().cloned().unwrap_or_else(Expr::zero);
        (last, vec![0; nested.len()])
    }

    fn denest(&mut self, nested: &[Expr], depth: usize) -> (Expr, Vec<u8>) {
        let n = nested.len();
        if n == 0 || n > self.config.max_radicals {
            return Self::fallback(nested);
        }

        if nested.iter().all(|expr| square(expr).is_number()) {
            return self.perfect_square(nested);
        }
        if depth >= self.config.max_depth {
            return Self::fallback(nested);
        }

        let Some(values) = nested.iter().map(match_radical).collect::<Option<Vec<_>>>() else {
            return Self::fallback(nested);
        };

        let mut radicand: Option<&Expr> = None;
        for r in values.iter().filter_map(|(_, _, r)| r.as_ref()) {
            match radicand {
                Some(existing) => assert_eq!(existing, r, "nested radicals must share one radicand"),
                None => radicand = Some(r),
            }
        }
        let Some(radicand) = radicand.cloned() else {
            return Self::fallback(nested);
        };

        let mut next = values.iter()
            .map(|(a, b, _)| {
                let b_term = expand(&(&radicand * &square(b)));
                (expand(&square(a)) - b_term).sqrt()
            })
            .collect::<Vec<_>>();
        next.push(radicand.clone().sqrt());

        let (d, f) = self.denest(&next, depth + 1);
        if f.iter().all(|&bit| bit == 0) {
            return Self::fallback(nested);
        }

        // none of the inputs was selected, so `d` is the denested sqrt(R)
        if f[..n].iter().all(|&bit| bit == 0) {
            let (a, b, _) = &values[n - 1];
            let result = (a + &expand(&(b * &d))).sqrt();
            trace!(%result, "denested the bottom-level radicand");
            self.steps.push(Step::Radicand(result.clone()));
            return (result, f);
        }

        let (mut a, mut b) = match_linear(&selected_square(nested, &f));
        let first = f.iter().position(|&bit| bit == 1);
        if first.is_some_and(|i| i < n - 1) && f[n - 1] == 1 {
            a = -a;
            b = -b;
        }

        if f[n] == 0 {
            // sqrt((a + d)/2) + sign(b) * sqrt(b^2 r / (2(a + d)))
            let vad = expand(&(&a + &d));
            if vad.is_zero() || vad.is_nonpositive().is_true() {
                return Self::fallback(nested);
            }
            let first_root = (&vad / &Expr::int(2)).sqrt();
            let second = expand(&(square(&b) * radicand / (Expr::int(2) * vad)));
            let result = expand(&(first_root + Expr::sign(b) * second.sqrt()));
            trace!(%result, "denested with square roots");
            self.steps.push(Step::SquareRoot(result.clone()));
            (result, f)
        } else {
            // s / (sqrt(2) r^(1/4)) + a r^(1/4) / (sqrt(2) s), with s = sqrt(b r + d)
            let s2 = expand(&(&b * &radicand)) + d;
            if s2.is_zero() || s2.is_nonpositive().is_true() {
                return Self::fallback(nested);
            }
            let fourth_root = Expr::power(expand(&radicand), Expr::rational(1, 4));
            let s = s2.sqrt();
            let sqrt2 = Expr::int(2).sqrt();
            let result = expand(&(
                &s / &(&sqrt2 * &fourth_root) + &a * &fourth_root / (&sqrt2 * &s)
            ));
            trace!(%result, "denested with a fourth root");
            self.steps.push(Step::FourthRoot(result.clone()));
            (result, f)
        }
    }

    /// The base case, where the square of every radical is a number.
    fn perfect_square(&mut self, nested: &[Expr]) -> (Expr, Vec<u8>) {
        for f in subsets(nested.len()) {
            let mut p = selected_square(nested, &f);
            let selected = f.iter().filter(|&&bit| bit == 1).count();
            if selected > 1 && f.last() == Some(&1) {
                p = -p;
            }

            let root = p.clone().sqrt();
            if root.is_number() {
                trace!(?f, %root, "perfect square");
                self.steps.push(Step::PerfectSquare { square: p, root: root.clone() });
                return (root, f);
            }
        }
        Self::fallback(nested)
    }

    fn sqrtdenest(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Pow(_, exp) if **exp == Expr::rational(1, 2) => {
                let (n, d) = expr.as_numer_denom();
                if d.is_one() {
                    let (result, f) = self.denest(std::slice::from_ref(expr), 0);
                    if f.iter().all(|&bit| bit == 0) {
                        self.steps.push(Step::Unchanged(expr.clone()));
                    }
                    result
                } else {
                    self.sqrtdenest(&n) / self.sqrtdenest(&d)
                }
            },
            _ => expr.map_children(|child| self.sqrtdenest(child)),
        }
    }
}

/// Denests a list of radicals that share the same bottom-level radicand, returning the denested
/// value and the indicator of the subset that produced it. An all-zero indicator means no
/// denesting was found, and the value is the last radical.
///
/// # Panics
///
/// Panics if the radicals do not share one bottom-level radicand. Use [`sqrtdenest`] instead,
/// which only ever calls this with a single radical.
pub fn denester(nested: &[Expr]) -> (Expr, Vec<u8>) {
    Denester { config: DenestConfig::default(), steps: &mut () }.denest(nested, 0)
}

/// Denests every square root in the expression where possible.
pub fn sqrtdenest(expr: &Expr) -> Expr {
    sqrtdenest_with(expr, DenestConfig::default())
}

/// Denests every square root in the expression where possible, within the given limits.
pub fn sqrtdenest_with(expr: &Expr, config: DenestConfig) -> Expr {
    sqrtdenest_with_steps(expr, config, &mut ())
}

/// Denests every square root in the expression where possible, reporting the steps taken to
/// `steps`.
pub fn sqrtdenest_with_steps(
    expr: &Expr,
    config: DenestConfig,
    steps: &mut impl StepCollector<Step>,
) -> Expr {
    Denester { config, steps }.sqrtdenest(expr)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sqrt(n: i64) -> Expr {
        Expr::int(n).sqrt()
    }

    /// `sqrt(a + b*sqrt(r))`
    fn nested(a: i64, b: i64, r: i64) -> Expr {
        (Expr::int(a) + Expr::int(b) * sqrt(r)).sqrt()
    }

    #[test]
    fn subset_order() {
        assert_eq!(subsets(3), vec![
            vec![0, 0, 1],
            vec![0, 1, 0],
            vec![0, 1, 1],
            vec![1, 0, 0],
            vec![1, 0, 1],
            vec![1, 1, 0],
            vec![1, 1, 1],
        ]);
        assert_eq!(subsets(1), vec![vec![1]]);
        assert!(subsets(0).is_empty());
        assert!(subsets(64).is_empty());
        assert!(subsets(usize::MAX).is_empty());
    }

    #[test]
    fn denest_sum_of_roots() {
        assert_eq!(sqrtdenest(&nested(5, 2, 6)), sqrt(2) + sqrt(3));
        assert_eq!(sqrtdenest(&nested(5, -2, 6)), sqrt(3) - sqrt(2));
        assert_eq!(sqrtdenest(&nested(3, 2, 2)), Expr::one() + sqrt(2));
    }

    #[test]
    fn denest_with_rational_coefficients() {
        // sqrt(2 + sqrt(3)) = (sqrt(6) + sqrt(2)) / 2
        let expected = Expr::rational(1, 2) * sqrt(6) + Expr::rational(1, 2) * sqrt(2);
        assert_eq!(sqrtdenest(&nested(2, 1, 3)), expected);
    }

    #[test]
    fn not_denestable() {
        let e = nested(1, 1, 2);
        assert_eq!(sqrtdenest(&e), e);
        assert_eq!(sqrtdenest(&sqrt(2)), sqrt(2));
    }

    #[test]
    fn denest_bottom_radicand_only() {
        // sqrt(10 + 2 sqrt(5 + 2 sqrt(6))) = sqrt(10 + 2 sqrt(2) + 2 sqrt(3))
        let e = (Expr::int(10) + Expr::int(2) * nested(5, 2, 6)).sqrt();
        let radicand = Expr::int(10) + Expr::int(2) * sqrt(2) + Expr::int(2) * sqrt(3);

        let mut steps = Vec::new();
        let d = sqrtdenest_with_steps(&e, DenestConfig::default(), &mut steps);
        assert_eq!(d, radicand.clone().sqrt());
        assert_eq!(expand(&(d.clone() * d)), radicand.clone());
        assert_eq!(steps, vec![
            Step::PerfectSquare { square: Expr::one(), root: Expr::one() },
            Step::SquareRoot(sqrt(2) + sqrt(3)),
            Step::Radicand(radicand.sqrt()),
        ]);
    }

    #[test]
    fn denest_inside_expressions() {
        let x = Expr::symbol("x");
        let e = x.clone() + nested(5, 2, 6);
        assert_eq!(sqrtdenest(&e), x + sqrt(2) + sqrt(3));
    }

    #[test]
    fn denest_with_denominator() {
        // sqrt(5/4 + sqrt(6)/2) = (sqrt(2) + sqrt(3)) / 2
        let e = (Expr::rational(5, 4) + Expr::rational(1, 2) * sqrt(6)).sqrt();
        let expected = Expr::rational(1, 2) * sqrt(2) + Expr::rational(1, 2) * sqrt(3);
        assert_eq!(expand(&sqrtdenest(&e)), expected);
    }

    #[test]
    fn denester_base_case() {
        let (root, f) = denester(&[sqrt(6), Expr::one()]);
        assert_eq!(root, Expr::one());
        assert_eq!(f, vec![0, 1]);

        let (root, f) = denester(&[sqrt(2), sqrt(3)]);
        assert_eq!(root, sqrt(3));
        assert_eq!(f, vec![0, 0]);
    }

    #[test]
    #[should_panic]
    fn mismatched_radicands() {
        denester(&[nested(5, 2, 6), nested(3, 2, 2)]);
    }

    #[test]
    fn depth_limit() {
        let e = nested(5, 2, 6);
        let config = DenestConfig { max_depth: 0, ..Default::default() };
        assert_eq!(sqrtdenest_with(&e, config), e);
    }

    #[test]
    fn reports_steps() {
        let mut steps = Vec::new();
        let result = sqrtdenest_with_steps(&nested(5, 2, 6), DenestConfig::default(), &mut steps);
        assert_eq!(result, sqrt(2) + sqrt(3));
        assert_eq!(steps, vec![
            Step::PerfectSquare { square: Expr::one(), root: Expr::one() },
            Step::SquareRoot(sqrt(2) + sqrt(3)),
        ]);

        let mut steps = Vec::new();
        let e = nested(1, 1, 2);
        sqrtdenest_with_steps(&e, DenestConfig::default(), &mut steps);
        assert_eq!(steps, vec![Step::Unchanged(e)]);
    }
}

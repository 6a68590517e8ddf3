//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{ops::Pow, Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given numerator and denominator.
///
/// The denominator must be nonzero.
pub fn rational<N, D>(numer: N, denom: D) -> Rational
where
    Integer: From<N> + From<D>,
{
    Rational::from((Integer::from(numer), Integer::from(denom)))
}

/// Computes the exact `k`-th root of a nonnegative integer, if it has one.
pub fn exact_root(n: &Integer, k: u32) -> Option<Integer> {
    if k == 0 || *n < 0 {
        return None;
    }
    let root = n.clone().root(k);
    if root.clone().pow(k) == *n {
        Some(root)
    } else {
        None
    }
}

/// Upper bound on the trial divisors used by [`extract_root`].
const TRIAL_DIVISION_LIMIT: u32 = 1 << 16;

/// Splits a positive integer `n` into `(outside, inside)` such that `n = outside^k * inside`, with
/// as much as possible moved outside of the `k`-th root.
///
/// Factors are found by trial division up to a fixed bound. Whatever remains after that is
/// checked for being a perfect `k`-th power as a whole, and is otherwise left inside.
pub fn extract_root(n: &Integer, k: u32) -> (Integer, Integer) {
    if let Some(root) = exact_root(n, k) {
        return (root, int(1));
    }

    let mut outside = int(1);
    let mut inside = int(1);
    let mut rest = n.clone();
    let mut divisor = 2u32;
    while divisor <= TRIAL_DIVISION_LIMIT && Integer::from(divisor) * divisor <= rest {
        let mut count = 0u32;
        while rest.is_divisible_u(divisor) {
            rest /= divisor;
            count += 1;
        }
        if count > 0 {
            outside *= Integer::from(divisor).pow(count / k);
            inside *= Integer::from(divisor).pow(count % k);
        }
        divisor += if divisor == 2 { 1 } else { 2 };
    }

    match exact_root(&rest, k) {
        Some(root) => outside *= root,
        None => inside *= rest,
    }
    (outside, inside)
}

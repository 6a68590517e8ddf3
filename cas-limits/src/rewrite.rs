//! Rewriting an expression in terms of its most rapidly varying subexpression.

use cas_symbolic::{Expr, Symbol};
use crate::{limit::{Asymptotics, LimitValue, Unsupported}, mrv::MrvSet};
use tracing::debug;

/// An element of the most rapidly varying set, with what decides its place in the ordering.
struct Entry<'e> {
    expr: &'e Expr,
    arg: &'e Expr,
    size: usize,
    decreasing: bool,
}

impl Asymptotics<'_> {
    fn entry<'e>(&self, expr: &'e Expr) -> Result<Entry<'e>, Unsupported> {
        let arg = expr.as_exp().ok_or_else(|| Unsupported::NotExponential(expr.clone()))?;
        Ok(Entry {
            expr,
            arg,
            size: self.mrv(expr)?.len(),
            decreasing: self.limit(arg)? == LimitValue::NegativeInfinity,
        })
    }

    /// Rewrites `expr` in terms of the variable `w`, where every element of `omega` is an `exp`
    /// call and `omega` is the most rapidly varying set of `expr`.
    ///
    /// Returns `(rewritten, log_w)`: substituting `w = exp(log_w)` into `rewritten` gives back
    /// `expr`, and `w` tends to zero.
    ///
    /// ```
    /// use cas_limits::{leading::LeadingTermLimit, Asymptotics, MrvSet};
    /// use cas_symbolic::{Expr, Symbol};
    ///
    /// let x = Symbol::new("x").positive();
    /// let m = Symbol::new("m");
    /// let ctx = Asymptotics::new(x.clone(), &LeadingTermLimit);
    ///
    /// let e = Expr::exp(Expr::from(&x));
    /// let omega = MrvSet::singleton(e.clone());
    /// let (rewritten, log_w) = ctx.rewrite(&e, &omega, &m).unwrap();
    /// assert_eq!(rewritten, Expr::from(&m).recip());
    /// assert_eq!(log_w, -Expr::from(&x));
    /// ```
    pub fn rewrite(&self, expr: &Expr, omega: &MrvSet, w: &Symbol) -> Result<(Expr, Expr), Unsupported> {
        let mut entries = omega.iter()
            .map(|t| self.entry(t))
            .collect::<Result<Vec<_>, _>>()?;

        // larger sets first, then the elements tending to zero
        entries.sort_by(|a, b| b.size.cmp(&a.size).then(b.decreasing.cmp(&a.decreasing)));
        let Some(g) = entries.last() else {
            return Ok((expr.clone(), Expr::zero()));
        };

        let (w, log_w) = match self.limit(g.arg)? {
            LimitValue::PositiveInfinity => (Expr::from(w).recip(), -g.arg),
            LimitValue::NegativeInfinity => (Expr::from(w), g.arg.clone()),
            _ => return Err(Unsupported::UnknownSign),
        };

        let mut pairs = Vec::with_capacity(entries.len());
        for f in &entries {
            let c = match self.limit(&(f.arg / g.arg))? {
                LimitValue::Finite(c) => c,
                _ => return Err(Unsupported::Indeterminate),
            };
            let replacement = Expr::exp(f.arg - &(&c * g.arg)) * Expr::power(w.clone(), c);
            debug!(f = %f.expr, %replacement, "rewriting in terms of the dominant exponential");
            pairs.push((f.expr.clone(), replacement));
        }

        Ok((expr.subs_all(&pairs), log_w))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::leading::LeadingTermLimit;
    use super::*;

    fn var() -> Symbol {
        Symbol::new("x").positive()
    }

    fn x() -> Expr {
        Expr::from(var())
    }

    fn rewrite(e: &Expr) -> (Expr, Expr) {
        let ctx = Asymptotics::new(var(), &LeadingTermLimit);
        let omega = ctx.mrv(e).unwrap();
        ctx.rewrite(e, &omega, &Symbol::new("m")).unwrap()
    }

    fn m() -> Expr {
        Expr::symbol("m")
    }

    #[test]
    fn single_exponential() {
        let e = Expr::exp(x());
        assert_eq!(rewrite(&e), (m().recip(), -x()));

        let sq = Expr::power(x(), Expr::int(2));
        let e = Expr::exp(sq.clone());
        assert_eq!(rewrite(&e), (m().recip(), -sq));

        let arg = x() + x().recip();
        let e = Expr::exp(arg.clone());
        assert_eq!(rewrite(&e), (m().recip(), -arg));
    }

    #[test]
    fn comparable_exponentials() {
        // exp(1/x^2 - x) - exp(x + 1/x) = m exp(1/x + 1/x^2) - 1/m
        let inv_sq = Expr::power(x(), Expr::int(-2));
        let e = Expr::exp(inv_sq.clone() - x()) - Expr::exp(x() + x().recip());
        let expected = m() * Expr::exp(x().recip() + inv_sq) - m().recip();
        assert_eq!(rewrite(&e), (expected, -x() - x().recip()));
    }

    #[test]
    fn exponentials_in_exponents() {
        // 1/exp(exp(-x) - x) - exp(x) = exp(-m)/m - 1/m
        let e = Expr::exp(Expr::exp(-x()) - x()).recip() - Expr::exp(x());
        let expected = Expr::exp(-m()) * m().recip() - m().recip();
        assert_eq!(rewrite(&e), (expected, -x()));
    }

    #[test]
    fn decreasing_dominant_keeps_w() {
        let ctx = Asymptotics::new(var(), &LeadingTermLimit);
        let e = Expr::exp(-x());
        let omega = MrvSet::singleton(e.clone());
        assert_eq!(ctx.rewrite(&e, &omega, &Symbol::new("m")), Ok((m(), -x())));
    }

    #[test]
    fn elements_must_be_exponentials() {
        let ctx = Asymptotics::new(var(), &LeadingTermLimit);
        let omega = MrvSet::singleton(x());
        assert_eq!(
            ctx.rewrite(&x(), &omega, &Symbol::new("m")),
            Err(Unsupported::NotExponential(x())),
        );
    }
}

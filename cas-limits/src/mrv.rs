//! Most rapidly varying subexpressions.
//!
//! The most rapidly varying (MRV) set of an expression is the set of its subexpressions in the
//! fastest-growing comparability class. The variable itself is always a candidate, and so is
//! every `exp(u)` whose argument tends to infinity:
//!
//! - `mrv(exp(x) + 1/x) = {exp(x)}`
//! - `mrv(x + 1/x) = {x}`
//! - `mrv(exp(x + exp(-exp(x)))) = {exp(-exp(x))}`, since `exp(-exp(x))` tends to zero faster
//!   than `exp(x + ...)` grows

use cas_symbolic::{Expr, Func, Primary};
use crate::{compare::Comparison, limit::{Asymptotics, LimitValue, Unsupported}};
use std::slice;
use tracing::debug;

/// A set of subexpressions that all have the same growth rate.
///
/// Elements keep the order in which they were first inserted, and appear at most once.
/// Equality ignores the order.
#[derive(Debug, Clone, Default)]
pub struct MrvSet {
    exprs: Vec<Expr>,
}

impl MrvSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(expr: Expr) -> Self {
        Self { exprs: vec![expr] }
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// The element inserted first.
    pub fn first(&self) -> Option<&Expr> {
        self.exprs.first()
    }

    pub fn contains(&self, expr: &Expr) -> bool {
        self.exprs.contains(expr)
    }

    /// Returns true if the sets have at least one element in common.
    pub fn intersects(&self, other: &Self) -> bool {
        self.exprs.iter().any(|expr| other.contains(expr))
    }

    /// Inserts an element, if it is not already present.
    pub fn insert(&mut self, expr: Expr) {
        if !self.contains(&expr) {
            self.exprs.push(expr);
        }
    }

    pub fn union(mut self, other: Self) -> Self {
        for expr in other.exprs {
            self.insert(expr);
        }
        self
    }

    pub fn iter(&self) -> slice::Iter<'_, Expr> {
        self.exprs.iter()
    }

    pub fn as_slice(&self) -> &[Expr] {
        &self.exprs
    }
}

impl PartialEq for MrvSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|expr| other.contains(expr))
    }
}

impl Eq for MrvSet {}

impl FromIterator<Expr> for MrvSet {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        let mut set = Self::new();
        for expr in iter {
            set.insert(expr);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MrvSet {
    type Item = &'a Expr;
    type IntoIter = slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Asymptotics<'_> {
    /// Computes the most rapidly varying set of `expr`.
    pub fn mrv(&self, expr: &Expr) -> Result<MrvSet, Unsupported> {
        let x = self.var();
        if !expr.has_symbol(x) {
            return Ok(MrvSet::new());
        }

        match expr {
            Expr::Primary(Primary::Symbol(_)) => Ok(MrvSet::singleton(expr.clone())),
            Expr::Add(children) | Expr::Mul(children) => self.mrv_fold(children),

            // b^e = exp(e log b)
            Expr::Pow(base, exp) if exp.has_symbol(x) => {
                self.mrv(&Expr::exp(&**exp * &Expr::log((**base).clone())))
            },
            Expr::Pow(base, _) => self.mrv(base),

            Expr::Primary(Primary::Call(Func::Log, args)) if args.len() == 1 => self.mrv(&args[0]),
            Expr::Primary(Primary::Call(Func::Exp, args)) if args.len() == 1 => {
                let arg = &args[0];
                match self.limit(arg)? {
                    LimitValue::PositiveInfinity | LimitValue::NegativeInfinity => {
                        self.mrv_max(MrvSet::singleton(expr.clone()), self.mrv(arg)?)
                    },
                    LimitValue::Finite(_) => self.mrv(arg),
                    LimitValue::UnsignedInfinity => Err(Unsupported::UnknownSign),
                }
            },
            Expr::Primary(Primary::Call(_, args)) => self.mrv_fold(args),

            _ => Err(Unsupported::Unrepresentable(expr.clone())),
        }
    }

    fn mrv_fold(&self, children: &[Expr]) -> Result<MrvSet, Unsupported> {
        children.iter().try_fold(MrvSet::new(), |acc, child| self.mrv_max(acc, self.mrv(child)?))
    }

    /// Returns the set of the faster-growing class of `f` and `g`, or their union if both grow
    /// at the same rate.
    pub fn mrv_max(&self, f: MrvSet, g: MrvSet) -> Result<MrvSet, Unsupported> {
        let (Some(a), Some(b)) = (f.first(), g.first()) else {
            return Ok(if f.is_empty() { g } else { f });
        };
        if f.intersects(&g) {
            return Ok(f.union(g));
        }

        let comparison = self.compare(a, b)?;
        debug!(%a, %b, %comparison, "merging most rapidly varying sets");
        Ok(match comparison {
            Comparison::Greater => f,
            Comparison::Less => g,
            Comparison::Equal => f.union(g),
        })
    }
}

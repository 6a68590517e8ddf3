//! The expression tree.
//!
//! An [`Expr`] is an immutable tree of nodes whose children are shared through [`Arc`], so
//! cloning an expression is cheap and expressions can be freely sent between threads.
//!
//! Expressions are **canonical** when they are built through the constructors in this crate
//! ([`Expr::sum`], [`Expr::product`], [`Expr::power`], [`Expr::call`], [`Expr::order`], and the
//! arithmetic operator overloads). Canonical expressions are flattened (a sum never directly
//! contains another sum), have like terms and factors combined, and have their children sorted
//! by [`canonical_cmp`]. Because of this, two canonical expressions built from the same inputs
//! in any order are **structurally equal**.
//!
//! # Structural equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] compare trees node by node. This is
//! not semantic equality: `x^2 + 2x + 1` and `(x + 1)^2` are different expressions. However,
//! structural equality can never report false positives, and because canonical children are
//! sorted, it does not depend on the order in which terms were supplied.
//!
//! # Canonical order
//!
//! Children of commutative nodes are sorted by their [stable hash](Expr::stable_hash), with the
//! derived [`Ord`] breaking ties. This order exists only to make the representation
//! deterministic; it carries no mathematical meaning.

pub mod iter;
mod symbol;

pub use symbol::{Facts, Symbol, Wild};

use crate::{func::Func, kernel::kernel, number::Number};
use iter::ExprIter;
use rustc_hash::FxHasher;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Neg, Sub},
    sync::Arc,
};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primary {
    /// An exact number, such as `2`, `-3/4`, or `oo`.
    Number(Number),

    /// A variable, such as `x` or `y`.
    Symbol(Symbol),

    /// A pattern placeholder.
    Wild(Wild),

    /// A function call, such as `exp(x)` or `f(x, y)`.
    Call(Func, Arc<[Expr]>),

    /// A function itself rather than an application of it, such as the `exp` in
    /// `e.subs(exp, log)`.
    Function(Func),
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Arc<[Expr]>),

    /// Multiple factors multiplied together.
    Mul(Arc<[Expr]>),

    /// An expression raised to a power.
    Pow(Arc<Expr>, Arc<Expr>),

    /// An asymptotic order term `O(expr)` as the given symbols tend to zero.
    Order(Arc<Expr>, Arc<[Symbol]>),
}

/// Compares two expressions in canonical order: first by stable hash, then structurally.
pub fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    a.stable_hash().cmp(&b.stable_hash()).then_with(|| a.cmp(b))
}

/// Sorts expressions into canonical order.
pub(crate) fn sort_canonical(exprs: &mut Vec<Expr>) {
    let mut keyed = exprs.drain(..)
        .map(|expr| (expr.stable_hash(), expr))
        .collect::<Vec<_>>();
    keyed.sort();
    exprs.extend(keyed.into_iter().map(|(_, expr)| expr));
}

impl Expr {
    /// Creates an integer.
    pub fn int(n: i64) -> Self {
        Self::Primary(Primary::Number(Number::int(n)))
    }

    /// Creates the rational number `numer / denom`.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Self::Primary(Primary::Number(Number::rational(numer, denom)))
    }

    pub fn number(n: Number) -> Self {
        Self::Primary(Primary::Number(n))
    }

    /// Creates a symbol with no assumptions.
    pub fn symbol(name: &str) -> Self {
        Self::Primary(Primary::Symbol(Symbol::new(name)))
    }

    /// Creates a pattern placeholder.
    pub fn wild(name: &str) -> Self {
        Self::Primary(Primary::Wild(Wild::new(name)))
    }

    /// Creates a function-class marker.
    pub fn function(func: Func) -> Self {
        Self::Primary(Primary::Function(func))
    }

    pub fn zero() -> Self {
        Self::number(Number::zero())
    }

    pub fn one() -> Self {
        Self::number(Number::one())
    }

    pub fn neg_one() -> Self {
        Self::int(-1)
    }

    pub fn infinity() -> Self {
        Self::number(Number::Infinity)
    }

    pub fn neg_infinity() -> Self {
        Self::number(Number::NegativeInfinity)
    }

    pub fn complex_infinity() -> Self {
        Self::number(Number::ComplexInfinity)
    }

    pub fn nan() -> Self {
        Self::number(Number::NaN)
    }

    /// Builds the canonical sum of the given terms.
    pub fn sum(terms: Vec<Expr>) -> Self {
        (kernel().add)(terms)
    }

    /// Builds the canonical product of the given factors.
    pub fn product(factors: Vec<Expr>) -> Self {
        (kernel().mul)(factors)
    }

    /// Builds the canonical power `base^exp`.
    pub fn power(base: Expr, exp: Expr) -> Self {
        (kernel().pow)(base, exp)
    }

    /// Returns the square root of the expression.
    pub fn sqrt(self) -> Self {
        Self::power(self, Self::rational(1, 2))
    }

    /// Returns `1 / self`.
    pub fn recip(self) -> Self {
        Self::power(self, Self::neg_one())
    }

    /// Returns `self^exp`.
    pub fn pow(self, exp: Expr) -> Self {
        Self::power(self, exp)
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    pub fn is_nan(&self) -> bool {
        self.as_number().is_some_and(Number::is_nan)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Wild`], returns a reference to the placeholder.
    pub fn as_wild(&self) -> Option<&Wild> {
        match self {
            Self::Primary(Primary::Wild(wild)) => Some(wild),
            _ => None,
        }
    }

    /// If the expression is a sum, returns its terms.
    pub fn terms(&self) -> Option<&[Expr]> {
        match self {
            Self::Add(terms) => Some(terms),
            _ => None,
        }
    }

    /// If the expression is a product, returns its factors.
    pub fn factors(&self) -> Option<&[Expr]> {
        match self {
            Self::Mul(factors) => Some(factors),
            _ => None,
        }
    }

    /// If the expression is a power, returns its base and exponent.
    pub fn as_pow(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Self::Pow(base, exp) => Some((base, exp)),
            _ => None,
        }
    }

    /// If the expression is a function call, returns the function and its arguments.
    pub fn as_call(&self) -> Option<(&Func, &[Expr])> {
        match self {
            Self::Primary(Primary::Call(func, args)) => Some((func, args)),
            _ => None,
        }
    }

    /// If the expression is a call of `func` with a single argument, returns that argument.
    pub fn as_call_of(&self, func: &Func) -> Option<&Expr> {
        match self.as_call() {
            Some((f, [arg])) if f == func => Some(arg),
            _ => None,
        }
    }

    /// If the expression is `exp(u)`, returns `u`.
    pub fn as_exp(&self) -> Option<&Expr> {
        self.as_call_of(&Func::Exp)
    }

    /// If the expression is `log(u)`, returns `u`.
    pub fn as_log(&self) -> Option<&Expr> {
        self.as_call_of(&Func::Log)
    }

    /// If the expression is an order term, returns its expression and symbols.
    pub fn as_order(&self) -> Option<(&Expr, &[Symbol])> {
        match self {
            Self::Order(expr, symbols) => Some((expr, symbols)),
            _ => None,
        }
    }

    pub fn is_order(&self) -> bool {
        matches!(self, Self::Order(..))
    }

    /// Returns true if the expression is commutative under multiplication, i.e. every symbol in
    /// it is commutative.
    pub fn is_commutative(&self) -> bool {
        match self {
            Self::Primary(Primary::Symbol(sym)) => sym.facts().commutative,
            Self::Primary(Primary::Call(_, args)) => args.iter().all(Self::is_commutative),
            Self::Primary(_) => true,
            Self::Add(children) | Self::Mul(children) => children.iter().all(Self::is_commutative),
            Self::Pow(base, exp) => base.is_commutative() && exp.is_commutative(),
            Self::Order(expr, _) => expr.is_commutative(),
        }
    }

    /// Returns the direct children of this expression, in order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(children) | Self::Mul(children) => children.iter().collect(),
            Self::Pow(base, exp) => vec![base, exp],
            Self::Order(expr, _) => vec![expr],
        }
    }

    /// Rebuilds this expression with each child replaced by `f(child)`, through the canonical
    /// constructors. Leaves are returned unchanged.
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Self::Primary(Primary::Call(func, args)) => {
                Self::call(func.clone(), args.iter().map(f).collect())
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::sum(terms.iter().map(f).collect()),
            Self::Mul(factors) => Self::product(factors.iter().map(f).collect()),
            Self::Pow(base, exp) => {
                let base = f(base);
                Self::power(base, f(exp))
            },
            Self::Order(expr, symbols) => Self::order(f(expr), symbols.to_vec()),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if `sub` occurs anywhere in this expression. A function-class marker occurs
    /// wherever that function is called.
    pub fn has(&self, sub: &Expr) -> bool {
        match sub {
            Self::Primary(Primary::Function(func)) => self.post_order_iter()
                .any(|e| e == sub || e.as_call().is_some_and(|(f, _)| f == func)),
            _ => self.post_order_iter().any(|e| e == sub),
        }
    }

    /// Returns true if the symbol occurs anywhere in this expression, including the symbol list
    /// of an order term.
    pub fn has_symbol(&self, sym: &Symbol) -> bool {
        self.post_order_iter().any(|e| match e {
            Self::Primary(Primary::Symbol(s)) => s == sym,
            Self::Order(_, symbols) => symbols.contains(sym),
            _ => false,
        })
    }

    /// Returns true if the expression contains a pattern placeholder.
    pub fn has_wild(&self) -> bool {
        self.post_order_iter().any(|e| e.as_wild().is_some())
    }

    /// Returns the symbols in this expression, sorted and without duplicates.
    pub fn free_symbols(&self) -> Vec<Symbol> {
        let mut symbols = self.post_order_iter()
            .filter_map(Self::as_symbol)
            .cloned()
            .collect::<Vec<_>>();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    /// Returns a hash of the expression's structure that is identical across runs and platforms.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns true if parentheses are needed around this expression when it appears as a factor
    /// or as the base of a power.
    fn needs_parens_in(&self, parent: &Expr) -> bool {
        match (self, parent) {
            (Self::Add(_), Self::Mul(_) | Self::Pow(..)) => true,
            (Self::Mul(_) | Self::Pow(..), Self::Pow(..)) => true,
            (Self::Primary(Primary::Number(n)), Self::Mul(_) | Self::Pow(..)) => {
                n.is_negative() || !n.is_integer()
            },
            _ => false,
        }
    }

    fn fmt_child(&self, child: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if child.needs_parens_in(self) {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl From<Symbol> for Expr {
    fn from(sym: Symbol) -> Self {
        Self::Primary(Primary::Symbol(sym))
    }
}

impl From<&Symbol> for Expr {
    fn from(sym: &Symbol) -> Self {
        Self::Primary(Primary::Symbol(sym.clone()))
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Wild(wild) => write!(f, "{}", wild),
            Self::Call(func, args) => {
                write!(f, "{}(", func)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
            Self::Function(func) => write!(f, "{}", func),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    self.fmt_child(factor, f)?;
                    for factor in iter {
                        write!(f, "*")?;
                        self.fmt_child(factor, f)?;
                    }
                }
                Ok(())
            },
            Self::Pow(base, exp) => {
                self.fmt_child(base, f)?;
                write!(f, "^")?;
                match &**exp {
                    Self::Primary(Primary::Number(n)) if n.is_integer() && !n.is_negative() => {
                        write!(f, "{}", exp)
                    },
                    Self::Primary(Primary::Symbol(_)) => write!(f, "{}", exp),
                    _ => write!(f, "({})", exp),
                }
            },
            Self::Order(expr, symbols) => {
                write!(f, "O({}", expr)?;
                if symbols.len() > 1 {
                    for sym in symbols.iter() {
                        write!(f, ", {}", sym)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl Add for &Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Expr {
        Expr::sum(vec![self.clone(), rhs.clone()])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Expr {
        Expr::sum(vec![self, -rhs])
    }
}

impl Sub for &Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Expr {
        Expr::sum(vec![self.clone(), -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl Mul for &Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Expr {
        Expr::product(vec![self.clone(), rhs.clone()])
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Expr {
        Expr::product(vec![self, rhs.recip()])
    }
}

impl Div for &Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Expr {
        Expr::product(vec![self.clone(), rhs.clone().recip()])
    }
}

/// Negating a sum negates each of its terms; everything else is multiplied by `-1`.
impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Self::Add(terms) => Expr::sum(terms.iter().map(|term| -term).collect()),
            other => Expr::product(vec![Expr::neg_one(), other]),
        }
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

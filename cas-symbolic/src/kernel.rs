//! Late binding of the canonical constructors.
//!
//! The sum builder needs to build products (for scaled terms such as `2*x`), the product builder
//! needs to build sums and powers, and so on. Rather than having each module call the others
//! directly, every node is built through the [`Kernel`] returned by [`kernel()`]. The kernel is
//! installed at most once per process; if nothing is installed before the first expression is
//! built, the canonicalizers in this crate are used.

use crate::{add, expr::Expr, mul, pow};
use once_cell::sync::OnceCell;

/// The set of canonical constructors used to build expressions.
#[derive(Clone, Copy)]
pub struct Kernel {
    /// Builds the canonical sum of the given terms.
    pub add: fn(Vec<Expr>) -> Expr,

    /// Builds the canonical product of the given factors.
    pub mul: fn(Vec<Expr>) -> Expr,

    /// Builds the canonical power `base^exp`.
    pub pow: fn(Expr, Expr) -> Expr,
}

impl Default for Kernel {
    fn default() -> Self {
        Self {
            add: add::add,
            mul: mul::mul,
            pow: pow::pow,
        }
    }
}

static KERNEL: OnceCell<Kernel> = OnceCell::new();

/// Installs the constructors used by every expression built afterwards.
///
/// Returns the given kernel back if one is already installed, which happens as soon as any
/// expression has been built.
pub fn install(kernel: Kernel) -> Result<(), Kernel> {
    KERNEL.set(kernel)
}

/// Returns the installed constructors, installing the default ones if none are installed yet.
pub fn kernel() -> &'static Kernel {
    KERNEL.get_or_init(Kernel::default)
}

//! The symbolic core: a canonical expression tree and the algorithms that work on it.
//!
//! Expressions are built through the canonical constructors ([`Expr::sum`], [`Expr::product`],
//! [`Expr::power`], [`Expr::call`], [`Expr::order`]) or the arithmetic operators, all of which
//! go through the late-bound [`kernel`]. Every expression you hold is therefore already in
//! canonical form, and structural equality means the same thing no matter how the expression was
//! built.
//!
//! ```
//! use cas_symbolic::{denest::sqrtdenest, Expr};
//!
//! let x = Expr::symbol("x");
//! assert_eq!(&x + &x, Expr::int(2) * x.clone());
//!
//! // sqrt(5 + 2*sqrt(6)) = sqrt(2) + sqrt(3)
//! let nested = (Expr::int(5) + Expr::int(2) * Expr::int(6).sqrt()).sqrt();
//! assert_eq!(sqrtdenest(&nested), Expr::int(2).sqrt() + Expr::int(3).sqrt());
//! ```

pub mod add;
pub mod assume;
pub mod decompose;
pub mod denest;
pub mod derivative;
pub mod expr;
pub mod func;
pub mod kernel;
pub mod memo;
pub mod mul;
pub mod number;
pub mod order;
pub mod pattern;
pub mod pow;
pub mod primitive;
pub mod series;
pub mod step_collector;
pub mod subs;
pub mod tri;

pub use add::{add, flatten, Flattened};
pub use derivative::DerivativeError;
pub use expr::{Expr, Facts, Primary, Symbol, Wild};
pub use func::Func;
pub use mul::expand;
pub use number::Number;
pub use pattern::Bindings;
pub use tri::Tri;

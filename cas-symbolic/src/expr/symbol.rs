use crate::tri::Tri;
use std::{fmt, sync::Arc};

/// The assumptions attached to a [`Symbol`] when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Facts {
    pub commutative: bool,
    pub real: Tri,
    pub positive: Tri,
    pub negative: Tri,
    pub integer: Tri,
    pub bounded: Tri,
}

impl Default for Facts {
    fn default() -> Self {
        Self {
            commutative: true,
            real: Tri::Unknown,
            positive: Tri::Unknown,
            negative: Tri::Unknown,
            integer: Tri::Unknown,
            bounded: Tri::Unknown,
        }
    }
}

/// A named variable, such as `x` or `y`, together with its assumptions.
///
/// Two symbols are equal only if both their names and their assumptions are equal, so `x` and a
/// positive `x` are different symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Arc<str>,
    facts: Facts,
}

impl Symbol {
    /// Creates a commutative symbol with no assumptions.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            facts: Facts::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Marks the symbol as real.
    pub fn real(mut self) -> Self {
        self.facts.real = Tri::True;
        self
    }

    /// Marks the symbol as positive, which implies real.
    pub fn positive(mut self) -> Self {
        self.facts.real = Tri::True;
        self.facts.positive = Tri::True;
        self.facts.negative = Tri::False;
        self
    }

    /// Marks the symbol as negative, which implies real.
    pub fn negative(mut self) -> Self {
        self.facts.real = Tri::True;
        self.facts.positive = Tri::False;
        self.facts.negative = Tri::True;
        self
    }

    /// Marks the symbol as an integer, which implies real and bounded.
    pub fn integer(mut self) -> Self {
        self.facts.real = Tri::True;
        self.facts.integer = Tri::True;
        self.facts.bounded = Tri::True;
        self
    }

    /// Marks the symbol as bounded.
    pub fn bounded(mut self) -> Self {
        self.facts.bounded = Tri::True;
        self
    }

    /// Marks the symbol as unbounded.
    pub fn unbounded(mut self) -> Self {
        self.facts.bounded = Tri::False;
        self
    }

    /// Marks the symbol as non-commutative. Products keep the relative order of non-commutative
    /// factors.
    pub fn noncommutative(mut self) -> Self {
        self.facts.commutative = false;
        self
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A pattern placeholder, such as `a_`, that binds to a subexpression during
/// [matching](crate::pattern).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wild {
    name: Arc<str>,
}

impl Wild {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Wild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_", self.name)
    }
}

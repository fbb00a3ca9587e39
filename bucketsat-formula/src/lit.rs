//! Literals and variables.
use std::{cmp::Ordering, fmt, ops};

/// The backing type used to represent literals and variables.
///
/// Literals are stored in their signed DIMACS form, so this has to be a signed type.
pub type LitIdx = i32;

/// A boolean variable.
///
/// Variables are numbered starting from 1, as in the DIMACS CNF format. The 0-based
/// [`index`](Var::index) is used to address per-variable storage such as the solver's buckets.
///
/// Creating a variable with a number larger than `Var::max_var().to_dimacs()` is unsupported.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    number: LitIdx,
}

impl Var {
    /// Creates a variable from a 1-based index as used in the DIMACS CNF encoding.
    #[inline]
    pub fn from_dimacs(number: isize) -> Var {
        debug_assert!(number > 0);
        debug_assert!(number <= Var::max_var().to_dimacs());
        Var {
            number: number as LitIdx,
        }
    }

    /// Creates a variable from a 0-based index.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        Var::from_dimacs(index as isize + 1)
    }

    /// The 1-based number of this variable.
    #[inline]
    pub fn to_dimacs(self) -> isize {
        self.number as isize
    }

    /// The 0-based index of this variable.
    #[inline]
    pub const fn index(self) -> usize {
        (self.number - 1) as usize
    }

    /// The variable with the largest supported number.
    ///
    /// Leaves headroom so that clause signatures and negation never overflow the backing type.
    pub const fn max_var() -> Var {
        Var {
            number: LitIdx::max_value() >> 4,
        }
    }

    /// Largest number of variables supported.
    pub const fn max_count() -> usize {
        Self::max_var().number as usize
    }

    /// Creates a literal from this var and a `bool` that is `true` when the literal is positive.
    #[inline]
    pub fn lit(self, polarity: bool) -> Lit {
        Lit::from_var(self, polarity)
    }

    #[inline]
    pub fn positive(self) -> Lit {
        Lit::positive(self)
    }

    #[inline]
    pub fn negative(self) -> Lit {
        Lit::negative(self)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A boolean literal.
///
/// A literal is a variable or the negation of a variable. It is stored as the non-zero signed
/// integer of the DIMACS CNF format: the magnitude is the variable number, the sign the polarity.
///
/// The ordering of literals is the canonical clause order: literals are ordered by their variable
/// and, for the same variable, the negative literal comes first. Sorting a clause therefore groups
/// complementary literals next to each other.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Lit {
    number: LitIdx,
}

impl Lit {
    /// Creates a literal from a `Var` and a `bool` that is `true` when the literal is positive.
    #[inline]
    pub fn from_var(var: Var, polarity: bool) -> Lit {
        Lit {
            number: if polarity { var.number } else { -var.number },
        }
    }

    #[inline]
    pub fn positive(var: Var) -> Lit {
        Lit::from_var(var, true)
    }

    #[inline]
    pub fn negative(var: Var) -> Lit {
        Lit::from_var(var, false)
    }

    /// Create a literal from a 0-based variable index and a polarity.
    #[inline]
    pub fn from_index(index: usize, polarity: bool) -> Lit {
        Lit::from_var(Var::from_index(index), polarity)
    }

    /// Creates a literal from a non-zero integer.
    ///
    /// The absolute value is used as 1-based variable number, the sign of the integer is used as
    /// the sign of the literal.
    #[inline]
    pub fn from_dimacs(number: isize) -> Lit {
        Lit::from_var(Var::from_dimacs(number.abs()), number > 0)
    }

    /// Signed integer representation of the literal, opposite of `from_dimacs`.
    #[inline]
    pub fn to_dimacs(self) -> isize {
        self.number as isize
    }

    /// 0-based index of the literal's _variable_.
    #[inline]
    pub fn index(self) -> usize {
        self.var().index()
    }

    /// The literal's variable.
    #[inline]
    pub fn var(self) -> Var {
        Var {
            number: self.number.abs(),
        }
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.number < 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.number > 0
    }
}

impl Ord for Lit {
    #[inline]
    fn cmp(&self, other: &Lit) -> Ordering {
        self.var()
            .cmp(&other.var())
            .then(self.is_positive().cmp(&other.is_positive()))
    }
}

impl PartialOrd for Lit {
    #[inline]
    fn partial_cmp(&self, other: &Lit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            number: -self.number,
        }
    }
}

/// Negates the literal when the right hand side is `true`.
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    #[inline]
    fn bitxor(self, rhs: bool) -> Lit {
        if rhs {
            !self
        } else {
            self
        }
    }
}

impl From<Var> for Lit {
    #[inline]
    fn from(var: Var) -> Lit {
        Lit::positive(var)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;
    use proptest::{prelude::*, *};

    pub fn var(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Var> {
        index.prop_map(Var::from_index)
    }

    pub fn lit(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Lit> {
        (var(index), bool::ANY).prop_map(|(var, polarity)| var.lit(polarity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_encoding() {
        let lit = Lit::from_dimacs(-7);
        assert!(lit.is_negative());
        assert_eq!(lit.var(), Var::from_dimacs(7));
        assert_eq!(lit.index(), 6);
        assert_eq!(lit.to_dimacs(), -7);
        assert_eq!(!lit, Lit::from_dimacs(7));
        assert_eq!(lit ^ true, Lit::from_dimacs(7));
        assert_eq!(lit ^ false, lit);
        assert_eq!(Lit::from_index(0, true), lit!(1));
    }

    #[test]
    fn canonical_ordering() {
        let mut lits = lits![5, -5, 7, 6, -6, 1, -1, 2, 3, -1, -3, 4];
        lits.sort();
        assert_eq!(lits, lits![-1, -1, 1, 2, -3, 3, 4, -5, 5, -6, 6, 7]);
    }
}

//! Canonical clause form.
//!
//! A clause is canonical when its literals are strictly ascending in the [`Lit`] order. This means
//! no variable occurs twice, so a canonical clause is neither a tautology nor contains duplicated
//! literals.
use crate::lit::Lit;

/// Result of [`copy_canonical`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Canonical {
    /// The target holds the canonical clause.
    Clause,
    /// The clause contains a literal and its negation.
    Tautology,
}

/// Sort literals, remove duplicates and check for tautologic clauses.
///
/// The content of `target` is unspecified when a tautology is reported.
pub fn copy_canonical(target: &mut Vec<Lit>, src: &[Lit]) -> Canonical {
    target.clear();
    target.extend_from_slice(src);
    target.sort_unstable();
    target.dedup();

    // Complementary literals are adjacent after sorting.
    if target.windows(2).any(|pair| pair[0] == !pair[1]) {
        Canonical::Tautology
    } else {
        Canonical::Clause
    }
}

/// Whether the literals are in canonical order.
pub fn is_canonical(lits: &[Lit]) -> bool {
    lits.windows(2).all(|pair| pair[0].var() < pair[1].var())
}

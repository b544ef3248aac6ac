//! Conjunctive normal form rewriting.
//!
//! `to_cnf` rewrites an arbitrary predicate tree into an equivalent tree
//! where no `And` is nested inside an `Or`: negation is pushed to the
//! leaves with De Morgan's laws, then `Or` is distributed over `And` until
//! fixpoint, flattening nested connectives along the way.
//!
//! Distribution can blow up exponentially for pathological inputs
//! (e.g. `(a AND b) OR (c AND d) OR ...`). That is inherent to CNF and
//! accepted here; the trees a GDL script produces are small.

use super::Predicate;

/// Conjoin two optional predicates.
///
/// Used to accumulate `WHERE` expressions within one pattern and across
/// appended script fragments: all fragments' constraints must hold
/// simultaneously.
pub fn combine(existing: Option<Predicate>, new: Option<Predicate>) -> Option<Predicate> {
    match (existing, new) {
        (None, n) => n,
        (e, None) => e,
        (Some(e), Some(n)) => Some(Predicate::And(vec![e, n])),
    }
}

/// Rewrite `p` into conjunctive normal form.
///
/// The result is logically equivalent to the input and stable under
/// repeated application: `to_cnf(to_cnf(p)) == to_cnf(p)`.
pub fn to_cnf(p: Predicate) -> Predicate {
    distribute(push_negation(p))
}

/// Push `Not` down to the comparison leaves (De Morgan), eliminating
/// double negation. Comparisons under a single `Not` are inverted in
/// place, so the output contains no `Not` nodes at all.
fn push_negation(p: Predicate) -> Predicate {
    match p {
        Predicate::Comparison(_) => p,
        Predicate::And(children) => {
            Predicate::And(children.into_iter().map(push_negation).collect())
        }
        Predicate::Or(children) => {
            Predicate::Or(children.into_iter().map(push_negation).collect())
        }
        Predicate::Not(inner) => match *inner {
            Predicate::Comparison(mut c) => {
                c.comparator = c.comparator.inverse();
                Predicate::Comparison(c)
            }
            Predicate::And(children) => Predicate::Or(
                children.into_iter().map(|c| push_negation(Predicate::not(c))).collect(),
            ),
            Predicate::Or(children) => Predicate::And(
                children.into_iter().map(|c| push_negation(Predicate::not(c))).collect(),
            ),
            Predicate::Not(inner2) => push_negation(*inner2),
        },
    }
}

/// Distribute `Or` over nested `And` until no `And` remains inside an
/// `Or`, flattening same-kind connectives at every level.
///
/// Precondition: `p` contains no `Not` over a connective (guaranteed by
/// `push_negation`).
fn distribute(p: Predicate) -> Predicate {
    match p {
        Predicate::Comparison(_) | Predicate::Not(_) => p,
        Predicate::And(children) => {
            flatten_and(children.into_iter().map(distribute).collect())
        }
        Predicate::Or(children) => {
            let children: Vec<Predicate> =
                flatten_or_children(children.into_iter().map(distribute).collect());

            // Find the first conjunctive child; distribute the rest of the
            // disjunction over its clauses, left to right.
            let and_pos = children.iter().position(|c| matches!(c, Predicate::And(_)));
            match and_pos {
                None => {
                    if children.len() == 1 {
                        children.into_iter().next().unwrap_or(Predicate::Or(Vec::new()))
                    } else {
                        Predicate::Or(children)
                    }
                }
                Some(pos) => {
                    let mut rest = children;
                    let and_children = match rest.remove(pos) {
                        Predicate::And(inner) => inner,
                        _ => unreachable!("position() matched an And child"),
                    };
                    let clauses: Vec<Predicate> = and_children
                        .into_iter()
                        .map(|clause| {
                            let mut alts = Vec::with_capacity(rest.len() + 1);
                            alts.push(clause);
                            alts.extend(rest.iter().cloned());
                            distribute(Predicate::Or(alts))
                        })
                        .collect();
                    flatten_and(clauses)
                }
            }
        }
    }
}

/// Merge nested `And` children into one level; unwrap a singleton.
fn flatten_and(children: Vec<Predicate>) -> Predicate {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Predicate::And(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    if flat.len() == 1 {
        flat.into_iter().next().unwrap_or(Predicate::And(Vec::new()))
    } else {
        Predicate::And(flat)
    }
}

/// Merge nested `Or` children into one level (list form, no unwrapping).
fn flatten_or_children(children: Vec<Predicate>) -> Vec<Predicate> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Predicate::Or(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}

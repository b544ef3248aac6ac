//! # Predicate Tree
//!
//! Algebraic representation of the boolean filter expressions a GDL
//! `WHERE` clause declares. Pure data, like the model DTOs: no evaluation
//! logic lives here — the loader only constructs and normalizes the tree.

pub mod cnf;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Value;

pub use cnf::{combine, to_cnf};

/// A boolean filter expression over pattern variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Atomic comparison: `a.age > 42`, `a = b`
    Comparison(Comparison),
    /// Conjunction of children.
    And(Vec<Predicate>),
    /// Disjunction of children.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
}

/// A single comparison between two operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: Operand,
    pub comparator: Comparator,
    pub right: Operand,
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Literal value: `42`, `'Ada'`, `true`
    Literal(Value),
    /// Whole-element reference: `a`
    Variable(String),
    /// Property selector: `a.age`
    Property { variable: String, key: String },
}

/// Comparison operators supported by GDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    /// The comparator satisfied exactly when `self` is not.
    pub fn inverse(self) -> Comparator {
        match self {
            Comparator::Eq => Comparator::Neq,
            Comparator::Neq => Comparator::Eq,
            Comparator::Lt => Comparator::Gte,
            Comparator::Lte => Comparator::Gt,
            Comparator::Gt => Comparator::Lte,
            Comparator::Gte => Comparator::Lt,
        }
    }
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Predicate {
        Predicate::And(vec![left, right])
    }

    pub fn or(left: Predicate, right: Predicate) -> Predicate {
        Predicate::Or(vec![left, right])
    }

    pub fn not(inner: Predicate) -> Predicate {
        Predicate::Not(Box::new(inner))
    }

    /// All variable names referenced anywhere in the tree, in first-seen order.
    pub fn variables(&self) -> Vec<String> {
        fn walk(p: &Predicate, out: &mut Vec<String>) {
            match p {
                Predicate::Comparison(c) => {
                    for op in [&c.left, &c.right] {
                        let var = match op {
                            Operand::Variable(v) => Some(v),
                            Operand::Property { variable, .. } => Some(variable),
                            Operand::Literal(_) => None,
                        };
                        if let Some(v) = var {
                            if !out.iter().any(|seen| seen == v) {
                                out.push(v.clone());
                            }
                        }
                    }
                }
                Predicate::And(children) | Predicate::Or(children) => {
                    children.iter().for_each(|c| walk(c, out));
                }
                Predicate::Not(inner) => walk(inner, out),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Eq => "=",
            Comparator::Neq => "<>",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(v) => write!(f, "{v}"),
            Operand::Variable(v) => write!(f, "{v}"),
            Operand::Property { variable, key } => write!(f, "{variable}.{key}"),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.comparator, self.right)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison(c) => write!(f, "{c}"),
            Predicate::And(children) => write_joined(f, children, " AND "),
            Predicate::Or(children) => write_joined(f, children, " OR "),
            Predicate::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(var: &str, key: &str, c: Comparator, v: i64) -> Predicate {
        Predicate::Comparison(Comparison {
            left: Operand::Property { variable: var.into(), key: key.into() },
            comparator: c,
            right: Operand::Literal(Value::Int(v)),
        })
    }

    #[test]
    fn test_display() {
        let p = Predicate::and(
            cmp("a", "age", Comparator::Gt, 42),
            Predicate::not(cmp("b", "age", Comparator::Eq, 42)),
        );
        assert_eq!(p.to_string(), "(a.age > 42 AND (NOT b.age = 42))");
    }

    #[test]
    fn test_comparator_inverse_is_involution() {
        for c in [
            Comparator::Eq, Comparator::Neq, Comparator::Lt,
            Comparator::Lte, Comparator::Gt, Comparator::Gte,
        ] {
            assert_eq!(c.inverse().inverse(), c);
        }
    }

    #[test]
    fn test_variables_deduplicated_in_order() {
        let p = Predicate::or(
            cmp("b", "x", Comparator::Eq, 1),
            Predicate::and(cmp("a", "y", Comparator::Lt, 2), cmp("b", "z", Comparator::Gt, 3)),
        );
        assert_eq!(p.variables(), vec!["b".to_string(), "a".to_string()]);
    }
}

//! RDF triple with optional list position

use crate::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (subject, predicate, object) statement
///
/// `list_index` is set for members of a JSON-LD `@list`; ordered lists would
/// otherwise collapse to sets once the graph is canonicalized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub s: Term,
    pub p: Term,
    pub o: Term,
    pub list_index: Option<i32>,
}

impl Triple {
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self {
            s,
            p,
            o,
            list_index: None,
        }
    }

    pub fn with_list_index(s: Term, p: Term, o: Term, index: i32) -> Self {
        Self {
            s,
            p,
            o,
            list_index: Some(index),
        }
    }
}

/// N-Triples line form, with list position appended as a trailing comment
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)?;
        if let Some(index) = self.list_index {
            write!(f, " # @list[{}]", index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_items_keep_their_position_in_the_line() {
        let plain = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        let listed = Triple::with_list_index(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
            1,
        );
        assert_eq!(
            plain.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" ."
        );
        assert_eq!(
            listed.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" . # @list[1]"
        );
    }
}

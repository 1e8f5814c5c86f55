//! RDF graph - a collection of triples
//!
//! The `Graph` type keeps duplicates (bag semantics). Call `canonicalize()`
//! for sorted set semantics before rendering lines for hashing.

use crate::{Term, Triple};

/// A collection of RDF triples
#[derive(Clone, Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Sort and remove duplicate triples
    pub fn canonicalize(&mut self) {
        self.triples.sort();
        self.triples.dedup();
    }

    /// One N-Triples line per triple, in current order
    pub fn ntriples_lines(&self) -> Vec<String> {
        self.triples.iter().map(Triple::to_string).collect()
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(subject: &str, text: &str) -> Triple {
        Triple::new(
            Term::iri(subject),
            Term::iri("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::string(text),
        )
    }

    #[test]
    fn test_canonicalize_sorts_and_dedupes() {
        let mut graph: Graph = vec![
            label("http://example.org/row2", "b"),
            label("http://example.org/row1", "a"),
            label("http://example.org/row2", "b"),
        ]
        .into_iter()
        .collect();

        assert_eq!(graph.len(), 3);

        graph.canonicalize();
        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.iter().next().and_then(|t| t.s.as_iri()),
            Some("http://example.org/row1")
        );
    }

    #[test]
    fn test_lines_follow_triple_order() {
        let mut graph = Graph::new();
        graph.add(label("http://example.org/b", "x"));
        graph.add(label("http://example.org/a", "y"));
        graph.canonicalize();

        let lines = graph.ntriples_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("<http://example.org/a>"));
    }
}

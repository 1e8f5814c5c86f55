//! GraphSink trait for event-driven graph construction
//!
//! Parsers call `term_*` to allocate terms and `emit_*` to state facts, without
//! knowing what the sink does with them. `GraphCollectorSink` collects the
//! events into a `Graph`.

use crate::{Datatype, Graph, LiteralValue, Term, Triple};
use std::collections::HashMap;

/// Opaque term handle, only valid within one sink session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Event-driven interface for RDF graph construction
///
/// # Example
///
/// ```
/// use aspect_graph_ir::{Datatype, GraphCollectorSink, GraphSink};
///
/// let mut sink = GraphCollectorSink::new();
/// let row = sink.term_iri("http://rdf.equinor.com/ontology/sor#Row1");
/// let label = sink.term_iri("http://www.w3.org/2000/01/rdf-schema#label");
/// let text = sink.term_literal("An empty MEL Row", Datatype::xsd_string(), None);
/// sink.emit_triple(row, label, text);
///
/// assert_eq!(sink.finish().len(), 1);
/// ```
pub trait GraphSink {
    /// Create an IRI term (expanded form)
    fn term_iri(&mut self, iri: &str) -> TermId;

    /// Create a blank node term
    ///
    /// A labelled blank node keeps its identity across calls with the same
    /// label. `None` allocates a fresh node.
    fn term_blank(&mut self, label: Option<&str>) -> TermId;

    /// Create a literal from its lexical form
    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId;

    /// Create a literal from a native value
    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId;

    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId);

    /// Emit an ordered list member at 0-based `index`
    ///
    /// Sinks that ignore ordering can rely on the default, which drops the index.
    fn emit_list_item(&mut self, subject: TermId, predicate: TermId, object: TermId, index: i32) {
        let _ = index;
        self.emit_triple(subject, predicate, object);
    }
}

/// A sink that collects triples into a `Graph`
#[derive(Debug, Default)]
pub struct GraphCollectorSink {
    graph: Graph,
    terms: Vec<Term>,
    blank_counter: u32,
    blank_labels: HashMap<String, TermId>,
}

impl GraphCollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the sink and return the collected graph
    pub fn finish(self) -> Graph {
        self.graph
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn term(&self, id: TermId) -> Term {
        self.terms[id.0 as usize].clone()
    }

    fn add_term(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }
}

impl GraphSink for GraphCollectorSink {
    fn term_iri(&mut self, iri: &str) -> TermId {
        self.add_term(Term::iri(iri))
    }

    fn term_blank(&mut self, label: Option<&str>) -> TermId {
        match label {
            Some(l) => {
                if let Some(&id) = self.blank_labels.get(l) {
                    return id;
                }
                let id = self.add_term(Term::blank(l));
                self.blank_labels.insert(l.to_string(), id);
                id
            }
            None => {
                // "g" keeps generated labels apart from caller-supplied ones
                self.blank_counter += 1;
                let label = format!("g{}", self.blank_counter);
                self.add_term(Term::blank(label))
            }
        }
    }

    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId {
        let term = match language {
            Some(lang) => Term::lang_string(value, lang),
            None if datatype.is_xsd_string() => Term::string(value),
            None => Term::typed(value, datatype),
        };
        self.add_term(term)
    }

    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId {
        self.add_term(Term::Literal {
            value,
            datatype,
            language: None,
        })
    }

    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId) {
        let triple = Triple::new(self.term(subject), self.term(predicate), self.term(object));
        self.graph.add(triple);
    }

    fn emit_list_item(&mut self, subject: TermId, predicate: TermId, object: TermId, index: i32) {
        let triple = Triple::with_list_index(
            self.term(subject),
            self.term(predicate),
            self.term(object),
            index,
        );
        self.graph.add(triple);
    }
}

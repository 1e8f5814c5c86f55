//! RDF graph intermediate representation used for canonical hashing
//!
//! JSON-LD nodes are materialized into this IR before hashing so that the
//! hash is taken over triples rather than over a particular JSON layout.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form.
//!
//! 2. **Explicit datatypes** - Literals always carry a datatype. Plain strings
//!    use `xsd:string`, language-tagged strings use `rdf:langString`.
//!
//! 3. **Bag semantics by default** - `Graph` keeps duplicates until
//!    `canonicalize()` is called.
//!
//! 4. **One line per triple** - `Graph::ntriples_lines()` renders the
//!    canonical N-Triples form the hasher digests line by line.
//!
//! # Example
//!
//! ```
//! use aspect_graph_ir::{Graph, Term};
//!
//! let mut graph = Graph::new();
//! graph.add_triple(
//!     Term::iri("http://example.org/row1"),
//!     Term::iri("http://www.w3.org/2000/01/rdf-schema#label"),
//!     Term::string("An empty MEL Row"),
//! );
//! graph.canonicalize();
//!
//! assert_eq!(
//!     graph.ntriples_lines(),
//!     vec![
//!         "<http://example.org/row1> <http://www.w3.org/2000/01/rdf-schema#label> \"An empty MEL Row\" ."
//!             .to_string()
//!     ]
//! );
//! ```

pub mod datatype;
mod graph;
mod sink;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use sink::{GraphCollectorSink, GraphSink, TermId};
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;

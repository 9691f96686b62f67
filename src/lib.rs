//! lisp2sparql - logical-form to SPARQL compiler
//!
//! This crate compiles Lisp-style logical forms (s-expressions over a fixed
//! operator set: JOIN, AND, R, ARGMAX, ARGMIN, COUNT, TC, le/lt/ge/gt) into
//! executable SPARQL 1.1 queries against a Freebase-style triple store:
//! - Normalization of legacy `_inv` relation suffixes and superlative chains
//! - Linearization into flat, back-referencing sub-formulas
//! - Variable unification (union-find over query variables)
//! - Per-operator clause generation and final query assembly

pub mod config;
pub mod sexpr_parser;
pub mod sparql_query_generator;

pub use config::CompilerOptions;
pub use sparql_query_generator::{compile, compile_with_options, SparqlQueryGeneratorError};

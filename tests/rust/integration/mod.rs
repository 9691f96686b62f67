//! Integration tests - full pipeline runs over the public API
//!
//! These tests verify that complete logical forms compile to the exact SPARQL
//! text: Normalize → Parse → Linearize → Unify → Generate → Assemble.

mod compile_tests;

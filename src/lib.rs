// src/lib.rs
//! Table-driven lexical scanning: a generic maximal-munch engine over
//! packed DFA tables, plus the expression language built on top of it.

pub mod expr;
pub mod scanner;

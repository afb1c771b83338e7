// src/expr/mod.rs
// The concrete expression language: token kinds, the grammar-as-data DFA,
// and the lexer facade over the generic scanner.

pub mod grammar;
pub mod lexer;
pub mod tokens;

use crate::scanner::ModeId;

pub use lexer::{ExprLexer, ScannerConfig, Token, scan_tables, tokenize, PRIMARY_EXPRESSION_BLOCKS};
pub use tokens::TokenKind;

/// Lexical modes of the expression language, in table registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ScanMode {
    /// Start of input: a leading block-parameter name may appear here.
    Initial = 0,
    /// Ordinary expression context.
    Expression = 1,
    /// Between the quotes of a string literal.
    InString = 2,
}

impl ScanMode {
    pub(crate) fn id(self) -> ModeId {
        ModeId(self as u16)
    }

    pub(crate) fn from_id(id: ModeId) -> Self {
        match id.0 {
            0 => ScanMode::Initial,
            2 => ScanMode::InString,
            _ => ScanMode::Expression,
        }
    }
}

// src/expr/lexer.rs
// Public lexing surface for the expression language. Tables are compiled and
// unpacked once per process; every lexer instance is an independent session
// over them.

use std::sync::OnceLock;

use crate::scanner::{ScanError, ScanTables, Scanner};

use super::grammar;
use super::tokens::TokenKind;
use super::ScanMode;

/// Blocks whose first argument is a plain expression rather than a
/// parameter name.
pub const PRIMARY_EXPRESSION_BLOCKS: [&str; 3] = ["if", "switch", "for"];

/// What the session is lexing: a free-standing expression, or the argument
/// at `index` of the named block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerConfig {
    Expression,
    BlockParameter { block: String, index: u32 },
}

impl ScannerConfig {
    /// Whether the input opens with a parameter name to emit as such.
    fn starts_with_parameter(&self) -> bool {
        match self {
            ScannerConfig::Expression => false,
            ScannerConfig::BlockParameter { block, index } => {
                *index > 0 || !PRIMARY_EXPRESSION_BLOCKS.contains(&block.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

/// The process-wide table set. Compiling and unpacking the grammar is pure
/// and deterministic, so a failure here is a defect in the grammar itself,
/// not a runtime condition.
pub fn scan_tables() -> &'static ScanTables {
    static TABLES: OnceLock<ScanTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let packed = grammar::compile();
        ScanTables::unpack(&packed).expect("expression grammar tables failed validation")
    })
}

/// One lexing session over a borrowed source string.
pub struct ExprLexer<'a> {
    scanner: Scanner<'static, 'a>,
}

impl<'a> ExprLexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_config(text, &ScannerConfig::Expression)
    }

    pub fn with_config(text: &'a str, config: &ScannerConfig) -> Self {
        let mut scanner = Scanner::new(scan_tables(), text, grammar::MODE_INITIAL);
        scanner.set_emit_leading_name(config.starts_with_parameter());
        Self { scanner }
    }

    /// Re-seed over `[start, end)` of `text` in `mode`, as when a host
    /// editor restarts lexing mid-document.
    pub fn reset(&mut self, text: &'a str, start: usize, end: usize, mode: ScanMode) {
        self.scanner.reset(text, start, end, mode.id());
    }

    /// Restore the quote context after a `reset` into [`ScanMode::InString`].
    pub fn set_quote(&mut self, quote: Option<char>) {
        self.scanner.set_quote(quote);
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        let Some(raw) = self.scanner.next_token()? else {
            return Ok(None);
        };
        let kind = TokenKind::from_raw(raw.kind)
            .ok_or_else(|| ScanError::corrupt(format!("unmapped raw kind {}", raw.kind.0)))?;
        Ok(Some(Token {
            kind,
            start: raw.start,
            end: raw.end,
        }))
    }

    /// Mode the next token will be scanned in.
    pub fn mode(&self) -> ScanMode {
        ScanMode::from_id(self.scanner.mode())
    }

    /// Quote character of the string currently being lexed, if any.
    pub fn quote(&self) -> Option<char> {
        self.scanner.quote()
    }

    /// Offset the next token will start at.
    pub fn offset(&self) -> usize {
        self.scanner.offset()
    }
}

/// Lex `text` to completion under `config`.
pub fn tokenize(text: &str, config: &ScannerConfig) -> Result<Vec<Token>, ScanError> {
    let mut lexer = ExprLexer::with_config(text, config);
    let mut out = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        out.push(tok);
    }
    Ok(out)
}

// src/scanner/mod.rs
// Grammar-agnostic table-driven scanner: packed tables, the unpack step, the
// mode registry, buffer/cursor plumbing, and the maximal-munch engine. A
// concrete grammar supplies tables (see `crate::expr`); nothing in here
// knows any token language.

pub mod buffer;
pub mod engine;
pub mod error;
pub mod modes;
pub mod tables;

pub use buffer::{Buffer, Cursors};
pub use engine::{RawToken, Scanner};
pub use error::ScanError;
pub use tables::actions::{ActionSpec, ModeId, PushbackAmount, RawKind};
pub use tables::{GrammarBuilder, PackedScanTables, ScanTables};

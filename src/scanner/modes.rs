// src/scanner/modes.rs
// Lexical mode (start condition) registry: a closed set of modes, each bound
// to one initial DFA state. Mode switches happen only inside action dispatch
// or via an explicit `reset`.

use super::error::ScanError;
use super::tables::actions::ModeId;

pub struct ModeTable {
    start: Vec<u32>,
}

impl ModeTable {
    pub fn new(start: Vec<u32>) -> Self {
        Self { start }
    }

    /// Initial DFA state for `mode`. An unknown mode id is a table/grammar
    /// defect, not a user error.
    #[inline]
    pub fn resolve(&self, mode: ModeId) -> Result<u32, ScanError> {
        self.start
            .get(mode.0 as usize)
            .copied()
            .ok_or_else(|| ScanError::corrupt(format!("unknown lexical mode {}", mode.0)))
    }
}

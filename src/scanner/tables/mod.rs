// src/scanner/tables/mod.rs
pub mod actions;
pub mod build;
pub mod classifier;
pub mod io;
pub mod pack;
pub mod transitions;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::error::ScanError;
use super::modes::ModeTable;
use actions::{ActionSpec, RawKind};
use classifier::{CharClassifier, TOP_LEN};
use transitions::{NO_TRANSITION, TransitionTable};

// Re-exports to keep the external API small.
pub use actions::{ATTR_FINAL, ATTR_STOP_EARLY, ModeId, PushbackAmount};
pub use build::GrammarBuilder;
pub use io::{load_packed_bin_bytes, load_packed_json_bytes, save_packed_bin, save_packed_json};

/// The compact encoded form a grammar ships: run-length-coded u16 streams
/// plus the action dispatch list. This is data, decoded exactly once.
#[derive(Clone, Serialize, Deserialize)]
pub struct PackedScanTables {
    pub n_states: u32,
    pub n_classes: u32,
    /// RLE block indices, one per 256-code-point block.
    pub cmap_top: Vec<u16>,
    /// RLE class ids of the shared blocks.
    pub cmap_blocks: Vec<u16>,
    /// (high, low) u16 pairs, one offset per state.
    pub row_offset: Vec<u16>,
    /// RLE transition targets biased by +1; 0 means "no transition".
    pub trans: Vec<u16>,
    /// RLE action id per state.
    pub action: Vec<u16>,
    /// RLE attribute flags per state.
    pub attrs: Vec<u16>,
    /// Initial DFA state per lexical mode.
    pub mode_start: Vec<u16>,
    pub actions: Vec<ActionSpec>,
    /// Reserved kind for unscannable single characters.
    pub bad_kind: RawKind,
}

/// The unpacked, validated table set driving a scan. Built once, immutable,
/// shared read-only across sessions.
pub struct ScanTables {
    classifier: CharClassifier,
    transitions: TransitionTable,
    action: Vec<u16>,
    attrs: Vec<u8>,
    modes: ModeTable,
    actions: Vec<ActionSpec>,
    bad_kind: RawKind,
}

impl ScanTables {
    pub fn unpack(packed: &PackedScanTables) -> Result<Self, String> {
        let t0 = Instant::now();
        let n_states = packed.n_states as usize;
        let n_classes = packed.n_classes as usize;

        let top = pack::decode_rle(&packed.cmap_top, TOP_LEN)?;
        let blocks = pack::decode_rle(&packed.cmap_blocks, {
            let runs = packed.cmap_blocks.chunks_exact(2);
            runs.map(|pair| pair[0] as usize).sum()
        })?;
        let classifier = CharClassifier::from_parts(top, blocks)?;
        if classifier.max_class() as usize >= n_classes {
            return Err(format!(
                "classifier emits class {} but table has {n_classes} classes",
                classifier.max_class()
            ));
        }

        let row_offset = pack::decode_wide(&packed.row_offset, n_states)?;
        let biased = pack::decode_rle(&packed.trans, {
            let runs = packed.trans.chunks_exact(2);
            runs.map(|pair| pair[0] as usize).sum()
        })?;
        let trans: Vec<i32> = biased
            .iter()
            .map(|&v| v as i32 + NO_TRANSITION)
            .collect();
        let transitions = TransitionTable::from_parts(n_states, n_classes, row_offset, trans)?;

        let action = pack::decode_rle(&packed.action, n_states)?;
        for (state, &a) in action.iter().enumerate() {
            if a as usize >= packed.actions.len() {
                return Err(format!(
                    "state {state} names action {a}, but only {} are defined",
                    packed.actions.len()
                ));
            }
        }

        let attrs_wide = pack::decode_rle(&packed.attrs, n_states)?;
        let mut attrs = Vec::with_capacity(n_states);
        for (state, &a) in attrs_wide.iter().enumerate() {
            attrs.push(
                u8::try_from(a).map_err(|_| format!("state {state} attribute {a} overflows u8"))?,
            );
        }

        if packed.mode_start.is_empty() {
            return Err("table set defines no lexical modes".into());
        }
        let mut starts = Vec::with_capacity(packed.mode_start.len());
        for &s in &packed.mode_start {
            if s as usize >= n_states {
                return Err(format!("mode start state {s} out of range"));
            }
            starts.push(s as u32);
        }

        log::debug!(
            "unpacked scan tables: {n_states} states, {n_classes} classes, {} actions, {} modes in {:?}",
            packed.actions.len(),
            starts.len(),
            t0.elapsed()
        );

        Ok(Self {
            classifier,
            transitions,
            action,
            attrs,
            modes: ModeTable::new(starts),
            actions: packed.actions.clone(),
            bad_kind: packed.bad_kind,
        })
    }

    #[inline]
    pub fn classifier(&self) -> &CharClassifier {
        &self.classifier
    }

    #[inline]
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    #[inline]
    pub fn attrs(&self, state: u32) -> u8 {
        self.attrs[state as usize]
    }

    #[inline]
    pub fn action_of(&self, state: u32) -> u16 {
        self.action[state as usize]
    }

    pub fn action_spec(&self, id: u16) -> Result<ActionSpec, ScanError> {
        self.actions
            .get(id as usize)
            .copied()
            .ok_or_else(|| ScanError::corrupt(format!("action id {id} has no dispatch entry")))
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    pub fn bad_kind(&self) -> RawKind {
        self.bad_kind
    }

    pub fn n_states(&self) -> usize {
        self.transitions.n_states()
    }
}

// src/scanner/tables/build.rs
// Authoring API for a grammar's tables. A grammar declares classes, states,
// edges, accepting actions and modes, then `pack` compiles the whole thing
// into the run-length-encoded form the engine unpacks at startup: the
// two-level classifier (shared 256-entry blocks), interned transition rows,
// and the per-state action/attribute streams.

use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;

use super::actions::{ATTR_FINAL, ATTR_STOP_EARLY, ActionSpec, ModeId, RawKind};
use super::classifier::{BLOCK_BITS, BLOCK_SIZE, TOP_LEN};
use super::pack;
use super::PackedScanTables;

struct StateDef {
    action: Option<u16>,
    stop_early: bool,
    /// class -> target, NO_TRANSITION as -1, dense per state.
    row: Vec<i32>,
}

pub struct GrammarBuilder {
    n_classes: u16,
    states: Vec<StateDef>,
    modes: Vec<u32>,
    actions: Vec<ActionSpec>,
    bad_kind: RawKind,
}

impl GrammarBuilder {
    pub fn new(n_classes: u16, bad_kind: RawKind) -> Self {
        assert!(n_classes > 0, "grammar needs at least the default class");
        Self {
            n_classes,
            states: Vec::new(),
            modes: Vec::new(),
            actions: Vec::new(),
            bad_kind,
        }
    }

    pub fn state(&mut self) -> u32 {
        self.states.push(StateDef {
            action: None,
            stop_early: false,
            row: vec![-1; self.n_classes as usize],
        });
        (self.states.len() - 1) as u32
    }

    pub fn action(&mut self, spec: ActionSpec) -> u16 {
        self.actions.push(spec);
        (self.actions.len() - 1) as u16
    }

    /// Shorthand: a fresh accepting state carrying `action`.
    pub fn accepting(&mut self, action: u16) -> u32 {
        let s = self.state();
        self.accept(s, action);
        s
    }

    pub fn accept(&mut self, state: u32, action: u16) {
        assert!((action as usize) < self.actions.len(), "undefined action");
        self.states[state as usize].action = Some(action);
    }

    /// Mark that no longer match is reachable past `state`.
    pub fn stop_early(&mut self, state: u32) {
        self.states[state as usize].stop_early = true;
    }

    /// Later edges overwrite earlier ones, so catch-alls go first.
    pub fn edge(&mut self, from: u32, class: u16, to: u32) {
        assert!(class < self.n_classes, "class out of range");
        self.states[from as usize].row[class as usize] = to as i32;
    }

    pub fn edges(&mut self, from: u32, classes: &[u16], to: u32) {
        for &c in classes {
            self.edge(from, c, to);
        }
    }

    pub fn edges_all_except(&mut self, from: u32, except: &[u16], to: u32) {
        for c in 0..self.n_classes {
            if !except.contains(&c) {
                self.edge(from, c, to);
            }
        }
    }

    pub fn mode(&mut self, start_state: u32) -> ModeId {
        self.modes.push(start_state);
        ModeId((self.modes.len() - 1) as u16)
    }

    /// Compile into the packed form. `classify` is the grammar's class
    /// predicate; it is swept over every code point once, here, so the
    /// shipped tables never re-evaluate it.
    pub fn pack(self, classify: impl Fn(char) -> u16 + Sync) -> PackedScanTables {
        let t0 = Instant::now();
        let n_classes = self.n_classes;

        // Two-level classifier: compute all 256-point blocks, intern shared
        // ones. The sweep dominates compile time, so it runs in parallel.
        let raw_blocks: Vec<Vec<u16>> = (0..TOP_LEN)
            .into_par_iter()
            .map(|hi| {
                (0..BLOCK_SIZE)
                    .map(|lo| {
                        let cp = ((hi << BLOCK_BITS) | lo) as u32;
                        match char::from_u32(cp) {
                            Some(c) => {
                                let cls = classify(c);
                                assert!(cls < n_classes, "classify returned class {cls}");
                                cls
                            }
                            None => 0,
                        }
                    })
                    .collect()
            })
            .collect();

        let mut block_ids: HashMap<Vec<u16>, u16> = HashMap::new();
        let mut blocks: Vec<u16> = Vec::new();
        let mut top = Vec::with_capacity(TOP_LEN);
        for block in raw_blocks {
            let id = *block_ids.entry_ref(block.as_slice()).or_insert_with(|| {
                let id = (blocks.len() / BLOCK_SIZE) as u16;
                blocks.extend_from_slice(&block);
                id
            });
            top.push(id);
        }
        log::debug!(
            "classifier: {} shared blocks for {TOP_LEN} top entries",
            blocks.len() / BLOCK_SIZE
        );

        // Transition rows, interned so identical rows share one offset.
        let mut row_ids: HashMap<Vec<u16>, u32> = HashMap::new();
        let mut trans_biased: Vec<u16> = Vec::new();
        let mut row_offset = Vec::with_capacity(self.states.len());
        for def in &self.states {
            let biased: Vec<u16> = def.row.iter().map(|&t| (t + 1) as u16).collect();
            let off = *row_ids.entry_ref(biased.as_slice()).or_insert_with(|| {
                let off = trans_biased.len() as u32;
                trans_biased.extend_from_slice(&biased);
                off
            });
            row_offset.push(off);
        }

        let mut action = Vec::with_capacity(self.states.len());
        let mut attrs = Vec::with_capacity(self.states.len());
        for def in &self.states {
            action.push(def.action.unwrap_or(0));
            let mut a = 0u16;
            if def.action.is_some() {
                a |= ATTR_FINAL as u16;
            }
            if def.stop_early {
                a |= ATTR_STOP_EARLY as u16;
            }
            attrs.push(a);
        }

        let packed = PackedScanTables {
            n_states: self.states.len() as u32,
            n_classes: n_classes as u32,
            cmap_top: pack::encode_rle(&top),
            cmap_blocks: pack::encode_rle(&blocks),
            row_offset: pack::encode_wide(&row_offset),
            trans: pack::encode_rle(&trans_biased),
            action: pack::encode_rle(&action),
            attrs: pack::encode_rle(&attrs),
            mode_start: self.modes.iter().map(|&s| s as u16).collect(),
            actions: self.actions,
            bad_kind: self.bad_kind,
        };
        log::debug!(
            "packed {} states x {} classes ({} row entries after sharing) in {:?}",
            packed.n_states,
            packed.n_classes,
            trans_biased.len(),
            t0.elapsed()
        );
        packed
    }
}

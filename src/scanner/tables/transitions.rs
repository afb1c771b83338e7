// src/scanner/tables/transitions.rs

/// Sentinel for "no transition". Distinct from every state id, in particular
/// from state 0.
pub const NO_TRANSITION: i32 = -1;

/// The DFA's (state, class) -> state function: a flat array of rows plus a
/// per-state row offset. Identical rows share one offset.
pub struct TransitionTable {
    n_states: usize,
    n_classes: usize,
    row_offset: Vec<u32>,
    trans: Vec<i32>,
}

impl TransitionTable {
    /// Validates the whole table once so `next` can index unchecked-by-value:
    /// every row fits in `trans` and every target is a real state.
    pub fn from_parts(
        n_states: usize,
        n_classes: usize,
        row_offset: Vec<u32>,
        trans: Vec<i32>,
    ) -> Result<Self, String> {
        if n_states == 0 || n_classes == 0 {
            return Err("transition table with zero states or classes".into());
        }
        if row_offset.len() != n_states {
            return Err(format!(
                "row offset table has {} entries for {n_states} states",
                row_offset.len()
            ));
        }
        for (state, &off) in row_offset.iter().enumerate() {
            let off = off as usize;
            if off + n_classes > trans.len() {
                return Err(format!("row of state {state} overruns transition array"));
            }
        }
        for (i, &t) in trans.iter().enumerate() {
            if t != NO_TRANSITION && (t < 0 || t as usize >= n_states) {
                return Err(format!("transition entry {i} targets invalid state {t}"));
            }
        }
        Ok(Self {
            n_states,
            n_classes,
            row_offset,
            trans,
        })
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    #[inline]
    pub fn next(&self, state: u32, class: u16) -> Option<u32> {
        debug_assert!((state as usize) < self.n_states);
        debug_assert!((class as usize) < self.n_classes);
        let row = self.row_offset[state as usize] as usize;
        let t = self.trans[row + class as usize];
        (t != NO_TRANSITION).then_some(t as u32)
    }
}

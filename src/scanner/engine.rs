// src/scanner/engine.rs
// The maximal-munch scan loop. One `next_token` call produces exactly one
// token (or end of input, or a fatal error): seed the DFA from the current
// mode, run transitions recording the last accepting state, then dispatch
// that state's action. Bad input degrades to a one-character token of the
// grammar's reserved kind; only table/rule defects surface as `Err`.

use super::buffer::{Buffer, Cursors};
use super::error::ScanError;
use super::tables::actions::{
    ATTR_FINAL, ATTR_STOP_EARLY, ActionSpec, ModeId, PushbackAmount, RawKind,
};
use super::tables::ScanTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken {
    pub kind: RawKind,
    pub start: usize,
    pub end: usize,
}

/// One scan session. Owns all mutable state (cursors, mode, quote); the
/// tables behind it are shared and immutable, so any number of sessions can
/// run concurrently on their own threads.
pub struct Scanner<'t, 'a> {
    tables: &'t ScanTables,
    buffer: Buffer<'a>,
    cursors: Cursors,
    mode: ModeId,
    /// Quote character remembered while inside a quoted mode. Session-local,
    /// never shared.
    quote: Option<char>,
    at_eof: bool,
    /// Whether a `LeadingName` action emits its token (grammar-configured).
    emit_leading_name: bool,
}

impl<'t, 'a> Scanner<'t, 'a> {
    pub fn new(tables: &'t ScanTables, text: &'a str, mode: ModeId) -> Self {
        Self {
            tables,
            buffer: Buffer::new(text),
            cursors: Cursors::at(0),
            mode,
            quote: None,
            at_eof: false,
            emit_leading_name: false,
        }
    }

    /// Re-seed the session over `[start, end)` of `text`, starting in
    /// `mode`. Everything else (quote, EOF flag, cursors) resets with it.
    pub fn reset(&mut self, text: &'a str, start: usize, end: usize, mode: ModeId) {
        self.buffer = Buffer::window(text, start, end);
        self.cursors = Cursors::at(start);
        self.mode = mode;
        self.quote = None;
        self.at_eof = false;
    }

    pub fn set_emit_leading_name(&mut self, emit: bool) {
        self.emit_leading_name = emit;
    }

    /// Restore the remembered quote after a mid-string `reset`.
    pub fn set_quote(&mut self, quote: Option<char>) {
        self.quote = quote;
    }

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    /// Offset the next call will scan from.
    pub fn offset(&self) -> usize {
        self.cursors.marked
    }

    pub fn next_token(&mut self) -> Result<Option<RawToken>, ScanError> {
        if self.at_eof {
            return Ok(None);
        }
        loop {
            let restart_mode = self.mode;
            let restart_pos = self.cursors.marked;

            self.cursors.start = restart_pos;
            self.cursors.current = restart_pos;
            let mut state = self.tables.modes().resolve(self.mode)?;
            let mut best: Option<u16> = None;

            // The mode's start state may itself accept (empty match).
            if self.tables.attrs(state) & ATTR_FINAL != 0 {
                best = Some(self.tables.action_of(state));
            }

            let mut hit_eof = false;
            loop {
                let Some(c) = self.buffer.char_at(self.cursors.current) else {
                    // In-memory refill seam: reports EOF once exhausted.
                    hit_eof = self.buffer.refill();
                    if hit_eof {
                        break;
                    }
                    continue;
                };
                let class = self.tables.classifier().classify(c as u32);
                let Some(next) = self.tables.transitions().next(state, class) else {
                    // Not consumed; this code point starts the next attempt.
                    break;
                };
                state = next;
                self.cursors.current += c.len_utf8();
                let attrs = self.tables.attrs(state);
                if attrs & ATTR_FINAL != 0 {
                    best = Some(self.tables.action_of(state));
                    self.cursors.marked = self.cursors.current;
                    if attrs & ATTR_STOP_EARLY != 0 {
                        break;
                    }
                }
            }

            if hit_eof && self.cursors.current == self.cursors.start {
                self.at_eof = true;
                return Ok(None);
            }

            let Some(action_id) = best else {
                // No accepting state on any prefix: unscannable input.
                return self.bad_char_token().map(Some);
            };

            match self.tables.action_spec(action_id)? {
                ActionSpec::Emit(kind) => return self.emit(kind).map(Some),
                ActionSpec::EmitPushback { kind, count } => {
                    self.pushback(count as usize)?;
                    return self.emit(kind).map(Some);
                }
                ActionSpec::EmitFixedLookahead { kind, length } => {
                    self.fix_lookahead(length as usize)?;
                    return self.emit(kind).map(Some);
                }
                ActionSpec::Skip { pushback, mode } => {
                    self.apply_pushback(pushback)?;
                    if let Some(m) = mode {
                        self.mode = m;
                    }
                    self.check_progress(restart_mode, restart_pos)?;
                }
                ActionSpec::OpenQuoted { kind, quote, mode } => {
                    self.quote = Some(quote);
                    self.mode = mode;
                    return self.emit(kind).map(Some);
                }
                ActionSpec::CloseQuotedIf { kind, quote, mode } => {
                    if self.quote == Some(quote) {
                        self.quote = None;
                        self.mode = mode;
                    }
                    return self.emit(kind).map(Some);
                }
                ActionSpec::LeadingName { kind, mode } => {
                    self.mode = mode;
                    if self.emit_leading_name {
                        return self.emit(kind).map(Some);
                    }
                    self.cursors.marked = self.cursors.start;
                    self.check_progress(restart_mode, restart_pos)?;
                }
            }
        }
    }

    fn emit(&mut self, kind: RawKind) -> Result<RawToken, ScanError> {
        let (start, end) = (self.cursors.start, self.cursors.marked);
        if end <= start {
            // A zero-width token would stall the session forever.
            return Err(ScanError::NoProgress { offset: start });
        }
        Ok(RawToken { kind, start, end })
    }

    /// Reserved-kind token covering exactly one code point; scanning resumes
    /// right after it, so progress is always positive.
    fn bad_char_token(&mut self) -> Result<RawToken, ScanError> {
        let start = self.cursors.start;
        let c = self
            .buffer
            .char_at(start)
            .ok_or_else(|| ScanError::corrupt("bad-character emission past end of buffer"))?;
        let end = start + c.len_utf8();
        self.cursors.marked = end;
        Ok(RawToken {
            kind: self.tables.bad_kind(),
            start,
            end,
        })
    }

    fn apply_pushback(&mut self, amount: PushbackAmount) -> Result<(), ScanError> {
        match amount {
            PushbackAmount::All => {
                self.cursors.marked = self.cursors.start;
                Ok(())
            }
            PushbackAmount::Chars(n) => self.pushback(n as usize),
        }
    }

    /// Move `marked` back `n` code points. More than the current match holds
    /// is a defect in the rule set, never a user-input condition.
    fn pushback(&mut self, n: usize) -> Result<(), ScanError> {
        if n == 0 {
            return Ok(());
        }
        match self
            .buffer
            .step_back(self.cursors.marked, self.cursors.start, n)
        {
            Some(pos) => {
                self.cursors.marked = pos;
                Ok(())
            }
            None => Err(ScanError::PushbackTooFar {
                requested: n,
                available: self
                    .buffer
                    .count_chars(self.cursors.start, self.cursors.marked),
            }),
        }
    }

    /// Force the match to exactly `n` code points, overriding whatever the
    /// DFA consumed. Only rule-specific lookahead overrides use this.
    fn fix_lookahead(&mut self, n: usize) -> Result<(), ScanError> {
        let pos = self
            .buffer
            .advance_by(self.cursors.start, n)
            .filter(|&p| p <= self.cursors.current)
            .ok_or_else(|| {
                ScanError::corrupt(format!("fixed lookahead of {n} chars beyond matched span"))
            })?;
        self.cursors.marked = pos;
        Ok(())
    }

    fn check_progress(&self, mode: ModeId, pos: usize) -> Result<(), ScanError> {
        if self.mode == mode && self.cursors.marked == pos {
            return Err(ScanError::NoProgress { offset: pos });
        }
        Ok(())
    }
}

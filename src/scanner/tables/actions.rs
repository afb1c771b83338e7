// src/scanner/tables/actions.rs
// The dispatch table entry attached to every accepting state. Every action
// id maps to exactly one self-contained spec: no integer-keyed fall-through,
// no dispatch order to get wrong.

use serde::{Deserialize, Serialize};

/// Grammar-level token kind, opaque to the engine. The concrete grammar maps
/// these back onto its own enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawKind(pub u16);

/// Index into the lexical mode registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeId(pub u16);

/// Attribute bit: the state accepts (a complete lexeme ends here).
pub const ATTR_FINAL: u8 = 1 << 0;
/// Attribute bit: no state reachable from here can improve the match; the
/// loop may exit immediately.
pub const ATTR_STOP_EARLY: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushbackAmount {
    /// Return the last `n` matched characters to the input.
    Chars(u32),
    /// Return the entire match; scanning restarts at the match start.
    All,
}

/// What to do when a scan halts on a state carrying this action. Total: every
/// accepting state names exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSpec {
    /// Return the matched span as a token.
    Emit(RawKind),
    /// Un-consume `count` trailing characters, then emit the shorter span.
    EmitPushback { kind: RawKind, count: u32 },
    /// Force the match to exactly `length` code points from its start, then
    /// emit. A deliberate, rule-specific escape from maximal munch.
    EmitFixedLookahead { kind: RawKind, length: u32 },
    /// No token: optionally push back, optionally switch mode, rescan.
    Skip {
        pushback: PushbackAmount,
        mode: Option<ModeId>,
    },
    /// Emit `kind` for the opening quote, remember which quote character it
    /// was, and continue in `mode`.
    OpenQuoted {
        kind: RawKind,
        quote: char,
        mode: ModeId,
    },
    /// Emit `kind`; if the remembered quote matches `quote`, also leave to
    /// `mode`. A non-matching quote is ordinary content.
    CloseQuotedIf {
        kind: RawKind,
        quote: char,
        mode: ModeId,
    },
    /// Start-condition rule for a leading parameter name: emit `kind` if the
    /// session was configured to, otherwise push the whole match back and
    /// rescan silently. Switches to `mode` either way.
    LeadingName { kind: RawKind, mode: ModeId },
}

//! Structural guarantees of the scan engine: exact tiling of the input,
//! deterministic re-scans, restartability at clean boundaries, and the
//! fatal-error paths for defective rule sets.

use relex::expr::{ExprLexer, ScanMode, ScannerConfig, tokenize};
use relex::scanner::tables::{GrammarBuilder, PushbackAmount};
use relex::scanner::{ActionSpec, ModeId, RawKind, ScanError, ScanTables, Scanner};

const NASTY: &str = "let x = a?.b ?? '..\\x4Híj\n}' /* note * / */ of \"a'b\\u12\" 1.€2@of)/*";

#[test]
fn tokens_tile_the_input() {
    let toks = tokenize(NASTY, &ScannerConfig::Expression).expect("scan failed");
    let mut at = 0;
    for t in &toks {
        assert_eq!(t.start, at, "gap or overlap before {t:?}");
        assert!(t.end > t.start, "zero-width token {t:?}");
        assert!(NASTY.is_char_boundary(t.end));
        at = t.end;
    }
    assert_eq!(at, NASTY.len());
}

#[test]
fn rescanning_is_deterministic() {
    let a = tokenize(NASTY, &ScannerConfig::Expression).expect("scan failed");
    let b = tokenize(NASTY, &ScannerConfig::Expression).expect("scan failed");
    assert_eq!(a, b);
}

#[test]
fn restart_at_clean_boundaries_reproduces_the_suffix() {
    let full = tokenize(NASTY, &ScannerConfig::Expression).expect("scan failed");

    let mut boundaries = Vec::new();
    let mut lexer = ExprLexer::new(NASTY);
    let mut idx = 0;
    loop {
        if lexer.mode() == ScanMode::Expression && lexer.quote().is_none() {
            boundaries.push((idx, lexer.offset()));
        }
        match lexer.next_token().expect("snapshot pass failed") {
            Some(_) => idx += 1,
            None => break,
        }
    }
    assert!(!boundaries.is_empty());

    for (idx, offset) in boundaries {
        let mut lexer = ExprLexer::new(NASTY);
        lexer.reset(NASTY, offset, NASTY.len(), ScanMode::Expression);
        let mut got = Vec::new();
        while let Some(t) = lexer.next_token().expect("rescan failed") {
            got.push(t);
        }
        assert_eq!(got.as_slice(), &full[idx..], "restart at offset {offset}");
    }
}

#[test]
fn concurrent_sessions_share_tables() {
    let srcs = ["a + b", "'x\\n'", "1.5 ?? of ", "@@@"];
    std::thread::scope(|s| {
        for src in srcs {
            s.spawn(move || {
                let one = tokenize(src, &ScannerConfig::Expression).expect("scan failed");
                let two = tokenize(src, &ScannerConfig::Expression).expect("scan failed");
                assert_eq!(one, two);
            });
        }
    });
}

// ---------- defective rule sets ----------

const KIND: RawKind = RawKind(1);
const BAD: RawKind = RawKind(0);

/// Two classes: `a` and everything else.
fn classify(c: char) -> u16 {
    u16::from(c == 'a')
}

fn tables_of(build: impl FnOnce(&mut GrammarBuilder)) -> ScanTables {
    let mut b = GrammarBuilder::new(2, BAD);
    build(&mut b);
    ScanTables::unpack(&b.pack(classify)).expect("synthetic tables failed validation")
}

#[test]
fn overlong_pushback_is_fatal() {
    let tables = tables_of(|b| {
        let a = b.action(ActionSpec::EmitPushback {
            kind: KIND,
            count: 5,
        });
        let start = b.state();
        let acc = b.accepting(a);
        b.edge(start, 1, acc);
        b.mode(start);
    });
    let mut scanner = Scanner::new(&tables, "aaa", ModeId(0));
    match scanner.next_token() {
        Err(ScanError::PushbackTooFar {
            requested: 5,
            available: 1,
        }) => {}
        other => panic!("expected PushbackTooFar, got {other:?}"),
    }
}

#[test]
fn zero_width_match_is_fatal() {
    // The mode's start state accepts by itself.
    let tables = tables_of(|b| {
        let a = b.action(ActionSpec::Emit(KIND));
        let start = b.accepting(a);
        b.mode(start);
    });
    let mut scanner = Scanner::new(&tables, "zz", ModeId(0));
    match scanner.next_token() {
        Err(ScanError::NoProgress { offset: 0 }) => {}
        other => panic!("expected NoProgress, got {other:?}"),
    }
}

#[test]
fn silent_rescan_without_progress_is_fatal() {
    // Push the whole match back without changing mode: an infinite loop if
    // it were not caught.
    let tables = tables_of(|b| {
        let a = b.action(ActionSpec::Skip {
            pushback: PushbackAmount::All,
            mode: None,
        });
        let start = b.state();
        let acc = b.accepting(a);
        b.edge(start, 1, acc);
        b.mode(start);
    });
    let mut scanner = Scanner::new(&tables, "a", ModeId(0));
    match scanner.next_token() {
        Err(ScanError::NoProgress { offset: 0 }) => {}
        other => panic!("expected NoProgress, got {other:?}"),
    }
}

#[test]
fn unknown_mode_is_fatal() {
    let tables = tables_of(|b| {
        let a = b.action(ActionSpec::Emit(KIND));
        let start = b.state();
        let acc = b.accepting(a);
        b.edge(start, 1, acc);
        b.mode(start);
    });
    let mut scanner = Scanner::new(&tables, "a", ModeId(7));
    assert!(matches!(
        scanner.next_token(),
        Err(ScanError::CorruptTables { .. })
    ));
}

#[test]
fn fixed_lookahead_beyond_match_is_fatal() {
    let tables = tables_of(|b| {
        let a = b.action(ActionSpec::EmitFixedLookahead {
            kind: KIND,
            length: 9,
        });
        let start = b.state();
        let acc = b.accepting(a);
        b.edge(start, 1, acc);
        b.mode(start);
    });
    let mut scanner = Scanner::new(&tables, "aaa", ModeId(0));
    assert!(matches!(
        scanner.next_token(),
        Err(ScanError::CorruptTables { .. })
    ));
}

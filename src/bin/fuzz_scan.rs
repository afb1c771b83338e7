// src/bin/fuzz_scan.rs
// Generate random expression-ish inputs (with deliberate junk mixed in) and
// check the scanner's structural guarantees on each:
//   - the token stream tiles the input exactly, no gaps, no overlaps
//   - scanning the same input twice yields the same stream
//   - restarting at a clean expression-mode boundary reproduces the suffix
// Knobs:
//   - SCAN_FUZZ_LEN=N     target input size in bytes (default 100000)
//   - SCAN_FUZZ_ITERS=N   iterations (default 5)
//   - SCAN_FUZZ_SEED=N    RNG seed (default 42)
//   - SCAN_FUZZ_INPUT=path  replay a saved case instead of generating

use std::fs;

use rand::{Rng, SeedableRng, rngs::StdRng};
use relex::expr::{ExprLexer, ScanMode, ScannerConfig, Token, tokenize};

fn main() {
    if let Ok(path) = std::env::var("SCAN_FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let s = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: failed to read {path}: {e}");
                std::process::exit(1);
            }
        };
        if !run_once(&s) {
            std::process::exit(1);
        }
        return;
    }

    let len: usize = env_num("SCAN_FUZZ_LEN", 100_000);
    let iters: usize = env_num("SCAN_FUZZ_ITERS", 5);
    let seed: u64 = env_num("SCAN_FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    for i in 0..iters {
        let s = gen_source(&mut rng, len);
        eprintln!("[fuzz] iter {i}: generated {} bytes", s.len());
        if !run_once(&s) {
            eprintln!("[fuzz] iter {i} FAILED (seed={seed})");
            std::process::exit(1);
        }
    }
    eprintln!("[fuzz] all iterations passed");
}

fn env_num<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

// ---------- checks ----------

fn run_once(src: &str) -> bool {
    let config = ScannerConfig::Expression;
    let first = match tokenize(src, &config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[scan] fatal error: {e}");
            dump_tail(src);
            return false;
        }
    };

    if !check_tiling(src, &first) {
        return false;
    }

    let second = tokenize(src, &config).expect("second pass failed where first succeeded");
    if first != second {
        eprintln!("[scan] second pass diverged from first");
        return false;
    }

    check_restarts(src, &first)
}

/// Tokens must cover `[0, len)` back to back.
fn check_tiling(src: &str, tokens: &[Token]) -> bool {
    let mut at = 0;
    for (i, t) in tokens.iter().enumerate() {
        if t.start != at || t.end <= t.start {
            eprintln!(
                "[tile] token #{i} spans {}..{} but previous ended at {at}",
                t.start, t.end
            );
            return false;
        }
        at = t.end;
    }
    if at != src.len() {
        eprintln!("[tile] stream ends at {at}, input has {} bytes", src.len());
        return false;
    }
    true
}

/// Re-scan from a few expression-mode token boundaries and require the
/// suffix streams to match the full scan.
fn check_restarts(src: &str, full: &[Token]) -> bool {
    // Collect (token index, offset) pairs where a fresh expression-mode
    // session would see the same context the full scan did.
    let mut boundaries = Vec::new();
    {
        let mut lexer = ExprLexer::new(src);
        let mut idx = 0;
        loop {
            if lexer.mode() == ScanMode::Expression && lexer.quote().is_none() {
                boundaries.push((idx, lexer.offset()));
            }
            match lexer.next_token() {
                Ok(Some(_)) => idx += 1,
                Ok(None) => break,
                Err(e) => {
                    eprintln!("[restart] snapshot pass failed: {e}");
                    return false;
                }
            }
        }
    }

    let step = (boundaries.len() / 8).max(1);
    for &(idx, offset) in boundaries.iter().step_by(step) {
        let mut lexer = ExprLexer::new(src);
        lexer.reset(src, offset, src.len(), ScanMode::Expression);
        let mut got = Vec::new();
        loop {
            match lexer.next_token() {
                Ok(Some(t)) => got.push(t),
                Ok(None) => break,
                Err(e) => {
                    eprintln!("[restart] rescan from {offset} failed: {e}");
                    return false;
                }
            }
        }
        if got != full[idx..] {
            eprintln!(
                "[restart] rescan from offset {offset} produced {} tokens, expected {}",
                got.len(),
                full.len() - idx
            );
            return false;
        }
    }
    true
}

fn dump_tail(src: &str) {
    let tail = src.len().saturating_sub(64);
    let mut at = tail;
    while !src.is_char_boundary(at) {
        at += 1;
    }
    eprintln!("[tail] {:?}", &src[at..]);
}

// ---------- generator ----------

const IDENT_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz_$";
const OPERATORS: &[&str] = &[
    "!", "!=", "!==", "#", "%", "&", "&&", "(", ")", "*", "+", ",", "-", ".", "/", ":", ";", "<",
    "<=", "=", "==", "===", ">", ">=", "?", "??", "?.", "[", "]", "^", "{", "}", "|", "||",
];
const KEYWORDS: &[&str] = &[
    "let", "as", "true", "false", "null", "of", "if", "var", "else", "this", "typeof", "undefined",
];
const JUNK: &[char] = &['@', '~', '`', '\u{0007}', '€', '∑', '中'];

fn gen_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        match rng.random_range(0u32..100) {
            0..=21 => push_ident(rng, &mut out),
            22..=29 => out.push_str(KEYWORDS[rng.random_range(0..KEYWORDS.len())]),
            30..=41 => push_number(rng, &mut out),
            42..=55 => push_ws(rng, &mut out),
            56..=69 => out.push_str(OPERATORS[rng.random_range(0..OPERATORS.len())]),
            70..=79 => push_string(rng, &mut out),
            80..=86 => push_comment(rng, &mut out),
            87..=93 => out.push(JUNK[rng.random_range(0..JUNK.len())]),
            94..=99 => out.push('\\'),
            _ => unreachable!(),
        }
    }

    // Trailer that closes any open construct and ends on a clean boundary.
    out.push_str("*/ \"x\" 0\n");
    out
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    for _ in 0..rng.random_range(1..10) {
        out.push(IDENT_CHARS[rng.random_range(0..IDENT_CHARS.len())] as char);
    }
}

fn push_number<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str(&rng.random_range(0u32..100_000).to_string());
    if rng.random_bool(0.3) {
        out.push('.');
        out.push_str(&rng.random_range(0u32..1000).to_string());
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    for _ in 0..rng.random_range(1..4) {
        out.push(match rng.random_range(0u32..4) {
            0 => '\n',
            1 => '\t',
            _ => ' ',
        });
    }
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    let quote = if rng.random_bool(0.5) { '"' } else { '\'' };
    out.push(quote);
    for _ in 0..rng.random_range(0..12) {
        match rng.random_range(0u32..10) {
            0 => out.push_str("\\n"),
            1 => out.push_str("\\x41"),
            2 => out.push_str("\\u0416"),
            3 => out.push_str(if quote == '"' { "\\\"" } else { "\\'" }),
            4 => out.push(if quote == '"' { '\'' } else { '"' }),
            _ => push_ident(rng, out),
        }
    }
    // Sometimes leave the string open so line ends terminate it instead.
    if rng.random_bool(0.9) {
        out.push(quote);
    } else {
        out.push('\n');
    }
}

fn push_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("/*");
    for _ in 0..rng.random_range(0..8) {
        match rng.random_range(0u32..4) {
            0 => out.push('*'),
            1 => out.push('\n'),
            _ => push_ident(rng, out),
        }
    }
    out.push_str("*/");
}

// src/expr/grammar.rs
// The expression language as table data: the character-class predicate and
// the hand-laid DFA fed to `GrammarBuilder`. Everything the engine does for
// this language is decided here, at compile time of the tables, not in code
// on the scan path.

use crate::scanner::tables::{GrammarBuilder, ModeId, PushbackAmount};
use crate::scanner::{ActionSpec, PackedScanTables};

use super::tokens::TokenKind;

// Mode ids in registration order. `compile` registers them in exactly this
// order, so the constants and the builder agree.
pub const MODE_INITIAL: ModeId = ModeId(0);
pub const MODE_EXPRESSION: ModeId = ModeId(1);
pub const MODE_IN_STRING: ModeId = ModeId(2);

// Character classes. Letters that begin or continue a keyword, a hex escape
// or the lookahead word get their own class; every other letter collapses
// into LETTER. OTHER is the default class and never carries a transition.
const OTHER: u16 = 0;
const WS: u16 = 1;
const NEWLINE: u16 = 2;
const EXCL: u16 = 3;
const DQUOTE: u16 = 4;
const SHARP: u16 = 5;
const PERCENT: u16 = 6;
const AMP: u16 = 7;
const SQUOTE: u16 = 8;
const LPAREN: u16 = 9;
const RPAREN: u16 = 10;
const STAR: u16 = 11;
const PLUS: u16 = 12;
const COMMA: u16 = 13;
const MINUS: u16 = 14;
const DOT: u16 = 15;
const SLASH: u16 = 16;
const DIGIT: u16 = 17;
const COLON: u16 = 18;
const SEMI: u16 = 19;
const LT: u16 = 20;
const EQ: u16 = 21;
const GT: u16 = 22;
const QUEST: u16 = 23;
const LBRACKET: u16 = 24;
const BACKSLASH: u16 = 25;
const RBRACKET: u16 = 26;
const CARET: u16 = 27;
const LBRACE: u16 = 28;
const BAR: u16 = 29;
const RBRACE: u16 = 30;
const L_A: u16 = 31;
const L_D: u16 = 32;
const L_E: u16 = 33;
const L_F: u16 = 34;
const L_H: u16 = 35;
const L_I: u16 = 36;
const L_L: u16 = 37;
const L_N: u16 = 38;
const L_O: u16 = 39;
const L_P: u16 = 40;
const L_R: u16 = 41;
const L_S: u16 = 42;
const L_T: u16 = 43;
const L_U: u16 = 44;
const L_V: u16 = 45;
const L_X: u16 = 46;
const L_Y: u16 = 47;
const HEX_REST: u16 = 48;
const LETTER: u16 = 49;
const N_CLASSES: u16 = 50;

/// Classes that can begin an identifier.
const NAME_START: [u16; 19] = [
    L_A, L_D, L_E, L_F, L_H, L_I, L_L, L_N, L_O, L_P, L_R, L_S, L_T, L_U, L_V, L_X, L_Y, HEX_REST,
    LETTER,
];
/// Classes that can continue one.
const NAME_CONT: [u16; 20] = [
    L_A, L_D, L_E, L_F, L_H, L_I, L_L, L_N, L_O, L_P, L_R, L_S, L_T, L_U, L_V, L_X, L_Y, HEX_REST,
    LETTER, DIGIT,
];
/// Hex digit classes: 0-9, a-f in either case.
const HEX: [u16; 6] = [DIGIT, L_A, L_D, L_E, L_F, HEX_REST];

pub fn char_class(c: char) -> u16 {
    match c {
        '!' => EXCL,
        '"' => DQUOTE,
        '#' => SHARP,
        '%' => PERCENT,
        '&' => AMP,
        '\'' => SQUOTE,
        '(' => LPAREN,
        ')' => RPAREN,
        '*' => STAR,
        '+' => PLUS,
        ',' => COMMA,
        '-' => MINUS,
        '.' => DOT,
        '/' => SLASH,
        '0'..='9' => DIGIT,
        ':' => COLON,
        ';' => SEMI,
        '<' => LT,
        '=' => EQ,
        '>' => GT,
        '?' => QUEST,
        '[' => LBRACKET,
        '\\' => BACKSLASH,
        ']' => RBRACKET,
        '^' => CARET,
        '{' => LBRACE,
        '|' => BAR,
        '}' => RBRACE,
        'a' => L_A,
        'd' => L_D,
        'e' => L_E,
        'f' => L_F,
        'h' => L_H,
        'i' => L_I,
        'l' => L_L,
        'n' => L_N,
        'o' => L_O,
        'p' => L_P,
        'r' => L_R,
        's' => L_S,
        't' => L_T,
        'u' => L_U,
        'v' => L_V,
        'x' => L_X,
        'y' => L_Y,
        'b' | 'c' | 'A'..='F' => HEX_REST,
        '_' | '$' => LETTER,
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => NEWLINE,
        c if c.is_whitespace() => WS,
        c if c.is_alphabetic() => LETTER,
        _ => OTHER,
    }
}

/// Build the complete table set for the expression language: the leading
/// block-parameter mode, the main expression mode and the in-string mode.
pub fn compile() -> PackedScanTables {
    let mut b = GrammarBuilder::new(N_CLASSES, TokenKind::BadCharacter.raw());

    let a_ws = b.action(ActionSpec::Emit(TokenKind::Whitespace.raw()));
    let a_ident = b.action(ActionSpec::Emit(TokenKind::Identifier.raw()));

    // ---- leading block-parameter mode ----

    let i_start = b.state();
    // Anything that is not whitespace or a name hands control to the
    // expression mode without consuming.
    let a_to_expr = b.action(ActionSpec::Skip {
        pushback: PushbackAmount::All,
        mode: Some(MODE_EXPRESSION),
    });
    let i_any = b.accepting(a_to_expr);
    b.edges_all_except(i_start, &[], i_any);

    let i_ws = b.accepting(a_ws);
    b.edges(i_start, &[WS, NEWLINE], i_ws);
    b.edges(i_ws, &[WS, NEWLINE], i_ws);

    let a_leading = b.action(ActionSpec::LeadingName {
        kind: TokenKind::BlockParameterName.raw(),
        mode: MODE_EXPRESSION,
    });
    let i_ident = b.accepting(a_leading);
    b.edges(i_start, &NAME_START, i_ident);
    b.edges(i_ident, &NAME_CONT, i_ident);

    // ---- expression mode ----

    let s_start = b.state();

    let s_ws = b.accepting(a_ws);
    b.edges(s_start, &[WS, NEWLINE], s_ws);
    b.edges(s_ws, &[WS, NEWLINE], s_ws);

    // Generic identifier; every keyword prefix below falls back into it.
    let s_ident = b.accepting(a_ident);
    b.edges(s_start, &NAME_START, s_ident);
    b.edges(s_ident, &NAME_CONT, s_ident);

    // Spell out a keyword as a chain of states starting at `from`. Each
    // prefix is a valid identifier, and any off-path name character falls
    // back to `s_ident`. Keywords sharing a prefix chain off its last state.
    let keyword = |b: &mut GrammarBuilder, from: u32, path: &[u16], action: u16| {
        let mut at = from;
        for (i, &cls) in path.iter().enumerate() {
            let next = if i + 1 == path.len() {
                b.accepting(action)
            } else {
                b.accepting(a_ident)
            };
            b.edges(next, &NAME_CONT, s_ident);
            b.edge(at, cls, next);
            at = next;
        }
        at
    };

    let a_let = b.action(ActionSpec::Emit(TokenKind::LetKeyword.raw()));
    keyword(&mut b, s_start, &[L_L, L_E, L_T], a_let);
    let a_as = b.action(ActionSpec::Emit(TokenKind::AsKeyword.raw()));
    keyword(&mut b, s_start, &[L_A, L_S], a_as);
    let a_false = b.action(ActionSpec::Emit(TokenKind::FalseKeyword.raw()));
    keyword(&mut b, s_start, &[L_F, L_A, L_L, L_S, L_E], a_false);
    let a_null = b.action(ActionSpec::Emit(TokenKind::NullKeyword.raw()));
    keyword(&mut b, s_start, &[L_N, L_U, L_L, L_L], a_null);
    let a_if = b.action(ActionSpec::Emit(TokenKind::IfKeyword.raw()));
    keyword(&mut b, s_start, &[L_I, L_F], a_if);
    let a_var = b.action(ActionSpec::Emit(TokenKind::VarKeyword.raw()));
    keyword(&mut b, s_start, &[L_V, L_A, L_R], a_var);
    let a_else = b.action(ActionSpec::Emit(TokenKind::ElseKeyword.raw()));
    keyword(&mut b, s_start, &[L_E, L_L, L_S, L_E], a_else);
    let a_undefined = b.action(ActionSpec::Emit(TokenKind::UndefinedKeyword.raw()));
    keyword(
        &mut b,
        s_start,
        &[L_U, L_N, L_D, L_E, L_F, L_I, L_N, L_E, L_D],
        a_undefined,
    );

    // `true`, `this` and `typeof` share the `t` prefix state.
    let s_t = keyword(&mut b, s_start, &[L_T], a_ident);
    let a_true = b.action(ActionSpec::Emit(TokenKind::TrueKeyword.raw()));
    keyword(&mut b, s_t, &[L_R, L_U, L_E], a_true);
    let a_this = b.action(ActionSpec::Emit(TokenKind::ThisKeyword.raw()));
    keyword(&mut b, s_t, &[L_H, L_I, L_S], a_this);
    let a_typeof = b.action(ActionSpec::Emit(TokenKind::TypeofKeyword.raw()));
    keyword(&mut b, s_t, &[L_Y, L_P, L_E, L_O, L_F], a_typeof);

    // `of` followed by whitespace: the match runs one character long, then
    // the action clips it back to the two code points of the word itself.
    let s_of = keyword(&mut b, s_start, &[L_O, L_F], a_ident);
    let a_of = b.action(ActionSpec::EmitFixedLookahead {
        kind: TokenKind::Identifier.raw(),
        length: 2,
    });
    let s_of_ws = b.accepting(a_of);
    b.stop_early(s_of_ws);
    b.edges(s_of, &[WS, NEWLINE], s_of_ws);

    // Numbers: integer part, optional fraction. A trailing dot is not part
    // of the number, so `1.` scans as a number then a dot.
    let a_num = b.action(ActionSpec::Emit(TokenKind::Number.raw()));
    let s_num = b.accepting(a_num);
    b.edge(s_start, DIGIT, s_num);
    b.edge(s_num, DIGIT, s_num);
    let s_num_dot = b.state();
    b.edge(s_num, DOT, s_num_dot);
    let s_num_frac = b.accepting(a_num);
    b.edge(s_num_dot, DIGIT, s_num_frac);
    b.edge(s_num_frac, DIGIT, s_num_frac);

    // Single-character operators.
    let single = |b: &mut GrammarBuilder, cls: u16, kind: TokenKind| {
        let a = b.action(ActionSpec::Emit(kind.raw()));
        let s = b.accepting(a);
        b.edge(s_start, cls, s);
        s
    };
    single(&mut b, SHARP, TokenKind::Sharp);
    single(&mut b, PERCENT, TokenKind::Percent);
    single(&mut b, LPAREN, TokenKind::LParen);
    single(&mut b, RPAREN, TokenKind::RParen);
    single(&mut b, STAR, TokenKind::Star);
    single(&mut b, PLUS, TokenKind::Plus);
    single(&mut b, COMMA, TokenKind::Comma);
    single(&mut b, MINUS, TokenKind::Minus);
    single(&mut b, DOT, TokenKind::Dot);
    single(&mut b, COLON, TokenKind::Colon);
    single(&mut b, SEMI, TokenKind::Semicolon);
    single(&mut b, LBRACKET, TokenKind::LBracket);
    single(&mut b, RBRACKET, TokenKind::RBracket);
    single(&mut b, CARET, TokenKind::Caret);
    single(&mut b, LBRACE, TokenKind::LBrace);
    single(&mut b, RBRACE, TokenKind::RBrace);

    // Multi-character operators extend a single-character prefix.
    let extend = |b: &mut GrammarBuilder, from: u32, cls: u16, kind: TokenKind| {
        let a = b.action(ActionSpec::Emit(kind.raw()));
        let s = b.accepting(a);
        b.edge(from, cls, s);
        s
    };
    let s_excl = single(&mut b, EXCL, TokenKind::Excl);
    let s_ne = extend(&mut b, s_excl, EQ, TokenKind::Ne);
    extend(&mut b, s_ne, EQ, TokenKind::NeStrict);
    let s_eq = single(&mut b, EQ, TokenKind::Eq);
    let s_eq_eq = extend(&mut b, s_eq, EQ, TokenKind::EqEq);
    extend(&mut b, s_eq_eq, EQ, TokenKind::EqEqEq);
    let s_lt = single(&mut b, LT, TokenKind::Lt);
    extend(&mut b, s_lt, EQ, TokenKind::Le);
    let s_gt = single(&mut b, GT, TokenKind::Gt);
    extend(&mut b, s_gt, EQ, TokenKind::Ge);
    let s_amp = single(&mut b, AMP, TokenKind::And);
    extend(&mut b, s_amp, AMP, TokenKind::AndAnd);
    let s_bar = single(&mut b, BAR, TokenKind::Or);
    extend(&mut b, s_bar, BAR, TokenKind::OrOr);
    let s_quest = single(&mut b, QUEST, TokenKind::Quest);
    extend(&mut b, s_quest, QUEST, TokenKind::QuestQuest);
    extend(&mut b, s_quest, DOT, TokenKind::Elvis);

    // `/` and block comments. An unterminated comment never accepts past
    // the slash, so the scan falls back to emitting the slash alone.
    let s_slash = single(&mut b, SLASH, TokenKind::Div);
    let s_cmt = b.state();
    b.edge(s_slash, STAR, s_cmt);
    b.edges_all_except(s_cmt, &[STAR], s_cmt);
    let s_cmt_star = b.state();
    b.edge(s_cmt, STAR, s_cmt_star);
    b.edges_all_except(s_cmt_star, &[STAR, SLASH], s_cmt);
    b.edge(s_cmt_star, STAR, s_cmt_star);
    let a_cmt = b.action(ActionSpec::Emit(TokenKind::Comment.raw()));
    let s_cmt_end = b.accepting(a_cmt);
    b.stop_early(s_cmt_end);
    b.edge(s_cmt_star, SLASH, s_cmt_end);

    // Opening quotes remember which character opened the string.
    let a_open_d = b.action(ActionSpec::OpenQuoted {
        kind: TokenKind::Quote.raw(),
        quote: '"',
        mode: MODE_IN_STRING,
    });
    let s_open_d = b.accepting(a_open_d);
    b.edge(s_start, DQUOTE, s_open_d);
    let a_open_s = b.action(ActionSpec::OpenQuoted {
        kind: TokenKind::Quote.raw(),
        quote: '\'',
        mode: MODE_IN_STRING,
    });
    let s_open_s = b.accepting(a_open_s);
    b.edge(s_start, SQUOTE, s_open_s);

    // ---- in-string mode ----

    let t_start = b.state();

    // Plain content: everything except quotes, backslash and line ends.
    let a_part = b.action(ActionSpec::Emit(TokenKind::StringPart.raw()));
    let t_body = b.accepting(a_part);
    b.edges_all_except(t_start, &[DQUOTE, SQUOTE, BACKSLASH, NEWLINE], t_body);
    b.edges_all_except(t_body, &[DQUOTE, SQUOTE, BACKSLASH, NEWLINE], t_body);

    // A quote closes the string only if it matches the one that opened it;
    // otherwise it is emitted in place and the string continues.
    let a_close_d = b.action(ActionSpec::CloseQuotedIf {
        kind: TokenKind::Quote.raw(),
        quote: '"',
        mode: MODE_EXPRESSION,
    });
    let t_close_d = b.accepting(a_close_d);
    b.edge(t_start, DQUOTE, t_close_d);
    let a_close_s = b.action(ActionSpec::CloseQuotedIf {
        kind: TokenKind::Quote.raw(),
        quote: '\'',
        mode: MODE_EXPRESSION,
    });
    let t_close_s = b.accepting(a_close_s);
    b.edge(t_start, SQUOTE, t_close_s);

    // A line end is never string content: hand it back to the expression
    // mode, which scans it as whitespace.
    let a_unterminated = b.action(ActionSpec::Skip {
        pushback: PushbackAmount::All,
        mode: Some(MODE_EXPRESSION),
    });
    let t_newline = b.accepting(a_unterminated);
    b.edge(t_start, NEWLINE, t_newline);

    // Escapes. A lone backslash, or a truncated \x / \u form, is an invalid
    // escape covering whatever it managed to match.
    let a_escape = b.action(ActionSpec::Emit(TokenKind::EscapeSequence.raw()));
    let a_invalid = b.action(ActionSpec::Emit(TokenKind::InvalidEscape.raw()));
    let t_esc = b.accepting(a_invalid);
    b.edge(t_start, BACKSLASH, t_esc);
    let t_esc_char = b.accepting(a_escape);
    b.edges_all_except(t_esc, &[L_X, L_U, NEWLINE], t_esc_char);

    // A non-hex character after \x or \u is consumed, then pushed back so
    // the invalid escape ends right before it.
    let a_bad_esc = b.action(ActionSpec::EmitPushback {
        kind: TokenKind::InvalidEscape.raw(),
        count: 1,
    });
    let t_esc_bad = b.accepting(a_bad_esc);

    let hex_run = |b: &mut GrammarBuilder, from: u32, len: usize| {
        let mut at = from;
        for i in 0..len {
            let next = if i + 1 == len {
                b.accepting(a_escape)
            } else {
                b.accepting(a_invalid)
            };
            let mut skip = HEX.to_vec();
            skip.push(NEWLINE);
            b.edges_all_except(at, &skip, t_esc_bad);
            b.edges(at, &HEX, next);
            at = next;
        }
    };
    let t_esc_x = b.accepting(a_invalid);
    b.edge(t_esc, L_X, t_esc_x);
    hex_run(&mut b, t_esc_x, 2);
    let t_esc_u = b.accepting(a_invalid);
    b.edge(t_esc, L_U, t_esc_u);
    hex_run(&mut b, t_esc_u, 4);

    let initial = b.mode(i_start);
    let expression = b.mode(s_start);
    let in_string = b.mode(t_start);
    debug_assert_eq!(initial, MODE_INITIAL);
    debug_assert_eq!(expression, MODE_EXPRESSION);
    debug_assert_eq!(in_string, MODE_IN_STRING);

    b.pack(char_class)
}

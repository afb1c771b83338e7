//! Token-stream tests for the expression lexer: keywords, operators,
//! numbers, strings and escapes, comments, lexical modes, and the leading
//! block-parameter rules.

use relex::expr::TokenKind::{self, *};
use relex::expr::{ExprLexer, ScanMode, ScannerConfig, tokenize};

fn kinds_and_text(src: &str) -> Vec<(TokenKind, String)> {
    kinds_and_text_cfg(src, &ScannerConfig::Expression)
}

fn kinds_and_text_cfg(src: &str, config: &ScannerConfig) -> Vec<(TokenKind, String)> {
    tokenize(src, config)
        .expect("scan failed")
        .iter()
        .map(|t| (t.kind, t.text(src).to_string()))
        .collect()
}

fn block(name: &str, index: u32) -> ScannerConfig {
    ScannerConfig::BlockParameter {
        block: name.to_string(),
        index,
    }
}

#[test]
fn simple_expression() {
    assert_eq!(
        kinds_and_text("a+b"),
        vec![
            (Identifier, "a".to_string()),
            (Plus, "+".to_string()),
            (Identifier, "b".to_string()),
        ]
    );
    assert_eq!(
        kinds_and_text("a + b"),
        vec![
            (Identifier, "a".to_string()),
            (Whitespace, " ".to_string()),
            (Plus, "+".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "b".to_string()),
        ]
    );
}

#[test]
fn keywords_and_near_keywords() {
    assert_eq!(
        kinds_and_text("let x = true"),
        vec![
            (LetKeyword, "let".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "x".to_string()),
            (Whitespace, " ".to_string()),
            (Eq, "=".to_string()),
            (Whitespace, " ".to_string()),
            (TrueKeyword, "true".to_string()),
        ]
    );
    // A keyword followed by more name characters is a plain identifier.
    assert_eq!(kinds_and_text("lets"), vec![(Identifier, "lets".to_string())]);
    assert_eq!(kinds_and_text("nullx"), vec![(Identifier, "nullx".to_string())]);
    assert_eq!(kinds_and_text("fals"), vec![(Identifier, "fals".to_string())]);
    assert_eq!(
        kinds_and_text("as false null"),
        vec![
            (AsKeyword, "as".to_string()),
            (Whitespace, " ".to_string()),
            (FalseKeyword, "false".to_string()),
            (Whitespace, " ".to_string()),
            (NullKeyword, "null".to_string()),
        ]
    );
    assert_eq!(
        kinds_and_text("if var else undefined"),
        vec![
            (IfKeyword, "if".to_string()),
            (Whitespace, " ".to_string()),
            (VarKeyword, "var".to_string()),
            (Whitespace, " ".to_string()),
            (ElseKeyword, "else".to_string()),
            (Whitespace, " ".to_string()),
            (UndefinedKeyword, "undefined".to_string()),
        ]
    );
    // `true`, `this` and `typeof` diverge after a shared first letter.
    assert_eq!(
        kinds_and_text("true this typeof"),
        vec![
            (TrueKeyword, "true".to_string()),
            (Whitespace, " ".to_string()),
            (ThisKeyword, "this".to_string()),
            (Whitespace, " ".to_string()),
            (TypeofKeyword, "typeof".to_string()),
        ]
    );
    assert_eq!(kinds_and_text("t"), vec![(Identifier, "t".to_string())]);
    assert_eq!(kinds_and_text("thisx"), vec![(Identifier, "thisx".to_string())]);
    assert_eq!(kinds_and_text("typeo"), vec![(Identifier, "typeo".to_string())]);
    assert_eq!(
        kinds_and_text("undefine"),
        vec![(Identifier, "undefine".to_string())]
    );
    assert_eq!(kinds_and_text("iff"), vec![(Identifier, "iff".to_string())]);
}

#[test]
fn of_before_whitespace_is_clipped_to_two_chars() {
    assert_eq!(
        kinds_and_text("x of y"),
        vec![
            (Identifier, "x".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "of".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "y".to_string()),
        ]
    );
    // The whitespace after `of` is observed but not consumed.
    let toks = tokenize("of ", &ScannerConfig::Expression).expect("scan failed");
    assert_eq!(toks[0].start, 0);
    assert_eq!(toks[0].end, 2);
    assert_eq!(toks[1].kind, Whitespace);
    assert_eq!(toks[1].start, 2);
}

#[test]
fn of_without_whitespace() {
    assert_eq!(kinds_and_text("of"), vec![(Identifier, "of".to_string())]);
    assert_eq!(kinds_and_text("ofx"), vec![(Identifier, "ofx".to_string())]);
    assert_eq!(
        kinds_and_text("of)"),
        vec![(Identifier, "of".to_string()), (RParen, ")".to_string())]
    );
}

#[test]
fn numbers() {
    assert_eq!(kinds_and_text("1.5"), vec![(Number, "1.5".to_string())]);
    // A trailing dot is a member access, not part of the number.
    assert_eq!(
        kinds_and_text("1."),
        vec![(Number, "1".to_string()), (Dot, ".".to_string())]
    );
    assert_eq!(
        kinds_and_text("12.34.5"),
        vec![
            (Number, "12.34".to_string()),
            (Dot, ".".to_string()),
            (Number, "5".to_string()),
        ]
    );
}

#[test]
fn multi_char_operators_munch_maximally() {
    assert_eq!(kinds_and_text("==="), vec![(EqEqEq, "===".to_string())]);
    assert_eq!(
        kinds_and_text("== ="),
        vec![
            (EqEq, "==".to_string()),
            (Whitespace, " ".to_string()),
            (Eq, "=".to_string()),
        ]
    );
    assert_eq!(kinds_and_text("!=="), vec![(NeStrict, "!==".to_string())]);
    assert_eq!(
        kinds_and_text("a?.b ?? c"),
        vec![
            (Identifier, "a".to_string()),
            (Elvis, "?.".to_string()),
            (Identifier, "b".to_string()),
            (Whitespace, " ".to_string()),
            (QuestQuest, "??".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "c".to_string()),
        ]
    );
}

#[test]
fn block_comment() {
    assert_eq!(
        kinds_and_text("a/* b * c */d"),
        vec![
            (Identifier, "a".to_string()),
            (Comment, "/* b * c */".to_string()),
            (Identifier, "d".to_string()),
        ]
    );
}

#[test]
fn unterminated_comment_falls_back_to_slash() {
    assert_eq!(
        kinds_and_text("/* x"),
        vec![
            (Div, "/".to_string()),
            (Star, "*".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "x".to_string()),
        ]
    );
}

#[test]
fn strings() {
    assert_eq!(
        kinds_and_text("'ab'"),
        vec![
            (Quote, "'".to_string()),
            (StringPart, "ab".to_string()),
            (Quote, "'".to_string()),
        ]
    );
    // The other quote character is ordinary content inside a string.
    assert_eq!(
        kinds_and_text("\"a'b\""),
        vec![
            (Quote, "\"".to_string()),
            (StringPart, "a".to_string()),
            (Quote, "'".to_string()),
            (StringPart, "b".to_string()),
            (Quote, "\"".to_string()),
        ]
    );
}

#[test]
fn escapes() {
    assert_eq!(
        kinds_and_text(r#"'a\n\x41\Жb'"#),
        vec![
            (Quote, "'".to_string()),
            (StringPart, "a".to_string()),
            (EscapeSequence, r"\n".to_string()),
            (EscapeSequence, r"\x41".to_string()),
            (EscapeSequence, r"\Ж".to_string()),
            (StringPart, "b".to_string()),
            (Quote, "'".to_string()),
        ]
    );
    assert_eq!(
        kinds_and_text(r"'\''"),
        vec![
            (Quote, "'".to_string()),
            (EscapeSequence, r"\'".to_string()),
            (Quote, "'".to_string()),
        ]
    );
    // A bare non-ASCII letter is ordinary string content, not an escape.
    assert_eq!(
        kinds_and_text("'Жb'"),
        vec![
            (Quote, "'".to_string()),
            (StringPart, "Жb".to_string()),
            (Quote, "'".to_string()),
        ]
    );
}

#[test]
fn truncated_hex_escape_pushes_back_the_offender() {
    // The closing quote after `\x4` must not be swallowed by the escape.
    assert_eq!(
        kinds_and_text(r"'\x4'"),
        vec![
            (Quote, "'".to_string()),
            (InvalidEscape, r"\x4".to_string()),
            (Quote, "'".to_string()),
        ]
    );
    assert_eq!(
        kinds_and_text(r"'\xg'"),
        vec![
            (Quote, "'".to_string()),
            (InvalidEscape, r"\x".to_string()),
            (StringPart, "g".to_string()),
            (Quote, "'".to_string()),
        ]
    );
}

#[test]
fn lone_backslash_at_end_of_string_is_invalid() {
    assert_eq!(
        kinds_and_text("'a\\"),
        vec![
            (Quote, "'".to_string()),
            (StringPart, "a".to_string()),
            (InvalidEscape, "\\".to_string()),
        ]
    );
}

#[test]
fn unterminated_string_at_eof() {
    let src = "\"abc";
    let mut lexer = ExprLexer::new(src);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, Quote);
    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!((t.kind, t.text(src)), (StringPart, "abc"));
    assert!(lexer.next_token().unwrap().is_none());
    // The session still reports where it stopped.
    assert_eq!(lexer.mode(), ScanMode::InString);
    assert_eq!(lexer.quote(), Some('"'));
}

#[test]
fn line_end_terminates_string() {
    assert_eq!(
        kinds_and_text("'ab\nc"),
        vec![
            (Quote, "'".to_string()),
            (StringPart, "ab".to_string()),
            (Whitespace, "\n".to_string()),
            (Identifier, "c".to_string()),
        ]
    );
}

#[test]
fn bad_characters_cover_one_code_point() {
    assert_eq!(
        kinds_and_text("a @ b"),
        vec![
            (Identifier, "a".to_string()),
            (Whitespace, " ".to_string()),
            (BadCharacter, "@".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "b".to_string()),
        ]
    );
    // Multi-byte junk stays a single token of the full code point.
    assert_eq!(kinds_and_text("€"), vec![(BadCharacter, "€".to_string())]);
    assert_eq!(kinds_and_text("\\"), vec![(BadCharacter, "\\".to_string())]);
}

#[test]
fn leading_block_parameter_name() {
    // A non-primary-expression block names its first argument.
    assert_eq!(
        kinds_and_text_cfg("item of items", &block("each", 0)),
        vec![
            (BlockParameterName, "item".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "of".to_string()),
            (Whitespace, " ".to_string()),
            (Identifier, "items".to_string()),
        ]
    );
    // Later arguments of any block do.
    assert_eq!(
        kinds_and_text_cfg("acc", &block("for", 1))[0],
        (BlockParameterName, "acc".to_string())
    );
    // The first argument of `if`/`switch`/`for` is an expression.
    assert_eq!(
        kinds_and_text_cfg("cond", &block("if", 0))[0],
        (Identifier, "cond".to_string())
    );
}

#[test]
fn leading_whitespace_keeps_parameter_position() {
    assert_eq!(
        kinds_and_text_cfg("  item", &block("each", 0)),
        vec![
            (Whitespace, "  ".to_string()),
            (BlockParameterName, "item".to_string()),
        ]
    );
}

#[test]
fn non_name_start_forfeits_parameter_position() {
    assert_eq!(
        kinds_and_text_cfg("(item)", &block("each", 0)),
        vec![
            (LParen, "(".to_string()),
            (Identifier, "item".to_string()),
            (RParen, ")".to_string()),
        ]
    );
}

#[test]
fn mode_and_quote_are_observable() {
    let src = "'a";
    let mut lexer = ExprLexer::new(src);
    assert_eq!(lexer.mode(), ScanMode::Initial);
    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!(t.kind, Quote);
    assert_eq!(lexer.mode(), ScanMode::InString);
    assert_eq!(lexer.quote(), Some('\''));
    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!(t.kind, StringPart);

    let src = "'a'";
    let mut lexer = ExprLexer::new(src);
    while lexer.next_token().unwrap().is_some() {}
    assert_eq!(lexer.mode(), ScanMode::Expression);
    assert_eq!(lexer.quote(), None);
}

#[test]
fn eof_is_sticky() {
    let mut lexer = ExprLexer::new("x");
    assert!(lexer.next_token().unwrap().is_some());
    assert!(lexer.next_token().unwrap().is_none());
    assert!(lexer.next_token().unwrap().is_none());
}

#[test]
fn empty_input() {
    assert!(tokenize("", &ScannerConfig::Expression)
        .expect("scan failed")
        .is_empty());
}

#[test]
fn reset_into_expression_mode() {
    let src = "x 'y' z";
    let full = tokenize(src, &ScannerConfig::Expression).expect("scan failed");

    // Restart at the whitespace after the closed string.
    let mut lexer = ExprLexer::new(src);
    lexer.reset(src, 5, src.len(), ScanMode::Expression);
    let mut got = Vec::new();
    while let Some(t) = lexer.next_token().unwrap() {
        got.push(t);
    }
    assert_eq!(got.as_slice(), &full[full.len() - got.len()..]);
}

#[test]
fn reset_into_string_mode_with_quote() {
    let src = "'abc'";
    let mut lexer = ExprLexer::new(src);
    lexer.reset(src, 1, src.len(), ScanMode::InString);
    lexer.set_quote(Some('\''));

    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!((t.kind, t.start, t.end), (StringPart, 1, 4));
    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!((t.kind, t.start, t.end), (Quote, 4, 5));
    assert_eq!(lexer.mode(), ScanMode::Expression);
    assert_eq!(lexer.quote(), None);
}

#[test]
fn same_span_under_two_modes() {
    let src = "abc";
    let mut lexer = ExprLexer::new(src);
    lexer.reset(src, 0, 3, ScanMode::Expression);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, Identifier);

    lexer.reset(src, 0, 3, ScanMode::InString);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, StringPart);
}

#[test]
fn window_ends_mid_input() {
    let src = "abc def";
    let mut lexer = ExprLexer::new(src);
    lexer.reset(src, 0, 3, ScanMode::Expression);
    let t = lexer.next_token().unwrap().unwrap();
    assert_eq!((t.kind, t.start, t.end), (Identifier, 0, 3));
    assert!(lexer.next_token().unwrap().is_none());
}

// src/expr/tokens.rs
use crate::scanner::RawKind;

/// Token kinds of the expression language. The discriminant doubles as the
/// raw kind carried through the scan tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenKind {
    /// Reserved recovery kind: one unscannable code point.
    BadCharacter = 0,
    Whitespace = 1,
    Identifier = 2,
    Number = 3,
    LetKeyword = 4,
    AsKeyword = 5,
    TrueKeyword = 6,
    FalseKeyword = 7,
    NullKeyword = 8,
    StringPart = 9,
    EscapeSequence = 10,
    InvalidEscape = 11,
    Comment = 12,
    BlockParameterName = 13,
    Quote = 14,
    Excl = 15,
    Sharp = 16,
    Percent = 17,
    And = 18,
    AndAnd = 19,
    LParen = 20,
    RParen = 21,
    Star = 22,
    Plus = 23,
    Comma = 24,
    Minus = 25,
    Dot = 26,
    Div = 27,
    Colon = 28,
    Semicolon = 29,
    Lt = 30,
    Le = 31,
    Gt = 32,
    Ge = 33,
    Eq = 34,
    EqEq = 35,
    EqEqEq = 36,
    Ne = 37,
    NeStrict = 38,
    Quest = 39,
    QuestQuest = 40,
    Elvis = 41,
    LBracket = 42,
    RBracket = 43,
    Caret = 44,
    LBrace = 45,
    RBrace = 46,
    Or = 47,
    OrOr = 48,
    IfKeyword = 49,
    VarKeyword = 50,
    ElseKeyword = 51,
    ThisKeyword = 52,
    TypeofKeyword = 53,
    UndefinedKeyword = 54,
}

impl TokenKind {
    pub const fn raw(self) -> RawKind {
        RawKind(self as u16)
    }

    pub fn from_raw(kind: RawKind) -> Option<Self> {
        use TokenKind::*;
        Some(match kind.0 {
            0 => BadCharacter,
            1 => Whitespace,
            2 => Identifier,
            3 => Number,
            4 => LetKeyword,
            5 => AsKeyword,
            6 => TrueKeyword,
            7 => FalseKeyword,
            8 => NullKeyword,
            9 => StringPart,
            10 => EscapeSequence,
            11 => InvalidEscape,
            12 => Comment,
            13 => BlockParameterName,
            14 => Quote,
            15 => Excl,
            16 => Sharp,
            17 => Percent,
            18 => And,
            19 => AndAnd,
            20 => LParen,
            21 => RParen,
            22 => Star,
            23 => Plus,
            24 => Comma,
            25 => Minus,
            26 => Dot,
            27 => Div,
            28 => Colon,
            29 => Semicolon,
            30 => Lt,
            31 => Le,
            32 => Gt,
            33 => Ge,
            34 => Eq,
            35 => EqEq,
            36 => EqEqEq,
            37 => Ne,
            38 => NeStrict,
            39 => Quest,
            40 => QuestQuest,
            41 => Elvis,
            42 => LBracket,
            43 => RBracket,
            44 => Caret,
            45 => LBrace,
            46 => RBrace,
            47 => Or,
            48 => OrOr,
            49 => IfKeyword,
            50 => VarKeyword,
            51 => ElseKeyword,
            52 => ThisKeyword,
            53 => TypeofKeyword,
            54 => UndefinedKeyword,
            _ => return None,
        })
    }

    /// True for kinds that carry no expression meaning on their own.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

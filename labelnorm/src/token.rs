use std::slice;

/// One interpreted run of a label.
///
/// `input` is what was written, `cps` is what it resolves to in the
/// normalized output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Codepoints kept as written.
    Valid { cps: Vec<u32> },
    /// One codepoint replaced by zero or more others.
    Mapped { cp: u32, cps: Vec<u32> },
    /// One codepoint dropped from the output.
    Ignored { cp: u32 },
    /// One codepoint that makes the label invalid.
    Disallowed { cp: u32 },
    /// A run whose composition changed under NFC.
    Nfc { input: Vec<u32>, cps: Vec<u32> },
    /// An emoji sequence, with presentation selectors removed in `cps`.
    Emoji { input: Vec<u32>, cps: Vec<u32> },
}

impl Token {
    /// The type tag: `valid`, `mapped`, `ignored`, `disallowed`, `nfc` or `emoji`.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Valid { .. } => "valid",
            Token::Mapped { .. } => "mapped",
            Token::Ignored { .. } => "ignored",
            Token::Disallowed { .. } => "disallowed",
            Token::Nfc { .. } => "nfc",
            Token::Emoji { .. } => "emoji",
        }
    }

    pub fn input(&self) -> &[u32] {
        match self {
            Token::Valid { cps } => cps.as_slice(),
            Token::Mapped { cp, .. } | Token::Ignored { cp } | Token::Disallowed { cp } => slice::from_ref(cp),
            Token::Nfc { input, .. } | Token::Emoji { input, .. } => input.as_slice(),
        }
    }

    pub fn cps(&self) -> &[u32] {
        match self {
            Token::Ignored { .. } => &[][..],
            Token::Disallowed { cp } => slice::from_ref(cp),
            Token::Valid { cps } | Token::Mapped { cps, .. } | Token::Nfc { cps, .. } | Token::Emoji { cps, .. } => {
                cps.as_slice()
            }
        }
    }

    pub fn is_emoji(&self) -> bool {
        matches!(self, Token::Emoji { .. })
    }

    /// True when what was written differs from what it resolves to.
    pub fn is_changed(&self) -> bool {
        self.input() != self.cps()
    }
}

/// Concatenate the resolved codepoints of every token.
pub fn flatten_cps(tokens: &[Token]) -> Vec<u32> {
    tokens.iter().flat_map(|t| t.cps().iter().copied()).collect()
}

//! Tags for graph links.
//!
//! This is kept as a separate module so the u8 repr is not exposed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tag {
    Nil = Self::NIL,
    Lam = Self::LAM,
    App = Self::APP,
    Par = Self::PAR,
    Dp0 = Self::DP0,
    Dp1 = Self::DP1,
    Var = Self::VAR,
    Arg = Self::ARG,
    Ctr = Self::CTR,
    Cal = Self::CAL,
    Op2 = Self::OP2,
    U32 = Self::NUM,
}

impl Tag {
    const NIL: u8 = 0;
    const LAM: u8 = 1;
    const APP: u8 = 2;
    const PAR: u8 = 3;
    const DP0: u8 = 4;
    const DP1: u8 = 5;
    const VAR: u8 = 6;
    const ARG: u8 = 7;
    const CTR: u8 = 8;
    const CAL: u8 = 9;
    const OP2: u8 = 10;
    const NUM: u8 = 11;

    /// Short lowercase name, as used in the text form of a link.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Nil => "nil",
            Tag::Lam => "lam",
            Tag::App => "app",
            Tag::Par => "par",
            Tag::Dp0 => "dp0",
            Tag::Dp1 => "dp1",
            Tag::Var => "var",
            Tag::Arg => "arg",
            Tag::Ctr => "ctr",
            Tag::Cal => "cal",
            Tag::Op2 => "op2",
            Tag::U32 => "u32",
        }
    }
}

/// Codes 12 to 15 are not node kinds; links are only built with valid tags.
impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            Self::NIL => Tag::Nil,
            Self::LAM => Tag::Lam,
            Self::APP => Tag::App,
            Self::PAR => Tag::Par,
            Self::DP0 => Tag::Dp0,
            Self::DP1 => Tag::Dp1,
            Self::VAR => Tag::Var,
            Self::ARG => Tag::Arg,
            Self::CTR => Tag::Ctr,
            Self::CAL => Tag::Cal,
            Self::OP2 => Tag::Op2,
            Self::NUM => Tag::U32,
            v => unreachable!("invalid tag value {v}"),
        }
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..=Self::NUM)
            .map(Tag::from)
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("invalid tag {}", s))
    }
}

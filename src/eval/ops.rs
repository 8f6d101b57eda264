//! Numeric operators for OP2 nodes.
//!
//! All arithmetic is on unsigned 32-bit values and wraps.
//! Division and modulo by zero yield 0; shift amounts are taken modulo 32.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Mod = 4,
    And = 5,
    Or = 6,
    Xor = 7,
    Shl = 8,
    Shr = 9,
    Ltn = 10,
    Lte = 11,
    Eql = 12,
    Gte = 13,
    Gtn = 14,
    Neq = 15,
}

const OPS: [Op; 16] = [
    Op::Add,
    Op::Sub,
    Op::Mul,
    Op::Div,
    Op::Mod,
    Op::And,
    Op::Or,
    Op::Xor,
    Op::Shl,
    Op::Shr,
    Op::Ltn,
    Op::Lte,
    Op::Eql,
    Op::Gte,
    Op::Gtn,
    Op::Neq,
];

impl Op {
    /// Decode a 4-bit operator code. Every code is a valid operator.
    pub fn from_code(code: u8) -> Op {
        OPS[(code & 0xF) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Mod => "mod",
            Op::And => "and",
            Op::Or => "or",
            Op::Xor => "xor",
            Op::Shl => "shl",
            Op::Shr => "shr",
            Op::Ltn => "ltn",
            Op::Lte => "lte",
            Op::Eql => "eql",
            Op::Gte => "gte",
            Op::Gtn => "gtn",
            Op::Neq => "neq",
        }
    }

    pub fn apply(self, a: u32, b: u32) -> u32 {
        match self {
            Op::Add => a.wrapping_add(b),
            Op::Sub => a.wrapping_sub(b),
            Op::Mul => a.wrapping_mul(b),
            Op::Div => a.checked_div(b).unwrap_or(0),
            Op::Mod => a.checked_rem(b).unwrap_or(0),
            Op::And => a & b,
            Op::Or => a | b,
            Op::Xor => a ^ b,
            Op::Shl => a.wrapping_shl(b),
            Op::Shr => a.wrapping_shr(b),
            Op::Ltn => (a < b) as u32,
            Op::Lte => (a <= b) as u32,
            Op::Eql => (a == b) as u32,
            Op::Gte => (a >= b) as u32,
            Op::Gtn => (a > b) as u32,
            Op::Neq => (a != b) as u32,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OPS.iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("invalid operator {}", s))
    }
}

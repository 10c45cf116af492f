use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int(u16),
}

impl Type {
    /// The value domain of every LOOP variable.
    pub const I64: Type = Type::Int(64);

    pub fn bits(&self) -> u16 {
        match self {
            Type::Int(bits) => *bits,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int(bits) => write!(f, "i{}", bits),
        }
    }
}

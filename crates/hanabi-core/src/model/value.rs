use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Value {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Value {
    pub const ORDERED: [Value; 5] = [Value::One, Value::Two, Value::Three, Value::Four, Value::Five];

    /// Physical copies printed per value, lowest to highest.
    pub const COPIES: [u8; 5] = [3, 2, 2, 2, 1];

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Value::One),
            2 => Some(Value::Two),
            3 => Some(Value::Three),
            4 => Some(Value::Four),
            5 => Some(Value::Five),
            _ => None,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Value::One),
            1 => Some(Value::Two),
            2 => Some(Value::Three),
            3 => Some(Value::Four),
            4 => Some(Value::Five),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn copies(self) -> u8 {
        Self::COPIES[self.index()]
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

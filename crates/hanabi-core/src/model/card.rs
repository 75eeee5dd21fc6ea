use crate::model::color::Color;
use crate::model::value::Value;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub value: Value,
    pub color: Color,
}

impl Card {
    pub const fn new(value: Value, color: Color) -> Self {
        Self { value, color }
    }

    pub const fn copies(self) -> u8 {
        self.value.copies()
    }

    pub const fn is_five(self) -> bool {
        matches!(self.value, Value::Five)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.color)
    }
}

use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Red = 0,
    White = 1,
    Blue = 2,
    Yellow = 3,
    Green = 4,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::White,
        Color::Blue,
        Color::Yellow,
        Color::Green,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::White),
            2 => Some(Color::Blue),
            3 => Some(Color::Yellow),
            4 => Some(Color::Green),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::White => "white",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Color::Red => "R",
            Color::White => "W",
            Color::Blue => "B",
            Color::Yellow => "Y",
            Color::Green => "G",
        };
        f.write_str(symbol)
    }
}

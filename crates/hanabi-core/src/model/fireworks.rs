use crate::model::card::Card;
use crate::model::color::Color;

/// Stack heights per color: the highest value successfully played so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fireworks {
    heights: [u8; 5],
}

impl Fireworks {
    pub const fn new() -> Self {
        Self { heights: [0; 5] }
    }

    pub const fn height(&self, color: Color) -> u8 {
        self.heights[color.index()]
    }

    /// Attempts to play `card`; returns true and raises the stack when the
    /// card is the next value for its color.
    pub fn raise(&mut self, card: Card) -> bool {
        let slot = &mut self.heights[card.color.index()];
        if card.value.number() == *slot + 1 {
            *slot = card.value.number();
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> u8 {
        self.heights.iter().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.heights.iter().all(|height| *height == 5)
    }
}

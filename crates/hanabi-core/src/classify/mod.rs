//! Relevance classification of every (value, color) identity.
//!
//! The grid is a pure function of the stack heights and the shared deck
//! view; it carries no state of its own and recomputing it is always safe.

use crate::belief::DeckCounts;
use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::fireworks::Fireworks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// No copies left anywhere, or the identity can never matter again.
    Gone,
    Discardable,
    Playable,
    Critical,
    CriticalPlayable,
}

impl Tier {
    pub const fn is_playable(self) -> bool {
        matches!(self, Tier::Playable | Tier::CriticalPlayable)
    }

    pub const fn is_critical(self) -> bool {
        matches!(self, Tier::Critical | Tier::CriticalPlayable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierGrid {
    tiers: [[Tier; 5]; 5],
}

impl TierGrid {
    /// Classifies every identity from the current stacks and the shared
    /// remaining-copy counts. Each color column is scanned bottom to top:
    ///
    /// - exhausted identities are `Gone`;
    /// - the identity one above the stack is playable;
    /// - identities at or below the stack are never critical;
    /// - an identity above a value whose copies are all gone can never be
    ///   played, so it is demoted to `Discardable` even as a last copy
    ///   (the value-one row has no lower neighbor and is exempt);
    /// - otherwise a single surviving copy is critical.
    pub fn compute(stacks: &Fireworks, counts: &DeckCounts) -> Self {
        let mut tiers = [[Tier::Gone; 5]; 5];
        for color in Color::ALL {
            let height = stacks.height(color) as usize;
            for row in 0..5 {
                tiers[row][color.index()] = classify_cell(row, height, color, counts);
            }
        }
        Self { tiers }
    }

    pub const fn at(&self, value_index: usize, color_index: usize) -> Tier {
        self.tiers[value_index][color_index]
    }

    pub const fn tier(&self, card: Card) -> Tier {
        self.tiers[card.value.index()][card.color.index()]
    }
}

fn classify_cell(row: usize, height: usize, color: Color, counts: &DeckCounts) -> Tier {
    if counts.at(row, color.index()) == 0 {
        return Tier::Gone;
    }

    let mut playable = row == height;
    let critical;
    if row + 1 <= height {
        critical = false;
    } else if row != 0 && (height..row).any(|below| counts.at(below, color.index()) == 0) {
        // The run to this value is broken; it can never be played.
        playable = false;
        critical = false;
    } else {
        critical = counts.at(row, color.index()) == 1;
    }

    match (playable, critical) {
        (false, false) => Tier::Discardable,
        (false, true) => Tier::Critical,
        (true, false) => Tier::Playable,
        (true, true) => Tier::CriticalPlayable,
    }
}

#[cfg(test)]
mod tests {
    use super::{Tier, TierGrid};
    use crate::belief::DeckCounts;
    use crate::model::card::Card;
    use crate::model::color::Color;
    use crate::model::fireworks::Fireworks;
    use crate::model::value::Value;

    #[test]
    fn fresh_game_classification() {
        let stacks = Fireworks::new();
        let counts = DeckCounts::full();
        let grid = TierGrid::compute(&stacks, &counts);

        for color in Color::ALL {
            // Three copies of every one remain, so they are playable but
            // not critical.
            assert_eq!(grid.tier(Card::new(Value::One, color)), Tier::Playable);
            assert_eq!(grid.tier(Card::new(Value::Three, color)), Tier::Discardable);
            assert_eq!(grid.tier(Card::new(Value::Five, color)), Tier::Critical);
        }
    }

    #[test]
    fn five_on_a_built_stack_is_critical_playable() {
        let mut stacks = Fireworks::new();
        for value in [Value::One, Value::Two, Value::Three, Value::Four] {
            assert!(stacks.raise(Card::new(value, Color::Blue)));
        }
        let counts = DeckCounts::full();
        let grid = TierGrid::compute(&stacks, &counts);
        assert_eq!(
            grid.tier(Card::new(Value::Five, Color::Blue)),
            Tier::CriticalPlayable
        );
    }

    #[test]
    fn broken_run_demotes_last_copies() {
        let stacks = Fireworks::new();
        let mut counts = DeckCounts::full();
        for _ in 0..3 {
            counts.take(Card::new(Value::One, Color::Red)).unwrap();
        }
        let grid = TierGrid::compute(&stacks, &counts);

        // All red ones are gone before any was played: the whole red
        // column above them is unreachable, so even untouched pairs and
        // the lone five are plain discards.
        assert_eq!(grid.tier(Card::new(Value::One, Color::Red)), Tier::Gone);
        assert_eq!(
            grid.tier(Card::new(Value::Two, Color::Red)),
            Tier::Discardable
        );
        assert_eq!(
            grid.tier(Card::new(Value::Five, Color::Red)),
            Tier::Discardable
        );
        // Other colors are unaffected.
        assert_eq!(grid.tier(Card::new(Value::Five, Color::Blue)), Tier::Critical);
    }

    #[test]
    fn surpassed_values_are_never_critical() {
        let mut stacks = Fireworks::new();
        stacks.raise(Card::new(Value::One, Color::Green));
        stacks.raise(Card::new(Value::Two, Color::Green));

        let mut counts = DeckCounts::full();
        // One copy of the played two remains in circulation.
        counts.take(Card::new(Value::Two, Color::Green)).unwrap();
        let grid = TierGrid::compute(&stacks, &counts);
        assert_eq!(
            grid.tier(Card::new(Value::Two, Color::Green)),
            Tier::Discardable
        );
        assert_eq!(
            grid.tier(Card::new(Value::Three, Color::Green)),
            Tier::Playable
        );
    }

    #[test]
    fn last_copy_above_intact_run_is_critical() {
        let stacks = Fireworks::new();
        let mut counts = DeckCounts::full();
        counts.take(Card::new(Value::Two, Color::White)).unwrap();
        let grid = TierGrid::compute(&stacks, &counts);
        assert_eq!(
            grid.tier(Card::new(Value::Two, Color::White)),
            Tier::Critical
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut stacks = Fireworks::new();
        stacks.raise(Card::new(Value::One, Color::Yellow));
        let mut counts = DeckCounts::full();
        counts.take(Card::new(Value::Four, Color::Yellow)).unwrap();
        counts.take(Card::new(Value::One, Color::Red)).unwrap();

        let first = TierGrid::compute(&stacks, &counts);
        let second = TierGrid::compute(&stacks, &counts);
        assert_eq!(first, second);
    }
}

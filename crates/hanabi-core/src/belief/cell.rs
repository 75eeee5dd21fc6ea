use crate::belief::counts::DeckCounts;
use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::hint::Hint;
use crate::model::value::Value;

/// Probability model over the 25 possible identities of one hidden card.
///
/// Rows index values, columns index colors. The grid always sums to one
/// except transiently inside a single update step; a cell whose value and
/// color are both resolved holds exactly one 1.0 entry and is never
/// recomputed again.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefCell {
    value: Option<Value>,
    color: Option<Color>,
    probs: [[f64; 5]; 5],
    inferred: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeliefError {
    /// Every hypothesis was eliminated. Valid event streams cannot produce
    /// this; it indicates corrupted accounting upstream.
    Contradiction,
}

impl BeliefCell {
    /// A fresh cell whose distribution is proportional to the remaining
    /// copies in `counts`.
    pub fn prior(counts: &DeckCounts) -> Result<Self, BeliefError> {
        let mut cell = Self {
            value: None,
            color: None,
            probs: [[1.0; 5]; 5],
            inferred: false,
        };
        cell.refresh(counts)?;
        Ok(cell)
    }

    pub fn value(&self) -> Option<Value> {
        self.value
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some() && self.color.is_some()
    }

    pub fn resolved_card(&self) -> Option<Card> {
        match (self.value, self.color) {
            (Some(value), Some(color)) => Some(Card::new(value, color)),
            _ => None,
        }
    }

    /// Whether the identity was deduced before any authoritative reveal,
    /// meaning the own deck view already accounts for it.
    pub fn is_inferred(&self) -> bool {
        self.inferred
    }

    pub fn mark_inferred(&mut self) {
        self.inferred = true;
    }

    pub fn chance(&self, card: Card) -> f64 {
        self.probs[card.value.index()][card.color.index()]
    }

    /// Total mass currently assigned to `value` across all colors.
    pub fn value_mass(&self, value: Value) -> f64 {
        self.probs[value.index()].iter().sum()
    }

    /// Total mass currently assigned to `color` across all values.
    pub fn color_mass(&self, color: Color) -> f64 {
        self.probs.iter().map(|row| row[color.index()]).sum()
    }

    /// Identities with non-zero mass, lowest value first, colors in fixed
    /// order within a value.
    pub fn hypotheses(&self) -> impl Iterator<Item = (Card, f64)> + '_ {
        Value::ORDERED.into_iter().flat_map(move |value| {
            Color::ALL.into_iter().filter_map(move |color| {
                let card = Card::new(value, color);
                let chance = self.chance(card);
                (chance > 0.0).then_some((card, chance))
            })
        })
    }

    /// Applies one hint. A targeted value hint pins the value and clears
    /// every other row; an untargeted one clears the hinted row. Color
    /// hints act on columns. A hint on an already-resolved axis changes
    /// nothing beyond the refresh.
    pub fn apply_hint(
        &mut self,
        hint: Hint,
        targeted: bool,
        counts: &DeckCounts,
    ) -> Result<(), BeliefError> {
        match hint {
            Hint::Value(value) if self.value.is_none() => {
                if targeted {
                    for row in 0..5 {
                        if row != value.index() {
                            self.probs[row] = [0.0; 5];
                        }
                    }
                    self.value = Some(value);
                } else {
                    self.probs[value.index()] = [0.0; 5];
                }
            }
            Hint::Color(color) if self.color.is_none() => {
                if targeted {
                    for row in self.probs.iter_mut() {
                        for (col, slot) in row.iter_mut().enumerate() {
                            if col != color.index() {
                                *slot = 0.0;
                            }
                        }
                    }
                    self.color = Some(color);
                } else {
                    for row in self.probs.iter_mut() {
                        row[color.index()] = 0.0;
                    }
                }
            }
            _ => {}
        }
        self.refresh(counts)
    }

    /// Re-masks the distribution against `counts` and renormalizes: any
    /// identity with no copies left drops to zero, the survivors share
    /// mass proportional to their remaining copies. Resolves an axis once
    /// all surviving mass sits in a single row or column.
    pub fn refresh(&mut self, counts: &DeckCounts) -> Result<(), BeliefError> {
        if self.is_resolved() {
            return Ok(());
        }

        let mut masked = [[0u8; 5]; 5];
        let mut total: u32 = 0;
        for (row, probs_row) in self.probs.iter().enumerate() {
            for (col, prob) in probs_row.iter().enumerate() {
                if *prob > 0.0 {
                    let copies = counts.at(row, col);
                    masked[row][col] = copies;
                    total += copies as u32;
                }
            }
        }

        if total == 0 {
            return Err(BeliefError::Contradiction);
        }

        for row in 0..5 {
            for col in 0..5 {
                self.probs[row][col] = masked[row][col] as f64 / total as f64;
            }
        }

        if let Some(row) = single_live_row(&masked) {
            self.value = Value::from_index(row);
        }
        if let Some(col) = single_live_col(&masked) {
            self.color = Color::from_index(col);
        }
        Ok(())
    }
}

fn single_live_row(masked: &[[u8; 5]; 5]) -> Option<usize> {
    let mut live = None;
    for (row, columns) in masked.iter().enumerate() {
        if columns.iter().any(|count| *count > 0) {
            if live.is_some() {
                return None;
            }
            live = Some(row);
        }
    }
    live
}

fn single_live_col(masked: &[[u8; 5]; 5]) -> Option<usize> {
    let mut live = None;
    for col in 0..5 {
        if masked.iter().any(|row| row[col] > 0) {
            if live.is_some() {
                return None;
            }
            live = Some(col);
        }
    }
    live
}

#[cfg(test)]
mod tests {
    use super::{BeliefCell, BeliefError};
    use crate::belief::counts::DeckCounts;
    use crate::model::card::Card;
    use crate::model::color::Color;
    use crate::model::hint::Hint;
    use crate::model::value::Value;

    fn mass(cell: &BeliefCell) -> f64 {
        Value::ORDERED
            .iter()
            .flat_map(|value| {
                Color::ALL
                    .iter()
                    .map(|color| cell.chance(Card::new(*value, *color)))
            })
            .sum()
    }

    #[test]
    fn prior_is_proportional_to_remaining_copies() {
        let counts = DeckCounts::full();
        let cell = BeliefCell::prior(&counts).unwrap();
        assert!((mass(&cell) - 1.0).abs() < 1e-9);
        assert!(
            (cell.chance(Card::new(Value::One, Color::Red)) - 3.0 / 50.0).abs() < 1e-9,
            "three copies out of fifty"
        );
        assert!((cell.chance(Card::new(Value::Five, Color::Red)) - 1.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn targeted_value_hint_pins_the_row() {
        let counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::Three), true, &counts)
            .unwrap();

        assert_eq!(cell.value(), Some(Value::Three));
        assert_eq!(cell.color(), None);
        assert!((cell.value_mass(Value::Three) - 1.0).abs() < 1e-9);
        for value in [Value::One, Value::Two, Value::Four, Value::Five] {
            assert_eq!(cell.value_mass(value), 0.0);
        }
    }

    #[test]
    fn untargeted_hints_resolve_by_exclusion() {
        let counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        for value in [Value::One, Value::Two, Value::Three, Value::Four] {
            cell.apply_hint(Hint::Value(value), false, &counts).unwrap();
        }
        assert_eq!(cell.value(), Some(Value::Five));
        assert!((cell.value_mass(Value::Five) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn crossed_hints_resolve_both_axes() {
        let counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::Two), true, &counts)
            .unwrap();
        cell.apply_hint(Hint::Color(Color::Green), true, &counts)
            .unwrap();

        assert!(cell.is_resolved());
        assert_eq!(
            cell.resolved_card(),
            Some(Card::new(Value::Two, Color::Green))
        );
        assert_eq!(cell.chance(Card::new(Value::Two, Color::Green)), 1.0);
    }

    #[test]
    fn refresh_drops_exhausted_identities() {
        let mut counts = DeckCounts::full();
        let gone = Card::new(Value::Five, Color::White);
        counts.take(gone).unwrap();

        let cell = BeliefCell::prior(&counts).unwrap();
        assert_eq!(cell.chance(gone), 0.0);
        assert!((mass(&cell) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn resolved_cell_is_never_recomputed() {
        let counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::Five), true, &counts)
            .unwrap();
        cell.apply_hint(Hint::Color(Color::Red), true, &counts)
            .unwrap();
        assert!(cell.is_resolved());

        // Exhaust the resolved identity elsewhere; the pinned cell must
        // keep its single 1.0 entry rather than contradict itself.
        let mut drained = counts;
        drained.take(Card::new(Value::Five, Color::Red)).unwrap();
        cell.refresh(&drained).unwrap();
        assert_eq!(cell.chance(Card::new(Value::Five, Color::Red)), 1.0);
    }

    #[test]
    fn eliminating_every_hypothesis_is_a_contradiction() {
        let mut counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        for value in [Value::One, Value::Two, Value::Three, Value::Four] {
            cell.apply_hint(Hint::Value(value), false, &counts).unwrap();
        }
        assert_eq!(cell.value(), Some(Value::Five));

        for color in Color::ALL {
            counts.take(Card::new(Value::Five, color)).unwrap();
        }
        assert_eq!(cell.refresh(&counts), Err(BeliefError::Contradiction));
    }

    #[test]
    fn hypotheses_enumerates_support_only() {
        let counts = DeckCounts::full();
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::Four), true, &counts)
            .unwrap();

        let support: Vec<_> = cell.hypotheses().collect();
        assert_eq!(support.len(), 5);
        assert!(support.iter().all(|(card, _)| card.value == Value::Four));
        let total: f64 = support.iter().map(|(_, chance)| chance).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}

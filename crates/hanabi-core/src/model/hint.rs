use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::value::Value;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The information carried by a hint: one value or one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hint {
    Value(Value),
    Color(Color),
}

impl Hint {
    /// True when a real hint with this target would touch `card`.
    pub fn matches(self, card: Card) -> bool {
        match self {
            Hint::Value(value) => card.value == value,
            Hint::Color(color) => card.color == color,
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Value(value) => write!(f, "value {value}"),
            Hint::Color(color) => write!(f, "color {}", color.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Hint;
    use crate::model::card::Card;
    use crate::model::color::Color;
    use crate::model::value::Value;

    #[test]
    fn value_hint_matches_value_only() {
        let hint = Hint::Value(Value::Three);
        assert!(hint.matches(Card::new(Value::Three, Color::Red)));
        assert!(!hint.matches(Card::new(Value::Two, Color::Red)));
    }

    #[test]
    fn color_hint_matches_color_only() {
        let hint = Hint::Color(Color::Blue);
        assert!(hint.matches(Card::new(Value::One, Color::Blue)));
        assert!(!hint.matches(Card::new(Value::One, Color::Green)));
    }
}

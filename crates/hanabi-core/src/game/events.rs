//! Typed game events and the action record the engine emits.
//!
//! The transport layer owns framing and validation; the engine consumes
//! these already-parsed records in strict delivery order and never sees a
//! raw wire message.

use crate::model::card::Card;
use crate::model::hint::Hint;
use serde::{Deserialize, Serialize};

/// One teammate hand as dealt at session start. The observing agent's own
/// hand is never listed; it stays hidden from its holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleHand {
    pub player: String,
    pub cards: Vec<Card>,
}

/// Per-player slice of an authoritative state report. `drawn` carries the
/// card a player picked up since the previous report, when the observer is
/// allowed to see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSync {
    pub player: String,
    pub hand_size: usize,
    pub drawn: Option<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayOutcome {
    /// The card extended its stack.
    Played,
    /// The card did not fit; it is lost and an error token is spent.
    Misplayed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    HandsRevealed {
        hands: Vec<VisibleHand>,
    },
    StateSync {
        hints_used: u8,
        errors_used: u8,
        current_player: String,
        players: Vec<PlayerSync>,
    },
    ActionResolved {
        actor: String,
        card: Card,
        slot: usize,
        outcome: PlayOutcome,
    },
    HintGiven {
        source: String,
        destination: String,
        hint: Hint,
        touched: Vec<usize>,
    },
}

/// The single action produced per decision cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Play { slot: usize },
    Discard { slot: usize },
    Hint { player: String, hint: Hint },
}

impl Action {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

mod generate;
mod params;
mod score;
mod select;

pub use generate::{
    HintCandidate, HintedCard, Hypothesis, SlotCandidate, SlotMove, fallback_discards,
    hint_candidates, slot_candidates,
};
pub use params::BotParams;
pub use score::{
    ScoredCandidate, error_pressure, score_discard, score_hint, score_play, token_scarcity,
};
pub use select::{CandidateError, select};

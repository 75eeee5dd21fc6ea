pub mod bot;
pub mod policy;

pub use bot::{
    BotParams, CandidateError, HintCandidate, HintedCard, Hypothesis, ScoredCandidate,
    SlotCandidate, SlotMove, error_pressure, fallback_discards, hint_candidates, select,
    slot_candidates, token_scarcity,
};
pub use policy::{HeuristicPolicy, Policy};

mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::CandidateError;
use hanabi_core::game::events::Action;
use hanabi_core::game::session::AgentSession;

/// Unified interface for decision-making over a session's belief state.
///
/// Implementations produce exactly one action per call; the caller invokes
/// it only when the session reports the agent's own turn.
pub trait Policy: Send {
    fn choose_action(&mut self, session: &AgentSession) -> Result<Action, CandidateError>;
}

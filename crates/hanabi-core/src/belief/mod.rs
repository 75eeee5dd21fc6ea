//! Probabilistic belief tracking over hidden card identities.
//!
//! This module is composed of:
//! - `counts`: remaining-copy accounting (`DeckCounts`), kept from two
//!   observer perspectives by the session.
//! - `cell`: the per-card probability grid (`BeliefCell`) updated under
//!   hint and reveal evidence.

mod cell;
mod counts;

pub use cell::{BeliefCell, BeliefError};
pub use counts::{CountUnderflow, DeckCounts};

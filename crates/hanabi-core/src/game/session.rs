//! Per-agent session state and event application.
//!
//! One `AgentSession` owns every mutable piece of an agent's world model:
//! its own hand beliefs, a simulation of what each teammate can infer
//! about their hand, the two deck views, the stacks, the token counters
//! and the cached tier grid. Events mutate it in delivery order; nothing
//! else does.

use crate::belief::{BeliefCell, BeliefError, CountUnderflow, DeckCounts};
use crate::classify::TierGrid;
use crate::game::events::{GameEvent, PlayOutcome, PlayerSync, VisibleHand};
use crate::model::card::Card;
use crate::model::fireworks::Fireworks;
use crate::model::hint::Hint;
use core::fmt;

/// One card in a teammate's hand: the identity we can see across the
/// table, plus the belief that teammate can hold about it.
#[derive(Debug, Clone)]
pub struct TeammateSlot {
    known: Option<Card>,
    belief: BeliefCell,
}

impl TeammateSlot {
    /// The true identity, absent only while a fresh draw awaits the next
    /// authoritative sync.
    pub fn known(&self) -> Option<Card> {
        self.known
    }

    pub fn belief(&self) -> &BeliefCell {
        &self.belief
    }
}

#[derive(Debug, Clone)]
pub struct TeammateHand {
    name: String,
    slots: Vec<TeammateSlot>,
}

impl TeammateHand {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[TeammateSlot] {
        &self.slots
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Belief(BeliefError),
    Counts(CountUnderflow),
    UnknownPlayer(String),
    SlotOutOfRange { player: String, slot: usize },
    CardMismatch { player: String, slot: usize, expected: Card, reported: Card },
    StackMismatch(Card),
}

impl From<BeliefError> for SessionError {
    fn from(err: BeliefError) -> Self {
        SessionError::Belief(err)
    }
}

impl From<CountUnderflow> for SessionError {
    fn from(err: CountUnderflow) -> Self {
        SessionError::Counts(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Belief(BeliefError::Contradiction) => {
                f.write_str("belief contradiction: every hypothesis eliminated")
            }
            SessionError::Counts(under) => {
                write!(f, "deck count underflow for {}", under.card)
            }
            SessionError::UnknownPlayer(name) => write!(f, "unknown player {name}"),
            SessionError::SlotOutOfRange { player, slot } => {
                write!(f, "slot {slot} out of range for {player}")
            }
            SessionError::CardMismatch {
                player,
                slot,
                expected,
                reported,
            } => write!(
                f,
                "{player} slot {slot} holds {expected} but the event reports {reported}"
            ),
            SessionError::StackMismatch(card) => {
                write!(f, "played card {card} does not continue its stack")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// All belief and bookkeeping state one agent owns for one game.
#[derive(Debug, Clone)]
pub struct AgentSession {
    name: String,
    hand: Vec<BeliefCell>,
    teammates: Vec<TeammateHand>,
    shared: DeckCounts,
    own: DeckCounts,
    stacks: Fireworks,
    hints_used: u8,
    errors_used: u8,
    grid: TierGrid,
    pending_draws: Vec<String>,
    current_player: Option<String>,
}

impl AgentSession {
    pub fn new(name: impl Into<String>) -> Self {
        let shared = DeckCounts::full();
        let stacks = Fireworks::new();
        let grid = TierGrid::compute(&stacks, &shared);
        Self {
            name: name.into(),
            hand: Vec::new(),
            teammates: Vec::new(),
            shared,
            own: DeckCounts::full(),
            stacks,
            hints_used: 0,
            errors_used: 0,
            grid,
            pending_draws: Vec::new(),
            current_player: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &[BeliefCell] {
        &self.hand
    }

    pub fn teammates(&self) -> &[TeammateHand] {
        &self.teammates
    }

    /// The shared view: copies not yet publicly accounted for.
    pub fn shared_counts(&self) -> &DeckCounts {
        &self.shared
    }

    /// The agent's private view: additionally excludes cards it can see
    /// or has deduced in its own hand.
    pub fn own_counts(&self) -> &DeckCounts {
        &self.own
    }

    pub fn stacks(&self) -> &Fireworks {
        &self.stacks
    }

    pub fn hints_used(&self) -> u8 {
        self.hints_used
    }

    pub fn errors_used(&self) -> u8 {
        self.errors_used
    }

    pub fn grid(&self) -> &TierGrid {
        &self.grid
    }

    /// True between the authoritative report naming this agent and its
    /// action; the decision cycle runs exactly once per such window.
    pub fn is_my_turn(&self) -> bool {
        self.current_player.as_deref() == Some(self.name.as_str())
    }

    /// Applies one event. Events must arrive in delivery order; belief
    /// updates do not commute.
    pub fn apply(&mut self, event: &GameEvent) -> Result<(), SessionError> {
        match event {
            GameEvent::HandsRevealed { hands } => self.on_hands_revealed(hands),
            GameEvent::StateSync {
                hints_used,
                errors_used,
                current_player,
                players,
            } => self.on_state_sync(*hints_used, *errors_used, current_player, players),
            GameEvent::ActionResolved {
                actor,
                card,
                slot,
                outcome,
            } => self.on_action_resolved(actor, *card, *slot, *outcome),
            GameEvent::HintGiven {
                destination,
                hint,
                touched,
                ..
            } => self.on_hint_given(destination, *hint, touched),
        }
    }

    fn on_hands_revealed(&mut self, hands: &[VisibleHand]) -> Result<(), SessionError> {
        self.teammates.clear();
        for visible in hands {
            if visible.player == self.name {
                continue;
            }
            let mut slots = Vec::with_capacity(visible.cards.len());
            for card in &visible.cards {
                self.own.take(*card)?;
                slots.push(TeammateSlot {
                    known: Some(*card),
                    belief: BeliefCell::prior(&self.shared)?,
                });
            }
            self.teammates.push(TeammateHand {
                name: visible.player.clone(),
                slots,
            });
        }

        let hand_size = if self.teammates.len() + 1 > 3 { 4 } else { 5 };
        self.hand.clear();
        for _ in 0..hand_size {
            self.hand.push(BeliefCell::prior(&self.own)?);
        }
        self.grid = TierGrid::compute(&self.stacks, &self.shared);
        Ok(())
    }

    fn on_state_sync(
        &mut self,
        hints_used: u8,
        errors_used: u8,
        current_player: &str,
        players: &[PlayerSync],
    ) -> Result<(), SessionError> {
        self.hints_used = hints_used;
        self.errors_used = errors_used;
        self.current_player = Some(current_player.to_string());

        let owed = std::mem::take(&mut self.pending_draws);
        for name in owed {
            let sync = players
                .iter()
                .find(|entry| entry.player == name)
                .ok_or_else(|| SessionError::UnknownPlayer(name.clone()))?;
            let index = self
                .teammates
                .iter()
                .position(|hand| hand.name == name)
                .ok_or_else(|| SessionError::UnknownPlayer(name.clone()))?;

            match sync.drawn {
                Some(card) => {
                    self.own.take(card)?;
                    let hand = &mut self.teammates[index];
                    if let Some(slot) = hand.slots.iter_mut().find(|slot| slot.known.is_none()) {
                        slot.known = Some(card);
                        slot.belief.refresh(&self.shared)?;
                    }
                }
                None => {
                    // The draw pile was empty; the placeholder never
                    // became a card.
                    let hand = &mut self.teammates[index];
                    if let Some(pos) = hand.slots.iter().position(|slot| slot.known.is_none()) {
                        hand.slots.remove(pos);
                    }
                }
            }
        }

        if let Some(me) = players.iter().find(|entry| entry.player == self.name) {
            while self.hand.len() > me.hand_size {
                self.hand.pop();
            }
        }

        self.grid = TierGrid::compute(&self.stacks, &self.shared);
        Ok(())
    }

    fn on_action_resolved(
        &mut self,
        actor: &str,
        card: Card,
        slot: usize,
        outcome: PlayOutcome,
    ) -> Result<(), SessionError> {
        if matches!(outcome, PlayOutcome::Played) && !self.stacks.raise(card) {
            return Err(SessionError::StackMismatch(card));
        }
        self.shared.take(card)?;

        if actor == self.name {
            if slot >= self.hand.len() {
                return Err(SessionError::SlotOutOfRange {
                    player: self.name.clone(),
                    slot,
                });
            }
            let cell = self.hand.remove(slot);
            if !cell.is_inferred() {
                self.own.take(card)?;
            }
            if self.own.total() > 0 {
                self.hand.push(BeliefCell::prior(&self.own)?);
            }
        } else {
            let index = self
                .teammates
                .iter()
                .position(|hand| hand.name == actor)
                .ok_or_else(|| SessionError::UnknownPlayer(actor.to_string()))?;
            let hand = &mut self.teammates[index];
            if slot >= hand.slots.len() {
                return Err(SessionError::SlotOutOfRange {
                    player: actor.to_string(),
                    slot,
                });
            }
            let removed = hand.slots.remove(slot);
            if let Some(expected) = removed.known {
                if expected != card {
                    return Err(SessionError::CardMismatch {
                        player: actor.to_string(),
                        slot,
                        expected,
                        reported: card,
                    });
                }
            }
            hand.slots.push(TeammateSlot {
                known: None,
                belief: BeliefCell::prior(&self.shared)?,
            });
            self.pending_draws.push(actor.to_string());
        }

        self.refresh_all()?;
        self.grid = TierGrid::compute(&self.stacks, &self.shared);
        Ok(())
    }

    fn on_hint_given(
        &mut self,
        destination: &str,
        hint: Hint,
        touched: &[usize],
    ) -> Result<(), SessionError> {
        if destination == self.name {
            for (index, cell) in self.hand.iter_mut().enumerate() {
                cell.apply_hint(hint, touched.contains(&index), &self.own)?;
            }
            // Settle inferences to a fixpoint. A slot deduced with
            // certainty leaves the own view exactly once (the flag stops
            // a second charge at the authoritative reveal), and that
            // removal can cascade into further certainties.
            loop {
                let mut newly_inferred = false;
                for cell in self.hand.iter_mut() {
                    if cell.is_resolved() && !cell.is_inferred() {
                        cell.mark_inferred();
                        if let Some(card) = cell.resolved_card() {
                            self.own.take(card)?;
                            newly_inferred = true;
                        }
                    }
                }
                if !newly_inferred {
                    break;
                }
                for cell in self.hand.iter_mut() {
                    cell.refresh(&self.own)?;
                }
            }
        } else {
            let index = self
                .teammates
                .iter()
                .position(|hand| hand.name == destination)
                .ok_or_else(|| SessionError::UnknownPlayer(destination.to_string()))?;
            for (slot_index, slot) in self.teammates[index].slots.iter_mut().enumerate() {
                slot.belief
                    .apply_hint(hint, touched.contains(&slot_index), &self.shared)?;
            }
        }
        Ok(())
    }

    fn refresh_all(&mut self) -> Result<(), SessionError> {
        for cell in self.hand.iter_mut() {
            cell.refresh(&self.own)?;
        }
        for hand in self.teammates.iter_mut() {
            for slot in hand.slots.iter_mut() {
                slot.belief.refresh(&self.shared)?;
            }
        }
        Ok(())
    }
}

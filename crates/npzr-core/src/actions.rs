//! Actions players can submit and the signals the engine answers with.
//!
//! Actions are plain serializable values so a host (UI, AI, or transport
//! layer) can construct and ship them however it likes. The engine answers
//! every turn operation with a `TurnSignal` telling the host what the
//! player may do next.

use crate::card::{BodyPart, CardId};
use crate::stack::StackId;
use crate::wildcard::Nomination;
use serde::{Deserialize, Serialize};

/// Where a relocated card goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    /// An existing stack, which must still exist when the move executes
    Existing(StackId),
    /// A fresh stack owned by the acting player
    NewStack,
}

/// Relocate one card between stacks, spending a banked pending move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub card_id: CardId,
    pub from_stack: StackId,
    pub from_pile: BodyPart,
    pub to: MoveTarget,
    pub to_pile: BodyPart,
}

/// Play one card from the acting player's hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCardAction {
    pub card_id: CardId,
    /// Existing stack to play onto; `None` starts a fresh stack owned by
    /// the acting player
    pub target_stack: Option<StackId>,
    /// Pile to place into; defaults to the card's effective body part
    pub target_pile: Option<BodyPart>,
    /// Nomination applied before placement (wild cards only)
    pub nomination: Option<Nomination>,
}

impl PlayCardAction {
    /// Play a card onto a fresh stack with no nomination; adjust fields for
    /// anything fancier
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            target_stack: None,
            target_pile: None,
            nomination: None,
        }
    }
}

/// What the acting player may do after a turn operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnSignal {
    /// The same player may keep playing
    Continue,
    /// A banked move must be executed or skipped before anything else
    AwaitMove,
    /// The turn is over (or the game is)
    EndTurn,
}

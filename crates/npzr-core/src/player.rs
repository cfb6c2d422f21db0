//! Player seats, hands, and scored characters.

use crate::card::{Card, CardId, Character};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seat identifier (0 or 1)
pub type PlayerId = u8;

/// Number of seats in a game
pub const SEATS: usize = 2;

/// Cards dealt to each player at game start
pub const STARTING_HAND_SIZE: usize = 5;

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat (0 or 1)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Cards held, visible only to this player
    pub hand: Vec<Card>,
    /// Characters completed so far; winning requires all four
    pub scored: HashSet<Character>,
}

impl Player {
    /// Create a player with an empty hand
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            hand: Vec::new(),
            scored: HashSet::new(),
        }
    }

    /// Whether the hand holds the given card
    pub fn has_card(&self, id: CardId) -> bool {
        self.hand.iter().any(|c| c.id == id)
    }

    /// Withdraw a card from the hand by id
    pub fn take_card(&mut self, id: CardId) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c.id == id)?;
        Some(self.hand.remove(pos))
    }

    /// Record a completed character. Re-scoring an already-scored character
    /// is a no-op on the set.
    pub fn score(&mut self, character: Character) {
        self.scored.insert(character);
    }

    /// Whether this player has collected all four characters
    pub fn has_won(&self) -> bool {
        Character::ALL.iter().all(|c| self.scored.contains(c))
    }
}

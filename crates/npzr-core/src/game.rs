//! Core game state and facade.
//!
//! This module contains the `GameState` owned by the host, its lifecycle
//! (seating, dealing, reset, deep clone), the shared `GameError` type, and
//! the structural self-check used by tests and tooling.

use crate::card::{BodyPart, Card, CardId, Character};
use crate::deck::{Deck, DECK_SIZE};
use crate::player::{Player, PlayerId, SEATS, STARTING_HAND_SIZE};
use crate::stack::{Stack, StackId};
use crate::turn::TurnState;
use crate::wildcard::Nomination;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for both seats to be taken
    Setup,
    /// Normal play
    Playing,
    /// Game is over
    Finished { winner: PlayerId },
}

/// Rejections reported by the engine. An `Err` always means nothing
/// changed; the caller may retry with different input.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game has already started")]
    GameStarted,

    #[error("Game has not started yet")]
    GameNotStarted,

    #[error("Game is over")]
    GameFinished,

    #[error("No turn is in progress")]
    NoActiveTurn,

    #[error("A turn is already in progress")]
    TurnInProgress,

    #[error("Not awaiting a move")]
    NotAwaitingMove,

    #[error("A banked move must be executed or skipped first")]
    AwaitingMove,

    #[error("Card is not in the acting player's hand")]
    CardNotInHand,

    #[error("No such stack")]
    NoSuchStack,

    #[error("Card is not in that pile")]
    CardNotInPile,

    #[error("Illegal nomination for this card")]
    IllegalNomination,

    #[error("Cannot determine a target pile for this card")]
    NoTargetPile,

    #[error("No pending moves available")]
    NoPendingMoves,
}

/// Result of a structural self-check. Diagnostic only; producing it never
/// mutates the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// The complete game state.
///
/// One `GameState` is exclusively owned and mutated by whichever host
/// holds it; `clone()` yields a fully independent copy (every container is
/// owned, including the scored-character sets) suitable for speculative
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The two seats, in join order
    pub players: Vec<Player>,
    /// Seat whose turn it is
    pub current_player: PlayerId,
    /// The draw deck
    pub deck: Deck,
    /// All stacks in play, any owner
    pub stacks: Vec<Stack>,
    /// Cards out of active play after stack completion; the refill pool
    pub removed_cards: Vec<Card>,
    /// Banked stack-to-stack relocations earned from completions
    pub pending_moves: u32,
    /// Current game phase
    pub phase: GamePhase,
    /// Present only while a turn is mid-sequence
    pub turn: Option<TurnState>,
    /// Next stack id to hand out
    next_stack_id: StackId,
    /// Seed for the next internal RNG (evolves on every use, so clones and
    /// serde round-trips replay identically)
    rng_seed: u64,
}

impl GameState {
    /// Create an empty game waiting for players
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Create an empty game with a fixed seed, for deterministic shuffles
    pub fn with_seed(seed: u64) -> Self {
        Self {
            players: Vec::new(),
            current_player: 0,
            deck: Deck::standard(),
            stacks: Vec::new(),
            removed_cards: Vec::new(),
            pending_moves: 0,
            phase: GamePhase::Setup,
            turn: None,
            next_stack_id: 0,
            rng_seed: seed,
        }
    }

    /// Seat a player. The game shuffles, deals, and begins once the second
    /// seat is taken.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        if !matches!(self.phase, GamePhase::Setup) {
            return Err(GameError::GameStarted);
        }
        let id = self.players.len() as PlayerId;
        self.players.push(Player::new(id, name.into()));
        if self.players.len() == SEATS {
            self.begin_play();
        }
        Ok(id)
    }

    /// Wipe the table and start over with the same seats
    pub fn reset(&mut self) {
        self.stacks.clear();
        self.removed_cards.clear();
        self.pending_moves = 0;
        self.turn = None;
        self.phase = GamePhase::Setup;
        self.next_stack_id = 0;
        self.deck = Deck::standard();
        for player in &mut self.players {
            player.hand.clear();
            player.scored.clear();
        }
        if self.players.len() == SEATS {
            self.begin_play();
        }
    }

    fn begin_play(&mut self) {
        let mut rng = self.next_rng();
        self.deck.shuffle(&mut rng);
        for _ in 0..STARTING_HAND_SIZE {
            for seat in 0..SEATS {
                if let Some(card) = self.deck.draw() {
                    self.players[seat].hand.push(card);
                }
            }
        }
        // First player is random
        self.current_player = rng.gen_range(0..SEATS) as PlayerId;
        self.phase = GamePhase::Playing;
    }

    // ==================== Queries ====================

    /// Get a player by seat
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub(crate) fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    /// A player's hand, if the seat exists
    pub fn player_hand(&self, id: PlayerId) -> Option<&[Card]> {
        self.get_player(id).map(|p| p.hand.as_slice())
    }

    /// A player's scored characters, if the seat exists
    pub fn player_score(&self, id: PlayerId) -> Option<&std::collections::HashSet<Character>> {
        self.get_player(id).map(|p| &p.scored)
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the winner if the game is finished
    pub fn get_winner(&self) -> Option<PlayerId> {
        if let GamePhase::Finished { winner } = self.phase {
            Some(winner)
        } else {
            None
        }
    }

    /// Cards left in the draw deck
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    /// Cards permanently out of active play (reclaimable by a deck refill)
    pub fn removed_count(&self) -> usize {
        self.removed_cards.len()
    }

    /// The in-progress turn, if any
    pub fn turn_state(&self) -> Option<&TurnState> {
        self.turn.as_ref()
    }

    // ==================== Mutations ====================

    /// Draw one card into the current player's hand.
    ///
    /// On an empty deck this first tries to reclaim removed cards; `None`
    /// means irrecoverable exhaustion, an expected non-fatal outcome.
    pub fn draw_card(&mut self) -> Option<Card> {
        if !matches!(self.phase, GamePhase::Playing) {
            return None;
        }
        if self.deck.is_empty() {
            self.refill_deck();
        }
        let card = self.deck.draw()?;
        let drawn = card.clone();
        self.players[self.current_player as usize].hand.push(card);
        Some(drawn)
    }

    fn refill_deck(&mut self) {
        if self.removed_cards.is_empty() {
            return;
        }
        let reclaimed = std::mem::take(&mut self.removed_cards);
        let mut rng = self.next_rng();
        self.deck.refill(reclaimed, &mut rng);
    }

    /// Nominate a wild card in the current player's hand. Returns false,
    /// changing nothing, when the card is absent or the pair is illegal.
    pub fn nominate_wild_card(&mut self, card_id: CardId, nomination: Nomination) -> bool {
        let seat = self.current_player as usize;
        let Some(player) = self.players.get_mut(seat) else {
            return false;
        };
        match player.hand.iter_mut().find(|c| c.id == card_id) {
            Some(card) => card.nominate(nomination),
            None => false,
        }
    }

    // ==================== Internal helpers ====================

    pub(crate) fn alloc_stack_id(&mut self) -> StackId {
        let id = self.next_stack_id;
        self.next_stack_id += 1;
        id
    }

    /// Hand out a deterministic RNG and evolve the stored seed
    pub(crate) fn next_rng(&mut self) -> StdRng {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        self.rng_seed = rng.gen();
        rng
    }

    /// Freeze the game if a player has collected all four characters
    pub(crate) fn refresh_win_condition(&mut self) {
        if self.is_finished() {
            return;
        }
        if let Some(winner) = self.players.iter().find(|p| p.has_won()).map(|p| p.id) {
            self.phase = GamePhase::Finished { winner };
            self.turn = None;
        }
    }

    // ==================== Snapshots ====================

    /// Serialize the whole state as JSON, for host-side consumption
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a state from a JSON snapshot
    pub fn from_json(json: &str) -> serde_json::Result<GameState> {
        serde_json::from_str(json)
    }

    // ==================== Validation ====================

    /// Structural self-check: card conservation over the 44-card universe,
    /// stack soundness, nomination legality, and phase coherence.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();
        let mut counts: HashMap<CardId, u32> = HashMap::new();

        let mut record = |errors: &mut Vec<String>, card: &Card, zone: &str| {
            *counts.entry(card.id).or_insert(0) += 1;
            if card.id as usize >= DECK_SIZE {
                errors.push(format!(
                    "card {} in {} is outside the {}-card universe",
                    card.id, zone, DECK_SIZE
                ));
            }
            if let Some(n) = card.nomination {
                if !card.can_nominate(n.character, n.body_part) {
                    errors.push(format!(
                        "card {} in {} carries an illegal nomination",
                        card.id, zone
                    ));
                }
            }
        };

        for card in self.deck.cards() {
            record(&mut errors, card, "deck");
        }
        for player in &self.players {
            for card in &player.hand {
                record(&mut errors, card, "hand");
            }
        }
        for stack in &self.stacks {
            for card in stack.cards() {
                record(&mut errors, card, "stack");
            }
        }
        for card in &self.removed_cards {
            record(&mut errors, card, "removed");
        }

        let total: u32 = counts.values().sum();
        if total as usize != DECK_SIZE {
            errors.push(format!("{} cards in play (expected {})", total, DECK_SIZE));
        }
        let mut duplicates: Vec<CardId> = counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(id, _)| *id)
            .collect();
        duplicates.sort_unstable();
        for id in duplicates {
            errors.push(format!("card {} appears in more than one place", id));
        }

        if !matches!(self.phase, GamePhase::Setup) {
            if self.players.len() != SEATS {
                errors.push(format!(
                    "{} players seated (expected {})",
                    self.players.len(),
                    SEATS
                ));
            }
            if (self.current_player as usize) >= self.players.len() {
                errors.push(format!("current player {} is not seated", self.current_player));
            }
        }

        for stack in &self.stacks {
            if stack.head.body_part != BodyPart::Head
                || stack.torso.body_part != BodyPart::Torso
                || stack.legs.body_part != BodyPart::Legs
            {
                errors.push(format!("stack {} has mislabeled piles", stack.id));
            }
            if (stack.owner as usize) >= self.players.len() {
                errors.push(format!(
                    "stack {} is owned by unseated player {}",
                    stack.id, stack.owner
                ));
            }
            if stack.is_empty() {
                errors.push(format!("stack {} is empty and should have been purged", stack.id));
            }
        }

        if self.turn.is_some() && !matches!(self.phase, GamePhase::Playing) {
            errors.push("turn state present outside active play".to_string());
        }

        if let GamePhase::Finished { winner } = self.phase {
            match self.get_player(winner) {
                Some(p) if p.has_won() => {}
                Some(_) => errors.push(format!(
                    "recorded winner {} has not scored all characters",
                    winner
                )),
                None => errors.push(format!("recorded winner {} is not seated", winner)),
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

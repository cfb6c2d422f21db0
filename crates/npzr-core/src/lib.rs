//! NPZR - core rules engine for the Ninja Pirate Zombie Robot card game
//!
//! This crate provides the deterministic game-state machinery for NPZR:
//! - The 44-card universe: regular and wild cards with nomination rules
//! - Deck construction, shuffling, drawing, and refill
//! - Player-owned stacks of head/torso/legs piles with completion detection
//! - The move-and-cascade engine that resolves chained stack completions
//! - The sequential turn state machine and the game facade around it
//!
//! # Architecture
//!
//! The engine is a synchronous, single-process state machine: every public
//! operation is a plain call mutating one explicitly owned [`GameState`],
//! and a deep [`Clone`] of that state is fully independent, so hosts can
//! run speculative simulations (AI search, rollback) against copies.
//! Rendering, UI bindings, transport, and AI move selection all live
//! outside this crate and talk to it through the same public operations.
//!
//! # Modules
//!
//! - [`card`]: card identity, characters, body parts, and card kinds
//! - [`wildcard`]: wild-card nomination legality and enumeration
//! - [`deck`]: the 44-card deck, shuffling, and drawing
//! - [`stack`]: per-body-part piles and stack completion
//! - [`player`]: seats, hands, and scored characters
//! - [`actions`]: the action vocabulary hosts submit and the turn signals
//! - [`moves`]: card relocation and the completion cascade
//! - [`turn`]: the sequential turn state machine
//! - [`game`]: game state, lifecycle, errors, and validation

pub mod actions;
pub mod card;
pub mod deck;
pub mod game;
pub mod moves;
pub mod player;
pub mod stack;
pub mod turn;
pub mod wildcard;

// Re-export commonly used types
pub use actions::{MoveAction, MoveTarget, PlayCardAction, TurnSignal};
pub use card::{BodyPart, Card, CardId, CardKind, Character};
pub use deck::{Deck, DECK_SIZE};
pub use game::{GameError, GamePhase, GameState, ValidationReport};
pub use moves::MAX_CASCADE_ITERATIONS;
pub use player::{Player, PlayerId, SEATS, STARTING_HAND_SIZE};
pub use stack::{Pile, Stack, StackId};
pub use turn::{TurnPhase, TurnState};
pub use wildcard::Nomination;

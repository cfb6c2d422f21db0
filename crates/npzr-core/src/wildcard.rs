//! Wild-card nomination rules.
//!
//! A wild card played into a stack only participates in completion once it
//! has been nominated to a concrete (character, body part) pair. Each wild
//! kind constrains which pairs are legal: the fixed dimension of the card
//! must be respected, the open dimension is free.

use crate::card::{BodyPart, Card, CardKind, Character};
use serde::{Deserialize, Serialize};

/// The (character, body part) assignment a wild card is given when played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    pub character: Character,
    pub body_part: BodyPart,
}

impl Nomination {
    pub fn new(character: Character, body_part: BodyPart) -> Self {
        Self {
            character,
            body_part,
        }
    }
}

impl Card {
    /// Whether nominating this card as (character, body part) is legal.
    ///
    /// Regular cards can never be nominated. A wild card's fixed dimension
    /// must match; its open dimension is unconstrained.
    pub fn can_nominate(&self, character: Character, body_part: BodyPart) -> bool {
        match self.kind {
            CardKind::Regular { .. } => false,
            CardKind::WildCharacter { character: c } => c == character,
            CardKind::WildPosition { body_part: b } => b == body_part,
            CardKind::WildUniversal => true,
        }
    }

    /// Apply a nomination if it is legal for this card.
    ///
    /// Returns false and leaves the card untouched otherwise.
    pub fn nominate(&mut self, nomination: Nomination) -> bool {
        if !self.can_nominate(nomination.character, nomination.body_part) {
            return false;
        }
        self.nomination = Some(nomination);
        true
    }

    /// Clear a nomination. Returns false (no-op) on Regular cards.
    pub fn reset_nomination(&mut self) -> bool {
        if !self.is_wild() {
            return false;
        }
        self.nomination = None;
        true
    }

    /// Every legal (character, body part) pair for this card: 3 for
    /// WildCharacter, 4 for WildPosition, 12 for WildUniversal, none for
    /// Regular.
    pub fn possible_nominations(&self) -> Vec<Nomination> {
        let mut nominations = Vec::new();
        for character in Character::ALL {
            for body_part in BodyPart::ALL {
                if self.can_nominate(character, body_part) {
                    nominations.push(Nomination::new(character, body_part));
                }
            }
        }
        nominations
    }
}

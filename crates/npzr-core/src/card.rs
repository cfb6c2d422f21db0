//! Card identity and type model.
//!
//! This module contains:
//! - `Character` and `BodyPart`, the two dimensions a card can fix
//! - `CardKind`, the card type with each kind's fixed dimensions as payload
//! - `Card`, a single physical card with identity and an optional nomination

use crate::wildcard::Nomination;
use serde::{Deserialize, Serialize};

/// Unique card identifier within the 44-card universe
pub type CardId = u32;

/// The four collectible characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Ninja,
    Pirate,
    Zombie,
    Robot,
}

impl Character {
    /// All characters in canonical order
    pub const ALL: [Character; 4] = [
        Character::Ninja,
        Character::Pirate,
        Character::Zombie,
        Character::Robot,
    ];
}

/// The three body parts a character is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    Torso,
    Legs,
}

impl BodyPart {
    /// All body parts in top-to-bottom order
    pub const ALL: [BodyPart; 3] = [BodyPart::Head, BodyPart::Torso, BodyPart::Legs];
}

/// Card type, carrying each type's fixed dimensions.
///
/// A `Regular` card fixes both dimensions; no wild kind ever fixes both.
/// The unfixed dimension of a wild card stays open until the card is
/// nominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    /// Plain card matching exactly one (character, body part) slot
    Regular {
        character: Character,
        body_part: BodyPart,
    },
    /// Fixed character, wild in the body-part dimension
    WildCharacter { character: Character },
    /// Fixed body part, wild in the character dimension
    WildPosition { body_part: BodyPart },
    /// Wild in both dimensions
    WildUniversal,
}

/// A single card.
///
/// A card is owned by exactly one zone at any time: the deck, a player's
/// hand, a stack pile, or the removed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identity
    pub id: CardId,
    /// Card type and fixed dimensions
    pub kind: CardKind,
    /// Assignment given when a wild card is played; never present on Regular
    pub nomination: Option<Nomination>,
}

impl Card {
    /// Create a card with no nomination
    pub fn new(id: CardId, kind: CardKind) -> Self {
        Self {
            id,
            kind,
            nomination: None,
        }
    }

    /// Whether this card is any of the wild kinds
    pub fn is_wild(&self) -> bool {
        !matches!(self.kind, CardKind::Regular { .. })
    }

    /// Fast cards grant another play in the same turn. Every wild card is
    /// fast; Regular cards are not.
    pub fn is_fast_card(&self) -> bool {
        self.is_wild()
    }

    /// The character this card's type fixes, if any
    pub fn fixed_character(&self) -> Option<Character> {
        match self.kind {
            CardKind::Regular { character, .. } | CardKind::WildCharacter { character } => {
                Some(character)
            }
            CardKind::WildPosition { .. } | CardKind::WildUniversal => None,
        }
    }

    /// The body part this card's type fixes, if any
    pub fn fixed_body_part(&self) -> Option<BodyPart> {
        match self.kind {
            CardKind::Regular { body_part, .. } | CardKind::WildPosition { body_part } => {
                Some(body_part)
            }
            CardKind::WildCharacter { .. } | CardKind::WildUniversal => None,
        }
    }

    /// Nomination value if nominated, else the fixed value, else `None`
    pub fn effective_character(&self) -> Option<Character> {
        self.nomination
            .map(|n| n.character)
            .or_else(|| self.fixed_character())
    }

    /// Nomination value if nominated, else the fixed value, else `None`
    pub fn effective_body_part(&self) -> Option<BodyPart> {
        self.nomination
            .map(|n| n.body_part)
            .or_else(|| self.fixed_body_part())
    }

    /// Whether this card can be played as a match for the given slot.
    ///
    /// Regular cards match only their own pair; WildCharacter matches any
    /// body part of its character; WildPosition matches any character of
    /// its body part; WildUniversal matches anything.
    pub fn fits_pile(&self, character: Character, body_part: BodyPart) -> bool {
        match self.kind {
            CardKind::Regular {
                character: c,
                body_part: b,
            } => c == character && b == body_part,
            CardKind::WildCharacter { character: c } => c == character,
            CardKind::WildPosition { body_part: b } => b == body_part,
            CardKind::WildUniversal => true,
        }
    }
}

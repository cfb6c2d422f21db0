//! Stacks and their per-body-part piles.
//!
//! A stack is a player-owned triple of piles, one per body part. Cards pile
//! up in insertion order and only the top card of each pile participates in
//! completion - burying a pile under a mismatched card is a legal, and
//! deliberate, defensive play.

use crate::card::{BodyPart, Card, CardId, Character};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Unique stack identifier within one game
pub type StackId = u32;

/// An ordered pile of cards for a single body part. The last card is the
/// top, face-up card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    /// Which body part this pile collects
    pub body_part: BodyPart,
    /// Cards in insertion order, top last
    pub cards: Vec<Card>,
}

impl Pile {
    pub fn new(body_part: BodyPart) -> Self {
        Self {
            body_part,
            cards: Vec::new(),
        }
    }

    /// Place a card on top of the pile
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove a card by id, most recent match first
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let pos = self.cards.iter().rposition(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// The face-up card, if any
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A player-owned triple of piles. Exactly one pile per body part, by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub id: StackId,
    /// Seat that scores this stack when it completes
    pub owner: PlayerId,
    pub head: Pile,
    pub torso: Pile,
    pub legs: Pile,
}

impl Stack {
    /// Create an empty stack for the given owner
    pub fn new(id: StackId, owner: PlayerId) -> Self {
        Self {
            id,
            owner,
            head: Pile::new(BodyPart::Head),
            torso: Pile::new(BodyPart::Torso),
            legs: Pile::new(BodyPart::Legs),
        }
    }

    pub fn pile(&self, body_part: BodyPart) -> &Pile {
        match body_part {
            BodyPart::Head => &self.head,
            BodyPart::Torso => &self.torso,
            BodyPart::Legs => &self.legs,
        }
    }

    pub fn pile_mut(&mut self, body_part: BodyPart) -> &mut Pile {
        match body_part {
            BodyPart::Head => &mut self.head,
            BodyPart::Torso => &mut self.torso,
            BodyPart::Legs => &mut self.legs,
        }
    }

    /// Place a card onto the named pile. Placement is always legal,
    /// whatever the card's character or body part.
    pub fn add_card(&mut self, card: Card, body_part: BodyPart) {
        self.pile_mut(body_part).push(card);
    }

    /// The completing character, if this stack currently completes.
    ///
    /// Requires all three piles non-empty and the effective characters of
    /// their top cards defined and identical. Buried cards are irrelevant.
    pub fn completion(&self) -> Option<Character> {
        let head = self.head.top()?.effective_character()?;
        let torso = self.torso.top()?.effective_character()?;
        let legs = self.legs.top()?.effective_character()?;
        (head == torso && torso == legs).then_some(head)
    }

    /// Whether every pile is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.torso.is_empty() && self.legs.is_empty()
    }

    /// Total cards across the three piles
    pub fn card_count(&self) -> usize {
        self.head.len() + self.torso.len() + self.legs.len()
    }

    /// Iterate all cards in the stack
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.head
            .cards
            .iter()
            .chain(self.torso.cards.iter())
            .chain(self.legs.cards.iter())
    }

    /// Consume the stack, draining its cards
    pub fn into_cards(self) -> Vec<Card> {
        let mut cards = self.head.cards;
        cards.extend(self.torso.cards);
        cards.extend(self.legs.cards);
        cards
    }
}

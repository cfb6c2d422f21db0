//! Deck construction, shuffling, and drawing.
//!
//! The NPZR universe is a fixed 44-card set: three copies of every regular
//! (character, body part) pairing, one character wild per character, one
//! position wild per body part, and a single universal wild.

use crate::card::{BodyPart, Card, CardId, CardKind, Character};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Total number of cards in the game
pub const DECK_SIZE: usize = 44;

/// Copies of each regular (character, body part) card
const REGULAR_COPIES: usize = 3;

/// The draw deck. Cards are drawn from the top (the end of the vector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build the standard 44-card deck, unshuffled, with unique ids
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        let mut next_id: CardId = 0;
        let mut push = |cards: &mut Vec<Card>, kind: CardKind| {
            cards.push(Card::new(next_id, kind));
            next_id += 1;
        };

        for character in Character::ALL {
            for body_part in BodyPart::ALL {
                for _ in 0..REGULAR_COPIES {
                    push(
                        &mut cards,
                        CardKind::Regular {
                            character,
                            body_part,
                        },
                    );
                }
            }
        }
        for character in Character::ALL {
            push(&mut cards, CardKind::WildCharacter { character });
        }
        for body_part in BodyPart::ALL {
            push(&mut cards, CardKind::WildPosition { body_part });
        }
        push(&mut cards, CardKind::WildUniversal);

        debug_assert_eq!(cards.len(), DECK_SIZE);
        Self { cards }
    }

    /// An empty deck
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Uniformly shuffle the remaining cards
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw the top card, or `None` when the deck is exhausted
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Return reclaimed cards to the deck and reshuffle everything
    pub fn refill<R: Rng>(&mut self, mut cards: Vec<Card>, rng: &mut R) {
        self.cards.append(&mut cards);
        self.cards.shuffle(rng);
    }

    /// Remaining cards, top last
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_standard_deck_composition() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);

        let regular = deck
            .cards()
            .iter()
            .filter(|c| matches!(c.kind, CardKind::Regular { .. }))
            .count();
        let wild_character = deck
            .cards()
            .iter()
            .filter(|c| matches!(c.kind, CardKind::WildCharacter { .. }))
            .count();
        let wild_position = deck
            .cards()
            .iter()
            .filter(|c| matches!(c.kind, CardKind::WildPosition { .. }))
            .count();
        let wild_universal = deck
            .cards()
            .iter()
            .filter(|c| matches!(c.kind, CardKind::WildUniversal))
            .count();

        assert_eq!(regular, 36);
        assert_eq!(wild_character, 4);
        assert_eq!(wild_position, 3);
        assert_eq!(wild_universal, 1);
    }

    #[test]
    fn test_standard_deck_has_unique_ids() {
        let deck = Deck::standard();
        let ids: HashSet<CardId> = deck.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn test_three_copies_of_each_regular_pairing() {
        let deck = Deck::standard();
        for character in Character::ALL {
            for body_part in BodyPart::ALL {
                let copies = deck
                    .cards()
                    .iter()
                    .filter(|c| {
                        c.kind
                            == CardKind::Regular {
                                character,
                                body_part,
                            }
                    })
                    .count();
                assert_eq!(copies, REGULAR_COPIES);
            }
        }
    }

    #[test]
    fn test_shuffle_preserves_the_card_set() {
        let mut deck = Deck::standard();
        let mut rng = StdRng::seed_from_u64(42);
        deck.shuffle(&mut rng);

        assert_eq!(deck.len(), DECK_SIZE);
        let mut ids: Vec<CardId> = deck.cards().iter().map(|c| c.id).collect();
        ids.sort_unstable();
        let expected: Vec<CardId> = (0..DECK_SIZE as CardId).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut deck = Deck::standard();
        for _ in 0..DECK_SIZE {
            assert!(deck.draw().is_some());
        }
        assert!(deck.draw().is_none());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_refill_restores_reclaimed_cards() {
        let mut deck = Deck::empty();
        assert!(deck.draw().is_none());

        let reclaimed = vec![
            Card::new(0, CardKind::WildUniversal),
            Card::new(
                1,
                CardKind::Regular {
                    character: Character::Ninja,
                    body_part: BodyPart::Head,
                },
            ),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        deck.refill(reclaimed, &mut rng);
        assert_eq!(deck.len(), 2);
        assert!(deck.draw().is_some());
    }
}

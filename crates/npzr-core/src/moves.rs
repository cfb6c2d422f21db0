//! Card relocation and the stack-completion cascade.
//!
//! Completing a stack banks a pending move; spending a pending move
//! relocates a card, which can complete further stacks. The cascade loop
//! resolves this chain until nothing new completes, bounded by a hard cap.

use crate::actions::{MoveAction, MoveTarget};
use crate::card::{BodyPart, Character};
use crate::game::{GameError, GameState};
use crate::stack::{Stack, StackId};

/// Hard bound on cascade iterations. A safety valve against heuristic
/// cycles; correct play never reaches it.
pub const MAX_CASCADE_ITERATIONS: usize = 50;

impl GameState {
    /// Relocate one card between piles. Rejections leave every card where
    /// it was.
    pub(crate) fn relocate_card(&mut self, action: &MoveAction) -> Result<(), GameError> {
        let src = self
            .stacks
            .iter()
            .position(|s| s.id == action.from_stack)
            .ok_or(GameError::NoSuchStack)?;
        if let MoveTarget::Existing(id) = action.to {
            if !self.stacks.iter().any(|s| s.id == id) {
                return Err(GameError::NoSuchStack);
            }
        }
        let mut card = self.stacks[src]
            .pile_mut(action.from_pile)
            .remove_card(action.card_id)
            .ok_or(GameError::CardNotInPile)?;
        // Moving always invalidates a nomination.
        card.nomination = None;

        match action.to {
            MoveTarget::Existing(id) => {
                let stack = self
                    .stacks
                    .iter_mut()
                    .find(|s| s.id == id)
                    .expect("destination checked above");
                stack.add_card(card, action.to_pile);
            }
            MoveTarget::NewStack => {
                let id = self.alloc_stack_id();
                let mut stack = Stack::new(id, self.current_player);
                stack.add_card(card, action.to_pile);
                self.stacks.push(stack);
            }
        }
        // A stack emptied by the move leaves play.
        self.stacks.retain(|s| !s.is_empty());
        Ok(())
    }

    /// Spend one banked move: relocate the card, then resolve completions.
    pub fn execute_move(&mut self, action: &MoveAction) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        if self.pending_moves == 0 {
            return Err(GameError::NoPendingMoves);
        }
        self.relocate_card(action)?;
        self.pending_moves -= 1;
        self.process_stack_completions();
        Ok(())
    }

    /// Score a stack if it currently completes: the owner gains the
    /// character, the stack leaves play, and one move is banked.
    pub fn complete_stack(&mut self, stack_id: StackId) -> Option<Character> {
        let idx = self.stacks.iter().position(|s| s.id == stack_id)?;
        let character = self.stacks[idx].completion()?;
        let owner = self.stacks[idx].owner;
        let stack = self.stacks.remove(idx);
        for mut card in stack.into_cards() {
            card.nomination = None;
            self.removed_cards.push(card);
        }
        self.get_player_mut(owner)
            .expect("stack owner is seated")
            .score(character);
        self.pending_moves += 1;
        Some(character)
    }

    /// Complete every completable stack, looping until a pass completes
    /// nothing, then refresh the win condition.
    pub fn process_stack_completions(&mut self) -> Vec<Character> {
        let mut completed = Vec::new();
        loop {
            let ready: Vec<StackId> = self
                .stacks
                .iter()
                .filter(|s| s.completion().is_some())
                .map(|s| s.id)
                .collect();
            if ready.is_empty() {
                break;
            }
            for id in ready {
                if let Some(character) = self.complete_stack(id) {
                    completed.push(character);
                }
            }
        }
        self.refresh_win_condition();
        completed
    }

    /// A relocation that would immediately complete one of the acting
    /// player's stacks, if any exists.
    ///
    /// A relocated wild arrives with its nomination cleared, so the card
    /// driving the completion is in practice a regular one - or the move
    /// uncovers a match buried in the source pile.
    pub fn find_best_move(&self) -> Option<MoveAction> {
        for source in &self.stacks {
            for from_pile in BodyPart::ALL {
                let Some(card) = source.pile(from_pile).top() else {
                    continue;
                };
                for dest in &self.stacks {
                    for to_pile in BodyPart::ALL {
                        if dest.id == source.id && to_pile == from_pile {
                            continue;
                        }
                        let action = MoveAction {
                            card_id: card.id,
                            from_stack: source.id,
                            from_pile,
                            to: MoveTarget::Existing(dest.id),
                            to_pile,
                        };
                        if self.move_completes(&action) {
                            return Some(action);
                        }
                    }
                }
            }
        }
        None
    }

    /// Whether a relocation would leave one of the acting player's stacks
    /// completable, checked on a scratch clone.
    fn move_completes(&self, action: &MoveAction) -> bool {
        let mut probe = self.clone();
        if probe.relocate_card(action).is_err() {
            return false;
        }
        probe
            .stacks
            .iter()
            .any(|s| s.owner == self.current_player && s.completion().is_some())
    }

    /// Spend one banked move on the heuristic's pick. Returns false when
    /// nothing is banked or no completing relocation exists.
    pub fn execute_optimal_move(&mut self) -> bool {
        if self.is_finished() || self.pending_moves == 0 {
            return false;
        }
        let Some(action) = self.find_best_move() else {
            return false;
        };
        if self.relocate_card(&action).is_err() {
            return false;
        }
        self.pending_moves -= 1;
        self.process_stack_completions();
        true
    }

    /// Resolve completions and keep spending banked moves while the
    /// heuristic finds completing relocations, up to the iteration cap.
    pub fn cascade_completions(&mut self) -> Vec<Character> {
        let mut completed = self.process_stack_completions();
        for _ in 0..MAX_CASCADE_ITERATIONS {
            if self.is_finished() || self.pending_moves == 0 {
                break;
            }
            let Some(action) = self.find_best_move() else {
                break;
            };
            if self.relocate_card(&action).is_err() {
                break;
            }
            self.pending_moves -= 1;
            completed.extend(self.process_stack_completions());
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardId, CardKind};
    use crate::wildcard::Nomination;

    fn playing_game() -> GameState {
        let mut game = GameState::with_seed(5);
        game.add_player("Alice").unwrap();
        game.add_player("Bob").unwrap();
        game.current_player = 0;
        game
    }

    fn regular(id: CardId, character: Character, body_part: BodyPart) -> Card {
        Card::new(
            id,
            CardKind::Regular {
                character,
                body_part,
            },
        )
    }

    /// A stack owned by `owner` holding a ninja head and torso
    fn near_ninja_stack(game: &mut GameState, owner: u8) -> StackId {
        let id = game.alloc_stack_id();
        let mut stack = Stack::new(id, owner);
        stack.add_card(regular(100, Character::Ninja, BodyPart::Head), BodyPart::Head);
        stack.add_card(
            regular(101, Character::Ninja, BodyPart::Torso),
            BodyPart::Torso,
        );
        game.stacks.push(stack);
        id
    }

    #[test]
    fn test_move_with_no_pending_moves_is_rejected() {
        let mut game = playing_game();
        let id = near_ninja_stack(&mut game, 0);
        let before = game.clone();

        let action = MoveAction {
            card_id: 100,
            from_stack: id,
            from_pile: BodyPart::Head,
            to: MoveTarget::NewStack,
            to_pile: BodyPart::Head,
        };
        assert!(matches!(
            game.execute_move(&action),
            Err(GameError::NoPendingMoves)
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn test_relocation_rejects_missing_pieces() {
        let mut game = playing_game();
        let id = near_ninja_stack(&mut game, 0);
        let before = game.clone();

        let missing_stack = MoveAction {
            card_id: 100,
            from_stack: 999,
            from_pile: BodyPart::Head,
            to: MoveTarget::NewStack,
            to_pile: BodyPart::Head,
        };
        assert!(matches!(
            game.relocate_card(&missing_stack),
            Err(GameError::NoSuchStack)
        ));

        let missing_card = MoveAction {
            card_id: 999,
            from_stack: id,
            from_pile: BodyPart::Head,
            to: MoveTarget::NewStack,
            to_pile: BodyPart::Head,
        };
        assert!(matches!(
            game.relocate_card(&missing_card),
            Err(GameError::CardNotInPile)
        ));

        let missing_destination = MoveAction {
            card_id: 100,
            from_stack: id,
            from_pile: BodyPart::Head,
            to: MoveTarget::Existing(999),
            to_pile: BodyPart::Head,
        };
        assert!(matches!(
            game.relocate_card(&missing_destination),
            Err(GameError::NoSuchStack)
        ));

        assert_eq!(game, before);
    }

    #[test]
    fn test_relocation_to_a_new_stack_purges_an_emptied_source() {
        let mut game = playing_game();
        let id = game.alloc_stack_id();
        let mut stack = Stack::new(id, 0);
        stack.add_card(regular(100, Character::Ninja, BodyPart::Head), BodyPart::Head);
        game.stacks.push(stack);

        let action = MoveAction {
            card_id: 100,
            from_stack: id,
            from_pile: BodyPart::Head,
            to: MoveTarget::NewStack,
            to_pile: BodyPart::Head,
        };
        game.relocate_card(&action).unwrap();

        assert_eq!(game.stacks.len(), 1);
        assert_ne!(game.stacks[0].id, id);
        assert_eq!(game.stacks[0].owner, 0);
        assert_eq!(game.stacks[0].head.top().unwrap().id, 100);
    }

    #[test]
    fn test_relocation_clears_the_nomination() {
        let mut game = playing_game();
        let id = game.alloc_stack_id();
        let mut stack = Stack::new(id, 0);
        let mut wild = Card::new(100, CardKind::WildUniversal);
        wild.nominate(Nomination::new(Character::Ninja, BodyPart::Head));
        stack.add_card(wild, BodyPart::Head);
        game.stacks.push(stack);

        let action = MoveAction {
            card_id: 100,
            from_stack: id,
            from_pile: BodyPart::Head,
            to: MoveTarget::NewStack,
            to_pile: BodyPart::Legs,
        };
        game.relocate_card(&action).unwrap();
        let moved = game.stacks[0].legs.top().unwrap();
        assert_eq!(moved.nomination, None);
        assert_eq!(moved.effective_character(), None);
    }

    #[test]
    fn test_completion_scores_the_stack_owner() {
        let mut game = playing_game();
        let id = near_ninja_stack(&mut game, 1);
        game.stacks
            .iter_mut()
            .find(|s| s.id == id)
            .unwrap()
            .add_card(regular(102, Character::Ninja, BodyPart::Legs), BodyPart::Legs);

        let completed = game.process_stack_completions();
        assert_eq!(completed, vec![Character::Ninja]);
        assert!(game.players[1].scored.contains(&Character::Ninja));
        assert!(game.players[0].scored.is_empty());
        assert!(game.stacks.is_empty());
        assert_eq!(game.pending_moves, 1);
        assert_eq!(game.removed_cards.len(), 3);
        assert!(game.removed_cards.iter().all(|c| c.nomination.is_none()));
    }

    #[test]
    fn test_incomplete_stacks_are_left_alone() {
        let mut game = playing_game();
        near_ninja_stack(&mut game, 0);
        let completed = game.process_stack_completions();
        assert!(completed.is_empty());
        assert_eq!(game.stacks.len(), 1);
        assert_eq!(game.pending_moves, 0);
    }

    #[test]
    fn test_find_best_move_spots_a_completing_relocation() {
        let mut game = playing_game();
        let target = near_ninja_stack(&mut game, 0);

        // The missing legs sit on top of another stack.
        let other = game.alloc_stack_id();
        let mut stack = Stack::new(other, 0);
        stack.add_card(regular(102, Character::Ninja, BodyPart::Legs), BodyPart::Legs);
        stack.add_card(
            regular(103, Character::Pirate, BodyPart::Torso),
            BodyPart::Torso,
        );
        game.stacks.push(stack);

        let action = game.find_best_move().expect("a completing move exists");
        assert_eq!(action.card_id, 102);
        assert_eq!(action.from_stack, other);
        assert_eq!(action.to, MoveTarget::Existing(target));
        assert_eq!(action.to_pile, BodyPart::Legs);
    }

    #[test]
    fn test_execute_optimal_move_completes_and_rebanks() {
        let mut game = playing_game();
        near_ninja_stack(&mut game, 0);
        let other = game.alloc_stack_id();
        let mut stack = Stack::new(other, 0);
        stack.add_card(regular(102, Character::Ninja, BodyPart::Legs), BodyPart::Legs);
        stack.add_card(
            regular(103, Character::Pirate, BodyPart::Torso),
            BodyPart::Torso,
        );
        game.stacks.push(stack);
        game.pending_moves = 1;

        assert!(game.execute_optimal_move());
        assert!(game.players[0].scored.contains(&Character::Ninja));
        // The spent move was re-banked by the completion it triggered.
        assert_eq!(game.pending_moves, 1);

        // Nothing else completes, so the remaining credit is not spent.
        assert!(!game.execute_optimal_move());
        assert_eq!(game.pending_moves, 1);
    }

    #[test]
    fn test_cascade_terminates_with_an_absurd_credit() {
        let mut game = playing_game();
        near_ninja_stack(&mut game, 0);
        game.pending_moves = 1_000;

        let completed = game.cascade_completions();
        assert!(completed.is_empty());
        assert_eq!(game.pending_moves, 1_000);
    }

    #[test]
    fn test_completion_can_finish_the_game() {
        let mut game = playing_game();
        game.players[0].score(Character::Pirate);
        game.players[0].score(Character::Zombie);
        game.players[0].score(Character::Robot);

        let id = near_ninja_stack(&mut game, 0);
        game.stacks
            .iter_mut()
            .find(|s| s.id == id)
            .unwrap()
            .add_card(regular(102, Character::Ninja, BodyPart::Legs), BodyPart::Legs);

        game.process_stack_completions();
        assert!(game.is_finished());
        assert_eq!(game.get_winner(), Some(0));
    }
}

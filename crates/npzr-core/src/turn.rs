//! The sequential turn state machine.
//!
//! A turn runs draw -> play -> (await move)? -> play again or end. Playing
//! a fast (wild) card lets the same player keep playing; completing a stack
//! banks a move that must be executed or skipped before the next play.
//! Illegal input is rejected without touching anything, so the machine is
//! always resumable.

use crate::actions::{MoveAction, PlayCardAction, TurnSignal};
use crate::card::CardId;
use crate::game::{GameError, GamePhase, GameState};
use crate::player::{PlayerId, SEATS};
use crate::stack::Stack;
use serde::{Deserialize, Serialize};

/// Where the turn currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Turn is starting; the mandatory draw has not happened yet
    Draw,
    /// The player may play a card
    PlayCard,
    /// A banked move must be executed or skipped
    AwaitMove,
}

/// State of the turn in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub phase: TurnPhase,
    /// Every card played this turn, in order, for audit and UI
    pub cards_played_this_turn: Vec<CardId>,
    /// Drives the continuation policy after a move resolves
    pub last_card_was_wild: bool,
    /// Moves banked by this turn's completions
    pub moves_earned_this_turn: u32,
    /// Whether the player has earned another play this turn
    pub can_continue_playing: bool,
    pub has_drawn_card: bool,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::Draw,
            cards_played_this_turn: Vec::new(),
            last_card_was_wild: false,
            moves_earned_this_turn: 0,
            can_continue_playing: false,
            has_drawn_card: false,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Begin the current player's turn: draw one card and open the play
    /// phase. Drawing from an exhausted deck is tolerated; the turn still
    /// proceeds.
    pub fn start_turn(&mut self) -> Result<TurnSignal, GameError> {
        match self.phase {
            GamePhase::Setup => return Err(GameError::GameNotStarted),
            GamePhase::Finished { .. } => return Ok(TurnSignal::EndTurn),
            GamePhase::Playing => {}
        }
        if self.turn.is_some() {
            return Err(GameError::TurnInProgress);
        }
        let mut turn = TurnState::new();
        let _ = self.draw_card();
        turn.phase = TurnPhase::PlayCard;
        turn.has_drawn_card = true;
        self.turn = Some(turn);
        Ok(TurnSignal::Continue)
    }

    /// Play one card from the acting player's hand.
    ///
    /// Rejections (card not in hand, missing target stack, illegal
    /// nomination, undeterminable pile) change nothing; the caller may
    /// retry with different input.
    pub fn play_card(&mut self, action: &PlayCardAction) -> Result<TurnSignal, GameError> {
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        match self.turn.as_ref() {
            None => return Err(GameError::NoActiveTurn),
            Some(t) if t.phase == TurnPhase::AwaitMove => return Err(GameError::AwaitingMove),
            Some(_) => {}
        }

        // ==================== Validation ====================
        let seat = self.current_player as usize;
        let card = self.players[seat]
            .hand
            .iter()
            .find(|c| c.id == action.card_id)
            .ok_or(GameError::CardNotInHand)?;
        if let Some(stack_id) = action.target_stack {
            if !self.stacks.iter().any(|s| s.id == stack_id) {
                return Err(GameError::NoSuchStack);
            }
        }
        if let Some(nomination) = action.nomination {
            if !card.can_nominate(nomination.character, nomination.body_part) {
                return Err(GameError::IllegalNomination);
            }
        }
        let pile = match action.target_pile {
            Some(pile) => pile,
            None => action
                .nomination
                .map(|n| n.body_part)
                .or_else(|| card.effective_body_part())
                .ok_or(GameError::NoTargetPile)?,
        };
        let fast = card.is_fast_card();

        // ==================== Placement ====================
        let mut card = self.players[seat]
            .take_card(action.card_id)
            .expect("presence checked above");
        if let Some(nomination) = action.nomination {
            let applied = card.nominate(nomination);
            debug_assert!(applied, "nomination legality checked above");
        }
        match action.target_stack {
            Some(stack_id) => {
                let stack = self
                    .stacks
                    .iter_mut()
                    .find(|s| s.id == stack_id)
                    .expect("existence checked above");
                stack.add_card(card, pile);
            }
            None => {
                let id = self.alloc_stack_id();
                let mut stack = Stack::new(id, self.current_player);
                stack.add_card(card, pile);
                self.stacks.push(stack);
            }
        }
        {
            let turn = self.turn.as_mut().expect("turn checked above");
            turn.cards_played_this_turn.push(action.card_id);
            turn.last_card_was_wild = fast;
        }

        // ==================== Resolution ====================
        let owed = self.pending_moves;
        self.process_stack_completions();
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        let earned = self.pending_moves - owed;
        if earned > 0 {
            let turn = self.turn.as_mut().expect("turn still active");
            turn.phase = TurnPhase::AwaitMove;
            turn.moves_earned_this_turn += earned;
            return Ok(TurnSignal::AwaitMove);
        }
        if fast {
            let turn = self.turn.as_mut().expect("turn still active");
            turn.can_continue_playing = true;
            return Ok(TurnSignal::Continue);
        }
        self.finish_turn();
        Ok(TurnSignal::EndTurn)
    }

    /// Execute the awaited relocation. The turn stays in the await phase
    /// while moves keep completing stacks (the cascade); once a move earns
    /// nothing new, a wild trigger returns the player to the play phase
    /// and a regular trigger ends the turn.
    pub fn execute_turn_move(&mut self, action: &MoveAction) -> Result<TurnSignal, GameError> {
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        match self.turn.as_ref() {
            None => return Err(GameError::NoActiveTurn),
            Some(t) if t.phase != TurnPhase::AwaitMove => return Err(GameError::NotAwaitingMove),
            Some(_) => {}
        }
        if self.pending_moves == 0 {
            return Err(GameError::NoPendingMoves);
        }

        self.relocate_card(action)?;
        self.pending_moves -= 1;
        let owed = self.pending_moves;
        self.process_stack_completions();
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        let earned = self.pending_moves - owed;
        let last_card_was_wild = {
            let turn = self.turn.as_mut().expect("turn still active");
            if earned > 0 {
                turn.moves_earned_this_turn += earned;
                return Ok(TurnSignal::AwaitMove);
            }
            turn.last_card_was_wild
        };
        if last_card_was_wild {
            let turn = self.turn.as_mut().expect("turn still active");
            turn.phase = TurnPhase::PlayCard;
            turn.can_continue_playing = true;
            return Ok(TurnSignal::Continue);
        }
        self.finish_turn();
        Ok(TurnSignal::EndTurn)
    }

    /// Decline the awaited relocation. The credit stays banked; the player
    /// returns to the play phase.
    pub fn skip_move(&mut self) -> Result<TurnSignal, GameError> {
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        match self.turn.as_mut() {
            None => Err(GameError::NoActiveTurn),
            Some(t) if t.phase != TurnPhase::AwaitMove => Err(GameError::NotAwaitingMove),
            Some(turn) => {
                turn.phase = TurnPhase::PlayCard;
                turn.can_continue_playing = true;
                Ok(TurnSignal::Continue)
            }
        }
    }

    /// Explicitly end the turn. A player who earned a continuation but has
    /// nothing (or nothing useful) to play declines it here.
    pub fn end_turn(&mut self) -> Result<TurnSignal, GameError> {
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        if self.turn.is_none() {
            return Err(GameError::NoActiveTurn);
        }
        self.finish_turn();
        Ok(TurnSignal::EndTurn)
    }

    /// Whether the acting player has earned another play right now
    pub fn can_play_another_card(&self) -> bool {
        self.turn
            .as_ref()
            .map(|t| t.phase == TurnPhase::PlayCard && t.can_continue_playing)
            .unwrap_or(false)
    }

    /// Whether a banked move must be executed or skipped before anything
    /// else
    pub fn is_awaiting_move(&self) -> bool {
        self.turn
            .as_ref()
            .map(|t| t.phase == TurnPhase::AwaitMove)
            .unwrap_or(false)
    }

    /// Run a whole turn in one call: start, play the first card, resolve
    /// awaited moves with the built-in heuristic (skipping when it finds
    /// nothing), then chain wild-card continuations from `chained` until
    /// the turn ends on its own or the chain runs out.
    ///
    /// A rejected play surfaces as the error and leaves the turn open, so
    /// the caller can fall back to the sequential operations.
    pub fn play_turn(
        &mut self,
        first: &PlayCardAction,
        chained: &[PlayCardAction],
    ) -> Result<TurnSignal, GameError> {
        if self.is_finished() {
            return Ok(TurnSignal::EndTurn);
        }
        self.start_turn()?;
        let mut signal = self.play_card(first)?;
        let mut queue = chained.iter();
        loop {
            match signal {
                TurnSignal::EndTurn => return Ok(TurnSignal::EndTurn),
                TurnSignal::AwaitMove => {
                    signal = match self.find_best_move() {
                        Some(action) => self.execute_turn_move(&action)?,
                        None => self.skip_move()?,
                    };
                }
                TurnSignal::Continue => match queue.next() {
                    Some(action) => signal = self.play_card(action)?,
                    None => return self.end_turn(),
                },
            }
        }
    }

    /// Hand the table to the other seat and close the turn
    pub(crate) fn finish_turn(&mut self) {
        self.turn = None;
        if matches!(self.phase, GamePhase::Playing) {
            self.current_player = ((self.current_player as usize + 1) % SEATS) as PlayerId;
        }
    }
}

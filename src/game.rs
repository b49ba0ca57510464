// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The state a user interface keeps between moves: whose turn it is, the current board, and the
//! boards that came before it. The rules functions never look at the turn; `Model` is the one
//! place that checks a move is being made by the side on move.
use std::fmt;

use crate::board::{initial_board, square_at, Board};
use crate::changes::{apply_change, PieceMove};
use crate::fen::{parse_fen, FenParseError};
use crate::legality::legal_moves;
use crate::types::{Coordinates, Player};

/// Reasons `Model::commit` refuses a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitError {
    /// The move's origin square is empty on the current board.
    EmptyOrigin(Coordinates),
    /// The piece on the move's origin square belongs to the player who is not on move.
    NotYourTurn(Player),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommitError::EmptyOrigin(coordinates) => write!(f, "no piece on {}", coordinates),
            CommitError::NotYourTurn(player) => write!(f, "it is not {}'s turn", player),
        }
    }
}

impl std::error::Error for CommitError {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    turn: Player,
    board_state: Board,
    #[serde(default)]
    history: Vec<Board>,
}

impl Model {
    /// A new game: the standard starting position with White to move.
    pub fn new() -> Model {
        Model {
            turn: Player::White,
            board_state: initial_board(),
            history: vec![],
        }
    }

    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Model, FenParseError> {
        let pos = parse_fen(fen)?;
        Ok(Model {
            turn: pos.side_to_move,
            board_state: pos.board,
            history: vec![],
        })
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board_state
    }

    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// The legal moves of the piece on `coordinates`, or nothing if that square is off the board,
    /// empty, or holds a piece of the side not on move.
    pub fn legal_moves_from(&self, coordinates: Coordinates) -> Vec<PieceMove> {
        match square_at(coordinates, &self.board_state) {
            Some(square) if square.is_occupied_by(self.turn) => legal_moves(square, &self.board_state),
            _ => vec![],
        }
    }

    /// The legal move that takes the piece on `from` to `to`, if there is one.
    pub fn find_move(&self, from: Coordinates, to: Coordinates) -> Option<PieceMove> {
        self.legal_moves_from(from)
            .into_iter()
            .find(|mov| mov.new_coordinates() == to)
    }

    /// Applies `delta` to the current board and passes the turn. The previous board is kept so
    /// the move can be taken back.
    pub fn commit(&mut self, delta: &PieceMove) -> Result<(), CommitError> {
        let origin = delta.previous_coordinates();
        match self.board_state.occupant(origin) {
            None => return Err(CommitError::EmptyOrigin(origin)),
            Some(piece) if piece.owner != self.turn => return Err(CommitError::NotYourTurn(piece.owner)),
            Some(_) => {}
        }

        debug!("{:?} plays {}", self.turn, delta);
        let next = apply_change(&self.board_state, delta);
        let previous = std::mem::replace(&mut self.board_state, next);
        self.history.push(previous);
        self.turn = self.turn.toggle();
        Ok(())
    }

    /// Takes back the last committed move. Returns false if there is nothing to take back.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(board) => {
                debug!("taking back {:?}'s last move", self.turn.toggle());
                self.board_state = board;
                self.turn = self.turn.toggle();
                true
            }
            None => false,
        }
    }
}

impl Default for Model {
    fn default() -> Model {
        Model::new()
    }
}

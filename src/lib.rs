// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rule and legality engine. Given a board and a square, it enumerates every move the
//! piece standing there can legally make, including pawn double steps, en passant, and castling,
//! and it applies a chosen move to produce a new board. Boards are immutable values.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod board;
pub mod changes;
pub mod fen;
pub mod game;
pub mod geometry;
pub mod legality;
pub mod move_generator;
mod perft;
pub mod predicates;
pub mod types;

pub use board::{initial_board, square_at, AssignedPiece, Board, Square};
pub use changes::{apply_change, MoveKind, PieceMove};
pub use fen::{as_fen, parse_fen, FenParseError, FenPosition};
pub use game::{CommitError, Model};
pub use legality::{all_legal_moves, is_check, legal_moves};
pub use move_generator::{all_pseudo_legal_moves, possible_moves};
pub use perft::perft;
pub use types::{coordinates_to_index, index_to_coordinates};
pub use types::{CastleSide, Coordinates, File, Index, PieceKind, Player, Row};

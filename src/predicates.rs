// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Gates on candidate moves. Every predicate looks at the occupied square a piece is moving from,
//! the board, and the (already oriented) relative offset of the move. A square with no occupant
//! never satisfies any predicate.
use crate::board::{square_at, AssignedPiece, Board, Square};
use crate::geometry::{add_offset, trace_path};
use crate::types::{CastleSide, Coordinates, PieceKind, TableIndex};

/// A predicate in a move template. Templates are static tables, so the predicates are data
/// rather than closures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    PathClear,
    PathClearPriorToDestination,
    NotOccupiedByOwnPiece,
    OppositeColourPiece,
    FirstMoveOfPiece,
    RookNotMoved(CastleSide),
    CastlingLaneClear(CastleSide),
    EnPassantEligible,
}

impl Predicate {
    pub fn test(self, square: &Square, board: &Board, offset: Coordinates) -> bool {
        match self {
            Predicate::PathClear => path_clear(square, board, offset),
            Predicate::PathClearPriorToDestination => {
                path_clear_prior_to_destination(square, board, offset)
            }
            Predicate::NotOccupiedByOwnPiece => not_occupied_by_own_piece(square, board, offset),
            Predicate::OppositeColourPiece => opposite_colour_piece(square, board, offset),
            Predicate::FirstMoveOfPiece => first_move_of_piece(square, board, offset),
            Predicate::RookNotMoved(side) => rook_not_moved(side, square, board, offset),
            Predicate::CastlingLaneClear(side) => castling_lane_clear(side, square, board, offset),
            Predicate::EnPassantEligible => en_passant_eligible(square, board, offset),
        }
    }
}

fn mover(square: &Square) -> Option<AssignedPiece> {
    square.occupant
}

fn destination_square<'a>(square: &Square, board: &'a Board, offset: Coordinates) -> Option<&'a Square> {
    square_at(add_offset(square.coordinates, offset), board)
}

/// Every square on the path to the destination, destination included, is empty.
pub fn path_clear(square: &Square, board: &Board, offset: Coordinates) -> bool {
    if mover(square).is_none() {
        return false;
    }

    match trace_path(square.coordinates, offset) {
        Some(path) => path.iter().all(|&coords| !board.is_occupied(coords)),
        None => false,
    }
}

/// Every square strictly between the origin and the destination is empty. The destination
/// itself may hold anything, but must be on the board.
pub fn path_clear_prior_to_destination(square: &Square, board: &Board, offset: Coordinates) -> bool {
    if mover(square).is_none() {
        return false;
    }

    match trace_path(square.coordinates, offset) {
        Some(path) => {
            let before_destination = path.len().saturating_sub(1);
            path.iter()
                .take(before_destination)
                .all(|&coords| !board.is_occupied(coords))
        }
        None => false,
    }
}

pub fn not_occupied_by_own_piece(square: &Square, board: &Board, offset: Coordinates) -> bool {
    let piece = match mover(square) {
        Some(piece) => piece,
        None => return false,
    };

    match destination_square(square, board, offset) {
        Some(dest) => dest.occupant.map_or(true, |other| other.owner != piece.owner),
        None => false,
    }
}

pub fn opposite_colour_piece(square: &Square, board: &Board, offset: Coordinates) -> bool {
    let piece = match mover(square) {
        Some(piece) => piece,
        None => return false,
    };

    destination_square(square, board, offset)
        .and_then(|dest| dest.occupant)
        .map_or(false, |other| other.owner != piece.owner)
}

pub fn first_move_of_piece(square: &Square, _board: &Board, _offset: Coordinates) -> bool {
    mover(square).map_or(false, |piece| piece.move_count == 0)
}

/// The castling rook for `side` has never moved. This inspects the rook's initial corner; an
/// empty corner, or anything other than the mover's own rook standing there, fails.
pub fn rook_not_moved(side: CastleSide, square: &Square, board: &Board, _offset: Coordinates) -> bool {
    let piece = match mover(square) {
        Some(piece) => piece,
        None => return false,
    };

    match board.occupant(side.rook_corner(piece.owner)) {
        Some(rook) => {
            rook.kind == PieceKind::Rook && rook.owner == piece.owner && rook.move_count == 0
        }
        None => false,
    }
}

/// Every square between the moving piece and the castling rook's corner is empty.
pub fn castling_lane_clear(side: CastleSide, square: &Square, board: &Board, _offset: Coordinates) -> bool {
    let piece = match mover(square) {
        Some(piece) => piece,
        None => return false,
    };

    let to_corner = side.rook_corner(piece.owner) - square.coordinates;
    path_clear_prior_to_destination(square, board, to_corner)
}

/// A pawn may capture en passant toward `offset.file` when all of the following hold:
///
///   1. the square beside it in that direction holds an opposing pawn that has moved exactly
///      once and is flagged as en passant eligible,
///   2. the moving pawn is itself flagged, and
///   3. the moving pawn stands on the row an opposing pawn lands on after a two-square advance.
pub fn en_passant_eligible(square: &Square, board: &Board, offset: Coordinates) -> bool {
    let piece = match mover(square) {
        Some(piece) => piece,
        None => return false,
    };

    if offset.file == 0 || !piece.en_passant_eligible {
        return false;
    }

    if square.coordinates.row != piece.owner.en_passant_row().as_index() as i32 {
        return false;
    }

    let beside = Coordinates::new(square.coordinates.file + offset.file, square.coordinates.row);
    match board.occupant(beside) {
        Some(victim) => {
            victim.owner != piece.owner
                && victim.kind == PieceKind::Pawn
                && victim.move_count == 1
                && victim.en_passant_eligible
        }
        None => false,
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. Nothing in this module knows about check; the legality filter
//! builds on top of it and is the only caller that cares.
use crate::board::{Board, Square};
use crate::changes::{castle, default_change, double_step_change, en_passant_capture};
use crate::changes::{ChangeArgs, ChangeFn, PieceMove};
use crate::geometry::{add_offset, orient_for_player};
use crate::predicates::Predicate;
use crate::types::{CastleSide, Coordinates, PieceKind, Player};

/// A single entry of a piece's move table: an offset from White's point of view, the predicates
/// that must all hold, and the change to build when they do.
pub struct MoveTemplate {
    pub offset: Coordinates,
    pub predicates: &'static [Predicate],
    pub change: ChangeFn,
}

const fn template(
    file: i32,
    row: i32,
    predicates: &'static [Predicate],
    change: ChangeFn,
) -> MoveTemplate {
    MoveTemplate {
        offset: Coordinates::new(file, row),
        predicates,
        change,
    }
}

const PUSH: &[Predicate] = &[Predicate::PathClear];
const DOUBLE_PUSH: &[Predicate] = &[Predicate::PathClear, Predicate::FirstMoveOfPiece];
const CAPTURE: &[Predicate] = &[Predicate::OppositeColourPiece];
const EN_PASSANT: &[Predicate] = &[Predicate::EnPassantEligible];
const STEP: &[Predicate] = &[Predicate::NotOccupiedByOwnPiece];
const KINGSIDE_CASTLE: &[Predicate] = &[
    Predicate::PathClear,
    Predicate::FirstMoveOfPiece,
    Predicate::RookNotMoved(CastleSide::Kingside),
    Predicate::CastlingLaneClear(CastleSide::Kingside),
];
const QUEENSIDE_CASTLE: &[Predicate] = &[
    Predicate::PathClear,
    Predicate::FirstMoveOfPiece,
    Predicate::RookNotMoved(CastleSide::Queenside),
    Predicate::CastlingLaneClear(CastleSide::Queenside),
];

pub static PAWN_MOVES: [MoveTemplate; 6] = [
    template(0, 1, PUSH, default_change),
    template(0, 2, DOUBLE_PUSH, double_step_change),
    template(1, 1, CAPTURE, default_change),
    template(-1, 1, CAPTURE, default_change),
    template(1, 1, EN_PASSANT, en_passant_capture),
    template(-1, 1, EN_PASSANT, en_passant_capture),
];

pub static KNIGHT_MOVES: [MoveTemplate; 8] = [
    template(2, 1, STEP, default_change),
    template(-2, 1, STEP, default_change),
    template(2, -1, STEP, default_change),
    template(-2, -1, STEP, default_change),
    template(1, 2, STEP, default_change),
    template(-1, 2, STEP, default_change),
    template(1, -2, STEP, default_change),
    template(-1, -2, STEP, default_change),
];

pub static KING_MOVES: [MoveTemplate; 10] = [
    template(-1, 1, STEP, default_change),
    template(0, 1, STEP, default_change),
    template(1, 1, STEP, default_change),
    template(1, 0, STEP, default_change),
    template(1, -1, STEP, default_change),
    template(0, -1, STEP, default_change),
    template(-1, -1, STEP, default_change),
    template(-1, 0, STEP, default_change),
    template(2, 0, KINGSIDE_CASTLE, castle),
    template(-2, 0, QUEENSIDE_CASTLE, castle),
];

pub static ORTHOGONAL_DIRECTIONS: [Coordinates; 4] = [
    Coordinates::new(0, 1),
    Coordinates::new(0, -1),
    Coordinates::new(1, 0),
    Coordinates::new(-1, 0),
];

pub static DIAGONAL_DIRECTIONS: [Coordinates; 4] = [
    Coordinates::new(1, 1),
    Coordinates::new(-1, -1),
    Coordinates::new(1, -1),
    Coordinates::new(-1, 1),
];

const RAY_STEP: &[Predicate] = &[
    Predicate::NotOccupiedByOwnPiece,
    Predicate::PathClearPriorToDestination,
];

/// Instantiates a template for the piece on `square`, returning the change if every predicate
/// holds for the oriented offset.
pub fn apply_template(template: &MoveTemplate, square: &Square, board: &Board) -> Option<PieceMove> {
    let piece = square.occupant?;
    let offset = orient_for_player(template.offset, piece.owner);
    let destination = add_offset(square.coordinates, offset);
    if !destination.in_bounds() {
        return None;
    }

    if !template
        .predicates
        .iter()
        .all(|predicate| predicate.test(square, board, offset))
    {
        return None;
    }

    Some((template.change)(&ChangeArgs {
        board,
        piece,
        relative_offset: offset,
        previous_coordinates: square.coordinates,
        new_coordinates: destination,
    }))
}

fn moves_from_table(table: &[MoveTemplate], square: &Square, board: &Board) -> Vec<PieceMove> {
    table
        .iter()
        .filter_map(|template| apply_template(template, square, board))
        .collect()
}

/// Slides outward from `square` one step at a time. The ray ends at the first step that fails
/// its predicates or right after the first occupied square, so a capture is always the last
/// move of its ray.
fn moves_along_ray(direction: Coordinates, square: &Square, board: &Board, moves: &mut Vec<PieceMove>) {
    let piece = match square.occupant {
        Some(piece) => piece,
        None => return,
    };

    let mut offset = direction;
    loop {
        if !RAY_STEP
            .iter()
            .all(|predicate| predicate.test(square, board, offset))
        {
            return;
        }

        let destination = add_offset(square.coordinates, offset);
        moves.push(default_change(&ChangeArgs {
            board,
            piece,
            relative_offset: offset,
            previous_coordinates: square.coordinates,
            new_coordinates: destination,
        }));

        if board.is_occupied(destination) {
            return;
        }

        offset = offset + direction;
    }
}

fn sliding_moves(directions: &[Coordinates], square: &Square, board: &Board, moves: &mut Vec<PieceMove>) {
    for &direction in directions {
        moves_along_ray(direction, square, board, moves);
    }
}

/// Every pseudo-legal move for the piece on `square`. An empty square has no moves.
pub fn possible_moves(square: &Square, board: &Board) -> Vec<PieceMove> {
    let piece = match square.occupant {
        Some(piece) => piece,
        None => return vec![],
    };

    match piece.kind {
        PieceKind::Pawn => moves_from_table(&PAWN_MOVES, square, board),
        PieceKind::Knight => moves_from_table(&KNIGHT_MOVES, square, board),
        PieceKind::King => moves_from_table(&KING_MOVES, square, board),
        PieceKind::Bishop => {
            let mut moves = Vec::new();
            sliding_moves(&DIAGONAL_DIRECTIONS, square, board, &mut moves);
            moves
        }
        PieceKind::Rook => {
            let mut moves = Vec::new();
            sliding_moves(&ORTHOGONAL_DIRECTIONS, square, board, &mut moves);
            moves
        }
        PieceKind::Queen => {
            let mut moves = Vec::new();
            sliding_moves(&DIAGONAL_DIRECTIONS, square, board, &mut moves);
            sliding_moves(&ORTHOGONAL_DIRECTIONS, square, board, &mut moves);
            moves
        }
    }
}

/// Every pseudo-legal move for every piece `player` owns.
pub fn all_pseudo_legal_moves(board: &Board, player: Player) -> Vec<PieceMove> {
    board
        .pieces(player)
        .flat_map(|square| possible_moves(square, board))
        .collect()
}

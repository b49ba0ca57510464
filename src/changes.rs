// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::board::{AssignedPiece, Board};
use crate::types::{coordinates_to_index, CastleSide, Coordinates, Index, PieceKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Standard,
    DoubleStep,
    EnPassant,
    Castle(CastleSide),
}

/// A board delta: exactly which squares a move overwrites, clears, or may flag as en passant
/// eligible. Deltas are built before legality is known and applied with `apply_change`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMove {
    kind: MoveKind,
    piece: AssignedPiece,
    overwrite: Vec<(Index, AssignedPiece)>,
    remove: Vec<Index>,
    possibly_en_passantable: Vec<Index>,
    relative_offset: Coordinates,
    previous_coordinates: Coordinates,
    new_coordinates: Coordinates,
}

impl PieceMove {
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// The moving piece as it stood before the move.
    pub fn piece(&self) -> AssignedPiece {
        self.piece
    }

    pub fn overwrite(&self) -> &[(Index, AssignedPiece)] {
        &self.overwrite
    }

    pub fn remove(&self) -> &[Index] {
        &self.remove
    }

    pub fn possibly_en_passantable(&self) -> &[Index] {
        &self.possibly_en_passantable
    }

    pub fn relative_offset(&self) -> Coordinates {
        self.relative_offset
    }

    pub fn previous_coordinates(&self) -> Coordinates {
        self.previous_coordinates
    }

    pub fn new_coordinates(&self) -> Coordinates {
        self.new_coordinates
    }

    pub fn is_castle(&self) -> bool {
        match self.kind {
            MoveKind::Castle(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PieceMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.previous_coordinates, self.new_coordinates)
    }
}

/// Everything a change constructor needs to know about a validated candidate move.
pub struct ChangeArgs<'a> {
    pub board: &'a Board,
    pub piece: AssignedPiece,
    pub relative_offset: Coordinates,
    pub previous_coordinates: Coordinates,
    pub new_coordinates: Coordinates,
}

pub type ChangeFn = fn(&ChangeArgs) -> PieceMove;

/// Moves the piece to the destination, clearing whatever stood there, and empties the origin.
pub fn default_change(args: &ChangeArgs) -> PieceMove {
    PieceMove {
        kind: MoveKind::Standard,
        piece: args.piece,
        overwrite: vec![(
            coordinates_to_index(args.new_coordinates),
            args.piece.with_en_passant(false),
        )],
        remove: vec![coordinates_to_index(args.previous_coordinates)],
        possibly_en_passantable: vec![],
        relative_offset: args.relative_offset,
        previous_coordinates: args.previous_coordinates,
        new_coordinates: args.new_coordinates,
    }
}

/// A pawn's two-square advance. The pawn is flagged, and both squares beside its destination are
/// marked as possibly en passant eligible; `apply_change` only flags them if an opposing pawn is
/// actually standing there.
pub fn double_step_change(args: &ChangeArgs) -> PieceMove {
    let mut change = default_change(args);
    change.kind = MoveKind::DoubleStep;
    change.overwrite = vec![(
        coordinates_to_index(args.new_coordinates),
        args.piece.with_en_passant(true),
    )];
    change.possibly_en_passantable = [-1, 1]
        .iter()
        .map(|&df| Coordinates::new(args.new_coordinates.file + df, args.new_coordinates.row))
        .filter(|coords| coords.in_bounds())
        .map(coordinates_to_index)
        .collect();
    change
}

/// Captures the pawn beside the mover: it sits on the destination's file and the origin's row,
/// not on the destination square.
pub fn en_passant_capture(args: &ChangeArgs) -> PieceMove {
    let mut change = default_change(args);
    change.kind = MoveKind::EnPassant;
    let captured = Coordinates::new(args.new_coordinates.file, args.previous_coordinates.row);
    change.remove.push(coordinates_to_index(captured));
    change
}

/// Moves the king two files toward a rook and brings that rook from its corner to the square
/// the king crossed.
pub fn castle(args: &ChangeArgs) -> PieceMove {
    let mut change = default_change(args);
    let side = match CastleSide::from_direction(args.relative_offset.file) {
        Some(side) => side,
        None => return change,
    };

    change.kind = MoveKind::Castle(side);
    let corner = side.rook_corner(args.piece.owner);
    let crossed = Coordinates::new(
        args.previous_coordinates.file + side.direction(),
        args.previous_coordinates.row,
    );

    if let Some(rook) = args.board.occupant(corner) {
        change
            .overwrite
            .push((coordinates_to_index(crossed), rook.with_en_passant(false)));
        change.remove.push(coordinates_to_index(corner));
    }

    change
}

/// Produces the board that results from applying `delta` to `board`. For every square, in order
/// of precedence:
///
///   1. an overwrite target receives its piece with the move count bumped by one,
///   2. a removed square is cleared,
///   3. a possibly en passant eligible square holding an opposing pawn has that pawn flagged,
///   4. anything else keeps its occupant with the en passant flag cleared.
///
/// The last rule is what closes the en passant window after exactly one ply.
pub fn apply_change(board: &Board, delta: &PieceMove) -> Board {
    let mover = delta.piece.owner;
    board.map_occupants(|square| {
        if let Some(&(_, piece)) = delta.overwrite.iter().find(|&&(idx, _)| idx == square.index) {
            return Some(piece.with_move_count(piece.move_count + 1));
        }

        if delta.remove.contains(&square.index) {
            return None;
        }

        let occupant = square.occupant?;
        let flag = delta.possibly_en_passantable.contains(&square.index)
            && occupant.kind == PieceKind::Pawn
            && occupant.owner != mover;
        Some(occupant.with_en_passant(flag))
    })
}

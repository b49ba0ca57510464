// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::types::{coordinates_to_index, index_to_coordinates};
use crate::types::{Coordinates, File, Index, PieceKind, Player, Row};
use crate::types::{FILES, NUM_SQUARES, ROWS};

/// A piece together with the player that owns it and the per-piece history the rules need.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignedPiece {
    pub owner: Player,
    pub kind: PieceKind,
    /// Number of applied moves this piece has been the subject of.
    pub move_count: u32,
    /// Set on a pawn that just advanced two squares and on the opposing pawns beside it, for
    /// exactly one ply.
    pub en_passant_eligible: bool,
}

impl AssignedPiece {
    pub fn new(owner: Player, kind: PieceKind) -> AssignedPiece {
        AssignedPiece {
            owner,
            kind,
            move_count: 0,
            en_passant_eligible: false,
        }
    }

    pub fn with_move_count(self, move_count: u32) -> AssignedPiece {
        AssignedPiece { move_count, ..self }
    }

    pub fn with_en_passant(self, en_passant_eligible: bool) -> AssignedPiece {
        AssignedPiece {
            en_passant_eligible,
            ..self
        }
    }
}

impl TryFrom<char> for AssignedPiece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let owner = if c.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };

        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };

        Ok(AssignedPiece::new(owner, kind))
    }
}

impl fmt::Display for AssignedPiece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.owner {
            Player::White => f.write_char(chr.to_ascii_uppercase()),
            Player::Black => f.write_char(chr),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub index: Index,
    pub coordinates: Coordinates,
    pub occupant: Option<AssignedPiece>,
}

impl Square {
    pub fn empty(index: Index) -> Square {
        Square {
            index,
            coordinates: index_to_coordinates(index),
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_occupied_by(&self, player: Player) -> bool {
        self.occupant.map_or(false, |piece| piece.owner == player)
    }
}

/// An immutable 64-square board. Boards are values: every move produces a new board and the
/// previous one is left untouched, so keeping old boards around is all it takes to keep history.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Square; NUM_SQUARES],
}

impl Board {
    pub fn empty() -> Board {
        let mut squares = [Square::empty(0); NUM_SQUARES];
        for (index, square) in squares.iter_mut().enumerate() {
            *square = Square::empty(index);
        }

        Board { squares }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Returns the square at the given index. Panics if the index is not in `0..64`.
    pub fn square(&self, index: Index) -> &Square {
        &self.squares[index]
    }

    pub fn occupant(&self, coordinates: Coordinates) -> Option<AssignedPiece> {
        square_at(coordinates, self).and_then(|square| square.occupant)
    }

    pub fn is_occupied(&self, coordinates: Coordinates) -> bool {
        self.occupant(coordinates).is_some()
    }

    pub fn occupied_squares<'a>(&'a self) -> impl Iterator<Item = &'a Square> + 'a {
        self.squares.iter().filter(|square| square.is_occupied())
    }

    pub fn pieces<'a>(&'a self, player: Player) -> impl Iterator<Item = &'a Square> + 'a {
        self.squares
            .iter()
            .filter(move |square| square.is_occupied_by(player))
    }

    /// Returns a copy of this board with the given square's occupant replaced. Off-board
    /// coordinates leave the board unchanged.
    pub fn with_occupant(&self, coordinates: Coordinates, occupant: Option<AssignedPiece>) -> Board {
        if !coordinates.in_bounds() {
            return self.clone();
        }

        let target = coordinates_to_index(coordinates);
        self.map_occupants(|square| {
            if square.index == target {
                occupant
            } else {
                square.occupant
            }
        })
    }

    /// Builds a new board whose occupants are computed square by square from this one.
    pub(crate) fn map_occupants<F>(&self, mut func: F) -> Board
    where
        F: FnMut(&Square) -> Option<AssignedPiece>,
    {
        let mut next = Board::empty();
        for (square, old) in next.squares.iter_mut().zip(self.squares.iter()) {
            square.occupant = func(old);
        }

        next
    }
}

/// Bounds-checked square lookup. Off-board coordinates yield `None`.
pub fn square_at(coordinates: Coordinates, board: &Board) -> Option<&Square> {
    if coordinates.in_bounds() {
        Some(board.square(coordinates_to_index(coordinates)))
    } else {
        None
    }
}

/// The piece that stands on the given square in the standard starting position, if any.
pub fn initial_occupant(coordinates: Coordinates) -> Option<AssignedPiece> {
    let (file, row) = match (coordinates.file(), coordinates.row()) {
        (Some(file), Some(row)) => (file, row),
        _ => return None,
    };

    let owner = match row {
        Row::One | Row::Two => Player::White,
        Row::Seven | Row::Eight => Player::Black,
        _ => return None,
    };

    let kind = if row == owner.pawn_row() {
        PieceKind::Pawn
    } else {
        match file {
            File::A | File::H => PieceKind::Rook,
            File::B | File::G => PieceKind::Knight,
            File::C | File::F => PieceKind::Bishop,
            File::D => PieceKind::Queen,
            File::E => PieceKind::King,
        }
    };

    Some(AssignedPiece::new(owner, kind))
}

lazy_static! {
    static ref INITIAL_BOARD: Board =
        Board::empty().map_occupants(|square| initial_occupant(square.coordinates));
}

/// The standard starting position: every piece unmoved, no en passant flags.
pub fn initial_board() -> Board {
    INITIAL_BOARD.clone()
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &row in ROWS.iter().rev() {
            for &file in &FILES {
                if let Some(piece) = self.occupant(Coordinates::of(file, row)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", row)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.occupied_squares()).finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        initial_board()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.squares.iter())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        let squares = Vec::<Square>::deserialize(deserializer)?;
        if squares.len() != NUM_SQUARES {
            return Err(de::Error::invalid_length(squares.len(), &"64 squares"));
        }

        let mut board = Board::empty();
        for (index, square) in squares.into_iter().enumerate() {
            if square.index != index || square.coordinates != index_to_coordinates(index) {
                return Err(de::Error::custom(format!(
                    "square at position {} is labelled {} ({})",
                    index, square.index, square.coordinates
                )));
            }

            board.squares[index] = square;
        }

        Ok(board)
    }
}

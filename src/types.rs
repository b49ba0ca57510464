// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

// TableIndex is a trait for all types that can serve as an index into a table.
// It is common to use these types as indices into tables, so this trait allows
// any type implementing To and FromPrimitive to be used as table indices.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

/// A linear square index in `0..64`.
pub type Index = usize;

/// How many squares are on a board.
pub const NUM_SQUARES: usize = 64;

/// Whether or not a single file or row component lies on the board.
pub fn in_bounds(n: i32) -> bool {
    n >= 0 && n <= 7
}

/// A file/row pair. The same type is used for absolute squares and for relative offsets, so the
/// components are signed and may lie off the board; `Coordinates::in_bounds` tells the two apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub file: i32,
    pub row: i32,
}

impl Coordinates {
    pub const fn new(file: i32, row: i32) -> Coordinates {
        Coordinates { file, row }
    }

    pub fn of(file: File, row: Row) -> Coordinates {
        Coordinates::new(file.as_index() as i32, row.as_index() as i32)
    }

    pub fn in_bounds(self) -> bool {
        in_bounds(self.file) && in_bounds(self.row)
    }

    pub fn file(self) -> Option<File> {
        if in_bounds(self.file) {
            Some(File::from_index(self.file as usize))
        } else {
            None
        }
    }

    pub fn row(self) -> Option<Row> {
        if in_bounds(self.row) {
            Some(Row::from_index(self.row as usize))
        } else {
            None
        }
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.file + rhs.file, self.row + rhs.row)
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.file - rhs.file, self.row - rhs.row)
    }
}

impl Neg for Coordinates {
    type Output = Coordinates;

    fn neg(self) -> Coordinates {
        Coordinates::new(-self.file, -self.row)
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.file(), self.row()) {
            (Some(file), Some(row)) => write!(f, "{}{}", file, row),
            _ => write!(f, "({}, {})", self.file, self.row),
        }
    }
}

/// Possible errors that can arise when parsing algebraic coordinates such as `e4`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordinateParseError {
    WrongLength,
    InvalidFile(char),
    InvalidRow(char),
}

impl Display for CoordinateParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordinateParseError::WrongLength => write!(f, "coordinates must be two characters"),
            CoordinateParseError::InvalidFile(c) => write!(f, "invalid file '{}'", c),
            CoordinateParseError::InvalidRow(c) => write!(f, "invalid row '{}'", c),
        }
    }
}

impl std::error::Error for CoordinateParseError {}

impl FromStr for Coordinates {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Coordinates, CoordinateParseError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(CoordinateParseError::WrongLength);
        }

        let file = File::try_from(chars[0]).map_err(|_| CoordinateParseError::InvalidFile(chars[0]))?;
        let row = Row::try_from(chars[1]).map_err(|_| CoordinateParseError::InvalidRow(chars[1]))?;
        Ok(Coordinates::of(file, row))
    }
}

/// Converts on-board coordinates into their linear index. Callers are expected to have checked
/// `Coordinates::in_bounds` first.
pub fn coordinates_to_index(coordinates: Coordinates) -> Index {
    debug_assert!(coordinates.in_bounds(), "off-board coordinates {:?}", coordinates);
    (coordinates.file * 8 + coordinates.row) as Index
}

pub fn index_to_coordinates(index: Index) -> Coordinates {
    debug_assert!(index < NUM_SQUARES, "index {} out of range", index);
    Coordinates::new((index / 8) as i32, (index % 8) as i32)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum Row {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Row::One => '1',
            Row::Two => '2',
            Row::Three => '3',
            Row::Four => '4',
            Row::Five => '5',
            Row::Six => '6',
            Row::Seven => '7',
            Row::Eight => '8',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for Row {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value {
            '1' => Row::One,
            '2' => Row::Two,
            '3' => Row::Three,
            '4' => Row::Four,
            '5' => Row::Five,
            '6' => Row::Six,
            '7' => Row::Seven,
            '8' => Row::Eight,
            _ => return Err(()),
        };
        Ok(res)
    }
}

pub static ROWS: [Row; 8] = [
    Row::One,
    Row::Two,
    Row::Three,
    Row::Four,
    Row::Five,
    Row::Six,
    Row::Seven,
    Row::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            File::A => 'a',
            File::B => 'b',
            File::C => 'c',
            File::D => 'd',
            File::E => 'e',
            File::F => 'f',
            File::G => 'g',
            File::H => 'h',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value {
            'a' => File::A,
            'b' => File::B,
            'c' => File::C,
            'd' => File::D,
            'e' => File::E,
            'f' => File::F,
            'g' => File::G,
            'h' => File::H,
            _ => return Err(()),
        };
        Ok(res)
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn toggle(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// The sign of a forward step along the row axis.
    pub fn forward(self) -> i32 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    pub fn back_row(self) -> Row {
        match self {
            Player::White => Row::One,
            Player::Black => Row::Eight,
        }
    }

    pub fn pawn_row(self) -> Row {
        match self {
            Player::White => Row::Two,
            Player::Black => Row::Seven,
        }
    }

    /// The row this player's pawns must stand on to capture en passant: the row an opposing
    /// pawn lands on after advancing two squares from its starting row.
    pub fn en_passant_row(self) -> Row {
        let them = self.toggle();
        let landing = them.pawn_row().as_index() as i32 + 2 * them.forward();
        Row::from_index(landing as usize)
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Player::White => 'w',
            Player::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static PLAYERS: [Player; 2] = [Player::White, Player::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// The file direction the king travels when castling on this side.
    pub fn direction(self) -> i32 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    /// The file the castling rook starts the game on.
    pub fn rook_file(self) -> File {
        match self {
            CastleSide::Kingside => File::H,
            CastleSide::Queenside => File::A,
        }
    }

    /// The corner a player's rook for this side starts the game on.
    pub fn rook_corner(self, player: Player) -> Coordinates {
        Coordinates::of(self.rook_file(), player.back_row())
    }

    pub fn from_direction(file_offset: i32) -> Option<CastleSide> {
        if file_offset > 0 {
            Some(CastleSide::Kingside)
        } else if file_offset < 0 {
            Some(CastleSide::Queenside)
        } else {
            None
        }
    }
}

pub static CASTLE_SIDES: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE =0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn for_side(player: Player, side: CastleSide) -> CastleStatus {
        match (player, side) {
            (Player::White, CastleSide::Kingside) => CastleStatus::WHITE_KINGSIDE,
            (Player::White, CastleSide::Queenside) => CastleStatus::WHITE_QUEENSIDE,
            (Player::Black, CastleSide::Kingside) => CastleStatus::BLACK_KINGSIDE,
            (Player::Black, CastleSide::Queenside) => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn for_player(player: Player) -> CastleStatus {
        match player {
            Player::White => CastleStatus::WHITE,
            Player::Black => CastleStatus::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bijection() {
        for i in 0..NUM_SQUARES {
            assert_eq!(i, coordinates_to_index(index_to_coordinates(i)));
        }

        for &file in &FILES {
            for &row in &ROWS {
                let coords = Coordinates::of(file, row);
                assert_eq!(coords, index_to_coordinates(coordinates_to_index(coords)));
            }
        }
    }

    #[test]
    fn index_layout_is_file_major() {
        assert_eq!(0, coordinates_to_index(Coordinates::of(File::A, Row::One)));
        assert_eq!(1, coordinates_to_index(Coordinates::of(File::A, Row::Two)));
        assert_eq!(8, coordinates_to_index(Coordinates::of(File::B, Row::One)));
        assert_eq!(63, coordinates_to_index(Coordinates::of(File::H, Row::Eight)));
    }

    #[test]
    fn bounds() {
        assert!(in_bounds(0));
        assert!(in_bounds(7));
        assert!(!in_bounds(-1));
        assert!(!in_bounds(8));
        assert!(!Coordinates::new(3, 8).in_bounds());
        assert!(Coordinates::new(3, 7).in_bounds());
    }

    #[test]
    fn algebraic_round_trip() {
        let e4: Coordinates = "e4".parse().unwrap();
        assert_eq!(Coordinates::of(File::E, Row::Four), e4);
        assert_eq!("e4", e4.to_string());
        assert_eq!(Err(CoordinateParseError::InvalidFile('z')), "z4".parse::<Coordinates>());
        assert_eq!(Err(CoordinateParseError::InvalidRow('9')), "a9".parse::<Coordinates>());
        assert_eq!(Err(CoordinateParseError::WrongLength), "e44".parse::<Coordinates>());
    }

    #[test]
    fn off_board_display() {
        assert_eq!("(-1, 3)", Coordinates::new(-1, 3).to_string());
    }

    #[test]
    fn en_passant_rows() {
        assert_eq!(Row::Five, Player::White.en_passant_row());
        assert_eq!(Row::Four, Player::Black.en_passant_row());
    }

    #[test]
    fn castle_corners() {
        assert_eq!(
            Coordinates::of(File::H, Row::One),
            CastleSide::Kingside.rook_corner(Player::White)
        );
        assert_eq!(
            Coordinates::of(File::A, Row::Eight),
            CastleSide::Queenside.rook_corner(Player::Black)
        );
    }
}

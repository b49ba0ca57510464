// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Forsyth-Edwards Notation. A FEN string records where pieces stand but not how often each has
//! moved, so parsing infers the per-piece history the rules need:
//!
//! * a piece on its own starting square is unmoved, anything else has moved once,
//! * kings and corner rooks are unmoved only if the castling field grants the matching right,
//! * an en passant target marks the pawn that just advanced two squares, and the opposing pawns
//!   beside it, as en passant eligible.
use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::iter::Peekable;
use std::str::Chars;

use crate::board::{initial_occupant, square_at, AssignedPiece, Board};
use crate::types::{coordinates_to_index, CastleStatus, Coordinates, File, Index, PieceKind, Player, Row};
use crate::types::{TableIndex, CASTLE_SIDES, FILES, NUM_SQUARES, PLAYERS, ROWS};

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::InvalidDigit => write!(f, "empty-square count must be between 1 and 8"),
            FenParseError::FileDoesNotSumToEight => write!(f, "row does not contain eight squares"),
            FenParseError::UnknownPiece => write!(f, "unknown piece letter"),
            FenParseError::InvalidSideToMove => write!(f, "side to move must be 'w' or 'b'"),
            FenParseError::InvalidCastle => write!(f, "invalid castling field"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant target"),
            FenParseError::EmptyHalfmove => write!(f, "missing halfmove clock"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::EmptyFullmove => write!(f, "missing fullmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove clock"),
        }
    }
}

impl std::error::Error for FenParseError {}

/// Everything a FEN string describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenPosition {
    pub board: Board,
    pub side_to_move: Player,
    pub castle_status: CastleStatus,
    pub en_passant_target: Option<Coordinates>,
    pub halfmove_clock: u32,
    pub fullmove_clock: u32,
}

type Stream<'a> = Peekable<Chars<'a>>;

fn eat<'a>(iter: &mut Stream<'a>, expected: char) -> Result<(), FenParseError> {
    match iter.next() {
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(FenParseError::UnexpectedChar(c)),
        None => Err(FenParseError::UnexpectedEnd),
    }
}

fn advance<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
    let _ = iter.next();
    Ok(())
}

fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
    if let Some(c) = iter.peek() {
        Ok(*c)
    } else {
        Err(FenParseError::UnexpectedEnd)
    }
}

fn eat_placement<'a>(
    iter: &mut Stream<'a>,
) -> Result<[Option<AssignedPiece>; NUM_SQUARES], FenParseError> {
    let mut placed = [None; NUM_SQUARES];
    for &row in ROWS.iter().rev() {
        let mut file = File::A as usize;
        while file <= File::H as usize {
            let c = peek(iter)?;
            // digits 1 through 8 indicate empty squares.
            if c.is_digit(10) {
                if c < '1' || c > '8' {
                    return Err(FenParseError::InvalidDigit);
                }

                let value = c as usize - 48;
                file += value;
                if file > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }

                advance(iter)?;
                continue;
            }

            // if it's not a digit, it represents a piece.
            let piece = if let Ok(piece) = AssignedPiece::try_from(c) {
                piece
            } else {
                return Err(FenParseError::UnknownPiece);
            };

            let coordinates = Coordinates::of(File::from_index(file), row);
            placed[coordinates_to_index(coordinates)] = Some(piece);
            advance(iter)?;
            file += 1;
        }

        if row != Row::One {
            eat(iter, '/')?;
        }
    }

    Ok(placed)
}

fn eat_side_to_move<'a>(iter: &mut Stream<'a>) -> Result<Player, FenParseError> {
    let side = match peek(iter)? {
        'w' => Player::White,
        'b' => Player::Black,
        _ => return Err(FenParseError::InvalidSideToMove),
    };

    advance(iter)?;
    Ok(side)
}

fn eat_castle_status<'a>(iter: &mut Stream<'a>) -> Result<CastleStatus, FenParseError> {
    if peek(iter)? == '-' {
        advance(iter)?;
        return Ok(CastleStatus::NONE);
    }

    let mut status = CastleStatus::NONE;
    for _ in 0..4 {
        match peek(iter)? {
            'K' => status |= CastleStatus::WHITE_KINGSIDE,
            'k' => status |= CastleStatus::BLACK_KINGSIDE,
            'Q' => status |= CastleStatus::WHITE_QUEENSIDE,
            'q' => status |= CastleStatus::BLACK_QUEENSIDE,
            ' ' => break,
            _ => return Err(FenParseError::InvalidCastle),
        }

        advance(iter)?;
    }

    Ok(status)
}

fn eat_en_passant<'a>(iter: &mut Stream<'a>) -> Result<Option<Coordinates>, FenParseError> {
    let c = peek(iter)?;
    if c == '-' {
        advance(iter)?;
        return Ok(None);
    }

    if let Ok(file) = File::try_from(c) {
        advance(iter)?;
        let row_c = peek(iter)?;
        if let Ok(row) = Row::try_from(row_c) {
            advance(iter)?;
            Ok(Some(Coordinates::of(file, row)))
        } else {
            Err(FenParseError::InvalidEnPassant)
        }
    } else {
        Err(FenParseError::InvalidEnPassant)
    }
}

fn eat_halfmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
    let mut buf = String::new();
    loop {
        let c = peek(iter)?;
        if !c.is_digit(10) {
            break;
        }

        buf.push(c);
        advance(iter)?;
    }

    if buf.is_empty() {
        return Err(FenParseError::EmptyHalfmove);
    }

    buf.parse::<u32>()
        .map_err(|_| FenParseError::InvalidHalfmove)
}

fn eat_fullmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
    let mut buf = String::new();
    for ch in iter {
        if !ch.is_digit(10) {
            if buf.is_empty() {
                return Err(FenParseError::EmptyFullmove);
            }

            break;
        }

        buf.push(ch);
    }

    if buf.is_empty() {
        return Err(FenParseError::EmptyFullmove);
    }

    buf.parse::<u32>()
        .map_err(|_| FenParseError::InvalidFullmove)
}

/// How many moves a piece found on `coordinates` is assumed to have made.
fn inferred_move_count(piece: AssignedPiece, coordinates: Coordinates, castling: CastleStatus) -> u32 {
    let home = initial_occupant(coordinates)
        .map_or(false, |initial| initial.owner == piece.owner && initial.kind == piece.kind);
    if !home {
        return 1;
    }

    let unmoved = match piece.kind {
        PieceKind::King => castling.intersects(CastleStatus::for_player(piece.owner)),
        PieceKind::Rook => CASTLE_SIDES
            .iter()
            .find(|side| side.rook_corner(piece.owner) == coordinates)
            .map_or(false, |&side| castling.contains(CastleStatus::for_side(piece.owner, side))),
        _ => true,
    };

    if unmoved {
        0
    } else {
        1
    }
}

/// The square of the pawn that just advanced past `target`, if `target` is a square such a pawn
/// could have crossed.
fn advanced_pawn(target: Coordinates, side_to_move: Player) -> Option<Coordinates> {
    let mover = side_to_move.toggle();
    let crossed = mover.pawn_row().as_index() as i32 + mover.forward();
    if target.row != crossed {
        return None;
    }

    Some(Coordinates::new(target.file, target.row + mover.forward()))
}

/// Parses a FEN string, inferring move counts and en passant flags from its fields.
pub fn parse_fen<S: AsRef<str>>(fen: S) -> Result<FenPosition, FenParseError> {
    let str_ref = fen.as_ref();
    let iter = &mut str_ref.chars().peekable();
    let placed = eat_placement(iter)?;
    eat(iter, ' ')?;
    let side_to_move = eat_side_to_move(iter)?;
    eat(iter, ' ')?;
    let castle_status = eat_castle_status(iter)?;
    eat(iter, ' ')?;
    let en_passant_target = eat_en_passant(iter)?;
    eat(iter, ' ')?;
    let halfmove_clock = eat_halfmove(iter)?;
    eat(iter, ' ')?;
    let fullmove_clock = eat_fullmove(iter)?;

    let mut board = Board::empty().map_occupants(|square| {
        placed[square.index].map(|piece| {
            piece.with_move_count(inferred_move_count(piece, square.coordinates, castle_status))
        })
    });

    if let Some(target) = en_passant_target {
        board = mark_en_passant(&board, target, side_to_move)?;
    }

    Ok(FenPosition {
        board,
        side_to_move,
        castle_status,
        en_passant_target,
        halfmove_clock,
        fullmove_clock,
    })
}

fn mark_en_passant(board: &Board, target: Coordinates, side_to_move: Player) -> Result<Board, FenParseError> {
    let pawn = advanced_pawn(target, side_to_move).ok_or(FenParseError::InvalidEnPassant)?;
    let mover = side_to_move.toggle();
    let is_mover_pawn = board
        .occupant(pawn)
        .map_or(false, |piece| piece.owner == mover && piece.kind == PieceKind::Pawn);
    if !is_mover_pawn {
        return Err(FenParseError::InvalidEnPassant);
    }

    let flagged: Vec<Index> = [-1, 1]
        .iter()
        .map(|&df| Coordinates::new(pawn.file + df, pawn.row))
        .filter(|beside| beside.in_bounds())
        .chain(Some(pawn))
        .map(coordinates_to_index)
        .collect();

    Ok(board.map_occupants(|square| {
        square.occupant.map(|piece| {
            if square.coordinates == pawn {
                piece.with_move_count(1).with_en_passant(true)
            } else if flagged.contains(&square.index)
                && piece.owner == side_to_move
                && piece.kind == PieceKind::Pawn
            {
                piece.with_en_passant(true)
            } else {
                piece
            }
        })
    }))
}

/// The castling rights a board still carries: an unmoved king together with an unmoved rook on
/// the matching corner.
pub fn castle_status(board: &Board) -> CastleStatus {
    let mut status = CastleStatus::NONE;
    for &player in PLAYERS.iter() {
        let king_home = Coordinates::of(File::E, player.back_row());
        let king_unmoved = board.occupant(king_home).map_or(false, |piece| {
            piece.owner == player && piece.kind == PieceKind::King && piece.move_count == 0
        });
        if !king_unmoved {
            continue;
        }

        for &side in CASTLE_SIDES.iter() {
            let rook_unmoved = board.occupant(side.rook_corner(player)).map_or(false, |piece| {
                piece.owner == player && piece.kind == PieceKind::Rook && piece.move_count == 0
            });
            if rook_unmoved {
                status |= CastleStatus::for_side(player, side);
            }
        }
    }

    status
}

/// The square behind a pawn of `side_to_move`'s opponent that just advanced two squares.
pub fn en_passant_target(board: &Board, side_to_move: Player) -> Option<Coordinates> {
    let mover = side_to_move.toggle();
    let landing = mover.pawn_row().as_index() as i32 + 2 * mover.forward();
    board
        .pieces(mover)
        .filter_map(|square| square.occupant.map(|piece| (square.coordinates, piece)))
        .find(|&(coordinates, piece)| {
            piece.kind == PieceKind::Pawn
                && piece.en_passant_eligible
                && piece.move_count == 1
                && coordinates.row == landing
        })
        .map(|(coordinates, _)| Coordinates::new(coordinates.file, coordinates.row - mover.forward()))
}

/// Renders a board and the surrounding game state as a FEN string.
pub fn as_fen(board: &Board, side_to_move: Player, halfmove_clock: u32, fullmove_clock: u32) -> String {
    let mut buf = String::new();
    for &row in ROWS.iter().rev() {
        let mut empty_squares = 0;
        for &file in FILES.iter() {
            let square = square_at(Coordinates::of(file, row), board);
            if let Some(piece) = square.and_then(|square| square.occupant) {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                }
                write!(&mut buf, "{}", piece).unwrap();
                empty_squares = 0;
            } else {
                empty_squares += 1;
            }
        }

        if empty_squares != 0 {
            write!(&mut buf, "{}", empty_squares).unwrap();
        }

        if row != Row::One {
            buf.push('/');
        }
    }

    write!(&mut buf, " {} ", side_to_move).unwrap();
    let status = castle_status(board);
    if status.is_empty() {
        buf.push('-');
    } else {
        let letters = [
            (CastleStatus::WHITE_KINGSIDE, 'K'),
            (CastleStatus::WHITE_QUEENSIDE, 'Q'),
            (CastleStatus::BLACK_KINGSIDE, 'k'),
            (CastleStatus::BLACK_QUEENSIDE, 'q'),
        ];
        for &(flag, letter) in letters.iter() {
            if status.contains(flag) {
                buf.push(letter);
            }
        }
    }

    buf.push(' ');
    match en_passant_target(board, side_to_move) {
        Some(target) => write!(&mut buf, "{}", target).unwrap(),
        None => buf.push('-'),
    }

    write!(&mut buf, " {} {}", halfmove_clock, fullmove_clock).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::initial_board;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn at(s: &str) -> Coordinates {
        s.parse().unwrap()
    }

    #[test]
    fn fen_smoke() {
        let pos = parse_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();
        assert_eq!(Board::empty(), pos.board);
        assert_eq!(Player::White, pos.side_to_move);
        assert_eq!(CastleStatus::NONE, pos.castle_status);
        assert_eq!(None, pos.en_passant_target);
        assert_eq!(0, pos.halfmove_clock);
        assert_eq!(0, pos.fullmove_clock);
    }

    #[test]
    fn start_position_matches_initial_board() {
        let pos = parse_fen(START).unwrap();
        assert_eq!(initial_board(), pos.board);
        assert_eq!(CastleStatus::all(), pos.castle_status);
        assert_eq!(1, pos.fullmove_clock);
    }

    #[test]
    fn displaced_pieces_have_moved() {
        let pos = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2").unwrap();
        assert_eq!(Some(1), pos.board.occupant(at("e4")).map(|p| p.move_count));
        assert_eq!(Some(1), pos.board.occupant(at("f3")).map(|p| p.move_count));
        assert_eq!(Some(0), pos.board.occupant(at("d2")).map(|p| p.move_count));
        assert_eq!(Player::Black, pos.side_to_move);
        assert_eq!(1, pos.halfmove_clock);
        assert_eq!(2, pos.fullmove_clock);
    }

    #[test]
    fn castling_rights_decide_king_and_rook_counts() {
        let pos = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let count = |s: &str| pos.board.occupant(at(s)).map(|p| p.move_count);
        assert_eq!(Some(0), count("e1"));
        assert_eq!(Some(0), count("h1"));
        assert_eq!(Some(1), count("a1"));
        assert_eq!(Some(0), count("e8"));
        assert_eq!(Some(0), count("a8"));
        assert_eq!(Some(1), count("h8"));
    }

    #[test]
    fn no_castling_means_moved_king() {
        let pos = parse_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(Some(1), pos.board.occupant(at("e1")).map(|p| p.move_count));
    }

    #[test]
    fn en_passant_target_flags_pawns() {
        let pos = parse_fen("4k3/8/8/3pPp2/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(Some(at("d6")), pos.en_passant_target);
        let d5 = pos.board.occupant(at("d5")).unwrap();
        assert!(d5.en_passant_eligible);
        assert_eq!(1, d5.move_count);
        assert!(pos.board.occupant(at("e5")).unwrap().en_passant_eligible);
        // f5 is the mover's own pawn, not beside an opposing pawn that just advanced.
        assert!(!pos.board.occupant(at("f5")).unwrap().en_passant_eligible);
    }

    #[test]
    fn black_en_passant_target() {
        let pos = parse_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert!(pos.board.occupant(at("d4")).unwrap().en_passant_eligible);
        assert!(pos.board.occupant(at("e4")).unwrap().en_passant_eligible);
    }

    #[test]
    fn en_passant_target_without_pawn() {
        let err = parse_fen("4k3/8/8/8/8/8/8/4K3 w - d6 0 1").unwrap_err();
        assert_eq!(FenParseError::InvalidEnPassant, err);
    }

    #[test]
    fn en_passant_target_on_wrong_row() {
        let err = parse_fen("4k3/8/8/3p4/8/8/8/4K3 w - d5 0 1").unwrap_err();
        assert_eq!(FenParseError::InvalidEnPassant, err);
    }

    #[test]
    fn writes_back_what_it_reads() {
        for fen in &[
            START,
            "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
        ] {
            let pos = parse_fen(fen).unwrap();
            let written = as_fen(&pos.board, pos.side_to_move, pos.halfmove_clock, pos.fullmove_clock);
            assert_eq!(*fen, written);
        }
    }

    #[test]
    fn empty_fen() {
        let err = parse_fen("").unwrap_err();
        assert_eq!(FenParseError::UnexpectedEnd, err);
    }

    #[test]
    fn unknown_piece() {
        let err = parse_fen("z7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
        assert_eq!(FenParseError::UnknownPiece, err);
    }

    #[test]
    fn invalid_digit() {
        let err = parse_fen("9/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
        assert_eq!(FenParseError::InvalidDigit, err);
    }

    #[test]
    fn not_sum_to_8() {
        let err = parse_fen("pppp5/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
        assert_eq!(FenParseError::FileDoesNotSumToEight, err);
    }

    #[test]
    fn bad_side_to_move() {
        let err = parse_fen("8/8/8/8/8/8/8/8 c - - 0 0").unwrap_err();
        assert_eq!(FenParseError::InvalidSideToMove, err);
    }

    #[test]
    fn bad_castle_status() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w a - 0 0").unwrap_err();
        assert_eq!(FenParseError::InvalidCastle, err);
    }

    #[test]
    fn bad_en_passant() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w - 88 0 0").unwrap_err();
        assert_eq!(FenParseError::InvalidEnPassant, err);
    }

    #[test]
    fn empty_halfmove() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w - - q 0").unwrap_err();
        assert_eq!(FenParseError::EmptyHalfmove, err);
    }

    #[test]
    fn invalid_halfmove() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w - - 4294967296 0").unwrap_err();
        assert_eq!(FenParseError::InvalidHalfmove, err);
    }

    #[test]
    fn empty_fullmove() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w - - 0 q").unwrap_err();
        assert_eq!(FenParseError::EmptyFullmove, err);
    }

    #[test]
    fn fullmove_early_end() {
        let err = parse_fen("8/8/8/8/8/8/8/8 w - - 0").unwrap_err();
        assert_eq!(FenParseError::UnexpectedEnd, err);
    }
}

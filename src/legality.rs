// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legality filtering. A pseudo-legal move is legal if, once applied, no opposing pseudo-legal
//! move lands on the mover's king. Check detection here only ever calls the pseudo-legal
//! generator, never `legal_moves`, so the recursion is one level deep.
use hashbrown::HashSet;

use crate::board::{Board, Square};
use crate::changes::{apply_change, MoveKind, PieceMove};
use crate::move_generator::{all_pseudo_legal_moves, possible_moves};
use crate::types::{coordinates_to_index, Coordinates, Index, PieceKind, Player};

pub fn king_coordinates(board: &Board, player: Player) -> Option<Coordinates> {
    board
        .pieces(player)
        .find(|square| square.occupant.map_or(false, |piece| piece.kind == PieceKind::King))
        .map(|square| square.coordinates)
}

/// Every square the opponent of `player` could move a piece to, ignoring whether those moves
/// would themselves be legal.
pub fn opponent_destinations(board: &Board, player: Player) -> HashSet<Index> {
    all_pseudo_legal_moves(board, player.toggle())
        .iter()
        .map(|mov| coordinates_to_index(mov.new_coordinates()))
        .collect()
}

/// Whether `player`'s king could be captured by the opponent on this board. A board without a
/// king for `player` is never in check.
pub fn is_check(board: &Board, player: Player) -> bool {
    match king_coordinates(board, player) {
        Some(king) => opponent_destinations(board, player).contains(&coordinates_to_index(king)),
        None => false,
    }
}

/// Applies `delta` to a scratch board and reports whether `player`'s king survives it.
pub fn leaves_king_safe(board: &Board, delta: &PieceMove, player: Player) -> bool {
    let hypothetical = apply_change(board, delta);
    !is_check(&hypothetical, player)
}

/// Every legal move for the piece on `square`.
pub fn legal_moves(square: &Square, board: &Board) -> Vec<PieceMove> {
    let piece = match square.occupant {
        Some(piece) => piece,
        None => return vec![],
    };

    let mut moves: Vec<PieceMove> = possible_moves(square, board)
        .into_iter()
        .filter(|mov| {
            let safe = leaves_king_safe(board, mov, piece.owner);
            if !safe {
                trace!("pruning {}: leaves {:?} king capturable", mov, piece.owner);
            }

            safe
        })
        .collect();

    if moves.iter().any(PieceMove::is_castle) {
        refine_castling(&mut moves, board, piece.owner);
    }

    moves
}

/// A castle survives only if the king is not in check now and the single step toward the
/// castling rook is itself legal, which is to say the king does not pass over an attacked
/// square. This runs after delta-level filtering so that it can consult the surviving king
/// steps instead of re-entering the generator for the same piece.
fn refine_castling(moves: &mut Vec<PieceMove>, board: &Board, player: Player) {
    let in_check = is_check(board, player);
    let steps: Vec<Coordinates> = moves
        .iter()
        .filter(|mov| !mov.is_castle())
        .map(|mov| mov.relative_offset())
        .collect();

    moves.retain(|mov| match mov.kind() {
        MoveKind::Castle(side) => {
            let crossing = Coordinates::new(side.direction(), 0);
            let keep = !in_check && steps.contains(&crossing);
            if !keep {
                debug!(
                    "rejecting {:?} castle {} (in check: {}, crossing square safe: {})",
                    side,
                    mov,
                    in_check,
                    steps.contains(&crossing)
                );
            }

            keep
        }
        _ => true,
    });
}

/// Every legal move for every piece `player` owns.
pub fn all_legal_moves(board: &Board, player: Player) -> Vec<PieceMove> {
    board
        .pieces(player)
        .flat_map(|square| legal_moves(square, board))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{initial_board, AssignedPiece};
    use crate::types::CastleSide;

    fn at(s: &str) -> Coordinates {
        s.parse().unwrap()
    }

    fn piece(owner: Player, kind: PieceKind) -> Option<AssignedPiece> {
        Some(AssignedPiece::new(owner, kind).with_move_count(1))
    }

    fn legal_from(board: &Board, s: &str) -> Vec<PieceMove> {
        legal_moves(board.square(coordinates_to_index(at(s))), board)
    }

    #[test]
    fn king_is_boxed_in_from_start() {
        let board = initial_board();
        assert!(legal_from(&board, "e1").is_empty());
        assert!(legal_from(&board, "e8").is_empty());
    }

    #[test]
    fn start_position_has_twenty_legal_moves() {
        let board = initial_board();
        assert_eq!(20, all_legal_moves(&board, Player::White).len());
    }

    #[test]
    fn finds_the_king() {
        let board = initial_board();
        assert_eq!(Some(at("e1")), king_coordinates(&board, Player::White));
        assert_eq!(Some(at("e8")), king_coordinates(&board, Player::Black));
        assert_eq!(None, king_coordinates(&Board::empty(), Player::White));
    }

    #[test]
    fn rook_gives_check() {
        let board = Board::empty()
            .with_occupant(at("e1"), piece(Player::White, PieceKind::King))
            .with_occupant(at("e8"), piece(Player::Black, PieceKind::Rook));
        assert!(is_check(&board, Player::White));
        assert!(!is_check(&board, Player::Black));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = Board::empty()
            .with_occupant(at("e1"), piece(Player::White, PieceKind::King))
            .with_occupant(at("e2"), piece(Player::White, PieceKind::Knight))
            .with_occupant(at("e8"), piece(Player::Black, PieceKind::Rook));
        assert!(legal_from(&board, "e2").is_empty());
    }

    #[test]
    fn pinned_rook_may_slide_along_the_pin() {
        let board = Board::empty()
            .with_occupant(at("e1"), piece(Player::White, PieceKind::King))
            .with_occupant(at("e3"), piece(Player::White, PieceKind::Rook))
            .with_occupant(at("e8"), piece(Player::Black, PieceKind::Rook));
        let mut dests: Vec<String> = legal_from(&board, "e3")
            .iter()
            .map(|m| m.new_coordinates().to_string())
            .collect();
        dests.sort();
        assert_eq!(vec!["e2", "e4", "e5", "e6", "e7", "e8"], dests);
    }

    #[test]
    fn king_may_not_step_into_check() {
        let board = Board::empty()
            .with_occupant(at("e1"), piece(Player::White, PieceKind::King))
            .with_occupant(at("d8"), piece(Player::Black, PieceKind::Rook));
        let moves = legal_from(&board, "e1");
        assert!(moves.iter().all(|m| m.new_coordinates().file != 3));
        assert_eq!(3, moves.len());
    }

    #[test]
    fn castling_through_check_is_excluded() {
        let board = Board::empty()
            .with_occupant(at("e1"), Some(AssignedPiece::new(Player::White, PieceKind::King)))
            .with_occupant(at("h1"), Some(AssignedPiece::new(Player::White, PieceKind::Rook)))
            .with_occupant(at("f8"), piece(Player::Black, PieceKind::Rook));
        let pseudo = possible_moves(board.square(coordinates_to_index(at("e1"))), &board);
        assert!(pseudo.iter().any(|m| m.kind() == MoveKind::Castle(CastleSide::Kingside)));

        let legal = legal_from(&board, "e1");
        assert!(!legal.iter().any(PieceMove::is_castle));
    }

    #[test]
    fn castling_out_of_check_is_excluded() {
        let board = Board::empty()
            .with_occupant(at("e1"), Some(AssignedPiece::new(Player::White, PieceKind::King)))
            .with_occupant(at("h1"), Some(AssignedPiece::new(Player::White, PieceKind::Rook)))
            .with_occupant(at("e8"), piece(Player::Black, PieceKind::Rook));
        assert!(is_check(&board, Player::White));
        assert!(!legal_from(&board, "e1").iter().any(PieceMove::is_castle));
    }

    #[test]
    fn castling_into_check_is_excluded() {
        let board = Board::empty()
            .with_occupant(at("e1"), Some(AssignedPiece::new(Player::White, PieceKind::King)))
            .with_occupant(at("h1"), Some(AssignedPiece::new(Player::White, PieceKind::Rook)))
            .with_occupant(at("g8"), piece(Player::Black, PieceKind::Rook));
        assert!(!legal_from(&board, "e1").iter().any(PieceMove::is_castle));
    }

    #[test]
    fn castling_with_attacked_rook_path_is_allowed() {
        // b1 is attacked, but the king never crosses it.
        let board = Board::empty()
            .with_occupant(at("e1"), Some(AssignedPiece::new(Player::White, PieceKind::King)))
            .with_occupant(at("a1"), Some(AssignedPiece::new(Player::White, PieceKind::Rook)))
            .with_occupant(at("b8"), piece(Player::Black, PieceKind::Rook));
        let legal = legal_from(&board, "e1");
        let castle = legal.iter().find(|m| m.is_castle()).unwrap();
        assert_eq!(MoveKind::Castle(CastleSide::Queenside), castle.kind());
    }

    #[test]
    fn safe_castle_is_kept() {
        let board = Board::empty()
            .with_occupant(at("e1"), Some(AssignedPiece::new(Player::White, PieceKind::King)))
            .with_occupant(at("h1"), Some(AssignedPiece::new(Player::White, PieceKind::Rook)))
            .with_occupant(at("a8"), piece(Player::Black, PieceKind::King));
        assert!(legal_from(&board, "e1").iter().any(PieceMove::is_castle));
    }

    #[test]
    fn pawn_attacks_only_diagonally() {
        // the black pawn on e3 blocks e2 but does not attack it.
        let board = Board::empty()
            .with_occupant(at("e1"), piece(Player::White, PieceKind::King))
            .with_occupant(at("e3"), piece(Player::Black, PieceKind::Pawn));
        let dests: Vec<String> = legal_from(&board, "e1")
            .iter()
            .map(|m| m.new_coordinates().to_string())
            .collect();
        assert!(dests.contains(&"e2".to_owned()));
        assert!(!dests.contains(&"d2".to_owned()));
        assert!(!dests.contains(&"f2".to_owned()));
    }
}

// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random games from the starting position, checking the invariants that must hold after every
//! applied move.
extern crate rand;
extern crate vantage;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use vantage::{all_legal_moves, apply_change, coordinates_to_index, initial_board, is_check};
use vantage::{index_to_coordinates, Board, MoveKind, PieceMove, Player};

const GAMES: u64 = 8;
const PLIES: usize = 60;

fn check_board(board: &Board) {
    assert_eq!(64, board.squares().len());
    for (i, square) in board.squares().iter().enumerate() {
        assert_eq!(i, square.index);
        assert_eq!(index_to_coordinates(i), square.coordinates);
        assert_eq!(i, coordinates_to_index(square.coordinates));
    }

    for &player in &[Player::White, Player::Black] {
        assert!(board.pieces(player).count() <= 16);
    }
}

fn check_flags(after: &Board, mov: &PieceMove) {
    for square in after.occupied_squares() {
        let piece = square.occupant.unwrap();
        if !piece.en_passant_eligible {
            continue;
        }

        assert_eq!(
            MoveKind::DoubleStep,
            mov.kind(),
            "{} is flagged after {}",
            square.coordinates,
            mov
        );
        let flagged_by_move = square.coordinates == mov.new_coordinates()
            || mov.possibly_en_passantable().contains(&square.index);
        assert!(flagged_by_move, "{} is flagged after {}", square.coordinates, mov);
    }
}

fn play_game(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = initial_board();
    let mut player = Player::White;
    for _ in 0..PLIES {
        let moves = all_legal_moves(&board, player);
        let mov = match moves.choose(&mut rng) {
            Some(mov) => mov.clone(),
            None => break,
        };

        let before = board.occupied_squares().count();
        let next = apply_change(&board, &mov);
        check_board(&next);
        check_flags(&next, &mov);
        assert!(!is_check(&next, player), "{} leaves {:?} in check", mov, player);
        assert!(next.occupied_squares().count() <= before);
        assert!(next.occupant(mov.previous_coordinates()).is_none());
        assert_eq!(
            Some(player),
            next.occupant(mov.new_coordinates()).map(|piece| piece.owner)
        );

        board = next;
        player = player.toggle();
    }
}

#[test]
fn random_playouts_keep_invariants() {
    for seed in 0..GAMES {
        play_game(seed);
    }
}

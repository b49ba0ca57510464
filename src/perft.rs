// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::board::Board;
use crate::changes::apply_change;
use crate::legality::all_legal_moves;
use crate::types::Player;

/// Counts the leaves of the legal move tree rooted at `board` with `player` to move.
pub fn perft(board: &Board, player: Player, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = all_legal_moves(board, player);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|mov| {
            let next = apply_change(board, mov);
            perft(&next, player.toggle(), depth - 1)
        })
        .sum()
}

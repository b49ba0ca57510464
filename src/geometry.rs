// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::types::{Coordinates, Player};

/// The squares a piece crosses on its way to a destination, origin excluded and destination
/// included. No on-board path is longer than seven squares.
pub type Path = ArrayVec<[Coordinates; 8]>;

/// Pure vector addition. The result may lie off the board.
pub fn add_offset(coordinates: Coordinates, offset: Coordinates) -> Coordinates {
    coordinates + offset
}

/// Move templates are written from White's point of view. Black's are mirrored across the middle
/// of the board by negating the row component, which leaves file-wise offsets (castling, captures
/// to either side) pointing at the same files for both players.
pub fn orient_for_player(offset: Coordinates, owner: Player) -> Coordinates {
    Coordinates::new(offset.file, offset.row * owner.forward())
}

pub fn step_towards(from: i32, to: i32) -> i32 {
    if from < to {
        from + 1
    } else if from > to {
        from - 1
    } else {
        from
    }
}

pub fn move_towards(from: Coordinates, to: Coordinates) -> Coordinates {
    Coordinates::new(step_towards(from.file, to.file), step_towards(from.row, to.row))
}

/// Walks from `origin` toward `origin + offset` one unit step at a time. Returns `None` as soon as
/// a step leaves the board.
pub fn trace_path(origin: Coordinates, offset: Coordinates) -> Option<Path> {
    let destination = add_offset(origin, offset);
    let mut current = origin;
    let mut path = Path::new();
    while current != destination {
        current = move_towards(current, destination);
        if !current.in_bounds() {
            return None;
        }

        path.push(current);
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Coordinates {
        s.parse().unwrap()
    }

    #[test]
    fn step_function() {
        assert_eq!(3, step_towards(2, 7));
        assert_eq!(1, step_towards(2, -4));
        assert_eq!(2, step_towards(2, 2));
    }

    #[test]
    fn orientation() {
        let forward_left = Coordinates::new(-1, 1);
        assert_eq!(forward_left, orient_for_player(forward_left, Player::White));
        assert_eq!(
            Coordinates::new(-1, -1),
            orient_for_player(forward_left, Player::Black)
        );
        assert_eq!(
            Coordinates::new(2, 0),
            orient_for_player(Coordinates::new(2, 0), Player::Black)
        );
    }

    #[test]
    fn straight_path() {
        let path = trace_path(at("a1"), Coordinates::new(0, 3)).unwrap();
        assert_eq!(&[at("a2"), at("a3"), at("a4")], &path[..]);
    }

    #[test]
    fn diagonal_path() {
        let path = trace_path(at("e4"), Coordinates::new(-2, -2)).unwrap();
        assert_eq!(&[at("d3"), at("c2")], &path[..]);
    }

    #[test]
    fn knight_path_bends_through_one_square() {
        let path = trace_path(at("g1"), Coordinates::new(-1, 2)).unwrap();
        assert_eq!(&[at("f2"), at("f3")], &path[..]);
    }

    #[test]
    fn zero_offset_is_empty_path() {
        let path = trace_path(at("d4"), Coordinates::new(0, 0)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn leaving_the_board_is_none() {
        assert!(trace_path(at("h1"), Coordinates::new(1, 0)).is_none());
        assert!(trace_path(at("a8"), Coordinates::new(0, 2)).is_none());
        assert!(trace_path(at("b2"), Coordinates::new(-5, -5)).is_none());
    }

    #[test]
    fn longest_path_fits() {
        let path = trace_path(at("a1"), Coordinates::new(7, 7)).unwrap();
        assert_eq!(7, path.len());
        assert_eq!(Some(&at("h8")), path.last());
    }
}

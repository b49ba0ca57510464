// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use vantage::{as_fen, is_check, parse_fen, perft, square_at, Coordinates, FenPosition, Model, PieceMove};

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position")
        .required(true)
        .index(1)
}

fn json_arg() -> Arg<'static, 'static> {
    Arg::with_name("json")
        .help("Print results as JSON")
        .long("json")
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves of the piece on a square")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("SQUARE")
                        .help("Square of the piece to move, such as e2")
                        .required(true)
                        .index(2),
                )
                .arg(json_arg()),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("d")
                        .long("depth")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a sequence of moves, such as e2e4 e7e5, from a position")
                .arg(
                    Arg::with_name("MOVE")
                        .help("Moves in origin-destination form")
                        .required(true)
                        .multiple(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("fen")
                        .help("Starting position, the standard one if absent")
                        .value_name("FEN")
                        .long("fen")
                        .takes_value(true),
                )
                .arg(json_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("moves", Some(matches)) => run_moves(matches),
        ("perft", Some(matches)) => run_perft(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => unreachable!(),
    }
}

fn parse_fen_or_exit(fen: &str) -> FenPosition {
    match parse_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn parse_coordinates_or_exit(text: &str) -> Coordinates {
    match text.parse() {
        Ok(coordinates) => coordinates,
        Err(err) => {
            println!("invalid square {}: {}", text, err);
            process::exit(1);
        }
    }
}

fn run_moves(matches: &ArgMatches) -> ! {
    let pos = parse_fen_or_exit(matches.value_of("FEN").unwrap());
    let coordinates = parse_coordinates_or_exit(matches.value_of("SQUARE").unwrap());
    let square = match square_at(coordinates, &pos.board) {
        Some(square) => square,
        None => {
            println!("{} is not on the board", coordinates);
            process::exit(1);
        }
    };

    let moves = vantage::legal_moves(square, &pos.board);
    if matches.is_present("json") {
        match serde_json::to_string_pretty(&moves) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                println!("failed to serialize moves: {}", err);
                process::exit(1);
            }
        }

        process::exit(0);
    }

    println!("{}", pos.board);
    println!();
    match square.occupant {
        Some(piece) => println!("{} on {}: {} legal moves", piece, coordinates, moves.len()),
        None => println!("{} is empty", coordinates),
    }

    for mov in &moves {
        println!("  {} ({:?})", mov, mov.kind());
    }

    process::exit(0);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = parse_fen_or_exit(fen);

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos.board);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos.board, pos.side_to_move, i);
        let stop = Instant::now();
        let duration = stop - start;
        let nanos = duration.subsec_nanos() as u64;
        let ms = (1000 * 1000 * 1000 * duration.as_secs() + nanos) / (1000 * 1000);
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn find_move_or_exit(model: &Model, text: &str) -> PieceMove {
    if text.len() != 4 || !text.is_char_boundary(2) {
        println!("invalid move {}: expected origin and destination, such as e2e4", text);
        process::exit(1);
    }

    let from = parse_coordinates_or_exit(&text[..2]);
    let to = parse_coordinates_or_exit(&text[2..]);
    match model.find_move(from, to) {
        Some(mov) => mov,
        None => {
            println!("illegal move {} for {:?}", text, model.turn());
            println!();
            println!("{}", model.board());
            process::exit(1);
        }
    }
}

fn run_play(matches: &ArgMatches) -> ! {
    let mut model = match matches.value_of("fen") {
        Some(fen) => match Model::from_fen(fen) {
            Ok(model) => model,
            Err(err) => {
                println!("invalid fen: {}", err);
                process::exit(1);
            }
        },
        None => Model::new(),
    };

    for text in matches.values_of("MOVE").unwrap() {
        let mov = find_move_or_exit(&model, text);
        if let Err(err) = model.commit(&mov) {
            println!("cannot play {}: {}", text, err);
            process::exit(1);
        }
    }

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&model) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                println!("failed to serialize game: {}", err);
                process::exit(1);
            }
        }

        process::exit(0);
    }

    println!("{}", model.board());
    println!();
    let fullmove = 1 + model.history().len() as u32 / 2;
    println!("fen: {}", as_fen(model.board(), model.turn(), 0, fullmove));
    if is_check(model.board(), model.turn()) {
        println!("{:?} is in check", model.turn());
    }

    process::exit(0);
}

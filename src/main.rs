use std::{env, fs, process};

use npuzzle_solver::{parse_board, Solver};

// Input format: the board dimension n followed by n*n tile values in
// row-major order, whitespace-separated; 0 marks the blank.
fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: npuzzle-solver <input-file>");
            process::exit(2);
        }
    };

    let input = match fs::read_to_string(&path) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            process::exit(1);
        }
    };

    let board = match parse_board(&input) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            process::exit(1);
        }
    };

    let solver = Solver::new(board);

    if let Some(path) = solver.solution() {
        println!("Minimum number of moves = {}", solver.moves());
        for board in path {
            println!("{}", board);
        }
    } else {
        println!("No solution possible");
    }
}

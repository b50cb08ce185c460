//! Run the `n` queens solver
//! Usage:
//!
//! ```bash
//! cargo run --release --example queens -- 8 [limit]
//! ```
//!
//! Prints every board (or the first `limit` boards) and the number of
//! solutions. Set `RUST_LOG=debug` to see search statistics.

use dlx_solver::Solver;
use std::io;

fn build(n: usize) -> Result<Solver, dlx_solver::Error> {
    let mut solver = Solver::new();
    for rank in 0..n {
        solver.add_primary_column(&format!("R{}", rank))?;
    }
    for file in 0..n {
        solver.add_primary_column(&format!("F{}", file))?;
    }
    for diagonal in 0..(2 * n - 1) {
        solver.add_column(&format!("A{}", diagonal), false)?;
        solver.add_column(&format!("B{}", diagonal), false)?;
    }

    for rank in 0..n {
        for file in 0..n {
            solver.new_row();
            solver.set_column(&format!("R{}", rank))?;
            solver.set_column(&format!("F{}", file))?;
            solver.set_column(&format!("A{}", rank + file))?;
            solver.set_column(&format!("B{}", n - 1 + file - rank))?;
        }
    }

    Ok(solver)
}

fn print_board(n: usize, rows: &[usize]) {
    let mut board = vec![vec!['.'; n]; n];
    for row in rows {
        board[row / n][row % n] = 'Q';
    }
    for line in board {
        println!("{}", line.into_iter().collect::<String>());
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let n = match args.get(1).map(|arg| arg.parse::<usize>()) {
        None => 8,
        Some(Ok(n)) if n > 0 => n,
        _ => {
            eprintln!("board size must be a positive integer");
            std::process::exit(1);
        }
    };
    let limit = match args.get(2).map(|arg| arg.parse::<u64>()) {
        None => u64::MAX,
        Some(Ok(limit)) => limit,
        Some(Err(_)) => {
            eprintln!("invalid limit");
            std::process::exit(1);
        }
    };

    let mut solver = match build(n) {
        Ok(solver) => solver,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };

    if limit > 0 {
        solver.set_listener(move |number, removals, solution| {
            println!("solution {} ({} removals)", number, removals);
            print_board(n, &solution.sorted_rows());
            println!();
            number < limit
        });
    }
    if std::env::var_os("QUEENS_NAMES").is_some() {
        solver.set_output(io::stdout(), "\n", "\n");
    }

    match solver.solve() {
        Ok(count) => println!("{} solutions", count),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}

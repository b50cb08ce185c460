#![no_main]

use dlx_solver::{Config, Solver};
use libfuzzer_sys::fuzz_target;
use std::{cell::RefCell, rc::Rc};

#[derive(Debug, arbitrary::Arbitrary)]
struct MatrixInput {
    /// Bit `i` set makes column `i` secondary.
    secondary: u8,
    /// Each row is a bit set over 8 columns.
    rows: Vec<u8>,
    disabled: Vec<u8>,
    use_heuristic: bool,
    limit: u8,
}

fn dump(solver: &Solver) -> String {
    let mut output = Vec::new();
    solver.dump_state(&mut output, "").unwrap();
    String::from_utf8(output).unwrap()
}

fuzz_target!(|input: MatrixInput| {
    let mut solver = Solver::with_config(Config {
        use_heuristic: input.use_heuristic,
        permissive: false,
    });
    for column in 0..8 {
        let mandatory = input.secondary & (1 << column) == 0;
        solver.add_column(&format!("c{}", column), mandatory).unwrap();
    }

    let rows: Vec<u8> = input.rows.into_iter().filter(|row| *row != 0).take(64).collect();
    for row in &rows {
        solver.new_row();
        for column in 0..8usize {
            if row & (1 << column) != 0 {
                solver.set_column(column).unwrap();
            }
        }
    }
    for row in input.disabled {
        let _ = solver.disable_row(usize::from(row));
    }

    let before = dump(&solver);
    let secondary = input.secondary;
    let limit = u64::from(input.limit);
    let enabled: Vec<bool> = (0..rows.len())
        .map(|row| solver.is_row_enabled(row) == Some(true))
        .collect();

    let found = Rc::new(RefCell::new(0u64));
    let sink = Rc::clone(&found);
    let chosen = rows.clone();
    solver.set_listener(move |number, _, solution| {
        let mut covered = 0u8;
        for row in &solution.rows {
            assert!(enabled[*row]);
            assert_eq!(covered & chosen[*row], 0, "column covered twice");
            covered |= chosen[*row];
        }
        assert_eq!(covered | secondary, 0xff, "primary column left uncovered");

        *sink.borrow_mut() += 1;
        limit == 0 || number < limit
    });

    let count = solver.solve().unwrap();
    assert_eq!(count, *found.borrow());
    assert_eq!(dump(&solver), before);

    if limit == 0 {
        solver.clear_listener();
        assert_eq!(solver.solutions().count() as u64, count);
    }
});

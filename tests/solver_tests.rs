mod common;

use common::{dump, init_logging, queens_solver, shape, toy_solver, SharedBuffer};
use dlx_solver::{Config, Error, Solution, Solver};
use std::{cell::RefCell, io, rc::Rc};

fn collect_solutions(solver: &mut Solver) -> Rc<RefCell<Vec<Solution>>> {
    let solutions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&solutions);
    solver.set_listener(move |_, _, solution| {
        sink.borrow_mut().push(solution.clone());
        true
    });

    solutions
}

#[test]
fn toy_instance_has_exactly_two_covers() {
    init_logging();

    for use_heuristic in [true, false] {
        let mut solver = toy_solver();
        solver.set_use_heuristic(use_heuristic);
        let solutions = collect_solutions(&mut solver);

        assert_eq!(solver.solve().unwrap(), 2);
        assert_eq!(solver.num_solutions(), 2);

        let mut rows: Vec<_> = solutions
            .borrow()
            .iter()
            .map(Solution::sorted_rows)
            .collect();
        rows.sort();
        assert_eq!(rows, vec![vec![0, 1], vec![2, 3]]);
    }
}

#[test]
fn text_output_lists_names_per_row() {
    let mut solver = toy_solver();
    let output = SharedBuffer::default();
    solver.set_output(output.clone(), "\n", "--\n");

    solver.solve().unwrap();

    assert_eq!(output.contents(), "A C\nB D\n--\nA B\nC D\n--\n");
}

#[test]
fn listener_and_output_receive_same_solutions() {
    let mut solver = toy_solver();
    let solutions = collect_solutions(&mut solver);
    let output = SharedBuffer::default();
    solver.set_output(output.clone(), ";", "|");

    solver.solve().unwrap();

    let expected: String = solutions
        .borrow()
        .iter()
        .map(|solution| {
            let lines: Vec<String> = solution
                .columns
                .iter()
                .map(|names| format!("{};", names.join(" ")))
                .collect();
            format!("{}|", lines.concat())
        })
        .collect();
    assert_eq!(output.contents(), expected);
}

#[test]
fn solving_twice_gives_same_results() {
    let mut solver = queens_solver(6);
    let solutions = collect_solutions(&mut solver);

    assert_eq!(solver.solve().unwrap(), 4);
    let first_removals = solver.deque_removals();
    let first: Vec<_> = solutions.borrow_mut().drain(..).collect();

    assert_eq!(solver.solve().unwrap(), 4);
    assert_eq!(solver.deque_removals(), first_removals);
    assert_eq!(*solutions.borrow(), first);
}

#[test]
fn cancellation_stops_after_requested_solution() {
    for limit in [1, 2, 17, 91] {
        let mut solver = queens_solver(8);
        let before = (dump(&solver), shape(&solver));

        solver.set_listener(move |number, _, _| number < limit);

        assert_eq!(solver.solve().unwrap(), limit);
        assert_eq!(solver.num_solutions(), limit);
        assert_eq!((dump(&solver), shape(&solver)), before);
    }
}

#[test]
fn work_counter_never_decreases() {
    let mut solver = queens_solver(6);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    solver.set_listener(move |_, removals, _| {
        sink.borrow_mut().push(removals);
        true
    });

    solver.solve().unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(seen.iter().all(|removals| *removals <= solver.deque_removals()));

    let mut lazy = Vec::new();
    let mut solutions = solver.solutions();
    while let Some(solution) = solutions.next() {
        lazy.push(solution.removals);
        assert!(solution.removals <= solutions.deque_removals());
    }
    assert_eq!(lazy, *seen);
}

#[test]
fn secondary_columns_may_stay_uncovered() {
    let mut solver = Solver::new();
    solver.add_primary_column("task").unwrap();
    solver.add_column("bonus", false).unwrap();

    solver.new_row();
    solver.set_column("task").unwrap();
    solver.new_row();
    solver.set_column("task").unwrap();
    solver.set_column("bonus").unwrap();

    let solutions = collect_solutions(&mut solver);
    assert_eq!(solver.solve().unwrap(), 2);

    let names: Vec<_> = solutions
        .borrow()
        .iter()
        .map(|solution| solution.columns.clone())
        .collect();
    assert!(names.contains(&vec![vec!["task".to_owned()]]));
    assert!(names.contains(&vec![vec!["task".to_owned(), "bonus".to_owned()]]));
}

#[test]
fn secondary_columns_are_covered_at_most_once() {
    let mut solver = Solver::new();
    solver.add_primary_column("X").unwrap();
    solver.add_primary_column("Y").unwrap();
    solver.add_column("shared", false).unwrap();

    for row in [&["X", "shared"][..], &["Y", "shared"], &["Y"]] {
        solver.new_row();
        for name in row {
            solver.set_column(*name).unwrap();
        }
    }

    let solutions = collect_solutions(&mut solver);
    assert_eq!(solver.solve().unwrap(), 1);
    assert_eq!(solutions.borrow()[0].sorted_rows(), vec![0, 2]);
}

#[test]
fn disabled_rows_are_excluded_until_enabled() {
    let mut solver = toy_solver();
    let before = shape(&solver);

    solver.disable_row(0).unwrap();
    assert_eq!(solver.is_row_enabled(0), Some(false));
    assert_eq!(solver.column_size("A"), Some(1));
    assert_eq!(solver.column_size("B"), Some(1));

    let solutions = collect_solutions(&mut solver);
    assert_eq!(solver.solve().unwrap(), 1);
    assert_eq!(solutions.borrow()[0].sorted_rows(), vec![2, 3]);

    solver.enable_row(0).unwrap();
    assert_eq!(solver.is_row_enabled(0), Some(true));
    assert_eq!(shape(&solver), before);
    assert_eq!(solver.solve().unwrap(), 2);
}

#[test]
fn toggling_rows_is_idempotent() {
    let mut solver = toy_solver();
    let original = shape(&solver);

    solver.enable_row(2).unwrap();
    assert_eq!(shape(&solver), original);

    solver.disable_row(2).unwrap();
    let disabled = shape(&solver);
    solver.disable_row(2).unwrap();
    assert_eq!(shape(&solver), disabled);
    assert_eq!(solver.column_size("A"), Some(1));
    assert_eq!(solver.column_size("C"), Some(1));

    solver.enable_row(2).unwrap();
    solver.enable_row(2).unwrap();
    assert_eq!(shape(&solver), original);
    assert_eq!(solver.is_row_enabled(7), None);
}

#[test]
fn dump_state_lists_every_row() {
    let mut solver = toy_solver();
    solver.disable_row(1).unwrap();

    let mut output = Vec::new();
    solver.dump_state(&mut output, "toy").unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "toy\nA B C D\n1 1 0 0\n0 0 1 1\n1 0 1 0\n0 1 0 1\n"
    );
}

#[test]
fn no_rows_means_no_solutions() {
    let mut solver = Solver::new();
    solver.add_primary_column("lonely").unwrap();

    assert_eq!(solver.solve().unwrap(), 0);
    assert_eq!(solver.row_count(), 0);
    assert_eq!(solver.open_columns(), vec!["lonely"]);
}

#[test]
fn failed_output_stops_search_and_restores_matrix() {
    struct Closed;

    impl io::Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut solver = queens_solver(6);
    let before = (dump(&solver), shape(&solver));
    solver.set_output(Closed, "\n", "\n");

    assert!(matches!(solver.solve(), Err(Error::Io(_))));
    assert_eq!(solver.num_solutions(), 1);
    assert_eq!((dump(&solver), shape(&solver)), before);

    solver.clear_output();
    assert_eq!(solver.solve().unwrap(), 4);
}

#[test]
fn column_lookup_queries() {
    let mut solver = Solver::with_config(Config {
        use_heuristic: false,
        permissive: false,
    });
    let first = solver.add_primary_column("first").unwrap();
    let second = solver.add_column("second", false).unwrap();

    assert_eq!((first, second), (0, 1));
    assert!(!solver.use_heuristic());
    assert_eq!(solver.column_index("second"), Some(1));
    assert_eq!(solver.column_index("third"), None);
    assert_eq!(solver.column_name(0), Some("first"));
    assert_eq!(solver.column_name(2), None);
    assert_eq!(solver.column_size("missing"), None);
    assert_eq!(solver.is_primary("first"), Some(true));
    assert_eq!(solver.is_primary(1), Some(false));
    assert_eq!(solver.is_primary("third"), None);
    assert_eq!(solver.open_columns(), vec!["first"]);
}

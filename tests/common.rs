use dlx_solver::{ExactCover, Solver};
use std::{cell::RefCell, io, rc::Rc};

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Columns `A`..`D` with rows `{A,B}`, `{C,D}`, `{A,C}`, `{B,D}`.
#[allow(dead_code)]
pub fn toy_solver() -> Solver {
    let mut solver = Solver::new();
    for name in ["A", "B", "C", "D"] {
        solver.add_primary_column(name).unwrap();
    }
    for row in [["A", "B"], ["C", "D"], ["A", "C"], ["B", "D"]] {
        solver.new_row();
        for name in row {
            solver.set_column(name).unwrap();
        }
    }

    solver
}

/// `n` queens with a primary column per rank (`R`) and file (`F`) and a
/// secondary column per diagonal (`A`) and anti-diagonal (`B`).
///
/// Row `r * n + c` places a queen on rank `r`, file `c`.
#[allow(dead_code)]
pub fn queens_solver(n: usize) -> Solver {
    let mut solver = Solver::new();
    for rank in 0..n {
        solver.add_primary_column(&format!("R{}", rank)).unwrap();
    }
    for file in 0..n {
        solver.add_primary_column(&format!("F{}", file)).unwrap();
    }
    for diagonal in 0..(2 * n - 1) {
        solver.add_column(&format!("A{}", diagonal), false).unwrap();
        solver.add_column(&format!("B{}", diagonal), false).unwrap();
    }

    for rank in 0..n {
        for file in 0..n {
            solver.new_row();
            solver.set_column(&format!("R{}", rank)).unwrap();
            solver.set_column(&format!("F{}", file)).unwrap();
            solver.set_column(&format!("A{}", rank + file)).unwrap();
            solver.set_column(&format!("B{}", n - 1 + file - rank)).unwrap();
        }
    }

    solver
}

#[allow(dead_code)]
pub fn dump(solver: &Solver) -> String {
    let mut output = Vec::new();
    solver.dump_state(&mut output, "").unwrap();

    String::from_utf8(output).unwrap()
}

/// Column sizes and open columns, which together describe the structural
/// state visible from outside the solver.
#[allow(dead_code)]
pub fn shape(solver: &Solver) -> (Vec<Option<usize>>, Vec<String>) {
    let sizes = (0..solver.column_count())
        .map(|column| solver.column_size(column))
        .collect();
    let open = solver
        .open_columns()
        .into_iter()
        .map(str::to_owned)
        .collect();

    (sizes, open)
}

/// A writer that can be read back after being handed to the solver.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An instance of the `n` queens problem.
#[derive(Debug)]
#[allow(dead_code)]
pub struct NQueens {
    pub possibilities: Vec<Possibility>,
    pub constraints: Vec<Constraint>,
    pub side_length: usize,
}

#[allow(dead_code)]
impl NQueens {
    pub fn new(side_length: usize) -> Self {
        let possibilities = (0..side_length)
            .flat_map(|row| (0..side_length).map(move |column| Possibility { row, column }))
            .collect();

        let constraints = (0..side_length)
            .map(|index| Constraint::Row { index })
            .chain((0..side_length).map(|index| Constraint::Column { index }))
            .chain((0..(2 * side_length - 1)).map(|index| Constraint::LeadingDiagonal { index }))
            .chain((0..(2 * side_length - 1)).map(|index| Constraint::TrailingDiagonal { index }))
            .collect();

        Self {
            possibilities,
            constraints,
            side_length,
        }
    }
}

impl ExactCover for NQueens {
    type Constraint = Constraint;
    type Possibility = Possibility;

    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool {
        use Constraint::*;

        match cons {
            Row { index } => poss.row == *index,
            Column { index } => poss.column == *index,
            LeadingDiagonal { index } => poss.leading_diagonal(self.side_length) == *index,
            TrailingDiagonal { index } => poss.trailing_diagonal() == *index,
        }
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        matches!(
            cons,
            Constraint::LeadingDiagonal { .. } | Constraint::TrailingDiagonal { .. }
        )
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        &self.possibilities
    }

    fn constraints(&self) -> &[Self::Constraint] {
        &self.constraints
    }
}

/// A position on the chess board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(dead_code)]
pub struct Possibility {
    pub row: usize,
    pub column: usize,
}

#[allow(dead_code)]
impl Possibility {
    pub fn leading_diagonal(self, side_length: usize) -> usize {
        self.column + (side_length - 1) - self.row
    }

    pub fn trailing_diagonal(self) -> usize {
        self.row + self.column
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(dead_code)]
pub enum Constraint {
    Row { index: usize },
    Column { index: usize },
    LeadingDiagonal { index: usize },
    TrailingDiagonal { index: usize },
}

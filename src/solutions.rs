//! Lazy enumeration of solutions with an explicit frame stack.

use crate::{
    matrix::Index,
    report::Solution,
    solver::Solver,
};
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    // Before covering the current row
    Cover,
    // After checking, before uncovering
    Uncover,
}

#[derive(Debug)]
struct Frame {
    column: usize,
    head: Index,
    row: Index,
    state: FrameState,
}

/// Iterator that computes solutions one at a time, see
/// [`Solver::solutions`].
///
/// The search visits rows and columns in exactly the same order as
/// [`Solver::solve`], so both produce the same sequence of solutions and the
/// same work counter values. The listener and text output are not used.
///
/// Holding the iterator keeps the solver mutably borrowed, so the matrix
/// cannot be changed mid-search. Dropping it before the end undoes every
/// pending cover.
#[derive(Debug)]
pub struct Solutions<'s> {
    solver: &'s mut Solver,
    stack: Vec<Frame>,
    started: bool,
}

impl<'s> Solutions<'s> {
    pub(crate) fn new(solver: &'s mut Solver) -> Self {
        solver.reset_search();

        Solutions {
            solver,
            stack: Vec::new(),
            started: false,
        }
    }

    /// Number of solutions produced so far.
    pub fn num_solutions(&self) -> u64 {
        self.solver.num_solutions
    }

    /// Work counter of the search so far.
    pub fn deque_removals(&self) -> u64 {
        self.solver.matrix.removals()
    }

    /// Current search depth.
    pub fn depth(&self) -> usize {
        self.solver.path.len()
    }

    /// Either report the current path as a solution, or cover the next column
    /// to branch on and push a frame for it.
    fn descend(&mut self) -> Option<Solution> {
        let solver = &mut *self.solver;

        let Some(column) = solver.matrix.choose(solver.config.use_heuristic) else {
            solver.num_solutions += 1;

            return Some(Solution::from_path(
                &solver.matrix,
                &solver.path,
                solver.num_solutions,
            ));
        };

        solver.matrix.cover(column);

        let head = solver.matrix.header(column).node;
        let row = solver.matrix.node(head).down;
        if row == head {
            // No row can cover this column, so this branch is dead
            solver.matrix.uncover(column);
        } else {
            self.stack.push(Frame {
                column,
                head,
                row,
                state: FrameState::Cover,
            });
        }

        None
    }

    /// Compute up to the next solution, returning `None` if there are no more.
    pub fn next_solution(&mut self) -> Option<Solution> {
        if !self.started {
            self.started = true;

            if let Some(solution) = self.descend() {
                return Some(solution);
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            match frame.state {
                // Commit to the current row of this frame and go one level deeper.
                FrameState::Cover => {
                    let row = frame.row;
                    frame.state = FrameState::Uncover;

                    self.solver.matrix.cover_row(row);
                    self.solver.path.push(row);

                    if let Some(solution) = self.descend() {
                        return Some(solution);
                    }
                }
                // Undo the current row, then move on to the next one or pop
                // the frame once the column is exhausted.
                FrameState::Uncover => {
                    let row = frame.row;
                    let popped = self.solver.path.pop();
                    debug_assert_eq!(popped, Some(row));
                    self.solver.matrix.uncover_row(row);

                    let next = self.solver.matrix.node(row).down;
                    if next == frame.head {
                        let column = frame.column;
                        self.stack.pop();
                        self.solver.matrix.uncover(column);
                    } else {
                        frame.row = next;
                        frame.state = FrameState::Cover;
                    }
                }
            }
        }

        None
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution()
    }
}

impl FusedIterator for Solutions<'_> {}

impl Drop for Solutions<'_> {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            log::debug!(
                "Abandoning search at depth [{}] after [{}] solutions.",
                self.solver.path.len(),
                self.solver.num_solutions
            );
        }

        while let Some(frame) = self.stack.pop() {
            if frame.state == FrameState::Uncover {
                self.solver.path.pop();
                self.solver.matrix.uncover_row(frame.row);
            }
            self.solver.matrix.uncover(frame.column);
        }

        debug_assert!(self.solver.path.is_empty());
    }
}

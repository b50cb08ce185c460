//! Typed exact cover problems, encoded into a [`Solver`].

use crate::{
    error::Result,
    report::Solution,
    solver::{Config, Solver},
};
use std::fmt::Debug;

/// An instance of an exact cover problem.
pub trait ExactCover {
    /// The type of values that are elements of a solution to the exact cover
    /// problem.
    type Possibility: Debug;

    /// The type of value that are constraints on a given instance of an exact
    /// cover problem.
    ///
    /// The `Debug` rendering of each constraint is used as its column name, so
    /// it must be unique within one problem.
    type Constraint: Debug;

    /// Return true if the given `Possibility` will satisfy the given
    /// `Constraint`.
    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool;

    /// Return true if the given `Constraint` is optional.
    fn is_optional(&self, cons: &Self::Constraint) -> bool;

    /// Return a list of possibilities for this instance of the problem.
    fn possibilities(&self) -> &[Self::Possibility];

    /// Return a list of constraints that must be satisfied for this instance of
    /// the problem.
    fn constraints(&self) -> &[Self::Constraint];

    /// Build a solver for this instance of the problem.
    fn encode(&self) -> Result<Encoding<'_, Self>>
    where
        Self: Sized,
    {
        Encoding::new(self)
    }
}

impl<E> ExactCover for &E
where
    E: ExactCover,
{
    type Constraint = E::Constraint;
    type Possibility = E::Possibility;

    fn satisfies(&self, poss: &Self::Possibility, cons: &Self::Constraint) -> bool {
        <E as ExactCover>::satisfies(self, poss, cons)
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        <E as ExactCover>::is_optional(self, cons)
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        <E as ExactCover>::possibilities(self)
    }

    fn constraints(&self) -> &[Self::Constraint] {
        <E as ExactCover>::constraints(self)
    }
}

/// A [`Solver`] loaded from an [`ExactCover`] problem, able to map solutions
/// back to the problem's possibilities.
#[derive(Debug)]
pub struct Encoding<'e, E: ExactCover> {
    problem: &'e E,
    solver: Solver,
    // Possibilities that satisfy no constraint never become rows
    possibility_of_row: Vec<usize>,
}

impl<'e, E> Encoding<'e, E>
where
    E: ExactCover,
{
    /// Encode `problem` using the default [`Config`].
    pub fn new(problem: &'e E) -> Result<Self> {
        Self::with_config(problem, Config::default())
    }

    /// Encode `problem` into a solver with the given configuration.
    ///
    /// Every constraint becomes a column, primary unless
    /// [`ExactCover::is_optional`] says otherwise, and every possibility
    /// becomes a row covering the constraints it satisfies.
    pub fn with_config(problem: &'e E, config: Config) -> Result<Self> {
        let mut solver = Solver::with_config(config);

        for cons in problem.constraints() {
            solver.add_column(&format!("{:?}", cons), !problem.is_optional(cons))?;
        }

        let mut possibility_of_row = Vec::with_capacity(problem.possibilities().len());
        for (index, poss) in problem.possibilities().iter().enumerate() {
            solver.new_row();

            let mut satisfied = false;
            for (column, cons) in problem.constraints().iter().enumerate() {
                if problem.satisfies(poss, cons) {
                    solver.set_column(column)?;
                    satisfied = true;
                }
            }

            if satisfied {
                possibility_of_row.push(index);
            }
        }

        log::debug!(
            "Encoded [{}] possibilities over [{}] constraints into [{}] rows.",
            problem.possibilities().len(),
            problem.constraints().len(),
            possibility_of_row.len()
        );

        Ok(Encoding {
            problem,
            solver,
            possibility_of_row,
        })
    }

    /// Return the encoded problem.
    pub fn problem(&self) -> &'e E {
        self.problem
    }

    /// Return the underlying solver.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Return the underlying solver, for example to register a listener or
    /// disable rows.
    pub fn solver_mut(&mut self) -> &mut Solver {
        &mut self.solver
    }

    /// Return the row index used for the possibility at `index`, if it became
    /// a row.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.possibility_of_row.binary_search(&index).ok()
    }

    /// Return the possibility stored at `row`.
    pub fn possibility(&self, row: usize) -> Option<&'e E::Possibility> {
        let problem = self.problem;

        self.possibility_of_row
            .get(row)
            .map(|index| &problem.possibilities()[*index])
    }

    /// Map a solution back to the possibilities it chose, in search order.
    pub fn possibilities_of(&self, solution: &Solution) -> Vec<&'e E::Possibility> {
        solution
            .rows
            .iter()
            .filter_map(|row| self.possibility(*row))
            .collect()
    }

    /// Return a lazy iterator over all solutions, as possibilities.
    pub fn solutions(&mut self) -> impl Iterator<Item = Vec<&'e E::Possibility>> + '_ {
        let problem = self.problem;
        let possibility_of_row = &self.possibility_of_row;

        self.solver.solutions().map(move |solution| {
            solution
                .rows
                .iter()
                .map(|row| &problem.possibilities()[possibility_of_row[*row]])
                .collect()
        })
    }

    /// Return all solutions.
    pub fn all_solutions(&mut self) -> Vec<Vec<&'e E::Possibility>> {
        self.solutions().collect()
    }
}

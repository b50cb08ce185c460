use crate::{
    error::{Error, Result},
    matrix::{Index, Matrix, Placement},
    report::{self, Solution, TextSink},
    solutions::Solutions,
};
use std::{collections::HashMap, fmt, io};

/// Callback invoked for every solution found by [`Solver::solve`].
///
/// Receives the solution number, the work counter at that point and the
/// solution itself. Returning `false` stops the enumeration after this
/// solution.
pub type Listener = Box<dyn FnMut(u64, u64, &Solution) -> bool>;

/// Settings that change how a [`Solver`] behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Branch on the open column with the fewest live rows instead of the
    /// leftmost open column.
    ///
    /// This only changes the shape of the search tree, never the set of
    /// solutions.
    pub use_heuristic: bool,
    /// Silently ignore invalid construction calls instead of returning an
    /// [`Error`].
    ///
    /// In this mode unknown columns and out of range rows are no-ops, and a
    /// duplicate column name still creates the column but replaces the name
    /// lookup, making the earlier column unreachable by name.
    pub permissive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            use_heuristic: true,
            permissive: false,
        }
    }
}

/// A column addressed either by name or by its creation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRef<'a> {
    /// The name given to [`Solver::add_column`].
    Name(&'a str),
    /// The index returned by [`Solver::add_column`].
    Index(usize),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{}", name),
            ColumnRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Exact cover solver using dancing links.
///
/// A solver is used in two phases. First the matrix is built: columns
/// (constraints) are added with [`add_column`](Solver::add_column), then each
/// row (candidate choice) is started with [`new_row`](Solver::new_row) and
/// filled with [`set_column`](Solver::set_column). Rows may be switched off and
/// on again with [`disable_row`](Solver::disable_row) and
/// [`enable_row`](Solver::enable_row). Then [`solve`](Solver::solve) (or
/// [`solutions`](Solver::solutions)) walks every exact cover.
///
/// Primary columns must be covered exactly once by a solution, secondary
/// columns at most once.
///
/// ```
/// use dlx_solver::Solver;
///
/// let mut solver = Solver::new();
/// for name in ["A", "B", "C"] {
///     solver.add_primary_column(name)?;
/// }
/// for row in [&["A", "B"][..], &["C"], &["B", "C"], &["A"]] {
///     solver.new_row();
///     for name in row {
///         solver.set_column(*name)?;
///     }
/// }
///
/// assert_eq!(solver.solve()?, 2);
/// # Ok::<(), dlx_solver::Error>(())
/// ```
pub struct Solver {
    pub(crate) matrix: Matrix,
    pub(crate) config: Config,
    names: HashMap<String, usize>,

    listener: Option<Listener>,
    output: Option<TextSink>,

    // Values used to track the state of solving
    pub(crate) path: Vec<Index>,
    pub(crate) num_solutions: u64,
    more: bool,
    output_error: Option<io::Error>,
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("config", &self.config)
            .field("columns", &self.matrix.column_count())
            .field("rows", &self.matrix.row_count())
            .field("has_listener", &self.listener.is_some())
            .field("output", &self.output)
            .field("num_solutions", &self.num_solutions)
            .finish_non_exhaustive()
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create an empty solver with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty solver with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Solver {
            matrix: Matrix::new(),
            config,
            names: HashMap::new(),
            listener: None,
            output: None,
            path: Vec::new(),
            num_solutions: 0,
            more: true,
            output_error: None,
        }
    }

    /// Return the configuration in use.
    pub fn config(&self) -> Config {
        self.config
    }

    fn reject(&self, error: Error) -> Result<()> {
        if self.config.permissive {
            log::debug!("Ignoring [{}] in permissive mode.", error);
            Ok(())
        } else {
            Err(error)
        }
    }

    fn resolve(&self, column: ColumnRef<'_>) -> Option<usize> {
        match column {
            ColumnRef::Name(name) => self.names.get(name).copied(),
            ColumnRef::Index(index) => (index < self.matrix.column_count()).then_some(index),
        }
    }

    /// Add a column and return its index.
    ///
    /// A `mandatory` (primary) column must be covered by exactly one row of
    /// every solution. A secondary column may be covered by at most one row.
    pub fn add_column(&mut self, name: &str, mandatory: bool) -> Result<usize> {
        if self.names.contains_key(name) {
            self.reject(Error::DuplicateColumnName(name.to_owned()))?;
        }

        let column = self.matrix.add_column(name, mandatory);
        self.names.insert(name.to_owned(), column);

        Ok(column)
    }

    /// Add a primary column, see [`Solver::add_column`].
    pub fn add_primary_column(&mut self, name: &str) -> Result<usize> {
        self.add_column(name, true)
    }

    /// Finish the current row; the next [`Solver::set_column`] starts a new
    /// one.
    pub fn new_row(&mut self) {
        self.matrix.new_row();
    }

    /// Mark the current row as covering `column`.
    ///
    /// The row is stored, and gets the next row index, on its first call.
    pub fn set_column<'a>(&mut self, column: impl Into<ColumnRef<'a>>) -> Result<()> {
        let column = column.into();
        let Some(index) = self.resolve(column) else {
            return self.reject(Error::UnknownColumn(column.to_string()));
        };

        match self.matrix.set_column(index) {
            Placement::Placed => Ok(()),
            Placement::AlreadyPresent { row } => self.reject(Error::DuplicateEntry {
                row,
                column: self.matrix.header(index).name.clone(),
            }),
        }
    }

    fn check_row(&self, row: usize) -> Result<()> {
        let count = self.matrix.row_count();
        if row < count {
            Ok(())
        } else {
            Err(Error::RowIndexOutOfRange { index: row, count })
        }
    }

    /// Remove a row from the matrix so no solution can use it.
    ///
    /// Disabling a row that is already disabled does nothing.
    pub fn disable_row(&mut self, row: usize) -> Result<()> {
        if let Err(error) = self.check_row(row) {
            return self.reject(error);
        }

        if self.matrix.disable_row(row) {
            log::debug!("Disabled row [{}].", row);
        }

        Ok(())
    }

    /// Restore a row removed by [`Solver::disable_row`].
    ///
    /// Enabling a row that is already enabled does nothing.
    pub fn enable_row(&mut self, row: usize) -> Result<()> {
        if let Err(error) = self.check_row(row) {
            return self.reject(error);
        }

        if self.matrix.enable_row(row) {
            log::debug!("Enabled row [{}].", row);
        }

        Ok(())
    }

    /// Return whether `row` is enabled, or `None` if there is no such row.
    pub fn is_row_enabled(&self, row: usize) -> Option<bool> {
        (row < self.matrix.row_count()).then(|| self.matrix.is_row_enabled(row))
    }

    /// Write every solution found by [`Solver::solve`] to `writer`.
    ///
    /// Each chosen row is written as its column names separated by spaces and
    /// followed by `line_end`. After the last row `solution_end` is written.
    pub fn set_output<W>(&mut self, writer: W, line_end: &str, solution_end: &str)
    where
        W: io::Write + 'static,
    {
        self.output = Some(TextSink::new(Box::new(writer), line_end, solution_end));
    }

    /// Stop writing solutions to the writer given to [`Solver::set_output`].
    pub fn clear_output(&mut self) {
        self.output = None;
    }

    /// Register the callback invoked for every solution found by
    /// [`Solver::solve`], replacing any previous one.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(u64, u64, &Solution) -> bool + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the registered listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Write the whole matrix to `writer` as a line of column names followed by
    /// one `0`/`1` line per row, preceded by `pre_message` when it is not
    /// empty.
    pub fn dump_state<W>(&self, writer: &mut W, pre_message: &str) -> Result<()>
    where
        W: io::Write + ?Sized,
    {
        report::dump(&self.matrix, writer, pre_message)?;

        Ok(())
    }

    /// Number of solutions found by the last search.
    pub fn num_solutions(&self) -> u64 {
        self.num_solutions
    }

    /// Number of individual link removals performed by the last search.
    pub fn deque_removals(&self) -> u64 {
        self.matrix.removals()
    }

    /// Number of columns, primary and secondary.
    pub fn column_count(&self) -> usize {
        self.matrix.column_count()
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> usize {
        self.matrix.row_count()
    }

    /// Whether the minimum size column heuristic is used.
    pub fn use_heuristic(&self) -> bool {
        self.config.use_heuristic
    }

    /// Turn the minimum size column heuristic on or off.
    pub fn set_use_heuristic(&mut self, use_heuristic: bool) {
        self.config.use_heuristic = use_heuristic;
    }

    /// Return the index of the column registered under `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Return the name of the column at `index`.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        (index < self.matrix.column_count()).then(|| self.matrix.header(index).name.as_str())
    }

    /// Return the number of enabled rows that cover `column`.
    pub fn column_size<'a>(&self, column: impl Into<ColumnRef<'a>>) -> Option<usize> {
        self.resolve(column.into())
            .map(|index| self.matrix.header(index).size)
    }

    /// Return whether `column` is primary, or `None` if there is no such
    /// column.
    pub fn is_primary<'a>(&self, column: impl Into<ColumnRef<'a>>) -> Option<bool> {
        self.resolve(column.into())
            .map(|index| self.matrix.header(index).mandatory)
    }

    /// Names of the primary columns that still have to be covered, in the
    /// order the search visits them.
    pub fn open_columns(&self) -> Vec<&str> {
        self.matrix
            .open_columns()
            .map(|column| self.matrix.header(column).name.as_str())
            .collect()
    }

    /// Return a lazy iterator over all solutions.
    ///
    /// Resets the solution and work counters like [`Solver::solve`], but does
    /// not call the listener or write to the output. Dropping the iterator
    /// early restores the matrix.
    pub fn solutions(&mut self) -> Solutions<'_> {
        Solutions::new(self)
    }

    /// Enumerate every exact cover and return how many were found.
    ///
    /// Each solution is passed to the listener and written to the output, if
    /// they are set. The search stops early once the listener returns `false`
    /// or the output fails; in every case the matrix is left exactly as it was
    /// before the call.
    pub fn solve(&mut self) -> Result<u64> {
        self.reset_search();
        self.more = true;

        log::debug!(
            "Searching [{}] columns and [{}] rows with heuristic [{}].",
            self.matrix.column_count(),
            self.matrix.row_count(),
            self.config.use_heuristic
        );

        self.search();
        debug_assert!(self.path.is_empty());

        log::debug!(
            "Search finished with [{}] solutions after [{}] removals.",
            self.num_solutions,
            self.matrix.removals()
        );

        if let Some(output) = self.output.as_mut() {
            if let Err(error) = output.flush() {
                self.output_error.get_or_insert(error);
            }
        }

        match self.output_error.take() {
            Some(error) => Err(Error::Io(error)),
            None => Ok(self.num_solutions),
        }
    }

    pub(crate) fn reset_search(&mut self) {
        self.num_solutions = 0;
        self.matrix.reset_removals();
        self.path.clear();
    }

    fn search(&mut self) {
        let Some(column) = self.matrix.choose(self.config.use_heuristic) else {
            self.report();
            return;
        };

        self.matrix.cover(column);

        let head = self.matrix.header(column).node;
        let mut row = self.matrix.node(head).down;
        while row != head {
            self.matrix.cover_row(row);
            self.path.push(row);

            self.search();

            let popped = self.path.pop();
            debug_assert_eq!(popped, Some(row));
            self.matrix.uncover_row(row);

            if !self.more {
                break;
            }

            row = self.matrix.node(row).down;
        }

        self.matrix.uncover(column);
    }

    fn report(&mut self) {
        self.num_solutions += 1;

        if self.listener.is_none() && self.output.is_none() {
            return;
        }

        let solution = Solution::from_path(&self.matrix, &self.path, self.num_solutions);
        log::trace!(
            "Reporting solution [{}] with rows [{:?}].",
            solution.number,
            solution.rows
        );

        if let Some(listener) = self.listener.as_mut() {
            self.more = listener(solution.number, solution.removals, &solution);
        }

        if let Some(output) = self.output.as_mut() {
            if let Err(error) = output.write_solution(&solution) {
                log::debug!(
                    "Stopping search after output failed on solution [{}]: {}",
                    solution.number,
                    error
                );
                self.output_error = Some(error);
                self.more = false;
            }
        }
    }
}

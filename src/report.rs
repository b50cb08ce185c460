//! Reconstruction and textual output of solutions, plus the matrix dump.

use crate::matrix::{Index, Matrix};
use bumpalo::{collections::String as BumpString, Bump};
use std::{fmt, io::Write};

/// A single exact cover found by the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    /// 1-based position of this solution in the enumeration.
    pub number: u64,
    /// Value of the work counter when the solution was found.
    pub removals: u64,
    /// The row chosen at each search depth, shallowest first.
    pub rows: Vec<usize>,
    /// For each chosen row, the names of the columns it covers.
    ///
    /// Names are listed around the row ring, starting from the entry under
    /// the column that was branched on at that depth.
    pub columns: Vec<Vec<String>>,
}

impl Solution {
    pub(crate) fn from_path(matrix: &Matrix, path: &[Index], number: u64) -> Self {
        let rows = path.iter().map(|entry| matrix.node(*entry).row).collect();
        let columns = path
            .iter()
            .map(|entry| {
                matrix
                    .row_columns(*entry)
                    .map(|column| matrix.header(column).name.clone())
                    .collect()
            })
            .collect();

        Solution {
            number,
            removals: matrix.removals(),
            rows,
            columns,
        }
    }

    /// Return the chosen row indices in ascending order.
    pub fn sorted_rows(&self) -> Vec<usize> {
        let mut rows = self.rows.clone();
        rows.sort_unstable();
        rows
    }
}

/// Writes every reported solution to a caller supplied writer.
pub(crate) struct TextSink {
    writer: Box<dyn Write>,
    line_end: String,
    solution_end: String,
    // Reset after every solution
    scratch: Bump,
}

impl fmt::Debug for TextSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSink")
            .field("line_end", &self.line_end)
            .field("solution_end", &self.solution_end)
            .finish_non_exhaustive()
    }
}

impl TextSink {
    pub fn new(writer: Box<dyn Write>, line_end: &str, solution_end: &str) -> Self {
        TextSink {
            writer,
            line_end: line_end.to_owned(),
            solution_end: solution_end.to_owned(),
            scratch: Bump::new(),
        }
    }

    /// Write one line per depth, names separated by a single space and
    /// terminated by `line_end`, then `solution_end`.
    pub fn write_solution(&mut self, solution: &Solution) -> std::io::Result<()> {
        let result = {
            let mut buffer = BumpString::new_in(&self.scratch);
            for names in &solution.columns {
                for (position, name) in names.iter().enumerate() {
                    if position > 0 {
                        buffer.push(' ');
                    }
                    buffer.push_str(name);
                }
                buffer.push_str(&self.line_end);
            }
            buffer.push_str(&self.solution_end);

            self.writer.write_all(buffer.as_bytes())
        };

        self.scratch.reset();
        result
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Serialize the whole matrix: a line of column names followed by one line of
/// `0`/`1` cells per stored row, each cell aligned to its column name.
///
/// Search state is ignored and disabled rows are still listed.
pub(crate) fn dump<W>(matrix: &Matrix, writer: &mut W, pre_message: &str) -> std::io::Result<()>
where
    W: Write + ?Sized,
{
    if !pre_message.is_empty() {
        writeln!(writer, "{}", pre_message)?;
    }

    let headers = matrix.headers();
    let names: Vec<&str> = headers.iter().map(|header| header.name.as_str()).collect();
    writeln!(writer, "{}", names.join(" "))?;

    let mut filled = vec![false; headers.len()];
    for row in 0..matrix.row_count() {
        filled.fill(false);
        for column in matrix.stored_row_columns(row) {
            filled[column] = true;
        }

        let cells: Vec<String> = names
            .iter()
            .zip(&filled)
            .map(|(name, filled)| {
                format!(
                    "{:>width$}",
                    u8::from(*filled),
                    width = name.chars().count()
                )
            })
            .collect();
        writeln!(writer, "{}", cells.join(" "))?;
    }

    Ok(())
}

//! Toroidal sparse 0/1 matrix stored as a flat arena of nodes.
//!
//! Column headers and entries share one `Vec<Node>` and refer to each other by
//! index. Index `0` is the root header, whose horizontal ring holds the primary
//! columns that are still open. Secondary column headers are self-looped
//! horizontally and only ever take part in vertical rings.
//!
//! ```text
//!  :> Root <> A <> B <> C <:        (root ring, primary headers only)
//!             ||   ||   ||
//!        :>   a1 <>     c1  <:      (row 0)
//!             ||   ||   ||
//!        :>        b2 <> c2 <:      (row 1)
//!             ..   ..   ..
//! ```

/// Position of a node inside the arena.
pub(crate) type Index = usize;

/// Sentinel standing in for "no column" or "no row".
pub(crate) const NIL: Index = usize::MAX;

/// Arena position of the root header.
pub(crate) const ROOT: Index = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub left: Index,
    pub right: Index,
    pub up: Index,
    pub down: Index,
    /// Column header index, `NIL` for the root.
    pub column: usize,
    /// Row index for entries, `NIL` for headers.
    pub row: usize,
}

impl Node {
    fn self_looped(index: Index, column: usize, row: usize) -> Self {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            column,
            row,
        }
    }

    #[inline]
    fn step(&self, direction: Direction) -> Index {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub name: String,
    /// Arena position of the header node.
    pub node: Index,
    /// Number of entries currently linked into the vertical ring.
    pub size: usize,
    pub mandatory: bool,
    /// Last row that received an entry in this column.
    last_row: usize,
}

/// Walks one ring from `start` without holding a borrow of the matrix, so the
/// ring can be mutated between steps. `start` itself is never yielded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    start: Index,
    current: Index,
    direction: Direction,
}

impl Cursor {
    pub fn new(start: Index, direction: Direction) -> Self {
        Cursor {
            start,
            current: start,
            direction,
        }
    }

    pub fn next(&mut self, matrix: &Matrix) -> Option<Index> {
        let next = matrix.nodes[self.current].step(self.direction);

        if next == self.start {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }
}

/// Borrowing counterpart of [`Cursor`] for read-only walks.
pub(crate) struct Ring<'m> {
    matrix: &'m Matrix,
    cursor: Cursor,
}

impl Iterator for Ring<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next(self.matrix)
    }
}

/// Outcome of placing an entry in the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Placed,
    /// The current row already has an entry in this column.
    AlreadyPresent { row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matrix {
    nodes: Vec<Node>,
    headers: Vec<Header>,
    /// First entry of each stored row, in creation order.
    rows: Vec<Index>,
    /// First entry of the row currently being built.
    current_row: Option<Index>,
    /// Number of individual unlinks performed by `cover`.
    removals: u64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    pub fn new() -> Self {
        Matrix {
            nodes: vec![Node::self_looped(ROOT, NIL, NIL)],
            headers: Vec::new(),
            rows: Vec::new(),
            current_row: None,
            removals: 0,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn removals(&self) -> u64 {
        self.removals
    }

    pub fn reset_removals(&mut self) {
        self.removals = 0;
    }

    pub fn header(&self, column: usize) -> &Header {
        &self.headers[column]
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn node(&self, index: Index) -> &Node {
        &self.nodes[index]
    }

    pub fn ring(&self, start: Index, direction: Direction) -> Ring<'_> {
        Ring {
            matrix: self,
            cursor: Cursor::new(start, direction),
        }
    }

    /// Header indices of the primary columns that are still open, in ring
    /// order.
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.ring(ROOT, Direction::Right)
            .map(move |node| self.nodes[node].column)
    }

    /// Column indices of the row containing `entry`, walking right starting at
    /// `entry` itself.
    pub fn row_columns(&self, entry: Index) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(entry)
            .chain(self.ring(entry, Direction::Right))
            .map(move |node| self.nodes[node].column)
    }

    /// Column indices of stored row `row`, in ring order from its first entry.
    pub fn stored_row_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.row_columns(self.rows[row])
    }

    pub fn is_row_enabled(&self, row: usize) -> bool {
        let first = self.rows[row];

        self.nodes[first].up != first
    }
}

// Splicing helpers used while the matrix is built.
macro_rules! splice_direction {
    ($name:ident, $direction:ident, $opposite:ident) => {
        /// Insert `node` next to `anchor` in the named direction.
        fn $name(&mut self, anchor: Index, node: Index) {
            let neighbor = self.nodes[anchor].$direction;

            self.nodes[node].$direction = neighbor;
            self.nodes[node].$opposite = anchor;
            self.nodes[neighbor].$opposite = node;
            self.nodes[anchor].$direction = node;
        }
    };
}

impl Matrix {
    splice_direction!(splice_left, left, right);

    splice_direction!(splice_below, down, up);

    /// Create a column header and return its column index.
    ///
    /// Mandatory columns are inserted immediately to the left of the root, so
    /// the root ring lists them in creation order.
    pub fn add_column(&mut self, name: &str, mandatory: bool) -> usize {
        let column = self.headers.len();
        let node = self.nodes.len();

        self.nodes.push(Node::self_looped(node, column, NIL));
        if mandatory {
            self.splice_left(ROOT, node);
        }

        self.headers.push(Header {
            name: name.to_owned(),
            node,
            size: 0,
            mandatory,
            last_row: NIL,
        });

        column
    }

    pub fn new_row(&mut self) {
        self.current_row = None;
    }

    /// Add an entry for the current row in `column`.
    ///
    /// The first entry of a row starts a new self-looped row ring and stores the
    /// row; later entries are spliced to the left of the row's first entry.
    /// Vertically the entry always lands directly below the column header.
    pub fn set_column(&mut self, column: usize) -> Placement {
        debug_assert!(column < self.headers.len(), "invalid column {}", column);

        let row = match self.current_row {
            Some(_) => self.rows.len() - 1,
            None => self.rows.len(),
        };
        if self.headers[column].last_row == row {
            return Placement::AlreadyPresent { row };
        }

        let entry = self.nodes.len();
        self.nodes.push(Node::self_looped(entry, column, row));

        match self.current_row {
            Some(first) => self.splice_left(first, entry),
            None => {
                self.rows.push(entry);
                self.current_row = Some(entry);
            }
        }

        let header = &mut self.headers[column];
        header.size += 1;
        header.last_row = row;
        let head = header.node;
        self.splice_below(head, entry);

        Placement::Placed
    }

    /// Remove every entry of `row` from its column. Returns `false` when the
    /// row was already disabled.
    ///
    /// The row ring itself is left intact and each removed entry is self-looped
    /// vertically, which is how a disabled row is recognised.
    pub fn disable_row(&mut self, row: usize) -> bool {
        if !self.is_row_enabled(row) {
            return false;
        }

        let first = self.rows[row];
        let mut entry = first;
        loop {
            let Node { up, down, column, .. } = self.nodes[entry];
            self.nodes[up].down = down;
            self.nodes[down].up = up;
            self.headers[column].size -= 1;

            self.nodes[entry].up = entry;
            self.nodes[entry].down = entry;

            entry = self.nodes[entry].right;
            if entry == first {
                return true;
            }
        }
    }

    /// Relink every entry of a disabled `row` directly below its column
    /// header. Returns `false` when the row was already enabled.
    pub fn enable_row(&mut self, row: usize) -> bool {
        if self.is_row_enabled(row) {
            return false;
        }

        let first = self.rows[row];
        let mut entry = first;
        loop {
            let column = self.nodes[entry].column;
            let head = self.headers[column].node;
            self.splice_below(head, entry);
            self.headers[column].size += 1;

            entry = self.nodes[entry].right;
            if entry == first {
                return true;
            }
        }
    }
}

// NOTE: unlinking never touches the links of the removed node itself, which is
// what lets the matching relink put it back in exactly the same place.
impl Matrix {
    fn unlink_horizontal(&mut self, index: Index) {
        let Node { left, right, .. } = self.nodes[index];
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.removals += 1;
    }

    fn relink_horizontal(&mut self, index: Index) {
        let Node { left, right, .. } = self.nodes[index];
        self.nodes[left].right = index;
        self.nodes[right].left = index;
    }

    fn unlink_vertical(&mut self, index: Index) {
        let Node {
            up, down, column, ..
        } = self.nodes[index];
        self.nodes[up].down = down;
        self.nodes[down].up = up;
        self.headers[column].size -= 1;
        self.removals += 1;
    }

    fn relink_vertical(&mut self, index: Index) {
        let Node {
            up, down, column, ..
        } = self.nodes[index];
        self.nodes[up].down = index;
        self.nodes[down].up = index;
        self.headers[column].size += 1;
    }

    /// Cover entire column, and any rows that appear in this column.
    pub fn cover(&mut self, column: usize) {
        let head = self.headers[column].node;
        self.unlink_horizontal(head);

        let mut rows = Cursor::new(head, Direction::Down);
        while let Some(entry) = rows.next(self) {
            let mut siblings = Cursor::new(entry, Direction::Right);
            while let Some(sibling) = siblings.next(self) {
                self.unlink_vertical(sibling);
            }
        }
    }

    /// Uncover entire column, and any rows that appear in this column.
    ///
    /// Walks in exactly the opposite order of [`Matrix::cover`].
    pub fn uncover(&mut self, column: usize) {
        let head = self.headers[column].node;

        let mut rows = Cursor::new(head, Direction::Up);
        while let Some(entry) = rows.next(self) {
            let mut siblings = Cursor::new(entry, Direction::Left);
            while let Some(sibling) = siblings.next(self) {
                self.relink_vertical(sibling);
            }
        }

        self.relink_horizontal(head);
    }

    /// Commit to the row containing `entry` by covering the columns of every
    /// other entry in that row, left to right.
    pub fn cover_row(&mut self, entry: Index) {
        let mut siblings = Cursor::new(entry, Direction::Right);
        while let Some(sibling) = siblings.next(self) {
            let column = self.nodes[sibling].column;
            self.cover(column);
        }
    }

    /// Undo [`Matrix::cover_row`], visiting the row right to left.
    pub fn uncover_row(&mut self, entry: Index) {
        let mut siblings = Cursor::new(entry, Direction::Left);
        while let Some(sibling) = siblings.next(self) {
            let column = self.nodes[sibling].column;
            self.uncover(column);
        }
    }

    /// Select the open column to branch on, or `None` when every primary
    /// column is covered.
    ///
    /// With `use_heuristic` the column with the strictly smallest size wins,
    /// so ties go to the leftmost column in the root ring. Otherwise the first
    /// open column is taken.
    pub fn choose(&self, use_heuristic: bool) -> Option<usize> {
        let mut open = self.open_columns();
        let first = open.next()?;

        if !use_heuristic {
            return Some(first);
        }

        let mut best = first;
        for column in open {
            if self.headers[column].size < self.headers[best].size {
                best = column;
            }
        }

        Some(best)
    }

    /// Entries currently linked below `column`, top to bottom.
    #[cfg(test)]
    pub fn column_entries(&self, column: usize) -> Ring<'_> {
        self.ring(self.headers[column].node, Direction::Down)
    }
}

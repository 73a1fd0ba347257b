use crate::database::range::Range;
use crate::spreadsheet::cell::Cell;

/// Cells read from one worksheet, restricted to a range.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// Non-empty cells in row-major order
    pub(crate) cells: Vec<Cell>,
    /// Expected data range (user-specified)
    range: Range,
    /// Whether rows without any cell are left out of the grid
    skip_empty_rows: bool,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str, range: Range, skip_empty_rows: bool) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            range,
            skip_empty_rows,
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks if a row is before the lower bound of the specified range.
    pub(crate) fn before_row_lower_bound(&self, row: usize) -> bool {
        self.range.row_lower_bound
            .map(|row_lower_bound| row < row_lower_bound)
            .unwrap_or(false)
    }

    /// Checks if a row is after the upper bound of the specified range.
    pub(crate) fn after_row_upper_bound(&self, row: usize) -> bool {
        self.range.row_upper_bound
            .map(|row_upper_bound| row_upper_bound < row)
            .unwrap_or(false)
    }

    /// Checks if a column is before the lower bound of the specified range.
    pub(crate) fn before_col_lower_bound(&self, col: usize) -> bool {
        self.range.col_lower_bound
            .map(|col_lower_bound| col < col_lower_bound)
            .unwrap_or(false)
    }

    /// Checks if a column is after the upper bound of the specified range.
    pub(crate) fn after_col_upper_bound(&self, col: usize) -> bool {
        self.range.col_upper_bound
            .map(|col_upper_bound| col_upper_bound < col)
            .unwrap_or(false)
    }

    /// Checks if a cell at (row, col) is within the specified range.
    pub(crate) fn contains(&self, row: usize, col: usize) -> bool {
        !self.before_row_lower_bound(row)
            && !self.after_row_upper_bound(row)
            && !self.before_col_lower_bound(col)
            && !self.after_col_upper_bound(col)
    }

    /// Adds a cell and widens the actual data range.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Orders cells row-major once all cells are read.
    pub(crate) fn finish(&mut self) {
        self.cells.sort_by_key(|cell| (cell.row, cell.col));
    }

    /// First and last column of the grid. Columns start at the range lower bound,
    /// or at column `A` when none is given.
    pub(crate) fn col_bounds(&self) -> Option<(usize, usize)> {
        let col_lower = self.range.col_lower_bound.unwrap_or(0);
        let col_upper = self.range.col_upper_bound.or(self.col_upper_bound)?;
        Some((col_lower, col_upper)).filter(|(lower, upper)| lower <= upper)
    }

    /// Lays the cells out as a grid, one record per row and one slot per column
    /// in `col_bounds`. Rows between the range start and the last cell are
    /// included as all-`None` records unless empty rows are skipped.
    pub(crate) fn rows(&self) -> Vec<Vec<Option<&Cell>>> {
        let Some((col_lower, col_upper)) = self.col_bounds() else {
            return Vec::new();
        };
        let Some(row_upper) = self.row_upper_bound else {
            return Vec::new();
        };
        let width = col_upper - col_lower + 1;
        let mut table = Vec::<Vec<Option<&Cell>>>::new();
        let mut current_row = if self.skip_empty_rows {
            None
        } else {
            Some(self.range.row_lower_bound.unwrap_or(0))
        };
        let mut index = 0usize;
        while index < self.cells.len() || current_row.map(|row| row <= row_upper).unwrap_or(false) {
            let row = match (current_row, self.cells.get(index)) {
                (Some(row), _) => row,
                (None, Some(cell)) => cell.row,
                (None, None) => break,
            };
            while self.cells.get(index).map(|cell| cell.row < row).unwrap_or(false) {
                index += 1;
            }
            let mut record = vec![None; width];
            while let Some(cell) = self.cells.get(index).filter(|cell| cell.row == row) {
                if col_lower <= cell.col && cell.col <= col_upper {
                    record[cell.col - col_lower] = Some(cell);
                }
                index += 1;
            }
            table.push(record);
            current_row = if self.skip_empty_rows { None } else { Some(row + 1) };
        }
        table
    }
}

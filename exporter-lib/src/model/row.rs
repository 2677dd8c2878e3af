/// One parsed tabular record: cell values addressed by zero-based column position.
///
/// Absent and empty cells are indistinguishable to consumers; both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Row { cells }
    }

    /// Number of physical cells in the record, including empty ones
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at `position`, or `None` when the cell is missing or empty
    pub fn cell(&self, position: usize) -> Option<&str> {
        self.cells
            .get(position)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Non-empty cells with their positions, in column order
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_empty())
            .map(|(position, value)| (position, value.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}

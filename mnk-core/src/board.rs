mod growth;
mod index_parser;
mod lines;

pub use growth::{GrowthError, Margins, Padding, Side};

use index_parser::IndexParser;
use std::fmt::Display;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn is_empty(self) -> bool {
        matches!(self, Mark::Empty)
    }

    /// Name used in logs and on the console.
    pub fn name(self) -> &'static str {
        match self {
            Mark::Empty => "NO",
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NO" => Some(Mark::Empty),
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// The other player's mark. `Empty` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Empty => Mark::Empty,
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Mark>,
}

impl Board {
    pub fn new(height: usize, width: usize) -> Self {
        debug_assert!(height >= 1 && width >= 1);
        let cells = vec![Mark::Empty; height * width];
        Self {
            height,
            width,
            cells,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cells(&self) -> &[Mark] {
        &self.cells
    }

    pub fn contains(&self, action: Action) -> bool {
        action.row < self.height && action.col < self.width
    }

    pub fn get(&self, action: Action) -> Option<Mark> {
        if !self.contains(action) {
            return None;
        }

        Some(self.cells[action.row * self.width + action.col])
    }

    /// Signed lookup for scanners walking off the board edge.
    pub fn get_signed(&self, row: isize, col: isize) -> Option<Mark> {
        if row < 0 || col < 0 {
            return None;
        }

        self.get(Action::new(row as usize, col as usize))
    }

    pub fn set(&mut self, action: Action, mark: Mark) {
        let index = action.row * self.width + action.col;
        self.cells[index] = mark;
    }

    /// Copy of this board with `mark` placed at `action`.
    pub fn with_mark(&self, action: Action, mark: Mark) -> Board {
        let mut board = self.clone();
        board.set(action, mark);
        board
    }

    /// Empty cells in row-major order.
    pub fn legal_moves(&self) -> Vec<Action> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, mark)| mark.is_empty())
            .map(|(index, _)| self.action_at(index))
            .collect()
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> Vec<(Action, Mark)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, mark)| !mark.is_empty())
            .map(|(index, mark)| (self.action_at(index), *mark))
            .collect()
    }

    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(|mark| mark.is_empty())
    }

    fn action_at(&self, index: usize) -> Action {
        Action::new(index / self.width, index % self.width)
    }

    /// Parses a human-entered coordinate into an action.
    ///
    /// Accepted forms:
    /// - a1, A 10 (column letters, 1-based row)
    /// - 3c, 15 O (1-based row, column letters)
    /// - 3,15 or 3 15 (1-based row, 1-based column)
    /// - 17 (1-based row-major cell number)
    pub fn parse_index(&self, index: &str) -> Option<Action> {
        IndexParser::new(self.height, self.width, index).parse()
    }

    /// Converts an action to a position string in the `{column}{row}` format
    /// used by the console, e.g. (0, 0) -> A1, (2, 27) -> BB3.
    pub fn index_to_position(&self, action: Action) -> Option<String> {
        if !self.contains(action) {
            return None;
        }

        Some(format!("{}{}", column_label(action.col), action.row + 1))
    }
}

/// Base-26 column label with `A` as the zero digit, matching the parser.
pub fn column_label(column: usize) -> String {
    let mut x = column;
    let mut alpha = Vec::new();

    loop {
        alpha.push((b'A' + (x % 26) as u8) as char);
        x /= 26;

        if x == 0 {
            break;
        }
    }

    alpha.iter().rev().collect()
}

impl Display for Board {
    /// Renders the board with column letters and 1-based row numbers:
    ///
    /// ```text
    ///     A B C
    ///   1 . . .
    ///   2 . X .
    ///   3 . . O
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell_width = column_label(self.width - 1).len();
        let row_width = (self.height).to_string().len();

        write!(f, "{:row_width$} ", "")?;
        for x in 0..self.width {
            write!(f, " {:>cell_width$}", column_label(x))?;
        }
        writeln!(f)?;

        for y in 0..self.height {
            write!(f, "{:>row_width$} ", y + 1)?;

            for x in 0..self.width {
                let mark = self.cells[y * self.width + x];
                write!(f, " {:>cell_width$}", mark.symbol())?;
            }

            if y + 1 < self.height {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

use super::Action;
use std::{iter::Peekable, str::Chars};

#[derive(Debug, Clone)]
pub struct IndexParser<'a> {
    height: usize,
    width: usize,
    chars: Peekable<Chars<'a>>,
}

impl<'a> IndexParser<'a> {
    pub fn new(height: usize, width: usize, index: &'a str) -> Self {
        Self {
            height,
            width,
            chars: index.chars().peekable(),
        }
    }

    pub fn parse(&mut self) -> Option<Action> {
        self.skip_separators();

        if let Some(alpha) = self.read_alpha() {
            return self.parse_pattern_alpha_number(alpha);
        }

        if let Some(number) = self.read_number() {
            self.skip_separators();

            if let Some(alpha) = self.read_alpha() {
                return self.parse_pattern_number_alpha(number, alpha);
            }

            if let Some(second_number) = self.read_number() {
                return self.parse_pattern_number_number(number, second_number);
            }

            if self.is_end() {
                return self.parse_pattern_number(number);
            }
        }

        None
    }

    fn parse_pattern_alpha_number(&mut self, alpha: String) -> Option<Action> {
        self.skip_separators();

        let number = self.read_number()?;

        self.skip_separators();

        if !self.is_end() {
            return None;
        }

        self.checked(one_based(&number)?, alpha_to_index(&alpha)?)
    }

    fn parse_pattern_number_alpha(&mut self, number: String, alpha: String) -> Option<Action> {
        self.skip_separators();

        if !self.is_end() {
            return None;
        }

        self.checked(one_based(&number)?, alpha_to_index(&alpha)?)
    }

    fn parse_pattern_number_number(&mut self, row: String, column: String) -> Option<Action> {
        self.skip_separators();

        if !self.is_end() {
            return None;
        }

        self.checked(one_based(&row)?, one_based(&column)?)
    }

    fn parse_pattern_number(&mut self, number: String) -> Option<Action> {
        let index = one_based(&number)?;
        self.checked(index / self.width, index % self.width)
    }

    fn checked(&self, row: usize, col: usize) -> Option<Action> {
        if row < self.height && col < self.width {
            return Some(Action::new(row, col));
        }

        None
    }

    fn is_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Reads a string of alphabetic characters, lowercased.
    fn read_alpha(&mut self) -> Option<String> {
        let mut alpha = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphabetic() {
                alpha.push(c.to_ascii_lowercase());
                self.chars.next();
            } else {
                break;
            }
        }

        if !alpha.is_empty() {
            Some(alpha)
        } else {
            None
        }
    }

    fn read_number(&mut self) -> Option<String> {
        let mut number = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                number.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if !number.is_empty() {
            Some(number)
        } else {
            None
        }
    }

    /// Skips whitespace and commas.
    fn skip_separators(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == ',' {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}

fn alpha_to_index(lowercased_alpha: &str) -> Option<usize> {
    let mut index: usize = 0;

    for c in lowercased_alpha.chars() {
        let c_index = c as usize - b'a' as usize;
        index = index.checked_mul(26)?.checked_add(c_index)?;
    }

    Some(index)
}

/// Parses a 1-based number into a 0-based index.
fn one_based(number: &str) -> Option<usize> {
    number.parse::<usize>().ok()?.checked_sub(1)
}

//! A bidirectionally infinite tape.
//!
//! Cells are addressed by a signed offset from the left edge of the initial content.
//! Non-negative cells live in `pos`, negative cells in `neg` (`neg[0]` is cell `-1`,
//! `neg[1]` is cell `-2`, ...). Both buffers only grow, so extension in either
//! direction is amortized O(1). Cells outside the materialized range are blank.

use crate::types::{Direction, BLANK_SYMBOL};

/// One track of a Turing machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    pos: Vec<char>,
    neg: Vec<char>,
    head: isize,
}

impl Tape {
    /// Creates a tape seeded with `content` and the head on cell 0.
    ///
    /// Empty content is seeded as a single blank cell.
    pub fn new(content: &str) -> Self {
        let mut pos: Vec<char> = content.chars().collect();
        if pos.is_empty() {
            pos.push(BLANK_SYMBOL);
        }

        Self {
            pos,
            neg: Vec::new(),
            head: 0,
        }
    }

    /// Creates a tape holding a single blank cell.
    pub fn blank() -> Self {
        Self::new("")
    }

    /// Current head position.
    pub fn head(&self) -> isize {
        self.head
    }

    /// Leftmost materialized index.
    pub fn left(&self) -> isize {
        -(self.neg.len() as isize)
    }

    /// Rightmost materialized index.
    pub fn right(&self) -> isize {
        self.pos.len() as isize - 1
    }

    /// Returns the symbol at `index`, blank if the cell was never materialized.
    pub fn get(&self, index: isize) -> char {
        let cell = if index < 0 {
            self.neg.get((-1 - index) as usize)
        } else {
            self.pos.get(index as usize)
        };

        cell.copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.get(self.head)
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        let head = self.head;
        *self.cell_mut(head) = symbol;
    }

    /// Moves the head, materializing one blank cell when it walks past an edge.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                self.head -= 1;
                if self.head < self.left() {
                    self.neg.push(BLANK_SYMBOL);
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head > self.right() {
                    self.pos.push(BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Bounds of the region worth displaying.
    ///
    /// Starting from the materialized edges, each bound walks toward the head and stops at
    /// the first non-blank cell. If only blanks lie between an edge and the head, that
    /// bound collapses onto the head.
    pub fn printable_range(&self) -> (isize, isize) {
        let mut left = self.left();
        while left < self.head && self.get(left) == BLANK_SYMBOL {
            left += 1;
        }

        let mut right = self.right();
        while right > self.head && self.get(right) == BLANK_SYMBOL {
            right -= 1;
        }

        (left, right)
    }

    /// The visible output of the tape: the printable range with surrounding blanks removed.
    pub fn trimmed_content(&self) -> String {
        let (mut left, mut right) = self.printable_range();

        while left <= right && self.get(left) == BLANK_SYMBOL {
            left += 1;
        }
        while left <= right && self.get(right) == BLANK_SYMBOL {
            right -= 1;
        }

        (left..=right).map(|i| self.get(i)).collect()
    }

    /// All materialized cells from left to right.
    pub fn cells(&self) -> impl Iterator<Item = (isize, char)> + '_ {
        (self.left()..=self.right()).map(move |i| (i, self.get(i)))
    }

    fn cell_mut(&mut self, index: isize) -> &mut char {
        if index < 0 {
            &mut self.neg[(-1 - index) as usize]
        } else {
            &mut self.pos[index as usize]
        }
    }
}

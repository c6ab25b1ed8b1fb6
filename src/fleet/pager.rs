//! Offset/limit paging state for one fleet screen.

use crate::error::PageError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pager {
    offset: usize,
    limit: usize,
    max_offset: usize,
}

impl Pager {
    pub fn new(limit: usize, max_offset: usize) -> Self {
        Self {
            offset: 0,
            limit,
            max_offset,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    /// Highest row number `jump_to_row` accepts; its page starts at
    /// `max_offset`.
    pub fn max_row(&self) -> usize {
        self.max_offset + 1
    }

    pub fn next(&mut self) -> Result<usize, PageError> {
        if self.offset + self.limit > self.max_offset {
            return Err(PageError::AtLastPage);
        }
        self.offset += self.limit;
        Ok(self.offset)
    }

    pub fn previous(&mut self) -> Result<usize, PageError> {
        if self.offset < self.limit {
            return Err(PageError::AtFirstPage);
        }
        self.offset -= self.limit;
        Ok(self.offset)
    }

    pub fn last(&mut self) -> Result<usize, PageError> {
        if self.offset == self.max_offset {
            return Err(PageError::AlreadyAtLast);
        }
        self.offset = self.max_offset;
        Ok(self.offset)
    }

    /// Start the page at 1-based `row`.
    pub fn jump_to_row(&mut self, row: usize) -> Result<usize, PageError> {
        if row == 0 || row > self.max_row() {
            return Err(PageError::RowOutOfRange {
                row,
                max: self.max_row(),
            });
        }
        self.offset = row - 1;
        Ok(self.offset)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Modal paging over a fixed, ordered catalog of entity names. The cursor is
/// independent of how the modal was opened; prev/next move by one and clamp
/// at the catalog bounds (no wraparound).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Closed,
    Showing(usize),
}

#[derive(Debug)]
pub struct NavCursor {
    catalog: &'static [&'static str],
    cursor: Cursor,
}

impl NavCursor {
    pub fn new(catalog: &'static [&'static str]) -> Self {
        Self {
            catalog,
            cursor: Cursor::Closed,
        }
    }

    /// Opens on the named entity, falling back to the first catalog entry
    /// when the name is unknown. Returns the resulting index.
    pub fn open(&mut self, name: &str) -> usize {
        let index = self.catalog.iter().position(|&n| n == name).unwrap_or(0);
        self.cursor = Cursor::Showing(index);
        index
    }

    /// Step forward. No-op at the last entry (and when closed).
    pub fn next(&mut self) -> Option<usize> {
        match self.cursor {
            Cursor::Showing(i) if i + 1 < self.catalog.len() => {
                self.cursor = Cursor::Showing(i + 1);
                Some(i + 1)
            }
            _ => None,
        }
    }

    /// Step back. No-op at the first entry (and when closed).
    pub fn prev(&mut self) -> Option<usize> {
        match self.cursor {
            Cursor::Showing(i) if i > 0 => {
                self.cursor = Cursor::Showing(i - 1);
                Some(i - 1)
            }
            _ => None,
        }
    }

    pub fn close(&mut self) {
        self.cursor = Cursor::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.cursor, Cursor::Showing(_))
    }

    pub fn index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::Showing(i) => Some(i),
            Cursor::Closed => None,
        }
    }

    pub fn current(&self) -> Option<&'static str> {
        self.index().map(|i| self.catalog[i])
    }

    /// Left control enabled-state: disabled exactly on the first entry.
    pub fn can_prev(&self) -> bool {
        matches!(self.cursor, Cursor::Showing(i) if i > 0)
    }

    /// Right control enabled-state: disabled exactly on the last entry.
    pub fn can_next(&self) -> bool {
        matches!(self.cursor, Cursor::Showing(i) if i + 1 < self.catalog.len())
    }
}

/// A sliding window over a list that moves one item at a time.
///
/// The start index is always clamped so the window never runs past the end
/// of the list. Callers pass the current list length on every move, so a
/// list that shrinks underneath the carousel is handled on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    window: usize,
}

impl Carousel {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            index: 0,
            window: window.max(1),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of distinct start positions: `max(0, len - window + 1)`.
    #[must_use]
    pub fn positions(&self, len: usize) -> usize {
        (len + 1).saturating_sub(self.window)
    }

    /// Highest valid start index for a list of `len` items.
    #[must_use]
    pub fn max_index(&self, len: usize) -> usize {
        self.positions(len).saturating_sub(1)
    }

    pub fn next(&mut self, len: usize) {
        self.index = (self.index + 1).min(self.max_index(len));
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn jump(&mut self, index: usize, len: usize) {
        self.index = index.min(self.max_index(len));
    }

    /// Changes the window size, re-clamping the current position.
    pub fn resize(&mut self, window: usize, len: usize) {
        self.window = window.max(1);
        self.index = self.index.min(self.max_index(len));
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// The visible slice of `items`.
    #[must_use]
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.index.min(items.len());
        let end = (start + self.window).min(items.len());
        &items[start..end]
    }
}

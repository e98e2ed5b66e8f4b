use std::iter::FusedIterator;
use std::ops::Range;

/// Half-open range of rows or columns owned by a single worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkChunk {
    pub start: usize,
    pub end: usize,
}

impl WorkChunk {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Divide `[0, dimension)` into `num_threads` ordered, disjoint chunks.
///
/// Every chunk but the last gets `dimension / num_threads` indices and the
/// last one runs to `dimension`. When there are more threads than indices
/// the step is zero, so all chunks but the last are empty.
///
/// The chunks are computed lazily, so a huge `num_threads` costs nothing
/// until iterated; use [`Partition::non_empty`] to get only the chunks that
/// need a worker.
///
/// # Panics
///
/// If `num_threads` is zero. The engine rejects that before calling.
pub fn partition(dimension: usize, num_threads: usize) -> Partition {
    assert!(num_threads > 0, "partition needs at least one thread");
    Partition {
        dimension,
        threads: num_threads,
        step: dimension / num_threads,
        next: 0,
    }
}

/// Iterator over the chunks of one pass, in order.
#[derive(Clone, Debug)]
pub struct Partition {
    dimension: usize,
    threads: usize,
    step: usize,
    next: usize,
}

impl Partition {
    fn chunk(&self, i: usize) -> WorkChunk {
        let start = i * self.step;
        let end = if i == self.threads - 1 {
            self.dimension
        } else {
            start + self.step
        };
        WorkChunk::new(start, end)
    }

    /// The remaining chunks that are not empty.
    ///
    /// At most `min(num_threads, dimension)` chunks are produced: with a zero
    /// step only the last chunk can hold anything, so the empty ones before
    /// it are skipped without being visited.
    pub fn non_empty(mut self) -> impl Iterator<Item = WorkChunk> {
        if self.step == 0 {
            self.next = self.next.max(self.threads - 1);
        }
        self.filter(|chunk| !chunk.is_empty())
    }
}

impl Iterator for Partition {
    type Item = WorkChunk;

    fn next(&mut self) -> Option<WorkChunk> {
        if self.next >= self.threads {
            return None;
        }
        let chunk = self.chunk(self.next);
        self.next += 1;
        Some(chunk)
    }

    fn nth(&mut self, n: usize) -> Option<WorkChunk> {
        self.next = self.next.saturating_add(n).min(self.threads);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.threads - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Partition {}

impl FusedIterator for Partition {}

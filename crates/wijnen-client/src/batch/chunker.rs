//! Lazy splitting of a variation list into bounded chunks.

use std::num::NonZeroUsize;

/// Iterator over consecutive chunks of at most `size` items.
///
/// Created by [`chunk`]. Items are moved out of the source vector as chunks
/// are produced; the iterator is single-pass.
#[derive(Debug)]
pub struct Chunks<T> {
    items: std::vec::IntoIter<T>,
    size: NonZeroUsize,
}

/// Splits `items` into chunks of `size`, preserving order.
///
/// Every chunk holds exactly `size` items except possibly the last one. An
/// empty input yields no chunks.
pub fn chunk<T>(items: Vec<T>, size: NonZeroUsize) -> Chunks<T> {
    Chunks {
        items: items.into_iter(),
        size,
    }
}

impl<T> Iterator for Chunks<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk: Vec<T> = self.items.by_ref().take(self.size.get()).collect();
        if chunk.is_empty() {
            None
        } else {
            Some(chunk)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().div_ceil(self.size.get());
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Chunks<T> {}

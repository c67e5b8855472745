//! Bounds helpers for moving through a queue.
//!
//! Navigation never wraps: stepping past either end yields `None` and the
//! caller treats that as a no-op.

pub(crate) fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    current.map(|i| i + 1).filter(|&next| next < len)
}

pub(crate) fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    current
        .filter(|&i| i < len)
        .and_then(|i| i.checked_sub(1))
}

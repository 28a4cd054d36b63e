//! Record stores.
//!
//! [`TaskStore`] and [`Catalog`] each own their records exclusively and
//! assume a single writer. A concurrent host wraps each store in its own
//! lock and holds a read lock across a whole conflict scan.
//!
//! # Id Assignment
//! New ids are `max(existing) + 1`, or `1` for an empty store. Each
//! store keeps an independent sequence.

mod catalog;
mod tasks;

pub use catalog::Catalog;
pub use tasks::TaskStore;

use crate::error::{Error, Result};
use crate::models::RecordId;

fn next_id(ids: impl Iterator<Item = RecordId>) -> Result<RecordId> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::invalid_input("record id space exhausted")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(std::iter::empty()).unwrap(), 1);
        assert_eq!(next_id([3, 1, 7].into_iter()).unwrap(), 8);
        assert!(next_id([RecordId::MAX].into_iter()).is_err());
    }
}

//! Set of record links already delivered by a watch loop.

use std::collections::{HashMap, VecDeque};

/// Maps each delivered link to the `create_time` it had when first seen.
///
/// Unbounded by default. With a capacity limit, the oldest inserted links are
/// evicted once the limit is exceeded, after which they may be delivered
/// again if the source still returns them.
#[derive(Debug, Default)]
pub struct SeenSet {
    entries: HashMap<String, String>,
    /// Insertion order, only tracked when bounded.
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl SeenSet {
    /// Create an empty, unbounded set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set holding at most `capacity` links (minimum 1).
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Capacity limit, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Whether `link` has been recorded.
    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.entries.contains_key(link)
    }

    /// First-seen `create_time` for `link`.
    #[must_use]
    pub fn get(&self, link: &str) -> Option<&str> {
        self.entries.get(link).map(String::as_str)
    }

    /// Record `link` if it is new.
    ///
    /// Returns `false` and leaves the stored `create_time` untouched when the
    /// link is already present.
    pub fn insert(&mut self, link: &str, create_time: &str) -> bool {
        if self.entries.contains_key(link) {
            return false;
        }
        self.entries
            .insert(link.to_string(), create_time.to_string());

        if let Some(capacity) = self.capacity {
            self.order.push_back(link.to_string());
            while self.entries.len() > capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                tracing::trace!(link = %oldest, capacity, "Evicted seen link");
            }
        }
        true
    }

    /// Number of recorded links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no link has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(link, create_time)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over per-index values with `O(log n)` point updates.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    tree: Vec<u64>, // 1-indexed
    total: u64,
}

impl Fenwick {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            tree: alloc::vec![0; n + 1],
            total: 0,
        }
    }

    pub(crate) fn from_values(values: &[u64]) -> Self {
        let n = values.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for i in 1..=n {
            let v = values[i - 1];
            total = total.saturating_add(v);
            tree[i] = tree[i].saturating_add(v);
            let j = i + lsb(i);
            if j <= n {
                tree[j] = tree[j].saturating_add(tree[i]);
            }
        }
        Self { tree, total }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.total = self.prefix_sum(new_len);
        self.tree.truncate(new_len + 1);
    }

    /// Appends `value` at the end.
    ///
    /// Runs in `O(log n)`: the new node is initialized from existing prefix sums.
    pub(crate) fn push_value(&mut self, value: u64) {
        let new_len = self.len().saturating_add(1);
        self.tree.push(0);
        self.total = self.total.saturating_add(value);

        // tree[i] stores the sum of the last lsb(i) values ending at i.
        let start_exclusive = new_len.saturating_sub(lsb(new_len));
        let before = self
            .prefix_sum(new_len.saturating_sub(1))
            .saturating_sub(self.prefix_sum(start_exclusive));
        self.tree[new_len] = before.saturating_add(value);
    }

    /// Grows (with zeros) or shrinks to `new_len`.
    pub(crate) fn resize(&mut self, new_len: usize) {
        if new_len < self.len() {
            self.truncate(new_len);
            return;
        }
        while self.len() < new_len {
            self.push_value(0);
        }
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n {
            return;
        }
        if delta > 0 {
            self.total = self.total.saturating_add(delta as u64);
        } else if delta < 0 {
            self.total = self.total.saturating_sub(delta.unsigned_abs());
        }
        let mut i = index + 1;
        while i <= n {
            let cur = self.tree[i] as i128;
            let next = cur + delta as i128;
            debug_assert!(
                next >= 0,
                "Fenwick underflow (idx={i}, cur={cur}, delta={delta})"
            );
            self.tree[i] = next.clamp(0, u64::MAX as i128) as u64;
            i += lsb(i);
        }
    }

    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    /// Sum over `[from, to)`.
    pub(crate) fn range_sum(&self, from: usize, to: usize) -> u64 {
        if to <= from {
            return 0;
        }
        self.prefix_sum(to).saturating_sub(self.prefix_sum(from))
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

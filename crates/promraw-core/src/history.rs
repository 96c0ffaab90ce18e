//! Snapshot-based undo/redo history.

use crate::surface::RasterSurface;
use std::sync::Arc;

/// Default maximum number of snapshots kept, including the base snapshot.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// An immutable full copy of a surface's pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pixels: Arc<[u8]>,
}

impl Snapshot {
    /// Copy the current pixels of `surface`.
    pub fn capture(surface: &RasterSurface) -> Self {
        Self {
            pixels: Arc::from(surface.pixels()),
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Memory held by this snapshot, in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Write this snapshot back onto `surface`.
    pub fn restore_into(&self, surface: &mut RasterSurface) -> bool {
        surface.restore(&self.pixels)
    }
}

/// Ordered snapshots plus a current index.
///
/// Index 0 is the base snapshot taken when the stack was created and is never
/// discarded. `0 <= index <= len - 1` holds after every operation.
///
/// With a `limit`, the oldest committed entry is evicted once `len` would
/// exceed it, so `depth() == N - M + 1` after N commits, M undos and one
/// more commit only holds while `N < limit`.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    snapshots: Vec<Snapshot>,
    index: usize,
    /// Maximum number of snapshots kept (including the base), or unbounded.
    limit: Option<usize>,
}

impl HistoryStack {
    /// Create a stack whose base entry is `base`.
    ///
    /// A `limit` below 2 leaves no room for a committed entry and is raised to 2.
    pub fn new(base: Snapshot, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![base],
            index: 0,
            limit: limit.map(|l| l.max(2)),
        }
    }

    /// Create an unbounded stack.
    pub fn unbounded(base: Snapshot) -> Self {
        Self::new(base, None)
    }

    /// Drop every entry after the current index, append `snapshot`, and make it current.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;

        if let Some(limit) = self.limit {
            while self.snapshots.len() > limit {
                // Keep the base; evict the oldest committed entry.
                self.snapshots.remove(1);
                self.index -= 1;
                log::info!("History limit {} reached, evicted oldest entry", limit);
            }
        }
    }

    /// Step back one entry and return the snapshot to restore, or `None` at the base.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one entry and return the snapshot to restore, or `None` at the tip.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of snapshots, including the base.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the base snapshot is never removed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of committed entries above the base.
    pub fn depth(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Total bytes held by all snapshots.
    pub fn memory_usage(&self) -> usize {
        self.snapshots.iter().map(Snapshot::byte_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgba;
    use kurbo::Point;

    fn surface_with_dot(x: f64) -> RasterSurface {
        let mut surface = RasterSurface::new(16, 16, Rgba::WHITE);
        surface.plot(Point::new(x, 0.0), Rgba::BLACK, 1.0);
        surface
    }

    fn base() -> Snapshot {
        Snapshot::capture(&RasterSurface::new(16, 16, Rgba::WHITE))
    }

    #[test]
    fn test_new_stack() {
        let history = HistoryStack::unbounded(base());
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert_eq!(history.depth(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.is_empty());
    }

    #[test]
    fn test_undo_redo_empty_stack() {
        let mut history = HistoryStack::unbounded(base());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut history = HistoryStack::unbounded(base());
        let first = Snapshot::capture(&surface_with_dot(1.0));
        history.commit(first.clone());
        assert_eq!(history.index(), 1);

        assert_eq!(history.undo(), Some(&base()));
        assert_eq!(history.index(), 0);
        assert_eq!(history.redo(), Some(&first));
        assert_eq!(history.index(), 1);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo_branch() {
        let n = 5;
        let m = 3;
        let mut history = HistoryStack::unbounded(base());
        for i in 0..n {
            history.commit(Snapshot::capture(&surface_with_dot(i as f64)));
        }
        for _ in 0..m {
            assert!(history.undo().is_some());
        }
        let index_before = history.index();
        let fresh = Snapshot::capture(&surface_with_dot(15.0));
        history.commit(fresh.clone());

        assert_eq!(history.len(), (index_before + 1) + 1);
        assert_eq!(history.depth(), n - m + 1);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current(), &fresh);
    }

    #[test]
    fn test_limit_keeps_base() {
        let mut history = HistoryStack::new(base(), Some(3));
        for i in 0..5 {
            history.commit(Snapshot::capture(&surface_with_dot(i as f64)));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current(), &Snapshot::capture(&surface_with_dot(4.0)));

        assert!(history.undo().is_some());
        assert_eq!(history.undo(), Some(&base()));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_default_limit_boundary() {
        let mut history = HistoryStack::new(base(), Some(DEFAULT_HISTORY_LIMIT));
        for i in 0..DEFAULT_HISTORY_LIMIT - 1 {
            history.commit(Snapshot::capture(&surface_with_dot((i % 16) as f64)));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.depth(), DEFAULT_HISTORY_LIMIT - 1);

        history.commit(Snapshot::capture(&surface_with_dot(0.0)));
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.index(), DEFAULT_HISTORY_LIMIT - 1);
        assert_eq!(history.snapshots[0], base());
    }

    #[test]
    fn test_limit_floor() {
        let history = HistoryStack::new(base(), Some(0));
        assert_eq!(history.limit(), Some(2));
    }

    #[test]
    fn test_restore_into_surface() {
        let mut surface = surface_with_dot(3.0);
        let snapshot = Snapshot::capture(&surface);
        surface.clear();
        assert!(snapshot.restore_into(&mut surface));
        assert_eq!(surface.pixel(3, 0), Some(Rgba::BLACK));
        assert_eq!(snapshot.byte_size(), 16 * 16 * 4);
    }

    #[test]
    fn test_memory_usage() {
        let mut history = HistoryStack::unbounded(base());
        history.commit(Snapshot::capture(&surface_with_dot(1.0)));
        assert_eq!(history.memory_usage(), 2 * 16 * 16 * 4);
    }
}

//! Bounding-rectangle tracking of pixels written since the last upload.

use glint_core::geometry::{Rect, Size};

/// Conservative union of every rectangle written since the last upload.
///
/// The region only grows until [`DirtyRegion::take`] hands it out and resets
/// it. It is always clipped to the surface bounds it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegion {
    bounds: Size<u32>,
    rect: Rect<u32>,
}

impl DirtyRegion {
    pub fn new(bounds: Size<u32>) -> Self {
        Self {
            bounds,
            rect: Rect::EMPTY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    /// Current dirty rectangle, [`Rect::EMPTY`] when clean.
    pub fn rect(&self) -> Rect<u32> {
        self.rect
    }

    /// Grow the region to include `rect`. Returns the clipped rectangle that was added.
    pub fn add(&mut self, rect: Rect<u32>) -> Rect<u32> {
        let clipped = rect.intersect(Rect::from_size(self.bounds));
        self.rect = self.rect.union(clipped);
        clipped
    }

    /// Mark the whole surface dirty.
    pub fn mark_all(&mut self) {
        self.rect = Rect::from_size(self.bounds);
    }

    /// Hand out the dirty rectangle and reset to clean. `None` when already clean.
    pub fn take(&mut self) -> Option<Rect<u32>> {
        if self.rect.is_empty() {
            return None;
        }
        Some(std::mem::replace(&mut self.rect, Rect::EMPTY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clean() {
        let mut dirty = DirtyRegion::new(Size::new(64, 16));
        assert!(dirty.is_empty());
        assert_eq!(dirty.take(), None);
    }

    #[test]
    fn test_grows_monotonically() {
        let mut dirty = DirtyRegion::new(Size::new(64, 16));
        let writes = [
            Rect::new(0, 0, 5, 5),
            Rect::new(30, 2, 4, 4),
            Rect::new(10, 10, 2, 2),
            Rect::new(1, 1, 1, 1),
        ];

        let mut previous = dirty.rect();
        for w in writes {
            dirty.add(w);
            assert!(dirty.rect().contains_rect(&previous));
            previous = dirty.rect();
        }
        for w in writes {
            assert!(dirty.rect().contains_rect(&w));
        }
    }

    #[test]
    fn test_clipped_to_bounds() {
        let mut dirty = DirtyRegion::new(Size::new(10, 10));
        let added = dirty.add(Rect::new(8, 8, 10, 10));
        assert_eq!(added, Rect::new(8, 8, 2, 2));
        assert_eq!(dirty.rect(), Rect::new(8, 8, 2, 2));

        assert!(dirty.add(Rect::new(20, 20, 5, 5)).is_empty());
        assert_eq!(dirty.rect(), Rect::new(8, 8, 2, 2));
    }

    #[test]
    fn test_take_resets() {
        let mut dirty = DirtyRegion::new(Size::new(8, 8));
        dirty.mark_all();
        assert_eq!(dirty.take(), Some(Rect::new(0, 0, 8, 8)));
        assert!(dirty.is_empty());
        assert_eq!(dirty.take(), None);
    }
}

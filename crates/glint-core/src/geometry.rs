/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl Size<u32> {
    /// Number of pixels covered, computed without overflow.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

impl<T> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<u32> {
    /// The empty rectangle at the origin.
    pub const EMPTY: Rect<u32> = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Rectangle covering a whole surface of `size`.
    pub fn from_size(size: Size<u32>) -> Self {
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width, self.height)
    }

    /// Smallest rectangle containing both. Empty operands are ignored.
    pub fn union(self, other: Rect<u32>) -> Rect<u32> {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect::new(x, y, (right - x as u64) as u32, (bottom - y as u64) as u32)
    }

    /// Overlap of both rectangles, [`Rect::EMPTY`] if they are disjoint.
    pub fn intersect(self, other: Rect<u32>) -> Rect<u32> {
        let x = self.x.max(other.x) as u64;
        let y = self.y.max(other.y) as u64;
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= x || bottom <= y {
            return Rect::EMPTY;
        }

        Rect::new(x as u32, y as u32, (right - x) as u32, (bottom - y) as u32)
    }

    /// Whether `other` lies entirely inside `self`. An empty `other` is always contained.
    pub fn contains_rect(&self, other: &Rect<u32>) -> bool {
        if other.is_empty() {
            return true;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && (x as u64) < self.right() && (y as u64) < self.bottom()
    }
}

impl Rect<f32> {
    /// Expand to whole pixels: the origin is floored and the far edge is ceiled,
    /// so the result always covers `self`.
    pub fn round_out(self) -> Rect<i32> {
        let x0 = self.x.floor();
        let y0 = self.y.floor();
        let x1 = (self.x + self.width.max(0.0)).ceil();
        let y1 = (self.y + self.height.max(0.0)).ceil();

        Rect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32)
    }
}

impl Rect<i32> {
    /// Clip to `[0, width) x [0, height)`.
    pub fn clamp_to(self, bounds: Size<u32>) -> Rect<u32> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width.max(0) as i64).min(bounds.width as i64);
        let y1 = (self.y as i64 + self.height.max(0) as i64).min(bounds.height as i64);

        if x1 <= x0 || y1 <= y0 {
            return Rect::EMPTY;
        }

        Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(2, 3, 4, 5);
        assert_eq!(a.union(Rect::EMPTY), a);
        assert_eq!(Rect::EMPTY.union(a), a);
        assert_eq!(Rect::new(10, 10, 0, 7).union(a), a);
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, 2, 3, 8);
        let u = a.union(b);
        assert_eq!(u, Rect::new(0, 0, 13, 10));
        assert!(u.contains_rect(&a));
        assert!(u.contains_rect(&b));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 0, 4, 4);
        assert!(a.intersect(b).is_empty());
        assert_eq!(
            Rect::new(0, 0, 8, 8).intersect(Rect::new(6, 6, 10, 10)),
            Rect::new(6, 6, 2, 2)
        );
    }

    #[test]
    fn test_round_out_never_shrinks() {
        let r = Rect::new(1.25f32, 2.75, 3.5, 0.5).round_out();
        assert_eq!(r, Rect::new(1, 2, 4, 2));

        let exact = Rect::new(2.0f32, 3.0, 4.0, 5.0).round_out();
        assert_eq!(exact, Rect::new(2, 3, 4, 5));
    }

    #[test]
    fn test_round_out_negative_origin() {
        let r = Rect::new(-0.5f32, -1.2, 2.0, 2.0).round_out();
        assert_eq!(r, Rect::new(-1, -2, 3, 3));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Size::new(64, 16);
        assert_eq!(
            Rect::new(-4, -4, 10, 10).clamp_to(bounds),
            Rect::new(0, 0, 6, 6)
        );
        assert_eq!(
            Rect::new(60, 10, 10, 10).clamp_to(bounds),
            Rect::new(60, 10, 4, 6)
        );
        assert!(Rect::new(70, 0, 5, 5).clamp_to(bounds).is_empty());
        assert!(Rect::new(-10, 0, 5, 5).clamp_to(bounds).is_empty());
    }

    #[test]
    fn test_contains_point_is_half_open() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains_point(1, 1));
        assert!(r.contains_point(2, 2));
        assert!(!r.contains_point(3, 2));
    }

    #[test]
    fn test_size_area() {
        assert_eq!(Size::new(64u32, 16).area(), 1024);
        assert!(Size::new(0u32, 16).is_empty());
    }
}

use crate::FixedT;

/// A partition or seg line: an origin and a direction
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DivLine {
    pub x: FixedT,
    pub y: FixedT,
    pub dx: FixedT,
    pub dy: FixedT,
}

impl DivLine {
    #[inline]
    pub const fn new(x: FixedT, y: FixedT, dx: FixedT, dy: FixedT) -> Self {
        Self { x, y, dx, dy }
    }

    /// Line from two end points
    #[inline]
    pub fn from_points(x1: FixedT, y1: FixedT, x2: FixedT, y2: FixedT) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// `R_PointOnSide`: 0 for the front (right) side, 1 for the back.
    ///
    /// Axis aligned lines and points whose quadrant decides the answer are
    /// resolved without a multiply. A zero length line puts everything on
    /// the front.
    pub fn point_on_side(&self, x: FixedT, y: FixedT) -> usize {
        if self.dx.raw() == 0 {
            if x <= self.x {
                return (self.dy.raw() > 0) as usize;
            }
            return (self.dy.raw() < 0) as usize;
        }
        if self.dy.raw() == 0 {
            if y <= self.y {
                return (self.dx.raw() < 0) as usize;
            }
            return (self.dx.raw() > 0) as usize;
        }

        let dx = x - self.x;
        let dy = y - self.y;

        // Sign bits decide it
        if (self.dy.raw() ^ self.dx.raw() ^ dx.raw() ^ dy.raw()) < 0 {
            if (self.dy.raw() ^ dx.raw()) < 0 {
                // left is negative
                return 1;
            }
            return 0;
        }

        let left = FixedT::from_raw(self.dy.to_int()) * dx;
        let right = dy * FixedT::from_raw(self.dx.to_int());
        if right < left {
            // front side
            return 0;
        }
        // back side
        1
    }
}

#[cfg(test)]
mod tests {
    use super::DivLine;
    use crate::FixedT;

    fn fx(v: i32) -> FixedT {
        FixedT::from_int(v)
    }

    #[test]
    fn vertical_line_sides() {
        // pointing north, right hand side is east
        let line = DivLine::new(fx(0), fx(0), fx(0), fx(64));
        assert_eq!(line.point_on_side(fx(10), fx(5)), 0);
        assert_eq!(line.point_on_side(fx(-10), fx(5)), 1);
        let south = DivLine::new(fx(0), fx(0), fx(0), fx(-64));
        assert_eq!(south.point_on_side(fx(10), fx(5)), 1);
    }

    #[test]
    fn horizontal_line_sides() {
        // pointing east, right hand side is south
        let line = DivLine::new(fx(0), fx(0), fx(64), fx(0));
        assert_eq!(line.point_on_side(fx(3), fx(-10)), 0);
        assert_eq!(line.point_on_side(fx(3), fx(10)), 1);
    }

    #[test]
    fn diagonal_line_sides() {
        let line = DivLine::from_points(fx(0), fx(0), fx(64), fx(64));
        assert_eq!(line.point_on_side(fx(40), fx(10)), 0);
        assert_eq!(line.point_on_side(fx(10), fx(40)), 1);
        assert_eq!(line.point_on_side(fx(-40), fx(-10)), 1);
        assert_eq!(line.point_on_side(fx(-10), fx(-40)), 0);
    }

    #[test]
    fn degenerate_line_does_not_panic() {
        let line = DivLine::new(fx(5), fx(5), FixedT::ZERO, FixedT::ZERO);
        assert_eq!(line.point_on_side(fx(6), fx(6)), 0);
        assert_eq!(line.point_on_side(fx(4), fx(4)), 0);
    }
}

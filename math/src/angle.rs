use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::trig::{
    ANGLETOFINESHIFT, DBITS, FINEANGLES, finecosine, finesine, slope_div, tantoangle,
};
use crate::{FixedT, bam_to_radian};

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

/// A binary angle: the full circle is the full range of a `u32`, so all
/// arithmetic wraps naturally.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(u32);

impl Angle {
    pub const ZERO: Self = Self(0);
    pub const A45: Self = Self(ANG45);
    pub const A90: Self = Self(ANG90);
    pub const A180: Self = Self(ANG180);
    pub const A270: Self = Self(ANG270);

    #[inline(always)]
    pub const fn new(bam: u32) -> Self {
        Self(bam)
    }

    #[inline]
    pub fn from_degrees(degrees: f32) -> Self {
        let turns = degrees.rem_euclid(360.0) / 360.0;
        Self((turns as f64 * 4_294_967_296.0) as u64 as u32)
    }

    #[inline(always)]
    pub const fn bam(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn rad(self) -> f32 {
        bam_to_radian(self.0)
    }

    /// Index in to the fine trig tables
    #[inline(always)]
    pub const fn fine_index(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    #[inline]
    pub fn sin(self) -> FixedT {
        finesine(self.fine_index())
    }

    #[inline]
    pub fn cos(self) -> FixedT {
        finecosine(self.fine_index())
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline(always)]
    fn add(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_add(other.0))
    }
}

impl Add<u32> for Angle {
    type Output = Angle;
    #[inline(always)]
    fn add(self, other: u32) -> Angle {
        Angle(self.0.wrapping_add(other))
    }
}

impl AddAssign for Angle {
    #[inline(always)]
    fn add_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline(always)]
    fn sub(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl Sub<u32> for Angle {
    type Output = Angle;
    #[inline(always)]
    fn sub(self, other: u32) -> Angle {
        Angle(self.0.wrapping_sub(other))
    }
}

impl SubAssign for Angle {
    #[inline(always)]
    fn sub_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_sub(other.0);
    }
}

impl Neg for Angle {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self::Output {
        Angle(self.0.wrapping_neg())
    }
}

/// `R_PointToAngle2`: angle of the vector `(dx, dy)`, counter-clockwise from
/// east, found through the octant and the `tantoangle` table.
pub fn point_to_angle(dx: FixedT, dy: FixedT) -> Angle {
    let (x, y) = (dx.raw(), dy.raw());
    if x == 0 && y == 0 {
        return Angle::ZERO;
    }
    let ax = x.unsigned_abs();
    let ay = y.unsigned_abs();

    let bam = if x >= 0 {
        if y >= 0 {
            if ax > ay {
                // octant 0
                tantoangle(slope_div(ay, ax))
            } else {
                // octant 1
                (ANG90 - 1).wrapping_sub(tantoangle(slope_div(ax, ay)))
            }
        } else if ax > ay {
            // octant 8
            tantoangle(slope_div(ay, ax)).wrapping_neg()
        } else {
            // octant 7
            ANG270.wrapping_add(tantoangle(slope_div(ax, ay)))
        }
    } else if y >= 0 {
        if ax > ay {
            // octant 3
            (ANG180 - 1).wrapping_sub(tantoangle(slope_div(ay, ax)))
        } else {
            // octant 2
            ANG90.wrapping_add(tantoangle(slope_div(ax, ay)))
        }
    } else if ax > ay {
        // octant 4
        ANG180.wrapping_add(tantoangle(slope_div(ay, ax)))
    } else {
        // octant 5
        (ANG270 - 1).wrapping_sub(tantoangle(slope_div(ax, ay)))
    };
    Angle(bam)
}

/// `R_PointToDist`: length of `(dx, dy)` through the trig tables
pub fn point_to_dist(dx: FixedT, dy: FixedT) -> FixedT {
    let mut dx = dx.abs();
    let mut dy = dy.abs();
    if dy > dx {
        std::mem::swap(&mut dx, &mut dy);
    }
    if dx.raw() == 0 {
        return FixedT::ZERO;
    }
    let slope = (dy / dx).raw() >> DBITS;
    let angle = tantoangle(slope.max(0) as usize).wrapping_add(ANG90);
    let sine = finesine((angle >> ANGLETOFINESHIFT) as usize % FINEANGLES);
    dx / sine
}

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Shl, Shr, Sub, SubAssign};

use crate::{FRACBITS, FRACUNIT, fixed_to_float, float_to_fixed};

/// A 16.16 fixed-point number. Addition and subtraction wrap like the integer
/// registers the renderer was written for, multiplication is `FixedMul` and
/// division is the clamped `FixedDiv`.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedT(i32);

impl FixedT {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(FRACUNIT);
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);

    /// Wrap a raw 16.16 value
    #[inline(always)]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Whole units, `value << FRACBITS`
    #[inline(always)]
    pub const fn from_int(value: i32) -> Self {
        Self(value.wrapping_shl(FRACBITS as u32))
    }

    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self(float_to_fixed(value))
    }

    #[inline(always)]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounding towards negative infinity
    #[inline(always)]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub const fn to_f32(self) -> f32 {
        fixed_to_float(self.0)
    }

    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `FixedMul`
    #[inline(always)]
    pub const fn fixed_mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> FRACBITS) as i32)
    }

    /// `FixedDiv`, saturating to `MAX`/`MIN` when the quotient would not fit
    #[inline]
    pub const fn fixed_div(self, rhs: Self) -> Self {
        if (self.0.unsigned_abs() >> 14) >= rhs.0.unsigned_abs() {
            if (self.0 ^ rhs.0) < 0 {
                Self::MIN
            } else {
                Self::MAX
            }
        } else {
            Self((((self.0 as i64) << FRACBITS) / rhs.0 as i64) as i32)
        }
    }
}

impl Debug for FixedT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FixedT({:#x} ~ {:.4})", self.0, self.to_f32())
    }
}

impl Add for FixedT {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for FixedT {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for FixedT {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for FixedT {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Mul for FixedT {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.fixed_mul(rhs)
    }
}

impl MulAssign for FixedT {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.fixed_mul(rhs);
    }
}

/// Scale by a plain integer, no fractional shift
impl Mul<i32> for FixedT {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl Div for FixedT {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.fixed_div(rhs)
    }
}

/// Plain integer division of the raw value
impl Div<i32> for FixedT {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl Neg for FixedT {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Shr<u32> for FixedT {
    type Output = Self;

    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        Self(self.0 >> rhs)
    }
}

impl Shl<u32> for FixedT {
    type Output = Self;

    #[inline(always)]
    fn shl(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shl(rhs))
    }
}

impl From<i32> for FixedT {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<i16> for FixedT {
    fn from(value: i16) -> Self {
        Self::from_int(value as i32)
    }
}

impl From<f32> for FixedT {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<FixedT> for f32 {
    fn from(value: FixedT) -> Self {
        value.to_f32()
    }
}

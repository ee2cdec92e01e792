//! Fine trig tables and the slope to angle lookup.
//!
//! The tables are generated once on first use rather than shipped as
//! literals. Values are truncated towards zero the same way the
//! original table generator did, so `finesine[0] == 25`.

use std::f64::consts::PI;

use lazy_static::lazy_static;

use crate::{FRACUNIT, FixedT};

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
/// `angle >> ANGLETOFINESHIFT` gives a fine table index
pub const ANGLETOFINESHIFT: u32 = 19;

pub const SLOPERANGE: usize = 2048;
pub const SLOPEBITS: u32 = 11;
pub const DBITS: u32 = 16 - SLOPEBITS;

lazy_static! {
    /// Five quarter circles so that cosine is `finesine[i + FINEANGLES / 4]`
    static ref FINESINE: Vec<i32> = (0..5 * FINEANGLES / 4)
        .map(|i| {
            let a = (i as f64 + 0.5) * 2.0 * PI / FINEANGLES as f64;
            (a.sin() * FRACUNIT as f64) as i32
        })
        .collect();

    /// Tangent of the half circle from -90 to +90 degrees
    static ref FINETANGENT: Vec<i32> = (0..FINEANGLES / 2)
        .map(|i| {
            let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * 2.0 * PI / FINEANGLES as f64;
            let t = a.tan() * FRACUNIT as f64;
            t.clamp(i32::MIN as f64, i32::MAX as f64) as i32
        })
        .collect();

    /// Binary angle of `atan(i / SLOPERANGE)`, 0 to 45 degrees inclusive
    static ref TANTOANGLE: Vec<u32> = (0..=SLOPERANGE)
        .map(|i| {
            let a = (i as f64 / SLOPERANGE as f64).atan();
            (a / PI * 2_147_483_648.0).round() as u32
        })
        .collect();
}

#[inline]
pub fn finesine(index: usize) -> FixedT {
    FixedT::from_raw(FINESINE[index & FINEMASK])
}

#[inline]
pub fn finecosine(index: usize) -> FixedT {
    FixedT::from_raw(FINESINE[(index & FINEMASK) + FINEANGLES / 4])
}

/// Index range is `0..FINEANGLES / 2`, out of range indexes are clamped
#[inline]
pub fn finetangent(index: usize) -> FixedT {
    FixedT::from_raw(FINETANGENT[index.min(FINEANGLES / 2 - 1)])
}

#[inline]
pub fn tantoangle(slope: usize) -> u32 {
    TANTOANGLE[slope.min(SLOPERANGE)]
}

/// `SlopeDiv`: an index in to `tantoangle` for `num / den` where `num <= den`
#[inline]
pub fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE;
    }
    let ans = (num << 3) / (den >> 8);
    (ans as usize).min(SLOPERANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FRACUNIT;

    #[test]
    fn finesine_known_values() {
        assert_eq!(finesine(0).raw(), 25);
        assert_eq!(finesine(FINEANGLES / 4 - 1).raw(), FRACUNIT - 1);
        assert!(finesine(FINEANGLES / 2 + 1).raw() < 0);
    }

    #[test]
    fn finecosine_is_offset_sine() {
        assert_eq!(finecosine(0), finesine(FINEANGLES / 4));
        assert!(finecosine(FINEANGLES / 2).raw() <= -FRACUNIT + 1);
    }

    #[test]
    fn tantoangle_range() {
        assert_eq!(tantoangle(0), 0);
        assert_eq!(tantoangle(SLOPERANGE), 0x2000_0000);
    }

    #[test]
    fn finetangent_is_odd() {
        let lo = finetangent(0).raw();
        let hi = finetangent(FINEANGLES / 2 - 1).raw();
        assert_eq!(lo, -hi);
        assert!(finetangent(FINEANGLES / 4).raw() > 0);
    }

    #[test]
    fn slope_div_clamps() {
        assert_eq!(slope_div(100, 10), SLOPERANGE);
        assert_eq!(slope_div(1 << 16, 1 << 16), SLOPERANGE);
        assert_eq!(slope_div(1 << 15, 1 << 16), SLOPERANGE / 2);
    }
}

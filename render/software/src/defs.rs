use std::fmt::Debug;

use math::FixedT;

pub const SIL_NONE: i32 = 0;
pub const SIL_BOTTOM: i32 = 1;
pub const SIL_TOP: i32 = 2;
pub const SIL_BOTH: i32 = 3;

/// Classic capacities, only enforced with `OverflowMode::Vanilla`
pub const MAXDRAWSEGS: usize = 256;
pub const MAXVISPLANES: usize = 128;
pub const MAXVISSPRITES: usize = 128;
/// Openings are `view_width * MAXOPENINGS_COLUMNS`
pub const MAXOPENINGS_COLUMNS: usize = 64;

/// Visplane column that has not been given a span yet
pub const VP_UNSET: u16 = u16::MAX;
/// Masked texture column that has been drawn
pub const MASKED_DONE: i32 = i32::MAX;

/// Where a drawseg's sprite clip for one edge comes from
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SilClip {
    #[default]
    None,
    /// The wall covers the whole column: `view_height` for the top clip,
    /// -1 for the bottom
    Solid,
    /// Start of the copied clip values in `openings`, first entry is for
    /// `x1`
    Openings(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSeg {
    /// Index in to the level segs
    pub curline: usize,
    pub x1: i32,
    pub x2: i32,

    pub scale1: FixedT,
    pub scale2: FixedT,
    pub scalestep: FixedT,

    /// 0=none, 1=bottom, 2=top, 3=both
    pub silhouette: i32,

    /// do not clip sprites above this
    pub bsilheight: FixedT,

    /// do not clip sprites below this
    pub tsilheight: FixedT,

    pub sprtopclip: SilClip,
    pub sprbottomclip: SilClip,

    /// Start of the texture columns in `openings`, first entry is for `x1`
    pub maskedtexturecol: Option<usize>,
}

impl DrawSeg {
    pub fn new(curline: usize) -> Self {
        DrawSeg {
            curline,
            x1: 0,
            x2: 0,
            scale1: FixedT::ZERO,
            scale2: FixedT::ZERO,
            scalestep: FixedT::ZERO,
            silhouette: SIL_NONE,
            bsilheight: FixedT::ZERO,
            tsilheight: FixedT::ZERO,
            sprtopclip: SilClip::None,
            sprbottomclip: SilClip::None,
            maskedtexturecol: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub first: i32,
    pub last: i32,
}

impl ClipRange {
    #[inline]
    pub const fn new(first: i32, last: i32) -> Self {
        Self { first, last }
    }
}

/// Now what is a visplane, anyway?
///
/// Simple: kinda floor/ceiling polygon optimised for Doom rendering.
#[derive(Clone)]
pub struct Visplane {
    pub height: FixedT,
    pub picnum: usize,
    pub lightlevel: i32,
    /// Leftmost column with data, `minx > maxx` when empty
    pub minx: i32,
    pub maxx: i32,
    /// First row of the span in each column, `VP_UNSET` when empty
    pub top: Vec<u16>,
    pub bottom: Vec<u16>,
}

impl Debug for Visplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visplane")
            .field("height", &self.height)
            .field("picnum", &self.picnum)
            .field("lightlevel", &self.lightlevel)
            .field("minx", &self.minx)
            .field("maxx", &self.maxx)
            .finish_non_exhaustive()
    }
}

impl Visplane {
    pub fn new(width: usize) -> Self {
        Visplane {
            height: FixedT::ZERO,
            picnum: 0,
            lightlevel: 0,
            minx: 0,
            maxx: -1,
            top: vec![VP_UNSET; width],
            bottom: vec![0; width],
        }
    }

    /// Give the plane a new key and range, all columns become unset
    pub fn reset(&mut self, height: FixedT, picnum: usize, lightlevel: i32, minx: i32, maxx: i32) {
        self.height = height;
        self.picnum = picnum;
        self.lightlevel = lightlevel;
        self.minx = minx;
        self.maxx = maxx;
        self.top.fill(VP_UNSET);
        self.bottom.fill(0);
    }

    /// Top and bottom of a column. Columns off either edge read as unset.
    #[inline]
    pub fn column(&self, x: i32) -> (i32, i32) {
        if x < 0 || x as usize >= self.top.len() {
            return (VP_UNSET as i32, 0);
        }
        (self.top[x as usize] as i32, self.bottom[x as usize] as i32)
    }

    /// Number of columns that have a span
    pub fn filled_columns(&self) -> usize {
        self.top.iter().filter(|t| **t != VP_UNSET).count()
    }
}

#[cfg(test)]
mod tests {
    use math::FixedT;

    use super::{VP_UNSET, Visplane};

    #[test]
    fn reset_clears_columns() {
        let mut plane = Visplane::new(8);
        plane.top[3] = 10;
        plane.bottom[3] = 20;
        plane.reset(FixedT::from_int(16), 2, 160, 8, -1);
        assert_eq!(plane.filled_columns(), 0);
        assert_eq!(plane.column(3), (VP_UNSET as i32, 0));
        assert_eq!(plane.picnum, 2);
    }

    #[test]
    fn edges_read_unset() {
        let plane = Visplane::new(4);
        assert_eq!(plane.column(-1).0, VP_UNSET as i32);
        assert_eq!(plane.column(4).0, VP_UNSET as i32);
    }
}

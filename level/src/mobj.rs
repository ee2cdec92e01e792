//! The parts of a map object the renderer reads. The simulation owns the
//! real objects and hands over a snapshot each frame.

use math::{Angle, FixedT};

/// Frame flag: draw at full brightness
pub const FF_FULLBRIGHT: u32 = 0x8000;
/// Frame number mask
pub const FF_FRAMEMASK: u32 = 0x7fff;

/// Object flags used by drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapObjFlag {
    /// Don't use the sector links (invisible but touchable).
    Nosector = 8,
    /// Use fuzzy draw (shadow demons or spectres), temporary player
    /// invisibility powerup.
    Shadow = 0x40000,
    /// If 0x4 0x8 or 0xc, use a translation table for player colormaps
    Translation = 0xc00_0000,
}

/// Shift to get the translation table number from the flags
pub const MF_TRANSSHIFT: u32 = 26;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapObject {
    pub x: FixedT,
    pub y: FixedT,
    /// Bottom of the object
    pub z: FixedT,
    pub angle: Angle,
    /// Index in to the sprite definitions
    pub sprite: usize,
    /// Frame number in the low bits, `FF_FULLBRIGHT` may be set
    pub frame: u32,
    pub flags: u32,
}

impl MapObject {
    pub fn new(x: i32, y: i32, z: i32, angle: Angle, sprite: usize, frame: u32) -> Self {
        Self {
            x: FixedT::from_int(x),
            y: FixedT::from_int(y),
            z: FixedT::from_int(z),
            angle,
            sprite,
            frame,
            flags: 0,
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: MapObjFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    /// 0 for none, otherwise 1..=3
    #[inline]
    pub fn translation(&self) -> usize {
        ((self.flags & MapObjFlag::Translation as u32) >> MF_TRANSSHIFT) as usize
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        (self.frame & FF_FRAMEMASK) as usize
    }

    #[inline]
    pub fn full_bright(&self) -> bool {
        self.frame & FF_FULLBRIGHT != 0
    }
}

#[cfg(test)]
mod tests {
    use math::Angle;

    use super::{FF_FULLBRIGHT, MapObjFlag, MapObject};

    #[test]
    fn frame_bits() {
        let mobj = MapObject::new(0, 0, 0, Angle::ZERO, 3, 2 | FF_FULLBRIGHT);
        assert_eq!(mobj.frame_index(), 2);
        assert!(mobj.full_bright());
    }

    #[test]
    fn translation_bits() {
        let mut mobj = MapObject::default();
        assert_eq!(mobj.translation(), 0);
        mobj.flags = 0x800_0000 | MapObjFlag::Shadow as u32;
        assert_eq!(mobj.translation(), 2);
        assert!(mobj.has_flag(MapObjFlag::Shadow));
    }
}

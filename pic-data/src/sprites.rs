/// Rotations of a sprite frame, counted from directly facing the viewer
pub const NUM_ROTATIONS: usize = 8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    /// If false use 0 for any position.
    pub rotate: bool,
    /// Lump to use for view angles 0-7.
    pub lump: [usize; NUM_ROTATIONS],
    /// Flip bit (true = flip) to use for view angles 0-7.
    pub flip: [bool; NUM_ROTATIONS],
}

impl SpriteFrame {
    /// One patch seen from every angle
    pub fn single(lump: usize) -> Self {
        Self {
            rotate: false,
            lump: [lump; NUM_ROTATIONS],
            flip: [false; NUM_ROTATIONS],
        }
    }

    /// Patch and flip for a view rotation, 0 when the frame does not rotate
    #[inline]
    pub fn lump_for(&self, rotation: usize) -> (usize, bool) {
        let rot = if self.rotate {
            rotation % NUM_ROTATIONS
        } else {
            0
        };
        (self.lump[rot], self.flip[rot])
    }
}

/// A sprite definition: a number of animation frames.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpriteDef {
    pub frames: Vec<SpriteFrame>,
}

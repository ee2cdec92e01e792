use math::{Angle, FixedT};

pub const NUMPSPRITES: usize = 2;

/// The sprite and frame a weapon overlay is showing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PspState {
    pub sprite: usize,
    /// Frame number, `FF_FULLBRIGHT` may be set
    pub frame: u32,
}

/// Overlay psprites are scaled shapes drawn directly on the view screen,
/// coordinates are given for a 320*200 view screen.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PspDef {
    /// a `None` state means not active
    pub state: Option<PspState>,
    pub sx: FixedT,
    pub sy: FixedT,
}

/// Everything the renderer needs to know about where the frame is seen
/// from. Produced by the simulation each tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ViewPoint {
    pub x: FixedT,
    pub y: FixedT,
    /// Eye height
    pub z: FixedT,
    pub angle: Angle,
    /// Added to all light levels, gun flashes and the like
    pub extralight: i32,
    /// Full screen colormap override, invulnerability or light amp
    pub fixedcolormap: Option<usize>,
    /// Weapon and flash
    pub psprites: [PspDef; NUMPSPRITES],
    /// Partially invisible, the weapon is drawn with fuzz
    pub shadow: bool,
}

impl ViewPoint {
    pub fn new(x: i32, y: i32, z: i32, angle: Angle) -> Self {
        Self {
            x: FixedT::from_int(x),
            y: FixedT::from_int(y),
            z: FixedT::from_int(z),
            angle,
            ..Self::default()
        }
    }
}

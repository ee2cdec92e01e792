use argh::FromArgs;
use log::LevelFilter;

/// Render one frame of the demo level and write it out as an image
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<LevelFilter>,
    /// resolution width in pixels
    #[argh(option, default = "0")]
    pub width: u32,
    /// resolution height in pixels
    #[argh(option, default = "0")]
    pub height: u32,
    /// low detail, every column is drawn twice as wide
    #[argh(option)]
    pub low_detail: Option<bool>,
    /// keep the classic limits on drawsegs, visplanes and sprites
    #[argh(option)]
    pub vanilla_limits: Option<bool>,
    /// path of the image to write
    #[argh(option)]
    pub output: Option<String>,
    /// view angle in degrees, 0 is east and 90 is north
    #[argh(option, default = "10.0")]
    pub angle: f32,
    /// write a colour PPM through the palette instead of a PGM of the
    /// palette indexes
    #[argh(switch)]
    pub ppm: bool,
    /// render with the partial invisibility effect on the weapon
    #[argh(switch)]
    pub shadow: bool,
}

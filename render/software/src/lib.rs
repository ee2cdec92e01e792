//! A column and span software renderer for BSP levels. One call to
//! `render_player_view` walks the BSP front to back, clips walls against
//! what is already drawn, and paints walls, flats, sprites and the weapon in
//! to an 8-bit indexed framebuffer.

use self::{defs::MAXDRAWSEGS, planes::VisPlaneRender, portals::PortalClip};
use level::{MapData, MapObject};
use log::warn;
use math::Angle;
use pic_data::PicData;

use crate::utilities::{FrameView, ViewTables};

mod bsp;
mod config;
mod defs;
mod draw;
mod errors;
mod planes;
mod portals;
mod segs;
mod solid_segs;
mod things;
mod utilities;

#[cfg(test)]
mod tests;

pub use bsp::SoftwareRenderer;
pub use config::{Detail, MAX_SCREEN_HEIGHT, MAX_SCREEN_WIDTH, OverflowMode, RenderConfig};
pub use defs::{ClipRange, DrawSeg, SIL_BOTH, SIL_BOTTOM, SIL_NONE, SIL_TOP, SilClip, Visplane};
pub use errors::RenderError;
pub use things::{VisColour, VisSprite};

const LOG_TAG: &str = "RenderData";

/// Everything borrowed for the length of one frame
#[derive(Clone, Copy)]
pub(crate) struct FrameContext<'a> {
    pub map: &'a MapData,
    pub things: &'a [MapObject],
    pub pic_data: &'a PicData,
    pub view: FrameView,
}

/// What a frame produced, logged at `debug` each frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub drawsegs: usize,
    pub visplanes: usize,
    pub vissprites: usize,
    /// BSP nodes and leaves visited
    pub nodes: usize,
    pub subsectors: usize,
}

/// We store most of what is needed for rendering in various functions here to avoid
/// having to pass too many things in args through multiple function calls. This
/// is due to the Doom C relying a fair bit on global state.
///
/// `RenderData` will be passed to the sprite drawer/clipper to use `drawsegs`
/// ----------------------------------------------------------------------------
/// - R_DrawSprite, r_things.c
/// - R_DrawMasked, r_things.c
/// - R_StoreWallRange, r_segs.c, checks only for overflow of drawsegs, and pushes
///                               one entry when finished
/// - R_DrawPlanes, r_plane.c
pub(crate) struct RenderData {
    /// View angle to the first vertex of the seg being added
    pub rw_angle1: Angle,
    // DrawSeg used, which is inserted in drawsegs at end of r_segs
    pub drawsegs: Vec<DrawSeg>,
    pub portal_clip: PortalClip,
    pub visplane_render: VisPlaneRender,
    pub overflow: OverflowMode,
    overflow_warned: bool,
}

impl RenderData {
    pub(crate) fn new(view_width: usize, view_height: usize, overflow: OverflowMode) -> Self {
        Self {
            rw_angle1: Angle::default(),
            drawsegs: Vec::with_capacity(MAXDRAWSEGS),
            visplane_render: VisPlaneRender::new(view_width, view_height, overflow),
            portal_clip: PortalClip::new(view_width, view_height),
            overflow,
            overflow_warned: false,
        }
    }

    pub(crate) fn clear_data(&mut self, view: &FrameView, tables: &ViewTables) {
        self.portal_clip.clear();
        self.drawsegs.clear();
        self.rw_angle1 = Angle::default();
        self.visplane_render.clear_planes(view, tables);
        self.overflow_warned = false;
    }

    /// Something was dropped for hitting a vanilla limit. Warns once a frame.
    pub(crate) fn note_overflow(&mut self, what: &str) {
        if !self.overflow_warned {
            warn!(target: LOG_TAG, "Vanilla limit reached, dropping {what}");
            self.overflow_warned = true;
        }
    }
}

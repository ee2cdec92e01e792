use std::mem;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use level::{BBox, MapData, MapObjFlag, MapObject, NodeChild, ViewPoint};
use log::{debug, trace};
use math::{ANG180, FixedT};
use pic_data::PicData;
use render_trait::{PixelBuffer, PlayViewRenderer};

use super::defs::{ClipRange, DrawSeg, Visplane};
use super::segs::SegRender;
use super::solid_segs::SolidSegs;
use super::things::VisSprite;
use crate::config::RenderConfig;
use crate::draw::Rasterizer;
use crate::utilities::{FrameView, ViewTables};
use crate::{FrameContext, FrameStats, RenderData, RenderError};

const LOG_TAG: &str = "SoftwareRenderer";

/// Corners of a bounding box to test, by where the view point is relative to
/// the box. Indexes are `BOXTOP = 0`, `BOXBOTTOM = 1`, `BOXLEFT = 2`,
/// `BOXRIGHT = 3` as `x1, y1, x2, y2`.
const CHECKCOORD: [[usize; 4]; 12] = [
    [3, 0, 2, 1],
    [3, 0, 2, 0],
    [3, 1, 2, 0],
    [0; 4],
    [2, 0, 2, 1],
    [0; 4],
    [3, 1, 3, 0],
    [0; 4],
    [2, 0, 3, 1],
    [2, 1, 3, 1],
    [2, 1, 3, 0],
    [0; 4],
];

#[inline]
fn bbox_coord(bbox: &BBox, i: usize) -> FixedT {
    match i {
        0 => bbox.top,
        1 => bbox.bottom,
        2 => bbox.left,
        _ => bbox.right,
    }
}

/// We store most of what is needed for rendering in various functions here to
/// avoid having to pass too many things in args through multiple function
/// calls. This is due to the Doom C relying a fair bit on global state.
///
/// The per-frame buffers are kept between frames and reset at the start of
/// each one, so a steady view allocates nothing.
pub struct SoftwareRenderer {
    pub(super) config: RenderConfig,
    pub(super) tables: ViewTables,
    solidsegs: SolidSegs,
    /// Scratch for the visible pieces of a seg found by the clipper
    fragments: Vec<ClipRange>,
    /// Visible sprite data, used for Z-ordered rendering of sprites
    pub(super) vissprites: Vec<VisSprite>,

    pub(super) r_data: RenderData,
    pub(super) seg_renderer: SegRender,
    pub(super) rasterizer: Rasterizer,

    /// Used for checking if a sector has been worked on when iterating over
    pub(super) checked_sectors: Vec<u32>,
    pub(super) validcount: u32,
    /// Indexes in to the frame's things, bucketed by sector
    pub(super) sector_things: Vec<Vec<usize>>,

    /// Sprite clipping, per column
    pub(super) clipbot: Vec<i32>,
    pub(super) cliptop: Vec<i32>,

    stats: FrameStats,
}

impl PlayViewRenderer for SoftwareRenderer {
    type Stats = FrameStats;
    type Error = RenderError;

    fn render_player_view(
        &mut self,
        view: &ViewPoint,
        map: &MapData,
        things: &[MapObject],
        pic_data: &PicData,
        buffer: &mut impl PixelBuffer,
    ) -> Result<FrameStats, RenderError> {
        let size = buffer.size();
        if size.width_usize() != self.config.width || size.height_usize() != self.config.height {
            return Err(RenderError::BufferSize {
                width: self.config.width,
                height: self.config.height,
                got_width: size.width_usize(),
                got_height: size.height_usize(),
            });
        }

        let ctx = FrameContext {
            map,
            things,
            pic_data,
            view: FrameView::new(view),
        };
        self.setup_frame(&ctx);

        #[cfg(feature = "hprof")]
        profile!("render_bsp_node");
        self.render_bsp_node(&ctx, map.start_node(), buffer)?;

        #[cfg(feature = "hprof")]
        profile!("draw_planes");
        self.r_data.visplane_render.draw_planes(
            &self.tables,
            &ctx,
            &mut self.rasterizer,
            buffer,
        )?;

        #[cfg(feature = "hprof")]
        profile!("draw_masked");
        self.draw_masked(&view.psprites, view.shadow, &ctx, buffer)?;

        self.stats.drawsegs = self.r_data.drawsegs.len();
        self.stats.visplanes = self.r_data.visplane_render.lastvisplane;
        self.stats.vissprites = self.vissprites.len();
        debug!(target: LOG_TAG, "{:?}", self.stats);
        Ok(self.stats)
    }
}

impl SoftwareRenderer {
    pub fn new(config: &RenderConfig) -> Result<SoftwareRenderer, RenderError> {
        config.validate()?;
        let tables = ViewTables::new(config);
        let view_width = tables.view_width as usize;
        let view_height = tables.view_height as usize;

        Ok(Self {
            config: *config,
            solidsegs: SolidSegs::new(view_width),
            fragments: Vec::new(),
            vissprites: Vec::new(),
            r_data: RenderData::new(view_width, view_height, config.overflow),
            seg_renderer: SegRender::default(),
            rasterizer: Rasterizer::new(config.detail, tables.view_width, tables.view_height),
            checked_sectors: Vec::new(),
            validcount: 0,
            sector_things: Vec::new(),
            clipbot: vec![0; view_width],
            cliptop: vec![0; view_width],
            stats: FrameStats::default(),
            tables,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Drawsegs of the last frame, in the order they were stored
    pub fn drawsegs(&self) -> &[DrawSeg] {
        &self.r_data.drawsegs
    }

    /// Visplanes of the last frame
    pub fn visplanes(&self) -> &[Visplane] {
        self.r_data.visplane_render.planes()
    }

    /// Sprites of the last frame, sorted furthest first
    pub fn vissprites(&self) -> &[VisSprite] {
        &self.vissprites
    }

    /// The solid clip list as it was left at the end of the last BSP walk
    pub fn solid_ranges(&self) -> &[ClipRange] {
        self.solidsegs.ranges()
    }

    /// R_SetupFrame and the clears of R_RenderPlayerView
    fn setup_frame(&mut self, ctx: &FrameContext) {
        self.stats = FrameStats::default();
        self.solidsegs.clear();
        self.vissprites.clear();
        self.r_data.clear_data(&ctx.view, &self.tables);
        self.rasterizer.reset();

        let num_sectors = ctx.map.sectors().len();
        self.checked_sectors.resize(num_sectors, 0);
        self.validcount = self.validcount.wrapping_add(1);
        if self.validcount == 0 {
            self.checked_sectors.fill(0);
            self.validcount = 1;
        }

        // Sector links for the things of this frame
        self.sector_things.resize_with(num_sectors, Vec::new);
        for list in self.sector_things.iter_mut() {
            list.clear();
        }
        for (i, thing) in ctx.things.iter().enumerate() {
            if thing.has_flag(MapObjFlag::Nosector) {
                continue;
            }
            let sector = ctx.map.point_in_subsector(thing.x, thing.y).sector;
            self.sector_things[sector].push(i);
        }
    }

    /// R_AddLine - r_bsp
    ///
    /// Clips the given segment and adds any visible pieces to the line list.
    fn add_line(
        &mut self,
        ctx: &FrameContext,
        seg_idx: usize,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        #[cfg(feature = "hprof")]
        profile!("add_line");
        let map = ctx.map;
        let view = &ctx.view;
        let seg = &map.segments()[seg_idx];
        let v1 = &map.vertexes()[seg.v1];
        let v2 = &map.vertexes()[seg.v2];

        // OPTIMIZE: quickly reject orthogonal back sides.
        let angle1 = view.point_to_angle(v1.x, v1.y);
        let angle2 = view.point_to_angle(v2.x, v2.y);

        // Clip to view edges.
        let span = angle1 - angle2;

        // Back side? I.e. backface culling?
        if span.bam() >= ANG180 {
            return Ok(());
        }

        // Global angle needed by segcalc.
        self.r_data.rw_angle1 = angle1;

        let Some((x1, x2)) = self
            .tables
            .clip_angles(angle1 - view.viewangle, angle2 - view.viewangle)
        else {
            return Ok(());
        };

        let frontsector = &map.sectors()[seg.frontsector];
        let solid = match seg.backsector {
            None => true,
            Some(back) => {
                let Some(backsector) = map.sectors().get(back) else {
                    trace!(target: LOG_TAG, "Seg {seg_idx} has no back sector {back}");
                    return Ok(());
                };
                // Closed door.
                if backsector.ceilingheight <= frontsector.floorheight
                    || backsector.floorheight >= frontsector.ceilingheight
                {
                    true
                } else if backsector.ceilingheight != frontsector.ceilingheight
                    || backsector.floorheight != frontsector.floorheight
                {
                    // Window.
                    false
                } else if backsector.ceilingpic == frontsector.ceilingpic
                    && backsector.floorpic == frontsector.floorpic
                    && backsector.lightlevel == frontsector.lightlevel
                    && map.sidedefs()[seg.sidedef].midtexture.is_none()
                {
                    // Reject empty lines used for triggers and special
                    // events. Identical floor and ceiling on both sides,
                    // identical light levels on both sides, and no middle
                    // texture.
                    return Ok(());
                } else {
                    false
                }
            }
        };

        let mut fragments = mem::take(&mut self.fragments);
        fragments.clear();
        if solid {
            self.solidsegs.clip_solid(x1, x2 - 1, &mut fragments);
        } else {
            self.solidsegs.clip_pass(x1, x2 - 1, &mut fragments);
        }

        let mut result = Ok(());
        for range in fragments.iter() {
            result = self.seg_renderer.store_wall_range(
                range.first,
                range.last,
                seg_idx,
                &self.tables,
                ctx,
                &mut self.r_data,
                &mut self.rasterizer,
                pixels,
            );
            if result.is_err() {
                break;
            }
        }
        self.fragments = fragments;
        result
    }

    /// R_Subsector - r_bsp
    ///
    /// Determine floor/ceiling planes. Add sprites of things in sector.
    /// Draw one or more line segments.
    fn draw_subsector(
        &mut self,
        ctx: &FrameContext,
        subsect_idx: usize,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        #[cfg(feature = "hprof")]
        profile!("draw_subsector");
        self.stats.subsectors += 1;
        let map = ctx.map;
        let subsect = &map.subsectors()[subsect_idx];
        let frontsector = &map.sectors()[subsect.sector];
        let sky_num = ctx.pic_data.sky_num();
        let viewz = ctx.view.viewz;

        let planes = &mut self.r_data.visplane_render;
        planes.floorplane = if frontsector.floorheight < viewz {
            Some(planes.find_plane(
                frontsector.floorheight,
                frontsector.floorpic,
                frontsector.lightlevel,
                sky_num,
            )?)
        } else {
            None
        };
        planes.ceilingplane = if frontsector.ceilingheight > viewz
            || ctx.pic_data.is_sky(frontsector.ceilingpic)
        {
            Some(planes.find_plane(
                frontsector.ceilingheight,
                frontsector.ceilingpic,
                frontsector.lightlevel,
                sky_num,
            )?)
        } else {
            None
        };

        self.add_sprites(ctx, subsect.sector)?;

        for seg_idx in subsect.start_seg..subsect.start_seg + subsect.seg_count {
            self.add_line(ctx, seg_idx, pixels)?;
        }
        Ok(())
    }

    /// R_RenderBSPNode - r_bsp
    ///
    /// Renders all subsectors below a given node, traversing subtree
    /// recursively. Front to back.
    fn render_bsp_node(
        &mut self,
        ctx: &FrameContext,
        child: NodeChild,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        self.stats.nodes += 1;
        let node_id = match child {
            NodeChild::SubSector(ss) => return self.draw_subsector(ctx, ss, pixels),
            NodeChild::Node(n) => n,
        };

        let node = &ctx.map.nodes()[node_id];
        // Decide which side the view point is on.
        let side = node.point_on_side(ctx.view.viewx, ctx.view.viewy);

        // Recursively divide front space.
        self.render_bsp_node(ctx, node.children[side], pixels)?;

        // Possibly divide back space. Nothing more can show once every
        // column is solid.
        if !self.solidsegs.is_full() && self.bb_extents_in_fov(&node.bboxes[side ^ 1], &ctx.view) {
            self.render_bsp_node(ctx, node.children[side ^ 1], pixels)?;
        }
        Ok(())
    }

    /// R_CheckBBox - r_bsp
    ///
    /// Checks BSP node/subtree bounding box. Returns true if some part of
    /// the bbox might be visible.
    fn bb_extents_in_fov(&self, bbox: &BBox, view: &FrameView) -> bool {
        #[cfg(feature = "hprof")]
        profile!("bb_extents_in_fov");
        // Find the corners of the box that define the edges from current
        // viewpoint.
        let boxx = if view.viewx <= bbox.left {
            0
        } else if view.viewx < bbox.right {
            1
        } else {
            2
        };
        let boxy = if view.viewy >= bbox.top {
            0
        } else if view.viewy > bbox.bottom {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        if boxpos == 5 {
            return true;
        }

        let coords = CHECKCOORD[boxpos];
        let x1 = bbox_coord(bbox, coords[0]);
        let y1 = bbox_coord(bbox, coords[1]);
        let x2 = bbox_coord(bbox, coords[2]);
        let y2 = bbox_coord(bbox, coords[3]);

        // check clip list for an open space
        let angle1 = view.point_to_angle(x1, y1) - view.viewangle;
        let angle2 = view.point_to_angle(x2, y2) - view.viewangle;

        // Sitting on a line?
        if (angle1 - angle2).bam() >= ANG180 {
            return true;
        }

        let Some((sx1, sx2)) = self.tables.clip_angles(angle1, angle2) else {
            return false;
        };

        // Does not cross a pixel.
        self.solidsegs.has_open(sx1, sx2 - 1)
    }
}

//! Wall ranges. Each visible piece of a seg found by the clipper is drawn
//! column by column here, marking floor and ceiling rows for the visplanes
//! and narrowing the portal clip as it goes.

use level::LineDefFlags;
use math::trig::{FINEANGLES, finetangent};
use math::{ANG90, ANG180, Angle, FRACBITS, FixedT};
use pic_data::WallPic;
use render_trait::PixelBuffer;

use crate::config::OverflowMode;
use crate::defs::{
    DrawSeg, MASKED_DONE, MAXDRAWSEGS, SIL_BOTH, SIL_BOTTOM, SIL_NONE, SIL_TOP, SilClip,
};
use crate::draw::{ColumnMode, DrawColumn, Rasterizer};
use crate::utilities::{
    LIGHTSCALESHIFT, MAXLIGHTSCALE, ViewTables, scale_from_global_angle, wall_light_row,
};
use crate::{FrameContext, RenderData, RenderError};

const HEIGHTBITS: i32 = 12;
const HEIGHTUNIT: i32 = 1 << HEIGHTBITS;

/// All of the state in this struct is unique to it as it is used once per seg
/// to be rendered.
#[derive(Debug, Default)]
pub(crate) struct SegRender {
    /// True if any of the segs textures might be visible.
    segtextured: bool,
    /// False if the back side is the same plane.
    markfloor: bool,
    markceiling: bool,
    /// Start of this seg's masked texture columns in `openings`
    maskedtexturecol: Option<usize>,
    toptexture: Option<usize>,
    bottomtexture: Option<usize>,
    midtexture: Option<usize>,

    rw_normalangle: Angle,
    // regular wall
    rw_x: i32,
    rw_stopx: i32,
    rw_centerangle: Angle,
    rw_offset: FixedT,
    rw_distance: FixedT,
    rw_scale: FixedT,
    rw_scalestep: FixedT,
    rw_midtexturemid: FixedT,
    rw_toptexturemid: FixedT,
    rw_bottomtexturemid: FixedT,

    pixhigh: FixedT,
    pixlow: FixedT,
    pixhighstep: FixedT,
    pixlowstep: FixedT,

    topfrac: FixedT,
    topstep: FixedT,
    bottomfrac: FixedT,
    bottomstep: FixedT,

    worldtop: FixedT,
    worldbottom: FixedT,
    worldhigh: FixedT,
    worldlow: FixedT,

    /// Light row in `scalelight` for the wall
    wall_lights: usize,
}

/// Height of a wall texture, 0 when the side has none
fn texture_height(ctx: &FrameContext, texture: Option<usize>) -> Result<FixedT, RenderError> {
    match texture {
        Some(t) => ctx
            .pic_data
            .wall_pic(t)
            .map(|p| FixedT::from_int(p.height as i32))
            .ok_or(RenderError::MissingTexture(t)),
        None => Ok(FixedT::ZERO),
    }
}

fn wall_pic<'a>(
    ctx: &FrameContext<'a>,
    texture: Option<usize>,
) -> Result<Option<&'a WallPic>, RenderError> {
    texture
        .map(|t| ctx.pic_data.wall_pic(t).ok_or(RenderError::MissingTexture(t)))
        .transpose()
}

impl SegRender {
    /// R_StoreWallRange - r_segs
    ///
    /// Draws columns `start..=stop` of the seg `seg_idx`. `rw_angle1` is the
    /// unclipped view angle to the seg's first vertex.
    #[allow(clippy::too_many_arguments)]
    pub fn store_wall_range(
        &mut self,
        start: i32,
        stop: i32,
        seg_idx: usize,
        tables: &ViewTables,
        ctx: &FrameContext,
        rdata: &mut RenderData,
        rasterizer: &mut Rasterizer,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        // Keep original Doom behaviour here
        if rdata.overflow == OverflowMode::Vanilla && rdata.drawsegs.len() >= MAXDRAWSEGS {
            rdata.note_overflow("drawsegs");
            return Ok(());
        }

        if start < 0 || start >= tables.view_width || start > stop || stop >= tables.view_width {
            return Err(RenderError::WallRange { start, stop });
        }

        let map = ctx.map;
        let view = &ctx.view;
        let seg = &map.segments()[seg_idx];
        let sidedef = &map.sidedefs()[seg.sidedef];
        let linedef = &map.linedefs()[seg.linedef];
        let frontsector = &map.sectors()[seg.frontsector];
        let backsector = seg.backsector.and_then(|b| map.sectors().get(b));

        // calculate rw_distance for scale calculation
        self.rw_normalangle = seg.angle + ANG90;
        let offsetangle = ((self.rw_normalangle - rdata.rw_angle1).bam() as i32)
            .unsigned_abs()
            .min(ANG90);
        let distangle = Angle::new(ANG90 - offsetangle);
        let v1 = &map.vertexes()[seg.v1];
        let hyp = view.point_to_dist(v1.x, v1.y);
        self.rw_distance = hyp * distangle.sin();

        self.rw_x = start;
        self.rw_stopx = stop + 1;
        let mut ds_p = DrawSeg::new(seg_idx);
        ds_p.x1 = start;
        ds_p.x2 = stop;

        // calculate scale at both ends and step
        self.rw_scale = scale_from_global_angle(
            view.viewangle + tables.xtoviewangle[start as usize],
            self.rw_normalangle,
            self.rw_distance,
            view,
            tables,
        );
        ds_p.scale1 = self.rw_scale;

        if stop > start {
            ds_p.scale2 = scale_from_global_angle(
                view.viewangle + tables.xtoviewangle[stop as usize],
                self.rw_normalangle,
                self.rw_distance,
                view,
                tables,
            );
            self.rw_scalestep = (ds_p.scale2 - self.rw_scale) / (stop - start);
        } else {
            ds_p.scale2 = ds_p.scale1;
            self.rw_scalestep = FixedT::ZERO;
        }
        ds_p.scalestep = self.rw_scalestep;

        // calculate texture boundaries
        //  and decide if floor / ceiling marks are needed
        self.worldtop = frontsector.ceilingheight - view.viewz;
        self.worldbottom = frontsector.floorheight - view.viewz;

        self.midtexture = None;
        self.toptexture = None;
        self.bottomtexture = None;
        self.maskedtexturecol = None;
        ds_p.maskedtexturecol = None;

        let sky_num = ctx.pic_data.sky_num();
        let is_sky = |pic: usize| sky_num == Some(pic);

        match backsector {
            None => {
                // single sided line
                self.midtexture = sidedef.midtexture;
                // a single sided line is terminal, so it must mark ends
                self.markfloor = true;
                self.markceiling = true;
                if linedef.has_flag(LineDefFlags::DontPegBottom) {
                    let vtop =
                        frontsector.floorheight + texture_height(ctx, sidedef.midtexture)?;
                    // bottom of texture at bottom
                    self.rw_midtexturemid = vtop - view.viewz;
                } else {
                    // top of texture at top
                    self.rw_midtexturemid = self.worldtop;
                }
                self.rw_midtexturemid += sidedef.rowoffset;

                ds_p.silhouette = SIL_BOTH;
                ds_p.sprtopclip = SilClip::Solid;
                ds_p.sprbottomclip = SilClip::Solid;
                ds_p.bsilheight = FixedT::MAX;
                ds_p.tsilheight = FixedT::MIN;
            }
            Some(backsector) => {
                // two sided line
                ds_p.sprtopclip = SilClip::None;
                ds_p.sprbottomclip = SilClip::None;
                ds_p.silhouette = SIL_NONE;

                if frontsector.floorheight > backsector.floorheight {
                    ds_p.silhouette = SIL_BOTTOM;
                    ds_p.bsilheight = frontsector.floorheight;
                } else if backsector.floorheight > view.viewz {
                    ds_p.silhouette = SIL_BOTTOM;
                    ds_p.bsilheight = FixedT::MAX;
                }

                if frontsector.ceilingheight < backsector.ceilingheight {
                    ds_p.silhouette |= SIL_TOP;
                    ds_p.tsilheight = frontsector.ceilingheight;
                } else if backsector.ceilingheight < view.viewz {
                    ds_p.silhouette |= SIL_TOP;
                    ds_p.tsilheight = FixedT::MIN;
                }

                if backsector.ceilingheight <= frontsector.floorheight {
                    ds_p.sprbottomclip = SilClip::Solid;
                    ds_p.bsilheight = FixedT::MAX;
                    ds_p.silhouette |= SIL_BOTTOM;
                }

                if backsector.floorheight >= frontsector.ceilingheight {
                    ds_p.sprtopclip = SilClip::Solid;
                    ds_p.tsilheight = FixedT::MIN;
                    ds_p.silhouette |= SIL_TOP;
                }

                self.worldhigh = backsector.ceilingheight - view.viewz;
                self.worldlow = backsector.floorheight - view.viewz;

                // hack to allow height changes in outdoor areas
                if is_sky(frontsector.ceilingpic) && is_sky(backsector.ceilingpic) {
                    self.worldtop = self.worldhigh;
                }

                self.markfloor = self.worldlow != self.worldbottom
                    || backsector.floorpic != frontsector.floorpic
                    || backsector.lightlevel != frontsector.lightlevel;

                self.markceiling = self.worldhigh != self.worldtop
                    || backsector.ceilingpic != frontsector.ceilingpic
                    || backsector.lightlevel != frontsector.lightlevel;

                if backsector.ceilingheight <= frontsector.floorheight
                    || backsector.floorheight >= frontsector.ceilingheight
                {
                    // closed door
                    self.markceiling = true;
                    self.markfloor = true;
                }

                if self.worldhigh < self.worldtop {
                    // top texture
                    self.toptexture = sidedef.toptexture;
                    if linedef.has_flag(LineDefFlags::DontPegTop) {
                        // top of texture at top
                        self.rw_toptexturemid = self.worldtop;
                    } else {
                        let vtop =
                            backsector.ceilingheight + texture_height(ctx, sidedef.toptexture)?;
                        // bottom of texture
                        self.rw_toptexturemid = vtop - view.viewz;
                    }
                }

                if self.worldlow > self.worldbottom {
                    // bottom texture
                    self.bottomtexture = sidedef.bottomtexture;
                    if linedef.has_flag(LineDefFlags::DontPegBottom) {
                        // bottom of texture at bottom, top of texture at top
                        self.rw_bottomtexturemid = self.worldtop;
                    } else {
                        // top of texture at top
                        self.rw_bottomtexturemid = self.worldlow;
                    }
                }
                self.rw_toptexturemid += sidedef.rowoffset;
                self.rw_bottomtexturemid += sidedef.rowoffset;

                // allocate space for masked texture tables
                if sidedef.midtexture.is_some() {
                    // masked midtexture
                    let cols = rdata
                        .visplane_render
                        .alloc_openings((self.rw_stopx - self.rw_x) as usize, MASKED_DONE)?;
                    self.maskedtexturecol = Some(cols);
                    ds_p.maskedtexturecol = Some(cols);
                }
            }
        }

        // calculate rw_offset (only needed for textured lines)
        self.segtextured = self.midtexture.is_some()
            || self.toptexture.is_some()
            || self.bottomtexture.is_some()
            || self.maskedtexturecol.is_some();

        if self.segtextured {
            let mut offsetangle = self.rw_normalangle - rdata.rw_angle1;
            if offsetangle.bam() > ANG180 {
                offsetangle = -offsetangle;
            }
            if offsetangle.bam() > ANG90 {
                offsetangle = Angle::A90;
            }
            self.rw_offset = hyp * offsetangle.sin();

            if (self.rw_normalangle - rdata.rw_angle1).bam() < ANG180 {
                self.rw_offset = -self.rw_offset;
            }
            self.rw_offset += sidedef.textureoffset + seg.offset;
            self.rw_centerangle = Angle::A90 + view.viewangle - self.rw_normalangle;

            // calculate light table
            //  use different light tables
            //  for horizontal / vertical / diagonal
            let v2 = &map.vertexes()[seg.v2];
            self.wall_lights = wall_light_row(frontsector.lightlevel, view.extralight, v1, v2);
        }

        // if a floor / ceiling plane is on the wrong side
        //  of the view plane, it is definitely invisible
        //  and doesn't need to be marked.
        if frontsector.floorheight >= view.viewz {
            // above view plane
            self.markfloor = false;
        }
        if frontsector.ceilingheight <= view.viewz && !is_sky(frontsector.ceilingpic) {
            // below view plane
            self.markceiling = false;
        }

        // calculate incremental stepping values for texture edges
        self.worldtop = self.worldtop >> 4;
        self.worldbottom = self.worldbottom >> 4;

        let centery = tables.centeryfrac >> 4;
        self.topstep = -(self.rw_scalestep * self.worldtop);
        self.topfrac = centery - self.worldtop * self.rw_scale;

        self.bottomstep = -(self.rw_scalestep * self.worldbottom);
        self.bottomfrac = centery - self.worldbottom * self.rw_scale;

        if backsector.is_some() {
            self.worldhigh = self.worldhigh >> 4;
            self.worldlow = self.worldlow >> 4;

            if self.worldhigh < self.worldtop {
                self.pixhigh = centery - self.worldhigh * self.rw_scale;
                self.pixhighstep = -(self.rw_scalestep * self.worldhigh);
            }

            if self.worldlow > self.worldbottom {
                self.pixlow = centery - self.worldlow * self.rw_scale;
                self.pixlowstep = -(self.rw_scalestep * self.worldlow);
            }
        }

        // render it
        let planes = &mut rdata.visplane_render;
        if self.markceiling {
            match planes.ceilingplane {
                Some(plane) => {
                    planes.ceilingplane = Some(planes.check_plane(plane, self.rw_x, self.rw_stopx - 1)?)
                }
                None => self.markceiling = false,
            }
        }
        if self.markfloor {
            match planes.floorplane {
                Some(plane) => {
                    planes.floorplane = Some(planes.check_plane(plane, self.rw_x, self.rw_stopx - 1)?)
                }
                None => self.markfloor = false,
            }
        }

        self.render_seg_loop(tables, ctx, rdata, rasterizer, pixels)?;

        // save sprite clipping info
        let range = start as usize..self.rw_stopx as usize;
        if (ds_p.silhouette & SIL_TOP != 0 || self.maskedtexturecol.is_some())
            && ds_p.sprtopclip == SilClip::None
        {
            let clip = rdata
                .visplane_render
                .push_openings(&rdata.portal_clip.ceilingclip[range.clone()])?;
            ds_p.sprtopclip = SilClip::Openings(clip);
        }

        if (ds_p.silhouette & SIL_BOTTOM != 0 || self.maskedtexturecol.is_some())
            && ds_p.sprbottomclip == SilClip::None
        {
            let clip = rdata
                .visplane_render
                .push_openings(&rdata.portal_clip.floorclip[range])?;
            ds_p.sprbottomclip = SilClip::Openings(clip);
        }

        if self.maskedtexturecol.is_some() && ds_p.silhouette & SIL_TOP == 0 {
            ds_p.silhouette |= SIL_TOP;
            ds_p.tsilheight = FixedT::MIN;
        }
        if self.maskedtexturecol.is_some() && ds_p.silhouette & SIL_BOTTOM == 0 {
            ds_p.silhouette |= SIL_BOTTOM;
            ds_p.bsilheight = FixedT::MAX;
        }

        rdata.drawsegs.push(ds_p);
        Ok(())
    }

    /// R_RenderSegLoop
    ///
    /// Draws zero, one, or two textures (and possibly a masked texture) for
    /// walls. Can draw or mark the starting pixel of floor and ceiling
    /// textures.
    fn render_seg_loop(
        &mut self,
        tables: &ViewTables,
        ctx: &FrameContext,
        rdata: &mut RenderData,
        rasterizer: &mut Rasterizer,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let view = &ctx.view;
        let pic_data = ctx.pic_data;
        let mid_pic = wall_pic(ctx, self.midtexture)?;
        let top_pic = wall_pic(ctx, self.toptexture)?;
        let bottom_pic = wall_pic(ctx, self.bottomtexture)?;
        let fixed = view.fixedcolormap;
        let view_height = tables.view_height;

        let clip = &mut rdata.portal_clip;
        let planes = &mut rdata.visplane_render;

        let mut texturecolumn = 0;
        for x in self.rw_x..self.rw_stopx {
            let xu = x as usize;
            // mark floor / ceiling areas
            let yl = ((self.topfrac.raw() + HEIGHTUNIT - 1) >> HEIGHTBITS)
                .max(clip.ceilingclip[xu] + 1);

            if self.markceiling {
                if let Some(plane) = planes.ceilingplane {
                    let top = clip.ceilingclip[xu] + 1;
                    let bottom = (yl - 1).min(clip.floorclip[xu] - 1);
                    if top <= bottom {
                        let plane = &mut planes.visplanes[plane];
                        plane.top[xu] = top as u16;
                        plane.bottom[xu] = bottom as u16;
                    }
                }
            }

            let yh = (self.bottomfrac.raw() >> HEIGHTBITS).min(clip.floorclip[xu] - 1);

            if self.markfloor {
                if let Some(plane) = planes.floorplane {
                    let top = (yh + 1).max(clip.ceilingclip[xu] + 1);
                    let bottom = clip.floorclip[xu] - 1;
                    if top <= bottom {
                        let plane = &mut planes.visplanes[plane];
                        plane.top[xu] = top as u16;
                        plane.bottom[xu] = bottom as u16;
                    }
                }
            }

            // texturecolumn and lighting are independent of wall tiers
            let mut dc_colourmap = pic_data.colourmap(0);
            let mut dc_iscale = FixedT::ZERO;
            if self.segtextured {
                // calculate texture offset
                let mut angle = (self.rw_centerangle + tables.xtoviewangle[xu]).fine_index();
                if angle >= FINEANGLES / 2 {
                    angle = 0;
                }
                texturecolumn =
                    (self.rw_offset - finetangent(angle) * self.rw_distance).raw() >> FRACBITS;

                // calculate lighting
                dc_colourmap = match fixed {
                    Some(f) => pic_data.colourmap(f),
                    None => {
                        let index = (self.rw_scale.raw() >> LIGHTSCALESHIFT)
                            .clamp(0, MAXLIGHTSCALE as i32 - 1);
                        pic_data.colourmap(tables.scalelight[self.wall_lights][index as usize])
                    }
                };
                dc_iscale =
                    FixedT::from_raw((0xffff_ffffu32 / self.rw_scale.raw().max(1) as u32) as i32);
            }

            let dc = DrawColumn {
                source: &[],
                colourmap: dc_colourmap,
                mode: ColumnMode::Solid,
                x,
                yl,
                yh,
                iscale: dc_iscale,
                texturemid: FixedT::ZERO,
            };

            // draw the wall tiers
            if let Some(mid) = mid_pic {
                // single sided line
                rasterizer.draw_column(
                    &DrawColumn {
                        source: mid.column(texturecolumn),
                        texturemid: self.rw_midtexturemid,
                        ..dc
                    },
                    pixels,
                )?;
                clip.ceilingclip[xu] = view_height;
                clip.floorclip[xu] = -1;
            } else {
                // two sided line
                if let Some(top) = top_pic {
                    // top wall
                    let mid = (self.pixhigh.raw() >> HEIGHTBITS).min(clip.floorclip[xu] - 1);
                    self.pixhigh += self.pixhighstep;

                    if mid >= yl {
                        rasterizer.draw_column(
                            &DrawColumn {
                                source: top.column(texturecolumn),
                                yh: mid,
                                texturemid: self.rw_toptexturemid,
                                ..dc
                            },
                            pixels,
                        )?;
                        clip.ceilingclip[xu] = mid;
                    } else {
                        clip.ceilingclip[xu] = yl - 1;
                    }
                } else if self.markceiling {
                    // no top wall
                    clip.ceilingclip[xu] = yl - 1;
                }

                if let Some(bottom) = bottom_pic {
                    // bottom wall
                    let mid = ((self.pixlow.raw() + HEIGHTUNIT - 1) >> HEIGHTBITS)
                        .max(clip.ceilingclip[xu] + 1);
                    self.pixlow += self.pixlowstep;

                    if mid <= yh {
                        rasterizer.draw_column(
                            &DrawColumn {
                                source: bottom.column(texturecolumn),
                                yl: mid,
                                texturemid: self.rw_bottomtexturemid,
                                ..dc
                            },
                            pixels,
                        )?;
                        clip.floorclip[xu] = mid;
                    } else {
                        clip.floorclip[xu] = yh + 1;
                    }
                } else if self.markfloor {
                    // no bottom wall
                    clip.floorclip[xu] = yh + 1;
                }

                if let Some(cols) = self.maskedtexturecol {
                    // save texturecol
                    //  for backdrawing of masked mid texture
                    planes.openings[cols + (x - self.rw_x) as usize] = texturecolumn;
                }
            }

            self.rw_scale += self.rw_scalestep;
            self.topfrac += self.topstep;
            self.bottomfrac += self.bottomstep;
        }
        Ok(())
    }
}

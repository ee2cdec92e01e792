//! Sprites: map objects projected in to `VisSprite`s during the BSP walk,
//! then sorted and drawn back to front after the flats, clipped against the
//! silhouettes of the walls in front of them. Masked mid textures and the
//! weapon overlay are drawn from here too.

use level::{FF_FULLBRIGHT, FF_FRAMEMASK, MapObjFlag, MapObject, PspDef};
use math::{ANG45, FRACUNIT, FixedT};
use pic_data::{Post, SpritePic};
use render_trait::PixelBuffer;

use super::bsp::SoftwareRenderer;
use crate::defs::{MASKED_DONE, MAXVISSPRITES, SIL_BOTTOM, SIL_TOP, SilClip};
use crate::draw::{ColumnMode, DrawColumn, FUZZ_COLOURMAP, Rasterizer};
use crate::utilities::{
    LIGHTSCALESHIFT, MAXLIGHTSCALE, ViewTables, light_row, point_on_seg_side, wall_light_row,
};
use crate::config::OverflowMode;
use crate::{FrameContext, RenderError};

/// Sprites closer than this are not drawn
const MINZ: FixedT = FixedT::from_int(4);
/// The weapon is positioned relative to this row of a 200 row screen
const BASEYCENTER: i32 = 100;

/// How a sprite is coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisColour {
    /// Colourmap number
    Lit(usize),
    /// Partial invisibility
    Fuzz,
    /// Translation table then colourmap number
    Translated(usize, usize),
}

/// A sprite that survived projection, ready to be clipped and drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisSprite {
    pub x1: i32,
    pub x2: i32,
    // for line side calculation
    pub gx: FixedT,
    pub gy: FixedT,
    // global bottom / top for silhouette clipping
    pub gz: FixedT,
    pub gzt: FixedT,
    // horizontal position of x1
    pub startfrac: FixedT,
    pub scale: FixedT,
    // negative if flipped
    pub xiscale: FixedT,
    pub texturemid: FixedT,
    /// Index in to the sprite patches
    pub patch: usize,
    pub colour: VisColour,
}

/// The colour of a sprite column for a `VisColour`
fn column_mode<'a>(
    colour: VisColour,
    ctx: &FrameContext<'a>,
) -> (ColumnMode<'a>, &'a pic_data::Colourmap) {
    let pic_data = ctx.pic_data;
    match colour {
        VisColour::Lit(map) => (ColumnMode::Solid, pic_data.colourmap(map)),
        VisColour::Fuzz => (ColumnMode::Fuzz, pic_data.colourmap(FUZZ_COLOURMAP)),
        VisColour::Translated(table, map) => (
            ColumnMode::Translated(pic_data.translation(table)),
            pic_data.colourmap(map),
        ),
    }
}

/// R_DrawMaskedColumn
///
/// Draws the posts of one column between the clip rows. `dc` carries the
/// column, colour and scale; its rows and source are filled in per post.
#[allow(clippy::too_many_arguments)]
fn draw_masked_column(
    posts: &[Post],
    dc: &DrawColumn,
    sprtopscreen: FixedT,
    spryscale: FixedT,
    mfloorclip: i32,
    mceilingclip: i32,
    rasterizer: &mut Rasterizer,
    pixels: &mut impl PixelBuffer,
) -> Result<(), RenderError> {
    let basetexturemid = dc.texturemid;

    for post in posts {
        // calculate unclipped screen coordinates for post
        let topscreen = sprtopscreen + spryscale * post.top_delta as i32;
        let bottomscreen = topscreen + spryscale * post.pixels.len() as i32;

        let yl = (topscreen.raw().wrapping_add(FRACUNIT - 1) >> 16).max(mceilingclip + 1);
        let yh = ((bottomscreen.raw().wrapping_sub(1)) >> 16).min(mfloorclip - 1);

        if yl <= yh {
            rasterizer.draw_column(
                &DrawColumn {
                    source: &post.pixels,
                    yl,
                    yh,
                    texturemid: basetexturemid - FixedT::from_int(post.top_delta as i32),
                    ..*dc
                },
                pixels,
            )?;
        }
    }
    Ok(())
}

/// R_DrawVisSprite
///
/// `mfloorclip` and `mceilingclip` are indexed by screen column.
#[allow(clippy::too_many_arguments)]
fn draw_vissprite(
    vis: &VisSprite,
    mfloorclip: &[i32],
    mceilingclip: &[i32],
    tables: &ViewTables,
    ctx: &FrameContext,
    rasterizer: &mut Rasterizer,
    pixels: &mut impl PixelBuffer,
) -> Result<(), RenderError> {
    let patch = ctx
        .pic_data
        .sprite_patch(vis.patch)
        .ok_or(RenderError::MissingPatch(vis.patch))?;
    let (mode, colourmap) = column_mode(vis.colour, ctx);

    let iscale = vis.xiscale.abs() >> tables.detail.shift();
    let sprtopscreen = tables.centeryfrac - vis.texturemid * vis.scale;
    let mut dc = DrawColumn {
        source: &[],
        colourmap,
        mode,
        x: vis.x1,
        yl: 0,
        yh: -1,
        iscale,
        texturemid: vis.texturemid,
    };

    let mut frac = vis.startfrac;
    for x in vis.x1..=vis.x2 {
        let texturecolumn = frac.raw() >> 16;
        frac += vis.xiscale;
        let Some(posts) = usize::try_from(texturecolumn)
            .ok()
            .and_then(|c| patch.column_posts(c))
        else {
            continue;
        };
        dc.x = x;
        draw_masked_column(
            posts,
            &dc,
            sprtopscreen,
            vis.scale,
            mfloorclip[x as usize],
            mceilingclip[x as usize],
            rasterizer,
            pixels,
        )?;
    }
    Ok(())
}

/// Clip value for column `x` of a drawseg's silhouette. `solid` is the value
/// for a wall that covers the whole column.
#[inline]
fn silhouette_clip(clip: SilClip, x: i32, x1: i32, solid: i32, open: i32, openings: &[i32]) -> i32 {
    match clip {
        SilClip::None => open,
        SilClip::Solid => solid,
        SilClip::Openings(start) => openings[start + (x - x1) as usize],
    }
}

impl SoftwareRenderer {
    /// R_AddSprites
    ///
    /// During BSP traversal, this adds sprites by sector. Each sector is only
    /// done once a frame.
    pub(crate) fn add_sprites(
        &mut self,
        ctx: &FrameContext,
        sector: usize,
    ) -> Result<(), RenderError> {
        if self.checked_sectors[sector] == self.validcount {
            return Ok(());
        }
        // Well, now it will be done.
        self.checked_sectors[sector] = self.validcount;

        let lightlevel = ctx.map.sectors()[sector].lightlevel;
        let spritelights = light_row(lightlevel, ctx.view.extralight);

        // Handle all things in sector.
        for i in 0..self.sector_things[sector].len() {
            let thing = &ctx.things[self.sector_things[sector][i]];
            self.project_sprite(ctx, thing, spritelights)?;
        }
        Ok(())
    }

    /// R_ProjectSprite
    ///
    /// Generates a vissprite for a thing if it might be visible.
    fn project_sprite(
        &mut self,
        ctx: &FrameContext,
        thing: &MapObject,
        spritelights: usize,
    ) -> Result<(), RenderError> {
        let view = &ctx.view;
        let tables = &self.tables;

        // transform the origin point
        let tr_x = thing.x - view.viewx;
        let tr_y = thing.y - view.viewy;

        let gxt = tr_x * view.viewcos;
        let gyt = -(tr_y * view.viewsin);
        let tz = gxt - gyt;

        // thing is behind view plane?
        if tz < MINZ {
            return Ok(());
        }

        let xscale = tables.projection / tz;

        let gxt = -(tr_x * view.viewsin);
        let gyt = tr_y * view.viewcos;
        let mut tx = -(gyt + gxt);

        // too far off the side?
        if tx.abs() > tz << 2 {
            return Ok(());
        }

        // decide which patch to use for sprite relative to player
        let sprdef = ctx
            .pic_data
            .sprite_def(thing.sprite)
            .ok_or(RenderError::MissingSprite(thing.sprite))?;
        let sprframe = sprdef
            .frames
            .get(thing.frame_index())
            .ok_or(RenderError::MissingFrame {
                sprite: thing.sprite,
                frame: thing.frame_index(),
            })?;

        let (lump, flip) = if sprframe.rotate {
            // choose a different rotation based on player view
            let ang = view.point_to_angle(thing.x, thing.y);
            let rot = (ang - thing.angle).bam().wrapping_add((ANG45 / 2) * 9) >> 29;
            sprframe.lump_for(rot as usize)
        } else {
            // use single rotation for all views
            sprframe.lump_for(0)
        };
        let patch = ctx
            .pic_data
            .sprite_patch(lump)
            .ok_or(RenderError::MissingPatch(lump))?;

        // calculate edges of the shape
        tx -= FixedT::from_int(patch.left_offset);
        let x1 = (tables.centerxfrac + tx * xscale).raw() >> 16;

        // off the right side?
        if x1 > tables.view_width {
            return Ok(());
        }

        tx += FixedT::from_int(patch.width() as i32);
        let x2 = ((tables.centerxfrac + tx * xscale).raw() >> 16) - 1;

        // off the left side
        if x2 < 0 {
            return Ok(());
        }

        if self.r_data.overflow == OverflowMode::Vanilla && self.vissprites.len() >= MAXVISSPRITES
        {
            self.r_data.note_overflow("vissprites");
            return Ok(());
        }

        // store information in a vissprite
        let gz = thing.z;
        let gzt = thing.z + FixedT::from_int(patch.top_offset);
        let vis_x1 = x1.max(0);
        let iscale = FixedT::ONE / xscale;
        let (mut startfrac, xiscale) = if flip {
            (FixedT::from_int(patch.width() as i32) - FixedT::from_raw(1), -iscale)
        } else {
            (FixedT::ZERO, iscale)
        };
        if vis_x1 > x1 {
            startfrac += xiscale * (vis_x1 - x1);
        }

        let colour = if thing.has_flag(MapObjFlag::Shadow) {
            // shadow draw
            VisColour::Fuzz
        } else {
            let map = if let Some(fixed) = view.fixedcolormap {
                // fixed map
                fixed
            } else if thing.full_bright() {
                // full bright
                0
            } else {
                // diminished light
                let index = (xscale.raw() >> (LIGHTSCALESHIFT - tables.detail.shift()))
                    .clamp(0, MAXLIGHTSCALE as i32 - 1);
                tables.scalelight[spritelights][index as usize]
            };
            match thing.translation() {
                0 => VisColour::Lit(map),
                table => VisColour::Translated(table, map),
            }
        };

        let vis = VisSprite {
            x1: vis_x1,
            x2: x2.min(tables.view_width - 1),
            gx: thing.x,
            gy: thing.y,
            gz,
            gzt,
            startfrac,
            scale: xscale << tables.detail.shift(),
            xiscale,
            texturemid: gzt - view.viewz,
            patch: lump,
            colour,
        };
        self.vissprites.push(vis);
        Ok(())
    }

    /// R_SortVisSprites, furthest first
    pub(crate) fn sort_vissprites(&mut self) {
        self.vissprites.sort_by_key(|v| v.scale);
    }

    /// R_DrawSprite
    ///
    /// Clips the sprite against every drawseg in front of it, then draws it.
    /// Masked mid textures behind the sprite are drawn first.
    fn draw_sprite(
        &mut self,
        spr: VisSprite,
        ctx: &FrameContext,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let view_height = self.tables.view_height;
        let (x1, x2) = (spr.x1 as usize, spr.x2 as usize);
        self.clipbot[x1..=x2].fill(-2);
        self.cliptop[x1..=x2].fill(-2);

        // Scan drawsegs from end to start for obscuring segs.
        // The first drawseg that has a greater scale is the clip seg.
        for ds_idx in (0..self.r_data.drawsegs.len()).rev() {
            let ds = self.r_data.drawsegs[ds_idx];
            // determine if the drawseg obscures the sprite
            if ds.x1 > spr.x2
                || ds.x2 < spr.x1
                || (ds.silhouette == 0 && ds.maskedtexturecol.is_none())
            {
                // does not cover sprite
                continue;
            }

            let r1 = ds.x1.max(spr.x1);
            let r2 = ds.x2.min(spr.x2);

            let (lowscale, scale) = if ds.scale1 > ds.scale2 {
                (ds.scale2, ds.scale1)
            } else {
                (ds.scale1, ds.scale2)
            };

            let seg = &ctx.map.segments()[ds.curline];
            if scale < spr.scale
                || (lowscale < spr.scale && point_on_seg_side(spr.gx, spr.gy, seg, ctx.map) == 0)
            {
                // masked mid texture?
                if ds.maskedtexturecol.is_some() {
                    self.render_masked_seg_range(ds_idx, r1, r2, ctx, pixels)?;
                }
                // seg is behind sprite
                continue;
            }

            // clip this piece of the sprite
            let mut silhouette = ds.silhouette;
            if spr.gz >= ds.bsilheight {
                silhouette &= !SIL_BOTTOM;
            }
            if spr.gzt <= ds.tsilheight {
                silhouette &= !SIL_TOP;
            }

            let openings = &self.r_data.visplane_render.openings;
            for x in r1..=r2 {
                let xu = x as usize;
                if silhouette & SIL_BOTTOM != 0 && self.clipbot[xu] == -2 {
                    self.clipbot[xu] =
                        silhouette_clip(ds.sprbottomclip, x, ds.x1, -1, view_height, openings);
                }
                if silhouette & SIL_TOP != 0 && self.cliptop[xu] == -2 {
                    self.cliptop[xu] =
                        silhouette_clip(ds.sprtopclip, x, ds.x1, view_height, -1, openings);
                }
            }
        }

        // all clipping has been performed, so draw the sprite
        // check for unclipped columns
        for x in x1..=x2 {
            if self.clipbot[x] == -2 {
                self.clipbot[x] = view_height;
            }
            if self.cliptop[x] == -2 {
                self.cliptop[x] = -1;
            }
        }

        draw_vissprite(
            &spr,
            &self.clipbot,
            &self.cliptop,
            &self.tables,
            ctx,
            &mut self.rasterizer,
            pixels,
        )
    }

    /// R_RenderMaskedSegRange
    ///
    /// Draws columns `x1..=x2` of a drawseg's masked mid texture. Drawn
    /// columns are marked so they are only drawn once.
    pub(crate) fn render_masked_seg_range(
        &mut self,
        ds_idx: usize,
        x1: i32,
        x2: i32,
        ctx: &FrameContext,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let ds = self.r_data.drawsegs[ds_idx];
        let Some(maskedtexturecol) = ds.maskedtexturecol else {
            return Ok(());
        };
        let map = ctx.map;
        let view = &ctx.view;
        let tables = &self.tables;

        // Calculate light table.
        // Use different light tables for horizontal / vertical / diagonal.
        let curline = &map.segments()[ds.curline];
        let frontsector = &map.sectors()[curline.frontsector];
        let Some(backsector) = curline.backsector.and_then(|b| map.sectors().get(b)) else {
            return Ok(());
        };
        let sidedef = &map.sidedefs()[curline.sidedef];
        let linedef = &map.linedefs()[curline.linedef];
        let Some(texnum) = sidedef.midtexture else {
            return Ok(());
        };
        let texture = ctx
            .pic_data
            .wall_pic(texnum)
            .ok_or(RenderError::MissingTexture(texnum))?;

        let v1 = &map.vertexes()[curline.v1];
        let v2 = &map.vertexes()[curline.v2];
        let walllights =
            &tables.scalelight[wall_light_row(frontsector.lightlevel, view.extralight, v1, v2)];

        let rw_scalestep = ds.scalestep;
        let mut spryscale = ds.scale1 + rw_scalestep * (x1 - ds.x1);

        // find positioning
        let mut texturemid = if linedef.has_flag(level::LineDefFlags::DontPegBottom) {
            frontsector.floorheight.max(backsector.floorheight)
                + FixedT::from_int(texture.height as i32)
                - view.viewz
        } else {
            frontsector.ceilingheight.min(backsector.ceilingheight) - view.viewz
        };
        texturemid += sidedef.rowoffset;

        let fixed = view.fixedcolormap;
        let view_height = tables.view_height;

        // draw the columns
        for x in x1..=x2 {
            let col = maskedtexturecol + (x - ds.x1) as usize;
            let colnum = self.r_data.visplane_render.openings[col];
            if colnum != MASKED_DONE {
                let colourmap = match fixed {
                    Some(f) => ctx.pic_data.colourmap(f),
                    None => {
                        let index = (spryscale.raw() >> LIGHTSCALESHIFT)
                            .clamp(0, MAXLIGHTSCALE as i32 - 1);
                        ctx.pic_data.colourmap(walllights[index as usize])
                    }
                };

                let sprtopscreen = tables.centeryfrac - texturemid * spryscale;
                let iscale = FixedT::from_raw((0xffff_ffffu32 / spryscale.raw().max(1) as u32) as i32);

                let openings = &self.r_data.visplane_render.openings;
                let mfloorclip =
                    silhouette_clip(ds.sprbottomclip, x, ds.x1, -1, view_height, openings);
                let mceilingclip =
                    silhouette_clip(ds.sprtopclip, x, ds.x1, view_height, -1, openings);

                // draw the texture
                draw_masked_column(
                    texture.column_posts(colnum),
                    &DrawColumn {
                        source: &[],
                        colourmap,
                        mode: ColumnMode::Solid,
                        x,
                        yl: 0,
                        yh: -1,
                        iscale,
                        texturemid,
                    },
                    sprtopscreen,
                    spryscale,
                    mfloorclip,
                    mceilingclip,
                    &mut self.rasterizer,
                    pixels,
                )?;

                self.r_data.visplane_render.openings[col] = MASKED_DONE;
            }
            spryscale += rw_scalestep;
        }
        Ok(())
    }

    /// R_DrawPSprite
    fn draw_player_sprite(
        &mut self,
        psp: &PspDef,
        spritelights: usize,
        shadow: bool,
        ctx: &FrameContext,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let Some(state) = psp.state else {
            return Ok(());
        };
        let tables = &self.tables;
        let frame = (state.frame & FF_FRAMEMASK) as usize;

        // decide which patch to use
        let sprdef = ctx
            .pic_data
            .sprite_def(state.sprite)
            .ok_or(RenderError::MissingSprite(state.sprite))?;
        let sprframe = sprdef.frames.get(frame).ok_or(RenderError::MissingFrame {
            sprite: state.sprite,
            frame,
        })?;
        let (lump, flip) = sprframe.lump_for(0);
        let patch: &SpritePic = ctx
            .pic_data
            .sprite_patch(lump)
            .ok_or(RenderError::MissingPatch(lump))?;

        // calculate edges of the shape
        let mut tx = psp.sx - FixedT::from_int(160);
        tx -= FixedT::from_int(patch.left_offset);
        let x1 = (tables.centerxfrac + tx * tables.pspritescale).raw() >> 16;

        // off the right side
        if x1 > tables.view_width {
            return Ok(());
        }

        tx += FixedT::from_int(patch.width() as i32);
        let x2 = ((tables.centerxfrac + tx * tables.pspritescale).raw() >> 16) - 1;

        // off the left side
        if x2 < 0 {
            return Ok(());
        }

        // store information in a vissprite
        let vis_x1 = x1.max(0);
        let (mut startfrac, xiscale) = if flip {
            (
                FixedT::from_int(patch.width() as i32) - FixedT::from_raw(1),
                -tables.pspriteiscale,
            )
        } else {
            (FixedT::ZERO, tables.pspriteiscale)
        };
        if vis_x1 > x1 {
            startfrac += xiscale * (vis_x1 - x1);
        }

        let colour = if shadow {
            // shadow draw
            VisColour::Fuzz
        } else if let Some(fixed) = ctx.view.fixedcolormap {
            // fixed color
            VisColour::Lit(fixed)
        } else if state.frame & FF_FULLBRIGHT != 0 {
            // full bright
            VisColour::Lit(0)
        } else {
            // local light
            VisColour::Lit(tables.scalelight[spritelights][MAXLIGHTSCALE - 1])
        };

        let vis = VisSprite {
            x1: vis_x1,
            x2: x2.min(tables.view_width - 1),
            gx: FixedT::ZERO,
            gy: FixedT::ZERO,
            gz: FixedT::ZERO,
            gzt: FixedT::ZERO,
            startfrac,
            scale: tables.pspritescale << tables.detail.shift(),
            xiscale,
            texturemid: FixedT::from_int(BASEYCENTER) + FixedT::from_raw(FRACUNIT / 2)
                - (psp.sy - FixedT::from_int(patch.top_offset)),
            patch: lump,
            colour,
        };

        draw_vissprite(
            &vis,
            &tables.screenheightarray,
            &tables.negonearray,
            tables,
            ctx,
            &mut self.rasterizer,
            pixels,
        )
    }

    /// R_DrawPlayerSprites
    fn draw_player_sprites(
        &mut self,
        psprites: &[PspDef],
        shadow: bool,
        ctx: &FrameContext,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        // get light level
        let sector = ctx.map.sector_at(ctx.view.viewx, ctx.view.viewy);
        let spritelights = light_row(sector.lightlevel, ctx.view.extralight);

        // add all active psprites
        for psp in psprites {
            self.draw_player_sprite(psp, spritelights, shadow, ctx, pixels)?;
        }
        Ok(())
    }

    /// R_DrawMasked
    ///
    /// Sprites back to front, then whatever masked mid textures are left,
    /// then the weapon.
    pub(crate) fn draw_masked(
        &mut self,
        psprites: &[PspDef],
        shadow: bool,
        ctx: &FrameContext,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        self.sort_vissprites();

        for i in 0..self.vissprites.len() {
            let spr = self.vissprites[i];
            self.draw_sprite(spr, ctx, pixels)?;
        }

        // render any remaining masked mid textures
        for ds_idx in (0..self.r_data.drawsegs.len()).rev() {
            let ds = self.r_data.drawsegs[ds_idx];
            if ds.maskedtexturecol.is_some() {
                self.render_masked_seg_range(ds_idx, ds.x1, ds.x2, ctx, pixels)?;
            }
        }

        // draw the psprites on top of everything
        self.draw_player_sprites(psprites, shadow, ctx, pixels)
    }
}

//! Floors and ceilings. The wall pass marks which rows of each column belong
//! to which visplane, then `draw_planes` turns the marked columns in to
//! horizontal spans once the walk is done.

use log::trace;
use math::{ANG90, FixedT};
use pic_data::{Colourmap, FLAT_SIZE, PicData};
use render_trait::PixelBuffer;

use crate::config::OverflowMode;
use crate::defs::{MAXOPENINGS_COLUMNS, MAXVISPLANES, VP_UNSET, Visplane};
use crate::draw::{ColumnMode, DrawColumn, DrawSpan, Rasterizer};
use crate::utilities::{FrameView, LIGHTZSHIFT, MAXLIGHTZ, ViewTables, light_row};
use crate::{FrameContext, RenderError};

const LOG_TAG: &str = "VisPlaneRender";

/// Sky texture column is `angle >> ANGLETOSKYSHIFT`
const ANGLETOSKYSHIFT: u32 = 22;
/// Sky texture row at the centre of the screen
const SKY_TEXTUREMID: FixedT = FixedT::from_int(100);

pub struct VisPlaneRender {
    // Here comes the obnoxious "visplane". Planes are kept between frames
    // and reused, only the first `lastvisplane` are live.
    pub visplanes: Vec<Visplane>,
    pub lastvisplane: usize,
    /// Index of current visplane in `self.visplanes` for floor
    pub floorplane: Option<usize>,
    /// Index of current visplane in `self.visplanes` for ceiling
    pub ceilingplane: Option<usize>,

    /// Silhouette clip values and masked texture columns for drawsegs
    pub openings: Vec<i32>,
    max_openings: usize,

    spans: PlaneSpans,
    view_width: usize,
    overflow: OverflowMode,
}

/// Span start columns and the per row cache for one plane at a time
struct PlaneSpans {
    /// spanstart holds the start of a plane span
    spanstart: Vec<i32>,
    cachedheight: Vec<FixedT>,
    cacheddistance: Vec<FixedT>,
    cachedxstep: Vec<FixedT>,
    cachedystep: Vec<FixedT>,
    basexscale: FixedT,
    baseyscale: FixedT,
}

/// What `map_plane` needs to know about the plane being drawn
struct PlaneSource<'a> {
    flat: &'a [u8],
    planeheight: FixedT,
    zlight: &'a [usize; MAXLIGHTZ],
    fixed: Option<&'a Colourmap>,
}

impl VisPlaneRender {
    pub fn new(view_width: usize, view_height: usize, overflow: OverflowMode) -> Self {
        VisPlaneRender {
            visplanes: Vec::with_capacity(MAXVISPLANES),
            lastvisplane: 0,
            floorplane: None,
            ceilingplane: None,
            openings: Vec::with_capacity(view_width * MAXOPENINGS_COLUMNS),
            max_openings: view_width * MAXOPENINGS_COLUMNS,
            spans: PlaneSpans {
                spanstart: vec![0; view_height],
                cachedheight: vec![FixedT::ZERO; view_height],
                cacheddistance: vec![FixedT::ZERO; view_height],
                cachedxstep: vec![FixedT::ZERO; view_height],
                cachedystep: vec![FixedT::ZERO; view_height],
                basexscale: FixedT::ZERO,
                baseyscale: FixedT::ZERO,
            },
            view_width,
            overflow,
        }
    }

    /// R_ClearPlanes
    /// At begining of frame.
    pub fn clear_planes(&mut self, view: &FrameView, tables: &ViewTables) {
        self.lastvisplane = 0;
        self.floorplane = None;
        self.ceilingplane = None;
        self.openings.clear();
        self.spans.cachedheight.fill(FixedT::ZERO);

        // left to right mapping
        let angle = view.viewangle - ANG90;
        // scale will be unit scale at SCREENWIDTH/2 distance
        self.spans.basexscale = angle.cos() / tables.centerxfrac;
        self.spans.baseyscale = -(angle.sin() / tables.centerxfrac);
    }

    /// The live planes of this frame
    #[inline]
    pub fn planes(&self) -> &[Visplane] {
        &self.visplanes[..self.lastvisplane]
    }

    /// Take the next free plane, growing the pool when allowed
    fn new_plane(&mut self) -> Result<usize, RenderError> {
        if self.lastvisplane == self.visplanes.len() {
            if self.overflow == OverflowMode::Vanilla && self.visplanes.len() >= MAXVISPLANES {
                return Err(RenderError::VisplaneOverflow(MAXVISPLANES));
            }
            self.visplanes.push(Visplane::new(self.view_width));
        }
        self.lastvisplane += 1;
        Ok(self.lastvisplane - 1)
    }

    /// R_FindPlane
    ///
    /// Find a plane matching height, picnum, light level. Otherwise return a
    /// new plane. Sky planes all share height 0 and light 0.
    pub fn find_plane(
        &mut self,
        mut height: FixedT,
        picnum: usize,
        mut light_level: i32,
        sky_num: Option<usize>,
    ) -> Result<usize, RenderError> {
        if sky_num == Some(picnum) {
            // all skys map together
            height = FixedT::ZERO;
            light_level = 0;
        }

        if let Some(index) = self.planes().iter().position(|plane| {
            height == plane.height && picnum == plane.picnum && light_level == plane.lightlevel
        }) {
            return Ok(index);
        }

        let index = self.new_plane()?;
        self.visplanes[index].reset(height, picnum, light_level, self.view_width as i32, -1);
        Ok(index)
    }

    /// R_CheckPlane
    ///
    /// Check if this plane can be extended over `start..=stop`, otherwise
    /// split off a new plane with the same key.
    pub fn check_plane(
        &mut self,
        plane_idx: usize,
        start: i32,
        stop: i32,
    ) -> Result<usize, RenderError> {
        let plane = &mut self.visplanes[plane_idx];

        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };

        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        let overlap = (intrl..=intrh).any(|x| plane.top[x as usize] != VP_UNSET);
        if !overlap {
            plane.minx = unionl;
            plane.maxx = unionh;
            // use the same one
            return Ok(plane_idx);
        }

        // make a new visplane
        let (height, picnum, lightlevel) = (plane.height, plane.picnum, plane.lightlevel);
        let index = self.new_plane()?;
        self.visplanes[index].reset(height, picnum, lightlevel, start, stop);
        Ok(index)
    }

    /// Copy clip values in to openings storage, returns where they start
    pub fn push_openings(&mut self, values: &[i32]) -> Result<usize, RenderError> {
        self.check_openings(values.len())?;
        let start = self.openings.len();
        self.openings.extend_from_slice(values);
        Ok(start)
    }

    /// Reserve `len` openings filled with `value`, returns where they start
    pub fn alloc_openings(&mut self, len: usize, value: i32) -> Result<usize, RenderError> {
        self.check_openings(len)?;
        let start = self.openings.len();
        self.openings.resize(start + len, value);
        Ok(start)
    }

    #[inline]
    fn check_openings(&self, len: usize) -> Result<(), RenderError> {
        if self.overflow == OverflowMode::Vanilla && self.openings.len() + len > self.max_openings
        {
            return Err(RenderError::OpeningsOverflow(self.max_openings));
        }
        Ok(())
    }

    /// R_DrawPlanes
    ///
    /// At the end of each frame.
    pub fn draw_planes(
        &mut self,
        tables: &ViewTables,
        ctx: &FrameContext,
        rasterizer: &mut Rasterizer,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let view = &ctx.view;
        let pic_data = ctx.pic_data;
        trace!(target: LOG_TAG, "Drawing {} visplanes", self.lastvisplane);

        for plane in &self.visplanes[..self.lastvisplane] {
            if plane.minx > plane.maxx {
                continue;
            }

            if pic_data.is_sky(plane.picnum) {
                draw_sky(plane, tables, view, pic_data, rasterizer, pixels)?;
                continue;
            }

            let flat = pic_data
                .flat(plane.picnum)
                .filter(|f| f.data.len() == FLAT_SIZE * FLAT_SIZE)
                .ok_or(RenderError::MissingFlat(plane.picnum))?;
            let source = PlaneSource {
                flat: &flat.data,
                planeheight: (plane.height - view.viewz).abs(),
                zlight: &tables.zlight[light_row(plane.lightlevel, view.extralight)],
                fixed: view.fixedcolormap.map(|c| pic_data.colourmap(c)),
            };

            for x in plane.minx..=plane.maxx + 1 {
                let (t1, b1) = plane.column(x - 1);
                let (t2, b2) = plane.column(x);
                self.spans.make_spans(
                    x, t1, b1, t2, b2, &source, tables, view, pic_data, rasterizer, pixels,
                )?;
            }
        }
        Ok(())
    }
}

/// Sky is allways drawn full bright, i.e. colormaps[0] is used. Because of
/// this hack, sky is not affected by INVUL inverse mapping.
fn draw_sky(
    plane: &Visplane,
    tables: &ViewTables,
    view: &FrameView,
    pic_data: &PicData,
    rasterizer: &mut Rasterizer,
    pixels: &mut impl PixelBuffer,
) -> Result<(), RenderError> {
    let sky = pic_data
        .wall_pic(pic_data.sky_pic())
        .ok_or(RenderError::MissingTexture(pic_data.sky_pic()))?;
    let iscale = tables.pspriteiscale >> tables.detail.shift();

    for x in plane.minx..=plane.maxx {
        let (top, bottom) = plane.column(x);
        if top > bottom {
            continue;
        }
        let angle = (view.viewangle + tables.xtoviewangle[x as usize]).bam() >> ANGLETOSKYSHIFT;
        rasterizer.draw_column(
            &DrawColumn {
                source: sky.column(angle as i32),
                colourmap: pic_data.colourmap(0),
                mode: ColumnMode::Solid,
                x,
                yl: top,
                yh: bottom,
                iscale,
                texturemid: SKY_TEXTUREMID,
            },
            pixels,
        )?;
    }
    Ok(())
}

impl PlaneSpans {
    /// R_MakeSpans
    ///
    /// Compares the rows covered by column `x - 1` (t1..=b1) with column `x`
    /// (t2..=b2). Rows that end are drawn, rows that start are remembered.
    #[allow(clippy::too_many_arguments)]
    fn make_spans(
        &mut self,
        x: i32,
        mut t1: i32,
        mut b1: i32,
        mut t2: i32,
        mut b2: i32,
        source: &PlaneSource,
        tables: &ViewTables,
        view: &FrameView,
        pic_data: &PicData,
        rasterizer: &mut Rasterizer,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        while t1 < t2 && t1 <= b1 {
            let x1 = self.spanstart[t1 as usize];
            self.map_plane(t1, x1, x - 1, source, tables, view, pic_data, rasterizer, pixels)?;
            t1 += 1;
        }
        while b1 > b2 && b1 >= t1 {
            let x1 = self.spanstart[b1 as usize];
            self.map_plane(b1, x1, x - 1, source, tables, view, pic_data, rasterizer, pixels)?;
            b1 -= 1;
        }

        while t2 < t1 && t2 <= b2 {
            self.spanstart[t2 as usize] = x;
            t2 += 1;
        }
        while b2 > b1 && b2 >= t2 {
            self.spanstart[b2 as usize] = x;
            b2 -= 1;
        }
        Ok(())
    }

    /// R_MapPlane
    ///
    /// Draws one row of the plane from `x1` to `x2`.
    #[allow(clippy::too_many_arguments)]
    fn map_plane(
        &mut self,
        y: i32,
        x1: i32,
        x2: i32,
        source: &PlaneSource,
        tables: &ViewTables,
        view: &FrameView,
        pic_data: &PicData,
        rasterizer: &mut Rasterizer,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let row = y as usize;
        let (distance, xstep, ystep) = if source.planeheight != self.cachedheight[row] {
            let distance = source.planeheight * tables.yslope[row];
            let xstep = distance * self.basexscale;
            let ystep = distance * self.baseyscale;
            self.cachedheight[row] = source.planeheight;
            self.cacheddistance[row] = distance;
            self.cachedxstep[row] = xstep;
            self.cachedystep[row] = ystep;
            (distance, xstep, ystep)
        } else {
            (
                self.cacheddistance[row],
                self.cachedxstep[row],
                self.cachedystep[row],
            )
        };

        let x1u = x1.clamp(0, tables.view_width - 1) as usize;
        let length = distance * tables.distscale[x1u];
        let angle = view.viewangle + tables.xtoviewangle[x1u];
        let xfrac = view.viewx + angle.cos() * length;
        let yfrac = -view.viewy - angle.sin() * length;

        let colourmap = match source.fixed {
            Some(fixed) => fixed,
            None => {
                let index = (distance.raw() >> LIGHTZSHIFT).clamp(0, MAXLIGHTZ as i32 - 1);
                pic_data.colourmap(source.zlight[index as usize])
            }
        };

        rasterizer.draw_span(
            &DrawSpan {
                source: source.flat,
                colourmap,
                y,
                x1,
                x2,
                xfrac,
                yfrac,
                xstep,
                ystep,
            },
            pixels,
        )
    }
}

#[cfg(test)]
mod tests {
    use math::FixedT;

    use super::VisPlaneRender;
    use crate::RenderError;
    use crate::config::OverflowMode;
    use crate::defs::MAXVISPLANES;

    fn fill(planes: &mut VisPlaneRender, idx: usize, x1: i32, x2: i32) {
        for x in x1..=x2 {
            planes.visplanes[idx].top[x as usize] = 10;
            planes.visplanes[idx].bottom[x as usize] = 20;
        }
    }

    #[test]
    fn find_reuses_matching_key() {
        let mut planes = VisPlaneRender::new(320, 200, OverflowMode::Grow);
        let a = planes.find_plane(FixedT::from_int(0), 1, 160, None).unwrap();
        let b = planes.find_plane(FixedT::from_int(0), 1, 160, None).unwrap();
        let c = planes.find_plane(FixedT::from_int(8), 1, 160, None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(planes.planes().len(), 2);
        assert!(planes.planes()[a].minx > planes.planes()[a].maxx);
    }

    #[test]
    fn sky_planes_merge() {
        let mut planes = VisPlaneRender::new(320, 200, OverflowMode::Grow);
        let a = planes.find_plane(FixedT::from_int(128), 5, 200, Some(5)).unwrap();
        let b = planes.find_plane(FixedT::from_int(72), 5, 96, Some(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(planes.planes()[a].height, FixedT::ZERO);
        assert_eq!(planes.planes()[a].lightlevel, 0);
    }

    #[test]
    fn check_extends_disjoint_range() {
        let mut planes = VisPlaneRender::new(320, 200, OverflowMode::Grow);
        let p = planes.find_plane(FixedT::ZERO, 1, 160, None).unwrap();
        let p = planes.check_plane(p, 10, 50).unwrap();
        fill(&mut planes, p, 10, 50);
        let q = planes.check_plane(p, 51, 90).unwrap();
        assert_eq!(p, q);
        assert_eq!((planes.visplanes[p].minx, planes.visplanes[p].maxx), (10, 90));
    }

    #[test]
    fn check_splits_on_overlap() {
        let mut planes = VisPlaneRender::new(320, 200, OverflowMode::Grow);
        let p = planes.find_plane(FixedT::ZERO, 1, 160, None).unwrap();
        let p = planes.check_plane(p, 10, 50).unwrap();
        fill(&mut planes, p, 10, 50);
        let q = planes.check_plane(p, 40, 60).unwrap();
        assert_ne!(p, q);
        let split = &planes.visplanes[q];
        assert_eq!((split.minx, split.maxx), (40, 60));
        assert_eq!(split.filled_columns(), 0);
        assert_eq!(split.picnum, 1);
    }

    #[test]
    fn check_is_idempotent() {
        let mut planes = VisPlaneRender::new(320, 200, OverflowMode::Grow);
        let p = planes.find_plane(FixedT::ZERO, 1, 160, None).unwrap();
        let first = planes.check_plane(p, 10, 50).unwrap();
        let again = planes.check_plane(first, 10, 50).unwrap();
        assert_eq!(first, again);
        assert_eq!(planes.planes().len(), 1);
        let plane = &planes.visplanes[first];
        assert_eq!((plane.minx, plane.maxx), (10, 50));
    }

    #[test]
    fn vanilla_limit() {
        let mut planes = VisPlaneRender::new(64, 64, OverflowMode::Vanilla);
        for i in 0..MAXVISPLANES {
            planes.find_plane(FixedT::from_int(i as i32), 1, 0, None).unwrap();
        }
        assert_eq!(
            planes.find_plane(FixedT::from_int(-1), 1, 0, None),
            Err(RenderError::VisplaneOverflow(MAXVISPLANES))
        );

        let mut grow = VisPlaneRender::new(64, 64, OverflowMode::Grow);
        for i in 0..=MAXVISPLANES {
            grow.find_plane(FixedT::from_int(i as i32), 1, 0, None).unwrap();
        }
        assert_eq!(grow.planes().len(), MAXVISPLANES + 1);
    }

    #[test]
    fn openings_limit() {
        let mut planes = VisPlaneRender::new(4, 64, OverflowMode::Vanilla);
        let start = planes.alloc_openings(200, 0).unwrap();
        assert_eq!(start, 0);
        let next = planes.push_openings(&[1, 2, 3]).unwrap();
        assert_eq!(next, 200);
        assert_eq!(&planes.openings[200..], &[1, 2, 3]);
        assert_eq!(
            planes.alloc_openings(100, 0),
            Err(RenderError::OpeningsOverflow(256))
        );
    }
}

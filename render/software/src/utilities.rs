//! Screen geometry that only changes with the view size, and the per frame
//! view set up. Everything here is integer fixed point so the walls, flats
//! and sprites all agree on which column a given angle lands in.

use level::{MapData, Segment, Vertex, ViewPoint};
use math::trig::{ANGLETOFINESHIFT, FINEANGLES, finecosine, finesine, finetangent};
use math::{ANG90, Angle, DivLine, FRACUNIT, FixedT, point_to_angle, point_to_dist};
use pic_data::NUMCOLORMAPS;

use crate::config::{Detail, RenderConfig};

/// 90 degrees in fine angles
pub const FIELDOFVIEW: usize = 2048;

pub const LIGHTLEVELS: usize = 16;
pub const LIGHTSEGSHIFT: i32 = 4;
pub const MAXLIGHTSCALE: usize = 48;
pub const LIGHTSCALESHIFT: u32 = 12;
pub const MAXLIGHTZ: usize = 128;
pub const LIGHTZSHIFT: u32 = 20;
const DISTMAP: i32 = 2;

/// The original screen width everything is proportioned to
const SCREENWIDTH: i32 = 320;

/// Lowest scale a wall column can get
const MIN_SCALE: i32 = 256;
/// Highest scale a wall column can get
const MAX_SCALE: i32 = 64 * FRACUNIT;

/// Light level row for a sector light, clamped to the table
#[inline]
pub fn light_row(lightlevel: i32, extralight: i32) -> usize {
    ((lightlevel >> LIGHTSEGSHIFT) + extralight).clamp(0, LIGHTLEVELS as i32 - 1) as usize
}

/// Light level row for a wall between `v1` and `v2`. Walls running east to
/// west are a row darker, north to south a row brighter. The clamp comes
/// after the adjustment.
#[inline]
pub fn wall_light_row(lightlevel: i32, extralight: i32, v1: &Vertex, v2: &Vertex) -> usize {
    let mut lightnum = (lightlevel >> LIGHTSEGSHIFT) + extralight;
    if v1.y == v2.y {
        lightnum -= 1;
    } else if v1.x == v2.x {
        lightnum += 1;
    }
    lightnum.clamp(0, LIGHTLEVELS as i32 - 1) as usize
}

/// Everything worked out from the view size. Built once per renderer, the
/// Doom functions are `R_ExecuteSetViewSize`, `R_InitTextureMapping` and
/// `R_InitLightTables`.
#[derive(Debug, Clone)]
pub struct ViewTables {
    pub detail: Detail,
    /// Columns the geometry works in, half the screen in low detail
    pub view_width: i32,
    pub view_height: i32,
    pub centerx: i32,
    pub centery: i32,
    pub centerxfrac: FixedT,
    pub centeryfrac: FixedT,
    pub projection: FixedT,

    /// Screen column for a fine angle, `FINEANGLES / 2` entries from the
    /// right edge of the view cone to the left
    pub viewangletox: Vec<i32>,
    /// The view relative angle of each column edge, `view_width + 1`
    /// entries
    pub xtoviewangle: Vec<Angle>,
    /// Angle of the leftmost column, anything wider is outside the view
    pub clipangle: Angle,

    /// Distance to a flat of height 1 for each screen row
    pub yslope: Vec<FixedT>,
    /// Stretch for the columns away from the centre
    pub distscale: Vec<FixedT>,

    /// Colourmap number by light level and wall/sprite scale
    pub scalelight: Vec<[usize; MAXLIGHTSCALE]>,
    /// Colourmap number by light level and flat distance
    pub zlight: Vec<[usize; MAXLIGHTZ]>,

    pub pspritescale: FixedT,
    pub pspriteiscale: FixedT,

    /// Unclipped sprite bottoms, `view_height` in every column
    pub screenheightarray: Vec<i32>,
    /// Unclipped sprite tops, -1 in every column
    pub negonearray: Vec<i32>,
}

impl ViewTables {
    /// The config must have been validated
    pub fn new(config: &RenderConfig) -> Self {
        let detail = config.detail;
        let view_width = config.view_width() as i32;
        let view_height = config.height as i32;

        let centerx = view_width / 2;
        let centery = view_height / 2;
        let centerxfrac = FixedT::from_int(centerx);
        let centeryfrac = FixedT::from_int(centery);

        let (viewangletox, xtoviewangle) = texture_mapping(view_width, centerxfrac);
        let clipangle = xtoviewangle[0];

        let full_width = view_width << detail.shift();
        let yslope = (0..view_height)
            .map(|i| {
                let dy = FixedT::from_raw(((i - view_height / 2) << 16) + FRACUNIT / 2).abs();
                FixedT::from_raw((full_width / 2) * FRACUNIT) / dy
            })
            .collect();

        let distscale = xtoviewangle[..view_width as usize]
            .iter()
            .map(|a| FixedT::ONE / finecosine(a.fine_index()).abs())
            .collect();

        let mut scalelight = vec![[0; MAXLIGHTSCALE]; LIGHTLEVELS];
        let mut zlight = vec![[0; MAXLIGHTZ]; LIGHTLEVELS];
        for i in 0..LIGHTLEVELS {
            let startmap = ((LIGHTLEVELS - 1 - i) * 2 * NUMCOLORMAPS / LIGHTLEVELS) as i32;
            for (j, level) in zlight[i].iter_mut().enumerate() {
                let scale = FixedT::from_int(SCREENWIDTH / 2)
                    / FixedT::from_raw(((j as i32) + 1) << LIGHTZSHIFT);
                let scale = scale.raw() >> LIGHTSCALESHIFT;
                *level = (startmap - scale / DISTMAP).clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
            }
            for (j, level) in scalelight[i].iter_mut().enumerate() {
                let l = startmap - (j as i32 * SCREENWIDTH / full_width) / DISTMAP;
                *level = l.clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
            }
        }

        Self {
            detail,
            view_width,
            view_height,
            centerx,
            centery,
            centerxfrac,
            centeryfrac,
            projection: centerxfrac,
            viewangletox,
            xtoviewangle,
            clipangle,
            yslope,
            distscale,
            scalelight,
            zlight,
            pspritescale: FixedT::from_raw(FRACUNIT * view_width / SCREENWIDTH),
            pspriteiscale: FixedT::from_raw(FRACUNIT * SCREENWIDTH / view_width),
            screenheightarray: vec![view_height; view_width as usize],
            negonearray: vec![-1; view_width as usize],
        }
    }

    /// R_ClipAngles
    ///
    /// Takes the two view relative end angles of a line and returns the
    /// screen column range `x1..x2` it covers, or `None` when it is outside
    /// the view cone or less than a column wide.
    pub fn clip_angles(&self, mut angle1: Angle, mut angle2: Angle) -> Option<(i32, i32)> {
        let clipangle = self.clipangle;
        let clip2 = clipangle.bam().wrapping_mul(2);
        let span = (angle1 - angle2).bam();

        let mut tspan = angle1 + clipangle;
        if tspan.bam() > clip2 {
            tspan -= Angle::new(clip2);
            // Totally off the left edge?
            if tspan.bam() >= span {
                return None;
            }
            angle1 = clipangle;
        }

        tspan = clipangle - angle2;
        if tspan.bam() > clip2 {
            tspan -= Angle::new(clip2);
            // Totally off the right edge?
            if tspan.bam() >= span {
                return None;
            }
            angle2 = -clipangle;
        }

        // The seg is in the view range, but not necessarily visible.
        let x1 = self.viewangletox[(angle1 + ANG90).fine_index()];
        let x2 = self.viewangletox[(angle2 + ANG90).fine_index()];
        if x1 == x2 {
            return None;
        }
        Some((x1, x2))
    }
}

/// R_InitTextureMapping
fn texture_mapping(view_width: i32, centerxfrac: FixedT) -> (Vec<i32>, Vec<Angle>) {
    // Use tangent table to generate viewangletox: viewangletox will give
    // the next greatest x after the view angle.
    let focallength = centerxfrac / finetangent(FINEANGLES / 4 + FIELDOFVIEW / 2);
    let mut viewangletox: Vec<i32> = (0..FINEANGLES / 2)
        .map(|i| {
            let tangent = finetangent(i);
            if tangent.raw() > FRACUNIT * 2 {
                -1
            } else if tangent.raw() < -FRACUNIT * 2 {
                view_width + 1
            } else {
                let t = (tangent * focallength).raw();
                let t = (centerxfrac.raw() - t + FRACUNIT - 1) >> 16;
                t.clamp(-1, view_width + 1)
            }
        })
        .collect();

    // Scan viewangletox to generate xtoviewangle: xtoviewangle will give
    // the smallest view angle that maps to x.
    let xtoviewangle = (0..=view_width)
        .map(|x| {
            let i = viewangletox
                .iter()
                .position(|t| *t <= x)
                .unwrap_or(viewangletox.len() - 1);
            Angle::new(((i as u32) << ANGLETOFINESHIFT).wrapping_sub(ANG90))
        })
        .collect();

    // Take out the fencepost cases from viewangletox.
    for t in viewangletox.iter_mut() {
        if *t == -1 {
            *t = 0;
        } else if *t == view_width + 1 {
            *t = view_width;
        }
    }

    (viewangletox, xtoviewangle)
}

/// The view for a single frame. R_SetupFrame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub viewx: FixedT,
    pub viewy: FixedT,
    pub viewz: FixedT,
    pub viewangle: Angle,
    pub viewsin: FixedT,
    pub viewcos: FixedT,
    pub extralight: i32,
    pub fixedcolormap: Option<usize>,
}

impl FrameView {
    pub fn new(view: &ViewPoint) -> Self {
        Self {
            viewx: view.x,
            viewy: view.y,
            viewz: view.z,
            viewangle: view.angle,
            viewsin: view.angle.sin(),
            viewcos: view.angle.cos(),
            extralight: view.extralight,
            fixedcolormap: view.fixedcolormap,
        }
    }

    /// R_PointToAngle, from the view point
    #[inline]
    pub fn point_to_angle(&self, x: FixedT, y: FixedT) -> Angle {
        point_to_angle(x - self.viewx, y - self.viewy)
    }

    /// R_PointToDist, from the view point
    #[inline]
    pub fn point_to_dist(&self, x: FixedT, y: FixedT) -> FixedT {
        point_to_dist(x - self.viewx, y - self.viewy)
    }
}

/// R_ScaleFromGlobalAngle
///
/// Returns the texture mapping scale for the current line (horizontal span)
/// at the given angle. `rw_distance` must be calculated first.
pub fn scale_from_global_angle(
    visangle: Angle,
    rw_normalangle: Angle,
    rw_distance: FixedT,
    view: &FrameView,
    tables: &ViewTables,
) -> FixedT {
    // both sines are always positive
    let anglea = Angle::A90 + (visangle - view.viewangle);
    let angleb = Angle::A90 + (visangle - rw_normalangle);
    let sinea = finesine(anglea.fine_index());
    let sineb = finesine(angleb.fine_index());
    let num = (tables.projection * sineb) << tables.detail.shift();
    let den = rw_distance * sinea;

    if den.raw() > num.raw() >> 16 {
        let scale = num / den;
        FixedT::from_raw(scale.raw().clamp(MIN_SCALE, MAX_SCALE))
    } else {
        FixedT::from_raw(MAX_SCALE)
    }
}

/// R_PointOnSegSide, 0 for the front
#[inline]
pub fn point_on_seg_side(x: FixedT, y: FixedT, seg: &Segment, map: &MapData) -> usize {
    let v1 = &map.vertexes()[seg.v1];
    let v2 = &map.vertexes()[seg.v2];
    DivLine::from_points(v1.x, v1.y, v2.x, v2.y).point_on_side(x, y)
}

#[cfg(test)]
mod tests {
    use math::{ANG90, Angle, FRACUNIT, FixedT};

    use level::Vertex;

    use super::{FrameView, ViewTables, light_row, scale_from_global_angle, wall_light_row};
    use crate::config::{Detail, RenderConfig};

    #[test]
    fn classic_tables() {
        let t = ViewTables::new(&RenderConfig::default());
        assert_eq!(t.centerx, 160);
        assert_eq!(t.centery, 100);
        assert_eq!(t.xtoviewangle.len(), 321);
        // 90 degree field of view, so the edge is close to 45 degrees
        let edge = t.clipangle.bam() as i64 - (ANG90 / 2) as i64;
        assert!(edge.abs() < 1 << 22, "{:#x}", t.clipangle.bam());
        assert_eq!(t.pspritescale.raw(), FRACUNIT);
    }

    #[test]
    fn columns_run_left_to_right() {
        let t = ViewTables::new(&RenderConfig::default());
        // larger view angles are further left
        for pair in t.xtoviewangle.windows(2) {
            assert!((pair[0] - pair[1]).bam() < ANG90, "{pair:?}");
        }
        for x in &t.viewangletox {
            assert!((0..=320).contains(x));
        }
        // the centre column looks straight ahead
        let mid = t.xtoviewangle[160].bam() as i32;
        assert!(mid.abs() < 1 << 23);
    }

    #[test]
    fn clipping_angles() {
        let t = ViewTables::new(&RenderConfig::default());
        // a line straight across the view from left edge to right edge
        let (x1, x2) = t
            .clip_angles(Angle::new(ANG90 / 2), Angle::new((ANG90 / 2).wrapping_neg()))
            .unwrap();
        assert_eq!(x1, 0);
        assert_eq!(x2, 320);
        // behind the viewer
        assert!(
            t.clip_angles(Angle::new(ANG90 * 2 + 10), Angle::new(ANG90 * 2 - 10))
                .is_none()
        );
    }

    #[test]
    fn lights_get_darker() {
        let t = ViewTables::new(&RenderConfig::default());
        // brightest sector close up is full bright
        assert_eq!(t.scalelight[15][47], 0);
        assert!(t.scalelight[0][0] > t.scalelight[15][0]);
        // flats get darker with distance
        assert!(t.zlight[8][0] < t.zlight[8][127]);
        assert_eq!(light_row(255, 0), 15);
        assert_eq!(light_row(0, -1), 0);
        assert_eq!(light_row(128, 2), 10);
    }

    #[test]
    fn wall_light_adjusts_before_clamping() {
        let origin = Vertex::new(0, 0);
        let east = Vertex::new(64, 0);
        let north = Vertex::new(0, 64);
        let diagonal = Vertex::new(64, 64);

        assert_eq!(wall_light_row(128, 0, &origin, &east), 7);
        assert_eq!(wall_light_row(128, 0, &origin, &north), 9);
        assert_eq!(wall_light_row(128, 0, &origin, &diagonal), 8);
        // a bright sector with extra light stays at the top row on a
        // horizontal wall, the darkening comes off the unclamped level
        assert_eq!(wall_light_row(255, 2, &origin, &east), 15);
        assert_eq!(wall_light_row(255, 0, &origin, &east), 14);
        assert_eq!(wall_light_row(0, 0, &origin, &north), 1);
        assert_eq!(wall_light_row(0, 0, &origin, &east), 0);
    }

    #[test]
    fn low_detail_tables() {
        let cfg = RenderConfig {
            detail: Detail::Low,
            ..RenderConfig::default()
        };
        let t = ViewTables::new(&cfg);
        assert_eq!(t.view_width, 160);
        assert_eq!(t.distscale.len(), 160);
        // rows still measured in full size pixels
        let high = ViewTables::new(&RenderConfig::default());
        assert_eq!(t.yslope, high.yslope);
    }

    #[test]
    fn wall_scale() {
        let t = ViewTables::new(&RenderConfig::default());
        let view = FrameView::default();
        // wall facing the viewer head on, 160 units away, its normal points
        // the same way as the view
        let scale = scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            FixedT::from_int(160),
            &view,
            &t,
        );
        assert!((scale.raw() - FRACUNIT).abs() <= 2, "{scale:?}");
        // right on top of it
        let close =
            scale_from_global_angle(Angle::ZERO, Angle::ZERO, FixedT::from_raw(1), &view, &t);
        assert_eq!(close.raw(), 64 * FRACUNIT);
    }
}

//! Column and span drawers. The geometry code fills in a `DrawColumn` or
//! `DrawSpan` and the `Rasterizer` turns it in to pixels.
//!
//! Coordinates are view coordinates: `x` is a geometry column (half width in
//! low detail) and rows are full height.

use math::{FRACBITS, FixedT};
use pic_data::{Colourmap, FLAT_SIZE};
use render_trait::PixelBuffer;

use crate::RenderError;
use crate::config::Detail;

/// The colourmap used for the darkening under a fuzz column
pub const FUZZ_COLOURMAP: usize = 6;

const FUZZTABLE: usize = 50;
/// Rows up (-1) or down (1) the fuzz effect copies from
const FUZZOFFSET: [i32; FUZZTABLE] = [
    1, -1, 1, -1, 1, 1, -1, 1, 1, -1, 1, 1, 1, -1, 1, 1, 1, -1, -1, -1, -1, 1, -1, -1, 1, 1, 1, 1,
    -1, 1, -1, 1, 1, -1, -1, 1, 1, -1, -1, -1, -1, 1, 1, 1, 1, -1, 1, 1, -1, 1,
];

/// How a column turns texels in to pixels
#[derive(Debug, Clone, Copy)]
pub enum ColumnMode<'a> {
    Solid,
    /// Darken what is already on screen, the source is ignored
    Fuzz,
    /// Remap through a translation table before the colourmap
    Translated(&'a Colourmap),
}

/// R_DrawColumn inputs
#[derive(Debug, Clone, Copy)]
pub struct DrawColumn<'a> {
    pub source: &'a [u8],
    pub colourmap: &'a Colourmap,
    pub mode: ColumnMode<'a>,
    pub x: i32,
    pub yl: i32,
    pub yh: i32,
    pub iscale: FixedT,
    pub texturemid: FixedT,
}

/// R_DrawSpan inputs
#[derive(Debug, Clone, Copy)]
pub struct DrawSpan<'a> {
    /// A 64x64 flat
    pub source: &'a [u8],
    pub colourmap: &'a Colourmap,
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub xfrac: FixedT,
    pub yfrac: FixedT,
    pub xstep: FixedT,
    pub ystep: FixedT,
}

#[derive(Debug, Clone)]
pub struct Rasterizer {
    detail: Detail,
    view_width: i32,
    view_height: i32,
    centery: i32,
    fuzzpos: usize,
}

impl Rasterizer {
    pub fn new(detail: Detail, view_width: i32, view_height: i32) -> Self {
        Self {
            detail,
            view_width,
            view_height,
            centery: view_height / 2,
            fuzzpos: 0,
        }
    }

    /// Start each frame on the same fuzz pattern
    pub fn reset(&mut self) {
        self.fuzzpos = 0;
    }

    #[inline]
    fn check(&self, x1: i32, x2: i32, y1: i32, y2: i32) -> Result<(), RenderError> {
        if x1 < 0 || x2 >= self.view_width || x1 > x2 || y1 < 0 || y2 >= self.view_height {
            return Err(RenderError::OutOfBounds { x: x1, y1, y2 });
        }
        Ok(())
    }

    /// Draw a vertical run of texels, `yl..=yh` inclusive. An empty run is
    /// not an error.
    pub fn draw_column(
        &mut self,
        dc: &DrawColumn,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        let (mut yl, mut yh) = (dc.yl, dc.yh);
        if matches!(dc.mode, ColumnMode::Fuzz) {
            // Adjust borders. Low...
            if yl == 0 {
                yl = 1;
            }
            // .. and high.
            if yh == self.view_height - 1 {
                yh = self.view_height - 2;
            }
        }
        if yh < yl {
            return Ok(());
        }
        self.check(dc.x, dc.x, yl, yh)?;

        let pitch = pixels.pitch();
        let shift = self.detail.shift();
        let x = (dc.x << shift) as usize;
        let doubled = self.detail == Detail::Low;
        let buf = pixels.buf_mut();

        match dc.mode {
            ColumnMode::Fuzz => {
                for y in yl..=yh {
                    let pos = y as usize * pitch + x;
                    let from = (y + FUZZOFFSET[self.fuzzpos]) as usize * pitch + x;
                    let px = dc.colourmap[buf[from] as usize];
                    buf[pos] = px;
                    if doubled {
                        buf[pos + 1] = dc.colourmap[buf[from + 1] as usize];
                    }
                    self.fuzzpos = (self.fuzzpos + 1) % FUZZTABLE;
                }
            }
            ColumnMode::Solid | ColumnMode::Translated(_) => {
                let len = dc.source.len() as i32;
                if len == 0 {
                    return Ok(());
                }
                let mut frac = dc.texturemid + dc.iscale * (yl - self.centery);
                for y in yl..=yh {
                    let texel = dc.source[(frac.raw() >> FRACBITS).rem_euclid(len) as usize];
                    let texel = match dc.mode {
                        ColumnMode::Translated(table) => table[texel as usize],
                        _ => texel,
                    };
                    let px = dc.colourmap[texel as usize];
                    let pos = y as usize * pitch + x;
                    buf[pos] = px;
                    if doubled {
                        buf[pos + 1] = px;
                    }
                    frac += dc.iscale;
                }
            }
        }
        Ok(())
    }

    /// Draw a horizontal run of a flat, `x1..=x2` inclusive
    pub fn draw_span(
        &mut self,
        ds: &DrawSpan,
        pixels: &mut impl PixelBuffer,
    ) -> Result<(), RenderError> {
        self.check(ds.x1, ds.x2, ds.y, ds.y)?;
        if ds.source.len() < FLAT_SIZE * FLAT_SIZE {
            return Ok(());
        }

        let pitch = pixels.pitch();
        let shift = self.detail.shift();
        let doubled = self.detail == Detail::Low;
        let row = ds.y as usize * pitch;
        let buf = pixels.buf_mut();

        let mut xfrac = ds.xfrac.raw();
        let mut yfrac = ds.yfrac.raw();
        for x in ds.x1..=ds.x2 {
            // Current texture index in u,v.
            let spot = ((yfrac >> (16 - 6)) & (63 * 64)) + ((xfrac >> 16) & 63);
            let px = ds.colourmap[ds.source[spot as usize] as usize];
            let pos = row + (x << shift) as usize;
            buf[pos] = px;
            if doubled {
                buf[pos + 1] = px;
            }
            xfrac = xfrac.wrapping_add(ds.xstep.raw());
            yfrac = yfrac.wrapping_add(ds.ystep.raw());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use math::{FRACUNIT, FixedT};
    use pic_data::{FLAT_SIZE, ramp_colourmaps, translation_tables};
    use render_trait::{DrawBuffer, PixelBuffer};

    use super::{ColumnMode, DrawColumn, DrawSpan, Rasterizer};
    use crate::RenderError;
    use crate::config::Detail;

    fn column<'a>(source: &'a [u8], cmap: &'a [u8; 256], x: i32, yl: i32, yh: i32) -> DrawColumn<'a> {
        DrawColumn {
            source,
            colourmap: cmap,
            mode: ColumnMode::Solid,
            x,
            yl,
            yh,
            iscale: FixedT::ONE,
            texturemid: FixedT::ZERO,
        }
    }

    #[test]
    fn column_steps_texels() {
        let maps = ramp_colourmaps();
        let mut buf = DrawBuffer::new(8, 8);
        let mut rast = Rasterizer::new(Detail::High, 8, 8);
        let source: Vec<u8> = (0..8).collect();
        // texturemid 0 puts texel 0 on the centre row
        rast.draw_column(&column(&source, &maps[0], 2, 0, 7), &mut buf)
            .unwrap();
        assert_eq!(buf.read_pixel(2, 4), 0);
        assert_eq!(buf.read_pixel(2, 5), 1);
        // above the centre wraps round to the bottom of the texture
        assert_eq!(buf.read_pixel(2, 3), 7);
        assert_eq!(buf.read_pixel(3, 5), 0);
    }

    #[test]
    fn column_out_of_bounds() {
        let maps = ramp_colourmaps();
        let mut buf = DrawBuffer::new(8, 8);
        let mut rast = Rasterizer::new(Detail::High, 8, 8);
        let source = [1u8; 8];
        assert_eq!(
            rast.draw_column(&column(&source, &maps[0], 8, 0, 3), &mut buf),
            Err(RenderError::OutOfBounds { x: 8, y1: 0, y2: 3 })
        );
        assert!(
            rast.draw_column(&column(&source, &maps[0], 0, 2, 8), &mut buf)
                .is_err()
        );
        // empty is fine
        assert!(
            rast.draw_column(&column(&source, &maps[0], 0, 5, 4), &mut buf)
                .is_ok()
        );
    }

    #[test]
    fn translated_column() {
        let maps = ramp_colourmaps();
        let tables = translation_tables();
        let mut buf = DrawBuffer::new(4, 4);
        let mut rast = Rasterizer::new(Detail::High, 4, 4);
        let source = [0x72u8; 4];
        let mut dc = column(&source, &maps[0], 1, 0, 3);
        dc.mode = ColumnMode::Translated(&tables[2]);
        rast.draw_column(&dc, &mut buf).unwrap();
        assert_eq!(buf.read_pixel(1, 0), 0x22);
    }

    #[test]
    fn fuzz_skips_edges() {
        let maps = ramp_colourmaps();
        let mut buf = DrawBuffer::new(4, 6);
        buf.clear_with_colour(0x10);
        let mut rast = Rasterizer::new(Detail::High, 4, 6);
        let mut dc = column(&[], &maps[6], 0, 0, 5);
        dc.mode = ColumnMode::Fuzz;
        rast.draw_column(&dc, &mut buf).unwrap();
        assert_eq!(buf.read_pixel(0, 0), 0x10);
        assert_eq!(buf.read_pixel(0, 5), 0x10);
        // darkened, still the same hue
        for y in 1..5 {
            let px = buf.read_pixel(0, y);
            assert!(px > 0x10 && px < 0x20, "row {y} is {px:#x}");
        }
    }

    #[test]
    fn low_detail_doubles() {
        let maps = ramp_colourmaps();
        let mut buf = DrawBuffer::new(8, 4);
        let mut rast = Rasterizer::new(Detail::Low, 4, 4);
        let source = [9u8; 4];
        rast.draw_column(&column(&source, &maps[0], 3, 0, 3), &mut buf)
            .unwrap();
        assert_eq!(buf.read_pixel(6, 1), 9);
        assert_eq!(buf.read_pixel(7, 1), 9);
        assert_eq!(buf.read_pixel(5, 1), 0);
        assert!(
            rast.draw_column(&column(&source, &maps[0], 4, 0, 3), &mut buf)
                .is_err()
        );
    }

    #[test]
    fn span_samples_flat() {
        let maps = ramp_colourmaps();
        let mut buf = DrawBuffer::new(8, 2);
        let mut rast = Rasterizer::new(Detail::High, 8, 2);
        let flat: Vec<u8> = (0..FLAT_SIZE * FLAT_SIZE).map(|i| (i % 64) as u8).collect();
        let ds = DrawSpan {
            source: &flat,
            colourmap: &maps[0],
            y: 1,
            x1: 0,
            x2: 7,
            xfrac: FixedT::ZERO,
            yfrac: FixedT::ZERO,
            xstep: FixedT::from_raw(FRACUNIT),
            ystep: FixedT::ZERO,
        };
        rast.draw_span(&ds, &mut buf).unwrap();
        assert_eq!(buf.row(1), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(
            rast.draw_span(&DrawSpan { x2: 8, ..ds }, &mut buf)
                .is_err()
        );
    }
}

mod maps;
mod properties;

use level::{MapData, MapObject, ViewPoint};
use math::Angle;
use pic_data::PicData;
use render_trait::{DrawBuffer, PixelBuffer, PlayViewRenderer};

use crate::{FrameStats, RenderConfig, RenderError, SoftwareRenderer};

pub(super) fn view(x: i32, y: i32, z: i32, degrees: f32) -> ViewPoint {
    ViewPoint::new(x, y, z, Angle::from_degrees(degrees))
}

pub(super) struct Frame {
    pub renderer: SoftwareRenderer,
    pub buffer: DrawBuffer,
    pub stats: FrameStats,
}

impl Frame {
    pub fn hue(&self, x: usize, y: usize) -> u8 {
        self.buffer.read_pixel(x, y) >> 4
    }

    /// Pixels of the whole frame in one hue
    pub fn count_hue(&self, hue: u8) -> usize {
        self.buffer.buf().iter().filter(|p| **p >> 4 == hue).count()
    }
}

pub(super) fn try_render(
    config: &RenderConfig,
    view: &ViewPoint,
    map: &MapData,
    things: &[MapObject],
    pics: &PicData,
) -> Result<Frame, RenderError> {
    let mut renderer = SoftwareRenderer::new(config)?;
    let mut buffer = DrawBuffer::new(config.width, config.height);
    let stats = renderer.render_player_view(view, map, things, pics, &mut buffer)?;
    Ok(Frame {
        renderer,
        buffer,
        stats,
    })
}

pub(super) fn render(
    view: &ViewPoint,
    map: &MapData,
    things: &[MapObject],
    pics: &PicData,
) -> Frame {
    try_render(&RenderConfig::default(), view, map, things, pics).unwrap()
}

//! The seams between the renderer and whatever presents its output.

mod buffers;

pub use buffers::DrawBuffer;

use level::{MapData, MapObject, ViewPoint};
use pic_data::PicData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSize {
    hi_res: bool,
    width_usize: usize,
    height_usize: usize,
    width: i32,
    height: i32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            hi_res: height > 200,
            width_usize: width,
            height_usize: height,
            width: width as i32,
            height: height as i32,
        }
    }

    pub const fn hi_res(&self) -> bool {
        self.hi_res
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn half_width(&self) -> i32 {
        self.width / 2
    }

    pub const fn half_height(&self) -> i32 {
        self.height / 2
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }
}

/// An 8-bit indexed framebuffer. Each byte is a palette index, turning it in
/// to colour is up to the presentation layer.
pub trait PixelBuffer {
    fn size(&self) -> &BufferSize;
    fn clear(&mut self);
    fn clear_with_colour(&mut self, colour: u8);
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8);
    fn read_pixel(&self, x: usize, y: usize) -> u8;
    fn buf(&self) -> &[u8];
    fn buf_mut(&mut self) -> &mut [u8];
    /// The pitch that should be added/subtracted to go up or down the Y while
    /// keeping X position
    fn pitch(&self) -> usize;
    /// Get an index point for this coord
    fn get_buf_index(&self, x: usize, y: usize) -> usize;
}

pub trait PlayViewRenderer {
    type Stats;
    type Error;

    /// Doom function name `R_RenderPlayerView`. One call paints one whole
    /// frame of the view in to `buffer`.
    fn render_player_view(
        &mut self,
        view: &ViewPoint,
        map: &MapData,
        things: &[MapObject],
        pic_data: &PicData,
        buffer: &mut impl PixelBuffer,
    ) -> Result<Self::Stats, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::BufferSize;

    #[test]
    fn classic_size() {
        let size = BufferSize::new(320, 200);
        assert!(!size.hi_res());
        assert_eq!(size.half_width(), 160);
        assert_eq!(size.height_usize(), 200);
        assert!(BufferSize::new(640, 400).hi_res());
    }
}

use crate::{BufferSize, PixelBuffer};

/// A plain in-memory indexed framebuffer
#[derive(Debug, Clone)]
pub struct DrawBuffer {
    size: BufferSize,
    /// Total length is width * height
    buffer: Vec<u8>,
    stride: usize,
}

impl DrawBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: BufferSize::new(width, height),
            buffer: vec![0; width * height],
            stride: width,
        }
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> &[u8] {
        &self.buffer[y * self.stride..(y + 1) * self.stride]
    }
}

impl PixelBuffer for DrawBuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    #[inline]
    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    #[inline]
    fn clear_with_colour(&mut self, colour: u8) {
        self.buffer.fill(colour);
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        let pos = y * self.stride + x;
        self.buffer[pos] = colour;
    }

    /// Read the colour of a single pixel at X|Y
    #[inline]
    fn read_pixel(&self, x: usize, y: usize) -> u8 {
        self.buffer[y * self.stride + x]
    }

    #[inline(always)]
    fn buf(&self) -> &[u8] {
        &self.buffer
    }

    #[inline(always)]
    fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    #[inline(always)]
    fn pitch(&self) -> usize {
        self.stride
    }

    #[inline(always)]
    fn get_buf_index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
}

#[cfg(test)]
mod tests {
    use super::DrawBuffer;
    use crate::PixelBuffer;

    #[test]
    fn set_and_read() {
        let mut buf = DrawBuffer::new(8, 4);
        buf.clear_with_colour(3);
        buf.set_pixel(7, 3, 9);
        assert_eq!(buf.read_pixel(7, 3), 9);
        assert_eq!(buf.read_pixel(0, 0), 3);
        assert_eq!(buf.get_buf_index(1, 2), 17);
        assert_eq!(buf.row(3)[7], 9);
    }
}

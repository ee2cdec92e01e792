use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Bad view size {width}x{height}")]
    ViewSize { width: usize, height: usize },
    #[error("Framebuffer is {got_width}x{got_height}, the renderer needs {width}x{height}")]
    BufferSize {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },
    #[error("Bad wall range {start} to {stop}")]
    WallRange { start: i32, stop: i32 },
    #[error("No wall texture {0}")]
    MissingTexture(usize),
    #[error("No flat {0}")]
    MissingFlat(usize),
    #[error("Invalid sprite number {0}")]
    MissingSprite(usize),
    #[error("Invalid sprite frame {sprite} : {frame}")]
    MissingFrame { sprite: usize, frame: usize },
    #[error("No sprite patch {0}")]
    MissingPatch(usize),
    #[error("Draw at x {x}, rows {y1} to {y2} is outside the view")]
    OutOfBounds { x: i32, y1: i32, y2: i32 },
    #[error("No more visplanes, limit is {0}")]
    VisplaneOverflow(usize),
    #[error("Openings overflow, limit is {0}")]
    OpeningsOverflow(usize),
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PicError {
    #[error("need at least {need} colourmaps, got {got}")]
    Colourmaps { need: usize, got: usize },
    #[error("flat {name} is {len} bytes, flats must be 64x64")]
    FlatSize { name: String, len: usize },
    #[error("texture {name} has no columns")]
    EmptyTexture { name: String },
    #[error("sprite {sprite} frame {frame} uses missing patch {patch}")]
    SpritePatch {
        sprite: usize,
        frame: usize,
        patch: usize,
    },
    #[error("sky uses missing {kind} {index}")]
    Sky { kind: &'static str, index: usize },
}

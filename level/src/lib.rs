//! The read-only level graph the renderer walks, and the per-frame inputs
//! the simulation hands it.

mod builder;
mod errors;
mod map_data;
pub mod map_defs;
mod mobj;
mod player;

pub use builder::MapBuilder;
pub use errors::LevelError;
pub use map_data::{MapData, MapLumps};
pub use map_defs::{
    BBox, LineDef, LineDefFlags, Node, NodeChild, Sector, Segment, SideDef, SubSector, Vertex,
};
pub use mobj::*;
pub use player::*;

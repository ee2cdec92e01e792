use math::{Angle, DivLine, FixedT, point_to_angle};

/// Line flags that matter to drawing. Values are bit masks over
/// `LineDef::flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDefFlags {
    Blocking = 1,
    BlockMonsters = 2,
    TwoSided = 4,
    /// Upper texture is anchored to the top of the wall rather than the
    /// bottom
    DontPegTop = 8,
    /// Lower and middle textures are anchored to the floor
    DontPegBottom = 16,
    Secret = 32,
    SoundBlock = 64,
    DontDraw = 128,
    /// Set once the line has been seen
    Mapped = 256,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: FixedT,
    pub y: FixedT,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: FixedT::from_int(x),
            y: FixedT::from_int(y),
        }
    }
}

/// The SECTORS record, at runtime. Nothing in here changes during a frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sector {
    pub floorheight: FixedT,
    pub ceilingheight: FixedT,
    /// Index to flat
    pub floorpic: usize,
    /// Index to flat
    pub ceilingpic: usize,
    pub lightlevel: i32,
}

impl Sector {
    pub fn new(
        floorheight: i32,
        ceilingheight: i32,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: i32,
    ) -> Self {
        Self {
            floorheight: FixedT::from_int(floorheight),
            ceilingheight: FixedT::from_int(ceilingheight),
            floorpic,
            ceilingpic,
            lightlevel,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SideDef {
    // add this to the calculated texture column
    pub textureoffset: FixedT,

    // add this to the calculated texture top
    pub rowoffset: FixedT,

    pub toptexture: Option<usize>,
    pub bottomtexture: Option<usize>,
    pub midtexture: Option<usize>,

    /// Sector the SideDef is facing.
    pub sector: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BBox {
    pub top: FixedT,
    pub bottom: FixedT,
    pub left: FixedT,
    pub right: FixedT,
}

impl BBox {
    pub fn new(v1: Vertex, v2: Vertex) -> Self {
        let mut bbox = BBox::default();

        if v1.x < v2.x {
            bbox.left = v1.x;
            bbox.right = v2.x;
        } else {
            bbox.left = v2.x;
            bbox.right = v1.x;
        }

        if v1.y < v2.y {
            bbox.bottom = v1.y;
            bbox.top = v2.y;
        } else {
            bbox.bottom = v2.y;
            bbox.top = v1.y;
        }

        bbox
    }

    /// Grow to include the point
    pub fn add_point(&mut self, v: Vertex) {
        self.left = self.left.min(v.x);
        self.right = self.right.max(v.x);
        self.bottom = self.bottom.min(v.y);
        self.top = self.top.max(v.y);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineDef {
    /// Vertices, from v1 to v2.
    pub v1: usize,
    pub v2: usize,
    pub flags: u32,
    pub front_sidedef: usize,
    pub back_sidedef: Option<usize>,
}

impl LineDef {
    #[inline]
    pub fn has_flag(&self, flag: LineDefFlags) -> bool {
        self.flags & flag as u32 != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Vertices, from v1 to v2.
    pub v1: usize,
    pub v2: usize,

    /// Offset distance along the linedef (from `start_vertex`) to the start
    /// of this `Segment`
    pub offset: FixedT,
    pub angle: Angle,

    pub sidedef: usize,
    /// The Linedef this segment travels along. During drawing it is used for
    /// finding flags.
    pub linedef: usize,

    pub frontsector: usize,
    /// Only set for two sided lines. An index that does not resolve to a
    /// sector is treated as a degenerate line and skipped when drawing.
    pub backsector: Option<usize>,
}

impl Segment {
    /// A seg running the full length of a line, from `v1` to `v2`. The angle
    /// is taken from the vertexes.
    pub fn from_line(
        vertexes: &[Vertex],
        v1: usize,
        v2: usize,
        linedef: usize,
        sidedef: usize,
        frontsector: usize,
        backsector: Option<usize>,
    ) -> Option<Self> {
        let a = vertexes.get(v1)?;
        let b = vertexes.get(v2)?;
        Some(Self {
            v1,
            v2,
            offset: FixedT::ZERO,
            angle: point_to_angle(b.x - a.x, b.y - a.y),
            sidedef,
            linedef,
            frontsector,
            backsector,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSector {
    pub sector: usize,
    /// How many `Segment`s line this `SubSector`
    pub seg_count: usize,
    /// The `Segment` to start with
    pub start_seg: usize,
}

/// A child of a BSP node: another node, or a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeChild {
    Node(usize),
    SubSector(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The partition line. The right (front) side is child 0.
    pub partition: DivLine,
    /// Bounding boxes of each child
    pub bboxes: [BBox; 2],
    pub children: [NodeChild; 2],
}

impl Node {
    /// Which child the point is in, 0 = front
    #[inline]
    pub fn point_on_side(&self, x: FixedT, y: FixedT) -> usize {
        self.partition.point_on_side(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::{BBox, LineDef, LineDefFlags, Vertex};

    #[test]
    fn bbox_orders_corners() {
        let b = BBox::new(Vertex::new(64, -32), Vertex::new(-16, 8));
        assert_eq!(b.left.to_int(), -16);
        assert_eq!(b.right.to_int(), 64);
        assert_eq!(b.bottom.to_int(), -32);
        assert_eq!(b.top.to_int(), 8);
    }

    #[test]
    fn bbox_grows() {
        let mut b = BBox::new(Vertex::new(0, 0), Vertex::new(1, 1));
        b.add_point(Vertex::new(-5, 10));
        assert_eq!(b.left.to_int(), -5);
        assert_eq!(b.top.to_int(), 10);
        assert_eq!(b.right.to_int(), 1);
    }

    #[test]
    fn line_flags() {
        let line = LineDef {
            v1: 0,
            v2: 1,
            flags: LineDefFlags::TwoSided as u32 | LineDefFlags::DontPegBottom as u32,
            front_sidedef: 0,
            back_sidedef: Some(1),
        };
        assert!(line.has_flag(LineDefFlags::DontPegBottom));
        assert!(!line.has_flag(LineDefFlags::DontPegTop));
    }
}

//! Hand assembly of small levels: sectors, the lines between them, the segs
//! of each subsector and the node tree over the subsectors. Segs added
//! between two `close_subsector` calls become one subsector.

use math::{DivLine, FixedT};

use crate::LevelError;
use crate::map_data::{MapData, MapLumps};
use crate::map_defs::{
    BBox, LineDef, LineDefFlags, Node, NodeChild, Sector, Segment, SideDef, SubSector, Vertex,
};

#[derive(Debug, Default)]
pub struct MapBuilder {
    lumps: MapLumps,
    /// First seg of the subsector being built
    open_seg: usize,
    /// Bounds of each subsector and node, for the node boxes
    ss_bounds: Vec<BBox>,
    node_bounds: Vec<BBox>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex at `x, y`, added if new
    pub fn vertex(&mut self, x: i32, y: i32) -> usize {
        let v = Vertex::new(x, y);
        if let Some(i) = self.lumps.vertexes.iter().position(|o| *o == v) {
            return i;
        }
        self.lumps.vertexes.push(v);
        self.lumps.vertexes.len() - 1
    }

    pub fn sector(&mut self, sector: Sector) -> usize {
        self.lumps.sectors.push(sector);
        self.lumps.sectors.len() - 1
    }

    pub fn side(&mut self, side: SideDef) -> usize {
        self.lumps.sidedefs.push(side);
        self.lumps.sidedefs.len() - 1
    }

    /// A line from `a` to `b`. The front side is on the right going from
    /// `a` to `b`. Lines with a back side are flagged two sided.
    pub fn line(
        &mut self,
        a: (i32, i32),
        b: (i32, i32),
        flags: u32,
        front_sidedef: usize,
        back_sidedef: Option<usize>,
    ) -> usize {
        let v1 = self.vertex(a.0, a.1);
        let v2 = self.vertex(b.0, b.1);
        let flags = if back_sidedef.is_some() {
            flags | LineDefFlags::TwoSided as u32
        } else {
            flags
        };
        self.lumps.linedefs.push(LineDef {
            v1,
            v2,
            flags,
            front_sidedef,
            back_sidedef,
        });
        self.lumps.linedefs.len() - 1
    }

    /// A seg covering all of `line`, seen from its front or back side
    pub fn seg(&mut self, line: usize, back: bool) -> Result<usize, LevelError> {
        let bad = |target, target_index| LevelError::BadReference {
            kind: "builder line",
            index: line,
            target,
            target_index,
        };
        let linedef = self.lumps.linedefs.get(line).ok_or(bad("linedef", line))?;
        let (v1, v2, side, other) = if back {
            let back_side = linedef.back_sidedef.ok_or(bad("back sidedef", line))?;
            (linedef.v2, linedef.v1, back_side, Some(linedef.front_sidedef))
        } else {
            (linedef.v1, linedef.v2, linedef.front_sidedef, linedef.back_sidedef)
        };

        let sector_of = |s: usize| {
            self.lumps
                .sidedefs
                .get(s)
                .map(|side| side.sector)
                .ok_or(bad("sidedef", s))
        };
        let frontsector = sector_of(side)?;
        let backsector = other.map(sector_of).transpose()?;

        let seg = Segment::from_line(
            &self.lumps.vertexes,
            v1,
            v2,
            line,
            side,
            frontsector,
            backsector,
        )
        .ok_or(bad("vertex", v1.max(v2)))?;
        self.lumps.segments.push(seg);
        Ok(self.lumps.segments.len() - 1)
    }

    /// Turn the segs added since the last call in to a subsector of the
    /// first seg's sector
    pub fn close_subsector(&mut self) -> Result<NodeChild, LevelError> {
        let start_seg = self.open_seg;
        let segs = &self.lumps.segments[start_seg..];
        let first = segs.first().ok_or(LevelError::Empty)?;
        let sector = first.frontsector;

        let verts = &self.lumps.vertexes;
        let mut bounds = BBox::new(verts[first.v1], verts[first.v1]);
        for seg in segs {
            bounds.add_point(verts[seg.v1]);
            bounds.add_point(verts[seg.v2]);
        }

        self.lumps.subsectors.push(SubSector {
            sector,
            seg_count: segs.len(),
            start_seg,
        });
        self.ss_bounds.push(bounds);
        self.open_seg = self.lumps.segments.len();
        Ok(NodeChild::SubSector(self.lumps.subsectors.len() - 1))
    }

    fn bounds(&self, child: NodeChild) -> BBox {
        match child {
            NodeChild::Node(n) => self.node_bounds[n],
            NodeChild::SubSector(s) => self.ss_bounds[s],
        }
    }

    /// A node split on the line `a` to `b`. `front` is on the right of it.
    /// The last node added is the root.
    pub fn node(
        &mut self,
        a: (i32, i32),
        b: (i32, i32),
        front: NodeChild,
        back: NodeChild,
    ) -> NodeChild {
        let bboxes = [self.bounds(front), self.bounds(back)];
        let mut all = bboxes[0];
        all.add_point(Vertex {
            x: bboxes[1].left,
            y: bboxes[1].bottom,
        });
        all.add_point(Vertex {
            x: bboxes[1].right,
            y: bboxes[1].top,
        });

        self.lumps.nodes.push(Node {
            partition: DivLine::from_points(
                FixedT::from_int(a.0),
                FixedT::from_int(a.1),
                FixedT::from_int(b.0),
                FixedT::from_int(b.1),
            ),
            bboxes,
            children: [front, back],
        });
        self.node_bounds.push(all);
        NodeChild::Node(self.lumps.nodes.len() - 1)
    }

    pub fn build(self) -> Result<MapData, LevelError> {
        MapData::new(self.lumps)
    }
}

#[cfg(test)]
mod tests {
    use math::FixedT;

    use super::MapBuilder;
    use crate::map_defs::{NodeChild, Sector, SideDef};
    use crate::{LevelError, LineDefFlags};

    #[test]
    fn two_rooms_split() {
        let mut b = MapBuilder::new();
        let west = b.sector(Sector::new(0, 128, 0, 0, 160));
        let east = b.sector(Sector::new(16, 128, 0, 0, 160));
        let ws = b.side(SideDef {
            sector: west,
            ..SideDef::default()
        });
        let es = b.side(SideDef {
            sector: east,
            ..SideDef::default()
        });
        let portal = b.line((64, 64), (64, 0), 0, ws, Some(es));
        let wall = b.line((0, 0), (0, 64), 0, ws, None);

        b.seg(portal, false).unwrap();
        b.seg(wall, false).unwrap();
        let w = b.close_subsector().unwrap();
        b.seg(portal, true).unwrap();
        let e = b.close_subsector().unwrap();
        let root = b.node((64, 0), (64, 64), e, w);
        assert_eq!(root, NodeChild::Node(0));

        let map = b.build().unwrap();
        assert!(map.linedefs()[portal].has_flag(LineDefFlags::TwoSided));
        assert_eq!(map.segments()[2].frontsector, east);
        assert_eq!(map.segments()[2].backsector, Some(west));
        assert_eq!(map.subsectors()[0].seg_count, 2);
        assert_eq!(map.nodes()[0].bboxes[1].left, FixedT::ZERO);
        let sector = map.sector_at(FixedT::from_int(100), FixedT::from_int(10));
        assert_eq!(sector.floorheight, FixedT::from_int(16));
    }

    #[test]
    fn back_seg_needs_back_side() {
        let mut b = MapBuilder::new();
        b.sector(Sector::default());
        let side = b.side(SideDef::default());
        let line = b.line((0, 0), (0, 64), 0, side, None);
        assert!(matches!(b.seg(line, true), Err(LevelError::BadReference { .. })));
        assert_eq!(b.close_subsector(), Err(LevelError::Empty));
    }
}

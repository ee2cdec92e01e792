use log::debug;
use math::FixedT;

use crate::LevelError;
use crate::map_defs::{LineDef, Node, NodeChild, Sector, Segment, SideDef, SubSector, Vertex};

const LOG_TAG: &str = "MapData";

/// The raw arrays of a level as produced by a loader or builder. Nothing is
/// checked until it becomes a `MapData`.
#[derive(Debug, Default, Clone)]
pub struct MapLumps {
    pub vertexes: Vec<Vertex>,
    pub sectors: Vec<Sector>,
    pub sidedefs: Vec<SideDef>,
    pub linedefs: Vec<LineDef>,
    pub segments: Vec<Segment>,
    pub subsectors: Vec<SubSector>,
    /// Built bottom up, the last node is the root
    pub nodes: Vec<Node>,
}

/// A level graph that has been checked: every index resolves (other than
/// seg back sectors, which the renderer skips when dangling) and the node
/// tree has no cycles.
#[derive(Debug, Clone)]
pub struct MapData {
    vertexes: Vec<Vertex>,
    sectors: Vec<Sector>,
    sidedefs: Vec<SideDef>,
    linedefs: Vec<LineDef>,
    segments: Vec<Segment>,
    subsectors: Vec<SubSector>,
    nodes: Vec<Node>,
}

fn check(
    kind: &'static str,
    index: usize,
    target: &'static str,
    target_index: usize,
    len: usize,
) -> Result<(), LevelError> {
    if target_index >= len {
        return Err(LevelError::BadReference {
            kind,
            index,
            target,
            target_index,
        });
    }
    Ok(())
}

impl MapData {
    pub fn new(lumps: MapLumps) -> Result<Self, LevelError> {
        let MapLumps {
            vertexes,
            sectors,
            sidedefs,
            linedefs,
            segments,
            subsectors,
            nodes,
        } = lumps;

        if subsectors.is_empty() {
            return Err(LevelError::Empty);
        }

        for (i, side) in sidedefs.iter().enumerate() {
            check("sidedef", i, "sector", side.sector, sectors.len())?;
        }

        for (i, line) in linedefs.iter().enumerate() {
            check("linedef", i, "vertex", line.v1, vertexes.len())?;
            check("linedef", i, "vertex", line.v2, vertexes.len())?;
            check("linedef", i, "sidedef", line.front_sidedef, sidedefs.len())?;
            if let Some(back) = line.back_sidedef {
                check("linedef", i, "sidedef", back, sidedefs.len())?;
            }
        }

        for (i, seg) in segments.iter().enumerate() {
            check("seg", i, "vertex", seg.v1, vertexes.len())?;
            check("seg", i, "vertex", seg.v2, vertexes.len())?;
            check("seg", i, "linedef", seg.linedef, linedefs.len())?;
            check("seg", i, "sidedef", seg.sidedef, sidedefs.len())?;
            check("seg", i, "sector", seg.frontsector, sectors.len())?;
        }

        for (i, ss) in subsectors.iter().enumerate() {
            check("subsector", i, "sector", ss.sector, sectors.len())?;
            if ss.start_seg + ss.seg_count > segments.len() {
                return Err(LevelError::BadSegRun {
                    subsector: i,
                    start: ss.start_seg,
                    count: ss.seg_count,
                    total: segments.len(),
                });
            }
        }

        for (i, node) in nodes.iter().enumerate() {
            for child in node.children {
                match child {
                    NodeChild::Node(n) if n >= i => {
                        return Err(LevelError::NodeOrder { node: i, child: n });
                    }
                    NodeChild::Node(_) => {}
                    NodeChild::SubSector(s) => {
                        check("node", i, "subsector", s, subsectors.len())?;
                    }
                }
            }
        }

        debug!(
            target: LOG_TAG,
            "Level has {} nodes, {} subsectors, {} segs, {} sectors",
            nodes.len(),
            subsectors.len(),
            segments.len(),
            sectors.len()
        );

        Ok(Self {
            vertexes,
            sectors,
            sidedefs,
            linedefs,
            segments,
            subsectors,
            nodes,
        })
    }

    /// The node to start a walk from. A level with a single subsector has no
    /// nodes at all.
    #[inline]
    pub fn start_node(&self) -> NodeChild {
        if self.nodes.is_empty() {
            NodeChild::SubSector(0)
        } else {
            NodeChild::Node(self.nodes.len() - 1)
        }
    }

    #[inline]
    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[inline]
    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    #[inline]
    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The segs of a subsector
    #[inline]
    pub fn subsector_segs(&self, subsector: &SubSector) -> &[Segment] {
        &self.segments[subsector.start_seg..subsector.start_seg + subsector.seg_count]
    }

    /// `R_PointInSubsector`
    pub fn point_in_subsector(&self, x: FixedT, y: FixedT) -> &SubSector {
        let mut child = self.start_node();
        loop {
            match child {
                NodeChild::SubSector(s) => return &self.subsectors[s],
                NodeChild::Node(n) => {
                    let node = &self.nodes[n];
                    child = node.children[node.point_on_side(x, y)];
                }
            }
        }
    }

    /// The sector containing the point
    #[inline]
    pub fn sector_at(&self, x: FixedT, y: FixedT) -> &Sector {
        &self.sectors[self.point_in_subsector(x, y).sector]
    }
}

#[cfg(test)]
mod tests {
    use math::{DivLine, FixedT};

    use crate::map_defs::{BBox, LineDef, Node, NodeChild, Sector, Segment, SideDef, SubSector, Vertex};
    use crate::{LevelError, MapData, MapLumps};

    /// Two boxes side by side split on x = 64
    fn two_rooms() -> MapLumps {
        let vertexes = vec![
            Vertex::new(0, 0),
            Vertex::new(64, 0),
            Vertex::new(64, 64),
            Vertex::new(0, 64),
            Vertex::new(128, 0),
            Vertex::new(128, 64),
        ];
        let sectors = vec![Sector::new(0, 128, 0, 0, 160), Sector::new(16, 128, 0, 0, 160)];
        let sidedefs = vec![
            SideDef {
                sector: 0,
                ..SideDef::default()
            },
            SideDef {
                sector: 1,
                ..SideDef::default()
            },
        ];
        let linedefs = vec![LineDef {
            v1: 1,
            v2: 2,
            flags: 0,
            front_sidedef: 0,
            back_sidedef: Some(1),
        }];
        let segments = vec![
            Segment::from_line(&vertexes, 1, 2, 0, 0, 0, Some(1)).unwrap(),
            Segment::from_line(&vertexes, 2, 1, 0, 1, 1, Some(0)).unwrap(),
        ];
        let subsectors = vec![
            SubSector {
                sector: 0,
                seg_count: 1,
                start_seg: 0,
            },
            SubSector {
                sector: 1,
                seg_count: 1,
                start_seg: 1,
            },
        ];
        // partition points north along x = 64, the right side is east
        let nodes = vec![Node {
            partition: DivLine::new(
                FixedT::from_int(64),
                FixedT::ZERO,
                FixedT::ZERO,
                FixedT::from_int(64),
            ),
            bboxes: [
                BBox::new(vertexes[1], vertexes[5]),
                BBox::new(vertexes[0], vertexes[2]),
            ],
            children: [NodeChild::SubSector(1), NodeChild::SubSector(0)],
        }];
        MapLumps {
            vertexes,
            sectors,
            sidedefs,
            linedefs,
            segments,
            subsectors,
            nodes,
        }
    }

    #[test]
    fn validates_good_map() {
        let map = MapData::new(two_rooms()).unwrap();
        assert_eq!(map.start_node(), NodeChild::Node(0));
        assert_eq!(map.subsector_segs(&map.subsectors()[1]).len(), 1);
    }

    #[test]
    fn finds_subsector() {
        let map = MapData::new(two_rooms()).unwrap();
        let east = map.point_in_subsector(FixedT::from_int(100), FixedT::from_int(32));
        assert_eq!(east.sector, 1);
        let west = map.point_in_subsector(FixedT::from_int(10), FixedT::from_int(32));
        assert_eq!(west.sector, 0);
        assert_eq!(
            map.sector_at(FixedT::from_int(100), FixedT::from_int(5))
                .floorheight
                .to_int(),
            16
        );
    }

    #[test]
    fn rejects_bad_sector() {
        let mut lumps = two_rooms();
        lumps.subsectors[0].sector = 9;
        assert!(matches!(
            MapData::new(lumps),
            Err(LevelError::BadReference {
                kind: "subsector",
                target_index: 9,
                ..
            })
        ));
    }

    #[test]
    fn rejects_node_cycle() {
        let mut lumps = two_rooms();
        lumps.nodes[0].children[1] = NodeChild::Node(0);
        assert_eq!(
            MapData::new(lumps).unwrap_err(),
            LevelError::NodeOrder { node: 0, child: 0 }
        );
    }

    #[test]
    fn rejects_long_seg_run() {
        let mut lumps = two_rooms();
        lumps.subsectors[1].seg_count = 4;
        assert!(matches!(
            MapData::new(lumps),
            Err(LevelError::BadSegRun { subsector: 1, .. })
        ));
    }

    #[test]
    fn dangling_back_sector_is_allowed() {
        let mut lumps = two_rooms();
        lumps.segments[0].backsector = Some(42);
        assert!(MapData::new(lumps).is_ok());
    }

    #[test]
    fn empty_map_is_an_error() {
        assert_eq!(MapData::new(MapLumps::default()).unwrap_err(), LevelError::Empty);
    }
}

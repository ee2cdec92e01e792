//! Small levels and a flat colour picture set. Every picture is one hue of
//! the ramp palette, so a pixel's hue says what was drawn there whatever the
//! light level.

use std::ops::Range;

use level::{MapBuilder, MapData, NodeChild, Sector, SideDef};
use pic_data::{
    FlatPic, PicData, Post, SpriteDef, SpriteFrame, SpritePic, WallPic, ramp_colourmaps,
};

pub const WALL_TEX: usize = 0;
pub const STEP_TEX: usize = 1;
pub const SKY_TEX: usize = 2;
/// Bars four columns wide with four column gaps, for masked mid textures
pub const GRATE_TEX: usize = 3;
/// Wall hue with the top eight rows marked, shows where the texture starts
pub const PEG_TEX: usize = 4;

pub const FLOOR_FLAT: usize = 0;
pub const CEILING_FLAT: usize = 1;
pub const SKY_FLAT: usize = 2;

pub const MONSTER: usize = 0;
pub const WEAPON: usize = 1;
/// Front, back and an asymmetric side view that is flipped for the other side
pub const ROTATING: usize = 2;

pub const WALL_HUE: u8 = 2;
pub const STEP_HUE: u8 = 3;
pub const FLOOR_HUE: u8 = 5;
/// Green monsters through translation table 1
pub const TRANSLATED_HUE: u8 = 6;
pub const MONSTER_HUE: u8 = 7;
pub const CEILING_HUE: u8 = 8;
pub const GRATE_HUE: u8 = 9;
pub const WEAPON_HUE: u8 = 11;
pub const PEG_MARK_HUE: u8 = 12;
pub const FRONT_HUE: u8 = 10;
pub const BACK_HUE: u8 = 4;
pub const SIDE_LEFT_HUE: u8 = 13;
pub const SIDE_RIGHT_HUE: u8 = 14;
/// The sky is always drawn full bright, so this comes through unchanged
pub const SKY_COLOUR: u8 = 0xa5;

/// Segs of the west room of `two_rooms`, the portal is the last
pub const WEST_SEGS: Range<usize> = 0..4;
pub const WEST_PORTAL_SEG: usize = 3;
/// Segs of the east room of `two_rooms`, the portal is the first
pub const EAST_SEGS: Range<usize> = 4..8;

pub fn pic_data() -> PicData {
    let walls = vec![
        WallPic::solid("WALL", 64, 128, |_, _| WALL_HUE << 4).unwrap(),
        WallPic::solid("STEP", 64, 64, |_, _| STEP_HUE << 4).unwrap(),
        WallPic::solid("SKY1", 256, 128, |_, _| SKY_COLOUR).unwrap(),
        grate(),
        WallPic::solid("PEGGED", 64, 128, |_, y| {
            if y < 8 { PEG_MARK_HUE << 4 } else { WALL_HUE << 4 }
        })
        .unwrap(),
    ];
    let flats = vec![
        FlatPic::solid("FLOOR", FLOOR_HUE << 4),
        FlatPic::solid("CEIL", CEILING_HUE << 4),
        FlatPic::solid("F_SKY1", 0),
    ];
    let patches = vec![
        SpritePic::solid("TROOA0", 32, 56, MONSTER_HUE << 4),
        SpritePic::solid("PISGA0", 64, 40, WEAPON_HUE << 4),
        SpritePic::solid("POSSA1", 32, 56, FRONT_HUE << 4),
        SpritePic::solid("POSSA5", 32, 56, BACK_HUE << 4),
        SpritePic::from_posts(
            "POSSA3A7",
            16,
            56,
            (0..32)
                .map(|x| {
                    let hue = if x < 16 { SIDE_LEFT_HUE } else { SIDE_RIGHT_HUE };
                    vec![Post::new(0, vec![hue << 4; 56])]
                })
                .collect(),
        ),
    ];
    let defs = vec![
        SpriteDef {
            frames: vec![SpriteFrame::single(0)],
        },
        SpriteDef {
            frames: vec![SpriteFrame::single(1)],
        },
        SpriteDef {
            frames: vec![SpriteFrame {
                rotate: true,
                lump: [2, 2, 4, 3, 3, 3, 4, 2],
                flip: [false, false, false, false, false, false, true, false],
            }],
        },
    ];
    let mut pics = PicData::new(ramp_colourmaps(), walls, flats, patches, defs).unwrap();
    pics.set_sky(SKY_FLAT, SKY_TEX).unwrap();
    pics
}

fn grate() -> WallPic {
    let posts = (0..64)
        .map(|x| {
            if (x / 4) % 2 == 0 {
                vec![Post::new(0, vec![GRATE_HUE << 4; 128])]
            } else {
                Vec::new()
            }
        })
        .collect();
    WallPic::from_posts("MIDGRATE", 128, posts).unwrap()
}

/// One sided walls through `points`, clockwise so the room is on the right
fn walls(b: &mut MapBuilder, points: &[(i32, i32)], side: usize) {
    for pair in points.windows(2) {
        let line = b.line(pair[0], pair[1], 0, side, None);
        b.seg(line, false).unwrap();
    }
}

/// A square room from 0,0 to `size`,`size` with one subsector and no nodes
pub fn one_room(size: i32, ceilingpic: usize, midtexture: usize) -> MapData {
    let mut b = MapBuilder::new();
    let sector = b.sector(Sector::new(0, 128, FLOOR_FLAT, ceilingpic, 160));
    let side = b.side(SideDef {
        midtexture: Some(midtexture),
        sector,
        ..SideDef::default()
    });
    walls(
        &mut b,
        &[(0, 0), (0, size), (size, size), (size, 0), (0, 0)],
        side,
    );
    b.close_subsector().unwrap();
    b.build().unwrap()
}

/// A 512 unit room like `one_room` but the east wall is 512 lines one unit
/// long
pub fn long_wall_room() -> MapData {
    let mut b = MapBuilder::new();
    let sector = b.sector(Sector::new(0, 128, FLOOR_FLAT, CEILING_FLAT, 160));
    let side = b.side(SideDef {
        midtexture: Some(WALL_TEX),
        sector,
        ..SideDef::default()
    });
    let mut points = vec![(0, 0), (0, 512)];
    points.extend((0..=512).rev().map(|y| (512, y)));
    points.push((0, 0));
    walls(&mut b, &points, side);
    b.close_subsector().unwrap();
    b.build().unwrap()
}

/// Flags and textures of both sides of the `two_rooms` portal
pub struct Portal {
    pub flags: u32,
    pub top: Option<usize>,
    pub bottom: Option<usize>,
    pub mid: Option<usize>,
}

impl Default for Portal {
    fn default() -> Self {
        Self {
            flags: 0,
            top: Some(WALL_TEX),
            bottom: Some(STEP_TEX),
            mid: None,
        }
    }
}

/// Two 256 unit rooms side by side, west 0..256 and east 256..512, joined
/// by a two sided line on x = 256. Both sides of it carry upper and lower
/// textures.
pub fn two_rooms(west: Sector, east: Sector) -> MapData {
    two_rooms_with(west, east, Portal::default())
}

/// `two_rooms` with the portal made from `portal`
pub fn two_rooms_with(west: Sector, east: Sector, portal: Portal) -> MapData {
    let mut b = MapBuilder::new();
    let w = b.sector(west);
    let e = b.sector(east);
    let wall_side = |b: &mut MapBuilder, sector| {
        b.side(SideDef {
            midtexture: Some(WALL_TEX),
            sector,
            ..SideDef::default()
        })
    };
    let portal_side = |b: &mut MapBuilder, sector| {
        b.side(SideDef {
            toptexture: portal.top,
            bottomtexture: portal.bottom,
            midtexture: portal.mid,
            sector,
            ..SideDef::default()
        })
    };
    let w_wall = wall_side(&mut b, w);
    let e_wall = wall_side(&mut b, e);
    let w_portal = portal_side(&mut b, w);
    let e_portal = portal_side(&mut b, e);

    // running south, so the west room is on the front
    let portal = b.line((256, 256), (256, 0), portal.flags, w_portal, Some(e_portal));

    walls(&mut b, &[(256, 0), (0, 0), (0, 256), (256, 256)], w_wall);
    b.seg(portal, false).unwrap();
    let west_ss = b.close_subsector().unwrap();

    b.seg(portal, true).unwrap();
    walls(&mut b, &[(256, 256), (512, 256), (512, 0), (256, 0)], e_wall);
    let east_ss = b.close_subsector().unwrap();

    // running north, east is on the right
    let root = b.node((256, 0), (256, 256), east_ss, west_ss);
    assert_eq!(root, NodeChild::Node(0));
    b.build().unwrap()
}

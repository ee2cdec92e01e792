//! The demo level: a west room stepping up in to an open air east room that
//! has a square pillar in it, with a few monsters about.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use level::{
    MF_TRANSSHIFT, MapBuilder, MapData, MapObjFlag, MapObject, PspDef, PspState, Sector, SideDef,
};
use math::{Angle, FixedT};
use pic_data::{
    FlatPic, PicData, SpriteDef, SpriteFrame, SpritePic, WallPic, ramp_colourmaps, ramp_palette,
};
use render_trait::{DrawBuffer, PixelBuffer};

const WALL: usize = 0;
const STEP: usize = 1;
const PILLAR: usize = 2;
const SKY: usize = 3;

const FLOOR: usize = 0;
const CEILING: usize = 1;
const F_SKY: usize = 2;

const TROOPER: usize = 0;
const PISTOL: usize = 1;

pub const VIEW_X: i32 = 64;
pub const VIEW_Y: i32 = 128;
pub const VIEW_Z: i32 = 41;

/// Textures drawn with a little pattern so the texture mapping shows
pub fn pic_data() -> Result<PicData, Box<dyn Error>> {
    let walls = vec![
        WallPic::solid("STARTAN", 64, 128, |x, y| {
            let mortar = y % 16 == 0 || (x + (y / 16) * 8) % 32 == 0;
            if mortar { 0x24 } else { 0x20 }
        })?,
        WallPic::solid("STEP1", 32, 16, |_, y| 0x30 + (y / 4) as u8)?,
        WallPic::solid("PILLAR", 64, 128, |x, _| 0x90 + (x / 8) as u8)?,
        WallPic::solid("SKY1", 256, 128, |x, y| {
            if y > 96 { 0xa8 } else { 0xa0 + ((x / 32) % 3) as u8 }
        })?,
    ];
    let mut checker = vec![0; 64 * 64];
    for (i, c) in checker.iter_mut().enumerate() {
        *c = if ((i % 64) / 16 + (i / 64) / 16) % 2 == 0 { 0x50 } else { 0x53 };
    }
    let flats = vec![
        FlatPic::new("FLOOR4_8", checker)?,
        FlatPic::solid("CEIL3_5", 0x80),
        FlatPic::solid("F_SKY1", 0),
    ];
    let patches = vec![
        SpritePic::solid("TROOA1", 40, 56, 0x70),
        SpritePic::solid("PISGA0", 48, 64, 0xb0),
    ];
    let defs = vec![
        SpriteDef {
            frames: vec![SpriteFrame::single(0)],
        },
        SpriteDef {
            frames: vec![SpriteFrame::single(1)],
        },
    ];
    let mut pics = PicData::new(ramp_colourmaps(), walls, flats, patches, defs)?;
    pics.set_sky(F_SKY, SKY)?;
    Ok(pics)
}

fn walls(b: &mut MapBuilder, points: &[(i32, i32)], side: usize) -> Result<(), Box<dyn Error>> {
    for pair in points.windows(2) {
        let line = b.line(pair[0], pair[1], 0, side, None);
        b.seg(line, false)?;
    }
    Ok(())
}

/// West room 0..256 by 0..256, east room 256..512 by 0..256 with the pillar
/// at 384..448 by 96..160. The east room is cut in to four subsectors
/// around the pillar.
pub fn level() -> Result<MapData, Box<dyn Error>> {
    let mut b = MapBuilder::new();
    let west = b.sector(Sector::new(0, 128, FLOOR, CEILING, 176));
    let east = b.sector(Sector::new(24, 160, FLOOR, F_SKY, 208));

    let w_wall = b.side(SideDef {
        midtexture: Some(WALL),
        sector: west,
        ..SideDef::default()
    });
    let e_wall = b.side(SideDef {
        midtexture: Some(WALL),
        sector: east,
        ..SideDef::default()
    });
    let pillar = b.side(SideDef {
        midtexture: Some(PILLAR),
        sector: east,
        ..SideDef::default()
    });
    let w_portal = b.side(SideDef {
        bottomtexture: Some(STEP),
        sector: west,
        ..SideDef::default()
    });
    let e_portal = b.side(SideDef {
        sector: east,
        ..SideDef::default()
    });
    let portal = b.line((256, 256), (256, 0), 0, w_portal, Some(e_portal));

    walls(&mut b, &[(256, 0), (0, 0), (0, 256), (256, 256)], w_wall)?;
    b.seg(portal, false)?;
    let west_ss = b.close_subsector()?;

    // west of the pillar
    b.seg(portal, true)?;
    walls(&mut b, &[(256, 256), (384, 256)], e_wall)?;
    walls(&mut b, &[(384, 160), (384, 96)], pillar)?;
    walls(&mut b, &[(384, 0), (256, 0)], e_wall)?;
    let west_of = b.close_subsector()?;

    // south of the pillar
    walls(&mut b, &[(384, 96), (448, 96)], pillar)?;
    walls(&mut b, &[(512, 96), (512, 0), (384, 0)], e_wall)?;
    let south_of = b.close_subsector()?;

    // north of the pillar
    walls(&mut b, &[(448, 160), (384, 160)], pillar)?;
    walls(&mut b, &[(384, 256), (512, 256), (512, 160)], e_wall)?;
    let north_of = b.close_subsector()?;

    // east of the pillar
    walls(&mut b, &[(448, 96), (448, 160)], pillar)?;
    walls(&mut b, &[(512, 160), (512, 96)], e_wall)?;
    let east_of = b.close_subsector()?;

    let n = b.node((512, 160), (384, 160), north_of, east_of);
    let n = b.node((384, 96), (512, 96), south_of, n);
    let n = b.node((384, 0), (384, 256), n, west_of);
    b.node((256, 0), (256, 256), n, west_ss);

    Ok(b.build()?)
}

pub fn things() -> Vec<MapObject> {
    let mut things = vec![
        MapObject::new(320, 200, 24, Angle::A180, TROOPER, 0),
        MapObject::new(480, 40, 24, Angle::A90, TROOPER, 0),
        MapObject::new(480, 220, 24, Angle::A270, TROOPER, 0),
    ];
    // a brown one and a fuzzy one
    things[1].flags |= 2 << MF_TRANSSHIFT;
    things[2].flags |= MapObjFlag::Shadow as u32;
    things
}

pub fn weapon() -> PspDef {
    PspDef {
        state: Some(PspState {
            sprite: PISTOL,
            frame: 0,
        }),
        sx: FixedT::from_int(160),
        sy: FixedT::from_int(200),
    }
}

/// Binary PGM of the palette indexes, or a PPM through the ramp palette
pub fn write_image(buffer: &DrawBuffer, path: &Path, ppm: bool) -> Result<(), Box<dyn Error>> {
    let size = buffer.size();
    let (width, height) = (size.width_usize(), size.height_usize());
    let mut out = BufWriter::new(File::create(path)?);

    if ppm {
        let palette = ramp_palette();
        write!(out, "P6\n{width} {height}\n255\n")?;
        for &index in buffer.buf().iter().take(width * height) {
            out.write_all(&palette[index as usize])?;
        }
    } else {
        write!(out, "P5\n{width} {height}\n255\n")?;
        out.write_all(&buffer.buf()[..width * height])?;
    }
    out.flush()?;
    Ok(())
}

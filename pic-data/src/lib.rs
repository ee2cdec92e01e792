//! All data and functions related to pictures the renderer samples.
//! These are:
//! - Wall textures
//! - Flat/span textures
//! - Colourmaps and translation tables
//! - Sprites (patches and frame sets)
//!
//! Loading from game data is somebody else's job: a `PicData` is assembled
//! from already decoded pictures and is read only while a frame renders.

mod colourmap;
mod errors;
mod pics;
mod sprites;

pub use colourmap::*;
pub use errors::PicError;
pub use pics::*;
pub use sprites::*;

use log::debug;

const LOG_TAG: &str = "PicData";

#[derive(Debug)]
pub struct PicData {
    // Usually 34 blocks of 256, each u8 being an index in to the palette
    colourmaps: Vec<Colourmap>,
    translations: [Colourmap; 3],
    walls: Vec<WallPic>,
    flats: Vec<FlatPic>,
    /// The number flats use to signify a sky should be drawn
    sky_num: Option<usize>,
    /// The index number of the texture to use for skybox
    sky_pic: usize,
    sprite_patches: Vec<SpritePic>,
    sprite_defs: Vec<SpriteDef>,
}

impl PicData {
    pub fn new(
        colourmaps: Vec<Colourmap>,
        walls: Vec<WallPic>,
        flats: Vec<FlatPic>,
        sprite_patches: Vec<SpritePic>,
        sprite_defs: Vec<SpriteDef>,
    ) -> Result<Self, PicError> {
        if colourmaps.len() < NUMCOLORMAPS {
            return Err(PicError::Colourmaps {
                need: NUMCOLORMAPS,
                got: colourmaps.len(),
            });
        }
        for (sprite, def) in sprite_defs.iter().enumerate() {
            for (frame, f) in def.frames.iter().enumerate() {
                if let Some(&patch) = f.lump.iter().find(|l| **l >= sprite_patches.len()) {
                    return Err(PicError::SpritePatch {
                        sprite,
                        frame,
                        patch,
                    });
                }
            }
        }

        debug!(
            target: LOG_TAG,
            "{} walls, {} flats, {} sprite patches, {} sprites",
            walls.len(),
            flats.len(),
            sprite_patches.len(),
            sprite_defs.len()
        );

        Ok(Self {
            colourmaps,
            translations: translation_tables(),
            walls,
            flats,
            sky_num: None,
            sky_pic: 0,
            sprite_patches,
            sprite_defs,
        })
    }

    /// Set which flat draws as sky and which wall texture is the sky
    pub fn set_sky(&mut self, flat: usize, wall: usize) -> Result<(), PicError> {
        if flat >= self.flats.len() {
            return Err(PicError::Sky {
                kind: "flat",
                index: flat,
            });
        }
        if wall >= self.walls.len() {
            return Err(PicError::Sky {
                kind: "texture",
                index: wall,
            });
        }
        self.sky_num = Some(flat);
        self.sky_pic = wall;
        Ok(())
    }

    /// Get the number of the flat used for the sky texture. Sectors using this
    /// number for the flat will be rendered with the skybox.
    #[inline]
    pub fn sky_num(&self) -> Option<usize> {
        self.sky_num
    }

    #[inline]
    pub fn is_sky(&self, flat: usize) -> bool {
        self.sky_num == Some(flat)
    }

    /// Get the index used by `wall_pic()` to return the sky texture.
    #[inline]
    pub fn sky_pic(&self) -> usize {
        self.sky_pic
    }

    #[inline]
    pub fn num_colourmaps(&self) -> usize {
        self.colourmaps.len()
    }

    /// A colourmap. Indexes past the end clamp to the last map.
    #[inline]
    pub fn colourmap(&self, index: usize) -> &Colourmap {
        &self.colourmaps[index.min(self.colourmaps.len() - 1)]
    }

    /// Translation table 1..=3, anything else gives the first
    #[inline]
    pub fn translation(&self, table: usize) -> &Colourmap {
        &self.translations[table.clamp(1, 3) - 1]
    }

    #[inline]
    pub fn wall_pic(&self, num: usize) -> Option<&WallPic> {
        self.walls.get(num)
    }

    #[inline]
    pub fn flat(&self, num: usize) -> Option<&FlatPic> {
        self.flats.get(num)
    }

    #[inline]
    pub fn sprite_def(&self, sprite_num: usize) -> Option<&SpriteDef> {
        self.sprite_defs.get(sprite_num)
    }

    #[inline]
    pub fn sprite_patch(&self, patch_num: usize) -> Option<&SpritePic> {
        self.sprite_patches.get(patch_num)
    }

    pub fn wallpic_num_for_name(&self, name: &str) -> Option<usize> {
        self.walls.iter().position(|w| w.name == name)
    }

    pub fn flat_num_for_name(&self, name: &str) -> Option<usize> {
        self.flats.iter().position(|f| f.name == name)
    }
}

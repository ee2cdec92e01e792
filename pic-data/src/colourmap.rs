//! Colourmaps and translation tables.
//!
//! Real data comes from a loader. The ramp builders here produce a matching
//! palette and set of light maps for generated scenes where each block of 16
//! palette entries is one hue going from bright to dark.

pub type Colourmap = [u8; 256];

/// Light diminishing maps, 0 is full bright
pub const NUMCOLORMAPS: usize = 32;
/// The inverse greyscale map used by invulnerability
pub const INVERSECOLORMAP: usize = 32;

const RAMP: usize = 16;

/// Hue of each 16 entry ramp
const RAMP_HUES: [[u8; 3]; 16] = [
    [255, 255, 255],
    [255, 200, 160],
    [255, 64, 64],
    [200, 160, 120],
    [160, 120, 80],
    [128, 128, 96],
    [112, 160, 112],
    [64, 255, 64],
    [255, 255, 96],
    [255, 160, 32],
    [96, 96, 255],
    [255, 96, 255],
    [96, 255, 255],
    [160, 96, 64],
    [192, 192, 192],
    [255, 224, 160],
];

/// 256 RGB entries, ramp `i >> 4` shade `i & 15` where 15 is darkest
pub fn ramp_palette() -> Vec<[u8; 3]> {
    (0..256)
        .map(|i| {
            let hue = RAMP_HUES[i / RAMP];
            let shade = (RAMP - i % RAMP) as u32;
            [
                (hue[0] as u32 * shade / RAMP as u32) as u8,
                (hue[1] as u32 * shade / RAMP as u32) as u8,
                (hue[2] as u32 * shade / RAMP as u32) as u8,
            ]
        })
        .collect()
}

/// `NUMCOLORMAPS` light levels then the inverse map then all black
pub fn ramp_colourmaps() -> Vec<Colourmap> {
    let mut maps = Vec::with_capacity(NUMCOLORMAPS + 2);
    for level in 0..NUMCOLORMAPS {
        let mut map = [0u8; 256];
        for (i, m) in map.iter_mut().enumerate() {
            let base = i - i % RAMP;
            let shade = i % RAMP;
            let dark = shade + (RAMP - shade) * level / NUMCOLORMAPS;
            *m = (base + dark.min(RAMP - 1)) as u8;
        }
        maps.push(map);
    }

    let mut inverse = [0u8; 256];
    for (i, m) in inverse.iter_mut().enumerate() {
        *m = (i % RAMP) as u8 ^ (RAMP as u8 - 1);
    }
    maps.push(inverse);
    maps.push([(RAMP - 1) as u8; 256]);
    maps
}

/// Green ramp remaps to grey, brown and red for the other player colours
pub fn translation_tables() -> [Colourmap; 3] {
    let mut tables = [[0u8; 256]; 3];
    for i in 0..256 {
        if (0x70..=0x7f).contains(&i) {
            tables[0][i] = 0x60 + (i as u8 & 0xf);
            tables[1][i] = 0x40 + (i as u8 & 0xf);
            tables[2][i] = 0x20 + (i as u8 & 0xf);
        } else {
            tables[0][i] = i as u8;
            tables[1][i] = i as u8;
            tables[2][i] = i as u8;
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colourmap_zero_is_identity() {
        let maps = ramp_colourmaps();
        assert_eq!(maps.len(), NUMCOLORMAPS + 2);
        for i in 0..256 {
            assert_eq!(maps[0][i], i as u8);
        }
    }

    #[test]
    fn colourmaps_darken_within_ramp() {
        let maps = ramp_colourmaps();
        let bright = 0x42;
        let mut last = bright;
        for map in maps.iter().take(NUMCOLORMAPS) {
            let c = map[bright as usize];
            assert_eq!(c & 0xf0, 0x40);
            assert!(c >= last);
            last = c;
        }
        assert_eq!(maps[NUMCOLORMAPS - 1][bright as usize], 0x4f);
    }

    #[test]
    fn translation_only_touches_green() {
        let t = translation_tables();
        assert_eq!(t[0][0x73], 0x63);
        assert_eq!(t[1][0x7f], 0x4f);
        assert_eq!(t[2][0x70], 0x20);
        assert_eq!(t[2][0x80], 0x80);
        assert_eq!(t[0][0x6f], 0x6f);
    }

    #[test]
    fn palette_shades_darken() {
        let pal = ramp_palette();
        assert_eq!(pal[0], [255, 255, 255]);
        assert!(pal[15][0] < pal[1][0]);
    }
}

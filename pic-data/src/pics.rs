use crate::PicError;

pub const FLAT_SIZE: usize = 64;

/// A run of opaque pixels in a column, starting `top_delta` rows down
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Post {
    pub top_delta: usize,
    pub pixels: Vec<u8>,
}

impl Post {
    pub fn new(top_delta: usize, pixels: Vec<u8>) -> Self {
        Self { top_delta, pixels }
    }
}

/// A composed wall texture. Solid walls sample `data`, masked mid textures
/// draw the `posts` so the gaps stay transparent.
#[derive(Debug, Clone)]
pub struct WallPic {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Largest power of two not above the width, minus one. Columns wrap
    /// on this.
    width_mask: usize,
    data: Vec<Vec<u8>>,
    posts: Vec<Vec<Post>>,
}

impl WallPic {
    /// Build from per-column posts. Rows not covered by a post are 0 in the
    /// solid data.
    pub fn from_posts(
        name: impl Into<String>,
        height: usize,
        posts: Vec<Vec<Post>>,
    ) -> Result<Self, PicError> {
        let name = name.into();
        if posts.is_empty() || height == 0 {
            return Err(PicError::EmptyTexture { name });
        }
        let width = posts.len();
        let data = posts
            .iter()
            .map(|column| {
                let mut compose = vec![0u8; height];
                for post in column {
                    for (y, p) in post.pixels.iter().enumerate() {
                        if let Some(px) = compose.get_mut(post.top_delta + y) {
                            *px = *p;
                        }
                    }
                }
                compose
            })
            .collect();

        let mut j = 1;
        while j * 2 <= width {
            j <<= 1;
        }

        Ok(Self {
            name,
            width,
            height,
            width_mask: j - 1,
            data,
            posts,
        })
    }

    /// A texture with no transparent pixels
    pub fn solid(
        name: impl Into<String>,
        width: usize,
        height: usize,
        colour: impl Fn(usize, usize) -> u8,
    ) -> Result<Self, PicError> {
        let posts = (0..width)
            .map(|x| vec![Post::new(0, (0..height).map(|y| colour(x, y)).collect())])
            .collect();
        Self::from_posts(name, height, posts)
    }

    #[inline]
    pub fn width_mask(&self) -> usize {
        self.width_mask
    }

    /// Column of pixels, the column number wraps on the width mask
    #[inline]
    pub fn column(&self, col: i32) -> &[u8] {
        &self.data[(col & self.width_mask as i32) as usize]
    }

    /// Opaque runs of a column, the column number wraps on the width mask
    #[inline]
    pub fn column_posts(&self, col: i32) -> &[Post] {
        &self.posts[(col & self.width_mask as i32) as usize]
    }
}

/// A 64x64 floor or ceiling, stored row major so `data[y * 64 + x]`
#[derive(Debug, Clone)]
pub struct FlatPic {
    pub name: String,
    pub data: Vec<u8>,
}

impl FlatPic {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self, PicError> {
        let name = name.into();
        if data.len() != FLAT_SIZE * FLAT_SIZE {
            return Err(PicError::FlatSize {
                name,
                len: data.len(),
            });
        }
        Ok(Self { name, data })
    }

    pub fn solid(name: impl Into<String>, colour: u8) -> Self {
        Self {
            name: name.into(),
            data: vec![colour; FLAT_SIZE * FLAT_SIZE],
        }
    }
}

/// A sprite patch, only ever drawn through its posts
#[derive(Debug, Clone)]
pub struct SpritePic {
    pub name: String,
    pub left_offset: i32,
    pub top_offset: i32,
    pub height: usize,
    posts: Vec<Vec<Post>>,
}

impl SpritePic {
    pub fn from_posts(
        name: impl Into<String>,
        left_offset: i32,
        top_offset: i32,
        posts: Vec<Vec<Post>>,
    ) -> Self {
        let height = posts
            .iter()
            .flat_map(|c| c.iter().map(|p| p.top_delta + p.pixels.len()))
            .max()
            .unwrap_or(0);
        Self {
            name: name.into(),
            left_offset,
            top_offset,
            height,
            posts,
        }
    }

    /// A rectangle of one colour standing on its origin
    pub fn solid(name: impl Into<String>, width: usize, height: usize, colour: u8) -> Self {
        let posts = (0..width)
            .map(|_| vec![Post::new(0, vec![colour; height])])
            .collect();
        Self::from_posts(name, width as i32 / 2, height as i32, posts)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.posts.len()
    }

    #[inline]
    pub fn column_posts(&self, col: usize) -> Option<&[Post]> {
        self.posts.get(col).map(|c| c.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::{FlatPic, Post, SpritePic, WallPic};
    use crate::PicError;

    #[test]
    fn wall_columns_wrap() {
        let pic = WallPic::solid("WALL", 96, 8, |x, _| x as u8).unwrap();
        assert_eq!(pic.width_mask(), 63);
        assert_eq!(pic.column(65)[0], 1);
        assert_eq!(pic.column(-1)[0], 63);
    }

    #[test]
    fn wall_from_gappy_posts() {
        let posts = vec![vec![Post::new(2, vec![7, 7]), Post::new(6, vec![9, 9, 9])]];
        let pic = WallPic::from_posts("MIDGRATE", 8, posts).unwrap();
        assert_eq!(pic.column(0), &[0, 0, 7, 7, 0, 0, 9, 9]);
        assert_eq!(pic.column_posts(0).len(), 2);
    }

    #[test]
    fn flat_must_be_64_square() {
        assert!(matches!(
            FlatPic::new("BAD", vec![0; 10]),
            Err(PicError::FlatSize { len: 10, .. })
        ));
        assert!(FlatPic::new("GOOD", vec![0; 4096]).is_ok());
    }

    #[test]
    fn sprite_height_and_offsets() {
        let pic = SpritePic::solid("TROOA1", 10, 20, 3);
        assert_eq!(pic.width(), 10);
        assert_eq!(pic.height, 20);
        assert_eq!(pic.left_offset, 5);
        assert_eq!(pic.top_offset, 20);
        assert!(pic.column_posts(10).is_none());
    }
}

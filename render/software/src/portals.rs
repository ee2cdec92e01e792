//! Vertical clipping for windows/portals. Walls drawn nearer to the view
//! narrow these per column as the BSP walk goes on, and everything further
//! away is drawn inside them.

#[derive(Debug, Clone)]
pub struct PortalClip {
    /// Clip values are the solid pixel bounding the range.
    ///  floorclip starts out view height
    ///  ceilingclip starts out -1
    pub floorclip: Vec<i32>,
    pub ceilingclip: Vec<i32>,
    view_height: i32,
}

impl PortalClip {
    pub fn new(view_width: usize, view_height: usize) -> Self {
        PortalClip {
            floorclip: vec![view_height as i32; view_width],
            ceilingclip: vec![-1; view_width],
            view_height: view_height as i32,
        }
    }

    pub(super) fn clear(&mut self) {
        self.floorclip.fill(self.view_height);
        self.ceilingclip.fill(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::PortalClip;

    #[test]
    fn clear_opens_everything() {
        let mut clip = PortalClip::new(640, 400);
        clip.floorclip[3] = -1;
        clip.ceilingclip[3] = 400;
        clip.clear();
        assert!(clip.floorclip.iter().all(|c| *c == 400));
        assert!(clip.ceilingclip.iter().all(|c| *c == -1));
    }
}

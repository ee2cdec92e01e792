//! The solid segment clip list: the columns already covered by one sided
//! walls, closed doors and the like. Each new wall is split against it to
//! find the pieces that are still visible.

use crate::defs::ClipRange;

#[derive(Debug, Clone)]
pub struct SolidSegs {
    /// Sorted by `first`, never overlapping or touching
    segs: Vec<ClipRange>,
    view_width: i32,
}

impl SolidSegs {
    pub fn new(view_width: usize) -> Self {
        let mut segs = Self {
            segs: Vec::with_capacity(32),
            view_width: view_width as i32,
        };
        segs.clear();
        segs
    }

    /// R_ClearClipSegs - r_bsp
    pub fn clear(&mut self) {
        self.segs.clear();
        self.segs.push(ClipRange::new(i32::MIN + 1, -1));
        self.segs.push(ClipRange::new(self.view_width, i32::MAX));
    }

    #[inline]
    pub fn ranges(&self) -> &[ClipRange] {
        &self.segs
    }

    /// Every screen column is covered
    pub fn is_full(&self) -> bool {
        self.segs
            .iter()
            .any(|s| s.first <= 0 && s.last >= self.view_width - 1)
    }

    /// Index of the first range touching `first` (adjacent counts)
    #[inline]
    fn find_start(&self, first: i32) -> usize {
        // The last sentinel always stops this
        self.segs
            .iter()
            .position(|s| s.last >= first - 1)
            .unwrap_or(self.segs.len() - 1)
    }

    /// R_ClipSolidWallSegment - r_bsp
    ///
    /// Pushes the visible pieces of `first..=last` in to `fragments`, then
    /// adds the whole range to the clip list.
    pub fn clip_solid(&mut self, first: i32, last: i32, fragments: &mut Vec<ClipRange>) {
        let start = self.find_start(first);

        if first < self.segs[start].first {
            if last < self.segs[start].first - 1 {
                // Post is entirely visible (above start), so insert a new
                // clippost.
                fragments.push(ClipRange::new(first, last));
                self.segs.insert(start, ClipRange::new(first, last));
                return;
            }

            // There is a fragment above *start.
            fragments.push(ClipRange::new(first, self.segs[start].first - 1));
            // Now adjust the clip size.
            self.segs[start].first = first;
        }

        // Bottom contained in start?
        if last <= self.segs[start].last {
            return;
        }

        let mut next = start;
        while last >= self.segs[next + 1].first - 1 {
            // There is a fragment between two posts.
            fragments.push(ClipRange::new(
                self.segs[next].last + 1,
                self.segs[next + 1].first - 1,
            ));
            next += 1;

            if last <= self.segs[next].last {
                // Bottom is contained in next. Adjust the clip size.
                self.segs[start].last = self.segs[next].last;
                self.crunch(start, next);
                return;
            }
        }

        // There is a fragment after *next.
        fragments.push(ClipRange::new(self.segs[next].last + 1, last));
        // Adjust the clip size.
        self.segs[start].last = last;
        self.crunch(start, next);
    }

    /// Remove start+1 to next from the clip list, because start now covers
    /// their area.
    #[inline]
    fn crunch(&mut self, start: usize, next: usize) {
        if next > start {
            self.segs.drain(start + 1..=next);
        }
    }

    /// R_ClipPassWallSegment - r_bsp
    ///
    /// Same fragments as `clip_solid` but the list is left alone. Used for
    /// windows, e.g. LineDefs with upper and lower texture.
    pub fn clip_pass(&self, first: i32, last: i32, fragments: &mut Vec<ClipRange>) {
        let mut start = self.find_start(first);

        if first < self.segs[start].first {
            if last < self.segs[start].first - 1 {
                // Post is entirely visible (above start).
                fragments.push(ClipRange::new(first, last));
                return;
            }

            // There is a fragment above *start.
            fragments.push(ClipRange::new(first, self.segs[start].first - 1));
        }

        // Bottom contained in start?
        if last <= self.segs[start].last {
            return;
        }

        while last >= self.segs[start + 1].first - 1 {
            // There is a fragment between two posts.
            fragments.push(ClipRange::new(
                self.segs[start].last + 1,
                self.segs[start + 1].first - 1,
            ));
            start += 1;

            if last <= self.segs[start].last {
                return;
            }
        }

        // There is a fragment after *next.
        fragments.push(ClipRange::new(self.segs[start].last + 1, last));
    }

    /// False when a single clip range already contains `first..=last`
    pub fn has_open(&self, first: i32, last: i32) -> bool {
        let start = self
            .segs
            .iter()
            .position(|s| s.last >= last)
            .unwrap_or(self.segs.len() - 1);
        let s = self.segs[start];
        !(first >= s.first && last <= s.last)
    }
}

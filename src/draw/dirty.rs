//! Raster damage left by brush dabs.
//!
//! Each dab reports the raster area it blended into. Hosts drain those areas
//! after a batch of pointer events and repaint just that part of the raster.
//! Consecutive dabs of a drag overlap, so a dab that touches the previous
//! damage is merged into it instead of queued separately.

use crate::util::Rect;

/// Dab damage gathered since the host last repainted, in raster coordinates.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    whole_raster: bool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding, clearing, and auto-paint repaint everything.
    pub fn mark_raster(&mut self) {
        self.whole_raster = true;
        self.regions.clear();
    }

    /// Records the area one dab touched. Dabs that missed the raster report `None`.
    pub fn mark_dab(&mut self, damage: Option<Rect>) {
        let Some(damage) = damage.filter(Rect::is_valid) else {
            return;
        };
        if self.whole_raster {
            return;
        }
        match self.regions.last_mut() {
            Some(last) if last.intersect(&damage).is_some() => *last = last.union(&damage),
            _ => self.regions.push(damage),
        }
    }

    pub fn is_clean(&self) -> bool {
        !self.whole_raster && self.regions.is_empty()
    }

    /// Drains the damage gathered so far.
    ///
    /// A whole-raster mark comes back as one rectangle of the raster's size.
    pub fn take_regions(&mut self, raster_width: i32, raster_height: i32) -> Vec<Rect> {
        if std::mem::take(&mut self.whole_raster) {
            self.regions.clear();
            Rect::new(0, 0, raster_width, raster_height)
                .into_iter()
                .collect()
        } else {
            self.regions.drain(..).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_dabs_merge_into_one_region() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dab(Rect::new(10, 10, 6, 6));
        tracker.mark_dab(Rect::new(13, 12, 6, 6));
        tracker.mark_dab(None);

        assert_eq!(
            tracker.take_regions(100, 100),
            vec![Rect::new(10, 10, 9, 8).unwrap()]
        );
        assert!(tracker.is_clean());
    }

    #[test]
    fn separate_dabs_stay_separate() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dab(Rect::new(0, 0, 4, 4));
        tracker.mark_dab(Rect::new(40, 40, 4, 4));

        let regions = tracker.take_regions(100, 100);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1], Rect::new(40, 40, 4, 4).unwrap());
    }

    #[test]
    fn whole_raster_mark_absorbs_dabs() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dab(Rect::new(5, 5, 10, 10));
        tracker.mark_raster();
        tracker.mark_dab(Rect::new(20, 20, 15, 15));

        assert_eq!(
            tracker.take_regions(140, 90),
            vec![Rect::new(0, 0, 140, 90).unwrap()]
        );
        assert!(tracker.take_regions(140, 90).is_empty());
    }

    #[test]
    fn unbound_raster_yields_no_regions() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_raster();
        assert!(tracker.take_regions(0, 0).is_empty());
        assert!(tracker.is_clean());
    }
}

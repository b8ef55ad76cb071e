//! Sprite assets and the load barrier
//!
//! Sprites load independently (one browser image request each). The barrier
//! collects their outcomes and produces a single report once every load has
//! settled. A failed sprite never blocks the game; the renderer draws a
//! placeholder in its place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    DinoRun1,
    DinoRun2,
    DinoDuck1,
    DinoDuck2,
    DinoJump,
    DinoDead,
    SmallCactus,
    LargeCactus,
    Bird1,
    Bird2,
    Track,
}

impl SpriteId {
    pub const ALL: [SpriteId; 11] = [
        SpriteId::DinoRun1,
        SpriteId::DinoRun2,
        SpriteId::DinoDuck1,
        SpriteId::DinoDuck2,
        SpriteId::DinoJump,
        SpriteId::DinoDead,
        SpriteId::SmallCactus,
        SpriteId::LargeCactus,
        SpriteId::Bird1,
        SpriteId::Bird2,
        SpriteId::Track,
    ];

    /// Path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            SpriteId::DinoRun1 => "assets/Dino/DinoRun1.png",
            SpriteId::DinoRun2 => "assets/Dino/DinoRun2.png",
            SpriteId::DinoDuck1 => "assets/Dino/DinoDuck1.png",
            SpriteId::DinoDuck2 => "assets/Dino/DinoDuck2.png",
            SpriteId::DinoJump => "assets/Dino/DinoJump.png",
            SpriteId::DinoDead => "assets/Dino/DinoDead.png",
            SpriteId::SmallCactus => "assets/Cactus/SmallCactus1.png",
            SpriteId::LargeCactus => "assets/Cactus/LargeCactus1.png",
            SpriteId::Bird1 => "assets/Bird/Bird1.png",
            SpriteId::Bird2 => "assets/Bird/Bird2.png",
            SpriteId::Track => "assets/Other/Track.png",
        }
    }
}

/// Outcome of loading a set of sprites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub loaded: BTreeSet<SpriteId>,
    pub failed: Vec<SpriteId>,
}

impl AssetReport {
    #[inline]
    pub fn is_loaded(&self, id: SpriteId) -> bool {
        self.loaded.contains(&id)
    }

    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Join over independent sprite loads
#[derive(Debug, Clone, Default)]
pub struct AssetBarrier {
    pending: BTreeSet<SpriteId>,
    report: AssetReport,
}

impl AssetBarrier {
    pub fn new(ids: impl IntoIterator<Item = SpriteId>) -> Self {
        Self {
            pending: ids.into_iter().collect(),
            report: AssetReport::default(),
        }
    }

    /// Record one load outcome
    ///
    /// Returns the full report exactly once, when the last pending load
    /// settles. Unknown or repeated ids are ignored.
    pub fn settle(&mut self, id: SpriteId, ok: bool) -> Option<AssetReport> {
        if !self.pending.remove(&id) {
            return None;
        }
        if ok {
            self.report.loaded.insert(id);
        } else {
            log::warn!("Failed to load sprite {}", id.path());
            self.report.failed.push(id);
        }

        if self.pending.is_empty() {
            let report = self.report.clone();
            if report.all_loaded() {
                log::info!("Loaded {} sprites", report.loaded.len());
            } else {
                log::warn!(
                    "{} of {} sprites failed, using placeholders",
                    report.failed.len(),
                    report.failed.len() + report.loaded.len()
                );
            }
            Some(report)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Final report, once every load has settled
    pub fn report(&self) -> Option<&AssetReport> {
        self.is_complete().then_some(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_only_when_all_settled() {
        let mut barrier = AssetBarrier::new([SpriteId::DinoRun1, SpriteId::Bird1, SpriteId::Track]);
        assert!(barrier.settle(SpriteId::Bird1, true).is_none());
        assert!(barrier.report().is_none());
        assert!(barrier.settle(SpriteId::Track, false).is_none());

        let report = barrier.settle(SpriteId::DinoRun1, true).unwrap();
        assert!(barrier.is_complete());
        assert!(report.is_loaded(SpriteId::DinoRun1));
        assert!(!report.is_loaded(SpriteId::Track));
        assert_eq!(report.failed, vec![SpriteId::Track]);
        assert!(!report.all_loaded());
        assert_eq!(barrier.report(), Some(&report));
    }

    #[test]
    fn test_duplicate_and_unknown_ignored() {
        let mut barrier = AssetBarrier::new([SpriteId::DinoRun1, SpriteId::DinoRun2]);
        assert!(barrier.settle(SpriteId::DinoRun1, true).is_none());
        assert!(barrier.settle(SpriteId::DinoRun1, false).is_none());
        assert!(barrier.settle(SpriteId::Bird2, true).is_none());
        assert!(!barrier.is_complete());

        let report = barrier.settle(SpriteId::DinoRun2, true).unwrap();
        assert!(report.all_loaded());
        // Only reported once
        assert!(barrier.settle(SpriteId::DinoRun2, true).is_none());
    }

    #[test]
    fn test_empty_barrier_is_complete() {
        let barrier = AssetBarrier::new([]);
        assert!(barrier.is_complete());
        assert_eq!(barrier.report(), Some(&AssetReport::default()));
    }

    #[test]
    fn test_paths_are_distinct() {
        let paths: BTreeSet<&str> = SpriteId::ALL.iter().map(|id| id.path()).collect();
        assert_eq!(paths.len(), SpriteId::ALL.len());
    }
}

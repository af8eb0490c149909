//! Depth-synchronised growth animation
//!
//! Reveals the tree one depth level at a time:
//! - levels below the current one are redrawn in full every frame
//! - branches on the current level extend by `growth_speed` frames per tick
//! - the next level starts once every branch on the current one is complete

use crate::error::TreeError;
use crate::growth::TreeStructure;
use crate::render::{draw_branch, Palette, Reveal, Surface, SurfaceSize};

/// Whether the host should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Done,
}

/// Frame-by-frame reveal state over a generated tree
#[derive(Debug, Clone)]
pub struct GrowthScheduler {
    tree: TreeStructure,
    visible_depth: usize,
    growth_speed: f64,
    current_depth: usize,
}

impl GrowthScheduler {
    /// `visible_depth` is capped at the tree's depth.
    ///
    /// A `growth_speed` of zero or less never completes a level; the host keeps
    /// receiving `Continue` until it restarts.
    pub fn new(tree: TreeStructure, visible_depth: usize, growth_speed: f64) -> Self {
        let visible_depth = visible_depth.min(tree.depth());
        Self {
            tree,
            visible_depth,
            growth_speed,
            current_depth: 0,
        }
    }

    pub fn tree(&self) -> &TreeStructure {
        &self.tree
    }

    pub fn current_depth(&self) -> usize {
        self.current_depth
    }

    pub fn visible_depth(&self) -> usize {
        self.visible_depth
    }

    pub fn growth_speed(&self) -> f64 {
        self.growth_speed
    }

    pub fn set_growth_speed(&mut self, growth_speed: f64) {
        self.growth_speed = growth_speed;
    }

    /// True until every visible level has been revealed
    pub fn is_growing(&self) -> bool {
        self.current_depth < self.visible_depth
    }

    /// Draw one frame and advance the reveal.
    ///
    /// Nothing is committed unless every draw call of the frame succeeded.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        size: SurfaceSize,
        palette: &Palette,
    ) -> Result<TickOutcome, TreeError> {
        surface.clear(size);
        let style = palette.stroke_style(&self.tree);

        for depth in 0..self.current_depth.min(self.visible_depth) {
            for branch in self.tree.level(depth) {
                draw_branch(surface, branch, Reveal::Full, &style)?;
            }
        }

        if !self.is_growing() {
            return Ok(TickOutcome::Done);
        }

        let mut animating = false;
        for branch in self.tree.level(self.current_depth) {
            if branch.is_complete() {
                draw_branch(surface, branch, Reveal::Full, &style)?;
            } else {
                draw_branch(surface, branch, Reveal::Partial(branch.progress()), &style)?;
                animating = true;
            }
        }

        if animating {
            self.tree.advance_level(self.current_depth, self.growth_speed);
        } else {
            self.current_depth += 1;
            log::debug!("depth {} of {} revealed", self.current_depth, self.visible_depth);
        }
        Ok(TickOutcome::Continue)
    }

    /// Restart the reveal over the same geometry
    pub fn replay(&mut self) {
        self.tree.reset_progress();
        self.current_depth = 0;
    }

    /// Jump to the terminal state with every visible level fully grown
    pub fn complete(&mut self) {
        for depth in 0..self.visible_depth {
            self.tree.complete_level(depth);
        }
        self.current_depth = self.visible_depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{BranchGenerator, GrowthParams, RandomSource, TOTAL_FRAMES};
    use crate::math::Vec2;
    use crate::render::{RecordingSurface, StrokeStyle};

    const SIZE: SurfaceSize = SurfaceSize::new(400.0, 600.0);

    fn tree(full_depth: usize) -> TreeStructure {
        let params = GrowthParams {
            full_depth,
            ..Default::default()
        };
        let mut random = RandomSource::seeded(42, full_depth);
        BranchGenerator::new(params, &mut random)
            .generate(Vec2::new(200.0, 600.0), crate::growth::ROOT_HEADING)
            .unwrap()
    }

    fn solid() -> Palette {
        Palette::Solid("#000".into())
    }

    fn snapshot(scheduler: &GrowthScheduler) -> Vec<f64> {
        scheduler.tree().iter_preorder().map(|b| b.progress_frames()).collect()
    }

    fn run(scheduler: &mut GrowthScheduler, surface: &mut RecordingSurface) -> usize {
        let mut ticks = 0;
        while scheduler.tick(surface, SIZE, &solid()).unwrap() == TickOutcome::Continue {
            ticks += 1;
            assert!(ticks < 100_000, "animation did not terminate");
        }
        ticks + 1
    }

    #[test]
    fn test_first_tick_draws_trunk_at_zero_progress() {
        let mut scheduler = GrowthScheduler::new(tree(3), 3, 10.0);
        let mut surface = RecordingSurface::new();

        assert_eq!(scheduler.tick(&mut surface, SIZE, &solid()), Ok(TickOutcome::Continue));
        let segments = surface.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from, segments[0].to);
        assert_eq!(scheduler.tree().get(0, 0).unwrap().progress_frames(), 10.0);
        assert_eq!(surface.clear_count(), 1);
    }

    #[test]
    fn test_partial_then_full() {
        let mut scheduler = GrowthScheduler::new(tree(2), 2, 50.0);
        let mut surface = RecordingSurface::new();

        scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        let trunk = scheduler.tree().get(0, 0).unwrap().clone();
        let mid = surface.segments()[0].to;
        assert_eq!(mid, trunk.start.lerp(&trunk.end, 0.5));
        assert!(trunk.is_complete());
        assert_eq!(scheduler.current_depth(), 0);

        // complete level is drawn in full and the depth advances
        scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        assert_eq!(surface.segments()[0].to, trunk.end);
        assert_eq!(scheduler.current_depth(), 1);

        // next frame redraws the trunk and starts both children
        scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        assert_eq!(surface.segments().len(), 3);
    }

    #[test]
    fn test_monotonic_reveal() {
        let mut scheduler = GrowthScheduler::new(tree(4), 4, 7.5);
        let mut surface = RecordingSurface::new();

        let mut depth = scheduler.current_depth();
        let mut progress = snapshot(&scheduler);
        while scheduler.tick(&mut surface, SIZE, &solid()).unwrap() == TickOutcome::Continue {
            assert!(scheduler.current_depth() >= depth);
            let next = snapshot(&scheduler);
            for (before, after) in progress.iter().zip(&next) {
                assert!(after >= before);
                assert!(*after <= TOTAL_FRAMES);
            }
            depth = scheduler.current_depth();
            progress = next;
        }
        assert_eq!(scheduler.current_depth(), 4);
    }

    #[test]
    fn test_terminates_within_bound() {
        for (speed, visible) in [(1.0, 3), (3.0, 5), (7.0, 5), (100.0, 4), (250.0, 2)] {
            let mut scheduler = GrowthScheduler::new(tree(5), visible, speed);
            let mut surface = RecordingSurface::new();
            let ticks = run(&mut scheduler, &mut surface);

            let per_level = (TOTAL_FRAMES / speed).ceil() as usize + 1;
            assert_eq!(ticks, visible * per_level + 1, "speed {speed}, visible {visible}");
            assert!(!scheduler.is_growing());
        }
    }

    #[test]
    fn test_terminal_frame_draws_visible_levels_only() {
        let mut scheduler = GrowthScheduler::new(tree(5), 3, 50.0);
        let mut surface = RecordingSurface::new();
        run(&mut scheduler, &mut surface);

        assert_eq!(surface.segments().len(), 1 + 2 + 4);
        assert_eq!(scheduler.tree().level(3).map(|b| b.progress_frames()).sum::<f64>(), 0.0);

        // further ticks stay terminal
        assert_eq!(scheduler.tick(&mut surface, SIZE, &solid()), Ok(TickOutcome::Done));
    }

    #[test]
    fn test_zero_visible_depth_is_terminal() {
        let mut scheduler = GrowthScheduler::new(tree(3), 0, 1.0);
        let mut surface = RecordingSurface::new();

        assert_eq!(scheduler.tick(&mut surface, SIZE, &solid()), Ok(TickOutcome::Done));
        assert_eq!(surface.clear_count(), 1);
        assert!(surface.segments().is_empty());
    }

    #[test]
    fn test_visible_depth_capped_at_tree_depth() {
        let scheduler = GrowthScheduler::new(tree(3), 9, 1.0);
        assert_eq!(scheduler.visible_depth(), 3);
    }

    #[test]
    fn test_stalled_speed_keeps_continuing() {
        let mut scheduler = GrowthScheduler::new(tree(2), 2, 0.0);
        let mut surface = RecordingSurface::new();
        for _ in 0..10 {
            assert_eq!(scheduler.tick(&mut surface, SIZE, &solid()), Ok(TickOutcome::Continue));
        }
        assert_eq!(scheduler.current_depth(), 0);
    }

    #[test]
    fn test_failed_frame_commits_nothing() {
        let mut scheduler = GrowthScheduler::new(tree(3), 3, 20.0);
        let mut surface = RecordingSurface::new().rejecting_color("bogus");
        let bad = Palette::Gradient {
            start: "#000".into(),
            end: "bogus".into(),
        };

        scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        let before = snapshot(&scheduler);

        assert!(scheduler.tick(&mut surface, SIZE, &bad).is_err());
        assert_eq!(snapshot(&scheduler), before);
        assert_eq!(scheduler.current_depth(), 0);
    }

    #[test]
    fn test_gradient_used_for_every_branch() {
        let mut scheduler = GrowthScheduler::new(tree(3), 3, 100.0);
        let mut surface = RecordingSurface::new();
        let palette = Palette::Gradient {
            start: "#8B4513".into(),
            end: "#228B22".into(),
        };
        while scheduler.tick(&mut surface, SIZE, &palette).unwrap() == TickOutcome::Continue {}

        let root = scheduler.tree().root();
        let top = scheduler.tree().top();
        let segments = surface.segments();
        assert_eq!(segments.len(), 7);
        for segment in segments {
            match segment.style {
                StrokeStyle::LinearGradient { from, to, stops } => {
                    assert_eq!(from, root);
                    assert_eq!(to, Vec2::new(root.x, top));
                    assert_eq!((stops[0].offset, &*stops[0].color), (0.0, "#8B4513"));
                    assert_eq!((stops[1].offset, &*stops[1].color), (1.0, "#228B22"));
                }
                other => panic!("expected gradient, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_replay_and_complete() {
        let mut scheduler = GrowthScheduler::new(tree(4), 3, 25.0);
        let mut surface = RecordingSurface::new();
        for _ in 0..12 {
            scheduler.tick(&mut surface, SIZE, &solid()).unwrap();
        }
        assert!(scheduler.current_depth() > 0);

        scheduler.replay();
        assert_eq!(scheduler.current_depth(), 0);
        assert!(scheduler.tree().iter_preorder().all(|b| b.progress_frames() == 0.0));

        scheduler.complete();
        assert!(!scheduler.is_growing());
        assert!(scheduler.tree().level_complete(2));
        assert!(!scheduler.tree().level_complete(3));
        assert_eq!(scheduler.tick(&mut surface, SIZE, &solid()), Ok(TickOutcome::Done));
        assert_eq!(surface.segments().len(), 7);
    }
}

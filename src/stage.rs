//! Platform-independent tree controller
//!
//! Owns the drawing surface, the validated options, the random source and the
//! running animation. The browser binding drives it one frame at a time; any
//! other host can do the same with its own `Surface`.

use crate::animation::{GrowthScheduler, TickOutcome};
use crate::config::{TreeConfig, TreeOptions};
use crate::error::TreeError;
use crate::growth::{
    BranchGenerator, GrowthParams, RandomSource, TreeStructure, FULL_DEPTH, ROOT_HEADING,
};
use crate::math::Vec2;
use crate::render::{Surface, SurfaceSize};

pub struct TreeStage<S: Surface> {
    surface: S,
    size: SurfaceSize,
    options: TreeOptions,
    config: TreeConfig,
    random: RandomSource,
    scheduler: Option<GrowthScheduler>,
}

impl<S: Surface> TreeStage<S> {
    pub fn new(surface: S, size: SurfaceSize, options: TreeOptions) -> Result<Self, TreeError> {
        let config = options.validate()?;
        let random = RandomSource::from_seed(config.seed, FULL_DEPTH);
        Ok(Self {
            surface,
            size,
            options,
            config,
            random,
            scheduler: None,
        })
    }

    /// Overwrite the options named in `yaml`; the rest keep their values.
    ///
    /// Colours and growth speed take effect on the next frame; geometry
    /// options (seed, scale, branch width, visible depth) on the next `start`.
    /// Invalid input leaves the stage untouched.
    pub fn configure(&mut self, yaml: &str) -> Result<(), TreeError> {
        let options = self.options.merged(yaml)?;
        let config = options.validate()?;

        if config.seed != self.config.seed {
            self.random = RandomSource::from_seed(config.seed, FULL_DEPTH);
        }
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.set_growth_speed(config.growth_speed);
        }
        self.options = options;
        self.config = config;
        Ok(())
    }

    /// Generate a fresh tree rooted at `anchor` and rewind the animation.
    ///
    /// The previous tree is dropped before anything else is touched; the
    /// caller must already have cancelled any pending frame.
    pub fn start(&mut self, anchor: Vec2) -> Result<(), TreeError> {
        self.scheduler = None;
        self.surface.clear(self.size);
        self.random.reset();

        let params =
            GrowthParams::fitted(self.config.scale, self.config.branch_width, self.size.height);
        let tree =
            BranchGenerator::new(params, &mut self.random).generate(anchor, ROOT_HEADING)?;

        log::info!(
            "growing tree at ({:.1}, {:.1}), {} of {} levels visible, {}",
            anchor.x,
            anchor.y,
            self.config.visible_depth.min(tree.depth()),
            tree.depth(),
            if self.random.is_deterministic() { "seeded" } else { "unseeded" }
        );
        self.scheduler = Some(GrowthScheduler::new(
            tree,
            self.config.visible_depth,
            self.config.growth_speed,
        ));
        Ok(())
    }

    /// Start a tree at the bottom-centre of the surface
    pub fn start_at_base(&mut self) -> Result<(), TreeError> {
        self.start(self.size.base())
    }

    /// Draw the next frame; `Done` once nothing is left to grow
    pub fn tick(&mut self) -> Result<TickOutcome, TreeError> {
        match &mut self.scheduler {
            Some(scheduler) => scheduler.tick(&mut self.surface, self.size, &self.config.palette),
            None => Ok(TickOutcome::Done),
        }
    }

    /// Adopt new surface bounds and clear; the tree is kept
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.surface.clear(size);
    }

    /// Replay the growth of the current tree without regenerating it
    pub fn replay(&mut self) {
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.replay();
        }
        self.surface.clear(self.size);
    }

    /// Skip to the fully grown state
    pub fn complete(&mut self) {
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.complete();
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn tree(&self) -> Option<&TreeStructure> {
        self.scheduler.as_ref().map(GrowthScheduler::tree)
    }

    pub fn current_depth(&self) -> usize {
        self.scheduler.as_ref().map_or(0, GrowthScheduler::current_depth)
    }

    pub fn is_growing(&self) -> bool {
        self.scheduler.as_ref().is_some_and(GrowthScheduler::is_growing)
    }
}

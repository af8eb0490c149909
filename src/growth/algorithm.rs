use crate::error::TreeError;
use crate::math::Vec2;

use super::random::RandomSource;

/// Depth of the complete internal structure, independent of what is displayed
pub const FULL_DEPTH: usize = 11;
/// Animation length of every branch, in frame units
pub const TOTAL_FRAMES: f64 = 100.0;
/// Initial heading of the trunk in degrees (screen y grows downwards)
pub const ROOT_HEADING: f64 = -90.0;

/// Parameters controlling branch geometry for one tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    /// Number of depth levels to generate
    pub full_depth: usize,
    /// Linear size multiplier, already clamped to the surface
    pub scale: f64,
    /// Stroke width per unit of remaining depth
    pub branch_width: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            full_depth: FULL_DEPTH,
            scale: 1.0,
            branch_width: 1.0,
        }
    }
}

impl GrowthParams {
    /// Largest scale whose tallest possible trunk still fits `surface_height`
    pub fn max_scale(full_depth: usize, surface_height: f64) -> f64 {
        surface_height / (13.0 * full_depth as f64)
    }

    /// Params with `requested` scale clamped against `surface_height`
    pub fn fitted(requested: f64, branch_width: f64, surface_height: f64) -> Self {
        let max = Self::max_scale(FULL_DEPTH, surface_height);
        if requested > max {
            log::warn!("tree scale {requested} exceeds surface limit, clamped to {max}");
        }
        Self {
            full_depth: FULL_DEPTH,
            scale: requested.min(max),
            branch_width,
        }
    }
}

/// One straight segment of the tree plus its reveal progress
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub start: Vec2,
    pub end: Vec2,
    pub line_width: f64,
    pub total_frames: f64,
    progress_frames: f64,
}

impl Branch {
    pub fn new(start: Vec2, end: Vec2, line_width: f64) -> Self {
        Self {
            start,
            end,
            line_width,
            total_frames: TOTAL_FRAMES,
            progress_frames: 0.0,
        }
    }

    pub fn progress_frames(&self) -> f64 {
        self.progress_frames
    }

    /// Fraction of the segment drawn so far, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        (self.progress_frames / self.total_frames).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress_frames >= self.total_frames
    }

    /// Point reached by the growing tip at the current progress
    pub fn tip(&self) -> Vec2 {
        self.start.lerp(&self.end, self.progress())
    }

    fn advance(&mut self, frames: f64) {
        self.progress_frames = (self.progress_frames + frames).min(self.total_frames);
    }
}

/// All branches of one tree, bucketed by depth level
///
/// Branches live in a single arena in generation (pre-order) order; each
/// level keeps the arena indices of its branches. Within a level, the
/// children of the branch at index `k` sit at `2k` (left) and `2k + 1` (right).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStructure {
    branches: Vec<Branch>,
    levels: Vec<Vec<usize>>,
    root: Vec2,
    top: f64,
}

impl TreeStructure {
    fn empty(root: Vec2, full_depth: usize) -> Self {
        Self {
            branches: Vec::with_capacity((1usize << full_depth).saturating_sub(1)),
            levels: vec![Vec::new(); full_depth],
            root,
            top: f64::INFINITY,
        }
    }

    /// Number of depth levels held
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn level_len(&self, depth: usize) -> usize {
        self.levels.get(depth).map_or(0, Vec::len)
    }

    /// Branches at `depth` in generation order; empty past the last level
    pub fn level(&self, depth: usize) -> impl Iterator<Item = &Branch> + '_ {
        self.levels
            .get(depth)
            .into_iter()
            .flatten()
            .map(move |&index| &self.branches[index])
    }

    pub fn get(&self, depth: usize, index: usize) -> Option<&Branch> {
        let &arena_index = self.levels.get(depth)?.get(index)?;
        self.branches.get(arena_index)
    }

    /// Every branch in generation (pre-order) order
    pub fn iter_preorder(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }

    /// Anchor point of the trunk
    pub fn root(&self) -> Vec2 {
        self.root
    }

    /// Smallest y reached by any branch endpoint
    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn level_complete(&self, depth: usize) -> bool {
        self.level(depth).all(Branch::is_complete)
    }

    pub(crate) fn advance_level(&mut self, depth: usize, frames: f64) {
        let Some(indices) = self.levels.get(depth) else {
            return;
        };
        for &index in indices {
            let branch = &mut self.branches[index];
            if !branch.is_complete() {
                branch.advance(frames);
            }
        }
    }

    pub(crate) fn complete_level(&mut self, depth: usize) {
        self.advance_level(depth, f64::INFINITY);
    }

    pub(crate) fn reset_progress(&mut self) {
        for branch in &mut self.branches {
            branch.progress_frames = 0.0;
        }
    }

    fn push(&mut self, depth: usize, branch: Branch) {
        self.top = self.top.min(branch.start.y).min(branch.end.y);
        self.levels[depth].push(self.branches.len());
        self.branches.push(branch);
    }
}

/// Recursive binary branch generator
pub struct BranchGenerator<'r> {
    params: GrowthParams,
    random: &'r mut RandomSource,
}

impl<'r> BranchGenerator<'r> {
    pub fn new(params: GrowthParams, random: &'r mut RandomSource) -> Self {
        Self { params, random }
    }

    /// Build every level of a tree anchored at `root`, growing along `heading` degrees
    pub fn generate(mut self, root: Vec2, heading: f64) -> Result<TreeStructure, TreeError> {
        let mut tree = TreeStructure::empty(root, self.params.full_depth);
        self.grow(&mut tree, root, heading, 0)?;

        log::debug!(
            "generated {} branches over {} levels, top at y={:.2}",
            tree.branch_count(),
            tree.depth(),
            tree.top
        );
        Ok(tree)
    }

    fn grow(
        &mut self,
        tree: &mut TreeStructure,
        start: Vec2,
        heading: f64,
        depth: usize,
    ) -> Result<(), TreeError> {
        if depth == self.params.full_depth {
            return Ok(());
        }

        // Trunk is drawn from a longer range than the limbs
        let base = if depth == 0 {
            self.random.next(10.0, 13.0)?
        } else {
            self.random.next(0.0, 11.0)?
        };
        let length = base * self.params.scale;
        let remaining = (self.params.full_depth - depth) as f64;

        let direction = Vec2::from_heading(heading);
        let end = Vec2::new(
            start.x + direction.x * length * remaining,
            start.y + direction.y * length * remaining,
        );

        tree.push(depth, Branch::new(start, end, remaining * self.params.branch_width));

        // Each heading is drawn right before its subtree is grown
        let left = heading - self.random.next(15.0, 23.0)?;
        self.grow(tree, end, left, depth + 1)?;
        let right = heading + self.random.next(15.0, 23.0)?;
        self.grow(tree, end, right, depth + 1)
    }
}

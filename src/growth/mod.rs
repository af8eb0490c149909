//! Procedural branch generation
//!
//! The whole tree is generated up front so the animation never needs
//! randomness and a seeded restart reproduces the exact same geometry.

mod algorithm;
pub mod random;

pub use algorithm::{
    Branch, BranchGenerator, GrowthParams, TreeStructure, FULL_DEPTH, ROOT_HEADING, TOTAL_FRAMES,
};
pub use random::RandomSource;

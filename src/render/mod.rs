//! Branch rendering onto a 2D drawing surface
//!
//! `Surface` is the narrow slice of a canvas-like API the tree needs.
//! Branch drawing itself is stateless: every call resolves its stroke from
//! the palette and the tree's frozen anchor points.

use std::borrow::Cow;

use crate::error::TreeError;
use crate::growth::{Branch, TreeStructure};
use crate::math::Vec2;

pub mod canvas;
pub mod recording;

pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface, Segment};

/// Logical (CSS pixel) size of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Bottom-centre point where a tree is planted by default
    pub fn base(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop<'a> {
    pub offset: f64,
    pub color: Cow<'a, str>,
}

/// Stroke paint handed to the surface
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeStyle<'a> {
    Solid(Cow<'a, str>),
    LinearGradient {
        from: Vec2,
        to: Vec2,
        stops: [ColorStop<'a>; 2],
    },
}

impl StrokeStyle<'_> {
    pub fn into_owned(self) -> StrokeStyle<'static> {
        match self {
            StrokeStyle::Solid(color) => StrokeStyle::Solid(Cow::Owned(color.into_owned())),
            StrokeStyle::LinearGradient { from, to, stops } => {
                let [a, b] = stops;
                StrokeStyle::LinearGradient {
                    from,
                    to,
                    stops: [
                        ColorStop {
                            offset: a.offset,
                            color: Cow::Owned(a.color.into_owned()),
                        },
                        ColorStop {
                            offset: b.offset,
                            color: Cow::Owned(b.color.into_owned()),
                        },
                    ],
                }
            }
        }
    }
}

/// Drawing primitives consumed by the tree
pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn set_line_width(&mut self, width: f64);
    /// Fails when the surface cannot build the requested paint, e.g. an unparsable colour
    fn set_stroke_style(&mut self, style: &StrokeStyle<'_>) -> Result<(), TreeError>;
    fn stroke(&mut self);

    fn clear(&mut self, size: SurfaceSize) {
        self.clear_rect(0.0, 0.0, size.width, size.height);
    }
}

/// Colouring applied to every branch of a tree
#[derive(Debug, Clone, PartialEq)]
pub enum Palette {
    Solid(String),
    /// Vertical gradient from the root (`start`) to the tree top (`end`)
    Gradient { start: String, end: String },
}

impl Palette {
    pub fn stroke_style(&self, tree: &TreeStructure) -> StrokeStyle<'_> {
        match self {
            Palette::Solid(color) => StrokeStyle::Solid(Cow::Borrowed(color)),
            Palette::Gradient { start, end } => {
                let root = tree.root();
                StrokeStyle::LinearGradient {
                    from: root,
                    to: Vec2::new(root.x, tree.top()),
                    stops: [
                        ColorStop {
                            offset: 0.0,
                            color: Cow::Borrowed(start),
                        },
                        ColorStop {
                            offset: 1.0,
                            color: Cow::Borrowed(end),
                        },
                    ],
                }
            }
        }
    }
}

/// How much of a branch to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reveal {
    Full,
    /// Fraction of the segment in `[0, 1]`, measured from its start
    Partial(f64),
}

/// Stroke one branch as a straight segment
pub fn draw_branch<S: Surface + ?Sized>(
    surface: &mut S,
    branch: &Branch,
    reveal: Reveal,
    style: &StrokeStyle<'_>,
) -> Result<(), TreeError> {
    let tip = match reveal {
        Reveal::Full => branch.end,
        Reveal::Partial(t) => branch.start.lerp(&branch.end, t),
    };

    surface.begin_path();
    surface.move_to(branch.start);
    surface.line_to(tip);
    surface.set_line_width(branch.line_width);
    surface.set_stroke_style(style)?;
    surface.stroke();
    surface.close_path();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{BranchGenerator, GrowthParams, RandomSource, ROOT_HEADING};

    fn small_tree() -> TreeStructure {
        let params = GrowthParams {
            full_depth: 4,
            ..Default::default()
        };
        let mut random = RandomSource::seeded(42, params.full_depth);
        BranchGenerator::new(params, &mut random)
            .generate(Vec2::new(50.0, 300.0), ROOT_HEADING)
            .unwrap()
    }

    #[test]
    fn test_gradient_anchored_root_to_top() {
        let tree = small_tree();
        let palette = Palette::Gradient {
            start: "#8B4513".into(),
            end: "#228B22".into(),
        };
        match palette.stroke_style(&tree) {
            StrokeStyle::LinearGradient { from, to, stops } => {
                assert_eq!(from, Vec2::new(50.0, 300.0));
                assert_eq!(to, Vec2::new(50.0, tree.top()));
                assert_eq!(stops[0].offset, 0.0);
                assert_eq!(stops[0].color, "#8B4513");
                assert_eq!(stops[1].offset, 1.0);
                assert_eq!(stops[1].color, "#228B22");
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_solid_palette() {
        let tree = small_tree();
        let palette = Palette::Solid("#000".into());
        assert_eq!(palette.stroke_style(&tree), StrokeStyle::Solid("#000".into()));
    }

    #[test]
    fn test_partial_draw_interpolates() {
        let branch = Branch::new(Vec2::new(0.0, 100.0), Vec2::new(0.0, 0.0), 3.0);
        let mut surface = RecordingSurface::new();
        let style = StrokeStyle::Solid("red".into());

        draw_branch(&mut surface, &branch, Reveal::Partial(0.25), &style).unwrap();
        draw_branch(&mut surface, &branch, Reveal::Full, &style).unwrap();

        let segments = surface.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].from, Vec2::new(0.0, 100.0));
        assert_eq!(segments[0].to, Vec2::new(0.0, 75.0));
        assert_eq!(segments[0].width, 3.0);
        assert_eq!(segments[1].to, Vec2::new(0.0, 0.0));
        assert_eq!(segments[1].style, StrokeStyle::Solid("red".into()));
    }

    #[test]
    fn test_rejected_style_stops_before_stroke() {
        let branch = Branch::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 1.0);
        let mut surface = RecordingSurface::new().rejecting_color("not-a-color");
        let style = StrokeStyle::Solid("not-a-color".into());

        let result = draw_branch(&mut surface, &branch, Reveal::Full, &style);
        assert!(matches!(result, Err(TreeError::Surface(_))));
        assert!(surface.segments().is_empty());
    }
}

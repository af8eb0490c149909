//! Headless surface that records drawing commands
//!
//! Lets the growth animation run without a browser and gives tests a
//! frame-by-frame view of what was stroked.

use super::{StrokeStyle, Surface, SurfaceSize};
use crate::error::TreeError;
use crate::math::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(SurfaceSize),
    BeginPath,
    ClosePath,
    MoveTo(Vec2),
    LineTo(Vec2),
    LineWidth(f64),
    StrokeStyle(StrokeStyle<'static>),
    Stroke,
}

/// One stroked segment reassembled from the command log
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f64,
    pub style: StrokeStyle<'static>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    rejected_color: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `set_stroke_style` whenever `color` appears in the style
    pub fn rejecting_color(mut self, color: &str) -> Self {
        self.rejected_color = Some(color.to_string());
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop the log, returning what was recorded
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear(_)))
            .count()
    }

    /// Segments stroked since the most recent clear
    pub fn segments(&self) -> Vec<Segment> {
        let since_clear = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);

        let mut segments = Vec::new();
        let mut from = Vec2::ZERO;
        let mut to = Vec2::ZERO;
        let mut width = 1.0;
        let mut style = StrokeStyle::Solid("#000".into());

        for command in &self.commands[since_clear..] {
            match command {
                DrawCommand::MoveTo(p) => from = *p,
                DrawCommand::LineTo(p) => to = *p,
                DrawCommand::LineWidth(w) => width = *w,
                DrawCommand::StrokeStyle(s) => style = s.clone(),
                DrawCommand::Stroke => segments.push(Segment {
                    from,
                    to,
                    width,
                    style: style.clone(),
                }),
                DrawCommand::Clear(_) | DrawCommand::BeginPath | DrawCommand::ClosePath => {}
            }
        }
        segments
    }

    fn is_rejected(&self, style: &StrokeStyle<'_>) -> bool {
        let Some(rejected) = &self.rejected_color else {
            return false;
        };
        match style {
            StrokeStyle::Solid(color) => color == rejected,
            StrokeStyle::LinearGradient { stops, .. } => {
                stops.iter().any(|stop| &stop.color == rejected)
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, _x: f64, _y: f64, width: f64, height: f64) {
        self.commands
            .push(DrawCommand::Clear(SurfaceSize::new(width, height)));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_stroke_style(&mut self, style: &StrokeStyle<'_>) -> Result<(), TreeError> {
        if self.is_rejected(style) {
            return Err(TreeError::Surface(format!("unsupported stroke style {style:?}")));
        }
        self.commands
            .push(DrawCommand::StrokeStyle(style.clone().into_owned()));
        Ok(())
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}

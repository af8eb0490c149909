use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{StrokeStyle, Surface};
use crate::error::TreeError;
use crate::math::Vec2;

/// `Surface` backed by a browser 2D canvas context
pub struct CanvasSurface {
    pub ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Acquire the 2D context of `canvas`
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, TreeError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| TreeError::SurfaceUnavailable(js_message(&e)))?
            .ok_or_else(|| TreeError::SurfaceUnavailable("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| TreeError::SurfaceUnavailable("2d context has unexpected type".into()))?;
        Ok(Self::new(ctx))
    }

    /// Map logical pixels onto a backing store `ratio` times larger.
    ///
    /// Resizing a canvas resets its transform, so call this after every resize.
    pub fn set_pixel_ratio(&self, ratio: f64) -> Result<(), TreeError> {
        self.ctx
            .set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
            .map_err(|e| TreeError::Surface(js_message(&e)))
    }
}

impl Surface for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, point: Vec2) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Vec2) {
        self.ctx.line_to(point.x, point.y);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    #[allow(deprecated)]
    fn set_stroke_style(&mut self, style: &StrokeStyle<'_>) -> Result<(), TreeError> {
        match style {
            StrokeStyle::Solid(color) => {
                self.ctx.set_stroke_style(&JsValue::from_str(color));
            }
            StrokeStyle::LinearGradient { from, to, stops } => {
                let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                for stop in stops {
                    gradient
                        .add_color_stop(stop.offset as f32, &stop.color)
                        .map_err(|e| TreeError::Surface(js_message(&e)))?;
                }
                self.ctx.set_stroke_style(&gradient);
            }
        }
        Ok(())
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}

/// Best-effort readable text for a thrown JS value
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

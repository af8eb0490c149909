use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

pub mod animation;
pub mod config;
pub mod error;
pub mod growth;
pub mod math;
pub mod render;
pub mod stage;

pub use animation::{GrowthScheduler, TickOutcome};
pub use config::{ColorMode, TreeConfig, TreeOptions};
pub use error::TreeError;
pub use growth::{Branch, BranchGenerator, GrowthParams, RandomSource, TreeStructure};
pub use math::Vec2;
pub use render::{CanvasSurface, Palette, RecordingSurface, Surface, SurfaceSize};
pub use stage::TreeStage;

use render::canvas::js_message;

/// Install panic and log forwarding to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("console logger already installed");
        }
    }
}

type FrameCallback = Closure<dyn FnMut()>;

/// Browser-side state shared with the frame and resize callbacks
struct Host {
    window: Window,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    pixel_ratio: f64,
    stage: RefCell<TreeStage<CanvasSurface>>,
    pending_frame: Cell<Option<i32>>,
    frame_callback: RefCell<Option<FrameCallback>>,
}

impl Host {
    fn request_frame(&self) {
        let callback = self.frame_callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.pending_frame.set(Some(handle)),
            Err(e) => log::error!("requestAnimationFrame failed: {}", js_message(&e)),
        }
    }

    /// Must run before any mutation of the stage's tree
    fn cancel_frame(&self) {
        if let Some(handle) = self.pending_frame.take() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {}", js_message(&e));
            }
        }
    }

    fn on_frame(&self) {
        self.pending_frame.set(None);
        let outcome = self.stage.borrow_mut().tick();
        match outcome {
            Ok(TickOutcome::Continue) => self.request_frame(),
            Ok(TickOutcome::Done) => log::debug!("tree fully grown"),
            Err(e) => log::error!("frame failed, growth halted: {e}"),
        }
    }

    fn resize(&self) -> Result<(), TreeError> {
        let width = f64::from(self.container.client_width());
        let height = f64::from(self.container.client_height());
        self.canvas.set_width((width * self.pixel_ratio) as u32);
        self.canvas.set_height((height * self.pixel_ratio) as u32);

        let mut stage = self.stage.borrow_mut();
        stage.surface().set_pixel_ratio(self.pixel_ratio)?;
        stage.resize(SurfaceSize::new(width, height));
        Ok(())
    }

    fn restart(&self, anchor: Option<Vec2>) -> Result<(), TreeError> {
        self.cancel_frame();
        {
            let mut stage = self.stage.borrow_mut();
            match anchor {
                Some(anchor) => stage.start(anchor)?,
                None => stage.start_at_base()?,
            }
        }
        self.request_frame();
        Ok(())
    }
}

/// Fractal tree growing on a canvas appended to a container element
#[wasm_bindgen]
pub struct FractalTree {
    host: Rc<Host>,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl FractalTree {
    /// Attach a canvas to `container` (default `document.body`) and start growing.
    ///
    /// `options` is a YAML or JSON string of tree options.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Option<HtmlElement>,
        options: Option<String>,
    ) -> Result<FractalTree, JsValue> {
        let options = TreeOptions::from_yaml(options.as_deref().unwrap_or_default())?;

        let window = web_sys::window()
            .ok_or_else(|| TreeError::SurfaceUnavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| TreeError::SurfaceUnavailable("no document".into()))?;
        let container = match container {
            Some(container) => container,
            None => document
                .body()
                .ok_or_else(|| TreeError::SurfaceUnavailable("no document body".into()))?,
        };

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| TreeError::SurfaceUnavailable("failed to create canvas".into()))?;
        container.append_child(&canvas)?;
        let surface = CanvasSurface::from_canvas(&canvas)?;
        let stage = TreeStage::new(surface, SurfaceSize::default(), options)?;

        let pixel_ratio = if window.device_pixel_ratio() > 1.0 { 2.0 } else { 1.0 };
        let host = Rc::new(Host {
            window,
            container,
            canvas,
            pixel_ratio,
            stage: RefCell::new(stage),
            pending_frame: Cell::new(None),
            frame_callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&host);
        *host.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(host) = weak.upgrade() {
                host.on_frame();
            }
        }) as Box<dyn FnMut()>));

        let resize_listener = install_resize_listener(&host)?;
        let tree = Self {
            host,
            resize_listener: Some(resize_listener),
        };

        tree.host.resize()?;
        tree.host.restart(None)?;
        Ok(tree)
    }

    /// Update the options named in `options`; geometry changes apply on the next `start`
    #[wasm_bindgen]
    pub fn configure(&self, options: &str) -> Result<(), JsValue> {
        self.host.stage.borrow_mut().configure(options)?;
        Ok(())
    }

    /// Regenerate the tree rooted at (`x`, `y`) and grow it from the trunk
    #[wasm_bindgen]
    pub fn start(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.host.restart(Some(Vec2::new(x, y)))?;
        Ok(())
    }

    /// Regenerate the tree at the bottom-centre of the canvas
    #[wasm_bindgen]
    pub fn restart(&self) -> Result<(), JsValue> {
        self.host.restart(None)?;
        Ok(())
    }

    /// Re-read the container size and clear the canvas
    #[wasm_bindgen]
    pub fn on_resize(&self) -> Result<(), JsValue> {
        self.host.resize()?;
        Ok(())
    }

    /// Grow the current tree again without regenerating it
    #[wasm_bindgen]
    pub fn replay(&self) {
        self.host.cancel_frame();
        self.host.stage.borrow_mut().replay();
        self.host.request_frame();
    }

    /// Show the fully grown tree immediately
    #[wasm_bindgen]
    pub fn complete(&self) {
        self.host.cancel_frame();
        self.host.stage.borrow_mut().complete();
        self.host.request_frame();
    }

    #[wasm_bindgen]
    pub fn current_depth(&self) -> usize {
        self.host.stage.borrow().current_depth()
    }

    #[wasm_bindgen]
    pub fn is_growing(&self) -> bool {
        self.host.stage.borrow().is_growing()
    }

    #[wasm_bindgen]
    pub fn branch_count(&self) -> usize {
        self.host
            .stage
            .borrow()
            .tree()
            .map_or(0, TreeStructure::branch_count)
    }

    /// Topmost y coordinate of the generated tree, if any
    #[wasm_bindgen]
    pub fn tree_top(&self) -> Option<f64> {
        self.host.stage.borrow().tree().map(TreeStructure::top)
    }

    /// Stop the animation, detach listeners and remove the canvas
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl FractalTree {
    fn teardown(&mut self) {
        self.host.cancel_frame();
        self.host.frame_callback.borrow_mut().take();
        if let Some(listener) = self.resize_listener.take() {
            if let Err(e) = self
                .host
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach resize listener: {}", js_message(&e));
            }
            self.host.canvas.remove();
        }
    }
}

impl Drop for FractalTree {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn install_resize_listener(host: &Rc<Host>) -> Result<Closure<dyn FnMut()>, JsValue> {
    let weak: Weak<Host> = Rc::downgrade(host);
    let listener = Closure::wrap(Box::new(move || {
        if let Some(host) = weak.upgrade() {
            if let Err(e) = host.resize() {
                log::error!("resize failed: {e}");
            }
        }
    }) as Box<dyn FnMut()>);
    host.window
        .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

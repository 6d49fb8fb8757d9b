use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use tracing::{debug, warn};

use crate::api::{ChartEngine, ChartEngineConfig, FrameHost};
use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::CairoRenderer;

pub type GtkChartEngine = ChartEngine<CairoRenderer, GtkFrameHost>;
pub type UiEngine = Rc<RefCell<GtkChartEngine>>;

type EngineSlot = Rc<RefCell<Weak<RefCell<GtkChartEngine>>>>;

/// `FrameHost` backed by the GTK main loop.
///
/// Frames are one-shot `glib` timeouts that call back into the engine;
/// repaints are `queue_draw` on the chart's `DrawingArea`.
pub struct GtkFrameHost {
    drawing_area: gtk::DrawingArea,
    pending: Rc<Cell<Option<glib::SourceId>>>,
    engine: EngineSlot,
}

impl FrameHost for GtkFrameHost {
    fn schedule_frame(&mut self, delay: Duration) {
        self.cancel_frame();
        arm_frame(&self.pending, &self.engine, delay);
    }

    fn cancel_frame(&mut self) {
        if let Some(source) = self.pending.take() {
            source.remove();
        }
    }

    fn request_repaint(&mut self) {
        self.drawing_area.queue_draw();
    }

    fn has_pending_frame(&self) -> bool {
        let source = self.pending.take();
        let armed = source.is_some();
        self.pending.set(source);
        armed
    }
}

fn arm_frame(pending: &Rc<Cell<Option<glib::SourceId>>>, slot: &EngineSlot, delay: Duration) {
    let source = glib::timeout_add_local_once(delay, {
        let pending = Rc::clone(pending);
        let slot = Rc::clone(slot);
        move || {
            // The source is already gone once it fires; forget its id.
            drop(pending.take());
            let Some(engine) = slot.borrow().upgrade() else {
                return;
            };
            let Ok(mut chart) = engine.try_borrow_mut() else {
                debug!("chart busy when frame fired, retrying");
                arm_frame(&pending, &slot, delay);
                return;
            };
            if let Err(err) = chart.on_frame_tick() {
                warn!(error = %err, "chart frame failed");
            }
        }
    });
    pending.set(Some(source));
}

/// Hosts a [`ChartEngine`] inside a GTK4 `DrawingArea`: paints from the
/// draw callback, follows resizes and map/unmap visibility, and paces the
/// progressive draw with main-loop timeouts.
pub struct GtkChartAdapter {
    drawing_area: gtk::DrawingArea,
    engine: UiEngine,
}

impl GtkChartAdapter {
    pub fn new(drawing_area: gtk::DrawingArea, config: ChartEngineConfig) -> ChartResult<Self> {
        let mut config = config;
        let (width, height) = (drawing_area.width(), drawing_area.height());
        if width > 0 && height > 0 {
            config.viewport = Viewport::new(width as u32, height as u32);
        }

        let slot: EngineSlot = Rc::new(RefCell::new(Weak::new()));
        let host = GtkFrameHost {
            drawing_area: drawing_area.clone(),
            pending: Rc::new(Cell::new(None)),
            engine: Rc::clone(&slot),
        };
        let renderer = CairoRenderer::new(1, 1)?;
        let engine = Rc::new(RefCell::new(ChartEngine::new(renderer, host, config)?));
        *slot.borrow_mut() = Rc::downgrade(&engine);

        attach_callbacks(&drawing_area, &engine);
        Ok(Self {
            drawing_area,
            engine,
        })
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    /// Shared handle for driving setters from other widgets.
    #[must_use]
    pub fn engine(&self) -> UiEngine {
        Rc::clone(&self.engine)
    }
}

fn attach_callbacks(drawing_area: &gtk::DrawingArea, engine: &UiEngine) {
    {
        let engine = Rc::downgrade(engine);
        drawing_area.set_draw_func(move |_, context, _, _| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            if let Ok(mut chart) = engine.try_borrow_mut() {
                if let Err(err) = chart.paint_on_cairo_context(context) {
                    warn!(error = %err, "chart paint failed");
                }
            }
        });
    }

    {
        let engine = Rc::downgrade(engine);
        drawing_area.connect_resize(move |_, width, height| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            if let Ok(mut chart) = engine.try_borrow_mut() {
                let (width, height) = (width.max(0) as u32, height.max(0) as u32);
                if let Err(err) = chart.resize(width, height) {
                    warn!(error = %err, width, height, "chart resize failed");
                }
            }
        });
    }

    {
        let engine = Rc::downgrade(engine);
        drawing_area.connect_map(move |_| set_visible(&engine, true));
    }

    {
        let engine = Rc::downgrade(engine);
        drawing_area.connect_unmap(move |_| set_visible(&engine, false));
    }
}

fn set_visible(engine: &Weak<RefCell<GtkChartEngine>>, visible: bool) {
    let Some(engine) = engine.upgrade() else {
        return;
    };
    if let Ok(mut chart) = engine.try_borrow_mut() {
        if let Err(err) = chart.set_visible(visible) {
            warn!(error = %err, visible, "chart visibility change failed");
        }
    }
}

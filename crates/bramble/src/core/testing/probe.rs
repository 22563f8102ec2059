use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    core::{
        context::{Context, ViewContext},
        event::Event,
        id::NodeId,
        render::{Color, DrawBatch},
    },
    error::Result,
    geom::Expanse,
    layout::SelfMeasure,
    widget::{ContentMode, EventOutcome, Measurer, Widget},
};

/// A widget with scripted measurement and event handling, which records
/// what the engine does to it.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Intrinsic content size, used when the probe has no children.
    pub content: Expanse,
    /// Result of self-measurement.
    pub own: SelfMeasure,
    /// Content hosting mode.
    pub mode: ContentMode,
    /// Outcome returned from every event.
    pub outcome: EventOutcome,
    /// Colour to fill the render bounds with, if any.
    pub fill: Option<Color>,
    /// Number of self-measurements performed.
    measure_calls: Arc<AtomicUsize>,
    /// Events received, in the receiver's layout space.
    events: Arc<Mutex<Vec<Event>>>,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    /// A single-content probe with no intrinsic size.
    pub fn new() -> Self {
        Self {
            content: Expanse::zero(),
            own: SelfMeasure::default(),
            mode: ContentMode::Single,
            outcome: EventOutcome::Ignore,
            fill: None,
            measure_calls: Arc::new(AtomicUsize::new(0)),
            events: Arc::new(Mutex::new(vec![])),
        }
    }

    /// A leaf with a fixed content size.
    pub fn leaf(content: Expanse) -> Self {
        Self {
            content,
            mode: ContentMode::None,
            ..Self::new()
        }
    }

    /// A multi-content probe that overlaps its children.
    pub fn panel() -> Self {
        Self {
            mode: ContentMode::Multiple,
            ..Self::new()
        }
    }

    /// Set the self-measurement result.
    pub fn with_self(mut self, own: SelfMeasure) -> Self {
        self.own = own;
        self
    }

    /// Set the event outcome.
    pub fn with_outcome(mut self, outcome: EventOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Fill render bounds when drawn.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Shared counter of self-measurements.
    pub fn measure_calls(&self) -> Arc<AtomicUsize> {
        self.measure_calls.clone()
    }

    /// Shared log of received events.
    pub fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        self.events.clone()
    }

    /// Snapshot of the received events.
    pub fn received(events: &Mutex<Vec<Event>>) -> Vec<Event> {
        events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Widget for Probe {
    fn content_mode(&self) -> ContentMode {
        self.mode
    }

    fn measure_self(&self, _available: Expanse, _ctx: &dyn ViewContext) -> SelfMeasure {
        self.measure_calls.fetch_add(1, Ordering::SeqCst);
        self.own
    }

    fn measure_content(
        &self,
        children: &[NodeId],
        available: Expanse,
        m: &mut dyn Measurer,
    ) -> Result<Expanse> {
        let mut size = self.content;
        for child in children {
            size = size.max(m.measure(*child, available)?.desired);
        }
        Ok(size)
    }

    fn draw_self(&mut self, batch: &mut dyn DrawBatch, ctx: &dyn ViewContext) -> Result<()> {
        if let Some(color) = self.fill {
            batch.fill_rect(ctx.screen_bounds(), color, ctx.opacity());
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        if let Ok(mut events) = self.events.lock() {
            events.push(*event);
        }
        Ok(self.outcome)
    }

    fn name(&self) -> &'static str {
        "probe"
    }
}

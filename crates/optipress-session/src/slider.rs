//! Comparison slider interaction controller.
//!
//! Maps pointer/touch drag events to a clamped reveal position. The global
//! move/end listeners are a process-wide shared resource, so the controller
//! owns them as a scoped resource: at most one pair attached at a time,
//! detached on every exit path (drag end, cancel, teardown, drop).

use optipress_core::SliderState;

/// Input source driving a drag. A touch drag must not respond to pointer
/// move noise, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pointer,
    Touch,
}

/// Platform boundary for the global move/end listener pair.
pub trait ListenerHost {
    fn attach(&mut self, kind: SourceKind);
    fn detach(&mut self, kind: SourceKind);
}

/// Drag controller for the before/after comparison view.
///
/// Pure position-mapping logic over a [`SliderState`] owned by the caller
/// (typically the optimization session, which resets it when a new result
/// arrives).
pub struct SliderController<H: ListenerHost> {
    host: H,
    active: Option<SourceKind>,
}

impl<H: ListenerHost> SliderController<H> {
    pub fn new(host: H) -> Self {
        Self { host, active: None }
    }

    /// Begin a drag. Attaches the move/end listener pair for `kind`. A
    /// second start while already dragging is a no-op, so the pair is
    /// never attached twice.
    pub fn drag_start(&mut self, state: &mut SliderState, kind: SourceKind) {
        if self.active.is_some() {
            return;
        }
        self.active = Some(kind);
        state.dragging = true;
        self.host.attach(kind);
    }

    /// Update the reveal position from a move event. No-op unless a drag
    /// of the matching source kind is active and the container has been
    /// laid out (`container_width > 0`).
    pub fn drag_move(
        &self,
        state: &mut SliderState,
        kind: SourceKind,
        client_x: f32,
        container_left: f32,
        container_width: f32,
    ) {
        if self.active != Some(kind) || container_width <= 0.0 {
            return;
        }
        let position = (client_x - container_left) / container_width * 100.0;
        state.position_percent = position.clamp(0.0, 100.0);
    }

    /// End a drag of the matching source kind and detach the listeners.
    pub fn drag_end(&mut self, state: &mut SliderState, kind: SourceKind) {
        if self.active != Some(kind) {
            return;
        }
        self.release(state);
    }

    /// Cancel any active drag regardless of source kind. Called when a new
    /// result arrives or the view is torn down.
    pub fn teardown(&mut self, state: &mut SliderState) {
        if self.active.is_some() {
            self.release(state);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn release(&mut self, state: &mut SliderState) {
        if let Some(kind) = self.active.take() {
            state.dragging = false;
            self.host.detach(kind);
        }
    }
}

impl<H: ListenerHost> Drop for SliderController<H> {
    fn drop(&mut self) {
        // Backstop for a controller dropped mid-drag: the listener pair
        // must not outlive its owner.
        if let Some(kind) = self.active.take() {
            self.host.detach(kind);
        }
    }
}

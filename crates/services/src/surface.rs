//! Contract between the step engine and a 3D interaction surface.
//!
//! The surface renders parts/terminals for the current step and reports a
//! normalized [`crate::interaction::InteractionEvent`] back through the host.
//! Partial terminal selections are surface-local state and never reach the
//! engine; [`TerminalSelector`] implements that local tracking.

use lesson_core::model::{Connection, PartId, Step, TerminalId};

//
// ─── FOCUS ─────────────────────────────────────────────────────────────────────
//

/// What a surface should visually emphasize for a step, derived uniformly
/// from the step definition rather than per-scene id matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusHint {
    /// Single part to highlight, when the step names one.
    pub part: Option<PartId>,
    /// Terminal endpoints to highlight, for connection steps.
    pub terminals: Vec<TerminalId>,
}

impl FocusHint {
    #[must_use]
    pub fn for_step(step: &Step) -> Self {
        let terminals = step
            .required_connection()
            .map(|conn| vec![conn.from.clone(), conn.to.clone()])
            .unwrap_or_default();
        Self {
            part: step.focus_hint().cloned(),
            terminals,
        }
    }

    /// Hint for the terminal "module complete" state: nothing highlighted.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// A scene-specific rendering surface driven by the step engine.
///
/// Implementations own their rendering and hover/selection state; the engine
/// only pushes the step index plus a focus hint and receives normalized
/// events back through the host.
pub trait InteractionSurface {
    /// Render for the given step. Called whenever the current step index
    /// changes, including backward browsing; pending surface-local selections
    /// should reset.
    fn show_step(&mut self, index: usize, focus: &FocusHint);
}

//
// ─── TERMINAL SELECTION ────────────────────────────────────────────────────────
//

/// Result of clicking one terminal while wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Click ignored: the terminal is not part of the required connection.
    Ignored,
    /// First endpoint armed; a wire preview can follow the cursor.
    Pending,
    /// Pending selection dropped (same terminal again, or a non-matching
    /// second terminal).
    Cancelled,
    /// Both required endpoints were connected; the surface should now emit
    /// the connection-made sentinel.
    Connected,
}

/// Surface-local two-click terminal tracker for a connection step.
///
/// Only the terminal completion is ever surfaced to the engine; everything
/// else here stays inside the surface.
#[derive(Debug, Clone)]
pub struct TerminalSelector {
    required: Connection,
    pending: Option<TerminalId>,
}

impl TerminalSelector {
    #[must_use]
    pub fn new(required: Connection) -> Self {
        Self {
            required,
            pending: None,
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&TerminalId> {
        self.pending.as_ref()
    }

    /// Drop any pending selection, e.g. when the step changes.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Register a terminal click.
    ///
    /// The first click arms only on one of the required endpoints. A second
    /// click on the same terminal cancels; the matching counterpart
    /// completes the connection (order-independent); anything else cancels.
    pub fn select(&mut self, terminal: &TerminalId) -> Selection {
        match self.pending.take() {
            None => {
                if self.required.involves(terminal) {
                    self.pending = Some(terminal.clone());
                    Selection::Pending
                } else {
                    Selection::Ignored
                }
            }
            Some(first) => {
                if first == *terminal {
                    Selection::Cancelled
                } else if self.required.links(&first, terminal) {
                    Selection::Connected
                } else {
                    Selection::Cancelled
                }
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

//! Normalized events emitted by an interaction surface.

use lesson_core::model::PartId;

/// Reserved raw value meaning "the two required terminals were just
/// connected", pre-validated by the surface against the step's required
/// connection.
pub const CONNECTION_MADE_SENTINEL: &str = "CORRECT_CONNECTION_MADE";

/// A normalized user action reported by the interaction surface.
///
/// The engine does not distinguish *which* two terminals were connected for
/// `ConnectionMade`; the surface only emits the sentinel after locally
/// verifying the pair (see [`crate::surface::TerminalSelector`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    /// A single 3D part was clicked.
    PartClicked(PartId),
    /// The step's required terminal pair was completed.
    ConnectionMade,
}

impl InteractionEvent {
    /// Maps a raw surface emission (a bare part id string, or the reserved
    /// sentinel) to a normalized event.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == CONNECTION_MADE_SENTINEL {
            InteractionEvent::ConnectionMade
        } else {
            InteractionEvent::PartClicked(PartId::new(raw))
        }
    }

    #[must_use]
    pub fn part_clicked(part: impl Into<String>) -> Self {
        InteractionEvent::PartClicked(PartId::new(part))
    }
}

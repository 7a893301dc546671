//! Listener installation for point-of-interest events.

use anyhow::Result;

/// Interaction events the inspector listens to in the capture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    PointerMove,
    Click,
}

impl InteractionKind {
    pub const ALL: [Self; 2] = [Self::PointerMove, Self::Click];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub trait EventHub {
    /// Install a capture-phase listener on the document.
    ///
    /// # Errors
    /// Returns an error if the engine refuses the listener.
    fn listen(&self, kind: InteractionKind) -> Result<ListenerId>;

    /// Remove a listener. Unknown ids are ignored.
    fn unlisten(&self, listener: ListenerId);
}

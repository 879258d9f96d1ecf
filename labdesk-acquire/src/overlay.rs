//! Single-expansion overlay editor.
//!
//! One editor is shared by the staged and committed surfaces of a list, so at
//! most one item of that list has its configuration fields open.

use labdesk_types::ItemKey;

/// The item an overlay belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OverlayTarget {
    /// A candidate in the staging set.
    Staged(ItemKey),
    /// An item already in the owning collection.
    Committed(ItemKey),
}

impl OverlayTarget {
    pub fn key(&self) -> &ItemKey {
        match self {
            Self::Staged(key) | Self::Committed(key) => key,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Collapsed,
    Expanded(OverlayTarget),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayEditor {
    state: OverlayState,
}

impl OverlayEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn expanded(&self) -> Option<&OverlayTarget> {
        match &self.state {
            OverlayState::Expanded(target) => Some(target),
            OverlayState::Collapsed => None,
        }
    }

    pub fn is_expanded(&self, target: &OverlayTarget) -> bool {
        self.expanded() == Some(target)
    }

    /// Opens `target`, closing whatever was open.
    pub fn expand(&mut self, target: OverlayTarget) {
        self.state = OverlayState::Expanded(target);
    }

    pub fn collapse(&mut self) {
        self.state = OverlayState::Collapsed;
    }

    /// Closes `target` if open, otherwise opens it. Returns whether it is open
    /// afterwards.
    pub fn toggle(&mut self, target: OverlayTarget) -> bool {
        if self.is_expanded(&target) {
            self.collapse();
            false
        } else {
            self.expand(target);
            true
        }
    }

    /// Collapses only if `target` is the open one.
    pub fn collapse_if(&mut self, target: &OverlayTarget) -> bool {
        if self.is_expanded(target) {
            self.collapse();
            true
        } else {
            false
        }
    }
}

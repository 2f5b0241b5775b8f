//! Classification of filesystem notifications

use notify::event::ModifyKind;
use notify::{Event, EventKind};

/// A notification kind that triggers a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Written,
    Renamed,
    Removed,
}

impl ChangeKind {
    /// Map a notify event kind to a relevant change, if it is one.
    ///
    /// Access events, metadata-only changes and unknown kinds are ignored.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Created),
            EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Renamed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(ChangeKind::Written),
            EventKind::Remove(_) => Some(ChangeKind::Removed),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    /// Whether a directory at the event path needs its own watch
    pub fn may_add_directory(self) -> bool {
        matches!(self, ChangeKind::Created | ChangeKind::Renamed)
    }
}

/// Relevant change extracted from a notify event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub paths: Vec<std::path::PathBuf>,
}

impl Change {
    /// Keep only events that should schedule a merge
    pub fn from_event(event: Event) -> Option<Self> {
        let kind = ChangeKind::from_event_kind(&event.kind)?;
        Some(Self {
            kind,
            paths: event.paths,
        })
    }
}

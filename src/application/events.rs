//! Store change notifications.
//!
//! Listeners are invoked synchronously in registration order. Each invocation
//! is guarded: a listener that returns `Err` or panics is logged and the
//! remaining listeners still run.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use crate::domain::export::ExportFormat;
use crate::domain::foundation::{panic_message, DomainError, ErrorCode};
use crate::domain::specification::{Metadata, Section};
use crate::domain::validation::ValidationReport;

/// Event names a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEventKind {
    SectionAdded,
    SectionRemoved,
    SectionUpdated,
    SectionsReordered,
    MetadataUpdated,
    ValidationComplete,
    Exported,
    Saved,
    SaveError,
    Loaded,
    LoadError,
    Cleared,
}

impl StoreEventKind {
    pub const ALL: [StoreEventKind; 12] = [
        StoreEventKind::SectionAdded,
        StoreEventKind::SectionRemoved,
        StoreEventKind::SectionUpdated,
        StoreEventKind::SectionsReordered,
        StoreEventKind::MetadataUpdated,
        StoreEventKind::ValidationComplete,
        StoreEventKind::Exported,
        StoreEventKind::Saved,
        StoreEventKind::SaveError,
        StoreEventKind::Loaded,
        StoreEventKind::LoadError,
        StoreEventKind::Cleared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreEventKind::SectionAdded => "section-added",
            StoreEventKind::SectionRemoved => "section-removed",
            StoreEventKind::SectionUpdated => "section-updated",
            StoreEventKind::SectionsReordered => "sections-reordered",
            StoreEventKind::MetadataUpdated => "metadata-updated",
            StoreEventKind::ValidationComplete => "validation-complete",
            StoreEventKind::Exported => "exported",
            StoreEventKind::Saved => "saved",
            StoreEventKind::SaveError => "save-error",
            StoreEventKind::Loaded => "loaded",
            StoreEventKind::LoadError => "load-error",
            StoreEventKind::Cleared => "cleared",
        }
    }

    /// Looks up a kind by its event name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for StoreEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A change notification with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    SectionAdded(Section),
    SectionRemoved(Section),
    SectionUpdated(Section),
    SectionsReordered,
    MetadataUpdated(Metadata),
    ValidationComplete(ValidationReport),
    Exported { format: ExportFormat, content: String },
    Saved,
    SaveError(String),
    Loaded,
    LoadError(String),
    Cleared,
}

impl StoreEvent {
    pub fn kind(&self) -> StoreEventKind {
        match self {
            StoreEvent::SectionAdded(_) => StoreEventKind::SectionAdded,
            StoreEvent::SectionRemoved(_) => StoreEventKind::SectionRemoved,
            StoreEvent::SectionUpdated(_) => StoreEventKind::SectionUpdated,
            StoreEvent::SectionsReordered => StoreEventKind::SectionsReordered,
            StoreEvent::MetadataUpdated(_) => StoreEventKind::MetadataUpdated,
            StoreEvent::ValidationComplete(_) => StoreEventKind::ValidationComplete,
            StoreEvent::Exported { .. } => StoreEventKind::Exported,
            StoreEvent::Saved => StoreEventKind::Saved,
            StoreEvent::SaveError(_) => StoreEventKind::SaveError,
            StoreEvent::Loaded => StoreEventKind::Loaded,
            StoreEvent::LoadError(_) => StoreEventKind::LoadError,
            StoreEvent::Cleared => StoreEventKind::Cleared,
        }
    }
}

/// Callback invoked for store events.
pub trait StoreListener: Send + Sync {
    fn handle(&self, event: &StoreEvent) -> Result<(), DomainError>;
}

impl<F> StoreListener for F
where
    F: Fn(&StoreEvent) -> Result<(), DomainError> + Send + Sync,
{
    fn handle(&self, event: &StoreEvent) -> Result<(), DomainError> {
        self(event)
    }
}

/// Handle returned by [`EventEmitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Synchronous publish/subscribe list keyed by event kind.
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<StoreEventKind, Vec<(ListenerId, Arc<dyn StoreListener>)>>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a listener to one kind of event.
    pub fn on<L>(&mut self, kind: StoreEventKind, listener: L) -> ListenerId
    where
        L: StoreListener + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Unsubscribes a listener. Returns false if it was not subscribed to `kind`.
    pub fn off(&mut self, kind: StoreEventKind, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self, kind: StoreEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Delivers an event to every listener of its kind.
    pub fn emit(&self, event: &StoreEvent) {
        let kind = event.kind();
        let Some(listeners) = self.listeners.get(&kind) else {
            return;
        };

        for (_, listener) in listeners {
            if let Err(err) = deliver(listener.as_ref(), event) {
                error!(event = %kind, error = %err, "Error in event listener");
            }
        }
    }
}

/// Invokes one listener, converting a panic into `ListenerFailed`.
fn deliver(listener: &dyn StoreListener, event: &StoreEvent) -> Result<(), DomainError> {
    catch_unwind(AssertUnwindSafe(|| listener.handle(event))).unwrap_or_else(|payload| {
        Err(DomainError::new(
            ErrorCode::ListenerFailed,
            panic_message(payload.as_ref()),
        ))
    })
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (kind.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&StoreEvent) -> Result<(), DomainError>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener = move |event: &StoreEvent| -> Result<(), DomainError> {
            sink.lock().unwrap().push(event.kind().to_string());
            Ok(())
        };
        (seen, listener)
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in StoreEventKind::ALL {
            assert_eq!(StoreEventKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(StoreEventKind::from_name("unknown"), None);
    }

    #[test]
    fn emit_reaches_only_matching_listeners() {
        let mut emitter = EventEmitter::new();
        let (saved, on_saved) = recorder();
        let (cleared, on_cleared) = recorder();
        emitter.on(StoreEventKind::Saved, on_saved);
        emitter.on(StoreEventKind::Cleared, on_cleared);

        emitter.emit(&StoreEvent::Saved);

        assert_eq!(*saved.lock().unwrap(), vec!["saved"]);
        assert!(cleared.lock().unwrap().is_empty());
    }

    #[test]
    fn off_removes_listener() {
        let mut emitter = EventEmitter::new();
        let (seen, listener) = recorder();
        let id = emitter.on(StoreEventKind::Loaded, listener);

        assert!(emitter.off(StoreEventKind::Loaded, id));
        assert!(!emitter.off(StoreEventKind::Loaded, id));
        emitter.emit(&StoreEvent::Loaded);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(emitter.listener_count(StoreEventKind::Loaded), 0);
    }

    #[test]
    fn failing_listeners_do_not_stop_siblings() {
        let mut emitter = EventEmitter::new();
        emitter.on(StoreEventKind::Cleared, |_: &StoreEvent| -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InvalidFormat, "bad listener"))
        });
        emitter.on(StoreEventKind::Cleared, |_: &StoreEvent| -> Result<(), DomainError> {
            panic!("listener panicked")
        });
        let (seen, listener) = recorder();
        emitter.on(StoreEventKind::Cleared, listener);

        emitter.emit(&StoreEvent::Cleared);

        assert_eq!(*seen.lock().unwrap(), vec!["cleared"]);
    }

    #[test]
    fn panic_in_listener_surfaces_as_listener_failed() {
        let listener = |_: &StoreEvent| -> Result<(), DomainError> { panic!("listener exploded") };

        let err = deliver(&listener, &StoreEvent::Saved).unwrap_err();

        assert_eq!(err.code, ErrorCode::ListenerFailed);
        assert_eq!(err.message, "listener exploded");
    }
}

//! Document store - owns the live specification and orchestrates the
//! registry, validator, exporter and persistence.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::export::{ExportFormat, Exporter};
use crate::domain::foundation::{Clock, DomainError, SectionId, SystemClock};
use crate::domain::specification::{
    Metadata, MetadataUpdate, NewSection, Section, SectionUpdate, Specification, DEFAULT_VERSION,
};
use crate::domain::templates::TemplateRegistry;
use crate::domain::validation::{validate_section, ValidationEngine, ValidationReport};
use crate::ports::{KeyValueStore, StorageError};

use super::events::{EventEmitter, ListenerId, StoreEvent, StoreEventKind, StoreListener};

/// Persistence key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "simba-specification";

/// Title given to sections created without one.
pub const DEFAULT_SECTION_TITLE: &str = "Nueva Sección";

/// Store defaults that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub storage_key: String,
    pub default_section_title: String,
    pub default_version: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_section_title: DEFAULT_SECTION_TITLE.to_string(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// Single-owner state manager for one specification.
///
/// Every mutation marks the store dirty, refreshes `metadata.updated` and
/// notifies listeners. Persistence failures are reported through the boolean
/// result and a `save-error` / `load-error` event, never as `Err`.
pub struct DocumentStore {
    spec: Specification,
    dirty: bool,
    last_report: Option<ValidationReport>,
    section_counter: u64,
    registry: Arc<TemplateRegistry>,
    validator: ValidationEngine,
    exporter: Exporter,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    events: EventEmitter,
    settings: StoreSettings,
}

impl DocumentStore {
    /// Creates a store with the default rule set, an exporter over `registry`
    /// and the system clock.
    pub fn new(registry: Arc<TemplateRegistry>, storage: Arc<dyn KeyValueStore>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let settings = StoreSettings::default();
        Self {
            spec: Specification::empty(clock.now(), settings.default_version.clone()),
            dirty: false,
            last_report: None,
            section_counter: 0,
            exporter: Exporter::new(registry.clone()),
            registry,
            validator: ValidationEngine::new(),
            storage,
            clock,
            events: EventEmitter::new(),
            settings,
        }
    }

    /// Replaces the clock and restamps the empty specification with it.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.spec = self.fresh_specification();
        self
    }

    pub fn with_validator(mut self, validator: ValidationEngine) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn with_settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self.spec = self.fresh_specification();
        self
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    pub fn sections(&self) -> &[Section] {
        &self.spec.sections
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.spec.section(id)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.spec.metadata
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Report of the most recent `validate` call.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn validator_mut(&mut self) -> &mut ValidationEngine {
        &mut self.validator
    }

    pub fn exporter_mut(&mut self) -> &mut Exporter {
        &mut self.exporter
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Subscriptions
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn on<L>(&mut self, kind: StoreEventKind, listener: L) -> ListenerId
    where
        L: StoreListener + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, kind: StoreEventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Sections
    // ════════════════════════════════════════════════════════════════════════════════

    /// Appends a section of `section_type` at the end of the sequence.
    pub fn add_section(&mut self, section_type: &str, input: NewSection) -> Section {
        // Loaded ids may carry any counter; the timestamp part keeps ids distinct.
        self.section_counter = self.section_counter.saturating_add(1);
        let now = self.clock.now();

        let title = input
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.settings.default_section_title.clone());

        let section = Section {
            id: SectionId::mint(self.section_counter, now),
            section_type: section_type.to_string(),
            title,
            order: self.spec.sections.len() as i64,
            content: Some(input.content.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        debug!(section_id = %section.id, section_type = %section_type, "Section added");
        self.spec.sections.push(section.clone());
        self.mark_dirty();
        self.events.emit(&StoreEvent::SectionAdded(section.clone()));

        section
    }

    /// Removes a section and renumbers the rest. Returns false if absent.
    ///
    /// Emits `sections-reordered` for the renumbering, then `section-removed`.
    pub fn remove_section(&mut self, id: &SectionId) -> bool {
        let Some(index) = self.spec.position_of(id) else {
            return false;
        };

        let removed = self.spec.sections.remove(index);
        self.spec.renumber();

        debug!(section_id = %removed.id, "Section removed");
        self.mark_dirty();
        self.events.emit(&StoreEvent::SectionsReordered);
        self.events.emit(&StoreEvent::SectionRemoved(removed));
        true
    }

    /// Shallow-merges `update` into a section. Returns `None` if absent.
    pub fn update_section(&mut self, id: &SectionId, update: SectionUpdate) -> Option<Section> {
        let now = self.clock.now();
        let section = self.spec.section_mut(id)?;
        update.apply_to(section, now);
        let updated = section.clone();

        self.mark_dirty();
        self.events.emit(&StoreEvent::SectionUpdated(updated.clone()));
        Some(updated)
    }

    /// Optionally moves one section, then renumbers every `order` to its index.
    ///
    /// An out-of-range `from` skips the move; a `to` past the end appends.
    pub fn reorder_sections(&mut self, from: Option<usize>, to: Option<usize>) {
        if let (Some(from), Some(to)) = (from, to) {
            let sections = &mut self.spec.sections;
            if from < sections.len() {
                let moved = sections.remove(from);
                let to = to.min(sections.len());
                sections.insert(to, moved);
            } else {
                warn!(from, to, len = sections.len(), "Reorder source index out of range, move skipped");
            }
        }

        self.spec.renumber();
        self.mark_dirty();
        self.events.emit(&StoreEvent::SectionsReordered);
    }

    /// Standalone check of one section against its template, if registered.
    pub fn validate_section(&self, id: &SectionId) -> Option<ValidationReport> {
        let section = self.spec.section(id)?;
        let template = self.registry.get_template(&section.section_type);
        Some(validate_section(section, template))
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Metadata
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn update_metadata(&mut self, update: MetadataUpdate) -> &Metadata {
        update.apply_to(&mut self.spec.metadata, self.clock.now());
        self.mark_dirty();
        self.events
            .emit(&StoreEvent::MetadataUpdated(self.spec.metadata.clone()));
        &self.spec.metadata
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Validation and export
    // ════════════════════════════════════════════════════════════════════════════════

    /// Runs the full rule set and keeps the report.
    pub fn validate(&mut self) -> ValidationReport {
        let report = self.validator.validate(&self.spec, None);
        debug!(
            valid = report.valid,
            errors = report.error_count,
            warnings = report.warning_count,
            "Validation complete"
        );
        self.last_report = Some(report.clone());
        self.events
            .emit(&StoreEvent::ValidationComplete(report.clone()));
        report
    }

    /// Exports by format name (`markdown`, `md`, `json` or `html`).
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for any other name.
    pub fn export(&self, format: &str) -> Result<String, DomainError> {
        let format: ExportFormat = format.parse()?;
        self.export_as(format)
    }

    pub fn export_as(&self, format: ExportFormat) -> Result<String, DomainError> {
        let content = self.exporter.export(&self.spec, format)?;
        debug!(format = %format, bytes = content.len(), "Specification exported");
        self.events.emit(&StoreEvent::Exported {
            format,
            content: content.clone(),
        });
        Ok(content)
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Persistence
    // ════════════════════════════════════════════════════════════════════════════════

    /// Persists the specification under the configured key.
    pub async fn save(&mut self) -> bool {
        match self.write_to_storage().await {
            Ok(()) => {
                info!(key = %self.settings.storage_key, sections = self.spec.sections.len(), "Specification saved");
                self.dirty = false;
                self.events.emit(&StoreEvent::Saved);
                true
            }
            Err(err) => {
                error!(key = %self.settings.storage_key, error = %err, "Error saving specification");
                self.events.emit(&StoreEvent::SaveError(err.to_string()));
                false
            }
        }
    }

    /// Replaces the live specification with `data`, or with the persisted
    /// value when `data` is `None`. With nothing persisted the current state is
    /// kept.
    pub async fn load(&mut self, data: Option<Specification>) -> bool {
        let loaded = match data {
            Some(spec) => Ok(Some(spec)),
            None => self.read_from_storage().await,
        };

        match loaded {
            Ok(spec) => {
                if let Some(spec) = spec {
                    self.spec = spec;
                }
                self.dirty = false;
                self.section_counter = self.resume_counter();
                info!(key = %self.settings.storage_key, sections = self.spec.sections.len(), "Specification loaded");
                self.events.emit(&StoreEvent::Loaded);
                true
            }
            Err(err) => {
                error!(key = %self.settings.storage_key, error = %err, "Error loading specification");
                self.events.emit(&StoreEvent::LoadError(err.to_string()));
                false
            }
        }
    }

    /// Parses the JSON interchange format and loads it.
    pub async fn load_json(&mut self, json: &str) -> bool {
        match Specification::from_json(json) {
            Ok(spec) => self.load(Some(spec)).await,
            Err(err) => {
                error!(error = %err, "Error loading specification");
                self.events.emit(&StoreEvent::LoadError(err.to_string()));
                false
            }
        }
    }

    /// Resets to a fresh empty specification.
    pub fn clear(&mut self) {
        self.spec = self.fresh_specification();
        self.last_report = None;
        self.dirty = false;
        self.section_counter = 0;
        debug!("Specification cleared");
        self.events.emit(&StoreEvent::Cleared);
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════════════════════════════════════════

    fn fresh_specification(&self) -> Specification {
        Specification::empty(self.clock.now(), self.settings.default_version.clone())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.spec.metadata.updated = Some(self.clock.now());
    }

    /// Next counter value that cannot collide with a loaded minted id.
    fn resume_counter(&self) -> u64 {
        let highest = self
            .spec
            .sections
            .iter()
            .filter_map(|s| s.id.counter())
            .max()
            .unwrap_or(0);
        highest.max(self.spec.sections.len() as u64)
    }

    async fn write_to_storage(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.spec)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        self.storage.set(&self.settings.storage_key, &json).await
    }

    async fn read_from_storage(&self) -> Result<Option<Specification>, StorageError> {
        let Some(json) = self.storage.get(&self.settings.storage_key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::serialization(e.to_string()))
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("sections", &self.spec.sections.len())
            .field("dirty", &self.dirty)
            .field("section_counter", &self.section_counter)
            .field("settings", &self.settings)
            .field("events", &self.events)
            .finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

//! Session orchestrator.
//!
//! A [`Session`] owns the schema registry, the synthesizer, the current
//! selection and the last cohort. Each trigger runs the smallest pipeline
//! that keeps everything consistent:
//!
//! | Trigger            | Stages                                    |
//! |--------------------|-------------------------------------------|
//! | row count          | synthesize, filter                        |
//! | add column         | schema, synthesize, filter                |
//! | remove column      | schema, selection repair, synthesize, filter |
//! | filter change/reset| filter                                    |
//! | selection change   | validate selection                        |
//!
//! Schema, filter and selection errors leave the session untouched.
//! Synthesis errors keep the previous cohort and record a [`SessionNotice`].

use std::collections::VecDeque;

use cohort_model::{
    ColumnDefinition, FilterState, FilterValue, Schema, SchemaRegistry, Selection,
    SelectionUpdate,
};
use tracing::{debug, info, warn};

use crate::error::{CohortError, Result, SynthesisError};
use crate::filter::apply_filters;
use crate::frame::Cohort;
use crate::options::SessionOptions;
use crate::plot::{PlotSpec, resolve};
use crate::synth::{CohortSynthesizer, SynthesisCapability};

/// An external event for the session to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    RowCountChanged(i64),
    AddColumn(ColumnDefinition),
    RemoveColumn(String),
    FilterChanged { column: String, value: FilterValue },
    FilterReset(String),
    SelectionChanged(SelectionUpdate),
}

/// Severity of a synthesis failure shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The next trigger may succeed.
    Retryable,
    /// The capability broke its contract or the input was unusable.
    Integrity,
}

/// Last synthesis failure, kept until a synthesis succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&SynthesisError> for SessionNotice {
    fn from(err: &SynthesisError) -> Self {
        let kind = if err.is_retryable() {
            NoticeKind::Retryable
        } else {
            NoticeKind::Integrity
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Session-scoped store and pipeline driver.
#[derive(Debug)]
pub struct Session {
    registry: SchemaRegistry,
    synthesizer: CohortSynthesizer,
    options: SessionOptions,
    row_count: usize,
    selection: Selection,
    synthesized: Option<Cohort>,
    filtered: Option<Cohort>,
    notice: Option<SessionNotice>,
    pending: VecDeque<Trigger>,
}

impl Session {
    /// Create a session without synthesizing. The RNG is seeded from
    /// `options.seed` when set.
    pub fn new(capability: Box<dyn SynthesisCapability>, options: SessionOptions) -> Self {
        Self::with_registry(capability, options, SchemaRegistry::new())
    }

    /// Create a session over a prepared registry, e.g. one holding custom
    /// columns and filters loaded from configuration. Nothing is synthesized.
    pub fn with_registry(
        capability: Box<dyn SynthesisCapability>,
        options: SessionOptions,
        registry: SchemaRegistry,
    ) -> Self {
        let synthesizer = match options.seed {
            Some(seed) => CohortSynthesizer::with_seed(capability, seed),
            None => CohortSynthesizer::new(capability),
        };
        let row_count = options.initial_row_count();
        Self {
            registry,
            synthesizer,
            options,
            row_count,
            selection: Selection::default(),
            synthesized: None,
            filtered: None,
            notice: None,
            pending: VecDeque::new(),
        }
    }

    /// Create a session and synthesize the initial cohort.
    ///
    /// # Errors
    ///
    /// Returns the synthesis error of the first run.
    pub fn start(capability: Box<dyn SynthesisCapability>, options: SessionOptions) -> Result<Self> {
        let mut session = Self::new(capability, options);
        session.refresh()?;
        Ok(session)
    }

    /// Name of the synthesis capability in use.
    pub fn capability_name(&self) -> &str {
        self.synthesizer.capability_name()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn schema(&self) -> &Schema {
        self.registry.schema()
    }

    pub fn filters(&self) -> &FilterState {
        self.registry.filters()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Row count used for the next synthesis.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Last synthesized cohort before filtering.
    pub fn synthesized_cohort(&self) -> Option<&Cohort> {
        self.synthesized.as_ref()
    }

    /// Filtered cohort for tabular display.
    ///
    /// # Errors
    ///
    /// [`CohortError::NoCohort`] before the first successful synthesis.
    pub fn current_cohort(&self) -> Result<&Cohort> {
        self.filtered.as_ref().ok_or(CohortError::NoCohort)
    }

    /// Plot description for the current selection and filtered cohort.
    ///
    /// # Errors
    ///
    /// [`CohortError::NoCohort`] before the first synthesis, otherwise any
    /// selection error from [`resolve`].
    pub fn current_plot_spec(&self) -> Result<PlotSpec> {
        let cohort = self.current_cohort()?;
        let spec = resolve(
            &self.selection,
            self.registry.schema(),
            cohort,
            self.options.color_policy,
        )?;
        Ok(spec)
    }

    /// Columns for selectors and filter widgets, fixed first.
    pub fn available_columns(&self) -> Vec<ColumnDefinition> {
        self.registry.list_columns()
    }

    /// Last synthesis failure, if the latest run did not succeed.
    pub fn notice(&self) -> Option<&SessionNotice> {
        self.notice.as_ref()
    }

    /// Synthesize and filter at the current row count.
    ///
    /// # Errors
    ///
    /// Returns the synthesis error; the previous cohort is kept.
    pub fn refresh(&mut self) -> Result<()> {
        self.resynthesize()
    }

    /// Clamp `requested` into the configured bounds and resynthesize.
    /// Returns the row count actually used.
    ///
    /// # Errors
    ///
    /// Returns the synthesis error; the previous cohort is kept and the new
    /// row count is retained for the next attempt.
    pub fn on_row_count_change(&mut self, requested: i64) -> Result<usize> {
        let rows = self.options.row_bounds.clamp(requested);
        if rows != usize::try_from(requested).unwrap_or(0) {
            debug!(requested, rows, "clamped row count");
        }
        self.row_count = rows;
        self.resynthesize()?;
        Ok(rows)
    }

    /// Add a custom column and resynthesize.
    ///
    /// # Errors
    ///
    /// A schema error leaves the session untouched. A synthesis error keeps
    /// the new column in the schema and the previous cohort on display.
    pub fn on_add_column(&mut self, definition: ColumnDefinition) -> Result<()> {
        self.registry.add_column(definition)?;
        info!(columns = self.registry.schema().len(), "added column");
        self.resynthesize()
    }

    /// Remove a custom column, repair the selection and resynthesize.
    ///
    /// # Errors
    ///
    /// A schema error leaves the session untouched. On a synthesis error the
    /// previous cohort is kept with the removed column dropped.
    pub fn on_remove_column(&mut self, name: &str) -> Result<ColumnDefinition> {
        let removed = self.registry.remove_column(name)?;
        if self.selection.repair(self.registry.schema()) {
            debug!(selection = ?self.selection, "repaired selection");
        }
        info!(column = %removed.name, "removed column");

        if let Err(err) = self.resynthesize() {
            self.synthesized = project_without(self.synthesized.take(), &removed.name)?;
            self.filtered = project_without(self.filtered.take(), &removed.name)?;
            return Err(err);
        }
        Ok(removed)
    }

    /// Replace one column's filter and refilter the last cohort.
    ///
    /// # Errors
    ///
    /// An invalid filter is rejected and the previous one kept.
    pub fn on_filter_change(&mut self, column: &str, value: FilterValue) -> Result<()> {
        self.registry.set_filter(column, value)?;
        self.refilter()
    }

    /// Restore one column's accept-all filter and refilter.
    ///
    /// # Errors
    ///
    /// Fails when the column is not in the schema.
    pub fn on_filter_reset(&mut self, column: &str) -> Result<()> {
        self.registry.reset_filter(column)?;
        self.refilter()
    }

    /// Apply a partial selection change.
    ///
    /// # Errors
    ///
    /// An update producing an invalid selection is rejected and the
    /// previous selection kept.
    pub fn on_selection_change(&mut self, update: &SelectionUpdate) -> Result<()> {
        let candidate = self.selection.updated(update);
        candidate.encodings(self.registry.schema(), self.options.color_policy)?;
        self.selection = candidate;
        Ok(())
    }

    /// Run one trigger to completion.
    ///
    /// # Errors
    ///
    /// Returns the error of the dispatched handler.
    pub fn handle(&mut self, trigger: Trigger) -> Result<()> {
        match trigger {
            Trigger::RowCountChanged(rows) => self.on_row_count_change(rows).map(|_| ()),
            Trigger::AddColumn(definition) => self.on_add_column(definition),
            Trigger::RemoveColumn(name) => self.on_remove_column(&name).map(|_| ()),
            Trigger::FilterChanged { column, value } => self.on_filter_change(&column, value),
            Trigger::FilterReset(column) => self.on_filter_reset(&column),
            Trigger::SelectionChanged(update) => self.on_selection_change(&update),
        }
    }

    /// Queue a trigger for the next [`Session::drain`].
    pub fn enqueue(&mut self, trigger: Trigger) {
        self.pending.push_back(trigger);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Process queued triggers in arrival order, each against the state
    /// left by the previous one. Failures do not stop the queue; their
    /// errors are returned in order.
    pub fn drain(&mut self) -> Vec<CohortError> {
        let mut errors = Vec::new();
        while let Some(trigger) = self.pending.pop_front() {
            if let Err(err) = self.handle(trigger) {
                warn!(error = %err, "trigger rejected");
                errors.push(err);
            }
        }
        errors
    }

    fn resynthesize(&mut self) -> Result<()> {
        let schema = self.registry.schema();
        match self.synthesizer.synthesize(schema, self.row_count) {
            Ok(cohort) => {
                let filtered = apply_filters(&cohort, schema, self.registry.filters())?;
                info!(
                    rows = cohort.row_count(),
                    kept = filtered.row_count(),
                    "refreshed cohort"
                );
                self.synthesized = Some(cohort);
                self.filtered = Some(filtered);
                self.notice = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "synthesis failed, keeping previous cohort");
                self.notice = Some(SessionNotice::from(&err));
                Err(err.into())
            }
        }
    }

    fn refilter(&mut self) -> Result<()> {
        let Some(cohort) = &self.synthesized else {
            return Ok(());
        };
        let filtered = apply_filters(cohort, self.registry.schema(), self.registry.filters())?;
        debug!(kept = filtered.row_count(), "refiltered cohort");
        self.filtered = Some(filtered);
        Ok(())
    }
}

fn project_without(cohort: Option<Cohort>, column: &str) -> Result<Option<Cohort>> {
    match cohort {
        Some(cohort) if cohort.has_column(column) => cohort.without_column(column).map(Some),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::IdentitySampler;
    use cohort_model::{PlotType, SchemaError, SelectionError};

    fn session() -> Session {
        let options = SessionOptions::new().with_seed(7).with_initial_rows(120);
        Session::start(Box::new(IdentitySampler), options).unwrap()
    }

    #[test]
    fn start_synthesizes_initial_cohort() {
        let session = session();
        assert_eq!(session.current_cohort().unwrap().row_count(), 120);
        assert!(session.notice().is_none());
    }

    #[test]
    fn new_session_has_no_cohort() {
        let session = Session::new(Box::new(IdentitySampler), SessionOptions::default());
        assert_eq!(session.current_cohort().unwrap_err(), CohortError::NoCohort);
        assert_eq!(session.current_plot_spec().unwrap_err(), CohortError::NoCohort);
    }

    #[test]
    fn row_count_is_clamped() {
        let mut session = session();
        assert_eq!(session.on_row_count_change(20_000).unwrap(), 10_000);
        assert_eq!(session.synthesized_cohort().unwrap().row_count(), 10_000);
        assert_eq!(session.on_row_count_change(3).unwrap(), 100);
    }

    #[test]
    fn filter_change_does_not_resynthesize() {
        let mut session = session();
        let before = session.synthesized_cohort().cloned().unwrap();
        session
            .on_filter_change("Age", FilterValue::range(40.0, 60.0))
            .unwrap();
        assert_eq!(session.synthesized_cohort().unwrap(), &before);
        let ages = session.current_cohort().unwrap().numeric_values("Age").unwrap();
        assert!(ages.into_iter().flatten().all(|a| (40.0..=60.0).contains(&a)));

        session.on_filter_reset("Age").unwrap();
        assert_eq!(session.current_cohort().unwrap(), &before);
    }

    #[test]
    fn rejected_schema_change_leaves_state() {
        let mut session = session();
        let cohort = session.current_cohort().cloned().unwrap();
        let err = session
            .on_add_column(ColumnDefinition::numeric("age", 0.0, 1.0))
            .unwrap_err();
        assert_eq!(err, CohortError::Schema(SchemaError::DuplicateName("Age".to_string())));
        assert_eq!(session.available_columns().len(), 7);
        assert_eq!(session.current_cohort().unwrap(), &cohort);
    }

    #[test]
    fn invalid_selection_keeps_previous() {
        let mut session = session();
        let before = session.selection().clone();
        let update = SelectionUpdate::default()
            .plot_type(PlotType::Scatter)
            .y(None);
        assert!(session.on_selection_change(&update).is_err());
        assert_eq!(session.selection(), &before);
    }

    #[test]
    fn unknown_unused_bindings_are_rejected() {
        let mut session = session();
        let before = session.selection().clone();
        assert_eq!(before.plot_type, PlotType::Histogram);

        let err = session
            .on_selection_change(&SelectionUpdate::default().y(Some("Nope".to_string())))
            .unwrap_err();
        assert_eq!(
            err,
            CohortError::Selection(SelectionError::UnknownColumn("Nope".to_string()))
        );

        let err = session
            .on_selection_change(&SelectionUpdate::default().color(Some("Ghost".to_string())))
            .unwrap_err();
        assert_eq!(
            err,
            CohortError::Selection(SelectionError::UnknownColumn("Ghost".to_string()))
        );
        assert_eq!(session.selection(), &before);
    }

    #[test]
    fn queued_triggers_apply_in_order() {
        let mut session = session();
        session.enqueue(Trigger::AddColumn(ColumnDefinition::numeric("Steps", 0.0, 20_000.0)));
        session.enqueue(Trigger::SelectionChanged(SelectionUpdate::default().x("Steps")));
        session.enqueue(Trigger::RemoveColumn("Steps".to_string()));
        assert_eq!(session.pending(), 3);
        let errors = session.drain();
        assert!(errors.is_empty());
        assert_eq!(session.pending(), 0);
        assert_eq!(session.selection().x_var, "Age");
        assert!(!session.current_cohort().unwrap().has_column("Steps"));
    }

    #[test]
    fn drain_continues_after_error() {
        let mut session = session();
        session.enqueue(Trigger::RemoveColumn("Age".to_string()));
        session.enqueue(Trigger::RowCountChanged(150));
        let errors = session.drain();
        assert_eq!(errors, vec![CohortError::Schema(SchemaError::FixedColumn("Age".to_string()))]);
        assert_eq!(session.current_cohort().unwrap().row_count(), 150);
    }
}

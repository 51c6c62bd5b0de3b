//! Owns the record set and keeps the derived views in step with it.
//!
//! A session moves `Idle → Loading → Ready | Failed`. The asynchronous
//! parts (fetching the job file, the geolocation request) run outside the
//! session and hand their results back; results arriving after
//! [`Session::dispose`], or for a load superseded by a newer one, are
//! dropped.

use std::sync::Arc;

use jobmap_core::{
    AppConfig, BoundingBox, CityTable, ClusterSettings, Coordinates, FilterCriteria, JobRecord,
};
use jobmap_geo::{fit_zoom, viewport_around, ClusterFeature, ClusterId, SpatialIndex};
use jobmap_loader::{load, LoadError, RowDiagnostic};
use rand::Rng;
use serde::Serialize;

use crate::filter::{employer_postings, evaluate, EmployerGroup};
use crate::memo::Memo;
use crate::state::{reduce, Action, Effects, ViewState};
use crate::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    /// Retryable error state; the message is shown to the user.
    Failed(String),
}

/// Identifies one load attempt, so a late result can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
}

#[derive(Debug, PartialEq)]
struct ClusterKey {
    generation: u64,
    bbox: BoundingBox,
    zoom: u8,
}

#[derive(Debug, PartialEq)]
struct GroupKey {
    generation: u64,
    criteria: FilterCriteria,
    user_location: Option<Coordinates>,
}

#[derive(Debug)]
pub struct Session {
    cities: CityTable,
    surface_px: (u32, u32),
    records: Arc<[Arc<JobRecord>]>,
    /// Bumped on every record-set change; part of every memo key.
    generation: u64,
    index: SpatialIndex,
    state: ViewState,
    status: LoadStatus,
    diagnostics: Vec<RowDiagnostic>,
    load_epoch: u64,
    disposed: bool,
    clusters: Memo<ClusterKey, Vec<ClusterFeature>>,
    groups: Memo<GroupKey, Vec<EmployerGroup>>,
}

impl Session {
    #[must_use]
    pub fn new(settings: ClusterSettings, cities: CityTable, width_px: u32, height_px: u32) -> Self {
        Self {
            cities,
            surface_px: (width_px, height_px),
            records: Arc::from(Vec::new()),
            generation: 0,
            index: SpatialIndex::new(settings),
            state: ViewState::default(),
            status: LoadStatus::Idle,
            diagnostics: Vec::new(),
            load_epoch: 0,
            disposed: false,
            clusters: Memo::new(),
            groups: Memo::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig, cities: CityTable) -> Self {
        Self::new(
            config.cluster,
            cities,
            config.viewport_width_px,
            config.viewport_height_px,
        )
    }

    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn cities(&self) -> &CityTable {
        &self.cities
    }

    /// The current record set, shared read-only.
    #[must_use]
    pub fn records(&self) -> Arc<[Arc<JobRecord>]> {
        Arc::clone(&self.records)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-level problems from the last successful load.
    #[must_use]
    pub fn diagnostics(&self) -> &[RowDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Start a load attempt. Any earlier outstanding attempt becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_epoch += 1;
        if !self.disposed {
            self.status = LoadStatus::Loading;
        }
        LoadTicket {
            epoch: self.load_epoch,
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.disposed && ticket.epoch == self.load_epoch
    }

    /// Hand back the fetched job file for `ticket`.
    ///
    /// Returns `false` if the result was stale and ignored. On failure the
    /// session enters [`LoadStatus::Failed`] and keeps no partial records.
    pub fn complete_load<R: Rng + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<String, LoadError>,
        rng: &mut R,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                epoch = ticket.epoch,
                current = self.load_epoch,
                disposed = self.disposed,
                "ignoring stale load result"
            );
            return false;
        }

        match fetched.and_then(|raw| load(&raw, &self.cities, rng)) {
            Ok(report) => {
                let records: Vec<Arc<JobRecord>> =
                    report.records.into_iter().map(Arc::new).collect();
                self.set_records(records.into());
                self.diagnostics = report.diagnostics;
                self.status = LoadStatus::Ready;
                self.fit_to_records();
            }
            Err(e) => {
                tracing::warn!(error = %e, "job data load failed");
                self.set_records(Arc::from(Vec::new()));
                self.diagnostics.clear();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        true
    }

    fn set_records(&mut self, records: Arc<[Arc<JobRecord>]>) {
        self.index.rebuild(&records);
        self.records = records;
        self.generation += 1;
    }

    fn fit_to_records(&mut self) {
        let Some(bounds) = BoundingBox::enclosing(self.records.iter().map(|r| r.coordinates))
        else {
            return;
        };
        let (width, height) = self.surface_px;
        let zoom = fit_zoom(&bounds, width, height);
        let viewport = viewport_around(bounds.center(), zoom, width, height);
        self.dispatch(Action::InitialFit(viewport));
    }

    /// Apply a user or map action.
    pub fn dispatch(&mut self, action: Action) -> Effects {
        if self.disposed {
            tracing::debug!(?action, "ignoring action after dispose");
            return Effects::default();
        }
        let transition = reduce(&self.state, action);
        self.state = transition.state;
        transition.effects
    }

    /// Deliver the one-shot geolocation result. `None` means denied or
    /// failed; the default view stays in place either way.
    pub fn geolocation_resolved(&mut self, position: Option<Coordinates>) -> Effects {
        match position {
            Some(p) => self.dispatch(Action::GeolocationResolved(p)),
            None => self.dispatch(Action::GeolocationFailed),
        }
    }

    /// Stop accepting results and actions.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.clusters.clear();
        self.groups.clear();
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        if self.status == LoadStatus::Ready && !self.disposed {
            Ok(())
        } else {
            Err(SessionError::NotReady)
        }
    }

    /// Markers for the current viewport, recomputed only when the record set,
    /// bounding box or discrete zoom changes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotReady`] before a successful load or when no
    /// viewport is known yet.
    pub fn clusters(&mut self) -> Result<&[ClusterFeature], SessionError> {
        self.ensure_ready()?;
        let viewport = self.state.viewport.ok_or(SessionError::NotReady)?;
        let key = ClusterKey {
            generation: self.generation,
            bbox: viewport.bounding_box,
            zoom: viewport.zoom_level(),
        };
        let index = &self.index;
        Ok(self
            .clusters
            .get_or_compute(key, |k| index.query(&k.bbox, k.zoom))
            .as_slice())
    }

    /// Employer groups for the panel, recomputed only when the record set,
    /// criteria or user location changes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotReady`] before a successful load.
    pub fn groups(&mut self) -> Result<&[EmployerGroup], SessionError> {
        self.ensure_ready()?;
        let key = GroupKey {
            generation: self.generation,
            criteria: self.state.criteria.clone(),
            user_location: self.state.user_location.position(),
        };
        let records = &self.records;
        Ok(self
            .groups
            .get_or_compute(key, |k| evaluate(records, &k.criteria, k.user_location))
            .as_slice())
    }

    /// Zoom the map should jump to for a clicked cluster.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before a load, or
    /// [`SessionError::UnknownCluster`] for an id the index does not hold.
    pub fn zoom_to_cluster(&self, id: ClusterId) -> Result<u8, SessionError> {
        self.ensure_ready()?;
        self.index
            .zoom_to_cluster(id)
            .ok_or(SessionError::UnknownCluster(id.0))
    }

    /// Every posting behind a cluster marker.
    ///
    /// # Errors
    ///
    /// Same as [`zoom_to_cluster`](Self::zoom_to_cluster).
    pub fn cluster_leaves(&self, id: ClusterId) -> Result<Vec<Arc<JobRecord>>, SessionError> {
        self.ensure_ready()?;
        self.index
            .leaves(id)
            .ok_or(SessionError::UnknownCluster(id.0))
    }

    #[must_use]
    pub fn selected_job(&self) -> Option<Arc<JobRecord>> {
        let id = self.state.selected_job?;
        self.records.iter().find(|r| r.id == id).cloned()
    }

    /// All postings of the selected employer, regardless of the current
    /// filters.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotReady`] before a successful load.
    pub fn selected_group(&self) -> Result<Option<EmployerGroup>, SessionError> {
        self.ensure_ready()?;
        let Some(name) = self.state.selected_employer.as_deref() else {
            return Ok(None);
        };
        Ok(employer_postings(
            &self.records,
            name,
            self.state.user_location.position(),
        ))
    }

    /// How many times each derived view has been recomputed.
    #[must_use]
    pub fn recompute_counts(&self) -> (u64, u64) {
        (self.clusters.misses(), self.groups.misses())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

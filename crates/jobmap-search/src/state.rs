//! Viewport, filter and selection state as an immutable snapshot.
//!
//! [`reduce`] turns a snapshot and an [`Action`] into the next snapshot plus
//! the [`Effects`] the change implies. Viewport changes only ever re-query
//! clusters, and filter changes only ever re-evaluate groups.

use jobmap_core::{
    Coordinates, ExperienceLevel, FilterCriteria, JobId, JobType, ViewportState, MAX_LATITUDE,
    MAX_ZOOM, MIN_ZOOM,
};
use serde::Serialize;

/// Zoom the map jumps to when the user's location becomes known.
pub const USER_LOCATION_ZOOM: f64 = 12.0;

/// One-shot geolocation result for the session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UserLocation {
    #[default]
    Pending,
    Located {
        position: Coordinates,
    },
    Unavailable,
}

impl UserLocation {
    #[must_use]
    pub fn position(&self) -> Option<Coordinates> {
        match self {
            UserLocation::Located { position } => Some(*position),
            UserLocation::Pending | UserLocation::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, UserLocation::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewState {
    /// `None` until the map reports a viewport or the first load fits one.
    pub viewport: Option<ViewportState>,
    pub criteria: FilterCriteria,
    pub user_location: UserLocation,
    pub selected_job: Option<JobId>,
    pub selected_employer: Option<String>,
    /// The employer detail view is open; selection is frozen until
    /// [`Action::BackFromDetail`].
    pub detail_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The map surface reported a pan or zoom.
    ViewportChanged(ViewportState),
    /// Fit-to-bounds after the first load; ignored once any viewport exists.
    InitialFit(ViewportState),
    SearchTextChanged(String),
    JobTypeSelected(JobType),
    ExperienceSelected(ExperienceLevel),
    /// Invalid distances leave the criteria unchanged.
    MaxDistanceSelected(Option<f64>),
    CriteriaReplaced(FilterCriteria),
    /// An individual marker was clicked.
    JobSelected(JobId),
    /// An employer card was clicked.
    EmployerSelected(String),
    /// Open the detail view for the selected employer.
    DetailOpened,
    BackFromDetail,
    /// Click on the bare map surface.
    MapClicked,
    GeolocationResolved(Coordinates),
    GeolocationFailed,
}

/// Map recenter request for the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recenter {
    pub center: Coordinates,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Effects {
    pub requery_clusters: bool,
    pub reevaluate_groups: bool,
    pub recenter: Option<Recenter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub effects: Effects,
}

fn clamp_viewport(mut viewport: ViewportState) -> ViewportState {
    viewport.zoom = viewport.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    viewport.center.lat = viewport.center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    viewport
}

/// Compute the snapshot that follows `state` under `action`.
#[must_use]
pub fn reduce(state: &ViewState, action: Action) -> Transition {
    let mut next = state.clone();
    let mut effects = Effects::default();

    match action {
        Action::ViewportChanged(viewport) => {
            next.viewport = Some(clamp_viewport(viewport));
            effects.requery_clusters = next.viewport != state.viewport;
        }
        Action::InitialFit(viewport) => {
            if state.viewport.is_none() {
                next.viewport = Some(clamp_viewport(viewport));
                effects.requery_clusters = true;
            }
        }
        Action::SearchTextChanged(text) => next.criteria.search_text = text,
        Action::JobTypeSelected(job_type) => next.criteria.job_type = job_type,
        Action::ExperienceSelected(level) => next.criteria.experience_level = level,
        Action::MaxDistanceSelected(miles) => {
            match state.criteria.clone().with_max_distance(miles) {
                Ok(criteria) => next.criteria = criteria,
                Err(e) => tracing::warn!(error = %e, "ignoring distance filter"),
            }
        }
        Action::CriteriaReplaced(criteria) => next.criteria = criteria,
        Action::JobSelected(id) => {
            if !state.detail_open {
                next.selected_job = Some(id);
            }
        }
        Action::EmployerSelected(name) => {
            if !state.detail_open {
                next.selected_employer = Some(name);
                next.selected_job = None;
            }
        }
        Action::DetailOpened => {
            next.detail_open = state.selected_employer.is_some();
        }
        Action::BackFromDetail => {
            if state.detail_open {
                next.detail_open = false;
                next.selected_employer = None;
            }
        }
        Action::MapClicked => {
            if !state.detail_open {
                next.selected_job = None;
            }
        }
        Action::GeolocationResolved(position) => {
            if !state.user_location.is_resolved() {
                next.user_location = UserLocation::Located { position };
                effects.reevaluate_groups = true;
                effects.recenter = Some(Recenter {
                    center: position,
                    zoom: USER_LOCATION_ZOOM,
                });
            }
        }
        Action::GeolocationFailed => {
            if !state.user_location.is_resolved() {
                tracing::debug!("geolocation unavailable, keeping the default view");
                next.user_location = UserLocation::Unavailable;
            }
        }
    }

    if next.criteria != state.criteria {
        effects.reevaluate_groups = true;
    }

    Transition {
        state: next,
        effects,
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

//! Derived views over a loaded job set: employer groups for the panel,
//! cluster markers for the map, and the session that keeps both in step
//! with viewport, filter and selection state.

pub mod error;
pub mod filter;
pub mod memo;
pub mod session;
pub mod state;

pub use error::SessionError;
pub use filter::{employer_postings, evaluate, EmployerGroup};
pub use memo::Memo;
pub use session::{LoadStatus, LoadTicket, Session};
pub use state::{
    reduce, Action, Effects, Recenter, Transition, UserLocation, ViewState, USER_LOCATION_ZOOM,
};

//! JSON REST API for fisio.
//!
//! Exposes an axum [`Router`] backed by any
//! [`fisio_core::store::ClinicalStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fisio_api::api_router(store.clone()))
//! ```

pub mod checklists;
pub mod error;
pub mod injuries;
pub mod players;
pub mod reports;
pub mod status;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use fisio_core::{store::ClinicalStore, timeline::TimelineService};

pub use error::ApiError;

/// Shared state threaded through all handlers. Roster reads/writes go
/// straight to the store; everything with domain rules goes through the
/// timeline service.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub timeline: TimelineService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      timeline: self.timeline.clone(),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ClinicalStore + 'static,
{
  let state = AppState {
    timeline: TimelineService::new(Arc::clone(&store)),
    store,
  };

  Router::new()
    // Players
    .route("/players", get(players::list::<S>).post(players::create::<S>))
    .route("/players/{id}", get(players::get_one::<S>))
    .route("/players/{id}/deactivate", post(players::deactivate::<S>))
    .route("/players/{id}/photo", put(players::set_photo::<S>))
    .route(
      "/players/{id}/checklists",
      get(checklists::list_for_player::<S>),
    )
    // Injuries
    .route("/injuries", post(injuries::create::<S>))
    .route("/injuries/active", get(injuries::list_active::<S>))
    .route("/injuries/{id}", get(injuries::get_one::<S>))
    .route("/injuries/{id}/finalize", post(injuries::finalize::<S>))
    // Daily timeline
    .route("/injuries/{id}/status", post(status::create::<S>))
    .route("/injuries/{id}/history", get(status::history::<S>))
    // Checklists
    .route("/checklists", post(checklists::create::<S>))
    // Reports
    .route("/reports", get(reports::for_kind::<S>))
    .route("/reports/range", get(reports::for_range::<S>))
    .with_state(state)
}

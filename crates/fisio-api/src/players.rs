//! Handlers for `/players` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/players` | Optional `?activo=true\|false` |
//! | `POST` | `/players` | Body: [`CreatePlayerBody`] |
//! | `GET`  | `/players/:id` | 404 if not found |
//! | `POST` | `/players/:id/deactivate` | Clears `activo`; never deletes |
//! | `PUT`  | `/players/:id/photo` | Body: `{"foto":"..."}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use fisio_core::{
  player::{NewPlayer, Player},
  store::ClinicalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub activo: Option<bool>,
}

/// `GET /players[?activo=<bool>]`
pub async fn list<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
  let players = state
    .store
    .list_players(params.activo)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(players))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /players`.
#[derive(Debug, Deserialize)]
pub struct CreatePlayerBody {
  pub name:       String,
  pub rut:        String,
  #[serde(rename = "fecha_nacimiento")]
  pub birth_date: NaiveDate,
  pub division:   String,
  #[serde(rename = "foto")]
  pub photo:      Option<String>,
}

impl From<CreatePlayerBody> for NewPlayer {
  fn from(b: CreatePlayerBody) -> Self {
    NewPlayer {
      name:       b.name,
      rut:        b.rut,
      birth_date: b.birth_date,
      division:   b.division,
      photo:      b.photo,
    }
  }
}

/// `POST /players` — returns 201 + the stored [`Player`].
pub async fn create<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreatePlayerBody>,
) -> Result<impl IntoResponse, ApiError> {
  let player = state
    .store
    .add_player(NewPlayer::from(body))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(player)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /players/:id`
pub async fn get_one<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Player>, ApiError> {
  let player = state
    .store
    .get_player(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("player {id} not found")))?;
  Ok(Json(player))
}

// ─── Deactivate ───────────────────────────────────────────────────────────────

/// `POST /players/:id/deactivate`
pub async fn deactivate<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Player>, ApiError> {
  let player = state
    .store
    .deactivate_player(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("player {id} not found")))?;
  Ok(Json(player))
}

// ─── Photo ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PhotoBody {
  pub foto: String,
}

/// `PUT /players/:id/photo` — body: `{"foto":"<path reference>"}`
pub async fn set_photo<S: ClinicalStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PhotoBody>,
) -> Result<Json<Player>, ApiError> {
  let player = state
    .store
    .set_player_photo(id, body.foto)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("player {id} not found")))?;
  Ok(Json(player))
}

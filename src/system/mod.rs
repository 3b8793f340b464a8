//! Unauthenticated service endpoints: banner, record schemas and the store check.

pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::system_routes()
}

use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;

pub use dto::SessionResponse;

pub fn router() -> Router<AppState> {
    handlers::session_routes()
}

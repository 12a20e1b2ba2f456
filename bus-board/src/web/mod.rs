//! Web layer for the departure board.
//!
//! Serves the board as a full page, as an HTML fragment for the page's
//! polling script, and as JSON.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;

//! API Module
//!
//! HTTP handlers and routing for the chart service.
//!
//! # Endpoints
//! - `POST /v1/chart` - Natal chart for an instant and location
//! - `POST /v1/extras` - Longitudes of minor bodies
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, USER_ID_HEADER};
pub use routes::create_router;

//! HTTP middleware stack for the POS.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and caching policy)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Route guards are extractors in [`auth`], not layers.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalSession, RequireAdmin, RequireSession, set_current_user};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer_with_store};

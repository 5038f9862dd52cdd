//! # API Module
//!
//! HTTP endpoints of the spodivide web server. Every page of the divide
//! wizard is a JSON endpoint; the browser keeps only a session cookie.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`index`] - `GET /`, redirects to the login or the source step
//! - [`login`] - `GET /login`, runs the Spotify OAuth 2.0 PKCE flow and
//!   serves as its redirect URI
//! - [`logout`] - `GET /logout`, drops the cached token and the session
//!
//! ### Divide wizard
//!
//! - [`source_page`] / [`choose_source`] - `/select_source`
//! - [`target_page`] / [`choose_targets`] - `/select_target`
//! - [`divide_page`] / [`divide_step`] - `/divide`
//!
//! ### Monitoring
//!
//! - [`health`] - status, version and session backend
//!
//! ## Errors
//!
//! Handlers return [`ApiError`]. Authentication failures redirect to
//! `/login`; everything else answers with a JSON body:
//!
//! ```json
//! { "error": "exhausted", "message": "...", "next": "/select_source" }
//! ```

mod divide;
mod error;
mod health;
mod login;
mod select;
pub mod session;

pub use divide::{Button, DivideForm, DividePage, divide_page, divide_step};
pub use error::{ApiError, next_step};
pub use health::health;
pub use login::{index, login, logout};
pub use select::{choose_source, choose_targets, source_page, target_page};

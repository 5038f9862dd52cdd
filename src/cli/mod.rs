//! # CLI Module
//!
//! Command implementations behind the `spodivide` binary.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the divide web server, optionally opening the browser
//! - [`sessions`] - Lists the stored browser sessions or purges idle ones
//!
//! Shell completions are generated directly in `main` from the clap
//! definition.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spodivide serve --open                 # Start and open http://127.0.0.1:5000/
//! spodivide serve --addr 0.0.0.0:8080    # Bind elsewhere
//! spodivide sessions                     # Who is dividing what
//! spodivide sessions --purge             # Drop sessions idle past their lifetime
//! ```
//!
//! Failures that make a command pointless terminate the process through
//! the `error!` macro; everything else is reported with `warning!`.

mod serve;
mod sessions;

pub use serve::serve;
pub use sessions::sessions;

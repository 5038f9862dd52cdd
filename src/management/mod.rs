mod auth;
mod session;

pub use auth::TokenManager;
pub use session::FileSessionStore;
pub use session::MemorySessionStore;
pub use session::SessionStore;
pub use session::open_store;

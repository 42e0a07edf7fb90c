pub mod extractors;
pub mod password;
pub mod session;

pub use extractors::{BearerToken, CurrentProfile, RequireAdmin};
pub use session::{Session, SessionStore, SessionToken};

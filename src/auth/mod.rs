pub mod cookie;
pub mod credentials;
pub mod guard;
pub mod handlers;
pub mod session;

pub use guard::{CookieProbe, GuardState, SessionGuard, SessionProbe};

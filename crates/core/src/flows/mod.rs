pub mod session;
pub mod states;

pub use session::Session;
pub use states::{SessionEvent, SessionState, Transition};

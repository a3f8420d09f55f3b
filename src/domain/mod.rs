//! Domain types shared by the server and the session guard.

mod dashboard;
mod session_user;

pub use dashboard::*;
pub use session_user::*;

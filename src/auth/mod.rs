//! Authentication module.
//!
//! - Users: configured accounts with hashed passwords
//! - JWT: bearer token issuance and validation
//! - Middleware: bearer enforcement for protected API routes

mod jwt;
mod middleware;
mod users;

pub use jwt::*;
pub use middleware::*;
pub use users::*;

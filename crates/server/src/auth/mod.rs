//! Session credential issuance and per-request verification.

mod principal;
mod session;

pub use principal::{AuthRejection, Principal};
pub use session::{Claims, SessionKeys, SessionTokenError};

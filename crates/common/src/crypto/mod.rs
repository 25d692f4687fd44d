pub mod kdf;

pub use kdf::{derive_key, generate_master_token, generate_vault_key, KdfError};

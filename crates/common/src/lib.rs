pub mod crypto;
pub mod username;

pub mod prelude {
    pub use crate::crypto::kdf::{
        derive_key, generate_master_token, generate_vault_key, KdfError,
    };
    pub use crate::username::{Username, UsernameError};
}

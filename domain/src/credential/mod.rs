//! API credential rotation.

pub mod pool;

pub use pool::CredentialPool;

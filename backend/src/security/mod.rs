pub mod encryption;

pub use encryption::{EncryptionError, FieldCipher};

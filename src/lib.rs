pub mod ciphertext;
pub mod decrypter;
pub mod encrypter;
pub mod error;
pub mod field;
pub mod name_holder;
pub mod persistence;
pub mod poly;

pub use decrypter::{CommitDecrypter, DecrypterConfig};
pub use encrypter::CommitEncrypter;
pub use error::CodecError;
pub use field::FieldElement;
pub use name_holder::NameHolder;

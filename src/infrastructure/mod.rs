pub mod authenticator;
pub mod config;
pub mod key_ring;
pub mod token_codec;

pub use authenticator::Authenticator;
pub use key_ring::KeyRing;
pub use token_codec::TokenCodec;

pub mod crypto;
pub mod random;
pub mod time;
pub mod token;

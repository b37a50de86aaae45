pub mod token_cache;

pub use token_cache::{CacheResult, TokenCache};

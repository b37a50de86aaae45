pub mod token_response;

pub use token_response::parse_token_response;

pub mod common;

mod authorization_code_flow;
mod config_loading;

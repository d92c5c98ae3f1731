pub mod aws;
pub mod cli;
pub mod cloudformation;
pub mod load_config;
pub mod route53;
pub mod s3;

pub use cli::{run, Cli, Commands};

pub mod cli;
pub mod config;
pub mod decode;
pub mod link;
pub mod logging;
pub mod params;
pub mod redirect;
pub mod untracker;

pub use link::{Link, LinkError};
pub use untracker::Untracker;

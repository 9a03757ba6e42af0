pub mod api;
pub mod chain;
pub mod cli;
pub mod circuits;
pub mod datetime;
pub mod http_server;
pub mod render;
pub mod resolvers;
pub mod scheduler;
mod settings;

pub use http_server::run as run_server;
pub use settings::Settings;

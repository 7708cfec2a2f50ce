pub mod cache;
pub mod config;
pub mod error;
pub mod insight;
pub mod mcp_server;
pub mod models;
pub mod routes;
pub mod state;
pub mod tools;
pub mod upstream;
pub mod video;

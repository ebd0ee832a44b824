pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod http_server;
pub mod models;
pub mod ranking;
pub mod repository;
pub mod schema;

pub use engine::CatalogEngine;
pub use error::CatalogError;
pub use http_server::HttpServer;
pub use repository::CatalogRepository;

pub mod config;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod service;
pub mod state;
pub mod use_cases;

pub use error::{AppError, AppResult};
pub use state::{AppServices, Dependencies, Repositories};

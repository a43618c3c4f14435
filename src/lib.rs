// src/lib.rs

pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod server;
pub mod services;
pub mod tools;

pub use error::{NewsdeskError, Result};

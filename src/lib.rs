// src/lib.rs

//! stockwatch: product availability watcher

pub mod bot;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub mod auth;
pub mod browse;
pub mod clear;
pub mod config;
pub mod details;
pub mod favorites;
pub mod progress;
pub mod prompts;
pub mod recent;
pub mod render;
pub mod theme;

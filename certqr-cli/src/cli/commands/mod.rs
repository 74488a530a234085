pub mod clear;
pub mod config;
pub mod export;
pub mod generate;
pub mod source;

// src/lib.rs

pub mod cli;
pub mod constants;
pub mod data_input;
pub mod error;
pub mod pipeline;
pub mod plot_framework;
pub mod render;
pub mod storage;

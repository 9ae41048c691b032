// src/render/mod.rs

pub mod channel_groups;
pub mod plot_daily;

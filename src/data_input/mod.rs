// src/data_input/mod.rs

pub mod file_name;
pub mod sample_table;
pub mod table_reader;

pub mod process_table;
pub mod status_bar;

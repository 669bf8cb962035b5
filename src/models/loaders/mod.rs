pub mod sheet_loader;
pub mod toml_loader;

pub use sheet_loader::{
    load_all_sheet_files, load_sheet_document, SheetBatch, UnreadableSheet, PAGE_BREAK,
};
pub use toml_loader::{load_answer_key, save_answer_key};

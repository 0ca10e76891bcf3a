pub mod list;
pub mod metadata_saver;

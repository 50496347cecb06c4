pub mod completion;
pub mod config;
pub mod keys;
pub mod version;

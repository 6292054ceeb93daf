//! Configuration file locations

pub const CONFIG_DIR_NAME: &str = "aurora";
pub const CONFIG_FILE_NAME: &str = "config.toml";

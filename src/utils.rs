use std::path::PathBuf;

/// Get the CSV archive root from the environment or use the default
pub fn get_data_dir() -> PathBuf {
    std::env::var("MANDI_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

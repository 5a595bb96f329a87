use log::{error, info};
use std::{fs, path::Path};

pub fn create_folder(path: &Path) {
    if path.exists() {
        return;
    }

    match fs::create_dir_all(path) {
        Ok(()) => info!("Created data folder {}", path.display()),
        Err(e) => error!("Failed to create folder {}: {}", path.display(), e),
    }
}

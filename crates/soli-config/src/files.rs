//! Upload storage and thumbnailing configuration.

use serde::{Deserialize, Serialize};

fn default_storage_dir() -> String {
    "./uploads".to_string()
}

fn default_thumbnail_command() -> String {
    // ImageMagick; any binary taking `<input> -thumbnail NxN <output>` works.
    "convert".to_string()
}

const fn default_thumbnail_max_dim() -> u32 {
    256
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesConfig {
    /// Directory uploaded files are stored under.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// External converter invoked for thumbnail generation.
    #[serde(default = "default_thumbnail_command")]
    pub thumbnail_command: String,

    /// Longest edge of generated thumbnails, in pixels.
    #[serde(default = "default_thumbnail_max_dim")]
    pub thumbnail_max_dim: u32,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            thumbnail_command: default_thumbnail_command(),
            thumbnail_max_dim: default_thumbnail_max_dim(),
        }
    }
}

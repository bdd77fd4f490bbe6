//! Avatar storage configuration

use serde::{Deserialize, Serialize};

/// Cloudinary credentials and layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder that prefixes every avatar public id
    pub avatar_folder: String,
    /// Edge length of the square avatar rendition
    pub avatar_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            avatar_folder: String::from("ContactBook"),
            avatar_size: 250,
        }
    }
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cloud_name: std::env::var("CLOUDINARY_NAME").unwrap_or(defaults.cloud_name),
            api_key: std::env::var("CLOUDINARY_API_KEY").unwrap_or(defaults.api_key),
            api_secret: std::env::var("CLOUDINARY_API_SECRET").unwrap_or(defaults.api_secret),
            avatar_folder: std::env::var("AVATAR_FOLDER").unwrap_or(defaults.avatar_folder),
            avatar_size: super::env_or("AVATAR_SIZE", defaults.avatar_size),
        }
    }

    /// Whether real credentials are present
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

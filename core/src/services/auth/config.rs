//! Configuration for the authentication service

use cb_shared::config::StorageConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Folder that prefixes avatar public ids
    pub avatar_folder: String,
    /// Edge length of the stored avatar rendition
    pub avatar_size: u32,
    /// Whether the very first account registered becomes an admin
    pub bootstrap_first_admin: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            avatar_folder: "ContactBook".to_string(),
            avatar_size: 250,
            bootstrap_first_admin: true,
        }
    }
}

impl AuthServiceConfig {
    pub fn from_storage(storage: &StorageConfig) -> Self {
        Self {
            avatar_folder: storage.avatar_folder.clone(),
            avatar_size: storage.avatar_size,
            ..Default::default()
        }
    }

    pub fn with_bootstrap_first_admin(mut self, enabled: bool) -> Self {
        self.bootstrap_first_admin = enabled;
        self
    }
}

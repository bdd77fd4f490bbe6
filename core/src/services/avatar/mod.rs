//! Avatar image storage

use async_trait::async_trait;

use crate::domain::value_objects::AvatarUpload;

/// Image CDN holding user avatars
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store `bytes` under `public_id`, overwriting any previous image
    async fn upload(&self, public_id: &str, bytes: Vec<u8>) -> Result<AvatarUpload, String>;

    /// URL of a square rendition of a stored image
    fn rendition_url(&self, public_id: &str, version: &str, size: u32) -> String;
}

#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockAvatarStorage;

#[cfg(any(test, feature = "mock-services"))]
mod mock {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::Mutex;

    use super::AvatarStorage;
    use crate::domain::value_objects::AvatarUpload;

    /// Keeps uploads in memory and bumps a version per overwrite
    pub struct MockAvatarStorage {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        version: AtomicU64,
        pub should_fail: bool,
    }

    impl MockAvatarStorage {
        pub fn new(should_fail: bool) -> Self {
            Self {
                objects: Mutex::new(HashMap::new()),
                version: AtomicU64::new(1_700_000_000),
                should_fail,
            }
        }

        pub async fn object_count(&self) -> usize {
            self.objects.lock().await.len()
        }
    }

    impl Default for MockAvatarStorage {
        fn default() -> Self {
            Self::new(false)
        }
    }

    #[async_trait]
    impl AvatarStorage for MockAvatarStorage {
        async fn upload(&self, public_id: &str, bytes: Vec<u8>) -> Result<AvatarUpload, String> {
            if self.should_fail {
                return Err("storage unavailable".to_string());
            }
            self.objects.lock().await.insert(public_id.to_string(), bytes);
            let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AvatarUpload {
                url: format!("https://cdn.test/{}", public_id),
                version: version.to_string(),
            })
        }

        fn rendition_url(&self, public_id: &str, version: &str, size: u32) -> String {
            format!(
                "https://cdn.test/c_fill,h_{size},w_{size}/v{version}/{public_id}",
                size = size,
                version = version,
                public_id = public_id
            )
        }
    }
}

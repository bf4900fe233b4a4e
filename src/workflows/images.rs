use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::errors::{Operation, OperationContext, WorkflowResult};
use crate::api::{endpoint_url, parse_base_url, ApiError, QueryCache, QueryKey, RequestStore};
use crate::config::ApiConfig;
use crate::domain::{ImageSlot, ImageSlots, ImageUpload, ProfileImagesResponse, UploadResponse};
use crate::validation::{require_user_id, ValidationError};

/// Where profile pictures can be fetched from.
#[derive(Debug, Clone)]
pub struct ImageLinks {
    base_url: Url,
    images_segment: String,
}

impl ImageLinks {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(&config.base_url)?,
            images_segment: config.profile_images_path.trim_matches('/').to_string(),
        })
    }

    pub fn photo_url(&self, user_id: &str) -> Url {
        endpoint_url(&self.base_url, &["users", user_id, "photo"])
    }

    pub fn image_url(&self, user_id: &str, slot: ImageSlot) -> Url {
        let slot = slot.to_string();
        endpoint_url(
            &self.base_url,
            &[self.images_segment.as_str(), user_id, "image", slot.as_str()],
        )
    }
}

/// The profile photo and the three numbered image slots.
#[derive(Clone)]
pub struct ProfileImageService {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
    links: ImageLinks,
    settle_delay: Duration,
}

impl ProfileImageService {
    pub fn new(
        store: Arc<dyn RequestStore>,
        cache: QueryCache,
        links: ImageLinks,
        settle_delay: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            links,
            settle_delay,
        }
    }

    /// Upload into slot 1, 2 or 3, replacing whatever is there.
    ///
    /// The backend processes images asynchronously, so the listing views are
    /// only invalidated after the settle delay.
    pub async fn upload(
        &self,
        user_id: &str,
        slot: u8,
        upload: &ImageUpload,
    ) -> WorkflowResult<UploadResponse> {
        let user_id = require_user_id(user_id)?;
        let slot = ImageSlot::new(slot)?;
        if upload.is_empty() {
            return Err(ValidationError::EmptyUpload.into());
        }

        let response = self
            .store
            .upload_profile_image(user_id, slot, upload)
            .await
            .during(Operation::UploadImage)?;
        info!(
            user_id = %user_id,
            slot = slot.number(),
            size = response.size,
            "Profile image uploaded"
        );

        if !self.settle_delay.is_zero() {
            debug!(delay_ms = self.settle_delay.as_millis(), "Waiting for image processing");
            tokio::time::sleep(self.settle_delay).await;
        }
        self.invalidate_image_views(user_id).await;
        Ok(response)
    }

    /// Clear exactly one slot.
    pub async fn delete(&self, user_id: &str, slot: u8) -> WorkflowResult<()> {
        let user_id = require_user_id(user_id)?;
        let slot = ImageSlot::new(slot)?;

        self.store
            .delete_profile_image(user_id, slot)
            .await
            .during(Operation::DeleteImage)?;
        info!(user_id = %user_id, slot = slot.number(), "Profile image deleted");
        self.invalidate_image_views(user_id).await;
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> WorkflowResult<ProfileImagesResponse> {
        self.cache
            .fetch(QueryKey::ProfileImages(user_id.to_string()), || {
                self.store.list_profile_images(user_id)
            })
            .await
            .during(Operation::Load("profile images"))
    }

    pub async fn available_slots(&self, user_id: &str) -> WorkflowResult<Vec<u8>> {
        self.cache
            .fetch(QueryKey::AvailableSlots(user_id.to_string()), || {
                self.store.available_image_slots(user_id)
            })
            .await
            .during(Operation::Load("available image slots"))
    }

    /// Slot occupancy as the backend currently lists it.
    pub async fn occupancy(&self, user_id: &str) -> WorkflowResult<ImageSlots> {
        let listing = self.list(user_id).await?;
        Ok(ImageSlots::from_listing(&listing))
    }

    pub async fn upload_photo(&self, user_id: &str, upload: &ImageUpload) -> WorkflowResult<UploadResponse> {
        let user_id = require_user_id(user_id)?;
        if upload.is_empty() {
            return Err(ValidationError::EmptyUpload.into());
        }

        let response = self
            .store
            .upload_profile_photo(user_id, upload)
            .await
            .during(Operation::UploadPhoto)?;
        info!(user_id = %user_id, size = response.size, "Profile photo uploaded");
        self.cache.invalidate(&[QueryKey::User(user_id.to_string())]).await;
        Ok(response)
    }

    pub async fn delete_photo(&self, user_id: &str) -> WorkflowResult<()> {
        let user_id = require_user_id(user_id)?;
        self.store
            .delete_profile_photo(user_id)
            .await
            .during(Operation::DeletePhoto)?;
        info!(user_id = %user_id, "Profile photo deleted");
        self.cache.invalidate(&[QueryKey::User(user_id.to_string())]).await;
        Ok(())
    }

    pub fn photo_url(&self, user_id: &str) -> Url {
        self.links.photo_url(user_id)
    }

    pub fn image_url(&self, user_id: &str, slot: ImageSlot) -> Url {
        self.links.image_url(user_id, slot)
    }

    async fn invalidate_image_views(&self, user_id: &str) {
        self.cache
            .invalidate(&[
                QueryKey::ProfileImages(user_id.to_string()),
                QueryKey::AvailableSlots(user_id.to_string()),
                QueryKey::User(user_id.to_string()),
            ])
            .await;
    }
}

impl std::fmt::Debug for ProfileImageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileImageService")
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

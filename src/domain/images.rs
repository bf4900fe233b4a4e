use std::fmt;
use std::path::Path;

use crate::validation::ValidationError;

use super::models::ProfileImagesResponse;

pub const SLOT_COUNT: usize = 3;

/// One of the three numbered profile-image positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageSlot(u8);

impl ImageSlot {
    pub const FIRST: ImageSlot = ImageSlot(1);
    pub const SECOND: ImageSlot = ImageSlot(2);
    pub const THIRD: ImageSlot = ImageSlot(3);
    pub const ALL: [ImageSlot; SLOT_COUNT] = [Self::FIRST, Self::SECOND, Self::THIRD];

    pub fn new(number: u8) -> Result<Self, ValidationError> {
        match number {
            1..=3 => Ok(ImageSlot(number)),
            other => Err(ValidationError::InvalidImageSlot { slot: other }),
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for ImageSlot {
    type Error = ValidationError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        ImageSlot::new(number)
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy of a user's three image slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSlots([bool; SLOT_COUNT]);

impl ImageSlots {
    pub fn from_flags(first: bool, second: bool, third: bool) -> Self {
        Self([first, second, third])
    }

    /// Slots present in an image listing; numbers outside 1..=3 are ignored.
    pub fn from_listing(listing: &ProfileImagesResponse) -> Self {
        let mut slots = Self::default();
        for image in &listing.images {
            if let Ok(slot) = ImageSlot::new(image.image_number) {
                slots.occupy(slot);
            }
        }
        slots
    }

    pub fn is_occupied(&self, slot: ImageSlot) -> bool {
        self.0[slot.index()]
    }

    /// Uploading to an occupied slot replaces its content, so this is idempotent.
    pub fn occupy(&mut self, slot: ImageSlot) {
        self.0[slot.index()] = true;
    }

    pub fn clear(&mut self, slot: ImageSlot) {
        self.0[slot.index()] = false;
    }

    pub fn occupied(&self) -> Vec<ImageSlot> {
        ImageSlot::ALL
            .into_iter()
            .filter(|slot| self.is_occupied(*slot))
            .collect()
    }

    pub fn available(&self) -> Vec<ImageSlot> {
        ImageSlot::ALL
            .into_iter()
            .filter(|slot| !self.is_occupied(*slot))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|occupied| **occupied).count()
    }
}

/// File payload for photo and slot uploads (multipart field `file`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

use anyhow::{Context, Result};
use std::path::Path;

use super::{Command, CommandContext};
use crate::cli::{ImageCommands, PhotoCommands};
use crate::domain::{ImageSlot, ImageUpload};

async fn read_upload(path: &Path) -> Result<ImageUpload> {
    ImageUpload::from_path(path)
        .await
        .with_context(|| format!("Failed to read image file {}", path.display()))
}

pub struct PhotoCommand {
    pub action: PhotoCommands,
}

impl Command for PhotoCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let user_id = ctx.session.require_user()?.id.clone();
        match &self.action {
            PhotoCommands::Upload { file } => {
                let upload = read_upload(file).await?;
                print!("📤 Uploading {}... ", upload.file_name);
                std::io::Write::flush(&mut std::io::stdout())?;
                let response = ctx.client.images.upload_photo(&user_id, &upload).await?;
                println!("✅ ({} bytes)", response.size);
                println!("   🔗 {}", ctx.client.images.photo_url(&user_id));
            }
            PhotoCommands::Delete => {
                ctx.client.images.delete_photo(&user_id).await?;
                println!("🗑️  Profile photo removed");
            }
        }
        Ok(())
    }
}

pub struct ImagesCommand {
    pub action: ImageCommands,
}

impl Command for ImagesCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let own_id = ctx.session.require_user()?.id.clone();
        match &self.action {
            ImageCommands::List { user } => {
                let user_id = user.as_deref().unwrap_or(&own_id);
                let listing = ctx.client.images.list(user_id).await?;
                println!("🖼️  PROFILE IMAGES ({}/3)", listing.total_images);
                println!("──────────────────");
                for slot in ImageSlot::ALL {
                    match listing.image(slot.number()) {
                        Some(image) => println!(
                            "   {slot}. {} ({} bytes) {}",
                            image.content_type,
                            image.size,
                            ctx.client.images.image_url(user_id, slot)
                        ),
                        None => println!("   {slot}. (empty)"),
                    }
                }
            }
            ImageCommands::Slots => {
                let available = ctx.client.images.available_slots(&own_id).await?;
                if available.is_empty() {
                    println!("📦 All three slots are in use; uploading to one replaces its image");
                } else {
                    let slots: Vec<String> = available.iter().map(u8::to_string).collect();
                    println!("📦 Free slots: {}", slots.join(", "));
                }
            }
            ImageCommands::Upload { slot, file } => {
                let upload = read_upload(file).await?;
                print!("📤 Uploading {} to slot {slot}... ", upload.file_name);
                std::io::Write::flush(&mut std::io::stdout())?;
                let response = ctx.client.images.upload(&own_id, *slot, &upload).await?;
                println!("✅ ({} bytes)", response.size);
            }
            ImageCommands::Delete { slot } => {
                ctx.client.images.delete(&own_id, *slot).await?;
                println!("🗑️  Slot {slot} cleared");
            }
        }
        Ok(())
    }
}

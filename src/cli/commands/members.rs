use anyhow::Result;

use super::account::print_profile;
use super::{print_user_line, Command, CommandContext};

pub struct MembersCommand {
    pub search: String,
}

impl Command for MembersCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let viewer = ctx.session.require_user()?;
        let members = ctx.client.members.browse(&viewer.id, &self.search).await?;

        if members.is_empty() {
            if self.search.trim().is_empty() {
                println!("👥 No other active members yet");
            } else {
                println!("🔍 No members match '{}'", self.search.trim());
            }
            return Ok(());
        }

        println!("👥 MEMBERS ({})", members.len());
        println!("────────────");
        for member in &members {
            print_user_line(member);
        }
        println!();
        println!("💡 'maduve member <id>' shows a profile, 'maduve connect send <id> -m ...' says hello");
        Ok(())
    }
}

pub struct MemberCommand {
    pub user_id: String,
}

impl Command for MemberCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let viewer = ctx.session.require_user()?.id.clone();
        let member = ctx.client.members.get_user(&self.user_id).await?;
        print_profile(&member);

        if member.id != viewer {
            let connected = ctx
                .client
                .connections
                .has_active_connection(&viewer, &member.id)
                .await?;
            if connected {
                println!("   🤝 You are connected");
            }
        }

        for slot in member.image_slots().occupied() {
            println!("   🔗 Image {slot}: {}", ctx.client.images.image_url(&member.id, slot));
        }
        if member.has_profile_photo {
            println!("   🔗 Photo: {}", ctx.client.images.photo_url(&member.id));
        }
        Ok(())
    }
}

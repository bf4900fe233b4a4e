use anyhow::Result;

use super::{Command, CommandContext};
use crate::cli::{ProfileCommands, ProfileEditArgs, SignupArgs};
use crate::domain::{AccountType, LoginRequest, ProfileUpdate, SignupRequest, User};

pub struct SignupCommand {
    pub args: SignupArgs,
}

impl Command for SignupCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let args = &self.args;
        let request = SignupRequest {
            full_name: args.full_name.trim().to_string(),
            email: args.email.trim().to_string(),
            password: args.password.clone(),
            phone: args.phone.trim().to_string(),
            ecclesia: args.ecclesia.trim().to_string(),
            language: args.language.trim().to_string(),
            education: args.education.trim().to_string(),
            bio: args.bio.trim().to_string(),
        };

        println!("📝 Submitting signup for {}...", request.email);
        let response = ctx.client.accounts.signup(&request).await?;
        println!("✅ {}", non_empty(&response.message, "Signup request submitted"));
        if !response.request_id.is_empty() {
            println!("   🆔 Request id: {}", response.request_id);
        }
        println!("💡 An admin will review your application. Check progress with:");
        println!("   maduve application-status {}", request.email);
        Ok(())
    }
}

pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub account: AccountType,
}

impl Command for LoginCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let credentials = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };

        let session = ctx
            .client
            .accounts
            .login(&mut ctx.session, &credentials, self.account)
            .await?;
        println!(
            "✅ Logged in as {} ({} account)",
            non_empty(&session.user.full_name, &session.user.id),
            session.user_type
        );
        if let Some(status) = session.user.status.filter(|s| s.is_pending()) {
            println!("   ⏳ Your account is still {status}; some features stay locked until it is approved");
        }
        Ok(())
    }
}

pub struct LogoutCommand;

impl Command for LogoutCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        if !ctx.session.is_logged_in() {
            println!("🔒 No active session");
            return Ok(());
        }
        ctx.session.logout()?;
        println!("👋 Logged out");
        Ok(())
    }
}

pub struct WhoamiCommand;

impl Command for WhoamiCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        match ctx.session.current() {
            Some(session) => {
                println!("👤 {}", non_empty(&session.user.full_name, "(no name)"));
                println!("   🆔 Id: {}", session.user.id);
                println!("   🔑 Account: {}", session.user_type);
                if let Some(status) = session.user.status {
                    println!("   📌 Status: {status}");
                }
            }
            None => {
                println!("🔒 Not logged in");
                println!("💡 Run 'maduve login --email <email> --password <password>'");
            }
        }
        Ok(())
    }
}

pub struct ApplicationStatusCommand {
    pub email: String,
}

impl Command for ApplicationStatusCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let status = ctx.client.accounts.application_status(&self.email).await?;
        println!("📬 Application for {}", status.email);
        println!("   📌 Status: {}", status.status);
        println!("   📅 Submitted: {}", status.created_at.format("%Y-%m-%d %H:%M"));
        if let Some(processed_at) = status.processed_at {
            println!("   ✅ Processed: {}", processed_at.format("%Y-%m-%d %H:%M"));
        }
        if let Some(admin) = status.admin_name.as_deref().filter(|a| !a.is_empty()) {
            println!("   🛡️  Reviewed by: {admin}");
        }
        if !status.message.is_empty() {
            println!("   💬 {}", status.message);
        }
        Ok(())
    }
}

pub struct ProfileCommand {
    pub action: ProfileCommands,
}

impl Command for ProfileCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        match &self.action {
            ProfileCommands::Show => {
                let user = ctx.client.accounts.current_user(&ctx.session).await?;
                print_profile(&user);
            }
            ProfileCommands::Edit(edits) => {
                let current = ctx.client.accounts.current_user(&ctx.session).await?;
                let update = apply_edits(&current, edits);
                ctx.client
                    .accounts
                    .update_profile(&mut ctx.session, &update)
                    .await?;
                println!("✅ Profile updated");
            }
        }
        Ok(())
    }
}

/// Start from the stored profile and overwrite only the fields given.
pub fn apply_edits(current: &User, edits: &ProfileEditArgs) -> ProfileUpdate {
    let pick = |edit: &Option<String>, existing: &str| {
        edit.as_deref().map(str::trim).unwrap_or(existing).to_string()
    };
    ProfileUpdate {
        full_name: pick(&edits.full_name, &current.full_name),
        phone: pick(&edits.phone, &current.phone),
        ecclesia: pick(&edits.ecclesia, &current.ecclesia),
        language: pick(&edits.language, &current.language),
        education: pick(&edits.education, &current.education),
        bio: pick(&edits.bio, &current.bio),
    }
}

pub(crate) fn print_profile(user: &User) {
    println!("👤 {} [{}]", user.full_name, user.id);
    println!("   ✉️  {}", user.email);
    println!("   📞 {}", non_empty(&user.phone, "-"));
    println!("   ⛪ {}", non_empty(&user.ecclesia, "-"));
    println!("   🗣️  {}", non_empty(&user.language, "-"));
    println!("   🎓 {}", non_empty(&user.education, "-"));
    println!("   📌 {}", user.status);
    if !user.bio.is_empty() {
        println!("   📄 {}", user.bio);
    }
    let slots = user.image_slots();
    println!(
        "   🖼️  Photo: {} | Images: {}/3",
        if user.has_profile_photo { "yes" } else { "no" },
        slots.count()
    );
}

pub(crate) fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

use anyhow::{bail, Result};

use super::account::non_empty;
use super::{print_request_line, print_user_line, Command, CommandContext};
use crate::cli::AdminCommands;
use crate::domain::{Admin, AdminSignupRequest, AdminUpdate, AuthLevel, ReviewDecision};
use crate::workflows::SignupReview;

pub struct AdminCommand {
    pub action: AdminCommands,
}

impl Command for AdminCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        // Creating an admin account is the only admin command that works
        // without an admin session.
        if let AdminCommands::Signup {
            full_name,
            email,
            password,
            phone,
        } = &self.action
        {
            let request = AdminSignupRequest {
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
                password: password.clone(),
                phone: phone.trim().to_string(),
            };
            let admin = ctx.client.accounts.admin_signup(&request).await?;
            println!("✅ Admin account created for {} [{}]", admin.full_name, admin.id);
            return Ok(());
        }

        let admin_id = ctx.session.require_admin()?.id.clone();
        let client = &ctx.client;

        match &self.action {
            AdminCommands::Signup { .. } => {}
            AdminCommands::Dashboard => {
                let summary = client.dashboard.summary().await?;
                println!("📊 ADMIN DASHBOARD");
                println!("─────────────────");
                if summary.stats.is_empty() {
                    println!("   (no statistics reported)");
                }
                for line in &summary.stats {
                    println!("   • {line}");
                }
            }
            AdminCommands::Pending => {
                let requests = client.approvals.pending_requests().await?;
                if requests.is_empty() {
                    println!("📭 No signup requests waiting for review");
                    return Ok(());
                }
                println!("📋 PENDING SIGNUPS ({})", requests.len());
                for request in &requests {
                    print_request_line(request);
                }
                println!();
                println!("💡 'maduve admin approve <id>' or 'maduve admin reject <id>'");
            }
            AdminCommands::Request { request_id } => {
                let request = client.approvals.pending_request(request_id).await?;
                print_request_line(&request);
                println!("   📞 {}", non_empty(&request.phone, "-"));
                println!("   🗣️  {}", non_empty(&request.language, "-"));
                println!("   🎓 {}", non_empty(&request.education, "-"));
                if !request.bio.is_empty() {
                    println!("   📄 {}", request.bio);
                }
                let review = SignupReview::for_request(&request);
                let offered: Vec<&str> = review.offered_decisions().iter().map(|d| d.verb()).collect();
                if !offered.is_empty() {
                    println!("   ⚖️  Available: {}", offered.join(", "));
                }
            }
            AdminCommands::Approve { request_id } => {
                review(ctx, &admin_id, request_id, ReviewDecision::Approve).await?;
            }
            AdminCommands::Reject { request_id } => {
                review(ctx, &admin_id, request_id, ReviewDecision::Reject).await?;
            }
            AdminCommands::Discard { request_id } => {
                client.approvals.discard(request_id).await?;
                println!("🗑️  Signup request {request_id} deleted");
            }
            AdminCommands::DiscardAll { yes } => {
                if !yes {
                    bail!("Refusing to delete every pending request without --yes");
                }
                client.approvals.discard_all().await?;
                println!("🗑️  All pending signup requests deleted");
            }
            AdminCommands::Users { search } => {
                let users = client.members.search_users(search).await?;
                println!("👥 USERS ({})", users.len());
                for user in &users {
                    print_user_line(user);
                }
            }
            AdminCommands::SetStatus { user_id, status } => {
                client.members.change_status(user_id, *status).await?;
                println!("✅ {user_id} is now {status}");
            }
            AdminCommands::DeleteUser { user_id } => {
                client.members.delete_user(user_id, &admin_id).await?;
                println!("🗑️  User {user_id} deleted");
            }
            AdminCommands::List => {
                let admins = client.admins.list().await?;
                println!("🛡️  ADMINS ({})", admins.len());
                for admin in &admins {
                    let marker = if admin.id == admin_id { " (you)" } else { "" };
                    println!("   🛡️  [{}] {} <{}>{marker}", admin.id, admin.full_name, admin.email);
                }
            }
            AdminCommands::Show { admin } => {
                let found = if admin.contains('@') {
                    client.admins.get_by_email(admin).await?
                } else {
                    client.admins.get(admin).await?
                };
                print_admin(&found);
            }
            AdminCommands::Edit {
                admin_id: target,
                full_name,
                email,
                phone,
            } => {
                let current = client.admins.get(target).await?;
                let mut update = AdminUpdate::from(&current);
                if let Some(full_name) = full_name {
                    update.full_name = full_name.trim().to_string();
                }
                if let Some(email) = email {
                    update.email = email.trim().to_string();
                }
                if let Some(phone) = phone {
                    update.phone = phone.trim().to_string();
                }
                client.admins.update(target, &update).await?;
                println!("✅ Admin {target} updated");
            }
            AdminCommands::Remove { admin_id: target } => {
                client.admins.remove(&admin_id, target).await?;
                println!("🗑️  Admin {target} removed");
            }
            AdminCommands::AuthLevel { user_id } => {
                let level = client.admins.auth_level(user_id).await?;
                let label = match level {
                    AuthLevel::Admin => "admin",
                    AuthLevel::User => "member",
                    AuthLevel::Unknown => "unknown",
                };
                println!("🔑 {user_id}: {label}");
            }
        }
        Ok(())
    }
}

async fn review(
    ctx: &CommandContext,
    admin_id: &str,
    request_id: &str,
    decision: ReviewDecision,
) -> Result<()> {
    let request = ctx.client.approvals.pending_request(request_id).await?;
    let mut machine = SignupReview::for_request(&request).machine();
    let response = ctx
        .client
        .approvals
        .review(&mut machine, admin_id, decision)
        .await?;

    let verb = match decision {
        ReviewDecision::Approve => "approved",
        ReviewDecision::Reject => "rejected",
    };
    println!(
        "✅ {}",
        non_empty(&response.message, &format!("{} {verb}", request.full_name))
    );
    Ok(())
}

fn print_admin(admin: &Admin) {
    println!("🛡️  {} [{}]", admin.full_name, admin.id);
    println!("   ✉️  {}", admin.email);
    println!("   📞 {}", non_empty(&admin.phone, "-"));
    println!("   📌 {}", if admin.is_active { "Active" } else { "Inactive" });
    println!("   📅 Since {}", admin.created_at.format("%Y-%m-%d"));
}

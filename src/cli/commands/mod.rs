use anyhow::Result;

use crate::client::MaduveClient;
use crate::config::MaduveConfig;
use crate::domain::{ConnectRequest, User, UserRequest};
use crate::session::Session;

pub mod account;
pub mod admin;
pub mod config;
pub mod connect;
pub mod images;
pub mod members;

/// What every backend command runs against: the loaded configuration, the
/// client built from it and the restored session.
#[derive(Debug)]
pub struct CommandContext {
    pub config: MaduveConfig,
    pub client: MaduveClient,
    pub session: Session,
}

impl CommandContext {
    pub fn new(config: MaduveConfig, client: MaduveClient, session: Session) -> Self {
        Self {
            config,
            client,
            session,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()>;
}

pub async fn show_getting_started() -> Result<()> {
    println!("💍 Maduve - find your match within the ecclesia");
    println!();
    println!("New here:");
    println!("  📝 maduve signup ...                   # Apply for an account");
    println!("  ⏳ maduve application-status <email>   # Follow your application");
    println!();
    println!("Members:");
    println!("  🔑 maduve login --email ... --password ...");
    println!("  👥 maduve members                      # Browse members");
    println!("  🤝 maduve connect received             # Requests waiting for you");
    println!("  🖼️  maduve images list                  # Your profile images");
    println!();
    println!("Admins:");
    println!("  🔑 maduve login --admin ...");
    println!("  📋 maduve admin pending                # Signups to review");
    println!("  📊 maduve admin dashboard");
    println!();
    println!("💡 Run 'maduve <command> --help' for details on any command.");
    Ok(())
}

pub(crate) fn print_user_line(user: &User) {
    println!(
        "   👤 {} [{}] {} - {} ({})",
        user.initial(),
        user.id,
        user.full_name,
        user.ecclesia,
        user.status
    );
}

pub(crate) fn print_request_line(request: &UserRequest) {
    println!(
        "   📝 [{}] {} <{}> - {} ({}, submitted {})",
        request.id,
        request.full_name,
        request.email,
        request.ecclesia,
        request.status,
        request.created_at.format("%Y-%m-%d")
    );
}

pub(crate) fn print_connect_line(request: &ConnectRequest, incoming: bool) {
    let (label, other_id, other_name) = if incoming {
        ("From", &request.sender_id, &request.sender_name)
    } else {
        ("To", &request.receiver_id, &request.receiver_name)
    };
    println!(
        "   🤝 {label} {} [{}] - {} ({})",
        if other_name.is_empty() { "member" } else { other_name.as_str() },
        other_id,
        request.status,
        request.created_at.format("%Y-%m-%d")
    );
    if !request.message.is_empty() {
        println!("      💬 {}", request.message);
    }
}

use anyhow::Result;

use super::{print_connect_line, Command, CommandContext};
use crate::cli::ConnectCommands;
use crate::domain::{ConnectAction, TransitionResponse};
use crate::workflows::ConnectResponse;

pub struct ConnectCommand {
    pub action: ConnectCommands,
}

impl Command for ConnectCommand {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<()> {
        let me = ctx.session.require_user()?.id.clone();
        match &self.action {
            ConnectCommands::Send {
                receiver_id,
                message,
            } => {
                let response = ctx.client.connections.send(&me, receiver_id, message).await?;
                println!("📨 {}", outcome(&response, "Connect request sent"));
            }
            ConnectCommands::Accept { sender_id } => {
                let response = answer(ctx, &me, sender_id, ConnectAction::Accept).await?;
                println!("🤝 {}", outcome(&response, "Connect request accepted"));
            }
            ConnectCommands::Reject { sender_id } => {
                let response = answer(ctx, &me, sender_id, ConnectAction::Reject).await?;
                println!("🙅 {}", outcome(&response, "Connect request rejected"));
            }
            ConnectCommands::Received => {
                let requests = ctx.client.connections.received(&me).await?;
                if requests.is_empty() {
                    println!("📭 No pending connect requests");
                    return Ok(());
                }
                println!("📬 RECEIVED REQUESTS ({})", requests.len());
                for request in &requests {
                    print_connect_line(request, true);
                }
                println!();
                println!("💡 Answer with 'maduve connect accept <sender-id>' or 'maduve connect reject <sender-id>'");
            }
            ConnectCommands::Sent => {
                let requests = ctx.client.connections.sent(&me).await?;
                if requests.is_empty() {
                    println!("📭 You have not sent any connect requests");
                    return Ok(());
                }
                println!("📤 SENT REQUESTS ({})", requests.len());
                for request in &requests {
                    print_connect_line(request, false);
                }
            }
            ConnectCommands::Check { user_id } => {
                if ctx.client.connections.has_active_connection(&me, user_id).await? {
                    println!("🤝 You are connected with {user_id}");
                } else {
                    println!("➖ No active connection with {user_id}");
                }
            }
        }
        Ok(())
    }
}

/// Answer through the request's lifecycle when it is in the received list,
/// so a request that was already answered is refused locally.
async fn answer(
    ctx: &CommandContext,
    receiver_id: &str,
    sender_id: &str,
    action: ConnectAction,
) -> Result<TransitionResponse> {
    let received = ctx.client.connections.received(receiver_id).await?;
    let pending = received.iter().find(|request| request.sender_id == sender_id);

    let response = match pending {
        Some(request) => {
            let mut machine = ConnectResponse::for_request(request).machine();
            ctx.client.connections.respond(&mut machine, action).await?
        }
        None => match action {
            ConnectAction::Accept => ctx.client.connections.accept(receiver_id, sender_id).await?,
            ConnectAction::Reject => ctx.client.connections.reject(receiver_id, sender_id).await?,
        },
    };
    Ok(response)
}

fn outcome<'a>(response: &'a TransitionResponse, fallback: &'a str) -> &'a str {
    if response.message.trim().is_empty() {
        fallback
    } else {
        &response.message
    }
}

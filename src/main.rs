use anyhow::Result;
use clap::Parser;
use tracing::Instrument;

use maduve_client::cli::commands::account::{
    ApplicationStatusCommand, LoginCommand, LogoutCommand, ProfileCommand, SignupCommand,
    WhoamiCommand,
};
use maduve_client::cli::commands::admin::AdminCommand;
use maduve_client::cli::commands::config::ConfigCommand;
use maduve_client::cli::commands::connect::ConnectCommand;
use maduve_client::cli::commands::images::{ImagesCommand, PhotoCommand};
use maduve_client::cli::commands::members::{MemberCommand, MembersCommand};
use maduve_client::cli::commands::{show_getting_started, Command, CommandContext};
use maduve_client::cli::{Cli, Commands};
use maduve_client::domain::AccountType;
use maduve_client::observability::{api_metrics, OperationTimer};
use maduve_client::telemetry::{create_command_span, generate_correlation_id, init_telemetry};
use maduve_client::{MaduveClient, MaduveConfig, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file_loaded = MaduveConfig::load_env_file()?;
    let config = MaduveConfig::load()?;
    init_telemetry(&config.observability)?;
    if env_file_loaded {
        tracing::info!("Loaded environment variables from .env file");
    }

    match cli.command {
        // No subcommand: explain how to get started
        None => tokio::runtime::Runtime::new()?.block_on(show_getting_started()),
        Some(Commands::Config(action)) => ConfigCommand { action }.execute(&config),
        Some(command) => tokio::runtime::Runtime::new()?.block_on(run(command, config)),
    }
}

async fn run(command: Commands, config: MaduveConfig) -> Result<()> {
    let session = Session::restore(config.session.path())?;
    let span = create_command_span(command.name(), session.user_id(), &generate_correlation_id());
    let timer = OperationTimer::new(command.name());

    let client = MaduveClient::from_config(&config)?;
    let mut ctx = CommandContext::new(config, client, session);

    let result = dispatch(command, &mut ctx).instrument(span).await;
    timer.finish();
    api_metrics().log_stats();
    result
}

async fn dispatch(command: Commands, ctx: &mut CommandContext) -> Result<()> {
    match command {
        Commands::Signup(args) => SignupCommand { args }.execute(ctx).await,
        Commands::Login {
            email,
            password,
            admin,
        } => {
            let account = if admin { AccountType::Admin } else { AccountType::User };
            LoginCommand {
                email,
                password,
                account,
            }
            .execute(ctx)
            .await
        }
        Commands::Logout => LogoutCommand.execute(ctx).await,
        Commands::Whoami => WhoamiCommand.execute(ctx).await,
        Commands::ApplicationStatus { email } => ApplicationStatusCommand { email }.execute(ctx).await,
        Commands::Members { search } => MembersCommand { search }.execute(ctx).await,
        Commands::Member { user_id } => MemberCommand { user_id }.execute(ctx).await,
        Commands::Profile(action) => ProfileCommand { action }.execute(ctx).await,
        Commands::Photo(action) => PhotoCommand { action }.execute(ctx).await,
        Commands::Images(action) => ImagesCommand { action }.execute(ctx).await,
        Commands::Connect(action) => ConnectCommand { action }.execute(ctx).await,
        Commands::Admin(action) => AdminCommand { action }.execute(ctx).await,
        Commands::Config(action) => ConfigCommand { action }.execute(&ctx.config),
    }
}

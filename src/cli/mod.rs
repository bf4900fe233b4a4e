use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::UserStatus;

pub mod commands;

#[derive(Parser)]
#[command(name = "maduve")]
#[command(about = "Command-line client for the Maduve matchmaking service")]
#[command(long_about = "Maduve connects members of local ecclesias. Members sign up and wait for admin \
                       approval, then browse other members, manage their profile images and exchange \
                       connect requests. Admins review signups and manage accounts. Get started with \
                       'maduve signup' or 'maduve login'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply for a member account (an admin reviews every signup)
    Signup(SignupArgs),
    /// Log in and remember the session for later commands
    Login {
        #[arg(long, help = "Account email address")]
        email: String,
        #[arg(long, help = "Account password")]
        password: String,
        /// Log in to an admin account instead of a member account
        #[arg(long, help = "Use the admin login endpoint")]
        admin: bool,
    },
    /// Forget the saved session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Check how a signup application is progressing
    ApplicationStatus {
        #[arg(help = "Email address used to sign up")]
        email: String,
    },
    /// Browse active members
    Members {
        #[arg(long, default_value = "", help = "Only show members whose name contains this text")]
        search: String,
    },
    /// Show one member's profile
    Member {
        #[arg(help = "Member id")]
        user_id: String,
    },
    /// View or edit your own profile
    #[command(subcommand)]
    Profile(ProfileCommands),
    /// Manage your main profile photo
    #[command(subcommand)]
    Photo(PhotoCommands),
    /// Manage your three numbered profile images
    #[command(subcommand)]
    Images(ImageCommands),
    /// Send and answer connect requests
    #[command(subcommand)]
    Connect(ConnectCommands),
    /// Administration commands (requires an admin login)
    #[command(subcommand)]
    Admin(AdminCommands),
    /// Inspect or write the client configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    #[arg(long, help = "Full name as it should appear on your profile")]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, help = "At least 6 characters")]
    pub password: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, help = "Ecclesia you belong to")]
    pub ecclesia: String,
    #[arg(long)]
    pub language: String,
    #[arg(long)]
    pub education: String,
    #[arg(long, default_value = "")]
    pub bio: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change profile fields; fields you leave out keep their current value
    Edit(ProfileEditArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileEditArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub ecclesia: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub education: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PhotoCommands {
    /// Upload a new profile photo
    Upload {
        #[arg(help = "Image file to upload")]
        file: PathBuf,
    },
    /// Remove your profile photo
    Delete,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ImageCommands {
    /// List the images in your slots
    List {
        #[arg(long, help = "Show another member's images instead of your own")]
        user: Option<String>,
    },
    /// Show which slots are free
    Slots,
    /// Upload an image into slot 1, 2 or 3 (replaces what is there)
    Upload {
        #[arg(help = "Slot number (1-3)")]
        slot: u8,
        #[arg(help = "Image file to upload")]
        file: PathBuf,
    },
    /// Empty a slot
    Delete {
        #[arg(help = "Slot number (1-3)")]
        slot: u8,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConnectCommands {
    /// Ask another member to connect
    Send {
        #[arg(help = "Member id to send the request to")]
        receiver_id: String,
        #[arg(long, short = 'm', help = "Message shown with the request")]
        message: String,
    },
    /// Accept a request someone sent you
    Accept {
        #[arg(help = "Id of the member who sent the request")]
        sender_id: String,
    },
    /// Decline a request someone sent you
    Reject {
        #[arg(help = "Id of the member who sent the request")]
        sender_id: String,
    },
    /// Pending requests sent to you
    Received,
    /// Requests you have sent
    Sent,
    /// Check whether you are connected with a member
    Check {
        #[arg(help = "Member id")]
        user_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommands {
    /// Create an admin account
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, help = "At least 6 characters")]
        password: String,
        #[arg(long)]
        phone: String,
    },
    /// Show the dashboard summary
    Dashboard,
    /// List signup requests waiting for review
    Pending,
    /// Show one signup request
    Request {
        #[arg(help = "Signup request id")]
        request_id: String,
    },
    /// Approve a signup request
    Approve {
        #[arg(help = "Signup request id")]
        request_id: String,
    },
    /// Reject a signup request
    Reject {
        #[arg(help = "Signup request id")]
        request_id: String,
    },
    /// Delete a signup request without deciding it
    Discard {
        #[arg(help = "Signup request id")]
        request_id: String,
    },
    /// Delete every pending signup request
    DiscardAll {
        #[arg(short = 'y', long, help = "Required confirmation, this cannot be undone")]
        yes: bool,
    },
    /// List members, optionally filtered by name or email
    Users {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Change a member's account status
    SetStatus {
        #[arg(help = "Member id")]
        user_id: String,
        #[arg(help = "pending, active, inactive, blocked or in-talks")]
        status: UserStatus,
    },
    /// Delete a member account
    DeleteUser {
        #[arg(help = "Member id")]
        user_id: String,
    },
    /// List admin accounts
    List,
    /// Show one admin account
    Show {
        #[arg(help = "Admin id or email address")]
        admin: String,
    },
    /// Edit an admin account; fields you leave out keep their current value
    Edit {
        #[arg(help = "Admin id")]
        admin_id: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Remove another admin account
    Remove {
        #[arg(help = "Admin id")]
        admin_id: String,
    },
    /// Show whether an id belongs to an admin or a member
    AuthLevel {
        #[arg(help = "Account id")]
        user_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Write the effective configuration to a file
    Init {
        #[arg(long, default_value = "maduve.toml")]
        path: PathBuf,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

impl Commands {
    /// Name used for the command's tracing span.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Signup(_) => "signup",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::ApplicationStatus { .. } => "application-status",
            Commands::Members { .. } => "members",
            Commands::Member { .. } => "member",
            Commands::Profile(_) => "profile",
            Commands::Photo(_) => "photo",
            Commands::Images(_) => "images",
            Commands::Connect(_) => "connect",
            Commands::Admin(_) => "admin",
            Commands::Config(_) => "config",
        }
    }
}

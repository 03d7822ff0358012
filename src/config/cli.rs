use crate::app::knowledge_base::Topic;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and keep the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DERN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register(RegisterArgs),
    /// Forget the stored session token
    Logout,
    /// Show the identity decoded from the stored token
    Whoami,
    /// List the dashboard sections and actions available to your role
    Menu,
    /// Browse the self-help knowledge base (no login needed)
    Kb {
        #[arg(long = "type", value_enum)]
        topic: Option<Topic>,
    },
    #[command(subcommand)]
    Appointments(AppointmentCommand),
    #[command(subcommand)]
    Requests(RequestCommand),
    #[command(subcommand)]
    Parts(PartCommand),
    #[command(subcommand)]
    Quotes(QuoteCommand),
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "DERN_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, env = "DERN_CONFIRM_PASSWORD", hide_env_values = true)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AppointmentCommand {
    List,
    Create {
        /// e.g. 2024-10-01T10:00
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        phone: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RequestCommand {
    List,
    Create {
        #[arg(long)]
        issue_type: String,
        #[arg(long)]
        description: String,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        issue_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PartCommand {
    List,
    /// Part names offered when adding stock
    Catalog,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        stock_level: i64,
        #[arg(long)]
        cost: f64,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        stock_level: Option<i64>,
        #[arg(long)]
        cost: Option<f64>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum QuoteCommand {
    List,
    Create {
        #[arg(long)]
        request_id: i64,
        #[arg(long, value_delimiter = ',')]
        parts: Vec<i64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        request_id: i64,
        #[arg(long, value_delimiter = ',')]
        parts: Vec<i64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

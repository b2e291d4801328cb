//! Configuration for Afterwish
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

/// Afterwish - keep practical affairs, funeral wishes and subscriptions in order
#[derive(Parser, Debug, Clone)]
#[command(name = "afterwish")]
#[command(about = "Keep practical affairs, funeral wishes and subscriptions in order")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "afterwish")]
    pub mongodb_db: String,

    /// Development mode: fall back to in-memory storage when MongoDB is unreachable
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Refuse record access without a signed-in identity instead of skipping it
    #[arg(long, env = "STRICT_ACCESS", default_value = "false")]
    pub strict_access: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Account email address
    #[arg(long, env = "AFTERWISH_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "AFTERWISH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(flatten)]
    pub mail: MailArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Language model settings for the email commands
#[derive(Parser, Debug, Clone)]
pub struct MailArgs {
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "MAIL_MODEL", default_value = afterwish_mail::client::DEFAULT_MODEL)]
    pub mail_model: String,

    #[arg(long, env = "MAIL_BASE_URL", default_value = afterwish_mail::client::DEFAULT_BASE_URL)]
    pub mail_base_url: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an account and sign in
    SignUp,

    /// Send a password reset code to the account address
    ResetPassword,

    /// Set a new password using a reset code
    CompleteReset {
        #[arg(long)]
        code: String,
        #[arg(long)]
        new_password: String,
    },

    /// Confirm the account address using a verification code
    VerifyEmail {
        #[arg(long)]
        code: String,
    },

    /// Show the signed-in identity
    Whoami,

    /// Practical information (personal details, address, testament)
    Practical {
        #[command(subcommand)]
        action: FormAction,
    },

    /// Funeral wishes
    Wishes {
        #[command(subcommand)]
        action: FormAction,
    },

    /// Subscription inventories
    Subscriptions {
        #[arg(value_enum)]
        kind: SubscriptionKind,
        #[command(subcommand)]
        action: SubscriptionAction,
    },

    /// Write an email from rough notes
    Draft {
        #[arg(long)]
        notes: String,
        /// The email being replied to
        #[arg(long)]
        reply_to: Option<String>,
        #[arg(long, default_value = "vriendelijk")]
        tone: String,
    },

    /// Improve the wording of an email
    Polish {
        #[arg(long)]
        text: String,
    },

    /// Make an email more assertive
    Assertive {
        #[arg(long)]
        text: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FormAction {
    /// Print the stored values
    Show,
    /// Change fields and save, e.g. `set bsn=123456789 testament=ja`
    Set {
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    Business,
    Private,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubscriptionAction {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Add {
        #[arg(long)]
        category: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        customer_number: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "contact-email")]
        email: Option<String>,
        #[arg(long)]
        login: Option<String>,
        #[arg(long = "login-password")]
        password: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Flip the completed flag
    Toggle { id: String },
    Remove { id: String },
    /// Completed/total per category
    Progress,
    /// Common subscriptions per category
    Suggest {
        #[arg(long)]
        category: Option<String>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Command {
    fn needs_email(&self) -> bool {
        !self.uses_mail()
    }

    fn needs_password(&self) -> bool {
        matches!(
            self,
            Self::SignUp
                | Self::Whoami
                | Self::Practical { .. }
                | Self::Wishes { .. }
                | Self::Subscriptions { .. }
        )
    }

    pub fn uses_mail(&self) -> bool {
        matches!(self, Self::Draft { .. } | Self::Polish { .. } | Self::Assertive { .. })
    }
}

impl Args {
    /// Check combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.mongodb_db.trim().is_empty() {
            return Err("MONGODB_DB must not be empty".to_string());
        }
        if self.command.needs_email() && self.email.is_none() {
            return Err("--email (or AFTERWISH_EMAIL) is required for this command".to_string());
        }
        if self.command.needs_password() && self.password.is_none() {
            return Err(
                "--password (or AFTERWISH_PASSWORD) is required for this command".to_string(),
            );
        }
        if self.command.uses_mail() && self.mail.api_key.is_none() {
            return Err("--api-key (or ANTHROPIC_API_KEY) is required for email commands".to_string());
        }
        Ok(())
    }
}

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use clinic_intake::app::App;
use clinic_intake::classifier;
use clinic_intake::config::Config;
use clinic_intake::logging;
use clinic_intake::session::IntakeSession;
use clinic_intake::steps::Step;
use clinic_intake::submission::Submitter;
use clinic_intake::types::{catalog, FormData, MessageRole, Priority};
use clinic_intake::webhook::{test_webhook, HttpWebhookSender, TROUBLESHOOTING};

#[derive(Parser)]
#[command(name = "clinic-intake")]
#[command(about = "Guided IT support ticket intake for medical clinics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how an issue description would be classified
    Classify {
        /// Issue description
        text: String,

        /// Requester-chosen priority (low, medium, high, critical)
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Submit a ticket from a saved form (TOML or JSON)
    Submit {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Send a test ticket to the configured webhook
    TestWebhook,

    /// List clinics and their departments
    Clinics,

    /// Inspect or change webhook settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Use a custom webhook URL
    SetWebhook { url: String },

    /// Go back to the webhook URL derived from the host
    ResetWebhook,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Classify { text, priority }) => cmd_classify(&text, priority),
        Some(Commands::Submit { file }) => cmd_submit(&config, &file).await?,
        Some(Commands::TestWebhook) => cmd_test_webhook(&config).await?,
        Some(Commands::Clinics) => cmd_clinics(),
        Some(Commands::Config { action }) => cmd_config(config, action)?,
        None => run_tui(config, logging_handle.log_file_path).await?,
    }

    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_classify(text: &str, priority: Option<Priority>) {
    let mut form = FormData::new();
    form.description = text.to_string();
    form.priority = priority;
    let form = classifier::sanitize(&form);
    let category = classifier::categorize(&form.description);

    println!("Description: {}", classifier::reword_description(&form.description));
    println!("Category:    {category}");
    println!(
        "Suggested:   {}",
        classifier::suggest_priority(&form.description).as_upper()
    );
    println!(
        "Escalate:    {}",
        if classifier::should_escalate(&form) {
            "yes"
        } else {
            "no"
        }
    );
    println!(
        "Solution:    {}",
        classifier::suggest_solution(&form.description, category)
    );
}

async fn cmd_submit(config: &Config, file: &std::path::Path) -> Result<()> {
    let form = FormData::from_file(file)?;
    let mut session = IntakeSession::with_form(form);
    while session.current_step() != Step::Confirmation {
        if let Err(e) = session.advance() {
            bail!("Form is incomplete at the {} step: {e}", session.current_step());
        }
    }

    let submitter = Submitter::from_config(config)?;
    let outcome = session.submit(&submitter).await?.clone();

    for message in session.transcript().messages() {
        if message.role == MessageRole::Assistant && message.step == Step::Confirmation {
            println!("{}", message.content);
            println!();
        }
    }

    if !outcome.is_success() {
        bail!(
            "Ticket {} was not submitted after {} attempt(s)",
            outcome.ticket().ticket_id,
            outcome.attempts()
        );
    }
    Ok(())
}

async fn cmd_test_webhook(config: &Config) -> Result<()> {
    let sender = HttpWebhookSender::new(&config.webhook)?;
    println!("Testing webhook: {}", sender.url());

    match test_webhook(&sender).await {
        Ok(response) => {
            println!("Webhook responded successfully");
            if let Some(message) = response.message {
                println!("Response: {message}");
            }
            Ok(())
        }
        Err(e) => {
            println!("Webhook test failed: {e}");
            println!();
            println!("Troubleshooting:");
            for (i, tip) in TROUBLESHOOTING.iter().enumerate() {
                println!("  {}. {tip}", i + 1);
            }
            bail!("Webhook connectivity test failed")
        }
    }
}

fn cmd_clinics() {
    for clinic in catalog() {
        println!("{} ({})", clinic.name, clinic.id);
        for department in clinic.departments {
            println!("  - {department}");
        }
    }
}

fn cmd_config(mut config: Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
            println!();
            println!("# resolved webhook URL: {}", config.webhook.resolved_url());
        }
        ConfigAction::SetWebhook { url } => {
            config.webhook.set_custom_url(&url)?;
            config.save()?;
            println!("Webhook URL set to {}", config.webhook.resolved_url());
        }
        ConfigAction::ResetWebhook => {
            config.webhook.reset_url();
            config.save()?;
            println!("Webhook URL reset to {}", config.webhook.resolved_url());
        }
    }
    Ok(())
}

use clap::Parser;
use inframax_site::core::contact_form::{ContactFormDriver, SubmitOutcome};
use inframax_site::core::renderer::{page_shell, FORM_STATUS_ID};
use inframax_site::core::ConfigProvider;
use inframax_site::domain::model::FormField;
use inframax_site::utils::logger;
use inframax_site::SiteConfig;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "contact-form")]
#[command(about = "Run one simulated contact form submission")]
struct Args {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    message: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the simulated submission delay
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => SiteConfig::from_file(path)?,
        None => SiteConfig::default(),
    };
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.submission_delay());

    let document = page_shell(config.company_name(), config.page_title());
    let mut driver = ContactFormDriver::new(document, delay)?;
    driver.input(FormField::Name, args.name)?;
    driver.input(FormField::Email, args.email)?;
    driver.input(FormField::Message, args.message)?;

    match driver.submit().await? {
        SubmitOutcome::Sent => {
            let status = driver.document().require(FORM_STATUS_ID)?.text_content();
            println!("✅ {}", status);
        }
        SubmitOutcome::Rejected(errors) => {
            for (field, message) in errors {
                eprintln!("❌ {}: {}", field.element_id(), message);
            }
            std::process::exit(1);
        }
        SubmitOutcome::Ignored => {
            tracing::warn!("Submission ignored while another is in flight");
        }
    }

    Ok(())
}

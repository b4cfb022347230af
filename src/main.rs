//! WhatsApp Chat Export - Save a date range of a WhatsApp Web conversation.
//!
//! Drives a browser through a WebDriver server, scrolls the chat back to the
//! requested start date, reads messages forward until the end date, and
//! writes them to a Word document, a CSV table, or an `SQLite` database.
//!
//! Usage:
//!   geckodriver &                                   # start a WebDriver server
//!   whatsapp-chat-export export "Alice" --from 2024-03-01 --to 2024-03-05
//!   whatsapp-chat-export export "Alice" --from 03/01/2024 --to 03/05/2024 -f csv
//!   whatsapp-chat-export config                     # create/show config file

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    collect_messages, format_records_table, format_stats, open_conversation, scroll_to_date,
    sink_for,
};
use cli::{parse_format, Cli, Commands, DateRange};
use domain::{AppConfig, DocumentQuery, ExportFormat, Extraction};
use infrastructure::{ensure_config_exists, load_config, WebDriverDocument};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    match cli.command {
        Commands::Export {
            contact,
            from,
            to,
            format,
            output_dir,
            webdriver_url,
            max_scrolls,
            preview,
        } => {
            let format = parse_format(&format)?;
            let range = DateRange::parse(&from, &to)?;

            let mut config = load_config()?;
            if let Some(url) = webdriver_url {
                config.webdriver.url = url;
            }
            if let Some(dir) = output_dir {
                config.export.output_dir = dir;
            }
            if max_scrolls.is_some() {
                config.traversal.max_scroll_attempts = max_scrolls;
            }

            cmd_export(&config, &contact, range, format, preview)?;
        }
        Commands::Config => {
            cmd_config()?;
        }
    }

    Ok(())
}

/// Export one conversation.
fn cmd_export(
    config: &AppConfig,
    contact: &str,
    range: DateRange,
    format: ExportFormat,
    preview: bool,
) -> domain::Result<()> {
    println!("{}", "Please follow the instructions carefully:".bold());
    println!("The WhatsApp website will be launched shortly.");
    println!("Scan the QR code once the website has loaded.");

    let mut page = WebDriverDocument::connect(&config.webdriver)?;

    wait_for_enter("Press 'Enter' after logging in.")?;
    println!(
        "Return to the browser, extraction starts in {} seconds.",
        config.traversal.countdown_secs
    );
    countdown(config.traversal.countdown_secs);

    let extraction = extract(&mut page, config, contact, range)?;
    page.quit()?;

    if preview {
        println!("{}", format_records_table(&extraction.records));
        println!();
    }
    println!("{}", format_stats(&extraction.stats));

    let mut sink = sink_for(format, &config.export.output_dir, contact)?;
    let written = sink.write(contact, &extraction.records)?;

    println!();
    println!(
        "{} {} saved.",
        "✓".green().bold(),
        sink.destination().display()
    );
    println!("{} / {} messages written.", written, extraction.len());

    Ok(())
}

/// Opens the conversation and reads the requested date range.
fn extract<Q: DocumentQuery>(
    page: &mut Q,
    config: &AppConfig,
    contact: &str,
    range: DateRange,
) -> domain::Result<Extraction> {
    open_conversation(page, &config.selectors, contact)?;

    let report = scroll_to_date(
        page,
        &config.selectors,
        range.start,
        config.traversal.max_scroll_attempts,
    )?;
    tracing::debug!(anchor = %report.anchor, scrolls = report.scrolls, "Scrolled to start");

    collect_messages(page, &config.selectors, range.end)
}

/// Create the config file if needed and print it.
fn cmd_config() -> domain::Result<()> {
    let path = ensure_config_exists()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| domain::AppError::io(format!("Failed to read {}", path.display()), e))?;

    println!("{} {}", "📄 Config file:".bold(), path.display());
    println!();
    println!("{content}");

    Ok(())
}

/// Blocks until the user presses Enter.
fn wait_for_enter(prompt: &str) -> domain::Result<()> {
    print!("{prompt} ");
    std::io::stdout()
        .flush()
        .map_err(|e| domain::AppError::io("Failed to write prompt", e))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| domain::AppError::io("Failed to read from stdin", e))?;

    Ok(())
}

/// Counts down from `secs` to 1, one line per second.
fn countdown(secs: u64) {
    for i in (1..=secs).rev() {
        println!("{i}");
        std::thread::sleep(Duration::from_secs(1));
    }
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

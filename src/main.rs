// This is the entry point of Gym-Bro-Tron, the weekly workout standings bot.
//
// **Architecture Overview:**
// - `core/` = Business logic and ports (platform-agnostic)
// - `infra/` = Implementations of core traits (Google Sheets, OpenAI, chat APIs)
//
// This file's job is to:
// 1. Load configuration and the logging context
// 2. Initialize services (dependency injection)
// 3. Run the standings pipeline once
// 4. Report any failure to the monitor chat before exiting

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;
mod logging;

use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use std::process::ExitCode;
use tracing::Instrument;

use crate::config::{ChatBackend, ChatConfig, Config};
use crate::core::ai::{AiConfig, AiService};
use crate::core::delivery::ChatDelivery;
use crate::core::messages::{FallbackSelection, MessageComposer};
use crate::core::run::{report_crash, RunService, RunSettings};
use crate::core::standings::SheetError;
use crate::infra::ai::OpenAiClient;
use crate::infra::delivery::{DiscordDelivery, TelegramDelivery};
use crate::infra::google_sheets::{GoogleAuth, GoogleSheetsClient, ServiceAccountAuth, TokenCache};

fn build_delivery(chat: &ChatConfig) -> Box<dyn ChatDelivery> {
    match chat.backend {
        ChatBackend::Telegram => Box::new(TelegramDelivery::new(chat.token.clone())),
        ChatBackend::Discord => Box::new(DiscordDelivery::new(&chat.token)),
    }
}

/// A service-account key wins over the cached user token.
async fn build_google_auth(config: &Config) -> Result<GoogleAuth, SheetError> {
    match &config.google_service_account_key {
        Some(key_path) => {
            let auth = ServiceAccountAuth::from_file(key_path).await?;
            tracing::info!(email = auth.client_email(), "Using Google service account");
            Ok(GoogleAuth::ServiceAccount(auth))
        }
        None => Ok(GoogleAuth::AuthorizedUser(TokenCache::new(
            config.google_token_file.clone(),
        ))),
    }
}

async fn run_once() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let sheets = GoogleSheetsClient::new(build_google_auth(&config).await?);

    let mut ai_client = OpenAiClient::new(config.openai_token.clone())
        .with_organization(config.openai_organization.clone());
    if let Some(base_url) = &config.ai_base_url {
        ai_client = ai_client.with_base_url(base_url.clone());
    }
    let ai_service = AiService::new(
        ai_client,
        AiConfig {
            model: config.ai_model.clone(),
            timeout: config.ai_timeout,
            ..AiConfig::default()
        },
    );

    let fallback = config
        .fallback_template_index
        .map(FallbackSelection::Fixed)
        .unwrap_or_default();
    let composer = MessageComposer::new(ai_service, config.assistant_name.clone())
        .with_fallback_selection(fallback);

    let service = RunService::new(
        sheets,
        composer,
        build_delivery(&config.chat),
        RunSettings {
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
            window_days: config.window_days,
            destination: config.chat.destination.clone(),
        },
    );

    let now = Utc::now().with_timezone(&config.timezone).naive_local();
    let message = service
        .run(now)
        .instrument(tracing::info_span!("standings_run", %now))
        .await?;

    println!("{}", message.text);
    Ok(())
}

fn describe_panic(err: tokio::task::JoinError) -> String {
    if !err.is_panic() {
        return format!("Run was cancelled: {}", err);
    }
    let payload = err.into_panic();
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("Run panicked: {}", reason)
}

/// Crash path: fresh config, fresh chat client, alert then trace.
async fn report_failure(trace: &str) -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration for the crash report")?;
    let delivery = build_delivery(&config.chat);
    report_crash(
        &delivery,
        &config.chat.monitor_destination,
        &config.assistant_name,
        trace,
    )
    .await
    .context("Failed to send the crash report")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let log_file =
        std::env::var("LOG_FILE").unwrap_or_else(|_| logging::DEFAULT_LOG_FILE.to_string());
    logging::init(Path::new(&log_file))?;

    // Spawned so a panic comes back as a JoinError instead of unwinding past us.
    let trace = match tokio::spawn(run_once()).await {
        Ok(Ok(())) => return Ok(ExitCode::SUCCESS),
        // Cause chain; anyhow appends a backtrace only when RUST_LIB_BACKTRACE=1.
        Ok(Err(err)) => format!("{:?}", err),
        Err(join_err) => describe_panic(join_err),
    };

    tracing::error!("Run failed: {}", trace);
    report_failure(&trace).await?;

    Ok(ExitCode::FAILURE)
}

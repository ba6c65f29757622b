// # auto-ipm
//
// Command-line entry point. This is a THIN integration layer:
// 1. Parsing the command line
// 2. Reading configuration from environment variables
// 3. Initializing tracing and the runtime
// 4. Wiring collaborators into the core and mapping outcomes to exit codes
//
// All reconciliation and schedule logic lives in ipm-core.
//
// ## Configuration
//
// The reconciliation path is configured via environment variables:
//
// - `TENCENT_CLOUD_SECRET_ID`: API secret id (required)
// - `TENCENT_CLOUD_SECRET_KEY`: API secret key (required)
// - `TENCENT_CLOUD_REGION`: region of the address template (required)
// - `ADDRESS_TEMPLATE_ID`: address template id (required)
// - `ADDRESS_TEMPLATE_MEMBER_DESCRIPTION`: label of the managed member
//   (required)
// - `FEISHU_WEBHOOK_URL`: notification webhook (optional; absence disables
//   notifications)
// - `IPM_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// The `schedule` subcommands only touch the local crontab and need none of
// the cloud configuration.
//
// ## Example
//
// ```bash
// export TENCENT_CLOUD_SECRET_ID=AKIDxxxx
// export TENCENT_CLOUD_SECRET_KEY=xxxx
// export TENCENT_CLOUD_REGION=ap-guangzhou
// export ADDRESS_TEMPLATE_ID=ipm-abc123
// export ADDRESS_TEMPLATE_MEMBER_DESCRIPTION=home-office
//
// auto-ipm                       # one reconciliation pass
// auto-ipm schedule add "*/5 * * * *"
// auto-ipm schedule list
// auto-ipm schedule remove
// ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use ipm_core::{
    CloudConfig, CrontabStore, DiscoveryConfig, Error, IpProbe, IpmConfig, NoopNotifier,
    Notifier, NotifyConfig, Outcome, Reconciler, ScheduleManager, TemplateConfig,
};
use ipm_ip_http::HttpIpProbe;
use ipm_notify_feishu::FeishuNotifier;
use ipm_provider_tencent::TencentVpcClient;

/// Exit codes for different termination scenarios
///
/// - 0: Clean run (updated or unchanged)
/// - 1: Configuration or usage error
/// - 2: Runtime error (reconciliation or schedule store failure)
#[derive(Debug, Clone, Copy)]
enum IpmExitCode {
    /// Clean run
    Clean = 0,
    /// Configuration or usage error
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<IpmExitCode> for ExitCode {
    fn from(code: IpmExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(
    name = "auto-ipm",
    about = "Keep a cloud address template in sync with this host's public IP",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "IPM_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the periodic reconciliation job in the user crontab
    Schedule {
        #[command(subcommand)]
        subcommand: ScheduleCommand,
    },
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Install a periodic job (5-field cron expression, quoted)
    Add { expression: String },

    /// Remove every job owned by this tool
    Remove,

    /// List the jobs owned by this tool
    List,
}

/// Load and validate the reconciliation configuration from the environment
fn load_config() -> Result<IpmConfig> {
    let config = IpmConfig {
        cloud: CloudConfig {
            secret_id: env::var("TENCENT_CLOUD_SECRET_ID").unwrap_or_default(),
            secret_key: env::var("TENCENT_CLOUD_SECRET_KEY").unwrap_or_default(),
            region: env::var("TENCENT_CLOUD_REGION").unwrap_or_default(),
        },
        template: TemplateConfig {
            template_id: env::var("ADDRESS_TEMPLATE_ID").unwrap_or_default(),
            member_label: env::var("ADDRESS_TEMPLATE_MEMBER_DESCRIPTION").unwrap_or_default(),
        },
        notify: NotifyConfig {
            webhook_url: env::var("FEISHU_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
        },
        discovery: DiscoveryConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return IpmExitCode::ConfigError.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return IpmExitCode::RuntimeError.into();
        }
    };

    let code = match cli.command {
        Some(Commands::Schedule { subcommand }) => rt.block_on(run_schedule(subcommand)),
        None => rt.block_on(run_reconcile()),
    };

    code.into()
}

/// One reconciliation pass
async fn run_reconcile() -> IpmExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return IpmExitCode::ConfigError;
        }
    };

    let probe: Box<dyn IpProbe> = if config.discovery.providers.is_empty() {
        Box::new(HttpIpProbe::new())
    } else {
        Box::new(HttpIpProbe::with_services(
            config.discovery.providers.clone(),
            Duration::from_secs(config.discovery.timeout_secs),
        ))
    };

    let client = TencentVpcClient::new(
        config.cloud.secret_id.clone(),
        config.cloud.secret_key.clone(),
        config.cloud.region.clone(),
    );

    let notifier: Box<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => match FeishuNotifier::new(url.clone()) {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                error!("configuration error: {e}");
                return IpmExitCode::ConfigError;
            }
        },
        None => Box::new(NoopNotifier),
    };

    let reconciler = Reconciler::new(
        probe,
        Box::new(client),
        notifier,
        config.template.template_id.clone(),
        config.template.member_label.clone(),
    );

    info!("starting reconciliation");
    match reconciler.run().await {
        Ok(Outcome::Updated { previous, current }) => {
            info!("address template updated: {previous:?} -> {current}");
            IpmExitCode::Clean
        }
        Ok(Outcome::Unchanged { current }) => {
            info!("public IP unchanged ({current})");
            IpmExitCode::Clean
        }
        Err(e) => {
            // The reconciler already attempted the failure notification.
            error!("reconciliation failed: {e}");
            IpmExitCode::RuntimeError
        }
    }
}

/// Dispatch one schedule subcommand against the user crontab
async fn run_schedule(command: ScheduleCommand) -> IpmExitCode {
    let manager = match ScheduleManager::new(Box::new(CrontabStore::new())) {
        Ok(manager) => manager,
        Err(e) => {
            error!("{e}");
            return IpmExitCode::RuntimeError;
        }
    };

    let result = match command {
        ScheduleCommand::Add { expression } => manager.add(&expression).await,
        ScheduleCommand::Remove => manager.remove().await,
        ScheduleCommand::List => manager.display().await,
    };

    match result {
        Ok(()) => IpmExitCode::Clean,
        Err(e @ Error::InvalidExpression(_)) => {
            error!("{e}");
            IpmExitCode::ConfigError
        }
        Err(e) => {
            error!("{e}");
            IpmExitCode::RuntimeError
        }
    }
}

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use http::header::{HeaderName, HeaderValue};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use plannerx::application::RequestOptions;
use plannerx::domain::ports::{DurableStoragePort, NotificationSink, NullNotificationSink};
use plannerx::domain::Severity;
use plannerx::infrastructure::config::{Command, TokenAction};
use plannerx::infrastructure::{
    AppConfig, CliArgs, ConfigLoader, FileStorage, KeyringStorage, MemoryStorage, ReqwestTransport,
    StorageBackend,
};
use plannerx::presentation::{TerminalNotificationSink, run_notify_view};
use plannerx::{PlannerX, PlannerXOptions, PlannerXPorts, Teardown};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn build_storage(config: &AppConfig) -> Result<Arc<dyn DurableStoragePort>> {
    let origin = config.effective_origin();

    Ok(match config.storage {
        StorageBackend::File => Arc::new(FileStorage::open(&origin)?),
        StorageBackend::Keyring => Arc::new(KeyringStorage::new(&origin)),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    })
}

fn create_app(config: &AppConfig, sink: Arc<dyn NotificationSink>) -> Result<(PlannerX, Teardown)> {
    let storage = build_storage(config)?;
    let transport = Arc::new(ReqwestTransport::with_timeout(config.request_timeout())?);

    Ok(PlannerX::initialize(
        PlannerXOptions {
            base_url: config.base_url.clone(),
            auth_variant: config.auth_variant,
            init_policy: config.init_policy(),
        },
        PlannerXPorts {
            storage,
            transport,
            sink,
        },
    ))
}

fn request_options(
    app: &PlannerX,
    method: reqwest::Method,
    data: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    form: bool,
) -> Result<RequestOptions> {
    let mut options = RequestOptions::new(method);

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .wrap_err_with(|| format!("invalid header name `{name}`"))?;
        let value = HeaderValue::from_str(&value).wrap_err("invalid header value")?;
        options = options.header(name, value);
    }

    if !data.is_empty() {
        let fields = app.form_data_to_json(data);
        options = if form {
            options.form(&fields)
        } else {
            options.json(&fields)?
        };
    }

    Ok(options)
}

async fn run_command(app: &PlannerX, command: Command, notifications_enabled: bool) -> Result<()> {
    match command {
        Command::Token { action } => match action {
            TokenAction::Show { reveal } => {
                let token = app.token();
                if token.is_empty() {
                    println!("(no credential)");
                } else if reveal {
                    println!("{}", token.as_str());
                } else {
                    println!("{token}");
                }
            }
            TokenAction::Set { value } => {
                app.set_token(value)?;
                app.show_notification("Credential saved", Severity::Success);
            }
            TokenAction::Clear => {
                app.clear_token()?;
                app.show_notification("Credential cleared", Severity::Info);
            }
        },
        Command::Request {
            method,
            path,
            data,
            headers,
            form,
        } => {
            let options = request_options(app, method.clone(), data, headers, form)?;

            let response = match app.api().fetch(&path, options).await {
                Ok(response) => response,
                Err(e) => {
                    app.show_notification(format!("{method} {path} failed"), Severity::Error);
                    return Err(e.into());
                }
            };

            let status = response.status();
            let body = response.text().await?;
            if !body.is_empty() {
                println!("{body}");
            }

            let severity = if status.is_success() {
                Severity::Success
            } else {
                Severity::Error
            };
            app.show_notification(format!("{method} {path}: {status}"), severity);
        }
        Command::Notify { message, severity } => {
            if notifications_enabled {
                run_notify_view(app.notifications(), message, severity).await?;
            } else {
                println!("{message}");
            }
        }
        Command::FormatDate { input } => {
            println!("{}", app.format_date_for_input(input.as_deref()));
        }
        Command::FormJson { fields } => {
            let map = app.form_data_to_json(fields);
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let mut config = ConfigLoader::from_platform_dirs()?.load(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;

    info!(version = plannerx::VERSION, "Starting PlannerX");

    let notifications_enabled = config.notifications.enabled;
    let sink: Arc<dyn NotificationSink> = match args.command {
        Command::Notify { .. } => Arc::new(NullNotificationSink),
        _ if !notifications_enabled => Arc::new(NullNotificationSink),
        _ => Arc::new(TerminalNotificationSink::new()),
    };

    let (app, teardown) = create_app(&config, sink)?;

    let result = run_command(&app, args.command, notifications_enabled).await;

    teardown.run();

    result
}

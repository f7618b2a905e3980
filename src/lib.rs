pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{DispatchError, DispatchOutcome, DispatchResult, Dispatcher, Transcript};
pub use cli::Cli;
pub use config::{AppConfig, ProviderConfig};
pub use domain::{ProviderTarget, RoutingStrategy, types};
pub use infrastructure::{media, model};

use domain::types::{ChatMessage, ContentPart};
use infrastructure::media::image_to_data_uri;
use infrastructure::model::ProviderRegistry;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting pharos relay");
    debug!(
        config = ?cli.config,
        provider = ?cli.provider,
        system = ?cli.system,
        image = ?cli.image,
        "CLI arguments parsed"
    );

    let config_path = cli.config.as_deref().map(Path::new);
    let file_config = AppConfig::load(config_path)?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration from default path");
    }

    debug!(
        provider_count = file_config.providers.len(),
        "Initializing provider registry"
    );
    let registry = ProviderRegistry::from_configs(&file_config.providers);
    let dispatcher = Dispatcher::new(registry);

    let payload = build_payload(&cli, &file_config)?;
    let (strategy, targets) = resolve_targets(&cli, &file_config)?;

    let mut transcript = Transcript::stdout();
    transcript.section(&section_title(&targets))?;

    info!(targets = targets.len(), strategy = strategy.as_str(), "Dispatching request");
    match dispatcher.dispatch(&payload, &targets, strategy).await {
        Ok(outcome) => transcript.reply(&outcome)?,
        // Dispatch failures surface in the transcript, not as process errors
        Err(error) => transcript.failure(&error)?,
    }

    info!("Relay execution finished");
    Ok(())
}

fn build_payload(cli: &Cli, config: &AppConfig) -> Result<Vec<ChatMessage>, Box<dyn Error>> {
    let mut messages = Vec::new();

    if let Some(system) = cli.system.clone().or_else(|| config.system_prompt.clone()) {
        messages.push(ChatMessage::system(system));
    }

    let prompt = if cli.prompt.is_empty() {
        constants::DEFAULT_PROMPT.to_string()
    } else {
        cli.prompt.join(" ")
    };

    match &cli.image {
        Some(image_path) => {
            info!(path = %image_path, "Attaching image as data URI");
            let uri = image_to_data_uri(Path::new(image_path))?;
            messages.push(ChatMessage::user(vec![
                ContentPart::text(prompt),
                ContentPart::image_url(uri),
            ]));
        }
        None => messages.push(ChatMessage::user(prompt)),
    }

    Ok(messages)
}

fn resolve_targets(
    cli: &Cli,
    config: &AppConfig,
) -> Result<(RoutingStrategy, Vec<ProviderTarget>), Box<dyn Error>> {
    if let Some(provider) = &cli.provider {
        if config.provider(provider).is_none() {
            return Err(format!("provider '{provider}' is not configured").into());
        }
        let model = cli.model.clone().unwrap_or_else(|| config.model.clone());
        return Ok((
            RoutingStrategy::Fallback,
            vec![ProviderTarget::new(provider, model)],
        ));
    }

    if let Some(routing) = &config.routing {
        if cli.model.is_some() {
            warn!("--model only applies to single-provider dispatches; using the configured route");
        }
        return Ok((routing.strategy, routing.to_targets(&config.model)));
    }

    let model = cli.model.clone().unwrap_or_else(|| config.model.clone());
    Ok((
        RoutingStrategy::Fallback,
        vec![ProviderTarget::new(&config.default_provider, model)],
    ))
}

fn section_title(targets: &[ProviderTarget]) -> String {
    match targets {
        [single] => format!("Asking {}", single.provider()),
        _ => {
            let names: Vec<&str> = targets.iter().map(ProviderTarget::provider).collect();
            format!("Asking {} with fallback", names.join(", "))
        }
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

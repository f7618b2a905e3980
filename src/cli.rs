use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "pharos",
    version,
    about = "Multi-provider LLM relay with ordered fallback routing"
)]
pub struct Cli {
    /// Path to the relay configuration file
    #[arg(long)]
    pub config: Option<String>,
    /// System prompt prepended to the conversation
    #[arg(long)]
    pub system: Option<String>,
    /// Dispatch to this single provider instead of the configured route
    #[arg(long)]
    pub provider: Option<String>,
    /// Model for single-provider dispatches
    #[arg(long)]
    pub model: Option<String>,
    /// Attach a local image to the prompt as a data URI
    #[arg(long)]
    pub image: Option<String>,
    #[arg()]
    pub prompt: Vec<String>,
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use poesync_core::{
    ExportRequest, ExportType, FilterType, OrderType, PoEditorClient, StringsUploader, SyncConfig,
};

#[derive(Parser)]
#[command(
    name = "poesync",
    version,
    about = "Sync Android string resources with a PoEditor project"
)]
struct Cli {
    /// Path to the YAML sync configuration
    #[arg(short, long, default_value = "poesync.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync terms and upload the strings file for a language
    Upload {
        /// Language to upload; defaults to the configured default language
        #[arg(long)]
        lang: Option<String>,
    },

    /// List the languages configured in the project
    Languages,

    /// Request an export and print its download URL
    ExportUrl {
        #[arg(long)]
        lang: String,
        /// Export file format, e.g. android_strings or apple_strings
        #[arg(long, default_value = "android_strings")]
        format: String,
        /// Restrict the export, e.g. translated or not_fuzzy (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Term ordering: none or terms
        #[arg(long)]
        order: Option<String>,
        /// Only export terms carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Export values without surrounding quotes
        #[arg(long)]
        unquoted: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SyncConfig::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    debug!(
        "loaded config from {} (project {})",
        cli.config.display(),
        config.project_id
    );
    let client = PoEditorClient::new(config.api_token.clone())?;

    match cli.cmd {
        Commands::Upload { lang } => {
            let language = lang.unwrap_or_else(|| config.default_lang.clone());
            let uploader = StringsUploader::new(client, config);
            uploader.upload_strings(&language).await?;
        }
        Commands::Languages => {
            let languages = client.list_languages(config.project_id).await?;
            for language in languages {
                let updated = language
                    .updated
                    .map(|when| when.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:8} {:24} {:>5} translations {:>6.1}% complete, updated {}",
                    language.code, language.name, language.translations, language.percentage,
                    updated
                );
            }
        }
        Commands::ExportUrl {
            lang,
            format,
            filters,
            order,
            tags,
            unquoted,
        } => {
            let export_type: ExportType = format.parse()?;
            let filters = filters
                .iter()
                .map(|filter| filter.parse::<FilterType>())
                .collect::<Result<Vec<_>, _>>()?;
            let order = order.as_deref().map(str::parse::<OrderType>).transpose()?;
            let request = ExportRequest {
                filters,
                order,
                tags,
                unquoted,
            };
            let url = client
                .export_url(config.project_id, &lang, export_type, &request)
                .await?;
            println!("{url}");
        }
    }

    Ok(())
}

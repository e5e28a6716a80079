pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use api::ApiContext;
use cli::{Cli, Commands, RecognizeArgs, ServeArgs};
use config::AppConfig;
use error::AppError;
use pipeline::extraction::OcrEngine;
use pipeline::source::{HttpImageSource, ImageSource, LocalFileSource};
use pipeline::MenuRecognizer;
use store::JsonFileMenuStore;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: Option<LevelFilter>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::new(config::default_log_filter()),
    });
    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    match cli.command {
        Some(Commands::Recognize(args)) => recognize(config, args),
        Some(Commands::Serve(args)) => serve(config, args),
        None => serve(config, ServeArgs::default()),
    }
}

fn recognize(mut config: AppConfig, args: RecognizeArgs) -> Result<(), AppError> {
    if let Some(lang) = args.lang {
        config.language = lang;
    }
    let recognizer = build_recognizer(&config)?;

    let bytes = std::fs::read(&args.image).map_err(|source| AppError::Input {
        path: args.image.display().to_string(),
        source,
    })?;

    if args.raw {
        println!("{}", recognizer.extract_text(&bytes, &config.language)?);
    } else {
        let menu = recognizer.recognize_image(&bytes, &config.language)?;
        println!("{}", serde_json::to_string_pretty(&menu)?);
    }
    Ok(())
}

fn serve(mut config: AppConfig, args: ServeArgs) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.port = port;
    }

    let recognizer = build_recognizer(&config)?;
    let ctx = ApiContext::new(
        Arc::new(recognizer),
        build_source(&config)?,
        build_store(&config)?,
        &config.language,
        &config.store_key,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let mut server = api::start_server(ctx, addr).await.map_err(AppError::Server)?;
        tokio::signal::ctrl_c().await?;
        server.shutdown();
        server.stopped().await;
        Ok::<(), AppError>(())
    })
}

fn build_recognizer(config: &AppConfig) -> Result<MenuRecognizer, AppError> {
    let registry = config.load_registry()?;
    Ok(MenuRecognizer::new(registry, build_engine(config)))
}

#[cfg(feature = "ocr")]
fn build_engine(config: &AppConfig) -> Box<dyn OcrEngine> {
    Box::new(pipeline::extraction::BundledTesseract::new(
        config.tessdata_dir.as_deref(),
    ))
}

#[cfg(not(feature = "ocr"))]
fn build_engine(config: &AppConfig) -> Box<dyn OcrEngine> {
    let mut engine = pipeline::extraction::TesseractCli::new();
    if let Some(dir) = config.tessdata_dir.as_deref() {
        engine = engine.with_tessdata_dir(dir);
    }
    match engine.probe() {
        Ok(version) => tracing::info!(%version, "Using tesseract binary"),
        Err(e) => tracing::warn!("Tesseract not available, recognition will fail: {e}"),
    }
    Box::new(engine)
}

fn build_store(config: &AppConfig) -> Result<Arc<JsonFileMenuStore>, AppError> {
    let store = Arc::new(JsonFileMenuStore::new(config.store_dir())?);
    tracing::info!(
        language = %config.language,
        store_dir = %config.store_dir().display(),
        key = %config.store_key,
        "Menu store ready"
    );
    Ok(store)
}

/// HTTP object storage when a base URL is configured, else a local directory.
fn build_source(config: &AppConfig) -> Result<Arc<dyn ImageSource>, AppError> {
    let source: Arc<dyn ImageSource> = match config.image_base_url.as_deref() {
        Some(url) => Arc::new(HttpImageSource::new(url)?),
        None => Arc::new(LocalFileSource::new(&config.image_root)),
    };
    tracing::info!(source = source.name(), "Image source ready");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_source_without_base_url() {
        let source = build_source(&AppConfig::default()).unwrap();
        assert_eq!(source.name(), "local");
    }

    #[test]
    fn http_source_with_base_url() {
        let config = AppConfig {
            image_base_url: Some("https://storage.example.com".into()),
            ..AppConfig::default()
        };
        assert_eq!(build_source(&config).unwrap().name(), "http");
    }

    #[test]
    fn invalid_base_url_fails_startup() {
        let config = AppConfig {
            image_base_url: Some("not a url".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            build_source(&config),
            Err(AppError::Recognition(pipeline::RecognitionError::Source(_)))
        ));
    }

    #[test]
    fn store_lives_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store_dir: dir.path().join("menus"),
            ..AppConfig::default()
        };
        build_store(&config).unwrap();
        assert!(config.store_dir().is_dir());
    }

    #[test]
    fn unknown_language_fails_startup() {
        let config = AppConfig {
            language: "xx".into(),
            ..AppConfig::default()
        };
        assert!(matches!(
            build_recognizer(&config),
            Err(AppError::Config(config::ConfigError::UnknownLanguage(_)))
        ));
    }

    #[test]
    fn recognize_reports_missing_image() {
        let args = RecognizeArgs {
            image: "/nonexistent/kw12.jpg".into(),
            lang: None,
            raw: false,
        };
        assert!(matches!(
            recognize(AppConfig::default(), args),
            Err(AppError::Input { .. })
        ));
    }
}

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use turmas::{ReportError, Settings};

use crate::shared::fail;

/// Settings file read from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "turmas.toml";
const ENV_PREFIX: &str = "TURMAS";

/// Layer the optional TOML file and `TURMAS_*` variables over the defaults.
///
/// An explicit `--config` file must exist; the implicit one is optional.
pub fn load(explicit: Option<&Path>) -> Result<Settings, i32> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .and_then(Config::try_deserialize::<Settings>)
        .map_err(|e| {
            eprintln!("Erro: configuração inválida: {e}");
            1
        })?;

    settings
        .validate()
        .map_err(ReportError::from)
        .map_err(|e| fail(&e))?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

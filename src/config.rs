// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use config::Source;
use config::builder::DefaultState;
use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Generous, because the backend calls a language model synchronously while
/// handling uploads and exam submissions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "studydesk.toml";

/// Environment variables are `STUDYDESK_BASE_URL` and `STUDYDESK_TIMEOUT`.
pub const ENV_PREFIX: &str = "STUDYDESK";

/// The merged file and environment layers.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    base_url: String,
    timeout_secs: u64,
    /// Where `STUDYDESK_TIMEOUT` lands.
    #[serde(default)]
    timeout: Option<u64>,
}

/// Values given on the command line. These take precedence over everything
/// else.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Settings of the HTTP client.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// The API base URL, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolve the configuration from defaults, the configuration file, the
    /// environment and the command line, in increasing order of precedence.
    pub fn load(overrides: ConfigOverrides) -> Fallible<Self> {
        let file: File<_, FileFormat> = match &overrides.config_path {
            Some(path) => {
                let path: &Path = Path::new(path);
                if !path.is_file() {
                    return fail(format!(
                        "Failed to read configuration file '{}': no such file.",
                        path.display()
                    ));
                }
                log::debug!("Reading configuration from {}", path.display());
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true)
            }
            None => File::from(PathBuf::from(CONFIG_FILE_NAME))
                .format(FileFormat::Toml)
                .required(false),
        };
        let config: Config = layered(file, Environment::with_prefix(ENV_PREFIX))?;
        Self::resolve(config, overrides)
    }

    fn resolve(config: Config, overrides: ConfigOverrides) -> Fallible<Self> {
        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ErrorReport::new(format!("Invalid configuration: {e}")))?;
        let base_url: String = overrides.base_url.unwrap_or(settings.base_url);
        let timeout_secs: u64 = overrides
            .timeout_secs
            .or(settings.timeout)
            .unwrap_or(settings.timeout_secs);
        if timeout_secs == 0 {
            return fail("The request timeout must be at least one second.");
        }
        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Stack the defaults, a file source and the environment.
fn layered<S>(file: S, env: Environment) -> Fallible<Config>
where
    S: Source + Send + Sync + 'static,
{
    let build = || -> Result<Config, ConfigError> {
        let builder: ConfigBuilder<DefaultState> = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;
        builder
            .add_source(file)
            .add_source(env.try_parsing(true))
            .build()
    };
    build().map_err(|e| ErrorReport::new(format!("Invalid configuration: {e}")))
}

fn normalize_base_url(url: &str) -> Fallible<String> {
    let url: &str = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return fail(format!(
            "The base URL must start with http:// or https://, got '{url}'."
        ));
    }
    Ok(url.to_string())
}

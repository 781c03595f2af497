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

use std::process::exit;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use tokio::spawn;

use crate::client::ApiClient;
use crate::cmd::directions::DirectionCommand;
use crate::cmd::exams::ExamCommand;
use crate::cmd::materials::MaterialCommand;
use crate::cmd::mistakes::MistakeCommand;
use crate::cmd::output::OutputFormat;
use crate::cmd::parse::ParseCommand;
use crate::cmd::questions::QuestionCommand;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::system::health;
use crate::cmd::system::routes;
use crate::config::ClientConfig;
use crate::config::ConfigOverrides;
use crate::error::Fallible;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(name = "studydesk", version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the backend API. Default is http://127.0.0.1:8000/api.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Request timeout in seconds. Default is 180.
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Path to a TOML configuration file. By default, `studydesk.toml` in the
    /// current directory is used if it exists.
    #[arg(long, global = true)]
    config: Option<String>,
    /// Which output format to use.
    #[arg(long, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Log requests and server activity.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage study directions.
    Directions {
        #[command(subcommand)]
        command: DirectionCommand,
    },
    /// Manage study materials.
    Materials {
        #[command(subcommand)]
        command: MaterialCommand,
    },
    /// Browse and curate generated questions.
    Questions {
        #[command(subcommand)]
        command: QuestionCommand,
    },
    /// Take exams and read their results.
    Exams {
        #[command(subcommand)]
        command: ExamCommand,
    },
    /// Work through the mistake book.
    Mistakes {
        #[command(subcommand)]
        command: MistakeCommand,
    },
    /// Parse text, documents and web pages.
    Parse {
        #[command(subcommand)]
        command: ParseCommand,
    },
    /// Check that the backend is reachable.
    Health,
    /// Print the pages of the web console.
    Routes,
    /// Browse the study manager through a web interface.
    Serve {
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8080.
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
}

impl Cli {
    /// The log level implied by the flags, unless `RUST_LOG` says otherwise.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

fn connect(overrides: ConfigOverrides) -> Fallible<ApiClient> {
    let config: ClientConfig = ClientConfig::load(overrides)?;
    log::debug!(
        "Using backend {} with a {}s timeout",
        config.base_url,
        config.timeout.as_secs()
    );
    ApiClient::new(&config)
}

pub async fn entrypoint(cli: Cli) -> Fallible<()> {
    let format: OutputFormat = cli.format;
    let overrides: ConfigOverrides = cli.overrides();
    let output: String = match cli.command {
        Command::Routes => routes(format)?,
        Command::Health => health(&connect(overrides)?, format).await?,
        Command::Directions { command } => {
            crate::cmd::directions::run(&connect(overrides)?, command, format).await?
        }
        Command::Materials { command } => {
            crate::cmd::materials::run(&connect(overrides)?, command, format).await?
        }
        Command::Questions { command } => {
            crate::cmd::questions::run(&connect(overrides)?, command, format).await?
        }
        Command::Exams { command } => {
            crate::cmd::exams::run(&connect(overrides)?, command, format).await?
        }
        Command::Mistakes { command } => {
            crate::cmd::mistakes::run(&connect(overrides)?, command, format).await?
        }
        Command::Parse { command } => {
            crate::cmd::parse::run(&connect(overrides)?, command, format).await?
        }
        Command::Serve {
            host,
            port,
            open_browser,
        } => {
            let client: ApiClient = connect(overrides)?;
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match tokio::time::timeout(
                        Duration::from_secs(30),
                        wait_for_server(&browser_host, port),
                    )
                    .await
                    {
                        Ok(Ok(())) => {
                            if let Err(e) = open::that(format!("http://{browser_host}:{port}/")) {
                                log::warn!("Failed to open the browser: {e}");
                            }
                        }
                        _ => {
                            eprintln!("Failed to connect to server.");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig { client, host, port };
            start_server(config).await?;
            return Ok(());
        }
    };
    println!("{output}");
    Ok(())
}

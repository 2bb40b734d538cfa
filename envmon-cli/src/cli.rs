use anyhow::Context;
use clap::{Parser, Subcommand};
use envmon_core::{Config, provider::provider_from_config};
use inquire::{CustomType, Text};
use std::path::PathBuf;

use crate::{dashboard, report, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "envmon", version, about = "Real-time environmental monitor")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `GET /weather` backed by the upstream provider.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:3000".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Poll a server and draw the live dashboard.
    Watch {
        /// Base URL of the envmon server.
        #[arg(long)]
        server: Option<String>,

        /// Poll interval in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Fetch once from the provider and print current and upcoming values.
    Show {
        /// Number of upcoming hourly values to print.
        #[arg(long, default_value_t = 6)]
        hours: usize,
    },

    /// Interactively edit and save the configuration.
    Configure,
}

impl Cli {
    /// The dashboard owns the terminal, so keep log noise down there.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Command::Watch { .. } => "warn",
            _ => "info",
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        match self.command {
            Command::Serve { bind } => {
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                server::run(&config).await?;
            }
            Command::Watch { server, interval_ms } => {
                if let Some(url) = server {
                    config.poll.server_url = url;
                }
                if let Some(ms) = interval_ms {
                    config.poll.interval_ms = ms;
                }
                config.validate()?;
                dashboard::run(&config).await?;
            }
            Command::Show { hours } => {
                let provider = provider_from_config(&config)?;
                let forecast = provider
                    .fetch_current_and_hourly()
                    .await
                    .context("Failed to fetch weather data")?;
                print!("{}", report::render(&forecast, &config.location.name, hours));
            }
            Command::Configure => {
                configure(&mut config)?;
                let path = match &self.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Saved configuration to {}", path.display());
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let loc = &mut config.location;
    let name = Text::new("Location name:").with_default(&loc.name).prompt()?;
    loc.name = name;
    loc.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(loc.latitude)
        .prompt()?;
    loc.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(loc.longitude)
        .prompt()?;
    let timezone = Text::new("Timezone (IANA):")
        .with_default(&loc.timezone)
        .prompt()?;
    loc.timezone = timezone;

    let bind = Text::new("Server bind address:")
        .with_default(&config.server.bind)
        .prompt()?;
    config.server.bind = bind;
    let server_url = Text::new("Dashboard server URL:")
        .with_default(&config.poll.server_url)
        .prompt()?;
    config.poll.server_url = server_url;
    config.poll.interval_ms = CustomType::<u64>::new("Poll interval (ms):")
        .with_default(config.poll.interval_ms)
        .prompt()?;

    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_bind() {
        let cli = Cli::try_parse_from(["envmon", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["envmon", "watch", "--config", "/tmp/envmon.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/envmon.toml")));
        assert_eq!(cli.default_log_level(), "warn");
    }

    #[test]
    fn show_defaults_to_six_hours() {
        let cli = Cli::try_parse_from(["envmon", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { hours: 6 }));
        assert_eq!(cli.default_log_level(), "info");
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["envmon", "frobnicate"]).is_err());
    }
}

//! Command-line launcher for the Galaxies: Burn Rate save core.
//!
//! Wires the filesystem bridge, the save orchestrator and the settings
//! manager together and runs one command against them.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `galaxies-config.yaml`
//! 3. Initialize structured logging (tracing)
//! 4. Build the filesystem bridge rooted at the data directory
//! 5. Run the command and print a short summary

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use galaxies_core::{BackendBridge, GalaxiesConfig, SaveOrchestrator, SettingsManager};
use galaxies_storage::{FsBridge, TemplateSet, default_data_dir, load_client_settings};
use galaxies_types::{GameState, SaveId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::LauncherError;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "galaxies-config.yaml";

#[derive(Parser)]
#[command(name = "galaxies")]
#[command(version)]
#[command(about = "Create, load and inspect Galaxies: Burn Rate saves", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new game and load it
    New {
        /// Captain name
        #[arg(long)]
        captain: String,

        /// Ship name
        #[arg(long)]
        ship: String,
    },

    /// Load an existing save
    Load {
        /// Save id as shown by `list`
        save_id: String,
    },

    /// List saves available for loading
    List,

    /// Print the CSS values derived from the color theme
    Theme,

    /// Apply the stored display settings to the window
    Display,
}

/// Application entry point for the launcher.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config comes first so its log level can seed the filter.
    let (config, config_source) = load_config(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("galaxies launcher starting");
    match &config_source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    let data_dir = cli
        .data_dir
        .or_else(|| config.storage.data_dir.clone())
        .unwrap_or_else(default_data_dir);
    info!(data_dir = %data_dir.display(), busy_policy = ?config.lifecycle.busy_policy, "Storage ready");

    let templates = TemplateSet::embedded();
    let launcher = Launcher {
        bridge: Arc::new(FsBridge::new(&data_dir, templates.clone())),
        templates,
        config,
        data_dir,
    };
    launcher.run(cli.command).await?;

    Ok(())
}

/// Everything a command needs.
struct Launcher {
    bridge: Arc<FsBridge>,
    templates: TemplateSet,
    config: GalaxiesConfig,
    data_dir: PathBuf,
}

impl Launcher {
    async fn run(&self, command: Command) -> Result<(), LauncherError> {
        match command {
            Command::New { captain, ship } => {
                let orchestrator = self.orchestrator();
                let save_id = orchestrator.create_and_load(&captain, &ship).await?;
                println!("Created {save_id}");
                print_game(orchestrator.game().as_deref());
            }
            Command::Load { save_id } => {
                let save_id = SaveId::parse(save_id)?;
                let orchestrator = self.orchestrator();
                orchestrator.load(&save_id).await?;
                print_game(orchestrator.game().as_deref());
            }
            Command::List => {
                let saves = self.orchestrator().available_saves().await?;
                if saves.is_empty() {
                    println!("No saves in {}", self.data_dir.display());
                }
                for meta in saves {
                    println!(
                        "{}  {:<16} {:<16} day {:>4}  {:>8} cr  {}",
                        meta.save_id,
                        meta.captain_name,
                        meta.ship_name,
                        meta.current_day,
                        meta.credits,
                        meta.current_location,
                    );
                }
            }
            Command::Theme => {
                let css = self.settings_manager().await?.apply_theme()?;
                println!("--bg-color: {};", css.background_css);
                println!("--text-color: {};", css.text_css);
                println!("--text-glow: {};", css.glow_css);
            }
            Command::Display => {
                self.settings_manager().await?.apply_display().await?;
                let window = self.bridge.window_state().await;
                let mode = if window.fullscreen { "fullscreen" } else { "windowed" };
                println!("{}x{} {mode}", window.width, window.height);
            }
        }
        Ok(())
    }

    fn orchestrator(&self) -> SaveOrchestrator {
        SaveOrchestrator::new(
            Arc::clone(&self.bridge) as Arc<dyn BackendBridge>,
            &self.config.lifecycle,
        )
    }

    async fn settings_manager(&self) -> Result<SettingsManager, LauncherError> {
        let settings = load_client_settings(&self.data_dir, &self.templates).await?;
        Ok(SettingsManager::with_settings(
            Arc::clone(&self.bridge) as Arc<dyn BackendBridge>,
            settings,
            self.config.display.clone(),
        ))
    }
}

/// Load configuration from the given path or `galaxies-config.yaml`.
///
/// A missing default file means defaults (with env overrides). A missing
/// explicit file is an error. Returns the path actually read, if any.
fn load_config(path: Option<&Path>) -> Result<(GalaxiesConfig, Option<PathBuf>), LauncherError> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(LauncherError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let config = GalaxiesConfig::from_file(path)?;
        return Ok((config, Some(path.to_path_buf())));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        let config = GalaxiesConfig::from_file(default_path)?;
        Ok((config, Some(default_path.to_path_buf())))
    } else {
        Ok((GalaxiesConfig::parse("")?, None))
    }
}

fn print_game(game: Option<&GameState>) {
    let Some(game) = game else {
        return;
    };
    let state = &game.save_state;
    let location = game
        .planet(&state.current_location)
        .map_or(state.current_location.as_str(), |planet| planet.name.as_str());
    println!("Captain {} of the {}", state.captain_name, state.ship_name);
    println!(
        "Day {} at {}  |  {} credits  |  {} fuel",
        state.current_day, location, state.credits, state.current_fuel
    );
    println!(
        "{} planets, {} commodities, {} modules, {} events, {} crew roles",
        game.planets.planets.len(),
        game.commodities.commodities.len(),
        game.modules.modules.len(),
        game.events.events.len(),
        game.crew_roles.roles.len(),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_captain_and_ship() {
        assert!(Cli::try_parse_from(["galaxies", "new", "--captain", "Ada"]).is_err());
        let cli = Cli::try_parse_from([
            "galaxies", "new", "--captain", "Ada", "--ship", "Burn Rate",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::New { ref ship, .. } if ship == "Burn Rate"));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["galaxies", "list", "--data-dir", "/tmp/galaxies"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/galaxies")));
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/galaxies-config.yaml")));
        assert!(matches!(result, Err(LauncherError::ConfigNotFound { .. })));
    }

    #[test]
    fn explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("galaxies-config.yaml");
        std::fs::write(&path, "lifecycle:\n  busy_policy: queue\n").unwrap();

        let (config, source) = load_config(Some(&path)).unwrap();
        assert_eq!(config.lifecycle.busy_policy, galaxies_core::BusyPolicy::Queue);
        assert_eq!(source, Some(path));
    }
}

// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::DemoConfig;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "teapot-harbor")]
#[command(about = "Pointer-following teapot over an animated sea", long_about = None)]
pub struct Cli {
    /// JSON config file; missing keys keep their defaults
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Actor model (.glb or .gltf)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Number of actors cloned from the model
    #[arg(long, value_name = "N")]
    pub actors: Option<usize>,

    /// Seed for actor placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the effect panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Run the update loop without a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Print the effective config as JSON and exit
    #[arg(long, default_value = "false")]
    pub print_config: bool,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overrides from flags take precedence over the config file
    pub fn apply(&self, config: &mut DemoConfig) {
        if let Some(model) = &self.model {
            config.actors.model_path = model.clone();
        }
        if let Some(count) = self.actors {
            config.actors.count = count;
        }
        if let Some(seed) = self.seed {
            config.actors.seed = Some(seed);
        }
        if self.no_ui {
            config.window.show_panel = false;
        }
    }
}

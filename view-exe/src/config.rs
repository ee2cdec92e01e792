//! User configuration options.

use std::error::Error;
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use dirs::config_dir;
use log::{error, info, warn};
use render_soft::{Detail, OverflowMode, RenderConfig};
use serde::{Deserialize, Serialize};

use crate::{BASE_DIR, CLIOptions};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Result<PathBuf, Box<dyn Error>> {
    let mut dir = config_dir().ok_or(format!("{LOG_TAG}: Couldn't open user config dir"))?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir_all(&dir)?;
    }
    dir.push("user.toml");
    Ok(dir)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub width: u32,
    pub height: u32,
    pub low_detail: bool,
    pub vanilla_limits: bool,
    pub output: String,
}

impl UserConfig {
    /// Read the config, a missing or unreadable file is replaced by the
    /// defaults
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let path = get_cfg_file()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        let mut buf = String::new();
        if file.read_to_string(&mut buf)? > 0 {
            match toml::from_str(&buf) {
                Ok(data) => {
                    info!(target: LOG_TAG, "Loaded user config file");
                    return Ok(data);
                }
                Err(e) => {
                    warn!(target: LOG_TAG, "Could not deserialise {path:?} recreating config: {e}")
                }
            }
        }
        UserConfig::create_default(&mut file)
    }

    fn create_default(file: &mut File) -> Result<Self, Box<dyn Error>> {
        let config = UserConfig {
            width: 640,
            height: 400,
            output: "frame.pgm".to_owned(),
            ..UserConfig::default()
        };
        let data = toml::to_string(&config)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(data.as_bytes())?;
        info!(target: LOG_TAG, "Created default user config file");
        Ok(config)
    }

    pub fn write(&self) {
        let save = || -> Result<(), Box<dyn Error>> {
            let mut file = File::create(get_cfg_file()?)?;
            let data = toml::to_string_pretty(self)?;
            file.write_all(data.as_bytes())?;
            Ok(())
        };
        if let Err(err) = save() {
            error!(target: LOG_TAG, "Could not write config: {err}");
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if let Some(f) = cli.low_detail {
            self.low_detail = f;
        } else {
            cli.low_detail = Some(self.low_detail);
        }

        if let Some(f) = cli.vanilla_limits {
            self.vanilla_limits = f;
        } else {
            cli.vanilla_limits = Some(self.vanilla_limits);
        }

        if let Some(output) = &cli.output {
            output.clone_into(&mut self.output);
        } else {
            cli.output = Some(self.output.clone());
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width as usize,
            height: self.height as usize,
            detail: if self.low_detail {
                Detail::Low
            } else {
                Detail::High
            },
            overflow: if self.vanilla_limits {
                OverflowMode::Vanilla
            } else {
                OverflowMode::Grow
            },
        }
    }
}

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::Error;

/// Process-wide default knobs for the sampling/stratification engine.
///
/// Backed by a `settings.json` file placed next to the running executable, mirroring
/// the layout the original tool's settings file used. Any field here may be
/// overridden on a per-call basis by the operation's own parameters; this struct only
/// supplies the default when a caller does not specify one explicitly.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub verbose_mode: bool,
    pub working_directory: String,
    pub compress_rasters: bool,
    /// Upper bound on worker threads for the stratifier/map-composer thread pool.
    /// `-1` means "use all available cores" (resolved via `num_cpus::get()`).
    pub max_procs: isize,
    /// Default temp folder used by virtual-composition output mode when the caller
    /// does not supply one.
    pub temp_dir: String,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            verbose_mode: false,
            working_directory: String::new(),
            compress_rasters: true,
            max_procs: -1,
            temp_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> EngineConfig {
        EngineConfig::default()
    }

    /// Resolve `max_procs` against the machine's core count.
    pub fn resolved_max_procs(&self) -> usize {
        if self.max_procs <= 0 {
            num_cpus::get()
        } else {
            self.max_procs as usize
        }
    }

    fn settings_path() -> std::result::Result<std::path::PathBuf, Error> {
        let mut exe_path = std::env::current_exe()?;
        exe_path.pop();
        Ok(exe_path.join("settings.json"))
    }

    /// Load configuration from `settings.json` beside the executable, falling back to
    /// defaults if the file is missing or fails to parse.
    pub fn load() -> EngineConfig {
        let path = match EngineConfig::settings_path() {
            Ok(p) => p,
            Err(_) => return EngineConfig::default(),
        };
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("failed to parse {}: {}; using defaults", path.display(), e);
                EngineConfig::default()
            }),
            Err(_) => EngineConfig::default(),
        }
    }

    pub fn save(&self) -> std::result::Result<(), Error> {
        let path = EngineConfig::settings_path()?;
        let json = serde_json::to_string_pretty(self)
            .expect("EngineConfig is always serializable");
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolves_max_procs_from_cores() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_procs, -1);
        assert!(cfg.resolved_max_procs() >= 1);
    }

    #[test]
    fn explicit_max_procs_is_honoured() {
        let mut cfg = EngineConfig::default();
        cfg.max_procs = 3;
        assert_eq!(cfg.resolved_max_procs(), 3);
    }
}

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".into(),
            data_dir: PathBuf::from("./public"),
        }
    }
}

/// Defaults, then `server.toml`, then environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.bind_addr = v.clone();
    }
    if let Some(v) = file_cfg.get("data_dir") {
        settings.data_dir = PathBuf::from(v);
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
}

/// The directory served under `/data/phones`.
pub fn prepare_data_dir(data_dir: &Path) -> anyhow::Result<PathBuf> {
    let phones_dir = data_dir.join("data").join("phones");
    let metadata = fs::metadata(&phones_dir).with_context(|| {
        format!(
            "phone data directory '{}' is not readable",
            phones_dir.display()
        )
    })?;
    if !metadata.is_dir() {
        bail!("'{}' is not a directory", phones_dir.display());
    }
    Ok(phones_dir)
}

use std::{collections::HashMap, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub base_url: String,
    pub fragment: Option<String>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            fragment: None,
        }
    }
}

pub fn load_settings(config_path: &Path) -> PageSettings {
    let mut settings = PageSettings::default();
    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut PageSettings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("fragment") {
        settings.fragment = Some(v.clone());
    }
}

fn apply_env(settings: &mut PageSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__FRAGMENT") {
        settings.fragment = Some(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_then_env_layering() {
        let mut settings = PageSettings::default();
        apply_file(
            &mut settings,
            "base_url = \"http://phones.local\"\nfragment = \"#/phones/1\"\n",
        );
        assert_eq!(settings.base_url, "http://phones.local");
        assert_eq!(settings.fragment.as_deref(), Some("#/phones/1"));

        apply_env(&mut settings, |key| {
            (key == "APP__BASE_URL").then(|| "http://override:9000".to_string())
        });
        assert_eq!(settings.base_url, "http://override:9000");
        assert_eq!(settings.fragment.as_deref(), Some("#/phones/1"));
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = PageSettings::default();
        apply_file(&mut settings, "base_url = [");
        assert_eq!(settings, PageSettings::default());
    }
}

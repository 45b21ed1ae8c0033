use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::crawl::EmptyPagePolicy;
use crate::dataset::BuildMode;
use crate::terroir::Terroir;

pub const DEFAULT_BASE_URL: &str = "https://www.maison-du-cigare.be/cigares/";
pub const DEFAULT_OUTPUT: &str = "cigars_dataset.xlsx";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub categories: Vec<Terroir>,
    pub output: PathBuf,
    pub empty_page_policy: EmptyPagePolicy,
    pub build_mode: BuildMode,
}

impl Settings {
    /// Defaults, then `cigars.toml` if present, then `CIGARS_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("cigars").required(false))
            .add_source(
                Environment::with_prefix("CIGARS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("categories"),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let codes: Vec<&str> = Terroir::ALL.iter().map(|t| t.code()).collect();
    Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("categories", codes)?
        .set_default("output", DEFAULT_OUTPUT)?
        .set_default("empty_page_policy", "warn")?
        .set_default("build_mode", "flag")
}

#[cfg(test)]
impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories: Terroir::ALL.to_vec(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            empty_page_policy: EmptyPagePolicy::Warn,
            build_mode: BuildMode::Flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let s: Settings = defaults().unwrap().build().unwrap().try_deserialize().unwrap();
        let expected = Settings::default();
        assert_eq!(s.base_url, expected.base_url);
        assert_eq!(s.categories, expected.categories);
        assert_eq!(s.output, expected.output);
        assert_eq!(s.empty_page_policy, EmptyPagePolicy::Warn);
        assert_eq!(s.build_mode, BuildMode::Flag);
    }

    #[test]
    fn file_values_override_defaults() {
        let s: Settings = defaults()
            .unwrap()
            .add_source(config::File::from_str(
                "categories = [\"honduriens\"]\nbuild_mode = \"parity\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.categories, vec![Terroir::Honduriens]);
        assert_eq!(s.build_mode, BuildMode::Parity);
        assert_eq!(s.output, PathBuf::from(DEFAULT_OUTPUT));
    }
}

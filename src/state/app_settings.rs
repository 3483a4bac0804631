use crate::cli::CliArgs;
use anyhow::{Context, bail};
use bracket_engine::{DEFAULT_TOURNAMENT_NAME, SeedingMode, validate_participant_count};
use log::LevelFilter;
use std::str::FromStr;

pub const DEFAULT_PARTICIPANTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub participants: usize,
    pub mode: SeedingMode,
    pub tournament_name: String,
    /// Only 2, 4, 8 or 16 players.
    pub strict: bool,
    /// Resolve first-round byes right after the bracket is (re)built.
    pub auto_advance_byes: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            participants: DEFAULT_PARTICIPANTS,
            mode: SeedingMode::Standard,
            tournament_name: DEFAULT_TOURNAMENT_NAME.to_string(),
            strict: false,
            auto_advance_byes: true,
        }
    }
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from `BRACKET_*` variables as returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(value) = var("BRACKET_PARTICIPANTS") {
            settings.participants = value
                .trim()
                .parse()
                .with_context(|| format!("BRACKET_PARTICIPANTS: invalid count {value:?}"))?;
        }
        if let Some(value) = var("BRACKET_MODE") {
            settings.mode = value.parse().context("BRACKET_MODE")?;
        }
        if let Some(value) = var("BRACKET_NAME") {
            settings.tournament_name = value.trim().to_string();
        }
        if let Some(value) = var("BRACKET_STRICT") {
            settings.strict = parse_flag(&value).context("BRACKET_STRICT")?;
        }
        if let Some(value) = var("BRACKET_AUTO_BYES") {
            settings.auto_advance_byes = parse_flag(&value).context("BRACKET_AUTO_BYES")?;
        }
        if let Some(value) = var("BRACKET_LOG") {
            settings.log_level = Some(
                LevelFilter::from_str(value.trim())
                    .with_context(|| format!("BRACKET_LOG: unknown level {value:?}"))?,
            );
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_cli(&mut self, args: &CliArgs) -> anyhow::Result<()> {
        if let Some(count) = args.participants {
            self.participants = count;
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(name) = &args.name {
            self.tournament_name = name.trim().to_string();
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        validate_participant_count(self.participants, self.strict)?;
        if self.tournament_name.is_empty() {
            bail!("tournament name must not be empty");
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> anyhow::Result<AppSettings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]).unwrap(), AppSettings::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = settings_from(&[
            ("BRACKET_PARTICIPANTS", "16"),
            ("BRACKET_MODE", "random"),
            ("BRACKET_NAME", " Club Night "),
            ("BRACKET_STRICT", "yes"),
            ("BRACKET_AUTO_BYES", "0"),
            ("BRACKET_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(settings.participants, 16);
        assert_eq!(settings.mode, SeedingMode::Random);
        assert_eq!(settings.tournament_name, "Club Night");
        assert!(settings.strict);
        assert!(!settings.auto_advance_byes);
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn strict_mode_rejects_unsupported_counts() {
        assert!(settings_from(&[("BRACKET_PARTICIPANTS", "6")]).is_ok());
        assert!(settings_from(&[("BRACKET_PARTICIPANTS", "6"), ("BRACKET_STRICT", "1")]).is_err());
        assert!(settings_from(&[("BRACKET_PARTICIPANTS", "0")]).is_err());
        assert!(settings_from(&[("BRACKET_PARTICIPANTS", "65")]).is_err());
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(settings_from(&[("BRACKET_STRICT", "maybe")]).is_err());
        assert!(settings_from(&[("BRACKET_LOG", "loud")]).is_err());
        assert!(settings_from(&[("BRACKET_MODE", "double")]).is_err());
    }

    #[test]
    fn cli_overrides_environment() {
        let mut settings = settings_from(&[("BRACKET_PARTICIPANTS", "4")]).unwrap();
        settings
            .apply_cli(&CliArgs {
                participants: Some(32),
                name: Some("Finals".into()),
                ..CliArgs::default()
            })
            .unwrap();
        assert_eq!(settings.participants, 32);
        assert_eq!(settings.tournament_name, "Finals");

        let err = settings.apply_cli(&CliArgs {
            participants: Some(100),
            ..CliArgs::default()
        });
        assert!(err.is_err());
    }
}

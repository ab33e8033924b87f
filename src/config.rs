use crate::calendar::parse_weekday;
use crate::notification::DeliveryMode;
use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Réglages de l'outil (fichier JSON, chaque champ optionnel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Jour du ménage : nom (`samedi`, `saturday`) ou index 0-6 (0 = dimanche).
    pub weekday: String,
    pub organisation: String,
    pub sender: String,
    pub reply_to: Option<String>,
    /// Adresse qui reçoit tout en mode test.
    pub test_address: String,
    pub ics_domain: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weekday: "samedi".to_string(),
            organisation: "Coop au pied de la montagne".to_string(),
            sender: "Comité d'entretien <entretien@example.com>".to_string(),
            reply_to: None,
            test_address: "test@example.com".to_string(),
            ics_domain: "coop-montagne".to_string(),
        }
    }
}

impl Settings {
    /// Lit le fichier s'il existe, sinon les valeurs par défaut.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Lit un fichier de réglages qui doit exister.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_slice(&data)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.weekday()?;
        Ok(settings)
    }

    pub fn weekday(&self) -> Result<Weekday> {
        parse_weekday(&self.weekday).with_context(|| format!("invalid weekday: {}", self.weekday))
    }

    pub fn delivery_mode(&self, test: bool) -> DeliveryMode {
        if test {
            DeliveryMode::Test {
                address: self.test_address.clone(),
            }
        } else {
            DeliveryMode::Live
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.weekday().unwrap(), Weekday::Sat);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"weekday": "0", "test_address": "me@example.com"}"#).unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.weekday().unwrap(), Weekday::Sun);
        assert_eq!(
            s.delivery_mode(true),
            DeliveryMode::Test {
                address: "me@example.com".into()
            }
        );
        assert_eq!(s.organisation, Settings::default().organisation);
    }

    #[test]
    fn bad_weekday_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"weekday": "funday"}"#).unwrap();
        assert!(Settings::load(&path).is_err());
    }
}

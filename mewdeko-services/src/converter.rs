use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use mewdeko_database::Database;
use mewdeko_database::cache::{CONVERTER_UNITS_TTL, converter_units_key};

pub const DEFAULT_CURRENCY_API_URL: &str = "https://convertapi.nadeko.bot/latest";
const CURRENCY_UNIT_TYPE: &str = "currency";
const TEMPERATURE_UNIT_TYPE: &str = "temperature";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertUnit {
    pub triggers: Vec<String>,
    pub unit_type: String,
    pub modifier: f64,
}

impl ConvertUnit {
    fn matches(&self, trigger: &str) -> bool {
        self.triggers
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(trigger))
    }

    fn primary_trigger(&self) -> &str {
        self.triggers.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    base: String,
    date: String,
    rates: HashMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConvertError {
    UnknownUnit(String),
    TypeMismatch { from: String, to: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnit(unit) => write!(f, "Unknown unit `{unit}`."),
            Self::TypeMismatch { from, to } => {
                write!(f, "Cannot convert from {from} to {to}: the unit types differ.")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

/// Convert `value` between two units of the same type, rounded to 4 decimals.
pub fn convert_between(
    units: &[ConvertUnit],
    from: &str,
    to: &str,
    value: f64,
) -> Result<f64, ConvertError> {
    let origin = units
        .iter()
        .find(|unit| unit.matches(from))
        .ok_or_else(|| ConvertError::UnknownUnit(from.to_owned()))?;
    let target = units
        .iter()
        .find(|unit| unit.matches(to))
        .ok_or_else(|| ConvertError::UnknownUnit(to.to_owned()))?;

    if origin.unit_type != target.unit_type {
        return Err(ConvertError::TypeMismatch {
            from: origin.primary_trigger().to_owned(),
            to: target.primary_trigger().to_owned(),
        });
    }

    if origin == target {
        return Ok(value);
    }

    let result = match origin.unit_type.as_str() {
        TEMPERATURE_UNIT_TYPE => {
            let kelvin = match origin.primary_trigger().to_ascii_uppercase().as_str() {
                "C" => value + 273.15,
                "F" => (value + 459.67) * 5.0 / 9.0,
                _ => value,
            };
            match target.primary_trigger().to_ascii_uppercase().as_str() {
                "C" => kelvin - 273.15,
                "F" => kelvin * 9.0 / 5.0 - 459.67,
                _ => kelvin,
            }
        }
        CURRENCY_UNIT_TYPE => value * target.modifier / origin.modifier,
        _ => value * origin.modifier / target.modifier,
    };

    Ok((result * 10_000.0).round() / 10_000.0)
}

fn currency_units(rates: RatesResponse) -> Vec<ConvertUnit> {
    let mut units: Vec<ConvertUnit> = rates
        .rates
        .into_iter()
        .filter(|(code, _)| !code.eq_ignore_ascii_case(&rates.base))
        .map(|(code, modifier)| ConvertUnit {
            triggers: vec![code],
            unit_type: CURRENCY_UNIT_TYPE.to_owned(),
            modifier,
        })
        .collect();

    units.push(ConvertUnit {
        triggers: vec![rates.base],
        unit_type: CURRENCY_UNIT_TYPE.to_owned(),
        modifier: 1.0,
    });

    units
}

/// Holds the merged unit list: file units plus live currency rates.
pub struct ConverterService {
    http: reqwest::Client,
    db: Database,
    api_url: String,
    units_path: PathBuf,
    units: RwLock<Vec<ConvertUnit>>,
}

impl ConverterService {
    pub fn new(
        http: reqwest::Client,
        db: Database,
        api_url: impl Into<String>,
        units_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            db,
            api_url: api_url.into(),
            units_path: units_path.into(),
            units: RwLock::new(Vec::new()),
        }
    }

    /// Seed the in-memory list from the cache, falling back to the unit file.
    pub async fn load_initial(&self) -> anyhow::Result<usize> {
        let cache_key = converter_units_key(self.db.cache());
        let cached = match self.db.cache().get_json::<Vec<ConvertUnit>>(&cache_key).await {
            Ok(cached) => cached,
            Err(source) => {
                warn!(?source, "failed to read cached converter units");
                None
            }
        };

        let units = match cached {
            Some(units) if !units.is_empty() => units,
            _ => self.file_units().await?,
        };

        let count = units.len();
        *self.units.write().await = units;
        Ok(count)
    }

    /// Fetch fresh currency rates and rebuild the unit list.
    pub async fn refresh(&self) -> anyhow::Result<usize> {
        let response = self.http.get(&self.api_url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("currency API error: {}", response.status());
        }

        let rates = response
            .json::<RatesResponse>()
            .await
            .context("currency API returned an unexpected body")?;

        let rates_date = rates.date.clone();
        let mut units = currency_units(rates);
        units.extend(
            self.file_units()
                .await?
                .into_iter()
                .filter(|unit| unit.unit_type != CURRENCY_UNIT_TYPE),
        );

        let cache_key = converter_units_key(self.db.cache());
        if let Err(source) = self
            .db
            .cache()
            .set_json(&cache_key, &units, CONVERTER_UNITS_TTL)
            .await
        {
            warn!(?source, "failed to cache converter units");
        }

        let count = units.len();
        *self.units.write().await = units;
        info!(count, rates_date = %rates_date, "converter units refreshed");

        Ok(count)
    }

    async fn file_units(&self) -> anyhow::Result<Vec<ConvertUnit>> {
        let raw = tokio::fs::read_to_string(&self.units_path)
            .await
            .with_context(|| format!("failed to read {}", self.units_path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.units_path.display()))
    }

    pub async fn units(&self) -> Vec<ConvertUnit> {
        self.units.read().await.clone()
    }

    pub async fn convert(&self, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
        convert_between(&self.units.read().await, from, to, value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ConvertError, ConvertUnit, RatesResponse, convert_between, currency_units};

    fn unit(triggers: &[&str], unit_type: &str, modifier: f64) -> ConvertUnit {
        ConvertUnit {
            triggers: triggers.iter().map(|t| (*t).to_owned()).collect(),
            unit_type: unit_type.to_owned(),
            modifier,
        }
    }

    fn units() -> Vec<ConvertUnit> {
        vec![
            unit(&["m", "meter"], "length", 1.0),
            unit(&["km", "kilometer"], "length", 1000.0),
            unit(&["ft", "foot"], "length", 0.3048),
            unit(&["kg"], "weight", 1.0),
            unit(&["c", "celsius"], "temperature", 0.0),
            unit(&["f", "fahrenheit"], "temperature", 0.0),
            unit(&["k", "kelvin"], "temperature", 0.0),
            unit(&["USD"], "currency", 1.0),
            unit(&["EUR"], "currency", 0.9),
        ]
    }

    #[test]
    fn converts_linear_units() {
        let units = units();
        assert_eq!(convert_between(&units, "KM", "m", 2.5), Ok(2500.0));
        assert_eq!(convert_between(&units, "foot", "m", 10.0), Ok(3.048));
        assert_eq!(convert_between(&units, "m", "meter", 7.0), Ok(7.0));
    }

    #[test]
    fn converts_temperature_through_kelvin() {
        let units = units();
        assert_eq!(convert_between(&units, "c", "f", 100.0), Ok(212.0));
        assert_eq!(convert_between(&units, "f", "c", 32.0), Ok(0.0));
        assert_eq!(convert_between(&units, "celsius", "k", 0.0), Ok(273.15));
    }

    #[test]
    fn converts_currency_with_inverted_modifiers() {
        let units = units();
        assert_eq!(convert_between(&units, "usd", "eur", 10.0), Ok(9.0));
        assert_eq!(convert_between(&units, "eur", "usd", 9.0), Ok(10.0));
    }

    #[test]
    fn rejects_unknown_and_mismatched_units() {
        let units = units();
        assert_eq!(
            convert_between(&units, "parsec", "m", 1.0),
            Err(ConvertError::UnknownUnit("parsec".to_owned()))
        );
        assert_eq!(
            convert_between(&units, "kg", "m", 1.0),
            Err(ConvertError::TypeMismatch {
                from: "kg".to_owned(),
                to: "m".to_owned(),
            })
        );
    }

    #[test]
    fn rate_response_becomes_currency_units() {
        let rates = RatesResponse {
            base: "USD".to_owned(),
            date: "2026-01-01".to_owned(),
            rates: HashMap::from([("EUR".to_owned(), 0.9), ("USD".to_owned(), 1.0)]),
        };

        let units = currency_units(rates);
        assert_eq!(units.len(), 2);
        assert!(units.iter().any(|u| u.triggers == ["USD"] && u.modifier == 1.0));
        assert!(units.iter().all(|u| u.unit_type == "currency"));
    }
}

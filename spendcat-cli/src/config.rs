use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use spendcat_categorize::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use spendcat_categorize::RuleSet;
use spendcat_core::default_categories;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_spendcat_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub categories: CategoriesSection,
    #[serde(default)]
    pub rules: RuleSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub currency_symbol: String,
    /// IANA zone used to decide what "today" (and so "last month") is
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesSection {
    pub labels: Vec<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "API_KEY".to_string(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

impl Default for CategoriesSection {
    fn default() -> Self {
        Self {
            labels: default_categories(),
        }
    }
}

impl ReportSection {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {e}", self.timezone))
    }

    /// Today's date in the configured zone.
    pub fn today(&self) -> Result<NaiveDate> {
        let tz = self.tz()?;
        Ok(chrono::Utc::now().with_timezone(&tz).date_naive())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendcat_home()?.join("config.toml"))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    // Catch bad patterns/zones at load time rather than mid-run
    cfg.rules.compile()?;
    cfg.report.tz()?;
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

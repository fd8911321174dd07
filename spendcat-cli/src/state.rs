use anyhow::{Context, Result};
use spendcat_core::Transaction;
use std::fs;
use std::path::{Path, PathBuf};

pub fn spendcat_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendcat"))
}

pub fn ensure_spendcat_home() -> Result<PathBuf> {
    let dir = spendcat_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Save a categorized list so it can be re-summarized without another model call.
pub fn write_transactions(path: &Path, txns: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string_pretty(txns)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

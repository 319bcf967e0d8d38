//! Init-config command - write the default recommendation config.

use std::path::PathBuf;

use cartwise::RecommendationConfig;
use colored::Colorize;

pub fn run(path: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )
        .into());
    }

    RecommendationConfig::default().save(&path)?;

    println!(
        "{} {}",
        "Wrote default config to".green().bold(),
        path.display().to_string().white()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cartwise.json");

        run(path.clone(), false).unwrap();
        let loaded = RecommendationConfig::load(&path).unwrap();
        assert_eq!(loaded, RecommendationConfig::default());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cartwise.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(run(path.clone(), false).is_err());
        assert!(run(path, true).is_ok());
    }
}

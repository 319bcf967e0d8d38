//! CLI command implementations.

pub mod init_config;
pub mod inspect;
pub mod items;
pub mod recommend;
pub mod sales;
pub mod trend;

use std::path::Path;

use cartwise::{Cartwise, Workspace};
use tracing::warn;

use crate::cli::InputArgs;

/// Load both input files into a workspace.
pub(crate) fn load_workspace(inputs: &InputArgs) -> Result<Workspace, Box<dyn std::error::Error>> {
    for path in [&inputs.rules, &inputs.sales] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    let workspace = Cartwise::new()
        .with_join_key(inputs.join_on)
        .load(&inputs.rules, &inputs.sales)?;

    if workspace.catalog.is_empty() {
        warn!(rules = %inputs.rules.display(), "rules file has no rows");
    }
    Ok(workspace)
}

/// Write `text` to `output`, or to stdout when no path is given.
pub(crate) fn emit(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Right-pad or truncate `text` to `width` characters.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:width$}", text, width = width)
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

pub(crate) fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("MUG", 5), "MUG  ");
        assert_eq!(fit("CAKE STAND", 5), "CAKE…");
        assert_eq!(fit("CAKE STAND", 5).chars().count(), 5);
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(3)), "3");
        assert_eq!(or_dash::<i64>(None), "-");
    }
}

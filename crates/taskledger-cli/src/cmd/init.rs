use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use taskledger_core::worklog::initial_worklog_yaml;

use super::CommandContext;
use crate::output::render;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing work log.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    path: String,
    overwritten: bool,
}

fn write_starter(path: &Path, today: NaiveDate, force: bool) -> Result<bool> {
    let existed = path.exists();
    if existed && !force {
        anyhow::bail!(
            "{} already exists. Use `taskledger init --force` to overwrite it.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let yaml = initial_worklog_yaml(today)?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write work log: {}", path.display()))?;
    Ok(existed)
}

/// Execute `taskledger init`: write a starter work log covering yesterday
/// and today.
///
/// # Errors
///
/// Returns an error if the file exists and `--force` is not set, or if
/// writing fails.
pub fn run_init(args: &InitArgs, ctx: &CommandContext) -> Result<()> {
    let path = &ctx.worklog_path;
    let overwritten = write_starter(path, Local::now().date_naive(), args.force)?;
    tracing::info!(path = %path.display(), overwritten, "wrote starter work log");

    let result = InitOutput {
        path: path.display().to_string(),
        overwritten,
    };
    render(ctx.output, &result, |r, w| {
        writeln!(w, "✅ Created work log at {}", r.path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskledger_core::worklog::load_work_log;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 2).expect("valid date")
    }

    #[test]
    fn writes_a_loadable_log() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("worklog.yml");

        let overwritten = write_starter(&path, day(), false).expect("init");
        assert!(!overwritten);

        let log = load_work_log(&path).expect("load");
        assert_eq!(
            log.keys().cloned().collect::<Vec<_>>(),
            vec!["2024-08-01".to_string(), "2024-08-02".to_string()]
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("worklog.yml");
        std::fs::write(&path, "keep me").expect("seed");

        let err = write_starter(&path, day(), false).expect_err("should refuse");
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "keep me");

        assert!(write_starter(&path, day(), true).expect("forced"));
        assert_ne!(std::fs::read_to_string(&path).expect("read"), "keep me");
    }
}

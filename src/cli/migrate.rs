//! tt migrate command implementation.

use std::path::PathBuf;

use crate::cli::open_store;
use crate::error::Result;
use crate::migrate::{self, MigrationReport, StepStatus};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct MigrateOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: MigrateOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let report = migrate::run(&store)?;

    let mut human = HumanOutput::new(header(&report));
    if let Some(backup) = &report.backup {
        human.push_summary("backup", backup.label.clone());
    }
    for step in &report.steps {
        match step.status {
            StepStatus::Applied => human.push_detail(format!("{}: migrated", step.step)),
            StepStatus::Failed => human.push_warning(format!(
                "{}: {}",
                step.step,
                step.error.as_deref().unwrap_or("failed")
            )),
        }
    }
    if report.failed() > 0 {
        if let Some(backup) = &report.backup {
            human.push_next_step(format!("tt backup restore {}", backup.label));
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "migrate",
        &report,
        Some(&human),
    )
}

fn header(report: &MigrationReport) -> String {
    if report.steps.is_empty() {
        "tt migrate: document already in nested shape".to_string()
    } else if report.failed() == 0 {
        format!("tt migrate: migrated {} task(s)", report.applied())
    } else {
        format!(
            "tt migrate: {} step(s) applied, {} failed",
            report.applied(),
            report.failed()
        )
    }
}

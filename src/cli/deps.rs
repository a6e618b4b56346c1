//! tt validate command implementation.

use std::path::PathBuf;

use crate::cli::open_store;
use crate::deps::{validate, validate_document, InvalidDependency};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ValidateOptions {
    pub root: Option<u64>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateReport {
    scope: String,
    findings: Vec<InvalidDependency>,
}

pub fn run(options: ValidateOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let doc = store.load()?;

    let (scope, findings) = match options.root {
        Some(root_id) => {
            let root = doc
                .find_task(root_id)
                .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;
            (format!("task {root_id}"), validate(root))
        }
        None => ("document".to_string(), validate_document(&doc)),
    };

    let header = if findings.is_empty() {
        format!("tt validate: {scope} has no unresolved dependencies")
    } else {
        format!(
            "tt validate: {} unresolved dependency reference(s) in {scope}",
            findings.len()
        )
    };

    let mut human = HumanOutput::new(header);
    for finding in &findings {
        human.push_warning(format!(
            "{} references {} which does not resolve",
            finding.node_id, finding.invalid_ref
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "validate",
        &ValidateReport { scope, findings },
        Some(&human),
    )
}

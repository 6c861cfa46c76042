//! Input planning, tag collection and report rendering for one run.

use crate::config::{MonitorConfig, OutputFormat};
use crate::dnssec::{KeyTagRecord, ZoneTags};
use crate::error::{Error, Result};
use crate::resolver_config::{self, AnchorSource};
use crate::zone::{RecordClass, ZoneReader};
use serde::Serialize;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One source of trust anchor records, read in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Zone(PathBuf),
    /// A single record found in resolver configuration
    Inline {
        origin: String,
        record: String,
        /// Line of `origin` the record was found on
        line: usize,
    },
}

impl Input {
    /// Label used in diagnostics
    pub fn name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::Zone(path) => path.display().to_string(),
            Input::Inline { origin, .. } => origin.clone(),
        }
    }
}

/// Build the ordered input list.
///
/// Zone files come first, then the anchors of each resolver configuration.
/// With neither, standard input is read. `-` names standard input.
pub fn plan_inputs(files: &[PathBuf], resolver_configs: &[PathBuf]) -> Result<Vec<Input>> {
    let mut inputs: Vec<Input> = files
        .iter()
        .map(|file| {
            if file.as_os_str() == "-" {
                Input::Stdin
            } else {
                Input::Zone(file.clone())
            }
        })
        .collect();

    for config in resolver_configs {
        let base = config.parent().unwrap_or_else(|| Path::new(""));
        for source in resolver_config::scan_file(config)? {
            inputs.push(match source {
                AnchorSource::File(path) if path.is_relative() => Input::Zone(base.join(path)),
                AnchorSource::File(path) => Input::Zone(path),
                AnchorSource::Inline { record, line } => Input::Inline {
                    origin: config.display().to_string(),
                    record,
                    line,
                },
            });
        }
    }

    if files.is_empty() && resolver_configs.is_empty() {
        inputs.push(Input::Stdin);
    }
    debug!("Planned {} inputs", inputs.len());
    Ok(inputs)
}

/// Read every input to completion, stopping at the first error
pub fn collect(inputs: &[Input]) -> Result<KeyTagRecord> {
    let mut tags = KeyTagRecord::new();
    for input in inputs {
        let name = input.name();
        match input {
            Input::Stdin => {
                let stdin = io::stdin();
                let mut reader = ZoneReader::open(stdin.lock());
                tags.collect(&mut reader, &name)?;
            }
            Input::Zone(path) => {
                let mut reader = ZoneReader::from_path(path).map_err(|error| Error::Io {
                    path: name.clone(),
                    error,
                })?;
                tags.collect(&mut reader, &name)?;
            }
            Input::Inline { record, line, .. } => {
                let mut reader =
                    ZoneReader::with_defaults(Cursor::new(record.as_bytes()), 0, RecordClass::IN)
                        .starting_at(*line);
                tags.collect(&mut reader, &name)?;
            }
        }
    }
    Ok(tags)
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    zone: &'a ZoneTags,
    query: String,
}

/// Render the final report, one query per zone
pub fn render(tags: &KeyTagRecord, config: &MonitorConfig) -> Result<String> {
    let zones = tags.finalize();
    match config.output {
        OutputFormat::Text => Ok(zones
            .iter()
            .map(|zone| format!("{}\n", zone.query_command(&config.query_command)))
            .collect()),
        OutputFormat::Json => {
            let reports: Vec<Report<'_>> = zones
                .iter()
                .map(|zone| Report {
                    zone,
                    query: zone.query_command(&config.query_command),
                })
                .collect();
            let mut out = serde_json::to_string_pretty(&reports)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Plan, collect and render in one go
pub fn run(files: &[PathBuf], config: &MonitorConfig) -> Result<String> {
    let inputs = plan_inputs(files, &config.resolver_configs)?;
    let tags = collect(&inputs)?;
    if tags.is_empty() {
        warn!("No DNSKEY or DS records found in {} inputs", inputs.len());
    }
    render(&tags, config)
}

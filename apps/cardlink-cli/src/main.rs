//! cardlink: command-line front end for the card link engine.
//!
//! Normalizes single links, prints the link type registry, and repairs legacy
//! link records exported from storage.
//!
//! Run:
//! ```bash
//! cardlink process --type instagram --input @john_doe --title "My IG"
//! echo '[{"type":"email","rawInput":"a@b.co"}]' | cardlink process --json
//! LOG_FORMAT=json cardlink fix-meta links.json --dry-run
//! ```
//!
//! Configuration: See `config.rs` for all environment variables. Logs go to
//! stderr; stdout only carries JSON.

mod config;

use std::fs;
use std::io::{self, Read};
use std::process;

use domain::editing::LinkPatch;
use domain::registry::definitions;
use domain::repair::{record_id, repair_value, RepairReport, RepairSummary};
use domain::transform::matches_link_type;
use domain::{process_link, process_links, LinkInput, LinkType};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  cardlink process --type <type> --input <raw> [--title <title>] [--order <n>] [--inactive]\n  cardlink process --json            (reads a link or an array of links from stdin)\n  cardlink update --patch <json>     (reads a processed link from stdin)\n  cardlink types\n  cardlink check <type> [<url>]\n  cardlink fix-meta <file|-> [--dry-run]\n\nEnvironment:\n  LOG_FORMAT=pretty|json  OUTPUT_FORMAT=pretty|compact  FIX_META_BATCH_SIZE=<n>  RUST_LOG=<filter>",
        domain::about()
    );
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(io::stderr),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .init();
        }
    }
}

fn read_source(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))
    }
}

fn emit<T: serde::Serialize>(cfg: &config::Config, value: &T) -> Result<(), String> {
    let out = cfg
        .render(value)
        .map_err(|e| format!("failed to serialize output: {}", e))?;
    println!("{}", out);
    Ok(())
}

/// Links on stdin may come one at a time or as a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(LinkInput),
    Many(Vec<LinkInput>),
}

/// Build a `LinkInput` from `--type/--input/--title/--order/--inactive`.
fn parse_link_args(rest: &[String]) -> Result<LinkInput, String> {
    let mut link_type: Option<LinkType> = None;
    let mut input = LinkInput::default();
    let mut i = 0;
    while i < rest.len() {
        let flag = rest[i].as_str();
        if flag == "--inactive" {
            input.is_active = Some(false);
            i += 1;
            continue;
        }
        let Some(val) = rest.get(i + 1) else {
            return Err(format!("{} requires a value", flag));
        };
        match flag {
            "--type" => {
                let t: LinkType = val.parse().map_err(|e| format!("{}", e))?;
                link_type = Some(t);
            }
            "--input" => input.raw_input = val.clone(),
            "--title" => input.title = Some(val.clone()),
            "--order" => {
                let n = val
                    .parse::<u32>()
                    .map_err(|_| format!("--order expects a non-negative integer, got {}", val))?;
                input.order_index = Some(n);
            }
            unk => return Err(format!("unknown argument: {}", unk)),
        }
        i += 2;
    }

    let Some(link_type) = link_type else {
        return Err("missing --type for process".into());
    };
    input.link_type = link_type;
    Ok(input)
}

fn cmd_process(cfg: &config::Config, rest: &[String]) -> Result<(), String> {
    if rest.first().map(String::as_str) == Some("--json") {
        let body = read_source("-")?;
        let parsed: OneOrMany =
            serde_json::from_str(&body).map_err(|e| format!("invalid link JSON: {}", e))?;
        return match parsed {
            OneOrMany::One(input) => emit(cfg, &process_link(&input)),
            OneOrMany::Many(inputs) => emit(cfg, &process_links(&inputs)),
        };
    }

    let input = parse_link_args(rest)?;
    emit(cfg, &process_link(&input))
}

fn cmd_update(cfg: &config::Config, rest: &[String]) -> Result<(), String> {
    let patch: LinkPatch = match rest {
        [flag, json] if flag == "--patch" => {
            serde_json::from_str(json).map_err(|e| format!("invalid patch JSON: {}", e))?
        }
        _ => return Err("usage: cardlink update --patch <json>".into()),
    };
    let body = read_source("-")?;
    let stored: domain::ProcessedLink =
        serde_json::from_str(&body).map_err(|e| format!("invalid link JSON: {}", e))?;
    emit(cfg, &domain::editing::apply_patch(&stored, &patch))
}

fn cmd_types(cfg: &config::Config) -> Result<(), String> {
    let types: Vec<serde_json::Value> = definitions()
        .map(|def| {
            serde_json::json!({
                "type": def.link_type,
                "displayName": def.display_name,
                "category": def.category,
                "icon": def.icon,
                "description": def.description,
                "example": def.example,
                "inputLabel": def.input_label,
                "inputKind": def.input_kind.as_str(),
                "baseUrl": def.input_kind.base_url(),
                "protocol": def.input_kind.protocol(),
                "validationPattern": def.pattern_source(),
            })
        })
        .collect();
    emit(cfg, &types)
}

/// `check <type>` reports the display name; `check <type> <url>` also tells
/// whether a stored URL is still accepted for that type.
fn check_message(tag: &str, url: Option<&str>) -> Result<String, String> {
    let Some(link_type) = LinkType::parse(tag) else {
        return Err(format!("Invalid link type: {}", tag));
    };
    let name = link_type.display_name();
    match url {
        None => Ok(format!("{} ({})", tag, name)),
        Some(url) if matches_link_type(link_type, url) => Ok(format!("{} ({}): ok", tag, name)),
        Some(_) => Err(format!("Please enter a valid {} URL", name.to_lowercase())),
    }
}

fn cmd_check(rest: &[String]) -> Result<(), String> {
    let (tag, url) = match rest {
        [tag] => (tag.as_str(), None),
        [tag, url] => (tag.as_str(), Some(url.as_str())),
        [] => return Err("missing <type> for check".into()),
        _ => return Err("usage: cardlink check <type> [<url>]".into()),
    };
    println!("{}", check_message(tag, url)?);
    Ok(())
}

/// Repair stored rows batch by batch. A row that cannot be repaired is logged
/// and counted, and the run moves on.
fn repair_rows(
    rows: &[serde_json::Value],
    batch_size: usize,
    dry_run: bool,
) -> (Vec<RepairReport>, RepairSummary) {
    let batches = rows.len().div_ceil(batch_size);
    info!(total = rows.len(), batches, dry_run, "starting link meta repair");

    let mut summary = RepairSummary::default();
    let mut repaired = Vec::with_capacity(rows.len());
    for (n, batch) in rows.chunks(batch_size).enumerate() {
        info!(batch = n + 1, of = batches, size = batch.len(), "processing batch");
        for row in batch {
            let report = match repair_value(row) {
                Ok(report) => report,
                Err(err) => {
                    warn!(link = record_id(row), error = %err, "failed to repair link");
                    summary.record_error();
                    continue;
                }
            };
            summary.record(&report);
            if report.needs_update() {
                for change in &report.changes {
                    info!(link = %report.id, link_type = %report.link.link_type, ?change, "link changed");
                }
                if let Some(errors) = &report.link.meta.validation_errors {
                    warn!(link = %report.id, ?errors, "link has validation errors");
                }
            }
            repaired.push(report);
        }
    }
    (repaired, summary)
}

fn cmd_fix_meta(cfg: &config::Config, rest: &[String]) -> Result<(), String> {
    let mut path: Option<&str> = None;
    let mut dry_run = false;
    for arg in rest {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            other if path.is_none() => path = Some(other),
            unk => return Err(format!("unknown argument: {}", unk)),
        }
    }
    let Some(path) = path else {
        return Err("missing <file> for fix-meta".into());
    };

    let body = read_source(path)?;
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&body).map_err(|e| format!("invalid records JSON: {}", e))?;
    if records.is_empty() {
        info!("no links found");
        return emit(cfg, &records);
    }

    let (repaired, summary) = repair_rows(&records, cfg.batch_size, dry_run);
    info!(
        processed = summary.processed,
        updated = summary.updated,
        errors = summary.errors,
        dry_run,
        "link meta repair finished"
    );
    if dry_run {
        emit(cfg, &summary)
    } else {
        emit(cfg, &repaired)
    }
}

fn run() -> Result<(), String> {
    let cfg = config::Config::from_env().map_err(|e| e.to_string())?;
    init_tracing(&cfg);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((cmd, rest)) = args.split_first() else {
        print_usage();
        return Ok(());
    };

    match cmd.as_str() {
        "process" => cmd_process(&cfg, rest),
        "update" => cmd_update(&cfg, rest),
        "types" => cmd_types(&cfg),
        "check" => cmd_check(rest),
        "fix-meta" => cmd_fix_meta(&cfg, rest),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}

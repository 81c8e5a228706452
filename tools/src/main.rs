use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use graph::DecodeLimits;
use tools::{inspect_project, validate_project, InspectReport};

#[derive(Parser)]
#[command(
    name = "gsnap-tools",
    version,
    about = "gsnap project inspection and validation tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect project structure and sizes.
    Inspect {
        /// Path to the project file, or a directory of them.
        project_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected files.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected files (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Validate a project file against the decode limits.
    Validate {
        /// Path to the project file.
        project_file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            project_path,
            glob,
            sort,
            limit,
            format,
        } => {
            if project_path.is_dir() {
                let entries = collect_project_entries(&project_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let report = inspect_file(&entry.path)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_report(&report, format)?;
                }
            } else {
                let report = inspect_file(&project_path)?;
                print_report(&report, format)?;
            }
        }
        Command::Validate { project_file } => {
            let text = fs::read_to_string(&project_file)
                .with_context(|| format!("read project {}", project_file.display()))?;
            match validate_project(&text, &DecodeLimits::default()) {
                Ok(summary) => {
                    println!(
                        "PASS: {} entities, {} nodes",
                        summary.entities, summary.total_nodes
                    );
                }
                Err(err) => {
                    println!("FAIL: {err}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn inspect_file(path: &PathBuf) -> Result<InspectReport> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read project {}", path.display()))?;
    inspect_project(&text).with_context(|| format!("inspect project {}", path.display()))
}

struct ProjectEntry {
    path: PathBuf,
    size: u64,
}

fn collect_project_entries(dir: &PathBuf, glob: Option<&str>) -> Result<Vec<ProjectEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(ProjectEntry { path, size });
    }
    Ok(entries)
}

fn maybe_sort_entries(
    mut entries: Vec<ProjectEntry>,
    sort: Option<InspectSort>,
) -> Vec<ProjectEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}

fn print_report(report: &InspectReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => print_inspect_report(report),
    }
    Ok(())
}

fn print_inspect_report(report: &InspectReport) {
    println!(
        "format: {} version: {} fingerprint: 0x{:016x}",
        report.format, report.version, report.registry_fingerprint
    );
    println!("entities: {}", report.entity_count);
    for entity in &report.entities {
        let tag = entity.tag.as_deref().unwrap_or("(untyped)");
        println!(
            "  {}: {} ({} nodes, depth {}, widest node {} properties)",
            entity.key, tag, entity.nodes, entity.depth, entity.max_properties
        );
    }
    if !report.tag_histogram.is_empty() {
        println!("type tags:");
        for (tag, count) in &report.tag_histogram {
            println!("  {tag}: {count}");
        }
    }
}

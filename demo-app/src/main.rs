use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use demo_model::{Canvas, Shape, Stroke};
use graph::Value;
use history::History;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "demo-app",
    version,
    about = "Deterministic gsnap demo session"
)]
struct Cli {
    /// Bound on the history stack (0 = unbounded).
    #[arg(long, default_value_t = 8)]
    max_history: usize,
    /// Output directory for the saved project and summary.
    #[arg(long, default_value = "session")]
    out_dir: PathBuf,
}

#[derive(Serialize)]
struct Summary {
    snapshots_recorded: usize,
    entities_after_edits: usize,
    entities_after_undo: usize,
    entities_after_redo: usize,
    saved_bytes: usize,
    loaded_entities: usize,
    load_fingerprint_mismatch: bool,
    inspect_entity_count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir {}", cli.out_dir.display()))?;

    let mut canvas = Canvas::new("demo document");
    let mut history = History::new(cli.max_history);

    // Build the document step by step, one snapshot per edit.
    let (_, rect) = canvas.add_shape("rect", "background");
    rect.borrow_mut().move_to(0.0, 0.0);
    history.record_snapshot(&canvas);

    let (_, circle) = canvas.add_shape("circle", "badge");
    circle.borrow_mut().move_to(40.0, 25.0);
    circle.borrow_mut().set_stroke(Value::object(Rc::new(RefCell::new(
        Stroke::new("#cc0000", vec![4, 2]),
    ))));
    history.record_snapshot(&canvas);

    let (group_key, group) = canvas.add_group("badge group");
    let group_value = Value::object(Rc::clone(&group));
    group
        .borrow_mut()
        .add_child(&group_value, Value::object(Rc::clone(&circle)));
    canvas.select(Some(group_key));
    canvas.set_zoom(2);
    history.record_snapshot(&canvas);

    // A compound action: internal snapshot calls collapse to nothing,
    // the outer caller records exactly once.
    history
        .begin_operation("entity.duplicate")
        .context("begin duplicate")?;
    let copy = Rc::new(RefCell::new(Shape::new("rect", "background copy")));
    copy.borrow_mut().move_to(10.0, 10.0);
    canvas.add_entity(Value::object(copy));
    history.record_snapshot(&canvas); // suppressed
    history
        .end_operation("entity.duplicate")
        .context("end duplicate")?;
    history.record_snapshot(&canvas);

    let entities_after_edits = canvas.entity_count();
    let snapshots_recorded = history.len();

    history.undo(&mut canvas).context("undo")?;
    let entities_after_undo = canvas.entity_count();
    history.redo(&mut canvas).context("redo")?;
    let entities_after_redo = canvas.entity_count();

    let text = history.save_project(&canvas).context("save project")?;
    let project_path = cli.out_dir.join("project.json");
    fs::write(&project_path, &text)
        .with_context(|| format!("write {}", project_path.display()))?;

    // Reload into a fresh canvas to prove the file stands on its own.
    let mut reloaded = Canvas::new("demo document");
    let mut reload_history = History::new(cli.max_history);
    let report = reload_history
        .load_project(&mut reloaded, &text)
        .context("load project")?;

    let inspect = tools::inspect_project(&text).context("inspect project")?;

    let summary = Summary {
        snapshots_recorded,
        entities_after_edits,
        entities_after_undo,
        entities_after_redo,
        saved_bytes: text.len(),
        loaded_entities: report.entities_restored,
        load_fingerprint_mismatch: report.fingerprint_mismatch,
        inspect_entity_count: inspect.entity_count,
    };
    write_summary_json(&cli.out_dir, &summary)?;
    print_summary(&summary);

    Ok(())
}

fn write_summary_json(out_dir: &Path, summary: &Summary) -> Result<()> {
    let path = out_dir.join("summary.json");
    let contents = serde_json::to_string_pretty(summary).context("serialize summary")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("snapshots recorded: {}", summary.snapshots_recorded);
    println!(
        "entities: {} after edits, {} after undo, {} after redo",
        summary.entities_after_edits, summary.entities_after_undo, summary.entities_after_redo
    );
    println!("saved project: {} bytes", summary.saved_bytes);
    println!(
        "reload: {} entities, fingerprint mismatch: {}",
        summary.loaded_entities, summary.load_fingerprint_mismatch
    );
}

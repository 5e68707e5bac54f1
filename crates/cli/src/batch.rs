use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use renoscope_engine::{Relationship, UserContext, Verdict, VerdictEngine};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::task::JoinSet;

#[derive(Serialize)]
struct BatchRow {
    metro: String,
    era: String,
    verdict: Verdict,
}

/// Generate verdicts for every metro x era combination. Each computation is
/// independent, so the grid fans out across tokio tasks; a failed
/// combination is logged and skipped without aborting the batch.
pub(crate) async fn run(
    engine: VerdictEngine,
    budget: f64,
    relationship: Relationship,
    out: Option<PathBuf>,
) -> Result<()> {
    let combos: Vec<(String, String)> = engine
        .store()
        .metros()
        .keys()
        .flat_map(|metro| {
            engine
                .store()
                .eras()
                .keys()
                .map(move |era| (metro.clone(), era.clone()))
        })
        .collect();

    let progress = ProgressBar::new(combos.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("static progress template"),
    );

    let mut tasks = JoinSet::new();
    for (metro, era) in combos {
        let engine = engine.clone();
        tasks.spawn(async move {
            let ctx = UserContext::new(budget, metro.clone(), era.clone(), relationship);
            let result = engine.generate_verdict(&ctx);
            (metro, era, result)
        });
    }

    let mut rows = Vec::new();
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (metro, era, result) = joined.context("batch worker panicked")?;
        progress.inc(1);
        match result {
            Ok(verdict) => rows.push(BatchRow { metro, era, verdict }),
            Err(err) => {
                failures += 1;
                log::warn!("skipping {metro}/{era}: {err}");
            }
        }
    }
    progress.finish_and_clear();

    // Collection order is nondeterministic; sort so output files diff cleanly.
    rows.sort_by(|a, b| (&a.metro, &a.era).cmp(&(&b.metro, &b.era)));

    let mut lines = String::new();
    for row in &rows {
        lines.push_str(&serde_json::to_string(row)?);
        lines.push('\n');
    }

    match out {
        Some(path) => {
            std::fs::write(&path, lines)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} verdicts to {}", rows.len(), path.display());
        }
        None => {
            std::io::stdout().write_all(lines.as_bytes())?;
        }
    }

    if failures > 0 {
        log::warn!("{failures} combination(s) failed and were skipped");
    }
    Ok(())
}

//! Run command implementation

use anyhow::Result;
use sl_db::Warehouse;
use sl_pipelines::{definitions, run_pipeline, ExecutorOptions, TaskStatus};
use std::path::Path;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    let pipeline = definitions::find(&config, &args.pipeline)?;
    let warehouse = common::open_warehouse(&config, args.warehouse.as_deref())?;

    println!(
        "Running pipeline '{}' ({} tasks) against {} warehouse...\n",
        pipeline.name(),
        pipeline.task_count(),
        warehouse.warehouse_type()
    );

    let options = ExecutorOptions {
        threads: args.threads,
        run_state_dir: Some(config.target_path_absolute(Path::new(&global.project_dir))),
    };
    let (results, summary) = run_pipeline(&pipeline, warehouse, &options).await?;

    for result in &results {
        match result.status {
            TaskStatus::Success => {
                println!("  ✓ {} [{}ms]", result.task, result.duration.as_millis());
            }
            TaskStatus::Failed => {
                println!(
                    "  ✗ {} - {} [{}ms]",
                    result.task,
                    result.error.as_deref().unwrap_or("unknown error"),
                    result.duration.as_millis()
                );
            }
            TaskStatus::Skipped => {
                println!("  - {} (skipped: upstream failure)", result.task);
            }
        }
    }

    println!();
    println!(
        "Run {}: {} succeeded, {} failed, {} skipped [{}ms]",
        summary.run_id,
        summary.succeeded,
        summary.failed,
        summary.skipped,
        summary.duration.as_millis()
    );

    if !summary.all_succeeded() {
        // Exit code 1 = task failures
        std::process::exit(1);
    }

    Ok(())
}

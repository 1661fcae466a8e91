//! Validate command implementation

use anyhow::Result;
use sl_pipelines::definitions;

use crate::cli::GlobalArgs;
use crate::commands::common;

/// Execute the validate command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    println!("Config OK: project '{}'", config.name);

    // Building a pipeline validates its edges and acyclicity
    let pipelines = definitions::builtin(&config)?;
    for pipeline in &pipelines {
        let levels = pipeline.dag().execution_levels()?;
        println!(
            "  ✓ {} ({} tasks, {} levels)",
            pipeline.name(),
            pipeline.task_count(),
            levels.len()
        );
    }

    println!();
    println!("All pipelines valid.");
    Ok(())
}

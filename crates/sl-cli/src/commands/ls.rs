//! Ls command implementation

use anyhow::Result;
use serde_json::json;
use sl_pipelines::{definitions, Pipeline};

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common;

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;

    let pipelines = match &args.pipeline {
        Some(name) => vec![definitions::find(&config, name)?],
        None => definitions::builtin(&config)?,
    };

    match args.output {
        LsOutput::Table => print_table(&pipelines),
        LsOutput::Json => print_json(&pipelines)?,
        LsOutput::Tree => print_tree(&pipelines)?,
    }

    Ok(())
}

fn print_table(pipelines: &[Pipeline]) {
    println!("{:<20} {:<12} {:>5}", "PIPELINE", "SCHEDULE", "TASKS");
    for pipeline in pipelines {
        println!(
            "{:<20} {:<12} {:>5}",
            pipeline.name(),
            pipeline.schedule(),
            pipeline.task_count()
        );
    }
}

fn print_json(pipelines: &[Pipeline]) -> Result<()> {
    let mut entries = Vec::new();
    for pipeline in pipelines {
        let tasks: Vec<_> = pipeline
            .dag()
            .topological_order()?
            .into_iter()
            .map(|id| {
                let deps: Vec<String> = pipeline
                    .dag()
                    .dependencies(id.as_str())
                    .into_iter()
                    .map(|d| d.into_inner())
                    .collect();
                json!({ "id": id.as_str(), "depends_on": deps })
            })
            .collect();

        entries.push(json!({
            "name": pipeline.name().as_str(),
            "description": pipeline.description(),
            "schedule": pipeline.schedule(),
            "max_active_runs": pipeline.max_active_runs(),
            "tasks": tasks,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_tree(pipelines: &[Pipeline]) -> Result<()> {
    for pipeline in pipelines {
        println!("{} ({})", pipeline.name(), pipeline.schedule());
        let levels = pipeline.dag().execution_levels()?;
        for (i, level) in levels.iter().enumerate() {
            let ids: Vec<&str> = level.iter().map(|id| id.as_str()).collect();
            println!("  {}: {}", i, ids.join(", "));
        }
        println!();
    }
    Ok(())
}

//! Built-in pipeline definitions
//!
//! Two graphs ship with Starlift: the full star-schema load and a minimal
//! fact-only variant. Both run hourly with a single active run; staging
//! parameters come from the project configuration.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::Pipeline;
use sl_core::{Config, InsertQuery, TableName};
use sl_tasks::{
    CopyFormat, CopySpec, DataQualityTask, LoadDimensionTask, LoadFactTask, NoopTask,
    QualityCheck, StageTask,
};

/// Name of the full star-schema pipeline
pub const STAR_SCHEMA: &str = "star_schema";

/// Name of the minimal fact-only pipeline
pub const SONGPLAYS_ONLY: &str = "songplays_only";

/// Hourly cron schedule shared by both graphs
const HOURLY: &str = "0 * * * *";

/// Column list the fact INSERT targets, in order
const SONGPLAY_COLUMNS: [&str; 9] = [
    "playid",
    "start_time",
    "userid",
    "level",
    "songid",
    "artistid",
    "sessionid",
    "location",
    "user_agent",
];

/// The null-key checks gating every full run, one per loaded table.
pub fn quality_checks() -> Vec<QualityCheck> {
    vec![
        QualityCheck::new("SELECT COUNT(*) FROM users WHERE userid IS NULL", 0),
        QualityCheck::new("SELECT COUNT(*) FROM songs WHERE song_id IS NULL", 0),
        QualityCheck::new("SELECT COUNT(*) FROM artists WHERE artist_id IS NULL", 0),
        QualityCheck::new("SELECT COUNT(*) FROM time WHERE start_time IS NULL", 0),
        QualityCheck::new("SELECT COUNT(*) FROM songplays WHERE playid IS NULL", 0),
    ]
}

/// Full pipeline: stage both sources, load the fact table, load the four
/// dimensions in parallel, then gate on the quality checks.
pub fn star_schema(config: &Config) -> PipelineResult<Pipeline> {
    let staging = &config.staging;

    let events_format = match &staging.events_jsonpaths {
        Some(uri) => CopyFormat::JsonPaths(uri.clone()),
        None => CopyFormat::JsonAuto,
    };

    let dims = [
        ("load_users_dim", InsertQuery::Users),
        ("load_songs_dim", InsertQuery::Songs),
        ("load_artists_dim", InsertQuery::Artists),
        ("load_time_dim", InsertQuery::Time),
    ];
    let dim_ids: Vec<&str> = dims.iter().map(|(id, _)| *id).collect();

    let mut builder = Pipeline::builder(STAR_SCHEMA)
        .description("Load and transform event data into the star schema")
        .schedule(HOURLY)
        .max_active_runs(1)
        .task(NoopTask::new("begin_execution"))
        .task(StageTask::new(
            "stage_events",
            CopySpec {
                table: TableName::new("staging_events"),
                bucket: staging.bucket.clone(),
                key: staging.events_key.clone(),
                role_arn: staging.role_arn.clone(),
                format: events_format,
            },
        ))
        .task(StageTask::new(
            "stage_songs",
            CopySpec {
                table: TableName::new("staging_songs"),
                bucket: staging.bucket.clone(),
                key: staging.songs_key.clone(),
                role_arn: staging.role_arn.clone(),
                format: CopyFormat::JsonAuto,
            },
        ))
        .task(
            LoadFactTask::new(
                "load_songplays_fact",
                InsertQuery::Songplays.table().into_inner(),
                InsertQuery::Songplays.sql(),
            )
            .with_columns(SONGPLAY_COLUMNS.iter().map(|c| c.to_string()).collect()),
        );

    for (id, query) in dims {
        builder = builder.task(LoadDimensionTask::new(
            id,
            query.table().into_inner(),
            query.sql(),
        ));
    }

    builder
        .task(DataQualityTask::new("run_quality_checks", quality_checks()))
        .task(NoopTask::new("end_execution"))
        .fan_out("begin_execution", &["stage_events", "stage_songs"])
        .fan_in(&["stage_events", "stage_songs"], "load_songplays_fact")
        .fan_out("load_songplays_fact", &dim_ids)
        .fan_in(&dim_ids, "run_quality_checks")
        .edge("run_quality_checks", "end_execution")
        .build()
}

/// Minimal pipeline: a single fact-load task with no dependencies.
pub fn songplays_only() -> PipelineResult<Pipeline> {
    Pipeline::builder(SONGPLAYS_ONLY)
        .description("Load the songplays fact table only")
        .schedule(HOURLY)
        .max_active_runs(1)
        .task(LoadFactTask::new(
            "load_songplays_fact",
            InsertQuery::Songplays.table().into_inner(),
            InsertQuery::Songplays.sql(),
        ))
        .build()
}

/// All built-in pipelines
pub fn builtin(config: &Config) -> PipelineResult<Vec<Pipeline>> {
    Ok(vec![star_schema(config)?, songplays_only()?])
}

/// Resolve a built-in pipeline by name
pub fn find(config: &Config, name: &str) -> PipelineResult<Pipeline> {
    match name {
        STAR_SCHEMA => star_schema(config),
        SONGPLAYS_ONLY => songplays_only(),
        _ => Err(PipelineError::UnknownPipeline {
            name: name.to_string(),
            available: format!("{}, {}", STAR_SCHEMA, SONGPLAYS_ONLY),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{StagingConfig, TaskId, WarehouseConfig};

    fn test_config() -> Config {
        Config {
            name: "sparkify".to_string(),
            warehouse: WarehouseConfig::default(),
            staging: StagingConfig {
                bucket: "udacity-dend".to_string(),
                role_arn: "arn:aws:iam::123456789012:role/warehouse-s3".to_string(),
                events_key: "log-data".to_string(),
                songs_key: "song-data".to_string(),
                events_jsonpaths: None,
            },
            target_path: "target".to_string(),
        }
    }

    #[test]
    fn star_schema_has_expected_shape() {
        let pipeline = star_schema(&test_config()).unwrap();

        assert_eq!(pipeline.task_count(), 10);
        assert_eq!(pipeline.schedule(), "0 * * * *");
        assert_eq!(pipeline.max_active_runs(), 1);

        let levels = pipeline.dag().execution_levels().unwrap();
        assert_eq!(levels.len(), 6);
        assert_eq!(levels[0], vec![TaskId::new("begin_execution")]);
        assert_eq!(
            levels[1],
            vec![TaskId::new("stage_events"), TaskId::new("stage_songs")]
        );
        assert_eq!(levels[2], vec![TaskId::new("load_songplays_fact")]);
        assert_eq!(levels[3].len(), 4);
        assert_eq!(levels[4], vec![TaskId::new("run_quality_checks")]);
        assert_eq!(levels[5], vec![TaskId::new("end_execution")]);
    }

    #[test]
    fn star_schema_quality_gate_waits_on_all_dimensions() {
        let pipeline = star_schema(&test_config()).unwrap();
        let deps = pipeline.dag().dependencies("run_quality_checks");
        assert_eq!(deps.len(), 4);
    }

    #[test]
    fn quality_checks_cover_every_loaded_table() {
        let checks = quality_checks();
        assert_eq!(checks.len(), 5);
        for (check, table) in checks
            .iter()
            .zip(["users", "songs", "artists", "time", "songplays"])
        {
            assert!(check.sql.contains(table));
            assert_eq!(check.expected, 0);
        }
    }

    #[test]
    fn songplays_only_is_a_single_unwired_task() {
        let pipeline = songplays_only().unwrap();
        assert_eq!(pipeline.task_count(), 1);
        assert!(pipeline
            .dag()
            .dependencies("load_songplays_fact")
            .is_empty());
        assert!(pipeline.dag().dependents("load_songplays_fact").is_empty());
    }

    #[test]
    fn find_resolves_builtins_and_rejects_unknown() {
        let config = test_config();
        assert!(find(&config, STAR_SCHEMA).is_ok());
        assert!(find(&config, SONGPLAYS_ONLY).is_ok());

        let err = find(&config, "nightly").err().unwrap();
        assert!(matches!(err, PipelineError::UnknownPipeline { .. }));
    }

    #[test]
    fn events_jsonpaths_switches_copy_format() {
        let mut config = test_config();
        config.staging.events_jsonpaths = Some("s3://udacity-dend/log_json_path.json".into());

        // The graph builds either way; the COPY text is covered in sl-tasks.
        assert!(star_schema(&config).is_ok());
    }
}

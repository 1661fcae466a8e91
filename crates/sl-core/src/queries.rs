//! Fixed SQL template catalog for the star schema loads.
//!
//! One SELECT body per load target, in warehouse dialect, as parameterless
//! string constants. The catalog is keyed by [`InsertQuery`] so callers
//! never reach for a raw literal: the enum names the query, `sql()` returns
//! its text, and `table()` returns the table the INSERT targets.

use crate::table_name::TableName;

/// SELECT body feeding the `songplays` fact table.
///
/// Filters staging_events to NextSong page views, converts the epoch
/// millisecond timestamp into a proper timestamp, joins staging_songs on
/// title/artist/duration, and derives the surrogate `playid` by hashing
/// session id and start time. DISTINCT deduplicates on that key.
const SONGPLAYS_SELECT: &str = "\
SELECT DISTINCT
    md5(events.sessionid || events.start_time) AS playid,
    events.start_time,
    events.userid,
    events.level,
    songs.song_id AS songid,
    songs.artist_id AS artistid,
    events.sessionid,
    events.location,
    events.useragent AS user_agent
FROM (
    SELECT TIMESTAMP 'epoch' + ts / 1000 * INTERVAL '1 second' AS start_time, *
    FROM staging_events
    WHERE page = 'NextSong'
) events
LEFT JOIN staging_songs songs
    ON events.song = songs.title
   AND events.artist = songs.artist_name
   AND events.length = songs.duration";

/// SELECT body feeding the `users` dimension.
const USERS_SELECT: &str = "\
SELECT DISTINCT userid, firstname, lastname, gender, level
FROM staging_events
WHERE page = 'NextSong'";

/// SELECT body feeding the `songs` dimension.
const SONGS_SELECT: &str = "\
SELECT DISTINCT song_id, title, artist_id, year, duration
FROM staging_songs";

/// SELECT body feeding the `artists` dimension.
const ARTISTS_SELECT: &str = "\
SELECT DISTINCT artist_id, artist_name, artist_location, artist_latitude, artist_longitude
FROM staging_songs";

/// SELECT body feeding the `time` dimension, derived from loaded songplays.
const TIME_SELECT: &str = "\
SELECT start_time,
       EXTRACT(hour FROM start_time)      AS hour,
       EXTRACT(day FROM start_time)       AS day,
       EXTRACT(week FROM start_time)      AS week,
       EXTRACT(month FROM start_time)     AS month,
       EXTRACT(year FROM start_time)      AS year,
       EXTRACT(dayofweek FROM start_time) AS weekday
FROM songplays";

/// Named entry in the SQL template catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertQuery {
    /// Fact table load (staging joins + surrogate key derivation)
    Songplays,
    /// Users dimension load
    Users,
    /// Songs dimension load
    Songs,
    /// Artists dimension load
    Artists,
    /// Time dimension load
    Time,
}

impl InsertQuery {
    /// Every query in the catalog, fact first.
    pub const ALL: [InsertQuery; 5] = [
        InsertQuery::Songplays,
        InsertQuery::Users,
        InsertQuery::Songs,
        InsertQuery::Artists,
        InsertQuery::Time,
    ];

    /// The SELECT body for this query.
    pub fn sql(&self) -> &'static str {
        match self {
            InsertQuery::Songplays => SONGPLAYS_SELECT,
            InsertQuery::Users => USERS_SELECT,
            InsertQuery::Songs => SONGS_SELECT,
            InsertQuery::Artists => ARTISTS_SELECT,
            InsertQuery::Time => TIME_SELECT,
        }
    }

    /// The table the INSERT built from this query targets.
    pub fn table(&self) -> TableName {
        let name = match self {
            InsertQuery::Songplays => "songplays",
            InsertQuery::Users => "users",
            InsertQuery::Songs => "songs",
            InsertQuery::Artists => "artists",
            InsertQuery::Time => "time",
        };
        TableName::new(name)
    }
}

impl std::fmt::Display for InsertQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertQuery::Songplays => write!(f, "songplays"),
            InsertQuery::Users => write!(f, "users"),
            InsertQuery::Songs => write!(f, "songs"),
            InsertQuery::Artists => write!(f, "artists"),
            InsertQuery::Time => write!(f, "time"),
        }
    }
}

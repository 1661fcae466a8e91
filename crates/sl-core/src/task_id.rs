//! Strongly-typed task identifier

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Identifier of a task within a pipeline graph (e.g. `stage_events`).
    ///
    /// Non-empty by construction; unique within one pipeline.
    pub struct TaskId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_empty() {
        assert!(TaskId::try_new("").is_none());
        assert!(TaskId::try_new("stage_events").is_some());
    }

    #[test]
    fn compares_against_str() {
        let id = TaskId::new("load_songplays_fact");
        assert_eq!(id, "load_songplays_fact");
        assert_eq!(id.as_str(), "load_songplays_fact");
    }

    #[test]
    fn usable_as_hashmap_key_via_borrow() {
        let mut map = std::collections::HashMap::new();
        map.insert(TaskId::new("begin_execution"), 1);
        assert_eq!(map.get("begin_execution"), Some(&1));
    }
}

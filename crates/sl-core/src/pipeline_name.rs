//! Strongly-typed pipeline name

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Name of a pipeline graph (e.g. `star_schema`).
    pub struct PipelineName;
}

//! Strongly-typed warehouse table name

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Name of a warehouse table (staging, fact, or dimension).
    pub struct TableName;
}

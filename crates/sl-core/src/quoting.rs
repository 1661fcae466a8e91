//! SQL quoting utilities
//!
//! Every dynamic statement in Starlift interpolates at most a table name and
//! a handful of string literals. These helpers keep that interpolation safe.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes, doubling any embedded double
/// quotes per the SQL standard.
///
/// # Examples
/// ```
/// use sl_core::quoting::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `public.songplays`).
///
/// Splits on `.` and quotes each component individually.
///
/// # Examples
/// ```
/// use sl_core::quoting::quote_qualified;
/// assert_eq!(quote_qualified("songplays"), r#""songplays""#);
/// assert_eq!(quote_qualified("public.songplays"), r#""public"."songplays""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_plain_and_embedded() {
        assert_eq!(quote_ident("staging_events"), r#""staging_events""#);
        assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
    }

    #[test]
    fn quote_qualified_splits_on_dots() {
        assert_eq!(quote_qualified("time"), r#""time""#);
        assert_eq!(quote_qualified("public.time"), r#""public"."time""#);
    }

    #[test]
    fn escape_literal_doubles_single_quotes() {
        assert_eq!(escape_literal("log-data"), "log-data");
        assert_eq!(escape_literal("it's"), "it''s");
    }
}

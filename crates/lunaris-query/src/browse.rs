//! Queries issued from the object tree

/// Quote an identifier for SQLite, doubling embedded double quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// The query run when a table or view is opened from the object tree
pub fn browse_sql(object_name: &str, limit: u32) -> String {
    format!("SELECT * FROM {} LIMIT {}", quote_identifier(object_name), limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_sql_quotes_name() {
        assert_eq!(browse_sql("users", 100), "SELECT * FROM \"users\" LIMIT 100");
        assert_eq!(
            browse_sql("odd\"name", 5),
            "SELECT * FROM \"odd\"\"name\" LIMIT 5"
        );
    }
}

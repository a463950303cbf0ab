//! SQL statements issued while provisioning

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a string literal the way `mysql_real_escape_string` does
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\0' => quoted.push_str("\\0"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '"' => quoted.push_str("\\\""),
            '\x1a' => quoted.push_str("\\Z"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

pub fn create_database_sql(name: &str, charset: &str, collation: &str) -> String {
    let mut sql = format!(
        "CREATE DATABASE {} DEFAULT CHARACTER SET {}",
        quote_identifier(name),
        quote_identifier(charset)
    );
    if !collation.is_empty() {
        sql.push_str(&format!(" DEFAULT COLLATE {}", quote_identifier(collation)));
    }
    sql
}

/// `quoted_password` must already be quoted, see [`quote_literal`]
pub fn grant_sql(database: &str, user: &str, quoted_password: Option<&str>) -> String {
    let mut sql = format!(
        "GRANT ALL PRIVILEGES ON {}.* TO {}@`localhost`",
        quote_identifier(database),
        quote_identifier(user)
    );
    if let Some(password) = quoted_password {
        sql.push_str(&format!(" IDENTIFIED BY {}", password));
    }
    sql
}

pub fn drop_database_sql(name: &str) -> String {
    format!("DROP DATABASE {}", quote_identifier(name))
}

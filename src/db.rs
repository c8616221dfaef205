//! Opening and initializing the SQLite database that holds the transaction documents.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

const SQLITE_SCHEME: &str = "sqlite://";
const IN_MEMORY_NAMES: [&str; 2] = [":memory:", "sqlite::memory:"];

/// Open a database connection from a connection string.
///
/// Accepted forms are `sqlite://<path>`, a plain file path, and `:memory:` or
/// `sqlite::memory:` for a private in-memory database.
///
/// # Errors
/// Returns an [Error::ConnectionError] if the string is blank, names an
/// unsupported scheme, or the database cannot be opened.
pub fn open_connection(connection_string: &str) -> Result<Connection, Error> {
    let connection_string = connection_string.trim();

    if IN_MEMORY_NAMES.contains(&connection_string) {
        return Connection::open_in_memory()
            .map_err(|error| Error::ConnectionError(error.to_string()));
    }

    let path = match connection_string.strip_prefix(SQLITE_SCHEME) {
        Some(path) => path,
        None if connection_string.contains("://") => {
            return Err(Error::ConnectionError(format!(
                "unsupported connection string scheme in \"{connection_string}\""
            )));
        }
        None => connection_string,
    };

    if path.is_empty() {
        return Err(Error::ConnectionError(
            "the connection string does not name a database".to_owned(),
        ));
    }

    Connection::open(path)
        .map_err(|error| Error::ConnectionError(format!("could not open \"{path}\": {error}")))
}

/// Create the tables for the domain models if they do not already exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}

/*!
Basic file read/write functions for `Policy` documents.

This module wraps basic read and write operations and the JSON (de)serialization logic in
`syntax::IamValue`. Both read and write functions come in two forms: one that takes a file path
and one that takes an implementation of `std::io::Read`/`std::io::Write`. `datastore`'s
`InMemoryDataStore` test fixture loads its fixture policies through these functions.

# Example

```rust
use iam_permission_algebra::io;
use std::path::PathBuf;

let policy = io::read_from_file(&PathBuf::from("tests/data/allow-s3-read.json"));
```
*/

use crate::error::IamFormatError;
use crate::model::Policy;
use crate::syntax::IamValue;
use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Errors possible while reading or writing a policy document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("error reading file: {0}")]
    ReadingFile(#[source] std::io::Error),

    #[error("error writing file: {0}")]
    WritingFile(#[source] std::io::Error),

    #[error("error serializing policy to JSON: {0}")]
    SerializingPolicy(#[source] serde_json::Error),

    #[error("error deserializing JSON to policy: {0}")]
    DeserializingJson(#[source] serde_json::Error),

    #[error("policy read from file did not have a valid shape: {0}")]
    InvalidPolicy(#[source] IamFormatError),
}

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

/// Read a `Policy` document from the file at `path`.
pub fn read_from_file(path: &PathBuf) -> Result<Policy, Error> {
    match OpenOptions::new().read(true).open(path) {
        Ok(f) => read_from_reader(f),
        Err(e) => Err(Error::ReadingFile(e)),
    }
}

/// Read a `Policy` document from any implementation of `std::io::Read`.
pub fn read_from_reader<R>(reader: R) -> Result<Policy, Error>
where
    R: Read + Sized,
{
    let reader = BufReader::new(reader);
    let value: serde_json::Value =
        serde_json::from_reader(reader).map_err(Error::DeserializingJson)?;
    Policy::from_json(&value).map_err(Error::InvalidPolicy)
}

/// Read a `Policy` document from a string.
pub fn read_from_string(s: &str) -> Result<Policy, Error> {
    read_from_reader(s.as_bytes())
}

/// Write `policy` to a file at `path`; creates the file if it does not exist and overwrites it
/// if it does.
pub fn write_to_file(path: &PathBuf, policy: &Policy) -> Result<(), Error> {
    match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
    {
        Ok(f) => write_to_writer(f, policy),
        Err(e) => Err(Error::WritingFile(e)),
    }
}

/// Write `policy` to any implementation of `std::io::Write`.
pub fn write_to_writer<W>(writer: W, policy: &Policy) -> Result<(), Error>
where
    W: Write + Sized,
{
    let value = policy.to_json().map_err(Error::InvalidPolicy)?;
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &value).map_err(Error::SerializingPolicy)
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_string() {
        const JSON: &str = r#"{
  "Version": "2012-10-17",
  "Statement": {
    "Effect": "Allow",
    "Action": "s3:GetObject",
    "Resource": "arn:aws:s3:::example-bucket/*"
  }
}"#;
        let policy = read_from_string(JSON).unwrap();
        assert_eq!(policy.statements().count(), 1);

        let mut out: Vec<u8> = Vec::new();
        write_to_writer(&mut out, &policy).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("GetObject"));
    }

    #[test]
    fn test_read_from_string_rejects_malformed_json() {
        assert!(read_from_string("not json").is_err());
    }
}

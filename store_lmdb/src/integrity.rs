//! LMDB database integrity checks.
//!
//! Run on demand by `mgrant check`; regular commands do not walk the database.

use std::path::Path;

use heed::types::Bytes;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk every entry of the key-value database and check it decodes as UTF-8.
///
/// Unreadable entries are recorded in the report rather than causing a hard
/// error; the JSON codec above this layer already tolerates bad values.
pub fn check_integrity(environment: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let env = environment.env();
    let mut report = IntegrityReport {
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;
    let db = environment.kv_db().remap_types::<Bytes, Bytes>();

    for entry in db.iter(&rtxn)? {
        let (key, value) = match entry {
            Ok(pair) => pair,
            Err(e) => {
                report.errors.push(format!("failed to read entry: {e}"));
                continue;
            }
        };
        report.total_entries += 1;
        if std::str::from_utf8(key).is_err() {
            report.errors.push(format!("key is not UTF-8: {:02x?}", key));
        } else if std::str::from_utf8(value).is_err() {
            report.errors.push(format!(
                "value for '{}' is not UTF-8",
                String::from_utf8_lossy(key)
            ));
        }
    }

    if !report.is_healthy() {
        tracing::warn!(errors = report.errors.len(), "integrity check found problems");
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

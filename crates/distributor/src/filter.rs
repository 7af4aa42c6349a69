use std::path::Path;

use airdrop_types::{LoadError, RecipientRecord, TokenAccountRecord};
use tracing::debug;

/// Parse a JSON array of token account records
pub fn parse_recipients(json: &str) -> Result<Vec<TokenAccountRecord>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse the recipient snapshot at `path`
pub fn load_recipients(path: &Path) -> Result<Vec<TokenAccountRecord>, LoadError> {
    let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_recipients(&data)
}

/// Keep records with a non-zero owed amount, in input order.
///
/// Every eligible row gets its own transfer, so an owner holding several
/// token accounts in the snapshot is paid once per account.
pub fn eligible_recipients<I, R>(records: I) -> Vec<RecipientRecord>
where
    I: IntoIterator<Item = R>,
    R: Into<RecipientRecord>,
{
    records
        .into_iter()
        .map(Into::into)
        .filter(|record: &RecipientRecord| {
            if !record.is_eligible() {
                debug!(recipient = %record.owner, "Skipping recipient with nothing owed");
            }
            record.is_eligible()
        })
        .collect()
}

use std::io::Write;

use super::domain::JobListing;

const HEADER: [&str; 7] = [
    "title",
    "location",
    "department",
    "description",
    "requirements",
    "posting_date",
    "url",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode listings as csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write listings: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes listings as CSV. The header row is always present; a missing URL is
/// an empty cell.
pub fn write_csv<W: Write>(listings: &[JobListing], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for listing in listings {
        csv_writer.serialize(listing)?;
    }

    csv_writer.flush()?;
    Ok(())
}

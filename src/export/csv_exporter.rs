use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::source::SearchResult;

/// Export results to CSV with the fixed `name,price,rating,link` header
/// and no index column. Returns the written file size in bytes.
pub fn export_csv(results: &[SearchResult], output_path: &str) -> Result<u64> {
    debug!("Exporting {} records to CSV: {}", results.len(), output_path);

    let file = std::fs::File::create(output_path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(["name", "price", "rating", "link"])?;

    for result in results {
        writer.write_record([
            result.name.as_str(),
            &result.price.to_string(),
            &result.rating.to_string(),
            result.link.as_str(),
        ])?;
    }

    writer.flush()?;
    drop(writer);

    let file_size = std::fs::metadata(output_path)?.len();
    Ok(file_size)
}

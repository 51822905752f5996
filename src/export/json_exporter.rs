use anyhow::Result;
use tracing::debug;

use crate::source::SearchResult;

/// Export results as a pretty-printed JSON array. Returns the written
/// file size in bytes.
pub fn export_json(results: &[SearchResult], output_path: &str) -> Result<u64> {
    debug!("Exporting {} records to JSON: {}", results.len(), output_path);

    let content = serde_json::to_string_pretty(results)?;
    std::fs::write(output_path, content)?;

    let file_size = std::fs::metadata(output_path)?.len();
    Ok(file_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_export_roundtrip() {
        let results = vec![SearchResult {
            name: "brake pad for Honda Civic - Sample from ebay".to_string(),
            price: 1750.0,
            rating: 4.05,
            link: "https://www.ebay.com/sch/i.html?_nkw=brake%20pad".to_string(),
        }];

        let temp_file = NamedTempFile::new().unwrap();
        let output_path = temp_file.path().to_str().unwrap();

        export_json(&results, output_path).unwrap();

        let contents = std::fs::read_to_string(output_path).unwrap();
        let parsed: Vec<SearchResult> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, results);
    }

    #[test]
    fn test_empty_export_is_empty_array() {
        let temp_file = NamedTempFile::new().unwrap();
        let output_path = temp_file.path().to_str().unwrap();

        export_json(&[], output_path).unwrap();

        let contents = std::fs::read_to_string(output_path).unwrap();
        assert_eq!(contents.trim(), "[]");
    }
}

/// Prompt templates for query extraction

/// Build the extraction prompt for a free-text part request
pub fn build_extraction_prompt(user_query: &str) -> String {
    format!(
        r#"Extract the automobile part type, vehicle model, and price range from the following query:

Query: "{}"

Respond in JSON format with keys: part_type, vehicle_model, price_range (as a list of two numbers).
Respond with the JSON object only, no surrounding prose."#,
        user_query
    )
}

//! JSON Schema of the run report

use crate::aggregate::RunResult;

/// Generate JSON Schema for [`RunResult`], the `--output json` document.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(RunResult);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_generation_produces_valid_json() {
        let schema = generate_schema();
        let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(
            parsed.get("title").and_then(|v| v.as_str()),
            Some("RunResult")
        );
    }

    #[test]
    fn schema_lists_top_level_fields() {
        let parsed: serde_json::Value = serde_json::from_str(&generate_schema()).unwrap();
        let props = parsed["properties"].as_object().unwrap();
        for field in ["verdicts", "summary", "error"] {
            assert!(props.contains_key(field), "missing {field}");
        }
    }
}

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::Module;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a module catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "modules": [{ "id": ..., "name": ... }, ...] }` or a bare array
/// * `.csv`  – header row with `id` and `name` columns
pub fn load_file(path: &Path) -> Result<Vec<Module>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    parse_catalog(&text, path)
}

/// Parse catalog text, picking the format from `path`'s extension.
pub fn parse_catalog(text: &str, path: &Path) -> Result<Vec<Module>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => parse_json(text),
        "csv" => parse_csv(text),
        other => bail!("Unsupported catalog extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Accepts the page agent's response shape or a plain array of modules.
pub fn parse_json(text: &str) -> Result<Vec<Module>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = match &root {
        JsonValue::Array(items) => items,
        JsonValue::Object(obj) => obj
            .get("modules")
            .and_then(JsonValue::as_array)
            .context("Expected a 'modules' array")?,
        _ => bail!("Expected a JSON object or array"),
    };

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| json_to_module(rec, i))
        .collect()
}

fn json_to_module(rec: &JsonValue, row: usize) -> Result<Module> {
    let obj = rec
        .as_object()
        .with_context(|| format!("Row {row} is not a JSON object"))?;

    // Page ids are usually strings but numeric ids are common in exports.
    let id = match obj.get("id") {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => bail!("Row {row}: missing or invalid 'id'"),
    };
    if id.is_empty() {
        bail!("Row {row}: empty 'id'");
    }

    let name = obj
        .get("name")
        .and_then(JsonValue::as_str)
        .with_context(|| format!("Row {row}: missing or invalid 'name'"))?;

    Ok(Module::new(id, name))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row containing `id` and `name`; other columns ignored.
pub fn parse_csv(text: &str) -> Result<Vec<Module>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let id_idx = headers
        .iter()
        .position(|h| h == "id")
        .context("CSV missing 'id' column")?;
    let name_idx = headers
        .iter()
        .position(|h| h == "name")
        .context("CSV missing 'name' column")?;

    let mut modules = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let id = record.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            bail!("CSV row {row_no}: empty 'id'");
        }
        let name = record.get(name_idx).unwrap_or("");
        modules.push(Module::new(id, name));
    }

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_json_response_shape() {
        let modules = parse_json(
            r#"{ "modules": [
                { "id": "11", "name": "2024 - Y1.S1 - Math" },
                { "id": 12, "name": "Misc" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            modules,
            vec![
                Module::new("11", "2024 - Y1.S1 - Math"),
                Module::new("12", "Misc"),
            ]
        );
    }

    #[test]
    fn test_parse_json_bare_array() {
        let modules = parse_json(r#"[{ "id": "a", "name": "Alpha" }]"#).unwrap();
        assert_eq!(modules, vec![Module::new("a", "Alpha")]);
    }

    #[test]
    fn test_parse_json_rejects_bad_rows() {
        assert!(parse_json(r#"{ "items": [] }"#).is_err());
        assert!(parse_json(r#"[{ "name": "no id" }]"#).is_err());
        assert!(parse_json(r#"[{ "id": "", "name": "empty" }]"#).is_err());
        assert!(parse_json(r#"[{ "id": "x" }]"#).is_err());
        assert!(parse_json("42").is_err());
    }

    #[test]
    fn test_parse_csv() {
        let modules = parse_csv("id,name,extra\n1,2023 - Y2.S1 - Databases,x\n2,\"Club, Chess\",y\n")
            .unwrap();
        assert_eq!(
            modules,
            vec![
                Module::new("1", "2023 - Y2.S1 - Databases"),
                Module::new("2", "Club, Chess"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_requires_columns() {
        let err = parse_csv("identifier,title\n1,Math\n").unwrap_err();
        assert!(format!("{err:#}").contains("'id'"));
    }

    #[test]
    fn test_load_file_dispatches_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name").unwrap();
        writeln!(file, "7,Misc").unwrap();
        let modules = load_file(file.path()).unwrap();
        assert_eq!(modules, vec![Module::new("7", "Misc")]);

        let other = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        assert!(load_file(other.path()).is_err());
    }
}

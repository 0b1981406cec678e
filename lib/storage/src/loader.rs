// Catalog ingestion from CSV and JSON product exports
use recx_core::{Error, ProductRecord, Result};
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Column / key names read from a catalog file
const ID: &str = "id";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const BRAND: &str = "brand";
const CATEGORY: &str = "category";
const IMAGE: &str = "image";
const PRICE: &str = "price";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    /// `.json` is JSON, anything else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Csv,
        }
    }
}

/// Reads a product catalog file into ordered records
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ProductRecord>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| load_error(path, e))?;
        let reader = BufReader::new(file);

        let format = CatalogFormat::from_path(path);
        let records = match format {
            CatalogFormat::Csv => Self::read_csv(reader),
            CatalogFormat::Json => Self::read_json(reader),
        }
        .map_err(|e| load_error(path, e))?;

        info!("Loaded {} products from {:?} ({:?})", records.len(), path, format);
        Ok(records)
    }

    /// CSV with a header row. Columns are matched by name; empty cells are
    /// absent. Rows that cannot be decoded are skipped with a warning.
    pub fn read_csv<R: Read>(reader: R) -> std::result::Result<Vec<ProductRecord>, String> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| format!("Failed to read headers: {e}"))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let columns = [
            column(ID),
            column(NAME),
            column(DESCRIPTION),
            column(BRAND),
            column(CATEGORY),
            column(IMAGE),
            column(PRICE),
        ];
        if columns[0].is_none() {
            warn!("Catalog has no '{}' column; every product gets the placeholder id", ID);
        }

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    // header is line 1
                    warn!("Skipping unreadable catalog row {}: {}", line + 2, e);
                    continue;
                }
            };
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .filter(|v| !v.trim().is_empty())
                    .map(str::to_string)
            };

            records.push(ProductRecord {
                id: cell(columns[0]).map(|id| id.trim().to_string()),
                name: cell(columns[1]),
                description: cell(columns[2]),
                brand: cell(columns[3]),
                category: cell(columns[4]),
                image: cell(columns[5]),
                price: cell(columns[6]).map(|p| parse_scalar(&p)),
            });
        }

        Ok(records)
    }

    /// Either an array of product objects or an object keyed by product id.
    /// Keyed entries keep their file order.
    pub fn read_json<R: Read>(reader: R) -> std::result::Result<Vec<ProductRecord>, String> {
        let root: Value =
            serde_json::from_reader(reader).map_err(|e| format!("Invalid JSON: {e}"))?;

        let entries: Vec<(Option<String>, Value)> = match root {
            Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
            Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
            other => {
                return Err(format!(
                    "Expected an array or object of products, found {}",
                    json_kind(&other)
                ))
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match value {
                Value::Object(obj) => records.push(record_from_object(&obj, key)),
                other => warn!("Skipping non-object catalog entry ({})", json_kind(&other)),
            }
        }
        Ok(records)
    }
}

fn record_from_object(obj: &Map<String, Value>, key: Option<String>) -> ProductRecord {
    let text = |name: &str| obj.get(name).and_then(scalar_to_string);

    ProductRecord {
        id: text(ID).or(key),
        name: text(NAME),
        description: text(DESCRIPTION),
        brand: text(BRAND),
        category: text(CATEGORY),
        image: text(IMAGE),
        price: obj.get(PRICE).filter(|v| !v.is_null()).cloned(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric-looking cells become JSON numbers, everything else stays text
fn parse_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::CatalogLoad(format!("{}: {}", path.display(), err))
}

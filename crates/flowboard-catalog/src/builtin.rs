//! The built-in starter catalog.
//!
//! Shipped so the editor has a working block library before the user
//! supplies a document of their own (the "load default" action in the
//! block-library sidebar).

use serde_json::Value;

pub const BUILTIN_CATALOG_JSON: &str = r#"{
  "version": "1.0.0",
  "nodes": [
    {
      "id": "csv_upload",
      "name": "CSV File Upload",
      "description": "Upload and parse CSV files for data processing",
      "category": "input",
      "nodeType": "fileUploadNode",
      "icon": "IconFileTypeCsv",
      "inputTypes": ["file"],
      "outputTypes": ["dataset"],
      "config": {
        "acceptedFileTypes": [".csv", ".txt"],
        "maxFileSize": "10MB"
      }
    },
    {
      "id": "json_upload",
      "name": "JSON File Upload",
      "description": "Upload and parse JSON files for data processing",
      "category": "input",
      "nodeType": "jsonUploadNode",
      "icon": "IconFileTypeJson",
      "inputTypes": ["file"],
      "outputTypes": ["dataset"],
      "config": {
        "acceptedFileTypes": [".json"],
        "maxFileSize": "10MB"
      }
    },
    {
      "id": "data_filter",
      "name": "Data Filter",
      "description": "Filter dataset rows based on column conditions",
      "category": "transform",
      "nodeType": "filterNode",
      "icon": "IconFilter",
      "inputTypes": ["dataset"],
      "outputTypes": ["dataset"],
      "config": {
        "supportedOperations": ["equals", "not_equals", "contains", "not_contains", "greater_than", "less_than"]
      }
    },
    {
      "id": "data_sort",
      "name": "Data Sort",
      "description": "Sort dataset rows based on column values",
      "category": "transform",
      "nodeType": "sortNode",
      "icon": "IconArrowsSort",
      "inputTypes": ["dataset"],
      "outputTypes": ["dataset"],
      "config": {
        "supportedOrders": ["asc", "desc"]
      }
    },
    {
      "id": "data_aggregate",
      "name": "Data Aggregation",
      "description": "Aggregate data using various statistical functions",
      "category": "transform",
      "nodeType": "aggregateNode",
      "icon": "IconSum",
      "inputTypes": ["dataset"],
      "outputTypes": ["dataset"],
      "config": {
        "supportedFunctions": ["sum", "avg", "count", "min", "max", "median"]
      }
    },
    {
      "id": "api_call",
      "name": "API Call",
      "description": "Make HTTP requests to external APIs",
      "category": "integration",
      "nodeType": "apiCallNode",
      "icon": "IconApi",
      "inputTypes": ["dataset", "json"],
      "outputTypes": ["json", "dataset"],
      "config": {
        "supportedMethods": ["GET", "POST", "PUT", "DELETE"],
        "timeout": 30000
      },
      "retryPolicy": {
        "max_retries": 3,
        "backoff_strategy": "exponential",
        "initial_delay": 1000,
        "max_delay": 30000
      }
    },
    {
      "id": "csv_export",
      "name": "CSV Export",
      "description": "Export processed data as CSV file",
      "category": "output",
      "nodeType": "csvExportNode",
      "icon": "IconDownload",
      "inputTypes": ["dataset"],
      "outputTypes": ["file"],
      "config": {
        "defaultFileName": "export.csv",
        "includeHeaders": true
      }
    }
  ]
}"#;

/// Parse the built-in catalog. The constant is compile-time data, so the
/// parse cannot fail at runtime.
pub fn builtin_document() -> Value {
    serde_json::from_str(BUILTIN_CATALOG_JSON)
        .unwrap_or_else(|err| unreachable!("built-in catalog is valid JSON: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_document_parses() {
        let value = builtin_document();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn builtin_document_passes_validation() {
        let doc = flowboard_config::validate_document(&builtin_document()).unwrap();
        assert_eq!(doc.version, "1.0.0");
        assert!(doc.nodes.iter().any(|n| n.id == "csv_upload"));
    }
}

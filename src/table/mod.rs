//! Tabular records returned by every call function.
//!
//! A [`Table`] has a fixed list of typed columns and zero or more rows. Each cell
//! carries its column's type; a missing upstream value is `None` inside that type,
//! so a column never mixes types.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Name of the column every table carries with the unmodified payload
pub const RAW_RESPONSE: &str = "raw_response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Json,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
        };
        f.write_str(name)
    }
}

/// A single typed value; `None` is the missing sentinel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(Option<String>),
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(Option<bool>),
    Timestamp(Option<DateTime<Utc>>),
    Json(Option<Value>),
}

impl Cell {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Cell::Text(_) => ColumnType::Text,
            Cell::Integer(_) => ColumnType::Integer,
            Cell::Float(_) => ColumnType::Float,
            Cell::Boolean(_) => ColumnType::Boolean,
            Cell::Timestamp(_) => ColumnType::Timestamp,
            Cell::Json(_) => ColumnType::Json,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Text(v) => v.is_none(),
            Cell::Integer(v) => v.is_none(),
            Cell::Float(v) => v.is_none(),
            Cell::Boolean(v) => v.is_none(),
            Cell::Timestamp(v) => v.is_none(),
            Cell::Json(v) => v.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => *v,
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => *v,
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Boolean(v) => *v,
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(v) => *v,
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Cell::Json(v) => v.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return f.write_str("NA");
        }
        match self {
            Cell::Text(Some(v)) => f.write_str(v),
            Cell::Integer(Some(v)) => write!(f, "{}", v),
            Cell::Float(Some(v)) => write!(f, "{}", v),
            Cell::Boolean(Some(v)) => write!(f, "{}", v),
            Cell::Timestamp(Some(v)) => write!(f, "{}", v.to_rfc3339()),
            Cell::Json(Some(v)) => write!(f, "{}", v),
            _ => Ok(()),
        }
    }
}

/// Column name and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Errors from building a table with rows that don't fit its columns
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("row has {got} cells but the table has {expected} columns")]
    Arity { expected: usize, got: usize },

    #[error("column '{column}' is {expected} but the cell is {got}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        got: ColumnType,
    },
}

/// Rows of typed cells under a fixed column list
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given schema
    pub fn new(schema: &[(&str, ColumnType)]) -> Self {
        Self {
            columns: schema
                .iter()
                .map(|(name, column_type)| Column {
                    name: (*name).to_string(),
                    column_type: *column_type,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, checking arity and cell types against the schema
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), TableError> {
        if cells.len() != self.columns.len() {
            return Err(TableError::Arity {
                expected: self.columns.len(),
                got: cells.len(),
            });
        }

        for (column, cell) in self.columns.iter().zip(&cells) {
            if cell.column_type() != column.column_type {
                return Err(TableError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.column_type,
                    got: cell.column_type(),
                });
            }
        }

        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|i| self.columns[i].column_type)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column name)
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// Every cell of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|cells| &cells[index]).collect())
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows
            .iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .zip(cells)
                    .map(|(column, cell)| {
                        // Cell serialization is infallible: every variant maps to JSON
                        let value = serde_json::to_value(cell).unwrap_or(Value::Null);
                        (column.name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Serializes as an array of records
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                cells,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [Column],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(&column.name, cell)?;
        }
        map.end()
    }
}

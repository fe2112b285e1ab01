use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Known columns
// ---------------------------------------------------------------------------

/// Control area, first part of the composite device identifier.
pub const CONTROL_AREA: &str = "C/A";
/// Remote unit, second part of the composite device identifier.
pub const UNIT: &str = "UNIT";
/// Subunit channel position, third part of the composite device identifier.
pub const SCP: &str = "SCP";

pub const STATION: &str = "STATION";
pub const LINENAME: &str = "LINENAME";
pub const DIVISION: &str = "DIVISION";

/// Raw date column. Only exists in the input file; merged into [`TIME`] on load.
pub const DATE: &str = "DATE";
/// After loading, holds the combined date + time as a [`Value::Timestamp`].
pub const TIME: &str = "TIME";
pub const DESC: &str = "DESC";
pub const ENTRIES: &str = "ENTRIES";
pub const EXITS: &str = "EXITS";

/// Columns that together name one physical device.
pub const DEVICE_KEY: [&str; 3] = [CONTROL_AREA, UNIT, SCP];
/// Columns that identify a site (station).
pub const SITE_COLUMNS: [&str; 3] = [STATION, LINENAME, DIVISION];
/// Cumulative counter columns.
pub const COUNTER_COLUMNS: [&str; 2] = [ENTRIES, EXITS];

/// The only status code accepted for a nominal reading.
pub const REGULAR: &str = "REGULAR";

/// `DATE` and `TIME` joined with a single space, 24-hour clock, no timezone.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. Ordered and hashable so it can be a group key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Value {
    Null,
    Integer(i64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "<null>"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

// ---------------------------------------------------------------------------
// DeviceId – the composite device identifier
// ---------------------------------------------------------------------------

/// (`C/A`, `UNIT`, `SCP`) for one turnstile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DeviceId {
    pub control_area: String,
    pub unit: String,
    pub scp: String,
}

impl DeviceId {
    pub fn new(
        control_area: impl Into<String>,
        unit: impl Into<String>,
        scp: impl Into<String>,
    ) -> Self {
        Self {
            control_area: control_area.into(),
            unit: unit.into(),
            scp: scp.into(),
        }
    }

    /// Build from the `C/A`, `UNIT` and `SCP` cells of one row.
    ///
    /// An empty (`Null`) cell becomes an empty string, so a missing part and
    /// an empty-text part name the same device.
    pub fn from_cells(control_area: &Value, unit: &Value, scp: &Value) -> Self {
        Self::new(id_part(control_area), id_part(unit), id_part(scp))
    }
}

fn id_part(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        other => other
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.control_area, self.unit, self.scp)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete in-memory table
// ---------------------------------------------------------------------------

/// Row-oriented table with a fixed, ordered set of uniquely named columns.
///
/// Every transformation borrows its input and returns a new `Dataset`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// An empty dataset with the given columns.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Cell at `row` in column `name`, if both exist.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name).ok()?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// A counter column as integers. Any non-integer cell is an error.
    pub fn counter_column(&self, name: &str) -> Result<Vec<i64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r[idx].as_i64().ok_or_else(|| Error::Counter {
                    row,
                    column: name.to_string(),
                    value: r[idx].to_string(),
                })
            })
            .collect()
    }

    /// Rows for which `keep` returns true, original order preserved.
    pub fn filter_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&[Value]) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Group rows by the key `key_of` computes for each row.
    ///
    /// Groups are returned in ascending key order. Within a group rows keep
    /// their relative order from `self`.
    pub fn group_by<K, F>(&self, mut key_of: F) -> Vec<(K, Dataset)>
    where
        K: Ord,
        F: FnMut(&[Value]) -> K,
    {
        let mut groups: BTreeMap<K, Vec<Vec<Value>>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(key_of(row)).or_default().push(row.clone());
        }

        groups
            .into_iter()
            .map(|(key, rows)| {
                let group = Dataset {
                    columns: self.columns.clone(),
                    rows,
                };
                (key, group)
            })
            .collect()
    }

    /// Project onto `names`, in that order.
    pub fn select_columns(&self, names: &[&str]) -> Result<Dataset> {
        let idx = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| idx.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }
}

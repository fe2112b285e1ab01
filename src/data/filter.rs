use super::model::{Dataset, DIVISION, LINENAME, STATION};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Filter predicate: which site a caller is asking for
// ---------------------------------------------------------------------------

/// Exact-match criteria on the site columns. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationQuery {
    pub station: Option<String>,
    pub linename: Option<String>,
    pub division: Option<String>,
}

impl StationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn linename(mut self, linename: impl Into<String>) -> Self {
        self.linename = Some(linename.into());
        self
    }

    pub fn division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.criteria().is_empty()
    }

    /// (column, wanted value) for every criterion that is set.
    fn criteria(&self) -> Vec<(&'static str, &str)> {
        [
            (STATION, &self.station),
            (LINENAME, &self.linename),
            (DIVISION, &self.division),
        ]
        .into_iter()
        .filter_map(|(col, want)| want.as_deref().map(|w| (col, w)))
        .collect()
    }
}

/// Return the rows matching every criterion in `query`.
///
/// A row passes when, for each set criterion, the column holds exactly that
/// text (no case folding, no partial matches). `Null` never matches. No
/// matching rows is an empty dataset, not an error.
pub fn select_station(dataset: &Dataset, query: &StationQuery) -> Result<Dataset> {
    if query.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one of station, linename or division must be given".to_string(),
        ));
    }

    let resolved = query
        .criteria()
        .into_iter()
        .map(|(col, want)| dataset.column_index(col).map(|idx| (idx, want)))
        .collect::<Result<Vec<_>>>()?;

    let selected = dataset.filter_rows(|row| {
        resolved
            .iter()
            .all(|&(idx, want)| row[idx].as_str() == Some(want))
    });

    log::debug!("selected {} of {} rows for {:?}", selected.len(), dataset.len(), query);
    Ok(selected)
}

use super::model::{Dataset, Value, ENTRIES, EXITS, TIME};
use crate::error::{Error, Result};

/// Sum `ENTRIES` and `EXITS` across datasets that share a timestamp sequence.
///
/// The first dataset is the template. The result keeps only `TIME`,
/// `ENTRIES` and `EXITS`; device and site columns are dropped since they
/// stop meaning anything once summed. Every later dataset is compared by
/// position and must carry exactly the same `TIME` values in the same order,
/// otherwise the merge fails with [`Error::Alignment`] and nothing is
/// returned. Inputs are left untouched.
pub fn merge_datasets(datasets: &[Dataset]) -> Result<Dataset> {
    let (template, rest) = datasets
        .split_first()
        .ok_or_else(|| Error::InvalidArgument("nothing to merge".to_string()))?;

    let merged = template.select_columns(&[TIME, ENTRIES, EXITS])?;
    let times = merged.column(TIME)?;
    let mut entries = merged.counter_column(ENTRIES)?;
    let mut exits = merged.counter_column(EXITS)?;

    for (offset, other) in rest.iter().enumerate() {
        let index = offset + 1;
        check_aligned(&times, &other.column(TIME)?, index)?;
        add_into(&mut entries, &other.counter_column(ENTRIES)?, ENTRIES)?;
        add_into(&mut exits, &other.counter_column(EXITS)?, EXITS)?;
    }

    let mut out = Dataset::new([TIME, ENTRIES, EXITS])?;
    for ((time, entries), exits) in times.into_iter().zip(entries).zip(exits) {
        out.push_row(vec![time.clone(), Value::Integer(entries), Value::Integer(exits)])?;
    }

    log::debug!("merged {} datasets over {} timestamps", datasets.len(), out.len());
    Ok(out)
}

fn check_aligned(template: &[&Value], other: &[&Value], index: usize) -> Result<()> {
    if template.len() != other.len() {
        return Err(Error::Alignment {
            index,
            reason: format!("{} rows, expected {}", other.len(), template.len()),
        });
    }
    match template.iter().zip(other).position(|(a, b)| a != b) {
        Some(row) => {
            let (found, expected) = (other[row], template[row]);
            Err(Error::Alignment {
                index,
                reason: format!("row {row} has TIME {found}, expected {expected}"),
            })
        }
        None => Ok(()),
    }
}

fn add_into(totals: &mut [i64], counts: &[i64], column: &str) -> Result<()> {
    for (row, (total, count)) in totals.iter_mut().zip(counts).enumerate() {
        *total = total.checked_add(*count).ok_or_else(|| {
            Error::InvalidArgument(format!("{column} overflows at row {row}"))
        })?;
    }
    Ok(())
}

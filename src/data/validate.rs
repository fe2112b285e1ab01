use super::model::{Dataset, DESC, ENTRIES, EXITS, REGULAR};
use crate::error::Result;

/// Is this single device's data clean?
///
/// `device` must hold one device's rows in ascending time order. Nominal
/// means every `DESC` is `REGULAR` and neither `ENTRIES` nor `EXITS` ever
/// goes down between consecutive rows. With fewer than two rows only the
/// status check applies.
pub fn is_device_nominal(device: &Dataset) -> Result<bool> {
    let all_regular = device
        .column(DESC)?
        .into_iter()
        .all(|desc| desc.as_str() == Some(REGULAR));
    if !all_regular {
        return Ok(false);
    }

    for column in [ENTRIES, EXITS] {
        if !non_decreasing(&device.counter_column(column)?) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Keep the device groups that pass [`is_device_nominal`].
pub fn nominal_devices(devices: &[Dataset]) -> Result<Vec<Dataset>> {
    let mut kept = Vec::with_capacity(devices.len());
    for device in devices {
        if is_device_nominal(device)? {
            kept.push(device.clone());
        }
    }
    let dropped = devices.len() - kept.len();
    if dropped > 0 {
        log::info!("dropped {dropped} of {} devices as not nominal", devices.len());
    }
    Ok(kept)
}

fn non_decreasing(counts: &[i64]) -> bool {
    counts.windows(2).all(|pair| pair[1] >= pair[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use crate::error::Error;

    fn device(rows: &[(&str, i64, i64)]) -> Dataset {
        let mut ds = Dataset::new([DESC, ENTRIES, EXITS]).unwrap();
        for &(desc, entries, exits) in rows {
            let row = vec![desc.into(), Value::Integer(entries), Value::Integer(exits)];
            ds.push_row(row).unwrap();
        }
        ds
    }

    const CLEAN: [(&str, i64, i64); 3] = [
        ("REGULAR", 5, 10),
        ("REGULAR", 7, 10),
        ("REGULAR", 9, 15),
    ];

    #[test]
    fn test_clean_sequence_is_nominal() {
        assert!(is_device_nominal(&device(&CLEAN)).unwrap());
    }

    #[test]
    fn test_recovery_audit_anywhere_is_not_nominal() {
        for i in 0..CLEAN.len() {
            let mut rows = CLEAN;
            rows[i] = ("RECOVR AUD", 7, 10);
            assert!(!is_device_nominal(&device(&rows)).unwrap(), "row {i}");
        }
    }

    #[test]
    fn test_decreasing_entries_is_not_nominal() {
        let ds = device(&[("REGULAR", 5, 1), ("REGULAR", 3, 1)]);
        assert!(!is_device_nominal(&ds).unwrap());
    }

    #[test]
    fn test_decreasing_exits_is_not_nominal() {
        let ds = device(&[("REGULAR", 5, 9), ("REGULAR", 5, 8)]);
        assert!(!is_device_nominal(&ds).unwrap());
    }

    #[test]
    fn test_short_sequences() {
        assert!(is_device_nominal(&device(&[])).unwrap());
        assert!(is_device_nominal(&device(&[("REGULAR", 100, 0)])).unwrap());
        assert!(!is_device_nominal(&device(&[("RECOVR AUD", 100, 0)])).unwrap());
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let ds = device(&[("regular", 1, 1)]);
        assert!(!is_device_nominal(&ds).unwrap());
    }

    #[test]
    fn test_missing_counter_column() {
        let mut ds = Dataset::new([DESC, ENTRIES]).unwrap();
        ds.push_row(vec!["REGULAR".into(), Value::Integer(1)]).unwrap();
        let err = is_device_nominal(&ds).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == EXITS));
    }

    #[test]
    fn test_nominal_devices_filters_groups() {
        let good = device(&CLEAN);
        let bad = device(&[("REGULAR", 5, 1), ("REGULAR", 3, 1)]);
        let kept = nominal_devices(&[good.clone(), bad, good.clone()]).unwrap();
        assert_eq!(kept, vec![good.clone(), good]);
    }
}

use super::model::{Dataset, DeviceId, DEVICE_KEY};
use crate::error::Result;

/// Split a dataset into one dataset per device, keyed by its [`DeviceId`].
///
/// Groups come back in ascending `DeviceId` order. Rows inside a group keep
/// their order from `dataset`; validation and merging rely on that.
pub fn split_devices_keyed(dataset: &Dataset) -> Result<Vec<(DeviceId, Dataset)>> {
    let [ca, unit, scp] = DEVICE_KEY.map(|name| dataset.column_index(name));
    let (ca, unit, scp) = (ca?, unit?, scp?);

    let groups = dataset.group_by(|row| DeviceId::from_cells(&row[ca], &row[unit], &row[scp]));
    log::debug!("split {} rows into {} devices", dataset.len(), groups.len());
    Ok(groups)
}

/// Same as [`split_devices_keyed`] without the keys.
pub fn split_devices(dataset: &Dataset) -> Result<Vec<Dataset>> {
    Ok(split_devices_keyed(dataset)?
        .into_iter()
        .map(|(_, rows)| rows)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Value, CONTROL_AREA, ENTRIES, SCP, UNIT};
    use crate::error::Error;

    fn readings(rows: &[(&str, &str, &str, i64)]) -> Dataset {
        let mut ds = Dataset::new([CONTROL_AREA, UNIT, SCP, ENTRIES]).unwrap();
        for &(ca, unit, scp, entries) in rows {
            ds.push_row(vec![
                ca.into(),
                unit.into(),
                scp.into(),
                Value::Integer(entries),
            ])
            .unwrap();
        }
        ds
    }

    fn mixed() -> Dataset {
        readings(&[
            ("A002", "R051", "02-00-01", 1),
            ("A002", "R051", "02-00-00", 2),
            ("A002", "R051", "02-00-01", 3),
            ("A006", "R079", "00-00-00", 4),
            ("A002", "R051", "02-00-00", 5),
            ("A002", "R051", "02-00-01", 6),
        ])
    }

    #[test]
    fn test_split_groups_by_composite_key() {
        let groups = split_devices_keyed(&mixed()).unwrap();

        let ids: Vec<String> = groups.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(
            ids,
            vec!["A002/R051/02-00-00", "A002/R051/02-00-01", "A006/R079/00-00-00"]
        );
        assert_eq!(groups[0].1.counter_column(ENTRIES).unwrap(), vec![2, 5]);
        assert_eq!(groups[1].1.counter_column(ENTRIES).unwrap(), vec![1, 3, 6]);
        assert_eq!(groups[2].1.counter_column(ENTRIES).unwrap(), vec![4]);
    }

    #[test]
    fn test_split_is_a_disjoint_cover() {
        let ds = mixed();
        let groups = split_devices_keyed(&ds).unwrap();

        let total: usize = groups.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(total, ds.len());

        let mut seen: Vec<i64> = groups
            .iter()
            .flat_map(|(_, g)| g.counter_column(ENTRIES).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);

        for (id, group) in &groups {
            for i in 0..group.len() {
                let cells = (
                    group.get(i, CONTROL_AREA).unwrap(),
                    group.get(i, UNIT).unwrap(),
                    group.get(i, SCP).unwrap(),
                );
                assert_eq!(&DeviceId::from_cells(cells.0, cells.1, cells.2), id);
            }
        }
    }

    #[test]
    fn test_split_empty_dataset() {
        let ds = readings(&[]);
        assert!(split_devices(&ds).unwrap().is_empty());
    }

    #[test]
    fn test_split_single_device_is_idempotent() {
        let ds = readings(&[
            ("A002", "R051", "02-00-00", 1),
            ("A002", "R051", "02-00-00", 2),
        ]);
        let groups = split_devices(&ds).unwrap();
        assert_eq!(groups, vec![ds.clone()]);

        let again = split_devices(&groups[0]).unwrap();
        assert_eq!(again, vec![ds]);
    }

    #[test]
    fn test_split_reports_the_key_it_groups_by() {
        let mut ds = Dataset::new([CONTROL_AREA, UNIT, SCP, ENTRIES]).unwrap();
        for (ca, entries) in [(Value::Null, 1), ("<null>".into(), 2), ("".into(), 3)] {
            let row = vec![ca, "R1".into(), "S1".into(), Value::Integer(entries)];
            ds.push_row(row).unwrap();
        }

        let groups = split_devices_keyed(&ds).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, DeviceId::new("", "R1", "S1"));
        assert_eq!(groups[0].1.counter_column(ENTRIES).unwrap(), vec![1, 3]);
        assert_eq!(groups[1].0, DeviceId::new("<null>", "R1", "S1"));
        assert_eq!(groups[1].1.counter_column(ENTRIES).unwrap(), vec![2]);
    }

    #[test]
    fn test_split_missing_key_column() {
        let ds = Dataset::new([CONTROL_AREA, UNIT]).unwrap();
        let err = split_devices(&ds).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == SCP));
    }
}

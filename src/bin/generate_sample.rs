use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

use turnstile_data::{
    load_file, merge_datasets, nominal_devices, select_station, split_devices_keyed, LoadOptions,
    StationQuery,
};

/// (C/A, UNIT, SCP, STATION, LINENAME, DIVISION)
const DEVICES: [(&str, &str, &str, &str, &str, &str); 5] = [
    ("A002", "R051", "02-00-00", "59 ST", "NQR456W", "BMT"),
    ("A002", "R051", "02-00-01", "59 ST", "NQR456W", "BMT"),
    ("A002", "R051", "02-03-00", "59 ST", "NQR456W", "BMT"),
    ("N067", "R012", "00-00-00", "34 ST-PENN STA", "ACE", "IND"),
    ("N067", "R012", "00-00-01", "34 ST-PENN STA", "ACE", "IND"),
];

const READINGS_PER_DEVICE: i64 = 42;

/// Padded names mirror the published files, which carry stray whitespace.
const HEADER: [&str; 11] = [
    "C/A", "UNIT", "SCP", " STATION ", "LINENAME", "DIVISION", "DATE", "TIME", "DESC", "ENTRIES",
    "EXITS                                                               ",
];

fn write_sample(path: &Path) -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2020, 9, 26)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building start timestamp")?;

    let mut writer = csv::Writer::from_path(path).context("creating sample file")?;
    writer.write_record(HEADER).context("writing header")?;

    for (device_no, &(ca, unit, scp, station, line, division)) in DEVICES.iter().enumerate() {
        let seed = device_no as i64 + 1;
        let mut entries = 1_000_000 * seed;
        let mut exits = 400_000 * seed;

        for step in 0..READINGS_PER_DEVICE {
            let ts = start + Duration::hours(4 * step);
            // Busier around the 08:00 and 16:00 readings.
            let load = if matches!(step % 6, 2 | 4) { 40 } else { 8 };
            entries += load * seed + (step * 7 + device_no as i64 * 3) % 11;
            exits += load / 2 * seed + (step * 5 + device_no as i64) % 7;

            let mut desc = "REGULAR";
            let mut reported_entries = entries;
            if device_no == 1 && step == 17 {
                desc = "RECOVR AUD";
            }
            if device_no == 4 && step >= 30 {
                // Counter reset after maintenance.
                reported_entries = entries - 1_000_000 * seed;
            }

            writer
                .write_record([
                    ca.to_string(),
                    unit.to_string(),
                    scp.to_string(),
                    station.to_string(),
                    line.to_string(),
                    division.to_string(),
                    ts.format("%m/%d/%Y").to_string(),
                    ts.format("%H:%M:%S").to_string(),
                    desc.to_string(),
                    reported_entries.to_string(),
                    exits.to_string(),
                ])
                .with_context(|| format!("writing row {step} for {ca}/{unit}/{scp}"))?;
        }
    }

    writer.flush().context("flushing sample file")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = Path::new("sample_turnstile.csv");
    write_sample(output_path)?;
    log::info!(
        "wrote {} readings for {} devices to {}",
        READINGS_PER_DEVICE * DEVICES.len() as i64,
        DEVICES.len(),
        output_path.display()
    );

    let data = load_file(output_path, &LoadOptions::default().verbose(true))
        .context("loading sample back")?;

    for station in ["59 ST", "34 ST-PENN STA"] {
        let rows = select_station(&data, &StationQuery::new().station(station))?;
        let keyed = split_devices_keyed(&rows)?;
        for (id, device) in &keyed {
            log::info!("{station}: device {id} has {} readings", device.len());
        }

        let devices: Vec<_> = keyed.into_iter().map(|(_, device)| device).collect();
        let clean = nominal_devices(&devices)?;
        if clean.is_empty() {
            log::info!("{station}: no nominal devices");
            continue;
        }

        let totals = merge_datasets(&clean)?;
        println!(
            "{station}: {} of {} devices nominal, {} merged readings",
            clean.len(),
            devices.len(),
            totals.len()
        );
    }

    Ok(())
}

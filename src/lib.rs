//! Load, select, partition, validate and aggregate turnstile counter data.
//!
//! ```no_run
//! use std::path::Path;
//! use turnstile_data::{
//!     is_device_nominal, load_file, merge_datasets, select_station, split_devices,
//!     LoadOptions, StationQuery,
//! };
//!
//! # fn main() -> turnstile_data::Result<()> {
//! let data = load_file(Path::new("turnstile_200926.txt"), &LoadOptions::default())?;
//! let station = select_station(&data, &StationQuery::new().station("59 ST"))?;
//! let devices = split_devices(&station)?;
//! let mut clean = Vec::new();
//! for device in devices {
//!     if is_device_nominal(&device)? {
//!         clean.push(device);
//!     }
//! }
//! let totals = merge_datasets(&clean)?;
//! println!("{} readings", totals.len());
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;

pub use data::filter::{select_station, StationQuery};
pub use data::loader::{load_file, load_reader, load_str, LoadOptions};
pub use data::merge::merge_datasets;
pub use data::model::{Dataset, DeviceId, Value};
pub use data::partition::{split_devices, split_devices_keyed};
pub use data::validate::{is_device_nominal, nominal_devices};
pub use error::{Error, ErrorKind, Result};

//! Response normalization helpers shared by every call function.
//!
//! Nothing here fails on a missing field: lookups fall back to the zero value of
//! the requested type, and decoding steps degrade to `None` instead of erroring.

pub mod bytes;
pub mod fields;
pub mod units;

pub use bytes::{decode_result_bytes, DecodedBytes};
pub use fields::{get, lookup, FromField};
pub use units::{nanos_to_datetime, uptime_percent, yocto_to_near};

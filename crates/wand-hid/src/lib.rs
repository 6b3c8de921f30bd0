//! Wand HID - Hardware transport boundary
//!
//! This crate isolates everything that touches raw HID devices:
//! - The [`Transport`] trait the fleet manager is written against
//! - Device descriptors produced by one enumeration pass
//! - The tri-state non-blocking read result
//! - The hidapi-backed implementation and its input-report decoding

pub mod hid;
pub mod report;
pub mod transport;

pub use hid::{HidTransport, WAND_PRODUCT_ID, WAND_VENDOR_ID};
pub use transport::{DeviceDescriptor, HidError, ReadResult, Transport};

//! Scheduling engine
//!
//! - [`status`] - display status derived from wall-clock time
//! - [`SlotPlanner`] - free slots for a staff member's local day
//! - [`BookingService`] - commits with per `(staff, day)` mutual exclusion

pub mod booking;
pub mod lock;
pub mod slots;
pub mod status;

pub use booking::BookingService;
pub use lock::BookingLocks;
pub use slots::{SlotPlanner, SlotRequest};
pub use status::{derive_status, with_status};

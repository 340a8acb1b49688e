pub mod catalog;
pub mod clock;
pub mod commands;
pub mod completion;
pub mod config;
pub mod dashboard;
pub mod driver;
pub mod error;
pub mod fixtures;
pub mod history;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod output;
pub mod progress;
pub mod signal;
pub mod ticker;

#[cfg(test)]
mod test_utils;

pub use catalog::{Catalog, Filters, ViewMode};
pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::Driver;
pub use error::{QaRunError, Result};
pub use fixtures::{DataProvider, JsonFixtures, SeedData};
pub use history::History;
pub use lifecycle::{Action, Dashboard, Effect, Modal, Phase};
pub use ticker::Timing;

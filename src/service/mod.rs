use std::sync::Arc;

use chrono::NaiveDate;

use crate::store::Store;

pub mod assignment;
pub mod clock;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod leave;
pub mod ledger;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use error::{HrError, HrResult};

#[derive(Clone)]
pub struct HrService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl HrService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

pub mod application;
pub mod code;
pub mod logical;
pub mod output;
pub mod parallel;
pub mod record;
pub mod settings;

use anyhow::Result;

use crate::record::DataRecord;
use crate::settings::Settings;

pub fn run_application(settings: &Settings) -> Result<DataRecord> {
    if settings.parallel() {
        parallel::run_parallel(settings)
    } else {
        application::run(settings)
    }
}

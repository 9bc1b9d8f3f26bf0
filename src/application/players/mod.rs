mod join_group;
mod report_defeat;

pub use join_group::{JoinGroup, JoinGroupError, JoinGroupInput, JoinGroupOutput};
pub use report_defeat::{ReportDefeat, ReportDefeatError, ReportDefeatInput, ReportDefeatOutput};

//! Scope resolution: which manager, if any, knows a unit.

use crate::runner::{CommandRunner, capture_text};
use crate::systemctl;
use crate::unit::Scope;

/// Probe the system manager's unit-file index, then the user manager's.
///
/// The match test is "the unit name appears in the filtered listing", so a
/// unit that is listed but currently failed still resolves to its scope;
/// run state is a separate column. The user probe is only issued when the
/// system probe misses, and the two probes of one resolution never mix.
pub async fn resolve_scope(runner: &dyn CommandRunner, unit: &str) -> Scope {
    let listing = capture_text(runner, &systemctl::list_unit_files(Scope::System, unit)).await;
    if listing.contains(unit) {
        return Scope::System;
    }

    let listing = capture_text(runner, &systemctl::list_unit_files(Scope::User, unit)).await;
    if listing.contains(unit) {
        return Scope::User;
    }

    Scope::None
}

//! Unit model for unitdash
//!
//! A unit is identified by its systemd name (`<name>.service`), an opaque,
//! case-sensitive string. Everything the dashboard knows about one unit is
//! collected into a [`ServiceSummary`].

use std::fmt;

use serde::{Serialize, Serializer};

/// Which service manager, if any, has a unit in its unit-file index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Registered with the system manager.
    System,
    /// Registered only with the invoking user's manager.
    User,
    /// Neither manager knows the name.
    #[default]
    None,
}

impl Scope {
    /// Flag spliced into every `systemctl` invocation for this scope. All
    /// queries of one summary pass use the scope resolved in that pass.
    pub fn user_flag(&self) -> &'static str {
        match self {
            Scope::User => "--user",
            _ => "",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Scope::None)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scope::System => "system",
            Scope::User => "user",
            Scope::None => "none",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Best-guess TCP listening port for a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Port {
    /// No heuristic produced a match; renders as `-`.
    #[default]
    Unknown,
    /// A run of 1-5 decimal digits, taken verbatim from whatever pattern
    /// matched.
    Listen(String),
}

impl Port {
    /// Accepts a run of 1-5 decimal digits verbatim. Longer runs and
    /// non-digit input are rejected; the 65535 ceiling is deliberately not
    /// enforced, so out-of-range digit runs pass through unchanged.
    pub fn from_digits(digits: &str) -> Option<Port> {
        if digits.is_empty() || digits.len() > 5 {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Port::Listen(digits.to_string()))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Port::Listen(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Port::Listen(digits) => digits,
            Port::Unknown => "-",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Run/enablement state shown for a unit neither manager knows about.
pub const NOT_FOUND_STATE: &str = "not-found";

/// Description shown for a unit neither manager knows about.
pub const NOT_FOUND_DESCRIPTION: &str = "(service not found in system or user scope)";

/// Description shown when a unit declares none.
pub const NO_DESCRIPTION: &str = "(no description)";

/// Composite record for one unit: everything a dashboard row shows.
///
/// `active` and `enabled` are pass-through strings in systemd's own
/// vocabulary (`active`, `inactive`, `failed`, `activating`, `enabled`,
/// `static`, `indirect`, ...). They are not modeled as a closed set; the
/// display layer picks a style per value and falls back for anything it
/// does not recognize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub scope: Scope,
    pub active: String,
    pub enabled: String,
    pub description: String,
    pub port: Port,
}

impl ServiceSummary {
    /// Record synthesized for a unit in neither manager's index. No
    /// follow-up queries are issued for such a unit.
    pub fn not_found() -> Self {
        Self {
            scope: Scope::None,
            active: NOT_FOUND_STATE.into(),
            enabled: NOT_FOUND_STATE.into(),
            description: NOT_FOUND_DESCRIPTION.into(),
            port: Port::Unknown,
        }
    }
}

/// Mutating `systemctl` verbs the dashboard can dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl UnitAction {
    pub fn verb(&self) -> &'static str {
        match self {
            UnitAction::Start => "start",
            UnitAction::Stop => "stop",
            UnitAction::Restart => "restart",
            UnitAction::Enable => "enable",
            UnitAction::Disable => "disable",
        }
    }
}

impl fmt::Display for UnitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_accepts_short_digit_runs_verbatim() {
        assert_eq!(Port::from_digits("8080"), Some(Port::Listen("8080".into())));
        assert_eq!(Port::from_digits("1"), Some(Port::Listen("1".into())));
        // Five digits pass even above the real port ceiling.
        assert_eq!(
            Port::from_digits("99999"),
            Some(Port::Listen("99999".into()))
        );
    }

    #[test]
    fn port_rejects_long_runs_and_non_digits() {
        assert_eq!(Port::from_digits(""), None);
        assert_eq!(Port::from_digits("123456"), None);
        assert_eq!(Port::from_digits("80a0"), None);
    }

    #[test]
    fn port_displays_sentinel_when_unknown() {
        assert_eq!(Port::Unknown.to_string(), "-");
        assert_eq!(Port::Listen("8000".into()).to_string(), "8000");
    }

    #[test]
    fn not_found_summary_carries_sentinels() {
        let summary = ServiceSummary::not_found();
        assert_eq!(summary.scope, Scope::None);
        assert_eq!(summary.active, NOT_FOUND_STATE);
        assert_eq!(summary.enabled, NOT_FOUND_STATE);
        assert_eq!(summary.port, Port::Unknown);
    }

    #[test]
    fn summary_serializes_with_port_as_text() {
        let summary = ServiceSummary {
            scope: Scope::User,
            active: "active".into(),
            enabled: "enabled".into(),
            description: "Web app".into(),
            port: Port::Listen("8000".into()),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["scope"], "user");
        assert_eq!(value["port"], "8000");
    }
}

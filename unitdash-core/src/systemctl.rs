//! Command lines for the systemd tooling the engine shells out to.
//!
//! Unit names are always double-quoted. Query commands silence stderr: a
//! missing unit or an unreachable user manager writes noise there that
//! would otherwise end up in captured output.

use crate::unit::{Scope, UnitAction};

fn systemctl(scope: Scope) -> String {
    match scope.user_flag() {
        "" => "systemctl".to_string(),
        flag => format!("systemctl {flag}"),
    }
}

/// Unit-file listing filtered by name; empty output means no match.
pub fn list_unit_files(scope: Scope, unit: &str) -> String {
    format!(
        "{} list-unit-files \"{}\" --no-legend --no-pager 2>/dev/null",
        systemctl(scope),
        unit
    )
}

/// `systemctl show -p <property> --value` for one unit.
pub fn show_value(scope: Scope, unit: &str, property: &str) -> String {
    format!(
        "{} show -p {} --value \"{}\" 2>/dev/null",
        systemctl(scope),
        property,
        unit
    )
}

pub fn is_active(scope: Scope, unit: &str) -> String {
    format!("{} is-active \"{}\" 2>/dev/null", systemctl(scope), unit)
}

pub fn is_enabled(scope: Scope, unit: &str) -> String {
    format!("{} is-enabled \"{}\" 2>/dev/null", systemctl(scope), unit)
}

/// A mutating verb. System-scope commands are prefixed with `sudo` when the
/// caller asks for it (running unprivileged); user-scope commands never are.
pub fn action(scope: Scope, action: UnitAction, unit: &str, sudo: bool) -> String {
    let command = format!("{} {} \"{}\"", systemctl(scope), action.verb(), unit);
    if sudo && scope == Scope::System {
        format!("sudo {command}")
    } else {
        command
    }
}

pub fn journal_tail(scope: Scope, unit: &str, lines: usize) -> String {
    match scope.user_flag() {
        "" => format!("journalctl -u \"{unit}\" -n {lines} --no-pager 2>/dev/null"),
        flag => format!("journalctl {flag} -u \"{unit}\" -n {lines} --no-pager 2>/dev/null"),
    }
}

pub fn list_dependencies(scope: Scope, unit: &str) -> String {
    format!(
        "{} list-dependencies \"{}\" --no-pager 2>/dev/null",
        systemctl(scope),
        unit
    )
}

/// Kernel listener table, preferred tool. Rows are filtered in code, not in
/// the shell, so the scan logic stays testable.
pub fn netstat_listeners() -> String {
    "netstat -tulnp 2>/dev/null".to_string()
}

/// Kernel listener table, fallback tool.
pub fn ss_listeners() -> String {
    "ss -tulnp 2>/dev/null".to_string()
}

/// Startup preflight probe; exit 0 means the tool resolves on PATH.
pub fn which(tool: &str) -> String {
    format!("which {tool} >/dev/null 2>&1")
}

/// Fire-and-forget browser launch for a unit's inferred port.
pub fn open_browser(port: &str) -> String {
    format!("xdg-open \"http://localhost:{port}\" >/dev/null 2>&1 &")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_scope_commands_carry_no_flag() {
        assert_eq!(
            list_unit_files(Scope::System, "web.service"),
            "systemctl list-unit-files \"web.service\" --no-legend --no-pager 2>/dev/null"
        );
        assert_eq!(
            is_active(Scope::System, "web.service"),
            "systemctl is-active \"web.service\" 2>/dev/null"
        );
    }

    #[test]
    fn user_scope_commands_carry_the_user_flag() {
        assert_eq!(
            show_value(Scope::User, "web.service", "ExecStart"),
            "systemctl --user show -p ExecStart --value \"web.service\" 2>/dev/null"
        );
        assert_eq!(
            journal_tail(Scope::User, "web.service", 20),
            "journalctl --user -u \"web.service\" -n 20 --no-pager 2>/dev/null"
        );
    }

    #[test]
    fn sudo_applies_only_to_system_scope() {
        assert_eq!(
            action(Scope::System, UnitAction::Restart, "web.service", true),
            "sudo systemctl restart \"web.service\""
        );
        assert_eq!(
            action(Scope::System, UnitAction::Restart, "web.service", false),
            "systemctl restart \"web.service\""
        );
        assert_eq!(
            action(Scope::User, UnitAction::Stop, "web.service", true),
            "systemctl --user stop \"web.service\""
        );
    }
}

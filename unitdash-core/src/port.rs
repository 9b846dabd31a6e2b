//! Port inference: static unit configuration first, live sockets last.
//!
//! Stages run in a fixed order and a later match overwrites an earlier
//! one: a port the process is observed listening on beats whatever the
//! unit file declares. No stage ever raises an error; a stage with nothing to
//! say leaves the current candidate alone.

use crate::runner::{CommandRunner, capture_text};
use crate::systemctl;
use crate::unit::{Port, Scope};

/// Infer the TCP port a unit listens on.
///
/// `Scope::None` short-circuits to [`Port::Unknown`]: a unit registered
/// nowhere has no process to introspect.
pub async fn infer_port(runner: &dyn CommandRunner, unit: &str, scope: Scope) -> Port {
    if scope.is_none() {
        return Port::Unknown;
    }

    let mut port = Port::Unknown;

    let exec = capture_text(runner, &systemctl::show_value(scope, unit, "ExecStart")).await;
    if let Some(found) = scan_exec_line(&exec) {
        port = found;
    }

    let env = capture_text(runner, &systemctl::show_value(scope, unit, "Environment")).await;
    if let Some(found) = scan_environment(&env) {
        port = found;
    }

    if let Some(found) = scan_sockets(runner, unit, scope).await {
        port = found;
    }

    port
}

/// Digit run at the start of `s`, subject to the 1-5 digit bound.
fn leading_digits(s: &str) -> Option<Port> {
    let end = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    Port::from_digits(&s[..end])
}

/// Static scan of a start command line, quotes stripped first.
///
/// Patterns are checked in a fixed order and the last one to match wins:
/// `--port=N`, `--port N`, bare `-p N`, then the digits after the last `:`
/// (bind addresses like `0.0.0.0:8000`).
fn scan_exec_line(exec: &str) -> Option<Port> {
    let exec: String = exec.chars().filter(|&c| c != '"').collect();
    let mut port = None;

    if let Some(i) = exec.find("--port=") {
        if let Some(found) = leading_digits(&exec[i + 7..]) {
            port = Some(found);
        }
    } else if let Some(i) = exec.find("--port ") {
        let rest = exec[i + 7..].trim_start_matches(' ');
        if let Some(found) = leading_digits(rest) {
            port = Some(found);
        }
    }

    if let Some(i) = exec.find("-p ") {
        let rest = exec[i + 2..].trim_start_matches(' ');
        if let Some(found) = leading_digits(rest) {
            port = Some(found);
        }
    }

    if let Some(i) = exec.rfind(':') {
        let rest = &exec[i + 1..];
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            if let Some(found) = leading_digits(rest) {
                port = Some(found);
            }
        }
    }

    port
}

/// `PORT=N` assignment in the unit's configured environment string.
fn scan_environment(env: &str) -> Option<Port> {
    let i = env.find("PORT=")?;
    leading_digits(&env[i + 5..])
}

/// The digits after the last `:` that is followed by a digit, across all
/// matching listener rows. An over-long run at that position yields
/// nothing; earlier colons are not reconsidered.
fn scan_socket_rows(rows: &str) -> Option<Port> {
    let mut start = None;
    for (i, _) in rows.match_indices(':') {
        if rows[i + 1..].starts_with(|c: char| c.is_ascii_digit()) {
            start = Some(i + 1);
        }
    }
    leading_digits(&rows[start?..])
}

fn matching_rows(table: &str, needle: &str) -> String {
    table
        .lines()
        .filter(|row| row.contains(needle))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runtime stage: resolve the unit's main process, then look it up in the
/// kernel listener table: `netstat` first, `ss` when netstat yields no
/// matching row. A PID of 0, a missing PID, or an unparsable one skips the
/// stage entirely.
async fn scan_sockets(runner: &dyn CommandRunner, unit: &str, scope: Scope) -> Option<Port> {
    let pid_text = capture_text(runner, &systemctl::show_value(scope, unit, "MainPID")).await;
    let pid: i64 = pid_text.trim().parse().ok()?;
    if pid <= 0 {
        return None;
    }

    let table = capture_text(runner, &systemctl::netstat_listeners()).await;
    let mut rows = matching_rows(&table, &format!(" {pid}/"));
    if rows.is_empty() {
        let table = capture_text(runner, &systemctl::ss_listeners()).await;
        rows = matching_rows(&table, &format!("pid={pid},"));
    }

    scan_socket_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::stub::ScriptedRunner;

    #[test]
    fn exec_scan_finds_long_flag_with_equals() {
        assert_eq!(
            scan_exec_line("/usr/bin/gunicorn --port=8080 app:wsgi"),
            // The trailing `app:wsgi` colon is not followed by a digit, so
            // the flag match survives.
            Some(Port::Listen("8080".into()))
        );
    }

    #[test]
    fn exec_scan_finds_long_flag_with_space() {
        assert_eq!(
            scan_exec_line("/usr/bin/serve --port   9000"),
            Some(Port::Listen("9000".into()))
        );
    }

    #[test]
    fn exec_scan_finds_short_flag() {
        assert_eq!(
            scan_exec_line("/usr/bin/http-server -p 3000"),
            Some(Port::Listen("3000".into()))
        );
    }

    #[test]
    fn exec_scan_finds_bind_address() {
        assert_eq!(
            scan_exec_line("/usr/bin/uvicorn --host 0.0.0.0:8000"),
            Some(Port::Listen("8000".into()))
        );
    }

    #[test]
    fn later_exec_patterns_override_earlier_ones() {
        // Both a flag and a bind address: the colon rule runs last and wins.
        assert_eq!(
            scan_exec_line("/usr/bin/app --port=8080 --bind 127.0.0.1:9090"),
            Some(Port::Listen("9090".into()))
        );
    }

    #[test]
    fn exec_scan_strips_quotes_before_matching() {
        assert_eq!(
            scan_exec_line("/bin/sh -c \"serve --port=\"\"8080\"\""),
            Some(Port::Listen("8080".into()))
        );
    }

    #[test]
    fn over_long_digit_run_does_not_overwrite() {
        // :123456 fails the five-digit bound; the flag candidate is kept.
        assert_eq!(
            scan_exec_line("/usr/bin/app --port=8080 --bind 10.0.0.1:123456"),
            Some(Port::Listen("8080".into()))
        );
    }

    #[test]
    fn exec_scan_yields_nothing_without_a_pattern() {
        assert_eq!(scan_exec_line("/usr/bin/worker --threads 4"), None);
        assert_eq!(scan_exec_line(""), None);
    }

    #[test]
    fn environment_scan_reads_port_assignment() {
        assert_eq!(
            scan_environment("PATH=/usr/bin PORT=9090 RUST_LOG=info"),
            Some(Port::Listen("9090".into()))
        );
        assert_eq!(scan_environment("RUST_LOG=info"), None);
    }

    #[test]
    fn socket_rows_yield_the_last_port_bearing_colon() {
        let rows = "tcp   0   0 0.0.0.0:8080   0.0.0.0:*   LISTEN   1234/gunicorn";
        assert_eq!(scan_socket_rows(rows), Some(Port::Listen("8080".into())));

        let ss_row = "tcp LISTEN 0 128 0.0.0.0:9090 0.0.0.0:* users:((\"gunicorn\",pid=1234,fd=5))";
        assert_eq!(scan_socket_rows(ss_row), Some(Port::Listen("9090".into())));

        assert_eq!(scan_socket_rows(""), None);
    }

    fn exec_response(unit_exec: &str) -> ScriptedRunner {
        ScriptedRunner::new().on("show -p ExecStart", unit_exec)
    }

    #[tokio::test]
    async fn static_candidate_is_returned_without_a_runtime_match() {
        let runner = exec_response("/usr/bin/app --port=8080").on("show -p MainPID", "0");
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("8080".into()));
    }

    #[tokio::test]
    async fn runtime_socket_overrides_the_static_candidate() {
        let runner = exec_response("/usr/bin/app --port=8080")
            .on("show -p MainPID", "1234")
            .on(
                "netstat -tulnp",
                "tcp  0  0 0.0.0.0:9090  0.0.0.0:*  LISTEN  1234/app",
            );
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("9090".into()));
    }

    #[tokio::test]
    async fn ss_is_consulted_when_netstat_has_no_matching_row() {
        let runner = exec_response("/usr/bin/app")
            .on("show -p MainPID", "1234")
            .on("netstat -tulnp", "tcp 0 0 0.0.0.0:80 0.0.0.0:* LISTEN 999/nginx")
            .on(
                "ss -tulnp",
                "tcp LISTEN 0 128 [::]:7070 [::]:* users:((\"app\",pid=1234,fd=3))",
            );
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("7070".into()));
    }

    #[tokio::test]
    async fn environment_beats_exec_but_loses_to_sockets() {
        let runner = exec_response("/usr/bin/app --port=8080")
            .on("show -p Environment", "PORT=8500")
            .on("show -p MainPID", "77")
            .on(
                "netstat -tulnp",
                "tcp  0  0 127.0.0.1:9999  0.0.0.0:*  LISTEN  77/app",
            );
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("9999".into()));

        let runner = exec_response("/usr/bin/app --port=8080")
            .on("show -p Environment", "PORT=8500")
            .on("show -p MainPID", "");
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("8500".into()));
    }

    #[tokio::test]
    async fn missing_main_pid_skips_the_socket_stage() {
        let runner = exec_response("/usr/bin/app --port=8080");
        // MainPID is unscripted and captures as empty text.
        let port = infer_port(&runner, "app.service", Scope::System).await;
        assert_eq!(port, Port::Listen("8080".into()));
        assert_eq!(runner.calls_matching("netstat"), 0);
        assert_eq!(runner.calls_matching("ss -tulnp"), 0);
    }

    #[tokio::test]
    async fn unresolved_scope_is_never_introspected() {
        let runner = ScriptedRunner::new();
        let port = infer_port(&runner, "ghost.service", Scope::None).await;
        assert_eq!(port, Port::Unknown);
        assert_eq!(runner.call_count(), 0);
    }
}

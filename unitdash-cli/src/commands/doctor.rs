use std::path::Path;
use std::process::Command;

use unitdash_core::config::DashConfig;
use unitdash_core::systemctl;

#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl Check {
    fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            hint: None,
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn run_doctor() {
    println!("Unitdash Doctor\n");
    println!("Checking environment...\n");

    let mut checks: Vec<Check> = Vec::new();

    println!("Tools:");
    checks.push(check_tool(
        "systemctl",
        "required; unitdash cannot run without it",
    ));
    checks.push(check_tool("journalctl", "detail view shows no logs without it"));
    checks.push(check_tool("netstat", "port inference falls back to ss"));
    checks.push(check_tool("ss", "runtime port detection degrades without it"));
    checks.push(check_tool("xdg-open", "open-in-browser is unavailable"));

    for check in &checks {
        print_check(check);
    }
    println!();

    println!("Unit directories:");
    let home = std::env::var("HOME").unwrap_or_default();
    let dir_checks = [
        check_dir(Path::new("/etc/systemd/system")),
        check_dir(&Path::new(&home).join(".config/systemd/user")),
    ];
    for check in &dir_checks {
        print_check(check);
    }
    println!();

    match DashConfig::default_path() {
        Ok(path) => {
            if path.exists() {
                match DashConfig::load(&path) {
                    Ok(config) => println!(
                        "Configuration: {} ({} favorite(s))",
                        path.display(),
                        config.favorites.len()
                    ),
                    Err(e) => println!("Configuration: {} (unreadable: {})", path.display(), e),
                }
            } else {
                println!("Configuration: not found");
                println!("  A default file is written at {} on first start", path.display());
            }
        }
        Err(e) => println!("Configuration: {}", e),
    }
    println!();

    let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();
    if failed.is_empty() {
        println!("All checks passed!");
    } else {
        println!("Issues found:");
        for check in &failed {
            println!("  - {}: {}", check.name, check.message);
            if let Some(hint) = &check.hint {
                println!("    Hint: {}", hint);
            }
        }
    }
}

fn print_check(check: &Check) {
    let icon = if check.passed { "✓" } else { "✗" };
    let color = if check.passed { "\x1b[32m" } else { "\x1b[31m" };
    let reset = "\x1b[0m";
    println!("  {color}{icon}{reset} {} - {}", check.name, check.message);
}

fn check_tool(tool: &str, missing_note: &str) -> Check {
    let found = Command::new("sh")
        .arg("-c")
        .arg(systemctl::which(tool))
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    if found {
        Check::ok(tool, "found on PATH")
    } else {
        Check::fail(tool, format!("not found; {missing_note}"))
            .with_hint(format!("install {tool} with your distribution's package manager"))
    }
}

fn check_dir(dir: &Path) -> Check {
    let name = dir.display().to_string();
    if dir.is_dir() {
        Check::ok(name, "present")
    } else {
        // Not an error: a missing directory simply contributes no units.
        Check::ok(name, "missing (contributes no units)")
    }
}

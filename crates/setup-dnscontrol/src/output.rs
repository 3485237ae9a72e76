//! Pipeline-facing output: plain text on stdout and GitHub Actions
//! workflow commands.

use setup_dnscontrol_install::{Stage, StageObserver};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Escapes a workflow command message (`%`, CR and LF).
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn command(name: &str, message: &str) {
    // Workflow commands are best effort: a closed stdout must not mask the real result.
    let _ = print_text(&format!("::{name}::{}", escape_data(message)));
}

pub fn error_annotation(message: &str) {
    command("error", message);
}

pub fn warning_annotation(message: &str) {
    command("warning", message);
}

/// Appends `name=value` to the step output file.
pub fn set_output(file: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(handle, "{name}={value}")
}

/// Wraps the install and verification stages in collapsible log groups.
pub struct GroupObserver {
    enabled: bool,
}

impl GroupObserver {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn title(stage: Stage) -> Option<&'static str> {
        match stage {
            Stage::Resolve => None,
            Stage::Install => Some("💾 Install DNSControl"),
            Stage::Verify => Some("🧪 Installation check"),
        }
    }
}

impl StageObserver for GroupObserver {
    fn stage_started(&mut self, stage: Stage) {
        if let (true, Some(title)) = (self.enabled, Self::title(stage)) {
            command("group", title);
        }
    }

    fn stage_finished(&mut self, stage: Stage) {
        if self.enabled && Self::title(stage).is_some() {
            let _ = print_text("::endgroup::");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
    }

    #[test]
    fn test_set_output_appends() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("output");
        std::fs::write(&file, "other=1\n").unwrap();

        set_output(&file, "dnscontrol-bin", "/tmp/dnscontrol").unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "other=1\ndnscontrol-bin=/tmp/dnscontrol\n"
        );
    }

    #[test]
    fn test_only_install_and_verify_are_grouped() {
        assert_eq!(GroupObserver::title(Stage::Resolve), None);
        assert!(GroupObserver::title(Stage::Install).is_some());
        assert!(GroupObserver::title(Stage::Verify).is_some());
    }
}

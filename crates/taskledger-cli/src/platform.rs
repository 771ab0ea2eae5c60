//! Clipboard and browser shims backed by the platform's own tools.

use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

const LINUX_HTML_TOOLS: &[&[&str]] = &[
    &["wl-copy", "--type", "text/html"],
    &["xclip", "-selection", "clipboard", "-t", "text/html"],
    &["xsel", "--clipboard", "--input", "--type", "text/html"],
];

const LINUX_TEXT_TOOLS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

fn pipe_to(program: &str, args: &[&str], input: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .with_context(|| format!("failed to write to {program}"))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

fn first_working_tool(tools: &[&[&str]], input: &str) -> bool {
    tools.iter().any(|tool| {
        let Some((program, args)) = tool.split_first() else {
            return false;
        };
        match pipe_to(program, args, input) {
            Ok(()) => true,
            Err(err) => {
                debug!(tool = program, error = %err, "clipboard tool unavailable");
                false
            }
        }
    })
}

fn copy_linux(html: &str) -> Result<()> {
    if first_working_tool(LINUX_HTML_TOOLS, html) || first_working_tool(LINUX_TEXT_TOOLS, html) {
        return Ok(());
    }
    bail!("no suitable clipboard tool found (tried: wl-copy, xclip, xsel)")
}

/// AppleScript that puts `html` on the clipboard as rich text.
fn macos_script(html: &str) -> String {
    let escaped = html.replace('\\', "\\\\").replace('"', "\\\"");
    format!("set the clipboard to \"{escaped}\" as «class HTML»")
}

fn copy_macos(html: &str) -> Result<()> {
    let status = Command::new("osascript")
        .args(["-e", &macos_script(html)])
        .status()
        .context("failed to run osascript")?;
    if !status.success() {
        bail!("osascript exited with {status}");
    }
    Ok(())
}

fn windows_script(html: &str) -> String {
    format!(
        "Add-Type -AssemblyName System.Windows.Forms; [System.Windows.Forms.Clipboard]::SetText(@\"\n{html}\n\"@, [System.Windows.Forms.TextDataFormat]::Html)"
    )
}

fn copy_windows(html: &str) -> Result<()> {
    let status = Command::new("powershell")
        .args(["-Command", &windows_script(html)])
        .status()
        .context("failed to run powershell")?;
    if !status.success() {
        bail!("powershell exited with {status}");
    }
    Ok(())
}

/// Copy an HTML document to the system clipboard.
pub fn copy_html(html: &str) -> Result<()> {
    match std::env::consts::OS {
        "linux" => copy_linux(html),
        "macos" => copy_macos(html),
        "windows" => copy_windows(html),
        other => bail!("unsupported platform: {other}"),
    }
}

const NO_ARGS: &[&str] = &[];
const CMD_START: &[&str] = &["/c", "start", ""];

fn opener_for(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "linux" | "freebsd" | "openbsd" | "netbsd" => Some(("xdg-open", NO_ARGS)),
        "macos" => Some(("open", NO_ARGS)),
        "windows" => Some(("cmd", CMD_START)),
        _ => None,
    }
}

/// Open a file in the default browser.
pub fn open_in_browser(path: &Path) -> Result<()> {
    let os = std::env::consts::OS;
    let Some((program, args)) = opener_for(os) else {
        bail!("unsupported platform: {os}");
    };
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("failed to run {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_script_escapes_quotes() {
        let script = macos_script(r#"<a href="x">y\z</a>"#);
        assert_eq!(
            script,
            r#"set the clipboard to "<a href=\"x\">y\\z</a>" as «class HTML»"#
        );
    }

    #[test]
    fn windows_script_embeds_document() {
        let script = windows_script("<p>hi</p>");
        assert!(script.contains("@\"\n<p>hi</p>\n\"@"));
        assert!(script.contains("TextDataFormat]::Html"));
    }

    #[test]
    fn openers_cover_major_platforms() {
        assert_eq!(opener_for("linux").map(|(p, _)| p), Some("xdg-open"));
        assert_eq!(opener_for("macos").map(|(p, _)| p), Some("open"));
        assert_eq!(opener_for("windows").map(|(p, _)| p), Some("cmd"));
        assert!(opener_for("plan9").is_none());
    }

    #[test]
    fn missing_tools_report_failure() {
        assert!(!first_working_tool(
            &[&["taskledger-no-such-clipboard-tool"]],
            "x"
        ));
        assert!(pipe_to("taskledger-no-such-clipboard-tool", &[], "x").is_err());
    }
}

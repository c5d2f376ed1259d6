use base64::Engine;
use std::io::Write;

/// Hidden argument that turns a `jfmt` process into the clipboard owner.
pub const SERVE_ARG: &str = "__clipboard-serve";
/// Line the owner prints once it holds a clipboard handle.
const READY: &str = "ready";

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("copy failed, please copy the text manually")]
    CopyFailed,
}

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError>;
}

/// System clipboard using arboard.
///
/// X11 and Wayland selections live only as long as the process that owns
/// them, so on Linux the text is handed to a detached `jfmt` child that keeps
/// serving it until another program replaces the clipboard.
#[derive(Default)]
pub struct SystemClipboard;

#[cfg(not(target_os = "linux"))]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
        let mut clipboard = arboard::Clipboard::new().map_err(unavailable)?;
        clipboard.set_text(text.to_string()).map_err(unavailable)
    }
}

#[cfg(target_os = "linux")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
        use std::io::{BufRead, BufReader};
        use std::process::{Command, Stdio};

        let exe = std::env::current_exe().map_err(unavailable)?;
        let mut child = Command::new(exe)
            .arg(SERVE_ARG)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(unavailable)?;

        let (Some(mut stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(CopyError::ClipboardUnavailable(
                "clipboard owner has no pipes".into(),
            ));
        };
        stdin.write_all(text.as_bytes()).map_err(unavailable)?;
        drop(stdin);

        let mut status = String::new();
        BufReader::new(stdout)
            .read_line(&mut status)
            .map_err(unavailable)?;
        let status = status.trim_end();
        if status == READY {
            tracing::debug!(pid = child.id(), "clipboard owner running");
            return Ok(());
        }
        let _ = child.wait();
        Err(CopyError::ClipboardUnavailable(if status.is_empty() {
            "clipboard owner exited".to_string()
        } else {
            status.to_string()
        }))
    }
}

/// Body of the hidden serve command: take the clipboard, report on `status`,
/// and on Linux keep serving `text` until the selection is replaced.
pub fn serve(text: &str, status: &mut impl Write) -> Result<(), CopyError> {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            let _ = writeln!(status, "{e}");
            return Err(unavailable(e));
        }
    };
    writeln!(status, "{READY}")
        .and_then(|()| status.flush())
        .map_err(unavailable)?;
    hold(&mut clipboard, text)
}

#[cfg(target_os = "linux")]
fn hold(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), CopyError> {
    use arboard::SetExtLinux;
    clipboard.set().wait().text(text).map_err(unavailable)
}

#[cfg(not(target_os = "linux"))]
fn hold(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), CopyError> {
    clipboard.set_text(text.to_string()).map_err(unavailable)
}

fn unavailable(e: impl std::fmt::Display) -> CopyError {
    CopyError::ClipboardUnavailable(e.to_string())
}

/// OSC 52 escape sequence; the terminal emulator places the payload on the
/// clipboard.
pub struct Osc52<W: Write> {
    out: W,
}

impl<W: Write> Osc52<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{payload}\x07")
}

impl<W: Write> Clipboard for Osc52<W> {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(unavailable)
    }
}

/// Which path ended up holding the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    System,
    Terminal,
}

/// Copy through `primary`; on failure try `fallback` if there is one.
pub fn copy_text(
    text: &str,
    primary: &mut dyn Clipboard,
    fallback: Option<&mut dyn Clipboard>,
) -> Result<CopyMethod, CopyError> {
    let err = match primary.set_text(text) {
        Ok(()) => return Ok(CopyMethod::System),
        Err(e) => e,
    };
    tracing::warn!(error = %err, "system clipboard failed, trying fallback");
    let Some(fallback) = fallback else {
        return Err(CopyError::CopyFailed);
    };
    match fallback.set_text(text) {
        Ok(()) => Ok(CopyMethod::Terminal),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard fallback failed");
            Err(CopyError::CopyFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording(Vec<String>);

    impl Clipboard for Recording {
        fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl Clipboard for Broken {
        fn set_text(&mut self, _text: &str) -> Result<(), CopyError> {
            Err(CopyError::ClipboardUnavailable("no display".into()))
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn primary_success_skips_fallback() {
        let mut primary = Recording(Vec::new());
        let mut fallback = Recording(Vec::new());
        let method = copy_text("{}", &mut primary, Some(&mut fallback)).unwrap();
        assert_eq!(method, CopyMethod::System);
        assert_eq!(primary.0, vec!["{}"]);
        assert!(fallback.0.is_empty());
    }

    #[test]
    fn unavailable_clipboard_falls_back_to_osc52() {
        let mut out = Vec::new();
        {
            let mut osc = Osc52::new(&mut out);
            let method = copy_text("hi", &mut Broken, Some(&mut osc)).unwrap();
            assert_eq!(method, CopyMethod::Terminal);
        }
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn both_paths_failing_is_copy_failed() {
        let mut osc = Osc52::new(FailingWriter);
        let err = copy_text("x", &mut Broken, Some(&mut osc)).unwrap_err();
        assert!(matches!(err, CopyError::CopyFailed));
    }

    #[test]
    fn serve_without_display_reports_why() {
        if std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
        {
            return;
        }
        let mut status = Vec::new();
        let err = serve("{}", &mut status).unwrap_err();
        assert!(matches!(err, CopyError::ClipboardUnavailable(_)));
        let line = String::from_utf8(status).unwrap();
        assert!(line.ends_with('\n'));
        assert_ne!(line.trim_end(), READY);
    }

    #[test]
    fn no_fallback_is_copy_failed() {
        let err = copy_text("x", &mut Broken, None).unwrap_err();
        assert!(matches!(err, CopyError::CopyFailed));
    }
}

//! Fenced code block detection for line-based preprocessing.
//!
//! Content tags written inside a code sample must reach the page verbatim, so
//! the tag processor asks this tracker before touching a line.

/// An open fence: marker character and run length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenFence {
    marker: char,
    len: usize,
}

/// Follows backtick and tilde fences across lines.
///
/// A closing fence uses the same marker and is at least as long as the
/// opening one.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<OpenFence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the last line fed to [`observe`](Self::observe) left us inside a fence.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` when the line opened or closed a fence.
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let Some((marker, len)) = marker_run(trimmed) else {
            return false;
        };

        match self.open {
            Some(open) => {
                let closes = marker == open.marker
                    && len >= open.len
                    && trimmed[len..].chars().all(char::is_whitespace);
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                self.open = Some(OpenFence { marker, len });
                true
            }
        }
    }
}

/// Leading run of three or more backticks or tildes.
fn marker_run(trimmed: &str) -> Option<(char, usize)> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    (len >= 3).then_some((marker, len))
}

//! Printing the real flip sequence.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use bcf_config::DisplaySettings;

use crate::estimator::Flip;

/// Layout of the printed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayout {
    /// Characters per line.
    pub wrap: usize,
    /// Pause after each printed flip.
    pub delay: Duration,
    /// Flips printed before the rest is elided.
    pub max_shown: usize,
}

impl Default for SequenceLayout {
    fn default() -> Self {
        Self::from(&DisplaySettings::default())
    }
}

impl From<&DisplaySettings> for SequenceLayout {
    fn from(display: &DisplaySettings) -> Self {
        SequenceLayout {
            wrap: display.wrap,
            delay: Duration::from_millis(display.delay_ms),
            max_shown: display.max_shown,
        }
    }
}

/// Write the H/T sequence wrapped at `layout.wrap`, followed by a blank line.
///
/// With a delay each flip is flushed as it is printed, so the sequence
/// appears one flip at a time.
pub fn write_sequence<W: Write>(out: &mut W, flips: &[Flip], layout: &SequenceLayout) -> io::Result<()> {
    writeln!(out, "Flips (real sequence):")?;

    let wrap = layout.wrap.max(1);
    let shown = flips.len().min(layout.max_shown);
    let mut line_len = 0;
    for flip in &flips[..shown] {
        write!(out, "{}", flip.as_char())?;
        line_len += 1;
        if line_len >= wrap {
            writeln!(out)?;
            line_len = 0;
        }
        if !layout.delay.is_zero() {
            out.flush()?;
            thread::sleep(layout.delay);
        }
    }
    if line_len != 0 {
        writeln!(out)?;
    }

    let hidden = flips.len() - shown;
    if hidden > 0 {
        writeln!(out, "... ({hidden} more flips not shown)")?;
    }
    writeln!(out)?;
    Ok(())
}

/// The first `max_shown` flips as an H/T string, and whether any were cut.
pub fn truncated_sequence(flips: &[Flip], max_shown: usize) -> (String, bool) {
    let shown = flips.len().min(max_shown);
    let text = flips[..shown].iter().map(|f| f.as_char()).collect();
    (text, shown < flips.len())
}

use std::io::{self, Write};

use crate::error::Failure;

/// Writes one line per event: `TCP <addr> fail: <reason>` or `TCP <addr> OK`.
pub struct Reporter<W: Write> {
    out: W,
    show_all: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, show_all: bool) -> Self {
        Self { out, show_all }
    }

    pub fn fail(&mut self, target: &str, reason: &Failure) -> io::Result<()> {
        writeln!(self.out, "TCP {} fail: {}", target, reason)?;
        self.out.flush()
    }

    /// Successes are only printed in show-all mode.
    pub fn ok(&mut self, target: &str) -> io::Result<()> {
        if !self.show_all {
            return Ok(());
        }
        writeln!(self.out, "TCP {} OK", target)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

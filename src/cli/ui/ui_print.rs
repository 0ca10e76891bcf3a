// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// main UI handler for CLI output
/// respects quiet mode and keeps stdout clean when metadata goes there
pub struct UiOutput {
    quiet: bool,
    is_stdout: bool,
    multi_progress: Option<MultiProgress>,
}

impl UiOutput {
    pub fn new(quiet: bool, is_stdout: bool) -> Self {
        let multi_progress = if quiet {
            None
        } else {
            Some(MultiProgress::new())
        };

        Self {
            quiet,
            is_stdout,
            multi_progress,
        }
    }

    fn emit(&self, msg: &str) {
        if self.is_stdout {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }

    /// print a status line (respects quiet mode)
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match &self.multi_progress {
            Some(mp) => mp.suspend(|| self.emit(msg.as_ref())),
            None => self.emit(msg.as_ref()),
        }
    }

    /// print output the user explicitly asked for (ignores quiet mode)
    pub fn output(&self, msg: impl AsRef<str>) {
        match &self.multi_progress {
            Some(mp) => mp.suspend(|| self.emit(msg.as_ref())),
            None => self.emit(msg.as_ref()),
        }
    }

    /// print errors (ignores quiet mode)
    pub fn error(&self, msg: impl AsRef<str>) {
        match &self.multi_progress {
            Some(mp) => mp.suspend(|| eprintln!("{}", msg.as_ref())),
            None => eprintln!("{}", msg.as_ref()),
        }
    }

    pub fn update_spinner(&self, pb: &Option<ProgressBar>, message: impl Into<String>) {
        if let Some(spinner) = pb {
            spinner.set_message(message.into());
        }
    }

    /// finish spinner with message
    pub fn finish_spinner(&self, pb: Option<ProgressBar>, message: impl Into<String>) {
        if let Some(spinner) = pb {
            spinner.finish_with_message(message.into());
        }
    }

    /// create a spinner progress bar
    pub fn create_spinner(&self, message: impl Into<String>) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }

        self.multi_progress.as_ref().map(|mp| {
            let pb = mp.add(ProgressBar::new_spinner());
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.blue} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message(message.into());
            pb
        })
    }

    /// clear all progress bars
    pub fn clear(&self) -> anyhow::Result<()> {
        if let Some(mp) = &self.multi_progress {
            mp.clear()?;
        }
        Ok(())
    }
}

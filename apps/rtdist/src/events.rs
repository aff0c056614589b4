//! Event handling and terminal feedback

use console::style;
use rtdist_events::{AcquisitionEvent, AppEvent, DownloadEvent, EventMessage};

use crate::logging::log_event_with_tracing;

/// Renders user-relevant events to stderr and logs every event
pub struct EventHandler {
    colors_enabled: bool,
    quiet: bool,
}

impl EventHandler {
    /// `quiet` suppresses terminal output (JSON mode)
    pub fn new(colors_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        let message = EventMessage::from_event(event);
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }
        if let Some(line) = self.render(&message.event) {
            eprintln!("{line}");
        }
    }

    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Config(config) => Some(self.warning(&config.message())),
            AppEvent::Download(DownloadEvent::Started { url, .. }) => {
                Some(format!("  • downloading {url}"))
            }
            AppEvent::Acquisition(AcquisitionEvent::CopyStarted {
                source,
                destination,
            }) => Some(format!(
                "  • Copying distribution from \"{}\" to \"{}\"",
                source.display(),
                destination.display()
            )),
            AppEvent::Acquisition(AcquisitionEvent::ExtractionStarted { archive, .. }) => {
                Some(format!("  • extracting {}", archive.display()))
            }
            _ => None,
        }
    }

    fn warning(&self, message: &str) -> String {
        if self.colors_enabled {
            format!("  {} {message}", style("⚠").yellow())
        } else {
            format!("  warning: {message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtdist_events::ConfigEvent;
    use std::path::PathBuf;

    #[test]
    fn renders_copy_progress_line() {
        let handler = EventHandler::new(false, false);
        let line = handler.render(&AppEvent::Acquisition(AcquisitionEvent::CopyStarted {
            source: PathBuf::from("/dist"),
            destination: PathBuf::from("/out"),
        }));
        assert_eq!(
            line.as_deref(),
            Some("  • Copying distribution from \"/dist\" to \"/out\"")
        );
    }

    #[test]
    fn renders_config_warnings_without_colors() {
        let handler = EventHandler::new(false, false);
        let line = handler.render(&AppEvent::Config(ConfigEvent::OptionOverridden {
            option: "download".to_string(),
            key: "arch".to_string(),
            value: "x64".to_string(),
        }));
        assert_eq!(
            line.as_deref(),
            Some("  warning: download.arch will be inferred from the main options")
        );
    }
}

//! Output formatting

use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;
use crate::handlers::{DevicesReport, EvalReport, TransitionReport};
use console::{style, Term};
use jugar_probar_media::ViewportDescription;
use serde::Serialize;

/// Writes command reports to stdout as text or JSON
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    format: OutputFormat,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Create a reporter for `config`
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        Self {
            term: Term::stdout(),
            format: config.format,
            use_color: config.use_color(),
            quiet: config.verbosity.is_quiet(),
        }
    }

    /// Print an eval report
    pub fn eval(&self, report: &EvalReport) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        if !self.quiet {
            self.line(&format!("viewport: {}", describe_viewport(&report.viewport)))?;
        }
        for result in &report.results {
            let mut line = format!("{} => {}", result.query, self.verdict(result.matches));
            if !result.valid {
                line.push_str(" (invalid query)");
            }
            self.line(&line)?;
        }
        if !self.quiet {
            self.line(&format!(
                "{} of {} queries match",
                report.matched(),
                report.results.len()
            ))?;
        }
        Ok(())
    }

    /// Print a transition report
    pub fn transition(&self, report: &TransitionReport) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        if !self.quiet {
            self.line(&format!("from: {}", describe_viewport(&report.from)))?;
            self.line(&format!("to:   {}", describe_viewport(&report.to)))?;
        }
        for query in &report.queries {
            let marker = if query.flipped() { "  [changed]" } else { "" };
            self.line(&format!(
                "{}: {} -> {}{marker}",
                query.query,
                self.verdict(query.before),
                self.verdict(query.after)
            ))?;
        }
        for notification in &report.notifications {
            self.line(&format!(
                "notified: {} matches={}",
                notification.query, notification.matches
            ))?;
        }
        if !self.quiet {
            self.line(&format!("{} notification(s) delivered", report.delivered()))?;
        }
        Ok(())
    }

    /// Print a device listing
    pub fn devices(&self, report: &DevicesReport) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        let width = report
            .devices
            .iter()
            .map(|d| d.name.len())
            .max()
            .unwrap_or(0);
        for device in &report.devices {
            let name = format!("{:<width$}", device.name);
            let name = if self.use_color {
                style(name).bold().to_string()
            } else {
                name
            };
            let kind = if device.is_mobile { "mobile" } else { "desktop" };
            self.line(&format!(
                "{name}  {}x{} @{}x  {kind}",
                device.width, device.height, device.device_scale_factor
            ))?;
        }
        Ok(())
    }

    fn verdict(&self, matches: bool) -> String {
        match (matches, self.use_color) {
            (true, true) => style("true").green().bold().to_string(),
            (false, true) => style("false").red().to_string(),
            (matches, false) => matches.to_string(),
        }
    }

    fn json(&self, report: &impl Serialize) -> CliResult<()> {
        self.line(&serde_json::to_string_pretty(report)?)
    }

    fn line(&self, text: &str) -> CliResult<()> {
        self.term.write_line(text)?;
        Ok(())
    }
}

/// One-line `name=value` summary of a viewport
#[must_use]
pub fn describe_viewport(viewport: &ViewportDescription) -> String {
    if viewport.is_empty() {
        return "(empty)".to_string();
    }
    viewport
        .media_type()
        .map(|media_type| format!("type={media_type}"))
        .into_iter()
        .chain(
            viewport
                .features()
                .map(|(feature, value)| format!("{}={value}", feature.name())),
        )
        .collect::<Vec<_>>()
        .join(" ")
}

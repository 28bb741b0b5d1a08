//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging context for dashboard refresh events."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Structured logging helpers shared by the dashboard runtime. Every event
//! carries the same set of fields (period, date, generation, source) so
//! refresh activity can be filtered consistently in the JSON log files.

use tracing::Level;

pub mod macros;

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Selected reporting period (`daily`, `weekly`, ...).
    pub period: Option<&'a str>,
    /// Selected reference date, empty for live selections.
    pub date: Option<&'a str>,
    /// Snapshot generation the event relates to.
    pub generation: Option<u64>,
    /// Data source name.
    pub source: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a reporting period.
    pub fn with_period(mut self, period: &'a str) -> Self {
        self.period = Some(period);
        self
    }

    /// Attach a reference date.
    pub fn with_date(mut self, date: &'a str) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach a snapshot generation.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attach a data source name.
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }
}

/// High-level outcome used when emitting lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed; the previous state was kept.
    Degraded,
    /// The operation failed or was aborted.
    Fault,
}

impl SystemEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            SystemEventOutcome::Success => "success",
            SystemEventOutcome::Degraded => "degraded",
            SystemEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized system event with an outcome.
pub fn log_system_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: SystemEventOutcome,
) {
    let default_ctx = LogContext::default();
    let ctx = context.unwrap_or(&default_ctx);
    // `tracing::event!` needs a constant level, hence one arm per level.
    macro_rules! emit {
        ($level:expr) => {
            tracing::event!(
                $level,
                event,
                outcome = outcome.as_str(),
                period = ctx.period.unwrap_or(""),
                date = ctx.date.unwrap_or(""),
                generation = ctx.generation.unwrap_or_default(),
                source = ctx.source.unwrap_or(""),
                message = %message
            )
        };
    }
    match outcome {
        SystemEventOutcome::Success => emit!(Level::INFO),
        SystemEventOutcome::Degraded => emit!(Level::WARN),
        SystemEventOutcome::Fault => emit!(Level::ERROR),
    }
}

//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Context-aware logging macros for dashboard events."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---

#[doc(hidden)]
#[macro_export]
macro_rules! __edash_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx: &$crate::LogContext = &$ctx;
        tracing::event!(
            $level,
            period = ctx.period.unwrap_or(""),
            date = ctx.date.unwrap_or(""),
            generation = ctx.generation.unwrap_or_default(),
            source = ctx.source.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with dashboard context.
#[macro_export]
macro_rules! edash_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with dashboard context.
#[macro_export]
macro_rules! edash_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with dashboard context.
#[macro_export]
macro_rules! edash_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with dashboard context.
#[macro_export]
macro_rules! edash_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__edash_event!(tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}

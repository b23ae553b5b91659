use anyhow::Result;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to a daily rolling file instead of the terminal, which belongs to the
/// response output. The returned guard must stay alive for the whole run.
pub fn init_logging() -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(".", "apitest.log");

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::ENTER | fmt::format::FmtSpan::EXIT)
                .with_writer(non_blocking)
                .with_filter(filter),
        )
        .init();

    Ok(guard)
}

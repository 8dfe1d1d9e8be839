use std::io::{self, Stdout};

use tracing_subscriber::{fmt, registry::LookupSpan, Layer};

use super::config::{LogFormat, LoggingConfig};

/// Консольный слой по конфигурации.
///
/// Возвращается boxed trait-объект, чтобы стереть конкретный тип формата
/// (json/pretty/compact).
pub fn console_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let writer: fn() -> Stdout = io::stdout;
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids)
        .with_thread_names(config.with_thread_ids);

    match config.format {
        LogFormat::Json => Box::new(layer.with_ansi(false).json().with_current_span(true)),
        LogFormat::Pretty => Box::new(layer.with_ansi(config.with_ansi).pretty()),
        LogFormat::Compact => Box::new(layer.with_ansi(config.with_ansi).compact()),
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;

    /// Тест проверяет, что слой каждого формата регистрируется и не паникует
    /// при логировании.
    #[test]
    fn test_console_layer_for_every_format() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            let config = LoggingConfig {
                format,
                with_ansi: false,
                ..Default::default()
            };
            let subscriber = Registry::default().with(console_layer::<Registry>(&config));

            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(%format, "formatter smoke test");
            });
        }
    }
}

use std::{fs, path::Path};

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, registry::LookupSpan, Layer};

use crate::error::LoggingError;

/// Слой записи в ежедневно ротируемый файл через неблокирующий writer.
///
/// Возвращённый `WorkerGuard` нужно держать до завершения работы, иначе
/// хвост буфера будет потерян.
pub fn file_layer<S>(
    dir: &Path,
    file_name: &str,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(dir)?;

    let appender = rolling::daily(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_thread_ids(true)
        .with_writer(writer);

    Ok((Box::new(layer), guard))
}

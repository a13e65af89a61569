use std::fmt::{self as stdfmt, Debug};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::settings::{Environment, Settings};

/// Local log file, appended to on every run.
pub const LOG_FILE: &str = "log.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PROJECT_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];
const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

static INIT: OnceLock<()> = OnceLock::new();

/// Keeps the background file writer alive. Dropping it flushes `log.log`.
#[must_use = "dropping the guard stops the log file writer"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the process-wide subscriber: `log.log` plus a stdout mirror, with the
/// plain stdout mirror swapped for the cloud sink when running off-premises.
pub fn init(settings: &Settings) -> Result<LogGuard> {
    if INIT.get().is_some() {
        return Ok(LogGuard { _file: None });
    }

    let file = open_log_file(Path::new(LOG_FILE))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);
    let (cloud, cloud_error) = resolve_cloud(settings, CloudLogging::discover);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = build_subscriber(
        filter,
        file_writer,
        io::stdout,
        cloud.as_ref(),
        settings.environment(),
    );
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Another subscriber is already installed (e.g., tests).
    }
    let _ = INIT.set(());

    announce(cloud.as_ref(), cloud_error);

    Ok(LogGuard {
        _file: Some(guard),
    })
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Off-premises, try the cloud sink; a failure is kept for reporting once logging is up.
fn resolve_cloud(
    settings: &Settings,
    discover: impl FnOnce() -> Result<CloudLogging>,
) -> (Option<CloudLogging>, Option<anyhow::Error>) {
    if !settings.wants_cloud_logging() {
        return (None, None);
    }
    match discover() {
        Ok(cloud) => (Some(cloud), None),
        Err(err) => (None, Some(err)),
    }
}

/// File sink always; stdout gets either plain lines or cloud entries.
fn build_subscriber<F, C>(
    filter: EnvFilter,
    file: F,
    console: C,
    cloud: Option<&CloudLogging>,
    environment: Environment,
) -> impl Subscriber + Send + Sync + 'static + use<F, C>
where
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    C: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = fmt::layer()
        .event_format(PlainLine)
        .with_ansi(false)
        .with_writer(file);
    let (console_layer, cloud_layer) = match cloud {
        Some(cloud) => (
            None,
            Some(
                fmt::layer()
                    .event_format(cloud.entry_format(environment))
                    .with_ansi(false)
                    .with_writer(console),
            ),
        ),
        None => (
            Some(
                fmt::layer()
                    .event_format(PlainLine)
                    .with_ansi(false)
                    .with_writer(console),
            ),
            None,
        ),
    };

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .with(cloud_layer)
}

fn announce(cloud: Option<&CloudLogging>, cloud_error: Option<anyhow::Error>) {
    if let Some(cloud) = cloud {
        info!("cloud logging enabled for project {}", cloud.project_id());
    }
    if let Some(err) = cloud_error {
        warn!("cloud logging unavailable, using local logging only: {err:#}");
    }
}

/// Render the `YYYY-MM-DD HH:MM:SS` stamp that prefixes every local log line.
pub fn timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `YYYY-MM-DD HH:MM:SS - <message>` lines for the file and console sinks.
#[derive(Clone, Copy, Debug, Default)]
struct PlainLine;

impl<S, N> FormatEvent<S, N> for PlainLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        write!(writer, "{} - ", timestamp(Local::now().naive_local()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Google Cloud Logging sink. Entries are written as structured JSON lines on stdout,
/// which the logging agent of the hosting platform ingests.
#[derive(Clone, Debug)]
pub struct CloudLogging {
    project_id: String,
}

impl CloudLogging {
    /// Locate the project from the environment, failing when nothing is configured.
    pub fn discover() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        for var in PROJECT_VARS {
            if let Some(project_id) = lookup(var).filter(|value| !value.trim().is_empty()) {
                return Ok(Self { project_id });
            }
        }

        let Some(path) = lookup(CREDENTIALS_VAR).filter(|value| !value.trim().is_empty()) else {
            bail!(
                "no project configured; set {} or {CREDENTIALS_VAR}",
                PROJECT_VARS.join(" / ")
            );
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading credentials file {path}"))?;
        let credentials: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing credentials file {path}"))?;
        let project_id = credentials
            .get("project_id")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("credentials file {path} has no project_id"))?;

        Ok(Self {
            project_id: project_id.to_owned(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn entry_format(&self, environment: Environment) -> CloudEntry {
        CloudEntry { environment }
    }
}

/// One JSON object per event in the Cloud Logging structured format.
#[derive(Clone, Copy, Debug)]
struct CloudEntry {
    environment: Environment,
}

impl<S, N> FormatEvent<S, N> for CloudEntry
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let entry = render_entry(
            *event.metadata().level(),
            fields,
            self.environment,
            &time,
        );
        let line = serde_json::to_string(&entry).map_err(|_| stdfmt::Error)?;
        writeln!(writer, "{line}")
    }
}

fn severity(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        _ => "DEBUG",
    }
}

fn render_entry(
    level: Level,
    fields: FieldCollector,
    environment: Environment,
    time: &str,
) -> Value {
    let mut entry = Map::new();
    entry.insert("severity".to_owned(), json!(severity(level)));
    entry.insert("message".to_owned(), json!(fields.message));
    entry.insert("time".to_owned(), json!(time));
    entry.insert(
        "logging.googleapis.com/labels".to_owned(),
        json!({ "environment": environment.as_str() }),
    );
    for (key, value) in fields.extra {
        entry.entry(key).or_insert(value);
    }
    Value::Object(entry)
}

#[derive(Debug, Default)]
struct FieldCollector {
    message: String,
    extra: Map<String, Value>,
}

impl FieldCollector {
    fn put(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
        } else {
            self.extra.insert(field.name().to_owned(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, json!(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.put(field, json!(format!("{value:?}")));
    }
}

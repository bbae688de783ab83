//! Colorful console output for model events.
//!
//! Provides a `tracing` layer that prints the structured events emitted by
//! the model store (insertions, deletions, renames, objective changes) with
//! colors.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output for model events.
///
/// Safe to call multiple times - only the first call has effect. Honors
/// `RUST_LOG`; without it model events at debug level are shown.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "infopt_core=debug".parse() {
            filter = filter.add_directive(directive);
        }

        // Another global subscriber may already be installed.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ModelConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!(
        "infopt v{} - infinite-dimensional model store",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats model events with colors.
pub struct ModelConsoleLayer;

impl<S: Subscriber> Layer<S> for ModelConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("infopt_core") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_model_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    kind: Option<String>,
    object: Option<String>,
    name: Option<String>,
    parameter: Option<String>,
    label: Option<String>,
    sense: Option<String>,
    count: Option<u64>,
    points: Option<u64>,
    terms: Option<u64>,
    remaining: Option<u64>,
    dropped: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, field: &str, value: String) {
        match field {
            "event" => self.event = Some(value),
            "kind" => self.kind = Some(value),
            "object" | "variable" | "constraint" => self.object = Some(value),
            "name" => self.name = Some(value),
            "parameter" => self.parameter = Some(value),
            "label" => self.label = Some(value),
            "sense" => self.sense = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "count" => self.count = Some(value),
            "points" => self.points = Some(value),
            "terms" => self.terms = Some(value),
            "remaining" => self.remaining = Some(value),
            "dropped" => self.dropped = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }
}

fn format_model_event(level: Level, v: &EventVisitor) -> String {
    let Some(event) = v.event.as_deref() else {
        return String::new();
    };

    let body = match event {
        "insert" => format_insert(v),
        "delete" => format!(
            "{} {}",
            "deleted".bright_red(),
            v.object.as_deref().unwrap_or("?").white()
        ),
        "cascade" => format!(
            "{} {} with {} dependent object(s)",
            "cascading delete of".bright_red().bold(),
            v.object.as_deref().unwrap_or("?").white(),
            v.count.unwrap_or(0).saturating_sub(1).to_string().yellow()
        ),
        "rename" => format!(
            "{} {} to '{}'",
            "renamed".bright_blue(),
            v.object.as_deref().unwrap_or("?").white(),
            v.name.as_deref().unwrap_or("").bright_yellow()
        ),
        "objective_set" => format!(
            "{} {} over {} object(s)",
            "objective".bright_magenta().bold(),
            v.sense.as_deref().unwrap_or("?").white(),
            v.terms.unwrap_or(0).to_string().yellow()
        ),
        "objective_term_drop" => format!(
            "{} terms of {}, {} object(s) remain",
            "dropped objective".bright_magenta(),
            v.object.as_deref().unwrap_or("?").white(),
            v.remaining.unwrap_or(0).to_string().yellow()
        ),
        "supports_release" => format!(
            "{} label {} from {}, {} support(s) dropped",
            "released".bright_blue(),
            v.label.as_deref().unwrap_or("?").bright_yellow(),
            v.parameter.as_deref().unwrap_or("?").white(),
            v.dropped.unwrap_or(0).to_string().yellow()
        ),
        other => format!(
            "{} {}",
            other.bright_black(),
            v.object
                .as_deref()
                .or(v.parameter.as_deref())
                .unwrap_or("")
                .white()
        ),
    };

    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        format_level(level),
        "[Model]".bright_cyan(),
        body
    )
}

fn format_insert(v: &EventVisitor) -> String {
    let mut line = format!(
        "{} {} {}",
        "inserted".bright_green(),
        v.kind.as_deref().unwrap_or("object").white().bold(),
        v.object.as_deref().unwrap_or("?").white()
    );
    if let Some(name) = v.name.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!(" '{}'", name.bright_yellow()));
    }
    if let (Some(label), Some(points)) = (v.label.as_deref(), v.points) {
        line.push_str(&format!(
            ", {} point(s) labelled {}",
            points.to_string().yellow(),
            label.bright_yellow()
        ));
    }
    line
}

fn format_level(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => "WARN".yellow().to_string(),
        Level::INFO => "INFO".bright_green().to_string(),
        Level::DEBUG => "DEBUG".bright_blue().to_string(),
        Level::TRACE => "TRACE".bright_black().to_string(),
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_events_without_name_are_skipped() {
        assert!(format_model_event(Level::DEBUG, &EventVisitor::default()).is_empty());
    }

    #[test]
    fn test_insert_line_mentions_kind_and_name() {
        let mut v = visitor("insert");
        v.kind = Some("hold variable".to_string());
        v.object = Some("hold variable #1".to_string());
        v.name = Some("z".to_string());

        let line = format_model_event(Level::DEBUG, &v);

        assert!(line.contains("[Model]"));
        assert!(line.contains("hold variable #1"));
        assert!(line.contains('z'));
    }

    #[test]
    fn test_unknown_events_fall_back_to_event_name() {
        let mut v = visitor("supports_add");
        v.count = Some(3);

        assert!(format_model_event(Level::TRACE, &v).contains("supports_add"));
    }
}

//! Text rendering of a recorded history
//!
//! Each retained event becomes one row:
//!
//! ```text
//!     3   1 |   CALL   (src/lib.rs line 12) Square.area => (src/main.rs line 4) main [parent call]
//! ```
//!
//! A gap marker row precedes any event whose step does not directly follow
//! the previous row's step. With `show_args`, each Call row is followed by
//! one row per local binding, skipping `self`/`cls` and type objects.
//! Rendering never touches the recorder; it can run any number of times.

use crate::config::TracerConfig;
use crate::frame::FrameDescriptor;
use crate::history::{History, TraceEvent};
use crate::hook::EventKind;
use crate::path::shorten;
use owo_colors::OwoColorize;
use std::io::Write;

/// Repeated once per depth level
pub const INDENT: &str = "|   ";

/// Row emitted where events were filtered out
pub const GAP_MARKER: &str = "  ...";

/// Annotation for calls to methods also declared on a direct base type
pub const PARENT_CALL_TAG: &str = "[parent call]";

/// Presentation options not carried by the tracer configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Emit ANSI colors
    pub color: bool,
}

#[derive(Clone, Copy)]
enum Tone {
    Kind,
    Line,
    Name,
    Tag,
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Kind => text.cyan().to_string(),
            Tone::Line => text.yellow().to_string(),
            Tone::Name => text.green().to_string(),
            Tone::Tag => text.magenta().to_string(),
        }
    }

    fn location(&self, frame: Option<&FrameDescriptor>, cuts: &[String]) -> String {
        match frame {
            Some(frame) => format!(
                "({} {}) {}",
                shorten(&frame.source_path, cuts),
                self.paint(&format!("line {}", frame.line), Tone::Line),
                self.paint(&frame.qualified_name, Tone::Name)
            ),
            None => self.paint("<root>", Tone::Name),
        }
    }
}

fn arrow(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Return => "<=",
        _ => "=>",
    }
}

fn indent(depth: i64) -> String {
    INDENT.repeat(depth.max(0) as usize)
}

fn event_row(painter: &Painter, event: &TraceEvent, config: &TracerConfig) -> String {
    let mut row = format!(
        "{:>5} {:>3} {}{} {} {} {}",
        event.step,
        event.depth,
        indent(event.depth),
        painter.paint(&format!("{:<6}", event.kind.label()), Tone::Kind),
        painter.location(Some(&event.callee), &config.path_cuts),
        arrow(event.kind),
        painter.location(event.caller.as_ref(), &config.path_cuts),
    );
    if event.is_parent_call {
        row.push(' ');
        row.push_str(&painter.paint(PARENT_CALL_TAG, Tone::Tag));
    }
    row
}

fn argument_rows(event: &TraceEvent) -> impl Iterator<Item = String> + '_ {
    let pad = indent(event.depth);
    event
        .callee
        .local_bindings
        .iter()
        .filter(|binding| !binding.is_self_reference() && !binding.value.is_type())
        .map(move |binding| format!("{:>9} {}    {} = {}", "", pad, binding.name, binding.value))
}

/// Render `history` into display rows
pub fn render(history: &History, config: &TracerConfig, options: RenderOptions) -> Vec<String> {
    let painter = Painter {
        color: options.color,
    };
    let mut rows = Vec::with_capacity(history.len());
    let mut previous_step: Option<u64> = None;

    for event in history {
        if previous_step.is_some_and(|prev| event.step != prev + 1) {
            rows.push(GAP_MARKER.to_string());
        }
        previous_step = Some(event.step);

        rows.push(event_row(&painter, event, config));
        if config.show_args && event.kind == EventKind::Call {
            rows.extend(argument_rows(event));
        }
    }
    rows
}

/// Render `history` and write one row per line
pub fn write_to<W: Write>(
    out: &mut W,
    history: &History,
    config: &TracerConfig,
    options: RenderOptions,
) -> std::io::Result<()> {
    for row in render(history, config, options) {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

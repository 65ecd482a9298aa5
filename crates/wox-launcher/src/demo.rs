//! In-process producers for the `wox` binary.
//!
//! `DemoChannel` answers each query from two independent tasks with
//! different latencies, which is enough to see batches merge, stale batches
//! get discarded and the staleness timer clear the list.

use std::time::Duration;

use wox_core::{Preview, Query, ResultAction, ResultItem, WoxImage};

use crate::channel::{BatchSink, QueryChannel};

const CALCULATOR_DELAY: Duration = Duration::from_millis(5);
const COMMANDS_DELAY: Duration = Duration::from_millis(80);

/// Deepest parenthesis or unary-minus nesting the calculator accepts.
const MAX_NESTING: usize = 64;

const CALCULATOR_ICON: &str = "<svg viewBox=\"0 0 24 24\"><rect width=\"24\" height=\"24\"/></svg>";

/// Built-in command list: (name, description).
const COMMANDS: &[(&str, &str)] = &[
    ("Open Settings", "Configure the launcher"),
    ("Open Terminal", "Start a new terminal window"),
    ("Open Browser", "Start the default web browser"),
    ("Lock Screen", "Lock the current session"),
    ("Log Out", "End the current session"),
    ("Restart", "Restart the computer"),
    ("Shut Down", "Power off the computer"),
    ("Sleep", "Suspend to RAM"),
    ("Empty Trash", "Permanently delete trashed files"),
    ("Toggle Dark Mode", "Switch between light and dark themes"),
    ("Screenshot", "Capture the whole screen"),
    ("Screenshot Selection", "Capture a region of the screen"),
];

// =============================================================================
// Demo Channel
// =============================================================================

/// Query channel backed by a calculator and a static command list.
#[derive(Debug, Default)]
pub struct DemoChannel;

impl DemoChannel {
    pub fn new() -> Self {
        Self
    }
}

impl QueryChannel for DemoChannel {
    fn submit(&self, query: Query, sink: BatchSink) {
        let text = query.text;

        let calc_text = text.clone();
        let calc_sink = sink.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CALCULATOR_DELAY).await;
            let results = calculator_results(&calc_text);
            if !results.is_empty() {
                calc_sink.deliver(results);
            }
        });

        tokio::spawn(async move {
            tokio::time::sleep(COMMANDS_DELAY).await;
            let results = command_results(&text);
            if !results.is_empty() {
                sink.deliver(results);
            }
        });
    }

    fn send_action(&self, action_id: String) {
        tracing::info!("Action invoked: {}", action_id);
    }
}

// =============================================================================
// Producers
// =============================================================================

/// Evaluate arithmetic queries. Only answers when the text has an operator.
pub fn calculator_results(text: &str) -> Vec<ResultItem> {
    if !text.contains(['+', '-', '*', '/', '(']) {
        return Vec::new();
    }
    let Some(value) = evaluate(text) else {
        return Vec::new();
    };

    let value = format_number(value);
    vec![ResultItem::new(value.clone(), text)
        .with_subtitle(text.trim())
        .with_icon(WoxImage::svg(CALCULATOR_ICON))
        .with_action(ResultAction::new(format!("copy:{}", value), "Copy result").default_action())]
}

/// Commands whose name contains `text`, case-insensitively.
pub fn command_results(text: &str) -> Vec<ResultItem> {
    let needle = text.trim().to_lowercase();
    COMMANDS
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains(&needle))
        .map(|(name, description)| {
            let id = name.to_lowercase().replace(' ', "-");
            ResultItem::new(*name, text)
                .with_subtitle(*description)
                .with_preview(Preview::new("text", *description))
                .with_action(ResultAction::new(format!("run:{}", id), "Run").default_action())
                .with_action(ResultAction::new(format!("copy:{}", name), "Copy name"))
        })
        .collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Expression Evaluation
// =============================================================================

/// Evaluate `+ - * /` with parentheses and unary minus.
///
/// Returns `None` on syntax errors, non-finite results or nesting deeper
/// than `MAX_NESTING`.
fn evaluate(text: &str) -> Option<f64> {
    let tokens: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() || !value.is_finite() {
        return None;
    }
    Some(value)
}

struct Parser {
    tokens: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.tokens.get(self.pos).copied()
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.pos += 1;
                    value += self.term()?;
                }
                '-' => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                '/' => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = self.nested();
        self.depth -= 1;
        value
    }

    fn nested(&mut self) -> Option<f64> {
        match self.peek()? {
            '-' => {
                self.pos += 1;
                Some(-self.factor()?)
            }
            '(' => {
                self.pos += 1;
                let value = self.expr()?;
                if self.peek()? != ')' {
                    return None;
                }
                self.pos += 1;
                Some(value)
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.tokens[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }
}

//! Reference dictionary process speaking the chordwire stdio protocol.
//!
//! Serves a tiny built-in dictionary: it announces its configuration on
//! stdout, then answers `translate`/`untranslate` requests line by line.
//! Used by the integration tests as a well-behaved child; also a working
//! template for writing real dictionary programs.

use std::io::{self, BufRead, Write};

use serde_json::{Value, json};

/// The built-in stroke-to-text entries.
const ENTRIES: &[(&[&str], &str)] = &[
    (&["T"], "the"),
    (&["-T"], "the"),
    (&["KAT"], "cat"),
    (&["KAT", "HROG"], "catalog"),
];

fn lookup(strokes: &[String]) -> Option<&'static str> {
    ENTRIES
        .iter()
        .find(|(key, _)| key.len() == strokes.len() && key.iter().eq(strokes.iter()))
        .map(|(_, translation)| *translation)
}

fn reverse(text: &str) -> Vec<Vec<&'static str>> {
    ENTRIES
        .iter()
        .filter(|(_, translation)| *translation == text)
        .map(|(key, _)| key.to_vec())
        .collect()
}

fn answer(request: &Value) -> Value {
    let seq = request.get("seq").cloned().unwrap_or(Value::Null);

    if let Some(strokes) = request.get("translate") {
        let key: Vec<String> = serde_json::from_value(strokes.clone()).unwrap_or_default();
        return json!({"seq": seq, "translation": lookup(&key)});
    }

    if let Some(text) = request.get("untranslate").and_then(Value::as_str) {
        return json!({"seq": seq, "reverse-translation": reverse(text)});
    }

    json!({"seq": seq})
}

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let handshake = json!({"longest-key": 2, "max-latency-ms": 500, "untranslate": true});
    writeln!(out, "{handshake}")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let text = line?;
        let Ok(request) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        writeln!(out, "{}", answer(&request))?;
        out.flush()?;
    }

    Ok(())
}

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_scalar};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_field_table(map),
        },
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    // Tracking results carry an event list; show it as its own table
    let mut fields = result.clone();
    let events = match fields.remove("events") {
        Some(Value::Array(events)) => events,
        Some(other) => {
            fields.insert("events".into(), other);
            Vec::new()
        }
        None => Vec::new(),
    };

    print_field_table(&fields);
    if !events.is_empty() {
        println!("\nEvents:");
        print_event_table(&events);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_fields(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_event_table(events: &[Value]) {
    let Some(Value::Object(first)) = events.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for event in events.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| event.get(h).map(format_scalar).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

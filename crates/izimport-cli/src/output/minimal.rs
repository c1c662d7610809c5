use serde_json::Value;

use super::format_scalar;

/// Well-known answer fields, in order of priority.
const PRIORITY_KEYS: [&str; 5] = ["total_cost", "formatted_rate", "rate", "status", "id"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_scalar(result_obj);
    };

    PRIORITY_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .map(format_scalar)
        .or_else(|| {
            map.iter()
                .next()
                .map(|(key, val)| format!("{}: {}", key, format_scalar(val)))
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_cost_wins() {
        let value = json!({"result": {"fob_value": "50.00", "total_cost": "99.89"}});
        assert_eq!(minimal_answer(&value), "99.89");
    }

    #[test]
    fn test_rate_lookup_prints_formatted_rate() {
        let value = json!({"result": {"rate": "3.7512", "formatted_rate": "3.75"}});
        assert_eq!(minimal_answer(&value), "3.75");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let value = json!({"result": {"other": 1}});
        assert_eq!(minimal_answer(&value), "other: 1");
    }
}

//! Extraction of a split proposal from generator free text.
//!
//! Generators wrap their JSON in markdown fences, prose, or both. The
//! parser scans for balanced top-level `{…}` candidates (string- and
//! escape-aware) and decodes the first one whose members are all
//! numeric. Anything else yields the empty proposal, which the
//! reconciler turns into an equal split.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use splitledger_application::ProposalParser;
use splitledger_domain::UntrustedAllocation;

#[derive(Default)]
pub struct JsonProposalParser;

impl ProposalParser for JsonProposalParser {
    fn parse(&self, raw: &str) -> UntrustedAllocation {
        candidate_objects(raw)
            .find_map(decode_object)
            .unwrap_or_default()
    }
}

/// Balanced top-level `{…}` slices of `text`, left to right. Objects
/// nested inside a balanced candidate are part of that candidate, not
/// candidates of their own.
fn candidate_objects(text: &str) -> impl Iterator<Item = &str> {
    let mut candidates = Vec::new();
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(from) = start.take() {
                        candidates.push(&text[from..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    candidates.into_iter()
}

fn decode_object(candidate: &str) -> Option<UntrustedAllocation> {
    let Ok(Value::Object(members)) = serde_json::from_str::<Value>(candidate) else {
        return None;
    };

    let mut allocation = UntrustedAllocation::new();
    for (name, value) in members {
        let Value::Number(number) = value else {
            return None;
        };
        let text = number.to_string();
        let amount = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()?;
        allocation.insert(name, amount);
    }
    Some(allocation)
}

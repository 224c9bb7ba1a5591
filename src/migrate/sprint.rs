//! Sprint field decoders.
//!
//! The sprint custom field has changed encoding across Jira versions, so the
//! mapper only sees a [`SprintDecoder`] and never the raw format.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::target::MilestoneRecord;

/// GreenHopper writes absent values as this literal.
const NULL_MARKER: &str = "<null>";

pub trait SprintDecoder: Send + Sync {
    /// Decode a raw sprint value. `None` means the issue has no milestone.
    fn decode_sprint(&self, raw: &str) -> Option<MilestoneRecord>;
}

fn non_empty(record: MilestoneRecord) -> Option<MilestoneRecord> {
    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}

/// Legacy `com.atlassian.greenhopper.service.sprint.Sprint@1f[id=1,name=..,goal=..]`
/// strings.
///
/// The split is naive: a value containing `,` or `=` is cut at that character.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreenHopperDecoder;

fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(.*)\]").expect("valid sprint regex"))
}

impl GreenHopperDecoder {
    fn fields(raw: &str) -> Option<HashMap<&str, &str>> {
        let inner = bracketed().captures(raw)?.get(1)?.as_str();
        Some(
            inner
                .split(',')
                .filter_map(|token| token.split_once('='))
                .collect(),
        )
    }
}

impl SprintDecoder for GreenHopperDecoder {
    fn decode_sprint(&self, raw: &str) -> Option<MilestoneRecord> {
        let fields = Self::fields(raw)?;
        let get = |key: &str| {
            fields
                .get(key)
                .filter(|v| **v != NULL_MARKER)
                .map(|v| v.to_string())
        };
        non_empty(MilestoneRecord {
            name: get("name"),
            description: get("goal"),
            due_date: get("endDate"),
        })
    }
}

/// Sprint objects as returned by current Jira Cloud.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSprintDecoder;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SprintObject {
    name: Option<String>,
    goal: Option<String>,
    end_date: Option<String>,
}

impl SprintDecoder for JsonSprintDecoder {
    fn decode_sprint(&self, raw: &str) -> Option<MilestoneRecord> {
        let sprint: SprintObject = serde_json::from_str(raw).ok()?;
        non_empty(MilestoneRecord {
            name: sprint.name,
            description: sprint.goal.filter(|g| !g.is_empty()),
            due_date: sprint.end_date,
        })
    }
}

/// Picks the decoder from the shape of the raw value.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoSprintDecoder;

impl SprintDecoder for AutoSprintDecoder {
    fn decode_sprint(&self, raw: &str) -> Option<MilestoneRecord> {
        if raw.trim_start().starts_with('{') {
            JsonSprintDecoder.decode_sprint(raw)
        } else {
            GreenHopperDecoder.decode_sprint(raw)
        }
    }
}

use super::html::escape;
use super::page::ReportPage;
use crate::error::Error;
use crate::utils::format_number;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt::Write;

const STAT_LABELS: [(&str, &str); 8] = [
    ("total", "总井数"),
    ("evaluated", "参评井数"),
    ("not_evaluated", "未参评井数"),
    ("cancelled", "注销井数"),
    ("new", "新投井数"),
    ("unit_changed", "单元变化井数"),
    ("conventional", "常规油井数"),
    ("shale", "页岩油井数"),
];

/// Display label for a statistic key; unknown keys are shown as-is.
pub fn stat_label(key: &str) -> &str {
    STAT_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// Well counts keyed by statistic, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRecord {
    entries: Vec<(String, u64)>,
}

impl StatsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::InvalidStats("expected an object of counts".into()))?;

        let mut record = Self::new();
        for (key, count) in map {
            let count = count.as_u64().ok_or_else(|| {
                Error::InvalidStats(format!("{:?} is not a non-negative integer: {}", key, count))
            })?;
            record.set(key, count);
        }
        Ok(record)
    }

    /// Sets `key`, keeping its position if it is already present.
    pub fn set(&mut self, key: &str, count: u64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((key.to_string(), count)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for StatsRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        StatsRecord::from_json(&Value::Object(map)).map_err(de::Error::custom)
    }
}

pub fn stat_cards_html(stats: &StatsRecord) -> String {
    let mut html = String::new();
    for (key, count) in stats.iter() {
        let _ = write!(
            html,
            r#"<div class="stat-card"><div class="number">{}</div><div class="label">{}</div></div>"#,
            format_number(count),
            escape(stat_label(key))
        );
    }
    html
}

/// Replaces the content of `container_id` with one card per statistic.
pub fn show_statistics(
    stats: &StatsRecord,
    page: &mut ReportPage,
    container_id: &str,
) -> Result<(), Error> {
    page.set_inner_html(container_id, stat_cards_html(stats))?;
    tracing::debug!(container = container_id, cards = stats.len(), "rendered statistics");
    Ok(())
}

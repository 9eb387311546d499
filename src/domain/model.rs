use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One loosely-typed record as delivered by the news search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: serde_json::Value,
}

impl RawRecord {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Uppercase two-letter code, empty when unknown.
    pub country: String,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: "Unknown".to_string(),
            url: String::new(),
            country: String::new(),
        }
    }
}

impl Source {
    /// `"{name} • {country}"`, or just the name when the country is unknown.
    pub fn category_label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{} • {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    /// Bin order used for sampling and reporting.
    pub const ALL: [TrafficLight; 3] = [TrafficLight::Green, TrafficLight::Yellow, TrafficLight::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLight::Green => "green",
            TrafficLight::Yellow => "yellow",
            TrafficLight::Red => "red",
        }
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficLight {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "green" => Ok(TrafficLight::Green),
            "yellow" => Ok(TrafficLight::Yellow),
            "red" => Ok(TrafficLight::Red),
            other => Err(format!("unknown traffic light status '{}'", other)),
        }
    }
}

/// Inclusive upper bounds of the green and yellow bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub green_max: u8,
    pub yellow_max: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            green_max: 33,
            yellow_max: 66,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub image: Option<String>,
    /// `None` until classification runs.
    pub traffic_light_status: Option<TrafficLight>,
    pub misleading_score: u8,
    pub content: String,
    pub url: String,
    pub published_at: String,
    pub source: Option<Source>,
    pub related: Vec<String>,
}

impl Article {
    pub fn to_output(&self) -> OutputArticle {
        OutputArticle {
            id: self.id,
            title: self.title.clone(),
            summary: self.summary.clone(),
            category: self.category.clone(),
            image: self.image.clone(),
            traffic_light_status: self
                .traffic_light_status
                .map(|light| light.as_str().to_string())
                .unwrap_or_default(),
            misleading_score: self.misleading_score,
            content: self.content.clone(),
            url: self.url.clone(),
            published_at: self.published_at.clone(),
        }
    }
}

/// Flat projection written for the display site; `source` and `related` are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputArticle {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub image: Option<String>,
    pub traffic_light_status: String,
    pub misleading_score: u8,
    pub content: String,
    pub url: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinStats {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl BinStats {
    pub fn get(&self, light: TrafficLight) -> usize {
        match light {
            TrafficLight::Green => self.green,
            TrafficLight::Yellow => self.yellow,
            TrafficLight::Red => self.red,
        }
    }

    pub fn total(&self) -> usize {
        self.green + self.yellow + self.red
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Every article that survived normalization, scored and classified, in fetch order.
    pub articles: Vec<Article>,
    pub sampled: Vec<Article>,
    pub stats: BinStats,
    pub skipped: usize,
    pub degraded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub fetched: usize,
    pub skipped: usize,
    pub degraded: usize,
    pub bins: BinStats,
    pub sampled_ids: Vec<u32>,
    pub output_files: Vec<String>,
}

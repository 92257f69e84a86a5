use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Portuguese field names are canonical; the English ones are aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(
        rename = "categoria",
        alias = "category",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        rename = "prioridade",
        alias = "priority",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
}

// Mistyped fields become `None` so one bad field cannot hide the rest.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

impl ClassificationResult {
    pub fn from_raw_text(body: impl Into<String>) -> Self {
        Self {
            message: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn is_inconclusive(&self) -> bool {
        self.category().is_none()
    }

    pub fn is_productive(&self) -> bool {
        matches!(self.category(), Some(category) if is_productive_label(category))
    }

    pub fn service_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }

    pub fn detailed_analysis_text(&self) -> Option<String> {
        match self.detailed_analysis.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => serde_json::to_string_pretty(other).ok(),
        }
    }
}

pub fn is_productive_label(category: &str) -> bool {
    matches!(
        category.trim().to_lowercase().as_str(),
        "produtivo" | "productive"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "alta" | "high" => Some(Self::High),
            "média" | "media" | "medium" => Some(Self::Medium),
            "baixa" | "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High priority",
            Self::Medium => "Medium priority",
            Self::Low => "Low priority",
        }
    }
}

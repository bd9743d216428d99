use serde::{Deserialize, Serialize};
use std::fmt;

/// One municipality as listed by `/municipality`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Municipality {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Municipality {
    /// Display name: `name` when present, else the API's `title`.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("municipality_{}", self.id))
    }
}

/// Gender segment of a KPI value. `T` is the total across segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "K")]
    Female,
    #[serde(rename = "T")]
    Total,
    #[serde(other)]
    Other,
}

/// A raw KPI value exactly as delivered. Kolada serializes most values as
/// numbers but some as strings; both are kept as text and only coerced to
/// a number where arithmetic needs it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KpiValue(String);

impl KpiValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric coercion. `None` when the text is not a finite number.
    pub fn as_number(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<f64> for KpiValue {
    fn from(v: f64) -> Self {
        Self(crate::report::fmt_number(v))
    }
}

impl From<&str> for KpiValue {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for KpiValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct KpiValueVisitor;

        impl<'de> Visitor<'de> for KpiValueVisitor {
            type Value = KpiValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a number or a string")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(KpiValue(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(KpiValue(v.to_string()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(KpiValue::from(v))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(KpiValue(s.to_string()))
            }
        }

        deserializer.deserialize_any(KpiValueVisitor)
    }
}

/// One gender-segmented value inside a data record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenderValue {
    pub gender: Gender,
    #[serde(default)]
    pub value: Option<KpiValue>,
}

/// One KPI for one municipality and one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawKpiRecord {
    #[serde(rename = "kpi")]
    pub kpi_id: String,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub period: Option<i32>,
    #[serde(default)]
    pub values: Vec<GenderValue>,
}

/// Envelope returned by every Kolada v2 list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Descriptive metadata for one KPI from `/kpi/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiMetadata {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub operating_area: Option<String>,
    #[serde(default)]
    pub has_ou_data: Option<bool>,
}

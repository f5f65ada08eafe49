//! External employer and vacancy records
//!
//! These mirror the objects emitted by the job-board API. Every field is
//! optional: the upstream payloads routinely omit nested objects or send
//! `null`, and a record with a missing required value is rejected by the store
//! on its own rather than failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::salary::Salary;

/// Employer as returned by the employer endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployerRecord {
    #[serde(default, deserialize_with = "external_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub site_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub logo_urls: Option<Value>,
    #[serde(default)]
    pub area: Option<Value>,
    #[serde(default)]
    pub industries: Option<Value>,
}

impl EmployerRecord {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id: Some(id),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

/// Reference to the employer embedded in a vacancy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployerRef {
    #[serde(default, deserialize_with = "external_id")]
    pub id: Option<i64>,
}

/// `{ "name": ... }` dictionary entry (employment type, experience)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

/// Vacancy as returned by the vacancy search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacancyRecord {
    #[serde(default, deserialize_with = "external_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "lenient")]
    pub employer: Option<EmployerRef>,
    #[serde(default)]
    pub area: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub requirement: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub responsibility: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub employment: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub experience: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub alternate_url: Option<String>,
}

impl VacancyRecord {
    pub fn new(id: i64, name: &str, employer_id: Option<i64>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.to_string()),
            employer: employer_id.map(|id| EmployerRef { id: Some(id) }),
            ..Default::default()
        }
    }

    pub fn with_salary(
        mut self,
        from: Option<i64>,
        to: Option<i64>,
        currency: Option<&str>,
    ) -> Self {
        self.salary = Some(Salary::new(from, to, currency));
        self
    }

    pub fn salary_from(&self) -> Option<i64> {
        self.salary.as_ref().and_then(|s| s.from)
    }

    pub fn salary_to(&self) -> Option<i64> {
        self.salary.as_ref().and_then(|s| s.to)
    }

    pub fn salary_currency(&self) -> Option<&str> {
        self.salary.as_ref().and_then(|s| s.currency.as_deref())
    }

    pub fn salary_gross(&self) -> Option<bool> {
        self.salary.as_ref().and_then(|s| s.gross)
    }

    pub fn employer_id(&self) -> Option<i64> {
        self.employer.as_ref().and_then(|e| e.id)
    }

    pub fn employment_name(&self) -> Option<&str> {
        self.employment.as_ref().and_then(|e| e.name.as_deref())
    }

    pub fn experience_name(&self) -> Option<&str> {
        self.experience.as_ref().and_then(|e| e.name.as_deref())
    }
}

/// Serialize an opaque structured attribute for storage.
///
/// `null` and empty objects/arrays carry no information and are stored as NULL.
pub fn opaque_json(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Accept ids as JSON integers or digit strings (`"15478"`).
///
/// Anything else becomes `None` so the record is rejected individually.
fn external_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let id = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if id.is_none() {
        tracing::debug!("Unusable external id in record");
    }
    Ok(id)
}

/// Text field; numbers are kept as their decimal text, other shapes become `None`
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Salary bound given as an integer, a float (rounded) or a digit string
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rounded = |f: f64| f.is_finite().then(|| f.round() as i64);
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(rounded)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(rounded))
        }
        _ => None,
    };
    Ok(amount)
}

/// Nested object of the wrong shape becomes `None` instead of failing the record
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vacancy_full_payload() {
        let vacancy: VacancyRecord = serde_json::from_value(json!({
            "id": "93512034",
            "name": "Rust Developer",
            "salary": {"from": 200000, "to": 300000, "currency": "RUR", "gross": false},
            "employer": {"id": "1740", "name": "Яндекс"},
            "area": {"id": "1", "name": "Москва"},
            "published_at": "2024-03-01T10:00:00+0300",
            "requirement": "Опыт с <highlighttext>Rust</highlighttext>",
            "employment": {"id": "full", "name": "Полная занятость"},
            "experience": {"id": "between3And6", "name": "От 3 до 6 лет"},
            "alternate_url": "https://hh.ru/vacancy/93512034"
        }))
        .unwrap();

        assert_eq!(vacancy.id, Some(93512034));
        assert_eq!(vacancy.employer_id(), Some(1740));
        assert_eq!(vacancy.salary_from(), Some(200000));
        assert_eq!(vacancy.salary_to(), Some(300000));
        assert_eq!(vacancy.salary_currency(), Some("RUR"));
        assert_eq!(vacancy.salary_gross(), Some(false));
        assert_eq!(vacancy.employment_name(), Some("Полная занятость"));
        assert_eq!(vacancy.experience_name(), Some("От 3 до 6 лет"));
    }

    #[test]
    fn test_vacancy_missing_nested_objects() {
        let vacancy: VacancyRecord = serde_json::from_value(json!({
            "id": 11,
            "name": "Mgr",
            "salary": null,
            "employment": null
        }))
        .unwrap();

        assert_eq!(vacancy.salary_from(), None);
        assert_eq!(vacancy.salary_to(), None);
        assert_eq!(vacancy.salary_currency(), None);
        assert_eq!(vacancy.salary_gross(), None);
        assert_eq!(vacancy.employer_id(), None);
        assert_eq!(vacancy.employment_name(), None);
        assert_eq!(vacancy.experience_name(), None);
    }

    #[test]
    fn test_unparseable_id_becomes_none() {
        let employer: EmployerRecord =
            serde_json::from_value(json!({"id": "not-a-number", "name": "Acme"})).unwrap();
        assert_eq!(employer.id, None);
        assert_eq!(employer.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_malformed_fields_become_none() {
        let vacancy: VacancyRecord = serde_json::from_value(json!({
            "id": 12,
            "name": 404,
            "salary": {"from": 150000.5, "to": "90000", "currency": 5, "gross": "yes"},
            "employer": "Acme",
            "employment": 42,
            "requirement": {"text": "Rust"}
        }))
        .unwrap();

        assert_eq!(vacancy.name.as_deref(), Some("404"));
        assert_eq!(vacancy.salary_from(), Some(150001));
        assert_eq!(vacancy.salary_to(), Some(90000));
        assert_eq!(vacancy.salary_currency(), None);
        assert_eq!(vacancy.salary_gross(), None);
        assert_eq!(vacancy.employer_id(), None);
        assert_eq!(vacancy.employment_name(), None);
        assert_eq!(vacancy.requirement, None);
    }

    #[test]
    fn test_opaque_json() {
        assert_eq!(opaque_json(None), None);
        assert_eq!(opaque_json(Some(&json!(null))), None);
        assert_eq!(opaque_json(Some(&json!({}))), None);
        assert_eq!(opaque_json(Some(&json!([]))), None);
        assert_eq!(
            opaque_json(Some(&json!({"id": "1"}))).as_deref(),
            Some(r#"{"id":"1"}"#)
        );
    }
}

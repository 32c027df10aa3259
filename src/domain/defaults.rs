// Default parameter values attached to a route

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A default value. `Many` is how a route accepts several request methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    One(String),
    Many(Vec<String>),
}

impl DefaultValue {
    /// The single value, if this is not a list
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DefaultValue::One(value) => Some(value),
            DefaultValue::Many(_) => None,
        }
    }

    /// Empty string or empty list
    pub fn is_empty(&self) -> bool {
        match self {
            DefaultValue::One(value) => value.is_empty(),
            DefaultValue::Many(values) => values.is_empty(),
        }
    }

    /// Whether `candidate` satisfies this value: equal to a single value, or
    /// contained in a list.
    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            DefaultValue::One(value) => value == candidate,
            DefaultValue::Many(values) => values.iter().any(|v| v == candidate),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::One(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::One(value)
    }
}

impl From<Vec<String>> for DefaultValue {
    fn from(values: Vec<String>) -> Self {
        DefaultValue::Many(values)
    }
}

impl From<Vec<&str>> for DefaultValue {
    fn from(values: Vec<&str>) -> Self {
        DefaultValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

// Config files write defaults as plain scalars (`id: 1`, `secure: true`) or
// lists of them; all of them end up as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefault {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawDefault::deserialize(deserializer)? {
            RawDefault::One(scalar) => DefaultValue::One(scalar.into()),
            RawDefault::Many(list) => DefaultValue::Many(list.into_iter().map(String::from).collect()),
        })
    }
}

/// Ordered default values for a route's keys.
///
/// Two keys have a special meaning: `method` restricts the request methods
/// a route accepts, and `host` marks a route as pointing to another site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defaults {
    values: IndexMap<String, DefaultValue>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<DefaultValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Restrict the route to the given request methods
    pub fn with_methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods: Vec<String> = methods.into_iter().map(Into::into).collect();
        self.with("method", DefaultValue::Many(methods))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DefaultValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DefaultValue> {
        self.values.get(key)
    }

    /// The default for `key` when it is a single value
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DefaultValue::as_str)
    }

    /// The `host` default, if any
    pub fn host(&self) -> Option<&str> {
        self.value("host")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DefaultValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Defaults
where
    K: Into<String>,
    V: Into<DefaultValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut defaults = Defaults::new();
        for (key, value) in iter {
            defaults.insert(key, value);
        }
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ignores_lists() {
        let defaults = Defaults::new().with("id", "1").with_methods(["GET", "POST"]);
        assert_eq!(defaults.value("id"), Some("1"));
        assert_eq!(defaults.value("method"), None);
        assert!(defaults.get("method").is_some());
    }

    #[test]
    fn test_accepts() {
        assert!(DefaultValue::from("POST").accepts("POST"));
        assert!(!DefaultValue::from("POST").accepts("post"));
        assert!(DefaultValue::from(vec!["GET", "HEAD"]).accepts("HEAD"));
        assert!(!DefaultValue::from(vec!["GET", "HEAD"]).accepts("PUT"));
    }

    #[test]
    fn test_deserialize_scalars_as_strings() {
        let yml = "id: 1\nratio: 0.5\nsecure: true\nname: blog\nmethod: [GET, POST]\n";
        let defaults: Defaults = serde_yaml::from_str(yml).unwrap();
        assert_eq!(defaults.value("id"), Some("1"));
        assert_eq!(defaults.value("ratio"), Some("0.5"));
        assert_eq!(defaults.value("secure"), Some("true"));
        assert_eq!(defaults.value("name"), Some("blog"));
        assert_eq!(
            defaults.get("method"),
            Some(&DefaultValue::Many(vec!["GET".to_string(), "POST".to_string()]))
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let defaults: Defaults = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<&String> = defaults.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_serialize_round_trips_through_json() {
        let defaults = Defaults::new().with("controller", "welcome").with_methods(["GET"]);
        let json = serde_json::to_string(&defaults).unwrap();
        assert_eq!(json, r#"{"controller":"welcome","method":["GET"]}"#);
    }
}

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

/// Failure from [`RouteDefinition::try_reverse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    #[error("route '{route}' requires parameter '{parameter}'")]
    MissingParameter { route: String, parameter: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { literal: String, name: String },
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.split(':').nth(1) {
            Some(name) => Segment::Param {
                literal: raw.to_string(),
                name: name.to_string(),
            },
            None => Segment::Literal(raw.to_string()),
        }
    }
}

/// Registry entry for a named route
///
/// Built from a fully-qualified name and a framework-dialect path
/// (`/pets/:id/dogs`). Any `/`-separated segment containing `:` is a
/// parameter; its name is the text between the first and second `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    name: String,
    path: String,
    parameters: Vec<String>,
    segments: Vec<Segment>,
}

impl RouteDefinition {
    pub fn build(name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let segments: Vec<Segment> = path.split('/').map(Segment::parse).collect();
        let parameters = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, .. } => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect();
        Self {
            name: name.into(),
            path,
            parameters,
            segments,
        }
    }

    /// Fully-qualified, dash-joined name; empty for anonymous definitions
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Framework-dialect path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameter names in path order
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Substitute parameter values into the path.
    ///
    /// Values are formatted with `Display`. A parameter with no supplied value
    /// keeps its literal segment (`:id`), and keys that are not parameters of
    /// this route are ignored.
    ///
    /// ```rust
    /// use routetree::tree::RouteDefinition;
    ///
    /// let def = RouteDefinition::build("pets-dogs", "/pets/:id/dogs");
    /// assert_eq!(def.reverse([("id", 7)]), "/pets/7/dogs");
    /// assert_eq!(def.reverse(Vec::<(&str, u32)>::new()), "/pets/:id/dogs");
    /// ```
    pub fn reverse<I, K, V>(&self, values: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let values = collect_values(values);
        self.render(|name| values.get(name).cloned())
    }

    /// Like [`reverse`](Self::reverse), but a missing parameter is an error.
    pub fn try_reverse<I, K, V>(&self, values: I) -> Result<String, ReverseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let values = collect_values(values);
        if let Some(missing) = self.parameters.iter().find(|p| !values.contains_key(*p)) {
            return Err(ReverseError::MissingParameter {
                route: self.name.clone(),
                parameter: missing.clone(),
            });
        }
        Ok(self.render(|name| values.get(name).cloned()))
    }

    fn render(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Param { literal, name } => lookup(name).unwrap_or_else(|| literal.clone()),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn collect_values<I, K, V>(values: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    values
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
        .collect()
}

impl Serialize for RouteDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RouteDefinition", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("parameters", &self.parameters)?;
        state.end()
    }
}

//! Per-phase order lists.
//!
//! Each phase has its own ordered list of quantity names. Lists are plain
//! names: they may repeat a name, omit names, or name quantities that are
//! not registered yet. Names are only resolved when a step runs.

use simobject_core::{Phase, SimError, Value};

/// The three order lists of a simulation, one per [`Phase`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseOrders {
    lists: [Vec<String>; 3],
}

impl PhaseOrders {
    /// All three lists empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// The list for `phase`.
    pub fn get(&self, phase: Phase) -> &[String] {
        &self.lists[phase.index()]
    }

    /// Replace the list for `phase` wholesale.
    pub fn set<I, S>(&mut self, phase: Phase, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists[phase.index()] = names.into_iter().map(Into::into).collect();
    }

    /// Builder-style [`set`](Self::set).
    pub fn with<I, S>(mut self, phase: Phase, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(phase, names);
        self
    }

    /// Total number of entries across all phases.
    pub fn total_entries(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

/// Map a container attribute name to the phase whose order list it denotes.
pub fn order_attribute(name: &str) -> Option<Phase> {
    match name {
        "systole_order" => Some(Phase::Systole),
        "update_order" => Some(Phase::Update),
        "diastole_order" => Some(Phase::Diastole),
        _ => None,
    }
}

/// Check that `value` is a list of strings and return the names.
///
/// Anything else is a [`SimError::OrderType`]. Names are not checked against
/// any registry.
pub fn names_from_value(value: Value) -> Result<Vec<String>, SimError> {
    let items = match value {
        Value::List(items) => items,
        other => {
            return Err(SimError::OrderType {
                reason: format!("input must be a list, got {}", other.kind()),
            })
        }
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Str(name) => Ok(name),
            other => Err(SimError::OrderType {
                reason: format!("not a str: {}", describe(&other)),
            }),
        })
        .collect()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.kind().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_are_empty() {
        let orders = PhaseOrders::new();
        for phase in Phase::ALL {
            assert!(orders.get(phase).is_empty());
        }
        assert_eq!(orders.total_entries(), 0);
    }

    #[test]
    fn lists_are_independent_and_allow_duplicates() {
        let orders = PhaseOrders::new()
            .with(Phase::Update, ["a", "b", "a"])
            .with(Phase::Diastole, vec![String::from("c")]);
        assert_eq!(orders.get(Phase::Update), &["a", "b", "a"]);
        assert_eq!(orders.get(Phase::Diastole), &["c"]);
        assert!(orders.get(Phase::Systole).is_empty());
        assert_eq!(orders.total_entries(), 4);
    }

    #[test]
    fn attribute_names_map_to_phases() {
        assert_eq!(order_attribute("systole_order"), Some(Phase::Systole));
        assert_eq!(order_attribute("update_order"), Some(Phase::Update));
        assert_eq!(order_attribute("diastole_order"), Some(Phase::Diastole));
        assert_eq!(order_attribute("order"), None);
    }

    #[test]
    fn string_is_not_a_list() {
        assert_eq!(
            names_from_value(Value::from("not-a-list")),
            Err(SimError::OrderType {
                reason: "input must be a list, got str".into()
            })
        );
    }

    #[test]
    fn list_of_numbers_is_rejected() {
        assert_eq!(
            names_from_value(Value::from(vec![1, 2])),
            Err(SimError::OrderType {
                reason: "not a str: 1".into()
            })
        );
    }

    #[test]
    fn list_of_strings_passes_unvalidated() {
        assert_eq!(
            names_from_value(Value::from(vec!["ghost", "ghost"])).unwrap(),
            vec!["ghost".to_string(), "ghost".to_string()]
        );
        assert!(names_from_value(Value::List(Vec::new())).unwrap().is_empty());
    }
}

use super::FieldValue;

/// Sparse, insertion-ordered set of field assignments for a partial update.
///
/// Keys are application-level field names (`numEmployees`, not
/// `num_employees`). Setting a key twice replaces the value but keeps the
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePayload {
    entries: Vec<(String, FieldValue)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    /// Builder-style variant of [`UpdatePayload::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Assign only when a value was supplied.
    pub fn set_some<V: Into<FieldValue>>(&mut self, field: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    /// Reorder entries to follow `order`; fields it does not name keep their
    /// relative order at the end.
    pub fn ordered_by(mut self, order: &[String]) -> Self {
        self.entries
            .sort_by_key(|(k, _)| order.iter().position(|o| o == k).unwrap_or(order.len()));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for UpdatePayload
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (k, v) in iter {
            payload.set(k, v);
        }
        payload
    }
}

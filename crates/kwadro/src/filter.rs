use kwadro_common::CellValue;

/// Attribute equality predicates combined with logical AND.
///
/// Conditions are checked in insertion order; an empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, CellValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to equal `value`. Repeating a name replaces its value.
    pub fn equals(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.conditions.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.conditions.push((name, value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.conditions.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (k, v)| filter.equals(k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_name_replaces_value() {
        let filter = Filter::new().equals("age", 30).equals("name", "A").equals("age", 31);
        let pairs: Vec<_> = filter.iter().collect();
        assert_eq!(
            pairs,
            [("age", &CellValue::Int(31)), ("name", &CellValue::from("A"))]
        );
    }

    #[test]
    fn collects_from_pairs() {
        let filter: Filter = [("country", "Australia")].into_iter().collect();
        assert_eq!(filter.len(), 1);
        assert!(!filter.is_empty());
        assert!(Filter::new().is_empty());
    }
}

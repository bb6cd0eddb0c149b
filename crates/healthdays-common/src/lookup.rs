use std::collections::HashMap;

/// Column names keyed case-insensitively, remembering the original spelling.
///
/// When two names differ only by case, the first one wins.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(name.trim().to_ascii_uppercase())
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Original spelling of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

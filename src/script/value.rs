use crate::metadata::{ImportFolder, Language, Title};

/// Dynamically typed result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Text.
    Str(String),
    /// Signed integer.
    Num(i64),
    /// Ordered collection of metadata elements.
    Coll(Collection),
}

/// Ordered collection, homogeneous in its element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// Anime or episode titles.
    Titles(Vec<Title>),
    /// Languages.
    Languages(Vec<Language>),
    /// Import folders.
    Folders(Vec<ImportFolder>),
    /// Plain strings (codecs and the like).
    Strings(Vec<String>),
}

impl Value {
    /// Name of the value's category, for error messages.
    pub fn category(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Coll(_) => "collection",
        }
    }

    /// Truthiness: non-empty strings, non-zero numbers and non-empty collections are true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(flag) => *flag,
            Value::Str(text) => !text.is_empty(),
            Value::Num(num) => *num != 0,
            Value::Coll(items) => !items.is_empty(),
        }
    }

    /// Text form of the value. Booleans have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Bool(_) => None,
            Value::Str(text) => Some(text.clone()),
            Value::Num(num) => Some(num.to_string()),
            Value::Coll(items) => Some(items.texts().join(", ")),
        }
    }

    /// Numeric form of the value: strings count characters, collections count elements.
    pub fn to_number(&self) -> Option<i64> {
        match self {
            Value::Bool(_) => None,
            Value::Str(text) => Some(text.chars().count() as i64),
            Value::Num(num) => Some(*num),
            Value::Coll(items) => Some(items.len() as i64),
        }
    }
}

impl Collection {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Collection::Titles(items) => items.len(),
            Collection::Languages(items) => items.len(),
            Collection::Folders(items) => items.len(),
            Collection::Strings(items) => items.len(),
        }
    }

    /// Whether the collection has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type, for error messages.
    pub fn element_kind(&self) -> &'static str {
        match self {
            Collection::Titles(_) => "titles",
            Collection::Languages(_) => "languages",
            Collection::Folders(_) => "import folders",
            Collection::Strings(_) => "strings",
        }
    }

    /// Canonical text of every element, in order.
    pub fn texts(&self) -> Vec<String> {
        match self {
            Collection::Titles(items) => items.iter().map(|t| t.text.clone()).collect(),
            Collection::Languages(items) => items.iter().map(|l| l.name().to_string()).collect(),
            Collection::Folders(items) => items.iter().map(|f| f.name.clone()).collect(),
            Collection::Strings(items) => items.clone(),
        }
    }

    /// Canonical text of the first element, or an empty string.
    pub fn first_text(&self) -> String {
        match self {
            Collection::Titles(items) => items.first().map(|t| t.text.clone()),
            Collection::Languages(items) => items.first().map(|l| l.name().to_string()),
            Collection::Folders(items) => items.first().map(|f| f.name.clone()),
            Collection::Strings(items) => items.first().cloned(),
        }
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TitleKind;

    #[test]
    fn truthiness_follows_category_rules() {
        assert!(!Value::Str(String::new()).truthy());
        assert!(Value::Str("x".into()).truthy());
        assert!(!Value::Num(0).truthy());
        assert!(Value::Num(-3).truthy());
        assert!(!Value::Coll(Collection::Strings(vec![])).truthy());
        assert!(Value::Coll(Collection::Languages(vec![Language::English])).truthy());
    }

    #[test]
    fn collections_stringify_joined() {
        let titles = Collection::Titles(vec![
            Title::new("Shingeki no Kyojin", Language::Romaji, TitleKind::Main),
            Title::new("Attack on Titan", Language::English, TitleKind::Official),
        ]);
        let value = Value::Coll(titles.clone());
        assert_eq!(
            value.to_text().as_deref(),
            Some("Shingeki no Kyojin, Attack on Titan")
        );
        assert_eq!(titles.first_text(), "Shingeki no Kyojin");
        assert_eq!(value.to_number(), Some(2));
        assert_eq!(Collection::Strings(vec![]).first_text(), "");
    }

    #[test]
    fn strings_count_characters_not_bytes() {
        assert_eq!(Value::Str("進撃".into()).to_number(), Some(2));
        assert_eq!(Value::Bool(true).to_number(), None);
        assert_eq!(Value::Bool(true).to_text(), None);
    }
}

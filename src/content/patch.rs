use serde::{Deserialize, Serialize};

/// One field of a partial update.
///
/// - omitted from the body: `Unset`, the stored value is kept
/// - `null`: `Null`, the stored value is cleared
/// - a value: `Value(v)`, the stored value is replaced
///
/// Fields must carry `#[serde(default)]` so an omitted key lands on `Unset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchField<T> {
    #[serde(skip)]
    Unset,
    Null,
    Value(T),
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        PatchField::Unset
    }
}

impl<T> PatchField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, PatchField::Unset)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            PatchField::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        title: PatchField<String>,
        #[serde(default)]
        url: PatchField<String>,
        #[serde(default)]
        order: PatchField<i32>,
    }

    #[test]
    fn distinguishes_omitted_null_and_value() {
        let body: Body = serde_json::from_str(r#"{"url": null, "order": 3}"#).unwrap();
        assert_eq!(body.title, PatchField::Unset);
        assert_eq!(body.url, PatchField::Null);
        assert_eq!(body.order, PatchField::Value(3));
        assert!(body.title.is_unset());
        assert_eq!(body.order.as_value(), Some(&3));
    }
}

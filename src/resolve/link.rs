//! Borrowed view over a hyper-schema link object

use serde_json::Value;

/// One entry of a resource's `links` array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link<'a> {
    pub rel: &'a str,
    /// Request schema
    pub schema: Option<&'a Value>,
    /// Response schema
    pub target_schema: Option<&'a Value>,
    pub href: Option<&'a str>,
    pub method: Option<&'a str>,
    pub title: Option<&'a str>,
}

impl<'a> Link<'a> {
    /// `None` when the value is not an object or has no string `rel`
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            rel: object.get("rel")?.as_str()?,
            schema: object.get("schema"),
            target_schema: object.get("targetSchema"),
            href: object.get("href").and_then(Value::as_str),
            method: object.get("method").and_then(Value::as_str),
            title: object.get("title").and_then(Value::as_str),
        })
    }

    /// All well-formed links of a resource definition, in document order
    pub fn all(definition: &'a Value) -> impl Iterator<Item = Link<'a>> + 'a {
        definition
            .get("links")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Link::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let value = json!({
            "rel": "create",
            "href": "/users",
            "method": "POST",
            "schema": {"type": "object"}
        });
        let link = Link::from_value(&value).unwrap();
        assert_eq!(link.rel, "create");
        assert_eq!(link.method, Some("POST"));
        assert_eq!(link.schema, Some(&json!({"type": "object"})));
        assert!(link.target_schema.is_none());
    }

    #[test]
    fn test_all_skips_malformed() {
        let definition = json!({
            "links": [
                {"rel": "self"},
                {"href": "/no-rel"},
                "not a link",
                {"rel": "instances"}
            ]
        });
        let rels: Vec<_> = Link::all(&definition).map(|l| l.rel).collect();
        assert_eq!(rels, vec!["self", "instances"]);
        assert_eq!(Link::all(&json!({})).count(), 0);
    }
}

use crate::interpreter::{evaluator::core::Context, value::core::Value};

/// Opening marker of an interpolation fragment.
const OPEN: &str = "<%";
/// Closing marker of an interpolation fragment.
const CLOSE: &str = "%>";

impl Context {
    /// Interpolates `<% name %>` fragments in a string literal.
    ///
    /// `name` may be a plain or dotted identifier; dotted names walk struct
    /// fields. Fragments that do not resolve are left textually unchanged,
    /// as is a dangling `<%` without its closer. Interpolation runs at every
    /// evaluation of the literal, so the output tracks the current bindings.
    pub(crate) fn interpolate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];

            match after.find(CLOSE) {
                Some(end) => {
                    let inner = &after[..end];
                    match self.resolve_fragment(inner.trim()) {
                        Some(value) => out.push_str(&value.to_string()),
                        None => {
                            out.push_str(OPEN);
                            out.push_str(inner);
                            out.push_str(CLOSE);
                        },
                    }
                    rest = &after[end + CLOSE.len()..];
                },
                None => {
                    out.push_str(OPEN);
                    rest = after;
                },
            }
        }

        out.push_str(rest);
        out
    }

    /// Resolves an interpolation fragment without raising errors.
    fn resolve_fragment(&self, name: &str) -> Option<Value> {
        if name.is_empty() {
            return None;
        }
        if let Some(value) = self.get_variable(name) {
            return Some(value.clone());
        }

        let (base, path) = name.split_once('.')?;
        let mut value = self.get_variable(base)?.clone();
        for field in path.split('.') {
            value = match &value {
                Value::Struct(fields) => fields.borrow().get(field).cloned()?,
                _ => return None,
            };
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_known_variables() {
        let mut context = Context::new();
        context.define_local("name", Value::Str("world".to_string()));

        assert_eq!(context.interpolate("hello, <%name%>"), "hello, world");
        assert_eq!(context.interpolate("<% name %>!"), "world!");
    }

    #[test]
    fn leaves_unknown_fragments_untouched() {
        let context = Context::new();
        assert_eq!(context.interpolate("hi <%nobody%>"), "hi <%nobody%>");
        assert_eq!(context.interpolate("dangling <% oops"), "dangling <% oops");
    }

    #[test]
    fn walks_struct_fields() {
        let mut context = Context::new();
        let user = Value::struct_instance("User",
                                          std::collections::HashMap::from([
            ("name".to_string(), Value::Str("andy".to_string())),
        ]));
        context.define_local("u", user);

        assert_eq!(context.interpolate("hi <%u.name%>"), "hi andy");
        assert_eq!(context.interpolate("hi <%u.age%>"), "hi <%u.age%>");
    }
}

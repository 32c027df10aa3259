// Template resolution: rebuild a concrete path from parameters

use crate::domain::{Defaults, Params};

use super::ast::{Template, TemplateNode};

/// A key the template needs but neither the caller nor the defaults supplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParam(pub String);

/// Resolves keys in a template to produce a path.
///
/// A group is only written out when something inside it is *required*: a key
/// was given a value that differs from its default (or has no default), or a
/// nested group is required. Top-level text is always written.
pub struct TemplateResolver<'a> {
    defaults: &'a Defaults,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(defaults: &'a Defaults) -> Self {
        Self { defaults }
    }

    /// Resolve `template` with `params`, collapsing repeated separators and
    /// dropping the trailing one.
    pub fn resolve(&self, template: &Template, params: &Params) -> Result<String, MissingParam> {
        let (path, _) = self.resolve_nodes(&template.nodes, params, true)?;
        Ok(clean_separators(&path))
    }

    fn resolve_nodes(
        &self,
        nodes: &[TemplateNode],
        params: &Params,
        mut required: bool,
    ) -> Result<(String, bool), MissingParam> {
        let mut out = String::new();
        let mut missing: Option<&str> = None;

        for node in nodes {
            match node {
                TemplateNode::Literal(text) => out.push_str(text),
                TemplateNode::Key(name) => {
                    let default = self.defaults.value(name);
                    if let Some(value) = params.get(name) {
                        if default != Some(value.as_str()) {
                            required = true;
                        }
                        out.push_str(value);
                    } else if let Some(default) = default {
                        out.push_str(default);
                    } else if missing.is_none() {
                        missing = Some(name);
                    }
                }
                TemplateNode::Group(children) => {
                    let (text, group_required) = self.resolve_nodes(children, params, false)?;
                    if group_required {
                        required = true;
                        out.push_str(&text);
                    }
                }
            }
        }

        if required {
            if let Some(name) = missing {
                return Err(MissingParam(name.to_string()));
            }
        }

        Ok((out, required))
    }
}

/// Collapse runs of `/` into one and trim trailing `/`.
fn clean_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.trim_end_matches('/').chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::TemplateParser;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(uri: &str, defaults: &Defaults, pairs: &[(&str, &str)]) -> Result<String, MissingParam> {
        let template = TemplateParser::parse(uri).unwrap();
        TemplateResolver::new(defaults).resolve(&template, &params(pairs))
    }

    #[test]
    fn test_resolve_simple_key() {
        let result = resolve("route-test/<id>", &Defaults::new(), &[("id", "1")]).unwrap();
        assert_eq!(result, "route-test/1");
    }

    #[test]
    fn test_optional_group_omitted_without_values() {
        let defaults = Defaults::new().with("controller", "welcome").with("action", "index");
        let result = resolve("(<controller>(/<action>(/<id>)))", &defaults, &[]).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_group_emitted_when_value_differs_from_default() {
        let defaults = Defaults::new().with("controller", "welcome").with("action", "index");
        let result = resolve("(<controller>(/<action>(/<id>)))", &defaults, &[("action", "edit")]).unwrap();
        // the outer group becomes required through its child, pulling in the controller default
        assert_eq!(result, "welcome/edit");
    }

    #[test]
    fn test_value_equal_to_default_is_not_required() {
        let defaults = Defaults::new().with("action", "index");
        let result = resolve("blog(/<action>)", &defaults, &[("action", "index")]).unwrap();
        assert_eq!(result, "blog");
    }

    #[test]
    fn test_deepest_value_pulls_in_enclosing_groups() {
        let defaults = Defaults::new().with("controller", "welcome").with("action", "index");
        let result = resolve("(<controller>(/<action>(/<id>)))", &defaults, &[("id", "7")]).unwrap();
        assert_eq!(result, "welcome/index/7");
    }

    #[test]
    fn test_missing_key_in_required_group_fails() {
        let err = resolve("<controller>/<id>", &Defaults::new(), &[("controller", "x")]).unwrap_err();
        assert_eq!(err, MissingParam("id".to_string()));
    }

    #[test]
    fn test_first_missing_key_is_reported() {
        let err = resolve("<a>/<b>/<c>", &Defaults::new(), &[("b", "x")]).unwrap_err();
        assert_eq!(err, MissingParam("a".to_string()));
    }

    #[test]
    fn test_missing_key_in_unused_group_is_ignored() {
        let result = resolve("blog(/<page>)", &Defaults::new(), &[]).unwrap();
        assert_eq!(result, "blog");
    }

    #[test]
    fn test_missing_key_in_required_group_fails_inside_group() {
        let err = resolve("blog(/<year>/<month>)", &Defaults::new(), &[("month", "05")]).unwrap_err();
        assert_eq!(err, MissingParam("year".to_string()));
    }

    #[test]
    fn test_separators_are_collapsed_and_trimmed() {
        let result = resolve("<a>//<b>/", &Defaults::new(), &[("a", "x"), ("b", "y")]).unwrap();
        assert_eq!(result, "x/y");
    }

    #[test]
    fn test_clean_separators() {
        assert_eq!(clean_separators("a///b//c//"), "a/b/c");
        assert_eq!(clean_separators("/a"), "/a");
        assert_eq!(clean_separators("///"), "");
    }
}

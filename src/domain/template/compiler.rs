// Template compilation into an anchored regular expression

use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};

use crate::error::CompileError;

use super::ast::{Template, TemplateNode};
use super::parser::TemplateParser;
use crate::domain::Params;

/// Default matching expression for a key: one or more characters that are not
/// a path separator or one of `. , ; ?` or newline.
pub const DEFAULT_SEGMENT: &str = r"[^/.,;?\n]+";

/// Upper bound on the compiled program size.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Anchored matcher produced from a template and its key overrides
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    keys: Vec<String>,
}

impl CompiledMatcher {
    /// Match the whole of `text`, returning the named captures that took part
    /// in the match. Positional captures from override expressions are dropped.
    pub fn try_match(&self, text: &str) -> Option<Params> {
        let caps = self.regex.captures(text)?;
        let params = self
            .keys
            .iter()
            .filter_map(|key| caps.name(key).map(|m| (key.clone(), m.as_str().to_string())))
            .collect();
        Some(params)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The compiled expression
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Key names captured by this matcher, in template order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Parse and compile `uri` in one step.
///
/// ```
/// use std::collections::HashMap;
///
/// let overrides = HashMap::from([("id".to_string(), r"\d+".to_string())]);
/// let matcher = pathway::compile("<controller>(/<action>(/<id>))", &overrides).unwrap();
/// let params = matcher.try_match("blog/view/42").unwrap();
/// assert_eq!(params["id"], "42");
/// assert!(matcher.try_match("blog/view/abc").is_none());
/// ```
pub fn compile(uri: &str, overrides: &HashMap<String, String>) -> Result<CompiledMatcher, CompileError> {
    let template = TemplateParser::parse(uri)?;
    compile_template(&template, overrides)
}

/// Compile an already parsed template.
pub fn compile_template(
    template: &Template,
    overrides: &HashMap<String, String>,
) -> Result<CompiledMatcher, CompileError> {
    let mut keys = Vec::new();
    let mut seen = HashSet::new();
    for key in template.keys() {
        if !seen.insert(key) {
            return Err(CompileError::DuplicateKey {
                key: key.to_string(),
            });
        }
        keys.push(key.to_string());
    }

    for key in overrides.keys() {
        if !seen.contains(key.as_str()) {
            tracing::debug!(
                template = template.source(),
                key = %key,
                "override given for a key the template does not use"
            );
        }
    }

    let mut expression = String::from("^");
    write_nodes(&template.nodes, overrides, &mut expression);
    expression.push('$');

    // `.` excludes newline and classes are Unicode-aware by default
    let regex = RegexBuilder::new(&expression)
        .size_limit(MAX_REGEX_SIZE)
        .build()?;

    Ok(CompiledMatcher { regex, keys })
}

fn write_nodes(nodes: &[TemplateNode], overrides: &HashMap<String, String>, out: &mut String) {
    for node in nodes {
        match node {
            TemplateNode::Literal(text) => out.push_str(&regex::escape(text)),
            TemplateNode::Key(name) => {
                let segment = overrides
                    .get(name)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_SEGMENT);
                out.push_str("(?P<");
                out.push_str(name);
                out.push('>');
                out.push_str(segment);
                out.push(')');
            }
            TemplateNode::Group(children) => {
                out.push_str("(?:");
                write_nodes(children, overrides, out);
                out.push_str(")?");
            }
        }
    }
}

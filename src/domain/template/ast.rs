// Abstract Syntax Tree types for route templates

/// A parsed route template: literal text, keys and optional groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pub nodes: Vec<TemplateNode>,
}

impl Template {
    pub fn new(source: impl Into<String>, nodes: Vec<TemplateNode>) -> Self {
        Self {
            source: source.into(),
            nodes,
        }
    }

    /// The template text this tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All key names in the order they appear, including those inside groups
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        collect_keys(&self.nodes, &mut keys);
        keys
    }

    /// Whether the template contains at least one optional group
    pub fn has_groups(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, TemplateNode::Group(_)))
    }
}

fn collect_keys<'a>(nodes: &'a [TemplateNode], keys: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            TemplateNode::Literal(_) => {}
            TemplateNode::Key(name) => keys.push(name),
            TemplateNode::Group(children) => collect_keys(children, keys),
        }
    }
}

/// One piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    Literal(String),
    /// `<name>`
    Key(String),
    /// `( ... )`, may nest
    Group(Vec<TemplateNode>),
}

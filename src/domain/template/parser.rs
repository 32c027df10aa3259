// Template parser using recursive descent
//
// Grammar:
//   template := (literal | key | group)*
//   key      := '<' [a-zA-Z0-9_]+ '>'
//   group    := '(' template ')'

use crate::error::CompileError;

use super::ast::{Template, TemplateNode};

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn parse(template: &'a str) -> Result<Template, CompileError> {
        let mut parser = Self {
            input: template,
            pos: 0,
        };
        let nodes = parser.parse_sequence(None)?;
        Ok(Template::new(template, nodes))
    }

    /// Parse nodes until end of input, or until the `)` closing the group
    /// opened at `group_start`.
    fn parse_sequence(&mut self, group_start: Option<usize>) -> Result<Vec<TemplateNode>, CompileError> {
        let mut nodes = Vec::new();
        let mut literal_buf = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '<' => {
                    flush_literal(&mut literal_buf, &mut nodes);
                    let name = self.parse_key()?;
                    nodes.push(TemplateNode::Key(name));
                }
                '(' => {
                    flush_literal(&mut literal_buf, &mut nodes);
                    let start = self.pos;
                    self.consume_char();
                    let children = self.parse_sequence(Some(start))?;
                    nodes.push(TemplateNode::Group(children));
                }
                ')' => {
                    if group_start.is_none() {
                        return Err(CompileError::UnbalancedGroup { position: self.pos });
                    }
                    self.consume_char();
                    flush_literal(&mut literal_buf, &mut nodes);
                    return Ok(nodes);
                }
                '>' => {
                    return Err(CompileError::InvalidKey {
                        position: self.pos,
                        reason: "'>' without a matching '<'".to_string(),
                    });
                }
                _ => {
                    self.consume_char();
                    literal_buf.push(ch);
                }
            }
        }

        if let Some(position) = group_start {
            return Err(CompileError::UnclosedGroup { position });
        }

        flush_literal(&mut literal_buf, &mut nodes);
        Ok(nodes)
    }

    fn parse_key(&mut self) -> Result<String, CompileError> {
        let start = self.pos;
        self.consume_char(); // <

        let mut name = String::new();
        loop {
            match self.peek_char() {
                Some('>') => {
                    self.consume_char();
                    break;
                }
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => {
                    self.consume_char();
                    name.push(ch);
                }
                Some(ch) => {
                    return Err(CompileError::InvalidKey {
                        position: self.pos,
                        reason: format!("invalid character '{}' in key name", ch),
                    });
                }
                None => {
                    return Err(CompileError::InvalidKey {
                        position: start,
                        reason: "key is never closed with '>'".to_string(),
                    });
                }
            }
        }

        if name.is_empty() {
            return Err(CompileError::InvalidKey {
                position: start,
                reason: "empty key name".to_string(),
            });
        }

        // Capture names may not start with a digit
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(CompileError::InvalidKey {
                position: start,
                reason: format!("key name '{}' starts with a digit", name),
            });
        }

        Ok(name)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

fn flush_literal(buf: &mut String, nodes: &mut Vec<TemplateNode>) {
    if !buf.is_empty() {
        nodes.push(TemplateNode::Literal(std::mem::take(buf)));
    }
}

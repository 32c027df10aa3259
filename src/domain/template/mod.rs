// Route template module
//
// A template is parsed once into a tree of literals, keys and optional groups.
// The compiler turns that tree into an anchored regular expression for
// matching, and the resolver walks the same tree to rebuild a path.

mod ast;
mod compiler;
mod parser;
mod resolver;

pub use ast::{Template, TemplateNode};
pub use compiler::{compile, compile_template, CompiledMatcher, DEFAULT_SEGMENT};
pub use parser::TemplateParser;
pub use resolver::{MissingParam, TemplateResolver};

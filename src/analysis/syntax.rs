//! Tree-sitter backed function/class extraction.

use super::{AnalysisFailure, FileAnalyzer};
use crate::domain::{FileSummary, Language};
use std::fs;
use std::path::Path;
use tree_sitter::{Node, Parser};

pub struct TreeSitterAnalyzer;

/// Languages with a bundled grammar.
pub fn supported_grammars() -> Vec<Language> {
    Language::ALL.into_iter().filter(|lang| lang.has_grammar()).collect()
}

struct NodeKinds {
    grammar: tree_sitter::Language,
    functions: &'static [&'static str],
    classes: &'static [&'static str],
}

fn node_kinds(language: Language) -> Option<NodeKinds> {
    let kinds = match language {
        Language::Python => NodeKinds {
            grammar: tree_sitter_python::LANGUAGE.into(),
            functions: &["function_definition"],
            classes: &["class_definition"],
        },
        Language::JavaScript => NodeKinds {
            grammar: tree_sitter_javascript::LANGUAGE.into(),
            functions: &[
                "function_declaration",
                "generator_function_declaration",
                "function_expression",
                "method_definition",
            ],
            classes: &["class_declaration", "class"],
        },
        Language::TypeScript => NodeKinds {
            grammar: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            functions: &[
                "function_declaration",
                "generator_function_declaration",
                "function_expression",
                "method_definition",
            ],
            classes: &["class_declaration", "abstract_class_declaration", "interface_declaration"],
        },
        Language::Rust => NodeKinds {
            grammar: tree_sitter_rust::LANGUAGE.into(),
            functions: &["function_item"],
            classes: &["struct_item", "enum_item", "trait_item", "union_item"],
        },
        Language::Go => NodeKinds {
            grammar: tree_sitter_go::LANGUAGE.into(),
            functions: &["function_declaration", "method_declaration"],
            classes: &["type_declaration"],
        },
        _ => return None,
    };
    Some(kinds)
}

impl Default for TreeSitterAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSitterAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze in-memory source for `language`.
    pub fn analyze_source(
        &self,
        path: &Path,
        language: Language,
        source: &str,
    ) -> Result<FileSummary, AnalysisFailure> {
        let Some(kinds) = node_kinds(language) else {
            return Ok(FileSummary::empty(Some(language)));
        };

        let mut parser = Parser::new();
        parser
            .set_language(&kinds.grammar)
            .map_err(|err| AnalysisFailure::Grammar(language, err.to_string()))?;
        let tree =
            parser.parse(source, None).ok_or_else(|| AnalysisFailure::Parse(path.to_path_buf()))?;

        let mut summary = FileSummary::empty(Some(language));
        visit_preorder(tree.root_node(), |node| {
            let kind = node.kind();
            let bucket = if kinds.functions.contains(&kind) {
                &mut summary.functions
            } else if kinds.classes.contains(&kind) {
                &mut summary.classes
            } else {
                return;
            };
            if let Ok(text) = node.utf8_text(source.as_bytes()) {
                bucket.push(text.to_string());
            }
        });
        Ok(summary)
    }
}

impl FileAnalyzer for TreeSitterAnalyzer {
    fn analyze(&self, path: &Path) -> Result<FileSummary, AnalysisFailure> {
        let Some(language) = Language::from_path(path) else {
            return Ok(FileSummary::empty(None));
        };
        if !language.has_grammar() {
            return Ok(FileSummary::empty(Some(language)));
        }
        let source = fs::read_to_string(path)
            .map_err(|source| AnalysisFailure::Read { path: path.to_path_buf(), source })?;
        self.analyze_source(path, language, &source)
    }
}

/// Visit every node in document order.
fn visit_preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

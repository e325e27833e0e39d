// Java parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Parser for Java source files
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    /// Create a new Java parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::language();
        parser.set_language(&language).map_err(|e| {
            Error::Parser(format!("Failed to set Java language: {}", e))
        })?;
        Ok(Self { parser })
    }

    /// Parse a Java file
    pub fn parse_file(&mut self, path: &Path) -> Result<CompilationUnit> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })?;
        let source = String::from_utf8(bytes)
            .map_err(|_| Error::parse(path, "source is not valid UTF-8"))?;

        self.parse_source(&source, path.to_path_buf())
    }

    /// Parse Java source code
    pub fn parse_source(&mut self, source: &str, path: PathBuf) -> Result<CompilationUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(&path, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => format!(
                    "syntax error at line {}, column {}",
                    node.start_position().row + 1,
                    node.start_position().column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(Error::parse(&path, message));
        }

        let src = source.as_bytes();
        let mut unit = CompilationUnit::new(path);

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    unit.package = qualified_name_child(&child, src);
                }
                "import_declaration" => {
                    if let Some(import) = parse_import(&child, src) {
                        unit.imports.push(import);
                    }
                }
                "class_declaration" | "interface_declaration" => {
                    if let Some(decl) = parse_type_decl(&child, src) {
                        unit.types.push(decl);
                    }
                }
                "enum_declaration" | "record_declaration" => {
                    collect_contained_types(&child, src, &mut unit.types);
                }
                _ => {}
            }
        }

        collect_annotation_names(root, src, &mut unit.annotations);

        Ok(unit)
    }
}

/// Collapse whitespace in a type as written, producing `Map<String, User>` style text
pub fn normalize_type(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            if matches!(prev, Some('<' | '[' | ',' | '.' | ' '))
                || matches!(next, Some('<' | '>' | '[' | ']' | ',' | '.'))
            {
                continue;
            }
        }
        out.push(c);
        if c == ',' {
            out.push(' ');
        }
    }

    out
}

/// Collapse runs of whitespace to single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn node_text(node: &Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or_default().to_string()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn qualified_name_child(node: &Node, src: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
        .map(|c| node_text(&c, src));
    found
}

/// Parse an import declaration
fn parse_import(node: &Node, src: &[u8]) -> Option<ImportDecl> {
    let name = qualified_name_child(node, src)?;
    let mut is_static = false;
    let mut is_wildcard = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "static" => is_static = true,
            "asterisk" | "*" => is_wildcard = true,
            _ => {}
        }
    }

    Some(ImportDecl {
        name,
        is_static,
        is_wildcard,
    })
}

/// Visibility and simple annotation names from a declaration's modifiers
fn parse_modifiers(node: &Node, src: &[u8]) -> (Visibility, Vec<String>) {
    let mut visibility = Visibility::Package;
    let mut annotations = Vec::new();

    let mut cursor = node.walk();
    let modifiers = node.children(&mut cursor).find(|c| c.kind() == "modifiers");

    if let Some(modifiers) = modifiers {
        let mut mod_cursor = modifiers.walk();
        for child in modifiers.children(&mut mod_cursor) {
            match child.kind() {
                "public" => visibility = Visibility::Public,
                "protected" => visibility = Visibility::Protected,
                "private" => visibility = Visibility::Private,
                "marker_annotation" | "annotation" => {
                    if let Some(name) = annotation_name(&child, src) {
                        annotations.push(name);
                    }
                }
                _ => {}
            }
        }
    }

    (visibility, annotations)
}

fn annotation_name(node: &Node, src: &[u8]) -> Option<String> {
    let name = node_text(&node.child_by_field_name("name")?, src);
    Some(name.rsplit('.').next().unwrap_or(&name).to_string())
}

/// Types listed under a `superclass`, `super_interfaces` or `extends_interfaces` clause
fn clause_types(node: &Node, src: &[u8]) -> Vec<String> {
    let mut types = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            let mut list_cursor = child.walk();
            for ty in child.named_children(&mut list_cursor) {
                types.push(normalize_type(&node_text(&ty, src)));
            }
        } else {
            types.push(normalize_type(&node_text(&child, src)));
        }
    }
    types
}

/// Parse a class or interface declaration with its body
fn parse_type_decl(node: &Node, src: &[u8]) -> Option<TypeDecl> {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        _ => return None,
    };
    let name = node_text(&node.child_by_field_name("name")?, src);
    let mut decl = TypeDecl::new(kind, &name);

    let (_, annotations) = parse_modifiers(node, src);
    decl.annotations = annotations;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "superclass" | "extends_interfaces" => decl.extends.extend(clause_types(&child, src)),
            "super_interfaces" => decl.implements.extend(clause_types(&child, src)),
            _ => {}
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        parse_body(&body, src, &mut decl);
    }

    Some(decl)
}

/// Class and interface declarations inside enums and records
fn collect_contained_types(node: &Node, src: &[u8], out: &mut Vec<TypeDecl>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "class_declaration" | "interface_declaration" => {
                if let Some(decl) = parse_type_decl(&child, src) {
                    out.push(decl);
                }
            }
            "enum_declaration" | "record_declaration" | "enum_body" | "enum_body_declarations"
            | "class_body" => collect_contained_types(&child, src, out),
            _ => {}
        }
    }
}

fn parse_body(body: &Node, src: &[u8], decl: &mut TypeDecl) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "field_declaration" | "constant_declaration" => {
                let field = parse_field(&member, src);
                for var in &field.variables {
                    if let Some(value) = find_declarator_value(&member, &var.name, src) {
                        collect_exprs(&value, src, &mut decl.initializers, &mut decl.nested);
                    }
                }
                decl.fields.push(field);
            }
            "method_declaration" => {
                if let Some(method) = parse_method(&member, src, &mut decl.nested) {
                    decl.methods.push(method);
                }
            }
            "constructor_declaration" => {
                decl.constructors.push(parse_constructor(&member, src, &mut decl.nested));
            }
            "class_declaration" | "interface_declaration" => {
                if let Some(nested) = parse_type_decl(&member, src) {
                    decl.nested.push(nested);
                }
            }
            "enum_declaration" | "record_declaration" => {
                collect_contained_types(&member, src, &mut decl.nested);
            }
            "block" | "static_initializer" => {
                collect_exprs(&member, src, &mut decl.initializers, &mut decl.nested);
            }
            _ => {}
        }
    }
}

fn find_declarator_value<'a>(field: &Node<'a>, name: &str, src: &[u8]) -> Option<Node<'a>> {
    let mut cursor = field.walk();
    let declarators: Vec<Node<'a>> = field.children_by_field_name("declarator", &mut cursor).collect();
    declarators.into_iter().find_map(|d| {
        let matches = d
            .child_by_field_name("name")
            .map(|n| node_text(&n, src) == name)
            .unwrap_or(false);
        if matches {
            d.child_by_field_name("value")
        } else {
            None
        }
    })
}

fn parse_declarator(node: &Node, src: &[u8]) -> Option<VarDeclarator> {
    let name = node_text(&node.child_by_field_name("name")?, src);
    let dimensions = node
        .child_by_field_name("dimensions")
        .map(|d| node_text(&d, src).matches('[').count())
        .unwrap_or(0);
    let initializer = node.child_by_field_name("value").map(|value| Initializer {
        text: collapse_whitespace(&node_text(&value, src)),
        created_type: created_type(&value, src),
    });

    Some(VarDeclarator {
        name,
        dimensions,
        initializer,
    })
}

fn created_type(node: &Node, src: &[u8]) -> Option<String> {
    if node.kind() != "object_creation_expression" {
        return None;
    }
    node.child_by_field_name("type")
        .map(|t| normalize_type(&node_text(&t, src)))
}

/// Parse a field or interface constant declaration
fn parse_field(node: &Node, src: &[u8]) -> FieldDecl {
    let (visibility, annotations) = parse_modifiers(node, src);
    let type_node = node.child_by_field_name("type");
    let type_text = type_node
        .map(|t| normalize_type(&node_text(&t, src)))
        .unwrap_or_default();
    let element_type = match type_node {
        Some(t) if t.kind() == "array_type" => t
            .child_by_field_name("element")
            .map(|e| normalize_type(&node_text(&e, src)))
            .unwrap_or_else(|| type_text.trim_end_matches("[]").to_string()),
        _ => type_text.clone(),
    };

    let mut cursor = node.walk();
    let variables = node
        .children_by_field_name("declarator", &mut cursor)
        .filter_map(|d| parse_declarator(&d, src))
        .collect();

    FieldDecl {
        visibility,
        type_text,
        element_type,
        annotations,
        variables,
    }
}

fn parse_params(node: &Node, src: &[u8]) -> Vec<Param> {
    let mut params = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "formal_parameter" => {
                let type_text = child
                    .child_by_field_name("type")
                    .map(|t| normalize_type(&node_text(&t, src)))
                    .unwrap_or_default();
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, src))
                    .unwrap_or_default();
                let dims = child
                    .child_by_field_name("dimensions")
                    .map(|d| "[]".repeat(node_text(&d, src).matches('[').count()))
                    .unwrap_or_default();
                params.push(Param {
                    name,
                    type_text: format!("{}{}", type_text, dims),
                });
            }
            "spread_parameter" => {
                // modifiers? type "..." variable_declarator
                let mut inner = child.walk();
                let mut type_text = String::new();
                let mut name = String::new();
                for part in child.named_children(&mut inner) {
                    match part.kind() {
                        "modifiers" => {}
                        "variable_declarator" => {
                            name = part
                                .child_by_field_name("name")
                                .map(|n| node_text(&n, src))
                                .unwrap_or_default();
                        }
                        _ if type_text.is_empty() => {
                            type_text = normalize_type(&node_text(&part, src));
                        }
                        _ => {}
                    }
                }
                params.push(Param {
                    name,
                    type_text: format!("{}...", type_text),
                });
            }
            _ => {}
        }
    }

    params
}

fn parse_throws(node: &Node, src: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let throws = node.children(&mut cursor).find(|c| c.kind() == "throws");
    let Some(throws) = throws else {
        return Vec::new();
    };

    let mut inner = throws.walk();
    let types = throws
        .named_children(&mut inner)
        .map(|t| normalize_type(&node_text(&t, src)))
        .collect();
    types
}

/// Parse a method declaration; local classes in the body are added to `locals`
fn parse_method(node: &Node, src: &[u8], locals: &mut Vec<TypeDecl>) -> Option<MethodDecl> {
    let name = node_text(&node.child_by_field_name("name")?, src);
    let (visibility, annotations) = parse_modifiers(node, src);
    let return_type = node
        .child_by_field_name("type")
        .map(|t| normalize_type(&node_text(&t, src)))
        .unwrap_or_else(|| "void".to_string());
    let params = node
        .child_by_field_name("parameters")
        .map(|p| parse_params(&p, src))
        .unwrap_or_default();

    let body = node.child_by_field_name("body").map(|block| {
        let mut exprs = Vec::new();
        collect_exprs(&block, src, &mut exprs, locals);
        exprs
    });

    Some(MethodDecl {
        name,
        visibility,
        return_type,
        params,
        annotations,
        throws: parse_throws(node, src),
        body,
    })
}

fn parse_constructor(node: &Node, src: &[u8], locals: &mut Vec<TypeDecl>) -> ConstructorDecl {
    let params = node
        .child_by_field_name("parameters")
        .map(|p| parse_params(&p, src))
        .unwrap_or_default();

    let mut body = Vec::new();
    if let Some(block) = node.child_by_field_name("body") {
        collect_exprs(&block, src, &mut body, locals);
    }

    ConstructorDecl {
        params,
        throws: parse_throws(node, src),
        body,
    }
}

fn local_variable(type_node: Option<Node>, declarators: Vec<VarDeclarator>, src: &[u8]) -> Option<Expr> {
    let type_text = normalize_type(&node_text(&type_node?, src));
    Some(Expr::LocalVariable {
        type_text,
        declarators,
    })
}

/// Collect expressions of interest in pre-order; local class declarations go to `locals`
fn collect_exprs(node: &Node, src: &[u8], out: &mut Vec<Expr>, locals: &mut Vec<TypeDecl>) {
    match node.kind() {
        "class_declaration" | "interface_declaration" => {
            if let Some(decl) = parse_type_decl(node, src) {
                locals.push(decl);
            }
            return;
        }
        "enum_declaration" | "record_declaration" => {
            collect_contained_types(node, src, locals);
            return;
        }
        "object_creation_expression" => {
            if let Some(type_name) = created_type(node, src) {
                out.push(Expr::ObjectCreation { type_name });
            }
        }
        "method_invocation" => {
            let scope = node
                .child_by_field_name("object")
                .map(|o| collapse_whitespace(&node_text(&o, src)));
            if let Some(name) = node.child_by_field_name("name") {
                out.push(Expr::MethodCall {
                    scope,
                    name: node_text(&name, src),
                });
            }
        }
        "local_variable_declaration" => {
            let mut cursor = node.walk();
            let declarators = node
                .children_by_field_name("declarator", &mut cursor)
                .filter_map(|d| parse_declarator(&d, src))
                .collect();
            if let Some(expr) = local_variable(node.child_by_field_name("type"), declarators, src) {
                out.push(expr);
            }
        }
        "enhanced_for_statement" | "resource" => {
            let declarator = node.child_by_field_name("name").map(|n| VarDeclarator {
                name: node_text(&n, src),
                dimensions: 0,
                initializer: node.child_by_field_name("value").map(|v| Initializer {
                    text: collapse_whitespace(&node_text(&v, src)),
                    created_type: created_type(&v, src),
                }),
            });
            if let Some(declarator) = declarator {
                if let Some(expr) =
                    local_variable(node.child_by_field_name("type"), vec![declarator], src)
                {
                    out.push(expr);
                }
            }
        }
        "lambda_expression" => out.push(Expr::Lambda),
        "method_reference" => {
            let mut cursor = node.walk();
            let scope = node.named_children(&mut cursor).next();
            if let Some(scope) = scope {
                out.push(Expr::MethodReference {
                    scope: collapse_whitespace(&node_text(&scope, src)),
                });
            }
        }
        "catch_clause" => {
            let mut types = Vec::new();
            let mut cursor = node.walk();
            for param in node.named_children(&mut cursor) {
                if param.kind() != "catch_formal_parameter" {
                    continue;
                }
                let mut param_cursor = param.walk();
                for part in param.named_children(&mut param_cursor) {
                    if part.kind() == "catch_type" {
                        let mut type_cursor = part.walk();
                        for ty in part.named_children(&mut type_cursor) {
                            types.push(normalize_type(&node_text(&ty, src)));
                        }
                    }
                }
            }
            out.push(Expr::Catch { types });
        }
        _ => {}
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        collect_exprs(&child, src, out, locals);
    }
}

/// Simple names of every annotation in the tree
fn collect_annotation_names(root: Node, src: &[u8], out: &mut Vec<String>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if matches!(node.kind(), "marker_annotation" | "annotation") {
            if let Some(name) = annotation_name(&node, src) {
                out.push(name);
            }
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

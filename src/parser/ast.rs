// Syntax model for parsed Java compilation units
//
// A closed set of owned node kinds extracted from the tree-sitter tree.
// Analysis passes match over these instead of walking raw syntax nodes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed Java source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilationUnit {
    /// Path of the source file
    pub path: PathBuf,
    /// Package declaration, if any
    pub package: Option<String>,
    /// Import declarations in source order
    pub imports: Vec<ImportDecl>,
    /// Top-level class and interface declarations (nested ones hang off these)
    pub types: Vec<TypeDecl>,
    /// Simple names of every annotation used anywhere in the file
    pub annotations: Vec<String>,
}

impl CompilationUnit {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            package: None,
            imports: Vec::new(),
            types: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// All declarations in pre-order: each type followed by its nested types
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        for ty in &self.types {
            ty.collect_preorder(&mut out);
        }
        out
    }

    /// Name of the first top-level declaration
    pub fn primary_type_name(&self) -> Option<&str> {
        self.types.first().map(|t| t.name.as_str())
    }

    /// Find the field type for a variable name across all declarations
    pub fn field_type_of(&self, variable: &str) -> Option<&str> {
        self.all_types().into_iter().find_map(|ty| {
            ty.fields
                .iter()
                .find(|f| f.variables.iter().any(|v| v.name == variable))
                .map(|f| f.element_type.as_str())
        })
    }
}

/// An import declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportDecl {
    /// Imported name without `import`, `static` and `.*`
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

/// Class or interface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

impl Visibility {
    /// UML visibility marker
    pub fn symbol(&self) -> char {
        match self {
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Public | Visibility::Package => '+',
        }
    }
}

/// A class or interface declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    /// Simple annotation names on the declaration
    pub annotations: Vec<String>,
    /// `extends` types (superclass for classes, super-interfaces for interfaces)
    pub extends: Vec<String>,
    /// `implements` types
    pub implements: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
    /// Expressions in field initializers and initializer blocks
    pub initializers: Vec<Expr>,
    /// Member and local classes declared inside this one
    pub nested: Vec<TypeDecl>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            annotations: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            initializers: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    fn collect_preorder<'a>(&'a self, out: &mut Vec<&'a TypeDecl>) {
        out.push(self);
        for nested in &self.nested {
            nested.collect_preorder(out);
        }
    }

    /// Every declaration nested at any depth below this one
    pub fn descendants(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        for nested in &self.nested {
            nested.collect_preorder(&mut out);
        }
        out
    }

    /// Expressions owned directly by this declaration, excluding nested declarations
    pub fn own_exprs(&self) -> impl Iterator<Item = &Expr> {
        self.initializers
            .iter()
            .chain(self.constructors.iter().flat_map(|c| c.body.iter()))
            .chain(self.methods.iter().flat_map(|m| m.body.iter().flatten()))
    }

    /// Expressions owned by this declaration and every nested declaration
    pub fn deep_exprs(&self) -> Vec<&Expr> {
        let mut out: Vec<&Expr> = self.own_exprs().collect();
        for nested in self.descendants() {
            out.extend(nested.own_exprs());
        }
        out
    }
}

/// A field declaration, possibly declaring several variables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDecl {
    pub visibility: Visibility,
    /// Declared type as written (normalized whitespace)
    pub type_text: String,
    /// Declared type without array dimensions
    pub element_type: String,
    pub annotations: Vec<String>,
    pub variables: Vec<VarDeclarator>,
}

impl FieldDecl {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Type of the first declared variable, including declarator dimensions
    pub fn first_variable_type(&self) -> String {
        match self.variables.first() {
            Some(var) if var.dimensions > 0 => {
                format!("{}{}", self.type_text, "[]".repeat(var.dimensions))
            }
            _ => self.type_text.clone(),
        }
    }
}

/// One variable in a field or local declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    /// Extra `[]` written after the name
    pub dimensions: usize,
    pub initializer: Option<Initializer>,
}

/// Initializer expression of a variable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Initializer {
    pub text: String,
    /// Type instantiated when the initializer is a `new` expression
    pub created_type: Option<String>,
}

/// A method or constructor parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_text: String,
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_text, self.name)
    }
}

/// A method declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub visibility: Visibility,
    pub return_type: String,
    pub params: Vec<Param>,
    pub annotations: Vec<String>,
    pub throws: Vec<String>,
    /// `None` for abstract and interface methods
    pub body: Option<Vec<Expr>>,
}

impl MethodDecl {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Parameter list as `Type name, Type name`
    pub fn param_list(&self) -> String {
        self.params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A constructor declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructorDecl {
    pub params: Vec<Param>,
    pub throws: Vec<String>,
    pub body: Vec<Expr>,
}

impl ConstructorDecl {
    /// Types instantiated with `new` in the constructor body
    pub fn created_types(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|e| match e {
            Expr::ObjectCreation { type_name } => Some(type_name.as_str()),
            _ => None,
        })
    }
}

/// Expression-level constructs relevant to relationship detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Expr {
    /// `new Type(...)`
    ObjectCreation { type_name: String },
    /// `scope.name(...)` or `name(...)`
    MethodCall { scope: Option<String>, name: String },
    /// Local variable, for-each variable or try resource
    LocalVariable {
        type_text: String,
        declarators: Vec<VarDeclarator>,
    },
    /// `(args) -> body`
    Lambda,
    /// `Scope::name`
    MethodReference { scope: String },
    /// `catch (A | B e)`
    Catch { types: Vec<String> },
}

impl Expr {
    /// Whether a local variable is declared with `var`
    pub fn is_inferred_local(&self) -> bool {
        matches!(self, Expr::LocalVariable { type_text, .. } if type_text == "var")
    }
}

// Name resolution: maps type text to project-local class names
//
// Resolution is syntactic. A name counts as a project class when a walked
// file `<Name>.java` exists under the analyzed root, or when a parsed unit
// declares a class of that name.

use crate::analysis::walker::SourceWalker;
use crate::parser::CompilationUnit;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Built-in, JDK and framework names that never become edge endpoints
pub const NATIVE_TYPES: &[&str] = &[
    "String", "Integer", "Boolean", "Long", "Double", "Float", "Character", "Byte", "Short",
    "int", "boolean", "long", "double", "float", "char", "byte", "short", "void",
    "Object", "Class", "Exception", "RuntimeException", "Throwable", "System", "Thread",
    "List", "ArrayList", "LinkedList", "Set", "HashSet", "LinkedHashSet", "TreeSet",
    "Map", "HashMap", "LinkedHashMap", "TreeMap", "Collection", "Queue", "Deque",
    "Date", "Calendar", "LocalDate", "LocalDateTime", "Optional", "Stream",
    "BigDecimal", "BigInteger", "UUID", "Pattern", "Matcher",
    "Model", "RedirectAttributes", "HttpServletRequest", "HttpServletResponse",
    "MultipartFile", "ResponseEntity", "RequestMapping", "GetMapping", "PostMapping", "Void",
];

pub fn is_native(name: &str) -> bool {
    NATIVE_TYPES.contains(&name)
}

/// Reduce type text to its simple class name.
///
/// `java.util.List<com.shop.User>` becomes `List`, `User[]` becomes `User`,
/// `? extends Shape` becomes `Shape`.
pub fn simple_name(type_text: &str) -> String {
    let mut name = type_text.trim();
    name = name.trim_end_matches("...");
    if let Some(pos) = name.find('<') {
        name = &name[..pos];
    }
    while let Some(stripped) = name.trim_end().strip_suffix("[]") {
        name = stripped;
    }
    let name = name.split_whitespace().last().unwrap_or("");
    name.rsplit('.').next().unwrap_or(name).trim().to_string()
}

/// Top-level type arguments of a generic type, split at depth zero.
///
/// `Map<String, List<User>>` yields `["String", "List<User>"]`.
pub fn type_arguments(type_text: &str) -> Vec<&str> {
    let (Some(open), Some(close)) = (type_text.find('<'), type_text.rfind('>')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }

    let inner = &type_text[open + 1..close];
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args.retain(|a| !a.is_empty());
    args
}

/// Best-effort type of an expression, such as a call scope or an initializer.
///
/// `Type.member` resolves to `Type`; a bare name resolves through the unit's
/// field declarations; anything else falls back to [`simple_name`].
pub fn expression_type(expr: &str, unit: &CompilationUnit) -> String {
    let expr = expr.trim();
    let expr = expr.strip_prefix("this.").unwrap_or(expr);

    if starts_uppercase(expr) {
        if let Some(dot) = expr.find('.') {
            return simple_name(&expr[..dot]);
        }
    }

    if let Some(field_type) = unit.field_type_of(expr) {
        return simple_name(field_type);
    }

    simple_name(expr)
}

pub fn starts_uppercase(text: &str) -> bool {
    text.chars().next().map_or(false, |c| c.is_uppercase())
}

/// Decides whether a simple name refers to a class in the analyzed project
pub trait TypeResolver: Send + Sync {
    fn is_project_class(&self, simple: &str) -> bool;

    /// Simple name of `type_text` when it may be an edge endpoint
    fn admit(&self, type_text: &str) -> Option<String> {
        let simple = simple_name(type_text);
        if simple.is_empty() || is_native(&simple) || !self.is_project_class(&simple) {
            return None;
        }
        Some(simple)
    }
}

/// Index of project class names: walked `<Name>.java` file stems plus
/// every class declared in the parsed units
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    base: PathBuf,
    names: HashSet<String>,
}

impl ProjectIndex {
    /// Record the stem of every file the walker yields, so excluded
    /// directories never contribute names
    pub fn build(walker: &SourceWalker) -> Self {
        let names: HashSet<String> = walker
            .files()
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_string)
            })
            .collect();

        tracing::debug!(
            "Indexed {} class files under {}",
            names.len(),
            walker.root().display()
        );

        Self {
            base: walker.root().to_path_buf(),
            names,
        }
    }

    /// Add every type declared in `unit`, nested and secondary ones included
    pub fn declare(&mut self, unit: &CompilationUnit) {
        for decl in unit.all_types() {
            if !decl.name.is_empty() && self.names.insert(decl.name.clone()) {
                tracing::debug!("Declared class {} in {}", decl.name, unit.path.display());
            }
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: PathBuf::new(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TypeResolver for ProjectIndex {
    fn is_project_class(&self, simple: &str) -> bool {
        self.names.contains(simple)
    }
}

// Annotation analysis: stereotypes, usage statistics and architectural hints

use crate::parser::{CompilationUnit, TypeDecl};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};

/// Annotations rendered as stereotypes on the class header
pub const STEREOTYPES: &[(&str, &str)] = &[
    ("Entity", "<<Entity>>"),
    ("Service", "<<Service>>"),
    ("Controller", "<<Controller>>"),
    ("RestController", "<<RestController>>"),
    ("Repository", "<<Repository>>"),
    ("Component", "<<Component>>"),
    ("Configuration", "<<Configuration>>"),
    ("Autowired", "<<Autowired>>"),
    ("Transactional", "<<Transactional>>"),
    ("RequestMapping", "<<Endpoint>>"),
];

/// Annotations counted in per-run statistics
pub const IMPORTANT_ANNOTATIONS: &[&str] = &[
    "Entity",
    "Table",
    "Service",
    "Controller",
    "RestController",
    "Repository",
    "Component",
    "Configuration",
    "Autowired",
    "Transactional",
    "RequestMapping",
    "GetMapping",
    "PostMapping",
    "PutMapping",
    "DeleteMapping",
    "Override",
    "Deprecated",
];

const VALUE_TYPES: &[&str] = &[
    "String", "int", "Integer", "long", "Long", "double", "Double", "boolean", "Boolean",
    "float", "Float", "char", "Character", "byte", "Byte", "short", "Short",
];

pub fn stereotype_for(annotation: &str) -> Option<&'static str> {
    STEREOTYPES
        .iter()
        .find(|(name, _)| *name == annotation)
        .map(|(_, tag)| *tag)
}

/// Stereotype tags for a declaration, in annotation order
pub fn stereotypes(decl: &TypeDecl) -> Vec<String> {
    decl.annotations
        .iter()
        .filter_map(|a| {
            let tag = stereotype_for(a)?;
            tracing::debug!("Annotation {} on {}", a, decl.name);
            Some(tag.to_string())
        })
        .collect()
}

/// Count important annotations used anywhere in the unit
pub fn annotation_statistics(unit: &CompilationUnit) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for name in &unit.annotations {
        if IMPORTANT_ANNOTATIONS.contains(&name.as_str()) {
            *stats.entry(name.clone()).or_insert(0) += 1;
        }
    }
    stats
}

/// Architectural patterns suggested by annotation co-occurrence in one unit
pub fn detect_patterns(unit: &CompilationUnit) -> Vec<String> {
    let found: HashSet<&str> = unit.annotations.iter().map(String::as_str).collect();
    let mut patterns = Vec::new();

    if (found.contains("Controller") || found.contains("RestController"))
        && found.contains("Service")
        && found.contains("Repository")
    {
        patterns.push("MVC Pattern".to_string());
    }

    if found.contains("Entity") && found.contains("Repository") {
        patterns.push("JPA/Data Access Pattern".to_string());
    }

    if found.contains("SpringBootApplication")
        || (found.contains("Configuration") && found.contains("Autowired"))
    {
        patterns.push("Spring Boot Pattern".to_string());
    }

    if found
        .iter()
        .any(|a| a.ends_with("Mapping") || *a == "RestController")
    {
        patterns.push("REST API Pattern".to_string());
    }

    patterns
}

/// Injected dependency types per class: `@Autowired` fields and
/// non-value constructor parameters
pub fn extract_injections(unit: &CompilationUnit) -> IndexMap<String, Vec<String>> {
    let mut injections = IndexMap::new();

    for decl in unit.all_types() {
        let mut deps = Vec::new();

        for field in decl.fields.iter().filter(|f| f.has_annotation("Autowired")) {
            deps.push(field.first_variable_type());
        }

        for ctor in &decl.constructors {
            for param in &ctor.params {
                if !VALUE_TYPES.contains(&param.type_text.as_str()) {
                    deps.push(param.type_text.clone());
                }
            }
        }

        if !deps.is_empty() {
            tracing::debug!("Injected into {}: {:?}", decl.name, deps);
            injections.insert(decl.name.clone(), deps);
        }
    }

    injections
}

// Relationship engine: typed edges between project classes
//
// Each detection pass reads one compilation unit and offers candidate edges to
// an `EdgeSink`, which applies the admission rule and inserts into the shared
// context. Passes never short-circuit each other; duplicates are dropped at
// insertion.

use crate::analysis::context::AnalysisContext;
use crate::analysis::resolve::{
    expression_type, is_native, simple_name, starts_uppercase, type_arguments, TypeResolver,
};
use crate::config::AnalysisConfig;
use crate::parser::{CompilationUnit, Expr, FieldDecl, TypeDecl};
use serde::Serialize;
use std::fmt;

/// Edge shape, rendered as a PlantUML arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    Inheritance,
    Implementation,
    Association,
    Aggregation,
    Composition,
    Dependency,
}

impl EdgeKind {
    pub fn arrow(&self) -> &'static str {
        match self {
            EdgeKind::Inheritance => "--|>",
            EdgeKind::Implementation => "..|>",
            EdgeKind::Association => "-->",
            EdgeKind::Aggregation => "o--",
            EdgeKind::Composition => "*--",
            EdgeKind::Dependency => "..>",
        }
    }
}

/// Edge endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// A class declared in the analyzed tree
    Class(String),
    /// A placeholder or library concept such as "Stream API"
    Concept(String),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Class(name) | Target::Concept(name) => name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Concept(name) if name.contains(' ') => write!(f, "\"{}\"", name),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// A directed, typed edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: String,
    pub kind: EdgeKind,
    pub target: Target,
    /// Target-side multiplicity, e.g. `*` for collections
    pub multiplicity: Option<String>,
    /// Stereotype label without the `<<` `>>` delimiters
    pub label: Option<String>,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.kind.arrow())?;
        if let Some(multiplicity) = &self.multiplicity {
            write!(f, " \"{}\"", multiplicity)?;
        }
        write!(f, " {}", self.target)?;
        if let Some(label) = &self.label {
            write!(f, " : <<{}>>", label)?;
        }
        Ok(())
    }
}

/// Detection pass that produced an edge, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Inheritance,
    Implementation,
    Constructor,
    Field,
    Method,
    Import,
    LikelyInject,
    Nested,
    StaticCall,
    Exception,
    Generic,
    Override,
    Functional,
    VarInference,
    FunctionalInterface,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::Inheritance => "inheritance",
            Pass::Implementation => "implementation",
            Pass::Constructor => "constructor",
            Pass::Field => "field",
            Pass::Method => "method",
            Pass::Import => "import",
            Pass::LikelyInject => "likely-inject",
            Pass::Nested => "nested",
            Pass::StaticCall => "static-call",
            Pass::Exception => "exception",
            Pass::Generic => "generic",
            Pass::Override => "override",
            Pass::Functional => "functional",
            Pass::VarInference => "var-inference",
            Pass::FunctionalInterface => "functional-interface",
        }
    }
}

/// Import prefixes never considered project code
const EXTERNAL_PREFIXES: &[&str] = &["java.", "javax.", "org.springframework.", "org.slf4j."];

const STREAM_OPERATIONS: &[&str] = &[
    "stream",
    "parallelStream",
    "collect",
    "filter",
    "map",
    "flatMap",
    "reduce",
    "forEach",
];

const FUNCTIONAL_INTERFACES: &[&str] = &[
    "Supplier",
    "Consumer",
    "Function",
    "Predicate",
    "BiFunction",
    "BiConsumer",
    "BiPredicate",
    "UnaryOperator",
    "BinaryOperator",
];

const INJECTION_ANNOTATIONS: &[&str] = &["Autowired", "Inject"];

/// Applies the admission rule and records edges into the context
struct EdgeSink<'a> {
    ctx: &'a AnalysisContext,
    resolver: &'a dyn TypeResolver,
    concept_edges: bool,
    added: usize,
}

impl<'a> EdgeSink<'a> {
    fn insert(&mut self, pass: Pass, relationship: Relationship) {
        if !self.resolver.is_project_class(&relationship.source) {
            return;
        }
        let rendered = relationship.to_string();
        if self.ctx.add_relationship(relationship) {
            self.added += 1;
            tracing::debug!(pass = pass.name(), "{}", rendered);
        }
    }

    /// Edge to the class named by `type_text`, if it is project-local
    fn link(
        &mut self,
        pass: Pass,
        source: &str,
        kind: EdgeKind,
        type_text: &str,
        label: Option<&str>,
    ) {
        if let Some(target) = self.resolver.admit(type_text) {
            self.insert(
                pass,
                Relationship {
                    source: source.to_string(),
                    kind,
                    target: Target::Class(target),
                    multiplicity: None,
                    label: label.map(str::to_string),
                },
            );
        }
    }

    fn depends(&mut self, pass: Pass, source: &str, type_text: &str, label: &str) {
        self.link(pass, source, EdgeKind::Dependency, type_text, Some(label));
    }

    /// Dependency on a placeholder or library concept
    fn concept(&mut self, pass: Pass, source: &str, name: &str, label: &str) {
        if !self.concept_edges {
            return;
        }
        self.insert(
            pass,
            Relationship {
                source: source.to_string(),
                kind: EdgeKind::Dependency,
                target: Target::Concept(name.to_string()),
                multiplicity: None,
                label: Some(label.to_string()),
            },
        );
    }
}

/// Runs every detection pass over parsed units
pub struct RelationshipEngine<'a> {
    resolver: &'a dyn TypeResolver,
    options: &'a AnalysisConfig,
}

impl<'a> RelationshipEngine<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, options: &'a AnalysisConfig) -> Self {
        Self { resolver, options }
    }

    /// Run all passes over `unit`, returning the number of new edges
    pub fn analyze_unit(&self, unit: &CompilationUnit, ctx: &AnalysisContext) -> usize {
        let mut sink = EdgeSink {
            ctx,
            resolver: self.resolver,
            concept_edges: self.options.concept_edges,
            added: 0,
        };

        let types: Vec<&TypeDecl> = unit
            .all_types()
            .into_iter()
            .filter(|t| !is_native(&t.name))
            .collect();

        for decl in &types {
            inheritance(decl, &mut sink);
            implementation(decl, &mut sink);
            constructors(decl, unit, &mut sink);
            fields(decl, &mut sink);
            methods(decl, unit, &mut sink);
            imports(decl, unit, &mut sink);
            if self.options.likely_inject {
                likely_inject(decl, ctx, &mut sink);
            }
            nested(decl, &mut sink);
        }

        for decl in &types {
            static_calls(decl, &mut sink);
        }
        for decl in &types {
            exceptions(decl, &mut sink);
        }
        for decl in &types {
            generics(decl, &mut sink);
        }
        for decl in &types {
            overrides(decl, &mut sink);
        }
        functional_style(&types, &mut sink);
        for decl in &types {
            var_inference(decl, unit, &mut sink);
        }
        for decl in &types {
            functional_interfaces(decl, &mut sink);
        }

        tracing::debug!(
            "{}: {} new relationships",
            unit.path.display(),
            sink.added
        );
        sink.added
    }
}

fn inheritance(decl: &TypeDecl, sink: &mut EdgeSink) {
    for parent in &decl.extends {
        sink.link(Pass::Inheritance, &decl.name, EdgeKind::Inheritance, parent, None);
    }
}

fn implementation(decl: &TypeDecl, sink: &mut EdgeSink) {
    for iface in &decl.implements {
        sink.link(Pass::Implementation, &decl.name, EdgeKind::Implementation, iface, None);
    }
}

fn constructors(decl: &TypeDecl, unit: &CompilationUnit, sink: &mut EdgeSink) {
    for ctor in &decl.constructors {
        for param in &ctor.params {
            sink.depends(Pass::Constructor, &decl.name, &param.type_text, "inject");
        }
        for expr in &ctor.body {
            if let Expr::ObjectCreation { type_name } = expr {
                sink.depends(Pass::Constructor, &decl.name, type_name, "creates");
            }
        }
        for expr in &ctor.body {
            if let Expr::MethodCall { scope: Some(scope), .. } = expr {
                let scope_type = expression_type(scope, unit);
                sink.depends(Pass::Constructor, &decl.name, &scope_type, "uses");
            }
        }
    }
}

fn is_collection(declared: &str) -> bool {
    ["List", "Set", "Collection", "[]"]
        .iter()
        .any(|marker| declared.contains(marker))
}

/// Edge shape for a field holding `target`
fn field_shape(
    field: &FieldDecl,
    declared: &str,
    decl: &TypeDecl,
    target: &str,
) -> (EdgeKind, Option<&'static str>, Option<&'static str>) {
    if INJECTION_ANNOTATIONS.iter().any(|a| field.has_annotation(a)) {
        return (EdgeKind::Dependency, None, Some("autowired"));
    }

    let created_in_constructor = decl
        .constructors
        .iter()
        .flat_map(|c| c.created_types())
        .any(|created| simple_name(created) == target);
    let collection = is_collection(declared);

    match (created_in_constructor, collection) {
        (true, true) => (EdgeKind::Composition, Some("*"), None),
        (true, false) => (EdgeKind::Composition, None, None),
        (false, true) => (EdgeKind::Aggregation, Some("*"), None),
        (false, false) => (EdgeKind::Association, None, None),
    }
}

fn fields(decl: &TypeDecl, sink: &mut EdgeSink) {
    for field in &decl.fields {
        let Some(target) = sink.resolver.admit(&field.element_type) else {
            continue;
        };
        for var in &field.variables {
            let declared = format!("{}{}", field.type_text, "[]".repeat(var.dimensions));
            let (kind, multiplicity, label) = field_shape(field, &declared, decl, &target);
            sink.insert(
                Pass::Field,
                Relationship {
                    source: decl.name.clone(),
                    kind,
                    target: Target::Class(target.clone()),
                    multiplicity: multiplicity.map(str::to_string),
                    label: label.map(str::to_string),
                },
            );
        }
    }
}

fn methods(decl: &TypeDecl, unit: &CompilationUnit, sink: &mut EdgeSink) {
    for method in &decl.methods {
        for param in &method.params {
            sink.depends(Pass::Method, &decl.name, &param.type_text, "uses");
        }

        if method.return_type != "void" {
            sink.depends(Pass::Method, &decl.name, &method.return_type, "returns");
        }

        let Some(body) = &method.body else {
            continue;
        };
        for expr in body {
            if let Expr::ObjectCreation { type_name } = expr {
                sink.depends(Pass::Method, &decl.name, type_name, "creates");
            }
        }
        for expr in body {
            if let Expr::LocalVariable { type_text, .. } = expr {
                sink.depends(Pass::Method, &decl.name, type_text, "uses");
            }
        }
        for expr in body {
            if let Expr::MethodCall { scope: Some(scope), .. } = expr {
                let scope_type = expression_type(scope, unit);
                sink.depends(Pass::Method, &decl.name, &scope_type, "calls");
            }
        }
    }
}

fn imports(decl: &TypeDecl, unit: &CompilationUnit, sink: &mut EdgeSink) {
    for import in &unit.imports {
        if EXTERNAL_PREFIXES.iter().any(|p| import.name.starts_with(p)) {
            continue;
        }
        sink.depends(Pass::Import, &decl.name, &import.name, "import");
    }
}

/// Speculative wiring for framework-managed classes, by naming convention
fn likely_inject(decl: &TypeDecl, ctx: &AnalysisContext, sink: &mut EdgeSink) {
    let is_controller = decl.has_annotation("Controller") || decl.has_annotation("RestController");
    let is_service = decl.has_annotation("Service");
    if !is_controller && !is_service {
        return;
    }

    for other in ctx.class_names() {
        if other == decl.name {
            continue;
        }
        let wanted = if is_controller {
            other.contains("Service")
        } else {
            other.contains("Repository") || other.contains("Service")
        };
        if wanted {
            sink.depends(Pass::LikelyInject, &decl.name, &other, "likely-inject");
        }
    }
}

fn nested(decl: &TypeDecl, sink: &mut EdgeSink) {
    for inner in decl.descendants() {
        sink.link(
            Pass::Nested,
            &decl.name,
            EdgeKind::Composition,
            &inner.name,
            Some("nested"),
        );
    }
}

/// Calls whose scope starts with an uppercase letter are treated as static
fn static_calls(decl: &TypeDecl, sink: &mut EdgeSink) {
    for expr in decl.own_exprs() {
        let Expr::MethodCall { scope: Some(scope), .. } = expr else {
            continue;
        };
        if !starts_uppercase(scope) {
            continue;
        }
        let type_part = scope.split('.').next().unwrap_or(scope);
        if simple_name(type_part) == decl.name {
            continue;
        }
        sink.depends(Pass::StaticCall, &decl.name, type_part, "static-call");
    }
}

fn exceptions(decl: &TypeDecl, sink: &mut EdgeSink) {
    for method in &decl.methods {
        for thrown in &method.throws {
            sink.depends(Pass::Exception, &decl.name, thrown, "throws");
        }
    }
    for ctor in &decl.constructors {
        for thrown in &ctor.throws {
            sink.depends(Pass::Exception, &decl.name, thrown, "throws");
        }
    }
    for expr in decl.deep_exprs() {
        if let Expr::Catch { types } = expr {
            for caught in types {
                sink.depends(Pass::Exception, &decl.name, caught, "catches");
            }
        }
    }
}

/// Type arguments at the top level are `generic`; deeper ones `nested-generic`
fn generic_arguments(source: &str, type_text: &str, depth: usize, sink: &mut EdgeSink) {
    let label = if depth == 0 { "generic" } else { "nested-generic" };
    for arg in type_arguments(type_text) {
        sink.depends(Pass::Generic, source, arg, label);
        if arg.contains('<') {
            generic_arguments(source, arg, depth + 1, sink);
        }
    }
}

fn generics(decl: &TypeDecl, sink: &mut EdgeSink) {
    for field in &decl.fields {
        generic_arguments(&decl.name, &field.element_type, 0, sink);
    }
    for method in &decl.methods {
        generic_arguments(&decl.name, &method.return_type, 0, sink);
        for param in &method.params {
            generic_arguments(&decl.name, &param.type_text, 0, sink);
        }
    }
    for ctor in &decl.constructors {
        for param in &ctor.params {
            generic_arguments(&decl.name, &param.type_text, 0, sink);
        }
    }
}

fn overrides(decl: &TypeDecl, sink: &mut EdgeSink) {
    for method in decl.methods.iter().filter(|m| m.has_annotation("Override")) {
        for parent in &decl.extends {
            let label = format!("overrides {}", method.name);
            sink.depends(Pass::Override, &decl.name, parent, &label);
        }
        for iface in &decl.implements {
            let label = format!("implements {}", method.name);
            sink.depends(Pass::Override, &decl.name, iface, &label);
        }
    }
}

/// Lambdas, then method references, then stream pipeline calls
fn functional_style(types: &[&TypeDecl], sink: &mut EdgeSink) {
    for decl in types {
        if decl.own_exprs().any(|e| matches!(e, Expr::Lambda)) {
            sink.concept(Pass::Functional, &decl.name, "Functional Interface", "lambda");
        }
    }

    for decl in types {
        for expr in decl.own_exprs() {
            if let Expr::MethodReference { scope } = expr {
                sink.depends(Pass::Functional, &decl.name, scope, "method reference");
            }
        }
    }

    for decl in types {
        for expr in decl.own_exprs() {
            if let Expr::MethodCall { name, .. } = expr {
                if STREAM_OPERATIONS.contains(&name.as_str()) {
                    sink.concept(Pass::Functional, &decl.name, "Stream API", name);
                }
            }
        }
    }
}

fn var_inference(decl: &TypeDecl, unit: &CompilationUnit, sink: &mut EdgeSink) {
    for expr in decl.own_exprs() {
        let Expr::LocalVariable { declarators, .. } = expr else {
            continue;
        };
        if !expr.is_inferred_local() {
            continue;
        }
        for var in declarators {
            let Some(init) = &var.initializer else {
                continue;
            };
            let inferred = match &init.created_type {
                Some(created) => simple_name(created),
                None => expression_type(&init.text, unit),
            };
            sink.depends(Pass::VarInference, &decl.name, &inferred, "var inference");
        }
    }
}

fn functional_interfaces(decl: &TypeDecl, sink: &mut EdgeSink) {
    for field in &decl.fields {
        let simple = simple_name(&field.element_type);
        if FUNCTIONAL_INTERFACES.contains(&simple.as_str()) {
            sink.concept(Pass::FunctionalInterface, &decl.name, &simple, "functional interface");
        }
    }

    for expr in decl.own_exprs() {
        if let Expr::LocalVariable { type_text, .. } = expr {
            let simple = simple_name(type_text);
            if FUNCTIONAL_INTERFACES.contains(&simple.as_str()) {
                sink.concept(Pass::FunctionalInterface, &decl.name, &simple, "functional interface");
            }
        }
    }

    for field in &decl.fields {
        if field.element_type.starts_with("Optional") {
            sink.concept(Pass::FunctionalInterface, &decl.name, "Optional", "optional");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classes::extract_classes;
    use crate::analysis::resolve::ProjectIndex;
    use crate::parser::JavaParser;
    use std::path::PathBuf;

    fn run_with(source: &str, names: &[&str], options: AnalysisConfig) -> Vec<String> {
        let unit = JavaParser::new()
            .unwrap()
            .parse_source(source, PathBuf::from("Test.java"))
            .unwrap();
        let index = ProjectIndex::from_names(names.iter().copied());
        let ctx = AnalysisContext::new("/src");
        for block in extract_classes(&unit) {
            ctx.add_class(block);
        }
        RelationshipEngine::new(&index, &options).analyze_unit(&unit, &ctx);
        ctx.relationships().iter().map(|r| r.to_string()).collect()
    }

    fn run(source: &str, names: &[&str]) -> Vec<String> {
        run_with(source, names, AnalysisConfig::default())
    }

    fn has(edges: &[String], edge: &str) -> bool {
        edges.iter().any(|e| e == edge)
    }

    #[test]
    fn test_relationship_display() {
        let rel = Relationship {
            source: "Shop".to_string(),
            kind: EdgeKind::Aggregation,
            target: Target::Class("Order".to_string()),
            multiplicity: Some("*".to_string()),
            label: None,
        };
        assert_eq!(rel.to_string(), "Shop o-- \"*\" Order");

        let rel = Relationship {
            source: "Shop".to_string(),
            kind: EdgeKind::Dependency,
            target: Target::Concept("Stream API".to_string()),
            multiplicity: None,
            label: Some("map".to_string()),
        };
        assert_eq!(rel.to_string(), "Shop ..> \"Stream API\" : <<map>>");
    }

    #[test]
    fn test_service_scenario() {
        let edges = run(
            r#"
public class Service implements Runnable {
    private Repository repo;
    public Service() { repo = new Repository(); }
    public void run() {}
}
"#,
            &["Service", "Runnable", "Repository"],
        );
        assert!(has(&edges, "Service ..|> Runnable"));
        assert!(has(&edges, "Service *-- Repository"));
        assert!(has(&edges, "Service ..> Repository : <<creates>>"));
    }

    #[test]
    fn test_inheritance_and_admission() {
        let edges = run(
            "class Admin extends User implements Serializable, Auditable {}",
            &["Admin", "User", "Auditable"],
        );
        assert_eq!(edges, vec!["Admin --|> User", "Admin ..|> Auditable"]);
    }

    #[test]
    fn test_source_must_be_project_class() {
        let edges = run("class Orphan extends User {}", &["User"]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_field_shapes() {
        let edges = run(
            r#"
class Shop {
    @Autowired private Mailer mailer;
    private List<Order> orders;
    private Item[] items;
    private Customer owner;
    private Cart cart;
    Shop() { cart = new Cart(); }
}
"#,
            &["Shop", "Mailer", "Order", "Item", "Customer", "Cart"],
        );
        assert!(has(&edges, "Shop ..> Mailer : <<autowired>>"));
        assert!(has(&edges, "Shop o-- \"*\" Item"));
        assert!(has(&edges, "Shop --> Customer"));
        assert!(has(&edges, "Shop *-- Cart"));
        assert!(has(&edges, "Shop ..> Order : <<generic>>"));
        // List itself is native, so the field yields no direct edge
        assert!(!edges.iter().any(|e| e.starts_with("Shop o-- \"*\" Order")));
    }

    #[test]
    fn test_collection_composition() {
        let edges = run(
            r#"
class Board {
    private Cell[] cells;
    Board() { Cell first = new Cell(); }
}
"#,
            &["Board", "Cell"],
        );
        assert!(has(&edges, "Board *-- \"*\" Cell"));
    }

    #[test]
    fn test_constructor_edges() {
        let edges = run(
            r#"
class Checkout {
    private Gateway gateway;
    Checkout(Pricing pricing) {
        this.gateway = new Gateway();
        pricing.refresh();
        this.gateway.open();
    }
}
"#,
            &["Checkout", "Pricing", "Gateway"],
        );
        assert!(has(&edges, "Checkout ..> Pricing : <<inject>>"));
        assert!(has(&edges, "Checkout ..> Gateway : <<creates>>"));
        assert!(has(&edges, "Checkout ..> Gateway : <<uses>>"));
    }

    #[test]
    fn test_method_edges() {
        let edges = run(
            r#"
class Billing {
    private Ledger ledger;
    Invoice bill(Customer customer) {
        Receipt receipt = new Receipt();
        ledger.record(receipt);
        return null;
    }
    void reset() {}
}
"#,
            &["Billing", "Ledger", "Invoice", "Customer", "Receipt"],
        );
        assert!(has(&edges, "Billing ..> Customer : <<uses>>"));
        assert!(has(&edges, "Billing ..> Invoice : <<returns>>"));
        assert!(has(&edges, "Billing ..> Receipt : <<creates>>"));
        assert!(has(&edges, "Billing ..> Receipt : <<uses>>"));
        assert!(has(&edges, "Billing ..> Ledger : <<calls>>"));
    }

    #[test]
    fn test_import_edges_skip_framework_namespaces() {
        let edges = run(
            r#"
import com.shop.model.Order;
import java.util.List;
import org.springframework.stereotype.Service;
class Cart {}
"#,
            &["Cart", "Order", "List", "Service"],
        );
        assert_eq!(edges, vec!["Cart ..> Order : <<import>>"]);
    }

    #[test]
    fn test_likely_inject() {
        let source = r#"
@RestController
class OrderController {}
@Service
class OrderService {}
class OrderRepository {}
"#;
        let names = ["OrderController", "OrderService", "OrderRepository"];
        let edges = run(source, &names);
        assert!(has(&edges, "OrderController ..> OrderService : <<likely-inject>>"));
        assert!(has(&edges, "OrderService ..> OrderRepository : <<likely-inject>>"));
        assert!(!has(&edges, "OrderController ..> OrderRepository : <<likely-inject>>"));
        assert!(!has(&edges, "OrderService ..> OrderService : <<likely-inject>>"));

        let disabled = AnalysisConfig {
            likely_inject: false,
            ..AnalysisConfig::default()
        };
        let edges = run_with(source, &names, disabled);
        assert!(!edges.iter().any(|e| e.contains("likely-inject")));
    }

    #[test]
    fn test_nested_composition() {
        let edges = run(
            "class Tree { static class Node { class Leaf {} } }",
            &["Tree", "Node", "Leaf"],
        );
        assert!(has(&edges, "Tree *-- Node : <<nested>>"));
        assert!(has(&edges, "Tree *-- Leaf : <<nested>>"));
        assert!(has(&edges, "Node *-- Leaf : <<nested>>"));
    }

    #[test]
    fn test_static_calls() {
        let edges = run(
            r#"
class Report {
    void build() {
        Formatter.format("x");
        Report.helper();
        Math.max(1, 2);
    }
    static void helper() {}
}
"#,
            &["Report", "Formatter"],
        );
        assert!(has(&edges, "Report ..> Formatter : <<static-call>>"));
        assert!(!has(&edges, "Report ..> Report : <<static-call>>"));
    }

    #[test]
    fn test_exception_edges() {
        let edges = run(
            r#"
class Importer {
    Importer() throws SetupFailure {}
    void load() throws ImportFailure {
        try { read(); } catch (ParseFailure | IOException e) { }
    }
    class Worker {
        void go() { try { } catch (WorkerFailure e) { } }
    }
}
"#,
            &["Importer", "Worker", "SetupFailure", "ImportFailure", "ParseFailure", "WorkerFailure"],
        );
        assert!(has(&edges, "Importer ..> SetupFailure : <<throws>>"));
        assert!(has(&edges, "Importer ..> ImportFailure : <<throws>>"));
        assert!(has(&edges, "Importer ..> ParseFailure : <<catches>>"));
        assert!(has(&edges, "Importer ..> WorkerFailure : <<catches>>"));
        assert!(has(&edges, "Worker ..> WorkerFailure : <<catches>>"));
    }

    #[test]
    fn test_generic_edges() {
        let edges = run(
            r#"
class Catalog {
    private Map<String, List<Product>> byCategory;
    Optional<Product> find(Query<Filter> query) { return null; }
}
"#,
            &["Catalog", "Product", "Query", "Filter"],
        );
        assert!(has(&edges, "Catalog ..> Product : <<nested-generic>>"));
        assert!(has(&edges, "Catalog ..> Product : <<generic>>"));
        assert!(has(&edges, "Catalog ..> Filter : <<generic>>"));
    }

    #[test]
    fn test_override_edges() {
        let edges = run(
            r#"
class Circle extends Shape implements Drawable {
    @Override public double area() { return 0; }
}
"#,
            &["Circle", "Shape", "Drawable"],
        );
        assert!(has(&edges, "Circle ..> Shape : <<overrides area>>"));
        assert!(has(&edges, "Circle ..> Drawable : <<implements area>>"));
    }

    #[test]
    fn test_functional_style_edges() {
        let edges = run(
            r#"
class Pipeline {
    void run(List<Order> orders) {
        orders.stream().map(Order::total).forEach(t -> log(t));
    }
}
"#,
            &["Pipeline", "Order"],
        );
        assert!(has(&edges, "Pipeline ..> \"Functional Interface\" : <<lambda>>"));
        assert!(has(&edges, "Pipeline ..> Order : <<method reference>>"));
        assert!(has(&edges, "Pipeline ..> \"Stream API\" : <<stream>>"));
        assert!(has(&edges, "Pipeline ..> \"Stream API\" : <<map>>"));
        assert!(has(&edges, "Pipeline ..> \"Stream API\" : <<forEach>>"));
    }

    #[test]
    fn test_concept_edges_can_be_disabled() {
        let options = AnalysisConfig {
            concept_edges: false,
            ..AnalysisConfig::default()
        };
        let edges = run_with(
            r#"
class Pipeline {
    private Supplier<String> source;
    void run(List<String> items) { items.stream().forEach(i -> {}); }
}
"#,
            &["Pipeline"],
            options,
        );
        assert!(edges.is_empty());
    }

    #[test]
    fn test_var_inference() {
        let edges = run(
            r#"
class Planner {
    private Schedule schedule;
    void plan() {
        var a = new Route();
        var b = Calendar.today();
        var c = schedule;
        var d = Registry.lookup("x");
    }
}
"#,
            &["Planner", "Schedule", "Route", "Registry"],
        );
        assert!(has(&edges, "Planner ..> Route : <<var inference>>"));
        assert!(has(&edges, "Planner ..> Schedule : <<var inference>>"));
        assert!(has(&edges, "Planner ..> Registry : <<var inference>>"));
    }

    #[test]
    fn test_functional_interface_edges() {
        let edges = run(
            r#"
class Rules {
    private Predicate<Order> valid;
    private Optional<Order> last;
    void apply() { Function<Order, Order> f = null; }
}
"#,
            &["Rules", "Order"],
        );
        assert!(has(&edges, "Rules ..> Predicate : <<functional interface>>"));
        assert!(has(&edges, "Rules ..> Function : <<functional interface>>"));
        assert!(has(&edges, "Rules ..> Optional : <<optional>>"));
    }

    #[test]
    fn test_self_edges_kept() {
        let edges = run("class Node { private Node next; }", &["Node"]);
        assert_eq!(edges, vec!["Node --> Node"]);
    }

    #[test]
    fn test_no_native_targets() {
        let edges = run(
            r#"
class Holder {
    private String name;
    private Integer count;
    List<Map<String, Long>> data() { return null; }
}
"#,
            &["Holder", "String", "Integer", "List", "Map", "Long"],
        );
        assert!(edges.is_empty());
    }
}

// Import categorisation and framework usage patterns

use crate::parser::CompilationUnit;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Known import prefixes and their category
const FRAMEWORK_CATEGORIES: &[(&str, &str)] = &[
    ("org.springframework", "Spring Framework"),
    ("org.hibernate", "Hibernate ORM"),
    ("javax.persistence", "JPA"),
    ("jakarta.persistence", "Jakarta JPA"),
    ("com.fasterxml.jackson", "Jackson JSON"),
    ("org.slf4j", "SLF4J Logging"),
    ("org.apache.commons", "Apache Commons"),
    ("org.junit", "JUnit Testing"),
    ("org.mockito", "Mockito Testing"),
    ("io.swagger", "Swagger/OpenAPI"),
];

/// Imports grouped by category, plus detected usage patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyReport {
    pub categories: BTreeMap<String, BTreeSet<String>>,
    pub patterns: BTreeMap<String, BTreeSet<String>>,
}

pub fn categorize(import: &str) -> &'static str {
    if let Some((_, category)) = FRAMEWORK_CATEGORIES
        .iter()
        .find(|(prefix, _)| import.starts_with(prefix))
    {
        return *category;
    }

    if import.starts_with("java.") {
        "Java Core"
    } else if import.starts_with("javax.") || import.starts_with("jakarta.") {
        "Java EE/Jakarta"
    } else if import.contains(".test.") || import.contains(".testing.") {
        "Testing"
    } else if import.starts_with("com.") || import.starts_with("org.") {
        "External Libraries"
    } else {
        "Project Internal"
    }
}

impl DependencyReport {
    pub fn analyze(unit: &CompilationUnit) -> Self {
        let mut report = Self::default();
        let names: Vec<&str> = unit.imports.iter().map(|i| i.name.as_str()).collect();

        for name in &names {
            report
                .categories
                .entry(categorize(name).to_string())
                .or_default()
                .insert(name.to_string());
        }

        report.spring_patterns(&names);
        report.data_access_patterns(&names);
        report.testing_patterns(&names);
        report
    }

    fn add_patterns(&mut self, group: &str, found: Vec<&str>) {
        if found.is_empty() {
            return;
        }
        self.patterns
            .entry(group.to_string())
            .or_default()
            .extend(found.into_iter().map(str::to_string));
    }

    fn spring_patterns(&mut self, names: &[&str]) {
        let spring: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| n.starts_with("org.springframework"))
            .collect();
        let any = |needle: &str| spring.iter().any(|n| n.contains(needle));

        let mut found = Vec::new();
        if any(".boot.") {
            found.push("Spring Boot Application");
        }
        if any(".web.") {
            found.push("Spring Web MVC");
        }
        if any(".data.") {
            found.push("Spring Data");
        }
        if any(".security.") {
            found.push("Spring Security");
        }
        if any(".transaction.") {
            found.push("Spring Transactions");
        }
        self.add_patterns("Spring Patterns", found);
    }

    fn data_access_patterns(&mut self, names: &[&str]) {
        let data: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| n.contains("persistence") || n.contains("hibernate"))
            .collect();
        let any = |needle: &str| data.iter().any(|n| n.contains(needle));

        let mut found = Vec::new();
        if any("Entity") {
            found.push("JPA Entities");
        }
        if any("Repository") {
            found.push("Repository Pattern");
        }
        if any("Query") {
            found.push("Custom Queries");
        }
        self.add_patterns("Data Access Patterns", found);
    }

    fn testing_patterns(&mut self, names: &[&str]) {
        let tests: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| n.contains("test") || n.contains("junit") || n.contains("mockito"))
            .collect();
        let any = |needle: &str| tests.iter().any(|n| n.contains(needle));

        let mut found = Vec::new();
        if any("junit") {
            found.push("JUnit Testing");
        }
        if any("mockito") {
            found.push("Mock Testing");
        }
        if tests.iter().any(|n| n.contains("spring") && n.contains("test")) {
            found.push("Spring Integration Tests");
        }
        self.add_patterns("Testing Patterns", found);
    }

    pub fn merge(&mut self, other: &DependencyReport) {
        for (category, imports) in &other.categories {
            self.categories
                .entry(category.clone())
                .or_default()
                .extend(imports.iter().cloned());
        }
        for (group, patterns) in &other.patterns {
            self.patterns
                .entry(group.clone())
                .or_default()
                .extend(patterns.iter().cloned());
        }
    }

    pub fn total_imports(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;
    use std::path::PathBuf;

    fn parse(source: &str) -> CompilationUnit {
        JavaParser::new()
            .unwrap()
            .parse_source(source, PathBuf::from("Test.java"))
            .unwrap()
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("org.springframework.stereotype.Service"), "Spring Framework");
        assert_eq!(categorize("jakarta.persistence.Entity"), "Jakarta JPA");
        assert_eq!(categorize("java.util.List"), "Java Core");
        assert_eq!(categorize("javax.inject.Inject"), "Java EE/Jakarta");
        assert_eq!(categorize("net.shop.test.Fixtures"), "Testing");
        assert_eq!(categorize("com.google.common.base.Strings"), "External Libraries");
        assert_eq!(categorize("shop.model.Order"), "Project Internal");
    }

    #[test]
    fn test_analyze_unit() {
        let unit = parse(
            r#"
import org.springframework.boot.SpringApplication;
import org.springframework.web.bind.annotation.GetMapping;
import javax.persistence.Entity;
import org.springframework.data.jpa.repository.JpaRepository;
import org.junit.jupiter.api.Test;
import java.util.List;
class App {}
"#,
        );
        let report = DependencyReport::analyze(&unit);
        assert_eq!(report.total_imports(), 6);
        assert_eq!(report.categories["Spring Framework"].len(), 3);

        let spring = &report.patterns["Spring Patterns"];
        assert!(spring.contains("Spring Boot Application"));
        assert!(spring.contains("Spring Web MVC"));
        assert!(spring.contains("Spring Data"));

        assert!(report.patterns["Data Access Patterns"].contains("JPA Entities"));
        assert!(report.patterns["Testing Patterns"].contains("JUnit Testing"));
    }

    #[test]
    fn test_no_imports_no_patterns() {
        let report = DependencyReport::analyze(&parse("class Plain {}"));
        assert_eq!(report, DependencyReport::default());
    }

    #[test]
    fn test_merge() {
        let mut a = DependencyReport::analyze(&parse("import java.util.List; class A {}"));
        let b = DependencyReport::analyze(&parse(
            "import java.util.List; import java.util.Map; class B {}",
        ));
        a.merge(&b);
        assert_eq!(a.categories["Java Core"].len(), 2);
    }
}

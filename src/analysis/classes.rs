// Class extraction: one UML class block per declaration

use crate::analysis::annotations;
use crate::parser::{CompilationUnit, TypeDecl, TypeKind};
use serde::Serialize;
use std::fmt;

/// Flattened class description as it appears in the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBlock {
    pub kind: TypeKind,
    pub name: String,
    pub stereotypes: Vec<String>,
    /// `visibility name : type`, declaration order
    pub attributes: Vec<String>,
    /// `visibility name(params) : returnType`, declaration order
    pub operations: Vec<String>,
}

impl ClassBlock {
    pub fn from_decl(decl: &TypeDecl) -> Self {
        let attributes = decl
            .fields
            .iter()
            .filter_map(|field| {
                let var = field.variables.first()?;
                Some(format!(
                    "{} {} : {}",
                    field.visibility.symbol(),
                    var.name,
                    field.first_variable_type()
                ))
            })
            .collect();

        let operations = decl
            .methods
            .iter()
            .map(|m| {
                format!(
                    "{} {}({}) : {}",
                    m.visibility.symbol(),
                    m.name,
                    m.param_list(),
                    m.return_type
                )
            })
            .collect();

        Self {
            kind: decl.kind,
            name: decl.name.clone(),
            stereotypes: annotations::stereotypes(decl),
            attributes,
            operations,
        }
    }

    /// `kind name [stereotypes] {`
    pub fn header(&self) -> String {
        let mut line = format!("{} {}", self.kind.keyword(), self.name);
        if !self.stereotypes.is_empty() {
            line.push(' ');
            line.push_str(&self.stereotypes.join(" "));
        }
        line.push_str(" {");
        line
    }
}

impl fmt::Display for ClassBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.attributes.iter().chain(&self.operations) {
            writeln!(f, "{}", line)?;
        }
        write!(f, "}}")
    }
}

/// Class blocks for every declaration in the unit, nested ones included
pub fn extract_classes(unit: &CompilationUnit) -> Vec<ClassBlock> {
    unit.all_types()
        .into_iter()
        .map(ClassBlock::from_decl)
        .collect()
}

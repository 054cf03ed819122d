//! Go source printer for rendered declarations.
//!
//! Output is gofmt-shaped: tab indentation, and within a struct each run of
//! single-line fields has its names, types and tags aligned in columns.
use crate::ast::{Decl, Field, StructType, TypeExpr};

pub struct Codegen {
    package: String,
    out: String,
}

impl Codegen {
    pub fn new(package: impl Into<String>) -> Self {
        Self { package: package.into(), out: String::new() }
    }

    pub fn emit(&mut self, decls: &[Decl]) {
        self.out.push_str(&format!("package {}\n", self.package));
        if decls.iter().any(|d| d.ty.uses_time()) {
            self.out.push_str("\nimport \"time\"\n");
        }
        for decl in decls {
            self.out.push('\n');
            self.out.push_str(&format_decl(decl));
            self.out.push('\n');
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Source for one declaration, without package clause or imports.
pub fn format_decl(decl: &Decl) -> String {
    format!("type {} {}", decl.name, type_expr(&decl.ty, 0))
}

fn type_expr(ty: &TypeExpr, depth: usize) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Star(inner) => format!("*{}", type_expr(inner, depth)),
        TypeExpr::Array(inner) => format!("[]{}", type_expr(inner, depth)),
        TypeExpr::Map { key, value } => {
            format!("map[{}]{}", type_expr(key, depth), type_expr(value, depth))
        }
        TypeExpr::Interface => "interface{}".to_string(),
        TypeExpr::Struct(s) => struct_body(s, depth),
    }
}

fn struct_body(s: &StructType, depth: usize) -> String {
    if s.fields.is_empty() {
        return "struct{}".to_string();
    }

    let indent = "\t".repeat(depth + 1);
    let rendered: Vec<(&Field, String)> = s
        .fields
        .iter()
        .map(|f| (f, type_expr(&f.ty, depth + 1)))
        .collect();

    let mut out = String::from("struct {\n");
    for group in alignment_groups(&rendered) {
        let name_w = group.iter().map(|(f, _)| width(&f.name)).max().unwrap_or(0);
        let type_w = group
            .iter()
            .filter(|(_, t)| !t.contains('\n'))
            .map(|(_, t)| width(t))
            .max()
            .unwrap_or(0);
        for (field, ty) in group {
            out.push_str(&indent);
            out.push_str(&field.name);
            pad(&mut out, name_w - width(&field.name) + 1);
            out.push_str(ty);
            if let Some(tag) = &field.tag {
                if ty.contains('\n') {
                    out.push(' ');
                } else {
                    pad(&mut out, type_w - width(ty) + 1);
                }
                out.push_str(tag);
            }
            out.push('\n');
        }
    }
    out.push_str(&"\t".repeat(depth));
    out.push('}');
    out
}

/// Runs of single-line fields. A multi-line field closes the run it follows:
/// its opening line shares the name column, nothing after its closing brace does.
fn alignment_groups<'a, T>(rendered: &'a [(T, String)]) -> Vec<&'a [(T, String)]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, (_, ty)) in rendered.iter().enumerate() {
        if ty.contains('\n') {
            groups.push(&rendered[start..=i]);
            start = i + 1;
        }
    }
    if start < rendered.len() {
        groups.push(&rendered[start..]);
    }
    groups
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: TypeExpr, key: &str) -> Field {
        Field { name: name.into(), ty, tag: Some(format!("`json:\"{key}\"`")) }
    }

    #[test]
    fn aligned_struct_with_nested_struct() {
        let nested = TypeExpr::star(TypeExpr::Struct(StructType {
            fields: vec![field("City", TypeExpr::ident("string"), "city")],
        }));
        let decl = Decl {
            name: "Root".into(),
            ty: TypeExpr::Struct(StructType {
                fields: vec![
                    field("Active", TypeExpr::ident("bool"), "active"),
                    field("ID", TypeExpr::ident("int64"), "id"),
                    field("Address", nested, "address"),
                    field("Tags", TypeExpr::array(TypeExpr::ident("string")), "tags"),
                    field("CreatedAt", TypeExpr::ident("time.Time"), "created_at"),
                ],
            }),
        };
        let mut cg = Codegen::new("model");
        cg.emit(&[decl]);
        let expected = "package model

import \"time\"

type Root struct {
\tActive  bool  `json:\"active\"`
\tID      int64 `json:\"id\"`
\tAddress *struct {
\t\tCity string `json:\"city\"`
\t} `json:\"address\"`
\tTags      []string  `json:\"tags\"`
\tCreatedAt time.Time `json:\"created_at\"`
}
";
        assert_eq!(cg.into_string(), expected);
    }

    #[test]
    fn opening_line_of_nested_struct_shares_name_column() {
        let nested = TypeExpr::Struct(StructType {
            fields: vec![Field { name: "X".into(), ty: TypeExpr::ident("int64"), tag: None }],
        });
        let ty = TypeExpr::Struct(StructType {
            fields: vec![
                Field { name: "A".into(), ty: TypeExpr::ident("int64"), tag: None },
                Field { name: "LongName".into(), ty: nested, tag: None },
                Field { name: "B".into(), ty: TypeExpr::ident("bool"), tag: None },
            ],
        });
        let decl = Decl { name: "T".into(), ty };
        assert_eq!(
            format_decl(&decl),
            "type T struct {\n\tA        int64\n\tLongName struct {\n\t\tX int64\n\t}\n\tB bool\n}"
        );
    }

    #[test]
    fn scalars_maps_and_empty_structs() {
        let decls = [
            Decl { name: "Count".into(), ty: TypeExpr::ident("int64") },
            Decl {
                name: "Attrs".into(),
                ty: TypeExpr::map(TypeExpr::ident("string"), TypeExpr::Interface),
            },
            Decl { name: "Empty".into(), ty: TypeExpr::Struct(StructType::default()) },
        ];
        let mut cg = Codegen::new("main");
        cg.emit(&decls);
        assert_eq!(
            cg.into_string(),
            "package main\n\ntype Count int64\n\ntype Attrs map[string]interface{}\n\ntype Empty struct{}\n"
        );
    }

    #[test]
    fn format_single_decl() {
        let decl = Decl {
            name: "Grid".into(),
            ty: TypeExpr::array(TypeExpr::array(TypeExpr::ident("float64"))),
        };
        assert_eq!(format_decl(&decl), "type Grid [][]float64");
    }
}

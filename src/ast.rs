// Go syntax tree for type declarations. No printing here, see `codegen`.

/// `type <name> <ty>`
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Named type: `bool`, `int`, `time.Time`, `Address`, …
    Ident(String),
    /// `*T`
    Star(Box<TypeExpr>),
    /// `[]T`
    Array(Box<TypeExpr>),
    /// `map[K]V`
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// `interface{}`
    Interface,
    Struct(StructType),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructType {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    /// Raw tag literal including the backquotes.
    pub tag: Option<String>,
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn star(inner: TypeExpr) -> Self {
        TypeExpr::Star(Box::new(inner))
    }

    pub fn array(elem: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(elem))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map { key: Box::new(key), value: Box::new(value) }
    }

    /// Whether the expression references the `time` package anywhere.
    pub fn uses_time(&self) -> bool {
        match self {
            TypeExpr::Ident(name) => name.starts_with("time."),
            TypeExpr::Star(inner) | TypeExpr::Array(inner) => inner.uses_time(),
            TypeExpr::Map { key, value } => key.uses_time() || value.uses_time(),
            TypeExpr::Interface => false,
            TypeExpr::Struct(s) => s.fields.iter().any(|f| f.ty.uses_time()),
        }
    }
}

/// Go's `strconv.Quote`: a double-quoted literal with control characters,
/// quotes and backslashes escaped. Printable Unicode passes through.
pub fn quote_go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x80 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}

// Approximates Go's unicode.IsPrint: no control, format or separator
// characters other than the ASCII space.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{00ad}'
            | '\u{061c}'
            | '\u{200b}'..='\u{200f}'
            | '\u{2028}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
    )
}

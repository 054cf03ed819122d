//! Node tree → Go syntax tree.
//!
//! Every node maps to a base expression by its type, gets a pointer when it
//! may be absent or null (never for roots, arrays, `interface{}`, maps or
//! opaque types), then gets `array_level` slice wrappers.
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ast::{Decl, Field, StructType, TypeExpr, quote_go_string};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::ir::Node;
use crate::lattice::NodeType;

/// One `type <Name> <expr>` per root, in root order.
pub fn render_declarations(roots: &[Node], config: &RenderConfig) -> Result<Vec<Decl>> {
    let decls = roots
        .par_iter()
        .map(|node| {
            let path = node.name.clone();
            require_name(&node.name, &path, "declaration name is empty")?;
            Ok(Decl {
                name: node.name.clone(),
                ty: lower_node(node, config, &path)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = decls.len(), "rendered declarations");
    Ok(decls)
}

pub fn render_type(node: &Node, config: &RenderConfig) -> Result<TypeExpr> {
    lower_node(node, config, &node.name)
}

/// Struct body for an object node, fields sorted by name.
pub fn render_struct(node: &Node, config: &RenderConfig) -> Result<StructType> {
    lower_struct(node, config, &node.name)
}

fn lower_node(n: &Node, config: &RenderConfig, path: &str) -> Result<TypeExpr> {
    if !n.children.is_empty() && !matches!(n.ty, NodeType::Object | NodeType::Map) {
        return Err(Error::InvalidTree {
            path: path.to_string(),
            reason: format!("`{}` node has children", n.ty),
        });
    }

    let mut not_required_as_pointer = true;
    let mut allow_pointer = true;

    let mut ty = match &n.ty {
        NodeType::Bool => TypeExpr::ident("bool"),
        NodeType::Int => TypeExpr::ident("int64"),
        NodeType::Float => TypeExpr::ident("float64"),
        NodeType::String => {
            not_required_as_pointer = config.string_pointers_when_key_missing;
            TypeExpr::ident("string")
        }
        NodeType::Time if config.time_as_str => {
            not_required_as_pointer = config.string_pointers_when_key_missing;
            TypeExpr::ident("string")
        }
        NodeType::Time => TypeExpr::ident("time.Time"),
        NodeType::Object => TypeExpr::Struct(lower_struct(n, config, path)?),
        NodeType::Extracted => {
            let name = n
                .external_type_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(n.name.as_str());
            require_name(name, path, "extracted type has no name")?;
            TypeExpr::ident(name)
        }
        NodeType::Interface | NodeType::Init => {
            allow_pointer = false;
            TypeExpr::Interface
        }
        NodeType::Map => {
            allow_pointer = false;
            let value = match n.children.values().next() {
                Some(child) => lower_node(child, config, &format!("{path}.{}", child.name))?,
                None => TypeExpr::Interface,
            };
            TypeExpr::map(TypeExpr::ident("string"), value)
        }
        NodeType::Other(id) => {
            allow_pointer = false;
            require_name(id, path, "opaque type has no name")?;
            TypeExpr::ident(id.as_str())
        }
    };

    if !n.root && n.array_level == 0 && allow_pointer {
        if n.nullable || (!n.required && not_required_as_pointer) {
            ty = TypeExpr::star(ty);
        }
    }

    for _ in 0..n.array_level {
        ty = TypeExpr::array(ty);
    }

    Ok(ty)
}

fn lower_struct(n: &Node, config: &RenderConfig, path: &str) -> Result<StructType> {
    let mut children: Vec<&Node> = n.children.values().collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));

    let fields = children
        .into_iter()
        .map(|child| {
            let child_path = format!("{path}.{}", child.name);
            require_name(&child.name, &child_path, "field name is empty")?;
            Ok(Field {
                name: child.name.clone(),
                ty: lower_node(child, config, &child_path)?,
                tag: Some(field_tag(&config.tag_name, &child.key)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StructType { fields })
}

/// `` `json:"key"` `` with the key escaped like a Go string literal.
fn field_tag(tag_name: &str, key: &str) -> String {
    if !fits_raw_string(key) {
        warn!(key, "key contains a backquote; the generated tag will not compile");
    }
    let quoted = quote_go_string(key);
    let inner = &quoted[1..quoted.len() - 1];
    format!("`{tag_name}:\"{inner}\"`")
}

/// Go raw strings have no escapes, so a backquote can't appear inside a tag.
fn fits_raw_string(key: &str) -> bool {
    !key.contains('`')
}

fn require_name(name: &str, path: &str, reason: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidTree {
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> RenderConfig {
        RenderConfig::default()
    }

    fn ident(s: &str) -> TypeExpr {
        TypeExpr::ident(s)
    }

    fn leaf(name: &str, ty: NodeType) -> Node {
        Node::field(name, name.to_lowercase()).with_type(ty).with_required(true)
    }

    #[test]
    fn scalars() {
        assert_eq!(render_type(&leaf("A", NodeType::Bool), &cfg()).unwrap(), ident("bool"));
        assert_eq!(render_type(&leaf("A", NodeType::Int), &cfg()).unwrap(), ident("int64"));
        assert_eq!(render_type(&leaf("A", NodeType::Float), &cfg()).unwrap(), ident("float64"));
        assert_eq!(render_type(&leaf("A", NodeType::String), &cfg()).unwrap(), ident("string"));
        assert_eq!(render_type(&leaf("A", NodeType::Time), &cfg()).unwrap(), ident("time.Time"));
        assert_eq!(render_type(&leaf("A", NodeType::Init), &cfg()).unwrap(), TypeExpr::Interface);
    }

    #[test]
    fn time_as_str() {
        let config = cfg().time_as_str(true);
        assert_eq!(render_type(&leaf("A", NodeType::Time), &config).unwrap(), ident("string"));

        let optional = leaf("A", NodeType::Time).with_required(false);
        assert_eq!(render_type(&optional, &config).unwrap(), ident("string"));
        let config = config.string_pointers_when_key_missing(true);
        assert_eq!(render_type(&optional, &config).unwrap(), TypeExpr::star(ident("string")));
    }

    #[test]
    fn optional_and_nullable_pointers() {
        let optional_int = leaf("A", NodeType::Int).with_required(false);
        assert_eq!(render_type(&optional_int, &cfg()).unwrap(), TypeExpr::star(ident("int64")));

        // strings rely on the zero value unless configured otherwise
        let optional_str = leaf("A", NodeType::String).with_required(false);
        assert_eq!(render_type(&optional_str, &cfg()).unwrap(), ident("string"));

        let nullable_str = leaf("A", NodeType::String).with_nullable(true);
        assert_eq!(render_type(&nullable_str, &cfg()).unwrap(), TypeExpr::star(ident("string")));

        let optional_time = leaf("A", NodeType::Time).with_required(false);
        assert_eq!(render_type(&optional_time, &cfg()).unwrap(), TypeExpr::star(ident("time.Time")));
    }

    #[test]
    fn never_pointer_wrapped() {
        for ty in [NodeType::Interface, NodeType::Init, NodeType::Map, NodeType::Other("json.RawMessage".into())] {
            let n = leaf("A", ty).with_nullable(true).with_required(false);
            assert!(!matches!(render_type(&n, &cfg()).unwrap(), TypeExpr::Star(_)));
        }
    }

    #[test]
    fn arrays_suppress_pointers() {
        let n = leaf("Tags", NodeType::String)
            .with_array_level(2)
            .with_required(false)
            .with_nullable(false);
        assert_eq!(
            render_type(&n, &cfg()).unwrap(),
            TypeExpr::array(TypeExpr::array(ident("string")))
        );

        let n = leaf("Scores", NodeType::Int).with_array_level(1).with_nullable(true);
        assert_eq!(render_type(&n, &cfg()).unwrap(), TypeExpr::array(ident("int64")));
    }

    #[test]
    fn root_is_never_pointer() {
        let root = Node::root("Root")
            .with_type(NodeType::Object)
            .with_required(false)
            .with_nullable(true)
            .with_child(leaf("A", NodeType::Bool));
        assert!(matches!(render_type(&root, &cfg()).unwrap(), TypeExpr::Struct(_)));
    }

    #[test]
    fn optional_nested_struct_is_pointer() {
        let n = Node::field("Address", "address")
            .with_type(NodeType::Object)
            .with_child(leaf("City", NodeType::String));
        let TypeExpr::Star(inner) = render_type(&n, &cfg()).unwrap() else {
            panic!("expected pointer");
        };
        assert!(matches!(*inner, TypeExpr::Struct(_)));
    }

    #[test]
    fn fields_are_sorted_and_tagged() {
        let a = Node::root("Root")
            .with_type(NodeType::Object)
            .with_child(leaf("Zeta", NodeType::Int))
            .with_child(leaf("Alpha", NodeType::Bool))
            .with_child(leaf("Mid", NodeType::String));
        let b = Node::root("Root")
            .with_type(NodeType::Object)
            .with_child(leaf("Mid", NodeType::String))
            .with_child(leaf("Zeta", NodeType::Int))
            .with_child(leaf("Alpha", NodeType::Bool));

        let sa = render_struct(&a, &cfg()).unwrap();
        let sb = render_struct(&b, &cfg()).unwrap();
        assert_eq!(sa, sb);
        let names: Vec<&str> = sa.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
        assert_eq!(sa.fields[0].tag.as_deref(), Some("`json:\"alpha\"`"));
    }

    #[test]
    fn tag_escapes_key() {
        assert_eq!(field_tag("json", "a\"b"), r#"`json:"a\"b"`"#);
        assert_eq!(field_tag("json", "line\nbreak"), r#"`json:"line\nbreak"`"#);
        assert_eq!(field_tag("yaml", "plain"), r#"`yaml:"plain"`"#);
        assert_eq!(field_tag("json", "end\""), r#"`json:"end\""`"#);
    }

    #[test]
    fn backquote_in_key_is_flagged() {
        assert!(fits_raw_string("plain \"quoted\" key"));
        assert!(!fits_raw_string("tick`key"));
        assert_eq!(field_tag("json", "tick`key"), "`json:\"tick`key\"`");
    }

    #[test]
    fn optional_fields_get_no_omitempty() {
        let root = Node::root("Root")
            .with_type(NodeType::Object)
            .with_child(leaf("Maybe", NodeType::Int).with_required(false));
        let s = render_struct(&root, &cfg()).unwrap();
        assert_eq!(s.fields[0].tag.as_deref(), Some("`json:\"maybe\"`"));
    }

    #[test]
    fn extracted_uses_external_id() {
        let n = leaf("Owner", NodeType::Extracted).with_external_type_id("User");
        assert_eq!(render_type(&n, &cfg()).unwrap(), ident("User"));
        let n = leaf("Owner", NodeType::Extracted).with_required(false);
        assert_eq!(render_type(&n, &cfg()).unwrap(), TypeExpr::star(ident("Owner")));
        let n = leaf("Owners", NodeType::Extracted).with_array_level(1);
        assert_eq!(render_type(&n, &cfg()).unwrap(), TypeExpr::array(ident("Owners")));
    }

    #[test]
    fn maps_take_first_child() {
        let empty = leaf("Attrs", NodeType::Map);
        assert_eq!(
            render_type(&empty, &cfg()).unwrap(),
            TypeExpr::map(ident("string"), TypeExpr::Interface)
        );
        let typed = leaf("Attrs", NodeType::Map)
            .with_child(leaf("Value", NodeType::Float))
            .with_child(leaf("Ignored", NodeType::Bool));
        assert_eq!(
            render_type(&typed, &cfg()).unwrap(),
            TypeExpr::map(ident("string"), ident("float64"))
        );
    }

    #[test]
    fn other_is_verbatim() {
        let n = leaf("ID", NodeType::Other("uuid.UUID".into())).with_array_level(1);
        assert_eq!(render_type(&n, &cfg()).unwrap(), TypeExpr::array(ident("uuid.UUID")));
    }

    #[test]
    fn declarations_keep_root_order() {
        let roots = [
            Node::root("B").with_type(NodeType::Int),
            Node::root("A").with_type(NodeType::Object),
        ];
        let decls = render_declarations(&roots, &cfg()).unwrap();
        assert_eq!(decls[0], Decl { name: "B".into(), ty: ident("int64") });
        assert_eq!(decls[1], Decl { name: "A".into(), ty: TypeExpr::Struct(StructType::default()) });
    }

    #[test]
    fn invalid_trees_are_rejected() {
        let scalar_with_children = Node::root("Root")
            .with_type(NodeType::Object)
            .with_child(leaf("Bad", NodeType::Int).with_child(leaf("X", NodeType::Bool)));
        match render_declarations(&[scalar_with_children], &cfg()) {
            Err(Error::InvalidTree { path, .. }) => assert_eq!(path, "Root.Bad"),
            other => panic!("unexpected: {other:?}"),
        }

        let unnamed = Node::root("").with_type(NodeType::Object);
        assert!(matches!(
            render_declarations(&[unnamed], &cfg()),
            Err(Error::InvalidTree { .. })
        ));

        let nameless_extracted = Node::field("", "k").with_type(NodeType::Extracted);
        assert!(render_type(&nameless_extracted, &cfg()).is_err());
    }
}

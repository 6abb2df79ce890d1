//! Collect the entities a BEMJSON template tree uses.
//!
//! A BEMJSON node is an object with optional `block`, `elem`, `mods`,
//! `elemMods`, `mix` and `content` keys; `content` and `mix` hold nested
//! nodes or arrays of them. Elements inherit the nearest enclosing block.

use serde_json::Value;

use crate::declaration::{DeclEntry, Declaration};
use crate::entity::BemEntity;
use crate::error::MalformedEntity;

/// Walk a BEMJSON tree and return the entities it mentions, in tree order.
pub fn to_declaration(tree: &Value) -> Result<Declaration, MalformedEntity> {
    let mut decl = Declaration::new();
    walk(tree, None, &mut decl)?;
    Ok(decl)
}

fn walk(node: &Value, ctx_block: Option<&str>, decl: &mut Declaration) -> Result<(), MalformedEntity> {
    match node {
        Value::Array(items) => {
            for item in items {
                walk(item, ctx_block, decl)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            let own_block = map.get("block").and_then(Value::as_str);
            let elem = map.get("elem").and_then(Value::as_str);
            let block = own_block.or(ctx_block);

            let scope = match (block, elem) {
                (Some(block), Some(elem)) => Some(BemEntity::elem(block, elem)?),
                (Some(block), None) if own_block.is_some() => Some(BemEntity::block(block)?),
                (None, Some(elem)) => {
                    return Err(MalformedEntity::new(
                        format!("__{elem}"),
                        "element outside of any block",
                    ))
                }
                _ => None,
            };

            if let Some(scope) = &scope {
                decl.fold(DeclEntry::new(scope.clone()));
                let mods_key = if scope.is_elem() { "elemMods" } else { "mods" };
                if let Some(Value::Object(mods)) = map.get(mods_key) {
                    for (name, val) in mods {
                        let entity = match val {
                            Value::Bool(true) => scope.with_mod(name, None)?,
                            Value::String(s) if !s.is_empty() => scope.with_mod(name, Some(s))?,
                            Value::Number(n) => scope.with_mod(name, Some(&n.to_string()))?,
                            _ => continue,
                        };
                        decl.fold(DeclEntry::new(entity));
                    }
                }
            }

            if let Some(mix) = map.get("mix") {
                walk(mix, block, decl)?;
            }
            if let Some(content) = map.get("content") {
                walk(content, block, decl)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_numbers_are_ignored() {
        let tree = serde_json::json!(["text", 42, null]);
        assert!(to_declaration(&tree).unwrap().is_empty());
    }

    #[test]
    fn empty_string_modifier_is_skipped() {
        let tree = serde_json::json!({ "block": "b", "mods": { "m": "" } });
        let names: Vec<String> = to_declaration(&tree)
            .unwrap()
            .entities()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(names, ["b"]);
    }
}

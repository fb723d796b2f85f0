//! Named abbreviations and the content-hash round trip that keeps them
//! visible in output

use crate::object::Object;
use serde_json::Value;
use std::collections::BTreeMap;

/// Auxiliary key holding the alias an expanded node came from
pub const ALIAS_KEY: &str = "alias";
/// Auxiliary key holding the content hash of the definition at expansion time
pub const ALIAS_HASH_KEY: &str = "alias_hash";

/// Alias name to definition. Redefining a name replaces its binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasState {
    aliases: BTreeMap<String, Object>,
}

impl AliasState {
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.aliases.get(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// A copy with `name` bound to `definition`
    pub fn defined(&self, name: &str, definition: Object) -> Self {
        let mut aliases = self.aliases.clone();
        aliases.insert(name.to_string(), definition);
        Self { aliases }
    }

    /// Replace every atom naming an alias by its tagged definition.
    ///
    /// Definitions were expanded when they were stored, so one pass is
    /// enough.
    pub fn expand(&self, obj: &Object) -> Object {
        if self.aliases.is_empty() {
            return obj.clone();
        }
        obj.rewrite(&mut |node: &Object| {
            if let Some(expanded) = node.map_goal(|term| self.expand(term)) {
                return Some(expanded);
            }
            if !node.is_atom() {
                return None;
            }
            let name = node.name()?;
            let definition = self.aliases.get(name)?;
            Some(
                definition
                    .merged_with(node.data())
                    .with_data(ALIAS_KEY, name)
                    .with_data(ALIAS_HASH_KEY, definition.content_hash()),
            )
        })
    }
}

/// Fold tagged nodes whose structure is unchanged back into their alias
/// name. Other auxiliary entries survive the fold.
pub fn collapse(obj: &Object) -> Object {
    obj.rewrite(&mut |node: &Object| {
        if let Some(collapsed) = node.map_goal(collapse) {
            return Some(collapsed);
        }
        let name = node.get(ALIAS_KEY).and_then(Value::as_str)?;
        let hash = node.get(ALIAS_HASH_KEY).and_then(Value::as_u64)?;
        if hash != node.content_hash() {
            return None;
        }
        let kept = node.without_data(&[ALIAS_KEY, ALIAS_HASH_KEY]);
        Some(Object::atom(name).merged_with(kept.data()))
    })
}

//! Objects: the immutable trees every other part of the kernel works on.
//!
//! An [`Object`] is a reference-counted node, so cloning is cheap and
//! rebuilding a tree with one changed child shares every untouched subtree.
//! Each node carries an [`AuxData`] map for display hints and provenance
//! tags. Auxiliary data never takes part in equality, hashing or matching.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Auxiliary data attached to an object (display templates, alias tags, ...)
pub type AuxData = BTreeMap<String, Value>;

/// Key of the message template interpolated by [`crate::display::render`]
pub const RESULT_KEY: &str = "result";

/// The structural part of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Constructor application; no children means an atom.
    Term { name: String, children: Vec<Object> },
    /// Rewriting `left ~symbol~ right`.
    Rew {
        left: Object,
        symbol: String,
        right: Object,
    },
    /// Composition of two operands.
    Comp { left: Object, right: Object },
    /// Pattern variable.
    Hole { name: String },
    /// An obligation left to prove. Goals are leaves.
    Goal(GoalData),
}

/// Payload of a goal leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoalData {
    /// The statement as stated
    pub term: Object,
    /// `term` reduced to normal form
    pub reduced: Object,
    /// The rewriting symbol the statement is proved under
    pub symbol: String,
}

struct Node {
    kind: ObjectKind,
    data: AuxData,
}

/// An immutable, structurally shared term.
#[derive(Clone)]
pub struct Object(Rc<Node>);

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.kind == other.0.kind
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.kind.hash(state);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self::with_aux(kind, AuxData::new())
    }

    pub fn with_aux(kind: ObjectKind, data: AuxData) -> Self {
        Object(Rc::new(Node { kind, data }))
    }

    pub fn term(name: impl Into<String>, children: Vec<Object>) -> Self {
        Self::new(ObjectKind::Term {
            name: name.into(),
            children,
        })
    }

    /// A term with no children
    pub fn atom(name: impl Into<String>) -> Self {
        Self::term(name, Vec::new())
    }

    pub fn rew(left: Object, symbol: impl Into<String>, right: Object) -> Self {
        Self::new(ObjectKind::Rew {
            left,
            symbol: symbol.into(),
            right,
        })
    }

    pub fn comp(left: Object, right: Object) -> Self {
        Self::new(ObjectKind::Comp { left, right })
    }

    pub fn hole(name: impl Into<String>) -> Self {
        Self::new(ObjectKind::Hole { name: name.into() })
    }

    /// A goal leaf. `reduced` must be the normal form of `term`.
    pub fn goal(term: Object, reduced: Object, symbol: impl Into<String>) -> Self {
        Self::new(ObjectKind::Goal(GoalData {
            term,
            reduced,
            symbol: symbol.into(),
        }))
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.0.kind
    }

    pub fn data(&self) -> &AuxData {
        &self.0.data
    }

    /// Name of a term or a hole
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            ObjectKind::Term { name, .. } | ObjectKind::Hole { name } => Some(name),
            _ => None,
        }
    }

    /// Symbol of a rewriting
    pub fn symbol(&self) -> Option<&str> {
        match self.kind() {
            ObjectKind::Rew { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    /// Left operand of a rewriting or a composition
    pub fn left(&self) -> Option<&Object> {
        match self.kind() {
            ObjectKind::Rew { left, .. } | ObjectKind::Comp { left, .. } => Some(left),
            _ => None,
        }
    }

    /// Right operand of a rewriting or a composition
    pub fn right(&self) -> Option<&Object> {
        match self.kind() {
            ObjectKind::Rew { right, .. } | ObjectKind::Comp { right, .. } => Some(right),
            _ => None,
        }
    }

    pub fn as_goal(&self) -> Option<&GoalData> {
        match self.kind() {
            ObjectKind::Goal(goal) => Some(goal),
            _ => None,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self.kind(), ObjectKind::Hole { .. })
    }

    pub fn is_rew(&self) -> bool {
        matches!(self.kind(), ObjectKind::Rew { .. })
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind(), ObjectKind::Goal(_))
    }

    /// True for a term without children
    pub fn is_atom(&self) -> bool {
        matches!(self.kind(), ObjectKind::Term { children, .. } if children.is_empty())
    }

    /// Name of the variant, as used in serialized output
    pub fn variant_name(&self) -> &'static str {
        match self.kind() {
            ObjectKind::Term { .. } => "Term",
            ObjectKind::Rew { .. } => "Rew",
            ObjectKind::Comp { .. } => "Comp",
            ObjectKind::Hole { .. } => "Hole",
            ObjectKind::Goal(_) => "Goal",
        }
    }

    /// Ordered children. Rewritings and compositions have exactly two.
    pub fn children(&self) -> Vec<&Object> {
        match self.kind() {
            ObjectKind::Term { children, .. } => children.iter().collect(),
            ObjectKind::Rew { left, right, .. } | ObjectKind::Comp { left, right } => {
                vec![left, right]
            }
            ObjectKind::Hole { .. } | ObjectKind::Goal(_) => Vec::new(),
        }
    }

    /// Nesting depth, counting the statement inside a goal. An atom or a
    /// hole has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((obj, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let Some(goal) = obj.as_goal() {
                pending.push((&goal.term, depth + 1));
                pending.push((&goal.reduced, depth + 1));
            }
            pending.extend(obj.children().into_iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    pub fn child(&self, index: usize) -> Option<&Object> {
        match self.kind() {
            ObjectKind::Term { children, .. } => children.get(index),
            ObjectKind::Rew { left, right, .. } | ObjectKind::Comp { left, right } => {
                match index {
                    0 => Some(left),
                    1 => Some(right),
                    _ => None,
                }
            }
            ObjectKind::Hole { .. } | ObjectKind::Goal(_) => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self.kind() {
            ObjectKind::Term { children, .. } => children.len(),
            ObjectKind::Rew { .. } | ObjectKind::Comp { .. } => 2,
            ObjectKind::Hole { .. } | ObjectKind::Goal(_) => 0,
        }
    }

    /// Follow a path of child indices. The empty path is the object itself.
    pub fn get_child(&self, path: &[usize]) -> Option<&Object> {
        let mut current = self;
        for &index in path {
            current = current.child(index)?;
        }
        Some(current)
    }

    /// Rebuild this node with every child passed through `f`.
    ///
    /// Auxiliary data is kept. When no child changes identity the node
    /// itself is returned, so untouched subtrees stay shared.
    pub fn map_children(&self, mut f: impl FnMut(&Object) -> Object) -> Object {
        let kind = match self.kind() {
            ObjectKind::Term { name, children } => {
                let mapped: Vec<Object> = children.iter().map(&mut f).collect();
                if mapped.iter().zip(children).all(|(new, old)| new.same(old)) {
                    return self.clone();
                }
                ObjectKind::Term {
                    name: name.clone(),
                    children: mapped,
                }
            }
            ObjectKind::Rew {
                left,
                symbol,
                right,
            } => {
                let (new_left, new_right) = (f(left), f(right));
                if new_left.same(left) && new_right.same(right) {
                    return self.clone();
                }
                ObjectKind::Rew {
                    left: new_left,
                    symbol: symbol.clone(),
                    right: new_right,
                }
            }
            ObjectKind::Comp { left, right } => {
                let (new_left, new_right) = (f(left), f(right));
                if new_left.same(left) && new_right.same(right) {
                    return self.clone();
                }
                ObjectKind::Comp {
                    left: new_left,
                    right: new_right,
                }
            }
            ObjectKind::Hole { .. } | ObjectKind::Goal(_) => return self.clone(),
        };
        Object::with_aux(kind, self.data().clone())
    }

    /// Top-down rewrite: where `f` yields a replacement it is used as is,
    /// elsewhere the children are rewritten.
    pub fn rewrite<F>(&self, f: &mut F) -> Object
    where
        F: FnMut(&Object) -> Option<Object>,
    {
        match f(self) {
            Some(replacement) => replacement,
            None => self.map_children(|child| child.rewrite(&mut *f)),
        }
    }

    /// For a goal, a copy whose statement and reduced form went through `f`
    pub fn map_goal(&self, mut f: impl FnMut(&Object) -> Object) -> Option<Object> {
        let goal = self.as_goal()?;
        let kind = ObjectKind::Goal(GoalData {
            term: f(&goal.term),
            reduced: f(&goal.reduced),
            symbol: goal.symbol.clone(),
        });
        Some(Object::with_aux(kind, self.data().clone()))
    }

    /// Pointer identity
    pub fn same(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data().get(key)
    }

    /// Copy of this object with one auxiliary entry set
    pub fn with_data(&self, key: impl Into<String>, value: impl Into<Value>) -> Object {
        let mut data = self.data().clone();
        data.insert(key.into(), value.into());
        Object::with_aux(self.kind().clone(), data)
    }

    /// Copy of this object with the given auxiliary entries removed
    pub fn without_data(&self, keys: &[&str]) -> Object {
        if !keys.iter().any(|key| self.data().contains_key(*key)) {
            return self.clone();
        }
        let mut data = self.data().clone();
        for key in keys {
            data.remove(*key);
        }
        Object::with_aux(self.kind().clone(), data)
    }

    /// Copy of this object carrying `data` merged over its own entries
    pub fn merged_with(&self, data: &AuxData) -> Object {
        if data.is_empty() {
            return self.clone();
        }
        let mut merged = self.data().clone();
        merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        Object::with_aux(self.kind().clone(), merged)
    }

    /// Attach a message template. `[]` stands for the object itself and
    /// `[i.j]` for the child at that index path.
    pub fn with_result(&self, template: impl Into<String>) -> Object {
        self.with_data(RESULT_KEY, template.into())
    }

    pub fn result(&self) -> Option<&str> {
        self.get(RESULT_KEY).and_then(Value::as_str)
    }

    /// Names of every hole occurring in the object
    pub fn hole_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_holes(&mut names);
        names
    }

    fn collect_holes(&self, names: &mut BTreeSet<String>) {
        match self.kind() {
            ObjectKind::Hole { name } => {
                names.insert(name.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_holes(names);
                }
            }
        }
    }

    /// Rename holes according to `renaming`; holes not in the map are kept.
    pub fn rename_holes(&self, renaming: &BTreeMap<String, String>) -> Object {
        if renaming.is_empty() {
            return self.clone();
        }
        self.rewrite(&mut |obj: &Object| match obj.kind() {
            ObjectKind::Hole { name } => Some(match renaming.get(name) {
                Some(new_name) => Object::with_aux(
                    ObjectKind::Hole {
                        name: new_name.clone(),
                    },
                    obj.data().clone(),
                ),
                None => obj.clone(),
            }),
            _ => None,
        })
    }

    /// Hash of the structure alone, stable for the lifetime of the process.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// The reflexive rewriting `term ~symbol~ term`
pub fn identify(term: &Object, symbol: &str) -> Object {
    Object::rew(term.clone(), symbol, term.clone())
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.variant_name())?;
        match self.kind() {
            ObjectKind::Term { name, children } => {
                map.serialize_entry("name", name)?;
                if !children.is_empty() {
                    map.serialize_entry("children", children)?;
                }
            }
            ObjectKind::Rew {
                left,
                symbol,
                right,
            } => {
                map.serialize_entry("left", left)?;
                map.serialize_entry("symbol", symbol)?;
                map.serialize_entry("right", right)?;
            }
            ObjectKind::Comp { left, right } => {
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
            }
            ObjectKind::Hole { name } => map.serialize_entry("name", name)?,
            ObjectKind::Goal(goal) => {
                map.serialize_entry("term", &goal.term)?;
                map.serialize_entry("symbol", &goal.symbol)?;
            }
        }
        if !self.data().is_empty() {
            map.serialize_entry("data", self.data())?;
        }
        map.end()
    }
}

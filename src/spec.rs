//!
//! The structure of a context menu.
//!
//! A [MenuSpec] is an ordered list of labels, each of them bound
//! to either an [Action] or a nested MenuSpec. It is built once and
//! is immutable afterwards.
//!
//! There are two ways to get one:
//!
//! * [MenuBuilder] for menus defined in code.
//! * [MenuSpec::build] / [MenuSpec::from_json] for a declarative
//!   nested mapping. Strings name an action from an [ActionRegistry],
//!   objects are submenus.
//!
//! ```
//! use rat_context_menu::spec::{ActionRegistry, MenuSpec};
//!
//! let mut actions = ActionRegistry::new();
//! actions.register("open", || Ok(()));
//! actions.register("pdf", || Ok(()));
//! actions.register("csv", || Ok(()));
//!
//! let spec = MenuSpec::from_json(
//!     r#"{"Open": "open", "Export": {"PDF": "pdf", "CSV": "csv"}}"#,
//!     &actions,
//! )
//! .unwrap();
//! assert_eq!(spec.len(), 2);
//! ```
//!

use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Error returned by an action.
pub type ActionError = Box<dyn Error + 'static>;

/// Result of an action.
pub type ActionResult = Result<(), ActionError>;

/// Callback for a menu entry.
#[derive(Clone)]
pub struct Action {
    f: Rc<dyn Fn() -> ActionResult + 'static>,
}

/// Target of a menu entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Action(Action),
    SubMenu(Rc<MenuSpec>),
}

/// Menu structure.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MenuSpec {
    entries: Vec<(String, Entry)>,
}

/// Named actions for the declarative menu definition.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

/// Builder for a menu defined in code.
#[derive(Debug, Default)]
pub struct MenuBuilder {
    spec: MenuSpec,
}

/// The menu definition can't be turned into a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSpecError {
    /// The definition is no valid json.
    Parse(String),
    /// The top level is not a mapping.
    NotAMapping { found: &'static str },
    /// The value at this path is neither an action nor a mapping.
    NotAnEntry {
        path: Vec<String>,
        found: &'static str,
    },
    /// There is no action with this name.
    UnknownAction { path: Vec<String>, name: String },
}

impl Display for InvalidSpecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for InvalidSpecError {}

impl Action {
    pub fn new(f: impl Fn() -> ActionResult + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Run the action.
    pub fn invoke(&self) -> ActionResult {
        (self.f)()
    }

    /// Same callback.
    pub fn ptr_eq(&self, other: &Action) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.f), Rc::as_ptr(&other.f))
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action({:p})", Rc::as_ptr(&self.f))
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Entry {
    pub fn is_submenu(&self) -> bool {
        matches!(self, Entry::SubMenu(_))
    }

    pub fn submenu(&self) -> Option<&Rc<MenuSpec>> {
        match self {
            Entry::Action(_) => None,
            Entry::SubMenu(v) => Some(v),
        }
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Entry::Action(v) => Some(v),
            Entry::SubMenu(_) => None,
        }
    }
}

impl MenuSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a nested mapping.
    ///
    /// * object: a menu. Key order is kept, a repeated key
    ///   replaces the earlier value.
    /// * string: the name of an action in the registry.
    ///
    /// Everything else is an error.
    pub fn build(value: &Value, actions: &ActionRegistry) -> Result<Self, InvalidSpecError> {
        match value {
            Value::Object(_) => {
                let mut path = Vec::new();
                build_menu(value, actions, &mut path)
            }
            v => Err(InvalidSpecError::NotAMapping {
                found: json_type(v),
            }),
        }
    }

    /// Parse the json text and [build](MenuSpec::build).
    pub fn from_json(text: &str, actions: &ActionRegistry) -> Result<Self, InvalidSpecError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| InvalidSpecError::Parse(e.to_string()))?;
        Self::build(&value, actions)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by index.
    pub fn entry(&self, n: usize) -> Option<(&str, &Entry)> {
        self.entries.get(n).map(|(l, e)| (l.as_str(), e))
    }

    /// Entry by label.
    pub fn get(&self, label: &str) -> Option<&Entry> {
        self.position(label).map(|n| &self.entries[n].1)
    }

    /// Index of a label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|(l, _)| l == label)
    }

    /// All labels.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(l, e)| (l.as_str(), e))
    }

    /// Nesting depth. A menu without submenus has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .entries
            .iter()
            .filter_map(|(_, e)| e.submenu())
            .map(|v| v.depth())
            .max()
            .unwrap_or(0)
    }

    /// Add an entry. An existing label keeps its position and gets
    /// the new target.
    fn insert(&mut self, label: String, entry: Entry) {
        if let Some(n) = self.position(&label) {
            self.entries[n].1 = entry;
        } else {
            self.entries.push((label, entry));
        }
    }
}

fn build_menu(
    value: &Value,
    actions: &ActionRegistry,
    path: &mut Vec<String>,
) -> Result<MenuSpec, InvalidSpecError> {
    let Value::Object(map) = value else {
        return Err(InvalidSpecError::NotAnEntry {
            path: path.clone(),
            found: json_type(value),
        });
    };

    let mut spec = MenuSpec::new();
    for (label, v) in map {
        path.push(label.clone());
        let entry = match v {
            Value::String(name) => match actions.get(name) {
                Some(action) => Entry::Action(action.clone()),
                None => {
                    return Err(InvalidSpecError::UnknownAction {
                        path: path.clone(),
                        name: name.clone(),
                    });
                }
            },
            Value::Object(_) => Entry::SubMenu(Rc::new(build_menu(v, actions, path)?)),
            v => {
                return Err(InvalidSpecError::NotAnEntry {
                    path: path.clone(),
                    found: json_type(v),
                });
            }
        };
        path.pop();
        spec.insert(label.clone(), entry);
    }
    Ok(spec)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named action. Replaces an existing one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn() -> ActionResult + 'static,
    ) -> &mut Self {
        self.actions.insert(name.into(), Action::new(f));
        self
    }

    /// Register an existing action.
    pub fn register_action(&mut self, name: impl Into<String>, action: Action) -> &mut Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action.
    pub fn action(
        &mut self,
        label: impl Into<String>,
        f: impl Fn() -> ActionResult + 'static,
    ) -> &mut Self {
        self.spec.insert(label.into(), Entry::Action(Action::new(f)));
        self
    }

    /// Add an existing action.
    pub fn action_ref(&mut self, label: impl Into<String>, action: &Action) -> &mut Self {
        self.spec.insert(label.into(), Entry::Action(action.clone()));
        self
    }

    /// Add a submenu.
    pub fn submenu(&mut self, label: impl Into<String>, f: impl FnOnce(&mut MenuBuilder)) -> &mut Self {
        let mut sub = MenuBuilder::new();
        f(&mut sub);
        self.spec
            .insert(label.into(), Entry::SubMenu(Rc::new(sub.spec)));
        self
    }

    /// Finished menu.
    pub fn build(self) -> MenuSpec {
        self.spec
    }
}

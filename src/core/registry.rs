//! Named-logger registry
//!
//! A [`Registry`] owns a tree of [`Node`]s, one per path segment, rooted at the
//! empty-name root. Each node holds its own level and appender. Both are
//! snapshotted from the parent when the node is created and overwritten on the
//! whole subtree by [`Node::set_level`] / [`Node::set_appender`].
//!
//! Locking: every node has its own lock. Propagation locks a node, updates it,
//! copies out its children, unlocks, and only then visits the children, so no
//! thread ever holds two node locks at once and logging through unrelated
//! nodes never contends.

use super::appender::SharedAppender;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::metrics::LoggerMetrics;
use crate::appenders::ConsoleAppender;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Level of the root node, and therefore of every library logger nobody has
/// configured.
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Error;

/// Split a logger path into its non-empty segments. Both `/` and `::` work as
/// separators, so module paths can be used directly.
pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(|c: char| c == '/' || c == ':')
        .filter(|segment| !segment.is_empty())
}

fn default_appender() -> SharedAppender {
    Arc::new(ConsoleAppender::new())
}

struct NodeState {
    level: LogLevel,
    appender: SharedAppender,
    children: HashMap<String, Arc<Node>>,
}

/// One segment of the logger hierarchy.
pub struct Node {
    name: String,
    path: Vec<String>,
    parent: Weak<Node>,
    state: RwLock<NodeState>,
    metrics: Arc<LoggerMetrics>,
}

impl Node {
    fn root(level: LogLevel, appender: SharedAppender, metrics: Arc<LoggerMetrics>) -> Arc<Self> {
        Arc::new(Self {
            name: String::new(),
            path: Vec::new(),
            parent: Weak::new(),
            state: RwLock::new(NodeState {
                level,
                appender,
                children: HashMap::new(),
            }),
            metrics,
        })
    }

    /// This node's own segment; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segments from the root down to this node.
    pub fn names(&self) -> &[String] {
        &self.path
    }

    /// Segments joined with `/`; empty for the root.
    pub fn path(&self) -> String {
        self.path.join("/")
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    pub fn appender(&self) -> SharedAppender {
        Arc::clone(&self.state.read().appender)
    }

    pub(crate) fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Get or create the direct child called `segment`.
    ///
    /// A new child starts with this node's current level and appender. An
    /// empty segment returns this node.
    pub fn child(self: &Arc<Self>, segment: &str) -> Arc<Node> {
        if segment.is_empty() {
            return Arc::clone(self);
        }

        if let Some(existing) = self.state.read().children.get(segment) {
            return Arc::clone(existing);
        }

        // Level and appender are read under the same lock that inserts the
        // child, so a concurrent set_level either sees the child or the child
        // sees the new level.
        let mut state = self.state.write();
        let NodeState {
            level,
            appender,
            children,
        } = &mut *state;
        let child = children.entry(segment.to_string()).or_insert_with(|| {
            let mut path = self.path.clone();
            path.push(segment.to_string());
            Arc::new(Node {
                name: segment.to_string(),
                path,
                parent: Arc::downgrade(self),
                state: RwLock::new(NodeState {
                    level: *level,
                    appender: Arc::clone(appender),
                    children: HashMap::new(),
                }),
                metrics: Arc::clone(&self.metrics),
            })
        });
        Arc::clone(child)
    }

    /// Walk (and create) one node per non-empty segment of `path`.
    pub fn descendant(self: &Arc<Self>, path: &str) -> Arc<Node> {
        path_segments(path).fold(Arc::clone(self), |node, segment| node.child(segment))
    }

    /// Look up an existing descendant without creating anything.
    pub fn find(self: &Arc<Self>, path: &str) -> Option<Arc<Node>> {
        let mut node = Arc::clone(self);
        for segment in path_segments(path) {
            let next = node.state.read().children.get(segment).cloned()?;
            node = next;
        }
        Some(node)
    }

    /// Set the level of this node and every existing descendant.
    ///
    /// `LogLevel::Default` resolves to the parent's current level (the root
    /// falls back to [`DEFAULT_ROOT_LEVEL`]).
    pub fn set_level(&self, level: LogLevel) {
        let level = if level.is_default() {
            self.parent()
                .map_or(DEFAULT_ROOT_LEVEL, |parent| parent.level())
        } else {
            level
        };
        self.propagate(|state| state.level = level);
    }

    /// Install `appender` on this node and every existing descendant.
    pub fn set_appender(&self, appender: SharedAppender) {
        self.propagate(|state| state.appender = Arc::clone(&appender));
    }

    /// Reinstall the built-in stderr appender on this subtree.
    pub fn clear_appender(&self) {
        self.set_appender(default_appender());
    }

    fn propagate(&self, apply: impl Fn(&mut NodeState)) {
        let mut pending = self.update(&apply);
        while let Some(node) = pending.pop() {
            pending.extend(node.update(&apply));
        }
    }

    /// Apply under this node's lock and return its children for the caller to
    /// visit after the lock is released.
    fn update(&self, apply: &impl Fn(&mut NodeState)) -> Vec<Arc<Node>> {
        let mut state = self.state.write();
        apply(&mut state);
        state.children.values().cloned().collect()
    }

    /// Shallow snapshot of the direct children.
    pub fn children(&self) -> BTreeMap<String, Arc<Node>> {
        self.state
            .read()
            .children
            .iter()
            .map(|(name, node)| (name.clone(), Arc::clone(node)))
            .collect()
    }

    /// Recursive snapshot of this subtree.
    pub fn snapshot(&self) -> NodeSnapshot {
        let (level, appender, children) = {
            let state = self.state.read();
            (
                state.level,
                state.appender.name().to_string(),
                state.children.values().cloned().collect::<Vec<_>>(),
            )
        };
        let mut children: Vec<NodeSnapshot> = children.iter().map(|c| c.snapshot()).collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        NodeSnapshot {
            name: self.name.clone(),
            path: self.path(),
            level,
            appender,
            children,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path())
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

/// Diagnostic copy of a node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub path: String,
    pub level: LogLevel,
    pub appender: String,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// This node followed by every descendant, depth first.
    pub fn iter(&self) -> impl Iterator<Item = &NodeSnapshot> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, path: &str) -> Option<&NodeSnapshot> {
        self.iter().find(|node| node.path == path)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let label = if self.path.is_empty() { "<root>" } else { &self.path };
        writeln!(f, "{:indent$}{:>7} {}", "", self.level, label, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Owner of a logger tree.
///
/// Cloning is cheap and every clone refers to the same tree. Applications
/// usually build one at start-up and hand it (or loggers derived from it) to
/// their components; tests build their own isolated instances.
///
/// # Example
///
/// ```
/// use rust_named_logger::prelude::*;
///
/// let registry = Registry::new();
/// let peers = registry.named("net/peer");
///
/// // Libraries stay at ERROR until the application opts in
/// assert_eq!(peers.effective_level(), LogLevel::Error);
///
/// registry.named("net").set_level(LogLevel::Debug);
/// assert_eq!(peers.effective_level(), LogLevel::Debug);
/// ```
#[derive(Clone)]
pub struct Registry {
    root: Arc<Node>,
    metrics: Arc<LoggerMetrics>,
}

impl Registry {
    /// Registry whose root logs `ERROR` to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT_LEVEL, default_appender())
    }

    fn with_root(level: LogLevel, appender: SharedAppender) -> Self {
        let metrics = Arc::new(LoggerMetrics::new());
        Self {
            root: Node::root(level, appender, Arc::clone(&metrics)),
            metrics,
        }
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Process-wide registry for code that cannot be handed one.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    pub fn root_node(&self) -> &Arc<Node> {
        &self.root
    }

    /// Handle bound to the root.
    pub fn root(&self) -> Logger {
        Logger::new(Arc::clone(&self.root))
    }

    /// Get or create the node for `path`.
    pub fn node(&self, path: &str) -> Arc<Node> {
        self.root.descendant(path)
    }

    /// Handle bound to the node for `path`, creating it if needed.
    pub fn named(&self, path: &str) -> Logger {
        Logger::new(self.node(path))
    }

    /// Set the level of the root and every existing node; new nodes inherit it.
    pub fn set_global_level(&self, level: LogLevel) {
        self.root.set_level(level);
    }

    /// Install an appender on the root and every existing node.
    pub fn set_global_appender(&self, appender: SharedAppender) {
        self.root.set_appender(appender);
    }

    pub fn clear_global_appender(&self) {
        self.root.clear_appender();
    }

    /// Snapshot of the whole tree, for diagnostics.
    pub fn tree(&self) -> NodeSnapshot {
        self.root.snapshot()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("level", &self.root.level())
            .field("appender", &self.root.appender().name())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Registry`]
///
/// # Example
/// ```
/// use rust_named_logger::prelude::*;
///
/// let registry = Registry::builder()
///     .level(LogLevel::Info)
///     .appender(MemoryAppender::new())
///     .build();
/// assert_eq!(registry.root().effective_level(), LogLevel::Info);
/// ```
pub struct RegistryBuilder {
    level: LogLevel,
    appender: Option<SharedAppender>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            level: DEFAULT_ROOT_LEVEL,
            appender: None,
        }
    }

    /// Root level; `Default` keeps [`DEFAULT_ROOT_LEVEL`].
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = if level.is_default() {
            DEFAULT_ROOT_LEVEL
        } else {
            level
        };
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: super::appender::Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Arc::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, appender: SharedAppender) -> Self {
        self.appender = Some(appender);
        self
    }

    pub fn build(self) -> Registry {
        Registry::with_root(
            self.level,
            self.appender.unwrap_or_else(default_appender),
        )
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for `path` in the process-wide registry.
pub fn named(path: &str) -> Logger {
    Registry::global().named(path)
}

/// Set the level of every logger in the process-wide registry.
///
/// This also reaches libraries' loggers. Prefer `named(..).set_level(..)` on
/// the subtree you care about.
pub fn set_global_level(level: LogLevel) {
    Registry::global().set_global_level(level);
}

/// Install an appender on every logger in the process-wide registry.
pub fn set_global_appender(appender: SharedAppender) {
    Registry::global().set_global_appender(appender);
}

/// Snapshot of the process-wide registry.
pub fn all() -> NodeSnapshot {
    Registry::global().tree()
}

//! Per-method route tree.
//!
//! Each node matches one path segment. A node has any number of static
//! children, at most one parameter child, and at most one catch-all child.
//! Lookup tries them in that order at every depth and backtracks when a
//! branch dead-ends:
//!
//! ```text
//! root
//! └── "users"
//!     ├── "list"        ← /users/list
//!     └── {id}          ← /users/{id}
//!         └── "posts"   ← /users/{id}/posts
//! ```

use std::sync::Arc;

use crate::params::Params;
use crate::pattern::Segment;

/// Why a pattern could not be inserted.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Conflict {
    /// The pattern already ends at a node with a value.
    Duplicate,
    /// The tree already has a parameter at this position under another name.
    ParamName { name: String, existing: String },
}

#[derive(Clone)]
pub(crate) struct Node<T> {
    // Static text, or the parameter name for param and catch-all nodes.
    key: Arc<str>,
    children: Vec<Node<T>>,
    param: Option<Box<Node<T>>>,
    catch_all: Option<Box<Node<T>>>,
    value: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<T> Node<T> {
    fn new(key: &str) -> Self {
        Self {
            key: Arc::from(key),
            children: Vec::new(),
            param: None,
            catch_all: None,
            value: None,
        }
    }

    /// Inserts `value` at the node `segments` lead to.
    ///
    /// The whole path is checked first, so on error the tree is unchanged.
    pub(crate) fn insert(&mut self, segments: &[Segment], value: T) -> Result<(), Conflict> {
        self.check(segments)?;
        self.insert_unchecked(segments, value);
        Ok(())
    }

    fn check(&self, segments: &[Segment]) -> Result<(), Conflict> {
        let Some((first, rest)) = segments.split_first() else {
            return match self.value {
                Some(_) => Err(Conflict::Duplicate),
                None => Ok(()),
            };
        };

        let next = match first {
            Segment::Static(text) => self.children.iter().find(|c| *c.key == **text),
            Segment::Param(name) => same_name(self.param.as_deref(), name)?,
            Segment::CatchAll(name) => same_name(self.catch_all.as_deref(), name)?,
        };

        match next {
            Some(node) => node.check(rest),
            None => Ok(()),
        }
    }

    fn insert_unchecked(&mut self, segments: &[Segment], value: T) {
        let Some((first, rest)) = segments.split_first() else {
            self.value = Some(value);
            return;
        };

        let child = match first {
            Segment::Static(text) => {
                let i = match self.children.iter().position(|c| *c.key == **text) {
                    Some(i) => i,
                    None => {
                        self.children.push(Node::new(text));
                        self.children.len() - 1
                    }
                };
                &mut self.children[i]
            }
            Segment::Param(name) => &mut **self.param.get_or_insert_with(|| Box::new(Node::new(name))),
            Segment::CatchAll(name) => {
                &mut **self.catch_all.get_or_insert_with(|| Box::new(Node::new(name)))
            }
        };

        child.insert_unchecked(rest, value);
    }

    /// Finds the value registered for `path`, writing captures into `params`.
    ///
    /// On `None`, `params` holds exactly what it held on entry.
    pub(crate) fn lookup(&self, path: &str, params: &mut Params) -> Option<&T> {
        self.find(path.strip_prefix('/').unwrap_or(path), params)
    }

    fn find(&self, path: &str, params: &mut Params) -> Option<&T> {
        if path.is_empty() {
            return self.value.as_ref();
        }

        let (segment, remaining) = path.split_once('/').unwrap_or((path, ""));
        let checkpoint = params.len();

        if let Some(child) = self.children.iter().find(|c| *c.key == *segment) {
            if let Some(value) = child.find(remaining, params) {
                return Some(value);
            }
            params.truncate(checkpoint);
        }

        if let Some(param) = &self.param {
            params.push(&param.key, segment);
            if let Some(value) = param.find(remaining, params) {
                return Some(value);
            }
            params.truncate(checkpoint);
        }

        if let Some(catch_all) = &self.catch_all {
            // `path` is exactly `segment/remaining` whenever `remaining` is non-empty.
            let rest = if remaining.is_empty() { segment } else { path };
            params.push(&catch_all.key, rest);
            if catch_all.value.is_none() {
                params.truncate(checkpoint);
            }
            return catch_all.value.as_ref();
        }

        None
    }
}

fn same_name<'n, T>(node: Option<&'n Node<T>>, name: &str) -> Result<Option<&'n Node<T>>, Conflict> {
    match node {
        Some(node) if *node.key != *name => Err(Conflict::ParamName {
            name: name.to_owned(),
            existing: node.key.to_string(),
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse;

    fn tree(routes: &[&'static str]) -> Node<&'static str> {
        let mut root = Node::default();
        for route in routes {
            root.insert(&parse(route), *route).unwrap();
        }
        root
    }

    fn at(root: &Node<&'static str>, path: &str) -> Option<(&'static str, Vec<(String, String)>)> {
        let mut params = Params::default();
        let found = root.lookup(path, &mut params).copied();
        let captured = params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();
        match found {
            Some(route) => Some((route, captured)),
            None => {
                assert!(params.is_empty(), "miss on {path} left bindings: {params:?}");
                None
            }
        }
    }

    fn kv(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn static_routes_round_trip() {
        let routes = ["/", "/a", "/a/b", "/a/b/c", "/hello/world", "/x/y/z/w"];
        let root = tree(&routes);
        for route in routes {
            assert_eq!(at(&root, route), Some((route, vec![])), "{route}");
        }
    }

    #[test]
    fn prefix_without_route_misses() {
        let root = tree(&["/a/b/c"]);
        assert_eq!(at(&root, "/a"), None);
        assert_eq!(at(&root, "/a/b"), None);
        assert_eq!(at(&root, "/a/b/c/d"), None);
        assert_eq!(at(&root, "/"), None);
    }

    #[test]
    fn captures_named_params() {
        let root = tree(&["/users/{uid}/posts/{pid}"]);
        assert_eq!(
            at(&root, "/users/1/posts/2"),
            Some(("/users/{uid}/posts/{pid}", kv(&[("uid", "1"), ("pid", "2")]))),
        );
    }

    #[test]
    fn catch_all_takes_the_remainder() {
        let root = tree(&["/files/{path...}"]);
        assert_eq!(at(&root, "/files/a/b/c"), Some(("/files/{path...}", kv(&[("path", "a/b/c")]))));
        assert_eq!(at(&root, "/files/a"), Some(("/files/{path...}", kv(&[("path", "a")]))));
        assert_eq!(at(&root, "/files"), None);
    }

    #[test]
    fn static_beats_param_beats_catch_all() {
        let root = tree(&["/users/list", "/users/{id}", "/users/{rest...}"]);
        assert_eq!(at(&root, "/users/list"), Some(("/users/list", vec![])));
        assert_eq!(at(&root, "/users/7"), Some(("/users/{id}", kv(&[("id", "7")]))));
        assert_eq!(at(&root, "/users/7/x"), Some(("/users/{rest...}", kv(&[("rest", "7/x")]))));
    }

    #[test]
    fn precedence_holds_below_the_root() {
        let root = tree(&["/a/{x}/b/static", "/a/{x}/b/{y}"]);
        assert_eq!(at(&root, "/a/1/b/static"), Some(("/a/{x}/b/static", kv(&[("x", "1")]))));
        assert_eq!(at(&root, "/a/1/b/2"), Some(("/a/{x}/b/{y}", kv(&[("x", "1"), ("y", "2")]))));
    }

    #[test]
    fn backtracks_from_static_into_param() {
        let root = tree(&["/a/{x}/static", "/a/fixed/other"]);
        assert_eq!(at(&root, "/a/fixed/static"), Some(("/a/{x}/static", kv(&[("x", "fixed")]))));
        assert_eq!(at(&root, "/a/fixed/other"), Some(("/a/fixed/other", vec![])));
    }

    #[test]
    fn backtracking_drops_stale_bindings() {
        let root = tree(&["/{a}/b/{c}/d", "/{a}/{b}/c"]);
        assert_eq!(at(&root, "/1/b/c"), Some(("/{a}/{b}/c", kv(&[("a", "1"), ("b", "b")]))));
    }

    #[test]
    fn backtracks_from_param_into_catch_all() {
        let root = tree(&["/src/{file}/raw", "/src/{path...}"]);
        assert_eq!(at(&root, "/src/main.rs/raw"), Some(("/src/{file}/raw", kv(&[("file", "main.rs")]))));
        assert_eq!(at(&root, "/src/main.rs/blame"), Some(("/src/{path...}", kv(&[("path", "main.rs/blame")]))));
    }

    #[test]
    fn trailing_slash_matches_the_bare_route() {
        let root = tree(&["/users"]);
        assert_eq!(at(&root, "/users/"), Some(("/users", vec![])));
    }

    #[test]
    fn duplicate_terminal_is_a_conflict() {
        let mut root = tree(&["/users/{id}", "/files/{path...}"]);
        assert_eq!(root.insert(&parse("/users/{id}"), "again"), Err(Conflict::Duplicate));
        assert_eq!(root.insert(&parse("/files/{path...}"), "again"), Err(Conflict::Duplicate));
    }

    #[test]
    fn differently_named_param_is_a_conflict() {
        let mut root = tree(&["/users/{id}"]);
        assert_eq!(
            root.insert(&parse("/users/{uid}/posts"), "x"),
            Err(Conflict::ParamName { name: "uid".into(), existing: "id".into() }),
        );
        assert_eq!(root.insert(&parse("/users/{id}/posts"), "/users/{id}/posts"), Ok(()));
    }

    #[test]
    fn rejected_insert_leaves_tree_unchanged() {
        let mut root = tree(&["/a/{x}"]);
        assert!(root.insert(&parse("/a/{y}/b"), "x").is_err());
        assert!(root.insert(&parse("/new/{y}/b"), "ok").is_ok());
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].param.as_ref().unwrap().children.is_empty());
    }
}

use crate::common::error::GDataError;
use crate::xml::document::{Document, NodeId, split_qname};
use crate::xml::ns::NamespaceRegistry;

/// A compiled path expression.
///
/// Grammar: an optional leading `//` lets the first step match at any depth,
/// followed by `/`-separated steps of the form `prefix:local` (the prefix is
/// optional) with any number of `[@attr='value']` predicates, and an optional
/// final `text()` selecting the matched elements' text children.
///
/// Prefixes resolve against the registry at compile time; an unregistered
/// prefix is a [`GDataError::QueryContext`] failure, which is different from
/// a valid expression that matches nothing.
#[derive(Debug, Clone)]
pub struct PathExpr {
    descend: bool,
    steps: Vec<Step>,
    text: bool,
}

#[derive(Debug, Clone)]
struct Step {
    ns: Option<String>,
    local: String,
    predicates: Vec<(String, String)>,
}

impl PathExpr {
    pub fn parse(expr: &str, registry: &NamespaceRegistry) -> Result<Self, GDataError> {
        let (descend, rest) = match expr.strip_prefix("//") {
            Some(r) => (true, r),
            None => (false, expr.strip_prefix('/').unwrap_or(expr)),
        };

        let raw_steps = split_steps(rest);
        let mut steps = Vec::with_capacity(raw_steps.len());
        let mut text = false;
        for (i, raw) in raw_steps.iter().enumerate() {
            if *raw == "text()" {
                if i + 1 != raw_steps.len() {
                    return Err(GDataError::QueryContext(format!(
                        "text() must be the final step in `{expr}`"
                    )));
                }
                text = true;
            } else {
                steps.push(Step::parse(raw, registry, expr)?);
            }
        }
        if steps.is_empty() {
            return Err(GDataError::QueryContext(format!(
                "empty path expression `{expr}`"
            )));
        }

        Ok(Self {
            descend,
            steps,
            text,
        })
    }

    /// Matched nodes in document order: text nodes for a `text()` expression,
    /// element nodes otherwise. An empty result is not an error.
    pub fn evaluate(&self, doc: &Document) -> Vec<NodeId> {
        let Some(first) = self.steps.first() else {
            return Vec::new();
        };

        let mut current: Vec<NodeId> = Vec::new();
        if self.descend {
            for id in doc.descendants(doc.root()) {
                if first.matches(doc, id) {
                    current.push(id);
                }
            }
        } else {
            for id in doc.child_elements(doc.root()) {
                if first.matches(doc, id) {
                    current.push(id);
                }
            }
        }

        for step in &self.steps[1..] {
            let mut next = Vec::new();
            for &node in &current {
                for child in doc.child_elements(node) {
                    if step.matches(doc, child) {
                        next.push(child);
                    }
                }
            }
            current = next;
        }

        if self.text {
            let mut texts = Vec::new();
            for &node in &current {
                for &child in doc.children(node) {
                    if doc.text(child).is_some() {
                        texts.push(child);
                    }
                }
            }
            texts
        } else {
            current
        }
    }
}

impl Step {
    fn parse(raw: &str, registry: &NamespaceRegistry, expr: &str) -> Result<Self, GDataError> {
        let (name_part, mut rest) = match raw.find('[') {
            Some(idx) => (&raw[..idx], &raw[idx..]),
            None => (raw, ""),
        };
        if name_part.is_empty() {
            return Err(GDataError::QueryContext(format!(
                "empty step in path `{expr}`"
            )));
        }

        let (prefix, local) = split_qname(name_part);
        let ns = match prefix {
            Some(p) => {
                let uri = registry.resolve(p).ok_or_else(|| {
                    GDataError::QueryContext(format!(
                        "unregistered namespace prefix `{p}` in `{expr}`"
                    ))
                })?;
                Some(uri.to_string())
            }
            None => None,
        };

        let mut predicates = Vec::new();
        while let Some(stripped) = rest.strip_prefix("[@") {
            let (attr, after) = stripped.split_once("='").ok_or_else(|| bad_predicate(expr))?;
            let (value, after) = after.split_once('\'').ok_or_else(|| bad_predicate(expr))?;
            rest = after.strip_prefix(']').ok_or_else(|| bad_predicate(expr))?;
            predicates.push((attr.to_string(), value.to_string()));
        }
        if !rest.is_empty() {
            return Err(bad_predicate(expr));
        }

        Ok(Self {
            ns,
            local: local.to_string(),
            predicates,
        })
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        if doc.local_name(id) != Some(self.local.as_str()) {
            return false;
        }
        if let Some(ns) = &self.ns
            && doc.namespace(id) != Some(ns.as_str())
        {
            return false;
        }
        self.predicates
            .iter()
            .all(|(attr, want)| doc.attr(id, attr) == Some(want.as_str()))
    }
}

fn bad_predicate(expr: &str) -> GDataError {
    GDataError::QueryContext(format!(
        "malformed predicate in path `{expr}`, expected [@attr='value']"
    ))
}

/// Split on `/` outside predicate brackets and quoted strings, so attribute
/// values containing slashes stay intact.
fn split_steps(expr: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut depth = 0usize;

    for (i, ch) in expr.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            '/' if !in_quotes && depth == 0 => {
                out.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&expr[start..]);
    out
}

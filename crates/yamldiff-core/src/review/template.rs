//! A small subset of Go's `text/template`, enough for PR comment bodies.
//!
//! Supported actions: `{{.Field}}`, `{{.Field.Key}}`, `{{.}}`, `{{$.Field}}`,
//! `{{if X}}`/`{{else if Y}}`/`{{else}}`/`{{end}}`, `{{range X}}`/`{{else}}`/`{{end}}`,
//! `{{/* comments */}}`, and the `{{-`/`-}}` whitespace trim markers.
//!
//! Output follows Go's `fmt` printing: missing keys and nulls print
//! `<no value>`, lists print as `[a b]` and maps as `map[k:v]` with sorted keys.

use crate::{TemplateError, Value};

static NULL: Value = Value::Null;

const NO_VALUE: &str = "<no value>";

/// A parsed comment template.
///
/// ```
/// # use yamldiff_core::{review::Template, Mapping, Value};
/// let template = Template::parse("{{if .Ok}}yes{{else}}no{{end}}: {{.Name}}")?;
/// let mut data = Mapping::new();
/// data.insert("Ok".into(), Value::from(true));
/// data.insert("Name".into(), Value::from("web"));
/// assert_eq!(template.render(&Value::Mapping(data))?, "yes: web");
/// # Ok::<(), yamldiff_core::TemplateError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Text(String),
    Output(Expr),
    If { cond: Expr, then: Vec<Node>, otherwise: Vec<Node> },
    Range { expr: Expr, body: Vec<Node>, otherwise: Vec<Node> },
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Dot(Vec<String>),
    Root(Vec<String>),
}

impl Expr {
    fn parse(source: &str) -> Result<Self, TemplateError> {
        let (root, rest) = if let Some(rest) = source.strip_prefix('$') {
            (true, rest)
        } else if source.starts_with('.') {
            (false, source)
        } else {
            return Err(TemplateError::parse(format!("unsupported expression {source:?}")));
        };
        let mut fields = Vec::new();
        if !rest.is_empty() && rest != "." {
            let Some(path) = rest.strip_prefix('.') else {
                return Err(TemplateError::parse(format!("unsupported expression {source:?}")));
            };
            for field in path.split('.') {
                if field.is_empty() || !field.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(TemplateError::parse(format!("bad field name in {source:?}")));
                }
                fields.push(field.to_string());
            }
        }
        Ok(if root { Self::Root(fields) } else { Self::Dot(fields) })
    }

    fn describe(&self) -> String {
        let (base, fields) = match self {
            Self::Dot(fields) => ("", fields),
            Self::Root(fields) => ("$", fields),
        };
        if fields.is_empty() {
            return if base.is_empty() { ".".to_string() } else { base.to_string() };
        }
        format!("{base}.{}", fields.join("."))
    }
}

#[derive(Debug)]
enum Token {
    Text(String),
    Action(String),
}

enum Terminator {
    Eof,
    End,
    Else,
    ElseIf(Expr),
}

impl Template {
    /// Parses template source.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let tokens = lex(source)?;
        let mut parser = Parser { tokens: tokens.into_iter() };
        let (nodes, terminator) = parser.block()?;
        match terminator {
            Terminator::Eof => Ok(Self { nodes }),
            Terminator::End => Err(TemplateError::parse("unexpected {{end}}")),
            Terminator::Else | Terminator::ElseIf(_) => {
                Err(TemplateError::parse("unexpected {{else}}"))
            }
        }
    }

    /// Executes the template against `data`, which is also the `$` root.
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        let scope = Scope { root: data, dot: data };
        render_nodes(&self.nodes, &scope, &mut out)?;
        Ok(out)
    }
}

/// Parses and executes `source` in one step.
pub fn render_template(source: &str, data: &Value) -> Result<String, TemplateError> {
    Template::parse(source)?.render(data)
}

fn lex(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut trim_next = false;
    while let Some(start) = rest.find("{{") {
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }
        let after_open = &rest[start + 2..];
        let trim_before = after_open.starts_with("- ")
            || after_open.starts_with("-\n")
            || after_open.starts_with("-\t");
        if trim_before {
            text = text.trim_end();
        }
        if !text.is_empty() {
            tokens.push(Token::Text(text.to_string()));
        }
        let Some(close) = after_open.find("}}") else {
            return Err(TemplateError::parse("unclosed action"));
        };
        let mut inner = &after_open[..close];
        if trim_before {
            inner = &inner[1..];
        }
        trim_next = inner.ends_with('-')
            && inner[..inner.len() - 1].ends_with(|c: char| c.is_whitespace());
        if trim_next {
            inner = &inner[..inner.len() - 1];
        }
        tokens.push(Token::Action(inner.trim().to_string()));
        rest = &after_open[close + 2..];
    }
    let text = if trim_next { rest.trim_start() } else { rest };
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
    Ok(tokens)
}

struct Parser {
    tokens: std::vec::IntoIter<Token>,
}

impl Parser {
    fn block(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.next() {
            let action = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action(action) => action,
            };
            if action.starts_with("/*") {
                if !action.ends_with("*/") {
                    return Err(TemplateError::parse("unclosed comment"));
                }
                continue;
            }
            match keyword(&action) {
                ("end", "") => return Ok((nodes, Terminator::End)),
                ("else", "") => return Ok((nodes, Terminator::Else)),
                ("else", rest) => {
                    let Some(cond) = rest.strip_prefix("if ") else {
                        return Err(TemplateError::parse(format!("unsupported action {action:?}")));
                    };
                    return Ok((nodes, Terminator::ElseIf(Expr::parse(cond.trim())?)));
                }
                ("if", rest) => nodes.push(self.if_node(Expr::parse(rest)?)?),
                ("range", rest) => {
                    let expr = Expr::parse(rest)?;
                    let (body, terminator) = self.block()?;
                    let otherwise = match terminator {
                        Terminator::End => Vec::new(),
                        Terminator::Else => self.closing_block("range")?,
                        Terminator::Eof => {
                            return Err(TemplateError::parse("unterminated {{range}}"))
                        }
                        Terminator::ElseIf(_) => {
                            return Err(TemplateError::parse("{{else if}} inside {{range}}"))
                        }
                    };
                    nodes.push(Node::Range { expr, body, otherwise });
                }
                _ => nodes.push(Node::Output(Expr::parse(&action)?)),
            }
        }
        Ok((nodes, Terminator::Eof))
    }

    fn if_node(&mut self, cond: Expr) -> Result<Node, TemplateError> {
        let (then, terminator) = self.block()?;
        let otherwise = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Else => self.closing_block("if")?,
            Terminator::ElseIf(next) => vec![self.if_node(next)?],
            Terminator::Eof => return Err(TemplateError::parse("unterminated {{if}}")),
        };
        Ok(Node::If { cond, then, otherwise })
    }

    fn closing_block(&mut self, construct: &str) -> Result<Vec<Node>, TemplateError> {
        match self.block()? {
            (nodes, Terminator::End) => Ok(nodes),
            _ => Err(TemplateError::parse(format!("unterminated {{{{{construct}}}}} else branch"))),
        }
    }
}

fn keyword(action: &str) -> (&str, &str) {
    match action.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (action, ""),
    }
}

struct Scope<'a> {
    root: &'a Value,
    dot: &'a Value,
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Output(expr) => match evaluate(expr, scope)? {
                Value::Null => out.push_str(NO_VALUE),
                value => print_value(value, out),
            },
            Node::If { cond, then, otherwise } => {
                let branch = if evaluate(cond, scope)?.is_truthy() { then } else { otherwise };
                render_nodes(branch, scope, out)?;
            }
            Node::Range { expr, body, otherwise } => {
                let items: Vec<&Value> = match evaluate(expr, scope)? {
                    Value::Null => Vec::new(),
                    Value::Sequence(items) => items.iter().collect(),
                    Value::Mapping(map) => {
                        let mut entries: Vec<_> = map.iter().collect();
                        entries.sort_by(|a, b| a.0.cmp(b.0));
                        entries.into_iter().map(|(_, value)| value).collect()
                    }
                    _ => return Err(TemplateError::NotIterable { field: expr.describe() }),
                };
                if items.is_empty() {
                    render_nodes(otherwise, scope, out)?;
                }
                for item in items {
                    render_nodes(body, &Scope { root: scope.root, dot: item }, out)?;
                }
            }
        }
    }
    Ok(())
}

fn print_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("<nil>"),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                print_value(item, out);
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push_str("map[");
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                print_value(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn evaluate<'a>(expr: &Expr, scope: &Scope<'a>) -> Result<&'a Value, TemplateError> {
    let (mut current, fields) = match expr {
        Expr::Dot(fields) => (scope.dot, fields),
        Expr::Root(fields) => (scope.root, fields),
    };
    for field in fields {
        let Value::Mapping(map) = current else {
            return Err(TemplateError::UnknownField { field: field.clone() });
        };
        current = match map.get(field) {
            Some(value) => value,
            // Missing fields on the top-level data are template bugs; missing
            // user-supplied keys print `<no value>`, like Go map lookups.
            None if std::ptr::eq(current, scope.root) => {
                return Err(TemplateError::UnknownField { field: field.clone() })
            }
            None => &NULL,
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mapping;

    fn data() -> Value {
        let mut vars = Mapping::new();
        vars.insert("env".into(), Value::from("prod"));
        let mut root = Mapping::new();
        root.insert("Summary".into(), Value::from("Plan: 1 to add"));
        root.insert("HasChanges".into(), Value::from(true));
        root.insert("Added".into(), Value::from(2_i64));
        root.insert("Deleted".into(), Value::from(0_i64));
        root.insert(
            "AddedList".into(),
            Value::Sequence(vec![Value::from("a"), Value::from("b")]),
        );
        root.insert("DeletedList".into(), Value::Sequence(Vec::new()));
        root.insert("Link".into(), Value::from(""));
        root.insert("Vars".into(), Value::Mapping(vars));
        Value::Mapping(root)
    }

    fn render(source: &str) -> Result<String, TemplateError> {
        render_template(source, &data())
    }

    #[test]
    fn interpolates_fields() {
        assert_eq!(render("## {{ .Summary }} ({{.Added}})").unwrap(), "## Plan: 1 to add (2)");
    }

    #[test]
    fn nested_vars_lookup() {
        assert_eq!(render("env={{.Vars.env}}").unwrap(), "env=prod");
        assert_eq!(render("x={{.Vars.missing}}").unwrap(), "x=<no value>");
        assert_eq!(render("{{if .Vars.missing}}set{{else}}unset{{end}}").unwrap(), "unset");
    }

    #[test]
    fn collections_print_like_go() {
        assert_eq!(render("{{.AddedList}}").unwrap(), "[a b]");
        assert_eq!(render("{{.DeletedList}}").unwrap(), "[]");
        assert_eq!(render("{{.Vars}}").unwrap(), "map[env:prod]");

        let mut nested = Mapping::new();
        nested.insert("z".into(), Value::Sequence(vec![Value::Null, Value::from(1_i64)]));
        nested.insert("a".into(), Value::from(false));
        let mut root = Mapping::new();
        root.insert("Nested".into(), Value::Mapping(nested));
        root.insert("Empty".into(), Value::Null);
        let data = Value::Mapping(root);
        assert_eq!(render_template("{{.Nested}}", &data).unwrap(), "map[a:false z:[<nil> 1]]");
        assert_eq!(render_template("{{.Empty}}", &data).unwrap(), "<no value>");
    }

    #[test]
    fn unknown_top_level_field_is_an_error() {
        let err = render("{{.Nope}}").unwrap_err();
        assert_eq!(err, TemplateError::UnknownField { field: "Nope".into() });
    }

    #[test]
    fn if_else_chains() {
        let source =
            "{{if .Deleted}}d{{else if .Link}}l{{else if .HasChanges}}chg{{else}}none{{end}}";
        assert_eq!(render(source).unwrap(), "chg");
    }

    #[test]
    fn range_binds_dot_and_keeps_root() {
        let source = "{{range .AddedList}}- {{.}} ({{$.Vars.env}})\n{{end}}";
        assert_eq!(render(source).unwrap(), "- a (prod)\n- b (prod)\n");
    }

    #[test]
    fn range_else_runs_for_empty_lists() {
        assert_eq!(render("{{range .DeletedList}}x{{else}}empty{{end}}").unwrap(), "empty");
    }

    #[test]
    fn range_over_scalar_fails() {
        let err = render("{{range .Summary}}{{end}}").unwrap_err();
        assert_eq!(err, TemplateError::NotIterable { field: ".Summary".into() });
    }

    #[test]
    fn trim_markers_remove_whitespace() {
        let source = "a  {{- .Added -}}  \n b";
        assert_eq!(render(source).unwrap(), "a2b");
    }

    #[test]
    fn comments_render_nothing() {
        assert_eq!(render("x{{/* note */}}y").unwrap(), "xy");
    }

    #[test]
    fn unbalanced_blocks_are_parse_errors() {
        assert!(matches!(render("{{if .HasChanges}}open"), Err(TemplateError::Parse { .. })));
        assert!(matches!(render("{{end}}"), Err(TemplateError::Parse { .. })));
        assert!(matches!(render("{{else}}"), Err(TemplateError::Parse { .. })));
        assert!(matches!(render("{{.Summary"), Err(TemplateError::Parse { .. })));
        assert!(matches!(render("{{ printf }}"), Err(TemplateError::Parse { .. })));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("no actions here\n").unwrap(), "no actions here\n");
    }
}

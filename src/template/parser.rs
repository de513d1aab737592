//! Lexer and parser for the template micro-language

use once_cell::sync::Lazy;
use regex::Regex;

use super::TemplateError;

/// Dotted field path such as `.Config.GitBranch2`; empty means the dot itself
static FIELD_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\.|(?:\.[A-Za-z_][A-Za-z0-9_]*)+)$").expect("valid regex"));

/// Field lookup relative to the current dot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldPath(pub(crate) Vec<String>);

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, ".");
        }
        for segment in &self.0 {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// Parsed template tree
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Output(FieldPath),
    If {
        branches: Vec<(FieldPath, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
    Range {
        over: FieldPath,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug)]
enum Token {
    Text(String),
    Action { body: String, line: usize },
}

/// What closed a node list
enum Terminator {
    Eof,
    End,
    Else,
    ElseIf(FieldPath),
}

/// Split the source into text and `{{ ... }}` actions, applying `{{-`/`-}}` trimming
fn lex(name: &str, source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;
    let mut line = 1;
    let mut line_pos = 0;

    while let Some(offset) = source[pos..].find("{{") {
        let start = pos + offset;
        line += source[line_pos..start].matches('\n').count();
        line_pos = start;

        // A comment may contain `}}`, so its action ends after the first `*/`
        let open = start + 2;
        let lead = source[open..].trim_start_matches(|c: char| c == '-' || c.is_whitespace());
        let search_from = if lead.starts_with("/*") {
            let comment = source.len() - lead.len() + 2;
            source[comment..]
                .find("*/")
                .map(|o| comment + o + 2)
                .ok_or_else(|| parse_error(name, line, "unclosed comment"))?
        } else {
            open
        };
        let close = source[search_from..]
            .find("}}")
            .map(|o| search_from + o)
            .ok_or_else(|| parse_error(name, line, "unclosed action"))?;

        let mut inner = &source[start + 2..close];
        let trim_left = inner.starts_with('-') && inner[1..].starts_with(char::is_whitespace);
        let trim_right = inner.ends_with('-')
            && inner[..inner.len() - 1].ends_with(char::is_whitespace);
        if trim_left {
            inner = &inner[1..];
        }
        if trim_right {
            inner = &inner[..inner.len() - 1];
        }

        push_text(&mut tokens, &source[pos..start], trim_next, trim_left);
        tokens.push(Token::Action {
            body: inner.trim().to_string(),
            line,
        });

        trim_next = trim_right;
        pos = close + 2;
    }

    push_text(&mut tokens, &source[pos..], trim_next, false);
    Ok(tokens)
}

fn push_text(tokens: &mut Vec<Token>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
}

fn parse_error(name: &str, line: usize, message: impl Into<String>) -> TemplateError {
    TemplateError::Parse {
        name: name.to_string(),
        line,
        message: message.into(),
    }
}

/// Parse template source into a node tree
pub(crate) fn parse(name: &str, source: &str) -> Result<Vec<Node>, TemplateError> {
    let tokens = lex(name, source)?;
    let mut parser = Parser {
        name,
        tokens: tokens.into_iter(),
        line: 1,
    };

    let (nodes, terminator) = parser.parse_list()?;
    match terminator {
        Terminator::Eof => Ok(nodes),
        Terminator::End => Err(parser.error("unexpected {{end}}")),
        Terminator::Else | Terminator::ElseIf(_) => Err(parser.error("unexpected {{else}}")),
    }
}

struct Parser<'a> {
    name: &'a str,
    tokens: std::vec::IntoIter<Token>,
    line: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> TemplateError {
        parse_error(self.name, self.line, message)
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            let (body, line) = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action { body, line } => (body, line),
            };
            self.line = line;

            if body.starts_with("/*") {
                if !body.ends_with("*/") {
                    return Err(self.error("unclosed comment"));
                }
                continue;
            }

            let (keyword, rest) = match body.split_once(char::is_whitespace) {
                Some((keyword, rest)) => (keyword, rest.trim()),
                None => (body.as_str(), ""),
            };

            match keyword {
                "end" if rest.is_empty() => return Ok((nodes, Terminator::End)),
                "else" if rest.is_empty() => return Ok((nodes, Terminator::Else)),
                "else" => {
                    let condition = match rest.split_once(char::is_whitespace) {
                        Some(("if", expr)) => self.field_path(expr)?,
                        _ => return Err(self.error(format!("unexpected \"{}\" in else", rest))),
                    };
                    return Ok((nodes, Terminator::ElseIf(condition)));
                }
                "if" => {
                    let condition = self.field_path(rest)?;
                    nodes.push(self.parse_if(condition)?);
                }
                "range" => {
                    let over = self.field_path(rest)?;
                    nodes.push(self.parse_range(over)?);
                }
                "end" => return Err(self.error("unexpected arguments after end")),
                _ => nodes.push(Node::Output(self.field_path(&body)?)),
            }
        }

        Ok((nodes, Terminator::Eof))
    }

    fn parse_if(&mut self, condition: FieldPath) -> Result<Node, TemplateError> {
        let mut branches = Vec::new();
        let mut condition = condition;

        loop {
            let (body, terminator) = self.parse_list()?;
            branches.push((condition, body));

            match terminator {
                Terminator::End => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    })
                }
                Terminator::ElseIf(next) => condition = next,
                Terminator::Else => {
                    let otherwise = self.parse_closing_else("if")?;
                    return Ok(Node::If {
                        branches,
                        otherwise,
                    });
                }
                Terminator::Eof => return Err(self.error("unclosed if")),
            }
        }
    }

    fn parse_range(&mut self, over: FieldPath) -> Result<Node, TemplateError> {
        let (body, terminator) = self.parse_list()?;
        let otherwise = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Else => self.parse_closing_else("range")?,
            Terminator::ElseIf(_) => return Err(self.error("else if is not allowed in range")),
            Terminator::Eof => return Err(self.error("unclosed range")),
        };

        Ok(Node::Range {
            over,
            body,
            otherwise,
        })
    }

    /// Parse the `{{else}}` arm, which must be closed by `{{end}}`
    fn parse_closing_else(&mut self, block: &str) -> Result<Vec<Node>, TemplateError> {
        let (otherwise, terminator) = self.parse_list()?;
        match terminator {
            Terminator::End => Ok(otherwise),
            Terminator::Eof => Err(self.error(format!("unclosed {}", block))),
            _ => Err(self.error(format!("expected end after else in {}", block))),
        }
    }

    fn field_path(&self, expr: &str) -> Result<FieldPath, TemplateError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(self.error("missing value"));
        }
        if !FIELD_PATH.is_match(expr) {
            return Err(self.error(format!("unsupported expression \"{}\"", expr)));
        }

        Ok(FieldPath(
            expr.split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> FieldPath {
        FieldPath(segments.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_text_and_fields() {
        let nodes = parse("t", "Hello {{.Name}} from {{ .Config.Root }}!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hello ".to_string()),
                Node::Output(path(&["Name"])),
                Node::Text(" from ".to_string()),
                Node::Output(path(&["Config", "Root"])),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dot() {
        assert_eq!(parse("t", "{{.}}").unwrap(), vec![Node::Output(path(&[]))]);
    }

    #[test]
    fn test_parse_if_else_chain() {
        let nodes = parse("t", "{{if .A}}a{{else if .B}}b{{else}}c{{end}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::If {
                branches: vec![
                    (path(&["A"]), vec![Node::Text("a".to_string())]),
                    (path(&["B"]), vec![Node::Text("b".to_string())]),
                ],
                otherwise: vec![Node::Text("c".to_string())],
            }]
        );
    }

    #[test]
    fn test_trim_markers() {
        let nodes = parse("t", "a  \n{{- .X -}}\n  b").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".to_string()),
                Node::Output(path(&["X"])),
                Node::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        let nodes = parse("t", "x{{/* note */}}y").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Text("x".to_string()), Node::Text("y".to_string())]
        );
    }

    #[test]
    fn test_comment_may_contain_braces() {
        let nodes = parse("t", "a{{/* see }} here */}}b{{- /* x */ -}} c").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".to_string()),
                Node::Text("b".to_string()),
                Node::Text("c".to_string()),
            ]
        );

        let err = parse("t", "one\ntwo\n{{/* never closed }}").unwrap_err();
        assert_eq!(err.to_string(), "template t:3: unclosed comment");
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = parse("custom", "line one\n{{if .A}}\nno end").unwrap_err();
        assert_eq!(err.to_string(), "template custom:2: unclosed if");

        let err = parse("custom", "{{.A}\n").unwrap_err();
        assert!(err.to_string().contains("unclosed action"));

        let err = parse("custom", "{{end}}").unwrap_err();
        assert!(err.to_string().contains("unexpected {{end}}"));

        let err = parse("custom", "{{len .Files}}").unwrap_err();
        assert!(err.to_string().contains("unsupported expression"));

        let err = parse("custom", "{{range .Files}}{{else if .X}}{{end}}").unwrap_err();
        assert!(err.to_string().contains("else if is not allowed in range"));
    }
}

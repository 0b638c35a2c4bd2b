//! Translation of schema validator expressions into generated Rust.
//!
//! Validators are written against the field accessors in call form, for
//! example `Alpha() >= 0 && Alpha() <= 255`. The text is parsed as a Rust
//! expression and every zero-argument call naming a schema field becomes a
//! fallible getter call (`self.alpha()?`), while `Exists(..)` becomes
//! `self.exists(..)`. Arguments of macro invocations such as `matches!` or
//! `assert!` are rewritten the same way. All other text is preserved
//! byte-for-byte.
//!
//! Text that does not parse as a Rust expression is embedded verbatim. That
//! is an escape hatch for hand-written Rust, not the normal path, so it is
//! reported through [`Translation::Verbatim`].

use crate::naming::Accessors;
use inigen_core::FieldDescriptor;
use proc_macro2::{Delimiter, Ident, LineColumn, Span, TokenStream, TokenTree};
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{Expr, ExprCall, Macro, Token};

/// Callee that maps onto the generated membership query.
pub const EXISTS_CALL: &str = "Exists";

/// Result of translating one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Parsed as a Rust expression, with field references rewritten.
    Rewritten(String),
    /// Embedded as written.
    Verbatim { text: String, reason: String },
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Translation::Rewritten(text) => text,
            Translation::Verbatim { text, .. } => text,
        }
    }
}

/// Rewrites validator text for the fields of one schema.
#[derive(Debug, Clone)]
pub struct ValidatorTranslator {
    /// Schema field name -> getter identifier.
    getters: HashMap<String, String>,
}

impl ValidatorTranslator {
    pub fn new(fields: &[FieldDescriptor]) -> Self {
        let getters = fields
            .iter()
            .map(|field| (field.name.clone(), Accessors::for_field(&field.name).getter))
            .collect();
        Self { getters }
    }

    /// Translate `validator` into the body of a generated validity check.
    pub fn translate(&self, validator: &str) -> Translation {
        let expr = match syn::parse_str::<Expr>(validator) {
            Ok(expr) => expr,
            Err(e) => {
                return Translation::Verbatim {
                    text: validator.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let mut collector = CallCollector {
            getters: &self.getters,
            edits: Vec::new(),
        };
        collector.visit_expr(&expr);

        let mut edits = Vec::with_capacity(collector.edits.len());
        for edit in collector.edits {
            match (
                byte_offset(validator, edit.start),
                byte_offset(validator, edit.end),
            ) {
                (Some(start), Some(end)) => edits.push((start, end, edit.replacement)),
                _ => {
                    return Translation::Verbatim {
                        text: validator.to_string(),
                        reason: "could not locate a field reference in the source text".to_string(),
                    }
                }
            }
        }

        // Apply back to front so earlier offsets stay valid.
        edits.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        let mut text = validator.to_string();
        for (start, end, replacement) in edits {
            text.replace_range(start..end, &replacement);
        }

        Translation::Rewritten(text)
    }
}

/// A replacement of the source text between two positions.
struct Edit {
    start: LineColumn,
    end: LineColumn,
    replacement: String,
}

struct CallCollector<'a> {
    getters: &'a HashMap<String, String>,
    edits: Vec<Edit>,
}

impl CallCollector<'_> {
    /// Record the rewrite for a call of `ident` whose argument list closes at
    /// `close`. Calls that name neither a field nor `Exists` are left alone.
    fn record_call(&mut self, ident: &Ident, has_args: bool, close: Span) {
        let callee = ident.to_string();
        let span = ident.span();

        if callee == EXISTS_CALL {
            self.edits.push(Edit {
                start: span.start(),
                end: span.end(),
                replacement: "self.exists".to_string(),
            });
        } else if !has_args {
            if let Some(getter) = self.getters.get(&callee) {
                self.edits.push(Edit {
                    start: span.start(),
                    end: span.end(),
                    replacement: format!("self.{getter}"),
                });
                self.edits.push(Edit {
                    start: close.end(),
                    end: close.end(),
                    replacement: "?".to_string(),
                });
            }
        }
    }

    /// Find `Name(..)` calls in macro input that is not a list of expressions,
    /// such as the pattern argument of `matches!`.
    fn scan_tokens(&mut self, tokens: TokenStream) {
        let tokens: Vec<TokenTree> = tokens.into_iter().collect();

        for (i, tree) in tokens.iter().enumerate() {
            match tree {
                TokenTree::Group(group) => self.scan_tokens(group.stream()),
                TokenTree::Ident(ident) => {
                    // `x.Name()` and `path::Name()` are not field calls.
                    let qualified = i > 0
                        && matches!(
                            &tokens[i - 1],
                            TokenTree::Punct(p) if p.as_char() == '.' || p.as_char() == ':'
                        );
                    if qualified {
                        continue;
                    }
                    if let Some(TokenTree::Group(args)) = tokens.get(i + 1) {
                        if args.delimiter() == Delimiter::Parenthesis {
                            self.record_call(ident, !args.stream().is_empty(), args.span_close());
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for CallCollector<'_> {
    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if let Expr::Path(path) = &*node.func {
            if let (None, Some(ident)) = (&path.qself, path.path.get_ident()) {
                self.record_call(ident, !node.args.is_empty(), node.paren_token.span.close());
            }
        }

        syn::visit::visit_expr_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast Macro) {
        match node.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            Ok(args) => {
                for arg in &args {
                    Visit::visit_expr(self, arg);
                }
            }
            Err(_) => self.scan_tokens(node.tokens.clone()),
        }
    }
}

/// Convert a 1-based line / 0-based character column into a byte offset.
fn byte_offset(text: &str, at: LineColumn) -> Option<usize> {
    let line_start = if at.line <= 1 {
        0
    } else {
        text.match_indices('\n').nth(at.line - 2).map(|(i, _)| i + 1)?
    };
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = &text[line_start..line_end];

    line.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(at.column)
        .map(|i| line_start + i)
}

//! Rust identifiers derived from schema field names.

/// Methods every generated type defines before the per-field accessors,
/// plus the methods of its derived `Debug`, `Clone` and `Default` impls.
pub const PROLOGUE_METHODS: &[&str] = &[
    "new",
    "from_file",
    "parse_file",
    "write_back",
    "exists",
    "validate",
    "default",
    "clone",
    "clone_from",
    "fmt",
];

/// Keywords that can be used as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Identifiers that cannot name a method even in raw form.
const FORBIDDEN: &[&str] = &["self", "Self", "super", "crate", "true", "false", "_"];

/// Whether `name` can serve as a field name: ASCII letters, digits and
/// underscores, not starting with a digit.
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether the snake-case form of `name` cannot be used as a method name.
pub fn is_forbidden(name: &str) -> bool {
    FORBIDDEN.contains(&snake_case(name).as_str())
}

/// Convert a field name such as `StartDate` or `HTTPPort` to snake case.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// The generated method names for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    /// Getter, e.g. `start_date` (or `r#type` for keywords).
    pub getter: String,
    pub safe_getter: String,
    pub validity: String,
    pub setter: String,
}

impl Accessors {
    /// Accessor names for `name`.
    ///
    /// Keyword getters use raw identifiers. Names that cannot be a method
    /// even in raw form (see [`is_forbidden`]) get a `field_` prefix; the
    /// schema reader rejects those names before they reach the emitter.
    pub fn for_field(name: &str) -> Self {
        let base = snake_case(name);
        let getter = if FORBIDDEN.contains(&base.as_str()) {
            format!("field_{base}")
        } else if RAW_KEYWORDS.contains(&base.as_str()) {
            format!("r#{base}")
        } else {
            base.clone()
        };

        Self {
            getter,
            safe_getter: format!("get_safe_{base}"),
            validity: format!("is_valid_{base}"),
            setter: format!("set_{base}"),
        }
    }

    pub fn names(&self) -> [&str; 4] {
        [
            &self.getter,
            &self.safe_getter,
            &self.validity,
            &self.setter,
        ]
    }
}

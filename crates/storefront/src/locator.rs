//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a lazy description of zero or more elements: a chain of
//! selector steps, each optionally narrowed to one index. It holds no element
//! handle. The driver resolves it against the live document on every call, so
//! a locator stays valid across navigations and re-renders.
//!
//! Scoping (`nth`, `first`, `locator`) always returns a new value.
//!
//! # Selector syntax
//!
//! - Plain CSS: `#cart-total`, `.product-thumb h4 a`
//! - CSS with a text filter: `a:text("Login")` matches `a` elements whose
//!   normalised text contains `Login`, ignoring case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between steps in a locator key
pub const STEP_SEPARATOR: &str = " >> ";

const TEXT_PSEUDO: &str = ":text(";

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// Combined selector with text filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a CSS selector filtered by text
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Parse a selector expression, recognising a trailing `:text("...")`
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();
        if let Some(start) = expr.find(TEXT_PSEUDO) {
            let (css, rest) = expr.split_at(start);
            if let Some(inner) = rest[TEXT_PSEUDO.len()..].strip_suffix(')') {
                let text = inner.trim().trim_matches(|c| c == '"' || c == '\'');
                let css = if css.is_empty() { "*" } else { css };
                return Self::css_with_text(css, text);
            }
        }
        Self::Css(expr.to_string())
    }

    /// The CSS part of the selector
    #[must_use]
    pub fn css_part(&self) -> &str {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => css,
        }
    }

    /// Text filter, if any
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::Css(_) => None,
            Self::CssWithText { text, .. } => Some(text),
        }
    }

    /// Expression form, as accepted by [`Selector::parse`]
    #[must_use]
    pub fn expression(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::CssWithText { css, text } => format!("{css}:text(\"{text}\")"),
        }
    }

    /// JavaScript that maps an array of roots to the matching descendants
    fn to_step_js(&self) -> String {
        let css = js_string(self.css_part());
        let mut js = format!("roots.flatMap(r => Array.from(r.querySelectorAll({css})))");
        if let Some(text) = self.text_filter() {
            let needle = js_string(&text.to_lowercase());
            js.push_str(&format!(
                ".filter(el => (el.textContent || '').replace(/\\s+/g, ' ').toLowerCase().includes({needle}))"
            ));
        }
        js
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorStep {
    /// Selector evaluated relative to the previous step's matches
    pub selector: Selector,
    /// Keep only the match at this position
    pub index: Option<usize>,
}

/// A lazily-resolved reference to elements in the current document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    steps: Vec<LocatorStep>,
}

impl Locator {
    /// Create a locator from a selector expression
    #[must_use]
    pub fn new(expr: &str) -> Self {
        Self::from_selector(Selector::parse(expr))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            steps: vec![LocatorStep {
                selector,
                index: None,
            }],
        }
    }

    /// Narrow to the match at `index` (zero based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        let mut steps = self.steps.clone();
        if let Some(last) = steps.last_mut() {
            last.index = Some(index);
        }
        Self { steps }
    }

    /// Narrow to the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Descendants of this locator's matches
    #[must_use]
    pub fn locator(&self, expr: &str) -> Self {
        let mut steps = self.steps.clone();
        steps.push(LocatorStep {
            selector: Selector::parse(expr),
            index: None,
        });
        Self { steps }
    }

    /// Selector steps, outermost first
    #[must_use]
    pub fn steps(&self) -> &[LocatorStep] {
        &self.steps
    }

    /// Index applied to the final step
    #[must_use]
    pub fn final_index(&self) -> Option<usize> {
        self.steps.last().and_then(|s| s.index)
    }

    /// The same locator without the index on its final step
    #[must_use]
    pub fn without_final_index(&self) -> Self {
        let mut steps = self.steps.clone();
        if let Some(last) = steps.last_mut() {
            last.index = None;
        }
        Self { steps }
    }

    /// Stable textual key, e.g. `#content .row >> nth=1 >> .product-thumb`
    #[must_use]
    pub fn key(&self) -> String {
        self.steps
            .iter()
            .map(|step| match step.index {
                Some(i) => format!("{}{STEP_SEPARATOR}nth={i}", step.selector),
                None => step.selector.expression(),
            })
            .collect::<Vec<_>>()
            .join(STEP_SEPARATOR)
    }

    /// JavaScript expression evaluating to the array of matched elements
    #[must_use]
    pub fn to_resolver_js(&self) -> String {
        let mut body = String::from("let roots = [document];");
        for step in &self.steps {
            body.push_str(&format!(
                " roots = Array.from(new Set({}));",
                step.selector.to_step_js()
            ));
            if let Some(i) = step.index {
                body.push_str(&format!(" roots = roots.length > {i} ? [roots[{i}]] : [];"));
            }
        }
        format!("(() => {{ {body} return roots; }})()")
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for Locator {
    fn from(expr: &str) -> Self {
        Self::new(expr)
    }
}

/// Quote a value as a JavaScript string literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Declare a page's locator map in one place.
///
/// Generates a struct with one public [`Locator`] field per entry (documented
/// with its selector), a `new()` constructor, `Default`, and `entries()`
/// listing every `(name, locator)`.
///
/// ```
/// storefront::locator_map! {
///     /// Search widget
///     pub struct SearchLocators {
///         input => r#"#search input[name="search"]"#,
///         button => "#search button",
///     }
/// }
///
/// let map = SearchLocators::new();
/// assert_eq!(map.button.key(), "#search button");
/// assert_eq!(map.entries().len(), 2);
/// ```
#[macro_export]
macro_rules! locator_map {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident => $selector:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                #[doc = concat!("`", $selector, "`")]
                pub $field: $crate::Locator,
            )*
        }

        impl $name {
            /// Build the locator map
            #[must_use]
            pub fn new() -> Self {
                Self {
                    $( $field: $crate::Locator::new($selector), )*
                }
            }

            /// Every locator with its field name
            #[must_use]
            pub fn entries(&self) -> Vec<(&'static str, &$crate::Locator)> {
                vec![ $( (stringify!($field), &self.$field), )* ]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

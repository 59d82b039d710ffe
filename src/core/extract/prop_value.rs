//! Classification of JSX attribute values.

use swc_common::{SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::{Expr, JSXAttrValue, JSXExpr, Lit, Prop, PropName, PropOrSpread, Tpl, UnaryOp};

use crate::core::data::PropValue;

/// Classify an attribute value. A valueless attribute (`<Input disabled />`) is `true`.
pub fn classify_attr_value(value: Option<&JSXAttrValue>, source_map: &SourceMap) -> PropValue {
    match value {
        None => PropValue::Boolean(true),
        Some(JSXAttrValue::Str(s)) => PropValue::String(s.value.to_string_lossy().to_string()),
        Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
            JSXExpr::Expr(expr) => classify_expr(expr, source_map),
            JSXExpr::JSXEmptyExpr(_) => {
                PropValue::Expression(snippet(source_map, container.span))
            }
        },
        // <Tabs panel=<Panel /> />
        Some(other) => PropValue::Fragment(snippet(source_map, other.span())),
    }
}

/// Classify an expression after stripping parentheses and type assertions.
pub fn classify_expr(expr: &Expr, source_map: &SourceMap) -> PropValue {
    let expr = unwrap_expr(expr);
    match expr {
        Expr::Lit(Lit::Str(s)) => PropValue::String(s.value.to_string_lossy().to_string()),
        Expr::Lit(Lit::Num(n)) => PropValue::Number(n.value),
        Expr::Lit(Lit::Bool(b)) => PropValue::Boolean(b.value),
        Expr::Lit(Lit::Null(_)) => PropValue::Null,
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => PropValue::String(template_text(tpl)),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match unwrap_expr(&unary.arg) {
            Expr::Lit(Lit::Num(n)) => PropValue::Number(-n.value),
            _ => PropValue::Expression(snippet(source_map, expr.span())),
        },
        Expr::Ident(ident) => PropValue::Identifier(ident.sym.to_string()),
        Expr::Object(_) => PropValue::Object(snippet(source_map, expr.span())),
        Expr::Array(_) => PropValue::Array(snippet(source_map, expr.span())),
        Expr::Arrow(_) | Expr::Fn(_) => PropValue::Function(snippet(source_map, expr.span())),
        Expr::JSXElement(_) | Expr::JSXFragment(_) => {
            PropValue::Fragment(snippet(source_map, expr.span()))
        }
        _ => PropValue::Expression(snippet(source_map, expr.span())),
    }
}

/// Strip wrappers that do not change the runtime value.
pub(crate) fn unwrap_expr(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(paren) => &paren.expr,
            Expr::TsAs(ts_as) => &ts_as.expr,
            Expr::TsSatisfies(satisfies) => &satisfies.expr,
            Expr::TsConstAssertion(assertion) => &assertion.expr,
            Expr::TsTypeAssertion(assertion) => &assertion.expr,
            Expr::TsNonNull(non_null) => &non_null.expr,
            _ => return expr,
        };
    }
}

/// Static keys of an object literal, in source order. Non-objects yield nothing.
///
/// `{ color: "red", [dynamic]: 1, ...rest, margin }` → `["color", "margin"]`
pub fn object_keys(expr: &Expr) -> Vec<String> {
    let Expr::Object(object) = unwrap_expr(expr) else {
        return Vec::new();
    };

    object
        .props
        .iter()
        .filter_map(|prop| match prop {
            PropOrSpread::Prop(prop) => match &**prop {
                Prop::KeyValue(kv) => prop_name(&kv.key),
                Prop::Shorthand(ident) => Some(ident.sym.to_string()),
                Prop::Method(method) => prop_name(&method.key),
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        })
        .collect()
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Static text of a template literal. Interpolations are dropped.
pub(crate) fn template_text(tpl: &Tpl) -> String {
    tpl.quasis
        .iter()
        .map(|quasi| {
            quasi
                .cooked
                .as_ref()
                .and_then(|cooked| cooked.as_str())
                .unwrap_or(&quasi.raw)
        })
        .collect()
}

/// Property names declared in a CSS block, first-seen order, deduplicated.
///
/// Nested selectors (`&:hover { ... }`) are skipped but their declarations
/// are collected.
pub fn css_declaration_names(css: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut start = 0;

    let mut push_declaration = |segment: &str| {
        let Some((name, _)) = segment.trim().split_once(':') else {
            return;
        };
        let name = name.trim();
        if !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    };

    for (i, ch) in css.char_indices() {
        if matches!(ch, ';' | '{' | '}') {
            if ch != '{' {
                push_declaration(&css[start..i]);
            }
            start = i + 1;
        }
    }
    push_declaration(&css[start..]);

    names
}

fn snippet(source_map: &SourceMap, span: Span) -> String {
    source_map.span_to_snippet(span).unwrap_or_default()
}

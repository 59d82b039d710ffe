//! Single-pass usage collector.
//!
//! Walks one module and records, in visitation order:
//!
//! - `<Button variant="primary" />` invocations, with classified props
//! - `styled(Button)` style-extension wraps (plain, tagged template, curried)
//!
//! Components that were imported from the library but never invoked or
//! wrapped are reported once each, after everything else, in import order.

use std::collections::{HashMap, HashSet};

use swc_common::{SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ImportDecl, ImportSpecifier, JSXAttrName, JSXAttrOrSpread,
    JSXAttrValue, JSXElementName, JSXExpr, JSXMemberExpr, JSXObject, JSXOpeningElement,
    MemberProp, Module, ModuleExportName, TaggedTpl,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::debug;

use super::ExtractOptions;
use super::prop_value::{
    classify_attr_value, css_declaration_names, object_keys, template_text, unwrap_expr,
};
use crate::core::data::{Customization, PropRecord, UsageRecord};
use crate::core::directory::CanonicalDirectory;

pub struct UsageCollector<'a> {
    file_path: &'a str,
    host_codebase: &'a str,
    source_map: &'a SourceMap,
    directory: &'a CanonicalDirectory,
    options: &'a ExtractOptions,

    /// Local identifier → canonical name, from named library imports.
    bindings: HashMap<String, String>,
    /// Local names of `import * as UI from "<library>"`.
    namespaces: HashSet<String>,
    /// Import-only candidates `(canonical name, import line)`, in import order.
    provisional: Vec<(String, usize)>,
    /// Canonical names with at least one real usage in this file.
    used: HashSet<String>,

    records: Vec<UsageRecord>,
}

impl<'a> UsageCollector<'a> {
    pub fn new(
        file_path: &'a str,
        host_codebase: &'a str,
        source_map: &'a SourceMap,
        directory: &'a CanonicalDirectory,
        options: &'a ExtractOptions,
    ) -> Self {
        Self {
            file_path,
            host_codebase,
            source_map,
            directory,
            options,
            bindings: HashMap::new(),
            namespaces: HashSet::new(),
            provisional: Vec::new(),
            used: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Walk the module and return its usage records.
    pub fn collect(mut self, module: &Module) -> Vec<UsageRecord> {
        self.visit_module(module);

        let provisional = std::mem::take(&mut self.provisional);
        for (component_name, line) in provisional {
            if self.used.contains(&component_name) {
                continue;
            }
            let mut record = self.record(component_name, line, Vec::new(), None);
            record.import_only = true;
            self.records.push(record);
        }

        self.records
    }

    fn line_of(&self, span: Span) -> usize {
        self.source_map.lookup_char_pos(span.lo).line
    }

    fn snippet(&self, span: Span) -> String {
        self.source_map.span_to_snippet(span).unwrap_or_default()
    }

    fn record(
        &self,
        component_name: String,
        line_number: usize,
        props: Vec<PropRecord>,
        customization: Option<Customization>,
    ) -> UsageRecord {
        UsageRecord {
            component_name,
            file_path: self.file_path.to_string(),
            host_codebase: self.host_codebase.to_string(),
            line_number,
            props,
            customization,
            import_only: false,
        }
    }

    fn push_usage(&mut self, record: UsageRecord) {
        self.used.insert(record.component_name.clone());
        self.records.push(record);
    }

    // ============================================================
    // Name resolution
    // ============================================================

    /// Binding table first, then the canonical directory.
    ///
    /// The directory is only consulted for capitalized names, so plain
    /// identifiers never match a lowercase file base name.
    fn resolve_identifier(&self, name: &str) -> Option<String> {
        if let Some(canonical) = self.bindings.get(name) {
            return Some(canonical.clone());
        }
        self.resolve_in_directory(name)
    }

    fn resolve_in_directory(&self, name: &str) -> Option<String> {
        if !is_component_name(name) {
            return None;
        }
        self.directory
            .resolve(name)
            .map(|component| component.name.clone())
    }

    /// Resolve a dotted head such as `UI.Button` or `Form.Item`.
    fn resolve_path(&self, segments: &[String]) -> Option<String> {
        let (first, rest) = segments.split_first()?;
        if rest.is_empty() {
            return self.resolve_identifier(first);
        }

        // `motion.div` ends in an HTML tag name.
        let last = rest.last()?;
        if !is_component_name(last) {
            return None;
        }

        let dotted = if self.namespaces.contains(first) {
            rest.join(".")
        } else {
            segments.join(".")
        };
        self.directory
            .resolve(&dotted)
            .or_else(|| self.directory.resolve(last))
            .map(|component| component.name.clone())
    }

    fn resolve_element_name(&self, name: &JSXElementName) -> Option<String> {
        match name {
            // `<input>` is an intrinsic element even when a binding shares its name.
            JSXElementName::Ident(ident) if !is_component_name(&ident.sym) => None,
            JSXElementName::Ident(ident) => self.resolve_identifier(&ident.sym),
            JSXElementName::JSXMemberExpr(member) => self.resolve_path(&jsx_member_path(member)),
            JSXElementName::JSXNamespacedName(_) => None,
        }
    }

    fn resolve_expr(&self, expr: &Expr) -> Option<String> {
        match unwrap_expr(expr) {
            Expr::Ident(ident) => self.resolve_identifier(&ident.sym),
            Expr::Member(_) => self.resolve_path(&member_path(expr)?),
            _ => None,
        }
    }

    /// `styled(X)` where `styled` is a configured wrapper and `X` is a library component.
    fn wrapped_component(&self, call: &CallExpr) -> Option<String> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        let Expr::Ident(wrapper) = &**callee else {
            return None;
        };
        if !self
            .options
            .style_wrappers
            .iter()
            .any(|w| w.as_str() == &*wrapper.sym)
        {
            return None;
        }
        let first = call.args.first()?;
        if first.spread.is_some() {
            return None;
        }
        self.resolve_expr(&first.expr)
    }

    fn push_wrap(&mut self, component_name: String, span: Span, properties: Vec<String>) {
        let mut customization = Customization {
            wrapped_in_style_extension: true,
            ..Default::default()
        };
        for property in properties {
            customization.add_property(property);
        }
        let line = self.line_of(span);
        let record = self.record(component_name, line, Vec::new(), Some(customization));
        self.push_usage(record);
    }

    // ============================================================
    // Invocation sites
    // ============================================================

    fn collect_props(&self, node: &JSXOpeningElement) -> (Vec<PropRecord>, Customization) {
        let mut props = Vec::with_capacity(node.attrs.len());
        let mut customization = Customization::default();

        for attr in &node.attrs {
            match attr {
                JSXAttrOrSpread::SpreadElement(spread) => {
                    props.push(PropRecord::spread(self.snippet(spread.expr.span())));
                }
                JSXAttrOrSpread::JSXAttr(attr) => {
                    let name = match &attr.name {
                        JSXAttrName::Ident(ident) => ident.sym.to_string(),
                        JSXAttrName::JSXNamespacedName(ns) => {
                            format!("{}:{}", ns.ns.sym, ns.name.sym)
                        }
                    };

                    if self.options.style_props.contains(&name) {
                        customization.has_inline_style_override = true;
                        if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value
                            && let JSXExpr::Expr(expr) = &container.expr
                        {
                            for key in object_keys(expr) {
                                customization.add_property(key);
                            }
                        }
                    }

                    let value = classify_attr_value(attr.value.as_ref(), self.source_map);
                    props.push(PropRecord::new(name, value));
                }
            }
        }

        (props, customization)
    }
}

impl<'a> Visit for UsageCollector<'a> {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if node.type_only || node.src.value.as_str() != Some(self.options.library_package.as_str())
        {
            return;
        }

        let line = self.line_of(node.span);
        for specifier in &node.specifiers {
            match specifier {
                ImportSpecifier::Named(named) if !named.is_type_only => {
                    let local_name = named.local.sym.to_string();
                    let imported_name = named
                        .imported
                        .as_ref()
                        .map(|i| match i {
                            ModuleExportName::Ident(ident) => ident.sym.to_string(),
                            ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
                        })
                        .unwrap_or_else(|| local_name.clone());

                    let Some(component) = self.directory.resolve(&imported_name) else {
                        debug!(
                            file = self.file_path,
                            import = %imported_name,
                            "library import is not a canonical component"
                        );
                        continue;
                    };

                    let canonical = component.name.clone();
                    if !self.provisional.iter().any(|(name, _)| *name == canonical) {
                        self.provisional.push((canonical.clone(), line));
                    }
                    self.bindings.insert(local_name, canonical);
                }
                ImportSpecifier::Namespace(ns) => {
                    self.namespaces.insert(ns.local.sym.to_string());
                }
                _ => {}
            }
        }
    }

    fn visit_jsx_opening_element(&mut self, node: &JSXOpeningElement) {
        if let Some(component_name) = self.resolve_element_name(&node.name) {
            let (props, customization) = self.collect_props(node);
            let line = self.line_of(node.span);
            let customization = (!customization.is_empty()).then_some(customization);
            let record = self.record(component_name, line, props, customization);
            self.push_usage(record);
        }

        // Attribute values may hold nested elements or wraps.
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        // styled(Button)
        if let Some(component_name) = self.wrapped_component(node) {
            self.push_wrap(component_name, node.span, Vec::new());
            return;
        }

        // styled(Button)({ color: "red" })
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Call(inner) = &**callee
            && let Some(component_name) = self.wrapped_component(inner)
        {
            let properties = node
                .args
                .first()
                .map(|arg| object_keys(&arg.expr))
                .unwrap_or_default();
            self.push_wrap(component_name, node.span, properties);
            for arg in &node.args {
                arg.visit_with(self);
            }
            return;
        }

        node.visit_children_with(self);
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        // styled(Button)`color: red;`
        if let Expr::Call(call) = &*node.tag
            && let Some(component_name) = self.wrapped_component(call)
        {
            let properties = css_declaration_names(&template_text(&node.tpl));
            self.push_wrap(component_name, node.span, properties);
            node.tpl.visit_with(self);
            return;
        }

        node.visit_children_with(self);
    }
}

/// Component names start with an uppercase letter; lowercase JSX names are HTML tags.
fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// `A.B.C` → `["A", "B", "C"]`
fn jsx_member_path(member: &JSXMemberExpr) -> Vec<String> {
    let mut segments = match &member.obj {
        JSXObject::Ident(ident) => vec![ident.sym.to_string()],
        JSXObject::JSXMemberExpr(inner) => jsx_member_path(inner),
    };
    segments.push(member.prop.sym.to_string());
    segments
}

/// Dotted path of a non-computed member chain rooted at an identifier.
fn member_path(expr: &Expr) -> Option<Vec<String>> {
    match unwrap_expr(expr) {
        Expr::Ident(ident) => Some(vec![ident.sym.to_string()]),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let mut segments = member_path(&member.obj)?;
            segments.push(prop.sym.to_string());
            Some(segments)
        }
        _ => None,
    }
}

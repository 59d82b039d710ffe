use pretty_assertions::assert_eq;

use super::*;
use crate::core::data::{CanonicalComponent, PropKind, PropValue};

fn directory() -> CanonicalDirectory {
    CanonicalDirectory::from_components([
        CanonicalComponent::new("Button", "src/components/Button/index.tsx"),
        CanonicalComponent::new("Widget", "src/components/Widget.tsx"),
        CanonicalComponent::new("DatePicker", "src/components/date-picker/Picker.tsx"),
        CanonicalComponent::new("Card", "src/components/Card.tsx"),
    ])
}

fn extract(code: &str) -> Vec<UsageRecord> {
    try_extract_usages(
        "src/app/page.tsx",
        code.to_string(),
        "web",
        &directory(),
        &ExtractOptions::default(),
    )
    .unwrap()
}

fn names(records: &[UsageRecord]) -> Vec<&str> {
    records.iter().map(|r| r.component_name.as_str()).collect()
}

#[test]
fn test_alias_resolves_to_canonical_name() {
    let records = extract(
        r#"
import { Widget as W } from "@acme/ui";

export const Page = () => <W />;
"#,
    );
    assert_eq!(names(&records), vec!["Widget"]);
    assert_eq!(records[0].line_number, 4);
    assert!(!records[0].import_only);
    assert_eq!(records[0].host_codebase, "web");
    assert_eq!(records[0].file_path, "src/app/page.tsx");
}

#[test]
fn test_import_by_file_base_name() {
    let records = extract(
        r#"
import { Picker } from "@acme/ui";

export const Page = () => <Picker value={date} />;
"#,
    );
    assert_eq!(names(&records), vec!["DatePicker"]);
}

#[test]
fn test_import_only_record() {
    let records = extract(
        r#"
import { Button, Card } from "@acme/ui";

export const Page = () => <Card />;
"#,
    );
    assert_eq!(names(&records), vec!["Card", "Button"]);
    let button = &records[1];
    assert!(button.import_only);
    assert_eq!(button.line_number, 2);
    assert!(button.props.is_empty());
    assert!(button.customization.is_none());
}

#[test]
fn test_import_only_suppressed_by_usage() {
    let imported_only = extract(r#"import { Button } from "@acme/ui";"#);
    assert_eq!(imported_only.len(), 1);
    assert!(imported_only[0].import_only);

    let used = extract(
        r#"
import { Button } from "@acme/ui";
const a = <Button />;
"#,
    );
    assert_eq!(used.len(), 1);
    assert!(!used[0].import_only);
}

#[test]
fn test_other_packages_and_type_imports_ignored() {
    let records = extract(
        r#"
import { Card } from "@other/ui";
import type { Button } from "@acme/ui";
import { type Widget } from "@acme/ui";
"#,
    );
    assert!(records.is_empty());
}

#[test]
fn test_unresolved_elements_produce_nothing() {
    let records = extract(
        r#"
import { Tooltip } from "@acme/ui";
const a = <div><Tooltip /></div>;
"#,
    );
    assert!(records.is_empty());
}

#[test]
fn test_directory_fallback_without_import() {
    let records = extract("const a = <Card />;");
    assert_eq!(names(&records), vec!["Card"]);
}

#[test]
fn test_namespace_import() {
    let records = extract(
        r#"
import * as UI from "@acme/ui";
const a = <UI.Button size="sm" />;
"#,
    );
    assert_eq!(names(&records), vec!["Button"]);
    assert_eq!(records[0].props[0].name, "size");
}

#[test]
fn test_member_head_falls_back_to_last_segment() {
    let records = extract("const a = <Layout.Card />;");
    assert_eq!(names(&records), vec!["Card"]);
}

#[test]
fn test_prop_kinds() {
    let records = extract(
        r#"
import { Button } from "@acme/ui";
const a = (
  <Button
    label="Save"
    count={3}
    offset={-2}
    disabled
    loading={false}
    icon={null}
    variant={kind}
    config={{ a: 1 }}
    items={[1, 2]}
    onClick={() => save()}
    suffix={<span />}
    title={`static`}
    size={"lg" as const}
    tone={props.tone}
    {...rest}
  />
);
"#,
    );
    let props = &records[0].props;
    let kinds: Vec<(&str, PropKind)> = props.iter().map(|p| (p.name.as_str(), p.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            ("label", PropKind::String),
            ("count", PropKind::Number),
            ("offset", PropKind::Number),
            ("disabled", PropKind::Boolean),
            ("loading", PropKind::Boolean),
            ("icon", PropKind::Null),
            ("variant", PropKind::Identifier),
            ("config", PropKind::Object),
            ("items", PropKind::Array),
            ("onClick", PropKind::Function),
            ("suffix", PropKind::Fragment),
            ("title", PropKind::String),
            ("size", PropKind::String),
            ("tone", PropKind::Expression),
            ("...", PropKind::Spread),
        ]
    );
    assert_eq!(props[2].value, PropValue::Number(-2.0));
    assert_eq!(props[3].value, PropValue::Boolean(true));
    assert_eq!(props[6].value, PropValue::Identifier("kind".to_string()));
    assert_eq!(props[9].value, PropValue::Function("() => save()".to_string()));
    assert_eq!(props[11].value, PropValue::String("static".to_string()));
    assert_eq!(props[13].value, PropValue::Expression("props.tone".to_string()));
    assert_eq!(props[14].value, PropValue::Spread("rest".to_string()));
}

#[test]
fn test_inline_style_override() {
    let records = extract(
        r#"
import { Card } from "@acme/ui";
const a = <Card sx={{ color: "red", margin: 0 }} style={{ color }} css={styles} />;
"#,
    );
    let customization = records[0].customization.as_ref().unwrap();
    assert!(customization.has_inline_style_override);
    assert!(!customization.wrapped_in_style_extension);
    assert_eq!(customization.overridden_properties, vec!["color", "margin"]);
}

#[test]
fn test_style_extension_tagged_template() {
    let records = extract(
        r#"
import { Button } from "@acme/ui";
import styled from "styled-components";

const Fancy = styled(Button)`
  color: ${(p) => p.color};
  border-radius: 4px;
`;
"#,
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.component_name, "Button");
    assert!(!record.import_only);
    assert_eq!(record.line_number, 5);
    let customization = record.customization.as_ref().unwrap();
    assert!(customization.wrapped_in_style_extension);
    assert_eq!(customization.overridden_properties, vec!["color", "border-radius"]);
}

#[test]
fn test_style_extension_curried_and_plain_calls() {
    let records = extract(
        r#"
import { Button, Card } from "@acme/ui";
const A = styled(Button)({ padding: 8, "font-weight": 600 });
const B = styled(Card);
const C = notStyled(Card);
"#,
    );
    assert_eq!(names(&records), vec!["Button", "Card"]);
    assert_eq!(
        records[0].customization.as_ref().unwrap().overridden_properties,
        vec!["padding", "font-weight"]
    );
    assert!(records[1].customization.as_ref().unwrap().wrapped_in_style_extension);
}

#[test]
fn test_nested_usages_in_visitation_order() {
    let records = extract(
        r#"
import { Button, Card } from "@acme/ui";
const a = (
  <Card footer={<Button />}>
    <Button variant="ghost" />
  </Card>
);
"#,
    );
    assert_eq!(names(&records), vec!["Card", "Button", "Button"]);
    assert_eq!(records[2].line_number, 5);
}

#[test]
fn test_extraction_is_deterministic() {
    let code = r#"
import { Button as B, Widget } from "@acme/ui";
export function Page({ items }) {
  return items.map((item) => <B key={item.id} {...item} />);
}
"#;
    assert_eq!(extract(code), extract(code));
}

#[test]
fn test_parse_failure_yields_empty_result() {
    let records = extract_usages(
        "broken.tsx",
        "const = <div".to_string(),
        "web",
        &directory(),
        &ExtractOptions::default(),
    );
    assert!(records.is_empty());
}

fn extract_with(directory: &CanonicalDirectory, code: &str) -> Vec<UsageRecord> {
    try_extract_usages(
        "src/app/search.tsx",
        code.to_string(),
        "web",
        directory,
        &ExtractOptions::default(),
    )
    .unwrap()
}

fn lowercase_dir_directory() -> CanonicalDirectory {
    CanonicalDirectory::from_components([
        CanonicalComponent::new("Input", "src/components/input/index.tsx"),
        CanonicalComponent::new("Select", "src/components/select/index.tsx"),
    ])
}

#[test]
fn test_html_tags_never_resolve_by_file_base_name() {
    let directory = lowercase_dir_directory();

    let records = extract_with(
        &directory,
        r#"
export const Search = () => (
  <form>
    <input name="q" />
    <select />
    <motion.input layout />
  </form>
);
"#,
    );

    assert!(records.is_empty());
}

#[test]
fn test_lowercase_binding_is_still_an_html_tag() {
    let directory = lowercase_dir_directory();

    let records = extract_with(
        &directory,
        r#"
import { Input as input } from "@acme/ui";
const a = <input />;
"#,
    );

    assert_eq!(names(&records), vec!["Input"]);
    assert!(records[0].import_only);
}

#[test]
fn test_capitalized_names_still_resolve_in_lowercase_dirs() {
    let directory = lowercase_dir_directory();

    let records = extract_with(
        &directory,
        r#"
import * as UI from "@acme/ui";
const a = (
  <>
    <Input />
    <UI.Select />
    <Form.Input />
    <UI.input />
  </>
);
"#,
    );

    assert_eq!(names(&records), vec!["Input", "Select", "Input"]);
}

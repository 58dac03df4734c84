//! Plain-text output for the CLI.
//!
//! Renderers return strings; handlers print them. Styling uses `console`
//! and degrades to plain text when output is not a terminal.

use chrono::{DateTime, Utc};
use console::Style;
use folioapp::commands::{CmdMessage, MessageLevel};
use folioapp::model::{Body, Resource};

fn muted() -> Style {
    Style::new().dim()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let style = match m.level {
                MessageLevel::Success => Style::new().green(),
                MessageLevel::Info => Style::new(),
            };
            format!("{}\n", style.apply_to(&m.content))
        })
        .collect()
}

/// One line per document: id, name and sort key.
pub fn render_list(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return format!("{}\n", muted().apply_to("No documents."));
    }
    let width = resources.iter().map(|r| r.id.len()).max().unwrap_or(0);
    resources
        .iter()
        .map(|r| {
            format!(
                "{:<width$}  {}  {}\n",
                r.id,
                r.name(),
                muted().apply_to(r.sort_key),
                width = width
            )
        })
        .collect()
}

fn timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

pub fn render_resource(resource: &Resource) -> String {
    let label = Style::new().bold();
    let mut out = String::new();
    let mut field = |name: &str, value: &str| {
        if !value.is_empty() {
            out.push_str(&format!("{:<12} {}\n", label.apply_to(name), value));
        }
    };

    field("Kind", resource.kind().display_name());
    field("Id", resource.id.as_str());
    field("Name", resource.name());
    field("Parent", resource.parent_id.as_deref().unwrap_or("-"));
    field("Sort key", resource.sort_key.to_string().as_str());
    field("Created", timestamp(resource.created).as_str());
    field("Modified", timestamp(resource.modified).as_str());

    match &resource.body {
        Body::ApiSpec(b) => {
            field("File", b.file_name.as_str());
            field("Type", b.content_type.as_str());
        }
        Body::Request(b) => {
            field("Method", b.method.as_str());
            field("Url", b.url.as_str());
            field("Description", b.description.as_str());
        }
        Body::RequestGroup(b) => field("Description", b.description.as_str()),
        Body::Workspace(b) => field("Description", b.description.as_str()),
        Body::Environment(b) => {
            if let Some(color) = &b.color {
                field("Color", color.as_str());
            }
        }
    }

    let vars = resource.body.ordered_environment();
    if !vars.is_empty() {
        out.push_str(&format!("{}\n", label.apply_to("Variables")));
        for (key, value) in vars {
            let value = match value.as_str() {
                Some(s) => s.to_string(),
                None => format!("{:?}", value),
            };
            out.push_str(&format!("  {} = {}\n", key, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folioapp::model::{EnvironmentBody, Kind, PropertyOrder, Value};
    use std::collections::BTreeMap;

    #[test]
    fn test_render_list_rows() {
        let mut a = Resource::new(Kind::Workspace, None, -200.0);
        a.body.set_name("Main".to_string());
        let mut b = Resource::new(Kind::Workspace, None, -100.0);
        b.body.set_name("Side".to_string());

        let out = render_list(&[a.clone(), b]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&a.id));
        assert!(lines[0].contains("Main"));
        assert!(lines[1].contains("Side"));
    }

    #[test]
    fn test_render_empty_list() {
        assert!(render_list(&[]).contains("No documents."));
    }

    #[test]
    fn test_render_environment_in_property_order() {
        let mut env = Resource::new(Kind::Environment, Some("wrk_1".into()), 0.0);
        let mut data: BTreeMap<String, Value> = BTreeMap::new();
        data.insert("a".to_string(), "1".into());
        data.insert("z".to_string(), "2".into());
        env.body = Body::Environment(EnvironmentBody {
            name: "Dev".to_string(),
            data,
            data_property_order: PropertyOrder(vec!["z".to_string()]),
            ..EnvironmentBody::default()
        });

        let out = render_resource(&env);
        assert!(out.contains("Dev"));
        let z = out.find("z = 2").unwrap();
        let a = out.find("a = 1").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_render_messages() {
        let out = render_messages(&[
            CmdMessage::success("Folder created: Auth"),
            CmdMessage::info("Copied 2 nested documents"),
        ]);
        assert!(out.contains("Folder created: Auth"));
        assert_eq!(out.lines().count(), 2);
    }
}

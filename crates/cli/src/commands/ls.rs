// `reqbook ls`: show the saved-request tree.

use clap::Args;
use reqbook_common::display::{DisplayHierarchy, LeafNode};
use reqbook_common::types::Scope;

use super::Context;
use crate::output;

#[derive(Debug, Args)]
pub struct LsArgs {
    /// Only show one scope (`global` or `project`).
    #[arg(long)]
    scope: Option<Scope>,
}

pub async fn run(ctx: &Context, args: LsArgs) -> anyhow::Result<()> {
    let mut tree = ctx.commands.tree().await;
    if let Some(scope) = args.scope {
        tree.sections.retain(|section| section.scope == scope);
    }
    output::print_output(ctx.format, &tree, format_human)?;
    Ok(())
}

fn format_human(tree: &DisplayHierarchy) -> String {
    let mut lines = vec![format!("+ {}", tree.create.label)];
    if tree.sections.is_empty() {
        lines.push("No saved requests.".into());
        return lines.join("\n");
    }
    for section in &tree.sections {
        lines.push(format!("{} ({})", section.label, section.items.len()));
        for leaf in &section.items {
            lines.push(render_leaf(leaf));
        }
    }
    lines.join("\n")
}

fn render_leaf(leaf: &LeafNode) -> String {
    let mut line = format!("  ├─ {}", leaf.label);
    if let Some(description) = &leaf.description {
        line.push_str("  ");
        line.push_str(description);
    }
    if let Some(id) = leaf.record().and_then(|record| record.id()) {
        line.push_str(&format!(" [{id}]"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use reqbook_common::display::{CreateNode, SectionNode};
    use reqbook_common::types::RequestRecord;

    fn sample_tree() -> DisplayHierarchy {
        DisplayHierarchy {
            create: CreateNode::default(),
            sections: vec![
                SectionNode::new(
                    Scope::Global,
                    vec![LeafNode::for_record(
                        RequestRecord::new("POST", "https://api.example.com/items")
                            .with_id("r1")
                            .with_name("Create item"),
                    )],
                ),
                SectionNode::new(
                    Scope::Project,
                    vec![LeafNode::for_record(RequestRecord::new("GET", "/health").with_id("r2"))],
                ),
            ],
        }
    }

    #[test]
    fn human_format_renders_sections_and_leaves() {
        let output = format_human(&sample_tree());
        assert!(output.starts_with("+ New Request"));
        assert!(output.contains("Global (1)"));
        assert!(output.contains("├─ Create item  POST https://api.example.com/items [r1]"));
        assert!(output.contains("Project (1)"));
        assert!(output.contains("├─ GET /health [r2]"));
    }

    #[test]
    fn human_format_empty_tree() {
        let output = format_human(&DisplayHierarchy::default());
        assert_eq!(output, "+ New Request\nNo saved requests.");
    }

    #[test]
    fn json_format_roundtrips() {
        let tree = sample_tree();
        let mut buf = Vec::new();
        output::write_output(&mut buf, OutputFormat::Json, &tree, format_human).unwrap();
        let parsed: DisplayHierarchy = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, tree);
    }
}

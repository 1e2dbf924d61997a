// `reqbook save`: create or update a saved request from JSON input.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use reqbook_common::types::{RequestRecord, Scope};
use tokio::io::AsyncReadExt;
use tracing::info;

use super::Context;
use crate::exit_code::{CliError, NO_PROJECT};
use crate::output;

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// JSON file holding one request object. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Target scope. Falls back to the record's own `scope`, then `global`.
    #[arg(long)]
    pub scope: Option<Scope>,
}

pub async fn run(ctx: &Context, args: SaveArgs) -> anyhow::Result<()> {
    let input = match &args.file {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read `{}`", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await.context("failed to read stdin")?;
            buf
        }
    };
    let record = parse_request(&input)?;
    let scope = target_scope(args.scope, &record);

    let Some(stored) = ctx.store().upsert(scope, record).await? else {
        return Err(CliError::new(NO_PROJECT, "no project is open; request was not saved").into());
    };
    info!(scope = %scope, id = stored.id().unwrap_or_default(), "request saved");
    output::print_output(ctx.format, &stored, format_human)?;
    Ok(())
}

fn parse_request(input: &[u8]) -> anyhow::Result<RequestRecord> {
    serde_json::from_slice(input).context("failed to parse request")
}

fn target_scope(flag: Option<Scope>, record: &RequestRecord) -> Scope {
    flag.or(record.scope).unwrap_or_default()
}

fn format_human(record: &RequestRecord) -> String {
    let scope = record.scope.unwrap_or_default();
    format!("Saved {} [{}] to {}", record.label(), record.id().unwrap_or("?"), scope.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_record_scope() {
        let record = RequestRecord::new("GET", "/a").with_scope(Scope::Project);
        assert_eq!(target_scope(Some(Scope::Global), &record), Scope::Global);
        assert_eq!(target_scope(None, &record), Scope::Project);
        assert_eq!(target_scope(None, &RequestRecord::new("GET", "/a")), Scope::Global);
    }

    #[test]
    fn parse_request_keeps_extra_fields() {
        let record =
            parse_request(br#"{"method":"POST","url":"/items","body":"{}","scope":"project"}"#).unwrap();
        assert_eq!(record.method.as_deref(), Some("POST"));
        assert_eq!(record.scope, Some(Scope::Project));
        assert_eq!(record.extra["body"], "{}");
    }

    #[test]
    fn parse_request_rejects_non_objects() {
        let err = parse_request(b"[1, 2]").unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<serde_json::Error>()));
    }

    #[test]
    fn human_format_names_scope_and_id() {
        let record = RequestRecord::new("DELETE", "/x").with_id("abc").with_scope(Scope::Project);
        assert_eq!(format_human(&record), "Saved DELETE /x [abc] to Project");
    }
}

//! `vox repository`: list, view, and export saved interviews.
//!
//! Output is written to any `io::Write` so the rendering can be checked
//! without a terminal.

use std::io::Write;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use serde_json::json;

use vox_core::repository::interview::InterviewRepository;
use vox_types::config::VoxConfig;
use vox_types::interview::{Interview, InterviewId, Summary, Transcript, render_entries};

use super::RepositoryCommand;
use crate::state::open_repository;

pub async fn run(config: &VoxConfig, action: RepositoryCommand) -> Result<()> {
    let repository = open_repository(config).await?;
    let mut stdout = std::io::stdout();
    let result = match action {
        RepositoryCommand::List => list(&repository, &mut stdout).await,
        RepositoryCommand::View { id, full } => view(&repository, &id, full, &mut stdout).await,
        RepositoryCommand::Export { id, format } => {
            export(&repository, &id, &format, &mut stdout).await
        }
    };
    repository.close().await;
    result
}

/// Table of all interviews, newest first.
pub async fn list<R: InterviewRepository>(repository: &R, out: &mut impl Write) -> Result<()> {
    let interviews = repository
        .list_interviews()
        .await
        .context("could not list interviews")?;

    if interviews.is_empty() {
        writeln!(out, "No interviews found.")?;
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("User").fg(Color::White),
        Cell::new("Project").fg(Color::White),
        Cell::new("Created At").fg(Color::White),
    ]);

    for interview in &interviews {
        table.add_row(vec![
            Cell::new(interview.id.to_string()).fg(Color::Cyan),
            Cell::new(&interview.respondent_id),
            Cell::new(&interview.topic_id),
            Cell::new(format_created_at(interview)).fg(Color::DarkGrey),
        ]);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Metadata plus either the summary or, with `full`, the transcript.
pub async fn view<R: InterviewRepository>(
    repository: &R,
    id: &str,
    full: bool,
    out: &mut impl Write,
) -> Result<()> {
    let id = parse_id(id)?;
    let interview = repository
        .get_interview(&id)
        .await
        .with_context(|| format!("could not get interview {id}"))?;

    write_metadata(&interview, out)?;
    if full {
        let transcript = repository
            .get_transcript(&id)
            .await
            .with_context(|| format!("could not get transcript for {id}"))?;
        writeln!(out, "--- Transcript ---")?;
        write!(out, "{}", render_entries(&transcript.entries))?;
    } else {
        let summary = repository
            .get_summary(&id)
            .await
            .with_context(|| format!("could not get summary for {id}"))?;
        writeln!(out, "--- Summary ---")?;
        writeln!(out, "{}", summary.text)?;
    }
    Ok(())
}

/// Everything stored for one interview as `json` or `text`.
pub async fn export<R: InterviewRepository>(
    repository: &R,
    id: &str,
    format: &str,
    out: &mut impl Write,
) -> Result<()> {
    let format = format.to_lowercase();
    if format != "json" && format != "text" {
        bail!("unknown format: {format}");
    }

    let id = parse_id(id)?;
    let interview = repository
        .get_interview(&id)
        .await
        .with_context(|| format!("could not get interview {id}"))?;
    let transcript = repository
        .get_transcript(&id)
        .await
        .with_context(|| format!("could not get transcript for {id}"))?;
    let summary = repository
        .get_summary(&id)
        .await
        .with_context(|| format!("could not get summary for {id}"))?;

    if format == "json" {
        writeln!(out, "{}", export_json(&interview, &transcript, &summary)?)?;
    } else {
        write!(out, "{}", export_text(&interview, &transcript, &summary))?;
    }
    Ok(())
}

fn export_json(interview: &Interview, transcript: &Transcript, summary: &Summary) -> Result<String> {
    let document = json!({
        "interview": interview,
        "transcript": transcript,
        "summary": summary,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

fn export_text(interview: &Interview, transcript: &Transcript, summary: &Summary) -> String {
    let mut text = String::new();
    text.push_str(&metadata(interview));
    text.push_str("--- Transcript ---\n");
    text.push_str(&render_entries(&transcript.entries));
    text.push_str("--- Summary ---\n");
    text.push_str(&summary.text);
    text.push('\n');
    text
}

fn write_metadata(interview: &Interview, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", metadata(interview))?;
    Ok(())
}

fn metadata(interview: &Interview) -> String {
    format!(
        "Interview ID: {}\nUser: {}\nProject: {}\nCreated At: {}\n\n",
        interview.id,
        interview.respondent_id,
        interview.topic_id,
        format_created_at(interview)
    )
}

fn format_created_at(interview: &Interview) -> String {
    interview
        .created_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

fn parse_id(id: &str) -> Result<InterviewId> {
    id.trim()
        .parse()
        .with_context(|| format!("'{id}' is not a valid interview ID"))
}

//! The `fetch` command.

use std::path::Path;

use clap::ValueEnum;
use quizcall_common::client::{read_private_key, QuestionClient};
use quizcall_common::response::QuestionData;
use quizcall_common::settings::Settings;

use crate::error::CliError;

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for a single question fetch.
#[derive(Debug)]
pub struct FetchArgs<'a> {
    pub question_type: i64,
    pub firm_id: &'a str,
    pub key_file: &'a Path,
    pub dry_run: bool,
    pub format: OutputFormat,
}

/// Fetch one question, or with `dry_run` print the signed URL without sending it.
pub fn run(settings: Settings, args: &FetchArgs<'_>) -> Result<(), CliError> {
    let private_key = read_private_key(args.key_file)?;
    let client = QuestionClient::new(settings);

    if args.dry_run {
        let url = client.prepare_request(args.question_type, args.firm_id, &private_key)?;
        match args.format {
            OutputFormat::Text => println!("[Dry Run] Would request:\n  {}", url),
            OutputFormat::Json => {
                let value = serde_json::json!({ "url": url.as_str() });
                println!("{}", to_json(&value)?);
            }
        }
        return Ok(());
    }

    let data = client.fetch_question(args.question_type, args.firm_id, &private_key)?;
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&data)),
        OutputFormat::Json => println!("{}", to_json(&data)?),
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))
}

fn render_text(data: &QuestionData) -> String {
    let mut out = format!("Question: {}\nAnswer: {}\n", data.question, data.answer);
    if let Some(distractor) = &data.disturb_answer {
        out.push_str(&format!("Distractor: {}\n", distractor));
    }
    if data.is_unlimited() {
        out.push_str("Remaining calls: unlimited\n");
    } else {
        out.push_str(&format!("Remaining calls: {}\n", data.remain_times));
    }
    out
}

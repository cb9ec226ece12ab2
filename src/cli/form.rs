use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use travel_desk::{
    domain::{book::Saved, projection, Notice, Notifier},
    Config, Dataset, RequestBook, RequestForm, TravelRequest, Value,
};
use tracing::instrument;

use super::{terminal::Colorize, Context};

#[derive(Debug, Parser)]
pub struct Form {
    /// Start from the request shape of a travel batch
    #[arg(long, value_name = "BATCH")]
    from_batch: Option<String>,

    /// Start from an existing request
    #[arg(long, value_name = "REQUEST", conflicts_with = "from_batch")]
    edit: Option<String>,

    /// Set a field, e.g. `location.ville=Lyon` (repeatable)
    ///
    /// Values are read as JSON when they parse as JSON (`true`, `12`,
    /// `null`), and as text otherwise.
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, Value)>,

    /// Add a comment to the request
    #[arg(long, value_name = "TEXT")]
    comment: Option<String>,

    /// Send the request instead of saving it as a draft
    #[arg(long)]
    send: bool,

    /// Output format (yaml, json)
    #[arg(long, value_name = "FORMAT", default_value = "yaml")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Parses a `PATH=VALUE` assignment.
fn parse_assignment(input: &str) -> Result<(String, Value), String> {
    let (path, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{input}'"))?;
    if path.trim().is_empty() {
        return Err(format!("missing path in '{input}'"));
    }
    Ok((path.trim().to_string(), Value::parse_literal(value)))
}

/// Reports book notices on stderr, the way the dashboard shows toasts.
#[derive(Debug, Clone, Copy)]
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(id = notice.request_id(), "{}", notice.title());
        eprintln!(
            "{} {}",
            format!("✓ {}", notice.title()).success(),
            notice.description().dim()
        );
    }
}

impl Form {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let dataset = context.dataset()?;
        let config = context.config();

        let start = self.starting_request(&config, &dataset)?;
        let mut form = RequestForm::new(start)?;
        for (path, value) in self.assignments {
            form = form
                .with(&path, value)
                .with_context(|| format!("cannot set '{path}'"))?;
        }
        let request = form.into_request();
        let id = request.id.clone();

        let mut book =
            RequestBook::with_notifier(ConsoleNotifier).with_requests(dataset.requests);
        let saved = if self.send {
            book.send(request)
        } else {
            book.save(request)
        };
        tracing::info!(
            %id,
            replaced = matches!(saved, Saved::Replaced),
            "request stored"
        );

        if let Some(text) = &self.comment {
            book.add_comment(&id, &config.author, text, Utc::now())
                .context("cannot add the comment")?;
        }

        let request = book
            .get(&id)
            .with_context(|| format!("request '{id}' disappeared from the book"))?;
        match self.output {
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(request)?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(request)?),
        }
        Ok(())
    }

    fn starting_request(
        &self,
        config: &Config,
        dataset: &Dataset,
    ) -> anyhow::Result<TravelRequest> {
        if let Some(id) = &self.from_batch {
            let batch = dataset
                .batch(id)
                .with_context(|| format!("no batch with id '{id}'"))?;
            return Ok(projection::project_batch(batch, config.projection()));
        }
        if let Some(id) = &self.edit {
            return dataset
                .requests
                .iter()
                .find(|r| &r.id == id)
                .cloned()
                .with_context(|| format!("no request with id '{id}'"));
        }
        Ok(TravelRequest::new_draft())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("location.ville=Lyon", "location.ville", Value::from("Lyon"); "text")]
    #[test_case("needs.carteSIM=true", "needs.carteSIM", Value::Bool(true); "flag")]
    #[test_case("hotel.proche=a=b", "hotel.proche", Value::from("a=b"); "equals in value")]
    #[test_case("arrival.time=", "arrival.time", Value::from(""); "blank value")]
    fn assignments_are_parsed(input: &str, path: &str, value: Value) {
        assert_eq!(parse_assignment(input).unwrap(), (path.to_string(), value));
    }

    #[test_case("location.ville"; "no equals")]
    #[test_case("=Lyon"; "no path")]
    fn malformed_assignments_are_rejected(input: &str) {
        assert!(parse_assignment(input).is_err());
    }
}

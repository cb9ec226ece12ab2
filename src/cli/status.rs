use clap::Parser;
use travel_desk::{domain::DashboardStats, BatchStatus};
use tracing::instrument;

use super::{
    terminal::{batch_badge, is_narrow, Colorize},
    Context,
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show batch counts, budget and active travelers")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let dataset = context.dataset()?;
        let stats = DashboardStats::collect(&dataset.batches);

        match self.output {
            OutputFormat::Json => Self::output_json(&stats, dataset.requests.len())?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&stats),
            OutputFormat::Table => {
                if stats.total_batches == 0 {
                    println!("No travel batches yet. Add some to the dataset or run 'travel init'.");
                    return Ok(());
                }
                Self::output_table(&stats, dataset.requests.len());
            }
        }

        Ok(())
    }

    fn output_json(stats: &DashboardStats, requests: usize) -> anyhow::Result<()> {
        use serde_json::json;

        let statuses: Vec<_> = stats
            .by_status
            .iter()
            .map(|(status, count)| {
                json!({
                    "status": status.as_str(),
                    "label": status.label(),
                    "count": count,
                })
            })
            .collect();

        let output = json!({
            "batches": {
                "total": stats.total_batches,
                "by_status": statuses,
            },
            "budget": stats.total_budget,
            "active_travelers": stats.active_travelers,
            "requests": requests,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(stats: &DashboardStats) {
        println!(
            "batches={} budget={} travelers={}",
            stats.total_batches, stats.total_budget, stats.active_travelers
        );
    }

    fn output_table(stats: &DashboardStats, requests: usize) {
        println!("Voyages");
        println!("{}", "───────".dim());

        if is_narrow() {
            for status in BatchStatus::ALL {
                println!("{}: {}", status.label(), stats.count(status));
            }
        } else {
            println!("{:<14} Nombre", "Statut");
            for status in BatchStatus::ALL {
                println!("{} {}", batch_badge(status, 14), stats.count(status));
            }
        }
        println!("Total          {}", stats.total_batches);

        println!();
        println!("Budget total: {}", format_budget(stats.total_budget).strong());
        println!(
            "Voyageurs actifs: {}",
            stats.active_travelers.to_string().info()
        );
        println!("Demandes: {requests}");

        let planning = stats.count(BatchStatus::Planning);
        if planning > 0 {
            println!();
            println!(
                "{} ⚠️",
                format!("{planning} voyage(s) en planification").warning()
            );
        }
    }
}

/// Formats a budget with thin thousands separators and a euro sign.
pub fn format_budget(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(c);
    }
    format!("{grouped} €")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::format_budget;

    #[test_case(0, "0 €")]
    #[test_case(950, "950 €")]
    #[test_case(8500, "8\u{202f}500 €")]
    #[test_case(1_234_567, "1\u{202f}234\u{202f}567 €")]
    fn budgets_are_grouped(amount: u64, expected: &str) {
        assert_eq!(format_budget(amount), expected);
    }
}

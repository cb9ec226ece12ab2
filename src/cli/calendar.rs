use chrono::{Local, NaiveDate};
use clap::Parser;
use travel_desk::{
    domain::calendar::{self, Week},
    TravelBatch,
};
use tracing::instrument;

use super::{
    terminal::{fit, is_narrow, Colorize},
    Context,
};

const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];
const CELL: usize = 14;

#[derive(Debug, Parser)]
pub struct Calendar {
    /// The day to centre the calendar on (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Number of weeks to show (defaults to the configured value)
    #[arg(long, value_name = "N")]
    weeks: Option<usize>,
}

impl Calendar {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let dataset = context.dataset()?;
        let reference = self.date.unwrap_or_else(|| Local::now().date_naive());
        let week_count = self.weeks.unwrap_or_else(|| context.config().weeks());

        let weeks = calendar::build_weeks(reference, &dataset.batches, week_count);

        println!("{}", reference.format("%B %Y").to_string().strong());
        if is_narrow() {
            print_agenda(&weeks);
        } else {
            print_grid(&weeks);
        }
        Ok(())
    }
}

/// One row of day headers and as many rows of trips as the busiest day needs.
fn print_grid(weeks: &[Week<'_, TravelBatch>]) {
    let header: Vec<_> = WEEKDAYS.iter().map(|d| fit(d, CELL)).collect();
    println!("{}", header.join(" ").dim());

    for week in weeks {
        let dates: Vec<_> = week
            .days()
            .iter()
            .map(|day| {
                let label = fit(&day.date.format("%d/%m").to_string(), CELL);
                if day.is_today {
                    label.info()
                } else {
                    label
                }
            })
            .collect();
        println!("{}", dates.join(" "));

        let rows = week
            .days()
            .iter()
            .map(|day| day.batches.len())
            .max()
            .unwrap_or_default();
        for row in 0..rows {
            let cells: Vec<_> = week
                .days()
                .iter()
                .map(|day| {
                    day.batches
                        .get(row)
                        .map_or_else(|| fit("", CELL), |batch| fit(&batch.name, CELL))
                })
                .collect();
            println!("{}", cells.join(" "));
        }
        println!();
    }
}

/// A day-per-line listing for narrow terminals. Empty days are skipped.
fn print_agenda(weeks: &[Week<'_, TravelBatch>]) {
    for week in weeks {
        for (day, weekday) in week.days().iter().zip(WEEKDAYS) {
            if day.batches.is_empty() && !day.is_today {
                continue;
            }
            let label = format!("{weekday} {}", day.date.format("%d/%m"));
            let label = if day.is_today { label.info() } else { label };
            let names: Vec<_> = day.batches.iter().map(|b| b.name.as_str()).collect();
            println!("{label}  {}", names.join(", "));
        }
    }
}

use clap::Parser;
use travel_desk::{domain::request::DateRange, storage::Dataset};
use tracing::instrument;

use super::{
    requests::format_range,
    status::format_budget,
    terminal::{batch_badge, fit, Colorize},
    Context,
};

#[derive(Debug, Parser)]
pub struct Batches {
    /// Only list the travelers
    #[arg(long)]
    travelers: bool,
}

impl Batches {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let dataset = context.dataset()?;

        if !self.travelers {
            print_batches(&dataset);
            println!();
        }
        print_travelers(&dataset);
        Ok(())
    }
}

fn print_batches(dataset: &Dataset) {
    println!("{}", "Voyages".strong());
    if dataset.batches.is_empty() {
        println!("  {}", "Aucun voyage planifié.".dim());
        return;
    }

    for batch in &dataset.batches {
        println!();
        println!("{}  {}", batch.name.strong(), batch_badge(batch.status, 0));
        println!("  Destination : {}", batch.destination);
        println!(
            "  Dates       : {}",
            format_range(DateRange::between(batch.start_date, batch.end_date))
        );
        let names: Vec<_> = dataset
            .travelers_of(batch)
            .map(|t| t.name.as_str())
            .collect();
        println!(
            "  Voyageurs   : {} ({})",
            names.len(),
            if names.is_empty() { "–".to_string() } else { names.join(", ") }
        );
        println!("  Budget      : {}", format_budget(batch.budget));
    }
}

fn print_travelers(dataset: &Dataset) {
    println!("{}", "Voyageurs".strong());
    if dataset.travelers.is_empty() {
        println!("  {}", "Aucun voyageur.".dim());
        return;
    }

    println!(
        "  {} {} {} {} Total",
        fit("", 3),
        fit("Nom", 20),
        fit("Département", 14),
        fit("En cours", 9)
    );
    for traveler in &dataset.travelers {
        let current = traveler.current_trips.to_string();
        let current = if traveler.current_trips > 0 {
            fit(&current, 9).info()
        } else {
            fit(&current, 9).dim()
        };
        println!(
            "  {} {} {} {} {}",
            fit(&traveler.initials(), 3),
            fit(&traveler.name, 20),
            fit(&traveler.department, 14),
            current,
            traveler.total_trips
        );
        if !traveler.email.is_empty() {
            println!("      {}", traveler.email.dim());
        }
    }
}

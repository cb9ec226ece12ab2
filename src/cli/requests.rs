use chrono::NaiveDate;
use clap::Parser;
use travel_desk::{
    domain::{projection, request::DateRange, DigitalAsset, Participant},
    Dataset, RequestStatus, TravelRequest,
};
use tracing::instrument;

use super::{
    terminal::{asset_badge, fit, is_narrow, request_badge, Colorize},
    Context,
};

#[derive(Debug, Parser)]
pub struct Requests {
    /// How to lay the requests out
    #[arg(long, value_enum, default_value_t = View::Table)]
    view: View,

    /// Only show requests with this status (draft, sent, validated)
    #[arg(long, value_name = "STATUS")]
    status: Option<RequestStatus>,

    /// Show the travel batches as requests
    #[arg(long)]
    from_batches: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum View {
    Table,
    Cards,
}

impl Requests {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let dataset = context.dataset()?;

        let requests = if self.from_batches {
            let config = context.config();
            projection::project(&dataset.batches, config.projection())
        } else {
            dataset.requests.clone()
        };

        let requests: Vec<_> = requests
            .into_iter()
            .filter(|r| self.status.is_none_or(|s| r.status == s))
            .collect();

        if requests.is_empty() {
            println!("Aucune demande de voyage.");
            return Ok(());
        }

        match self.view {
            View::Table => print_table(&requests, |id| dataset.participants(id)),
            View::Cards => {
                for (i, request) in requests.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print_card(request, &dataset);
                }
            }
        }

        Ok(())
    }
}

fn print_table<'a>(
    requests: &[TravelRequest],
    participants: impl Fn(&str) -> &'a [Participant],
) {
    let narrow = is_narrow();

    if narrow {
        for request in requests {
            println!(
                "{} {} ({})",
                request.location.to_string().strong(),
                format_range(request.dates).dim(),
                request_badge(request.status, 0)
            );
        }
        return;
    }

    println!(
        "{} {} {} {} Statut",
        fit("Destination", 24),
        fit("Dates", 25),
        fit("Participants", 14),
        fit("Objet", 14)
    );
    for request in requests {
        let initials: Vec<_> = participants(&request.id)
            .iter()
            .map(Participant::initials)
            .collect();
        let initials = if initials.is_empty() {
            "–".to_string()
        } else {
            initials.join(" ")
        };
        println!(
            "{} {} {} {} {}",
            fit(&request.location.to_string(), 24),
            fit(&format_range(request.dates), 25),
            fit(&initials, 14),
            fit(request.purpose.label(), 14),
            request_badge(request.status, 10)
        );
    }
}

fn print_card(request: &TravelRequest, dataset: &Dataset) {
    println!(
        "{} · {}  {}",
        request.purpose.label().strong(),
        request.location,
        request_badge(request.status, 0)
    );
    if !request.location.district.is_empty() {
        println!("  Quartier : {}", request.location.district);
    }
    println!("  Dates    : {}", format_range(request.dates));
    println!(
        "  Arrivée  : {} {} ({})",
        format_day(request.arrival.date),
        request.arrival.time.map_or_else(String::new, |t| t.to_string()),
        request.arrival.preference.label()
    );
    println!(
        "  Départ   : {} {} ({})",
        format_day(request.departure.date),
        request.departure.time.map_or_else(String::new, |t| t.to_string()),
        request.departure.preference.label()
    );
    if !request.hotel.near.is_empty() {
        println!("  Hôtel    : proche de {}", request.hotel.near);
    }

    let mut needs = Vec::new();
    if request.needs.sim_card {
        needs.push("Carte SIM");
    }
    if request.needs.travel_laptop {
        needs.push("Ordinateur de voyage");
    }
    if !needs.is_empty() {
        println!("  Besoins  : {}", needs.join(", "));
    }

    let participants = dataset.participants(&request.id);
    if !participants.is_empty() {
        println!("  {}", format!("Voyageurs ({})", participants.len()).strong());
        for participant in participants {
            println!(
                "    {} {} · {}",
                participant.name,
                participant.role.dim(),
                participant.status.label()
            );
        }
    }

    let assets = dataset.assets(&request.id);
    if !assets.is_empty() {
        println!("  {}", format!("Matériel ({})", assets.len()).strong());
        for asset in assets {
            println!("    {}  {}", asset_title(asset), asset_badge(asset.status));
            for line in asset_details(asset) {
                println!("      {}", line.dim());
            }
        }
    }

    if !request.comments.is_empty() {
        println!("  {}", format!("{} commentaire(s)", request.comments.len()).dim());
        for comment in &request.comments {
            println!(
                "    {} {}: {}",
                comment.date.format("%d/%m/%Y").to_string().dim(),
                comment.author.as_str().info(),
                comment.text.as_str()
            );
        }
    }
}

fn asset_title(asset: &DigitalAsset) -> String {
    format!("{} ({})", asset.model, asset.kind.label())
}

/// The serial number, then the holder when there is one.
fn asset_details(asset: &DigitalAsset) -> Vec<String> {
    let mut lines = vec![format!("SN: {}", asset.serial_number)];
    if !asset.assigned_to.is_empty() {
        lines.push(format!("Assigné à: {}", asset.assigned_to));
    }
    lines
}

/// Formats a travel period as `dd/mm/yyyy → dd/mm/yyyy`.
pub fn format_range(dates: DateRange) -> String {
    format!("{} → {}", format_day(dates.from), format_day(dates.to))
}

fn format_day(day: Option<NaiveDate>) -> String {
    day.map_or_else(|| "?".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

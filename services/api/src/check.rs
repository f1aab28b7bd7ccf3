use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;
use sitewise::error::AppError;
use sitewise::geo::Coordinate;
use sitewise::placement::{
    evaluate, FeasibilityReport, PlacementError, SiteRecord, DEFAULT_SEPARATION_MILES,
};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Candidate latitude in degrees
    #[arg(long)]
    lat: f64,
    /// Candidate longitude in degrees
    #[arg(long)]
    lng: f64,
    /// JSON file containing an array of site records to check against
    #[arg(long)]
    sites: Option<PathBuf>,
    /// Separation threshold in miles
    #[arg(long)]
    threshold: Option<f64>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let candidate = Coordinate::new(args.lat, args.lng).map_err(PlacementError::from)?;

    let sites: Vec<SiteRecord> = match args.sites {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader)?
        }
        None => Vec::new(),
    };

    let threshold = args.threshold.unwrap_or(DEFAULT_SEPARATION_MILES);
    let report = evaluate(candidate, &sites, threshold, None);
    render_report(&candidate, &report);

    Ok(())
}

fn render_report(candidate: &Coordinate, report: &FeasibilityReport) {
    println!(
        "Candidate ({:.6}, {:.6}) against {} site(s), threshold {} miles",
        candidate.lat(),
        candidate.lng(),
        report.considered,
        report.threshold_miles
    );

    if report.is_feasible {
        println!("Feasible: yes");
    } else {
        println!("Feasible: no");
    }

    match &report.nearest_approved {
        Some(nearest) => println!(
            "Nearest approved site: {} ({}) at {:.2} miles",
            nearest.site.name, nearest.site.id.0, nearest.distance_miles
        ),
        None => println!("Nearest approved site: none"),
    }

    match &report.nearest_any {
        Some(nearest) => println!(
            "Nearest site of any status: {} ({}, {}) at {:.2} miles",
            nearest.site.name,
            nearest.site.id.0,
            nearest.site.status.label(),
            nearest.distance_miles
        ),
        None => println!("Nearest site of any status: none"),
    }
}

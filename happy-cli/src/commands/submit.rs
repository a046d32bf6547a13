//! Non-interactive submission

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use happy_core::{
    FormController, FormEvent, HappyConfig, OrphanageForm, OrphanagePayload, PartValue, Position,
    SubmitOutcome,
};

use crate::host::ConsoleHost;

#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Orphanage name
    #[arg(long)]
    pub name: String,

    /// About the orphanage (at most 300 characters are kept)
    #[arg(long, default_value = "")]
    pub about: String,

    /// Visiting instructions
    #[arg(long, default_value = "")]
    pub instructions: String,

    /// Opening hours, free text (e.g. "8h to 18h")
    #[arg(long, default_value = "")]
    pub opening_hours: String,

    /// Latitude of the orphanage
    #[arg(long, allow_negative_numbers = true, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Longitude of the orphanage
    #[arg(long, allow_negative_numbers = true, requires = "latitude")]
    pub longitude: Option<f64>,

    /// The orphanage does not receive visits on weekends
    #[arg(long)]
    pub closed_on_weekends: bool,

    /// Photo to attach (repeat for several, kept in order)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "HAPPY_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Print the request that would be sent instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run payload as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl SubmitArgs {
    /// The form interactions these flags stand for
    fn events(&self) -> Vec<FormEvent> {
        let mut events = vec![
            FormEvent::NameChanged(self.name.clone()),
            FormEvent::AboutChanged(self.about.clone()),
            FormEvent::InstructionsChanged(self.instructions.clone()),
            FormEvent::OpeningHoursChanged(self.opening_hours.clone()),
            FormEvent::OpenOnWeekendsChanged(!self.closed_on_weekends),
        ];

        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            events.push(FormEvent::MapClicked(Position::new(latitude, longitude)));
        }

        if !self.images.is_empty() {
            events.push(FormEvent::ImagesSelected(Some(self.images.clone())));
        }

        events
    }
}

pub async fn run_submit(args: SubmitArgs) -> Result<()> {
    if args.dry_run {
        return print_dry_run(&args);
    }

    let config = HappyConfig::load()?;
    let api = super::build_api(&config, args.api_url.as_deref())?;

    let mut controller = FormController::new(api, ConsoleHost::default(), config.page.settings());
    for event in args.events() {
        controller.dispatch(event);
    }

    match controller.submit().await {
        SubmitOutcome::Created { .. } => Ok(()),
        SubmitOutcome::Rejected(err) => {
            Err(anyhow::Error::new(err).context("Orphanage was not created"))
        }
    }
}

fn print_dry_run(args: &SubmitArgs) -> Result<()> {
    let form = args
        .events()
        .into_iter()
        .fold(OrphanageForm::default(), OrphanageForm::apply);
    let payload = OrphanagePayload::from_form(&form)?;

    if args.json {
        let json = serde_json::to_string_pretty(&payload).context("Failed to serialize payload")?;
        println!("{}", json);
        return Ok(());
    }

    println!("POST orphanages (multipart/form-data)");
    for part in payload.parts() {
        match &part.value {
            PartValue::Text { value } => println!("  {:<17} {}", part.name, value),
            PartValue::File { file } => println!(
                "  {:<17} {} ({}, {})",
                part.name,
                file.file_name,
                file.mime,
                file.path.display()
            ),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SubmitArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: SubmitArgs,
        }
        let argv = std::iter::once("submit").chain(args.iter().copied());
        Wrapper::parse_from(argv).args
    }

    #[test]
    fn test_events_from_flags() {
        let args = parse(&[
            "--name",
            "Shelter A",
            "--latitude",
            "-22.85",
            "--longitude",
            "-47.20",
            "--closed-on-weekends",
            "--image",
            "f1.png",
            "--image",
            "f2.png",
        ]);

        let form = args
            .events()
            .into_iter()
            .fold(OrphanageForm::default(), OrphanageForm::apply);
        assert_eq!(form.name, "Shelter A");
        assert_eq!(form.position, Some(Position::new(-22.85, -47.20)));
        assert!(!form.open_on_weekends);
        assert_eq!(form.images.len(), 2);
    }

    #[test]
    fn test_position_is_optional() {
        let args = parse(&["--name", "Shelter A"]);
        assert!(args
            .events()
            .iter()
            .all(|e| !matches!(e, FormEvent::MapClicked(_))));
    }

    #[test]
    fn test_latitude_requires_longitude() {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            _args: SubmitArgs,
        }
        let result = Wrapper::try_parse_from(["submit", "--name", "x", "--latitude", "1.0"]);
        assert!(result.is_err());
    }
}

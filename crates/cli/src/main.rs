//! `sobra` command line front end for the "Sobra de Doses" registration.
//!
//! # Environment Variables
//! - `SOBRA_API_URL`: backend base URL (required)
//! - `SOBRA_REQUEST_TIMEOUT_SECS`: request timeout in seconds (default: 60)
//! - `SOBRA_API_TOKEN`: bearer token sent with every request (optional)
//! - `RUST_LOG`: log filter (default: `sobra=info`)

mod capture;
mod console;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use sobra_core::constants::SCREEN_TITLE;
use sobra_core::{
    AttachmentSlot, ClientConfig, GroupDirectory, LeftOverScreen, PatientField, ProgressObserver,
};
use sobra_http::HttpRegistrationService;
use sobra_types::GroupId;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::capture::FileCaptureProvider;
use crate::console::{ConsolePresenter, UploadBar};

#[derive(Parser)]
#[command(name = "sobra")]
#[command(about = "Sobra de Doses leftover-dose registration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registration groups
    Groups,
    /// Register a patient for a leftover dose
    Register(RegisterArgs),
}

#[derive(Args)]
struct RegisterArgs {
    /// Full name
    #[arg(long)]
    name: String,
    /// CPF, with or without punctuation
    #[arg(long)]
    cpf: String,
    /// Contact phone with area code
    #[arg(long)]
    phone: String,
    /// SUS card number (optional)
    #[arg(long)]
    sus_card: Option<String>,
    #[arg(long)]
    street: String,
    /// House number
    #[arg(long)]
    number: String,
    /// Address complement (optional)
    #[arg(long)]
    complement: Option<String>,
    /// Address reference point
    #[arg(long)]
    reference: String,
    #[arg(long)]
    neighborhood: String,
    /// Group identifier; defaults to the first group of the directory
    #[arg(long = "group")]
    group_id: Option<GroupId>,
    /// Identity document, front
    #[arg(long)]
    id_front: Option<PathBuf>,
    /// Identity document, back
    #[arg(long)]
    id_back: Option<PathBuf>,
    /// CPF or SUS card proof
    #[arg(long)]
    cpf_proof: Option<PathBuf>,
    /// Proof of address
    #[arg(long)]
    address_proof: Option<PathBuf>,
    /// Paycheck or work contract
    #[arg(long)]
    work_contract: Option<PathBuf>,
}

impl RegisterArgs {
    fn fields(&self) -> Vec<(PatientField, &str)> {
        let mut fields = vec![
            (PatientField::Name, self.name.as_str()),
            (PatientField::Cpf, self.cpf.as_str()),
            (PatientField::Phone, self.phone.as_str()),
            (PatientField::Street, self.street.as_str()),
            (PatientField::Number, self.number.as_str()),
            (PatientField::Reference, self.reference.as_str()),
            (PatientField::Neighborhood, self.neighborhood.as_str()),
        ];
        if let Some(sus_card) = &self.sus_card {
            fields.push((PatientField::SusCard, sus_card.as_str()));
        }
        if let Some(complement) = &self.complement {
            fields.push((PatientField::Complement, complement.as_str()));
        }
        fields
    }

    fn attachments(&self) -> Vec<(AttachmentSlot, &PathBuf)> {
        [
            (AttachmentSlot::IdentityFront, &self.id_front),
            (AttachmentSlot::IdentityBack, &self.id_back),
            (AttachmentSlot::CpfOrSusProof, &self.cpf_proof),
            (AttachmentSlot::AddressProof, &self.address_proof),
            (AttachmentSlot::WorkContract, &self.work_contract),
        ]
        .into_iter()
        .filter_map(|(slot, path)| path.as_ref().map(|p| (slot, p)))
        .collect()
    }
}

/// Group listing headed by the screen title, with the default group marked.
fn render_groups(directory: &GroupDirectory) -> String {
    let selected = directory.selected();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Grupo", ""]);
    for (id, label) in directory.options() {
        let marker = if Some(id) == selected { "padrão" } else { "" };
        table.add_row(vec![id.to_string(), label.to_string(), marker.to_string()]);
    }
    format!("{SCREEN_TITLE}\n{table}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sobra=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("failed to resolve configuration")?;
    let service = Arc::new(HttpRegistrationService::new(config)?);
    let presenter = Arc::new(ConsolePresenter::default());

    match cli.command {
        Commands::Groups => {
            let mut screen = LeftOverScreen::new(service, presenter);
            screen.activate().await?;
            println!("{}", render_groups(screen.groups()));
        }
        Commands::Register(args) => {
            let bar = Arc::new(UploadBar::new());
            let observer: Arc<dyn ProgressObserver> = bar.clone();
            let mut screen = LeftOverScreen::new(service, presenter.clone())
                .with_progress_observer(observer);

            if let Err(e) = screen.activate().await {
                tracing::warn!(error = %e, "continuing without group directory");
            }
            if let Some(id) = args.group_id {
                screen.select_group(id)?;
            }

            for (field, value) in args.fields() {
                screen.set_field(field, value);
            }

            for (slot, path) in args.attachments() {
                let provider = FileCaptureProvider::new(path);
                let captured = screen
                    .capture(slot, provider.preferred_source(), &provider)
                    .await
                    .with_context(|| format!("failed to attach {}", slot.label()))?;
                if !captured {
                    tracing::warn!(slot = slot.label(), "attachment skipped");
                }
            }

            let result = screen.submit().await;
            bar.finish();
            result?;
            tracing::debug!(closed = presenter.navigated_back(), "registration finished");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sobra_core::{CreatePatientRequest, Group, RegistrationService, ServiceError};
    use sobra_types::NonEmptyText;

    struct TwoGroups;

    #[async_trait]
    impl RegistrationService for TwoGroups {
        async fn fetch_groups(&self, _category: &str) -> Result<Vec<Group>, ServiceError> {
            Ok(vec![
                Group {
                    id: GroupId::new(7),
                    group: NonEmptyText::new("Trabalhadores da Saúde").unwrap(),
                },
                Group {
                    id: GroupId::new(9),
                    group: NonEmptyText::new("Professores").unwrap(),
                },
            ])
        }

        async fn create_patient(
            &self,
            _request: CreatePatientRequest,
            _progress: Arc<dyn ProgressObserver>,
        ) -> Result<String, ServiceError> {
            unreachable!("listing only")
        }
    }

    fn argv<'a>(extra: &[&'a str]) -> Vec<&'a str> {
        let mut argv = vec![
            "sobra",
            "register",
            "--name",
            "Ana Souza",
            "--cpf",
            "123.456.789-09",
            "--phone",
            "11987654321",
            "--street",
            "Rua A",
            "--number",
            "10",
            "--reference",
            "Padaria",
            "--neighborhood",
            "Centro",
        ];
        argv.extend_from_slice(extra);
        argv
    }

    fn register(extra: &[&str]) -> RegisterArgs {
        match Cli::try_parse_from(argv(extra)).unwrap().command {
            Commands::Register(args) => args,
            Commands::Groups => panic!("expected register"),
        }
    }

    #[test]
    fn test_register_fields_skip_absent_optionals() {
        let args = register(&[]);
        let fields: Vec<_> = args.fields().into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields.len(), 7);
        assert!(!fields.contains(&PatientField::SusCard));
        assert!(args.attachments().is_empty());
    }

    #[test]
    fn test_register_collects_attachments_in_slot_order() {
        let args = register(&[
            "--work-contract",
            "holerite.pdf",
            "--id-front",
            "rg.jpg",
            "--sus-card",
            "898001160660001",
            "--group",
            "12",
        ]);
        let slots: Vec<_> = args.attachments().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            slots,
            vec![AttachmentSlot::IdentityFront, AttachmentSlot::WorkContract]
        );
        assert_eq!(args.group_id, Some(GroupId::new(12)));
        assert!(args.fields().contains(&(PatientField::SusCard, "898001160660001")));
    }

    #[test]
    fn test_register_rejects_non_numeric_group() {
        assert!(Cli::try_parse_from(argv(&["--group", "x"])).is_err());
        assert!(Cli::try_parse_from(argv(&["--group", "3"])).is_ok());
    }

    #[tokio::test]
    async fn test_render_groups_marks_default_under_title() {
        let mut directory = GroupDirectory::new();
        directory
            .load("2", &TwoGroups, &ConsolePresenter::default())
            .await
            .unwrap();

        let rendered = render_groups(&directory);
        assert!(rendered.starts_with(SCREEN_TITLE));
        let default_row = rendered
            .lines()
            .find(|line| line.contains("Trabalhadores da Saúde"))
            .unwrap();
        assert!(default_row.contains("padrão"));
        let other_row = rendered.lines().find(|line| line.contains("Professores")).unwrap();
        assert!(!other_row.contains("padrão"));
    }
}

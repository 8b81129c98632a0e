use animalia::{AppConfig, api, repo, utils as app_utils};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::utils;

#[derive(Args, Debug, Clone)]
pub struct ListUsersArgs {
    /// Only users registered as veterinario
    #[arg(long)]
    vets: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ListPetsArgs {
    /// Only pets owned by this client id
    #[arg(short, long)]
    cliente: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct ListAppointmentsArgs {
    /// Agenda of this vet id
    #[arg(short, long)]
    vet: Option<i64>,

    /// Day of the agenda, YYYY-MM-DD. Needs --vet
    #[arg(short, long, requires = "vet")]
    date: Option<NaiveDate>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Creates the schema and the fixture rows if the store is new
    InitDb,
    ListUsers(ListUsersArgs),
    ListPets(ListPetsArgs),
    ListAppointments(ListAppointmentsArgs),
}

/// Operator tools for the animalia store
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self, app_config: &AppConfig) -> anyhow::Result<()> {
        let repo: repo::ImplAppRepo = Box::new(app_utils::open_repo(app_config).await?);

        match &self.action {
            Action::InitDb => {
                info!("store ready at {}", app_config.db_host);
            }
            Action::ListUsers(ListUsersArgs { vets }) => {
                let users = if *vets {
                    api::user::list_veterinarians(&repo).await?
                } else {
                    repo.list_users().await?
                };
                users.iter().for_each(|user| println!("{}", utils::user_line(user)));
            }
            Action::ListPets(ListPetsArgs { cliente }) => {
                let pets = match cliente {
                    Some(cliente_id) => api::pet::pets_of_client(*cliente_id, &repo).await?,
                    None => repo.list_pets().await?,
                };
                pets.iter().for_each(|pet| println!("{}", utils::pet_line(pet)));
            }
            Action::ListAppointments(ListAppointmentsArgs { vet, date }) => {
                let appointments = match vet {
                    Some(vet_id) => api::appointment::appointments_of_vet(*vet_id, &repo).await?,
                    None => repo.list_appointments().await?,
                };

                match (vet, date) {
                    (Some(vet_id), Some(date)) => {
                        api::appointment::daily_schedule(&appointments, *vet_id, *date)
                            .into_iter()
                            .for_each(|a| println!("{}", utils::appointment_line(a)));
                    }
                    _ => appointments
                        .iter()
                        .for_each(|a| println!("{}", utils::appointment_line(a))),
                }
            }
        }

        Ok(())
    }
}

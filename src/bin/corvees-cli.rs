#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use corvees::{
    calendar::parse_weekday,
    config::Settings,
    ics::{self, IcsOptions},
    io,
    notification::{dispatch, prepare_reminder, prepare_schedule_messages, OutboxMailer, TextMessages},
    schedule::{generate_schedule, GeneratedSchedule, ScheduleId, ScheduleRequest},
    scheduler::Engine,
    storage::{JsonStorage, Storage},
    SlotCatalog,
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Horaire de ménage de la coop (fichiers JSON, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Dossier des données (roster.json, schedules.json, counters.json)
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Fichier de réglages JSON (défaut: <data-dir>/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remplacer le roster par un CSV
    ImportPeople {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Lister les membres
    ListPeople,

    /// Générer un horaire sur une plage de mois
    Generate {
        /// 1-12
        #[arg(long)]
        start_month: u32,
        #[arg(long)]
        start_year: i32,
        /// 1-12
        #[arg(long)]
        end_month: u32,
        #[arg(long)]
        end_year: i32,
        /// Jour du ménage (défaut: réglages)
        #[arg(long)]
        weekday: Option<String>,
        /// Affiche sans sauvegarder l'horaire ni les compteurs
        #[arg(long)]
        dry_run: bool,
    },

    /// Lister les horaires sauvegardés
    Schedules,

    /// Afficher un horaire (le plus récent par défaut)
    Show {
        #[arg(long)]
        id: Option<String>,
    },

    /// Supprimer un horaire sauvegardé
    DeleteSchedule {
        #[arg(long)]
        id: String,
    },

    /// Exporter un horaire en CSV (et le roster en JSON)
    Export {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        people_json: Option<PathBuf>,
    },

    /// Écrire le fichier calendrier d'un membre
    Ics {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        /// Année des dates de l'horaire (défaut: année courante)
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        out: PathBuf,
    },

    /// Envoyer l'horaire à chaque membre (dans un dossier d'envoi)
    Send {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Tout envoyer à l'adresse de test
        #[arg(long)]
        test: bool,
        #[arg(long)]
        outbox: PathBuf,
    },

    /// Envoyer un rappel pour une tâche
    Remind {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        /// Libellé de la semaine, ex. "7 février"
        #[arg(long)]
        date: String,
        #[arg(long)]
        test: bool,
        #[arg(long)]
        outbox: PathBuf,
    },

    /// Afficher les compteurs de charge
    Counters {
        #[arg(long)]
        out_csv: Option<PathBuf>,
    },

    /// Ajouter aux compteurs les tâches d'un horaire sauvegardé
    Recount {
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(cli.data_dir.join("settings.json"))?,
    };
    let storage = JsonStorage::open(&cli.data_dir)?;
    let engine = Engine::new(SlotCatalog::standard());

    let code = match cli.cmd {
        Commands::ImportPeople { csv } => {
            let roster = io::import_people_csv(&csv)?;
            storage.save_roster(&roster)?;
            println!("Imported {} people", roster.people.len());
            0
        }
        Commands::ListPeople => {
            let roster = storage.load_roster()?;
            let counters = storage.load_counters()?.value;
            for p in &roster.people {
                let partner = p
                    .paired_with
                    .as_ref()
                    .and_then(|id| roster.find_by_id(id))
                    .map(|q| q.name.as_str())
                    .unwrap_or("-");
                let floors: Vec<&str> = p.floor_restrictions.iter().map(|f| f.key()).collect();
                let roles: Vec<&str> = p.role_restrictions.iter().map(|r| r.key()).collect();
                println!(
                    "{} | {} | floors: {} | roles: {} | paired: {} | count: {}{}",
                    p.name,
                    p.email.as_deref().unwrap_or("-"),
                    if floors.is_empty() { "*".to_string() } else { floors.join(";") },
                    if roles.is_empty() { "*".to_string() } else { roles.join(";") },
                    partner,
                    counters.get(&p.id),
                    if p.active { "" } else { " | inactive" }
                );
            }
            0
        }
        Commands::Generate {
            start_month,
            start_year,
            end_month,
            end_year,
            weekday,
            dry_run,
        } => {
            let weekday = match weekday {
                Some(raw) => parse_weekday(&raw).with_context(|| format!("invalid weekday: {raw}"))?,
                None => settings.weekday()?,
            };
            let request =
                ScheduleRequest::new(start_month, start_year, end_month, end_year).on(weekday);

            let roster = storage.load_roster()?;
            if roster.active().next().is_none() {
                bail!("aucun membre actif dans le roster");
            }
            let baseline = storage.load_counters()?;
            let output =
                generate_schedule(&engine, &roster, &request, &baseline.value, Utc::now())?;

            print!("{}", io::render_schedule_table(&output.schedule, engine.catalog()));

            if !dry_run {
                // compteurs d'abord : un conflit de version n'enregistre rien
                let mut counters = baseline.value.clone();
                counters.merge(&output.counters);
                let version = storage.save_counters(baseline.version, &counters)?;
                storage.save_schedule(&output.schedule).with_context(|| {
                    format!(
                        "counters already saved as version {version} but schedule {} was not; \
                         fix counters.json by hand before generating again",
                        output.schedule.id
                    )
                })?;
                println!("Saved schedule {}", output.schedule.id);
            }

            let unfilled: usize = output.schedule.weeks.iter().map(|w| w.unfilled()).sum();
            if unfilled > 0 {
                eprintln!("{unfilled} unfilled slot(s)");
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                0
            }
        }
        Commands::Schedules => {
            for s in storage.load_schedules()? {
                println!(
                    "{} | {} | {} week(s) | {}",
                    s.id,
                    s.title,
                    s.weeks.len(),
                    s.created_at.to_rfc3339()
                );
            }
            0
        }
        Commands::Show { id } => {
            let schedule = pick_schedule(&storage, id)?;
            print!("{}", io::render_schedule_table(&schedule, engine.catalog()));
            0
        }
        Commands::Export {
            id,
            out,
            people_json,
        } => {
            let schedule = pick_schedule(&storage, id)?;
            io::export_schedule_csv(&out, &schedule, engine.catalog())?;
            println!("Exported {} to {}", schedule.title, out.display());
            if let Some(path) = people_json {
                io::export_roster_json(&path, &storage.load_roster()?)?;
                println!("Exported roster to {}", path.display());
            }
            0
        }
        Commands::DeleteSchedule { id } => {
            storage.delete_schedule(&ScheduleId::new(id))?;
            0
        }
        Commands::Ics { id, name, year, out } => {
            let schedule = pick_schedule(&storage, id)?;
            let tasks = ics::member_tasks(&name, &schedule.weeks, engine.catalog());
            if tasks.is_empty() {
                bail!("no task for {name} in {}", schedule.title);
            }
            let opts = ics_options(&settings, year);
            std::fs::write(&out, ics::render_ics(&name, &tasks, &opts))
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{} task(s) written to {}", tasks.len(), out.display());
            0
        }
        Commands::Send {
            id,
            message,
            year,
            test,
            outbox,
        } => {
            let schedule = pick_schedule(&storage, id)?;
            let roster = storage.load_roster()?;
            let prepared = prepare_schedule_messages(
                &roster,
                &schedule,
                engine.catalog(),
                message.as_deref(),
                &TextMessages::default(),
                &settings.delivery_mode(test),
                &ics_options(&settings, year),
            );
            let mailer = OutboxMailer::new(outbox, &settings.sender, settings.reply_to.clone());
            let mut reports = dispatch(&prepared.messages, &mailer);
            reports.extend(prepared.skipped);

            let mut failed = 0;
            for r in &reports {
                match (&r.sent_to, &r.error) {
                    (Some(to), _) => println!("OK   {} -> {}", r.member, to),
                    (None, err) => {
                        failed += 1;
                        println!("FAIL {}: {}", r.member, err.as_deref().unwrap_or("?"));
                    }
                }
            }
            if failed > 0 {
                2
            } else {
                0
            }
        }
        Commands::Remind {
            id,
            name,
            date,
            test,
            outbox,
        } => {
            let schedule = pick_schedule(&storage, id)?;
            let roster = storage.load_roster()?;
            let task = ics::member_tasks(&name, &schedule.weeks, engine.catalog())
                .into_iter()
                .find(|t| t.date == date)
                .with_context(|| format!("{name} has no task on {date}"))?;
            let msg = prepare_reminder(
                &roster,
                &name,
                &task,
                &TextMessages::default(),
                &settings.delivery_mode(test),
            )?;
            let mailer = OutboxMailer::new(outbox, &settings.sender, settings.reply_to.clone());
            let report = dispatch(std::slice::from_ref(&msg), &mailer);
            if report.iter().all(|r| r.success()) {
                println!("Reminder for {} sent to {}", msg.member, msg.to);
                0
            } else {
                2
            }
        }
        Commands::Counters { out_csv } => {
            let roster = storage.load_roster()?;
            let counters = storage.load_counters()?;
            if let Some(path) = out_csv {
                io::export_counters_csv(path, &roster, &counters.value)?;
            }
            println!("version {}", counters.version);
            for p in &roster.people {
                println!("{} | {}", p.name, counters.value.get(&p.id));
            }
            0
        }
        Commands::Recount { id } => {
            let schedule = storage.find_schedule(&ScheduleId::new(id))?;
            let roster = storage.load_roster()?;
            let baseline = storage.load_counters()?;
            let mut counters = baseline.value.clone();
            let counted = counters.tally(&roster, &schedule);
            storage.save_counters(baseline.version, &counters)?;
            println!("Counted {counted} task(s) from {}", schedule.title);
            0
        }
    };

    std::process::exit(code);
}

fn pick_schedule(storage: &JsonStorage, id: Option<String>) -> Result<GeneratedSchedule> {
    match id {
        Some(id) => Ok(storage.find_schedule(&ScheduleId::new(id))?),
        None => storage
            .load_schedules()?
            .into_iter()
            .next()
            .context("no saved schedule"),
    }
}

fn ics_options(settings: &Settings, year: Option<i32>) -> IcsOptions {
    let now = Utc::now();
    IcsOptions {
        organisation: settings.organisation.clone(),
        uid_domain: settings.ics_domain.clone(),
        year: year.unwrap_or_else(|| now.year()),
        stamp: now,
    }
}

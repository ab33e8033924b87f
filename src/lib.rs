#![forbid(unsafe_code)]
//! Corvées : répartition des tâches de ménage d'une coopérative, semaine par semaine.
//!
//! - Roster de membres avec restrictions d'étage, de tâche et paires obligatoires.
//! - Moteur glouton déterministe : tâches rares d'abord, membre le moins chargé.
//! - Compteurs de charge conservés d'une génération à l'autre.
//! - Stockage fichiers (JSON/CSV), calendriers ICS, courriels.

mod logging;

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod counters;
pub mod ics;
pub mod io;
pub mod model;
pub mod notification;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod title;

pub use calendar::{date_label, parse_date_label, week_dates};
pub use catalog::{Slot, SlotCatalog};
pub use config::Settings;
pub use counters::WorkloadCounters;
pub use model::{Floor, Person, PersonId, Role, Roster, RosterError};
pub use notification::{
    dispatch, prepare_reminder, prepare_schedule_messages, DeliveryMode, Mailer, MessageRenderer,
    OutboxMailer, TextMessages,
};
pub use schedule::{
    generate_schedule, GeneratedSchedule, ScheduleId, ScheduleRequest, WeekAssignment, UNFILLED,
};
pub use scheduler::{Engine, Generation, SchedError};
pub use storage::{JsonStorage, Storage, StorageError, Versioned};
pub use title::schedule_title;

use crate::catalog::SlotCatalog;
use crate::ics::{self, IcsOptions, MemberTask};
use crate::logging::{log_info, log_warn};
use crate::model::Roster;
use crate::schedule::GeneratedSchedule;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Destinataires réels, ou tout rediriger vers une adresse de test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    Live,
    Test { address: String },
}

impl DeliveryMode {
    fn recipient<'a>(&'a self, real: &'a str) -> &'a str {
        match self {
            DeliveryMode::Live => real,
            DeliveryMode::Test { address } => address,
        }
    }

    fn is_test(&self) -> bool {
        matches!(self, DeliveryMode::Test { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

/// Message prêt à partir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub member: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

/// Résultat d'envoi pour une personne.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub member: String,
    pub sent_to: Option<String>,
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Permet de customiser le rendu des messages (texte, HTML, etc.).
pub trait MessageRenderer {
    fn schedule_body(
        &self,
        name: &str,
        title: &str,
        custom_message: Option<&str>,
        tasks: &[MemberTask],
        test_mode: bool,
    ) -> String;

    fn reminder_body(&self, name: &str, task: &MemberTask, test_mode: bool) -> String;
}

/// Gabarit texte simple.
#[derive(Debug, Clone)]
pub struct TextMessages {
    pub signature: String,
}

impl Default for TextMessages {
    fn default() -> Self {
        Self {
            signature: "Comité d'entretien".to_string(),
        }
    }
}

impl MessageRenderer for TextMessages {
    fn schedule_body(
        &self,
        name: &str,
        title: &str,
        custom_message: Option<&str>,
        tasks: &[MemberTask],
        test_mode: bool,
    ) -> String {
        let mut out = format!("Bonjour {name},\n\n");
        if let Some(msg) = custom_message.filter(|m| !m.trim().is_empty()) {
            out.push_str(msg.trim_end());
            out.push_str("\n\n");
        }
        out.push_str(&format!("Vos tâches pour « {title} » :\n"));
        for task in tasks {
            out.push_str(&format!("  - {} : {}\n", task.date, task.task));
        }
        out.push_str(
            "\nLe fichier .ics joint ajoute ces tâches à votre calendrier.\n\nMerci de votre collaboration!\n",
        );
        out.push_str(&format!("-- \n{}\n", self.signature));
        if test_mode {
            out.push_str("\nMODE TEST - envoyé à l'adresse de test.\n");
        }
        out
    }

    fn reminder_body(&self, name: &str, task: &MemberTask, test_mode: bool) -> String {
        let mut out = format!(
            "Bonjour {name},\n\nCeci est un rappel : vous êtes assigné(e) au ménage le {date}.\n\nVotre tâche : {task}\n\nMerci de votre collaboration!\n-- \n{sig}\n",
            date = task.date,
            task = task.task,
            sig = self.signature,
        );
        if test_mode {
            out.push_str("\nMODE TEST - envoyé à l'adresse de test.\n");
        }
        out
    }
}

/// Messages prêts et personnes qu'on ne peut pas joindre.
#[derive(Debug, Clone, Default)]
pub struct Prepared {
    pub messages: Vec<OutgoingMessage>,
    pub skipped: Vec<DeliveryReport>,
}

/// Un message par personne ayant au moins une tâche dans l'horaire, avec son .ics.
pub fn prepare_schedule_messages(
    roster: &Roster,
    schedule: &GeneratedSchedule,
    catalog: &SlotCatalog,
    custom_message: Option<&str>,
    renderer: &dyn MessageRenderer,
    mode: &DeliveryMode,
    ics_opts: &IcsOptions,
) -> Prepared {
    let mut prepared = Prepared::default();
    for person in &roster.people {
        let tasks = ics::member_tasks(&person.name, &schedule.weeks, catalog);
        if tasks.is_empty() {
            continue;
        }
        let Some(email) = person.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            prepared.skipped.push(DeliveryReport {
                member: person.name.clone(),
                sent_to: None,
                error: Some("Pas de courriel".to_string()),
            });
            continue;
        };

        let body = renderer.schedule_body(
            &person.name,
            &schedule.title,
            custom_message,
            &tasks,
            mode.is_test(),
        );
        prepared.messages.push(OutgoingMessage {
            member: person.name.clone(),
            to: mode.recipient(email).to_string(),
            subject: format!("Horaire de ménage - {}", schedule.title),
            body,
            attachment: Some(Attachment {
                filename: ics::attachment_name(&person.name),
                content: ics::render_ics(&person.name, &tasks, ics_opts),
            }),
        });
    }
    prepared
}

/// Prépare un rappel pour une tâche précise d'une personne.
pub fn prepare_reminder(
    roster: &Roster,
    name: &str,
    task: &MemberTask,
    renderer: &dyn MessageRenderer,
    mode: &DeliveryMode,
) -> Result<OutgoingMessage> {
    let person = roster
        .find_by_name(name)
        .with_context(|| format!("unknown person: {name}"))?;
    let Some(email) = person.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        bail!("no email address for {name}");
    };
    Ok(OutgoingMessage {
        member: person.name.clone(),
        to: mode.recipient(email).to_string(),
        subject: format!("Rappel: Ménage le {}", task.date),
        body: renderer.reminder_body(&person.name, task, mode.is_test()),
        attachment: None,
    })
}

/// Canal d'envoi.
pub trait Mailer {
    fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

/// Envoie chaque message ; un échec n'arrête pas les suivants.
pub fn dispatch(messages: &[OutgoingMessage], mailer: &dyn Mailer) -> Vec<DeliveryReport> {
    messages
        .iter()
        .map(|msg| match mailer.send(msg) {
            Ok(()) => {
                log_info!("sent schedule to {} <{}>", msg.member, msg.to);
                DeliveryReport {
                    member: msg.member.clone(),
                    sent_to: Some(msg.to.clone()),
                    error: None,
                }
            }
            Err(err) => {
                log_warn!("delivery to {} failed: {:#}", msg.member, err);
                DeliveryReport {
                    member: msg.member.clone(),
                    sent_to: None,
                    error: Some(format!("{err:#}")),
                }
            }
        })
        .collect()
}

/// Écrit les messages dans un dossier (un .txt par message, plus la pièce jointe).
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
    from: String,
    reply_to: Option<String>,
}

impl OutboxMailer {
    pub fn new<P: AsRef<Path>>(dir: P, from: impl Into<String>, reply_to: Option<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            from: from.into(),
            reply_to,
        }
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, message: &OutgoingMessage) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating outbox {}", self.dir.display()))?;
        let stem = ics::attachment_name(&message.member)
            .trim_end_matches(".ics")
            .replace("horaire-menage-", "message-");

        let mut text = format!("From: {}\nTo: {}\n", self.from, message.to);
        if let Some(reply_to) = &self.reply_to {
            text.push_str(&format!("Reply-To: {reply_to}\n"));
        }
        text.push_str(&format!("Subject: {}\n", message.subject));
        if let Some(att) = &message.attachment {
            text.push_str(&format!("Attachment: {}\n", att.filename));
            let path = self.dir.join(&att.filename);
            fs::write(&path, &att.content)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        text.push('\n');
        text.push_str(&message.body);

        let path = self.dir.join(format!("{stem}.txt"));
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

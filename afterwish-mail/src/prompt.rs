//! Prompt construction

use crate::error::{MailError, Result};
use crate::tone::Tone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptVariant {
    /// Write an email from rough notes, optionally as a reply
    Draft {
        notes: String,
        replying_to: Option<String>,
        tone: Tone,
    },
    /// Improve wording while keeping meaning and tone
    Polish { email: String },
    /// Make an email markedly firmer
    Assertive { email: String },
}

fn require(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        Err(MailError::EmptyInput)
    } else {
        Ok(text)
    }
}

impl PromptVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft { .. } => "draft",
            Self::Polish { .. } => "polish",
            Self::Assertive { .. } => "assertive",
        }
    }

    /// The user message sent to the model; empty input is rejected
    pub fn build(&self) -> Result<String> {
        match self {
            Self::Draft {
                notes,
                replying_to,
                tone,
            } => {
                let notes = require(notes)?;
                let reply = replying_to
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| format!(" Je reageert op deze email: \"{}\"", r))
                    .unwrap_or_default();

                Ok(format!(
                    "Je bent een expert Nederlandse email schrijver.{reply}\n\n\
                     {instruction}\n\n\
                     Schrijf een email gebaseerd op deze ruwe gedachten: \"{notes}\"\n\n\
                     Houd rekening met de Nederlandse email etiquette en zorg ervoor dat de email:\n\
                     - Natuurlijk en authentiek klinkt\n\
                     - De juiste toon heeft zoals beschreven\n\
                     - Goed gestructureerd is\n\
                     - Geschikt is voor professionele communicatie (ook bij assertieve tonen)\n\n\
                     Geef alleen de email tekst terug, zonder extra uitleg.",
                    instruction = tone.instruction(),
                ))
            }
            Self::Polish { email } => Ok(format!(
                "Verbeter deze Nederlandse email door deze nog beter, professioneler en effectiever \
                 te maken. Behoud de oorspronkelijke betekenis en toon, maar maak de formulering nog \
                 sterker:\n\n\"{}\"\n\nGeef alleen de verbeterde email tekst terug.",
                require(email)?
            )),
            Self::Assertive { email } => Ok(format!(
                "Maak deze Nederlandse email VEEL assertiever en krachtiger. Gebruik fermere taal, \
                 directere statements, en laat er geen twijfel over bestaan wat er verwacht wordt. \
                 Behoud professionaliteit maar maak de toon veel sterker en assertiever:\n\n\"{}\"\n\n\
                 Transformeer dit naar een veel krachtigere, assertievere versie die duidelijk maakt \
                 dat je serieus bent. Geef alleen de verbeterde email tekst terug.",
                require(email)?
            )),
        }
    }
}

//! Tones an email can be written in

use std::fmt;
use std::str::FromStr;

use crate::error::MailError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Vriendelijk,
    Formeel,
    Beknopt,
    Enthousiast,
    Zakelijk,
    Empathisch,
    Ultradirect,
    Geirriteerd,
}

impl Tone {
    pub const ALL: &'static [Tone] = &[
        Tone::Vriendelijk,
        Tone::Formeel,
        Tone::Beknopt,
        Tone::Enthousiast,
        Tone::Zakelijk,
        Tone::Empathisch,
        Tone::Ultradirect,
        Tone::Geirriteerd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vriendelijk => "vriendelijk",
            Self::Formeel => "formeel",
            Self::Beknopt => "beknopt",
            Self::Enthousiast => "enthousiast",
            Self::Zakelijk => "zakelijk",
            Self::Empathisch => "empathisch",
            Self::Ultradirect => "ultradirect",
            Self::Geirriteerd => "geïrriteerd",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Vriendelijk => "Warm en toegankelijk",
            Self::Formeel => "Professioneel en beleefd",
            Self::Beknopt => "To the point en efficiënt",
            Self::Enthousiast => "Energiek en positief",
            Self::Zakelijk => "Neutraal en direct",
            Self::Empathisch => "Begripvol en ondersteunend",
            Self::Ultradirect => "Geen poespas, puur zakelijk",
            Self::Geirriteerd => "Duidelijk ontevreden",
        }
    }

    /// The sentence telling the model how to sound
    pub fn instruction(self) -> String {
        match self {
            Self::Ultradirect => "Schrijf een EXTREEM directe en zakelijke email. Geen beleefdheidsfrases, \
                geen omhaal, geen \"ik hoop dat dit email je goed vindt\". Kom meteen ter zake, gebruik \
                korte zinnen, en eindig direct na het punt. Wees professioneel maar ongelooflijk direct \
                en efficiënt."
                .to_string(),
            Self::Geirriteerd => "Schrijf een email waarin de irritatie en ontevredenheid duidelijk \
                doorklinkt, maar blijf professioneel en gepast voor zakelijke communicatie. Gebruik \
                ferme taal, directe vragen, en maak duidelijk dat je niet tevreden bent met de situatie. \
                Wees assertief en streng, maar cross nooit de lijn naar onprofessioneel gedrag."
                .to_string(),
            other => format!("De email moet een {} toon hebben.", other.as_str()),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "geirriteerd" {
            return Ok(Self::Geirriteerd);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|tone| tone.as_str() == wanted)
            .ok_or_else(|| MailError::UnknownTone(s.to_string()))
    }
}

//! Subscription kinds and their closed category sets

use std::fmt::Debug;
use std::hash::Hash;

use crate::records::CollectionKind;

pub trait CategoryTag: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn display_name(self) -> &'static str;

    /// Commonly held subscriptions, offered as quick-add names
    fn suggestions(self) -> &'static [&'static str];

    fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == tag)
    }
}

/// A subscription inventory: which collection it lives in and which
/// categories it allows
pub trait ItemKind: Send + Sync + 'static {
    type Category: CategoryTag;

    const COLLECTION: CollectionKind;
    const LABEL: &'static str;
}

pub struct Business;

pub struct Private;

impl ItemKind for Business {
    type Category = BusinessCategory;

    const COLLECTION: CollectionKind = CollectionKind::BusinessSubscriptions;
    const LABEL: &'static str = "Zakelijke abonnementen";
}

impl ItemKind for Private {
    type Category = PrivateCategory;

    const COLLECTION: CollectionKind = CollectionKind::PrivateSubscriptions;
    const LABEL: &'static str = "Privé abonnementen";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessCategory {
    Communicatie,
    Administratie,
    Professioneel,
    Marketing,
    Software,
}

impl CategoryTag for BusinessCategory {
    const ALL: &'static [Self] = &[
        Self::Communicatie,
        Self::Administratie,
        Self::Professioneel,
        Self::Marketing,
        Self::Software,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Communicatie => "communicatie",
            Self::Administratie => "administratie",
            Self::Professioneel => "professioneel",
            Self::Marketing => "marketing",
            Self::Software => "software",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Communicatie => "Communicatie & IT",
            Self::Administratie => "Administratie & Boekhouding",
            Self::Professioneel => "Professionele Diensten",
            Self::Marketing => "Marketing Tools",
            Self::Software => "Software & Tools",
        }
    }

    fn suggestions(self) -> &'static [&'static str] {
        match self {
            Self::Communicatie => &[
                "Zakelijke telefoon",
                "Zakelijk internet",
                "Domein registratie",
                "Web hosting",
                "Cloud diensten",
            ],
            Self::Administratie => &[
                "Boekhoudsoftware",
                "KvK inschrijving",
                "Fiscale software",
                "Administratie diensten",
            ],
            Self::Professioneel => &[
                "Juridisch advies abonnement",
                "Fiscaal advies abonnement",
                "Consultancy diensten",
                "Zakelijke verzekeringen",
            ],
            Self::Marketing => &[
                "Social media management",
                "SEO tools",
                "Email marketing",
                "Analytics tools",
                "Advertentie platforms",
            ],
            Self::Software => &[
                "Creative Cloud",
                "Office 365",
                "Git repositories",
                "JetBrains tools",
                "Ontwikkel tools",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateCategory {
    Communicatie,
    Financieel,
    Wonen,
    Zorg,
    Lifestyle,
}

impl CategoryTag for PrivateCategory {
    const ALL: &'static [Self] = &[
        Self::Communicatie,
        Self::Financieel,
        Self::Wonen,
        Self::Zorg,
        Self::Lifestyle,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Communicatie => "communicatie",
            Self::Financieel => "financieel",
            Self::Wonen => "wonen",
            Self::Zorg => "zorg",
            Self::Lifestyle => "lifestyle",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Communicatie => "Communicatie & Media",
            Self::Financieel => "Financiële Diensten",
            Self::Wonen => "Wonen & Nutsbedrijven",
            Self::Zorg => "Zorg & Lifestyle",
            Self::Lifestyle => "Online Diensten",
        }
    }

    fn suggestions(self) -> &'static [&'static str] {
        match self {
            Self::Communicatie => &[
                "Vast telefoon",
                "Mobiele telefoon",
                "Internet & TV",
                "Netflix",
                "Amazon Prime",
                "Spotify",
                "Disney+",
                "Ziggo/KPN",
            ],
            Self::Financieel => &[
                "Bankrekening",
                "Spaarrekening",
                "Creditcard",
                "ANWB",
                "Consumentenbond",
                "Beleggen",
                "Pensioen",
            ],
            Self::Wonen => &[
                "Energie (Gas/Licht)",
                "Water",
                "Gemeente (Afval)",
                "Woonverzekering",
                "Zorgverzekering",
                "Opstalverzekering",
                "Huurverzekering",
            ],
            Self::Zorg => &[
                "Zorgverzekering",
                "Tandarts",
                "Huisarts",
                "Fysio",
                "Fitness",
                "Maaltijdservice",
                "Thuiszorg",
            ],
            Self::Lifestyle => &[
                "Webshops",
                "Cloud opslag",
                "VPN diensten",
                "Online games",
                "Streaming diensten",
                "Nieuwsbrieven",
                "Social media",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_tag() {
        for category in BusinessCategory::ALL {
            assert_eq!(BusinessCategory::parse(category.as_str()), Some(*category));
        }
        for category in PrivateCategory::ALL {
            assert_eq!(PrivateCategory::parse(category.as_str()), Some(*category));
        }
    }

    #[test]
    fn test_category_sets_are_closed_per_kind() {
        assert_eq!(PrivateCategory::parse("software"), None);
        assert_eq!(BusinessCategory::parse("wonen"), None);
        assert_eq!(
            BusinessCategory::parse("communicatie").map(CategoryTag::display_name),
            Some("Communicatie & IT")
        );
        assert_eq!(
            PrivateCategory::parse("communicatie").map(CategoryTag::display_name),
            Some("Communicatie & Media")
        );
    }

    #[test]
    fn test_collections() {
        assert_eq!(Business::COLLECTION.as_str(), "zakelijk_abonnementen");
        assert_eq!(Private::COLLECTION.as_str(), "prive_abonnementen");
    }
}

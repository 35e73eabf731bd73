//! Curated built-in species table.
//!
//! Entry `i` describes class index `i` of the default label list.

use crate::species::SpeciesRecord;
use std::sync::LazyLock;

struct Entry {
    label: &'static str,
    norwegian_name: &'static str,
    english_name: &'static str,
    scientific_name: &'static str,
    description: &'static str,
    habitat: &'static str,
    average_size: &'static str,
    characteristics: &'static [&'static str],
}

const ENTRIES: [Entry; 10] = [
    Entry {
        label: "Torsk",
        norwegian_name: "Torsk",
        english_name: "Atlantic cod",
        scientific_name: "Gadus morhua",
        description: "Kraftig torskefisk og en av de viktigste matfiskene langs norskekysten.",
        habitat: "Kystnære og åpne havområder, fra grunt vann ned til 600 meter",
        average_size: "50-80 cm",
        characteristics: &[
            "Tydelig skjeggtråd under haken",
            "Lys, buet sidelinje",
            "Tre ryggfinner og to gattfinner",
            "Brunspraglet til grønnlig rygg",
        ],
    },
    Entry {
        label: "Sei",
        norwegian_name: "Sei",
        english_name: "Saithe",
        scientific_name: "Pollachius virens",
        description: "Stimfisk i torskefamilien som jager aktivt etter småfisk.",
        habitat: "Kyst og åpent hav, ofte i stimer nær bunnen eller midtvanns",
        average_size: "40-80 cm",
        characteristics: &[
            "Mørk grønngrå rygg",
            "Rett, lys sidelinje",
            "Svakt framskutt underkjeve",
            "Liten eller manglende skjeggtråd",
        ],
    },
    Entry {
        label: "Hyse",
        norwegian_name: "Hyse",
        english_name: "Haddock",
        scientific_name: "Melanogrammus aeglefinus",
        description: "Torskefisk som lever av bunndyr og er lett å kjenne på den mørke flekken.",
        habitat: "Sand- og mudderbunn på 40-300 meters dyp",
        average_size: "30-60 cm",
        characteristics: &[
            "Svart sidelinje",
            "Mørk flekk over brystfinnen",
            "Liten skjeggtråd",
            "Spiss første ryggfinne",
        ],
    },
    Entry {
        label: "Laks",
        norwegian_name: "Laks",
        english_name: "Atlantic salmon",
        scientific_name: "Salmo salar",
        description: "Anadrom laksefisk som vokser opp i elv og beiter i havet.",
        habitat: "Elver for gyting og oppvekst, Nord-Atlanteren for beiting",
        average_size: "50-100 cm",
        characteristics: &[
            "Fettfinne mellom ryggfinne og halefinne",
            "Sølvblank kropp med små svarte prikker",
            "Smal haleknoll",
            "Svakt innskåret halefinne",
        ],
    },
    Entry {
        label: "Ørret",
        norwegian_name: "Ørret",
        english_name: "Brown trout",
        scientific_name: "Salmo trutta",
        description: "Laksefisk som finnes både som stasjonær ferskvannsfisk og som sjøørret.",
        habitat: "Bekker, elver, innsjøer og kystnære sjøområder",
        average_size: "25-60 cm",
        characteristics: &[
            "Fettfinne",
            "Svarte og ofte røde prikker, også under sidelinjen",
            "Kraftig haleknoll",
            "Rett avskåret halefinne",
        ],
    },
    Entry {
        label: "Makrell",
        norwegian_name: "Makrell",
        english_name: "Atlantic mackerel",
        scientific_name: "Scomber scombrus",
        description: "Rask pelagisk stimfisk som trekker inn mot kysten om sommeren.",
        habitat: "Frie vannmasser i Nordsjøen og Norskehavet",
        average_size: "30-40 cm",
        characteristics: &[
            "Grønnblå rygg med mørke tverrstriper",
            "Sølvhvit buk",
            "Rekke med småfinner bak rygg- og gattfinnen",
            "Dypt kløftet halefinne",
        ],
    },
    Entry {
        label: "Sild",
        norwegian_name: "Sild",
        english_name: "Atlantic herring",
        scientific_name: "Clupea harengus",
        description: "Planktonspisende stimfisk som danner enorme stimer.",
        habitat: "Pelagisk i kyst- og havområder",
        average_size: "20-35 cm",
        characteristics: &[
            "Blågrønn rygg og sølvblanke sider",
            "Løstsittende skjell",
            "Én kort ryggfinne midt på kroppen",
            "Kjølformet buk",
        ],
    },
    Entry {
        label: "Rødspette",
        norwegian_name: "Rødspette",
        english_name: "European plaice",
        scientific_name: "Pleuronectes platessa",
        description: "Flatfisk som ligger nedgravd i sanden med begge øynene på høyre side.",
        habitat: "Sand- og grusbunn fra fjæra ned til 100 meter",
        average_size: "25-50 cm",
        characteristics: &[
            "Oransjerøde flekker på brun overside",
            "Benknuter bak øynene",
            "Hvit underside",
            "Øynene på høyre side",
        ],
    },
    Entry {
        label: "Kveite",
        norwegian_name: "Kveite",
        english_name: "Atlantic halibut",
        scientific_name: "Hippoglossus hippoglossus",
        description: "Den største flatfisken i norske farvann, og en aktiv rovfisk.",
        habitat: "Dype kyst- og bankområder, ofte på 50-2000 meters dyp",
        average_size: "100-200 cm",
        characteristics: &[
            "Stor munn med kraftige tenner",
            "Buet sidelinje over brystfinnen",
            "Mørk olivengrønn overside",
            "Innbuet halefinne",
        ],
    },
    Entry {
        label: "Abbor",
        norwegian_name: "Abbor",
        english_name: "European perch",
        scientific_name: "Perca fluviatilis",
        description: "Vanlig ferskvannsfisk som ofte står i stim nær vegetasjon.",
        habitat: "Innsjøer, tjern og rolige elvepartier",
        average_size: "15-35 cm",
        characteristics: &[
            "Mørke tverrbånd over ryggen",
            "Pigget første ryggfinne med svart flekk",
            "Røde buk- og gattfinner",
            "Grønnlig kropp",
        ],
    },
];

static CATALOG: LazyLock<Vec<SpeciesRecord>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|e| SpeciesRecord {
            label: e.label.to_string(),
            norwegian_name: e.norwegian_name.to_string(),
            english_name: e.english_name.to_string(),
            scientific_name: e.scientific_name.to_string(),
            description: e.description.to_string(),
            habitat: e.habitat.to_string(),
            average_size: e.average_size.to_string(),
            characteristics: e.characteristics.iter().map(ToString::to_string).collect(),
        })
        .collect()
});

/// Every curated record, in class-index order.
pub fn all() -> &'static [SpeciesRecord] {
    &CATALOG
}

/// Look up a curated record by exact (case-sensitive) label.
pub fn by_label(label: &str) -> Option<&'static SpeciesRecord> {
    CATALOG.iter().find(|record| record.label == label)
}

/// Look up a curated record by class index.
pub fn by_index(index: usize) -> Option<&'static SpeciesRecord> {
    CATALOG.get(index)
}

//! Seeded, read-only data served by the mock.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct SchemaRecord {
    pub algorithm: String,
    pub version: String,
    pub id: String,
    pub name: String,
    pub schema_num: u32,
    #[serde(skip)]
    pub sites: Vec<(u32, u32)>,
    #[serde(skip)]
    pub histologies: (u32, u32),
    #[serde(skip)]
    pub discriminator: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DiseaseRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub disease_type: String,
    pub version: String,
    pub icd_o3_morphology: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_category: Option<String>,
    pub last_modified: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct TableRecord {
    pub algorithm: String,
    pub version: String,
    pub id: String,
    pub name: String,
    pub title: String,
    /// Ids of the schemas that read this table.
    #[serde(skip)]
    pub schemas: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangelogEntry {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangelogRecord {
    pub id: String,
    pub user: String,
    pub date: String,
    pub version: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adds: Option<Vec<ChangelogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mods: Option<Vec<ChangelogEntry>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NaaccrFieldRecord {
    pub item: u32,
    pub name: String,
    pub section: String,
    pub start: u32,
    pub length: u32,
    pub align: &'static str,
    pub pad_char: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct GlossaryRecord {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub category: Vec<String>,
    pub last_modified: String,
}

pub struct Algorithm {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub discriminator_key: &'static str,
}

pub const ALGORITHMS: &[Algorithm] = &[
    Algorithm {
        id: "cs",
        name: "Collaborative Staging",
        version: "02.05.50",
        discriminator_key: "ssf25",
    },
    Algorithm {
        id: "tnm",
        name: "TNM",
        version: "1.9",
        discriminator_key: "ssf25",
    },
    Algorithm {
        id: "eod_public",
        name: "EOD Public",
        version: "3.0",
        discriminator_key: "discriminator_1",
    },
];

pub struct SiteCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub sites: &'static [(&'static str, &'static str)],
}

pub const SITE_CATEGORIES: &[SiteCategory] = &[
    SiteCategory {
        id: "head-and-neck",
        label: "Head and Neck",
        sites: &[("C000", "C148"), ("C300", "C329")],
    },
    SiteCategory {
        id: "digestive",
        label: "Digestive System",
        sites: &[("C150", "C269")],
    },
    SiteCategory {
        id: "breast",
        label: "Breast",
        sites: &[("C500", "C509")],
    },
    SiteCategory {
        id: "lymphoid",
        label: "Lymphoid and Hematopoietic",
        sites: &[("C420", "C424"), ("C770", "C779")],
    },
];

pub const PRIMARY_SITES: &[(&str, &str)] = &[
    ("C000", "External upper lip"),
    ("C001", "External lower lip"),
    ("C021", "Border of tongue"),
    ("C421", "Bone marrow"),
    ("C509", "Breast, NOS"),
];

pub const NAACCR_VERSIONS: &[(&str, &str)] = &[("16", "NAACCR 16"), ("18", "NAACCR 18")];

const TIMESTAMP: &str = "2014-06-01T08:00:00.000Z";

pub struct Catalog {
    pub schemas: Vec<SchemaRecord>,
    pub tables: Vec<TableRecord>,
    pub diseases: Vec<DiseaseRecord>,
    /// Newest first.
    pub changelogs: Vec<ChangelogRecord>,
    pub glossary: Vec<GlossaryRecord>,
    pub naaccr_fields: Vec<NaaccrFieldRecord>,
}

/// `C509` -> 509. Anything else is not a site code.
pub fn site_number(code: &str) -> Option<u32> {
    let digits = code.strip_prefix('C').or_else(|| code.strip_prefix('c'))?;
    if digits.len() != 3 {
        return None;
    }
    digits.parse().ok()
}

pub fn histology_number(code: &str) -> Option<u32> {
    let code = code.split('/').next()?;
    if code.len() != 4 {
        return None;
    }
    code.parse().ok()
}

impl Catalog {
    pub fn seeded() -> Self {
        let mut schemas = Vec::new();
        for alg in ALGORITHMS {
            let base = [
                ("breast", "Breast", vec![(500, 509)], (8000, 9999), None, 1),
                ("nasopharynx", "Nasopharynx", vec![(110, 119)], (8000, 9589), Some("010"), 2),
                ("pharyngeal_tonsil", "Pharyngeal Tonsil", vec![(111, 111)], (8000, 9589), Some("020"), 3),
                ("lymphoma", "Lymphoma", vec![(0, 809)], (9590, 9699), None, 4),
                ("urethra", "Urethra", vec![(680, 680)], (8000, 9589), None, 129),
            ];
            for (id, name, sites, hist, disc, num) in base {
                schemas.push(SchemaRecord {
                    algorithm: alg.id.to_string(),
                    version: alg.version.to_string(),
                    id: id.to_string(),
                    name: name.to_string(),
                    schema_num: num,
                    sites,
                    histologies: hist,
                    discriminator: disc.map(str::to_string),
                });
            }
        }

        let all: &[&str] = &["breast", "nasopharynx", "pharyngeal_tonsil", "lymphoma", "urethra"];
        let mut tables = Vec::new();
        for alg in ALGORITHMS {
            let base: [(&str, &str, &str, &[&str]); 6] = [
                ("primary_site", "Primary Site", "Primary Site Validation", all),
                ("histology", "Histology", "Histology Validation", all),
                ("extension_baa", "Extension", "CS Extension", &["breast", "urethra"]),
                ("ssf1_breast", "Estrogen Receptor Assay", "CS Site-Specific Factor 1", &["breast"]),
                (
                    "schema_selection_nasopharynx",
                    "Nasopharynx Selection",
                    "Schema selection",
                    &["nasopharynx"],
                ),
                ("year_dx_validation", "Year of Diagnosis", "Year DX Validation", all),
            ];
            for (id, name, title, used_by) in base {
                tables.push(TableRecord {
                    algorithm: alg.id.to_string(),
                    version: alg.version.to_string(),
                    id: id.to_string(),
                    name: name.to_string(),
                    title: title.to_string(),
                    schemas: used_by.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        let mut diseases = vec![
            disease("d-basophilic-1", "Acute basophilic leukemia", "HEMATO", "9870/3", None),
            disease("d-basophilic-2", "Chronic basophilic leukemia", "HEMATO", "9872/3", None),
            disease("d-basophilic-3", "Basophilic myeloproliferative neoplasm", "HEMATO", "9975/3", None),
            disease("51f6cf58e3e27c3994bd5408", "Acute erythroid leukemia", "HEMATO", "9840/3", None),
        ];
        for i in 0..60 {
            diseases.push(disease(
                &format!("d-lymphoma-{i:02}"),
                &format!("Lymphoma variant {i:02}"),
                "HEMATO",
                "9590/3",
                Some("lymphoid"),
            ));
        }
        for i in 0..12 {
            diseases.push(disease(
                &format!("d-carcinoma-{i:02}"),
                &format!("Carcinoma of the breast, subtype {i:02}"),
                "SOLID_TUMOR",
                "8500/3",
                Some("breast"),
            ));
        }

        let glossary = vec![
            glossary("g-1", "Mass", "A lump of tissue.", &["GENERAL"]),
            glossary("g-2", "Lymph node", "A small bean-shaped structure.", &["LYMPH_NODES", "GENERAL"]),
            glossary("g-3", "Sentinel lymph node", "The first node to receive drainage.", &["LYMPH_NODES"]),
            glossary("g-4", "Blast", "An immature blood cell.", &["HEMATO"]),
        ];

        let changelogs = vec![
            changelog(
                "c-3",
                "2015-02-11T14:20:00.000Z",
                "Revised lymphoma variants",
                None,
                Some(&[("d-lymphoma-00", "Lymphoma variant 00")]),
            ),
            changelog(
                "c-2",
                "2014-06-01T08:00:00.000Z",
                "Added breast carcinomas",
                Some(&[("d-carcinoma-00", "Carcinoma of the breast, subtype 00")]),
                None,
            ),
            changelog(
                "c-1",
                "2013-07-30T12:00:00.000Z",
                "Initial migration",
                Some(&[
                    ("d-basophilic-1", "Acute basophilic leukemia"),
                    ("51f6cf58e3e27c3994bd5408", "Acute erythroid leukemia"),
                ]),
                None,
            ),
        ];

        let naaccr_fields = vec![
            naaccr(240, "Date of Birth", "Patient-Confidential", 226, 8),
            naaccr(390, "Date of Diagnosis", "Cancer Identification", 530, 8),
            naaccr(400, "Primary Site", "Cancer Identification", 540, 4),
            naaccr(522, "Histologic Type ICD-O-3", "Cancer Identification", 550, 4),
        ];

        Self {
            schemas,
            tables,
            diseases,
            changelogs,
            glossary,
            naaccr_fields,
        }
    }
}

fn disease(id: &str, name: &str, kind: &str, morphology: &str, category: Option<&str>) -> DiseaseRecord {
    DiseaseRecord {
        id: id.to_string(),
        name: name.to_string(),
        disease_type: kind.to_string(),
        version: "latest".to_string(),
        icd_o3_morphology: morphology.to_string(),
        site_category: category.map(str::to_string),
        last_modified: TIMESTAMP.to_string(),
    }
}

fn changelog(
    id: &str,
    date: &str,
    description: &str,
    adds: Option<&[(&str, &str)]>,
    mods: Option<&[(&str, &str)]>,
) -> ChangelogRecord {
    fn entries(list: &[(&str, &str)]) -> Vec<ChangelogEntry> {
        list.iter()
            .map(|(id, name)| ChangelogEntry {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect()
    }
    ChangelogRecord {
        id: id.to_string(),
        user: "registrar".to_string(),
        date: date.to_string(),
        version: "latest".to_string(),
        description: description.to_string(),
        adds: adds.map(entries),
        mods: mods.map(entries),
    }
}

fn naaccr(item: u32, name: &str, section: &str, start: u32, length: u32) -> NaaccrFieldRecord {
    NaaccrFieldRecord {
        item,
        name: name.to_string(),
        section: section.to_string(),
        start,
        length,
        align: "LEFT",
        pad_char: " ",
    }
}

fn glossary(id: &str, name: &str, definition: &str, categories: &[&str]) -> GlossaryRecord {
    GlossaryRecord {
        id: id.to_string(),
        name: name.to_string(),
        definition: definition.to_string(),
        category: categories.iter().map(|c| c.to_string()).collect(),
        last_modified: TIMESTAMP.to_string(),
    }
}

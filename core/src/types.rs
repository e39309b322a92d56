//! Resource DTOs for SEER*API responses.
//!
//! # Design
//! Only the resources reached by `SeerClient` are bound here. Optional
//! fields are skipped when serializing rather than written as `null`, and
//! timestamps are ISO-8601 UTC strings with millisecond precision.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `yyyy-MM-ddTHH:mm:ss.SSSZ`, always in UTC.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<DateTime<Utc>>::deserialize(d)
    }
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingAlgorithmInfo {
    pub algorithm: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<StagingVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingVersion {
    pub algorithm: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Summary of a schema as returned by lookup and listing calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingSchemaInfo {
    pub algorithm: String,
    pub version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_num: Option<u32>,
}

/// Summary of a staging table as returned by listing calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingTable {
    pub algorithm: String,
    pub version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageOutcome {
    Staged,
    FailedNoMatchingSchema,
    FailedMultipleMatchingSchemas,
    FailedInvalidYearDx,
    FailedInvalidInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub message: String,
}

/// Result of a staging computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagingResult {
    pub result: StageOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(default)]
    pub input: BTreeMap<String, String>,
    #[serde(default)]
    pub output: BTreeMap<String, String>,
    #[serde(default)]
    pub errors: Vec<StagingError>,
    #[serde(default)]
    pub path: Vec<String>,
}

impl StagingResult {
    pub fn output(&self, key: &str) -> Option<&str> {
        self.output.get(key).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Disease
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiseaseType {
    SolidTumor,
    Hemato,
}

impl DiseaseType {
    pub fn as_param(self) -> &'static str {
        match self {
            DiseaseType::SolidTumor => "SOLID_TUMOR",
            DiseaseType::Hemato => "HEMATO",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRange {
    pub low: String,
    pub high: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

/// A disease record, or a partial one sent to the reportability call.
///
/// Every field may be absent: reportability requests carry only the
/// type, morphologies, effective ranges and primary sites, and reduced
/// `output_type` searches drop most of the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Disease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub disease_type: Option<DiseaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o3_morphology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o2_morphology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o1_morphology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o3_effective: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o2_effective: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_o1_effective: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_site: Vec<SiteRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub first_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Filled in by the reportability call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reportable: Vec<YearRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseVersion {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub first_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimarySite {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteCategory {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub sites: Vec<SiteRange>,
}

/// Whether two morphologies count as the same primary in a given year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SamePrimaries {
    pub disease1: String,
    pub disease2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub is_same: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseChangelogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
}

/// One published change set. An absent list and an empty one differ on
/// the wire, so `adds`, `mods` and `deletes` stay optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseChangelog {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adds: Option<Vec<DiseaseChangelogEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Vec<DiseaseChangelogEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletes: Option<Vec<DiseaseChangelogEntry>>,
}

// ---------------------------------------------------------------------------
// Glossary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlossaryCategory {
    General,
    SolidTumor,
    Hemato,
    Seerrx,
    SeerTraining,
    LymphNodes,
}

impl GlossaryCategory {
    pub fn as_param(self) -> &'static str {
        match self {
            GlossaryCategory::General => "GENERAL",
            GlossaryCategory::SolidTumor => "SOLID_TUMOR",
            GlossaryCategory::Hemato => "HEMATO",
            GlossaryCategory::Seerrx => "SEERRX",
            GlossaryCategory::SeerTraining => "SEER_TRAINING",
            GlossaryCategory::LymphNodes => "LYMPH_NODES",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Glossary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_name: Vec<String>,
    #[serde(default, rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<GlossaryCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_site: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub histology: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub last_modified: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Site recode
// ---------------------------------------------------------------------------

/// SEER site group for a site/histology pair; `99999` when unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRecode {
    pub site: String,
    pub hist: String,
    pub site_group: String,
}

/// Version string of the site recode tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRecodeVersion {
    pub version: String,
}

// ---------------------------------------------------------------------------
// NAACCR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NaaccrVersion {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NaaccrFieldName {
    pub item: u32,
    pub name: String,
}

/// Layout of a single NAACCR data item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NaaccrField {
    pub item: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_char: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}
